use crate::shared::icons::icon;
use crate::shared::sync::NoticeLevel;
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub level: NoticeLevel,
    pub message: String,
}

/// Transient notifications, removed automatically after `duration_ms`.
///
/// Provided once through context and rendered by [`ToastHost`].
#[derive(Clone, Copy)]
pub struct ToastService {
    toasts: RwSignal<Vec<Toast>>,
    next_id: RwSignal<u64>,
    duration_ms: u32,
}

impl ToastService {
    pub fn new(duration_ms: u32) -> Self {
        Self {
            toasts: RwSignal::new(Vec::new()),
            next_id: RwSignal::new(1),
            duration_ms,
        }
    }

    pub fn show(&self, level: NoticeLevel, message: impl Into<String>) {
        let id = self.next_id.get_untracked();
        self.next_id.set(id + 1);
        self.toasts.update(|list| {
            list.push(Toast {
                id,
                level,
                message: message.into(),
            })
        });

        let svc = *self;
        spawn_local(async move {
            TimeoutFuture::new(svc.duration_ms).await;
            svc.dismiss(id);
        });
    }

    pub fn dismiss(&self, id: u64) {
        self.toasts.update(|list| list.retain(|t| t.id != id));
    }

    pub fn toasts(&self) -> Signal<Vec<Toast>> {
        self.toasts.into()
    }
}

fn level_class(level: NoticeLevel) -> &'static str {
    match level {
        NoticeLevel::Success => "toast toast--success",
        NoticeLevel::Info => "toast toast--info",
        NoticeLevel::Warning => "toast toast--warning",
        NoticeLevel::Error => "toast toast--error",
    }
}

#[component]
pub fn ToastHost() -> impl IntoView {
    let svc = use_context::<ToastService>().expect("ToastService not found in context");

    view! {
        <div class="toast-container">
            <For
                each=move || svc.toasts().get()
                key=|t| t.id
                children=move |t| {
                    let id = t.id;
                    view! {
                        <div class=level_class(t.level) role="status">
                            <span class="toast__message">{t.message}</span>
                            <button class="button button--icon toast__close" on:click=move |_| svc.dismiss(id)>
                                {icon("x")}
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
