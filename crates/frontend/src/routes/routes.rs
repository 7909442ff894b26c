use crate::domain::a001_invoice::ui::list::InvoiceList;
use crate::domain::a002_operation::ui::list::OperationList;
use crate::shared::icons::icon;
use leptos::prelude::*;

/// Top-level screens of the console
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Invoices,
    Operations,
}

impl Screen {
    pub fn all() -> [Screen; 2] {
        [Screen::Invoices, Screen::Operations]
    }

    pub fn title(&self) -> &'static str {
        match self {
            Screen::Invoices => "Invoices",
            Screen::Operations => "Operations",
        }
    }

    pub fn icon_name(&self) -> &'static str {
        match self {
            Screen::Invoices => "invoices",
            Screen::Operations => "operations",
        }
    }

    /// Screen served at a page path; anything unknown opens invoices
    pub fn from_path(path: &str) -> Self {
        if path.trim_end_matches('/').ends_with("/operations") {
            Screen::Operations
        } else {
            Screen::Invoices
        }
    }
}

fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_default()
}

#[component]
fn Sidebar(active: RwSignal<Screen>) -> impl IntoView {
    view! {
        <nav class="sidebar">
            {Screen::all()
                .into_iter()
                .map(|screen| {
                    view! {
                        <a
                            href="#"
                            class="sidebar__item"
                            class:sidebar__item--active=move || active.get() == screen
                            on:click=move |ev| {
                                ev.prevent_default();
                                active.set(screen);
                            }
                        >
                            {icon(screen.icon_name())}
                            <span>{screen.title()}</span>
                        </a>
                    }
                })
                .collect_view()}
        </nav>
    }
}

#[component]
pub fn AppRoutes() -> impl IntoView {
    let active = RwSignal::new(Screen::from_path(&current_path()));

    view! {
        <div class="app-shell">
            <Sidebar active=active />
            <main class="app-shell__content">
                {move || match active.get() {
                    Screen::Invoices => view! { <InvoiceList /> }.into_any(),
                    Screen::Operations => view! { <OperationList /> }.into_any(),
                }}
            </main>
        </div>
    }
}
