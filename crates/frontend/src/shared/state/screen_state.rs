//! Reactive handle of one list screen.
//!
//! The orchestrator is not `Send`, so it lives in a local `StoredValue`;
//! the handle itself is `Copy` and can be captured by any view closure.

use crate::shared::api_utils::{api_client, confirm_dialog};
use crate::shared::config::AppConfig;
use crate::shared::sync::orchestrator::AutoFillSource;
use crate::shared::sync::{FilterDef, ScreenConfig, SyncOrchestrator, ViewSink, ViewState};
use crate::shared::toast::ToastService;
use contracts::domain::common::ResourceRecord;
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::collections::BTreeMap;
use std::future::Future;
use std::rc::Rc;

pub struct ScreenState<R: ResourceRecord + Send + Sync> {
    orch: StoredValue<Rc<SyncOrchestrator<R>>, LocalStorage>,
    pub view: ViewState<R>,
    /// Filter inputs as typed; the orchestrator holds the same entries
    pub filters: RwSignal<BTreeMap<String, String>>,
    pub filters_expanded: RwSignal<bool>,
    debounce_ms: u32,
}

impl<R: ResourceRecord + Send + Sync> Clone for ScreenState<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: ResourceRecord + Send + Sync> Copy for ScreenState<R> {}

impl<R: ResourceRecord + Send + Sync> ScreenState<R> {
    /// Build the orchestrator for this screen and start the initial load
    pub fn mount(
        config: &AppConfig,
        toasts: ToastService,
        screen: ScreenConfig,
        autofill: Option<Rc<dyn AutoFillSource>>,
    ) -> Self {
        let view = ViewState::<R>::new(toasts);
        let sink: Rc<dyn ViewSink<R>> = Rc::new(view);
        let mut orch = SyncOrchestrator::new(api_client(config), sink, screen);
        if let Some(source) = autofill {
            orch = orch.with_autofill(source);
        }

        let state = Self {
            orch: StoredValue::new_local(Rc::new(orch)),
            view,
            filters: RwSignal::new(BTreeMap::new()),
            filters_expanded: RwSignal::new(true),
            debounce_ms: config.autofill_debounce_ms,
        };

        // a reset reloads on the next tick, after the reset borrow is released
        state.orch.get_value().on_filters_reset(Rc::new(move || {
            state.run(|orch| async move {
                orch.reload().await;
            });
        }));
        state.run(|orch| async move { orch.initialize().await });
        state
    }

    /// Run an orchestrator task on the local executor
    fn run<F, Fut>(&self, task: F)
    where
        F: FnOnce(Rc<SyncOrchestrator<R>>) -> Fut,
        Fut: Future<Output = ()> + 'static,
    {
        let orch = self.orch.get_value();
        spawn_local(task(orch));
    }

    pub fn reload(&self) {
        self.run(|orch| async move {
            orch.reload().await;
        });
    }

    // ============================================================================
    // Filters
    // ============================================================================

    pub fn filter_value(&self, name: &str) -> String {
        self.filters
            .with(|f| f.get(name).cloned().unwrap_or_default())
    }

    pub fn set_filter(&self, name: &str, value: String) {
        self.orch.get_value().set_filter(name, value.clone());
        self.filters.update(|f| {
            f.insert(name.to_string(), value);
        });
    }

    pub fn active_filter_count(&self) -> usize {
        self.filters.track();
        self.orch.get_value().active_filter_count()
    }

    /// `(name, "Label: value")` for every filled-in filter
    pub fn active_filter_labels(&self, defs: &[FilterDef]) -> Vec<(&'static str, String)> {
        self.filters.with(|f| {
            defs.iter()
                .filter_map(|def| {
                    f.get(def.name)
                        .filter(|v| !v.is_empty())
                        .map(|v| (def.name, format!("{}: {}", def.label, v)))
                })
                .collect()
        })
    }

    pub fn apply_filters(&self) {
        self.run(|orch| async move { orch.apply_filters().await });
    }

    /// Clear one filter and reload right away
    pub fn clear_filter(&self, name: &str) {
        self.set_filter(name, String::new());
        self.apply_filters();
    }

    pub fn reset_filters(&self) {
        self.filters.update(|f| f.values_mut().for_each(String::clear));
        self.orch.get_value().reset_filters();
    }

    // ============================================================================
    // Form
    // ============================================================================

    pub fn open_for_add(&self) {
        self.run(|orch| async move { orch.open_for_add().await });
    }

    pub fn regenerate_identifier(&self, kind: &'static str) {
        self.run(move |orch| async move { orch.regenerate_identifier(kind).await });
    }

    pub fn open_for_edit(&self, id: i64) {
        self.orch.get_value().open_for_edit(id);
    }

    pub fn close_form(&self) {
        self.orch.get_value().close_form();
    }

    pub fn set_field(&self, name: &str, value: String) {
        self.orch.get_value().set_form_value(name, value.clone());
        self.view.form_values.update(|v| {
            v.insert(name.to_string(), value);
        });
    }

    pub fn save(&self) {
        self.run(|orch| async move {
            if let Err(e) = orch.submit().await {
                log::debug!("Save not completed: {}", e);
            }
        });
    }

    /// Only the last call within the debounce window performs the lookup
    pub fn schedule_autofill(&self, key: String) {
        let delay = TimeoutFuture::new(self.debounce_ms);
        self.run(move |orch| orch.debounced_autofill(key, delay));
    }

    pub fn autofill_now(&self, key: String) {
        self.run(move |orch| orch.debounced_autofill(key, async {}));
    }

    // ============================================================================
    // Row actions
    // ============================================================================

    pub fn delete(&self, id: i64, natural_key: &str) {
        let message = format!(
            "Are you sure you want to delete {} {}?",
            R::element_name().to_lowercase(),
            natural_key
        );
        if !confirm_dialog(&message) {
            return;
        }
        self.run(move |orch| async move {
            let _ = orch.delete(id).await;
        });
    }

    pub fn confirm(&self, id: i64, natural_key: &str) {
        let message = format!(
            "Are you sure you want to confirm {} {}?",
            R::element_name().to_lowercase(),
            natural_key
        );
        if !confirm_dialog(&message) {
            return;
        }
        self.run(move |orch| async move {
            let _ = orch.confirm(id).await;
        });
    }

    pub fn register(&self, id: i64) {
        self.run(move |orch| async move {
            let _ = orch.register(id).await;
        });
    }
}
