//! Signal-backed [`ViewSink`] used by the Leptos screens.

use super::codec::FormValues;
use super::form_controller::EditSession;
use super::orchestrator::{NoticeLevel, ViewSink};
use crate::shared::api_utils::navigate;
use crate::shared::toast::ToastService;
use contracts::domain::common::{ReferenceItem, ReferenceKind, ResourceRecord};
use leptos::prelude::*;
use std::collections::BTreeMap;

/// Reactive mirror of what the orchestrator last published
pub struct ViewState<R: Send + Sync + 'static> {
    pub records: RwSignal<Vec<R>>,
    pub references: RwSignal<BTreeMap<ReferenceKind, Vec<ReferenceItem>>>,
    pub loading: RwSignal<bool>,
    pub session: RwSignal<EditSession>,
    pub form_values: RwSignal<FormValues>,
    pub toasts: ToastService,
}

impl<R: Send + Sync + 'static> Clone for ViewState<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: Send + Sync + 'static> Copy for ViewState<R> {}

impl<R: Send + Sync + 'static> ViewState<R> {
    pub fn new(toasts: ToastService) -> Self {
        Self {
            records: RwSignal::new(Vec::new()),
            references: RwSignal::new(BTreeMap::new()),
            loading: RwSignal::new(false),
            session: RwSignal::new(EditSession::Closed),
            form_values: RwSignal::new(FormValues::new()),
            toasts,
        }
    }

    pub fn form_value(&self, name: &str) -> String {
        self.form_values
            .with(|v| v.get(name).cloned().unwrap_or_default())
    }

    pub fn reference(&self, kind: ReferenceKind) -> Vec<ReferenceItem> {
        self.references
            .with(|r| r.get(&kind).cloned().unwrap_or_default())
    }
}

impl<R: ResourceRecord + Send + Sync> ViewSink<R> for ViewState<R> {
    fn render(&self, records: &[R]) {
        self.records.set(records.to_vec());
    }

    fn render_reference(&self, kind: ReferenceKind, items: &[ReferenceItem]) {
        self.references.update(|r| {
            r.insert(kind, items.to_vec());
        });
    }

    fn set_loading(&self, loading: bool) {
        self.loading.set(loading);
    }

    fn notify(&self, level: NoticeLevel, message: &str) {
        match level {
            NoticeLevel::Error => log::error!("{}", message),
            _ => log::info!("{}", message),
        }
        self.toasts.show(level, message);
    }

    fn navigate(&self, url: &str) {
        log::info!("Not authenticated, redirecting to {}", url);
        navigate(url);
    }

    fn form_changed(&self, session: &EditSession, values: &FormValues) {
        self.session.set(session.clone());
        self.form_values.set(values.clone());
    }
}
