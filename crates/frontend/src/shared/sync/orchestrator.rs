//! Composition root of one list screen.
//!
//! Sequencing only: filters feed `list`, `list` feeds the store, the store
//! feeds the view, and every mutation is followed by a reload with the
//! current filters. Rendering and notices go through [`ViewSink`].

use super::client::{ApiClient, MutationOutcome, ResourceClient};
use super::codec::{FormSchema, FormValues};
use super::entity_store::EntityStore;
use super::error::SyncError;
use super::filter_state::{describe_filters, FilterDef, FilterState};
use super::form_controller::{EditSession, FormController};
use async_trait::async_trait;
use contracts::domain::a002_operation::Operation;
use contracts::domain::common::{ReferenceItem, ReferenceKind, ResourceRecord};
use serde_json::{Map, Value};
use std::cell::{Cell, Ref, RefCell};
use std::collections::BTreeMap;
use std::future::Future;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// Everything the orchestrator shows to the user
pub trait ViewSink<R: ResourceRecord> {
    fn render(&self, records: &[R]);
    fn render_reference(&self, kind: ReferenceKind, items: &[ReferenceItem]);
    fn set_loading(&self, loading: bool);
    fn notify(&self, level: NoticeLevel, message: &str);
    fn navigate(&self, url: &str);
    fn form_changed(&self, session: &EditSession, values: &FormValues);
}

/// Source of auto-fill values for a cross-reference field
#[async_trait(?Send)]
pub trait AutoFillSource {
    /// `Ok(None)` when nothing is known under `key`
    async fn autofill_values(&self, key: &str) -> Result<Option<Map<String, Value>>, SyncError>;
}

#[async_trait(?Send)]
impl AutoFillSource for ResourceClient<Operation> {
    async fn autofill_values(&self, key: &str) -> Result<Option<Map<String, Value>>, SyncError> {
        Ok(self
            .lookup_by_natural_key(key)
            .await?
            .map(|op| op.autofill_values()))
    }
}

/// Per-screen settings
#[derive(Clone)]
pub struct ScreenConfig {
    pub schema: FormSchema,
    pub filters: &'static [FilterDef],
    pub login_url: String,
    /// A backend `message` replaces the default success text
    pub server_messages: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Create,
    Update,
    Delete,
    Confirm,
    Register,
}

impl Action {
    fn past_tense(&self) -> &'static str {
        match self {
            Action::Create => "created",
            Action::Update => "updated",
            Action::Delete => "deleted",
            Action::Confirm => "confirmed",
            Action::Register => "registered",
        }
    }

    fn gerund(&self) -> &'static str {
        match self {
            Action::Create | Action::Update => "saving",
            Action::Delete => "deleting",
            Action::Confirm => "confirming",
            Action::Register => "registering",
        }
    }
}

pub struct SyncOrchestrator<R: ResourceRecord> {
    client: ResourceClient<R>,
    sink: Rc<dyn ViewSink<R>>,
    config: ScreenConfig,
    store: RefCell<EntityStore<R>>,
    filters: RefCell<FilterState>,
    form: RefCell<FormController>,
    references: RefCell<BTreeMap<ReferenceKind, Vec<ReferenceItem>>>,
    reload_seq: Cell<u64>,
    autofill: Option<Rc<dyn AutoFillSource>>,
}

impl<R: ResourceRecord> SyncOrchestrator<R> {
    pub fn new(api: ApiClient, sink: Rc<dyn ViewSink<R>>, config: ScreenConfig) -> Self {
        Self {
            client: ResourceClient::new(api),
            sink,
            form: RefCell::new(FormController::new(config.schema)),
            config,
            store: RefCell::new(EntityStore::new()),
            filters: RefCell::new(FilterState::new()),
            references: RefCell::new(BTreeMap::new()),
            reload_seq: Cell::new(0),
            autofill: None,
        }
    }

    pub fn with_autofill(mut self, source: Rc<dyn AutoFillSource>) -> Self {
        self.autofill = Some(source);
        self
    }

    pub fn config(&self) -> &ScreenConfig {
        &self.config
    }

    pub fn records(&self) -> Ref<'_, EntityStore<R>> {
        self.store.borrow()
    }

    pub fn reference(&self, kind: ReferenceKind) -> Vec<ReferenceItem> {
        self.references
            .borrow()
            .get(&kind)
            .cloned()
            .unwrap_or_default()
    }

    pub fn session(&self) -> EditSession {
        self.form.borrow().session().clone()
    }

    pub fn form_value(&self, name: &str) -> String {
        self.form.borrow().value(name).to_string()
    }

    fn report(&self, error: &SyncError, context: &str) {
        if error.is_auth() {
            self.sink.navigate(&self.config.login_url);
        } else {
            self.sink
                .notify(NoticeLevel::Error, &format!("{}: {}", context, error));
        }
    }

    fn publish_form(&self) {
        let form = self.form.borrow();
        self.sink.form_changed(form.session(), form.values());
    }

    // ============================================================================
    // Loading
    // ============================================================================

    /// First load: reference collections and the record list, in parallel
    pub async fn initialize(&self) {
        futures::join!(self.load_references(), self.reload());
    }

    pub async fn load_references(&self) {
        let kinds = R::reference_kinds();
        let api = self.client.api();
        let results = futures::future::join_all(kinds.iter().map(|k| api.load_reference(*k))).await;
        for (kind, result) in kinds.iter().zip(results) {
            match result {
                Ok(items) => {
                    self.sink.render_reference(*kind, &items);
                    self.references.borrow_mut().insert(*kind, items);
                }
                Err(e) => self.report(&e, &format!("Error loading {}", kind.display_name())),
            }
        }
    }

    /// Issue a new reload token; earlier in-flight lists become stale
    pub fn next_reload_token(&self) -> u64 {
        let token = self.reload_seq.get() + 1;
        self.reload_seq.set(token);
        token
    }

    /// Apply a list result if `token` is still the latest one.
    ///
    /// Returns the number of records shown, `None` on error or staleness.
    pub fn finish_reload(&self, token: u64, result: Result<Vec<R>, SyncError>) -> Option<usize> {
        if token != self.reload_seq.get() {
            log::debug!(
                "Discarding stale {} list (token {}, latest {})",
                R::list_name(),
                token,
                self.reload_seq.get()
            );
            return None;
        }
        self.sink.set_loading(false);
        match result {
            Ok(records) => {
                let count = records.len();
                self.store.borrow_mut().replace(records);
                self.sink.render(self.store.borrow().all());
                Some(count)
            }
            Err(e) => {
                self.report(&e, &format!("Error loading {}", R::list_name()));
                None
            }
        }
    }

    /// Reload the list with the current filters
    pub async fn reload(&self) -> Option<usize> {
        let token = self.next_reload_token();
        let query = self.filters.borrow().to_query();
        self.sink.set_loading(true);
        let result = self.client.list(&query).await;
        self.finish_reload(token, result)
    }

    // ============================================================================
    // Filters
    // ============================================================================

    pub fn set_filter(&self, name: &str, value: impl Into<String>) {
        self.filters.borrow_mut().set(name, value);
    }

    pub fn filter(&self, name: &str) -> String {
        self.filters
            .borrow()
            .get(name)
            .unwrap_or_default()
            .to_string()
    }

    /// Filters that will be sent with the next reload
    pub fn active_filter_count(&self) -> usize {
        self.filters.borrow().active_count()
    }

    /// Callback fired by [`SyncOrchestrator::reset_filters`], normally a
    /// deferred reload
    pub fn on_filters_reset(&self, callback: Rc<dyn Fn()>) {
        self.filters.borrow_mut().set_on_change(callback);
    }

    pub async fn apply_filters(&self) {
        let query = self.filters.borrow().to_query();
        if let Some(count) = self.reload().await {
            let message = match describe_filters(&query, self.config.filters) {
                Some(description) => {
                    format!("Found {} {} with {}", count, R::list_name(), description)
                }
                None => format!("All {} loaded (no filters active)", R::list_name()),
            };
            self.sink.notify(NoticeLevel::Info, &message);
        }
    }

    pub fn reset_filters(&self) {
        self.filters.borrow_mut().reset();
        self.sink.notify(NoticeLevel::Info, "Filters reset");
    }

    // ============================================================================
    // Form
    // ============================================================================

    /// Open an empty form and pre-fill a generated natural key
    pub async fn open_for_add(&self) {
        self.form.borrow_mut().open_for_add();
        self.publish_form();

        let kind = R::identifier_kinds().first().copied();
        match self.client.generate_identifier(kind).await {
            Ok(identifier) => {
                let applied = self
                    .form
                    .borrow_mut()
                    .apply_generated_identifier(R::natural_key_field(), identifier);
                if applied {
                    self.publish_form();
                }
            }
            Err(e) => self.report(&e, &format!("Error generating {} ID", R::element_name())),
        }
    }

    /// Regenerate the natural key for another identifier kind (e.g. "INVC")
    pub async fn regenerate_identifier(&self, kind: &str) {
        if self.session() != EditSession::AddingNew {
            return;
        }
        match self.client.generate_identifier(Some(kind)).await {
            Ok(identifier) => {
                if self
                    .form
                    .borrow_mut()
                    .apply_generated_identifier(R::natural_key_field(), identifier)
                {
                    self.publish_form();
                }
            }
            Err(e) => self.report(&e, &format!("Error generating {} ID", R::element_name())),
        }
    }

    pub fn open_for_edit(&self, id: i64) -> bool {
        let record = self.store.borrow().find_by_id(id).cloned();
        let Some(record) = record else {
            self.sink.notify(
                NoticeLevel::Error,
                &format!("{} not found", R::element_name()),
            );
            return false;
        };
        if let Err(e) = self.form.borrow_mut().open_for_edit(&record) {
            self.report(&e, &format!("Error opening {}", R::element_name().to_lowercase()));
            return false;
        }
        self.publish_form();
        true
    }

    pub fn close_form(&self) {
        self.form.borrow_mut().close();
        self.publish_form();
    }

    pub fn set_form_value(&self, name: &str, value: impl Into<String>) {
        self.form.borrow_mut().set_value(name, value);
    }

    /// Validate and save the open form.
    ///
    /// Validation failures keep the form open and never reach the network.
    pub async fn submit(&self) -> Result<(), SyncError> {
        let (session, payload) = {
            let form = self.form.borrow();
            if !form.session().is_open() {
                return Ok(());
            }
            if let Err(e) = form.validate() {
                self.sink.notify(NoticeLevel::Error, &e.to_string());
                return Err(e);
            }
            (form.session().clone(), form.collect())
        };

        let (action, result) = match &session {
            EditSession::AddingNew => (Action::Create, self.client.create(&payload).await),
            EditSession::Editing { natural_key, .. } => (
                Action::Update,
                self.client.update(natural_key, &payload).await,
            ),
            EditSession::Closed => return Ok(()),
        };

        if result.is_ok() {
            self.form.borrow_mut().close();
            self.publish_form();
        }
        self.finish_mutation(action, result).await
    }

    // ============================================================================
    // Row actions
    // ============================================================================

    /// Natural key of a listed row; unknown rows and rows without a key
    /// are reported and never reach the network
    fn natural_key_of(&self, id: i64) -> Option<String> {
        let key = self
            .store
            .borrow()
            .find_by_id(id)
            .map(|r| r.natural_key().to_string());
        match key {
            None => {
                self.sink.notify(
                    NoticeLevel::Error,
                    &format!("{} not found", R::element_name()),
                );
                None
            }
            Some(key) if key.trim().is_empty() => {
                self.sink.notify(
                    NoticeLevel::Error,
                    &format!("{} {} has no {}", R::element_name(), id, R::natural_key_field()),
                );
                None
            }
            Some(key) => Some(key),
        }
    }

    pub async fn delete(&self, id: i64) -> Result<(), SyncError> {
        let Some(key) = self.natural_key_of(id) else {
            return Ok(());
        };
        let result = self.client.remove(&key).await;
        self.finish_mutation(Action::Delete, result).await
    }

    /// Confirm a record. The request is issued even if the record already
    /// looks confirmed; the backend decides.
    pub async fn confirm(&self, id: i64) -> Result<(), SyncError> {
        let Some(key) = self.natural_key_of(id) else {
            return Ok(());
        };
        let result = self.client.confirm(&key).await;
        self.finish_mutation(Action::Confirm, result).await
    }

    pub async fn register(&self, id: i64) -> Result<(), SyncError> {
        let Some(key) = self.natural_key_of(id) else {
            return Ok(());
        };
        let result = self.client.register(&key).await;
        self.finish_mutation(Action::Register, result).await
    }

    /// Reload after any answered mutation, then report its outcome
    async fn finish_mutation(
        &self,
        action: Action,
        result: Result<MutationOutcome<R>, SyncError>,
    ) -> Result<(), SyncError> {
        match result {
            Ok(outcome) => {
                self.reload().await;
                let message = outcome
                    .message
                    .filter(|_| self.config.server_messages)
                    .unwrap_or_else(|| {
                        format!("{} {} successfully!", R::element_name(), action.past_tense())
                    });
                self.sink.notify(NoticeLevel::Success, &message);
                Ok(())
            }
            Err(e) => {
                // Only an answered request can have changed server state.
                // Network failures wait for an explicit retry.
                if matches!(e, SyncError::Api { .. }) {
                    self.reload().await;
                }
                self.report(
                    &e,
                    &format!(
                        "Error {} {}",
                        action.gerund(),
                        R::element_name().to_lowercase()
                    ),
                );
                Err(e)
            }
        }
    }

    // ============================================================================
    // Auto-fill
    // ============================================================================

    /// Token for a lookup scheduled after the debounce delay
    pub fn begin_autofill(&self) -> u64 {
        self.form.borrow_mut().begin_autofill()
    }

    /// Cancel-and-reschedule auto-fill.
    ///
    /// The token is taken when this is called, so any later call supersedes
    /// this one while it is still waiting on `delay`.
    pub fn debounced_autofill<D>(self: Rc<Self>, key: String, delay: D) -> impl Future<Output = ()>
    where
        D: Future<Output = ()> + 'static,
    {
        let token = self.begin_autofill();
        async move {
            delay.await;
            self.run_autofill(token, &key).await;
        }
    }

    /// Best-effort lookup; failures are logged only.
    /// Does nothing if `token` was superseded or the form was closed.
    pub async fn run_autofill(&self, token: u64, key: &str) {
        let Some(source) = self.autofill.clone() else {
            return;
        };
        let key = key.trim();
        if key.is_empty() || !self.form.borrow().is_current(token) {
            return;
        }
        match source.autofill_values(key).await {
            Ok(Some(values)) => {
                if !self.form.borrow().is_current(token) {
                    log::debug!("Discarding auto-fill for {}: superseded", key);
                    return;
                }
                self.form.borrow_mut().apply_lookup(&values);
                self.publish_form();
            }
            Ok(None) => log::debug!("No auto-fill data for {}", key),
            Err(e) => log::warn!("Auto-fill lookup for {} failed: {}", key, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::sync::client::tests::MockTransport;
    use crate::shared::sync::codec::{FieldKind, FormField};
    use crate::shared::sync::transport::HttpTransport;
    use contracts::domain::a001_invoice::Invoice;
    use futures::channel::oneshot;
    use futures::executor::block_on;
    use futures::future::join;
    use serde_json::json;

    const SCHEMA: FormSchema = FormSchema {
        fields: &[
            FormField::new("inv_id", "Invoice ID", FieldKind::Text),
            FormField::new("operation_num", "Operation", FieldKind::Reference(ReferenceKind::Operations)),
            FormField::new("client", "Client", FieldKind::Reference(ReferenceKind::Clients)).required(),
            FormField::new("inv_date", "Invoice Date", FieldKind::Date).required(),
            FormField::new("description", "Description", FieldKind::TextArea),
            FormField::new("designation", "Designation", FieldKind::Text),
        ],
    };

    const FILTERS: &[FilterDef] = &[
        FilterDef::new("client", "Client"),
        FilterDef::new("status", "Status"),
    ];

    #[derive(Default)]
    struct RecordingSink {
        rendered: RefCell<Vec<Vec<String>>>,
        references: RefCell<Vec<(ReferenceKind, usize)>>,
        notices: RefCell<Vec<(NoticeLevel, String)>>,
        navigations: RefCell<Vec<String>>,
        forms: RefCell<Vec<EditSession>>,
    }

    impl ViewSink<Invoice> for RecordingSink {
        fn render(&self, records: &[Invoice]) {
            self.rendered
                .borrow_mut()
                .push(records.iter().map(|r| r.inv_id.clone()).collect());
        }
        fn render_reference(&self, kind: ReferenceKind, items: &[ReferenceItem]) {
            self.references.borrow_mut().push((kind, items.len()));
        }
        fn set_loading(&self, _loading: bool) {}
        fn notify(&self, level: NoticeLevel, message: &str) {
            self.notices.borrow_mut().push((level, message.to_string()));
        }
        fn navigate(&self, url: &str) {
            self.navigations.borrow_mut().push(url.to_string());
        }
        fn form_changed(&self, session: &EditSession, _values: &FormValues) {
            self.forms.borrow_mut().push(session.clone());
        }
    }

    #[derive(Default)]
    struct StaticAutoFill {
        supplied: Option<Map<String, Value>>,
        lookups: RefCell<Vec<String>>,
    }

    impl StaticAutoFill {
        fn new(supplied: Map<String, Value>) -> Self {
            Self {
                supplied: Some(supplied),
                lookups: RefCell::new(Vec::new()),
            }
        }
    }

    #[async_trait(?Send)]
    impl AutoFillSource for StaticAutoFill {
        async fn autofill_values(&self, key: &str) -> Result<Option<Map<String, Value>>, SyncError> {
            self.lookups.borrow_mut().push(key.to_string());
            Ok(self.supplied.clone())
        }
    }

    fn setup(server_messages: bool) -> (Rc<MockTransport>, Rc<RecordingSink>, SyncOrchestrator<Invoice>) {
        let mock = Rc::new(MockTransport::default());
        let sink = Rc::new(RecordingSink::default());
        let transport: Rc<dyn HttpTransport> = mock.clone();
        let view: Rc<dyn ViewSink<Invoice>> = sink.clone();
        let orchestrator = SyncOrchestrator::new(
            ApiClient::new(transport, ""),
            view,
            ScreenConfig {
                schema: SCHEMA,
                filters: FILTERS,
                login_url: "/login".to_string(),
                server_messages,
            },
        );
        (mock, sink, orchestrator)
    }

    fn one_invoice() -> Value {
        json!({"data": [{"id": 1, "inv_id": "INV-0001", "client": "Acme", "status": "draft", "total": 100}]})
    }

    fn last_notice(sink: &RecordingSink) -> Option<(NoticeLevel, String)> {
        sink.notices.borrow().last().cloned()
    }

    #[test]
    fn test_initialize_loads_references_and_list() {
        let (mock, sink, orch) = setup(false);
        mock.respond(200, json!({"success": true, "data": [{"id": 1, "client_name": "Acme"}]}))
            .respond(200, json!({"data": [{"id": 5, "operation_num": "OP-0005"}]}))
            .respond(200, one_invoice());

        block_on(orch.initialize());

        assert_eq!(mock.calls().len(), 3);
        assert_eq!(orch.records().len(), 1);
        assert_eq!(orch.reference(ReferenceKind::Clients)[0].name, "Acme");
        assert_eq!(orch.reference(ReferenceKind::Operations)[0].name, "OP-0005");
        assert_eq!(sink.rendered.borrow().last(), Some(&vec!["INV-0001".to_string()]));
        assert!(sink.notices.borrow().is_empty());
    }

    #[test]
    fn test_edit_submit_puts_then_reloads() {
        let (mock, sink, orch) = setup(false);
        mock.respond(200, one_invoice());
        orch.set_filter("status", "draft");
        orch.set_filter("client", "");
        block_on(orch.reload());
        mock.requests.borrow_mut().clear();

        assert!(orch.open_for_edit(1));
        orch.set_form_value("inv_date", "2024-01-15");
        orch.set_form_value("description", "updated");
        mock.respond(200, json!({"success": true, "message": "ok"}))
            .respond(200, one_invoice());
        block_on(orch.submit()).unwrap();

        assert_eq!(
            mock.calls(),
            vec!["PUT /ajax/invoices/INV-0001", "GET /ajax/invoices?status=draft"]
        );
        let body: Value =
            serde_json::from_str(mock.requests.borrow()[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body["description"], json!("updated"));
        assert_eq!(
            last_notice(&sink),
            Some((NoticeLevel::Success, "Invoice updated successfully!".to_string()))
        );
        assert_eq!(orch.session(), EditSession::Closed);
    }

    #[test]
    fn test_server_message_replaces_default_text_when_enabled() {
        let (mock, sink, orch) = setup(true);
        mock.respond(200, one_invoice());
        block_on(orch.reload());
        mock.respond(200, json!({"success": true, "message": "Operation confirmed"}))
            .respond(200, one_invoice());
        block_on(orch.confirm(1)).unwrap();
        assert_eq!(
            last_notice(&sink),
            Some((NoticeLevel::Success, "Operation confirmed".to_string()))
        );
    }

    #[test]
    fn test_add_prefills_generated_identifier() {
        let (mock, _sink, orch) = setup(false);
        mock.respond(200, json!({"inv_id": "INV-0042"}));
        block_on(orch.open_for_add());
        assert_eq!(mock.calls(), vec!["GET /ajax/invoices/generate-id?type=INV"]);
        assert_eq!(orch.form_value("inv_id"), "INV-0042");
        assert_eq!(orch.session(), EditSession::AddingNew);
    }

    #[test]
    fn test_validation_failure_stays_local() {
        let (mock, sink, orch) = setup(false);
        mock.respond(200, json!({"inv_id": "INV-0042"}));
        block_on(orch.open_for_add());
        mock.requests.borrow_mut().clear();

        let err = block_on(orch.submit()).unwrap_err();
        assert!(matches!(err, SyncError::Validation { .. }));
        assert!(mock.calls().is_empty());
        assert_eq!(
            last_notice(&sink),
            Some((
                NoticeLevel::Error,
                "Missing required fields: client, inv_date".to_string()
            ))
        );
        assert_eq!(orch.session(), EditSession::AddingNew);
    }

    #[test]
    fn test_unauthorized_list_navigates_without_notice() {
        let (mock, sink, orch) = setup(false);
        mock.respond(401, json!({"error": "Login required"}));
        assert_eq!(block_on(orch.reload()), None);
        assert_eq!(sink.navigations.borrow().clone(), vec!["/login".to_string()]);
        assert!(sink.notices.borrow().is_empty());
    }

    #[test]
    fn test_stale_list_response_is_ignored() {
        let (_mock, sink, orch) = setup(false);
        let older = orch.next_reload_token();
        let newer = orch.next_reload_token();
        let fresh: Vec<Invoice> = serde_json::from_value(json!([{"id": 2, "inv_id": "INV-0002"}])).unwrap();
        let stale: Vec<Invoice> = serde_json::from_value(json!([{"id": 1, "inv_id": "INV-0001"}])).unwrap();

        assert_eq!(orch.finish_reload(newer, Ok(fresh)), Some(1));
        assert_eq!(orch.finish_reload(older, Ok(stale)), None);
        assert!(orch.records().find_by_id(1).is_none());
        assert_eq!(sink.rendered.borrow().len(), 1);
    }

    #[test]
    fn test_confirm_is_issued_even_when_already_confirmed() {
        let (mock, _sink, orch) = setup(false);
        mock.respond(
            200,
            json!({"data": [{"id": 1, "inv_id": "INV-0001", "status": "confirmed", "is_confirmed": true}]}),
        );
        block_on(orch.reload());
        assert!(!orch.records().find_by_id(1).unwrap().can_confirm());
        mock.requests.borrow_mut().clear();

        block_on(orch.confirm(1)).unwrap();
        assert_eq!(
            mock.calls(),
            vec!["PUT /ajax/invoices/INV-0001/confirm", "GET /ajax/invoices"]
        );
    }

    #[test]
    fn test_failed_delete_reports_and_reloads() {
        let (mock, sink, orch) = setup(false);
        mock.respond(200, one_invoice());
        block_on(orch.reload());
        mock.requests.borrow_mut().clear();
        mock.respond(404, json!({"error": "Invoice not found"}))
            .respond(200, json!({"data": []}));

        let err = block_on(orch.delete(1)).unwrap_err();
        assert_eq!(err, SyncError::api(404, "Invoice not found"));
        assert_eq!(mock.calls().len(), 2);
        assert_eq!(
            last_notice(&sink),
            Some((
                NoticeLevel::Error,
                "Error deleting invoice: Invoice not found".to_string()
            ))
        );
        assert!(orch.records().is_empty());
    }

    #[test]
    fn test_network_failure_keeps_current_rows() {
        let (mock, sink, orch) = setup(false);
        mock.respond(200, one_invoice());
        block_on(orch.reload());
        mock.requests.borrow_mut().clear();
        mock.fail("connection refused");

        let err = block_on(orch.delete(1)).unwrap_err();
        assert!(matches!(err, SyncError::Network(_)));
        assert_eq!(mock.calls(), vec!["DELETE /ajax/invoices/INV-0001"]);
        assert_eq!(orch.records().len(), 1);
        assert!(matches!(last_notice(&sink), Some((NoticeLevel::Error, _))));
    }

    #[test]
    fn test_unknown_row_never_reaches_network() {
        let (mock, sink, orch) = setup(false);
        block_on(orch.delete(99)).unwrap();
        assert!(mock.calls().is_empty());
        assert_eq!(
            last_notice(&sink),
            Some((NoticeLevel::Error, "Invoice not found".to_string()))
        );
    }

    #[test]
    fn test_row_without_natural_key_never_reaches_network() {
        let (mock, sink, orch) = setup(false);
        mock.respond(200, json!({"data": [{"id": 1, "inv_id": null, "status": "draft"}]}));
        block_on(orch.reload());
        assert_eq!(orch.records().len(), 1);
        mock.requests.borrow_mut().clear();

        block_on(orch.delete(1)).unwrap();
        block_on(orch.confirm(1)).unwrap();
        block_on(orch.register(1)).unwrap();
        assert!(!orch.open_for_edit(1));

        assert!(mock.calls().is_empty());
        assert_eq!(orch.session(), EditSession::Closed);
        assert_eq!(
            sink.notices.borrow()[0],
            (NoticeLevel::Error, "Invoice 1 has no inv_id".to_string())
        );
    }

    #[test]
    fn test_apply_and_reset_filters() {
        let (mock, sink, orch) = setup(false);
        let resets = Rc::new(Cell::new(0));
        let counter = resets.clone();
        orch.on_filters_reset(Rc::new(move || counter.set(counter.get() + 1)));

        orch.set_filter("client", "Acme");
        assert_eq!(orch.active_filter_count(), 1);
        mock.respond(200, one_invoice());
        block_on(orch.apply_filters());
        assert_eq!(mock.calls(), vec!["GET /ajax/invoices?client=Acme"]);
        assert_eq!(
            last_notice(&sink),
            Some((NoticeLevel::Info, "Found 1 invoices with Client: Acme".to_string()))
        );

        orch.reset_filters();
        assert_eq!(resets.get(), 1);
        assert_eq!(orch.filter("client"), "");
        assert_eq!(orch.active_filter_count(), 0);
        assert_eq!(
            last_notice(&sink),
            Some((NoticeLevel::Info, "Filters reset".to_string()))
        );

        mock.respond(200, one_invoice());
        block_on(orch.apply_filters());
        assert_eq!(
            last_notice(&sink),
            Some((NoticeLevel::Info, "All invoices loaded (no filters active)".to_string()))
        );
    }

    #[test]
    fn test_autofill_applies_only_current_token() {
        let mut supplied = Map::new();
        supplied.insert("client".to_string(), json!("Acme"));
        let (mock, _sink, orch) = setup(false);
        let orch = orch.with_autofill(Rc::new(StaticAutoFill::new(supplied)));
        mock.respond(200, json!({"inv_id": "INV-0042"}));
        block_on(orch.open_for_add());
        orch.set_form_value("description", "kept");

        let stale = orch.begin_autofill();
        let current = orch.begin_autofill();
        block_on(orch.run_autofill(stale, "OP-0005"));
        assert_eq!(orch.form_value("client"), "");

        block_on(orch.run_autofill(current, "OP-0005"));
        assert_eq!(orch.form_value("client"), "Acme");
        assert_eq!(orch.form_value("description"), "kept");
    }

    #[test]
    fn test_debounced_autofill_keeps_only_last_keystroke() {
        let mut supplied = Map::new();
        supplied.insert("client".to_string(), json!("Acme"));
        let source = Rc::new(StaticAutoFill::new(supplied));
        let (mock, _sink, orch) = setup(false);
        let orch = Rc::new(orch.with_autofill(source.clone()));
        mock.respond(200, json!({"inv_id": "INV-0042"}));
        block_on(orch.open_for_add());

        let (first_tick, first_delay) = oneshot::channel::<()>();
        let (second_tick, second_delay) = oneshot::channel::<()>();
        let typed_o = orch.clone().debounced_autofill("OP".to_string(), async move {
            let _ = first_delay.await;
        });
        let typed_op5 = orch.clone().debounced_autofill("OP-0005".to_string(), async move {
            let _ = second_delay.await;
        });

        first_tick.send(()).unwrap();
        second_tick.send(()).unwrap();
        block_on(join(typed_o, typed_op5));

        assert_eq!(source.lookups.borrow().clone(), vec!["OP-0005".to_string()]);
        assert_eq!(orch.form_value("client"), "Acme");
    }
}
