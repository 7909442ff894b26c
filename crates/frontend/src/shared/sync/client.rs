//! Typed HTTP client for one CRUD resource.

use super::error::SyncError;
use super::transport::{json_request, HttpMethod, HttpTransport};
use contracts::domain::a002_operation::Operation;
use contracts::domain::a003_client::Client;
use contracts::domain::a004_vendor::Vendor;
use contracts::domain::common::reference::sorted_by_name;
use contracts::domain::common::{ApiEnvelope, ReferenceItem, ReferenceKind, ResourceRecord};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::rc::Rc;

/// Error text of a non-2xx response.
///
/// JSON `error` wins over `message`; an unparsable or empty body yields a
/// synthetic text carrying the status.
pub fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<ApiEnvelope<Value>>(body)
        .ok()
        .and_then(|env| env.error_text().map(String::from))
        .unwrap_or_else(|| format!("HTTP error! status: {}", status))
}

fn envelope(body: Value) -> Result<ApiEnvelope<Value>, SyncError> {
    Ok(serde_json::from_value(body)?)
}

/// Items of a list response: a bare array, or `{ data: [...] }`.
///
/// A missing `data` member means an empty list; `success: false` is an error
/// even with a 2xx status.
pub fn list_items(status: u16, body: Value) -> Result<Vec<Value>, SyncError> {
    match body {
        Value::Array(items) => Ok(items),
        Value::Null => Ok(Vec::new()),
        body @ Value::Object(_) => {
            let env = envelope(body)?;
            if env.is_failure() {
                return Err(failure(status, &env));
            }
            match env.data {
                Some(Value::Array(items)) => Ok(items),
                None => Ok(Vec::new()),
                Some(other) => Err(SyncError::Decode(format!(
                    "expected a list in data, got {}",
                    other
                ))),
            }
        }
        other => Err(SyncError::Decode(format!(
            "unexpected list response: {}",
            other
        ))),
    }
}

fn failure<T>(status: u16, env: &ApiEnvelope<T>) -> SyncError {
    SyncError::api(status, env.error_text().unwrap_or("Request failed"))
}

/// Deserialize list items one by one; malformed entries are skipped.
fn parse_items<T: DeserializeOwned>(items: Vec<Value>, what: &str) -> Vec<T> {
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<T>(item) {
            Ok(v) => Some(v),
            Err(e) => {
                log::warn!("Skipping malformed {} entry: {}", what, e);
                None
            }
        })
        .collect()
}

/// Result of a mutating call
#[derive(Debug, Clone, PartialEq)]
pub struct MutationOutcome<R> {
    /// Backend-provided `message`, if any
    pub message: Option<String>,
    /// Record echoed back in `data`, if it parses
    pub record: Option<R>,
}

/// Connection shared by every resource: transport, origin and default headers
#[derive(Clone)]
pub struct ApiClient {
    transport: Rc<dyn HttpTransport>,
    origin: String,
    default_headers: Vec<(String, String)>,
}

impl ApiClient {
    pub fn new(transport: Rc<dyn HttpTransport>, origin: impl Into<String>) -> Self {
        Self {
            transport,
            origin: origin.into().trim_end_matches('/').to_string(),
            default_headers: Vec::new(),
        }
    }

    /// Header sent with every request (e.g. the CSRF token)
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.origin, path)
    }

    /// Issue one JSON request and classify the response.
    ///
    /// Returns the parsed body together with the status, `Value::Null` for
    /// an empty body.
    pub async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&Value>,
    ) -> Result<(u16, Value), SyncError> {
        let request = json_request(method, self.url(path), body, &self.default_headers, &[])?;
        let response = self.transport.send(request).await?;
        let status = response.status;

        if status == 401 {
            return Err(SyncError::Auth);
        }
        if !response.is_success() {
            return Err(SyncError::api(status, error_message(status, &response.body)));
        }
        if response.body.trim().is_empty() {
            return Ok((status, Value::Null));
        }
        let value: Value = serde_json::from_str(&response.body)?;
        Ok((status, value))
    }

    /// Load one reference collection, normalized and sorted by name
    pub async fn load_reference(&self, kind: ReferenceKind) -> Result<Vec<ReferenceItem>, SyncError> {
        let (status, body) = self.request(HttpMethod::Get, kind.path(), None).await?;
        let items = list_items(status, body)?;
        let normalized: Vec<ReferenceItem> = match kind {
            ReferenceKind::Clients => parse_items::<Client>(items, "client")
                .into_iter()
                .map(ReferenceItem::from)
                .collect(),
            ReferenceKind::Vendors => parse_items::<Vendor>(items, "vendor")
                .into_iter()
                .map(ReferenceItem::from)
                .collect(),
            ReferenceKind::Operations => parse_items::<Operation>(items, "operation")
                .into_iter()
                .map(ReferenceItem::from)
                .collect(),
        };
        Ok(sorted_by_name(normalized))
    }
}

/// Client for the resource served under `R::base_path()`.
///
/// Every write goes to `{base}/{natural_key}`; the numeric `id` never
/// appears in a URL.
pub struct ResourceClient<R: ResourceRecord> {
    api: ApiClient,
    _record: PhantomData<fn() -> R>,
}

impl<R: ResourceRecord> Clone for ResourceClient<R> {
    fn clone(&self) -> Self {
        Self::new(self.api.clone())
    }
}

impl<R: ResourceRecord> ResourceClient<R> {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            _record: PhantomData,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// `{base}/{natural_key}[/{action}]`; a blank key never becomes a URL
    fn record_path(natural_key: &str, action: Option<&str>) -> Result<String, SyncError> {
        if natural_key.trim().is_empty() {
            return Err(SyncError::Validation {
                missing: vec![R::natural_key_field().to_string()],
            });
        }
        let mut path = format!("{}/{}", R::base_path(), urlencoding::encode(natural_key));
        if let Some(action) = action {
            path.push('/');
            path.push_str(action);
        }
        Ok(path)
    }

    /// Fetch the list filtered by `criteria`.
    ///
    /// Entries are serialized as given; callers pass `FilterState::to_query`.
    pub async fn list(&self, criteria: &BTreeMap<String, String>) -> Result<Vec<R>, SyncError> {
        let mut path = R::base_path().to_string();
        if !criteria.is_empty() {
            let query = serde_qs::to_string(criteria)
                .map_err(|e| SyncError::Decode(format!("Failed to encode filters: {}", e)))?;
            path.push('?');
            path.push_str(&query);
        }
        let (status, body) = self.api.request(HttpMethod::Get, &path, None).await?;
        let items = list_items(status, body)?;
        Ok(parse_items(items, R::element_name()))
    }

    pub async fn create(&self, record: &Map<String, Value>) -> Result<MutationOutcome<R>, SyncError> {
        let body = Value::Object(record.clone());
        self.mutate(HttpMethod::Post, R::base_path().to_string(), Some(&body))
            .await
    }

    pub async fn update(
        &self,
        natural_key: &str,
        record: &Map<String, Value>,
    ) -> Result<MutationOutcome<R>, SyncError> {
        let body = Value::Object(record.clone());
        self.mutate(HttpMethod::Put, Self::record_path(natural_key, None)?, Some(&body))
            .await
    }

    pub async fn remove(&self, natural_key: &str) -> Result<MutationOutcome<R>, SyncError> {
        self.mutate(HttpMethod::Delete, Self::record_path(natural_key, None)?, None)
            .await
    }

    /// One-way transition to confirmed; repeat calls are left to the backend
    pub async fn confirm(&self, natural_key: &str) -> Result<MutationOutcome<R>, SyncError> {
        self.mutate(
            HttpMethod::Put,
            Self::record_path(natural_key, Some("confirm"))?,
            None,
        )
        .await
    }

    pub async fn register(&self, natural_key: &str) -> Result<MutationOutcome<R>, SyncError> {
        self.mutate(
            HttpMethod::Put,
            Self::record_path(natural_key, Some("register"))?,
            None,
        )
        .await
    }

    async fn mutate(
        &self,
        method: HttpMethod,
        path: String,
        body: Option<&Value>,
    ) -> Result<MutationOutcome<R>, SyncError> {
        let (status, value) = self.api.request(method, &path, body).await?;
        if !value.is_object() {
            return Ok(MutationOutcome {
                message: None,
                record: None,
            });
        }
        let env = envelope(value)?;
        if env.is_failure() {
            return Err(failure(status, &env));
        }
        let message = env.message.filter(|s| !s.trim().is_empty());
        let record = env
            .data
            .filter(Value::is_object)
            .and_then(|d| serde_json::from_value::<R>(d).ok());
        Ok(MutationOutcome { message, record })
    }

    /// Ask the backend for a fresh natural key.
    ///
    /// The answer is `{ <natural-key-field>: "..." }`, possibly wrapped in
    /// `data`. No uniqueness check happens client-side.
    pub async fn generate_identifier(&self, kind: Option<&str>) -> Result<String, SyncError> {
        let mut path = format!("{}/generate-id", R::base_path());
        if let Some(kind) = kind.filter(|k| !k.is_empty()) {
            path.push_str("?type=");
            path.push_str(&urlencoding::encode(kind));
        }
        let (status, value) = self.api.request(HttpMethod::Get, &path, None).await?;
        let field = R::natural_key_field();
        let top_level = value.get(field).cloned();
        let env = envelope(value)?;
        if env.is_failure() {
            return Err(failure(status, &env));
        }
        top_level
            .or_else(|| env.data.and_then(|d| d.get(field).cloned()))
            .as_ref()
            .and_then(Value::as_str)
            .map(String::from)
            .ok_or_else(|| SyncError::Decode(format!("generate-id response has no {}", field)))
    }

    /// Read one record by natural key.
    ///
    /// A 404 or a `success: false` answer is a well-formed "not found" and
    /// yields `None`.
    pub async fn lookup_by_natural_key(&self, natural_key: &str) -> Result<Option<R>, SyncError> {
        if natural_key.trim().is_empty() {
            return Ok(None);
        }
        let path = Self::record_path(natural_key, None)?;
        let value = match self.api.request(HttpMethod::Get, &path, None).await {
            Ok((_, value)) => value,
            Err(SyncError::Api { status: 404, .. }) => return Ok(None),
            Err(e) => return Err(e),
        };
        if !value.is_object() {
            return Ok(None);
        }
        // a bare record or one wrapped in `data`
        let payload = if value.get("data").is_some() || value.get("success").is_some() {
            let env = envelope(value)?;
            if env.is_failure() {
                return Ok(None);
            }
            match env.data {
                Some(data) => data,
                None => return Ok(None),
            }
        } else {
            value
        };
        Ok(Some(serde_json::from_value(payload)?))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::shared::sync::transport::{HttpRequest, HttpResponse};
    use contracts::domain::a001_invoice::Invoice;
    use futures::executor::block_on;
    use serde_json::json;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Records requests and answers with scripted responses in order
    #[derive(Default)]
    pub struct MockTransport {
        pub requests: RefCell<Vec<HttpRequest>>,
        responses: RefCell<VecDeque<Result<HttpResponse, SyncError>>>,
    }

    impl MockTransport {
        pub fn respond(&self, status: u16, body: Value) -> &Self {
            self.responses.borrow_mut().push_back(Ok(HttpResponse {
                status,
                body: body.to_string(),
            }));
            self
        }

        pub fn respond_raw(&self, status: u16, body: &str) -> &Self {
            self.responses.borrow_mut().push_back(Ok(HttpResponse {
                status,
                body: body.to_string(),
            }));
            self
        }

        pub fn fail(&self, message: &str) -> &Self {
            self.responses
                .borrow_mut()
                .push_back(Err(SyncError::Network(message.to_string())));
            self
        }

        pub fn calls(&self) -> Vec<String> {
            self.requests
                .borrow()
                .iter()
                .map(|r| format!("{} {}", r.method.as_str(), r.url))
                .collect()
        }
    }

    #[async_trait::async_trait(?Send)]
    impl HttpTransport for MockTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, SyncError> {
            self.requests.borrow_mut().push(request);
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Ok(HttpResponse { status: 200, body: "{}".to_string() }))
        }
    }

    fn invoices(mock: &Rc<MockTransport>) -> ResourceClient<Invoice> {
        let transport: Rc<dyn HttpTransport> = mock.clone();
        ResourceClient::new(ApiClient::new(transport, "").with_header("X-CSRFToken", "tok"))
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(error_message(400, r#"{"error": "Bad client"}"#), "Bad client");
        assert_eq!(error_message(409, r#"{"message": "Conflict"}"#), "Conflict");
        assert_eq!(error_message(500, "<html>"), "HTTP error! status: 500");
        assert_eq!(error_message(502, ""), "HTTP error! status: 502");
    }

    #[test]
    fn test_list_items_shapes() {
        assert_eq!(list_items(200, json!([1])).unwrap().len(), 1);
        assert_eq!(list_items(200, json!({"data": [1, 2]})).unwrap().len(), 2);
        assert!(list_items(200, json!({"success": true})).unwrap().is_empty());
        let err = list_items(200, json!({"success": false, "error": "Denied"})).unwrap_err();
        assert_eq!(err, SyncError::api(200, "Denied"));
    }

    #[test]
    fn test_list_sends_query_and_parses_records() {
        let mock = Rc::new(MockTransport::default());
        mock.respond(
            200,
            json!({"data": [
                {"id": 1, "inv_id": "INV-0001", "client": "Acme", "status": "draft", "total": 100},
                {"broken": true}
            ]}),
        );
        let mut criteria = BTreeMap::new();
        criteria.insert("client".to_string(), "Acme Corp".to_string());
        criteria.insert("status".to_string(), "draft".to_string());

        let records = block_on(invoices(&mock).list(&criteria)).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].inv_id, "INV-0001");
        assert_eq!(
            mock.calls(),
            vec!["GET /ajax/invoices?client=Acme+Corp&status=draft"]
        );
        assert_eq!(mock.requests.borrow()[0].header("X-CSRFToken"), Some("tok"));
    }

    #[test]
    fn test_list_without_criteria_has_no_query() {
        let mock = Rc::new(MockTransport::default());
        mock.respond(200, json!([]));
        let records = block_on(invoices(&mock).list(&BTreeMap::new())).unwrap();
        assert!(records.is_empty());
        assert_eq!(mock.calls(), vec!["GET /ajax/invoices"]);
    }

    #[test]
    fn test_status_classification() {
        let mock = Rc::new(MockTransport::default());
        mock.respond(401, json!({"error": "Login required"}))
            .respond(500, json!({"error": "Database down"}))
            .fail("connection refused");
        let client = invoices(&mock);
        let empty = BTreeMap::new();

        assert_eq!(block_on(client.list(&empty)).unwrap_err(), SyncError::Auth);
        assert_eq!(
            block_on(client.list(&empty)).unwrap_err(),
            SyncError::api(500, "Database down")
        );
        assert!(matches!(
            block_on(client.list(&empty)).unwrap_err(),
            SyncError::Network(_)
        ));
    }

    #[test]
    fn test_writes_use_natural_key() {
        let mock = Rc::new(MockTransport::default());
        let client = invoices(&mock);
        let mut body = Map::new();
        body.insert("description".to_string(), json!("updated"));

        block_on(client.update("INV-0001", &body)).unwrap();
        block_on(client.remove("INV-0001")).unwrap();
        block_on(client.confirm("INV-0001")).unwrap();
        block_on(client.register("INV 7")).unwrap();
        block_on(client.create(&body)).unwrap();

        assert_eq!(
            mock.calls(),
            vec![
                "PUT /ajax/invoices/INV-0001",
                "DELETE /ajax/invoices/INV-0001",
                "PUT /ajax/invoices/INV-0001/confirm",
                "PUT /ajax/invoices/INV%207/register",
                "POST /ajax/invoices",
            ]
        );
        assert_eq!(
            mock.requests.borrow()[0].body.as_deref(),
            Some(r#"{"description":"updated"}"#)
        );
    }

    #[test]
    fn test_blank_natural_key_never_becomes_a_url() {
        let mock = Rc::new(MockTransport::default());
        let client = invoices(&mock);

        assert_eq!(
            block_on(client.remove("")).unwrap_err(),
            SyncError::Validation {
                missing: vec!["inv_id".to_string()]
            }
        );
        assert!(block_on(client.confirm("  ")).is_err());
        assert!(block_on(client.update("", &Map::new())).is_err());
        assert!(block_on(client.lookup_by_natural_key("")).unwrap().is_none());
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn test_remove_missing_record_surfaces_status() {
        let mock = Rc::new(MockTransport::default());
        mock.respond(404, json!({"error": "Invoice not found"}));
        let err = block_on(invoices(&mock).remove("INV-9999")).unwrap_err();
        assert_eq!(err, SyncError::api(404, "Invoice not found"));
    }

    #[test]
    fn test_mutation_success_false_is_api_error() {
        let mock = Rc::new(MockTransport::default());
        mock.respond(200, json!({"success": false, "error": "Already confirmed"}));
        let err = block_on(invoices(&mock).confirm("INV-0001")).unwrap_err();
        assert_eq!(err, SyncError::api(200, "Already confirmed"));
    }

    #[test]
    fn test_mutation_outcome_message() {
        let mock = Rc::new(MockTransport::default());
        mock.respond(
            201,
            json!({"success": true, "message": "Created", "data": {"id": 3, "inv_id": "INV-0003"}}),
        );
        let outcome = block_on(invoices(&mock).create(&Map::new())).unwrap();
        assert_eq!(outcome.message.as_deref(), Some("Created"));
        assert_eq!(outcome.record.map(|r| r.id), Some(3));
    }

    #[test]
    fn test_generate_identifier() {
        let mock = Rc::new(MockTransport::default());
        mock.respond(200, json!({"inv_id": "INV-0042"}));
        let id = block_on(invoices(&mock).generate_identifier(Some("INV"))).unwrap();
        assert_eq!(id, "INV-0042");
        assert_eq!(mock.calls(), vec!["GET /ajax/invoices/generate-id?type=INV"]);
    }

    #[test]
    fn test_generate_identifier_without_kind() {
        let mock = Rc::new(MockTransport::default());
        mock.respond(200, json!({"success": true, "operation_num": "OP-0007"}));
        let transport: Rc<dyn HttpTransport> = mock.clone();
        let ops: ResourceClient<Operation> = ResourceClient::new(ApiClient::new(transport, ""));
        assert_eq!(block_on(ops.generate_identifier(None)).unwrap(), "OP-0007");
        assert_eq!(mock.calls(), vec!["GET /ajax/operations/generate-id"]);
    }

    #[test]
    fn test_lookup_not_found_is_none() {
        let mock = Rc::new(MockTransport::default());
        mock.respond(404, json!({"error": "Operation not found"}))
            .respond(200, json!({"success": false, "error": "Operation not found"}))
            .respond(200, json!({"success": true, "data": {"id": 5, "operation_num": "OP-0005"}}));
        let transport: Rc<dyn HttpTransport> = mock.clone();
        let ops: ResourceClient<Operation> = ResourceClient::new(ApiClient::new(transport, ""));

        assert!(block_on(ops.lookup_by_natural_key("OP-0005")).unwrap().is_none());
        assert!(block_on(ops.lookup_by_natural_key("OP-0005")).unwrap().is_none());
        let found = block_on(ops.lookup_by_natural_key("OP-0005")).unwrap();
        assert_eq!(found.map(|o| o.id), Some(5));
    }

    #[test]
    fn test_load_reference_normalizes_and_sorts() {
        let mock = Rc::new(MockTransport::default());
        mock.respond(
            200,
            json!({"success": true, "data": [
                {"id": 2, "name": "globex"},
                {"id": 1, "client_name": "Acme"},
                {"id": 3}
            ]}),
        );
        let transport: Rc<dyn HttpTransport> = mock.clone();
        let api = ApiClient::new(transport, "https://erp.example.com/");
        let items = block_on(api.load_reference(ReferenceKind::Clients)).unwrap();
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Acme", "globex"]);
        assert_eq!(mock.calls(), vec!["GET https://erp.example.com/ajax/clients/list"]);
    }
}
