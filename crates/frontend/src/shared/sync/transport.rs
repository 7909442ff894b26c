//! HTTP seam of the sync layer.
//!
//! Every backend call goes through [`HttpTransport`]. The browser build uses
//! [`GlooTransport`]; tests plug in an in-memory transport.

use super::error::SyncError;
use async_trait::async_trait;
use gloo_net::http::{Method, RequestBuilder};
use serde_json::Value;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const APPLICATION_JSON: &str = "application/json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait(?Send)]
pub trait HttpTransport {
    /// Resolves with any HTTP status; only transport failures are errors.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, SyncError>;
}

/// Merge header lists by case-insensitive name.
///
/// Entries from `extra` replace a default of the same name; every other
/// default is kept in its original position.
pub fn merge_headers(
    defaults: &[(String, String)],
    extra: &[(String, String)],
) -> Vec<(String, String)> {
    let mut merged: Vec<(String, String)> = defaults
        .iter()
        .filter(|(k, _)| !extra.iter().any(|(e, _)| e.eq_ignore_ascii_case(k)))
        .cloned()
        .collect();
    merged.extend(extra.iter().cloned());
    merged
}

/// Build a JSON request.
///
/// `Content-Type: application/json` is always present unless the caller
/// passes its own value in `extra`.
pub fn json_request(
    method: HttpMethod,
    url: String,
    body: Option<&Value>,
    defaults: &[(String, String)],
    extra: &[(String, String)],
) -> Result<HttpRequest, SyncError> {
    let mut base = vec![(CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string())];
    base.extend(
        defaults
            .iter()
            .filter(|(k, _)| !k.eq_ignore_ascii_case(CONTENT_TYPE))
            .cloned(),
    );
    let body = body.map(serde_json::to_string).transpose()?;
    Ok(HttpRequest {
        method,
        url,
        headers: merge_headers(&base, extra),
        body,
    })
}

/// Browser transport backed by `fetch`
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTransport;

#[async_trait(?Send)]
impl HttpTransport for GlooTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, SyncError> {
        let method = match request.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        };

        let mut builder = RequestBuilder::new(&request.url).method(method);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        let built = match request.body {
            Some(body) => builder.body(body),
            None => builder.build(),
        }
        .map_err(|e| SyncError::Network(format!("Failed to build request: {}", e)))?;

        let response = built
            .send()
            .await
            .map_err(|e| SyncError::Network(format!("Failed to fetch: {}", e)))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        log::debug!("{} {} -> {}", request.method.as_str(), request.url, status);
        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pair(k: &str, v: &str) -> (String, String) {
        (k.to_string(), v.to_string())
    }

    #[test]
    fn test_json_request_always_sets_content_type() {
        let req = json_request(
            HttpMethod::Post,
            "/ajax/invoices".to_string(),
            Some(&json!({"client": "Acme"})),
            &[pair("X-CSRFToken", "abc")],
            &[],
        )
        .unwrap();
        assert_eq!(req.header("content-type"), Some(APPLICATION_JSON));
        assert_eq!(req.header("X-CSRFToken"), Some("abc"));
        assert_eq!(req.body.as_deref(), Some(r#"{"client":"Acme"}"#));
    }

    #[test]
    fn test_explicit_header_overrides_default() {
        let req = json_request(
            HttpMethod::Get,
            "/x".to_string(),
            None,
            &[pair("X-CSRFToken", "abc")],
            &[pair("x-csrftoken", "override"), pair("Accept", "text/plain")],
        )
        .unwrap();
        assert_eq!(req.header("X-CSRFToken"), Some("override"));
        assert_eq!(req.header("Accept"), Some("text/plain"));
        assert_eq!(req.headers.len(), 3);
        assert!(req.body.is_none());
    }

    #[test]
    fn test_default_content_type_cannot_be_replaced_by_defaults() {
        let req = json_request(
            HttpMethod::Get,
            "/x".to_string(),
            None,
            &[pair("content-type", "text/html")],
            &[],
        )
        .unwrap();
        assert_eq!(req.header("Content-Type"), Some(APPLICATION_JSON));
        assert_eq!(req.headers.len(), 1);
    }

    #[test]
    fn test_success_is_any_2xx() {
        let response = |status| HttpResponse { status, body: String::new() };
        assert!(response(200).is_success());
        assert!(response(204).is_success());
        assert!(!response(199).is_success());
        assert!(!response(304).is_success());
        assert!(!response(404).is_success());
    }
}
