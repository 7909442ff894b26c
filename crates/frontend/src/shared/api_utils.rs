//! Browser glue for backend communication
//!
//! Builds the shared [`ApiClient`] (origin from [`AppConfig`], CSRF header
//! from the page) and wraps the few window calls the screens need.

use crate::shared::config::AppConfig;
use crate::shared::sync::transport::GlooTransport;
use crate::shared::sync::ApiClient;
use std::rc::Rc;

pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Value of `<meta name="csrf-token" content="...">`, if the page has one
pub fn csrf_token() -> Option<String> {
    let document = web_sys::window()?.document()?;
    let meta = document
        .query_selector("meta[name='csrf-token']")
        .ok()
        .flatten()?;
    meta.get_attribute("content").filter(|t| !t.is_empty())
}

/// API client used by every screen
pub fn api_client(config: &AppConfig) -> ApiClient {
    let client = ApiClient::new(Rc::new(GlooTransport), config.api_origin.clone());
    match csrf_token() {
        Some(token) => client.with_header(CSRF_HEADER, token),
        None => client,
    }
}

/// Full page navigation (used for the login redirect)
pub fn navigate(url: &str) {
    if let Some(window) = web_sys::window() {
        if let Err(e) = window.location().set_href(url) {
            log::error!("Navigation to {} failed: {:?}", url, e);
        }
    }
}

/// Browser `confirm()` dialog; false when no window is available
pub fn confirm_dialog(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}
