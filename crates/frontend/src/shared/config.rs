use serde::Deserialize;

/// Runtime settings of the dashboard client.
///
/// Read once at start from `window.__APP_CONFIG__`; every member is
/// optional and falls back to its default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Prefix of every endpoint path; empty means same origin
    pub api_origin: String,
    /// Where an unauthenticated response sends the user
    pub login_url: String,
    /// Delay between the last keystroke and the auto-fill lookup
    pub autofill_debounce_ms: u32,
    pub toast_duration_ms: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_origin: String::new(),
            login_url: "/login".to_string(),
            autofill_debounce_ms: 500,
            toast_duration_ms: 5000,
        }
    }
}

impl AppConfig {
    pub fn load() -> Self {
        let Some(window) = web_sys::window() else {
            return Self::default();
        };
        let raw = match js_sys::Reflect::get(&window, &"__APP_CONFIG__".into()) {
            Ok(v) if !v.is_undefined() && !v.is_null() => v,
            _ => return Self::default(),
        };
        match serde_wasm_bindgen::from_value::<AppConfig>(raw) {
            Ok(config) => {
                log::info!("Loaded app config: {:?}", config);
                config
            }
            Err(e) => {
                log::warn!("Ignoring malformed __APP_CONFIG__: {}", e);
                Self::default()
            }
        }
    }
}
