use serde::{Deserialize, Serialize};

/// Response envelope used by most backend endpoints:
/// `{ success: bool, data: ..., error: string, message: string }`.
///
/// Every member is optional; list endpoints answer with `{ data: [...] }`
/// and no `success` at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Explicit `success: false`; a missing flag counts as success.
    pub fn is_failure(&self) -> bool {
        self.success == Some(false)
    }

    /// First non-blank of `error` and `message`
    pub fn error_text(&self) -> Option<&str> {
        [self.error.as_deref(), self.message.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_without_success_flag() {
        let env: ApiEnvelope<Vec<i32>> = serde_json::from_value(json!({"data": [1, 2]})).unwrap();
        assert!(!env.is_failure());
        assert_eq!(env.data, Some(vec![1, 2]));
    }

    #[test]
    fn test_failure_text() {
        let env: ApiEnvelope<()> =
            serde_json::from_value(json!({"success": false, "error": "Not found"})).unwrap();
        assert!(env.is_failure());
        assert_eq!(env.error_text(), Some("Not found"));
    }

    #[test]
    fn test_error_text_falls_back_to_message() {
        let env: ApiEnvelope<()> =
            serde_json::from_value(json!({"message": "Operation deleted"})).unwrap();
        assert_eq!(env.error_text(), Some("Operation deleted"));

        let blank_error: ApiEnvelope<()> =
            serde_json::from_value(json!({"error": " ", "message": "Conflict"})).unwrap();
        assert_eq!(blank_error.error_text(), Some("Conflict"));
    }
}
