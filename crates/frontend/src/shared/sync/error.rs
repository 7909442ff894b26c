use contracts::domain::common::DecodeError;

/// Failure taxonomy of the sync layer.
///
/// `Network` and `Api` end up as a single transient notice, `Auth` as a
/// navigation to the login page. `Decode` is recovered locally and only
/// logged. `Validation` never reaches the network.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyncError {
    #[error("{0}")]
    Network(String),

    #[error("Authentication required")]
    Auth,

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("{0}")]
    Decode(String),

    #[error("Missing required fields: {}", .missing.join(", "))]
    Validation { missing: Vec<String> },
}

impl SyncError {
    pub fn is_auth(&self) -> bool {
        matches!(self, SyncError::Auth)
    }

    pub fn api(status: u16, message: impl Into<String>) -> Self {
        SyncError::Api {
            status,
            message: message.into(),
        }
    }
}

impl From<DecodeError> for SyncError {
    fn from(e: DecodeError) -> Self {
        SyncError::Decode(e.to_string())
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(e: serde_json::Error) -> Self {
        SyncError::Decode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_lists_fields() {
        let err = SyncError::Validation {
            missing: vec!["client_name".to_string(), "operation_date".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Missing required fields: client_name, operation_date"
        );
    }

    #[test]
    fn test_api_message_is_displayed_verbatim() {
        assert_eq!(SyncError::api(404, "Invoice not found").to_string(), "Invoice not found");
        assert!(SyncError::Auth.is_auth());
    }
}
