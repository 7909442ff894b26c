use crate::domain::common::{lenient, ReferenceItem};
use serde::{Deserialize, Serialize};

/// Client as returned by `/ajax/clients/list`.
///
/// The backend names the display field either `client_name` or `name`;
/// both are accepted and folded into one by [`Client::display_name`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub client_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
}

impl Client {
    pub fn display_name(&self) -> String {
        self.client_name
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or_default()
            .to_string()
    }
}

impl From<Client> for ReferenceItem {
    fn from(c: Client) -> Self {
        Self {
            id: c.id,
            name: c.display_name(),
            detail: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_either_name_field() {
        let a: Client = serde_json::from_value(json!({"id": 1, "client_name": "Acme"})).unwrap();
        let b: Client = serde_json::from_value(json!({"id": "2", "name": "Globex"})).unwrap();
        assert_eq!(ReferenceItem::from(a).name, "Acme");
        let b: ReferenceItem = b.into();
        assert_eq!(b.name, "Globex");
        assert_eq!(b.id, Some(2));
    }

    #[test]
    fn test_client_name_wins_over_name() {
        let c: Client =
            serde_json::from_value(json!({"client_name": "Acme SA", "name": "acme"})).unwrap();
        assert_eq!(c.display_name(), "Acme SA");
    }
}
