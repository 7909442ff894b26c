use crate::domain::common::{lenient, ReferenceItem, ReferenceKind, ResourceRecord};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Logistics operation as exchanged with `/ajax/operations`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    #[serde(deserialize_with = "lenient::id")]
    pub id: i64,

    /// Display identifier, distinct from the natural key
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,

    /// Natural key (e.g. "OP-2025-0001")
    #[serde(deserialize_with = "lenient::string")]
    pub operation_num: String,

    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub operation_date: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    /// Import/export direction
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub flux: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub positioning_date: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub shipper_city: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub receiver_city: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub loading_date: Option<String>,

    /// Estimated arrival (date-time)
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub eta: Option<String>,

    /// Unloading (date-time)
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub unloading_date: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub vendor_name: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub sr: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub cmr: Option<String>,

    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_confirmed: bool,

    /// Line items: base64 JSON string as stored, or a live array
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<Value>,
}

impl Operation {
    pub fn status_label(&self) -> &'static str {
        if self.is_confirmed {
            "Confirmed"
        } else {
            "Not Confirmed"
        }
    }

    /// Invoice fields this operation can fill in.
    ///
    /// Only non-empty values are supplied; `products` is passed through in
    /// its wire form.
    pub fn autofill_values(&self) -> Map<String, Value> {
        let mut values = Map::new();
        let mut put = |key: &str, value: &Option<String>| {
            if let Some(v) = value.as_ref().filter(|v| !v.trim().is_empty()) {
                values.insert(key.to_string(), Value::String(v.clone()));
            }
        };
        put("client", &self.client_name);
        put("description", &self.description);
        if let Some(products) = self.products.as_ref().filter(|p| !p.is_null()) {
            values.insert("products".to_string(), products.clone());
        }
        values
    }
}

impl From<Operation> for ReferenceItem {
    fn from(op: Operation) -> Self {
        let detail = match (&op.client_name, &op.description) {
            (Some(c), Some(d)) if !d.is_empty() => Some(format!("{} | {}", c, d)),
            (Some(c), _) => Some(c.clone()),
            (None, d) => d.clone(),
        };
        Self {
            id: Some(op.id),
            name: op.operation_num,
            detail,
        }
    }
}

impl ResourceRecord for Operation {
    fn id(&self) -> i64 {
        self.id
    }

    fn natural_key(&self) -> &str {
        &self.operation_num
    }

    fn is_confirmed(&self) -> bool {
        self.is_confirmed
    }

    fn base_path() -> &'static str {
        "/ajax/operations"
    }

    fn natural_key_field() -> &'static str {
        "operation_num"
    }

    fn element_name() -> &'static str {
        "Operation"
    }

    fn list_name() -> &'static str {
        "operations"
    }

    fn reference_kinds() -> &'static [ReferenceKind] {
        &[ReferenceKind::Clients, ReferenceKind::Vendors]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn operation() -> Operation {
        serde_json::from_value(json!({
            "id": 5,
            "operation_num": "OP-0005",
            "client_name": "Acme",
            "description": "",
            "is_confirmed": false,
            "products": [{"designation": "Pallets"}]
        }))
        .unwrap()
    }

    #[test]
    fn test_autofill_skips_empty_values() {
        let values = operation().autofill_values();
        assert_eq!(values.get("client"), Some(&json!("Acme")));
        assert!(!values.contains_key("description"));
        assert!(values.contains_key("products"));
    }

    #[test]
    fn test_reference_item() {
        let item: ReferenceItem = operation().into();
        assert_eq!(item.name, "OP-0005");
        assert_eq!(item.detail.as_deref(), Some("Acme"));
        assert_eq!(item.id, Some(5));
    }

    #[test]
    fn test_confirmed_gating() {
        let mut op = operation();
        assert!(op.can_confirm());
        op.is_confirmed = true;
        assert!(!op.can_confirm());
        assert_eq!(op.status_label(), "Confirmed");
    }
}
