use super::lenient;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fixed set of line-item field names.
///
/// Forms expose exactly these fields for the first line item; any other key
/// found on a stored line item is dropped when the record is re-collected.
pub const LINE_ITEM_FIELDS: &[&str] = &[
    "designation",
    "quantity",
    "packages",
    "weight",
    "volume",
    "unit_price",
];

/// One shipment/product detail embedded in a record's `products` field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub packages: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<String>,
}

impl LineItem {
    pub fn get(&self, field: &str) -> Option<&str> {
        match field {
            "designation" => self.designation.as_deref(),
            "quantity" => self.quantity.as_deref(),
            "packages" => self.packages.as_deref(),
            "weight" => self.weight.as_deref(),
            "volume" => self.volume.as_deref(),
            "unit_price" => self.unit_price.as_deref(),
            _ => None,
        }
    }

    pub fn is_line_item_field(field: &str) -> bool {
        LINE_ITEM_FIELDS.contains(&field)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid base64 in products: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("invalid line item JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unexpected products value: {0}")]
    Shape(String),
}

/// Decode the `products` wire value.
///
/// Accepts both representations: a base64-encoded JSON array (as stored by
/// the backend) or a live array (as built client-side before the first
/// save). `null` decodes to an empty sequence.
pub fn decode_products(value: &Value) -> Result<Vec<LineItem>, DecodeError> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::String(encoded) if encoded.trim().is_empty() => Ok(Vec::new()),
        Value::String(encoded) => {
            let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
            let bytes = STANDARD.decode(compact.as_bytes())?;
            Ok(serde_json::from_slice(&bytes)?)
        }
        Value::Array(_) => Ok(serde_json::from_value(value.clone())?),
        other => Err(DecodeError::Shape(other.to_string())),
    }
}

/// Encode line items into the stored wire form (base64 of the JSON array).
pub fn encode_products(items: &[LineItem]) -> Result<String, DecodeError> {
    let json = serde_json::to_vec(items)?;
    Ok(STANDARD.encode(json))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> LineItem {
        LineItem {
            designation: Some("Pallets".to_string()),
            quantity: Some("4".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_decode_encoded_string() {
        let encoded = encode_products(&[sample()]).unwrap();
        let items = decode_products(&Value::String(encoded)).unwrap();
        assert_eq!(items, vec![sample()]);
    }

    #[test]
    fn test_decode_live_array_with_numbers() {
        let items = decode_products(&json!([{"designation": "Boxes", "quantity": 3, "colour": "red"}]))
            .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity.as_deref(), Some("3"));
        assert_eq!(items[0].get("colour"), None);
    }

    #[test]
    fn test_decode_null_and_blank() {
        assert!(decode_products(&Value::Null).unwrap().is_empty());
        assert!(decode_products(&json!("  ")).unwrap().is_empty());
    }

    #[test]
    fn test_decode_invalid_base64() {
        let err = decode_products(&json!("not base64 !!")).unwrap_err();
        assert!(matches!(err, DecodeError::Base64(_)));
    }

    #[test]
    fn test_decode_base64_of_non_json() {
        let encoded = STANDARD.encode(b"hello");
        let err = decode_products(&Value::String(encoded)).unwrap_err();
        assert!(matches!(err, DecodeError::Json(_)));
    }

    #[test]
    fn test_decode_rejects_object() {
        assert!(matches!(
            decode_products(&json!({"designation": "x"})),
            Err(DecodeError::Shape(_))
        ));
    }
}
