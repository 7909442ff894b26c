use super::status::InvoiceStatus;
use crate::domain::common::{lenient, ReferenceKind, ResourceRecord};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Invoice as exchanged with `/ajax/invoices`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    /// Durable backend id, used only for local lookup
    #[serde(deserialize_with = "lenient::id")]
    pub id: i64,

    /// Natural key (e.g. "INV-0001"), used in every write URL
    #[serde(deserialize_with = "lenient::string")]
    pub inv_id: String,

    /// Client name
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    /// Operation this invoice bills (natural key of a002)
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub operation_num: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub inv_date: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Raw lifecycle status, see [`InvoiceStatus`]
    #[serde(default, deserialize_with = "lenient::string")]
    pub status: String,

    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_number", skip_serializing_if = "Option::is_none")]
    pub total: Option<Number>,

    #[serde(default, deserialize_with = "lenient::opt_number", skip_serializing_if = "Option::is_none")]
    pub tax_percentage: Option<Number>,

    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_confirmed: bool,

    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub lastmodifiedby: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub lastmodifieddate: Option<String>,

    /// Line items: base64 JSON string as stored, or a live array
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<Value>,
}

impl Invoice {
    pub fn parsed_status(&self) -> Option<InvoiceStatus> {
        InvoiceStatus::from_code(&self.status)
    }
}

impl ResourceRecord for Invoice {
    fn id(&self) -> i64 {
        self.id
    }

    fn natural_key(&self) -> &str {
        &self.inv_id
    }

    fn is_confirmed(&self) -> bool {
        self.is_confirmed
            || self
                .parsed_status()
                .map(|s| s.is_past_draft())
                .unwrap_or(false)
    }

    fn can_confirm(&self) -> bool {
        !self.is_confirmed() && self.parsed_status() != Some(InvoiceStatus::Cancelled)
    }

    fn can_register(&self) -> bool {
        self.parsed_status() == Some(InvoiceStatus::Confirmed)
    }

    fn base_path() -> &'static str {
        "/ajax/invoices"
    }

    fn natural_key_field() -> &'static str {
        "inv_id"
    }

    fn element_name() -> &'static str {
        "Invoice"
    }

    fn list_name() -> &'static str {
        "invoices"
    }

    fn reference_kinds() -> &'static [ReferenceKind] {
        &[ReferenceKind::Clients, ReferenceKind::Operations]
    }

    fn identifier_kinds() -> &'static [&'static str] {
        &["INV", "INVC"]
    }
}
