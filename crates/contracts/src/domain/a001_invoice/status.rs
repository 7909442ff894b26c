use serde::{Deserialize, Serialize};

/// Invoice lifecycle status.
///
/// Forward sequence `draft -> confirmed -> registered -> paid -> consolidated`,
/// with `cancelled` reachable from any non-terminal state. Transitions are
/// decided by the backend; the client only presents the value it is given.
/// `pending` and `overdue` are display states the backend may also emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Draft,
    Confirmed,
    Registered,
    Paid,
    Consolidated,
    Cancelled,
    Pending,
    Overdue,
}

impl InvoiceStatus {
    pub fn code(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Confirmed => "confirmed",
            InvoiceStatus::Registered => "registered",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Consolidated => "consolidated",
            InvoiceStatus::Cancelled => "cancelled",
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Overdue => "overdue",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "Draft",
            InvoiceStatus::Confirmed => "Confirmed",
            InvoiceStatus::Registered => "Registered",
            InvoiceStatus::Paid => "Paid",
            InvoiceStatus::Consolidated => "Consolidated",
            InvoiceStatus::Cancelled => "Cancelled",
            InvoiceStatus::Pending => "Pending",
            InvoiceStatus::Overdue => "Overdue",
        }
    }

    /// Statuses offered in the filter dropdown, in lifecycle order
    pub fn all() -> Vec<InvoiceStatus> {
        vec![
            InvoiceStatus::Draft,
            InvoiceStatus::Confirmed,
            InvoiceStatus::Registered,
            InvoiceStatus::Paid,
            InvoiceStatus::Consolidated,
            InvoiceStatus::Cancelled,
        ]
    }

    /// Case-insensitive parse
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "draft" => Some(InvoiceStatus::Draft),
            "confirmed" => Some(InvoiceStatus::Confirmed),
            "registered" => Some(InvoiceStatus::Registered),
            "paid" => Some(InvoiceStatus::Paid),
            "consolidated" => Some(InvoiceStatus::Consolidated),
            "cancelled" | "canceled" => Some(InvoiceStatus::Cancelled),
            "pending" => Some(InvoiceStatus::Pending),
            "overdue" => Some(InvoiceStatus::Overdue),
            _ => None,
        }
    }

    /// The invoice already went through its confirm transition
    pub fn is_past_draft(&self) -> bool {
        matches!(
            self,
            InvoiceStatus::Confirmed
                | InvoiceStatus::Registered
                | InvoiceStatus::Paid
                | InvoiceStatus::Consolidated
        )
    }
}

/// Badge variant for a raw status value ("primary", "success", "warning",
/// "error", "neutral"). Unknown values get "primary".
pub fn badge_variant(status: &str) -> &'static str {
    match InvoiceStatus::from_code(status) {
        Some(InvoiceStatus::Paid) => "success",
        Some(InvoiceStatus::Pending) => "warning",
        Some(InvoiceStatus::Overdue) => "error",
        Some(InvoiceStatus::Draft) => "neutral",
        _ => "primary",
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
