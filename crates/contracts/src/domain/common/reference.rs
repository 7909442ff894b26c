use serde::{Deserialize, Serialize};

/// Reference collections loaded alongside a record list to feed dropdowns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReferenceKind {
    Clients,
    Vendors,
    Operations,
}

impl ReferenceKind {
    /// Endpoint path the collection is read from
    pub fn path(&self) -> &'static str {
        match self {
            ReferenceKind::Clients => "/ajax/clients/list",
            ReferenceKind::Vendors => "/ajax/vendors/list",
            ReferenceKind::Operations => "/ajax/operations",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ReferenceKind::Clients => "clients",
            ReferenceKind::Vendors => "vendors",
            ReferenceKind::Operations => "operations",
        }
    }
}

/// Normalized dropdown entry.
///
/// `name` is what the record stores (client name, vendor name, operation
/// number); `detail` is an optional secondary line shown in selectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceItem {
    pub id: Option<i64>,
    pub name: String,
    pub detail: Option<String>,
}

impl ReferenceItem {
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&term)
            || self
                .detail
                .as_deref()
                .map(|d| d.to_lowercase().contains(&term))
                .unwrap_or(false)
    }
}

/// Sort by name, case-insensitively, dropping entries without a name.
pub fn sorted_by_name(items: Vec<ReferenceItem>) -> Vec<ReferenceItem> {
    let mut items: Vec<ReferenceItem> = items
        .into_iter()
        .filter(|i| !i.name.trim().is_empty())
        .collect();
    items.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    items
}
