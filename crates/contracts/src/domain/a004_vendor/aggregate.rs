use crate::domain::common::{lenient, ReferenceItem};
use serde::{Deserialize, Serialize};

/// Vendor (carrier) as returned by `/ajax/vendors/list`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub vendor_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
}

impl Vendor {
    pub fn display_name(&self) -> String {
        self.vendor_name
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or_default()
            .to_string()
    }
}

impl From<Vendor> for ReferenceItem {
    fn from(v: Vendor) -> Self {
        Self {
            id: v.id,
            name: v.display_name(),
            detail: None,
        }
    }
}
