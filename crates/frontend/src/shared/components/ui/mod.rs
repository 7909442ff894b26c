pub mod badge;
pub mod select;

pub use badge::{ConfirmationBadge, DueBadge, InvoiceStatusBadge};
pub use select::{ReferenceSelect, Select};
