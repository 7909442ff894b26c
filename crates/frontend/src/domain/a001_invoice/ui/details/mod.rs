//! Invoice form
//!
//! - view_model.rs: form schema, commands, auto-fill from the operation
//! - view.rs: Leptos component (pure UI)

mod view;
mod view_model;

pub use view::InvoiceDetails;
pub use view_model::{InvoiceDetailsViewModel, INVOICE_FORM};
