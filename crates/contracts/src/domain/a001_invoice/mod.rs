pub mod aggregate;
pub mod status;

pub use aggregate::Invoice;
pub use status::InvoiceStatus;
