//! Common types and traits for all records exchanged with the backend

pub mod envelope;
pub mod lenient;
pub mod line_item;
pub mod reference;
pub mod resource;

// Re-exports
pub use envelope::ApiEnvelope;
pub use line_item::{decode_products, encode_products, DecodeError, LineItem, LINE_ITEM_FIELDS};
pub use reference::{ReferenceItem, ReferenceKind};
pub use resource::ResourceRecord;
