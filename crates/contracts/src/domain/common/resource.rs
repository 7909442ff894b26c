use super::ReferenceKind;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Trait for records served by one CRUD resource.
///
/// A record carries two identities: the durable numeric `id` assigned by
/// the backend, used only for local lookup, and the human-facing natural
/// key (`INV-0001`) used in every write/action URL.
pub trait ResourceRecord: Clone + std::fmt::Debug + Serialize + DeserializeOwned + 'static {
    // ============================================================================
    // Instance data
    // ============================================================================

    fn id(&self) -> i64;

    fn natural_key(&self) -> &str;

    /// Whether the record has already passed its confirm transition
    fn is_confirmed(&self) -> bool;

    /// Whether the confirm action should be offered
    fn can_confirm(&self) -> bool {
        !self.is_confirmed()
    }

    /// Whether the register action should be offered
    fn can_register(&self) -> bool {
        false
    }

    // ============================================================================
    // Resource metadata
    // ============================================================================

    /// Endpoint prefix, e.g. "/ajax/invoices"
    fn base_path() -> &'static str;

    /// Name of the natural-key field, e.g. "inv_id"
    fn natural_key_field() -> &'static str;

    /// Element name for UI messages (singular, capitalized), e.g. "Invoice"
    fn element_name() -> &'static str;

    /// List name for UI messages (plural, lowercase), e.g. "invoices"
    fn list_name() -> &'static str;

    /// Reference collections the screen needs next to the record list
    fn reference_kinds() -> &'static [ReferenceKind];

    /// Identifier kinds accepted by `generate-id`; empty means no `type` parameter
    fn identifier_kinds() -> &'static [&'static str] {
        &[]
    }
}
