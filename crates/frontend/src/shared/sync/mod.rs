//! Client-side synchronization of a remote CRUD resource with its list
//! view and record form.

pub mod client;
pub mod codec;
pub mod entity_store;
pub mod error;
pub mod filter_state;
pub mod form_controller;
pub mod orchestrator;
pub mod transport;
pub mod view_state;

pub use client::{ApiClient, ResourceClient};
pub use codec::{FieldKind, FormField, FormSchema, FormValues};
pub use error::SyncError;
pub use filter_state::FilterDef;
pub use form_controller::EditSession;
pub use orchestrator::{NoticeLevel, ScreenConfig, SyncOrchestrator, ViewSink};
pub use view_state::ViewState;
