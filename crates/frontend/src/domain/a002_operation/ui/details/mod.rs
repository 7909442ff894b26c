mod view;
mod view_model;

pub use view::OperationDetails;
pub use view_model::{OperationDetailsViewModel, OPERATION_FORM};
