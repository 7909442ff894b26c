pub mod filter_panel;
pub mod record_form;
pub mod ui;
