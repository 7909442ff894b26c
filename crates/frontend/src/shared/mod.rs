pub mod api_utils;
pub mod components;
pub mod config;
pub mod date_utils;
pub mod icons;
pub mod modal;
pub mod state;
pub mod sync;
pub mod toast;
