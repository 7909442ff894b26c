pub mod screen_state;

pub use screen_state::ScreenState;
