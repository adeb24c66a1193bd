//! Reusable widgets for the postbot TUI.

pub mod option_bar;
pub mod status_bar;
pub mod text_input;

pub use option_bar::OptionBar;
pub use status_bar::{KeyHint, StatusBar};
pub use text_input::TextInputState;
