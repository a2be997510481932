//! Reusable TUI widgets.

pub mod spinner;
pub mod text_field;

pub use spinner::Spinner;
pub use text_field::TextField;
