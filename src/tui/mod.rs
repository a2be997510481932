//! TUI: form controller, event loop, rendering, widgets.

pub mod action;
pub mod app;
pub mod error;
pub mod form;
pub mod message;
pub mod view;
pub mod widgets;

pub use action::Action;
pub use app::App;
pub use error::AppError;
pub use form::{FormController, FormState};
pub use message::Message;
