//! Messages consumed by the [`FormController`](super::FormController).

use crossterm::event::KeyEvent;

use crate::model::FieldFailure;

/// Every input the controller reacts to, delivered one at a time by the
/// event loop: keystrokes, timer ticks and background task completions.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// A key event from the terminal.
    Key(KeyEvent),
    /// A spinner tick, sent whenever no key arrives within the tick rate.
    Tick,
    /// A pre-submission check rejected the row.
    ValidationFailed(FieldFailure),
    /// The Row Store finished; the error is the store's message, verbatim.
    InsertFinished(Result<(), String>),
}
