//! Actions returned by the controller for the event loop to carry out.

use crate::model::Submission;

/// Side effect requested by [`FormController::update`](super::FormController::update).
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Nothing to do beyond redrawing.
    None,
    /// Check and insert the row on a background task.
    Submit(Submission),
    /// Exit the event loop.
    Quit,
}
