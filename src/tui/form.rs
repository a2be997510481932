//! Form controller: the input/confirm/submit state machine.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::model::{FieldFailure, FieldId, Submission};

use super::action::Action;
use super::message::Message;
use super::widgets::{Spinner, TextField};

/// Coarse UI mode. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormState {
    /// Editing fields; the focused field receives keystrokes.
    Typing,
    /// Waiting for `y` / `n` after Enter.
    ConfirmingSubmit,
    /// A submission task is in flight.
    Loading,
    /// The last insert succeeded.
    Result,
}

impl FormState {
    /// Human-readable name for log lines.
    fn label(self) -> &'static str {
        match self {
            Self::Typing => "typing",
            Self::ConfirmingSubmit => "confirming",
            Self::Loading => "loading",
            Self::Result => "result",
        }
    }
}

/// Owns the four fields, the focus cursor and the current [`FormState`].
///
/// Once an insert error is recorded the controller is frozen: every message
/// except Ctrl+C is ignored and the error is displayed for the rest of the
/// session.
#[derive(Debug, Clone)]
pub struct FormController {
    fields: [TextField; FieldId::COUNT],
    focus: usize,
    state: FormState,
    spinner: Spinner,
    fatal: Option<String>,
}

impl Default for FormController {
    fn default() -> Self {
        Self::new()
    }
}

impl FormController {
    /// Creates an empty form in [`FormState::Typing`] with the username focused.
    pub fn new() -> Self {
        let mut form = Self {
            fields: FieldId::ALL.map(TextField::new),
            focus: 0,
            state: FormState::Typing,
            spinner: Spinner::default(),
            fatal: None,
        };
        form.fields[0].focus();
        form
    }

    /// Applies one message and returns the side effect for the event loop.
    pub fn update(&mut self, msg: Message) -> Action {
        if self.fatal.is_some() {
            return match msg {
                Message::Key(key) if is_interrupt(&key) => Action::Quit,
                _ => Action::None,
            };
        }

        match msg {
            Message::Key(key) => self.handle_key(key),
            Message::Tick => {
                if self.state == FormState::Loading {
                    self.spinner.tick();
                }
                Action::None
            }
            Message::ValidationFailed(failure) => {
                self.reject(failure);
                Action::None
            }
            Message::InsertFinished(Ok(())) => {
                log::info!("inserted row for {}", self.field(FieldId::Username).value());
                self.set_state(FormState::Result);
                Action::None
            }
            Message::InsertFinished(Err(error)) => {
                log::error!("insert failed: {error}");
                self.fatal = Some(error);
                Action::None
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.kind != KeyEventKind::Press {
            return Action::None;
        }
        if is_interrupt(&key) {
            return Action::Quit;
        }

        match (self.state, key.code) {
            (FormState::Typing, KeyCode::Tab) => {
                self.focus = (self.focus + 1) % FieldId::COUNT;
                self.refocus();
                Action::None
            }
            (FormState::Typing, KeyCode::Enter) => {
                self.blur_all();
                self.set_state(FormState::ConfirmingSubmit);
                Action::None
            }
            (FormState::Result, KeyCode::Enter) => {
                self.reset();
                Action::None
            }
            (FormState::ConfirmingSubmit, KeyCode::Char('y')) => {
                self.spinner.reset();
                self.set_state(FormState::Loading);
                let submission = self.snapshot();
                log::info!("submitting row for {}", submission.username);
                Action::Submit(submission)
            }
            (FormState::ConfirmingSubmit, KeyCode::Char('n')) => {
                self.set_state(FormState::Typing);
                self.refocus();
                Action::None
            }
            (FormState::Typing, _) => {
                // Errors are cleared before the key is applied so the
                // field's live validator can set a fresh one.
                self.refocus();
                self.fields[self.focus].handle_key(key);
                Action::None
            }
            _ => Action::None,
        }
    }

    /// Returns to [`FormState::Typing`] on the rejected field with its reason
    /// shown.
    fn reject(&mut self, failure: FieldFailure) {
        log::warn!(
            "submission rejected on {}: {}",
            failure.field.label(),
            failure.error
        );
        self.set_state(FormState::Typing);
        self.focus = failure.field.index();
        self.blur_all();
        let field = &mut self.fields[self.focus];
        field.focus();
        field.set_error(failure.error);
    }

    /// Clears every error, blurs every field, then focuses the field at the
    /// focus index.
    fn refocus(&mut self) {
        for field in &mut self.fields {
            field.clear_error();
        }
        self.blur_all();
        self.fields[self.focus].focus();
    }

    fn blur_all(&mut self) {
        for field in &mut self.fields {
            field.blur();
        }
    }

    /// Empties the form for another entry.
    fn reset(&mut self) {
        for field in &mut self.fields {
            field.reset();
            field.clear_error();
            field.blur();
        }
        self.focus = 0;
        self.fields[0].focus();
        self.set_state(FormState::Typing);
    }

    fn snapshot(&self) -> Submission {
        Submission {
            username: self.field(FieldId::Username).value().to_string(),
            wan_ip: self.field(FieldId::WanIp).value().to_string(),
            speed: self.field(FieldId::Speed).value().to_string(),
            password: self.field(FieldId::Password).value().to_string(),
        }
    }

    fn set_state(&mut self, state: FormState) {
        if state != self.state {
            log::debug!("{} -> {}", self.state.label(), state.label());
        }
        self.state = state;
    }

    /// Current phase of the form.
    pub fn state(&self) -> FormState {
        self.state
    }

    /// Index of the focused field in [`FieldId::ALL`].
    pub fn focus(&self) -> usize {
        self.focus
    }

    /// The input for `id`.
    pub fn field(&self, id: FieldId) -> &TextField {
        &self.fields[id.index()]
    }

    /// All inputs, in [`FieldId::ALL`] order.
    pub fn fields(&self) -> &[TextField] {
        &self.fields
    }

    /// The recorded insert error, if the session is frozen.
    pub fn fatal_error(&self) -> Option<&str> {
        self.fatal.as_deref()
    }

    /// Spinner shown while an insert is in flight.
    pub fn spinner(&self) -> &Spinner {
        &self.spinner
    }
}

fn is_interrupt(key: &KeyEvent) -> bool {
    key.kind == KeyEventKind::Press
        && key.modifiers.contains(KeyModifiers::CONTROL)
        && key.code == KeyCode::Char('c')
}
