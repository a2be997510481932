//! Single-line text input with a character limit and a live validator.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;

use crate::model::{FieldId, ValidationError};

/// Character shown in place of each secret character.
const MASK: char = '\u{2022}';

/// One labeled input of the form.
///
/// Keys are only accepted while the field is focused. The validator runs
/// after every edit and its result is stored for display; an invalid value
/// is kept.
#[derive(Debug, Clone)]
pub struct TextField {
    id: FieldId,
    value: String,
    /// Cursor position, in chars.
    cursor: usize,
    focused: bool,
    error: Option<ValidationError>,
}

impl TextField {
    /// Creates an empty, unfocused field.
    pub fn new(id: FieldId) -> Self {
        Self {
            id,
            value: String::new(),
            cursor: 0,
            focused: false,
            error: None,
        }
    }

    /// Which form field this input holds.
    pub fn id(&self) -> FieldId {
        self.id
    }

    /// The raw typed value, untrimmed.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replaces the value, truncated to the char limit, and validates it.
    /// The cursor moves to the end.
    pub fn set_value(&mut self, value: &str) {
        self.value = value.chars().take(self.id.char_limit()).collect();
        self.cursor = self.len();
        self.error = self.validate(&self.value).err();
    }

    /// Runs this field's validator against `value`.
    pub fn validate(&self, value: &str) -> Result<(), ValidationError> {
        (self.id.validator())(value)
    }

    /// Gives this input keyboard focus.
    pub fn focus(&mut self) {
        self.focused = true;
    }

    /// Removes keyboard focus.
    pub fn blur(&mut self) {
        self.focused = false;
    }

    /// Whether keys are currently routed here.
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// The error shown next to the input, if any.
    pub fn error(&self) -> Option<&ValidationError> {
        self.error.as_ref()
    }

    /// Shows `error` next to the input until cleared.
    pub fn set_error(&mut self, error: ValidationError) {
        self.error = Some(error);
    }

    /// Hides any shown error.
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Empties the value and moves the cursor home. Error and focus are left
    /// alone.
    pub fn reset(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Cursor position, in chars from the start of the value.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Handles an editing key. Returns `true` if the value changed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if !self.focused {
            return false;
        }

        let changed = if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('u') => self.delete_to_start(),
                KeyCode::Char('k') => self.delete_to_end(),
                _ => false,
            }
        } else {
            match key.code {
                KeyCode::Char(ch) => self.insert_char(ch),
                KeyCode::Backspace => self.delete_before_cursor(),
                KeyCode::Delete => self.delete_at_cursor(),
                KeyCode::Left => {
                    self.cursor = self.cursor.saturating_sub(1);
                    false
                }
                KeyCode::Right => {
                    self.cursor = (self.cursor + 1).min(self.len());
                    false
                }
                KeyCode::Home => {
                    self.cursor = 0;
                    false
                }
                KeyCode::End => {
                    self.cursor = self.len();
                    false
                }
                _ => false,
            }
        };

        if changed {
            self.error = self.validate(&self.value).err();
        }
        changed
    }

    /// Returns the value as rendered: secret fields are masked.
    pub fn display_value(&self) -> String {
        if self.id.is_secret() {
            std::iter::repeat_n(MASK, self.len()).collect()
        } else {
            self.value.clone()
        }
    }

    /// Spans for the input portion of the row: placeholder when empty, and a
    /// block cursor when focused.
    pub fn spans(&self) -> Vec<Span<'static>> {
        let cursor_style = Style::default().add_modifier(Modifier::REVERSED);

        if self.value.is_empty() {
            let placeholder = Span::styled(
                self.id.placeholder(),
                Style::default().fg(Color::DarkGray),
            );
            return if self.focused {
                vec![Span::styled(" ", cursor_style), placeholder]
            } else {
                vec![placeholder]
            };
        }

        let shown: Vec<char> = self.display_value().chars().collect();
        if !self.focused {
            return vec![Span::raw(shown.into_iter().collect::<String>())];
        }

        let before: String = shown[..self.cursor].iter().collect();
        let (at, after) = match shown.get(self.cursor) {
            Some(ch) => (ch.to_string(), shown[self.cursor + 1..].iter().collect()),
            None => (" ".to_string(), String::new()),
        };
        vec![
            Span::raw(before),
            Span::styled(at, cursor_style),
            Span::raw(after),
        ]
    }

    fn len(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map_or(self.value.len(), |(i, _)| i)
    }

    fn insert_char(&mut self, ch: char) -> bool {
        if self.len() >= self.id.char_limit() {
            return false;
        }
        let at = self.byte_index(self.cursor);
        self.value.insert(at, ch);
        self.cursor += 1;
        true
    }

    fn delete_before_cursor(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.value.remove(at);
        true
    }

    fn delete_at_cursor(&mut self) -> bool {
        if self.cursor >= self.len() {
            return false;
        }
        let at = self.byte_index(self.cursor);
        self.value.remove(at);
        true
    }

    fn delete_to_start(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let at = self.byte_index(self.cursor);
        self.value.replace_range(..at, "");
        self.cursor = 0;
        true
    }

    fn delete_to_end(&mut self) -> bool {
        if self.cursor >= self.len() {
            return false;
        }
        let at = self.byte_index(self.cursor);
        self.value.truncate(at);
        true
    }
}
