//! Renders the form for its current state.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::model::FieldId;

use super::form::{FormController, FormState};
use super::widgets::TextField;

/// Width of the label column, including trailing padding.
const LABEL_WIDTH: usize = 11;

/// Draws the whole frame. A recorded fatal error replaces every other view.
pub fn draw(form: &FormController, frame: &mut Frame) {
    let area = frame.area();
    let block = Block::default()
        .title(" radform ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if let Some(error) = form.fatal_error() {
        draw_fatal(error, frame, inner);
        return;
    }

    match form.state() {
        FormState::Typing => draw_entry(form, frame, inner),
        FormState::ConfirmingSubmit => draw_notice(
            Line::from("Press y/n to continue or go back"),
            frame,
            inner,
        ),
        FormState::Loading => draw_notice(
            Line::from(format!("Loading...  {}", form.spinner().frame())),
            frame,
            inner,
        ),
        FormState::Result => draw_notice(
            Line::from(format!(
                "Added {} to RADIUS       ctrl+c to exit or enter to create another",
                form.field(FieldId::Username).value()
            )),
            frame,
            inner,
        ),
    }
}

fn draw_entry(form: &FormController, frame: &mut Frame, area: Rect) {
    let mut lines = Vec::with_capacity(FieldId::COUNT * 2 + 1);
    for field in form.fields() {
        lines.push(field_line(field));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        "Enter to continue",
        Style::default().fg(Color::DarkGray),
    )));

    let [body] = Layout::vertical([Constraint::Min(0)])
        .margin(1)
        .areas(area);
    frame.render_widget(Paragraph::new(lines), body);
}

fn field_line(field: &TextField) -> Line<'static> {
    let label_style = if field.is_focused() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let mut spans = vec![Span::styled(
        format!(
            "{:<width$}",
            format!("{}:", field.id().label()),
            width = LABEL_WIDTH
        ),
        label_style,
    )];
    spans.extend(field.spans());
    if let Some(err) = field.error() {
        spans.push(Span::styled(
            format!("  {err}"),
            Style::default().fg(Color::Red),
        ));
    }
    Line::from(spans)
}

fn draw_notice(line: Line<'_>, frame: &mut Frame, area: Rect) {
    let [body] = Layout::vertical([Constraint::Min(0)])
        .margin(1)
        .areas(area);
    frame.render_widget(Paragraph::new(line).wrap(Wrap { trim: false }), body);
}

fn draw_fatal(error: &str, frame: &mut Frame, area: Rect) {
    let line = Line::from(Span::styled(
        format!("Received Error: {error}"),
        Style::default().fg(Color::Red),
    ));
    draw_notice(line, frame, area);
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::model::{FieldFailure, ValidationError};
    use crate::tui::form::tests::{fill, key, submit, type_str};
    use crate::tui::message::Message;

    fn buffer_to_string(buf: &ratatui::buffer::Buffer) -> String {
        let mut s = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                s.push(buf[(x, y)].symbol().chars().next().unwrap_or(' '));
            }
            s.push('\n');
        }
        s
    }

    fn render(form: &FormController) -> String {
        let backend = TestBackend::new(100, 14);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| draw(form, frame)).unwrap();
        buffer_to_string(terminal.backend().buffer())
    }

    mod entry {
        use super::*;

        #[test]
        fn shows_labels_and_placeholders() {
            let output = render(&FormController::new());
            for text in [
                "Username:",
                "Wan IP:",
                "Speed:",
                "Password:",
                "Username...",
                "Wan Ip...",
                "Speed (100M)",
                "Password...",
                "Enter to continue",
            ] {
                assert!(output.contains(text), "missing {text:?} in\n{output}");
            }
        }

        #[test]
        fn shows_typed_values_and_masks_password() {
            let mut form = FormController::new();
            fill(&mut form);
            let output = render(&form);
            assert!(output.contains("finn"));
            assert!(output.contains("203.0.113.7"));
            assert!(output.contains("100M"));
            assert!(!output.contains("1234"), "password should be masked");
            assert!(output.contains("\u{2022}\u{2022}\u{2022}\u{2022}"));
        }

        #[test]
        fn shows_live_validation_error() {
            let mut form = FormController::new();
            type_str(&mut form, "a b");
            assert!(render(&form).contains("No spaces in username"));
        }

        #[test]
        fn shows_rejection_reason() {
            let mut form = FormController::new();
            submit(&mut form);
            form.update(Message::ValidationFailed(FieldFailure {
                field: FieldId::Username,
                error: ValidationError::BlankUsername,
            }));
            assert!(render(&form).contains("username cannot be null"));
        }
    }

    mod notices {
        use super::*;

        #[test]
        fn confirmation_prompt() {
            let mut form = FormController::new();
            key(&mut form, KeyCode::Enter);
            let output = render(&form);
            assert!(output.contains("Press y/n to continue or go back"));
            assert!(!output.contains("Username:"));
        }

        #[test]
        fn loading_shows_spinner() {
            let mut form = FormController::new();
            submit(&mut form);
            let output = render(&form);
            assert!(output.contains("Loading..."));
            assert!(output.contains(form.spinner().frame()));
        }

        #[test]
        fn result_names_the_user() {
            let mut form = FormController::new();
            fill(&mut form);
            submit(&mut form);
            form.update(Message::InsertFinished(Ok(())));
            let output = render(&form);
            assert!(output.contains("Added finn to RADIUS"));
            assert!(output.contains("enter to create another"));
        }

        #[test]
        fn fatal_error_overrides_everything() {
            let mut form = FormController::new();
            submit(&mut form);
            form.update(Message::InsertFinished(Err(
                "ERROR: relation \"usergroup\" does not exist".into(),
            )));
            let output = render(&form);
            assert!(output.contains("Received Error: ERROR: relation \"usergroup\" does not exist"));
            assert!(!output.contains("Loading..."));
        }
    }
}
