//! Key handling and rendering for `Form`

use crate::model::form::{FieldKind, Form};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// What a key press did to a form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEvent {
    Submit,
    Cancel,
    /// The form changed (or the key was consumed) but stays open
    Edited,
}

pub fn handle_form_key(form: &mut Form, key: KeyEvent) -> FormEvent {
    let on_choice = form.focused().is_some_and(|f| f.is_choice());
    match key.code {
        KeyCode::Enter => FormEvent::Submit,
        KeyCode::Esc => FormEvent::Cancel,
        KeyCode::Tab | KeyCode::Down => {
            form.focus_next();
            FormEvent::Edited
        }
        KeyCode::BackTab | KeyCode::Up => {
            form.focus_prev();
            FormEvent::Edited
        }
        KeyCode::Left if on_choice => {
            form.cycle(false);
            FormEvent::Edited
        }
        KeyCode::Right | KeyCode::Char(' ') if on_choice => {
            form.cycle(true);
            FormEvent::Edited
        }
        KeyCode::Backspace => {
            form.backspace();
            FormEvent::Edited
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            form.input(c);
            FormEvent::Edited
        }
        _ => FormEvent::Edited,
    }
}

fn hint(kind: &FieldKind) -> &'static str {
    match kind {
        FieldKind::Text => "",
        FieldKind::Decimal | FieldKind::Integer => " (number)",
        FieldKind::Date => " (YYYY-MM-DD)",
        FieldKind::OptionalDate => " (YYYY-MM-DD, blank for none)",
        FieldKind::Choice(_) => " (←/→)",
    }
}

/// Render the form inside `area`, one field per line
pub fn render_form(frame: &mut Frame, area: Rect, form: &Form) {
    frame.render_widget(Clear, area);

    let label_width = form
        .fields()
        .iter()
        .map(|f| f.label.chars().count())
        .max()
        .unwrap_or(0);

    let mut lines: Vec<Line> = Vec::new();
    for (i, field) in form.fields().iter().enumerate() {
        let focused = i == form.focus();
        let marker = if focused { "▶ " } else { "  " };
        let value = match field.kind {
            FieldKind::Choice(_) => format!("‹ {} ›", field.value),
            _ if focused => format!("{}▏", field.value),
            _ => field.value.clone(),
        };
        let value_style = if focused {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };

        let mut spans = vec![
            Span::styled(marker, Style::default().fg(Color::Cyan)),
            Span::styled(
                format!("{:width$}  ", field.label, width = label_width),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(value, value_style),
        ];
        if focused {
            spans.push(Span::styled(hint(&field.kind), Style::default().fg(Color::DarkGray)));
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(" Enter ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        Span::raw("Save  "),
        Span::styled(" Esc ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        Span::raw("Cancel  "),
        Span::styled(" Tab ", Style::default().fg(Color::Cyan)),
        Span::raw("Next field"),
    ]));

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", form.title))
            .title_style(
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            )
            .border_style(Style::default().fg(Color::Magenta)),
    );
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_typing_edits_focused_field() {
        let mut form = Form::new("Trip").text("name", "Name", "");
        for c in "Run".chars() {
            assert_eq!(handle_form_key(&mut form, key(KeyCode::Char(c))), FormEvent::Edited);
        }
        handle_form_key(&mut form, key(KeyCode::Backspace));
        assert_eq!(form.value("name"), "Ru");
        assert_eq!(handle_form_key(&mut form, key(KeyCode::Enter)), FormEvent::Submit);
        assert_eq!(handle_form_key(&mut form, key(KeyCode::Esc)), FormEvent::Cancel);
    }

    #[test]
    fn test_arrows_cycle_choices_but_not_text() {
        let mut form = Form::new("Fuel")
            .choice("fuel", "Fuel", vec!["A".into(), "B".into()], "A")
            .text("port", "Port", "x");
        handle_form_key(&mut form, key(KeyCode::Right));
        assert_eq!(form.value("fuel"), "B");

        handle_form_key(&mut form, key(KeyCode::Tab));
        handle_form_key(&mut form, key(KeyCode::Right));
        assert_eq!(form.value("port"), "x");
        assert_eq!(form.value("fuel"), "B");
    }
}
