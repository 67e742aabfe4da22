//! Cost category manager
//!
//! Lists every category with the number of costs using it. Categories can
//! be added, renamed (merging into an existing name) and deleted, the last
//! behind a confirmation.

use crate::action::Action;
use crate::components::layout::centered_popup;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Text being typed in the dialog
#[derive(Debug, Clone, PartialEq)]
pub enum CategoryInput {
    Adding(String),
    Renaming { from: String, buffer: String },
}

#[derive(Debug, Default)]
pub struct CategoryDialog {
    pub list_state: ListState,
    input: Option<CategoryInput>,
}

impl CategoryDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, categories: &[String]) {
        self.input = None;
        self.list_state
            .select(if categories.is_empty() { None } else { Some(0) });
    }

    #[cfg(test)]
    pub fn input(&self) -> Option<&CategoryInput> {
        self.input.as_ref()
    }

    fn highlighted<'a>(&self, categories: &'a [String]) -> Option<&'a String> {
        self.list_state.selected().and_then(|i| categories.get(i))
    }

    /// Keep the highlight inside the list after it changed
    pub fn sync(&mut self, categories: &[String]) {
        let selected = match (self.list_state.selected(), categories.len()) {
            (_, 0) => None,
            (Some(i), len) => Some(i.min(len - 1)),
            (None, _) => Some(0),
        };
        self.list_state.select(selected);
    }

    pub fn handle_key(&mut self, key: KeyEvent, categories: &[String]) -> Option<Action> {
        if let Some(input) = self.input.as_mut() {
            let buffer = match input {
                CategoryInput::Adding(buffer) => buffer,
                CategoryInput::Renaming { buffer, .. } => buffer,
            };
            match key.code {
                KeyCode::Esc => self.input = None,
                KeyCode::Enter => {
                    return match self.input.take() {
                        Some(CategoryInput::Adding(name)) if !name.trim().is_empty() => {
                            Some(Action::AddCostCategory(name.trim().to_string()))
                        }
                        Some(CategoryInput::Renaming { from, buffer })
                            if !buffer.trim().is_empty() && buffer.trim() != from =>
                        {
                            Some(Action::RenameCostCategory {
                                from,
                                to: buffer.trim().to_string(),
                            })
                        }
                        _ => None,
                    };
                }
                KeyCode::Backspace => {
                    buffer.pop();
                }
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    buffer.push(c);
                }
                _ => {}
            }
            return None;
        }

        let len = categories.len();
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('c') => Some(Action::CloseModal),
            KeyCode::Down | KeyCode::Char('j') => {
                if len > 0 {
                    let next = self.list_state.selected().map_or(0, |i| (i + 1).min(len - 1));
                    self.list_state.select(Some(next));
                }
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if len > 0 {
                    let prev = self.list_state.selected().map_or(0, |i| i.saturating_sub(1));
                    self.list_state.select(Some(prev));
                }
                None
            }
            KeyCode::Char('a') => {
                self.input = Some(CategoryInput::Adding(String::new()));
                None
            }
            KeyCode::Char('r') | KeyCode::F(2) => {
                if let Some(name) = self.highlighted(categories) {
                    self.input = Some(CategoryInput::Renaming {
                        from: name.clone(),
                        buffer: name.clone(),
                    });
                }
                None
            }
            KeyCode::Char('d') | KeyCode::Delete => self
                .highlighted(categories)
                .map(|name| Action::RequestDeleteCostCategory(name.clone())),
            _ => None,
        }
    }

    /// `usage` pairs each category with the number of costs using it
    pub fn render(&mut self, frame: &mut Frame, area: Rect, usage: &[(String, usize)]) {
        let popup_width = 54u16.min(area.width.saturating_sub(4));
        let rows = u16::try_from(usage.len()).unwrap_or(u16::MAX);
        let popup_height = rows
            .saturating_add(10)
            .min(area.height.saturating_sub(4))
            .max(12);
        let popup_area = centered_popup(area, popup_width, popup_height);
        frame.render_widget(Clear, popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(3),
                Constraint::Length(3),
            ])
            .split(popup_area);

        let header_text = match &self.input {
            Some(CategoryInput::Adding(buffer)) => format!("New category: {}▏", buffer),
            Some(CategoryInput::Renaming { from, buffer }) => {
                format!("Rename {} to: {}▏", from, buffer)
            }
            None => format!("{} categories", usage.len()),
        };
        let header = Paragraph::new(Line::from(Span::styled(
            header_text,
            Style::default().fg(Color::Cyan),
        )))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Cost Categories ")
                .title_style(
                    Style::default()
                        .fg(Color::Magenta)
                        .add_modifier(Modifier::BOLD),
                ),
        );
        frame.render_widget(header, chunks[0]);

        let items: Vec<ListItem> = usage
            .iter()
            .map(|(name, count)| {
                let count_style = if *count == 0 {
                    Style::default().fg(Color::DarkGray)
                } else {
                    Style::default().fg(Color::Yellow)
                };
                ListItem::new(Line::from(vec![
                    Span::styled(name.clone(), Style::default().fg(Color::White)),
                    Span::styled(format!("  ({} costs)", count), count_style),
                ]))
            })
            .collect();
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            )
            .highlight_style(
                Style::default()
                    .bg(Color::Blue)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");
        frame.render_stateful_widget(list, chunks[1], &mut self.list_state);

        let help = if self.input.is_some() {
            Line::from(vec![
                Span::styled(" Enter ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
                Span::raw("Save  "),
                Span::styled(" Esc ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
                Span::raw("Cancel"),
            ])
        } else {
            Line::from(vec![
                Span::styled(" a ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
                Span::raw("Add  "),
                Span::styled(" r ", Style::default().fg(Color::Cyan)),
                Span::raw("Rename  "),
                Span::styled(" d ", Style::default().fg(Color::Red)),
                Span::raw("Delete  "),
                Span::styled(" Esc ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
                Span::raw("Close"),
            ])
        };
        let help = Paragraph::new(help).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(help, chunks[2]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn categories() -> Vec<String> {
        vec!["Port Fees".to_string(), "Repairs".to_string()]
    }

    #[test]
    fn test_add_category() {
        let cats = categories();
        let mut dialog = CategoryDialog::new();
        dialog.open(&cats);

        dialog.handle_key(key(KeyCode::Char('a')), &cats);
        for c in " Bunkering ".chars() {
            dialog.handle_key(key(KeyCode::Char(c)), &cats);
        }
        assert_eq!(
            dialog.handle_key(key(KeyCode::Enter), &cats),
            Some(Action::AddCostCategory("Bunkering".to_string()))
        );
        assert!(dialog.input().is_none());
    }

    #[test]
    fn test_rename_unchanged_or_blank_sends_nothing() {
        let cats = categories();
        let mut dialog = CategoryDialog::new();
        dialog.open(&cats);

        dialog.handle_key(key(KeyCode::Char('r')), &cats);
        assert_eq!(dialog.handle_key(key(KeyCode::Enter), &cats), None);

        dialog.handle_key(key(KeyCode::Char('j')), &cats);
        dialog.handle_key(key(KeyCode::Char('r')), &cats);
        for _ in 0.."Repairs".len() {
            dialog.handle_key(key(KeyCode::Backspace), &cats);
        }
        for c in "Dry dock".chars() {
            dialog.handle_key(key(KeyCode::Char(c)), &cats);
        }
        assert_eq!(
            dialog.handle_key(key(KeyCode::Enter), &cats),
            Some(Action::RenameCostCategory {
                from: "Repairs".to_string(),
                to: "Dry dock".to_string(),
            })
        );
    }

    #[test]
    fn test_delete_goes_through_confirmation() {
        let cats = categories();
        let mut dialog = CategoryDialog::new();
        dialog.open(&cats);

        assert_eq!(
            dialog.handle_key(key(KeyCode::Char('d')), &cats),
            Some(Action::RequestDeleteCostCategory("Port Fees".to_string()))
        );
    }

    #[test]
    fn test_render_leaves_body_visible_around_popup() {
        use ratatui::{backend::TestBackend, widgets::Paragraph, Terminal};

        let mut dialog = CategoryDialog::new();
        dialog.open(&categories());
        let usage = vec![("Port Fees".to_string(), 2), ("Repairs".to_string(), 0)];
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();

        terminal
            .draw(|f| {
                let area = f.area();
                f.render_widget(Paragraph::new("fleet body"), area);
                dialog.render(f, area, &usage);
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        assert_eq!(buffer[(0, 0)].symbol(), "f");
    }
}
