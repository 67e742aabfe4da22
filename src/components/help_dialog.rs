//! Help dialog component
//!
//! Displays all keyboard shortcuts available in the application.

use crate::action::Action;
use crate::component::Component;
use crate::components::layout::centered_popup;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

/// Help dialog showing all keyboard shortcuts
#[derive(Default)]
pub struct HelpDialog {
    pub scroll_offset: usize,
}

impl Component for HelpDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => Some(Action::CloseModal),
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll_offset = self.scroll_offset.saturating_add(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
                None
            }
            KeyCode::PageDown => {
                self.scroll_offset = self.scroll_offset.saturating_add(10);
                None
            }
            KeyCode::PageUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(10);
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let dialog_area = centered_popup(area, 64, area.height.saturating_sub(4));
        frame.render_widget(Clear, dialog_area);

        let content = build_help_content();
        let total = content.len();
        let visible_height = dialog_area.height.saturating_sub(2) as usize;

        // Clamp scroll offset
        let max_scroll = total.saturating_sub(visible_height);
        if self.scroll_offset > max_scroll {
            self.scroll_offset = max_scroll;
        }

        let paragraph = Paragraph::new(content.clone())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Keyboard Shortcuts ")
                    .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .scroll((self.scroll_offset as u16, 0));

        frame.render_widget(paragraph, dialog_area);

        // Render scrollbar if content exceeds visible area
        if total > visible_height {
            let mut scrollbar_state =
                ScrollbarState::new(total.saturating_sub(visible_height)).position(self.scroll_offset);

            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(Some("↑"))
                    .end_symbol(Some("↓")),
                dialog_area.inner(ratatui::layout::Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }

        Ok(())
    }
}

/// Build the help content with all keyboard shortcuts
fn build_help_content() -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    // Helper to add a section header
    let add_section = |lines: &mut Vec<Line<'static>>, title: &str| {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {} ", title),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            format!("  {}", "─".repeat(title.len() + 2)),
            Style::default().fg(Color::DarkGray),
        )));
    };

    // Helper to add a shortcut line
    let add_shortcut = |lines: &mut Vec<Line<'static>>, key: &str, description: &str| {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {:16}", key),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(description.to_string(), Style::default().fg(Color::White)),
        ]));
    };

    add_section(&mut lines, "Ships");
    add_shortcut(&mut lines, "s", "Open the ship picker");
    add_shortcut(&mut lines, "n", "Add a ship");
    add_shortcut(&mut lines, "D", "Delete the selected ship");
    add_shortcut(&mut lines, "x", "Export the selected ship to CSV");

    add_section(&mut lines, "Ship Picker");
    add_shortcut(&mut lines, "type", "Filter ships by name");
    add_shortcut(&mut lines, "↑ / ↓", "Move (commits an open rename)");
    add_shortcut(&mut lines, "Enter", "Select ship / commit rename");
    add_shortcut(&mut lines, "F2 / Ctrl+r", "Rename inline");
    add_shortcut(&mut lines, "Del / Ctrl+d", "Delete ship");
    add_shortcut(&mut lines, "Ctrl+n", "Add a ship");
    add_shortcut(&mut lines, "Esc", "Cancel rename / close");

    add_section(&mut lines, "Tabs");
    add_shortcut(&mut lines, "Tab", "Next tab");
    add_shortcut(&mut lines, "Shift+Tab", "Previous tab");
    add_shortcut(&mut lines, "1 - 5", "Overview, Voyages, Fuel, Costs, Maintenance");

    add_section(&mut lines, "Records");
    add_shortcut(&mut lines, "j / k", "Move through the list");
    add_shortcut(&mut lines, "a", "Add a record");
    add_shortcut(&mut lines, "e / Enter", "Edit the highlighted record");
    add_shortcut(&mut lines, "d", "Delete the highlighted record");
    add_shortcut(&mut lines, "← / →", "Switch trips/voyages section");
    add_shortcut(&mut lines, "c", "Manage cost categories (Costs tab)");

    add_section(&mut lines, "Overview");
    add_shortcut(&mut lines, "e", "Edit ship details");
    add_shortcut(&mut lines, "+ / -", "Zoom the map");

    add_section(&mut lines, "Forms");
    add_shortcut(&mut lines, "Tab / ↓", "Next field");
    add_shortcut(&mut lines, "Shift+Tab / ↑", "Previous field");
    add_shortcut(&mut lines, "← / →", "Cycle choice fields");
    add_shortcut(&mut lines, "Enter", "Save");
    add_shortcut(&mut lines, "Esc", "Cancel");

    add_section(&mut lines, "General");
    add_shortcut(&mut lines, "Ctrl+s", "Save now");
    add_shortcut(&mut lines, "?", "Show this help");
    add_shortcut(&mut lines, "q", "Quit");

    // Footer
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Press q, Esc, or ? to close",
        Style::default().fg(Color::DarkGray),
    )));

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    #[test]
    fn test_help_lists_picker_shortcuts() {
        let text: String = build_help_content()
            .iter()
            .flat_map(|l| l.spans.iter().map(|s| s.content.to_string()))
            .collect();
        assert!(text.contains("Rename inline"));
        assert!(text.contains("Manage cost categories"));
    }

    #[test]
    fn test_scroll_and_close() {
        let mut dialog = HelpDialog::default();
        dialog
            .handle_key_event(KeyEvent::new(KeyCode::Down, KeyModifiers::NONE))
            .unwrap();
        assert_eq!(dialog.scroll_offset, 1);
        let action = dialog
            .handle_key_event(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE))
            .unwrap();
        assert_eq!(action, Some(Action::CloseModal));
    }
}
