//! Ship picker overlay
//!
//! Searchable ship list with inline rename, delete (behind a confirmation)
//! and an entry point to the add-ship form.

use crate::action::Action;
use crate::components::layout::centered_popup;
use crate::model::entity::EntityId;
use crate::model::ship::{Ship, ShipPatch};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};
use tracing::debug;

/// Ships whose name contains `query`, ignoring case, in collection order
pub fn filter_ships<'a>(ships: &'a [Ship], query: &str) -> Vec<&'a Ship> {
    let query = query.trim().to_lowercase();
    ships
        .iter()
        .filter(|s| query.is_empty() || s.name.to_lowercase().contains(&query))
        .collect()
}

/// An in-progress rename; only one exists at a time
#[derive(Debug, Clone, PartialEq)]
pub struct InlineRename {
    pub ship_id: EntityId,
    pub buffer: String,
}

impl InlineRename {
    /// Patch to send, if the edit is worth committing
    fn commit(self, ships: &[Ship]) -> Option<Action> {
        let name = self.buffer.trim();
        if name.is_empty() {
            debug!(ship_id = self.ship_id, "Discarding empty rename");
            return None;
        }
        let current = ships.iter().find(|s| s.id == self.ship_id)?;
        if current.name == name {
            return None;
        }
        Some(Action::UpdateShip(self.ship_id, ShipPatch::rename(name)))
    }
}

#[derive(Debug, Default)]
pub struct ShipPicker {
    pub query: String,
    pub list_state: ListState,
    rename: Option<InlineRename>,
}

impl ShipPicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepare for display, highlighting the active ship
    pub fn open(&mut self, ships: &[Ship], active: Option<EntityId>) {
        self.query.clear();
        self.rename = None;
        let index = active
            .and_then(|id| ships.iter().position(|s| s.id == id))
            .unwrap_or(0);
        self.list_state
            .select(if ships.is_empty() { None } else { Some(index) });
    }

    #[cfg(test)]
    pub fn rename(&self) -> Option<&InlineRename> {
        self.rename.as_ref()
    }

    pub fn highlighted<'a>(&self, ships: &'a [Ship]) -> Option<&'a Ship> {
        let visible = filter_ships(ships, &self.query);
        self.list_state.selected().and_then(|i| visible.get(i).copied())
    }

    fn clamp_selection(&mut self, visible: usize) {
        let selected = match (self.list_state.selected(), visible) {
            (_, 0) => None,
            (Some(i), len) => Some(i.min(len - 1)),
            (None, _) => Some(0),
        };
        self.list_state.select(selected);
    }

    fn move_highlight(&mut self, visible: usize, forward: bool) {
        if visible == 0 {
            return;
        }
        let current = self.list_state.selected().unwrap_or(0);
        let next = if forward {
            (current + 1).min(visible - 1)
        } else {
            current.saturating_sub(1)
        };
        self.list_state.select(Some(next));
    }

    fn begin_rename(&mut self, ships: &[Ship]) {
        if let Some(ship) = self.highlighted(ships) {
            self.rename = Some(InlineRename {
                ship_id: ship.id,
                buffer: ship.name.clone(),
            });
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, ships: &[Ship]) -> Option<Action> {
        let visible = filter_ships(ships, &self.query).len();

        if let Some(rename) = self.rename.as_mut() {
            match key.code {
                KeyCode::Esc => {
                    self.rename = None;
                }
                KeyCode::Enter => {
                    return self.rename.take().and_then(|r| r.commit(ships));
                }
                KeyCode::Up | KeyCode::Down | KeyCode::Tab | KeyCode::BackTab => {
                    let action = self.rename.take().and_then(|r| r.commit(ships));
                    self.move_highlight(visible, matches!(key.code, KeyCode::Down | KeyCode::Tab));
                    return action;
                }
                KeyCode::Backspace => {
                    rename.buffer.pop();
                }
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    rename.buffer.push(c);
                }
                _ => {}
            }
            return None;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => Some(Action::CloseModal),
            KeyCode::Enter => self.highlighted(ships).map(|s| Action::SelectShip(s.id)),
            KeyCode::Up => {
                self.move_highlight(visible, false);
                None
            }
            KeyCode::Down | KeyCode::Tab => {
                self.move_highlight(visible, true);
                None
            }
            KeyCode::F(2) => {
                self.begin_rename(ships);
                None
            }
            KeyCode::Char('r') if ctrl => {
                self.begin_rename(ships);
                None
            }
            KeyCode::Delete => self.highlighted(ships).map(|s| Action::RequestDeleteShip(s.id)),
            KeyCode::Char('d') if ctrl => {
                self.highlighted(ships).map(|s| Action::RequestDeleteShip(s.id))
            }
            KeyCode::Char('n') if ctrl => Some(Action::OpenAddShip),
            KeyCode::Backspace => {
                self.query.pop();
                self.clamp_selection(filter_ships(ships, &self.query).len());
                None
            }
            KeyCode::Char(c) if !ctrl => {
                self.query.push(c);
                self.list_state.select(Some(0));
                self.clamp_selection(filter_ships(ships, &self.query).len());
                None
            }
            _ => None,
        }
    }

    /// Keep the highlight valid after the ship list changed
    pub fn sync(&mut self, ships: &[Ship]) {
        if let Some(rename) = &self.rename {
            if !ships.iter().any(|s| s.id == rename.ship_id) {
                self.rename = None;
            }
        }
        self.clamp_selection(filter_ships(ships, &self.query).len());
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, ships: &[Ship], active: Option<EntityId>) {
        let popup_width = 64u16.min(area.width.saturating_sub(4));
        let popup_height = (ships.len() as u16 + 9)
            .clamp(12, area.height.saturating_sub(4).max(12));
        let popup = centered_popup(area, popup_width, popup_height);
        frame.render_widget(Clear, popup);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(3),
                Constraint::Length(3),
            ])
            .split(popup);

        let search = Paragraph::new(Line::from(vec![
            Span::styled("Search: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{}▏", self.query),
                Style::default().fg(Color::Cyan),
            ),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Ships ")
                .title_style(
                    Style::default()
                        .fg(Color::Magenta)
                        .add_modifier(Modifier::BOLD),
                ),
        );
        frame.render_widget(search, chunks[0]);

        let visible = filter_ships(ships, &self.query);
        if visible.is_empty() {
            let message = if ships.is_empty() {
                "No ships yet · Ctrl+N to add one"
            } else {
                "No ship matches the search"
            };
            let empty = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(message, Style::default().fg(Color::Yellow))),
            ])
            .alignment(ratatui::layout::Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
            frame.render_widget(empty, chunks[1]);
        } else {
            let items: Vec<ListItem> = visible
                .iter()
                .map(|ship| {
                    let is_active = Some(ship.id) == active;
                    let marker = Span::styled(
                        if is_active { "● " } else { "  " },
                        Style::default().fg(Color::Green),
                    );
                    let line = match &self.rename {
                        Some(rename) if rename.ship_id == ship.id => Line::from(vec![
                            marker,
                            Span::styled(
                                format!("{}▏", rename.buffer),
                                Style::default()
                                    .fg(Color::Black)
                                    .bg(Color::Yellow)
                                    .add_modifier(Modifier::BOLD),
                            ),
                        ]),
                        _ => Line::from(vec![
                            marker,
                            Span::styled(ship.name.clone(), Style::default().fg(Color::White)),
                            Span::styled(
                                format!("  {}", ship.status),
                                Style::default().fg(status_color(ship)),
                            ),
                        ]),
                    };
                    ListItem::new(line)
                })
                .collect();

            let list = List::new(items)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(format!(" {} of {} ", visible.len(), ships.len()))
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
        }

        let help = if self.rename.is_some() {
            vec![
                Span::styled(" Enter ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
                Span::raw("Save name  "),
                Span::styled(" Esc ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
                Span::raw("Discard"),
            ]
        } else {
            vec![
                Span::styled(" Enter ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
                Span::raw("Select  "),
                Span::styled(" F2 ", Style::default().fg(Color::Cyan)),
                Span::raw("Rename  "),
                Span::styled(" Del ", Style::default().fg(Color::Red)),
                Span::raw("Delete  "),
                Span::styled(" ^N ", Style::default().fg(Color::Cyan)),
                Span::raw("New  "),
                Span::styled(" Esc ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
                Span::raw("Close"),
            ]
        };
        let help = Paragraph::new(Line::from(help)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(help, chunks[2]);
    }
}

pub fn status_color(ship: &Ship) -> Color {
    use crate::model::ship::ShipStatus;
    match ship.status {
        ShipStatus::Operational => Color::Green,
        ShipStatus::InTransit => Color::Cyan,
        ShipStatus::AtPort => Color::Blue,
        ShipStatus::MaintenanceRequired => Color::Red,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ship::ShipStatus;

    fn ship(id: EntityId, name: &str) -> Ship {
        Ship {
            id,
            name: name.to_string(),
            status: ShipStatus::AtPort,
            latitude: 0.0,
            longitude: 0.0,
            speed: 0.0,
            captain: String::new(),
            ship_type: String::new(),
            imo: String::new(),
            true_imo: String::new(),
            flag: String::new(),
            built_year: 2020,
        }
    }

    fn fleet() -> Vec<Ship> {
        vec![ship(1, "Sao Mai"), ship(2, "Hai Au"), ship(3, "Bach Dang")]
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_filter_is_case_insensitive_and_idempotent() {
        let ships = fleet();
        let once: Vec<EntityId> = filter_ships(&ships, "HAI").iter().map(|s| s.id).collect();
        assert_eq!(once, vec![2]);

        let all = filter_ships(&ships, "a");
        assert_eq!(all.len(), 3);
        assert_eq!(filter_ships(&ships, "").len(), 3);
        assert!(filter_ships(&ships, "zzz").is_empty());
    }

    #[test]
    fn test_typing_filters_and_enter_selects() {
        let ships = fleet();
        let mut picker = ShipPicker::new();
        picker.open(&ships, Some(1));

        for c in "bach".chars() {
            picker.handle_key(key(KeyCode::Char(c)), &ships);
        }
        assert_eq!(
            picker.handle_key(key(KeyCode::Enter), &ships),
            Some(Action::SelectShip(3))
        );
    }

    #[test]
    fn test_rename_commits_on_enter_only_when_non_empty() {
        let ships = fleet();
        let mut picker = ShipPicker::new();
        picker.open(&ships, Some(1));

        picker.handle_key(key(KeyCode::F(2)), &ships);
        for _ in 0.."Sao Mai".len() {
            picker.handle_key(key(KeyCode::Backspace), &ships);
        }
        picker.handle_key(key(KeyCode::Char(' ')), &ships);
        assert_eq!(picker.handle_key(key(KeyCode::Enter), &ships), None);
        assert!(picker.rename().is_none());

        picker.handle_key(ctrl('r'), &ships);
        picker.handle_key(key(KeyCode::Char('!')), &ships);
        assert_eq!(
            picker.handle_key(key(KeyCode::Enter), &ships),
            Some(Action::UpdateShip(1, ShipPatch::rename("Sao Mai!")))
        );
    }

    #[test]
    fn test_rename_commits_on_blur_and_esc_discards() {
        let ships = fleet();
        let mut picker = ShipPicker::new();
        picker.open(&ships, Some(1));

        picker.handle_key(key(KeyCode::F(2)), &ships);
        picker.handle_key(key(KeyCode::Char('2')), &ships);
        assert_eq!(
            picker.handle_key(key(KeyCode::Down), &ships),
            Some(Action::UpdateShip(1, ShipPatch::rename("Sao Mai2")))
        );
        assert_eq!(picker.highlighted(&ships).map(|s| s.id), Some(2));

        picker.handle_key(key(KeyCode::F(2)), &ships);
        picker.handle_key(key(KeyCode::Char('x')), &ships);
        assert_eq!(picker.handle_key(key(KeyCode::Esc), &ships), None);
        assert!(picker.rename().is_none());
        // Esc outside a rename closes the picker
        assert_eq!(
            picker.handle_key(key(KeyCode::Esc), &ships),
            Some(Action::CloseModal)
        );
    }

    #[test]
    fn test_single_rename_at_a_time() {
        let ships = fleet();
        let mut picker = ShipPicker::new();
        picker.open(&ships, Some(1));

        picker.handle_key(key(KeyCode::F(2)), &ships);
        assert_eq!(picker.rename().map(|r| r.ship_id), Some(1));
        // Moving away ends the first rename; an unchanged name sends nothing
        assert_eq!(picker.handle_key(key(KeyCode::Down), &ships), None);
        assert!(picker.rename().is_none());

        picker.handle_key(key(KeyCode::F(2)), &ships);
        assert_eq!(picker.rename().map(|r| r.ship_id), Some(2));
    }

    #[test]
    fn test_delete_and_new_entry_points() {
        let ships = fleet();
        let mut picker = ShipPicker::new();
        picker.open(&ships, Some(2));

        assert_eq!(
            picker.handle_key(key(KeyCode::Delete), &ships),
            Some(Action::RequestDeleteShip(2))
        );
        assert_eq!(picker.handle_key(ctrl('n'), &ships), Some(Action::OpenAddShip));
    }

    #[test]
    fn test_sync_drops_rename_of_deleted_ship() {
        let mut ships = fleet();
        let mut picker = ShipPicker::new();
        picker.open(&ships, Some(3));
        picker.handle_key(key(KeyCode::F(2)), &ships);

        ships.retain(|s| s.id != 3);
        picker.sync(&ships);

        assert!(picker.rename().is_none());
        assert_eq!(picker.highlighted(&ships).map(|s| s.id), Some(2));
    }
}
