//! Generic list + inline form panel for one kind of child record
//!
//! Each tab that shows records (trips, voyages, fuel, costs, maintenance)
//! wraps one or more `RecordPanel`s. A panel browses the rows of the
//! selected ship and can hold a single add or edit form at a time.

use crate::action::Action;
use crate::components::form_view::{handle_form_key, render_form, FormEvent};
use crate::components::layout::split_list_and_side;
use crate::components::table::{column_widths, header_line, row_line};
use crate::model::entity::{Entity, EntityId, ShipOwned};
use crate::model::form::{Form, NONE_CHOICE};
use crate::model::records::{RecordDraft, RecordKind, RecordPatch, Trip};
use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use std::marker::PhantomData;

/// Read-only data a panel needs besides its own rows
pub struct PanelContext<'a> {
    pub categories: &'a [String],
    pub trips: &'a [&'a Trip],
    pub today: NaiveDate,
}

impl PanelContext<'_> {
    /// Choice options for a trip reference, placeholder first
    pub fn trip_options(&self) -> Vec<String> {
        std::iter::once(NONE_CHOICE.to_string())
            .chain(self.trips.iter().map(|t| trip_option(t)))
            .collect()
    }

    pub fn trip_choice(&self, trip_id: Option<EntityId>) -> String {
        trip_id
            .and_then(|id| self.trips.iter().find(|t| t.id == id))
            .map(|t| trip_option(t))
            .unwrap_or_else(|| NONE_CHOICE.to_string())
    }

    /// "#id name" for a trip reference, "—" when unset or unknown
    pub fn trip_label(&self, trip_id: Option<EntityId>) -> String {
        self.trip_choice(trip_id)
    }
}

fn trip_option(trip: &Trip) -> String {
    format!("#{} {}", trip.id, trip.name)
}

/// Inverse of the trip option format
pub fn parse_trip_choice(value: Option<&str>) -> Option<EntityId> {
    value?
        .strip_prefix('#')?
        .split_whitespace()
        .next()?
        .parse()
        .ok()
}

/// How a record type is listed and edited
pub trait PanelRecord: Entity + ShipOwned {
    const KIND: RecordKind;
    const TITLE: &'static str;

    fn headers() -> &'static [&'static str];
    fn cells(&self, ctx: &PanelContext) -> Vec<String>;
    /// Short description used in delete prompts
    fn label(&self) -> String;
    fn new_form(ctx: &PanelContext) -> Form;
    fn edit_form(&self, ctx: &PanelContext) -> Form;
    fn draft(form: &Form, ship_id: EntityId, ctx: &PanelContext) -> RecordDraft;
    fn patch(form: &Form, id: EntityId, ctx: &PanelContext) -> RecordPatch;
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelMode {
    Browse,
    Adding(Form),
    Editing(EntityId, Form),
}

pub struct RecordPanel<T: PanelRecord> {
    ship_id: Option<EntityId>,
    ids: Vec<EntityId>,
    pub list_state: ListState,
    mode: PanelMode,
    _record: PhantomData<fn() -> T>,
}

impl<T: PanelRecord> Default for RecordPanel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PanelRecord> RecordPanel<T> {
    pub fn new() -> Self {
        Self {
            ship_id: None,
            ids: Vec::new(),
            list_state: ListState::default(),
            mode: PanelMode::Browse,
            _record: PhantomData,
        }
    }

    #[cfg(test)]
    pub fn mode(&self) -> &PanelMode {
        &self.mode
    }

    /// True while a form is open and should receive every key
    pub fn is_editing(&self) -> bool {
        self.mode != PanelMode::Browse
    }

    pub fn selected_id(&self) -> Option<EntityId> {
        self.list_state.selected().and_then(|i| self.ids.get(i).copied())
    }

    /// Align with the rows currently shown
    ///
    /// A different ship resets the panel; an edit form whose record is gone
    /// is dropped.
    pub fn sync(&mut self, ship_id: Option<EntityId>, rows: &[&T]) {
        if ship_id != self.ship_id {
            self.ship_id = ship_id;
            self.mode = PanelMode::Browse;
            self.list_state.select(None);
        }
        self.ids = rows.iter().map(|r| r.id()).collect();

        if let PanelMode::Editing(id, _) = &self.mode {
            if !self.ids.contains(id) {
                self.mode = PanelMode::Browse;
            }
        }

        let selected = match (self.list_state.selected(), self.ids.len()) {
            (_, 0) => None,
            (Some(i), len) => Some(i.min(len - 1)),
            (None, _) => Some(0),
        };
        self.list_state.select(selected);
    }

    fn move_selection(&mut self, forward: bool) {
        if self.ids.is_empty() {
            return;
        }
        let len = self.ids.len();
        let current = self.list_state.selected().unwrap_or(0);
        let next = if forward {
            (current + 1) % len
        } else {
            current.checked_sub(1).unwrap_or(len - 1)
        };
        self.list_state.select(Some(next));
    }

    pub fn handle_key(&mut self, key: KeyEvent, rows: &[&T], ctx: &PanelContext) -> Option<Action> {
        match &mut self.mode {
            PanelMode::Adding(form) => {
                return match handle_form_key(form, key) {
                    FormEvent::Submit => {
                        let action = self
                            .ship_id
                            .map(|ship_id| Action::AddRecord(T::draft(form, ship_id, ctx)));
                        self.mode = PanelMode::Browse;
                        action
                    }
                    FormEvent::Cancel => {
                        self.mode = PanelMode::Browse;
                        None
                    }
                    FormEvent::Edited => None,
                };
            }
            PanelMode::Editing(id, form) => {
                return match handle_form_key(form, key) {
                    FormEvent::Submit => {
                        let action = Action::UpdateRecord(T::patch(form, *id, ctx));
                        self.mode = PanelMode::Browse;
                        Some(action)
                    }
                    FormEvent::Cancel => {
                        self.mode = PanelMode::Browse;
                        None
                    }
                    FormEvent::Edited => None,
                };
            }
            PanelMode::Browse => {}
        }

        let selected = self
            .selected_id()
            .and_then(|id| rows.iter().find(|r| r.id() == id).copied());

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_selection(true);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selection(false);
                None
            }
            KeyCode::Char('a') if self.ship_id.is_some() => {
                self.mode = PanelMode::Adding(T::new_form(ctx));
                None
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(record) = selected {
                    self.mode = PanelMode::Editing(record.id(), record.edit_form(ctx));
                }
                None
            }
            KeyCode::Char('d') | KeyCode::Delete => selected.map(|record| Action::RequestDeleteRecord {
                kind: T::KIND,
                id: record.id(),
                label: record.label(),
            }),
            _ => None,
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, rows: &[&T], ctx: &PanelContext, focused: bool) {
        let (list_area, form_area) = if self.is_editing() {
            let (list, side) = split_list_and_side(area, 45);
            (list, Some(side))
        } else {
            (area, None)
        };

        let border = if focused { Color::Cyan } else { Color::DarkGray };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ({}) ", T::TITLE, rows.len()))
            .border_style(Style::default().fg(border));
        let inner = block.inner(list_area);
        frame.render_widget(block, list_area);

        if rows.is_empty() {
            let empty = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    format!("No {} recorded yet", T::KIND.noun()),
                    Style::default().fg(Color::Yellow),
                )),
                Line::from(Span::styled(
                    "Press a to add one",
                    Style::default().fg(Color::DarkGray),
                )),
            ])
            .alignment(ratatui::layout::Alignment::Center);
            frame.render_widget(empty, inner);
        } else {
            let cells: Vec<Vec<String>> = rows.iter().map(|r| r.cells(ctx)).collect();
            let widths = column_widths(T::headers(), &cells);

            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(1), Constraint::Min(0)])
                .split(inner);

            frame.render_widget(
                Paragraph::new(header_line(T::headers(), &widths)),
                chunks[0],
            );

            let items: Vec<ListItem> = cells
                .iter()
                .map(|row| ListItem::new(row_line(row, &widths)))
                .collect();
            let list = List::new(items)
                .highlight_style(
                    Style::default()
                        .bg(Color::Blue)
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol("▶ ");
            frame.render_stateful_widget(list, chunks[1], &mut self.list_state);
        }

        if let Some(form_area) = form_area {
            match &self.mode {
                PanelMode::Adding(form) | PanelMode::Editing(_, form) => {
                    render_form(frame, form_area, form)
                }
                PanelMode::Browse => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::records::{FuelLog, FuelLogPatch};
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn log(id: EntityId, ship_id: EntityId) -> FuelLog {
        FuelLog {
            id,
            ship_id,
            date: NaiveDate::from_ymd_opt(2024, 1, id as u32).unwrap(),
            fuel_type: "MGO".to_string(),
            quantity_tons: 10.0,
            unit_price: 700.0,
            port: "Vung Tau".to_string(),
        }
    }

    fn ctx() -> PanelContext<'static> {
        PanelContext {
            categories: &[],
            trips: &[],
            today: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        }
    }

    #[test]
    fn test_parse_trip_choice() {
        assert_eq!(parse_trip_choice(Some("#12 Spring run")), Some(12));
        assert_eq!(parse_trip_choice(Some(NONE_CHOICE)), None);
        assert_eq!(parse_trip_choice(None), None);
    }

    #[test]
    fn test_edit_submits_patch_for_selected_row() {
        let rows = [log(1, 7), log(2, 7)];
        let refs: Vec<&FuelLog> = rows.iter().collect();
        let mut panel: RecordPanel<FuelLog> = RecordPanel::new();
        panel.sync(Some(7), &refs);

        panel.handle_key(key(KeyCode::Char('j')), &refs, &ctx());
        panel.handle_key(key(KeyCode::Char('e')), &refs, &ctx());
        assert!(matches!(panel.mode(), PanelMode::Editing(2, _)));

        let action = panel.handle_key(key(KeyCode::Enter), &refs, &ctx());
        match action {
            Some(Action::UpdateRecord(RecordPatch::FuelLog(2, FuelLogPatch { quantity_tons, .. }))) => {
                assert_eq!(quantity_tons, Some(10.0));
            }
            other => panic!("unexpected action {:?}", other),
        }
        assert!(!panel.is_editing());
    }

    #[test]
    fn test_add_form_builds_draft_for_current_ship() {
        let mut panel: RecordPanel<FuelLog> = RecordPanel::new();
        panel.sync(Some(3), &[]);

        panel.handle_key(key(KeyCode::Char('a')), &[], &ctx());
        assert!(panel.is_editing());
        let action = panel.handle_key(key(KeyCode::Enter), &[], &ctx());

        match action {
            Some(Action::AddRecord(RecordDraft::FuelLog(draft))) => {
                assert_eq!(draft.ship_id, 3);
                assert_eq!(draft.date, ctx().today);
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_open_form_cancelled_on_ship_change_or_missing_record() {
        let rows = [log(1, 7)];
        let refs: Vec<&FuelLog> = rows.iter().collect();
        let mut panel: RecordPanel<FuelLog> = RecordPanel::new();
        panel.sync(Some(7), &refs);
        panel.handle_key(key(KeyCode::Char('e')), &refs, &ctx());
        assert!(panel.is_editing());

        panel.sync(Some(7), &[]);
        assert!(!panel.is_editing());

        panel.handle_key(key(KeyCode::Char('a')), &[], &ctx());
        panel.sync(Some(8), &[]);
        assert!(!panel.is_editing());
    }

    #[test]
    fn test_delete_requests_confirmation() {
        let rows = [log(4, 7)];
        let refs: Vec<&FuelLog> = rows.iter().collect();
        let mut panel: RecordPanel<FuelLog> = RecordPanel::new();
        panel.sync(Some(7), &refs);

        let action = panel.handle_key(key(KeyCode::Char('d')), &refs, &ctx());

        assert!(matches!(
            action,
            Some(Action::RequestDeleteRecord { kind: RecordKind::FuelLog, id: 4, .. })
        ));
    }
}
