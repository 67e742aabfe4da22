//! Voyages tab: trips and the voyages sailed under them

use crate::action::Action;
use crate::components::record_panel::{PanelContext, RecordPanel};
use crate::model::details::ShipDetails;
use crate::model::entity::EntityId;
use crate::model::records::{Trip, Voyage};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoyageSection {
    #[default]
    Trips,
    Voyages,
}

#[derive(Default)]
pub struct VoyagePanel {
    pub section: VoyageSection,
    pub trips: RecordPanel<Trip>,
    pub voyages: RecordPanel<Voyage>,
}

impl VoyagePanel {
    pub fn is_editing(&self) -> bool {
        self.trips.is_editing() || self.voyages.is_editing()
    }

    pub fn sync(&mut self, ship_id: Option<EntityId>, details: Option<&ShipDetails>) {
        match details {
            Some(d) => {
                self.trips.sync(ship_id, &d.trips);
                self.voyages.sync(ship_id, &d.voyages);
            }
            None => {
                self.trips.sync(None, &[]);
                self.voyages.sync(None, &[]);
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, details: &ShipDetails, ctx: &PanelContext) -> Option<Action> {
        if !self.is_editing() {
            match key.code {
                KeyCode::Left | KeyCode::Char('h') => {
                    self.section = VoyageSection::Trips;
                    return None;
                }
                KeyCode::Right | KeyCode::Char('l') => {
                    self.section = VoyageSection::Voyages;
                    return None;
                }
                _ => {}
            }
        }
        match self.section {
            VoyageSection::Trips => self.trips.handle_key(key, &details.trips, ctx),
            VoyageSection::Voyages => self.voyages.handle_key(key, &details.voyages, ctx),
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, details: &ShipDetails, ctx: &PanelContext) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(area);
        let focus = self.section;
        self.trips
            .render(frame, chunks[0], &details.trips, ctx, focus == VoyageSection::Trips);
        self.voyages
            .render(frame, chunks[1], &details.voyages, ctx, focus == VoyageSection::Voyages);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::records::RecordDraft;
    use crate::model::ship::{NewShip, ShipDefaults};
    use crate::model::store::{FleetSnapshot, FleetStore};
    use chrono::NaiveDate;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_arrows_switch_section_and_route_keys() {
        let mut store = FleetStore::loaded(ShipDefaults::default(), FleetSnapshot::empty());
        let ship_id = store
            .add_ship(NewShip {
                name: "Hai Au".to_string(),
                ..NewShip::default()
            })
            .unwrap();
        let details = store.details(ship_id).unwrap();
        let ctx = PanelContext {
            categories: details.categories,
            trips: &details.trips,
            today: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        };

        let mut panel = VoyagePanel::default();
        panel.sync(Some(ship_id), Some(&details));

        panel.handle_key(key(KeyCode::Right), &details, &ctx);
        assert_eq!(panel.section, VoyageSection::Voyages);

        panel.handle_key(key(KeyCode::Char('a')), &details, &ctx);
        assert!(panel.voyages.is_editing());
        assert!(!panel.trips.is_editing());

        // Arrows belong to the form while it is open
        panel.handle_key(key(KeyCode::Left), &details, &ctx);
        assert_eq!(panel.section, VoyageSection::Voyages);

        let action = panel.handle_key(key(KeyCode::Enter), &details, &ctx);
        match action {
            Some(Action::AddRecord(RecordDraft::Voyage(draft))) => {
                assert_eq!(draft.ship_id, ship_id);
                assert_eq!(draft.trip_id, None);
            }
            other => panic!("unexpected action {:?}", other),
        }
    }
}
