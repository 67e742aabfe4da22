//! Overview tab: key metrics, ship details and a map

use crate::action::Action;
use crate::components::form_view::{handle_form_key, render_form, FormEvent};
use crate::components::ship_picker::status_color;
use crate::components::table::money;
use crate::model::details::ShipDetails;
use crate::model::form::Form;
use crate::model::map::MapView;
use crate::model::ship::{Ship, ShipPatch, ShipStatus};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Map, MapResolution, Points},
        Block, Borders, Paragraph,
    },
    Frame,
};

#[derive(Debug, Default)]
pub struct OverviewPanel {
    /// Ship as it was when last synced
    shown: Option<Ship>,
    form: Option<Form>,
    pub map: MapView,
}

fn edit_form(ship: &Ship) -> Form {
    let statuses = ShipStatus::all()
        .iter()
        .map(|s| s.label().to_string())
        .collect();
    Form::new(format!("Edit {}", ship.name))
        .choice("status", "Status", statuses, ship.status.label())
        .decimal("latitude", "Latitude", ship.latitude)
        .decimal("longitude", "Longitude", ship.longitude)
        .text("type", "Type", &ship.ship_type)
        .text("captain", "Captain", &ship.captain)
        .text("mmsi", "MMSI", &ship.imo)
        .text("imo", "IMO number", &ship.true_imo)
        .text("flag", "Flag", &ship.flag)
        .integer("built", "Built year", i64::from(ship.built_year))
}

/// Every edited field in one patch
fn patch_from(form: &Form) -> ShipPatch {
    ShipPatch {
        name: None,
        status: ShipStatus::from_label(form.value("status")),
        latitude: Some(form.get_decimal("latitude")),
        longitude: Some(form.get_decimal("longitude")),
        speed: None,
        captain: Some(form.string("captain")),
        ship_type: Some(form.string("type")),
        imo: Some(form.string("mmsi")),
        true_imo: Some(form.string("imo")),
        flag: Some(form.string("flag")),
        built_year: Some(form.get_integer("built").clamp(0, i64::from(i32::MAX)) as i32),
    }
}

impl OverviewPanel {
    pub fn is_editing(&self) -> bool {
        self.form.is_some()
    }

    /// Edit mode does not survive a change of ship or of its data
    pub fn sync(&mut self, ship: Option<&Ship>) {
        if self.shown.as_ref() != ship {
            self.shown = ship.cloned();
            self.form = None;
        }
        if ship.is_none() {
            self.map.release();
        }
    }

    /// Called when another tab becomes active
    pub fn leave(&mut self) {
        self.map.release();
    }

    pub fn handle_key(&mut self, key: KeyEvent, ship: &Ship) -> Option<Action> {
        if let Some(form) = self.form.as_mut() {
            return match handle_form_key(form, key) {
                FormEvent::Submit => {
                    let patch = patch_from(form);
                    self.form = None;
                    Some(Action::UpdateShip(ship.id, patch))
                }
                FormEvent::Cancel => {
                    self.form = None;
                    None
                }
                FormEvent::Edited => None,
            };
        }

        match key.code {
            KeyCode::Char('e') => {
                self.map.release();
                self.form = Some(edit_form(ship));
            }
            KeyCode::Char('+') | KeyCode::Char('=') => self.map.zoom_in(),
            KeyCode::Char('-') => self.map.zoom_out(),
            _ => {}
        }
        None
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, details: &ShipDetails) {
        let ship = details.ship;
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(42), Constraint::Percentage(58)])
            .split(area);
        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(10), Constraint::Min(0)])
            .split(columns[0]);

        render_metrics(frame, left[0], details);
        render_details(frame, left[1], ship);

        match &self.form {
            Some(form) => render_form(frame, columns[1], form),
            None => self.render_map(frame, columns[1], ship),
        }
    }

    fn render_map(&mut self, frame: &mut Frame, area: Rect, ship: &Ship) {
        let viewport = self.map.show(ship).clone();
        let (x_bounds, y_bounds) = viewport.bounds();
        let Some(marker) = viewport.marker else {
            return;
        };

        let canvas = Canvas::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" Map · zoom {} ", viewport.zoom))
                    .border_style(Style::default().fg(Color::DarkGray)),
            )
            .marker(Marker::Braille)
            .x_bounds(x_bounds)
            .y_bounds(y_bounds)
            .paint(|ctx| {
                ctx.draw(&Map {
                    color: Color::DarkGray,
                    resolution: MapResolution::High,
                });
                ctx.layer();
                ctx.draw(&Points {
                    coords: &[(marker.longitude, marker.latitude)],
                    color: Color::Red,
                });
                ctx.print(
                    marker.longitude,
                    marker.latitude,
                    Line::from(vec![
                        Span::styled(
                            format!(" {}", marker.name),
                            Style::default()
                                .fg(Color::Yellow)
                                .add_modifier(Modifier::BOLD),
                        ),
                        Span::styled(
                            format!(" {}", marker.speed_label),
                            Style::default().fg(Color::White),
                        ),
                    ]),
                );
            });
        frame.render_widget(canvas, area);
    }
}

fn metric(label: &str, value: String, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<12}", label), Style::default().fg(Color::DarkGray)),
        Span::styled(value, Style::default().fg(color).add_modifier(Modifier::BOLD)),
    ])
}

fn render_metrics(frame: &mut Frame, area: Rect, details: &ShipDetails) {
    let ship = details.ship;
    let lines = vec![
        metric("Status", ship.status.label().to_string(), status_color(ship)),
        metric("Speed", ship.speed_label(), Color::White),
        metric("Captain", ship.captain.clone(), Color::White),
        metric("Position", ship.position_label(), Color::White),
        metric(
            "Spend",
            format!(
                "{} costs · {} fuel",
                money(details.total_cost()),
                money(details.total_fuel_spend())
            ),
            Color::Yellow,
        ),
        metric(
            "Sailed",
            format!(
                "{:.0} nm over {} voyages",
                details.total_distance_nm(),
                details.voyages.len()
            ),
            Color::White,
        ),
        metric(
            "Bunkered",
            format!("{:.1} t", details.total_fuel_tons()),
            Color::White,
        ),
        metric(
            "Open jobs",
            details.open_maintenance().to_string(),
            if details.open_maintenance() > 0 {
                Color::Red
            } else {
                Color::Green
            },
        ),
    ];
    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Key metrics ")
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(paragraph, area);
}

fn render_details(frame: &mut Frame, area: Rect, ship: &Ship) {
    let or_dash = |s: &str| {
        if s.is_empty() {
            "—".to_string()
        } else {
            s.to_string()
        }
    };
    let lines = vec![
        metric("Type", or_dash(&ship.ship_type), Color::White),
        metric("MMSI", or_dash(&ship.imo), Color::White),
        metric("IMO", or_dash(&ship.true_imo), Color::White),
        metric("Flag", or_dash(&ship.flag), Color::White),
        metric("Built", ship.built_year.to_string(), Color::White),
        Line::from(""),
        Line::from(Span::styled(
            "e edit · +/- zoom map",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Details ")
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::entity::EntityId;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ship(id: EntityId) -> Ship {
        Ship {
            id,
            name: "Sao Mai".to_string(),
            status: ShipStatus::InTransit,
            latitude: 12.5,
            longitude: 109.2,
            speed: 11.0,
            captain: "Tran Van Minh".to_string(),
            ship_type: "Container".to_string(),
            imo: "574000111".to_string(),
            true_imo: "9321483".to_string(),
            flag: "Vietnam".to_string(),
            built_year: 2011,
        }
    }

    #[test]
    fn test_save_sends_every_field() {
        let ship = ship(1);
        let mut panel = OverviewPanel::default();
        panel.sync(Some(&ship));

        panel.handle_key(key(KeyCode::Char('e')), &ship);
        assert!(panel.is_editing());
        panel.handle_key(key(KeyCode::Right), &ship);

        let action = panel.handle_key(key(KeyCode::Enter), &ship);
        let expected = ShipPatch {
            name: None,
            status: Some(ShipStatus::AtPort),
            latitude: Some(12.5),
            longitude: Some(109.2),
            speed: None,
            captain: Some("Tran Van Minh".to_string()),
            ship_type: Some("Container".to_string()),
            imo: Some("574000111".to_string()),
            true_imo: Some("9321483".to_string()),
            flag: Some("Vietnam".to_string()),
            built_year: Some(2011),
        };
        assert_eq!(action, Some(Action::UpdateShip(1, expected)));
        assert!(!panel.is_editing());
    }

    #[test]
    fn test_editing_releases_map_and_resets_on_ship_change() {
        let ship = ship(1);
        let mut panel = OverviewPanel::default();
        panel.sync(Some(&ship));
        panel.map.show(&ship);

        panel.handle_key(key(KeyCode::Char('e')), &ship);
        assert!(!panel.map.is_active());

        panel.sync(Some(&Ship { id: 2, ..ship.clone() }));
        assert!(!panel.is_editing());

        panel.handle_key(key(KeyCode::Char('e')), &ship);
        assert_eq!(panel.handle_key(key(KeyCode::Esc), &ship), None);
        assert!(!panel.is_editing());
    }

    #[test]
    fn test_edit_form_resets_when_ship_data_changes() {
        let ship = ship(1);
        let mut panel = OverviewPanel::default();
        panel.sync(Some(&ship));
        panel.handle_key(key(KeyCode::Char('e')), &ship);

        // Unchanged data keeps the form open
        panel.sync(Some(&ship.clone()));
        assert!(panel.is_editing());

        let moved = Ship {
            latitude: 10.1,
            ..ship.clone()
        };
        panel.sync(Some(&moved));
        assert!(!panel.is_editing());
    }

    #[test]
    fn test_zoom_keys() {
        let ship = ship(1);
        let mut panel = OverviewPanel::default();
        let start = panel.map.zoom();
        panel.handle_key(key(KeyCode::Char('+')), &ship);
        panel.handle_key(key(KeyCode::Char('+')), &ship);
        panel.handle_key(key(KeyCode::Char('-')), &ship);
        assert_eq!(panel.map.zoom(), start + 1);
    }
}
