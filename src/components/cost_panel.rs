//! Costs tab: cost list and totals by category

use crate::action::Action;
use crate::components::record_panel::{PanelContext, RecordPanel};
use crate::components::layout::text_width;
use crate::components::table::money;
use crate::model::details::ShipDetails;
use crate::model::entity::EntityId;
use crate::model::records::Cost;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

#[derive(Default)]
pub struct CostPanel {
    pub costs: RecordPanel<Cost>,
}

impl CostPanel {
    pub fn is_editing(&self) -> bool {
        self.costs.is_editing()
    }

    pub fn sync(&mut self, ship_id: Option<EntityId>, details: Option<&ShipDetails>) {
        let rows = details.map(|d| d.costs.as_slice()).unwrap_or(&[]);
        self.costs.sync(ship_id, rows);
    }

    pub fn handle_key(&mut self, key: KeyEvent, details: &ShipDetails, ctx: &PanelContext) -> Option<Action> {
        if !self.is_editing() && key.code == KeyCode::Char('c') {
            return Some(Action::OpenCostCategories);
        }
        self.costs.handle_key(key, &details.costs, ctx)
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, details: &ShipDetails, ctx: &PanelContext) {
        let by_category = details.cost_by_category();
        let summary_width = by_category
            .iter()
            .map(|(name, _)| text_width(name).saturating_add(18))
            .max()
            .unwrap_or(24)
            .clamp(28, 44);

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(summary_width)])
            .split(area);

        self.costs.render(frame, chunks[0], &details.costs, ctx, true);

        let mut lines: Vec<Line> = by_category
            .iter()
            .map(|(name, total)| {
                Line::from(vec![
                    Span::styled(format!("{} ", name), Style::default().fg(Color::White)),
                    Span::styled(money(*total), Style::default().fg(Color::Yellow)),
                ])
            })
            .collect();
        if lines.is_empty() {
            lines.push(Line::from(Span::styled(
                "No costs",
                Style::default().fg(Color::DarkGray),
            )));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(
                "Total ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                money(details.total_cost()),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
        ]));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "c manage categories",
            Style::default().fg(Color::DarkGray),
        )));

        let summary = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" By category ")
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(summary, chunks[1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::store::FleetStore;
    use crate::services::persistence::demo_snapshot;
    use chrono::NaiveDate;
    use crossterm::event::KeyModifiers;

    #[test]
    fn test_c_opens_category_manager_unless_editing() {
        let snapshot = demo_snapshot(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        let store = FleetStore::loaded(Default::default(), snapshot);
        let ship_id = store.ships()[0].id;
        let details = store.details(ship_id).unwrap();
        let ctx = PanelContext {
            categories: details.categories,
            trips: &details.trips,
            today: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        };
        let key = |c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE);

        let mut panel = CostPanel::default();
        panel.sync(Some(ship_id), Some(&details));
        assert_eq!(
            panel.handle_key(key('c'), &details, &ctx),
            Some(Action::OpenCostCategories)
        );

        panel.handle_key(key('a'), &details, &ctx);
        assert!(panel.is_editing());
        // Goes to the open form instead
        assert_eq!(panel.handle_key(key('c'), &details, &ctx), None);
    }
}
