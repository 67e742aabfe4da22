//! Detail view of the selected ship
//!
//! Draws the tab bar and routes keys and rendering to the active tab's
//! panel. Panels keep their own add/edit state; `sync` is called after every
//! store change so they drop forms that no longer apply.

use crate::action::Action;
use crate::components::cost_panel::CostPanel;
use crate::components::overview::OverviewPanel;
use crate::components::record_panel::{PanelContext, RecordPanel};
use crate::components::voyage_panel::VoyagePanel;
use crate::model::details::ShipDetails;
use crate::model::entity::EntityId;
use crate::model::records::{FuelLog, MaintenanceRecord};
use crate::model::ui::Tab;
use chrono::NaiveDate;
use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Tabs},
    Frame,
};

#[derive(Default)]
pub struct ShipDetailsView {
    pub overview: OverviewPanel,
    pub voyages: VoyagePanel,
    pub fuel: RecordPanel<FuelLog>,
    pub costs: CostPanel,
    pub maintenance: RecordPanel<MaintenanceRecord>,
}

fn context<'a>(details: &'a ShipDetails, today: NaiveDate) -> PanelContext<'a> {
    PanelContext {
        categories: details.categories,
        trips: &details.trips,
        today,
    }
}

impl ShipDetailsView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Align every panel with the current ship and its records
    pub fn sync(&mut self, ship_id: Option<EntityId>, details: Option<&ShipDetails>) {
        self.overview.sync(details.map(|d| d.ship));
        self.voyages.sync(ship_id, details);
        self.costs.sync(ship_id, details);
        match details {
            Some(d) => {
                self.fuel.sync(ship_id, &d.fuel_logs);
                self.maintenance.sync(ship_id, &d.maintenance);
            }
            None => {
                self.fuel.sync(None, &[]);
                self.maintenance.sync(None, &[]);
            }
        }
    }

    /// True while the active tab has a form open; it then gets every key
    pub fn is_capturing(&self, tab: Tab) -> bool {
        match tab {
            Tab::Overview => self.overview.is_editing(),
            Tab::Voyage => self.voyages.is_editing(),
            Tab::Fuel => self.fuel.is_editing(),
            Tab::Costs => self.costs.is_editing(),
            Tab::Maintenance => self.maintenance.is_editing(),
        }
    }

    pub fn tab_changed(&mut self, from: Tab, to: Tab) {
        if from == Tab::Overview && to != Tab::Overview {
            self.overview.leave();
        }
    }

    pub fn handle_key(
        &mut self,
        key: KeyEvent,
        tab: Tab,
        details: &ShipDetails,
        today: NaiveDate,
    ) -> Option<Action> {
        let ctx = context(details, today);
        match tab {
            Tab::Overview => self.overview.handle_key(key, details.ship),
            Tab::Voyage => self.voyages.handle_key(key, details, &ctx),
            Tab::Fuel => self.fuel.handle_key(key, &details.fuel_logs, &ctx),
            Tab::Costs => self.costs.handle_key(key, details, &ctx),
            Tab::Maintenance => self.maintenance.handle_key(key, &details.maintenance, &ctx),
        }
    }

    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        tab: Tab,
        details: &ShipDetails,
        today: NaiveDate,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(0)])
            .split(area);

        render_tabs(frame, chunks[0], tab);

        let ctx = context(details, today);
        let body = chunks[1];
        match tab {
            Tab::Overview => self.overview.render(frame, body, details),
            Tab::Voyage => self.voyages.render(frame, body, details, &ctx),
            Tab::Fuel => self.fuel.render(frame, body, &details.fuel_logs, &ctx, true),
            Tab::Costs => self.costs.render(frame, body, details, &ctx),
            Tab::Maintenance => {
                self.maintenance
                    .render(frame, body, &details.maintenance, &ctx, true)
            }
        }
    }
}

fn render_tabs(frame: &mut Frame, area: Rect, active: Tab) {
    let all_tabs = Tab::all();
    let titles: Vec<Line> = all_tabs
        .iter()
        .enumerate()
        .map(|(i, t)| Line::from(format!("{} {}", i + 1, t.name())))
        .collect();
    let selected = all_tabs.iter().position(|t| *t == active).unwrap_or(0);

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::BOTTOM))
        .select(selected)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}
