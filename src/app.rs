//! Root application component
//!
//! The App struct implements the Component trait, acting as the root component
//! that delegates event handling and rendering to child components.
//! App owns the fleet store; components never mutate it directly but send
//! Actions back up, which `update` applies.

use crate::action::Action;
use crate::component::Component;
use crate::components::{
    calculate_main_layout, render_empty_fleet, render_header, render_help_bar,
    render_status_line, AddShipDialog, CategoryDialog, ConfirmDialog, HeaderContext, HelpDialog,
    LoadingScreen, ShipDetailsView, ShipPicker,
};
use crate::model::modal::{Modal, ModalStack};
use crate::model::records::UNCATEGORIZED;
use crate::model::selection::SelectionController;
use crate::model::ship::ShipDefaults;
use crate::model::store::{FleetSnapshot, FleetStore};
use crate::model::ui::{AppMode, DetailTabs, Tab};
use crate::services::{export_ship, FleetLoader, FleetSource, LoadOutcome};
use anyhow::Result;
use chrono::{Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{layout::Rect, Frame};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Settings the app is started with
#[derive(Debug, Clone)]
pub struct AppOptions {
    pub autosave: bool,
    pub export_dir: PathBuf,
    pub ship_defaults: ShipDefaults,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            autosave: true,
            export_dir: PathBuf::from("exports"),
            ship_defaults: ShipDefaults::default(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// App Struct
// ═══════════════════════════════════════════════════════════════════════════════

/// Main application state - coordinates between components
pub struct App {
    /// Current application mode
    pub mode: AppMode,

    /// Every ship and record
    pub store: FleetStore,

    /// Ship shown in the detail view
    pub selection: SelectionController,

    /// Active detail tab
    pub tabs: DetailTabs,

    /// Modal overlay stack
    pub modals: ModalStack,

    /// Initial background load
    loader: FleetLoader,

    /// Where the fleet is loaded from and saved to
    source: Arc<dyn FleetSource>,

    /// Save after every successful mutation
    autosave: bool,

    /// Off when the initial load failed, so the unreadable data is kept
    saving_enabled: bool,

    /// Store revision last written to the source
    saved_revision: u64,

    export_dir: PathBuf,

    /// Flag to indicate the app should quit
    pub should_quit: bool,

    /// Error message to display
    pub error: Option<String>,

    /// Status message to display
    pub status_message: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Child Components
    // ─────────────────────────────────────────────────────────────────────────
    pub loading: LoadingScreen,
    pub details_view: ShipDetailsView,
    pub ship_picker: ShipPicker,
    pub add_ship_dialog: AddShipDialog,
    pub confirm_dialog: ConfirmDialog,
    pub category_dialog: CategoryDialog,
    pub help_dialog: HelpDialog,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

// ═══════════════════════════════════════════════════════════════════════════════
// App Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    pub fn new(source: Arc<dyn FleetSource>, options: AppOptions) -> App {
        let description = source.describe();
        App {
            mode: AppMode::Loading,
            store: FleetStore::new(options.ship_defaults),
            selection: SelectionController::new(),
            tabs: DetailTabs::default(),
            modals: ModalStack::new(),
            loader: FleetLoader::new(),
            source,
            autosave: options.autosave,
            saving_enabled: true,
            saved_revision: 0,
            export_dir: options.export_dir,
            should_quit: false,
            error: None,
            status_message: None,
            loading: LoadingScreen::new(description),
            details_view: ShipDetailsView::new(),
            ship_picker: ShipPicker::new(),
            add_ship_dialog: AddShipDialog::new(),
            confirm_dialog: ConfirmDialog::default(),
            category_dialog: CategoryDialog::new(),
            help_dialog: HelpDialog::default(),
        }
    }

    #[cfg(test)]
    pub fn saving_enabled(&self) -> bool {
        self.saving_enabled
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.store.revision() != self.saved_revision
    }

    /// Install the result of the background load and leave the loading screen
    fn apply_load(&mut self, outcome: LoadOutcome) {
        match outcome {
            LoadOutcome::Loaded(snapshot) => {
                let report = self.store.hydrate(snapshot);
                if !report.is_clean() {
                    self.status_message = Some(format!(
                        "Repaired data: {} duplicate ids, {} orphaned records, {} trip references",
                        report.duplicate_ids, report.orphaned_records, report.dangling_trip_refs
                    ));
                }
            }
            LoadOutcome::Failed(reason) => {
                self.store.hydrate(FleetSnapshot::empty());
                self.saving_enabled = false;
                self.error = Some(format!(
                    "Could not load {}: {} (saving disabled)",
                    self.source.describe(),
                    reason
                ));
            }
        }
        self.saved_revision = self.store.revision();
        self.mode = AppMode::Running;
        self.sync_views();
    }

    /// Reconcile the selection and let every view catch up with the store
    fn sync_views(&mut self) {
        if self.selection.reconcile(self.store.ships()) {
            debug!(selected = ?self.selection.active(), "Selection reconciled");
        }
        let ship_id = self.selection.active();
        let details = ship_id.and_then(|id| self.store.details(id));
        self.details_view.sync(ship_id, details.as_ref());
        self.ship_picker.sync(self.store.ships());
        self.category_dialog.sync(self.store.cost_categories());
    }

    /// Common tail of every store mutation
    fn after_mutation(&mut self, changed: bool) {
        if !changed {
            return;
        }
        self.sync_views();
        if self.autosave {
            self.persist(false);
        }
    }

    /// Write the snapshot to the source; `explicit` saves report back
    fn persist(&mut self, explicit: bool) {
        // An unloaded store would overwrite the file with an empty fleet
        if self.store.is_loading() {
            return;
        }
        if !self.saving_enabled {
            if explicit {
                self.error = Some("Saving is disabled because the data could not be loaded".to_string());
            }
            return;
        }
        if !explicit && !self.has_unsaved_changes() {
            return;
        }

        match self.source.save(&self.store.snapshot()) {
            Ok(()) => {
                self.saved_revision = self.store.revision();
                self.error = None;
                info!(revision = self.saved_revision, "Fleet saved");
                if explicit {
                    self.status_message = Some(format!("Saved to {}", self.source.describe()));
                }
            }
            Err(err) => {
                error!(error = %err, "Failed to save fleet");
                self.error = Some(format!("Save failed: {}", err));
            }
        }
    }

    fn push_confirm(&mut self, title: &str, message: &str, on_confirm: Action) {
        self.confirm_dialog.show(title, message);
        self.modals.push(Modal::confirm(title, message, on_confirm));
    }

    fn switch_tab(&mut self, change: impl FnOnce(&mut DetailTabs)) {
        let from = self.tabs.active();
        change(&mut self.tabs);
        self.details_view.tab_changed(from, self.tabs.active());
    }

    fn export_selected(&mut self) {
        let Some(details) = self.selection.active().and_then(|id| self.store.details(id)) else {
            return;
        };
        match export_ship(&details, &self.export_dir) {
            Ok(paths) => {
                self.error = None;
                self.status_message = Some(format!(
                    "Exported {} files to {}",
                    paths.len(),
                    self.export_dir.display()
                ));
            }
            Err(err) => {
                error!(error = %err, "Export failed");
                self.error = Some(format!("Export failed: {:#}", err));
            }
        }
    }

    #[cfg(test)]
    fn finish_loading(&mut self) {
        if let Some(outcome) = self.loader.wait() {
            self.apply_load(outcome);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl Component for App {
    fn init(&mut self) -> Result<()> {
        self.loading.init()?;
        self.loader.spawn(Arc::clone(&self.source));
        info!(source = %self.source.describe(), "Loading fleet");
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(Some(Action::ForceQuit));
        }

        match self.mode {
            AppMode::Loading => self.loading.handle_key_event(key),
            AppMode::Running => {
                if let Some(modal) = self.modals.top().cloned() {
                    return self.handle_modal_key_event(&modal, key);
                }
                self.status_message = None;
                self.handle_main_key_event(key)
            }
        }
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            // ─────────────────────────────────────────────────────────────────
            // App Lifecycle
            // ─────────────────────────────────────────────────────────────────
            Action::Tick => {
                self.loading.update(Action::Tick)?;
                if self.loader.is_pending() {
                    if let Some(outcome) = self.loader.poll() {
                        self.apply_load(outcome);
                    }
                }
            }
            Action::ForceQuit => {
                self.should_quit = true;
            }
            Action::Resize(_, _) => {}

            // ─────────────────────────────────────────────────────────────────
            // Navigation
            // ─────────────────────────────────────────────────────────────────
            Action::NextTab => self.switch_tab(DetailTabs::next),
            Action::PrevTab => self.switch_tab(DetailTabs::previous),
            Action::SelectTab(tab) => self.switch_tab(|tabs| tabs.set(tab)),

            // ─────────────────────────────────────────────────────────────────
            // Modals
            // ─────────────────────────────────────────────────────────────────
            Action::OpenQuitDialog => {
                self.modals.push(Modal::quit());
            }
            Action::OpenShipPicker => {
                self.ship_picker
                    .open(self.store.ships(), self.selection.active());
                self.modals.push(Modal::ShipPicker);
            }
            Action::OpenAddShip => {
                if self.modals.top() == Some(&Modal::ShipPicker) {
                    self.modals.pop();
                }
                self.add_ship_dialog.reset();
                self.modals.push(Modal::AddShip);
            }
            Action::OpenHelp => {
                self.help_dialog.scroll_offset = 0;
                self.modals.push(Modal::Help);
            }
            Action::OpenCostCategories => {
                self.category_dialog.open(self.store.cost_categories());
                self.modals.push(Modal::CostCategories);
            }
            Action::CloseModal => {
                self.modals.pop();
            }
            Action::ConfirmModal => {
                if let Some(Modal::Confirm { on_confirm, .. }) = self.modals.pop() {
                    return Ok(Some(*on_confirm));
                }
            }

            // ─────────────────────────────────────────────────────────────────
            // Ships
            // ─────────────────────────────────────────────────────────────────
            Action::SelectShip(id) => {
                if self.selection.select(id, self.store.ships()) {
                    debug!(ship_id = id, "Ship selected");
                }
                if self.modals.top() == Some(&Modal::ShipPicker) {
                    self.modals.pop();
                }
                self.sync_views();
            }
            Action::AddShip(draft) => {
                if self.modals.top() == Some(&Modal::AddShip) {
                    self.modals.pop();
                }
                let name = draft.name.clone();
                let added = self.store.add_ship(draft);
                if added.is_some() {
                    self.status_message = Some(format!("Added {}", name));
                }
                self.after_mutation(added.is_some());
            }
            Action::UpdateShip(id, patch) => {
                let updated = self.store.update_ship(id, patch);
                self.after_mutation(updated);
            }
            Action::RequestDeleteShip(id) => {
                if let Some(ship) = self.store.ship(id) {
                    let message = format!("Delete {} and all of its records?", ship.name);
                    self.push_confirm("Delete ship", &message, Action::DeleteShip(id));
                }
            }
            Action::DeleteShip(id) => {
                let name = self.store.ship(id).map(|s| s.name.clone());
                let deleted = self.store.delete_ship(id);
                if let (true, Some(name)) = (deleted, name) {
                    self.status_message = Some(format!("Deleted {}", name));
                }
                self.after_mutation(deleted);
            }

            // ─────────────────────────────────────────────────────────────────
            // Child records
            // ─────────────────────────────────────────────────────────────────
            Action::AddRecord(draft) => {
                let added = self.store.add_record(draft).is_some();
                self.after_mutation(added);
            }
            Action::UpdateRecord(patch) => {
                let updated = self.store.update_record(patch);
                self.after_mutation(updated);
            }
            Action::RequestDeleteRecord { kind, id, label } => {
                let title = format!("Delete {}", kind.noun());
                let message = format!("Delete {}?", label);
                self.push_confirm(&title, &message, Action::DeleteRecord(kind, id));
            }
            Action::DeleteRecord(kind, id) => {
                let deleted = self.store.delete_record(kind, id);
                self.after_mutation(deleted);
            }

            // ─────────────────────────────────────────────────────────────────
            // Cost categories
            // ─────────────────────────────────────────────────────────────────
            Action::AddCostCategory(name) => {
                let added = self.store.add_cost_category(&name);
                self.after_mutation(added);
            }
            Action::RenameCostCategory { from, to } => {
                let renamed = self.store.update_cost_category(&from, &to);
                self.after_mutation(renamed);
            }
            Action::RequestDeleteCostCategory(name) => {
                let usage = self.store.category_usage(&name);
                if name == UNCATEGORIZED && usage > 0 {
                    self.status_message =
                        Some(format!("{} is still used by {} costs", UNCATEGORIZED, usage));
                } else {
                    let message = if usage > 0 {
                        format!("Delete {}? {} costs move to {}.", name, usage, UNCATEGORIZED)
                    } else {
                        format!("Delete {}?", name)
                    };
                    self.push_confirm("Delete category", &message, Action::DeleteCostCategory(name));
                }
            }
            Action::DeleteCostCategory(name) => {
                let deleted = self.store.delete_cost_category(&name);
                if !deleted {
                    warn!(category = %name, "Category not deleted");
                }
                self.after_mutation(deleted);
            }

            // ─────────────────────────────────────────────────────────────────
            // Data
            // ─────────────────────────────────────────────────────────────────
            Action::Save => self.persist(true),
            Action::ExportShip => self.export_selected(),
        }

        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        match self.mode {
            AppMode::Loading => self.loading.draw(frame, area)?,
            AppMode::Running => {
                let has_status = self.error.is_some() || self.status_message.is_some();
                let layout = calculate_main_layout(area, has_status);

                let ship_id = self.selection.active();
                let source = self.source.describe();
                let header = HeaderContext {
                    ship: ship_id.and_then(|id| self.store.ship(id)),
                    ship_count: self.store.ships().len(),
                    source: &source,
                    unsaved: self.has_unsaved_changes(),
                    saving_enabled: self.saving_enabled,
                };
                render_header(frame, layout.header, &header);

                let tab = self.tabs.active();
                match ship_id.and_then(|id| self.store.details(id)) {
                    Some(details) => {
                        self.details_view
                            .render(frame, layout.body, tab, &details, today())
                    }
                    None => render_empty_fleet(frame, layout.body),
                }

                if let Some(status) = layout.status {
                    render_status_line(
                        frame,
                        status,
                        self.error.as_deref(),
                        self.status_message.as_deref(),
                    );
                }
                render_help_bar(
                    frame,
                    layout.help,
                    ship_id.map(|_| tab),
                    self.details_view.is_capturing(tab),
                );

                // Modals draw bottom to top so a confirmation sits over its dialog
                let modals: Vec<Modal> = self.modals.iter().cloned().collect();
                for modal in &modals {
                    self.draw_modal(frame, area, modal)?;
                }
            }
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Helper Methods
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    fn handle_main_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let tab = self.tabs.active();
        let ship_id = self.selection.active();

        // An open form gets every key
        if self.details_view.is_capturing(tab) {
            if let Some(details) = ship_id.and_then(|id| self.store.details(id)) {
                return Ok(self.details_view.handle_key(key, tab, &details, today()));
            }
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let action = match key.code {
            KeyCode::Char('s') if ctrl => Some(Action::Save),
            KeyCode::Char('q') => Some(Action::OpenQuitDialog),
            KeyCode::Char('s') => Some(Action::OpenShipPicker),
            KeyCode::Char('n') => Some(Action::OpenAddShip),
            KeyCode::Char('?') => Some(Action::OpenHelp),
            _ => None,
        };
        if action.is_some() {
            return Ok(action);
        }

        let Some(ship_id) = ship_id else {
            return Ok(None);
        };
        let action = match key.code {
            KeyCode::Tab => Some(Action::NextTab),
            KeyCode::BackTab => Some(Action::PrevTab),
            KeyCode::Char('x') => Some(Action::ExportShip),
            KeyCode::Char('D') => Some(Action::RequestDeleteShip(ship_id)),
            KeyCode::Char(c) if c.is_ascii_digit() => Tab::from_digit(c).map(Action::SelectTab),
            _ => self
                .store
                .details(ship_id)
                .and_then(|details| self.details_view.handle_key(key, tab, &details, today())),
        };
        Ok(action)
    }

    fn handle_modal_key_event(&mut self, modal: &Modal, key: KeyEvent) -> Result<Option<Action>> {
        match modal {
            Modal::ShipPicker => Ok(self.ship_picker.handle_key(key, self.store.ships())),
            Modal::AddShip => self.add_ship_dialog.handle_key_event(key),
            Modal::Confirm { .. } => self.confirm_dialog.handle_key_event(key),
            Modal::CostCategories => Ok(self
                .category_dialog
                .handle_key(key, self.store.cost_categories())),
            Modal::Help => self.help_dialog.handle_key_event(key),
        }
    }

    fn draw_modal(&mut self, frame: &mut Frame, area: Rect, modal: &Modal) -> Result<()> {
        match modal {
            Modal::ShipPicker => {
                self.ship_picker
                    .render(frame, area, self.store.ships(), self.selection.active());
            }
            Modal::AddShip => self.add_ship_dialog.draw(frame, area)?,
            Modal::Confirm { title, message, .. } => {
                self.confirm_dialog.show(title, message);
                self.confirm_dialog.draw(frame, area)?;
            }
            Modal::CostCategories => {
                let usage: Vec<(String, usize)> = self
                    .store
                    .cost_categories()
                    .iter()
                    .map(|c| (c.clone(), self.store.category_usage(c)))
                    .collect();
                self.category_dialog.render(frame, area, &usage);
            }
            Modal::Help => self.help_dialog.draw(frame, area)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::records::{NewCost, NewFuelLog, RecordDraft, RecordKind};
    use crate::model::ship::NewShip;
    use crate::services::{FileSource, MemorySource};
    use ratatui::{backend::TestBackend, Terminal};
    use std::fs;
    use tempfile::TempDir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn demo_app(autosave: bool) -> (App, Arc<MemorySource>) {
        let source = Arc::new(MemorySource::demo());
        let options = AppOptions {
            autosave,
            ..AppOptions::default()
        };
        let mut app = App::new(source.clone(), options);
        app.init().unwrap();
        app.finish_loading();
        (app, source)
    }

    /// Feed an action and every follow-up through `update`
    fn dispatch(app: &mut App, action: Action) {
        let mut next = Some(action);
        while let Some(action) = next {
            next = app.update(action).unwrap();
        }
    }

    fn press(app: &mut App, code: KeyCode) {
        if let Some(action) = app.handle_key_event(key(code)).unwrap() {
            dispatch(app, action);
        }
    }

    #[test]
    fn test_load_selects_first_ship() {
        let (app, _) = demo_app(true);
        assert_eq!(app.mode, AppMode::Running);
        assert_eq!(app.selection.active(), Some(app.store.ships()[0].id));
        assert!(!app.has_unsaved_changes());
    }

    #[test]
    fn test_adding_a_ship_keeps_current_selection() {
        let (mut app, _) = demo_app(true);
        let before = app.selection.active();

        dispatch(&mut app, Action::AddShip(NewShip {
            name: "New".to_string(),
            ..NewShip::default()
        }));

        assert_eq!(app.store.ships().len(), 4);
        assert_eq!(app.selection.active(), before);
    }

    #[test]
    fn test_first_ship_added_to_empty_fleet_is_selected() {
        let dir = TempDir::new().unwrap();
        let source = Arc::new(FileSource::new(dir.path().join("fleet.json")));
        let mut app = App::new(source, AppOptions::default());
        app.init().unwrap();
        app.finish_loading();
        assert_eq!(app.selection.active(), None);

        dispatch(&mut app, Action::AddShip(NewShip {
            name: "Hai Au".to_string(),
            ..NewShip::default()
        }));

        assert_eq!(app.selection.active(), Some(app.store.ships()[0].id));
    }

    #[test]
    fn test_successful_save_clears_previous_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fleet.json");
        let mut app = App::new(Arc::new(FileSource::new(&path)), AppOptions::default());
        app.init().unwrap();
        app.finish_loading();

        // A directory in place of the data file makes the save fail
        fs::create_dir(&path).unwrap();
        dispatch(&mut app, Action::AddShip(NewShip {
            name: "Sao Mai".to_string(),
            ..NewShip::default()
        }));
        assert!(app.error.as_deref().unwrap().starts_with("Save failed"));

        fs::remove_dir(&path).unwrap();
        dispatch(&mut app, Action::Save);

        assert!(path.is_file());
        assert_eq!(app.error, None);
        assert!(app.status_message.as_deref().unwrap().starts_with("Saved to"));
    }

    #[test]
    fn test_mutations_are_gated_until_loaded() {
        let source = Arc::new(MemorySource::demo());
        let mut app = App::new(source.clone(), AppOptions::default());
        dispatch(&mut app, Action::AddShip(NewShip {
            name: "Early".to_string(),
            ..NewShip::default()
        }));
        assert!(app.store.ships().is_empty());
        assert_eq!(source.saves(), 0);
    }

    #[test]
    fn test_delete_ship_needs_confirmation_and_moves_selection() {
        let (mut app, source) = demo_app(true);
        let first = app.store.ships()[0].id;
        let second = app.store.ships()[1].id;

        dispatch(&mut app, Action::RequestDeleteShip(first));
        assert!(matches!(app.modals.top(), Some(Modal::Confirm { .. })));
        assert!(app.store.ship(first).is_some());

        press(&mut app, KeyCode::Char('y'));
        assert!(app.store.ship(first).is_none());
        assert!(app.modals.is_empty());
        assert_eq!(app.selection.active(), Some(second));
        assert!(app.store.trips().iter().all(|t| t.ship_id != first));
        assert_eq!(source.saves(), 1);
    }

    #[test]
    fn test_cancelled_delete_keeps_ship() {
        let (mut app, source) = demo_app(true);
        let first = app.store.ships()[0].id;

        dispatch(&mut app, Action::RequestDeleteShip(first));
        press(&mut app, KeyCode::Esc);

        assert!(app.store.ship(first).is_some());
        assert_eq!(source.saves(), 0);
    }

    #[test]
    fn test_autosave_off_waits_for_explicit_save() {
        let (mut app, source) = demo_app(false);
        let ship_id = app.selection.active().unwrap();
        dispatch(
            &mut app,
            Action::AddRecord(RecordDraft::FuelLog(NewFuelLog {
                ship_id,
                date: today(),
                fuel_type: "MGO".to_string(),
                quantity_tons: 12.0,
                unit_price: 650.0,
                port: "Cam Ranh".to_string(),
            })),
        );
        assert_eq!(source.saves(), 0);
        assert!(app.has_unsaved_changes());

        let ctrl_s = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        let action = app.handle_key_event(ctrl_s).unwrap().unwrap();
        dispatch(&mut app, action);
        assert_eq!(source.saves(), 1);
        assert_eq!(source.current().unwrap().fuel_logs.len(), app.store.fuel_logs().len());
    }

    #[test]
    fn test_failed_load_disables_saving() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fleet.json");
        fs::write(&path, "{ not json").unwrap();

        let mut app = App::new(Arc::new(FileSource::new(&path)), AppOptions::default());
        app.init().unwrap();
        app.finish_loading();

        assert!(!app.saving_enabled());
        assert!(app.error.is_some());
        dispatch(&mut app, Action::AddShip(NewShip {
            name: "Rescue".to_string(),
            ..NewShip::default()
        }));
        assert_eq!(app.store.ships().len(), 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn test_open_form_captures_global_keys() {
        let (mut app, _) = demo_app(true);
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.tabs.active(), Tab::Fuel);

        press(&mut app, KeyCode::Char('a'));
        assert!(app.details_view.is_capturing(Tab::Fuel));

        // 'q' is typed into the form instead of opening the quit prompt
        press(&mut app, KeyCode::Char('q'));
        assert!(app.modals.is_empty());

        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('q'));
        assert!(matches!(app.modals.top(), Some(Modal::Confirm { .. })));
    }

    #[test]
    fn test_tab_survives_ship_change() {
        let (mut app, _) = demo_app(true);
        press(&mut app, KeyCode::Char('4'));
        let other = app.store.ships()[2].id;

        dispatch(&mut app, Action::OpenShipPicker);
        dispatch(&mut app, Action::SelectShip(other));

        assert_eq!(app.selection.active(), Some(other));
        assert_eq!(app.tabs.active(), Tab::Costs);
        assert!(app.modals.is_empty());
    }

    #[test]
    fn test_record_delete_flow() {
        let (mut app, _) = demo_app(true);
        let ship_id = app.selection.active().unwrap();
        let log_id = app
            .store
            .fuel_logs()
            .iter()
            .find(|l| l.ship_id == ship_id)
            .map(|l| l.id)
            .unwrap();

        dispatch(&mut app, Action::RequestDeleteRecord {
            kind: RecordKind::FuelLog,
            id: log_id,
            label: "fuel".to_string(),
        });
        press(&mut app, KeyCode::Char('y'));

        assert!(app.store.fuel_logs().iter().all(|l| l.id != log_id));
    }

    #[test]
    fn test_uncategorized_in_use_is_not_offered_for_delete() {
        let (mut app, _) = demo_app(true);
        let ship_id = app.selection.active().unwrap();
        dispatch(
            &mut app,
            Action::AddRecord(RecordDraft::Cost(NewCost {
                ship_id,
                trip_id: None,
                date: today(),
                category: String::new(),
                description: "Misc".to_string(),
                amount: 10.0,
            })),
        );

        dispatch(&mut app, Action::RequestDeleteCostCategory(UNCATEGORIZED.to_string()));
        assert!(app.modals.is_empty());
        assert!(app.status_message.is_some());
    }

    #[test]
    fn test_export_writes_ledgers() {
        let dir = TempDir::new().unwrap();
        let source = Arc::new(MemorySource::demo());
        let options = AppOptions {
            export_dir: dir.path().to_path_buf(),
            ..AppOptions::default()
        };
        let mut app = App::new(source, options);
        app.init().unwrap();
        app.finish_loading();

        press(&mut app, KeyCode::Char('x'));

        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 5);
        assert!(app.error.is_none());
    }

    #[test]
    fn test_draw_every_tab_and_modal() {
        let (mut app, _) = demo_app(true);
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();

        for tab in Tab::all() {
            dispatch(&mut app, Action::SelectTab(tab));
            terminal.draw(|f| app.draw(f, f.area()).unwrap()).unwrap();
        }
        for action in [
            Action::OpenShipPicker,
            Action::OpenAddShip,
            Action::OpenCostCategories,
            Action::OpenHelp,
            Action::OpenQuitDialog,
        ] {
            dispatch(&mut app, action);
            terminal.draw(|f| app.draw(f, f.area()).unwrap()).unwrap();
        }

        // Empty fleet renders the placeholder
        let ids: Vec<_> = app.store.ships().iter().map(|s| s.id).collect();
        while app.modals.pop().is_some() {}
        for id in ids {
            dispatch(&mut app, Action::DeleteShip(id));
        }
        assert_eq!(app.selection.active(), None);
        terminal.draw(|f| app.draw(f, f.area()).unwrap()).unwrap();
    }
}
