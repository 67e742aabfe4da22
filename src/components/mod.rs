//! UI Components
//!
//! Each component encapsulates its own state, event handling, and rendering logic.
//! Components communicate through Actions rather than direct state mutation.

pub mod add_ship_dialog;
pub mod category_dialog;
pub mod confirm_dialog;
pub mod cost_panel;
pub mod empty_state;
pub mod form_view;
pub mod header;
pub mod help_dialog;
pub mod layout;
pub mod loading;
pub mod overview;
pub mod record_forms;
pub mod record_panel;
pub mod ship_details;
pub mod ship_picker;
pub mod table;
pub mod voyage_panel;

pub use add_ship_dialog::AddShipDialog;
pub use category_dialog::CategoryDialog;
pub use confirm_dialog::ConfirmDialog;
pub use empty_state::render_empty_fleet;
pub use header::{render_header, render_help_bar, render_status_line, HeaderContext};
pub use help_dialog::HelpDialog;
pub use layout::calculate_main_layout;
pub use loading::LoadingScreen;
pub use ship_details::ShipDetailsView;
pub use ship_picker::ShipPicker;
