//! Action enum - All possible application actions
//!
//! Actions are discrete operations that the application can perform.
//! Components emit Actions in response to events, and the App processes
//! them to update state.

use crate::model::entity::EntityId;
use crate::model::records::{RecordDraft, RecordKind, RecordPatch};
use crate::model::ship::{NewShip, ShipPatch};
use crate::model::ui::Tab;
use std::fmt;

/// All possible actions in the application
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ─────────────────────────────────────────────────────────────────────────
    // App Lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    /// Regular tick for animations and load polling
    Tick,
    /// Terminal was resized
    Resize(u16, u16),
    /// Quit without confirmation
    ForceQuit,

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────
    NextTab,
    PrevTab,
    SelectTab(Tab),

    // ─────────────────────────────────────────────────────────────────────────
    // Modals
    // ─────────────────────────────────────────────────────────────────────────
    OpenQuitDialog,
    OpenShipPicker,
    OpenAddShip,
    OpenHelp,
    OpenCostCategories,
    /// Close the current modal
    CloseModal,
    /// Confirm the current modal action
    ConfirmModal,

    // ─────────────────────────────────────────────────────────────────────────
    // Ships
    // ─────────────────────────────────────────────────────────────────────────
    SelectShip(EntityId),
    AddShip(NewShip),
    UpdateShip(EntityId, ShipPatch),
    /// Ask for confirmation before deleting
    RequestDeleteShip(EntityId),
    DeleteShip(EntityId),

    // ─────────────────────────────────────────────────────────────────────────
    // Child records
    // ─────────────────────────────────────────────────────────────────────────
    AddRecord(RecordDraft),
    UpdateRecord(RecordPatch),
    RequestDeleteRecord {
        kind: RecordKind,
        id: EntityId,
        label: String,
    },
    DeleteRecord(RecordKind, EntityId),

    // ─────────────────────────────────────────────────────────────────────────
    // Cost categories
    // ─────────────────────────────────────────────────────────────────────────
    AddCostCategory(String),
    RenameCostCategory { from: String, to: String },
    RequestDeleteCostCategory(String),
    DeleteCostCategory(String),

    // ─────────────────────────────────────────────────────────────────────────
    // Data
    // ─────────────────────────────────────────────────────────────────────────
    /// Write the snapshot to the data source now
    Save,
    /// Write CSV ledgers for the selected ship
    ExportShip,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Tick => write!(f, "Tick"),
            Action::Resize(w, h) => write!(f, "Resize({}, {})", w, h),
            Action::ForceQuit => write!(f, "ForceQuit"),
            Action::NextTab => write!(f, "NextTab"),
            Action::PrevTab => write!(f, "PrevTab"),
            Action::SelectTab(tab) => write!(f, "SelectTab({})", tab.name()),
            Action::OpenQuitDialog => write!(f, "OpenQuitDialog"),
            Action::OpenShipPicker => write!(f, "OpenShipPicker"),
            Action::OpenAddShip => write!(f, "OpenAddShip"),
            Action::OpenHelp => write!(f, "OpenHelp"),
            Action::OpenCostCategories => write!(f, "OpenCostCategories"),
            Action::CloseModal => write!(f, "CloseModal"),
            Action::ConfirmModal => write!(f, "ConfirmModal"),
            Action::SelectShip(id) => write!(f, "SelectShip({})", id),
            Action::AddShip(draft) => write!(f, "AddShip({})", draft.name),
            Action::UpdateShip(id, _) => write!(f, "UpdateShip({})", id),
            Action::RequestDeleteShip(id) => write!(f, "RequestDeleteShip({})", id),
            Action::DeleteShip(id) => write!(f, "DeleteShip({})", id),
            Action::AddRecord(draft) => write!(f, "AddRecord({})", draft.kind()),
            Action::UpdateRecord(patch) => {
                write!(f, "UpdateRecord({} {})", patch.kind(), patch.id())
            }
            Action::RequestDeleteRecord { kind, id, .. } => {
                write!(f, "RequestDeleteRecord({} {})", kind, id)
            }
            Action::DeleteRecord(kind, id) => write!(f, "DeleteRecord({} {})", kind, id),
            Action::AddCostCategory(name) => write!(f, "AddCostCategory({})", name),
            Action::RenameCostCategory { from, to } => {
                write!(f, "RenameCostCategory({} -> {})", from, to)
            }
            Action::RequestDeleteCostCategory(name) => {
                write!(f, "RequestDeleteCostCategory({})", name)
            }
            Action::DeleteCostCategory(name) => write!(f, "DeleteCostCategory({})", name),
            Action::Save => write!(f, "Save"),
            Action::ExportShip => write!(f, "ExportShip"),
        }
    }
}
