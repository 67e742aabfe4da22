//! Which ship the dashboard is looking at

use super::entity::EntityId;
use super::ship::Ship;
use tracing::debug;

/// Holds the active ship id and keeps it valid as the fleet changes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionController {
    active: Option<EntityId>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<EntityId> {
        self.active
    }

    /// Select `id` if it names an existing ship
    pub fn select(&mut self, id: EntityId, ships: &[Ship]) -> bool {
        if ships.iter().any(|s| s.id == id) {
            self.active = Some(id);
            true
        } else {
            debug!(id, "Selection of unknown ship ignored");
            false
        }
    }

    /// Re-establish a valid selection after the fleet changed
    ///
    /// An empty fleet clears the selection; a missing or stale selection
    /// falls back to the first ship. Returns true when the selection moved.
    pub fn reconcile(&mut self, ships: &[Ship]) -> bool {
        let next = match (self.active, ships.first()) {
            (_, None) => None,
            (Some(id), Some(first)) => {
                if ships.iter().any(|s| s.id == id) {
                    Some(id)
                } else {
                    Some(first.id)
                }
            }
            (None, Some(first)) => Some(first.id),
        };
        let changed = next != self.active;
        if changed {
            debug!(from = ?self.active, to = ?next, "Selection reconciled");
        }
        self.active = next;
        changed
    }
}
