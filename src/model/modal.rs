//! Modal stack for managing overlays
//!
//! Overlays are an enum-based stack rather than a set of boolean flags;
//! only the top modal receives input.

use crate::action::Action;

/// Represents a modal overlay that can be displayed on top of the main UI
#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    /// Searchable ship list with rename/delete/add
    ShipPicker,
    /// New ship form
    AddShip,
    /// Blocking yes/no prompt; `on_confirm` is dispatched on "yes"
    Confirm {
        title: String,
        message: String,
        on_confirm: Box<Action>,
    },
    /// Cost category manager
    CostCategories,
    /// Help dialog showing all keyboard shortcuts
    Help,
}

impl Modal {
    pub fn confirm(title: impl Into<String>, message: impl Into<String>, on_confirm: Action) -> Self {
        Modal::Confirm {
            title: title.into(),
            message: message.into(),
            on_confirm: Box::new(on_confirm),
        }
    }

    pub fn quit() -> Self {
        Self::confirm("Quit", "Are you sure you want to quit?", Action::ForceQuit)
    }
}

/// A stack of modal overlays
///
/// Modals are rendered from bottom to top, with only the top modal
/// receiving input events.
#[derive(Debug, Default)]
pub struct ModalStack {
    stack: Vec<Modal>,
}

impl ModalStack {
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }

    pub fn push(&mut self, modal: Modal) {
        self.stack.push(modal);
    }

    pub fn pop(&mut self) -> Option<Modal> {
        self.stack.pop()
    }

    pub fn top(&self) -> Option<&Modal> {
        self.stack.last()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Modal> {
        self.stack.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modal_stack_push_pop() {
        let mut stack = ModalStack::new();
        assert!(stack.top().is_none());

        stack.push(Modal::ShipPicker);
        stack.push(Modal::quit());

        assert_eq!(stack.pop(), Some(Modal::quit()));
        assert_eq!(stack.pop(), Some(Modal::ShipPicker));
        assert!(stack.is_empty());
    }

    #[test]
    fn test_confirm_carries_follow_up_action() {
        let modal = Modal::confirm("Delete ship", "Delete Sao Mai?", Action::DeleteShip(3));
        match modal {
            Modal::Confirm { on_confirm, .. } => assert_eq!(*on_confirm, Action::DeleteShip(3)),
            other => panic!("unexpected modal {:?}", other),
        }
    }
}
