//! New ship dialog

use crate::action::Action;
use crate::component::Component;
use crate::components::form_view::{handle_form_key, render_form, FormEvent};
use crate::components::layout::centered_popup;
use crate::model::form::Form;
use crate::model::ship::NewShip;
use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

pub struct AddShipDialog {
    form: Form,
    /// Shown when a submit was refused
    error: Option<String>,
}

impl Default for AddShipDialog {
    fn default() -> Self {
        Self::new()
    }
}

fn blank_form() -> Form {
    Form::new("Add ship")
        .text("name", "Name", "")
        .text("type", "Type", "")
        .text("mmsi", "MMSI", "")
        .text("imo", "IMO number", "")
}

impl AddShipDialog {
    pub fn new() -> Self {
        Self {
            form: blank_form(),
            error: None,
        }
    }

    /// Start from an empty form
    pub fn reset(&mut self) {
        self.form = blank_form();
        self.error = None;
    }

    #[cfg(test)]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl Component for AddShipDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match handle_form_key(&mut self.form, key) {
            FormEvent::Submit => {
                let name = self.form.value("name").trim().to_string();
                if name.is_empty() {
                    self.error = Some("A ship needs a name".to_string());
                    None
                } else {
                    let draft = NewShip {
                        name,
                        ship_type: self.form.value("type").trim().to_string(),
                        imo: self.form.value("mmsi").trim().to_string(),
                        true_imo: self.form.value("imo").trim().to_string(),
                    };
                    self.reset();
                    Some(Action::AddShip(draft))
                }
            }
            FormEvent::Cancel => {
                self.reset();
                Some(Action::CloseModal)
            }
            FormEvent::Edited => {
                self.error = None;
                None
            }
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let popup = centered_popup(area, 60, 10);
        if let Some(error) = &self.error {
            self.form.title = format!("Add ship · {}", error);
        } else {
            self.form.title = "Add ship".to_string();
        }
        render_form(frame, popup, &self.form);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(dialog: &mut AddShipDialog, text: &str) {
        for c in text.chars() {
            dialog.handle_key_event(key(KeyCode::Char(c))).unwrap();
        }
    }

    #[test]
    fn test_submit_builds_new_ship() {
        let mut dialog = AddShipDialog::new();
        type_text(&mut dialog, "Truong Sa");
        dialog.handle_key_event(key(KeyCode::Tab)).unwrap();
        type_text(&mut dialog, "Bulk carrier");
        dialog.handle_key_event(key(KeyCode::Tab)).unwrap();
        type_text(&mut dialog, "574001234");

        let action = dialog.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(
            action,
            Some(Action::AddShip(NewShip {
                name: "Truong Sa".to_string(),
                ship_type: "Bulk carrier".to_string(),
                imo: "574001234".to_string(),
                true_imo: String::new(),
            }))
        );
        // Form is blank again for the next ship
        assert_eq!(dialog.form.value("name"), "");
    }

    #[test]
    fn test_blank_name_is_refused() {
        let mut dialog = AddShipDialog::new();
        type_text(&mut dialog, "   ");
        assert_eq!(dialog.handle_key_event(key(KeyCode::Enter)).unwrap(), None);
        assert!(dialog.error().is_some());

        assert_eq!(
            dialog.handle_key_event(key(KeyCode::Esc)).unwrap(),
            Some(Action::CloseModal)
        );
    }
}
