//! Ship model

use super::entity::{Entity, EntityId};
use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operational status of a ship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipStatus {
    Operational,
    InTransit,
    #[default]
    AtPort,
    MaintenanceRequired,
}

impl ShipStatus {
    pub fn all() -> [ShipStatus; 4] {
        [
            ShipStatus::Operational,
            ShipStatus::InTransit,
            ShipStatus::AtPort,
            ShipStatus::MaintenanceRequired,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            ShipStatus::Operational => "Operational",
            ShipStatus::InTransit => "In transit",
            ShipStatus::AtPort => "At port",
            ShipStatus::MaintenanceRequired => "Maintenance required",
        }
    }

    /// Inverse of `label`, used by choice fields
    pub fn from_label(label: &str) -> Option<ShipStatus> {
        Self::all().into_iter().find(|s| s.label() == label)
    }
}

impl fmt::Display for ShipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A ship in the fleet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ship {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub status: ShipStatus,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    /// Knots, never negative
    #[serde(default)]
    pub speed: f64,
    #[serde(default)]
    pub captain: String,
    #[serde(rename = "type", default)]
    pub ship_type: String,
    /// Displayed as the MMSI number
    #[serde(default)]
    pub imo: String,
    /// Displayed as the IMO number
    #[serde(default)]
    pub true_imo: String,
    #[serde(default)]
    pub flag: String,
    #[serde(default)]
    pub built_year: i32,
}

/// Fields a caller supplies when registering a ship
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewShip {
    pub name: String,
    pub ship_type: String,
    pub imo: String,
    pub true_imo: String,
}

/// Values the store fills in for fields `NewShip` does not carry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShipDefaults {
    pub status: ShipStatus,
    pub latitude: f64,
    pub longitude: f64,
    pub captain: String,
    pub flag: String,
    pub speed: f64,
    /// Falls back to the current year when unset
    pub built_year: Option<i32>,
}

impl Default for ShipDefaults {
    fn default() -> Self {
        Self {
            status: ShipStatus::AtPort,
            latitude: 10.7626,
            longitude: 106.7431,
            captain: "Unassigned".to_string(),
            flag: "Vietnam".to_string(),
            speed: 0.0,
            built_year: None,
        }
    }
}

impl ShipDefaults {
    /// Merge a caller's draft with these defaults
    pub fn complete(&self, draft: NewShip) -> ShipDraft {
        ShipDraft {
            name: draft.name.trim().to_string(),
            ship_type: draft.ship_type,
            imo: draft.imo,
            true_imo: draft.true_imo,
            status: self.status,
            latitude: self.latitude,
            longitude: self.longitude,
            captain: self.captain.clone(),
            flag: self.flag.clone(),
            speed: self.speed,
            built_year: self.built_year.unwrap_or_else(|| Local::now().year()),
        }
    }
}

/// A fully specified ship without its id
#[derive(Debug, Clone, PartialEq)]
pub struct ShipDraft {
    pub name: String,
    pub ship_type: String,
    pub imo: String,
    pub true_imo: String,
    pub status: ShipStatus,
    pub latitude: f64,
    pub longitude: f64,
    pub captain: String,
    pub flag: String,
    pub speed: f64,
    pub built_year: i32,
}

/// Partial update for a ship
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShipPatch {
    pub name: Option<String>,
    pub status: Option<ShipStatus>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub speed: Option<f64>,
    pub captain: Option<String>,
    pub ship_type: Option<String>,
    pub imo: Option<String>,
    pub true_imo: Option<String>,
    pub flag: Option<String>,
    pub built_year: Option<i32>,
}

impl ShipPatch {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

impl Ship {
    /// Clamp numeric fields into their valid ranges
    pub(crate) fn normalize(&mut self) {
        self.speed = sanitize(self.speed).max(0.0);
        self.latitude = sanitize(self.latitude).clamp(-90.0, 90.0);
        self.longitude = sanitize(self.longitude).clamp(-180.0, 180.0);
    }

    /// "lat, lon" with three decimals
    pub fn position_label(&self) -> String {
        format!("{:.3}, {:.3}", self.latitude, self.longitude)
    }

    pub fn speed_label(&self) -> String {
        format!("{:.1} kn", self.speed)
    }
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

impl Entity for Ship {
    type Draft = ShipDraft;
    type Patch = ShipPatch;

    fn id(&self) -> EntityId {
        self.id
    }

    fn build(id: EntityId, draft: ShipDraft) -> Self {
        let mut ship = Ship {
            id,
            name: draft.name,
            status: draft.status,
            latitude: draft.latitude,
            longitude: draft.longitude,
            speed: draft.speed,
            captain: draft.captain,
            ship_type: draft.ship_type,
            imo: draft.imo,
            true_imo: draft.true_imo,
            flag: draft.flag,
            built_year: draft.built_year,
        };
        ship.normalize();
        ship
    }

    fn apply(&mut self, patch: ShipPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(latitude) = patch.latitude {
            self.latitude = latitude;
        }
        if let Some(longitude) = patch.longitude {
            self.longitude = longitude;
        }
        if let Some(speed) = patch.speed {
            self.speed = speed;
        }
        if let Some(captain) = patch.captain {
            self.captain = captain;
        }
        if let Some(ship_type) = patch.ship_type {
            self.ship_type = ship_type;
        }
        if let Some(imo) = patch.imo {
            self.imo = imo;
        }
        if let Some(true_imo) = patch.true_imo {
            self.true_imo = true_imo;
        }
        if let Some(flag) = patch.flag {
            self.flag = flag;
        }
        if let Some(built_year) = patch.built_year {
            self.built_year = built_year;
        }
        self.normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str) -> NewShip {
        NewShip {
            name: name.to_string(),
            ship_type: "Bulk carrier".to_string(),
            imo: "574001234".to_string(),
            true_imo: "9301234".to_string(),
        }
    }

    #[test]
    fn test_defaults_fill_unsupplied_fields() {
        let defaults = ShipDefaults {
            built_year: Some(2001),
            ..ShipDefaults::default()
        };
        let ship = Ship::build(5, defaults.complete(draft("  Sao Mai  ")));

        assert_eq!(ship.id, 5);
        assert_eq!(ship.name, "Sao Mai");
        assert_eq!(ship.status, ShipStatus::AtPort);
        assert_eq!(ship.captain, "Unassigned");
        assert_eq!(ship.built_year, 2001);
        assert_eq!(ship.speed, 0.0);
    }

    #[test]
    fn test_patch_leaves_other_fields_untouched() {
        let mut ship = Ship::build(1, ShipDefaults::default().complete(draft("A")));
        let before = ship.clone();

        ship.apply(ShipPatch::rename("B"));

        assert_eq!(ship.name, "B");
        assert_eq!(ship.captain, before.captain);
        assert_eq!(ship.true_imo, before.true_imo);
    }

    #[test]
    fn test_numeric_fields_are_clamped() {
        let mut ship = Ship::build(1, ShipDefaults::default().complete(draft("A")));
        ship.apply(ShipPatch {
            speed: Some(-4.0),
            latitude: Some(123.0),
            longitude: Some(f64::NAN),
            ..ShipPatch::default()
        });

        assert_eq!(ship.speed, 0.0);
        assert_eq!(ship.latitude, 90.0);
        assert_eq!(ship.longitude, 0.0);
    }

    #[test]
    fn test_status_serializes_screaming_snake_case() {
        let json = serde_json::to_string(&ShipStatus::MaintenanceRequired).unwrap();
        assert_eq!(json, "\"MAINTENANCE_REQUIRED\"");
        assert_eq!(ShipStatus::from_label("In transit"), Some(ShipStatus::InTransit));
    }
}
