//! Child records owned by a ship: trips, voyages, fuel logs, costs and
//! maintenance records.

use super::entity::{Entity, EntityId, ShipOwned};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category every orphaned cost falls back to
pub const UNCATEGORIZED: &str = "Uncategorized";

// ═══════════════════════════════════════════════════════════════════════════════
// Trip
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: EntityId,
    pub ship_id: EntityId,
    pub name: String,
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub destination: String,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTrip {
    pub ship_id: EntityId,
    pub name: String,
    pub origin: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TripPatch {
    pub name: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<Option<NaiveDate>>,
    pub notes: Option<String>,
}

impl Trip {
    /// "Name (origin → destination)"
    pub fn label(&self) -> String {
        if self.origin.is_empty() && self.destination.is_empty() {
            self.name.clone()
        } else {
            format!("{} ({} → {})", self.name, self.origin, self.destination)
        }
    }
}

impl Entity for Trip {
    type Draft = NewTrip;
    type Patch = TripPatch;

    fn id(&self) -> EntityId {
        self.id
    }

    fn build(id: EntityId, draft: NewTrip) -> Self {
        Trip {
            id,
            ship_id: draft.ship_id,
            name: draft.name,
            origin: draft.origin,
            destination: draft.destination,
            start_date: draft.start_date,
            end_date: draft.end_date,
            notes: draft.notes,
        }
    }

    fn apply(&mut self, patch: TripPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(origin) = patch.origin {
            self.origin = origin;
        }
        if let Some(destination) = patch.destination {
            self.destination = destination;
        }
        if let Some(start_date) = patch.start_date {
            self.start_date = start_date;
        }
        if let Some(end_date) = patch.end_date {
            self.end_date = end_date;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
    }
}

impl ShipOwned for Trip {
    fn ship_id(&self) -> EntityId {
        self.ship_id
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Voyage
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Voyage {
    pub id: EntityId,
    pub ship_id: EntityId,
    #[serde(default)]
    pub trip_id: Option<EntityId>,
    pub departure_port: String,
    pub arrival_port: String,
    pub departure_date: NaiveDate,
    #[serde(default)]
    pub arrival_date: Option<NaiveDate>,
    #[serde(default)]
    pub cargo: String,
    #[serde(default)]
    pub distance_nm: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewVoyage {
    pub ship_id: EntityId,
    pub trip_id: Option<EntityId>,
    pub departure_port: String,
    pub arrival_port: String,
    pub departure_date: NaiveDate,
    pub arrival_date: Option<NaiveDate>,
    pub cargo: String,
    pub distance_nm: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct VoyagePatch {
    pub trip_id: Option<Option<EntityId>>,
    pub departure_port: Option<String>,
    pub arrival_port: Option<String>,
    pub departure_date: Option<NaiveDate>,
    pub arrival_date: Option<Option<NaiveDate>>,
    pub cargo: Option<String>,
    pub distance_nm: Option<f64>,
}

impl Entity for Voyage {
    type Draft = NewVoyage;
    type Patch = VoyagePatch;

    fn id(&self) -> EntityId {
        self.id
    }

    fn build(id: EntityId, draft: NewVoyage) -> Self {
        Voyage {
            id,
            ship_id: draft.ship_id,
            trip_id: draft.trip_id,
            departure_port: draft.departure_port,
            arrival_port: draft.arrival_port,
            departure_date: draft.departure_date,
            arrival_date: draft.arrival_date,
            cargo: draft.cargo,
            distance_nm: draft.distance_nm.max(0.0),
        }
    }

    fn apply(&mut self, patch: VoyagePatch) {
        if let Some(trip_id) = patch.trip_id {
            self.trip_id = trip_id;
        }
        if let Some(departure_port) = patch.departure_port {
            self.departure_port = departure_port;
        }
        if let Some(arrival_port) = patch.arrival_port {
            self.arrival_port = arrival_port;
        }
        if let Some(departure_date) = patch.departure_date {
            self.departure_date = departure_date;
        }
        if let Some(arrival_date) = patch.arrival_date {
            self.arrival_date = arrival_date;
        }
        if let Some(cargo) = patch.cargo {
            self.cargo = cargo;
        }
        if let Some(distance_nm) = patch.distance_nm {
            self.distance_nm = distance_nm.max(0.0);
        }
    }
}

impl ShipOwned for Voyage {
    fn ship_id(&self) -> EntityId {
        self.ship_id
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Fuel Log
// ═══════════════════════════════════════════════════════════════════════════════

/// Fuel grades offered by the fuel form
pub const FUEL_TYPES: [&str; 4] = ["VLSFO", "HFO", "MGO", "LNG"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelLog {
    pub id: EntityId,
    pub ship_id: EntityId,
    pub date: NaiveDate,
    pub fuel_type: String,
    pub quantity_tons: f64,
    #[serde(default)]
    pub unit_price: f64,
    #[serde(default)]
    pub port: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewFuelLog {
    pub ship_id: EntityId,
    pub date: NaiveDate,
    pub fuel_type: String,
    pub quantity_tons: f64,
    pub unit_price: f64,
    pub port: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FuelLogPatch {
    pub date: Option<NaiveDate>,
    pub fuel_type: Option<String>,
    pub quantity_tons: Option<f64>,
    pub unit_price: Option<f64>,
    pub port: Option<String>,
}

impl FuelLog {
    pub fn total(&self) -> f64 {
        self.quantity_tons * self.unit_price
    }
}

impl Entity for FuelLog {
    type Draft = NewFuelLog;
    type Patch = FuelLogPatch;

    fn id(&self) -> EntityId {
        self.id
    }

    fn build(id: EntityId, draft: NewFuelLog) -> Self {
        FuelLog {
            id,
            ship_id: draft.ship_id,
            date: draft.date,
            fuel_type: draft.fuel_type,
            quantity_tons: draft.quantity_tons,
            unit_price: draft.unit_price,
            port: draft.port,
        }
    }

    fn apply(&mut self, patch: FuelLogPatch) {
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(fuel_type) = patch.fuel_type {
            self.fuel_type = fuel_type;
        }
        if let Some(quantity_tons) = patch.quantity_tons {
            self.quantity_tons = quantity_tons;
        }
        if let Some(unit_price) = patch.unit_price {
            self.unit_price = unit_price;
        }
        if let Some(port) = patch.port {
            self.port = port;
        }
    }
}

impl ShipOwned for FuelLog {
    fn ship_id(&self) -> EntityId {
        self.ship_id
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Cost
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cost {
    pub id: EntityId,
    pub ship_id: EntityId,
    #[serde(default)]
    pub trip_id: Option<EntityId>,
    pub date: NaiveDate,
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCost {
    pub ship_id: EntityId,
    pub trip_id: Option<EntityId>,
    pub date: NaiveDate,
    pub category: String,
    pub description: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CostPatch {
    pub trip_id: Option<Option<EntityId>>,
    pub date: Option<NaiveDate>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub amount: Option<f64>,
}

impl Entity for Cost {
    type Draft = NewCost;
    type Patch = CostPatch;

    fn id(&self) -> EntityId {
        self.id
    }

    fn build(id: EntityId, draft: NewCost) -> Self {
        Cost {
            id,
            ship_id: draft.ship_id,
            trip_id: draft.trip_id,
            date: draft.date,
            category: draft.category,
            description: draft.description,
            amount: draft.amount,
        }
    }

    fn apply(&mut self, patch: CostPatch) {
        if let Some(trip_id) = patch.trip_id {
            self.trip_id = trip_id;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
    }
}

impl ShipOwned for Cost {
    fn ship_id(&self) -> EntityId {
        self.ship_id
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Maintenance
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaintenanceStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
}

impl MaintenanceStatus {
    pub fn all() -> [MaintenanceStatus; 3] {
        [
            MaintenanceStatus::Scheduled,
            MaintenanceStatus::InProgress,
            MaintenanceStatus::Completed,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            MaintenanceStatus::Scheduled => "Scheduled",
            MaintenanceStatus::InProgress => "In progress",
            MaintenanceStatus::Completed => "Completed",
        }
    }

    pub fn from_label(label: &str) -> Option<MaintenanceStatus> {
        Self::all().into_iter().find(|s| s.label() == label)
    }
}

impl fmt::Display for MaintenanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceRecord {
    pub id: EntityId,
    pub ship_id: EntityId,
    pub date: NaiveDate,
    #[serde(default)]
    pub component: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: MaintenanceStatus,
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub performed_by: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewMaintenanceRecord {
    pub ship_id: EntityId,
    pub date: NaiveDate,
    pub component: String,
    pub description: String,
    pub status: MaintenanceStatus,
    pub cost: f64,
    pub performed_by: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MaintenancePatch {
    pub date: Option<NaiveDate>,
    pub component: Option<String>,
    pub description: Option<String>,
    pub status: Option<MaintenanceStatus>,
    pub cost: Option<f64>,
    pub performed_by: Option<String>,
}

impl Entity for MaintenanceRecord {
    type Draft = NewMaintenanceRecord;
    type Patch = MaintenancePatch;

    fn id(&self) -> EntityId {
        self.id
    }

    fn build(id: EntityId, draft: NewMaintenanceRecord) -> Self {
        MaintenanceRecord {
            id,
            ship_id: draft.ship_id,
            date: draft.date,
            component: draft.component,
            description: draft.description,
            status: draft.status,
            cost: draft.cost,
            performed_by: draft.performed_by,
        }
    }

    fn apply(&mut self, patch: MaintenancePatch) {
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(component) = patch.component {
            self.component = component;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(cost) = patch.cost {
            self.cost = cost;
        }
        if let Some(performed_by) = patch.performed_by {
            self.performed_by = performed_by;
        }
    }
}

impl ShipOwned for MaintenanceRecord {
    fn ship_id(&self) -> EntityId {
        self.ship_id
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Type-erased record operations
// ═══════════════════════════════════════════════════════════════════════════════

/// Which child collection an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Trip,
    Voyage,
    FuelLog,
    Cost,
    Maintenance,
}

impl RecordKind {
    pub fn noun(&self) -> &'static str {
        match self {
            RecordKind::Trip => "trip",
            RecordKind::Voyage => "voyage",
            RecordKind::FuelLog => "fuel log",
            RecordKind::Cost => "cost",
            RecordKind::Maintenance => "maintenance record",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.noun())
    }
}

/// A creation request for any child collection
#[derive(Debug, Clone, PartialEq)]
pub enum RecordDraft {
    Trip(NewTrip),
    Voyage(NewVoyage),
    FuelLog(NewFuelLog),
    Cost(NewCost),
    Maintenance(NewMaintenanceRecord),
}

impl RecordDraft {
    pub fn kind(&self) -> RecordKind {
        match self {
            RecordDraft::Trip(_) => RecordKind::Trip,
            RecordDraft::Voyage(_) => RecordKind::Voyage,
            RecordDraft::FuelLog(_) => RecordKind::FuelLog,
            RecordDraft::Cost(_) => RecordKind::Cost,
            RecordDraft::Maintenance(_) => RecordKind::Maintenance,
        }
    }
}

/// A partial update for any child collection
#[derive(Debug, Clone, PartialEq)]
pub enum RecordPatch {
    Trip(EntityId, TripPatch),
    Voyage(EntityId, VoyagePatch),
    FuelLog(EntityId, FuelLogPatch),
    Cost(EntityId, CostPatch),
    Maintenance(EntityId, MaintenancePatch),
}

impl RecordPatch {
    pub fn kind(&self) -> RecordKind {
        match self {
            RecordPatch::Trip(..) => RecordKind::Trip,
            RecordPatch::Voyage(..) => RecordKind::Voyage,
            RecordPatch::FuelLog(..) => RecordKind::FuelLog,
            RecordPatch::Cost(..) => RecordKind::Cost,
            RecordPatch::Maintenance(..) => RecordKind::Maintenance,
        }
    }

    pub fn id(&self) -> EntityId {
        match self {
            RecordPatch::Trip(id, _)
            | RecordPatch::Voyage(id, _)
            | RecordPatch::FuelLog(id, _)
            | RecordPatch::Cost(id, _)
            | RecordPatch::Maintenance(id, _) => *id,
        }
    }
}
