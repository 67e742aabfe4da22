//! The fleet store: every collection plus the rules that keep them consistent

use super::details::ShipDetails;
use super::entity::{owned_by, EntityId, Table};
use super::records::{
    Cost, CostPatch, FuelLog, FuelLogPatch, MaintenancePatch, MaintenanceRecord, NewCost,
    NewFuelLog, NewMaintenanceRecord, NewTrip, NewVoyage, RecordDraft, RecordKind, RecordPatch,
    Trip, TripPatch, Voyage, VoyagePatch, UNCATEGORIZED,
};
use super::ship::{NewShip, Ship, ShipDefaults, ShipPatch};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Categories a fresh fleet starts with
pub const DEFAULT_COST_CATEGORIES: [&str; 6] = [
    "Port Fees",
    "Crew Wages",
    "Repairs",
    "Insurance",
    "Provisions",
    UNCATEGORIZED,
];

/// Owned copy of every collection; the unit of persistence
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FleetSnapshot {
    pub ships: Vec<Ship>,
    pub trips: Vec<Trip>,
    pub voyages: Vec<Voyage>,
    pub fuel_logs: Vec<FuelLog>,
    pub costs: Vec<Cost>,
    pub maintenance: Vec<MaintenanceRecord>,
    pub cost_categories: Vec<String>,
}

impl FleetSnapshot {
    /// An empty fleet with the default categories
    pub fn empty() -> Self {
        Self {
            cost_categories: DEFAULT_COST_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            ..Self::default()
        }
    }
}

/// What `hydrate` had to repair in a loaded snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HydrateReport {
    pub duplicate_ids: usize,
    pub orphaned_records: usize,
    pub dangling_trip_refs: usize,
    pub registered_categories: usize,
}

impl HydrateReport {
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}

/// Single source of truth for the fleet
///
/// Starts in the loading state. Every mutation made before `hydrate` is a
/// logged no-op.
#[derive(Debug, Clone)]
pub struct FleetStore {
    ships: Table<Ship>,
    trips: Table<Trip>,
    voyages: Table<Voyage>,
    fuel_logs: Table<FuelLog>,
    costs: Table<Cost>,
    maintenance: Table<MaintenanceRecord>,
    cost_categories: Vec<String>,
    loading: bool,
    revision: u64,
    ship_defaults: ShipDefaults,
}

impl Default for FleetStore {
    fn default() -> Self {
        Self::new(ShipDefaults::default())
    }
}

impl FleetStore {
    pub fn new(ship_defaults: ShipDefaults) -> Self {
        Self {
            ships: Table::new(),
            trips: Table::new(),
            voyages: Table::new(),
            fuel_logs: Table::new(),
            costs: Table::new(),
            maintenance: Table::new(),
            cost_categories: Vec::new(),
            loading: true,
            revision: 0,
            ship_defaults,
        }
    }

    /// A store that is already hydrated with `snapshot`
    pub fn loaded(ship_defaults: ShipDefaults, snapshot: FleetSnapshot) -> Self {
        let mut store = Self::new(ship_defaults);
        store.hydrate(snapshot);
        store
    }

    // ─── Lifecycle ───────────────────────────────────────────────────────────

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Bumped on every successful mutation
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Install a loaded snapshot, repairing anything inconsistent
    pub fn hydrate(&mut self, snapshot: FleetSnapshot) -> HydrateReport {
        let mut report = HydrateReport::default();

        let mut ships = snapshot.ships;
        ships.iter_mut().for_each(Ship::normalize);
        let (ships, dropped) = Table::from_rows(ships);
        report.duplicate_ids += dropped;
        let ship_ids: HashSet<EntityId> = ships.iter().map(|s| s.id).collect();

        let (mut trips, dropped) = Table::from_rows(snapshot.trips);
        report.duplicate_ids += dropped;
        let (mut voyages, dropped) = Table::from_rows(snapshot.voyages);
        report.duplicate_ids += dropped;
        let (mut fuel_logs, dropped) = Table::from_rows(snapshot.fuel_logs);
        report.duplicate_ids += dropped;
        let (mut costs, dropped) = Table::from_rows(snapshot.costs);
        report.duplicate_ids += dropped;
        let (mut maintenance, dropped) = Table::from_rows(snapshot.maintenance);
        report.duplicate_ids += dropped;

        report.orphaned_records += trips.retain(|r| ship_ids.contains(&r.ship_id));
        report.orphaned_records += voyages.retain(|r| ship_ids.contains(&r.ship_id));
        report.orphaned_records += fuel_logs.retain(|r| ship_ids.contains(&r.ship_id));
        report.orphaned_records += costs.retain(|r| ship_ids.contains(&r.ship_id));
        report.orphaned_records += maintenance.retain(|r| ship_ids.contains(&r.ship_id));

        // A trip reference must point at a trip of the same ship
        let trip_owner = |trip_id: EntityId| trips.get(trip_id).map(|t| t.ship_id);
        for voyage in voyages.iter_mut() {
            if let Some(trip_id) = voyage.trip_id {
                if trip_owner(trip_id) != Some(voyage.ship_id) {
                    voyage.trip_id = None;
                    report.dangling_trip_refs += 1;
                }
            }
        }
        for cost in costs.iter_mut() {
            if let Some(trip_id) = cost.trip_id {
                if trip_owner(trip_id) != Some(cost.ship_id) {
                    cost.trip_id = None;
                    report.dangling_trip_refs += 1;
                }
            }
        }

        let mut categories: Vec<String> = Vec::new();
        for name in snapshot.cost_categories {
            let name = name.trim().to_string();
            if !name.is_empty() && !categories.contains(&name) {
                categories.push(name);
            }
        }
        for cost in costs.iter_mut() {
            let name = cost.category.trim().to_string();
            cost.category = if name.is_empty() {
                UNCATEGORIZED.to_string()
            } else {
                name
            };
            if !categories.contains(&cost.category) {
                categories.push(cost.category.clone());
                report.registered_categories += 1;
            }
        }

        self.ships = ships;
        self.trips = trips;
        self.voyages = voyages;
        self.fuel_logs = fuel_logs;
        self.costs = costs;
        self.maintenance = maintenance;
        self.cost_categories = categories;
        self.loading = false;
        self.revision += 1;

        if report.is_clean() {
            info!(ships = self.ships.len(), "Fleet hydrated");
        } else {
            warn!(?report, ships = self.ships.len(), "Fleet hydrated with repairs");
        }
        report
    }

    pub fn snapshot(&self) -> FleetSnapshot {
        FleetSnapshot {
            ships: self.ships.as_slice().to_vec(),
            trips: self.trips.as_slice().to_vec(),
            voyages: self.voyages.as_slice().to_vec(),
            fuel_logs: self.fuel_logs.as_slice().to_vec(),
            costs: self.costs.as_slice().to_vec(),
            maintenance: self.maintenance.as_slice().to_vec(),
            cost_categories: self.cost_categories.clone(),
        }
    }

    fn guard(&self, operation: &str) -> bool {
        if self.loading {
            debug!(operation, "Ignored while loading");
        }
        !self.loading
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    // ─── Read access ─────────────────────────────────────────────────────────

    pub fn ships(&self) -> &[Ship] {
        self.ships.as_slice()
    }

    pub fn ship(&self, id: EntityId) -> Option<&Ship> {
        self.ships.get(id)
    }

    #[cfg(test)]
    pub fn trips(&self) -> &[Trip] {
        self.trips.as_slice()
    }

    #[cfg(test)]
    pub fn voyages(&self) -> &[Voyage] {
        self.voyages.as_slice()
    }

    #[cfg(test)]
    pub fn fuel_logs(&self) -> &[FuelLog] {
        self.fuel_logs.as_slice()
    }

    #[cfg(test)]
    pub fn costs(&self) -> &[Cost] {
        self.costs.as_slice()
    }

    #[cfg(test)]
    pub fn maintenance(&self) -> &[MaintenanceRecord] {
        self.maintenance.as_slice()
    }

    pub fn cost_categories(&self) -> &[String] {
        &self.cost_categories
    }

    /// Compose the detail view of one ship
    pub fn details(&self, ship_id: EntityId) -> Option<ShipDetails<'_>> {
        let ship = self.ships.get(ship_id)?;
        Some(ShipDetails::new(
            ship,
            owned_by(self.trips.iter(), ship_id),
            owned_by(self.voyages.iter(), ship_id),
            owned_by(self.fuel_logs.iter(), ship_id),
            owned_by(self.costs.iter(), ship_id),
            owned_by(self.maintenance.iter(), ship_id),
            &self.cost_categories,
        ))
    }

    // ─── Ships ───────────────────────────────────────────────────────────────

    pub fn add_ship(&mut self, draft: NewShip) -> Option<EntityId> {
        if !self.guard("add_ship") {
            return None;
        }
        let id = self.ships.insert(self.ship_defaults.complete(draft));
        self.touch();
        debug!(id, "Ship added");
        Some(id)
    }

    pub fn update_ship(&mut self, id: EntityId, patch: ShipPatch) -> bool {
        if !self.guard("update_ship") {
            return false;
        }
        let updated = self.ships.update(id, patch);
        if updated {
            self.touch();
            debug!(id, "Ship updated");
        } else {
            debug!(id, "Update of unknown ship ignored");
        }
        updated
    }

    /// Remove a ship and every record it owns
    pub fn delete_ship(&mut self, id: EntityId) -> bool {
        if !self.guard("delete_ship") {
            return false;
        }
        if !self.ships.remove(id) {
            debug!(id, "Delete of unknown ship ignored");
            return false;
        }
        let removed = self.trips.retain(|r| r.ship_id != id)
            + self.voyages.retain(|r| r.ship_id != id)
            + self.fuel_logs.retain(|r| r.ship_id != id)
            + self.costs.retain(|r| r.ship_id != id)
            + self.maintenance.retain(|r| r.ship_id != id);
        self.touch();
        debug!(id, cascaded = removed, "Ship deleted");
        true
    }

    // ─── Trips ───────────────────────────────────────────────────────────────

    pub fn add_trip(&mut self, draft: NewTrip) -> Option<EntityId> {
        if !self.guard("add_trip") || !self.owner_exists(draft.ship_id, RecordKind::Trip) {
            return None;
        }
        let id = self.trips.insert(draft);
        self.touch();
        debug!(id, "Trip added");
        Some(id)
    }

    pub fn update_trip(&mut self, id: EntityId, patch: TripPatch) -> bool {
        if !self.guard("update_trip") {
            return false;
        }
        let updated = self.trips.update(id, patch);
        self.finish_update(RecordKind::Trip, id, updated)
    }

    /// Remove a trip and detach voyages and costs that referenced it
    pub fn delete_trip(&mut self, id: EntityId) -> bool {
        if !self.guard("delete_trip") {
            return false;
        }
        if !self.trips.remove(id) {
            return self.finish_delete(RecordKind::Trip, id, false);
        }
        for voyage in self.voyages.iter_mut().filter(|v| v.trip_id == Some(id)) {
            voyage.trip_id = None;
        }
        for cost in self.costs.iter_mut().filter(|c| c.trip_id == Some(id)) {
            cost.trip_id = None;
        }
        self.finish_delete(RecordKind::Trip, id, true)
    }

    // ─── Voyages ─────────────────────────────────────────────────────────────

    pub fn add_voyage(&mut self, mut draft: NewVoyage) -> Option<EntityId> {
        if !self.guard("add_voyage") || !self.owner_exists(draft.ship_id, RecordKind::Voyage) {
            return None;
        }
        draft.trip_id = self.resolve_trip(draft.ship_id, draft.trip_id);
        let id = self.voyages.insert(draft);
        self.touch();
        debug!(id, "Voyage added");
        Some(id)
    }

    pub fn update_voyage(&mut self, id: EntityId, mut patch: VoyagePatch) -> bool {
        if !self.guard("update_voyage") {
            return false;
        }
        if let (Some(trip_id), Some(voyage)) = (patch.trip_id, self.voyages.get(id)) {
            patch.trip_id = Some(self.resolve_trip(voyage.ship_id, trip_id));
        }
        let updated = self.voyages.update(id, patch);
        self.finish_update(RecordKind::Voyage, id, updated)
    }

    pub fn delete_voyage(&mut self, id: EntityId) -> bool {
        if !self.guard("delete_voyage") {
            return false;
        }
        let removed = self.voyages.remove(id);
        self.finish_delete(RecordKind::Voyage, id, removed)
    }

    // ─── Fuel logs ───────────────────────────────────────────────────────────

    pub fn add_fuel_log(&mut self, draft: NewFuelLog) -> Option<EntityId> {
        if !self.guard("add_fuel_log") || !self.owner_exists(draft.ship_id, RecordKind::FuelLog) {
            return None;
        }
        let id = self.fuel_logs.insert(draft);
        self.touch();
        debug!(id, "Fuel log added");
        Some(id)
    }

    pub fn update_fuel_log(&mut self, id: EntityId, patch: FuelLogPatch) -> bool {
        if !self.guard("update_fuel_log") {
            return false;
        }
        let updated = self.fuel_logs.update(id, patch);
        self.finish_update(RecordKind::FuelLog, id, updated)
    }

    pub fn delete_fuel_log(&mut self, id: EntityId) -> bool {
        if !self.guard("delete_fuel_log") {
            return false;
        }
        let removed = self.fuel_logs.remove(id);
        self.finish_delete(RecordKind::FuelLog, id, removed)
    }

    // ─── Costs ───────────────────────────────────────────────────────────────

    pub fn add_cost(&mut self, mut draft: NewCost) -> Option<EntityId> {
        if !self.guard("add_cost") || !self.owner_exists(draft.ship_id, RecordKind::Cost) {
            return None;
        }
        draft.category = self.register_category(&draft.category);
        draft.trip_id = self.resolve_trip(draft.ship_id, draft.trip_id);
        let id = self.costs.insert(draft);
        self.touch();
        debug!(id, "Cost added");
        Some(id)
    }

    pub fn update_cost(&mut self, id: EntityId, mut patch: CostPatch) -> bool {
        if !self.guard("update_cost") {
            return false;
        }
        let Some(ship_id) = self.costs.get(id).map(|c| c.ship_id) else {
            return self.finish_update(RecordKind::Cost, id, false);
        };
        if let Some(category) = patch.category.take() {
            patch.category = Some(self.register_category(&category));
        }
        if let Some(trip_id) = patch.trip_id {
            patch.trip_id = Some(self.resolve_trip(ship_id, trip_id));
        }
        let updated = self.costs.update(id, patch);
        self.finish_update(RecordKind::Cost, id, updated)
    }

    pub fn delete_cost(&mut self, id: EntityId) -> bool {
        if !self.guard("delete_cost") {
            return false;
        }
        let removed = self.costs.remove(id);
        self.finish_delete(RecordKind::Cost, id, removed)
    }

    // ─── Maintenance ─────────────────────────────────────────────────────────

    pub fn add_maintenance(&mut self, draft: NewMaintenanceRecord) -> Option<EntityId> {
        if !self.guard("add_maintenance")
            || !self.owner_exists(draft.ship_id, RecordKind::Maintenance)
        {
            return None;
        }
        let id = self.maintenance.insert(draft);
        self.touch();
        debug!(id, "Maintenance record added");
        Some(id)
    }

    pub fn update_maintenance(&mut self, id: EntityId, patch: MaintenancePatch) -> bool {
        if !self.guard("update_maintenance") {
            return false;
        }
        let updated = self.maintenance.update(id, patch);
        self.finish_update(RecordKind::Maintenance, id, updated)
    }

    pub fn delete_maintenance(&mut self, id: EntityId) -> bool {
        if !self.guard("delete_maintenance") {
            return false;
        }
        let removed = self.maintenance.remove(id);
        self.finish_delete(RecordKind::Maintenance, id, removed)
    }

    // ─── Generic dispatch ────────────────────────────────────────────────────

    pub fn add_record(&mut self, draft: RecordDraft) -> Option<EntityId> {
        match draft {
            RecordDraft::Trip(d) => self.add_trip(d),
            RecordDraft::Voyage(d) => self.add_voyage(d),
            RecordDraft::FuelLog(d) => self.add_fuel_log(d),
            RecordDraft::Cost(d) => self.add_cost(d),
            RecordDraft::Maintenance(d) => self.add_maintenance(d),
        }
    }

    pub fn update_record(&mut self, patch: RecordPatch) -> bool {
        match patch {
            RecordPatch::Trip(id, p) => self.update_trip(id, p),
            RecordPatch::Voyage(id, p) => self.update_voyage(id, p),
            RecordPatch::FuelLog(id, p) => self.update_fuel_log(id, p),
            RecordPatch::Cost(id, p) => self.update_cost(id, p),
            RecordPatch::Maintenance(id, p) => self.update_maintenance(id, p),
        }
    }

    pub fn delete_record(&mut self, kind: RecordKind, id: EntityId) -> bool {
        match kind {
            RecordKind::Trip => self.delete_trip(id),
            RecordKind::Voyage => self.delete_voyage(id),
            RecordKind::FuelLog => self.delete_fuel_log(id),
            RecordKind::Cost => self.delete_cost(id),
            RecordKind::Maintenance => self.delete_maintenance(id),
        }
    }

    // ─── Cost categories ─────────────────────────────────────────────────────

    pub fn add_cost_category(&mut self, name: &str) -> bool {
        if !self.guard("add_cost_category") {
            return false;
        }
        let name = name.trim();
        if name.is_empty() || self.cost_categories.iter().any(|c| c == name) {
            debug!(name, "Cost category ignored");
            return false;
        }
        self.cost_categories.push(name.to_string());
        self.touch();
        debug!(name, "Cost category added");
        true
    }

    /// Rename `old` to `new`, merging into `new` when it already exists
    pub fn update_cost_category(&mut self, old: &str, new: &str) -> bool {
        if !self.guard("update_cost_category") {
            return false;
        }
        let new = new.trim();
        let Some(position) = self.cost_categories.iter().position(|c| c == old) else {
            debug!(old, "Rename of unknown cost category ignored");
            return false;
        };
        if new.is_empty() || new == old {
            return false;
        }

        if self.cost_categories.iter().any(|c| c == new) {
            self.cost_categories.remove(position);
            debug!(old, new, "Cost categories merged");
        } else {
            self.cost_categories[position] = new.to_string();
            debug!(old, new, "Cost category renamed");
        }
        for cost in self.costs.iter_mut().filter(|c| c.category == old) {
            cost.category = new.to_string();
        }
        self.touch();
        true
    }

    /// Delete a category, moving its costs to `Uncategorized`
    pub fn delete_cost_category(&mut self, name: &str) -> bool {
        if !self.guard("delete_cost_category") {
            return false;
        }
        let Some(position) = self.cost_categories.iter().position(|c| c == name) else {
            return false;
        };
        let in_use = self.costs.iter().any(|c| c.category == name);
        if name == UNCATEGORIZED && in_use {
            warn!("Refusing to delete '{}' while costs use it", UNCATEGORIZED);
            return false;
        }

        self.cost_categories.remove(position);
        if in_use {
            for cost in self.costs.iter_mut().filter(|c| c.category == name) {
                cost.category = UNCATEGORIZED.to_string();
            }
            if !self.cost_categories.iter().any(|c| c == UNCATEGORIZED) {
                self.cost_categories.push(UNCATEGORIZED.to_string());
            }
        }
        self.touch();
        debug!(name, reassigned = in_use, "Cost category deleted");
        true
    }

    /// How many costs use `name`
    pub fn category_usage(&self, name: &str) -> usize {
        self.costs.iter().filter(|c| c.category == name).count()
    }

    // ─── Helpers ─────────────────────────────────────────────────────────────

    fn owner_exists(&self, ship_id: EntityId, kind: RecordKind) -> bool {
        let exists = self.ships.contains(ship_id);
        if !exists {
            debug!(ship_id, %kind, "Add for unknown ship ignored");
        }
        exists
    }

    /// Keep a trip reference only when it names a trip of the same ship
    fn resolve_trip(&self, ship_id: EntityId, trip_id: Option<EntityId>) -> Option<EntityId> {
        trip_id.filter(|id| self.trips.get(*id).is_some_and(|t| t.ship_id == ship_id))
    }

    /// Trim a category name and register it if new
    fn register_category(&mut self, name: &str) -> String {
        let name = match name.trim() {
            "" => UNCATEGORIZED,
            trimmed => trimmed,
        };
        if !self.cost_categories.iter().any(|c| c == name) {
            self.cost_categories.push(name.to_string());
            debug!(name, "Cost category registered");
        }
        name.to_string()
    }

    fn finish_update(&mut self, kind: RecordKind, id: EntityId, updated: bool) -> bool {
        if updated {
            self.touch();
            debug!(id, %kind, "Record updated");
        } else {
            debug!(id, %kind, "Update of unknown record ignored");
        }
        updated
    }

    fn finish_delete(&mut self, kind: RecordKind, id: EntityId, removed: bool) -> bool {
        if removed {
            self.touch();
            debug!(id, %kind, "Record deleted");
        } else {
            debug!(id, %kind, "Delete of unknown record ignored");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::records::MaintenanceStatus;
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn store() -> FleetStore {
        FleetStore::loaded(ShipDefaults::default(), FleetSnapshot::empty())
    }

    fn ship(store: &mut FleetStore, name: &str) -> EntityId {
        store
            .add_ship(NewShip {
                name: name.to_string(),
                ..NewShip::default()
            })
            .unwrap()
    }

    fn trip(ship_id: EntityId) -> NewTrip {
        NewTrip {
            ship_id,
            name: "Spring run".to_string(),
            origin: "Hai Phong".to_string(),
            destination: "Singapore".to_string(),
            start_date: date(1),
            end_date: None,
            notes: String::new(),
        }
    }

    fn voyage(ship_id: EntityId, trip_id: Option<EntityId>) -> NewVoyage {
        NewVoyage {
            ship_id,
            trip_id,
            departure_port: "Hai Phong".to_string(),
            arrival_port: "Da Nang".to_string(),
            departure_date: date(2),
            arrival_date: None,
            cargo: "Rice".to_string(),
            distance_nm: 420.0,
        }
    }

    fn fuel(ship_id: EntityId) -> NewFuelLog {
        NewFuelLog {
            ship_id,
            date: date(3),
            fuel_type: "VLSFO".to_string(),
            quantity_tons: 100.0,
            unit_price: 600.0,
            port: "Da Nang".to_string(),
        }
    }

    fn cost(ship_id: EntityId, category: &str, amount: f64) -> NewCost {
        NewCost {
            ship_id,
            trip_id: None,
            date: date(4),
            category: category.to_string(),
            description: "Pilotage".to_string(),
            amount,
        }
    }

    fn maintenance(ship_id: EntityId) -> NewMaintenanceRecord {
        NewMaintenanceRecord {
            ship_id,
            date: date(5),
            component: "Main engine".to_string(),
            description: "Overhaul".to_string(),
            status: MaintenanceStatus::Scheduled,
            cost: 12_000.0,
            performed_by: "Yard".to_string(),
        }
    }

    fn populate(store: &mut FleetStore, ship_id: EntityId) {
        let trip_id = store.add_trip(trip(ship_id));
        store.add_voyage(voyage(ship_id, trip_id)).unwrap();
        store.add_fuel_log(fuel(ship_id)).unwrap();
        store.add_cost(cost(ship_id, "Port Fees", 100.0)).unwrap();
        store.add_maintenance(maintenance(ship_id)).unwrap();
    }

    #[test]
    fn test_mutations_are_ignored_while_loading() {
        let mut store = FleetStore::default();
        assert!(store.is_loading());

        assert_eq!(store.add_ship(NewShip::default()), None);
        assert!(!store.add_cost_category("Bunkering"));
        assert!(store.ships().is_empty());
        assert_eq!(store.revision(), 0);

        store.hydrate(FleetSnapshot::empty());
        assert!(!store.is_loading());
        assert!(store.add_ship(NewShip::default()).is_some());
    }

    #[test]
    fn test_add_ship_assigns_fresh_ids() {
        let mut store = store();
        let a = ship(&mut store, "A");
        let b = ship(&mut store, "B");
        store.delete_ship(b);
        let c = ship(&mut store, "C");

        assert_eq!((a, b, c), (1, 2, 3));
        assert_eq!(store.ship(a).unwrap().status, ShipDefaults::default().status);
    }

    #[test]
    fn test_delete_ship_cascades_exactly() {
        let mut store = store();
        let a = ship(&mut store, "A");
        let b = ship(&mut store, "B");
        populate(&mut store, a);
        populate(&mut store, b);

        let before = store.snapshot();
        assert!(store.delete_ship(a));
        let after = store.snapshot();

        assert!(after.ships.iter().all(|s| s.id != a));
        assert!(after.trips.iter().all(|r| r.ship_id == b));
        assert!(after.voyages.iter().all(|r| r.ship_id == b));
        assert!(after.fuel_logs.iter().all(|r| r.ship_id == b));
        assert!(after.costs.iter().all(|r| r.ship_id == b));
        assert!(after.maintenance.iter().all(|r| r.ship_id == b));

        // Nothing belonging to B was touched
        let kept: Vec<_> = before.costs.iter().filter(|c| c.ship_id == b).collect();
        assert_eq!(after.costs.iter().collect::<Vec<_>>(), kept);
        assert_eq!(after.trips.len(), 1);
        assert_eq!(after.cost_categories, before.cost_categories);
    }

    #[test]
    fn test_update_missing_id_is_noop() {
        let mut store = store();
        let a = ship(&mut store, "A");
        populate(&mut store, a);
        let before = store.snapshot();
        let revision = store.revision();

        assert!(!store.update_ship(99, ShipPatch::rename("X")));
        assert!(!store.update_trip(99, TripPatch::default()));
        assert!(!store.update_cost(99, CostPatch::default()));
        assert!(!store.delete_voyage(99));
        assert!(!store.delete_record(RecordKind::Maintenance, 99));

        assert_eq!(store.snapshot(), before);
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn test_add_child_for_missing_ship_is_noop() {
        let mut store = store();
        assert_eq!(store.add_fuel_log(fuel(7)), None);
        assert_eq!(store.add_record(RecordDraft::Trip(trip(7))), None);
        assert!(store.fuel_logs().is_empty());
    }

    #[test]
    fn test_rename_category_updates_exactly_matching_costs() {
        let mut store = store();
        let a = ship(&mut store, "A");
        let fuel_cost = store.add_cost(cost(a, "Fuel", 10.0)).unwrap();
        let port_cost = store.add_cost(cost(a, "Port", 20.0)).unwrap();

        assert!(store.update_cost_category("Fuel", "Bunker"));

        let categories = store.cost_categories();
        assert!(categories.iter().any(|c| c == "Bunker"));
        assert!(categories.iter().all(|c| c != "Fuel"));
        let by_id = |id| store.costs().iter().find(|c| c.id == id).unwrap().category.clone();
        assert_eq!(by_id(fuel_cost), "Bunker");
        assert_eq!(by_id(port_cost), "Port");
    }

    #[test]
    fn test_rename_preserves_position_and_merges_into_existing() {
        let mut store = store();
        let position = store.cost_categories().iter().position(|c| c == "Crew Wages");
        assert!(store.update_cost_category("Crew Wages", "  Crew  "));
        assert_eq!(
            store.cost_categories().iter().position(|c| c == "Crew"),
            position
        );

        let a = ship(&mut store, "A");
        store.add_cost(cost(a, "Crew", 5.0)).unwrap();
        let len = store.cost_categories().len();
        assert!(store.update_cost_category("Crew", "Repairs"));
        assert_eq!(store.cost_categories().len(), len - 1);
        assert_eq!(store.costs()[0].category, "Repairs");
    }

    #[test]
    fn test_rename_rejects_unknown_empty_and_identical() {
        let mut store = store();
        let before = store.cost_categories().to_vec();

        assert!(!store.update_cost_category("Nope", "Other"));
        assert!(!store.update_cost_category("Repairs", "   "));
        assert!(!store.update_cost_category("Repairs", "Repairs"));
        assert_eq!(store.cost_categories(), before.as_slice());
    }

    #[test]
    fn test_add_category_trims_and_ignores_duplicates() {
        let mut store = store();
        assert!(store.add_cost_category("  Bunkering "));
        assert!(!store.add_cost_category("Bunkering"));
        assert!(!store.add_cost_category("   "));
        assert_eq!(store.cost_categories().last().unwrap(), "Bunkering");
    }

    #[test]
    fn test_delete_category_reassigns_costs() {
        let mut store = store();
        let a = ship(&mut store, "A");
        store.add_cost(cost(a, "Insurance", 50.0)).unwrap();
        store.delete_cost_category(UNCATEGORIZED);
        assert!(!store.cost_categories().iter().any(|c| c == UNCATEGORIZED));

        assert!(store.delete_cost_category("Insurance"));

        assert_eq!(store.costs()[0].category, UNCATEGORIZED);
        assert_eq!(store.cost_categories().last().unwrap(), UNCATEGORIZED);
        assert!(!store.delete_cost_category(UNCATEGORIZED));
    }

    #[test]
    fn test_cost_with_unknown_or_empty_category_is_registered() {
        let mut store = store();
        let a = ship(&mut store, "A");
        let id = store.add_cost(cost(a, " Canal Dues ", 1.0)).unwrap();
        assert!(store.cost_categories().iter().any(|c| c == "Canal Dues"));

        store.update_cost(
            id,
            CostPatch {
                category: Some(String::new()),
                ..CostPatch::default()
            },
        );
        assert_eq!(store.costs()[0].category, UNCATEGORIZED);
    }

    #[test]
    fn test_delete_trip_detaches_references() {
        let mut store = store();
        let a = ship(&mut store, "A");
        let trip_id = store.add_trip(trip(a)).unwrap();
        store.add_voyage(voyage(a, Some(trip_id))).unwrap();
        let mut linked = cost(a, "Port Fees", 1.0);
        linked.trip_id = Some(trip_id);
        store.add_cost(linked).unwrap();

        assert!(store.delete_trip(trip_id));
        assert_eq!(store.voyages()[0].trip_id, None);
        assert_eq!(store.costs()[0].trip_id, None);
    }

    #[test]
    fn test_trip_reference_must_belong_to_same_ship() {
        let mut store = store();
        let a = ship(&mut store, "A");
        let b = ship(&mut store, "B");
        let trip_b = store.add_trip(trip(b)).unwrap();

        let id = store.add_voyage(voyage(a, Some(trip_b))).unwrap();
        assert_eq!(store.voyages()[0].trip_id, None);

        let trip_a = store.add_trip(trip(a)).unwrap();
        store.update_voyage(
            id,
            VoyagePatch {
                trip_id: Some(Some(trip_a)),
                ..VoyagePatch::default()
            },
        );
        assert_eq!(store.voyages()[0].trip_id, Some(trip_a));
    }

    #[test]
    fn test_hydrate_repairs_inconsistent_snapshot() {
        let mut snapshot = FleetSnapshot::empty();
        let mut source = store();
        let a = ship(&mut source, "A");
        populate(&mut source, a);
        let mut loaded = source.snapshot();

        loaded.ships.push(loaded.ships[0].clone());
        let mut orphan = loaded.fuel_logs[0].clone();
        orphan.id = 40;
        orphan.ship_id = 99;
        loaded.fuel_logs.push(orphan);
        loaded.voyages[0].trip_id = Some(77);
        loaded.costs[0].category = "Towage".to_string();
        snapshot.ships = loaded.ships;
        snapshot.trips = loaded.trips;
        snapshot.voyages = loaded.voyages;
        snapshot.fuel_logs = loaded.fuel_logs;
        snapshot.costs = loaded.costs;

        let mut store = FleetStore::default();
        let report = store.hydrate(snapshot);

        assert_eq!(report.duplicate_ids, 1);
        assert_eq!(report.orphaned_records, 1);
        assert_eq!(report.dangling_trip_refs, 1);
        assert_eq!(report.registered_categories, 1);
        assert_eq!(store.ships().len(), 1);
        assert_eq!(store.fuel_logs().len(), 1);
        assert!(store.cost_categories().iter().any(|c| c == "Towage"));
        assert_eq!(store.add_fuel_log(fuel(a)), Some(41));
    }

    #[test]
    fn test_details_filters_and_totals() {
        let mut store = store();
        let a = ship(&mut store, "A");
        let b = ship(&mut store, "B");
        populate(&mut store, a);
        store.add_cost(cost(a, "Repairs", 25.0)).unwrap();
        store.add_cost(cost(b, "Repairs", 1000.0)).unwrap();

        let details = store.details(a).unwrap();
        assert_eq!(details.ship.id, a);
        assert_eq!(details.costs.len(), 2);
        assert_eq!(details.total_cost(), 125.0);
        assert_eq!(details.total_fuel_spend(), 60_000.0);
        assert!(store.details(99).is_none());
    }

    #[test]
    fn test_snapshot_roundtrips_through_json() {
        let mut store = store();
        let a = ship(&mut store, "A");
        populate(&mut store, a);

        let json = serde_json::to_string(&store.snapshot()).unwrap();
        assert!(json.contains("\"fuelLogs\""));
        assert!(json.contains("\"AT_PORT\""));
        let back: FleetSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, store.snapshot());
    }
}
