//! Where fleet snapshots are loaded from and saved to

use crate::model::records::{
    MaintenanceStatus, NewCost, NewFuelLog, NewMaintenanceRecord, NewTrip, NewVoyage,
};
use crate::model::ship::{NewShip, ShipDefaults, ShipPatch, ShipStatus};
use crate::model::store::{FleetSnapshot, FleetStore};
use chrono::{Duration, Local, NaiveDate};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing::{debug, info};

/// Failures at the persistence seam
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("in-memory source is poisoned")]
    Poisoned,
}

/// Injectable persistence collaborator
pub trait FleetSource: Send + Sync {
    /// Short human-readable description (shown in the header)
    fn describe(&self) -> String;

    fn load(&self) -> Result<FleetSnapshot, DataError>;

    fn save(&self, snapshot: &FleetSnapshot) -> Result<(), DataError>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// File source
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Yaml,
}

impl FileFormat {
    /// `.yaml`/`.yml` are YAML, everything else JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                FileFormat::Yaml
            }
            _ => FileFormat::Json,
        }
    }
}

/// A JSON or YAML data file on disk
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    format: FileFormat,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = FileFormat::from_path(&path);
        Self { path, format }
    }

    fn decode(&self, contents: &str) -> Result<FleetSnapshot, DataError> {
        match self.format {
            FileFormat::Json => serde_json::from_str(contents).map_err(|source| DataError::Json {
                path: self.path.clone(),
                source,
            }),
            FileFormat::Yaml => serde_yaml::from_str(contents).map_err(|source| DataError::Yaml {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn encode(&self, snapshot: &FleetSnapshot) -> Result<String, DataError> {
        match self.format {
            FileFormat::Json => {
                serde_json::to_string_pretty(snapshot).map_err(|source| DataError::Json {
                    path: self.path.clone(),
                    source,
                })
            }
            FileFormat::Yaml => serde_yaml::to_string(snapshot).map_err(|source| DataError::Yaml {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn write_error(&self, source: std::io::Error) -> DataError {
        DataError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

impl FleetSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<FleetSnapshot, DataError> {
        if !self.path.exists() {
            info!(path = %self.path.display(), "Data file missing, starting with an empty fleet");
            return Ok(FleetSnapshot::empty());
        }
        let contents = fs::read_to_string(&self.path).map_err(|source| DataError::Read {
            path: self.path.clone(),
            source,
        })?;
        let snapshot = self.decode(&contents)?;
        info!(path = %self.path.display(), ships = snapshot.ships.len(), "Fleet loaded");
        Ok(snapshot)
    }

    /// Write next to the target, then rename over it
    fn save(&self, snapshot: &FleetSnapshot) -> Result<(), DataError> {
        let contents = self.encode(snapshot)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.write_error(e))?;
        }
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, contents).map_err(|e| self.write_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.write_error(e))?;
        debug!(path = %self.path.display(), "Fleet saved");
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Memory source
// ═══════════════════════════════════════════════════════════════════════════════

/// Snapshot held in memory; used for `--demo` and tests
#[derive(Debug, Default)]
pub struct MemorySource {
    snapshot: Mutex<FleetSnapshot>,
    saves: Mutex<usize>,
}

impl MemorySource {
    pub fn new(snapshot: FleetSnapshot) -> Self {
        Self {
            snapshot: Mutex::new(snapshot),
            saves: Mutex::new(0),
        }
    }

    /// A small sample fleet
    pub fn demo() -> Self {
        Self::new(demo_snapshot(Local::now().date_naive()))
    }

    /// Number of successful saves so far
    #[cfg(test)]
    pub fn saves(&self) -> usize {
        self.saves.lock().map(|n| *n).unwrap_or(0)
    }

    pub fn current(&self) -> Result<FleetSnapshot, DataError> {
        self.snapshot
            .lock()
            .map(|s| s.clone())
            .map_err(|_| DataError::Poisoned)
    }
}

impl FleetSource for MemorySource {
    fn describe(&self) -> String {
        "in-memory".to_string()
    }

    fn load(&self) -> Result<FleetSnapshot, DataError> {
        self.current()
    }

    fn save(&self, snapshot: &FleetSnapshot) -> Result<(), DataError> {
        *self.snapshot.lock().map_err(|_| DataError::Poisoned)? = snapshot.clone();
        *self.saves.lock().map_err(|_| DataError::Poisoned)? += 1;
        Ok(())
    }
}

/// Build the sample fleet through the store so every invariant holds
pub fn demo_snapshot(today: NaiveDate) -> FleetSnapshot {
    let mut store = FleetStore::loaded(ShipDefaults::default(), FleetSnapshot::empty());
    let days_ago = |n: i64| today - Duration::days(n);

    let ships = [
        ("Sao Mai", "Bulk carrier", "574001230", "9301230", ShipStatus::InTransit, 16.05, 108.25, 12.4),
        ("Hai Au", "Container ship", "574002340", "9402340", ShipStatus::AtPort, 10.7626, 106.7431, 0.0),
        ("Bach Dang", "Oil tanker", "574003450", "9503450", ShipStatus::MaintenanceRequired, 20.86, 106.68, 0.0),
    ];

    for (name, ship_type, imo, true_imo, status, lat, lon, speed) in ships {
        let Some(id) = store.add_ship(NewShip {
            name: name.to_string(),
            ship_type: ship_type.to_string(),
            imo: imo.to_string(),
            true_imo: true_imo.to_string(),
        }) else {
            continue;
        };
        store.update_ship(
            id,
            ShipPatch {
                status: Some(status),
                latitude: Some(lat),
                longitude: Some(lon),
                speed: Some(speed),
                captain: Some(format!("Captain of {name}")),
                built_year: Some(2008 + id as i32 * 3),
                ..ShipPatch::default()
            },
        );

        let trip_id = store.add_trip(NewTrip {
            ship_id: id,
            name: format!("{name} coastal run"),
            origin: "Hai Phong".to_string(),
            destination: "Ho Chi Minh City".to_string(),
            start_date: days_ago(30),
            end_date: Some(days_ago(20)),
            notes: String::new(),
        });
        store.add_voyage(NewVoyage {
            ship_id: id,
            trip_id,
            departure_port: "Hai Phong".to_string(),
            arrival_port: "Da Nang".to_string(),
            departure_date: days_ago(30),
            arrival_date: Some(days_ago(27)),
            cargo: "Rice".to_string(),
            distance_nm: 410.0,
        });
        store.add_voyage(NewVoyage {
            ship_id: id,
            trip_id,
            departure_port: "Da Nang".to_string(),
            arrival_port: "Ho Chi Minh City".to_string(),
            departure_date: days_ago(26),
            arrival_date: Some(days_ago(20)),
            cargo: "Steel coils".to_string(),
            distance_nm: 520.0,
        });
        store.add_fuel_log(NewFuelLog {
            ship_id: id,
            date: days_ago(29),
            fuel_type: "VLSFO".to_string(),
            quantity_tons: 120.0,
            unit_price: 610.0,
            port: "Hai Phong".to_string(),
        });
        store.add_cost(NewCost {
            ship_id: id,
            trip_id,
            date: days_ago(27),
            category: "Port Fees".to_string(),
            description: "Da Nang berth".to_string(),
            amount: 3_800.0,
        });
        store.add_cost(NewCost {
            ship_id: id,
            trip_id: None,
            date: days_ago(15),
            category: "Crew Wages".to_string(),
            description: "Monthly payroll".to_string(),
            amount: 42_000.0,
        });
        store.add_maintenance(NewMaintenanceRecord {
            ship_id: id,
            date: days_ago(5),
            component: "Main engine".to_string(),
            description: "Fuel injector inspection".to_string(),
            status: if status == ShipStatus::MaintenanceRequired {
                MaintenanceStatus::InProgress
            } else {
                MaintenanceStatus::Scheduled
            },
            cost: 6_500.0,
            performed_by: "Saigon Shipyard".to_string(),
        });
    }

    store.snapshot()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 20).unwrap()
    }

    #[test]
    fn test_missing_file_loads_empty_fleet() {
        let dir = TempDir::new().unwrap();
        let source = FileSource::new(dir.path().join("fleet.json"));

        let snapshot = source.load().unwrap();

        assert!(snapshot.ships.is_empty());
        assert!(!snapshot.cost_categories.is_empty());
    }

    #[test]
    fn test_json_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("fleet.json");
        let source = FileSource::new(&path);
        let snapshot = demo_snapshot(today());

        source.save(&snapshot).unwrap();

        assert!(path.exists());
        assert!(!dir.path().join("nested").join("fleet.json.tmp").exists());
        assert_eq!(source.load().unwrap(), snapshot);
    }

    #[test]
    fn test_yaml_chosen_by_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fleet.yml");
        let source = FileSource::new(&path);
        source.save(&demo_snapshot(today())).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("fuelLogs:"));
        assert_eq!(source.load().unwrap().ships.len(), 3);
    }

    #[test]
    fn test_malformed_file_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fleet.json");
        fs::write(&path, "{ not json").unwrap();

        let err = FileSource::new(&path).load().unwrap_err();

        assert!(matches!(err, DataError::Json { .. }));
        assert!(err.to_string().contains("fleet.json"));
    }

    #[test]
    fn test_memory_source_counts_saves() {
        let source = MemorySource::new(FleetSnapshot::empty());
        let snapshot = demo_snapshot(today());

        source.save(&snapshot).unwrap();

        assert_eq!(source.saves(), 1);
        assert_eq!(source.load().unwrap(), snapshot);
    }

    #[test]
    fn test_demo_snapshot_is_consistent() {
        let snapshot = demo_snapshot(today());
        let mut store = FleetStore::default();
        let report = store.hydrate(snapshot.clone());

        assert!(report.is_clean());
        assert_eq!(snapshot.ships.len(), 3);
        assert_eq!(snapshot.voyages.len(), 6);
    }
}
