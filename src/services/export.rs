//! CSV ledgers for one ship

use crate::model::details::ShipDetails;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

/// Turn a ship name into a file-name friendly slug
pub fn slugify(name: &str) -> String {
    let mut slug = String::new();
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-').to_string();
    if slug.is_empty() {
        "ship".to_string()
    } else {
        slug
    }
}

fn write_ledger<T: Serialize>(path: &Path, rows: &[&T]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create export file '{}'", path.display()))?;
    let mut writer = csv::WriterBuilder::new().from_writer(BufWriter::new(file));
    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("Failed to write CSV row to '{}'", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush '{}'", path.display()))?;
    Ok(())
}

/// Write trips, voyages, fuel, costs and maintenance CSVs into `dir`
///
/// Returns the written paths in that order.
pub fn export_ship(details: &ShipDetails<'_>, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory '{}'", dir.display()))?;
    let slug = format!("{}-{}", slugify(&details.ship.name), details.ship.id);
    let path = |suffix: &str| dir.join(format!("{slug}-{suffix}.csv"));

    let written = vec![path("trips"), path("voyages"), path("fuel"), path("costs"), path("maintenance")];
    write_ledger(&written[0], &details.trips)?;
    write_ledger(&written[1], &details.voyages)?;
    write_ledger(&written[2], &details.fuel_logs)?;
    write_ledger(&written[3], &details.costs)?;
    write_ledger(&written[4], &details.maintenance)?;

    info!(ship_id = details.ship.id, dir = %dir.display(), "Exported ship ledgers");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ship::ShipDefaults;
    use crate::model::store::FleetStore;
    use crate::services::persistence::demo_snapshot;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Sao Mai"), "sao-mai");
        assert_eq!(slugify("  M/V  Hai-Au! "), "m-v-hai-au");
        assert_eq!(slugify("☃"), "ship");
    }

    #[test]
    fn test_export_writes_one_file_per_ledger() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let store = FleetStore::loaded(ShipDefaults::default(), demo_snapshot(today));
        let details = store.details(1).unwrap();
        let dir = TempDir::new().unwrap();

        let written = export_ship(&details, dir.path()).unwrap();

        assert_eq!(written.len(), 5);
        let costs = fs::read_to_string(&written[3]).unwrap();
        let mut lines = costs.lines();
        assert_eq!(
            lines.next(),
            Some("id,shipId,tripId,date,category,description,amount")
        );
        assert_eq!(lines.count(), details.costs.len());
        assert!(written[0].ends_with("sao-mai-1-trips.csv"));
    }
}
