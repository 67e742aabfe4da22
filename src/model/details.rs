//! Per-ship view over the store's collections

use super::records::{Cost, FuelLog, MaintenanceRecord, Trip, Voyage};
use super::ship::Ship;

/// The selected ship together with the records it owns, in collection order
#[derive(Debug, Clone)]
pub struct ShipDetails<'a> {
    pub ship: &'a Ship,
    pub trips: Vec<&'a Trip>,
    pub voyages: Vec<&'a Voyage>,
    pub fuel_logs: Vec<&'a FuelLog>,
    pub costs: Vec<&'a Cost>,
    pub maintenance: Vec<&'a MaintenanceRecord>,
    pub categories: &'a [String],
}

impl<'a> ShipDetails<'a> {
    pub fn new(
        ship: &'a Ship,
        trips: Vec<&'a Trip>,
        voyages: Vec<&'a Voyage>,
        fuel_logs: Vec<&'a FuelLog>,
        costs: Vec<&'a Cost>,
        maintenance: Vec<&'a MaintenanceRecord>,
        categories: &'a [String],
    ) -> Self {
        Self {
            ship,
            trips,
            voyages,
            fuel_logs,
            costs,
            maintenance,
            categories,
        }
    }

    pub fn total_cost(&self) -> f64 {
        self.costs.iter().map(|c| c.amount).sum()
    }

    /// Totals per category in category-list order, skipping unused categories
    pub fn cost_by_category(&self) -> Vec<(&'a str, f64)> {
        self.categories
            .iter()
            .filter_map(|category| {
                let amounts: Vec<f64> = self
                    .costs
                    .iter()
                    .filter(|c| &c.category == category)
                    .map(|c| c.amount)
                    .collect();
                (!amounts.is_empty()).then(|| (category.as_str(), amounts.iter().sum()))
            })
            .collect()
    }

    pub fn total_fuel_tons(&self) -> f64 {
        self.fuel_logs.iter().map(|f| f.quantity_tons).sum()
    }

    pub fn total_fuel_spend(&self) -> f64 {
        self.fuel_logs.iter().map(|f| f.total()).sum()
    }

    pub fn total_distance_nm(&self) -> f64 {
        self.voyages.iter().map(|v| v.distance_nm).sum()
    }

    pub fn open_maintenance(&self) -> usize {
        self.maintenance
            .iter()
            .filter(|m| m.status != super::records::MaintenanceStatus::Completed)
            .count()
    }
}
