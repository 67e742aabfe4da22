//! External service interactions
//!
//! - Persistence (data file / in-memory sources)
//! - Background loading of the initial snapshot
//! - CSV export of a ship's ledgers

pub mod export;
pub mod loader;
pub mod persistence;

pub use export::export_ship;
pub use loader::{FleetLoader, LoadOutcome};
pub use persistence::{FileSource, FleetSource, MemorySource};
