//! Background loader service
//!
//! Runs the initial `FleetSource::load` on a worker thread so the UI can
//! draw a spinner meanwhile. The result comes back over a channel and is
//! picked up by `poll` on every tick.

use super::persistence::{DataError, FleetSource};
use crate::model::store::FleetSnapshot;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::{error, info};

/// Message sent from the worker thread
#[derive(Debug)]
pub enum LoadMessage {
    Loaded(FleetSnapshot),
    Failed(DataError),
}

/// Final result of a load, as seen by the app
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(FleetSnapshot),
    Failed(String),
}

struct PendingLoad {
    receiver: Receiver<LoadMessage>,
    start_instant: Instant,
}

pub struct FleetLoader {
    job: Option<PendingLoad>,
}

impl Default for FleetLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl FleetLoader {
    pub fn new() -> Self {
        Self { job: None }
    }

    /// Start loading from `source` in the background
    pub fn spawn(&mut self, source: Arc<dyn FleetSource>) {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let message = match source.load() {
                Ok(snapshot) => LoadMessage::Loaded(snapshot),
                Err(err) => LoadMessage::Failed(err),
            };
            let _ = tx.send(message);
        });

        self.job = Some(PendingLoad {
            receiver: rx,
            start_instant: Instant::now(),
        });
    }

    pub fn is_pending(&self) -> bool {
        self.job.is_some()
    }

    /// Check for a finished load; returns `None` while still running
    pub fn poll(&mut self) -> Option<LoadOutcome> {
        let job = self.job.as_ref()?;

        let outcome = match job.receiver.try_recv() {
            Ok(LoadMessage::Loaded(snapshot)) => LoadOutcome::Loaded(snapshot),
            Ok(LoadMessage::Failed(err)) => {
                error!(error = %err, "Failed to load fleet");
                LoadOutcome::Failed(err.to_string())
            }
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => {
                error!("Loader thread exited without a result");
                LoadOutcome::Failed("loader stopped unexpectedly".to_string())
            }
        };

        info!(elapsed_ms = job.start_instant.elapsed().as_millis() as u64, "Load finished");
        self.job = None;
        Some(outcome)
    }

    /// Block until the load finishes
    #[cfg(test)]
    pub fn wait(&mut self) -> Option<LoadOutcome> {
        let job = self.job.take()?;
        let outcome = match job.receiver.recv() {
            Ok(LoadMessage::Loaded(snapshot)) => LoadOutcome::Loaded(snapshot),
            Ok(LoadMessage::Failed(err)) => LoadOutcome::Failed(err.to_string()),
            Err(_) => LoadOutcome::Failed("loader stopped unexpectedly".to_string()),
        };
        Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::persistence::{FileSource, MemorySource};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_loader_delivers_snapshot() {
        let mut loader = FleetLoader::new();
        assert!(loader.poll().is_none());

        loader.spawn(Arc::new(MemorySource::demo()));
        assert!(loader.is_pending());

        match loader.wait() {
            Some(LoadOutcome::Loaded(snapshot)) => assert_eq!(snapshot.ships.len(), 3),
            other => panic!("unexpected outcome {:?}", other),
        }
        assert!(!loader.is_pending());
    }

    #[test]
    fn test_loader_reports_failures() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fleet.yaml");
        fs::write(&path, "ships: [[[").unwrap();

        let mut loader = FleetLoader::new();
        loader.spawn(Arc::new(FileSource::new(&path)));

        match loader.wait() {
            Some(LoadOutcome::Failed(message)) => assert!(message.contains("fleet.yaml")),
            other => panic!("unexpected outcome {:?}", other),
        }
    }
}
