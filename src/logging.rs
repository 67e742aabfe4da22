//! Logging system initialization
//!
//! The terminal belongs to the UI, so everything goes to a daily rolling
//! file under the config directory.

use anyhow::{Context, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::EnvFilter;

/// Build the filter: `RUST_LOG` wins over the configured level
pub fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
    })
}

/// Initialize the global subscriber
///
/// The returned guard must be kept alive for the whole run so buffered
/// lines are flushed on exit.
pub fn init_logging(log_dir: &Path, level: &str) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory '{}'", log_dir.display()))?;

    let appender = rolling::Builder::new()
        .rotation(rolling::Rotation::DAILY)
        .filename_prefix("fleet-tui")
        .filename_suffix("log")
        .max_log_files(7)
        .build(log_dir)
        .context("Failed to create rolling log appender")?;

    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_env_filter(build_filter(level))
        .with_level(true)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {e}"))?;

    Ok(guard)
}
