//! fleet-tui - A terminal dashboard for a fleet of ships
//!
//! This is the main entry point for the fleet-tui application.
//! It uses the Component Architecture pattern from ratatui.

mod action;
mod app;
mod component;
mod components;
mod config;
mod logging;
mod model;
mod services;
mod tui;

use crate::action::Action;
use crate::app::{App, AppOptions};
use crate::component::Component;
use crate::config::Config;
use crate::services::{FileSource, FleetSource, MemorySource};
use crate::tui::Tui;
use anyhow::Result;
use clap::Parser;
use crossterm::event::Event;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// fleet-tui - Track ships, trips, voyages, fuel, costs and maintenance
#[derive(Parser)]
#[command(name = "fleet-tui")]
#[command(version)]
#[command(about = "A terminal dashboard for managing a fleet of ships", long_about = None)]
struct Cli {
    /// Data file to load and save (.json, .yaml or .yml)
    #[arg(long, short = 'd', value_name = "PATH", conflicts_with = "demo")]
    data: Option<PathBuf>,

    /// Start with a sample fleet kept in memory
    #[arg(long)]
    demo: bool,

    /// Log filter, e.g. "debug" or "fleet_tui=trace"
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,

    /// Only save on Ctrl+S
    #[arg(long)]
    no_autosave: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load_or_init();

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.log_level.clone());
    // Logging is best effort; the UI still runs without a log file
    let _guard = match logging::init_logging(&Config::log_dir(), &level) {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("Warning: logging disabled: {:#}", err);
            None
        }
    };

    let source: Arc<dyn FleetSource> = if cli.demo {
        Arc::new(MemorySource::demo())
    } else {
        let path = cli.data.clone().unwrap_or_else(|| config.data_path());
        Arc::new(FileSource::new(path))
    };
    info!(source = %source.describe(), "Starting fleet-tui");

    let options = AppOptions {
        autosave: config.autosave && !cli.no_autosave,
        export_dir: config.export_path(),
        ship_defaults: config.ship_defaults.clone(),
    };

    tui::install_panic_hook();

    // Setup terminal
    let tick_rate = Duration::from_millis(config.tick_rate_ms.max(10));
    let mut tui = Tui::new()?.with_tick_rate(tick_rate);
    tui.enter()?;

    // Create app state
    let mut app = App::new(source, options);
    app.init()?;

    // Main event loop
    let result = run_app(&mut tui, &mut app);

    // Cleanup terminal
    tui.exit()?;

    // Handle any errors
    if let Err(err) = result {
        error!(error = %err, "Application error");
        eprintln!("Error: {:?}", err);
        std::process::exit(1);
    }

    info!("Exited cleanly");
    Ok(())
}

/// Run the main application loop
fn run_app(tui: &mut Tui, app: &mut App) -> Result<()> {
    while !app.should_quit {
        // Draw the UI
        tui.draw(|frame| {
            if let Err(e) = app.draw(frame, frame.area()) {
                error!(error = %e, "Draw error");
            }
        })?;

        // Poll for events
        if let Some(event) = tui.next_event()? {
            // Convert event to action
            let action = match event {
                Event::Key(key) => app.handle_key_event(key)?,
                Event::Resize(w, h) => Some(Action::Resize(w, h)),
                _ => None,
            };

            // Action might produce a follow-up action
            let mut current_action = action;
            while let Some(a) = current_action {
                current_action = app.update(a)?;
            }
        } else {
            // No event - send a tick for time-based updates
            app.update(Action::Tick)?;
        }
    }

    Ok(())
}
