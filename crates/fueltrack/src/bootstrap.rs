use std::path::PathBuf;

use fueltrack_core::error::{FuelError, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Initialise the global `tracing` subscriber.
///
/// `log_level` is mapped to a [`tracing_subscriber::EnvFilter`] directive.
/// Falls back to `"warn"` if the level string is not recognised. All output
/// goes to stderr so report printing on stdout stays clean.
pub fn setup_logging(log_level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("warn"));

    let subscriber = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .init();

    Ok(())
}

// ── Data-file discovery ────────────────────────────────────────────────────────

/// Locate the default data file when none is given on the command line.
///
/// Checks the following paths in order and returns the first that exists:
/// 1. `~/.fueltrack/entries.json`
/// 2. `~/.config/fueltrack/entries.json`
pub fn discover_data_file() -> Result<PathBuf> {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let candidates = [
        home.join(".fueltrack").join("entries.json"),
        home.join(".config").join("fueltrack").join("entries.json"),
    ];
    candidates
        .into_iter()
        .find(|p| p.exists())
        .ok_or_else(|| FuelError::DataFileNotFound(home.join(".fueltrack")))
}

// ── Tests ──────────────────────────────────────────────────────────────────────
