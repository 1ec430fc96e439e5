use std::path::PathBuf;
use thiserror::Error;

use crate::models::VehicleId;

/// All errors produced by the fuel tracker.
///
/// Business-data problems (too few entries, missing tank capacity, corrupt
/// records) are deliberately *not* represented here: they degrade to empty
/// or zeroed results inside the analytics core. These variants cover the
/// outer layers only — reading data files and parsing caller input.
#[derive(Error, Debug)]
pub enum FuelError {
    /// A data file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A month string did not match the `YYYY-MM` format.
    #[error("Invalid month (expected YYYY-MM): {0}")]
    MonthParse(String),

    /// No data file was given and none was found at the default locations.
    #[error("No data file found (looked under {0})")]
    DataFileNotFound(PathBuf),

    /// A vehicle id referenced by the caller does not exist in the store.
    #[error("Unknown vehicle: {0}")]
    UnknownVehicle(VehicleId),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the fueltrack crates.
pub type Result<T> = std::result::Result<T, FuelError>;
