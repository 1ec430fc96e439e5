//! JSON data-file loading.
//!
//! The CLI consumes a single JSON document holding vehicles and purchase
//! entries, the minimal stand-in for the persistence layer this crate's
//! [`EntryStore`](crate::store::EntryStore) seam abstracts over.

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use fueltrack_core::error::{FuelError, Result};
use fueltrack_core::models::{FuelEntry, Vehicle};

use crate::store::InMemoryEntryStore;

/// On-disk shape of a data file. Both keys are optional.
#[derive(Debug, Deserialize)]
struct DataFile {
    #[serde(default)]
    vehicles: Vec<Vehicle>,
    #[serde(default)]
    entries: Vec<FuelEntry>,
}

/// Load `{ "vehicles": [...], "entries": [...] }` from `path` into an
/// in-memory store.
pub fn load_data_file(path: &Path) -> Result<InMemoryEntryStore> {
    let text = std::fs::read_to_string(path).map_err(|source| FuelError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let data: DataFile = serde_json::from_str(&text)?;

    debug!(
        "Loaded {} vehicles and {} entries from {}",
        data.vehicles.len(),
        data.entries.len(),
        path.display()
    );

    Ok(InMemoryEntryStore::new(data.vehicles, data.entries))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
