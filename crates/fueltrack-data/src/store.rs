use chrono::{DateTime, Utc};

use fueltrack_core::models::{FuelEntry, UserId, Vehicle, VehicleId};

// ── EntryStore ────────────────────────────────────────────────────────────────

/// Data-access contract of the persistence collaborator.
///
/// The analytics core only ever *reads* through this trait; ordering of the
/// returned entries is not guaranteed (validation sorts them). Range queries
/// use half-open windows `[start, end)`.
pub trait EntryStore {
    /// Look up a vehicle by id.
    fn vehicle(&self, id: VehicleId) -> Option<Vehicle>;

    /// All purchase entries recorded for `vehicle_id`.
    fn entries_for_vehicle(&self, vehicle_id: VehicleId) -> Vec<FuelEntry>;

    /// All purchase entries recorded for `user_id`, across all vehicles.
    fn entries_for_user(&self, user_id: UserId) -> Vec<FuelEntry>;

    /// Entries for `user_id` with `start <= timestamp < end`.
    fn entries_for_user_in_range(
        &self,
        user_id: UserId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<FuelEntry>;
}

// ── InMemoryEntryStore ────────────────────────────────────────────────────────

/// Plain-vector implementation of [`EntryStore`].
///
/// Backs the CLI (fed from a JSON data file) and the analytics tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEntryStore {
    vehicles: Vec<Vehicle>,
    entries: Vec<FuelEntry>,
}

impl InMemoryEntryStore {
    pub fn new(vehicles: Vec<Vehicle>, entries: Vec<FuelEntry>) -> Self {
        Self { vehicles, entries }
    }

    /// Number of vehicles held.
    pub fn vehicle_count(&self) -> usize {
        self.vehicles.len()
    }

    /// Number of entries held.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

impl EntryStore for InMemoryEntryStore {
    fn vehicle(&self, id: VehicleId) -> Option<Vehicle> {
        self.vehicles.iter().find(|v| v.id == id).cloned()
    }

    fn entries_for_vehicle(&self, vehicle_id: VehicleId) -> Vec<FuelEntry> {
        self.entries
            .iter()
            .filter(|e| e.vehicle_id == vehicle_id)
            .cloned()
            .collect()
    }

    fn entries_for_user(&self, user_id: UserId) -> Vec<FuelEntry> {
        self.entries
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect()
    }

    fn entries_for_user_in_range(
        &self,
        user_id: UserId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<FuelEntry> {
        self.entries
            .iter()
            .filter(|e| e.user_id == user_id && e.timestamp >= start && e.timestamp < end)
            .cloned()
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
