use tracing::debug;

use crate::models::FuelEntry;

// ── EntryValidator ────────────────────────────────────────────────────────────

/// Normalises raw purchase records into a trustworthy, time-ascending
/// sequence.
///
/// Records without an odometer reading, and records whose odometer goes
/// backwards relative to the last accepted one, are silently dropped; the
/// caller only ever sees the surviving sequence. A single aggregate debug
/// line reports how many records were discarded.
pub struct EntryValidator;

impl EntryValidator {
    /// Validate `records` and return the accepted entries, ascending by
    /// timestamp with non-decreasing odometer readings.
    ///
    /// Deterministic for a given input: timestamp ties keep their input
    /// order (stable sort).
    pub fn validate(records: &[FuelEntry]) -> Vec<FuelEntry> {
        let mut sorted: Vec<FuelEntry> = records
            .iter()
            .filter(|entry| entry.odometer.is_some())
            .cloned()
            .collect();
        sorted.sort_by_key(|entry| entry.timestamp);

        let mut accepted = Vec::with_capacity(sorted.len());
        let mut last_odometer: Option<f64> = None;
        for entry in sorted {
            let Some(odometer) = entry.odometer else {
                continue;
            };
            // Strictly decreasing odometer means corrupt data; equal
            // readings are allowed (two purchases without driving).
            if last_odometer.is_some_and(|last| odometer < last) {
                continue;
            }
            last_odometer = Some(odometer);
            accepted.push(entry);
        }

        let dropped = records.len() - accepted.len();
        if dropped > 0 {
            debug!("Dropped {} of {} entries during validation", dropped, records.len());
        }

        accepted
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
