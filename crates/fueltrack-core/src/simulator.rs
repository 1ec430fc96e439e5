use chrono::{DateTime, Utc};

use crate::models::{ConsumptionCycle, FuelEntry};

// ── TankState ─────────────────────────────────────────────────────────────────

/// Odometer/date pair recorded at the most recent inferred full-tank event.
///
/// Serves as the opening endpoint of the next consumption cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Anchor {
    odometer: f64,
    date: DateTime<Utc>,
}

/// Immutable simulation state folded across the validated entry sequence.
///
/// The tank is assumed empty before the first record, so `level` starts at
/// zero and counts litres added since the last full-tank event (or since the
/// start of history).
#[derive(Debug, Clone, Copy, PartialEq)]
struct TankState {
    /// Simulated fill level relative to the last full-tank event, litres.
    level: f64,
    /// Total litres purchased since the last full-tank event.
    accumulated: f64,
    /// Last inferred full-tank event, once one has occurred.
    anchor: Option<Anchor>,
}

impl TankState {
    fn initial() -> Self {
        Self {
            level: 0.0,
            accumulated: 0.0,
            anchor: None,
        }
    }

    /// Advance the simulation by one entry.
    ///
    /// Returns the successor state and the consumption cycle closed by this
    /// entry, if any. A cycle is emitted only when the entry is an inferred
    /// full-tank event, a previous anchor exists, and the distance driven
    /// since that anchor is strictly positive.
    fn advance(self, entry: &FuelEntry, capacity: f64) -> (TankState, Option<ConsumptionCycle>) {
        // Validated input always carries a reading; anything else is skipped.
        let Some(odometer) = entry.odometer else {
            return (self, None);
        };

        let accumulated = self.accumulated + entry.litres;

        // Below capacity: the tank cannot be proven full at this entry.
        // Strict comparison: a refuel landing exactly on capacity counts
        // as a full-tank event.
        if self.level + entry.litres < capacity {
            let next = TankState {
                level: self.level + entry.litres,
                accumulated,
                anchor: self.anchor,
            };
            return (next, None);
        }

        // Inferred full-tank event. With both endpoints full, the fuel
        // consumed over the interval equals the litres purchased in it.
        let cycle = self.anchor.and_then(|anchor| {
            let distance = odometer - anchor.odometer;
            if distance > 0.0 && accumulated > 0.0 {
                Some(ConsumptionCycle {
                    from_odometer: anchor.odometer,
                    to_odometer: odometer,
                    from_date: anchor.date,
                    to_date: entry.timestamp,
                    distance_km: distance,
                    fuel_consumed_litres: accumulated,
                    consumption_per_100km: accumulated / distance * 100.0,
                })
            } else {
                None
            }
        });

        // Reset for the next interval. Litres beyond capacity are discarded
        // from the simulation rather than carried forward as surplus.
        let next = TankState {
            level: 0.0,
            accumulated: 0.0,
            anchor: Some(Anchor {
                odometer,
                date: entry.timestamp,
            }),
        };
        (next, cycle)
    }
}

// ── TankSimulator ─────────────────────────────────────────────────────────────

/// Infers full-tank events from a running tank-level simulation and derives
/// the consumption cycles between them.
///
/// The user never asserts "I filled up": fullness is inferred whenever the
/// simulated level plus the current purchase reaches the vehicle's tank
/// capacity. The first inferred full tank only establishes an anchor — it
/// can never close a cycle — so fewer than two full-tank events yield an
/// empty result.
pub struct TankSimulator;

impl TankSimulator {
    /// Run the simulation over `entries` (validated, time-ascending) with
    /// the given tank capacity.
    ///
    /// Returns the ordered sequence of emitted cycles. A missing or
    /// non-positive capacity disables the simulation entirely and yields an
    /// empty sequence.
    pub fn simulate(entries: &[FuelEntry], tank_capacity: Option<f64>) -> Vec<ConsumptionCycle> {
        let Some(capacity) = tank_capacity.filter(|c| *c > 0.0) else {
            return Vec::new();
        };

        let mut cycles = Vec::new();
        let mut state = TankState::initial();
        for entry in entries {
            let (next, cycle) = state.advance(entry, capacity);
            state = next;
            cycles.extend(cycle);
        }
        cycles
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
