//! Consumption analytics over an [`EntryStore`].
//!
//! Composes the pure core pieces (validation, tank simulation) into the
//! vehicle- and user-facing aggregate queries. Every query builds its own
//! local state and discards it on return; nothing is cached between calls.

use std::collections::BTreeMap;

use tracing::debug;

use fueltrack_core::models::{
    ConsumptionCycle, FuelEntry, MonthlyStatistics, UserId, Vehicle, VehicleId, YearMonth,
};
use fueltrack_core::simulator::TankSimulator;
use fueltrack_core::validator::EntryValidator;

use crate::store::EntryStore;

// ── ConsumptionAnalytics ──────────────────────────────────────────────────────

/// Aggregate fuel-economy queries for vehicles and users.
pub struct ConsumptionAnalytics<'a, S: EntryStore> {
    store: &'a S,
}

impl<'a, S: EntryStore> ConsumptionAnalytics<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Arithmetic mean of per-cycle consumption (L/100km) for `vehicle`.
    ///
    /// Returns `0.0` when no cycles exist — insufficient data is not an
    /// error.
    pub fn average_consumption(&self, vehicle: &Vehicle) -> f64 {
        let cycles = self.consumption_history(vehicle);
        mean(cycles.iter().map(|c| c.consumption_per_100km))
    }

    /// Full consumption-cycle history for `vehicle`, possibly empty.
    pub fn consumption_history(&self, vehicle: &Vehicle) -> Vec<ConsumptionCycle> {
        let entries = self.store.entries_for_vehicle(vehicle.id);
        let valid = EntryValidator::validate(&entries);
        TankSimulator::simulate(&valid, vehicle.tank_capacity_litres)
    }

    /// Statistics for one user over one calendar month.
    ///
    /// Entry counts, litres, cost and price figures come from the user's
    /// validated entries within the month window. Consumption needs the
    /// *entire* per-vehicle history — a cycle ending this month may have
    /// started earlier — so each vehicle is simulated over full history and
    /// the cycles are then filtered to those whose end date falls inside the
    /// month.
    pub fn monthly_statistics(&self, user_id: UserId, month: YearMonth) -> MonthlyStatistics {
        let month_entries =
            self.store
                .entries_for_user_in_range(user_id, month.start(), month.end());
        if month_entries.is_empty() {
            return MonthlyStatistics::empty(month);
        }

        // Validation is per vehicle: odometer monotonicity means nothing
        // across a mixed-vehicle sequence.
        let by_vehicle = group_by_vehicle(month_entries);

        let mut valid_entries: Vec<FuelEntry> = Vec::new();
        let mut consumptions: Vec<f64> = Vec::new();
        for (vehicle_id, group) in &by_vehicle {
            valid_entries.extend(EntryValidator::validate(group));

            let Some(vehicle) = self.store.vehicle(*vehicle_id) else {
                debug!("No vehicle record for id {}, skipping consumption", vehicle_id);
                continue;
            };
            consumptions.extend(
                self.consumption_history(&vehicle)
                    .into_iter()
                    .filter(|cycle| month.contains(cycle.to_date))
                    .map(|cycle| cycle.consumption_per_100km),
            );
        }

        MonthlyStatistics {
            month,
            entry_count: valid_entries.len(),
            total_litres: valid_entries.iter().map(|e| e.litres).sum(),
            total_cost: valid_entries.iter().map(|e| e.total_price).sum(),
            // Mean of the per-entry price figures, not total cost / litres.
            avg_price_per_litre: mean(valid_entries.iter().map(|e| e.price_per_litre)),
            avg_consumption_per_100km: mean(consumptions.into_iter()),
        }
    }

    /// Statistics for every calendar month in which `user_id` has entries.
    ///
    /// The map iterates chronologically ([`YearMonth`] orders year-first).
    pub fn all_monthly_statistics(&self, user_id: UserId) -> BTreeMap<YearMonth, MonthlyStatistics> {
        let entries = self.store.entries_for_user(user_id);
        let months: std::collections::BTreeSet<YearMonth> = entries
            .iter()
            .map(|e| YearMonth::from_datetime(e.timestamp))
            .collect();

        months
            .into_iter()
            .map(|month| (month, self.monthly_statistics(user_id, month)))
            .collect()
    }
}

// ── Private helpers ───────────────────────────────────────────────────────────

fn group_by_vehicle(entries: Vec<FuelEntry>) -> BTreeMap<VehicleId, Vec<FuelEntry>> {
    let mut map: BTreeMap<VehicleId, Vec<FuelEntry>> = BTreeMap::new();
    for entry in entries {
        map.entry(entry.vehicle_id).or_default().push(entry);
    }
    map
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0_f64, 0_usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryEntryStore;
    use chrono::{DateTime, TimeZone, Utc};

    fn ts(month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, month, day, 12, 0, 0).unwrap()
    }

    fn entry(
        timestamp: DateTime<Utc>,
        litres: f64,
        odometer: f64,
        price_per_litre: f64,
        vehicle_id: VehicleId,
        user_id: UserId,
    ) -> FuelEntry {
        FuelEntry {
            id: 0,
            timestamp,
            litres,
            odometer: Some(odometer),
            price_per_litre,
            total_price: litres * price_per_litre,
            location: None,
            notes: None,
            vehicle_id,
            user_id,
        }
    }

    fn vehicle(id: VehicleId, capacity: Option<f64>, user_id: UserId) -> Vehicle {
        Vehicle {
            id,
            brand: "Volvo".to_string(),
            model: "V60".to_string(),
            license_plate: None,
            tank_capacity_litres: capacity,
            user_id,
        }
    }

    // ── average_consumption / consumption_history ──────────────────────────

    #[test]
    fn test_history_and_average_for_single_vehicle() {
        let v = vehicle(1, Some(50.0), 10);
        let store = InMemoryEntryStore::new(
            vec![v.clone()],
            vec![
                entry(ts(3, 1), 10.0, 0.0, 1.8, 1, 10),
                entry(ts(3, 5), 45.0, 500.0, 1.8, 1, 10),
                entry(ts(3, 12), 48.0, 1000.0, 1.8, 1, 10),
                entry(ts(3, 20), 10.0, 1300.0, 1.8, 1, 10),
            ],
        );
        let analytics = ConsumptionAnalytics::new(&store);

        let history = analytics.consumption_history(&v);
        assert_eq!(history.len(), 1);
        assert!((history[0].consumption_per_100km - 7.25).abs() < 1e-9);

        let average = analytics.average_consumption(&v);
        assert!((average - 7.25).abs() < 1e-9);
    }

    #[test]
    fn test_vehicle_without_capacity_has_no_history() {
        let v = vehicle(1, None, 10);
        let store = InMemoryEntryStore::new(
            vec![v.clone()],
            vec![
                entry(ts(3, 1), 50.0, 0.0, 1.8, 1, 10),
                entry(ts(3, 5), 50.0, 500.0, 1.8, 1, 10),
            ],
        );
        let analytics = ConsumptionAnalytics::new(&store);

        assert!(analytics.consumption_history(&v).is_empty());
        assert_eq!(analytics.average_consumption(&v), 0.0);
    }

    #[test]
    fn test_history_ignores_unvalidated_entries() {
        // The odometer regression on March 8 must not reach the simulator.
        let v = vehicle(1, Some(50.0), 10);
        let store = InMemoryEntryStore::new(
            vec![v.clone()],
            vec![
                entry(ts(3, 1), 50.0, 0.0, 1.8, 1, 10),
                entry(ts(3, 8), 50.0, -100.0, 1.8, 1, 10),
                entry(ts(3, 15), 50.0, 500.0, 1.8, 1, 10),
            ],
        );
        let analytics = ConsumptionAnalytics::new(&store);

        let history = analytics.consumption_history(&v);
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].from_odometer, 0.0);
        assert_eq!(history[0].to_odometer, 500.0);
    }

    #[test]
    fn test_average_consumption_is_idempotent() {
        let v = vehicle(1, Some(50.0), 10);
        let store = InMemoryEntryStore::new(
            vec![v.clone()],
            vec![
                entry(ts(3, 1), 50.0, 0.0, 1.8, 1, 10),
                entry(ts(3, 5), 50.0, 500.0, 1.8, 1, 10),
            ],
        );
        let analytics = ConsumptionAnalytics::new(&store);

        let first = analytics.average_consumption(&v);
        let second = analytics.average_consumption(&v);
        assert_eq!(first, second);
        assert!((first - 10.0).abs() < 1e-9);
    }

    // ── monthly_statistics ─────────────────────────────────────────────────

    #[test]
    fn test_month_without_entries_is_zeroed() {
        let store = InMemoryEntryStore::new(vec![vehicle(1, Some(50.0), 10)], vec![]);
        let analytics = ConsumptionAnalytics::new(&store);

        let month = YearMonth { year: 2024, month: 3 };
        let stats = analytics.monthly_statistics(10, month);
        assert_eq!(stats.entry_count, 0);
        assert_eq!(stats.total_litres, 0.0);
        assert_eq!(stats.avg_consumption_per_100km, 0.0);
    }

    #[test]
    fn test_monthly_totals_and_price_average() {
        // avg_price_per_litre is the mean of per-entry prices (1.0 and 2.0
        // -> 1.5), not total cost / total litres (which would be 1.75 here).
        let store = InMemoryEntryStore::new(
            vec![vehicle(1, Some(200.0), 10)],
            vec![
                entry(ts(3, 1), 10.0, 100.0, 1.0, 1, 10),
                entry(ts(3, 15), 30.0, 400.0, 2.0, 1, 10),
            ],
        );
        let analytics = ConsumptionAnalytics::new(&store);

        let stats = analytics.monthly_statistics(10, YearMonth { year: 2024, month: 3 });
        assert_eq!(stats.entry_count, 2);
        assert!((stats.total_litres - 40.0).abs() < 1e-9);
        assert!((stats.total_cost - 70.0).abs() < 1e-9);
        assert!((stats.avg_price_per_litre - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_monthly_counts_only_validated_entries() {
        let store = InMemoryEntryStore::new(
            vec![vehicle(1, Some(200.0), 10)],
            vec![
                entry(ts(3, 1), 10.0, 100.0, 1.8, 1, 10),
                FuelEntry {
                    odometer: None,
                    ..entry(ts(3, 10), 20.0, 0.0, 1.8, 1, 10)
                },
            ],
        );
        let analytics = ConsumptionAnalytics::new(&store);

        let stats = analytics.monthly_statistics(10, YearMonth { year: 2024, month: 3 });
        assert_eq!(stats.entry_count, 1);
        assert!((stats.total_litres - 10.0).abs() < 1e-9);
    }

    /// Two vehicles, each with one cycle ending in March and one in April;
    /// the March-ending cycles start in February. Consumption must land in
    /// the month of the cycle's *end* date.
    fn two_vehicle_store() -> InMemoryEntryStore {
        InMemoryEntryStore::new(
            vec![vehicle(1, Some(50.0), 10), vehicle(2, Some(40.0), 10)],
            vec![
                // Vehicle 1 (capacity 50): anchor in February, then a
                // 10 L/100km cycle ending March 5 and a 5 L/100km cycle
                // ending April 2.
                entry(ts(2, 20), 50.0, 0.0, 1.8, 1, 10),
                entry(ts(3, 5), 50.0, 500.0, 1.8, 1, 10),
                entry(ts(4, 2), 50.0, 1500.0, 1.8, 1, 10),
                // Vehicle 2 (capacity 40): anchor in February, then
                // 20 L/100km cycles ending March 20 and April 10.
                entry(ts(2, 25), 40.0, 0.0, 1.8, 2, 10),
                entry(ts(3, 20), 40.0, 200.0, 1.8, 2, 10),
                entry(ts(4, 10), 40.0, 400.0, 1.8, 2, 10),
            ],
        )
    }

    #[test]
    fn test_monthly_consumption_attributed_by_cycle_end_date() {
        let store = two_vehicle_store();
        let analytics = ConsumptionAnalytics::new(&store);

        let march = analytics.monthly_statistics(10, YearMonth { year: 2024, month: 3 });
        // mean(10.0, 20.0)
        assert!((march.avg_consumption_per_100km - 15.0).abs() < 1e-9);

        let april = analytics.monthly_statistics(10, YearMonth { year: 2024, month: 4 });
        // mean(5.0, 20.0)
        assert!((april.avg_consumption_per_100km - 12.5).abs() < 1e-9);

        // February has entries (the anchors) but no cycle ends there.
        let february = analytics.monthly_statistics(10, YearMonth { year: 2024, month: 2 });
        assert_eq!(february.entry_count, 2);
        assert_eq!(february.avg_consumption_per_100km, 0.0);
    }

    // ── all_monthly_statistics ─────────────────────────────────────────────

    #[test]
    fn test_all_monthly_statistics_covers_every_month_present() {
        let store = two_vehicle_store();
        let analytics = ConsumptionAnalytics::new(&store);

        let all = analytics.all_monthly_statistics(10);
        let months: Vec<YearMonth> = all.keys().copied().collect();
        assert_eq!(
            months,
            vec![
                YearMonth { year: 2024, month: 2 },
                YearMonth { year: 2024, month: 3 },
                YearMonth { year: 2024, month: 4 },
            ]
        );

        let march = &all[&YearMonth { year: 2024, month: 3 }];
        assert!((march.avg_consumption_per_100km - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_all_monthly_statistics_empty_user() {
        let store = two_vehicle_store();
        let analytics = ConsumptionAnalytics::new(&store);
        assert!(analytics.all_monthly_statistics(999).is_empty());
    }

    #[test]
    fn test_monthly_skips_vehicle_missing_from_store() {
        // Entries referencing an unknown vehicle still count toward the
        // totals; they just contribute no consumption cycles.
        let store = InMemoryEntryStore::new(
            vec![],
            vec![entry(ts(3, 1), 40.0, 100.0, 1.8, 77, 10)],
        );
        let analytics = ConsumptionAnalytics::new(&store);

        let stats = analytics.monthly_statistics(10, YearMonth { year: 2024, month: 3 });
        assert_eq!(stats.entry_count, 1);
        assert_eq!(stats.avg_consumption_per_100km, 0.0);
    }
}
