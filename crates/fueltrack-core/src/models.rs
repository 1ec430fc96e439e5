use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FuelError;

/// Database identifier of a vehicle.
pub type VehicleId = i64;

/// Database identifier of a user.
pub type UserId = i64;

/// A single fuel purchase record as stored by the persistence layer.
///
/// Entries arrive as-is from the collaborator that owns them; the analytics
/// core never mutates a record, it only filters and reads them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuelEntry {
    /// Record identifier assigned by the persistence layer.
    #[serde(default)]
    pub id: i64,
    /// UTC timestamp of the purchase.
    pub timestamp: DateTime<Utc>,
    /// Litres added during this purchase (positive).
    pub litres: f64,
    /// Odometer reading at purchase time, in kilometres.
    ///
    /// Missing readings are tolerated on input and filtered out during
    /// validation.
    #[serde(default)]
    pub odometer: Option<f64>,
    /// Price paid per litre.
    #[serde(default)]
    pub price_per_litre: f64,
    /// Total price paid for this purchase.
    #[serde(default)]
    pub total_price: f64,
    /// Free-form station / place description.
    #[serde(default)]
    pub location: Option<String>,
    /// Free-form notes attached by the user.
    #[serde(default)]
    pub notes: Option<String>,
    /// Vehicle this purchase belongs to.
    pub vehicle_id: VehicleId,
    /// Owning user.
    pub user_id: UserId,
}

/// Vehicle descriptor consumed by the analytics core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    /// Vehicle identifier assigned by the persistence layer.
    pub id: VehicleId,
    /// Manufacturer name.
    #[serde(default)]
    pub brand: String,
    /// Model name.
    #[serde(default)]
    pub model: String,
    /// Registration plate, when known.
    #[serde(default)]
    pub license_plate: Option<String>,
    /// Physical tank capacity in litres.
    ///
    /// Absence (or a non-positive value) disables consumption-cycle
    /// detection for this vehicle entirely; it is not an error.
    #[serde(default)]
    pub tank_capacity_litres: Option<f64>,
    /// Owning user.
    pub user_id: UserId,
}

/// One consumption interval between two consecutive inferred full-tank
/// events.
///
/// Every emitted cycle has strictly positive distance and fuel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsumptionCycle {
    /// Odometer reading at the opening full-tank event.
    pub from_odometer: f64,
    /// Odometer reading at the closing full-tank event.
    pub to_odometer: f64,
    /// Timestamp of the opening full-tank event.
    pub from_date: DateTime<Utc>,
    /// Timestamp of the closing full-tank event.
    pub to_date: DateTime<Utc>,
    /// Distance driven in this cycle (`to_odometer - from_odometer`).
    pub distance_km: f64,
    /// Fuel consumed over the cycle, in litres.
    pub fuel_consumed_litres: f64,
    /// Consumption in litres per 100 km.
    pub consumption_per_100km: f64,
}

// ── YearMonth ─────────────────────────────────────────────────────────────────

/// A calendar month, used as the key for monthly statistics.
///
/// Orders chronologically (year first, then month), so a
/// `BTreeMap<YearMonth, _>` iterates oldest-to-newest.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct YearMonth {
    pub year: i32,
    /// 1-based month (1 = January).
    pub month: u32,
}

impl YearMonth {
    /// The calendar month containing `ts` (UTC).
    pub fn from_datetime(ts: DateTime<Utc>) -> Self {
        Self {
            year: ts.year(),
            month: ts.month(),
        }
    }

    /// The month immediately following this one.
    pub fn next(&self) -> YearMonth {
        if self.month == 12 {
            YearMonth {
                year: self.year + 1,
                month: 1,
            }
        } else {
            YearMonth {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Inclusive start of the month window (first day, midnight UTC).
    ///
    /// An out-of-range `month` field (only constructible by hand) maps to
    /// `DateTime::<Utc>::MIN_UTC`.
    pub fn start(&self) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(self.year, self.month, 1, 0, 0, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Exclusive end of the month window (start of the following month).
    pub fn end(&self) -> DateTime<Utc> {
        self.next().start()
    }

    /// Whether `ts` falls within the half-open window `[start, end)`.
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        ts >= self.start() && ts < self.end()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = FuelError;

    /// Parse a `YYYY-MM` string, e.g. `"2024-03"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_err = || FuelError::MonthParse(s.to_string());
        let (year, month) = s.split_once('-').ok_or_else(parse_err)?;
        let year: i32 = year.parse().map_err(|_| parse_err())?;
        let month: u32 = month.parse().map_err(|_| parse_err())?;
        if !(1..=12).contains(&month) {
            return Err(parse_err());
        }
        Ok(YearMonth { year, month })
    }
}

// ── MonthlyStatistics ─────────────────────────────────────────────────────────

/// Aggregated fuel statistics for one user over one calendar month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyStatistics {
    /// The calendar month these figures cover.
    pub month: YearMonth,
    /// Number of validated purchase entries in the month.
    pub entry_count: usize,
    /// Sum of litres purchased.
    pub total_litres: f64,
    /// Sum of total prices paid.
    pub total_cost: f64,
    /// Mean of the per-entry price-per-litre figures (not cost / litres).
    pub avg_price_per_litre: f64,
    /// Mean consumption over cycles that *end* in this month, L/100km.
    pub avg_consumption_per_100km: f64,
}

impl MonthlyStatistics {
    /// The zeroed record returned when a user has no entries in `month`.
    pub fn empty(month: YearMonth) -> Self {
        Self {
            month,
            entry_count: 0,
            total_litres: 0.0,
            total_cost: 0.0,
            avg_price_per_litre: 0.0,
            avg_consumption_per_100km: 0.0,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
