mod bootstrap;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use fueltrack_core::error::FuelError;
use fueltrack_core::models::{MonthlyStatistics, UserId, Vehicle, VehicleId, YearMonth};
use fueltrack_data::analytics::ConsumptionAnalytics;
use fueltrack_data::reader::load_data_file;
use fueltrack_data::store::{EntryStore, InMemoryEntryStore};

#[derive(Parser)]
#[command(
    name = "fueltrack",
    version,
    about = "Fuel-economy statistics inferred from purchase records"
)]
struct Cli {
    /// Path to the JSON data file. Defaults to ~/.fueltrack/entries.json.
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Log filter directive, e.g. "info" or "fueltrack_data=debug".
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Average consumption (L/100km) for one vehicle.
    Average {
        /// Vehicle id.
        #[arg(long)]
        vehicle: VehicleId,
    },
    /// Inferred consumption-cycle history for one vehicle.
    History {
        /// Vehicle id.
        #[arg(long)]
        vehicle: VehicleId,
    },
    /// Per-calendar-month statistics for a user.
    Monthly {
        /// User id.
        #[arg(long)]
        user: UserId,
        /// A single month as YYYY-MM; omit to list every month with entries.
        #[arg(long)]
        month: Option<YearMonth>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    bootstrap::setup_logging(&cli.log_level)?;

    tracing::info!("fueltrack v{} starting", env!("CARGO_PKG_VERSION"));

    let data_path = match cli.data {
        Some(path) => path,
        None => bootstrap::discover_data_file()?,
    };
    let store = load_data_file(&data_path)?;
    let analytics = ConsumptionAnalytics::new(&store);

    match cli.command {
        Command::Average { vehicle } => {
            let vehicle = lookup_vehicle(&store, vehicle)?;
            let average = analytics.average_consumption(&vehicle);
            if average > 0.0 {
                println!("{}: {:.2} L/100km", describe(&vehicle), average);
            } else {
                println!(
                    "{}: not enough data to infer consumption",
                    describe(&vehicle)
                );
            }
        }

        Command::History { vehicle } => {
            let vehicle = lookup_vehicle(&store, vehicle)?;
            let cycles = analytics.consumption_history(&vehicle);
            if cycles.is_empty() {
                println!("{}: no consumption cycles inferred", describe(&vehicle));
            } else {
                println!(
                    "{:<12} {:<12} {:>9} {:>9} {:>9}",
                    "From", "To", "Km", "Litres", "L/100km"
                );
                for cycle in &cycles {
                    println!(
                        "{:<12} {:<12} {:>9.0} {:>9.1} {:>9.2}",
                        cycle.from_date.format("%Y-%m-%d"),
                        cycle.to_date.format("%Y-%m-%d"),
                        cycle.distance_km,
                        cycle.fuel_consumed_litres,
                        cycle.consumption_per_100km,
                    );
                }
            }
        }

        Command::Monthly { user, month } => match month {
            Some(month) => {
                print_statistics_header();
                print_statistics_row(&analytics.monthly_statistics(user, month));
            }
            None => {
                let all = analytics.all_monthly_statistics(user);
                if all.is_empty() {
                    println!("No entries recorded for user {}", user);
                } else {
                    print_statistics_header();
                    for stats in all.values() {
                        print_statistics_row(stats);
                    }
                }
            }
        },
    }

    Ok(())
}

fn lookup_vehicle(store: &InMemoryEntryStore, id: VehicleId) -> Result<Vehicle> {
    Ok(store.vehicle(id).ok_or(FuelError::UnknownVehicle(id))?)
}

fn describe(vehicle: &Vehicle) -> String {
    format!("{} {} (#{})", vehicle.brand, vehicle.model, vehicle.id)
}

fn print_statistics_header() {
    println!(
        "{:<8} {:>8} {:>10} {:>10} {:>8} {:>9}",
        "Month", "Entries", "Litres", "Cost", "EUR/L", "L/100km"
    );
}

fn print_statistics_row(stats: &MonthlyStatistics) {
    println!(
        "{:<8} {:>8} {:>10.1} {:>10.2} {:>8.3} {:>9.2}",
        stats.month.to_string(),
        stats.entry_count,
        stats.total_litres,
        stats.total_cost,
        stats.avg_price_per_litre,
        stats.avg_consumption_per_100km,
    );
}
