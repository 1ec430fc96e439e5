//! Core domain for fueltrack.
//!
//! Pure computation only: domain models, entry validation, and the
//! tank-level simulation that infers full-tank events and the consumption
//! cycles between them. No I/O lives here; data access and aggregation over
//! a store belong to the `fueltrack-data` crate.

pub mod error;
pub mod models;
pub mod simulator;
pub mod validator;

pub use error::{FuelError, Result};
