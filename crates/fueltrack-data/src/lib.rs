//! Data layer for fueltrack.
//!
//! Holds the persistence-collaborator seam ([`store::EntryStore`]), the JSON
//! data-file reader that feeds it, and the consumption analytics service
//! built on top of the pure core.

pub mod analytics;
pub mod reader;
pub mod store;

pub use fueltrack_core as core;
