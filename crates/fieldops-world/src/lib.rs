//! Regions, population model, and random world events for the FieldOps
//! engine.
//!
//! The world is a fixed set of regions. Each holds a hidden population, the
//! operator's estimate of it, a chaos level and a community count. Actions
//! and random events mutate regions only through the API on
//! [`Region`], which keeps every value finite and chaos non-negative.
//!
//! # Modules
//!
//! - [`region`] -- One region and its bounded mutation API.
//! - [`regions`] -- [`RegionSet`], one region per city, plus uniform city
//!   selection.
//! - [`events`] -- The weighted random-event table and migration helpers.
//! - [`roll`] -- Integer rolls and percentage offsets.
//! - [`error`] -- Error types for region mutation.

pub mod error;
pub mod events;
pub mod region;
pub mod regions;
pub mod roll;

// Re-export primary types at crate root.
pub use error::WorldError;
pub use events::{WorldEvent, fire_random_event, trigger_migration, trigger_potential_migration};
pub use region::{PercentageChange, PopulationCountChange, Region};
pub use regions::{RegionSet, random_city, random_other_city};
pub use roll::{add_offset, random_int_f64, random_int_inclusive};
