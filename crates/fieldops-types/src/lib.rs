//! Shared type definitions for the FieldOps engine.
//!
//! This crate is the single source of truth for identifiers, closed name
//! enums and balance constants used across the workspace.
//!
//! # Modules
//!
//! - [`ids`] -- The `(kind, name)` action identifier
//! - [`enums`] -- Closed name enums (actions, cities, stats, skills)
//! - [`structs`] -- Stat blocks and reward vectors
//! - [`constants`] -- Fixed balance constants

pub mod constants;
pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{
    ActionKind, BlackOpName, CityName, ContractName, GeneralActionName, LogCategory,
    OperationName, SkillMult, SkillName, Stat, normalize_name,
};
pub use ids::ActionId;
pub use structs::{RewardVector, StatBlock};
