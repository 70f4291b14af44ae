//! Actions, skills and resolution formulas for the FieldOps engine.
//!
//! This crate knows what an action *is* and how likely it is to succeed.
//! It does not run the clock or own engine state; `fieldops-core` drives
//! everything here.
//!
//! # Modules
//!
//! - [`actor`] -- The capability trait the engine borrows per call, and a
//!   plain in-memory implementation.
//! - [`action`] -- Action definitions, attempt counters and availability.
//! - [`catalog`] -- The per-engine catalog and saved-counter merging.
//! - [`formula`] -- Success chance, action time and experience rewards.
//! - [`skills`] -- Skill content, upgrade costs and derived multipliers.
//! - [`casualties`] -- Support team roster and casualty rolls.
//! - [`error`] -- Error types for catalog and formula failures.

pub mod action;
pub mod actor;
pub mod casualties;
pub mod catalog;
pub mod error;
pub mod formula;
pub mod skills;

// Re-export primary types at crate root.
pub use action::{
    Action, ActionBase, ActionPayload, AvailabilityContext, BlackOpState, Countable,
    OperationState, Unavailable,
};
pub use actor::{Actor, ActorMult, BasicActor};
pub use casualties::TeamRoster;
pub use catalog::{ActionCatalog, SavedCounter};
pub use error::ActionError;
pub use formula::{
    SuccessContext, action_stats, action_time, attempt, difficulty_multiplier, effective_stat,
    success_chance,
};
pub use skills::{SkillDef, SkillLevels, SkillMultipliers, UpgradeBlocked, can_upgrade, skill_def};
