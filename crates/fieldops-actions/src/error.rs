//! Error types for the `fieldops-actions` crate.

use fieldops_types::ActionId;
use fieldops_world::WorldError;

/// Invariant violations raised by catalog lookups and formulas.
///
/// Stochastic failure is never an error. These variants indicate a data or
/// programming bug and are propagated to the caller unchanged.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ActionError {
    /// The catalog has no entry for the identifier.
    #[error("unknown action: {0}")]
    UnknownAction(ActionId),

    /// A success chance evaluated to NaN.
    #[error("success chance for {action} is not a number")]
    NonFiniteChance {
        /// The action being evaluated.
        action: ActionId,
    },

    /// A counter operation was requested on a black or general action.
    #[error("{0} has no attempt counter")]
    NotCountable(ActionId),

    /// A level outside `1..=max_level` was requested.
    #[error("level {level} out of range for {action} (max {max_level})")]
    LevelOutOfRange {
        /// The action.
        action: ActionId,
        /// Requested level.
        level: u32,
        /// Highest unlocked level.
        max_level: u32,
    },

    /// A region mutation rejected its input.
    #[error("world error: {0}")]
    World(#[from] WorldError),
}
