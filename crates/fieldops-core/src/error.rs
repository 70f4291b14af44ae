//! Error types for the `fieldops-core` crate.
//!
//! Operator mistakes (bad console input, unavailable actions, unaffordable
//! skills) are not errors; they come back as messages. Everything here is
//! an invariant violation that halts the offending call.

use fieldops_actions::ActionError;
use fieldops_world::WorldError;

/// Errors raised by engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A rank delta was NaN or infinite.
    #[error("non-finite rank change: {delta}")]
    NonFiniteRank {
        /// The rejected delta.
        delta: f64,
    },

    /// Field Analysis effectiveness was NaN or negative.
    #[error("field analysis effectiveness is invalid: {value}")]
    InvalidAnalysis {
        /// The computed effectiveness.
        value: f64,
    },

    /// A catalog lookup or formula failed.
    #[error(transparent)]
    Action(#[from] ActionError),

    /// A region mutation rejected its input.
    #[error(transparent)]
    World(#[from] WorldError),

    /// A snapshot could not be encoded or decoded.
    #[error("snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// Configuration was invalid at engine construction.
    #[error("config error: {0}")]
    Config(#[from] crate::config::ConfigError),
}
