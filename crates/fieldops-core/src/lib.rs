//! Engine state, clock, action resolution and console for the FieldOps
//! engine.
//!
//! This crate owns the simulation loop: a host buffers cycles with
//! [`Engine::store_cycles`] and calls [`Engine::process`], which turns them
//! into whole simulated seconds, regenerates stamina, evolves the world,
//! advances and resolves the running action, and runs automation.
//!
//! # Modules
//!
//! - [`automation`] -- Stamina-threshold action switching.
//! - [`clock`] -- Cycle buffering into whole seconds.
//! - [`config`] -- Configuration loading from YAML into typed structs.
//! - [`console`] -- Console transcript, logging toggles and command
//!   dispatch.
//! - [`engine`] -- [`Engine`] construction, the start/stop state machine and
//!   direct setters.
//! - [`error`] -- Error types for engine operations.
//! - [`progression`] -- Rank and skill-point ledger.
//! - [`resolve`] -- Per-kind action resolution.
//! - [`snapshot`] -- JSON save and restore.
//! - [`stamina`] -- Stamina max, regeneration and penalty.
//! - [`tick`] -- The per-call world tick.

pub mod automation;
pub mod clock;
pub mod config;
pub mod console;
pub mod engine;
pub mod error;
pub mod progression;
pub mod resolve;
pub mod snapshot;
pub mod stamina;
pub mod tick;

pub use automation::{Automation, Threshold};
pub use config::{ConfigError, EngineConfig};
pub use console::{ConsoleLog, LogToggles};
pub use engine::{Engine, StartAttempt, UpgradeAttempt};
pub use error::EngineError;
pub use progression::RankLedger;
pub use resolve::ActionOutcome;
pub use snapshot::EngineSnapshot;
pub use stamina::StaminaPool;
pub use tick::TickReport;
