//! Configuration loading and typed config structures for the FieldOps
//! engine.
//!
//! Configuration is a YAML document with five optional sections. Every
//! field has a default, so an empty document is a valid configuration.
//! Balance content (action tables, formulas) is not configurable; only
//! operational knobs live here.
//!
//! ```yaml
//! world:
//!   seed: 7
//!   starting_city: "Sector-12"
//! clock:
//!   cycles_per_second: 5
//!   max_seconds_per_process: 5
//! events:
//!   enabled: true
//!   min_seconds: 240
//!   max_seconds: 600
//! console:
//!   max_lines: 100
//!   max_history: 50
//! logging:
//!   level: "info"
//!   general: true
//! ```

use std::path::Path;

use fieldops_types::CityName;
use fieldops_types::constants::{
    CYCLES_PER_SECOND, MAX_CONSOLE_HISTORY, MAX_CONSOLE_LINES, MAX_SECONDS_PER_PROCESS,
    RANDOM_EVENT_MAX_SECONDS, RANDOM_EVENT_MIN_SECONDS,
};
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is out of range.
    #[error("invalid value for {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    /// Seed and starting region.
    #[serde(default)]
    pub world: WorldConfig,

    /// Cycle buffering.
    #[serde(default)]
    pub clock: ClockConfig,

    /// Random world events.
    #[serde(default)]
    pub events: EventsConfig,

    /// Console transcript limits.
    #[serde(default)]
    pub console: ConsoleConfig,

    /// Tracing level and initial console logging toggles.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl EngineConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.world.starting_city()?;
        if self.clock.cycles_per_second == 0 {
            return Err(ConfigError::Invalid {
                field: "clock.cycles_per_second",
                reason: "must be at least 1".to_owned(),
            });
        }
        if self.clock.max_seconds_per_process == 0 {
            return Err(ConfigError::Invalid {
                field: "clock.max_seconds_per_process",
                reason: "must be at least 1".to_owned(),
            });
        }
        if self.events.min_seconds > self.events.max_seconds {
            return Err(ConfigError::Invalid {
                field: "events.min_seconds",
                reason: format!(
                    "{} is greater than events.max_seconds ({})",
                    self.events.min_seconds, self.events.max_seconds
                ),
            });
        }
        Ok(())
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Seed for every random draw the engine makes.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Display name of the region the engine starts in.
    #[serde(default = "default_starting_city")]
    pub starting_city: String,
}

impl WorldConfig {
    /// Resolve the starting city name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for an unknown city.
    pub fn starting_city(&self) -> Result<CityName, ConfigError> {
        CityName::from_name(&self.starting_city).ok_or_else(|| ConfigError::Invalid {
            field: "world.starting_city",
            reason: format!("unknown city {:?}", self.starting_city),
        })
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            starting_city: default_starting_city(),
        }
    }
}

/// Cycle buffering configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClockConfig {
    /// Host cycles that make one simulated second.
    #[serde(default = "default_cycles_per_second")]
    pub cycles_per_second: u64,

    /// Cap on simulated seconds processed per call.
    #[serde(default = "default_max_seconds_per_process")]
    pub max_seconds_per_process: u64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            cycles_per_second: default_cycles_per_second(),
            max_seconds_per_process: default_max_seconds_per_process(),
        }
    }
}

/// Random world-event configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EventsConfig {
    /// Whether the countdown fires events at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Shortest countdown after an event, in seconds.
    #[serde(default = "default_event_min_seconds")]
    pub min_seconds: u32,

    /// Longest countdown after an event, in seconds.
    #[serde(default = "default_event_max_seconds")]
    pub max_seconds: u32,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_seconds: default_event_min_seconds(),
            max_seconds: default_event_max_seconds(),
        }
    }
}

/// Console transcript configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConsoleConfig {
    /// Transcript capacity in lines.
    #[serde(default = "default_max_lines")]
    pub max_lines: usize,

    /// Command history capacity in entries.
    #[serde(default = "default_max_history")]
    pub max_history: usize,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            max_lines: default_max_lines(),
            max_history: default_max_history(),
        }
    }
}

/// Logging configuration.
///
/// `level` feeds the tracing filter in the driver binary. The five
/// booleans are the initial console logging toggles.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Tracing level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log general action results.
    #[serde(default = "default_true")]
    pub general: bool,

    /// Log contract results.
    #[serde(default = "default_true")]
    pub contracts: bool,

    /// Log operation results.
    #[serde(default = "default_true")]
    pub ops: bool,

    /// Log black operation results.
    #[serde(default = "default_true")]
    pub blackops: bool,

    /// Log random world events.
    #[serde(default = "default_true")]
    pub events: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            general: true,
            contracts: true,
            ops: true,
            blackops: true,
            events: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions for serde
// ---------------------------------------------------------------------------

const fn default_seed() -> u64 {
    42
}

fn default_starting_city() -> String {
    CityName::Sector12.as_str().to_owned()
}

const fn default_cycles_per_second() -> u64 {
    CYCLES_PER_SECOND
}

const fn default_max_seconds_per_process() -> u64 {
    MAX_SECONDS_PER_PROCESS
}

const fn default_event_min_seconds() -> u32 {
    RANDOM_EVENT_MIN_SECONDS
}

const fn default_event_max_seconds() -> u32 {
    RANDOM_EVENT_MAX_SECONDS
}

const fn default_max_lines() -> usize {
    MAX_CONSOLE_LINES
}

const fn default_max_history() -> usize {
    MAX_CONSOLE_HISTORY
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_true() -> bool {
    true
}
