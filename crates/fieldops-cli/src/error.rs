//! Error types for the driver binary.
//!
//! [`CliError`] wraps every failure mode `main` can hit so it can be
//! propagated with `?`.

use fieldops_core::{ConfigError, EngineError};

/// Top-level error for the driver binary.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// An engine operation failed.
    #[error("engine error: {source}")]
    Engine {
        /// The underlying engine error.
        #[from]
        source: EngineError,
    },

    /// Reading input, writing output or touching a save file failed.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The tracing filter could not be built from the configured level.
    #[error("invalid log level {level:?}: {message}")]
    LogLevel {
        /// The configured level string.
        level: String,
        /// Why the filter rejected it.
        message: String,
    },
}
