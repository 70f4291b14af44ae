//! Headless console driver for the FieldOps engine.
//!
//! Reads lines from stdin and feeds them to the engine console, printing
//! every new transcript line. Lines starting with `:` are driver
//! directives (see [`session`]); `:tick N` is the only way simulated time
//! moves.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from the path given as the first argument, or
//!    `fieldops-config.yaml` if present, or defaults
//! 2. Initialize structured logging (tracing) to stderr
//! 3. Build the engine around a fresh agent
//! 4. Run the input loop until `:quit` or end of input

mod error;
mod session;

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use fieldops_actions::BasicActor;
use fieldops_core::EngineConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::CliError;
use crate::session::{Control, Session};

/// Config file read when no path is given.
const DEFAULT_CONFIG_PATH: &str = "fieldops-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, engine setup, or terminal I/O fails.
fn main() -> Result<(), CliError> {
    let arg = std::env::args_os().nth(1).map(PathBuf::from);
    let config = load_config(arg.as_deref())?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .map_err(|e| CliError::LogLevel {
            level: config.logging.level.clone(),
            message: e.to_string(),
        })?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    info!(
        seed = config.world.seed,
        starting_city = %config.world.starting_city,
        cycles_per_second = config.clock.cycles_per_second,
        "Configuration loaded"
    );

    let mut session = Session::new(config, BasicActor::new("Agent"))?;
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout().lock();

    for line in session.drain_console() {
        writeln!(stdout, "{line}")?;
    }
    stdout.flush()?;

    for line in stdin.lock().lines() {
        let (control, output) = session.handle(&line?)?;
        for text in output {
            writeln!(stdout, "{text}")?;
        }
        stdout.flush()?;
        if control == Control::Quit {
            break;
        }
    }

    info!(
        rank = session.engine().ledger().rank,
        "fieldops session ended"
    );
    Ok(())
}

/// Load the engine configuration.
///
/// An explicit path must exist. Without one, the default path is used if
/// present and defaults otherwise.
fn load_config(path: Option<&Path>) -> Result<EngineConfig, CliError> {
    if let Some(path) = path {
        return Ok(EngineConfig::from_file(path)?);
    }
    let default_path = Path::new(DEFAULT_CONFIG_PATH);
    if default_path.exists() {
        Ok(EngineConfig::from_file(default_path)?)
    } else {
        Ok(EngineConfig::default())
    }
}
