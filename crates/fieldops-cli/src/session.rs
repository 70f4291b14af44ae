//! Interactive session state.
//!
//! A [`Session`] owns the engine and the actor it drives. Input lines that
//! start with `:` are driver directives; everything else is handed to the
//! engine console.
//!
//! | Directive       | Effect                                          |
//! |-----------------|-------------------------------------------------|
//! | `:tick [N]`     | Advance N simulated seconds (default 1)          |
//! | `:status`       | Print action, stamina, rank and region           |
//! | `:save <path>`  | Write an engine snapshot as JSON                 |
//! | `:load <path>`  | Replace the engine with a saved snapshot         |
//! | `:quit`         | End the session                                  |

use std::path::Path;

use fieldops_actions::BasicActor;
use fieldops_core::{Engine, EngineConfig};
use tracing::{debug, info};

use crate::error::CliError;

/// What the input loop should do after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Keep reading.
    Continue,
    /// Stop reading and exit.
    Quit,
}

/// Engine, actor and the console lines already shown.
pub struct Session {
    config: EngineConfig,
    engine: Engine,
    actor: BasicActor,
    shown: Vec<String>,
}

impl Session {
    /// Build a fresh engine for a new actor.
    pub fn new(config: EngineConfig, actor: BasicActor) -> Result<Self, CliError> {
        let engine = Engine::new(&config, &actor)?;
        Ok(Self {
            config,
            engine,
            actor,
            shown: Vec::new(),
        })
    }

    /// The engine being driven.
    pub const fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Handle one input line, returning any output to print.
    pub fn handle(&mut self, line: &str) -> Result<(Control, Vec<String>), CliError> {
        let trimmed = line.trim();
        let mut out = Vec::new();
        let control = match trimmed.strip_prefix(':') {
            Some(directive) => self.directive(directive, &mut out)?,
            None => {
                if !trimmed.is_empty() {
                    self.engine.execute_commands(&mut self.actor, trimmed)?;
                }
                Control::Continue
            }
        };
        let mut lines = self.drain_console();
        lines.append(&mut out);
        Ok((control, lines))
    }

    /// Console lines posted since the last call.
    pub fn drain_console(&mut self) -> Vec<String> {
        let current: Vec<String> = self.engine.console().lines().map(str::to_owned).collect();
        let fresh = unseen_lines(&self.shown, &current).to_vec();
        self.shown = current;
        fresh
    }

    fn directive(&mut self, directive: &str, out: &mut Vec<String>) -> Result<Control, CliError> {
        let mut parts = directive.split_whitespace();
        let head = parts.next().unwrap_or_default().to_ascii_lowercase();
        match head.as_str() {
            "quit" | "exit" | "q" => return Ok(Control::Quit),
            "tick" | "t" => {
                let seconds = match parts.next() {
                    Some(arg) => match arg.parse::<u64>() {
                        Ok(n) => n,
                        Err(_) => {
                            out.push(format!("Invalid number of seconds: {arg}"));
                            return Ok(Control::Continue);
                        }
                    },
                    None => 1,
                };
                let advanced = self.advance(seconds)?;
                out.push(format!("Advanced {advanced} second(s)"));
            }
            "status" | "s" => out.extend(self.status()),
            "save" => match parts.next() {
                Some(path) => {
                    std::fs::write(path, self.engine.to_json()?)?;
                    info!(path, "Snapshot saved");
                    out.push(format!("Saved to {path}"));
                }
                None => out.push("Usage: :save <path>".to_owned()),
            },
            "load" => match parts.next() {
                Some(path) => {
                    self.load(Path::new(path))?;
                    out.push(format!("Loaded {path}"));
                }
                None => out.push("Usage: :load <path>".to_owned()),
            },
            _ => out.push(format!(
                "Unknown directive ':{head}'. Try :tick, :status, :save, :load or :quit"
            )),
        }
        Ok(Control::Continue)
    }

    /// Feed `seconds` worth of cycles and process until they are used up
    /// or the engine stops consuming them.
    fn advance(&mut self, seconds: u64) -> Result<u64, CliError> {
        let cycles = self.config.clock.cycles_per_second.saturating_mul(seconds);
        self.engine.store_cycles(cycles);
        let mut advanced = 0u64;
        loop {
            let report = self.engine.process(&mut self.actor)?;
            if report.seconds == 0 {
                break;
            }
            advanced = advanced.saturating_add(report.seconds);
            if let Some(outcome) = report.outcome {
                debug!(
                    action = outcome.action.name(),
                    success = outcome.success,
                    rank_change = outcome.rank_change,
                    "Action resolved"
                );
            }
        }
        Ok(advanced)
    }

    fn load(&mut self, path: &Path) -> Result<(), CliError> {
        let json = std::fs::read_to_string(path)?;
        self.engine = Engine::from_json(&json, &self.config, &self.actor)?;
        self.shown = self.engine.console().lines().map(str::to_owned).collect();
        info!(path = %path.display(), "Snapshot loaded");
        Ok(())
    }

    fn status(&self) -> Vec<String> {
        let engine = &self.engine;
        let action = engine.current_action().map_or_else(
            || "Idle".to_owned(),
            |id| format!("{id} ({:.0}/{:.0}s)", engine.elapsed(), engine.required_time()),
        );
        let stamina = engine.stamina();
        let ledger = engine.ledger();
        let region = engine.region();
        vec![
            format!("Action: {action}"),
            format!("Stamina: {:.1}/{:.1}", stamina.current, stamina.max),
            format!(
                "Rank: {:.2}  Skill points: {:.0}",
                ledger.rank, ledger.skill_points
            ),
            format!(
                "Region: {}  Population est: {:.0}  Chaos: {:.3}  Communities: {}",
                engine.city(),
                region.population_estimate(),
                region.chaos(),
                region.communities()
            ),
            format!("Money: {:.0}", self.actor.money),
        ]
    }
}

/// The tail of `current` that `previous` has not shown yet.
///
/// The transcript is bounded, so old lines fall off the front. The longest
/// suffix of `previous` that is also a prefix of `current` marks where the
/// new lines begin.
fn unseen_lines<'a>(previous: &[String], current: &'a [String]) -> &'a [String] {
    let max_overlap = previous.len().min(current.len());
    for overlap in (0..=max_overlap).rev() {
        let tail = previous.get(previous.len().saturating_sub(overlap)..);
        let head = current.get(..overlap);
        if tail == head {
            return current.get(overlap..).unwrap_or_default();
        }
    }
    current
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(EngineConfig::default(), BasicActor::new("Agent")).unwrap()
    }

    fn owned(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn unseen_lines_handles_appends_and_rollover() {
        let before = owned(&["a", "b", "c"]);
        assert_eq!(unseen_lines(&before, &owned(&["a", "b", "c", "d"])), owned(&["d"]));
        assert_eq!(unseen_lines(&before, &owned(&["b", "c", "d", "e"])), owned(&["d", "e"]));
        assert_eq!(unseen_lines(&before, &owned(&["x"])), owned(&["x"]));
        assert!(unseen_lines(&before, &before).is_empty());
    }

    #[test]
    fn greeting_is_shown_once() {
        let mut session = session();
        let first = session.drain_console();
        assert_eq!(first.len(), 2);
        assert!(session.drain_console().is_empty());
    }

    #[test]
    fn console_lines_flow_through() {
        let mut session = session();
        session.drain_console();
        let (control, lines) = session.handle("start general training").unwrap();
        assert_eq!(control, Control::Continue);
        assert_eq!(lines.first().map(String::as_str), Some("> start general training"));
        assert!(session.engine().current_action().is_some());
    }

    #[test]
    fn tick_advances_the_engine() {
        let mut session = session();
        session.handle("start general training").unwrap();
        let (_, lines) = session.handle(":tick 12").unwrap();
        assert_eq!(lines.last().map(String::as_str), Some("Advanced 12 second(s)"));
        assert!(session.engine().elapsed() > 0.0);
    }

    #[test]
    fn bad_tick_argument_is_reported() {
        let mut session = session();
        let (_, lines) = session.handle(":tick soon").unwrap();
        assert_eq!(lines, owned(&["Invalid number of seconds: soon"]));
    }

    #[test]
    fn quit_ends_the_session() {
        let mut session = session();
        assert_eq!(session.handle(":quit").unwrap().0, Control::Quit);
    }

    #[test]
    fn status_reports_idle_agent() {
        let mut session = session();
        session.drain_console();
        let (_, lines) = session.handle(":status").unwrap();
        assert_eq!(lines.first().map(String::as_str), Some("Action: Idle"));
    }

    #[test]
    fn save_and_load_round_trip() {
        let name = format!("fieldops-session-{}.json", std::process::id());
        let path = std::env::temp_dir().join(name);
        let path_str = path.to_string_lossy().into_owned();
        let mut session = session();
        session.handle("start general training").unwrap();
        session.handle(":tick 3").unwrap();
        let saved = session.engine().snapshot();

        session.handle(&format!(":save {path_str}")).unwrap();
        session.handle("stop").unwrap();
        session.handle(&format!(":load {path_str}")).unwrap();
        assert_eq!(session.engine().snapshot(), saved);
        std::fs::remove_file(&path).unwrap();
    }
}
