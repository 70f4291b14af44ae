//! The operator console.
//!
//! The console is a bounded transcript of lines plus a bounded command
//! history. Command handling lives in [`commands`]; it talks to the engine
//! through the same public operations a host would call.
//!
//! - `post` appends a line verbatim.
//! - `log` prefixes a `[YYYY-MM-DD HH:MM:SS]` timestamp.
//!
//! Both drop the oldest line once the transcript is full.

mod commands;
mod help;
mod shorthand;

use std::collections::VecDeque;

use fieldops_types::LogCategory;
use serde::{Deserialize, Serialize};

use crate::config::{ConsoleConfig, LoggingConfig};

pub use shorthand::{resolve_action, resolve_kind};

/// Lines shown on a fresh console.
const GREETING: [&str; 2] = [
    "FieldOps Console",
    "Type 'help' to see console commands",
];

/// Bounded transcript and command history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleLog {
    lines: VecDeque<String>,
    history: VecDeque<String>,
    #[serde(skip, default = "default_max_lines")]
    max_lines: usize,
    #[serde(skip, default = "default_max_history")]
    max_history: usize,
}

const fn default_max_lines() -> usize {
    fieldops_types::constants::MAX_CONSOLE_LINES
}

const fn default_max_history() -> usize {
    fieldops_types::constants::MAX_CONSOLE_HISTORY
}

impl ConsoleLog {
    /// A console holding only the greeting.
    pub fn new(config: &ConsoleConfig) -> Self {
        let mut console = Self {
            lines: VecDeque::new(),
            history: VecDeque::new(),
            max_lines: config.max_lines.max(1),
            max_history: config.max_history.max(1),
        };
        for line in GREETING {
            console.post(line);
        }
        console
    }

    /// Re-apply configured capacities after a restore, trimming if needed.
    pub fn reconfigure(&mut self, config: &ConsoleConfig) {
        self.max_lines = config.max_lines.max(1);
        self.max_history = config.max_history.max(1);
        while self.lines.len() > self.max_lines {
            self.lines.pop_front();
        }
        while self.history.len() > self.max_history {
            self.history.pop_front();
        }
    }

    /// Append a line verbatim.
    pub fn post(&mut self, line: impl Into<String>) {
        self.lines.push_back(line.into());
        if self.lines.len() > self.max_lines {
            self.lines.pop_front();
        }
    }

    /// Append a timestamped line.
    pub fn log(&mut self, line: impl AsRef<str>) {
        let stamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        self.post(format!("[{stamp}] {}", line.as_ref()));
    }

    /// Empty the transcript. History is kept.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Record a submitted command line unless it repeats the last one.
    pub fn record_history(&mut self, command: &str) {
        if self.history.back().is_some_and(|last| last == command) {
            return;
        }
        self.history.push_back(command.to_owned());
        if self.history.len() > self.max_history {
            self.history.pop_front();
        }
    }

    /// Transcript lines, oldest first.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// Number of transcript lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the transcript is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Most recent transcript line.
    pub fn last(&self) -> Option<&str> {
        self.lines.back().map(String::as_str)
    }

    /// Submitted command lines, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &str> {
        self.history.iter().map(String::as_str)
    }
}

/// Which result categories are written to the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogToggles {
    /// General actions.
    pub general: bool,
    /// Contracts.
    pub contracts: bool,
    /// Operations.
    pub ops: bool,
    /// Black operations.
    pub blackops: bool,
    /// Random world events.
    pub events: bool,
}

impl Default for LogToggles {
    fn default() -> Self {
        Self::from(&LoggingConfig::default())
    }
}

impl From<&LoggingConfig> for LogToggles {
    fn from(config: &LoggingConfig) -> Self {
        Self {
            general: config.general,
            contracts: config.contracts,
            ops: config.ops,
            blackops: config.blackops,
            events: config.events,
        }
    }
}

impl LogToggles {
    /// Whether `category` is logged.
    pub const fn enabled(&self, category: LogCategory) -> bool {
        match category {
            LogCategory::General => self.general,
            LogCategory::Contracts => self.contracts,
            LogCategory::Operations => self.ops,
            LogCategory::BlackOps => self.blackops,
            LogCategory::Events => self.events,
        }
    }

    /// Turn one category on or off.
    pub const fn set(&mut self, category: LogCategory, enabled: bool) {
        match category {
            LogCategory::General => self.general = enabled,
            LogCategory::Contracts => self.contracts = enabled,
            LogCategory::Operations => self.ops = enabled,
            LogCategory::BlackOps => self.blackops = enabled,
            LogCategory::Events => self.events = enabled,
        }
    }

    /// Turn every category on or off.
    pub const fn set_all(&mut self, enabled: bool) {
        *self = Self {
            general: enabled,
            contracts: enabled,
            ops: enabled,
            blackops: enabled,
            events: enabled,
        };
    }
}

/// Split one command into arguments.
///
/// Runs of whitespace separate arguments. Double quotes group words into
/// one argument and are removed; an unterminated quote runs to the end.
pub fn tokenize(command: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;

    for ch in command.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                quoted = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() || quoted {
                    args.push(std::mem::take(&mut current));
                }
                quoted = false;
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() || quoted {
        args.push(current);
    }
    args
}
