//! Cycle buffering.
//!
//! The host delivers sub-second "cycles" at its own pace. The engine
//! buffers them and only advances simulated time in whole seconds, at
//! most `max_seconds` per call. Cycles beyond that stay buffered for the
//! next call; nothing is discarded.

use serde::{Deserialize, Serialize};

use crate::config::ClockConfig;

/// Buffered host cycles awaiting conversion into simulated seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleBuffer {
    stored: u64,
    #[serde(skip, default = "default_cycles_per_second")]
    cycles_per_second: u64,
    #[serde(skip, default = "default_max_seconds")]
    max_seconds: u64,
}

const fn default_cycles_per_second() -> u64 {
    fieldops_types::constants::CYCLES_PER_SECOND
}

const fn default_max_seconds() -> u64 {
    fieldops_types::constants::MAX_SECONDS_PER_PROCESS
}

impl CycleBuffer {
    /// An empty buffer using the configured rates.
    ///
    /// Zero rates are raised to 1.
    pub fn new(config: &ClockConfig) -> Self {
        Self {
            stored: 0,
            cycles_per_second: config.cycles_per_second.max(1),
            max_seconds: config.max_seconds_per_process.max(1),
        }
    }

    /// Re-apply configured rates, keeping the stored count. Used after
    /// restoring a snapshot.
    pub fn reconfigure(&mut self, config: &ClockConfig) {
        self.cycles_per_second = config.cycles_per_second.max(1);
        self.max_seconds = config.max_seconds_per_process.max(1);
    }

    /// Buffer `cycles` more host cycles.
    pub const fn store(&mut self, cycles: u64) {
        self.stored = self.stored.saturating_add(cycles);
    }

    /// Cycles currently buffered.
    pub const fn stored(&self) -> u64 {
        self.stored
    }

    /// Whether at least one whole second is buffered.
    pub const fn has_whole_second(&self) -> bool {
        self.stored >= self.cycles_per_second
    }

    /// Consume up to `max_seconds` whole seconds.
    ///
    /// Returns `None` when less than one second is buffered.
    pub fn take_seconds(&mut self) -> Option<u64> {
        let available = self.stored.checked_div(self.cycles_per_second)?;
        if available == 0 {
            return None;
        }
        let seconds = available.min(self.max_seconds);
        let consumed = seconds.saturating_mul(self.cycles_per_second);
        self.stored = self.stored.saturating_sub(consumed);
        Some(seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer() -> CycleBuffer {
        CycleBuffer::new(&ClockConfig::default())
    }

    #[test]
    fn less_than_a_second_yields_nothing() {
        let mut buffer = buffer();
        buffer.store(4);
        assert!(!buffer.has_whole_second());
        assert_eq!(buffer.take_seconds(), None);
        assert_eq!(buffer.stored(), 4);
    }

    #[test]
    fn partial_cycles_are_kept() {
        let mut buffer = buffer();
        buffer.store(12);
        assert_eq!(buffer.take_seconds(), Some(2));
        assert_eq!(buffer.stored(), 2);
    }

    #[test]
    fn excess_seconds_persist_across_calls() {
        let mut buffer = buffer();
        buffer.store(5 * 12);
        assert_eq!(buffer.take_seconds(), Some(5));
        assert_eq!(buffer.stored(), 35);
        assert_eq!(buffer.take_seconds(), Some(5));
        assert_eq!(buffer.take_seconds(), Some(2));
        assert_eq!(buffer.take_seconds(), None);
    }

    #[test]
    fn custom_rates() {
        let mut buffer = CycleBuffer::new(&ClockConfig {
            cycles_per_second: 10,
            max_seconds_per_process: 1,
        });
        buffer.store(35);
        assert_eq!(buffer.take_seconds(), Some(1));
        assert_eq!(buffer.stored(), 25);
    }

    #[test]
    fn store_saturates() {
        let mut buffer = buffer();
        buffer.store(u64::MAX);
        buffer.store(10);
        assert_eq!(buffer.stored(), u64::MAX);
    }
}
