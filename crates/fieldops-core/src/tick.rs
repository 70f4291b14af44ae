//! The world tick.
//!
//! Each call to [`Engine::process`] runs these phases in order:
//!
//! 1. **Guards**: cancel the action if the actor went off to other work
//!    without the bypass flag, or if stamina ran out.
//! 2. **Clock**: convert buffered cycles into whole seconds (capped).
//!    With less than one second buffered the tick stops here.
//! 3. **Stamina**: recompute max stamina and regenerate.
//! 4. **World**: grow action counts, decay chaos, count down to the next
//!    random event and fire it when due.
//! 5. **Action**: advance the running action and resolve it when done.
//! 6. **Automation**: switch actions on stamina thresholds.
//! 7. **Waiters**: resolve every pending [`Engine::next_update`] receiver.

use fieldops_actions::Actor;
use fieldops_types::constants::CHAOS_DECAY_PER_SECOND;
use fieldops_types::{ActionId, LogCategory};
use fieldops_world::{WorldEvent, fire_random_event, random_int_f64};
use serde::{Deserialize, Serialize};

use crate::engine::Engine;
use crate::error::EngineError;
use crate::resolve::ActionOutcome;

/// What one call to [`Engine::process`] did.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    /// Simulated seconds advanced. Zero when not enough cycles were
    /// buffered.
    pub seconds: u64,
    /// The action resolved during this tick, if any.
    pub outcome: Option<ActionOutcome>,
    /// The random event fired during this tick, if any.
    pub event: Option<WorldEvent>,
    /// Whether the running action was cancelled by a guard.
    pub cancelled: bool,
}

impl Engine {
    /// Buffer host cycles for the next [`Engine::process`] call.
    pub const fn store_cycles(&mut self, cycles: u64) {
        self.cycles.store(cycles);
    }

    /// Run one tick.
    ///
    /// # Errors
    ///
    /// Propagates invariant violations from resolution, regions and rank.
    /// State changes made before the error are kept.
    pub fn process(&mut self, actor: &mut dyn Actor) -> Result<TickReport, EngineError> {
        let mut report = TickReport::default();

        if actor.is_busy_elsewhere() && !actor.has_bypass_flag() {
            if let Some(id) = self.current {
                let mut line = format!(
                    "Your {} action was cancelled because you started doing something else.",
                    id.name()
                );
                if self.automation.enabled {
                    self.automation.enabled = false;
                    line.push_str(" Your automation was disabled as well.");
                }
                tracing::warn!(action = %id.name(), "Action cancelled by outside work");
                self.console.log(line);
                report.cancelled = true;
            }
            self.reset_action();
        }

        if self.stamina.current <= 0.0 {
            if let Some(id) = self.current {
                tracing::info!(action = %id.name(), "Action cancelled at zero stamina");
                self.console
                    .log("Your action was cancelled because your stamina hit 0");
                report.cancelled = true;
            }
            self.reset_action();
        }

        let Some(seconds) = self.cycles.take_seconds() else {
            return Ok(report);
        };
        let secs = seconds as f64;
        report.seconds = seconds;

        self.recalculate_max_stamina(actor);
        let inputs = self.stamina_inputs(actor);
        self.stamina.regenerate(secs, &inputs);

        self.catalog.grow_counts(secs, &mut self.rng);
        self.regions.decay_chaos(CHAOS_DECAY_PER_SECOND * secs)?;

        if self.events.enabled {
            self.event_countdown -= secs;
            if self.event_countdown <= 0.0 {
                report.event = fire_random_event(&mut self.regions, &mut self.rng)?;
                if let Some(event) = report.event {
                    tracing::debug!(?event, "Random event fired");
                    self.log_if(LogCategory::Events, event.narrative());
                }
                self.event_countdown += random_int_f64(
                    &mut self.rng,
                    i64::from(self.events.min_seconds),
                    i64::from(self.events.max_seconds),
                );
            }
        }

        report.outcome = self.process_action(actor, secs)?;
        self.run_automation(actor)?;

        let millis = secs * 1000.0;
        for waiter in self.waiters.drain(..) {
            // Receivers may already be dropped.
            let _ = waiter.send(millis);
        }

        Ok(report)
    }

    /// Advance the running action by `seconds` plus carried overflow and
    /// resolve it once the required time is reached.
    ///
    /// An action that became unavailable is stopped without resolving.
    /// After resolution, money and experience go to the actor and every
    /// kind except black ops restarts.
    ///
    /// # Errors
    ///
    /// Propagates resolution errors.
    pub fn process_action(
        &mut self,
        actor: &mut dyn Actor,
        seconds: f64,
    ) -> Result<Option<ActionOutcome>, EngineError> {
        let Some(id) = self.current else {
            return Ok(None);
        };
        if let Err(reason) = self.availability(id)? {
            tracing::info!(action = %id.name(), %reason, "Running action became unavailable");
            self.reset_action();
            return Ok(None);
        }

        self.elapsed += seconds + self.overflow;
        self.overflow = 0.0;
        if self.elapsed < self.required {
            return Ok(None);
        }
        self.overflow = self.elapsed - self.required;

        let outcome = self.complete_action(actor, id)?;
        actor.gain_money(outcome.reward.money);
        actor.gain_experience(&outcome.reward);

        if !matches!(id, ActionId::BlackOp(_)) {
            let restart = self.start_action(actor, Some(id))?;
            if !restart.is_success() {
                tracing::debug!(action = %id.name(), message = restart.message(), "Restart refused");
            }
        }
        Ok(Some(outcome))
    }

    fn run_automation(&mut self, actor: &mut dyn Actor) -> Result<(), EngineError> {
        let Some(target) = self.automation.target(self.stamina.current, self.current) else {
            return Ok(());
        };
        let attempt = self.start_action(actor, Some(target))?;
        tracing::debug!(
            action = %target.name(),
            stamina = self.stamina.current,
            started = attempt.is_success(),
            "Automation switched action"
        );
        Ok(())
    }
}
