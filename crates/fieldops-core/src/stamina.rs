//! Stamina model.
//!
//! | Quantity | Formula |
//! |---|---|
//! | Max | `max(1e-9, (effAgi^0.8 + bonus) × stamina mult × actor max mult)` |
//! | Regen / s | `(0.0085 + max / 70000) × effAgi^0.17 × stamina mult × actor gain mult` |
//! | Attempt cost | `0.285 × difficulty multiplier` |
//! | Penalty | `min(1, current / (0.5 × max))` |
//!
//! When max changes, current stamina is rescaled so the fill ratio is
//! preserved.

use fieldops_types::constants::{
    MAX_STAMINA_AGI_EXPONENT, MAX_STAMINA_TO_GAIN_FACTOR, STAMINA_GAIN_PER_SECOND,
    STAMINA_REGEN_AGI_EXPONENT,
};
use serde::{Deserialize, Serialize};

/// Smallest max stamina ever computed.
const MIN_MAX_STAMINA: f64 = 1e-9;

/// Inputs the stamina formulas read from outside the pool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaminaInputs {
    /// Agility after skill multipliers.
    pub effective_agility: f64,
    /// Engine stamina skill multiplier.
    pub skill_mult: f64,
    /// Actor max-stamina multiplier.
    pub actor_max_mult: f64,
    /// Actor regeneration multiplier.
    pub actor_gain_mult: f64,
}

/// Current, max and bonus stamina.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StaminaPool {
    /// Current stamina, in `[0, max]`.
    pub current: f64,
    /// Max stamina.
    pub max: f64,
    /// Permanent bonus added to the agility term by training.
    pub bonus: f64,
}

impl Default for StaminaPool {
    fn default() -> Self {
        Self {
            current: 1.0,
            max: 1.0,
            bonus: 0.0,
        }
    }
}

impl StaminaPool {
    /// Recompute max stamina, rescaling current stamina to keep the fill
    /// ratio.
    pub fn recalculate_max(&mut self, inputs: &StaminaInputs) {
        let base = inputs.effective_agility.powf(MAX_STAMINA_AGI_EXPONENT);
        let max = ((base + self.bonus) * inputs.skill_mult * inputs.actor_max_mult)
            .max(MIN_MAX_STAMINA);
        if (max - self.max).abs() < f64::EPSILON * max {
            return;
        }
        let old_max = self.max;
        self.max = max;
        self.current = (max * self.current / old_max).clamp(0.0, max);
    }

    /// Stamina regenerated per simulated second.
    pub fn gain_per_second(&self, inputs: &StaminaInputs) -> f64 {
        let max_bonus = self.max / MAX_STAMINA_TO_GAIN_FACTOR;
        let gain = (STAMINA_GAIN_PER_SECOND + max_bonus)
            * inputs.effective_agility.powf(STAMINA_REGEN_AGI_EXPONENT);
        (gain * inputs.skill_mult * inputs.actor_gain_mult).max(0.0)
    }

    /// Regenerate for `seconds`, capped at max.
    pub fn regenerate(&mut self, seconds: f64, inputs: &StaminaInputs) {
        let gain = self.gain_per_second(inputs) * seconds;
        self.current = (self.current + gain).min(self.max);
    }

    /// Spend stamina, flooring at zero.
    pub fn spend(&mut self, amount: f64) {
        self.current = (self.current - amount).max(0.0);
    }

    /// Restore `pct` percent of max, capped at max. Returns the amount
    /// actually restored.
    pub fn restore_percent(&mut self, pct: f64) -> f64 {
        let before = self.current;
        self.current = (self.current + self.max * pct / 100.0).min(self.max);
        self.current - before
    }

    /// `min(1, current / (0.5 × max))`.
    pub fn penalty(&self) -> f64 {
        (self.current / (0.5 * self.max)).min(1.0)
    }

    /// Whether the pool survived deserialization intact.
    pub fn is_valid(&self) -> bool {
        self.current.is_finite() && self.max.is_finite() && self.max != 0.0
    }

    /// Reset corrupted values to 1 and recompute max.
    pub fn recover(&mut self, inputs: &StaminaInputs) {
        self.current = 1.0;
        self.max = 1.0;
        if !self.bonus.is_finite() {
            self.bonus = 0.0;
        }
        self.recalculate_max(inputs);
    }
}
