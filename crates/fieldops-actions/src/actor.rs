//! The actor capability interface.
//!
//! The engine never owns the character performing actions. It borrows an
//! [`Actor`] per call and uses it to read stats, hand out experience and
//! money, and deal damage. Everything about the character that is not
//! needed here (skills from other systems, inventory, jobs) stays behind
//! this trait.
//!
//! [`BasicActor`] is a plain in-memory implementation used by the CLI
//! driver and the tests.

use std::collections::BTreeMap;

use fieldops_types::{RewardVector, Stat, StatBlock};
use serde::{Deserialize, Serialize};

/// Multipliers the actor contributes from outside the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ActorMult {
    /// Scales every success chance.
    SuccessChance,
    /// Scales max stamina.
    MaxStamina,
    /// Scales stamina regeneration.
    StaminaGain,
    /// Scales Field Analysis effectiveness.
    Analysis,
    /// Scales reputation earned from rank.
    FactionRep,
    /// Scales experience earned in one stat by general actions.
    ExpGain(Stat),
}

/// What the engine needs from the character performing actions.
///
/// Only the stat reads and the resource sinks are required; every other
/// capability has a neutral default.
pub trait Actor {
    /// Current level of a stat, before engine skill multipliers.
    fn stat(&self, stat: Stat) -> f64;

    /// An external multiplier. Defaults to 1.
    fn multiplier(&self, _mult: ActorMult) -> f64 {
        1.0
    }

    /// Apply damage. Returns `true` if the actor was incapacitated and
    /// needed hospitalization.
    fn take_damage(&mut self, amount: f64) -> bool;

    /// Restore HP.
    fn regenerate_hp(&mut self, amount: f64);

    /// Receive experience.
    fn gain_experience(&mut self, reward: &RewardVector);

    /// Receive money.
    fn gain_money(&mut self, amount: f64);

    /// Cost charged when `damage` puts the actor in hospital.
    fn hospitalization_cost(&self, _damage: f64) -> f64 {
        0.0
    }

    /// Whether the actor may run engine actions alongside other work.
    fn has_bypass_flag(&self) -> bool {
        false
    }

    /// Whether the actor is currently doing something outside the engine.
    fn is_busy_elsewhere(&self) -> bool {
        false
    }

    /// Stop whatever the actor is doing outside the engine.
    fn cancel_other_work(&mut self) {}

    /// Favor with the allegiance group, or `None` when not affiliated.
    fn allegiance_favor(&self) -> Option<f64> {
        None
    }

    /// Receive reputation with the allegiance group.
    fn gain_reputation(&mut self, _amount: f64) {}

    /// Display name used in console lines.
    fn label(&self) -> &str {
        "Agent"
    }
}

/// Cost per point of damage when [`BasicActor`] is hospitalized.
pub const HOSPITAL_COST_PER_HP: f64 = 100_000.0;

/// Convert accumulated experience into a stat level.
///
/// Level 1 at zero experience, growing logarithmically.
pub fn level_from_exp(exp: f64) -> f64 {
    (32.0f64.mul_add((exp + 534.6).ln(), -200.0)).floor().max(1.0)
}

/// In-memory [`Actor`] used by the CLI driver and tests.
#[derive(Debug, Clone, PartialEq)]
pub struct BasicActor {
    /// Display name.
    pub name: String,
    /// Accumulated experience per stat.
    pub exp: StatBlock,
    /// Current stat levels. Raised (never lowered) as experience accrues.
    pub levels: StatBlock,
    /// Money on hand.
    pub money: f64,
    /// Current HP.
    pub hp: f64,
    /// Max HP.
    pub max_hp: f64,
    /// Times hospitalized.
    pub hospitalizations: u32,
    /// External multipliers. Missing entries read as 1.
    pub multipliers: BTreeMap<ActorMult, f64>,
    /// May run engine actions alongside other work.
    pub bypass: bool,
    /// Currently doing something outside the engine.
    pub busy_elsewhere: bool,
    /// Allegiance favor, when affiliated.
    pub favor: Option<f64>,
    /// Reputation earned with the allegiance group.
    pub reputation: f64,
}

impl BasicActor {
    /// A fresh level-1 actor with 10 HP and no money.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            exp: StatBlock::ZERO,
            levels: StatBlock::uniform(1.0),
            money: 0.0,
            hp: 10.0,
            max_hp: 10.0,
            hospitalizations: 0,
            multipliers: BTreeMap::new(),
            bypass: false,
            busy_elsewhere: false,
            favor: None,
            reputation: 0.0,
        }
    }

    /// Set stat levels directly.
    #[must_use]
    pub const fn with_levels(mut self, levels: StatBlock) -> Self {
        self.levels = levels;
        self
    }

    /// Set one external multiplier.
    #[must_use]
    pub fn with_multiplier(mut self, mult: ActorMult, value: f64) -> Self {
        self.multipliers.insert(mult, value);
        self
    }

    /// Join the allegiance group with the given favor.
    #[must_use]
    pub const fn with_favor(mut self, favor: f64) -> Self {
        self.favor = Some(favor);
        self
    }

    fn refresh_levels(&mut self) {
        for &stat in Stat::ALL {
            let from_exp = level_from_exp(self.exp.get(stat));
            let level = self.levels.get_mut(stat);
            *level = level.max(from_exp);
        }
    }
}

impl Actor for BasicActor {
    fn stat(&self, stat: Stat) -> f64 {
        self.levels.get(stat)
    }

    fn multiplier(&self, mult: ActorMult) -> f64 {
        self.multipliers.get(&mult).copied().unwrap_or(1.0)
    }

    fn take_damage(&mut self, amount: f64) -> bool {
        self.hp -= amount;
        if self.hp <= 0.0 {
            self.hospitalizations = self.hospitalizations.saturating_add(1);
            self.hp = self.max_hp;
            return true;
        }
        false
    }

    fn regenerate_hp(&mut self, amount: f64) {
        self.hp = (self.hp + amount).min(self.max_hp);
    }

    fn gain_experience(&mut self, reward: &RewardVector) {
        self.exp.accumulate(&reward.exp);
        self.refresh_levels();
    }

    fn gain_money(&mut self, amount: f64) {
        self.money += amount;
    }

    fn hospitalization_cost(&self, damage: f64) -> f64 {
        damage * HOSPITAL_COST_PER_HP
    }

    fn has_bypass_flag(&self) -> bool {
        self.bypass
    }

    fn is_busy_elsewhere(&self) -> bool {
        self.busy_elsewhere
    }

    fn cancel_other_work(&mut self) {
        self.busy_elsewhere = false;
    }

    fn allegiance_favor(&self) -> Option<f64> {
        self.favor
    }

    fn gain_reputation(&mut self, amount: f64) {
        self.reputation += amount;
    }

    fn label(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_exp_is_level_one() {
        assert!((level_from_exp(0.0) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn huge_exp_saturates_levels() {
        let mut actor = BasicActor::new("test");
        let reward = RewardVector::from_exp(StatBlock::new(0.0, 1e200, 1e200, 1e200, 1e200, 0.0, 0.0));
        actor.gain_experience(&reward);
        assert!(actor.stat(Stat::Strength) > 10_000.0);
        assert!((actor.stat(Stat::Charisma) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn levels_never_drop_below_manual_setting() {
        let mut actor = BasicActor::new("test").with_levels(StatBlock::uniform(500.0));
        actor.gain_experience(&RewardVector::from_exp(StatBlock::uniform(1.0)));
        assert!((actor.stat(Stat::Agility) - 500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn lethal_damage_hospitalizes() {
        let mut actor = BasicActor::new("test");
        assert!(!actor.take_damage(3.0));
        assert!(actor.take_damage(20.0));
        assert_eq!(actor.hospitalizations, 1);
        assert!((actor.hp - actor.max_hp).abs() < f64::EPSILON);
    }

    #[test]
    fn regeneration_caps_at_max() {
        let mut actor = BasicActor::new("test");
        actor.take_damage(5.0);
        actor.regenerate_hp(100.0);
        assert!((actor.hp - actor.max_hp).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_multiplier_is_neutral() {
        let actor = BasicActor::new("test").with_multiplier(ActorMult::SuccessChance, 2.0);
        assert!((actor.multiplier(ActorMult::SuccessChance) - 2.0).abs() < f64::EPSILON);
        assert!((actor.multiplier(ActorMult::MaxStamina) - 1.0).abs() < f64::EPSILON);
    }
}
