//! Action definitions.
//!
//! An [`Action`] is a tagged union: a shared [`ActionBase`] (difficulty,
//! stat weights, rank and HP deltas) plus a kind-specific
//! [`ActionPayload`]. Contracts and operations carry a [`Countable`]
//! counter that limits how often they can be attempted; black operations
//! carry a sequence gate; general actions carry nothing.

use fieldops_types::constants::{ACTION_COUNT_GROWTH_PERIOD, CHAOS_THRESHOLD};
use fieldops_types::{ActionId, ActionKind, StatBlock};
use fieldops_world::random_int_f64;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ActionError;

// ---------------------------------------------------------------------------
// Base
// ---------------------------------------------------------------------------

/// Tunables shared by every action kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionBase {
    /// Difficulty at level 1.
    pub base_difficulty: f64,
    /// Per-stat weight in competence and experience rewards.
    pub weights: StatBlock,
    /// Per-stat exponent applied to effective stats in competence.
    pub decays: StatBlock,
    /// Rank gained on success.
    pub rank_gain: f64,
    /// Rank lost on failure.
    pub rank_loss: f64,
    /// HP lost on failure, before the difficulty multiplier.
    pub hp_loss: f64,
    /// Benefits from stealth skills.
    pub is_stealth: bool,
    /// Benefits from kill skills.
    pub is_kill: bool,
}

// ---------------------------------------------------------------------------
// Countable
// ---------------------------------------------------------------------------

/// Attempt counter, success tracking and level for contracts and
/// operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Countable {
    /// Attempts available. Fractional; regenerates over time.
    pub count: f64,
    /// Lifetime successes.
    pub successes: u32,
    /// Lifetime failures.
    pub failures: u32,
    /// Selected level (1-based).
    pub level: u32,
    /// Highest unlocked level.
    pub max_level: u32,
    /// Pin `level` to `max_level` after every attempt.
    pub auto_level: bool,
    /// Difficulty growth per level.
    pub difficulty_fac: f64,
    /// Reward growth per level.
    pub reward_fac: f64,
    /// Growth per period is `U[growth_min, growth_max] / 10`.
    pub growth_min: i64,
    /// See `growth_min`.
    pub growth_max: i64,
}

impl Countable {
    /// A fresh level-1 counter with a random initial count.
    pub fn new(
        rng: &mut impl Rng,
        count_range: (i64, i64),
        growth_range: (i64, i64),
        difficulty_fac: f64,
        reward_fac: f64,
    ) -> Self {
        Self {
            count: random_int_f64(rng, count_range.0, count_range.1),
            successes: 0,
            failures: 0,
            level: 1,
            max_level: 1,
            auto_level: false,
            difficulty_fac,
            reward_fac,
            growth_min: growth_range.0,
            growth_max: growth_range.1,
        }
    }

    /// Draw one growth amount.
    pub fn growth(&self, rng: &mut impl Rng) -> f64 {
        random_int_f64(rng, self.growth_min, self.growth_max) / 10.0
    }

    /// Regenerate count for `seconds` of elapsed time.
    pub fn grow(&mut self, seconds: f64, rng: &mut impl Rng) {
        self.count += seconds * self.growth(rng) / ACTION_COUNT_GROWTH_PERIOD;
    }

    /// Consume one attempt. Never takes the count below zero.
    pub fn consume_attempt(&mut self) {
        self.count = (self.count - 1.0).max(0.0);
    }

    /// Levels above 1 as an exponent.
    fn level_exponent(&self) -> i32 {
        i32::try_from(self.level.saturating_sub(1)).unwrap_or(i32::MAX)
    }

    /// `reward_fac ^ (level - 1)`.
    pub fn reward_multiplier(&self) -> f64 {
        self.reward_fac.powi(self.level_exponent())
    }

    /// `difficulty_fac ^ (level - 1)`.
    pub fn difficulty_scale(&self) -> f64 {
        self.difficulty_fac.powi(self.level_exponent())
    }

    /// Cumulative successes needed to unlock the level after `max_level`.
    pub fn successes_needed_for_next_level(&self, per_level: f64) -> f64 {
        let m = f64::from(self.max_level);
        (0.5 * m * 2.0f64.mul_add(per_level, m - 1.0)).ceil()
    }

    /// Successes still missing before the next level unlocks.
    pub fn successes_remaining(&self, per_level: f64) -> f64 {
        (self.successes_needed_for_next_level(per_level) - f64::from(self.successes)).max(0.0)
    }

    /// Unlock one more level if enough successes have accumulated.
    pub fn update_max_level(&mut self, per_level: f64) {
        if f64::from(self.successes) >= self.successes_needed_for_next_level(per_level) {
            self.max_level = self.max_level.saturating_add(1);
        }
    }

    /// Select a level in `1..=max_level`.
    pub const fn set_level(&mut self, level: u32) -> bool {
        if level == 0 || level > self.max_level {
            return false;
        }
        self.level = level;
        true
    }

    /// Apply the auto-level rule.
    pub const fn apply_auto_level(&mut self) {
        if self.auto_level {
            self.level = self.max_level;
        }
    }
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// Operation-specific state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationState {
    /// Attempt counter and level.
    pub counter: Countable,
    /// Minimum rank to attempt.
    pub required_rank: f64,
    /// Team members sent along.
    pub team_count: u32,
}

/// Black-operation-specific state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlackOpState {
    /// Minimum rank to attempt.
    pub required_rank: f64,
    /// Number of black operations that must be complete first.
    pub sequence: u32,
    /// Team members sent along.
    pub team_count: u32,
}

/// Kind-specific part of an [`Action`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ActionPayload {
    /// A contract.
    Contract(Countable),
    /// An operation.
    Operation(OperationState),
    /// A black operation.
    BlackOp(BlackOpState),
    /// A general action.
    General,
}

// ---------------------------------------------------------------------------
// Availability
// ---------------------------------------------------------------------------

/// Why an action cannot be started or continued.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Unavailable {
    /// No attempts left.
    #[error("Insufficient action count")]
    InsufficientCount,

    /// Rank below the requirement.
    #[error("Insufficient rank ({rank:.0} / {required:.0})")]
    InsufficientRank {
        /// Required rank.
        required: f64,
        /// Current rank.
        rank: f64,
    },

    /// A raid needs a community to raid.
    #[error("No Synthoid communities in current city")]
    NoCommunities,

    /// Not enough team members for the configured team count.
    #[error("Insufficient team size ({available} / {needed})")]
    InsufficientTeam {
        /// Team members the action sends.
        needed: u32,
        /// Team members available.
        available: u32,
    },

    /// An earlier black operation is still outstanding.
    #[error("Previous black operation not completed")]
    PreviousBlackOpIncomplete,

    /// This black operation is done.
    #[error("Already completed")]
    AlreadyCompleted,
}

/// Engine state an availability check reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AvailabilityContext {
    /// Current rank.
    pub rank: f64,
    /// Team members available.
    pub team_size: u32,
    /// Black operations completed.
    pub black_ops_completed: u32,
    /// Communities in the current region.
    pub communities: u32,
}

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Identifier.
    pub id: ActionId,
    /// Shared tunables.
    pub base: ActionBase,
    /// Kind-specific state.
    pub payload: ActionPayload,
}

impl Action {
    /// Action kind.
    pub const fn kind(&self) -> ActionKind {
        self.id.kind()
    }

    /// Display name.
    pub const fn name(&self) -> &'static str {
        self.id.name()
    }

    /// The attempt counter, for contracts and operations.
    pub const fn countable(&self) -> Option<&Countable> {
        match &self.payload {
            ActionPayload::Contract(counter) => Some(counter),
            ActionPayload::Operation(op) => Some(&op.counter),
            ActionPayload::BlackOp(_) | ActionPayload::General => None,
        }
    }

    /// Mutable attempt counter, for contracts and operations.
    pub const fn countable_mut(&mut self) -> Option<&mut Countable> {
        match &mut self.payload {
            ActionPayload::Contract(counter) => Some(counter),
            ActionPayload::Operation(op) => Some(&mut op.counter),
            ActionPayload::BlackOp(_) | ActionPayload::General => None,
        }
    }

    /// The attempt counter, or an error for kinds without one.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::NotCountable`] for black and general actions.
    pub fn require_countable_mut(&mut self) -> Result<&mut Countable, ActionError> {
        let id = self.id;
        self.countable_mut().ok_or(ActionError::NotCountable(id))
    }

    /// Difficulty at the current level.
    pub fn difficulty(&self) -> f64 {
        self.countable().map_or(self.base.base_difficulty, |counter| {
            self.base.base_difficulty * counter.difficulty_scale()
        })
    }

    /// Difficulty after the chaos penalty for a region at `chaos`.
    pub fn difficulty_with_chaos(&self, chaos: f64) -> f64 {
        let difficulty = self.difficulty();
        if chaos > CHAOS_THRESHOLD {
            difficulty * (1.0 + chaos - CHAOS_THRESHOLD).sqrt()
        } else {
            difficulty
        }
    }

    /// `reward_fac ^ (level - 1)` for countable kinds, 1 otherwise.
    pub fn reward_multiplier(&self) -> f64 {
        self.countable().map_or(1.0, Countable::reward_multiplier)
    }

    /// Team members sent along (0 for kinds without a team).
    pub const fn team_count(&self) -> u32 {
        match &self.payload {
            ActionPayload::Operation(op) => op.team_count,
            ActionPayload::BlackOp(black_op) => black_op.team_count,
            ActionPayload::Contract(_) | ActionPayload::General => 0,
        }
    }

    /// Set the team count. Returns `false` for kinds without a team.
    pub const fn set_team_count(&mut self, count: u32) -> bool {
        match &mut self.payload {
            ActionPayload::Operation(op) => {
                op.team_count = count;
                true
            }
            ActionPayload::BlackOp(black_op) => {
                black_op.team_count = count;
                true
            }
            ActionPayload::Contract(_) | ActionPayload::General => false,
        }
    }

    /// Rank needed to attempt (0 for kinds without a requirement).
    pub const fn required_rank(&self) -> f64 {
        match &self.payload {
            ActionPayload::Operation(op) => op.required_rank,
            ActionPayload::BlackOp(black_op) => black_op.required_rank,
            ActionPayload::Contract(_) | ActionPayload::General => 0.0,
        }
    }

    /// Check whether the action can be attempted right now.
    ///
    /// # Errors
    ///
    /// Returns the first [`Unavailable`] reason found.
    pub fn availability(&self, ctx: &AvailabilityContext) -> Result<(), Unavailable> {
        match &self.payload {
            ActionPayload::Contract(counter) => check_count(counter),
            ActionPayload::Operation(op) => {
                check_count(&op.counter)?;
                check_rank(op.required_rank, ctx.rank)?;
                if matches!(self.id, ActionId::Operation(fieldops_types::OperationName::Raid))
                    && ctx.communities == 0
                {
                    return Err(Unavailable::NoCommunities);
                }
                check_team(op.team_count, ctx.team_size)
            }
            ActionPayload::BlackOp(black_op) => {
                if ctx.black_ops_completed < black_op.sequence {
                    return Err(Unavailable::PreviousBlackOpIncomplete);
                }
                if ctx.black_ops_completed > black_op.sequence {
                    return Err(Unavailable::AlreadyCompleted);
                }
                check_rank(black_op.required_rank, ctx.rank)?;
                check_team(black_op.team_count, ctx.team_size)
            }
            ActionPayload::General => Ok(()),
        }
    }
}

fn check_count(counter: &Countable) -> Result<(), Unavailable> {
    if counter.count < 1.0 {
        return Err(Unavailable::InsufficientCount);
    }
    Ok(())
}

fn check_rank(required: f64, rank: f64) -> Result<(), Unavailable> {
    if rank < required {
        return Err(Unavailable::InsufficientRank { required, rank });
    }
    Ok(())
}

const fn check_team(needed: u32, available: u32) -> Result<(), Unavailable> {
    if needed > available {
        return Err(Unavailable::InsufficientTeam { needed, available });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use fieldops_types::{BlackOpName, ContractName, OperationName};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn counter(count: f64) -> Countable {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut c = Countable::new(&mut rng, (1, 1), (10, 10), 1.04, 1.085);
        c.count = count;
        c
    }

    fn base() -> ActionBase {
        ActionBase {
            base_difficulty: 100.0,
            weights: StatBlock::uniform(0.1),
            decays: StatBlock::uniform(0.9),
            rank_gain: 1.0,
            rank_loss: 0.1,
            hp_loss: 1.0,
            is_stealth: false,
            is_kill: false,
        }
    }

    fn ctx() -> AvailabilityContext {
        AvailabilityContext {
            rank: 0.0,
            team_size: 0,
            black_ops_completed: 0,
            communities: 10,
        }
    }

    #[test]
    fn max_level_rule_matches_series() {
        let mut c = counter(10.0);
        // From max level 1 with 3 per level: ceil(0.5 * 1 * (6 + 0)) = 3.
        assert!((c.successes_needed_for_next_level(3.0) - 3.0).abs() < f64::EPSILON);
        c.successes = 2;
        c.update_max_level(3.0);
        assert_eq!(c.max_level, 1);
        c.successes = 3;
        c.update_max_level(3.0);
        assert_eq!(c.max_level, 2);
        // From 2: ceil(0.5 * 2 * (6 + 1)) = 7.
        assert!((c.successes_remaining(3.0) - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn level_bounds() {
        let mut c = counter(10.0);
        c.max_level = 3;
        assert!(!c.set_level(0));
        assert!(!c.set_level(4));
        assert!(c.set_level(3));
        assert_eq!(c.level, 3);
    }

    #[test]
    fn difficulty_scales_with_level() {
        let mut c = counter(10.0);
        c.max_level = 3;
        c.set_level(3);
        let action = Action {
            id: ActionId::Contract(ContractName::BountyHunter),
            base: base(),
            payload: ActionPayload::Contract(c),
        };
        assert!((action.difficulty() - 100.0 * 1.04 * 1.04).abs() < 1e-9);
        assert!((action.reward_multiplier() - 1.085 * 1.085).abs() < 1e-9);
    }

    #[test]
    fn chaos_above_threshold_raises_difficulty() {
        let action = Action {
            id: ActionId::Contract(ContractName::Tracking),
            base: base(),
            payload: ActionPayload::Contract(counter(5.0)),
        };
        assert!((action.difficulty_with_chaos(50.0) - 100.0).abs() < f64::EPSILON);
        assert!((action.difficulty_with_chaos(53.0) - 200.0).abs() < 1e-9);
    }

    #[test]
    fn count_gate() {
        let action = Action {
            id: ActionId::Contract(ContractName::Tracking),
            base: base(),
            payload: ActionPayload::Contract(counter(0.99)),
        };
        assert_eq!(action.availability(&ctx()), Err(Unavailable::InsufficientCount));
    }

    #[test]
    fn consume_never_goes_negative() {
        let mut c = counter(0.5);
        c.consume_attempt();
        assert!(c.count.abs() < f64::EPSILON);
    }

    #[test]
    fn raid_needs_communities_and_team() {
        let mut action = Action {
            id: ActionId::Operation(OperationName::Raid),
            base: base(),
            payload: ActionPayload::Operation(OperationState {
                counter: counter(5.0),
                required_rank: 10.0,
                team_count: 0,
            }),
        };
        let mut c = ctx();
        assert!(matches!(action.availability(&c), Err(Unavailable::InsufficientRank { .. })));
        c.rank = 10.0;
        c.communities = 0;
        assert_eq!(action.availability(&c), Err(Unavailable::NoCommunities));
        c.communities = 1;
        assert!(action.availability(&c).is_ok());
        action.set_team_count(4);
        assert_eq!(
            action.availability(&c),
            Err(Unavailable::InsufficientTeam {
                needed: 4,
                available: 0
            })
        );
    }

    #[test]
    fn black_op_sequence_gate() {
        let action = Action {
            id: ActionId::BlackOp(BlackOpName::Zero),
            base: base(),
            payload: ActionPayload::BlackOp(BlackOpState {
                required_rank: 0.0,
                sequence: 1,
                team_count: 0,
            }),
        };
        let mut c = ctx();
        assert_eq!(action.availability(&c), Err(Unavailable::PreviousBlackOpIncomplete));
        c.black_ops_completed = 1;
        assert!(action.availability(&c).is_ok());
        c.black_ops_completed = 2;
        assert_eq!(action.availability(&c), Err(Unavailable::AlreadyCompleted));
    }

    #[test]
    fn general_is_always_available() {
        let action = Action {
            id: ActionId::General(fieldops_types::GeneralActionName::Training),
            base: base(),
            payload: ActionPayload::General,
        };
        assert!(action.availability(&ctx()).is_ok());
        assert!(action.countable().is_none());
    }
}
