//! Rank and skill-point ledger.
//!
//! Rank is the progression currency. Every change flows through
//! [`RankLedger::change_rank`], which also converts the delta into
//! allegiance reputation and grants skill points whenever the highest
//! rank ever held crosses `(total_skill_points + 1) × 3`.

use fieldops_actions::{Actor, ActorMult};
use fieldops_types::constants::{RANK_TO_FACTION_REP_FACTOR, RANKS_PER_SKILL_POINT};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Rank and skill-point counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RankLedger {
    /// Current rank, never negative.
    pub rank: f64,
    /// Highest rank ever held.
    pub max_rank: f64,
    /// Spendable skill points.
    pub skill_points: f64,
    /// Skill points ever granted.
    pub total_skill_points: f64,
}

impl RankLedger {
    /// Apply a rank delta.
    ///
    /// Returns the number of skill points granted by this change.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NonFiniteRank`] for a NaN or infinite delta.
    /// The ledger is left untouched.
    pub fn change_rank(&mut self, actor: &mut dyn Actor, delta: f64) -> Result<f64, EngineError> {
        if !delta.is_finite() {
            return Err(EngineError::NonFiniteRank { delta });
        }
        self.rank = (self.rank + delta).max(0.0);
        self.max_rank = self.max_rank.max(self.rank);

        if let Some(favor) = actor.allegiance_favor() {
            let favor_bonus = 1.0 + favor / 100.0;
            actor.gain_reputation(
                RANK_TO_FACTION_REP_FACTOR
                    * delta
                    * actor.multiplier(ActorMult::FactionRep)
                    * favor_bonus,
            );
        }

        let needed = (self.total_skill_points + 1.0) * RANKS_PER_SKILL_POINT;
        if self.max_rank < needed {
            return Ok(0.0);
        }
        let gained = ((self.max_rank - needed) / RANKS_PER_SKILL_POINT + 1.0).floor();
        self.skill_points += gained;
        self.total_skill_points += gained;
        tracing::debug!(gained, total = self.total_skill_points, "Skill points granted");
        Ok(gained)
    }

    /// Spend skill points. The caller has already checked the balance.
    pub fn spend(&mut self, cost: f64) {
        self.skill_points = (self.skill_points - cost).max(0.0);
    }
}
