//! Action resolution.
//!
//! Called when the running action's elapsed time reaches its required
//! time. Each kind has its own arm:
//!
//! | Kind | Effects |
//! |---|---|
//! | Contract | stamina cost, roll, counters, money, rank, then the contract's region effect |
//! | Operation | stamina cost, roll, counters, rank, team casualties, then the operation's region effect |
//! | Black op | stamina cost, roll, rank, casualties, then idle |
//! | General | the action's fixed effect, with a roll only for Recruitment |
//!
//! The reward vector is returned, not applied; the tick hands it to the
//! actor.

use fieldops_actions::{
    Actor, ActorMult, SuccessContext, action_stats, action_time, attempt, difficulty_multiplier,
};
use fieldops_types::constants::{
    BASE_INT_GAIN, BASE_STAMINA_LOSS, BASE_STAT_GAIN, CONTRACT_BASE_MONEY_GAIN,
    CONTRACT_SUCCESSES_PER_LEVEL, HRC_HP_GAIN, HRC_STAMINA_GAIN, OPERATION_SUCCESSES_PER_LEVEL,
};
use fieldops_types::{
    ActionId, ContractName, GeneralActionName, LogCategory, OperationName, RewardVector,
    SkillMult, Stat, StatBlock,
};
use fieldops_world::{
    PercentageChange, PopulationCountChange, add_offset, random_int_f64,
    trigger_potential_migration,
};
use serde::{Deserialize, Serialize};

use crate::engine::Engine;
use crate::error::EngineError;

/// Experience per training session for each combat stat.
const TRAINING_EXP: f64 = 30.0;

/// Permanent stamina bonus per training session, before the skill
/// multiplier.
const TRAINING_STAMINA_BONUS: f64 = 0.04;

/// Hacking and charisma experience per Field Analysis.
const ANALYSIS_EXP: f64 = 20.0;

/// Rank granted by each Field Analysis.
const ANALYSIS_RANK: f64 = 0.1;

/// Seconds of count growth one Incite Violence adds to every counter.
const INCITE_GROWTH_SECONDS: f64 = 180.0;

/// Flat chaos every region gains from Incite Violence.
const INCITE_CHAOS: f64 = 10.0;

/// Random percentage offset applied to rank changes and damage.
const OFFSET_PCT: f64 = 10.0;

/// What one resolution did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionOutcome {
    /// The resolved action.
    pub action: ActionId,
    /// Whether the roll succeeded. General actions without a roll always
    /// succeed.
    pub success: bool,
    /// Rank gained (positive) or lost (negative).
    pub rank_change: f64,
    /// Damage dealt to the actor.
    pub damage: f64,
    /// Team members lost.
    pub team_lost: u32,
    /// Experience and money for the actor.
    pub reward: RewardVector,
}

impl ActionOutcome {
    const fn new(action: ActionId, success: bool) -> Self {
        Self {
            action,
            success,
            rank_change: 0.0,
            damage: 0.0,
            team_lost: 0,
            reward: RewardVector::ZERO,
        }
    }
}

impl Engine {
    /// Resolve one completed attempt of `id`.
    ///
    /// # Errors
    ///
    /// Propagates catalog, formula, region and rank errors. Field Analysis
    /// with NaN or negative effectiveness is
    /// [`EngineError::InvalidAnalysis`].
    pub(crate) fn complete_action(
        &mut self,
        actor: &mut dyn Actor,
        id: ActionId,
    ) -> Result<ActionOutcome, EngineError> {
        let outcome = match id {
            ActionId::Contract(_) | ActionId::Operation(_) => self.complete_countable(actor, id)?,
            ActionId::BlackOp(_) => self.complete_black_op(actor, id)?,
            ActionId::General(name) => self.complete_general(actor, name)?,
        };
        tracing::debug!(
            action = %id.name(),
            success = outcome.success,
            rank_change = outcome.rank_change,
            "Action resolved"
        );
        Ok(outcome)
    }

    /// Roll one attempt against the current region.
    fn roll(&mut self, actor: &dyn Actor, id: ActionId) -> Result<bool, EngineError> {
        let ctx = SuccessContext {
            actor,
            skills: &self.skill_mults,
            stamina: self.stamina.current,
            max_stamina: self.stamina.max,
            team_size: self.team.size,
            region: self.regions.get(self.city),
        };
        Ok(attempt(self.catalog.get(id)?, &ctx, &mut self.rng)?)
    }

    /// Rank loss and damage shared by failed contracts, operations and
    /// black ops. Returns `(rank_lost, damage)`.
    fn apply_failure_penalties(
        &mut self,
        actor: &mut dyn Actor,
        rank_loss: f64,
        hp_loss: f64,
        difficulty_mult: f64,
    ) -> Result<(f64, f64), EngineError> {
        let mut lost = 0.0;
        if rank_loss > 0.0 {
            lost = add_offset(&mut self.rng, rank_loss, OFFSET_PCT);
            self.ledger.change_rank(actor, -lost)?;
        }
        let mut damage = 0.0;
        if hp_loss > 0.0 {
            damage = add_offset(&mut self.rng, hp_loss * difficulty_mult, OFFSET_PCT).ceil();
            let cost = actor.hospitalization_cost(damage);
            if actor.take_damage(damage) {
                self.hospitalizations = self.hospitalizations.saturating_add(1);
                self.money_lost += cost;
                tracing::info!(damage, cost, "Actor hospitalized");
            }
        }
        Ok((lost, damage))
    }

    // -----------------------------------------------------------------------
    // Contracts and operations
    // -----------------------------------------------------------------------

    fn complete_countable(
        &mut self,
        actor: &mut dyn Actor,
        id: ActionId,
    ) -> Result<ActionOutcome, EngineError> {
        let action = self.catalog.get(id)?;
        let base = action.base.clone();
        let difficulty_mult = difficulty_multiplier(action.difficulty());
        let reward_mult = action.reward_multiplier();
        let team_count = action.team_count();
        let per_level = match id {
            ActionId::Operation(_) => OPERATION_SUCCESSES_PER_LEVEL,
            _ => CONTRACT_SUCCESSES_PER_LEVEL,
        };

        self.stamina.spend(BASE_STAMINA_LOSS * difficulty_mult);
        let success = self.roll(actor, id)?;

        let mut outcome = ActionOutcome::new(id, success);
        outcome.reward = action_stats(self.catalog.get(id)?, actor, &self.skill_mults, success);

        let counter = self.catalog.get_mut(id)?.require_countable_mut()?;
        counter.consume_attempt();
        if success {
            counter.successes = counter.successes.saturating_add(1);
            counter.update_max_level(per_level);
        } else {
            counter.failures = counter.failures.saturating_add(1);
        }

        let label = actor.label().to_owned();
        let (category, noun) = match id {
            ActionId::Operation(_) => (LogCategory::Operations, id.name().to_owned()),
            _ => (LogCategory::Contracts, format!("{} contract", id.name())),
        };

        if success {
            if matches!(id, ActionId::Contract(_)) {
                outcome.reward.money = CONTRACT_BASE_MONEY_GAIN
                    * reward_mult
                    * self.skill_mults.get(SkillMult::Money);
            }
            if base.rank_gain > 0.0 {
                let gain = add_offset(&mut self.rng, base.rank_gain * reward_mult, OFFSET_PCT);
                self.ledger.change_rank(actor, gain)?;
                outcome.rank_change = gain;
                let line = match id {
                    ActionId::Contract(_) => format!(
                        "{label}: {noun} successfully completed! Gained {gain:.3} rank and ${:.2}.",
                        outcome.reward.money
                    ),
                    _ => format!("{label}: {noun} successfully completed! Gained {gain:.3} rank."),
                };
                self.log_if(category, line);
            }
        } else {
            let (lost, damage) = self.apply_failure_penalties(
                actor,
                base.rank_loss * reward_mult,
                base.hp_loss,
                difficulty_mult,
            )?;
            outcome.rank_change = -lost;
            outcome.damage = damage;
            let mut line = format!("{label}: {noun} failed!");
            if lost > 0.0 {
                line.push_str(&format!(" Lost {lost:.3} rank."));
            }
            if damage > 0.0 {
                line.push_str(&format!(" Took {damage:.0} damage."));
            }
            self.log_if(category, line);
        }

        match id {
            ActionId::Operation(name) => {
                outcome.team_lost = self.complete_operation(name, success, team_count)?;
            }
            ActionId::Contract(name) => self.complete_contract(name, success)?,
            ActionId::BlackOp(_) | ActionId::General(_) => {}
        }

        self.catalog.get_mut(id)?.require_countable_mut()?.apply_auto_level();
        Ok(outcome)
    }

    /// Region effect of a finished operation. Returns team members lost.
    fn complete_operation(
        &mut self,
        name: OperationName,
        success: bool,
        team_count: u32,
    ) -> Result<u32, EngineError> {
        let lost = self.team.resolve_casualties(team_count, success, &mut self.rng);
        if lost > 0 {
            self.log_if(
                LogCategory::Operations,
                format!("Lost {lost} team members during this {name}"),
            );
        }

        let city = self.city;
        let estimate_mult = self.skill_mults.get(SkillMult::SuccessChanceEstimate);
        let equal_non_zero = PercentageChange {
            change_est_equally: true,
            non_zero: true,
        };

        match name {
            OperationName::Investigation | OperationName::Undercover => {
                let (estimate_pct, migration_chance) = match name {
                    OperationName::Investigation => (0.4, 0.1),
                    _ => (0.8, 0.15),
                };
                if success {
                    self.regions
                        .get_mut(city)
                        .improve_population_estimate_by_percentage(estimate_pct * estimate_mult)?;
                } else if let Some(to) = trigger_potential_migration(
                    &mut self.regions,
                    city,
                    migration_chance,
                    &mut self.rng,
                )? {
                    self.log_if(
                        LogCategory::Events,
                        format!("Intelligence indicates that a large number of people moved from {city} to {to}"),
                    );
                }
            }
            OperationName::Sting => {
                let region = self.regions.get_mut(city);
                if success {
                    region.change_population_by_percentage(-0.1, equal_non_zero)?;
                }
                region.change_chaos_by_count(0.1)?;
            }
            OperationName::Raid => {
                let region = self.regions.get_mut(city);
                if success {
                    region.change_population_by_percentage(-1.0, equal_non_zero)?;
                    region.remove_community();
                } else {
                    let change = random_int_f64(&mut self.rng, -10, -5) / 10.0;
                    region.change_population_by_percentage(
                        change,
                        PercentageChange {
                            change_est_equally: false,
                            non_zero: true,
                        },
                    )?;
                }
                region.change_chaos_by_percentage(random_int_f64(&mut self.rng, 1, 5))?;
            }
            OperationName::StealthRetirement => {
                let region = self.regions.get_mut(city);
                if success {
                    region.change_population_by_percentage(-0.5, equal_non_zero)?;
                }
                region.change_chaos_by_percentage(random_int_f64(&mut self.rng, -3, -1))?;
            }
            OperationName::Assassination => {
                let region = self.regions.get_mut(city);
                if success {
                    region.change_population_by_count(
                        -1.0,
                        PopulationCountChange {
                            est_change: -1.0,
                            est_offset: 0.0,
                        },
                        &mut self.rng,
                    )?;
                }
                region.change_chaos_by_percentage(random_int_f64(&mut self.rng, -5, 5))?;
            }
        }
        Ok(lost)
    }

    /// Region effect of a successful contract. Failures change nothing.
    fn complete_contract(&mut self, name: ContractName, success: bool) -> Result<(), EngineError> {
        if !success {
            return Ok(());
        }
        let region = self.regions.get_mut(self.city);
        let retired = PopulationCountChange {
            est_change: -1.0,
            est_offset: 0.0,
        };
        match name {
            ContractName::Tracking => {
                let found = random_int_f64(&mut self.rng, 100, 1000);
                region.improve_population_estimate_by_count(
                    found * self.skill_mults.get(SkillMult::SuccessChanceEstimate),
                )?;
            }
            ContractName::BountyHunter => {
                region.change_population_by_count(-1.0, retired, &mut self.rng)?;
                region.change_chaos_by_count(0.02)?;
            }
            ContractName::Retirement => {
                region.change_population_by_count(-1.0, retired, &mut self.rng)?;
                region.change_chaos_by_count(0.04)?;
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Black operations
    // -----------------------------------------------------------------------

    fn complete_black_op(
        &mut self,
        actor: &mut dyn Actor,
        id: ActionId,
    ) -> Result<ActionOutcome, EngineError> {
        let action = self.catalog.get(id)?;
        let base = action.base.clone();
        let difficulty_mult = difficulty_multiplier(action.difficulty());
        let team_count = action.team_count();

        self.stamina.spend(BASE_STAMINA_LOSS * difficulty_mult);
        let success = self.roll(actor, id)?;

        let mut outcome = ActionOutcome::new(id, success);
        outcome.reward = action_stats(self.catalog.get(id)?, actor, &self.skill_mults, success);
        let label = actor.label().to_owned();
        let name = id.name();

        if success {
            self.black_ops_completed = self.black_ops_completed.saturating_add(1);
            if base.rank_gain > 0.0 {
                let gain = add_offset(&mut self.rng, base.rank_gain, OFFSET_PCT);
                self.ledger.change_rank(actor, gain)?;
                outcome.rank_change = gain;
            }
            outcome.team_lost = self.team.resolve_casualties(team_count, true, &mut self.rng);
            self.log_if(
                LogCategory::BlackOps,
                format!(
                    "{label}: {name} successful! Gained {:.1} rank.",
                    outcome.rank_change
                ),
            );
            tracing::info!(black_op = %name, completed = self.black_ops_completed, "Black op completed");
        } else {
            let (lost, damage) =
                self.apply_failure_penalties(actor, base.rank_loss, base.hp_loss, difficulty_mult)?;
            outcome.rank_change = -lost;
            outcome.damage = damage;
            outcome.team_lost = self.team.resolve_casualties(team_count, false, &mut self.rng);
            self.log_if(
                LogCategory::BlackOps,
                format!("{label}: {name} failed! Lost {lost:.1} rank. Took {damage:.0} damage."),
            );
        }

        self.reset_action();
        if outcome.team_lost > 0 {
            self.log_if(
                LogCategory::BlackOps,
                format!(
                    "{label}: You lost {} team members during {name}.",
                    outcome.team_lost
                ),
            );
        }
        Ok(outcome)
    }

    // -----------------------------------------------------------------------
    // General actions
    // -----------------------------------------------------------------------

    fn complete_general(
        &mut self,
        actor: &mut dyn Actor,
        name: GeneralActionName,
    ) -> Result<ActionOutcome, EngineError> {
        let id = ActionId::General(name);
        let mut outcome = ActionOutcome::new(id, true);
        let label = actor.label().to_owned();

        match name {
            GeneralActionName::Training => {
                self.stamina.spend(0.5 * BASE_STAMINA_LOSS);
                let mut exp = StatBlock::ZERO;
                for stat in [Stat::Strength, Stat::Defense, Stat::Dexterity, Stat::Agility] {
                    *exp.get_mut(stat) =
                        TRAINING_EXP * actor.multiplier(ActorMult::ExpGain(stat));
                }
                let bonus = TRAINING_STAMINA_BONUS * self.skill_mults.get(SkillMult::Stamina);
                self.stamina.bonus += bonus;
                outcome.reward = RewardVector::from_exp(exp);
                self.log_if(
                    LogCategory::General,
                    format!(
                        "{label}: Training completed. Gained: {} str exp, {} def exp, {} dex exp, {} agi exp, {bonus:.3} max stamina.",
                        fmt_exp(exp.get(Stat::Strength)),
                        fmt_exp(exp.get(Stat::Defense)),
                        fmt_exp(exp.get(Stat::Dexterity)),
                        fmt_exp(exp.get(Stat::Agility)),
                    ),
                );
            }
            GeneralActionName::FieldAnalysis => {
                let hacking = actor.stat(Stat::Hacking);
                let intelligence = actor.stat(Stat::Intelligence);
                let charisma = actor.stat(Stat::Charisma);
                let effectiveness = 0.02f64.mul_add(
                    charisma.powf(0.3),
                    0.04f64.mul_add(hacking.powf(0.3), 0.04 * intelligence.powf(0.9)),
                ) * actor.multiplier(ActorMult::Analysis);
                if effectiveness.is_nan() || effectiveness < 0.0 {
                    return Err(EngineError::InvalidAnalysis {
                        value: effectiveness,
                    });
                }

                let mut exp = StatBlock::ZERO;
                *exp.get_mut(Stat::Hacking) =
                    ANALYSIS_EXP * actor.multiplier(ActorMult::ExpGain(Stat::Hacking));
                *exp.get_mut(Stat::Charisma) =
                    ANALYSIS_EXP * actor.multiplier(ActorMult::ExpGain(Stat::Charisma));
                *exp.get_mut(Stat::Intelligence) = BASE_INT_GAIN;
                outcome.reward = RewardVector::from_exp(exp);

                self.ledger.change_rank(actor, ANALYSIS_RANK)?;
                outcome.rank_change = ANALYSIS_RANK;
                let estimate_mult = self.skill_mults.get(SkillMult::SuccessChanceEstimate);
                self.regions
                    .get_mut(self.city)
                    .improve_population_estimate_by_percentage(effectiveness * estimate_mult)?;
                self.log_if(
                    LogCategory::General,
                    format!(
                        "{label}: Field analysis completed. Gained {ANALYSIS_RANK} rank, {} hacking exp, and {} charisma exp.",
                        fmt_exp(exp.get(Stat::Hacking)),
                        fmt_exp(exp.get(Stat::Charisma)),
                    ),
                );
            }
            GeneralActionName::Recruitment => {
                let seconds = action_time(self.catalog.get(id)?, actor, &self.skill_mults) * 1000.0;
                let success = self.roll(actor, id)?;
                outcome.success = success;
                let mut exp = StatBlock::ZERO;
                if success {
                    *exp.get_mut(Stat::Charisma) = 2.0 * BASE_STAT_GAIN * seconds;
                    self.team.recruit();
                    self.log_if(
                        LogCategory::General,
                        format!(
                            "{label}: Successfully recruited a team member! Gained {} charisma exp.",
                            fmt_exp(exp.get(Stat::Charisma))
                        ),
                    );
                } else {
                    *exp.get_mut(Stat::Charisma) = BASE_STAT_GAIN * seconds;
                    self.log_if(
                        LogCategory::General,
                        format!(
                            "{label}: Failed to recruit a team member. Gained {} charisma exp.",
                            fmt_exp(exp.get(Stat::Charisma))
                        ),
                    );
                }
                outcome.reward = RewardVector::from_exp(exp);
            }
            GeneralActionName::Diplomacy => {
                let charisma = actor.stat(Stat::Charisma);
                let reduction = charisma.powf(0.045) + charisma / 1000.0;
                let region = self.regions.get_mut(self.city);
                region.change_chaos_by_percentage(-reduction)?;
                let chaos = region.chaos();
                self.log_if(
                    LogCategory::General,
                    format!("{label}: Diplomacy completed. Chaos levels in the current city fell by {reduction:.2}%. Chaos is now {chaos:.3}."),
                );
            }
            GeneralActionName::HyperbolicRegen => {
                actor.regenerate_hp(HRC_HP_GAIN);
                let restored = self.stamina.restore_percent(HRC_STAMINA_GAIN);
                self.log_if(
                    LogCategory::General,
                    format!("{label}: Rested in Hyperbolic Regeneration Chamber. Restored {HRC_HP_GAIN} HP and gained {restored:.3} stamina."),
                );
            }
            GeneralActionName::InciteViolence => {
                self.catalog.grow_counts(INCITE_GROWTH_SECONDS, &mut self.rng);
                for region in self.regions.iter_mut() {
                    region.change_chaos_by_count(INCITE_CHAOS)?;
                    let chaos = region.chaos();
                    region.change_chaos_by_count(chaos / chaos.log10())?;
                }
                self.log_if(
                    LogCategory::General,
                    format!("{label}: Incited violence in the synthoid communities."),
                );
            }
        }
        Ok(outcome)
    }
}

/// Experience amounts as shown in console lines.
fn fmt_exp(value: f64) -> String {
    format!("{value:.1}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use fieldops_actions::BasicActor;
    use fieldops_types::BlackOpName;
    use fieldops_world::Region;

    use super::*;
    use crate::config::EngineConfig;

    fn engine(actor: &BasicActor) -> Engine {
        Engine::new(&EngineConfig::default(), actor).unwrap()
    }

    fn strong_actor() -> BasicActor {
        BasicActor::new("Agent").with_levels(StatBlock::uniform(1e9))
    }

    #[test]
    fn contract_attempt_consumes_one_count() {
        let mut actor = BasicActor::new("Agent");
        let mut engine = engine(&actor);
        let id = ActionId::Contract(ContractName::Tracking);
        let before = engine.catalog().get(id).unwrap().countable().unwrap().count;
        let outcome = engine.complete_action(&mut actor, id).unwrap();
        let counter = engine.catalog().get(id).unwrap().countable().unwrap().clone();
        assert!((counter.count - (before - 1.0)).abs() < 1e-9);
        assert_eq!(counter.successes + counter.failures, 1);
        assert_eq!(outcome.success, counter.successes == 1);
    }

    #[test]
    fn contract_success_pays_money() {
        let mut actor = strong_actor();
        let mut engine = engine(&actor);
        let id = ActionId::Contract(ContractName::Retirement);
        let outcome = engine.complete_action(&mut actor, id).unwrap();
        assert!(outcome.success);
        assert!(outcome.reward.money > 0.0);
        assert!(outcome.rank_change > 0.0);
        assert!(engine.ledger().rank > 0.0);
    }

    #[test]
    fn operation_success_pays_no_money() {
        let mut actor = strong_actor();
        let mut engine = engine(&actor);
        let id = ActionId::Operation(OperationName::Investigation);
        let outcome = engine.complete_action(&mut actor, id).unwrap();
        assert!(outcome.success);
        assert!(outcome.reward.money.abs() < f64::EPSILON);
    }

    #[test]
    fn failure_costs_rank_and_health() {
        let mut actor = BasicActor::new("Agent");
        let mut engine = engine(&actor);
        engine.change_rank(&mut actor, 100.0).unwrap();
        engine.stamina.current = 0.0;
        let id = ActionId::Operation(OperationName::Assassination);
        let outcome = engine.complete_action(&mut actor, id).unwrap();
        assert!(!outcome.success);
        assert!(outcome.rank_change < 0.0);
        assert!(outcome.damage >= 1.0);
        assert!(engine.ledger().rank < 100.0);
    }

    #[test]
    fn zero_stamina_never_succeeds() {
        let mut actor = strong_actor();
        let mut engine = engine(&actor);
        let id = ActionId::Contract(ContractName::Tracking);
        for _ in 0..20 {
            engine.stamina.current = 0.0;
            assert!(!engine.complete_action(&mut actor, id).unwrap().success);
        }
    }

    #[test]
    fn black_op_always_leaves_engine_idle() {
        let mut actor = strong_actor();
        let mut engine = engine(&actor);
        let id = ActionId::BlackOp(BlackOpName::Typhoon);
        engine.change_rank(&mut actor, 1e6).unwrap();
        engine.start_action(&mut actor, Some(id)).unwrap();
        assert_eq!(engine.current_action(), Some(id));
        let outcome = engine.complete_action(&mut actor, id).unwrap();
        assert_eq!(engine.current_action(), None);
        assert_eq!(engine.black_ops_completed(), u32::from(outcome.success));
    }

    #[test]
    fn training_raises_stamina_bonus() {
        let mut actor = BasicActor::new("Agent");
        let mut engine = engine(&actor);
        let id = ActionId::General(GeneralActionName::Training);
        let outcome = engine.complete_action(&mut actor, id).unwrap();
        assert!((engine.stamina().bonus - 0.04).abs() < 1e-12);
        assert!((outcome.reward.exp.get(Stat::Strength) - 30.0).abs() < 1e-12);
        assert!(outcome.reward.exp.get(Stat::Hacking).abs() < f64::EPSILON);
    }

    #[test]
    fn field_analysis_grants_rank_and_sharpens_estimate() {
        let mut actor = BasicActor::new("Agent");
        let mut engine = engine(&actor);
        let region = engine.region().clone();
        let gap = (region.population() - region.population_estimate()).abs();
        let id = ActionId::General(GeneralActionName::FieldAnalysis);
        engine.complete_action(&mut actor, id).unwrap();
        assert!((engine.ledger().rank - 0.1).abs() < 1e-12);
        let after = engine.region();
        assert!((after.population() - after.population_estimate()).abs() <= gap);
    }

    #[test]
    fn field_analysis_rejects_negative_effectiveness() {
        let mut actor = BasicActor::new("Agent").with_multiplier(ActorMult::Analysis, -1.0);
        let mut engine = engine(&actor);
        let id = ActionId::General(GeneralActionName::FieldAnalysis);
        let err = engine.complete_action(&mut actor, id).unwrap_err();
        assert!(matches!(err, EngineError::InvalidAnalysis { .. }));
    }

    #[test]
    fn diplomacy_lowers_chaos() {
        let mut actor = BasicActor::new("Agent");
        let mut engine = engine(&actor);
        engine
            .regions
            .get_mut(engine.city)
            .change_chaos_by_count(50.0)
            .unwrap();
        let before = engine.region().chaos();
        let id = ActionId::General(GeneralActionName::Diplomacy);
        engine.complete_action(&mut actor, id).unwrap();
        assert!(engine.region().chaos() < before);
        assert!(engine.region().chaos() >= 0.0);
    }

    #[test]
    fn incite_violence_raises_chaos_everywhere() {
        let mut actor = BasicActor::new("Agent");
        let mut engine = engine(&actor);
        let before: Vec<f64> = engine.regions().iter().map(|r| r.chaos()).collect();
        let id = ActionId::General(GeneralActionName::InciteViolence);
        engine.complete_action(&mut actor, id).unwrap();
        for (region, old) in engine.regions().iter().zip(before) {
            assert!(region.chaos() >= old + 10.0);
        }
    }

    #[test]
    fn regeneration_chamber_restores_stamina() {
        let mut actor = BasicActor::new("Agent");
        actor.hp = 1.0;
        let mut engine = engine(&actor);
        engine.stamina.current = 0.0;
        let id = ActionId::General(GeneralActionName::HyperbolicRegen);
        engine.complete_action(&mut actor, id).unwrap();
        assert!(engine.stamina().current > 0.0);
        assert!((actor.hp - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn auto_level_follows_max_level() {
        let mut actor = strong_actor();
        let mut engine = engine(&actor);
        let id = ActionId::Contract(ContractName::Retirement);
        engine.set_auto_level(id, true).unwrap();
        for _ in 0..3 {
            engine.complete_action(&mut actor, id).unwrap();
        }
        let counter = engine.catalog().get(id).unwrap().countable().unwrap();
        assert_eq!(counter.max_level, 2);
        assert_eq!(counter.level, 2);
    }

    #[test]
    fn results_are_logged_when_enabled() {
        let mut actor = strong_actor();
        let mut engine = engine(&actor);
        let id = ActionId::Contract(ContractName::Retirement);
        engine.complete_action(&mut actor, id).unwrap();
        let last = engine.console().last().unwrap();
        assert!(last.contains("Agent: Retirement contract successfully completed!"));

        engine.set_logging(LogCategory::Contracts, false);
        let lines = engine.console().len();
        engine.complete_action(&mut actor, id).unwrap();
        assert_eq!(engine.console().len(), lines);
    }

    const POPULATION: f64 = 1e9;
    const ESTIMATE: f64 = 8e8;
    const CHAOS: f64 = 100.0;
    const COMMUNITIES: u32 = 50;

    /// Engine whose current city has round numbers to diff against.
    fn seeded_engine() -> Engine {
        let mut engine = engine(&BasicActor::new("Agent"));
        let region =
            Region::from_parts(engine.city, POPULATION, ESTIMATE, CHAOS, COMMUNITIES).unwrap();
        engine.regions.replace(region);
        engine
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    fn is_whole(value: f64) -> bool {
        (value - value.round()).abs() < 1e-9
    }

    #[test]
    fn sting_success_removes_a_thousandth_of_the_population() {
        let mut engine = seeded_engine();
        engine.complete_operation(OperationName::Sting, true, 0).unwrap();
        let region = engine.region();
        assert!(close(region.population(), POPULATION - 1e6));
        assert!(close(region.population_estimate(), ESTIMATE - 1e6));
        assert!(close(region.chaos(), CHAOS + 0.1));
        assert_eq!(region.communities(), COMMUNITIES);
    }

    #[test]
    fn sting_failure_only_raises_chaos() {
        let mut engine = seeded_engine();
        engine.complete_operation(OperationName::Sting, false, 0).unwrap();
        let region = engine.region();
        assert!(close(region.population(), POPULATION));
        assert!(close(region.population_estimate(), ESTIMATE));
        assert!(close(region.chaos(), CHAOS + 0.1));
    }

    #[test]
    fn raid_success_clears_a_community() {
        let mut engine = seeded_engine();
        engine.complete_operation(OperationName::Raid, true, 0).unwrap();
        let region = engine.region();
        assert!(close(region.population(), POPULATION - 1e7));
        assert!(close(region.population_estimate(), ESTIMATE - 1e7));
        assert_eq!(region.communities(), COMMUNITIES.saturating_sub(1));
        assert!((100.5..=105.5).contains(&region.chaos()));
        assert!(is_whole(region.chaos()));
    }

    #[test]
    fn raid_failure_hits_population_behind_the_estimate() {
        let mut engine = seeded_engine();
        engine.complete_operation(OperationName::Raid, false, 0).unwrap();
        let region = engine.region();
        let lost = POPULATION - region.population();
        assert!((5e6..=1e7).contains(&lost));
        assert!(is_whole(lost / 1e6));
        assert!(close(region.population_estimate(), ESTIMATE));
        assert_eq!(region.communities(), COMMUNITIES);
        assert!((100.5..=105.5).contains(&region.chaos()));
        assert!(is_whole(region.chaos()));
    }

    #[test]
    fn stealth_retirement_success_removes_half_a_percent() {
        let mut engine = seeded_engine();
        engine
            .complete_operation(OperationName::StealthRetirement, true, 0)
            .unwrap();
        let region = engine.region();
        assert!(close(region.population(), POPULATION - 5e6));
        assert!(close(region.population_estimate(), ESTIMATE - 5e6));
        assert!((96.5..=99.5).contains(&region.chaos()));
        assert!(is_whole(region.chaos()));
    }

    #[test]
    fn stealth_retirement_failure_still_calms_the_city() {
        let mut engine = seeded_engine();
        engine
            .complete_operation(OperationName::StealthRetirement, false, 0)
            .unwrap();
        let region = engine.region();
        assert!(close(region.population(), POPULATION));
        assert!(close(region.population_estimate(), ESTIMATE));
        assert!((96.5..=99.5).contains(&region.chaos()));
    }

    #[test]
    fn assassination_success_removes_one_target() {
        let mut engine = seeded_engine();
        engine
            .complete_operation(OperationName::Assassination, true, 0)
            .unwrap();
        let region = engine.region();
        assert!(close(region.population(), POPULATION - 1.0));
        assert!(close(region.population_estimate(), ESTIMATE - 1.0));
        assert!((94.5..=105.5).contains(&region.chaos()));
        assert!(is_whole(region.chaos()));
    }

    #[test]
    fn assassination_failure_leaves_population_alone() {
        let mut engine = seeded_engine();
        engine
            .complete_operation(OperationName::Assassination, false, 0)
            .unwrap();
        let region = engine.region();
        assert!(close(region.population(), POPULATION));
        assert!(close(region.population_estimate(), ESTIMATE));
        assert!((94.5..=105.5).contains(&region.chaos()));
    }

    #[test]
    fn intelligence_success_sharpens_the_estimate() {
        for (name, pct) in [
            (OperationName::Investigation, 0.4),
            (OperationName::Undercover, 0.8),
        ] {
            let mut engine = seeded_engine();
            engine.complete_operation(name, true, 0).unwrap();
            let region = engine.region();
            let expected = (ESTIMATE + 1.0) * (1.0 + pct / 100.0);
            assert!((region.population_estimate() - expected).abs() < 1e-3);
            assert!(close(region.population(), POPULATION));
            assert!(close(region.chaos(), CHAOS));
        }
    }

    #[test]
    fn intelligence_failure_never_touches_the_estimate() {
        for name in [OperationName::Investigation, OperationName::Undercover] {
            for _ in 0..20 {
                let mut engine = seeded_engine();
                engine.complete_operation(name, false, 0).unwrap();
                let region = engine.region();
                assert!(close(region.population_estimate(), ESTIMATE));
                assert!(region.population() <= POPULATION);
                assert!(close(region.chaos(), CHAOS));
            }
        }
    }

    #[test]
    fn tracking_success_finds_between_100_and_1000() {
        let mut engine = seeded_engine();
        engine
            .complete_contract(ContractName::Tracking, true)
            .unwrap();
        let region = engine.region();
        let found = region.population_estimate() - ESTIMATE;
        assert!((100.0..=1000.0).contains(&found));
        assert!(is_whole(found));
        assert!(close(region.population(), POPULATION));
        assert!(close(region.chaos(), CHAOS));
    }

    #[test]
    fn retiring_contracts_remove_one_and_add_chaos() {
        for (name, chaos) in [
            (ContractName::BountyHunter, 0.02),
            (ContractName::Retirement, 0.04),
        ] {
            let mut engine = seeded_engine();
            engine.complete_contract(name, true).unwrap();
            let region = engine.region();
            assert!(close(region.population(), POPULATION - 1.0));
            assert!(close(region.population_estimate(), ESTIMATE - 1.0));
            assert!(close(region.chaos(), CHAOS + chaos));
        }
    }

    #[test]
    fn contract_failure_leaves_region_untouched() {
        for name in [
            ContractName::Tracking,
            ContractName::BountyHunter,
            ContractName::Retirement,
        ] {
            let mut engine = seeded_engine();
            let before = engine.region().clone();
            engine.complete_contract(name, false).unwrap();
            assert_eq!(engine.region(), &before);
        }
    }
}
