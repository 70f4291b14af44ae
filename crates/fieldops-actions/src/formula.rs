//! Success chance, action time and reward formulas.
//!
//! Everything here is a pure function of an [`Action`], the actor, the
//! engine's skill multipliers and the current region. The one random draw
//! that decides an attempt's outcome lives in [`attempt`].
//!
//! The difficulty multiplier `d^0.28 + d/650` is shared by experience
//! rewards, stamina cost and failure damage; [`difficulty_multiplier`] is
//! the only place it is computed.

use fieldops_types::constants::{
    BASE_INT_GAIN, BASE_RECRUITMENT_TIME_NEEDED, BASE_STAT_GAIN, DIFF_MULT_EXPONENTIAL_FACTOR,
    DIFF_MULT_LINEAR_FACTOR, DIFFICULTY_TO_TIME_FACTOR, EFF_AGI_EXPONENTIAL_FACTOR,
    EFF_AGI_LINEAR_FACTOR, EFF_DEX_EXPONENTIAL_FACTOR, EFF_DEX_LINEAR_FACTOR, POPULATION_EXPONENT,
    POPULATION_THRESHOLD,
};
use fieldops_types::{ActionId, GeneralActionName, RewardVector, SkillMult, Stat, StatBlock};
use fieldops_world::Region;
use rand::Rng;

use crate::action::{Action, ActionPayload};
use crate::actor::{Actor, ActorMult};
use crate::error::ActionError;
use crate::skills::SkillMultipliers;

/// `difficulty^0.28 + difficulty/650`.
pub fn difficulty_multiplier(difficulty: f64) -> f64 {
    difficulty.powf(DIFF_MULT_EXPONENTIAL_FACTOR) + difficulty / DIFF_MULT_LINEAR_FACTOR
}

/// A stat after engine skill multipliers.
///
/// Hacking and intelligence have no skill multiplier and pass through.
pub fn effective_stat(actor: &dyn Actor, skills: &SkillMultipliers, stat: Stat) -> f64 {
    let mult = match stat {
        Stat::Strength => skills.get(SkillMult::EffStr),
        Stat::Defense => skills.get(SkillMult::EffDef),
        Stat::Dexterity => skills.get(SkillMult::EffDex),
        Stat::Agility => skills.get(SkillMult::EffAgi),
        Stat::Charisma => skills.get(SkillMult::EffCha),
        Stat::Hacking | Stat::Intelligence => 1.0,
    };
    actor.stat(stat) * mult
}

/// `1 + weight × intelligence^0.8 / 600`.
pub fn intelligence_bonus(intelligence: f64, weight: f64) -> f64 {
    weight.mul_add(intelligence.powf(0.8) / 600.0, 1.0)
}

// ---------------------------------------------------------------------------
// Success chance
// ---------------------------------------------------------------------------

/// Everything a success-chance evaluation reads besides the action.
#[derive(Clone, Copy)]
pub struct SuccessContext<'a> {
    /// The actor attempting the action.
    pub actor: &'a dyn Actor,
    /// Current skill multipliers.
    pub skills: &'a SkillMultipliers,
    /// Current stamina.
    pub stamina: f64,
    /// Current max stamina.
    pub max_stamina: f64,
    /// Team members available.
    pub team_size: u32,
    /// The region the action runs in.
    pub region: &'a Region,
}

impl SuccessContext<'_> {
    /// `min(1, stamina / (0.5 × max_stamina))`.
    pub fn stamina_penalty(&self) -> f64 {
        (self.stamina / (0.5 * self.max_stamina)).min(1.0)
    }
}

/// Probability in `[0, 1]` that one attempt of `action` succeeds.
///
/// With `use_estimate` the population factor reads the operator's
/// estimate rather than the true population. Resolution always passes
/// `false`.
///
/// # Errors
///
/// Returns [`ActionError::NonFiniteChance`] if the computation produces NaN.
pub fn success_chance(
    action: &Action,
    ctx: &SuccessContext<'_>,
    use_estimate: bool,
) -> Result<f64, ActionError> {
    let chance = match &action.payload {
        ActionPayload::General => general_success_chance(action.id, ctx),
        ActionPayload::Contract(_) | ActionPayload::Operation(_) | ActionPayload::BlackOp(_) => {
            let competence = competence(action, ctx, use_estimate);
            let difficulty = action.difficulty_with_chaos(ctx.region.chaos());
            competence / difficulty
        }
    };
    if chance.is_nan() {
        return Err(ActionError::NonFiniteChance { action: action.id });
    }
    Ok(chance.clamp(0.0, 1.0))
}

fn general_success_chance(id: ActionId, ctx: &SuccessContext<'_>) -> f64 {
    match id {
        ActionId::General(GeneralActionName::Recruitment) => {
            ctx.actor.stat(Stat::Charisma).powf(0.45) / (f64::from(ctx.team_size) + 1.0)
        }
        _ => 1.0,
    }
}

fn competence(action: &Action, ctx: &SuccessContext<'_>, use_estimate: bool) -> f64 {
    let weights = &action.base.weights;
    let decays = &action.base.decays;
    let mut competence: f64 = weights
        .iter()
        .filter(|&(_, weight)| weight > 0.0)
        .map(|(stat, weight)| {
            weight * effective_stat(ctx.actor, ctx.skills, stat).powf(decays.get(stat))
        })
        .sum();

    competence *= intelligence_bonus(ctx.actor.stat(Stat::Intelligence), 0.75);
    competence *= ctx.stamina_penalty();
    competence *= team_bonus(action.team_count(), ctx.team_size);
    competence *= match &action.payload {
        ActionPayload::Contract(_) => ctx.skills.get(SkillMult::SuccessChanceContract),
        ActionPayload::Operation(_) | ActionPayload::BlackOp(_) => {
            ctx.skills.get(SkillMult::SuccessChanceOperation)
        }
        ActionPayload::General => 1.0,
    };
    if action.base.is_stealth {
        competence *= ctx.skills.get(SkillMult::SuccessChanceStealth);
    }
    if action.base.is_kill {
        competence *= ctx.skills.get(SkillMult::SuccessChanceKill);
    }
    competence *= ctx.actor.multiplier(ActorMult::SuccessChance);
    competence *= ctx.skills.get(SkillMult::SuccessChanceAll);
    competence * population_factor(action, ctx.region, use_estimate)
}

/// `min(team_count, team_size)^0.05`, or 1 without a team.
fn team_bonus(team_count: u32, team_size: u32) -> f64 {
    if team_count == 0 {
        return 1.0;
    }
    f64::from(team_count.min(team_size)).powf(0.05)
}

/// `(population / 1e9)^0.7` for contracts and operations, 1 otherwise.
fn population_factor(action: &Action, region: &Region, use_estimate: bool) -> f64 {
    match &action.payload {
        ActionPayload::Contract(_) | ActionPayload::Operation(_) => {
            let population = if use_estimate {
                region.population_estimate()
            } else {
                region.population()
            };
            (population / POPULATION_THRESHOLD).powf(POPULATION_EXPONENT)
        }
        ActionPayload::BlackOp(_) | ActionPayload::General => 1.0,
    }
}

/// Roll one attempt. The only randomness deciding an outcome.
///
/// # Errors
///
/// Propagates [`success_chance`] errors.
pub fn attempt(
    action: &Action,
    ctx: &SuccessContext<'_>,
    rng: &mut impl Rng,
) -> Result<bool, ActionError> {
    let chance = success_chance(action, ctx, false)?;
    Ok(rng.random::<f64>() < chance)
}

// ---------------------------------------------------------------------------
// Time and rewards
// ---------------------------------------------------------------------------

/// Seconds one attempt takes. Never less than 1.
pub fn action_time(action: &Action, actor: &dyn Actor, skills: &SkillMultipliers) -> f64 {
    let seconds = match action.id {
        ActionId::General(name) => general_action_time(name, actor, skills),
        ActionId::Contract(_) | ActionId::Operation(_) | ActionId::BlackOp(_) => {
            let base_time = action.difficulty() / DIFFICULTY_TO_TIME_FACTOR;
            let agility = effective_stat(actor, skills, Stat::Agility);
            let dexterity = effective_stat(actor, skills, Stat::Dexterity);
            let stat_fac = 0.5
                * (agility.powf(EFF_AGI_EXPONENTIAL_FACTOR)
                    + dexterity.powf(EFF_DEX_EXPONENTIAL_FACTOR)
                    + agility / EFF_AGI_LINEAR_FACTOR
                    + dexterity / EFF_DEX_LINEAR_FACTOR);
            (base_time * skills.get(SkillMult::ActionTime) / stat_fac).ceil()
        }
    };
    seconds.max(1.0)
}

fn general_action_time(
    name: GeneralActionName,
    actor: &dyn Actor,
    skills: &SkillMultipliers,
) -> f64 {
    match name {
        GeneralActionName::Training | GeneralActionName::FieldAnalysis => 30.0,
        GeneralActionName::Diplomacy
        | GeneralActionName::HyperbolicRegen
        | GeneralActionName::InciteViolence => 60.0,
        GeneralActionName::Recruitment => {
            let charisma = effective_stat(actor, skills, Stat::Charisma);
            let charisma_factor = charisma.powf(0.81) + charisma / 90.0;
            (BASE_RECRUITMENT_TIME_NEEDED - charisma_factor).round().max(10.0)
        }
    }
}

/// Experience earned by one contract, operation or black-op attempt.
///
/// Failure pays half. Money is added by the resolver, not here.
pub fn action_stats(
    action: &Action,
    actor: &dyn Actor,
    skills: &SkillMultipliers,
    success: bool,
) -> RewardVector {
    let time = action_time(action, actor, skills);
    let success_mult = if success { 1.0 } else { 0.5 };
    let difficulty_mult = difficulty_multiplier(action.difficulty());
    let exp_mult = skills.get(SkillMult::ExpGain);
    let unweighted = time * BASE_STAT_GAIN * success_mult * difficulty_mult * exp_mult;
    let unweighted_int = time * BASE_INT_GAIN * success_mult * difficulty_mult * exp_mult;

    let mut exp = StatBlock::ZERO;
    for (stat, weight) in action.base.weights.iter() {
        let gain = if stat == Stat::Intelligence {
            unweighted_int
        } else {
            unweighted
        };
        *exp.get_mut(stat) = gain * weight;
    }
    RewardVector::from_exp(exp)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use fieldops_types::{CityName, ContractName, OperationName, SkillName};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::actor::BasicActor;
    use crate::catalog::ActionCatalog;
    use crate::skills::SkillLevels;

    fn catalog() -> ActionCatalog {
        let mut rng = SmallRng::seed_from_u64(3);
        ActionCatalog::new(&mut rng)
    }

    fn region(population: f64, chaos: f64) -> Region {
        Region::from_parts(CityName::Sector12, population, population, chaos, 100).unwrap()
    }

    #[test]
    fn difficulty_multiplier_at_zero_is_zero() {
        assert!(difficulty_multiplier(0.0).abs() < f64::EPSILON);
        assert!(difficulty_multiplier(650.0) > 1.0);
    }

    #[test]
    fn saturated_actor_guarantees_top_operation() {
        let catalog = catalog();
        let action = catalog.get(OperationName::Assassination.into()).unwrap();
        let actor = BasicActor::new("max").with_levels(StatBlock::uniform(1e6));
        let skills = SkillMultipliers::default();
        let region = region(1e9, 0.0);
        let ctx = SuccessContext {
            actor: &actor,
            skills: &skills,
            stamina: 100.0,
            max_stamina: 100.0,
            team_size: 0,
            region: &region,
        };
        assert!((success_chance(action, &ctx, false).unwrap() - 1.0).abs() < f64::EPSILON);
        let mut rng = SmallRng::seed_from_u64(0);
        for _ in 0..100 {
            assert!(attempt(action, &ctx, &mut rng).unwrap());
        }
    }

    #[test]
    fn zero_stamina_guarantees_failure() {
        let catalog = catalog();
        let action = catalog.get(ContractName::Tracking.into()).unwrap();
        let actor = BasicActor::new("tired").with_levels(StatBlock::uniform(1e6));
        let skills = SkillMultipliers::default();
        let region = region(1e9, 0.0);
        let ctx = SuccessContext {
            actor: &actor,
            skills: &skills,
            stamina: 0.0,
            max_stamina: 100.0,
            team_size: 0,
            region: &region,
        };
        assert!(success_chance(action, &ctx, false).unwrap().abs() < f64::EPSILON);
    }

    #[test]
    fn chance_stays_in_unit_interval() {
        let catalog = catalog();
        let actor = BasicActor::new("mid").with_levels(StatBlock::uniform(300.0));
        let skills = SkillMultipliers::default();
        for chaos in [0.0, 60.0, 1e4] {
            let region = region(2e9, chaos);
            let ctx = SuccessContext {
                actor: &actor,
                skills: &skills,
                stamina: 30.0,
                max_stamina: 100.0,
                team_size: 5,
                region: &region,
            };
            for action in catalog.iter() {
                let chance = success_chance(action, &ctx, true).unwrap();
                assert!((0.0..=1.0).contains(&chance), "{} -> {chance}", action.id);
            }
        }
    }

    #[test]
    fn estimate_flag_changes_population_input() {
        let catalog = catalog();
        let action = catalog.get(ContractName::Retirement.into()).unwrap();
        let actor = BasicActor::new("a").with_levels(StatBlock::uniform(50.0));
        let skills = SkillMultipliers::default();
        let region = Region::from_parts(CityName::Aevum, 1e9, 1e8, 0.0, 10).unwrap();
        let ctx = SuccessContext {
            actor: &actor,
            skills: &skills,
            stamina: 10.0,
            max_stamina: 10.0,
            team_size: 0,
            region: &region,
        };
        let truth = success_chance(action, &ctx, false).unwrap();
        let believed = success_chance(action, &ctx, true).unwrap();
        assert!(believed < truth);
    }

    #[test]
    fn recruitment_uses_raw_charisma_and_team() {
        let catalog = catalog();
        let action = catalog
            .get(ActionId::General(GeneralActionName::Recruitment))
            .unwrap();
        let actor = BasicActor::new("a").with_levels(StatBlock::uniform(16.0));
        let skills = SkillMultipliers::default();
        let region = region(1e9, 0.0);
        let ctx = SuccessContext {
            actor: &actor,
            skills: &skills,
            stamina: 10.0,
            max_stamina: 10.0,
            team_size: 3,
            region: &region,
        };
        let expected = 16.0f64.powf(0.45) / 4.0;
        assert!((success_chance(action, &ctx, false).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn action_time_has_floor_of_one() {
        let catalog = catalog();
        let actor = BasicActor::new("fast").with_levels(StatBlock::uniform(1e300));
        let mut levels = SkillLevels::new();
        levels.set(SkillName::Overclock, 90);
        let skills = SkillMultipliers::from_levels(&levels);
        for action in catalog.iter() {
            let time = action_time(action, &actor, &skills);
            assert!(time >= 1.0, "{}", action.id);
            assert!((time - time.round()).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn general_times_are_fixed() {
        let catalog = catalog();
        let actor = BasicActor::new("a");
        let skills = SkillMultipliers::default();
        let training = catalog
            .get(ActionId::General(GeneralActionName::Training))
            .unwrap();
        assert!((action_time(training, &actor, &skills) - 30.0).abs() < f64::EPSILON);
        let recruitment = catalog
            .get(ActionId::General(GeneralActionName::Recruitment))
            .unwrap();
        // cha 1: 300 - (1 + 1/90) rounds to 299.
        assert!((action_time(recruitment, &actor, &skills) - 299.0).abs() < f64::EPSILON);
    }

    #[test]
    fn failure_pays_half_experience() {
        let catalog = catalog();
        let action = catalog.get(ContractName::BountyHunter.into()).unwrap();
        let actor = BasicActor::new("a").with_levels(StatBlock::uniform(100.0));
        let skills = SkillMultipliers::default();
        let win = action_stats(action, &actor, &skills, true);
        let loss = action_stats(action, &actor, &skills, false);
        assert!(win.exp.strength > 0.0);
        assert!(win.exp.hacking.abs() < f64::EPSILON);
        assert!((loss.exp.strength * 2.0 - win.exp.strength).abs() < 1e-9);
        assert!(win.money.abs() < f64::EPSILON);
    }
}
