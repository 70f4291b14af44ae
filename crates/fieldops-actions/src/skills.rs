//! Skill catalog, upgrade costs, and derived multipliers.
//!
//! Skills are bought with skill points. Each level of a skill scales one or
//! more [`SkillMult`]s by a fixed percentage:
//!
//! ```text
//! mult = product over skills of (1 + pct * level / 100), clamped >= 0
//! ```
//!
//! [`SkillMultipliers`] is always rebuilt from scratch from the current
//! [`SkillLevels`]; it is never patched incrementally.
//!
//! # Upgrade Cost
//!
//! Buying `count` levels starting from level `L` costs
//! `round(count * (base + inc * (L + (count - 1) / 2)))` points, the sum of
//! an arithmetic series with one term per level.

use std::collections::BTreeMap;

use fieldops_types::{SkillMult, SkillName};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Static definition of one skill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkillDef {
    /// Which skill.
    pub name: SkillName,
    /// Cost of the first level.
    pub base_cost: f64,
    /// Cost added per level already owned.
    pub cost_inc: f64,
    /// Level cap, if any.
    pub max_level: Option<u32>,
    /// `(multiplier, percent per level)` pairs.
    pub mults: &'static [(SkillMult, f64)],
    /// One-line description for the console.
    pub desc: &'static str,
}

/// Return the definition of a skill.
pub const fn skill_def(name: SkillName) -> SkillDef {
    match name {
        SkillName::BladesIntuition => SkillDef {
            name,
            base_cost: 3.0,
            cost_inc: 2.1,
            max_level: None,
            mults: &[(SkillMult::SuccessChanceAll, 3.0)],
            desc: "Each level of this skill increases your success chance for all actions by 3%",
        },
        SkillName::Cloak => SkillDef {
            name,
            base_cost: 2.0,
            cost_inc: 1.1,
            max_level: Some(25),
            mults: &[(SkillMult::SuccessChanceStealth, 5.5)],
            desc: "Each level of this skill increases your success chance in stealth-related actions by 5.5%",
        },
        SkillName::ShortCircuit => SkillDef {
            name,
            base_cost: 2.0,
            cost_inc: 2.1,
            max_level: Some(25),
            mults: &[(SkillMult::SuccessChanceKill, 5.5)],
            desc: "Each level of this skill increases your success chance in retirement-related actions by 5.5%",
        },
        SkillName::DigitalObserver => SkillDef {
            name,
            base_cost: 2.0,
            cost_inc: 2.1,
            max_level: None,
            mults: &[(SkillMult::SuccessChanceOperation, 4.0)],
            desc: "Each level of this skill increases your success chance in all Operations by 4%",
        },
        SkillName::Tracer => SkillDef {
            name,
            base_cost: 2.0,
            cost_inc: 2.1,
            max_level: Some(10),
            mults: &[(SkillMult::SuccessChanceContract, 4.0)],
            desc: "Each level of this skill increases your success chance in all Contracts by 4%",
        },
        SkillName::Overclock => SkillDef {
            name,
            base_cost: 3.0,
            cost_inc: 1.4,
            max_level: Some(90),
            mults: &[(SkillMult::ActionTime, -1.0)],
            desc: "Each level of this skill decreases the time it takes to attempt a Contract, Operation, and BlackOp by 1% (Max Level: 90)",
        },
        SkillName::Reaper => SkillDef {
            name,
            base_cost: 2.0,
            cost_inc: 2.1,
            max_level: None,
            mults: &[
                (SkillMult::EffStr, 2.0),
                (SkillMult::EffDef, 2.0),
                (SkillMult::EffDex, 2.0),
                (SkillMult::EffAgi, 2.0),
            ],
            desc: "Each level of this skill increases your effective combat stats for field actions by 2%",
        },
        SkillName::EvasiveSystem => SkillDef {
            name,
            base_cost: 2.0,
            cost_inc: 2.1,
            max_level: None,
            mults: &[(SkillMult::EffDex, 4.0), (SkillMult::EffAgi, 4.0)],
            desc: "Each level of this skill increases your effective dexterity and agility for field actions by 4%",
        },
        SkillName::Datamancer => SkillDef {
            name,
            base_cost: 3.0,
            cost_inc: 1.0,
            max_level: None,
            mults: &[(SkillMult::SuccessChanceEstimate, 5.0)],
            desc: "Each level of this skill increases your effectiveness in synthoid population analysis and investigation by 5%",
        },
        SkillName::CybersEdge => SkillDef {
            name,
            base_cost: 1.0,
            cost_inc: 3.0,
            max_level: None,
            mults: &[(SkillMult::Stamina, 2.0)],
            desc: "Each level of this skill increases your max stamina by 2%",
        },
        SkillName::HandsOfMidas => SkillDef {
            name,
            base_cost: 2.0,
            cost_inc: 2.5,
            max_level: None,
            mults: &[(SkillMult::Money, 10.0)],
            desc: "Each level of this skill increases the amount of money you receive from Contracts by 10%",
        },
        SkillName::Hyperdrive => SkillDef {
            name,
            base_cost: 1.0,
            cost_inc: 2.5,
            max_level: None,
            mults: &[(SkillMult::ExpGain, 10.0)],
            desc: "Each level of this skill increases the experience earned from Contracts, Operations, and BlackOps by 10%",
        },
    }
}

/// Cost in skill points of buying `count` levels starting from `current`.
pub fn upgrade_cost(def: &SkillDef, current: u32, count: u32) -> f64 {
    let count = f64::from(count);
    let current = f64::from(current);
    (count * def.cost_inc.mul_add(current + (count - 1.0) / 2.0, def.base_cost)).round()
}

/// Why a skill upgrade was refused.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UpgradeBlocked {
    /// Zero levels requested.
    #[error("no levels requested")]
    ZeroCount,

    /// The upgrade would pass the skill's level cap.
    #[error("upgraded level {target} would exceed max level {max}")]
    ExceedsMaxLevel {
        /// Level after the upgrade.
        target: u32,
        /// The cap.
        max: u32,
    },

    /// Not enough points.
    #[error("insufficient skill points ({cost} needed, {available} available)")]
    InsufficientPoints {
        /// Points the upgrade costs.
        cost: f64,
        /// Points on hand.
        available: f64,
    },
}

/// Check an upgrade and return its cost.
///
/// # Errors
///
/// Returns the [`UpgradeBlocked`] reason when the upgrade is not allowed.
pub fn can_upgrade(
    name: SkillName,
    current: u32,
    count: u32,
    skill_points: f64,
) -> Result<f64, UpgradeBlocked> {
    if count == 0 {
        return Err(UpgradeBlocked::ZeroCount);
    }
    let def = skill_def(name);
    let target = current.saturating_add(count);
    if let Some(max) = def.max_level {
        if target > max {
            return Err(UpgradeBlocked::ExceedsMaxLevel { target, max });
        }
    }
    let cost = upgrade_cost(&def, current, count);
    if cost > skill_points {
        return Err(UpgradeBlocked::InsufficientPoints {
            cost,
            available: skill_points,
        });
    }
    Ok(cost)
}

// ---------------------------------------------------------------------------
// SkillLevels
// ---------------------------------------------------------------------------

/// Sparse map of owned skill levels. Skills at level 0 are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillLevels {
    levels: BTreeMap<SkillName, u32>,
}

impl SkillLevels {
    /// No skills owned.
    pub const fn new() -> Self {
        Self {
            levels: BTreeMap::new(),
        }
    }

    /// Current level of a skill (0 if never bought).
    pub fn level(&self, name: SkillName) -> u32 {
        self.levels.get(&name).copied().unwrap_or(0)
    }

    /// Set a skill level directly. Level 0 removes the entry.
    pub fn set(&mut self, name: SkillName, level: u32) {
        if level == 0 {
            self.levels.remove(&name);
        } else {
            self.levels.insert(name, level);
        }
    }

    /// Iterate owned `(skill, level)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (SkillName, u32)> + '_ {
        self.levels.iter().map(|(&name, &level)| (name, level))
    }
}

// ---------------------------------------------------------------------------
// SkillMultipliers
// ---------------------------------------------------------------------------

/// Sparse derived multipliers. Missing entries read as 1.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillMultipliers {
    mults: BTreeMap<SkillMult, f64>,
}

impl SkillMultipliers {
    /// Rebuild every multiplier from the given levels.
    pub fn from_levels(levels: &SkillLevels) -> Self {
        let mut mults: BTreeMap<SkillMult, f64> = BTreeMap::new();
        for (name, level) in levels.iter().filter(|&(_, level)| level > 0) {
            let level = f64::from(level);
            for &(mult, pct) in skill_def(name).mults {
                let entry = mults.entry(mult).or_insert(1.0);
                *entry = (*entry * pct.mul_add(level / 100.0, 1.0)).max(0.0);
            }
        }
        Self { mults }
    }

    /// Read one multiplier.
    pub fn get(&self, mult: SkillMult) -> f64 {
        self.mults.get(&mult).copied().unwrap_or(1.0)
    }

    /// Iterate the non-default multipliers.
    pub fn iter(&self) -> impl Iterator<Item = (SkillMult, f64)> + '_ {
        self.mults.iter().map(|(&mult, &value)| (mult, value))
    }
}
