//! Plain data structs shared across the engine crates.

use serde::{Deserialize, Serialize};

use crate::enums::Stat;

/// One `f64` per [`Stat`].
///
/// Used for action stat weights, competence decay exponents, actor stat
/// levels and experience rewards.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StatBlock {
    /// Hacking.
    pub hacking: f64,
    /// Strength.
    pub strength: f64,
    /// Defense.
    pub defense: f64,
    /// Dexterity.
    pub dexterity: f64,
    /// Agility.
    pub agility: f64,
    /// Charisma.
    pub charisma: f64,
    /// Intelligence.
    pub intelligence: f64,
}

impl StatBlock {
    /// All stats zero.
    pub const ZERO: Self = Self::uniform(0.0);

    /// Build a block from values in [`Stat::ALL`] order.
    pub const fn new(
        hacking: f64,
        strength: f64,
        defense: f64,
        dexterity: f64,
        agility: f64,
        charisma: f64,
        intelligence: f64,
    ) -> Self {
        Self {
            hacking,
            strength,
            defense,
            dexterity,
            agility,
            charisma,
            intelligence,
        }
    }

    /// Build a block with every stat set to `value`.
    pub const fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value, value, value, value)
    }

    /// Return the value for one stat.
    pub const fn get(&self, stat: Stat) -> f64 {
        match stat {
            Stat::Hacking => self.hacking,
            Stat::Strength => self.strength,
            Stat::Defense => self.defense,
            Stat::Dexterity => self.dexterity,
            Stat::Agility => self.agility,
            Stat::Charisma => self.charisma,
            Stat::Intelligence => self.intelligence,
        }
    }

    /// Return a mutable reference to one stat.
    pub const fn get_mut(&mut self, stat: Stat) -> &mut f64 {
        match stat {
            Stat::Hacking => &mut self.hacking,
            Stat::Strength => &mut self.strength,
            Stat::Defense => &mut self.defense,
            Stat::Dexterity => &mut self.dexterity,
            Stat::Agility => &mut self.agility,
            Stat::Charisma => &mut self.charisma,
            Stat::Intelligence => &mut self.intelligence,
        }
    }

    /// Iterate `(stat, value)` pairs in [`Stat::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Stat, f64)> + '_ {
        Stat::ALL.iter().map(|&stat| (stat, self.get(stat)))
    }

    /// Add every stat of `other` into `self`.
    pub fn accumulate(&mut self, other: &Self) {
        for &stat in Stat::ALL {
            *self.get_mut(stat) += other.get(stat);
        }
    }

    /// Sum of all stats.
    pub fn total(&self) -> f64 {
        self.iter().map(|(_, value)| value).sum()
    }
}

/// What an action resolution hands back to the actor.
///
/// Experience is split per stat; money is only ever non-zero for contracts.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RewardVector {
    /// Experience per stat.
    pub exp: StatBlock,
    /// Money earned.
    pub money: f64,
}

impl RewardVector {
    /// No experience, no money.
    pub const ZERO: Self = Self {
        exp: StatBlock::ZERO,
        money: 0.0,
    };

    /// A reward of experience only.
    pub const fn from_exp(exp: StatBlock) -> Self {
        Self { exp, money: 0.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_and_get_mut_agree() {
        let mut block = StatBlock::ZERO;
        *block.get_mut(Stat::Agility) = 3.5;
        assert!((block.get(Stat::Agility) - 3.5).abs() < f64::EPSILON);
        assert!(block.get(Stat::Strength).abs() < f64::EPSILON);
    }

    #[test]
    fn accumulate_adds_per_stat() {
        let mut total = StatBlock::uniform(1.0);
        total.accumulate(&StatBlock::new(1.0, 2.0, 0.0, 0.0, 0.0, 0.0, 0.0));
        assert!((total.hacking - 2.0).abs() < f64::EPSILON);
        assert!((total.strength - 3.0).abs() < f64::EPSILON);
        assert!((total.total() - 10.0).abs() < f64::EPSILON);
    }
}
