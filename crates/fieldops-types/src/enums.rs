//! Enumeration types for the FieldOps engine.
//!
//! Every catalog name in the engine is a closed enum: action names per kind,
//! region (city) names, actor stats, skills and the multipliers skills
//! produce. Names carry a display string used by the console and by the
//! snapshot format, and can be looked up from loosely typed operator input
//! through `from_name`, which ignores case, whitespace, dashes and
//! apostrophes.

use serde::{Deserialize, Serialize};

/// Normalize a display name for loose comparison.
///
/// Lowercases and drops whitespace, `-`, `_` and `'` so that
/// `"bounty hunter"`, `"BountyHunter"` and `"Bounty Hunter"` compare equal.
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '_' | '\''))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Generates a closed name enum with a display string per variant.
macro_rules! define_names {
    (
        $(#[$meta:meta])*
        $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $text:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Human-readable display name.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }

            /// Look up a variant by display name, ignoring case, whitespace,
            /// dashes and apostrophes.
            pub fn from_name(name: &str) -> Option<Self> {
                let wanted = normalize_name(name);
                Self::ALL
                    .iter()
                    .copied()
                    .find(|variant| normalize_name(variant.as_str()) == wanted)
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Action kinds
// ---------------------------------------------------------------------------

/// The four kinds of action the engine can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    /// Repeatable, count-limited jobs that pay money.
    Contract,
    /// Repeatable, count-limited jobs gated by rank; may send a team.
    Operation,
    /// One-shot story operations completed strictly in sequence.
    BlackOp,
    /// Always-available utility actions (training, recruitment, ...).
    General,
}

impl ActionKind {
    /// Every kind, in declaration order.
    pub const ALL: &'static [Self] = &[Self::Contract, Self::Operation, Self::BlackOp, Self::General];

    /// Human-readable display name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Contract => "Contracts",
            Self::Operation => "Operations",
            Self::BlackOp => "Black Operations",
            Self::General => "General",
        }
    }

    /// Whether actions of this kind carry a regenerating attempt count.
    pub const fn is_countable(self) -> bool {
        matches!(self, Self::Contract | Self::Operation)
    }
}

impl core::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Action names
// ---------------------------------------------------------------------------

define_names! {
    /// Names of the contract actions.
    ContractName {
        /// Locate synthoids; improves the population estimate.
        Tracking => "Tracking",
        /// Capture a single target.
        BountyHunter => "Bounty Hunter",
        /// Retire a single target.
        Retirement => "Retirement",
    }
}

define_names! {
    /// Names of the operation actions, ordered by required rank.
    OperationName {
        /// Gather intelligence on the local population.
        Investigation => "Investigation",
        /// Infiltrate a community for intelligence.
        Undercover => "Undercover Operation",
        /// Lure targets out of hiding.
        Sting => "Sting Operation",
        /// Assault a community. Requires at least one community.
        Raid => "Raid",
        /// Quietly retire targets.
        StealthRetirement => "Stealth Retirement Operation",
        /// Eliminate a high-value leader.
        Assassination => "Assassination",
    }
}

define_names! {
    /// Names of the black operations, in the order they must be completed.
    BlackOpName {
        /// Sequence 0.
        Typhoon => "Operation Typhoon",
        /// Sequence 1.
        Zero => "Operation Zero",
        /// Sequence 2.
        X => "Operation X",
        /// Sequence 3.
        Titan => "Operation Titan",
        /// Sequence 4.
        Ares => "Operation Ares",
        /// Sequence 5.
        Archangel => "Operation Archangel",
        /// Sequence 6.
        Juggernaut => "Operation Juggernaut",
        /// Sequence 7.
        RedDragon => "Operation Red Dragon",
        /// Sequence 8.
        K => "Operation K",
        /// Sequence 9.
        Deckard => "Operation Deckard",
        /// Sequence 10.
        Tyrell => "Operation Tyrell",
        /// Sequence 11.
        Wallace => "Operation Wallace",
        /// Sequence 12.
        ShoulderOfOrion => "Operation Shoulder of Orion",
        /// Sequence 13.
        Hyron => "Operation Hyron",
        /// Sequence 14.
        Morpheus => "Operation Morpheus",
        /// Sequence 15.
        IonStorm => "Operation Ion Storm",
        /// Sequence 16.
        Annihilus => "Operation Annihilus",
        /// Sequence 17.
        Ultron => "Operation Ultron",
        /// Sequence 18.
        Centurion => "Operation Centurion",
        /// Sequence 19.
        Vindictus => "Operation Vindictus",
        /// Sequence 20.
        Daedalus => "Operation Daedalus",
    }
}

define_names! {
    /// Names of the general actions.
    GeneralActionName {
        /// Trains combat stats and raises the stamina bonus.
        Training => "Training",
        /// Improves the population estimate and grants a little rank.
        FieldAnalysis => "Field Analysis",
        /// Attempts to hire one team member.
        Recruitment => "Recruitment",
        /// Lowers chaos in the current region.
        Diplomacy => "Diplomacy",
        /// Restores HP and stamina.
        HyperbolicRegen => "Hyperbolic Regeneration Chamber",
        /// Raises every action count at the cost of chaos everywhere.
        InciteViolence => "Incite Violence",
    }
}

// ---------------------------------------------------------------------------
// Regions
// ---------------------------------------------------------------------------

define_names! {
    /// The fixed set of regions in the world.
    CityName {
        /// Aevum.
        Aevum => "Aevum",
        /// Chongqing.
        Chongqing => "Chongqing",
        /// Sector-12, the default starting region.
        Sector12 => "Sector-12",
        /// New Tokyo.
        NewTokyo => "New Tokyo",
        /// Ishima.
        Ishima => "Ishima",
        /// Volhaven.
        Volhaven => "Volhaven",
    }
}

// ---------------------------------------------------------------------------
// Actor stats
// ---------------------------------------------------------------------------

define_names! {
    /// Actor stats that weight action competence and receive experience.
    Stat {
        /// Hacking.
        Hacking => "hacking",
        /// Strength.
        Strength => "strength",
        /// Defense.
        Defense => "defense",
        /// Dexterity.
        Dexterity => "dexterity",
        /// Agility.
        Agility => "agility",
        /// Charisma.
        Charisma => "charisma",
        /// Intelligence.
        Intelligence => "intelligence",
    }
}

// ---------------------------------------------------------------------------
// Skills
// ---------------------------------------------------------------------------

define_names! {
    /// Purchasable skills. Each level scales one or more [`SkillMult`]s.
    SkillName {
        /// Raises every success chance.
        BladesIntuition => "Blade's Intuition",
        /// Raises stealth action success chance.
        Cloak => "Cloak",
        /// Raises kill action success chance.
        ShortCircuit => "Short-Circuit",
        /// Raises operation success chance.
        DigitalObserver => "Digital Observer",
        /// Raises contract success chance.
        Tracer => "Tracer",
        /// Shortens action time.
        Overclock => "Overclock",
        /// Raises effective combat stats.
        Reaper => "Reaper",
        /// Raises effective dexterity and agility.
        EvasiveSystem => "Evasive System",
        /// Improves population estimate gains.
        Datamancer => "Datamancer",
        /// Raises max stamina and stamina regeneration.
        CybersEdge => "Cyber's Edge",
        /// Raises contract money.
        HandsOfMidas => "Hands of Midas",
        /// Raises experience gains.
        Hyperdrive => "Hyperdrive",
    }
}

define_names! {
    /// Multipliers derived from skill levels.
    SkillMult {
        /// Applies to every action's success chance.
        SuccessChanceAll => "success chance (all)",
        /// Applies to stealth actions.
        SuccessChanceStealth => "success chance (stealth)",
        /// Applies to kill actions.
        SuccessChanceKill => "success chance (kill)",
        /// Applies to contracts.
        SuccessChanceContract => "success chance (contracts)",
        /// Applies to operations and black operations.
        SuccessChanceOperation => "success chance (operations)",
        /// Scales population estimate improvements.
        SuccessChanceEstimate => "population estimate",
        /// Scales action time (below 1 is faster).
        ActionTime => "action time",
        /// Effective strength.
        EffStr => "effective strength",
        /// Effective defense.
        EffDef => "effective defense",
        /// Effective dexterity.
        EffDex => "effective dexterity",
        /// Effective agility.
        EffAgi => "effective agility",
        /// Effective charisma.
        EffCha => "effective charisma",
        /// Max stamina and stamina regeneration.
        Stamina => "stamina",
        /// Contract money.
        Money => "money",
        /// Experience gain.
        ExpGain => "experience gain",
    }
}

// ---------------------------------------------------------------------------
// Console logging categories
// ---------------------------------------------------------------------------

define_names! {
    /// Independent console logging toggles.
    LogCategory {
        /// General actions.
        General => "general",
        /// Contracts.
        Contracts => "contracts",
        /// Operations.
        Operations => "operations",
        /// Black operations.
        BlackOps => "blackops",
        /// Random world events.
        Events => "events",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_ignores_case_space_and_punctuation() {
        assert_eq!(normalize_name("Bounty Hunter"), "bountyhunter");
        assert_eq!(normalize_name("  sector-12 "), "sector12");
        assert_eq!(normalize_name("Blade's Intuition"), "bladesintuition");
    }

    #[test]
    fn from_name_is_loose() {
        assert_eq!(ContractName::from_name("bountyhunter"), Some(ContractName::BountyHunter));
        assert_eq!(CityName::from_name("Sector 12"), Some(CityName::Sector12));
        assert_eq!(SkillName::from_name("cybers edge"), Some(SkillName::CybersEdge));
        assert_eq!(OperationName::from_name("nope"), None);
    }

    #[test]
    fn black_ops_count() {
        assert_eq!(BlackOpName::ALL.len(), 21);
        assert_eq!(BlackOpName::ALL.first(), Some(&BlackOpName::Typhoon));
        assert_eq!(BlackOpName::ALL.last(), Some(&BlackOpName::Daedalus));
    }

    #[test]
    fn display_uses_display_name() {
        assert_eq!(OperationName::Sting.to_string(), "Sting Operation");
        assert_eq!(ActionKind::BlackOp.to_string(), "Black Operations");
    }

    #[test]
    fn countable_kinds() {
        assert!(ActionKind::Contract.is_countable());
        assert!(ActionKind::Operation.is_countable());
        assert!(!ActionKind::BlackOp.is_countable());
        assert!(!ActionKind::General.is_countable());
    }
}
