//! The per-engine action catalog.
//!
//! Every engine owns its own [`ActionCatalog`]; nothing here is a static.
//! The catalog is built fresh from the content tables below and then,
//! when loading a save, reconciled with the saved counters through
//! [`ActionCatalog::merge_saved`].
//!
//! | Kind | Entries | Counter | Gate |
//! |---|---|---|---|
//! | Contract | 3 | yes | count |
//! | Operation | 6 | yes | count, rank, team (Raid: communities) |
//! | Black operation | 21 | no | sequence, rank, team |
//! | General | 6 | no | none |

use std::collections::BTreeMap;

use fieldops_types::{
    ActionId, ActionKind, BlackOpName, ContractName, GeneralActionName, OperationName, StatBlock,
};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::action::{Action, ActionBase, ActionPayload, BlackOpState, Countable, OperationState};
use crate::error::ActionError;

// ---------------------------------------------------------------------------
// Content helpers
// ---------------------------------------------------------------------------

/// Decays shared by contracts and general actions.
const DEFAULT_DECAYS: StatBlock = StatBlock::new(0.85, 0.91, 0.91, 0.91, 0.91, 0.9, 1.0);

/// Weights shared by every black operation.
const BLACK_OP_WEIGHTS: StatBlock = StatBlock::new(0.1, 0.2, 0.2, 0.2, 0.2, 0.0, 0.1);

/// Decays shared by every black operation.
const BLACK_OP_DECAYS: StatBlock = StatBlock::new(0.7, 0.75, 0.75, 0.75, 0.75, 0.0, 0.75);

/// Stealth and kill flags.
#[derive(Clone, Copy)]
struct Traits {
    stealth: bool,
    kill: bool,
}

const NONE: Traits = Traits {
    stealth: false,
    kill: false,
};
const STEALTH: Traits = Traits {
    stealth: true,
    kill: false,
};
const KILL: Traits = Traits {
    stealth: false,
    kill: true,
};
const STEALTH_KILL: Traits = Traits {
    stealth: true,
    kill: true,
};

/// Helper to build an [`ActionBase`].
const fn base(
    base_difficulty: f64,
    weights: StatBlock,
    decays: StatBlock,
    deltas: (f64, f64, f64),
    traits: Traits,
) -> ActionBase {
    ActionBase {
        base_difficulty,
        weights,
        decays,
        rank_gain: deltas.0,
        rank_loss: deltas.1,
        hp_loss: deltas.2,
        is_stealth: traits.stealth,
        is_kill: traits.kill,
    }
}

fn contract(name: ContractName, rng: &mut impl Rng) -> Action {
    // (difficulty, difficulty_fac, reward_fac, rank_gain, hp_loss, weights, traits, min count)
    let (difficulty, difficulty_fac, reward_fac, rank_gain, hp_loss, weights, traits, count_min) =
        match name {
            ContractName::Tracking => (
                125.0,
                1.02,
                1.041,
                0.3,
                0.5,
                StatBlock::new(0.0, 0.05, 0.05, 0.35, 0.35, 0.1, 0.05),
                STEALTH,
                25,
            ),
            ContractName::BountyHunter => (
                250.0,
                1.04,
                1.085,
                0.9,
                1.0,
                StatBlock::new(0.0, 0.15, 0.15, 0.25, 0.25, 0.1, 0.1),
                KILL,
                5,
            ),
            ContractName::Retirement => (
                200.0,
                1.03,
                1.065,
                0.6,
                1.0,
                StatBlock::new(0.0, 0.2, 0.2, 0.2, 0.2, 0.1, 0.1),
                KILL,
                5,
            ),
        };
    Action {
        id: ActionId::Contract(name),
        base: base(
            difficulty,
            weights,
            DEFAULT_DECAYS,
            (rank_gain, 0.0, hp_loss),
            traits,
        ),
        payload: ActionPayload::Contract(Countable::new(
            rng,
            (count_min, 150),
            (5, 75),
            difficulty_fac,
            reward_fac,
        )),
    }
}

#[allow(clippy::too_many_lines)]
fn operation(name: OperationName, rng: &mut impl Rng) -> Action {
    struct Row {
        difficulty: f64,
        difficulty_fac: f64,
        reward_fac: f64,
        required_rank: f64,
        deltas: (f64, f64, f64),
        weights: StatBlock,
        decays: StatBlock,
        traits: Traits,
        count_max: i64,
        growth: (i64, i64),
    }

    let row = match name {
        OperationName::Investigation => Row {
            difficulty: 400.0,
            difficulty_fac: 1.03,
            reward_fac: 1.07,
            required_rank: 25.0,
            deltas: (2.2, 0.2, 0.0),
            weights: StatBlock::new(0.25, 0.05, 0.05, 0.2, 0.1, 0.25, 0.1),
            decays: StatBlock::new(0.85, 0.9, 0.9, 0.9, 0.9, 0.7, 1.0),
            traits: STEALTH,
            count_max: 100,
            growth: (10, 40),
        },
        OperationName::Undercover => Row {
            difficulty: 500.0,
            difficulty_fac: 1.04,
            reward_fac: 1.09,
            required_rank: 100.0,
            deltas: (4.4, 0.4, 2.0),
            weights: StatBlock::new(0.2, 0.05, 0.05, 0.2, 0.2, 0.2, 0.1),
            decays: StatBlock::new(0.8, 0.9, 0.9, 0.9, 0.9, 0.7, 1.0),
            traits: STEALTH,
            count_max: 100,
            growth: (10, 40),
        },
        OperationName::Sting => Row {
            difficulty: 650.0,
            difficulty_fac: 1.04,
            reward_fac: 1.095,
            required_rank: 500.0,
            deltas: (5.5, 0.5, 2.5),
            weights: StatBlock::new(0.25, 0.05, 0.05, 0.25, 0.1, 0.2, 0.1),
            decays: StatBlock::new(0.8, 0.85, 0.85, 0.85, 0.85, 0.7, 1.0),
            traits: STEALTH,
            count_max: 150,
            growth: (3, 40),
        },
        OperationName::Raid => Row {
            difficulty: 800.0,
            difficulty_fac: 1.045,
            reward_fac: 1.1,
            required_rank: 3000.0,
            deltas: (55.0, 2.5, 50.0),
            weights: StatBlock::new(0.1, 0.2, 0.2, 0.2, 0.2, 0.0, 0.1),
            decays: StatBlock::new(0.7, 0.8, 0.8, 0.8, 0.8, 0.0, 0.9),
            traits: KILL,
            count_max: 150,
            growth: (2, 40),
        },
        OperationName::StealthRetirement => Row {
            difficulty: 1000.0,
            difficulty_fac: 1.05,
            reward_fac: 1.11,
            required_rank: 20_000.0,
            deltas: (22.0, 2.0, 10.0),
            weights: StatBlock::new(0.1, 0.1, 0.1, 0.3, 0.3, 0.0, 0.1),
            decays: StatBlock::new(0.7, 0.8, 0.8, 0.8, 0.8, 0.0, 0.9),
            traits: STEALTH_KILL,
            count_max: 150,
            growth: (1, 20),
        },
        OperationName::Assassination => Row {
            difficulty: 1500.0,
            difficulty_fac: 1.06,
            reward_fac: 1.14,
            required_rank: 50_000.0,
            deltas: (44.0, 4.0, 5.0),
            weights: StatBlock::new(0.1, 0.1, 0.1, 0.3, 0.3, 0.0, 0.1),
            decays: StatBlock::new(0.6, 0.8, 0.8, 0.8, 0.8, 0.0, 0.8),
            traits: STEALTH_KILL,
            count_max: 150,
            growth: (1, 20),
        },
    };

    Action {
        id: ActionId::Operation(name),
        base: base(row.difficulty, row.weights, row.decays, row.deltas, row.traits),
        payload: ActionPayload::Operation(OperationState {
            counter: Countable::new(
                rng,
                (1, row.count_max),
                row.growth,
                row.difficulty_fac,
                row.reward_fac,
            ),
            required_rank: row.required_rank,
            team_count: 0,
        }),
    }
}

fn black_op(name: BlackOpName, sequence: u32) -> Action {
    // (difficulty, required rank, rank gain, rank loss, hp loss, traits)
    let (difficulty, required_rank, rank_gain, rank_loss, hp_loss, traits) = match name {
        BlackOpName::Typhoon => (2000.0, 2.5e3, 50.0, 10.0, 100.0, KILL),
        BlackOpName::Zero => (2500.0, 5e3, 60.0, 15.0, 50.0, STEALTH_KILL),
        BlackOpName::X => (3000.0, 7.5e3, 75.0, 15.0, 100.0, KILL),
        BlackOpName::Titan => (4000.0, 10e3, 100.0, 20.0, 100.0, KILL),
        BlackOpName::Ares => (5000.0, 12.5e3, 125.0, 20.0, 200.0, KILL),
        BlackOpName::Archangel => (7500.0, 15e3, 200.0, 20.0, 25.0, KILL),
        BlackOpName::Juggernaut => (10e3, 20e3, 300.0, 40.0, 300.0, KILL),
        BlackOpName::RedDragon => (12.5e3, 25e3, 500.0, 50.0, 500.0, KILL),
        BlackOpName::K => (15e3, 30e3, 750.0, 60.0, 1000.0, KILL),
        BlackOpName::Deckard => (20e3, 40e3, 1e3, 75.0, 200.0, KILL),
        BlackOpName::Tyrell => (25e3, 50e3, 1.5e3, 100.0, 100.0, KILL),
        BlackOpName::Wallace => (30e3, 75e3, 2e3, 150.0, 100.0, KILL),
        BlackOpName::ShoulderOfOrion => (35e3, 100e3, 2.5e3, 500.0, 100.0, STEALTH),
        BlackOpName::Hyron => (40e3, 125e3, 3e3, 1e3, 100.0, NONE),
        BlackOpName::Morpheus => (45e3, 150e3, 4e3, 1e3, 100.0, STEALTH),
        BlackOpName::IonStorm => (50e3, 175e3, 5e3, 500.0, 100.0, KILL),
        BlackOpName::Annihilus => (55e3, 200e3, 7.5e3, 1e3, 100.0, KILL),
        BlackOpName::Ultron => (60e3, 250e3, 10e3, 2e3, 100.0, KILL),
        BlackOpName::Centurion => (70e3, 300e3, 20e3, 5e3, 100.0, NONE),
        BlackOpName::Vindictus => (75e3, 350e3, 20e3, 5e3, 100.0, NONE),
        BlackOpName::Daedalus => (80e3, 400e3, 40e3, 10e3, 100.0, NONE),
    };
    Action {
        id: ActionId::BlackOp(name),
        base: base(
            difficulty,
            BLACK_OP_WEIGHTS,
            BLACK_OP_DECAYS,
            (rank_gain, rank_loss, hp_loss),
            traits,
        ),
        payload: ActionPayload::BlackOp(BlackOpState {
            required_rank,
            sequence,
            team_count: 0,
        }),
    }
}

const fn general(name: GeneralActionName) -> Action {
    Action {
        id: ActionId::General(name),
        base: base(0.0, StatBlock::ZERO, DEFAULT_DECAYS, (0.0, 0.0, 0.0), NONE),
        payload: ActionPayload::General,
    }
}

// ---------------------------------------------------------------------------
// Saved counters
// ---------------------------------------------------------------------------

/// Persisted state of one countable catalog entry.
///
/// Missing fields read as a fresh level-1 counter with no history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SavedCounter {
    /// Attempts available.
    pub count: f64,
    /// Lifetime successes.
    pub successes: u32,
    /// Lifetime failures.
    pub failures: u32,
    /// Selected level.
    pub level: u32,
    /// Highest unlocked level.
    pub max_level: u32,
    /// Auto-level flag.
    pub auto_level: bool,
    /// Team members sent (operations only).
    pub team_count: u32,
}

impl Default for SavedCounter {
    fn default() -> Self {
        Self {
            count: 0.0,
            successes: 0,
            failures: 0,
            level: 1,
            max_level: 1,
            auto_level: false,
            team_count: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// ActionCatalog
// ---------------------------------------------------------------------------

/// Every action one engine can run, keyed by identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionCatalog {
    actions: BTreeMap<ActionId, Action>,
}

impl ActionCatalog {
    /// Build a fresh catalog. Initial counts are drawn from `rng`.
    pub fn new(rng: &mut impl Rng) -> Self {
        let mut actions = BTreeMap::new();
        for &name in ContractName::ALL {
            let action = contract(name, rng);
            actions.insert(action.id, action);
        }
        for &name in OperationName::ALL {
            let action = operation(name, rng);
            actions.insert(action.id, action);
        }
        for (sequence, &name) in (0u32..).zip(BlackOpName::ALL) {
            let action = black_op(name, sequence);
            actions.insert(action.id, action);
        }
        for &name in GeneralActionName::ALL {
            let action = general(name);
            actions.insert(action.id, action);
        }
        Self { actions }
    }

    /// Look up an action.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::UnknownAction`] if the catalog has no entry.
    pub fn get(&self, id: ActionId) -> Result<&Action, ActionError> {
        self.actions.get(&id).ok_or(ActionError::UnknownAction(id))
    }

    /// Look up an action for mutation.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::UnknownAction`] if the catalog has no entry.
    pub fn get_mut(&mut self, id: ActionId) -> Result<&mut Action, ActionError> {
        self.actions.get_mut(&id).ok_or(ActionError::UnknownAction(id))
    }

    /// Every action, in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.values()
    }

    /// Every action of one kind, in identifier order.
    pub fn of_kind(&self, kind: ActionKind) -> impl Iterator<Item = &Action> {
        self.actions.values().filter(move |action| action.kind() == kind)
    }

    /// Regenerate every counter by `period_seconds × growth / 480`.
    ///
    /// Each counter draws its own growth amount.
    pub fn grow_counts(&mut self, period_seconds: f64, rng: &mut impl Rng) {
        for counter in self.actions.values_mut().filter_map(Action::countable_mut) {
            counter.grow(period_seconds, rng);
        }
    }

    /// Snapshot every countable entry, keyed by display name.
    pub fn saved_counters(&self) -> BTreeMap<String, SavedCounter> {
        self.actions
            .values()
            .filter_map(|action| {
                let counter = action.countable()?;
                Some((
                    action.name().to_owned(),
                    SavedCounter {
                        count: counter.count,
                        successes: counter.successes,
                        failures: counter.failures,
                        level: counter.level,
                        max_level: counter.max_level,
                        auto_level: counter.auto_level,
                        team_count: action.team_count(),
                    },
                ))
            })
            .collect()
    }

    /// Reconcile saved counters with this catalog.
    ///
    /// Names the catalog does not know are skipped. Entries without a
    /// saved counter keep their fresh values. Returns the number of
    /// entries merged.
    pub fn merge_saved(&mut self, saved: &BTreeMap<String, SavedCounter>) -> usize {
        let mut merged = 0usize;
        for (name, entry) in saved {
            let Some(action) = self
                .actions
                .values_mut()
                .find(|action| action.kind().is_countable() && action.name() == name)
            else {
                tracing::debug!(name = %name, "Skipping saved counter for unknown action");
                continue;
            };
            action.set_team_count(entry.team_count);
            if let Some(counter) = action.countable_mut() {
                if entry.count.is_finite() {
                    counter.count = entry.count.max(0.0);
                }
                counter.successes = entry.successes;
                counter.failures = entry.failures;
                counter.max_level = entry.max_level.max(1);
                counter.level = entry.level.clamp(1, counter.max_level);
                counter.auto_level = entry.auto_level;
                merged = merged.saturating_add(1);
            }
        }
        merged
    }
}
