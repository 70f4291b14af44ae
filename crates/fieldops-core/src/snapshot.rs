//! Save and restore.
//!
//! An [`EngineSnapshot`] holds all engine state except derived values
//! (skill multipliers) and the RNG. Contract and operation counters are
//! saved by display name and merged into a freshly built catalog on
//! restore, so catalog entries added or removed between versions are
//! tolerated.

use std::collections::BTreeMap;

use fieldops_actions::{Actor, SavedCounter, SkillLevels, SkillMultipliers, TeamRoster};
use fieldops_types::{ActionId, CityName};
use fieldops_world::RegionSet;
use serde::{Deserialize, Serialize};

use crate::automation::Automation;
use crate::config::EngineConfig;
use crate::console::{ConsoleLog, LogToggles};
use crate::engine::Engine;
use crate::error::EngineError;
use crate::progression::RankLedger;
use crate::stamina::StaminaPool;

/// Serializable engine state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    /// Region actions run in.
    pub city: CityName,
    /// Every region.
    pub regions: RegionSet,
    /// Contract and operation counters by display name.
    #[serde(default)]
    pub counters: BTreeMap<String, SavedCounter>,
    /// Running action.
    pub current: Option<ActionId>,
    /// Seconds accumulated toward the running action.
    pub elapsed: f64,
    /// Seconds the running action needs.
    pub required: f64,
    /// Seconds carried into the next attempt.
    #[serde(default)]
    pub overflow: f64,
    /// Buffered host cycles.
    #[serde(default)]
    pub stored_cycles: u64,
    /// Stamina.
    pub stamina: StaminaPool,
    /// Rank and skill points.
    pub ledger: RankLedger,
    /// Owned skill levels.
    #[serde(default)]
    pub skills: SkillLevels,
    /// Team roster.
    #[serde(default)]
    pub team: TeamRoster,
    /// Hospitalizations caused by failed actions.
    #[serde(default)]
    pub hospitalizations: u32,
    /// Money lost to hospital bills.
    #[serde(default)]
    pub money_lost: f64,
    /// Black operations completed.
    #[serde(default)]
    pub black_ops_completed: u32,
    /// Seconds until the next random event.
    pub event_countdown: f64,
    /// Automation settings.
    #[serde(default)]
    pub automation: Automation,
    /// Console logging toggles.
    #[serde(default)]
    pub logging: LogToggles,
    /// Console transcript and history.
    pub console: ConsoleLog,
}

impl Engine {
    /// Capture the current state.
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            city: self.city,
            regions: self.regions.clone(),
            counters: self.catalog.saved_counters(),
            current: self.current,
            elapsed: self.elapsed,
            required: self.required,
            overflow: self.overflow,
            stored_cycles: self.cycles.stored(),
            stamina: self.stamina,
            ledger: self.ledger,
            skills: self.skills.clone(),
            team: self.team,
            hospitalizations: self.hospitalizations,
            money_lost: self.money_lost,
            black_ops_completed: self.black_ops_completed,
            event_countdown: self.event_countdown,
            automation: self.automation,
            logging: self.logging,
            console: self.console.clone(),
        }
    }

    /// Rebuild an engine from a snapshot.
    ///
    /// The catalog and RNG are built fresh from `config`, then the saved
    /// counters are merged in. Skill multipliers are recomputed. A stamina
    /// pool with non-finite values or a zero max is reset and recomputed.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] if the configuration is invalid.
    pub fn restore(
        snapshot: EngineSnapshot,
        config: &EngineConfig,
        actor: &dyn Actor,
    ) -> Result<Self, EngineError> {
        let mut engine = Self::new(config, actor)?;
        let merged = engine.catalog.merge_saved(&snapshot.counters);

        engine.city = snapshot.city;
        engine.regions = snapshot.regions;
        engine.current = snapshot.current;
        engine.elapsed = snapshot.elapsed;
        engine.required = snapshot.required;
        engine.overflow = snapshot.overflow;
        engine.cycles.store(snapshot.stored_cycles);
        engine.stamina = snapshot.stamina;
        engine.ledger = snapshot.ledger;
        engine.skills = snapshot.skills;
        engine.skill_mults = SkillMultipliers::from_levels(&engine.skills);
        engine.team = snapshot.team;
        engine.hospitalizations = snapshot.hospitalizations;
        engine.money_lost = snapshot.money_lost;
        engine.black_ops_completed = snapshot.black_ops_completed;
        engine.event_countdown = snapshot.event_countdown;
        engine.automation = snapshot.automation;
        engine.logging = snapshot.logging;
        engine.console = snapshot.console;
        engine.console.reconfigure(&config.console);

        if !engine.stamina.is_valid() {
            tracing::warn!(
                current = engine.stamina.current,
                max = engine.stamina.max,
                "Saved stamina was invalid, resetting"
            );
            let inputs = engine.stamina_inputs(actor);
            engine.stamina.recover(&inputs);
        }

        tracing::info!(
            merged,
            rank = engine.ledger.rank,
            action = engine.current.map(ActionId::name),
            "Engine restored"
        );
        Ok(engine)
    }

    /// Encode the current state as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Snapshot`] if encoding fails.
    pub fn to_json(&self) -> Result<String, EngineError> {
        Ok(serde_json::to_string(&self.snapshot())?)
    }

    /// Decode JSON produced by [`Engine::to_json`] and restore it.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Snapshot`] for malformed JSON, otherwise as
    /// [`Engine::restore`].
    pub fn from_json(json: &str, config: &EngineConfig, actor: &dyn Actor) -> Result<Self, EngineError> {
        let snapshot: EngineSnapshot = serde_json::from_str(json)?;
        Self::restore(snapshot, config, actor)
    }
}
