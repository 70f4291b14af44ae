//! Engine state and the operations a host calls between ticks.
//!
//! [`Engine`] owns everything about the simulation except the actor: the
//! regions, the action catalog, the running action, stamina, rank and
//! skills, automation and the console. The actor is borrowed per call.
//!
//! Time only moves in [`Engine::process`] (see `tick.rs`); action
//! resolution lives in `resolve.rs`. This module holds construction, the
//! start/stop state machine and the direct setters.

use fieldops_actions::{
    ActionCatalog, ActionError, Actor, ActorMult, AvailabilityContext, SkillLevels,
    SkillMultipliers, SuccessContext, TeamRoster, Unavailable, action_time, can_upgrade,
    effective_stat, success_chance,
};
use fieldops_types::{ActionId, CityName, LogCategory, SkillMult, SkillName, Stat};
use fieldops_world::{Region, RegionSet, random_int_f64};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::oneshot;

use crate::automation::Automation;
use crate::clock::CycleBuffer;
use crate::config::{EngineConfig, EventsConfig};
use crate::console::{ConsoleLog, LogToggles};
use crate::error::EngineError;
use crate::progression::RankLedger;
use crate::stamina::{StaminaInputs, StaminaPool};

/// Result of [`Engine::start_action`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartAttempt {
    /// The action is now running.
    Started(String),
    /// A stop request; the engine is idle.
    Stopped(String),
    /// The action is unavailable. Nothing changed.
    Rejected(String),
}

impl StartAttempt {
    /// The console line describing the attempt.
    pub fn message(&self) -> &str {
        match self {
            Self::Started(message) | Self::Stopped(message) | Self::Rejected(message) => message,
        }
    }

    /// Whether the request was honoured.
    pub const fn is_success(&self) -> bool {
        !matches!(self, Self::Rejected(_))
    }
}

/// Result of [`Engine::upgrade_skill`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpgradeAttempt {
    /// Points were spent and the level raised.
    Upgraded(String),
    /// The upgrade was refused. Nothing changed.
    Rejected(String),
}

impl UpgradeAttempt {
    /// The console line describing the attempt.
    pub fn message(&self) -> &str {
        match self {
            Self::Upgraded(message) | Self::Rejected(message) => message,
        }
    }

    /// Whether the upgrade went through.
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Upgraded(_))
    }
}

/// The simulation engine.
#[derive(Debug)]
pub struct Engine {
    pub(crate) city: CityName,
    pub(crate) regions: RegionSet,
    pub(crate) catalog: ActionCatalog,
    pub(crate) current: Option<ActionId>,
    pub(crate) elapsed: f64,
    pub(crate) required: f64,
    pub(crate) overflow: f64,
    pub(crate) cycles: CycleBuffer,
    pub(crate) stamina: StaminaPool,
    pub(crate) ledger: RankLedger,
    pub(crate) skills: SkillLevels,
    pub(crate) skill_mults: SkillMultipliers,
    pub(crate) team: TeamRoster,
    pub(crate) hospitalizations: u32,
    pub(crate) money_lost: f64,
    pub(crate) black_ops_completed: u32,
    pub(crate) event_countdown: f64,
    pub(crate) events: EventsConfig,
    pub(crate) automation: Automation,
    pub(crate) logging: LogToggles,
    pub(crate) console: ConsoleLog,
    pub(crate) rng: StdRng,
    pub(crate) waiters: Vec<oneshot::Sender<f64>>,
}

impl Engine {
    /// Build a fresh engine.
    ///
    /// Regions, catalog counts and the first event countdown are drawn
    /// from an RNG seeded with `world.seed`. Stamina starts full.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] if the configuration is invalid.
    pub fn new(config: &EngineConfig, actor: &dyn Actor) -> Result<Self, EngineError> {
        config.validate()?;
        let city = config.world.starting_city()?;
        let mut rng = StdRng::seed_from_u64(config.world.seed);
        let regions = RegionSet::new(&mut rng);
        let catalog = ActionCatalog::new(&mut rng);
        let event_countdown = random_int_f64(
            &mut rng,
            i64::from(config.events.min_seconds),
            i64::from(config.events.max_seconds),
        );

        let mut engine = Self {
            city,
            regions,
            catalog,
            current: None,
            elapsed: 0.0,
            required: 0.0,
            overflow: 0.0,
            cycles: CycleBuffer::new(&config.clock),
            stamina: StaminaPool::default(),
            ledger: RankLedger::default(),
            skills: SkillLevels::new(),
            skill_mults: SkillMultipliers::default(),
            team: TeamRoster::default(),
            hospitalizations: 0,
            money_lost: 0.0,
            black_ops_completed: 0,
            event_countdown,
            events: config.events.clone(),
            automation: Automation::default(),
            logging: LogToggles::from(&config.logging),
            console: ConsoleLog::new(&config.console),
            rng,
            waiters: Vec::new(),
        };
        engine.recalculate_max_stamina(actor);
        engine.stamina.current = engine.stamina.max;

        tracing::info!(
            seed = config.world.seed,
            city = %city,
            max_stamina = engine.stamina.max,
            "Engine created"
        );
        Ok(engine)
    }

    // -----------------------------------------------------------------------
    // Action state machine
    // -----------------------------------------------------------------------

    /// Start an action, or stop with `None`.
    ///
    /// Unless the actor has the bypass flag, its other work is cancelled
    /// first. An unavailable action is rejected without touching the
    /// running action or its progress.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Action`] if `id` is missing from the catalog.
    pub fn start_action(
        &mut self,
        actor: &mut dyn Actor,
        id: Option<ActionId>,
    ) -> Result<StartAttempt, EngineError> {
        let Some(id) = id else {
            self.reset_action();
            return Ok(StartAttempt::Stopped("Stopped current action".to_owned()));
        };

        if !actor.has_bypass_flag() {
            actor.cancel_other_work();
        }

        let ctx = self.availability_context();
        let action = self.catalog.get(id)?;
        if let Err(reason) = action.availability(&ctx) {
            tracing::debug!(action = %id.name(), %reason, "Action rejected");
            return Ok(StartAttempt::Rejected(format!(
                "Could not start action {}: {reason}",
                id.name()
            )));
        }

        let required = action_time(action, actor, &self.skill_mults);
        self.current = Some(id);
        self.elapsed = 0.0;
        self.required = required;
        tracing::debug!(action = %id.name(), required, "Action started");
        Ok(StartAttempt::Started(format!("Started action {}", id.name())))
    }

    /// Go idle, discarding progress.
    pub const fn reset_action(&mut self) {
        self.current = None;
        self.elapsed = 0.0;
        self.required = 0.0;
    }

    /// Whether `id` could be started right now.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::UnknownAction`] if `id` is missing from the
    /// catalog.
    pub fn availability(&self, id: ActionId) -> Result<Result<(), Unavailable>, ActionError> {
        Ok(self.catalog.get(id)?.availability(&self.availability_context()))
    }

    pub(crate) fn availability_context(&self) -> AvailabilityContext {
        AvailabilityContext {
            rank: self.ledger.rank,
            team_size: self.team.size,
            black_ops_completed: self.black_ops_completed,
            communities: self.region().communities(),
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Success chance of `id` in the current region, clamped to `[0, 1]`.
    ///
    /// With `use_estimate` the population term reads the estimate instead
    /// of the true population.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Action`] for an unknown id or a NaN chance.
    pub fn success_chance(
        &self,
        actor: &dyn Actor,
        id: ActionId,
        use_estimate: bool,
    ) -> Result<f64, EngineError> {
        let ctx = SuccessContext {
            actor,
            skills: &self.skill_mults,
            stamina: self.stamina.current,
            max_stamina: self.stamina.max,
            team_size: self.team.size,
            region: self.region(),
        };
        Ok(success_chance(self.catalog.get(id)?, &ctx, use_estimate)?)
    }

    /// Seconds one attempt of `id` takes. Never less than 1.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Action`] for an unknown id.
    pub fn action_time(&self, actor: &dyn Actor, id: ActionId) -> Result<f64, EngineError> {
        Ok(action_time(self.catalog.get(id)?, actor, &self.skill_mults))
    }

    /// The running action.
    pub const fn current_action(&self) -> Option<ActionId> {
        self.current
    }

    /// Seconds accumulated toward the running action.
    pub const fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Seconds the running action needs.
    pub const fn required_time(&self) -> f64 {
        self.required
    }

    /// The region actions run in.
    pub const fn city(&self) -> CityName {
        self.city
    }

    /// The region actions run in.
    pub const fn region(&self) -> &Region {
        self.regions.get(self.city)
    }

    /// Every region.
    pub const fn regions(&self) -> &RegionSet {
        &self.regions
    }

    /// The action catalog.
    pub const fn catalog(&self) -> &ActionCatalog {
        &self.catalog
    }

    /// Stamina.
    pub const fn stamina(&self) -> &StaminaPool {
        &self.stamina
    }

    /// Rank and skill points.
    pub const fn ledger(&self) -> &RankLedger {
        &self.ledger
    }

    /// Owned skill levels.
    pub const fn skill_levels(&self) -> &SkillLevels {
        &self.skills
    }

    /// Multipliers derived from the skill levels.
    pub const fn skill_multipliers(&self) -> &SkillMultipliers {
        &self.skill_mults
    }

    /// The team roster.
    pub const fn team(&self) -> &TeamRoster {
        &self.team
    }

    /// Black operations completed so far.
    pub const fn black_ops_completed(&self) -> u32 {
        self.black_ops_completed
    }

    /// Hospitalizations caused by failed actions.
    pub const fn hospitalizations(&self) -> u32 {
        self.hospitalizations
    }

    /// Money lost to hospital bills.
    pub const fn money_lost(&self) -> f64 {
        self.money_lost
    }

    /// Seconds until the next random world event.
    pub const fn event_countdown(&self) -> f64 {
        self.event_countdown
    }

    /// Automation settings.
    pub const fn automation(&self) -> &Automation {
        &self.automation
    }

    /// Console logging toggles.
    pub const fn log_toggles(&self) -> &LogToggles {
        &self.logging
    }

    /// The console transcript.
    pub const fn console(&self) -> &ConsoleLog {
        &self.console
    }

    /// Cycles buffered but not yet processed.
    pub const fn stored_cycles(&self) -> u64 {
        self.cycles.stored()
    }

    // -----------------------------------------------------------------------
    // Direct setters
    // -----------------------------------------------------------------------

    /// Every region, mutably. Used by hosts that seed or edit the world.
    pub const fn regions_mut(&mut self) -> &mut RegionSet {
        &mut self.regions
    }

    /// Stamina, mutably.
    pub const fn stamina_mut(&mut self) -> &mut StaminaPool {
        &mut self.stamina
    }

    /// Move operations to another region.
    pub fn set_city(&mut self, city: CityName) {
        tracing::debug!(from = %self.city, to = %city, "City changed");
        self.city = city;
    }

    /// Apply a rank delta through the ledger.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NonFiniteRank`] for a NaN or infinite delta.
    pub fn change_rank(&mut self, actor: &mut dyn Actor, delta: f64) -> Result<f64, EngineError> {
        self.ledger.change_rank(actor, delta)
    }

    /// Buy `count` levels of a skill with skill points.
    pub fn upgrade_skill(&mut self, name: SkillName, count: u32) -> UpgradeAttempt {
        let current = self.skills.level(name);
        match can_upgrade(name, current, count, self.ledger.skill_points) {
            Err(reason) => UpgradeAttempt::Rejected(format!("Cannot upgrade {name}: {reason}")),
            Ok(cost) => {
                self.ledger.spend(cost);
                self.set_skill_level(name, current.saturating_add(count));
                tracing::info!(skill = %name, count, cost, "Skill upgraded");
                let plural = if count > 1 { "s" } else { "" };
                UpgradeAttempt::Upgraded(format!("Upgraded skill {name} by {count} level{plural}"))
            }
        }
    }

    /// Set a skill level directly and rebuild the multipliers.
    pub fn set_skill_level(&mut self, name: SkillName, level: u32) {
        self.skills.set(name, level);
        self.skill_mults = SkillMultipliers::from_levels(&self.skills);
    }

    /// Set how many team members an operation or black op takes.
    ///
    /// Returns `false` for actions that do not take a team.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Action`] for an unknown id.
    pub fn set_team_count(&mut self, id: ActionId, count: u32) -> Result<bool, EngineError> {
        Ok(self.catalog.get_mut(id)?.set_team_count(count))
    }

    /// Set the level of a contract or operation.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::NotCountable`] for other kinds and
    /// [`ActionError::LevelOutOfRange`] outside `1..=max_level`.
    pub fn set_action_level(&mut self, id: ActionId, level: u32) -> Result<(), EngineError> {
        let counter = self.catalog.get_mut(id)?.require_countable_mut()?;
        if !counter.set_level(level) {
            return Err(ActionError::LevelOutOfRange {
                action: id,
                level,
                max_level: counter.max_level,
            }
            .into());
        }
        Ok(())
    }

    /// Turn auto-levelling on or off for a contract or operation.
    ///
    /// Turning it on jumps straight to the max level.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::NotCountable`] for other kinds.
    pub fn set_auto_level(&mut self, id: ActionId, enabled: bool) -> Result<(), EngineError> {
        let counter = self.catalog.get_mut(id)?.require_countable_mut()?;
        counter.auto_level = enabled;
        if enabled {
            counter.apply_auto_level();
        }
        Ok(())
    }

    /// Turn one console logging category on or off.
    pub const fn set_logging(&mut self, category: LogCategory, enabled: bool) {
        self.logging.set(category, enabled);
    }

    /// Register interest in the next processed tick.
    ///
    /// The receiver resolves with the simulated milliseconds that tick
    /// covered. It is dropped unresolved if the engine is dropped first.
    pub fn next_update(&mut self) -> oneshot::Receiver<f64> {
        let (tx, rx) = oneshot::channel();
        self.waiters.push(tx);
        rx
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    pub(crate) fn stamina_inputs(&self, actor: &dyn Actor) -> StaminaInputs {
        StaminaInputs {
            effective_agility: effective_stat(actor, &self.skill_mults, Stat::Agility),
            skill_mult: self.skill_mults.get(SkillMult::Stamina),
            actor_max_mult: actor.multiplier(ActorMult::MaxStamina),
            actor_gain_mult: actor.multiplier(ActorMult::StaminaGain),
        }
    }

    pub(crate) fn recalculate_max_stamina(&mut self, actor: &dyn Actor) {
        let inputs = self.stamina_inputs(actor);
        self.stamina.recalculate_max(&inputs);
    }

    /// Write a timestamped console line if `category` is enabled.
    pub(crate) fn log_if(&mut self, category: LogCategory, line: impl AsRef<str>) {
        if self.logging.enabled(category) {
            self.console.log(line);
        }
    }
}
