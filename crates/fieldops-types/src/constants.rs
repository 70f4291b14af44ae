//! Fixed balance constants.
//!
//! These values are game content, not configuration: changing them changes
//! the behaviour of saved games. Anything an operator may reasonably tune
//! lives in the engine config instead.

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Host cycles delivered per simulated second.
pub const CYCLES_PER_SECOND: u64 = 5;

/// Upper bound on simulated seconds processed by a single call.
pub const MAX_SECONDS_PER_PROCESS: u64 = 5;

/// Lower bound of the random event countdown, in seconds.
pub const RANDOM_EVENT_MIN_SECONDS: u32 = 240;

/// Upper bound of the random event countdown, in seconds.
pub const RANDOM_EVENT_MAX_SECONDS: u32 = 600;

// ---------------------------------------------------------------------------
// Stamina
// ---------------------------------------------------------------------------

/// Flat stamina regenerated per second before multipliers.
pub const STAMINA_GAIN_PER_SECOND: f64 = 0.0085;

/// Max stamina divided by this is added to the per-second regeneration.
pub const MAX_STAMINA_TO_GAIN_FACTOR: f64 = 70_000.0;

/// Stamina spent per contract, operation or black op attempt, before
/// the difficulty multiplier.
pub const BASE_STAMINA_LOSS: f64 = 0.285;

/// Exponent applied to effective agility when computing max stamina.
pub const MAX_STAMINA_AGI_EXPONENT: f64 = 0.8;

/// Exponent applied to effective agility when computing stamina regeneration.
pub const STAMINA_REGEN_AGI_EXPONENT: f64 = 0.17;

// ---------------------------------------------------------------------------
// Difficulty and timing
// ---------------------------------------------------------------------------

/// Difficulty divided by this is the raw action time in seconds.
pub const DIFFICULTY_TO_TIME_FACTOR: f64 = 10.0;

/// Exponent of the centralized difficulty multiplier.
pub const DIFF_MULT_EXPONENTIAL_FACTOR: f64 = 0.28;

/// Linear divisor of the centralized difficulty multiplier.
pub const DIFF_MULT_LINEAR_FACTOR: f64 = 650.0;

/// Linear divisor for agility in the action-time stat factor.
pub const EFF_AGI_LINEAR_FACTOR: f64 = 10_000.0;

/// Linear divisor for dexterity in the action-time stat factor.
pub const EFF_DEX_LINEAR_FACTOR: f64 = 10_000.0;

/// Exponent for agility in the action-time stat factor.
pub const EFF_AGI_EXPONENTIAL_FACTOR: f64 = 0.04;

/// Exponent for dexterity in the action-time stat factor.
pub const EFF_DEX_EXPONENTIAL_FACTOR: f64 = 0.035;

/// Base time of a recruitment attempt before the charisma discount.
pub const BASE_RECRUITMENT_TIME_NEEDED: f64 = 300.0;

// ---------------------------------------------------------------------------
// Success chance
// ---------------------------------------------------------------------------

/// Population at which the population factor equals 1.
pub const POPULATION_THRESHOLD: f64 = 1e9;

/// Exponent of the population factor.
pub const POPULATION_EXPONENT: f64 = 0.7;

/// Chaos above this raises effective difficulty.
pub const CHAOS_THRESHOLD: f64 = 50.0;

// ---------------------------------------------------------------------------
// Rewards
// ---------------------------------------------------------------------------

/// Base experience gain per second of action time.
pub const BASE_STAT_GAIN: f64 = 1.0;

/// Base intelligence gain per second of action time.
pub const BASE_INT_GAIN: f64 = 0.003;

/// Money paid by a successful contract at level 1.
pub const CONTRACT_BASE_MONEY_GAIN: f64 = 250_000.0;

/// Period, in seconds, over which an action regains its growth amount.
pub const ACTION_COUNT_GROWTH_PERIOD: f64 = 480.0;

/// Reputation earned per unit of rank.
pub const RANK_TO_FACTION_REP_FACTOR: f64 = 2.0;

/// Successes per contract level.
pub const CONTRACT_SUCCESSES_PER_LEVEL: f64 = 3.0;

/// Successes per operation level.
pub const OPERATION_SUCCESSES_PER_LEVEL: f64 = 2.5;

/// Rank needed per skill point.
pub const RANKS_PER_SKILL_POINT: f64 = 3.0;

/// HP restored by one Hyperbolic Regeneration Chamber session.
pub const HRC_HP_GAIN: f64 = 2.0;

/// Percent of max stamina restored by one Hyperbolic Regeneration Chamber
/// session.
pub const HRC_STAMINA_GAIN: f64 = 1.0;

// ---------------------------------------------------------------------------
// World
// ---------------------------------------------------------------------------

/// Chaos removed from every region per second.
pub const CHAOS_DECAY_PER_SECOND: f64 = 0.0001;

/// Flat population added by growth events when a region is below
/// [`POP_GROWTH_CEILING`].
pub const BASE_POP_GROWTH: f64 = 1e6;

/// Population under which growth events add [`BASE_POP_GROWTH`].
pub const POP_GROWTH_CEILING: f64 = 1e8;

// ---------------------------------------------------------------------------
// Console
// ---------------------------------------------------------------------------

/// Console transcript capacity in lines.
pub const MAX_CONSOLE_LINES: usize = 100;

/// Console command history capacity in entries.
pub const MAX_CONSOLE_HISTORY: usize = 50;
