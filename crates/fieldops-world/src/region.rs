//! A single region and its bounded mutation API.
//!
//! Regions hold the hidden population, the operator's noisy estimate of
//! it, a chaos scalar and a community count. Every mutation goes through a
//! method on [`Region`] so the invariants hold after each call:
//!
//! - `chaos >= 0`
//! - `population_estimate >= 0`
//! - `communities` never underflows
//! - nothing becomes `NaN` or infinite
//!
//! Population itself is allowed to go below zero on decrease; only the
//! estimate is clamped.

use fieldops_types::CityName;
use fieldops_types::constants::{BASE_POP_GROWTH, POP_GROWTH_CEILING};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{WorldError, ensure_finite};
use crate::roll::{add_offset, random_int_inclusive};

/// How the estimate follows a population change by count.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PopulationCountChange {
    /// Amount added to the estimate.
    pub est_change: f64,
    /// Random percentage offset applied to the estimate afterwards.
    pub est_offset: f64,
}

/// Options for a population change by percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PercentageChange {
    /// Move the estimate by the same absolute amount as the population.
    pub change_est_equally: bool,
    /// Force a change of at least one when rounding would give zero.
    pub non_zero: bool,
}

/// Runtime state of one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    name: CityName,
    population: f64,
    population_estimate: f64,
    chaos: f64,
    communities: u32,
}

impl Region {
    /// Create a region with randomized starting population, estimate and
    /// communities and zero chaos.
    pub fn new(name: CityName, rng: &mut impl Rng) -> Self {
        let population = random_int_inclusive(rng, 1_000_000_000, 1_500_000_000) as f64;
        let population_estimate = population * rng.random_range(0.5..1.5);
        let communities = rng.random_range(5..=150);
        Self {
            name,
            population,
            population_estimate,
            chaos: 0.0,
            communities,
        }
    }

    /// Build a region from explicit values.
    ///
    /// Chaos and estimate are clamped to zero from below.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::NonFinite`] if any value is non-finite.
    pub fn from_parts(
        name: CityName,
        population: f64,
        population_estimate: f64,
        chaos: f64,
        communities: u32,
    ) -> Result<Self, WorldError> {
        Ok(Self {
            name,
            population: ensure_finite("from_parts(population)", population)?,
            population_estimate: ensure_finite("from_parts(estimate)", population_estimate)?
                .max(0.0),
            chaos: ensure_finite("from_parts(chaos)", chaos)?.max(0.0),
            communities,
        })
    }

    /// Region name.
    pub const fn name(&self) -> CityName {
        self.name
    }

    /// True population.
    pub const fn population(&self) -> f64 {
        self.population
    }

    /// The operator's belief about the population.
    pub const fn population_estimate(&self) -> f64 {
        self.population_estimate
    }

    /// Current chaos.
    pub const fn chaos(&self) -> f64 {
        self.chaos
    }

    /// Number of communities.
    pub const fn communities(&self) -> u32 {
        self.communities
    }

    // -----------------------------------------------------------------------
    // Chaos
    // -----------------------------------------------------------------------

    /// Add `delta` to chaos.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::NonFinite`] for a non-finite delta.
    pub fn change_chaos_by_count(&mut self, delta: f64) -> Result<(), WorldError> {
        let delta = ensure_finite("change_chaos_by_count", delta)?;
        self.set_chaos(self.chaos + delta)
    }

    /// Scale chaos by `1 + pct / 100`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::NonFinite`] for a non-finite percentage.
    pub fn change_chaos_by_percentage(&mut self, pct: f64) -> Result<(), WorldError> {
        let pct = ensure_finite("change_chaos_by_percentage", pct)?;
        let change = self.chaos * (pct / 100.0);
        self.set_chaos(self.chaos + change)
    }

    /// Passive per-second decay, floored at zero.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::NonFinite`] for a non-finite amount.
    pub fn decay_chaos(&mut self, amount: f64) -> Result<(), WorldError> {
        let amount = ensure_finite("decay_chaos", amount)?;
        self.set_chaos(self.chaos - amount)
    }

    fn set_chaos(&mut self, value: f64) -> Result<(), WorldError> {
        self.chaos = ensure_finite("chaos", value)?.max(0.0);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Population
    // -----------------------------------------------------------------------

    /// Add `delta` to the population. The estimate moves by
    /// `change.est_change`, is then perturbed by up to
    /// `change.est_offset` percent, and is clamped at zero.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::NonFinite`] for non-finite inputs.
    pub fn change_population_by_count(
        &mut self,
        delta: f64,
        change: PopulationCountChange,
        rng: &mut impl Rng,
    ) -> Result<(), WorldError> {
        let delta = ensure_finite("change_population_by_count", delta)?;
        let est_change = ensure_finite("change_population_by_count(est_change)", change.est_change)?;
        let est_offset = ensure_finite("change_population_by_count(est_offset)", change.est_offset)?;

        self.population = ensure_finite("population", self.population + delta)?;
        let mut estimate = self.population_estimate + est_change;
        if est_offset != 0.0 {
            estimate = add_offset(rng, estimate, est_offset);
        }
        self.population_estimate = ensure_finite("population_estimate", estimate)?.max(0.0);
        Ok(())
    }

    /// Change the population by `pct` percent, rounded to a whole count.
    ///
    /// Returns the applied change. A zero percentage is a no-op returning 0.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::NonFinite`] for a non-finite percentage.
    pub fn change_population_by_percentage(
        &mut self,
        pct: f64,
        options: PercentageChange,
    ) -> Result<f64, WorldError> {
        let pct = ensure_finite("change_population_by_percentage", pct)?;
        if pct == 0.0 {
            return Ok(0.0);
        }
        let mut change = (self.population * (pct / 100.0)).round();
        if options.non_zero && change == 0.0 {
            change = if pct > 0.0 { 1.0 } else { -1.0 };
        }
        self.population = ensure_finite("population", self.population + change)?;
        if options.change_est_equally {
            self.population_estimate =
                ensure_finite("population_estimate", self.population_estimate + change)?.max(0.0);
        }
        Ok(change)
    }

    /// Move the true population only. The estimate stays put; world events
    /// happen behind the operator's back.
    pub(crate) fn shift_population(&mut self, count: f64) -> Result<(), WorldError> {
        let count = ensure_finite("shift_population", count)?;
        self.population = ensure_finite("population", self.population + count)?;
        Ok(())
    }

    /// Add the flat growth bonus when the population is below the growth
    /// ceiling.
    pub fn apply_base_growth(&mut self) {
        if self.population < POP_GROWTH_CEILING {
            self.population += BASE_POP_GROWTH;
        }
    }

    /// Move the estimate toward the true population by `n`, snapping to the
    /// true value when within `n` of it.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::NonFinite`] for a non-finite count.
    pub fn improve_population_estimate_by_count(&mut self, n: f64) -> Result<(), WorldError> {
        let n = ensure_finite("improve_population_estimate_by_count", n)?;
        if self.population_estimate < self.population {
            self.population_estimate = (self.population_estimate + n).min(self.population);
        } else if self.population_estimate > self.population {
            self.population_estimate = (self.population_estimate - n).max(self.population);
        }
        self.population_estimate = self.population_estimate.max(0.0);
        Ok(())
    }

    /// Move the estimate toward the true population by `pct` percent of the
    /// estimate, snapping to the true value when it would overshoot.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::NonFinite`] for a non-finite percentage.
    pub fn improve_population_estimate_by_percentage(&mut self, pct: f64) -> Result<(), WorldError> {
        let pct = ensure_finite("improve_population_estimate_by_percentage", pct)?;
        if self.population_estimate < self.population {
            // +1 so a zero estimate can still climb.
            let raised = (self.population_estimate + 1.0) * (1.0 + pct / 100.0);
            self.population_estimate = raised.min(self.population);
        } else if self.population_estimate > self.population {
            let lowered = self.population_estimate * (1.0 - pct / 100.0);
            self.population_estimate = lowered.max(self.population);
        }
        self.population_estimate =
            ensure_finite("population_estimate", self.population_estimate)?.max(0.0);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Communities
    // -----------------------------------------------------------------------

    /// Add one community.
    pub const fn add_community(&mut self) {
        self.communities = self.communities.saturating_add(1);
    }

    /// Remove one community. Returns `false` if there were none.
    pub const fn remove_community(&mut self) -> bool {
        if self.communities == 0 {
            return false;
        }
        self.communities = self.communities.saturating_sub(1);
        true
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn region(pop: f64, est: f64, chaos: f64, comms: u32) -> Region {
        Region::from_parts(CityName::Sector12, pop, est, chaos, comms).unwrap()
    }

    #[test]
    fn new_region_is_in_initial_ranges() {
        let mut rng = SmallRng::seed_from_u64(3);
        for &name in CityName::ALL {
            let r = Region::new(name, &mut rng);
            assert!((1e9..=1.5e9).contains(&r.population()));
            assert!(r.population_estimate() >= r.population() * 0.5);
            assert!(r.population_estimate() < r.population() * 1.5);
            assert!((5..=150).contains(&r.communities()));
            assert!(r.chaos().abs() < f64::EPSILON);
        }
    }

    #[test]
    fn chaos_never_goes_negative() {
        let mut r = region(1e9, 1e9, 10.0, 5);
        r.change_chaos_by_count(-25.0).unwrap();
        assert!(r.chaos().abs() < f64::EPSILON);

        let mut r = region(1e9, 1e9, 10.0, 5);
        for _ in 0..50 {
            r.change_chaos_by_percentage(-150.0).unwrap();
            assert!(r.chaos() >= 0.0);
        }
    }

    #[test]
    fn chaos_percentage_scales() {
        let mut r = region(1e9, 1e9, 10.0, 5);
        r.change_chaos_by_percentage(50.0).unwrap();
        assert!((r.chaos() - 15.0).abs() < 1e-9);
    }

    #[test]
    fn non_finite_inputs_are_rejected() {
        let mut r = region(1e9, 1e9, 10.0, 5);
        assert!(r.change_chaos_by_count(f64::NAN).is_err());
        assert!(r.change_chaos_by_percentage(f64::INFINITY).is_err());
        assert!(
            r.change_population_by_percentage(f64::NAN, PercentageChange::default())
                .is_err()
        );
        assert!(r.improve_population_estimate_by_count(f64::NAN).is_err());
        assert!((r.chaos() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn population_by_count_moves_estimate() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut r = region(1000.0, 900.0, 0.0, 5);
        r.change_population_by_count(
            -1.0,
            PopulationCountChange {
                est_change: -1.0,
                est_offset: 0.0,
            },
            &mut rng,
        )
        .unwrap();
        assert!((r.population() - 999.0).abs() < f64::EPSILON);
        assert!((r.population_estimate() - 899.0).abs() < f64::EPSILON);
    }

    #[test]
    fn estimate_is_clamped_at_zero() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut r = region(1000.0, 0.5, 0.0, 5);
        r.change_population_by_count(
            -1.0,
            PopulationCountChange {
                est_change: -1.0,
                est_offset: 0.0,
            },
            &mut rng,
        )
        .unwrap();
        assert!(r.population_estimate().abs() < f64::EPSILON);
    }

    #[test]
    fn percentage_change_non_zero_forces_one() {
        let mut r = region(100.0, 100.0, 0.0, 5);
        let change = r
            .change_population_by_percentage(
                -0.1,
                PercentageChange {
                    change_est_equally: true,
                    non_zero: true,
                },
            )
            .unwrap();
        assert!((change + 1.0).abs() < f64::EPSILON);
        assert!((r.population() - 99.0).abs() < f64::EPSILON);
        assert!((r.population_estimate() - 99.0).abs() < f64::EPSILON);
    }

    #[test]
    fn percentage_change_without_non_zero_can_be_zero() {
        let mut r = region(100.0, 100.0, 0.0, 5);
        let change = r
            .change_population_by_percentage(-0.1, PercentageChange::default())
            .unwrap();
        assert!(change.abs() < f64::EPSILON);
        assert!((r.population() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn estimate_by_count_snaps_to_truth() {
        let mut r = region(1000.0, 950.0, 0.0, 5);
        r.improve_population_estimate_by_count(100.0).unwrap();
        assert!((r.population_estimate() - 1000.0).abs() < f64::EPSILON);

        let mut r = region(1000.0, 1200.0, 0.0, 5);
        r.improve_population_estimate_by_count(50.0).unwrap();
        assert!((r.population_estimate() - 1150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn estimate_by_percentage_never_overshoots() {
        let mut r = region(1000.0, 990.0, 0.0, 5);
        r.improve_population_estimate_by_percentage(50.0).unwrap();
        assert!((r.population_estimate() - 1000.0).abs() < f64::EPSILON);

        let mut r = region(1000.0, 2000.0, 0.0, 5);
        r.improve_population_estimate_by_percentage(10.0).unwrap();
        assert!((r.population_estimate() - 1800.0).abs() < 1e-9);
    }

    #[test]
    fn communities_do_not_underflow() {
        let mut r = region(1000.0, 1000.0, 0.0, 1);
        assert!(r.remove_community());
        assert!(!r.remove_community());
        assert_eq!(r.communities(), 0);
        r.add_community();
        assert_eq!(r.communities(), 1);
    }

    #[test]
    fn base_growth_only_below_ceiling() {
        let mut small = region(1000.0, 1000.0, 0.0, 1);
        small.apply_base_growth();
        assert!((small.population() - (1000.0 + BASE_POP_GROWTH)).abs() < f64::EPSILON);

        let mut big = region(1e9, 1e9, 0.0, 1);
        big.apply_base_growth();
        assert!((big.population() - 1e9).abs() < f64::EPSILON);
    }
}
