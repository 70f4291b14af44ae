//! The fixed set of regions owned by one engine.

use fieldops_types::CityName;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::error::WorldError;
use crate::region::Region;

/// One [`Region`] per [`CityName`].
///
/// Every city is always present, so lookups are infallible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSet {
    aevum: Region,
    chongqing: Region,
    sector12: Region,
    new_tokyo: Region,
    ishima: Region,
    volhaven: Region,
}

impl RegionSet {
    /// Create all regions with randomized starting state.
    pub fn new(rng: &mut impl Rng) -> Self {
        Self {
            aevum: Region::new(CityName::Aevum, rng),
            chongqing: Region::new(CityName::Chongqing, rng),
            sector12: Region::new(CityName::Sector12, rng),
            new_tokyo: Region::new(CityName::NewTokyo, rng),
            ishima: Region::new(CityName::Ishima, rng),
            volhaven: Region::new(CityName::Volhaven, rng),
        }
    }

    /// Borrow a region.
    pub const fn get(&self, name: CityName) -> &Region {
        match name {
            CityName::Aevum => &self.aevum,
            CityName::Chongqing => &self.chongqing,
            CityName::Sector12 => &self.sector12,
            CityName::NewTokyo => &self.new_tokyo,
            CityName::Ishima => &self.ishima,
            CityName::Volhaven => &self.volhaven,
        }
    }

    /// Mutably borrow a region.
    pub const fn get_mut(&mut self, name: CityName) -> &mut Region {
        match name {
            CityName::Aevum => &mut self.aevum,
            CityName::Chongqing => &mut self.chongqing,
            CityName::Sector12 => &mut self.sector12,
            CityName::NewTokyo => &mut self.new_tokyo,
            CityName::Ishima => &mut self.ishima,
            CityName::Volhaven => &mut self.volhaven,
        }
    }

    /// Replace a region wholesale. The region's own name picks the slot.
    pub fn replace(&mut self, region: Region) {
        let name = region.name();
        *self.get_mut(name) = region;
    }

    /// Borrow two distinct regions mutably at once.
    ///
    /// Returns `None` when `a == b`.
    pub fn pair_mut(&mut self, a: CityName, b: CityName) -> Option<(&mut Region, &mut Region)> {
        if a == b {
            return None;
        }
        let mut first = None;
        let mut second = None;
        for region in self.iter_mut() {
            if region.name() == a {
                first = Some(region);
            } else if region.name() == b {
                second = Some(region);
            }
        }
        first.zip(second)
    }

    /// Iterate regions in [`CityName::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        [
            &self.aevum,
            &self.chongqing,
            &self.sector12,
            &self.new_tokyo,
            &self.ishima,
            &self.volhaven,
        ]
        .into_iter()
    }

    /// Mutably iterate regions in [`CityName::ALL`] order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Region> {
        [
            &mut self.aevum,
            &mut self.chongqing,
            &mut self.sector12,
            &mut self.new_tokyo,
            &mut self.ishima,
            &mut self.volhaven,
        ]
        .into_iter()
    }

    /// Apply passive chaos decay to every region.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::NonFinite`] for a non-finite amount.
    pub fn decay_chaos(&mut self, amount: f64) -> Result<(), WorldError> {
        for region in self.iter_mut() {
            region.decay_chaos(amount)?;
        }
        Ok(())
    }
}

/// Pick one city uniformly.
pub fn random_city(rng: &mut impl Rng) -> CityName {
    CityName::ALL.choose(rng).copied().unwrap_or(CityName::Sector12)
}

/// Pick a city uniformly among those different from `excluded`.
pub fn random_other_city(rng: &mut impl Rng, excluded: CityName) -> CityName {
    let others: Vec<CityName> = CityName::ALL
        .iter()
        .copied()
        .filter(|&city| city != excluded)
        .collect();
    others.choose(rng).copied().unwrap_or(excluded)
}
