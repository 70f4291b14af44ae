//! Random world events and migration.
//!
//! Every few minutes of simulated time the engine fires one event from a
//! fixed table. Two distinct regions are drawn uniformly (source and
//! destination), then one uniform roll `u` picks the bucket:
//!
//! | Roll `u`       | Event                 | Effect                                        |
//! |----------------|-----------------------|-----------------------------------------------|
//! | `<= 0.05`      | New community         | source +1 community, population +10..20%      |
//! | `<= 0.10`      | Community migration   | one community and 10..20% of population move  |
//! | `<= 0.30`      | Population surge      | source population +8..24%                     |
//! | `<= 0.50`      | Mass migration        | [`trigger_migration`] from the source         |
//! | `<= 0.70`      | Riot                  | source chaos +1, then +5..20%                 |
//! | `<= 0.90`      | Population decline    | source population -8..20%                     |
//! | otherwise      | Nothing               |                                               |
//!
//! A community migration out of a region with no communities falls back to
//! a new-community event. Population gains on the receiving side add a flat
//! growth bonus when the region is under the growth ceiling.
//!
//! Event effects never touch the population estimate: the operator only
//! learns about them through the narrative line.

use fieldops_types::CityName;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{WorldError, ensure_finite};
use crate::regions::{RegionSet, random_city, random_other_city};
use crate::roll::{random_int_f64, random_int_inclusive};

/// A random event that changed the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorldEvent {
    /// A community formed in `city`.
    NewCommunity {
        /// Where the community formed.
        city: CityName,
    },
    /// A community moved between regions.
    CommunityMigration {
        /// Region the community left.
        from: CityName,
        /// Region the community joined.
        to: CityName,
    },
    /// The population of `city` jumped.
    PopulationSurge {
        /// Affected region.
        city: CityName,
    },
    /// A large part of the population of `from` moved elsewhere.
    MassMigration {
        /// Region people left.
        from: CityName,
        /// Region people joined.
        to: CityName,
    },
    /// Riots raised chaos in `city`.
    Riot {
        /// Affected region.
        city: CityName,
    },
    /// The population of `city` fell.
    PopulationDecline {
        /// Affected region.
        city: CityName,
    },
}

impl WorldEvent {
    /// The operator-facing console line for this event.
    ///
    /// Destinations are deliberately vague; intelligence only knows where
    /// things left from.
    pub fn narrative(&self) -> String {
        match self {
            Self::NewCommunity { .. } => {
                "Intelligence indicates that a new Synthoid community was formed in a city"
                    .to_owned()
            }
            Self::CommunityMigration { from, .. } => format!(
                "Intelligence indicates that a Synthoid community migrated from {from} to some other city"
            ),
            Self::PopulationSurge { city } | Self::PopulationDecline { city } => format!(
                "Intelligence indicates that the Synthoid population of {city} just changed significantly"
            ),
            Self::MassMigration { from, .. } => format!(
                "Intelligence indicates that a large number of Synthoids migrated from {from} to some other city"
            ),
            Self::Riot { city } => format!(
                "Tensions between Synthoids and humans lead to riots in {city}! Chaos increased"
            ),
        }
    }
}

/// Table buckets in roll order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EventBucket {
    NewCommunity,
    CommunityMigration,
    PopulationSurge,
    MassMigration,
    Riot,
    PopulationDecline,
}

/// Cumulative upper bounds (inclusive) of each bucket.
const EVENT_TABLE: &[(f64, EventBucket)] = &[
    (0.05, EventBucket::NewCommunity),
    (0.10, EventBucket::CommunityMigration),
    (0.30, EventBucket::PopulationSurge),
    (0.50, EventBucket::MassMigration),
    (0.70, EventBucket::Riot),
    (0.90, EventBucket::PopulationDecline),
];

/// Map a roll in `[0, 1)` to a bucket. `None` is the quiet tail.
fn select_bucket(roll: f64) -> Option<EventBucket> {
    EVENT_TABLE
        .iter()
        .find(|&&(threshold, _)| roll <= threshold)
        .map(|&(_, bucket)| bucket)
}

/// Fire one event from the table.
///
/// Returns the event that happened, or `None` for the quiet tail.
///
/// # Errors
///
/// Returns [`WorldError::NonFinite`] if a region mutation would leave
/// non-finite state.
pub fn fire_random_event(
    regions: &mut RegionSet,
    rng: &mut impl Rng,
) -> Result<Option<WorldEvent>, WorldError> {
    let roll: f64 = rng.random();
    let source = random_city(rng);
    let destination = random_other_city(rng, source);

    let Some(bucket) = select_bucket(roll) else {
        return Ok(None);
    };

    let event = match bucket {
        EventBucket::NewCommunity => new_community(regions, source, rng)?,
        EventBucket::CommunityMigration => {
            if regions.get(source).communities() == 0 {
                new_community(regions, source, rng)?
            } else {
                if let Some((from, to)) = regions.pair_mut(source, destination) {
                    from.remove_community();
                    to.add_community();
                    let count = (from.population() * random_int_f64(rng, 10, 20) / 100.0).round();
                    from.shift_population(-count)?;
                    to.shift_population(count)?;
                    to.apply_base_growth();
                }
                WorldEvent::CommunityMigration {
                    from: source,
                    to: destination,
                }
            }
        }
        EventBucket::PopulationSurge => {
            let region = regions.get_mut(source);
            let count = (region.population() * random_int_f64(rng, 8, 24) / 100.0).round();
            region.shift_population(count)?;
            region.apply_base_growth();
            WorldEvent::PopulationSurge { city: source }
        }
        EventBucket::MassMigration => {
            let to = trigger_migration(regions, source, rng)?;
            WorldEvent::MassMigration { from: source, to }
        }
        EventBucket::Riot => {
            let region = regions.get_mut(source);
            region.change_chaos_by_count(1.0)?;
            region.change_chaos_by_percentage(random_int_f64(rng, 5, 20))?;
            WorldEvent::Riot { city: source }
        }
        EventBucket::PopulationDecline => {
            let region = regions.get_mut(source);
            let count = (region.population() * random_int_f64(rng, 8, 20) / 100.0).round();
            region.shift_population(-count)?;
            WorldEvent::PopulationDecline { city: source }
        }
    };

    tracing::debug!(?event, roll, "world event fired");
    Ok(Some(event))
}

fn new_community(
    regions: &mut RegionSet,
    city: CityName,
    rng: &mut impl Rng,
) -> Result<WorldEvent, WorldError> {
    let region = regions.get_mut(city);
    region.add_community();
    let count = (region.population() * random_int_f64(rng, 10, 20) / 100.0).round();
    region.shift_population(count)?;
    region.apply_base_growth();
    Ok(WorldEvent::NewCommunity { city })
}

/// Move 3..15% of `source`'s population to a random other region.
///
/// With 5% probability, and only when `source` has a community, the share
/// is multiplied by 2..4 and one community moves along. Returns the
/// destination.
///
/// # Errors
///
/// Returns [`WorldError::NonFinite`] if a region mutation would leave
/// non-finite state.
pub fn trigger_migration(
    regions: &mut RegionSet,
    source: CityName,
    rng: &mut impl Rng,
) -> Result<CityName, WorldError> {
    let destination = random_other_city(rng, source);
    let roll: f64 = rng.random();
    let mut share = random_int_f64(rng, 3, 15) / 100.0;

    if let Some((from, to)) = regions.pair_mut(source, destination) {
        if roll < 0.05 && from.communities() > 0 {
            share *= random_int_inclusive(rng, 2, 4) as f64;
            from.remove_community();
            to.add_community();
        }
        let count = (from.population() * share).round();
        from.shift_population(-count)?;
        to.shift_population(count)?;
        to.apply_base_growth();
    }

    Ok(destination)
}

/// Run [`trigger_migration`] with probability `chance`.
///
/// A chance above 1 is read as a percentage. Returns the destination when
/// a migration happened.
///
/// # Errors
///
/// Returns [`WorldError::NonFinite`] for a non-finite chance.
pub fn trigger_potential_migration(
    regions: &mut RegionSet,
    source: CityName,
    chance: f64,
    rng: &mut impl Rng,
) -> Result<Option<CityName>, WorldError> {
    let mut chance = ensure_finite("trigger_potential_migration", chance)?;
    if chance > 1.0 {
        chance /= 100.0;
    }
    if rng.random::<f64>() < chance {
        return trigger_migration(regions, source, rng).map(Some);
    }
    Ok(None)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::region::Region;

    #[test]
    fn bucket_boundaries_are_inclusive() {
        assert_eq!(select_bucket(0.0), Some(EventBucket::NewCommunity));
        assert_eq!(select_bucket(0.05), Some(EventBucket::NewCommunity));
        assert_eq!(select_bucket(0.050_001), Some(EventBucket::CommunityMigration));
        assert_eq!(select_bucket(0.10), Some(EventBucket::CommunityMigration));
        assert_eq!(select_bucket(0.30), Some(EventBucket::PopulationSurge));
        assert_eq!(select_bucket(0.50), Some(EventBucket::MassMigration));
        assert_eq!(select_bucket(0.70), Some(EventBucket::Riot));
        assert_eq!(select_bucket(0.90), Some(EventBucket::PopulationDecline));
        assert_eq!(select_bucket(0.900_001), None);
        assert_eq!(select_bucket(0.999), None);
    }

    #[test]
    fn ten_thousand_events_stay_finite_and_non_negative() {
        let mut rng = SmallRng::seed_from_u64(2024);
        let mut regions = RegionSet::new(&mut rng);
        for _ in 0..10_000 {
            fire_random_event(&mut regions, &mut rng).unwrap();
        }
        for region in regions.iter() {
            assert!(region.population().is_finite());
            assert!(region.population() >= 0.0);
            assert!(region.population_estimate().is_finite());
            assert!(region.population_estimate() >= 0.0);
            assert!(region.chaos().is_finite());
            assert!(region.chaos() >= 0.0);
        }
    }

    #[test]
    fn migration_conserves_population_above_ceiling() {
        let mut rng = SmallRng::seed_from_u64(17);
        let mut regions = RegionSet::new(&mut rng);
        let before: f64 = regions.iter().map(Region::population).sum();
        trigger_migration(&mut regions, CityName::Aevum, &mut rng).unwrap();
        let after: f64 = regions.iter().map(Region::population).sum();
        // All regions start above the growth ceiling, so no bonus is added.
        assert!((before - after).abs() < 1.0);
    }

    #[test]
    fn migration_never_targets_source() {
        let mut rng = SmallRng::seed_from_u64(23);
        let mut regions = RegionSet::new(&mut rng);
        for _ in 0..200 {
            let to = trigger_migration(&mut regions, CityName::Ishima, &mut rng).unwrap();
            assert_ne!(to, CityName::Ishima);
        }
    }

    #[test]
    fn potential_migration_respects_zero_and_certain_chance() {
        let mut rng = SmallRng::seed_from_u64(31);
        let mut regions = RegionSet::new(&mut rng);
        for _ in 0..100 {
            assert!(
                trigger_potential_migration(&mut regions, CityName::Aevum, 0.0, &mut rng)
                    .unwrap()
                    .is_none()
            );
        }
        // 100 is read as 100%.
        assert!(
            trigger_potential_migration(&mut regions, CityName::Aevum, 100.0, &mut rng)
                .unwrap()
                .is_some()
        );
        assert!(
            trigger_potential_migration(&mut regions, CityName::Aevum, f64::NAN, &mut rng).is_err()
        );
    }

    #[test]
    fn narrative_mentions_source() {
        let riot = WorldEvent::Riot {
            city: CityName::NewTokyo,
        };
        assert!(riot.narrative().contains("New Tokyo"));
        let moved = WorldEvent::MassMigration {
            from: CityName::Aevum,
            to: CityName::Ishima,
        };
        assert!(moved.narrative().contains("Aevum"));
        assert!(!moved.narrative().contains("Ishima"));
    }
}
