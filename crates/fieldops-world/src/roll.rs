//! Random helpers shared by region mutations, world events and action
//! resolution.

use rand::Rng;

/// Draw a uniform integer in `[min, max]`.
///
/// The bounds are swapped if given in the wrong order.
pub fn random_int_inclusive(rng: &mut impl Rng, min: i64, max: i64) -> i64 {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    rng.random_range(lo..=hi)
}

/// [`random_int_inclusive`] returned as an `f64`, for use in rate math.
pub fn random_int_f64(rng: &mut impl Rng, min: i64, max: i64) -> f64 {
    random_int_inclusive(rng, min, max) as f64
}

/// Perturb `value` by a uniform offset of up to `percentage` percent in
/// either direction.
///
/// A percentage outside `[0, 100]` leaves the value untouched.
pub fn add_offset(rng: &mut impl Rng, value: f64, percentage: f64) -> f64 {
    if !(0.0..=100.0).contains(&percentage) {
        return value;
    }
    let offset = value * (percentage / 100.0);
    value + rng.random::<f64>().mul_add(2.0 * offset, -offset)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn random_int_stays_in_bounds() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..1000 {
            let v = random_int_inclusive(&mut rng, 240, 600);
            assert!((240..=600).contains(&v));
        }
    }

    #[test]
    fn random_int_swaps_reversed_bounds() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..100 {
            let v = random_int_inclusive(&mut rng, -5, -10);
            assert!((-10..=-5).contains(&v));
        }
    }

    #[test]
    fn add_offset_stays_within_percentage() {
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..1000 {
            let v = add_offset(&mut rng, 100.0, 10.0);
            assert!((90.0..=110.0).contains(&v));
        }
    }

    #[test]
    fn add_offset_ignores_out_of_range_percentage() {
        let mut rng = SmallRng::seed_from_u64(11);
        assert!((add_offset(&mut rng, 42.0, 150.0) - 42.0).abs() < f64::EPSILON);
        assert!((add_offset(&mut rng, 42.0, -1.0) - 42.0).abs() < f64::EPSILON);
    }
}
