//! Genetic operators on weight vectors.
//!
//! These are free functions over [`FeatureWeights`] so that
//! [`PopulationEvolver`](crate::genetic::PopulationEvolver) can combine them per
//! breeding strategy.
//!
//! # Operations
//!
//! - **Initialization**: [`random`] draws every penalty weight from
//!   `[bounds.min, bounds.max)` and the reward weight from `[0, bounds.max_reward)`
//! - **Crossover**: [`crossover_point`] picks a cut and [`single_point_crossover`]
//!   splices the parents at it; [`blend`] averages them instead
//! - **Mutation**: [`mutate`] resamples penalty weights with probability `rate`, and
//!   always resamples the reward weight
//!
//! # Fitter first parent
//!
//! When the first parent is strictly fitter than the second, [`crossover_point`]
//! returns the full length and the child copies the first parent, regardless of
//! the crossover rate.

use rand::Rng;
use tetrevo_evaluator::{
    board_feature::{FEATURE_COUNT, REWARD_INDEX},
    feature_weights::FeatureWeights,
};

/// Sampling ranges for fresh and mutated weights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightBounds {
    /// Lower bound of penalty weights (inclusive).
    pub min: f64,
    /// Upper bound of penalty weights (exclusive).
    pub max: f64,
    /// Upper bound of the reward weight (exclusive); the lower bound is zero.
    pub max_reward: f64,
}

impl WeightBounds {
    fn sample<R>(&self, index: usize, rng: &mut R) -> f64
    where
        R: Rng + ?Sized,
    {
        if index == REWARD_INDEX {
            rng.random_range(0.0..self.max_reward)
        } else {
            rng.random_range(self.min..self.max)
        }
    }
}

/// Generates a uniformly random weight vector within `bounds`.
pub fn random<R>(rng: &mut R, bounds: &WeightBounds) -> FeatureWeights
where
    R: Rng + ?Sized,
{
    FeatureWeights::new(std::array::from_fn(|i| bounds.sample(i, rng)))
}

/// Chooses the single-point crossover cut for two parents.
///
/// With probability `crossover_rate` the cut is uniform in `[0, FEATURE_COUNT)`,
/// otherwise it is `FEATURE_COUNT` (no mixing). A first parent strictly fitter than
/// the second always gets `FEATURE_COUNT`.
pub fn crossover_point<R>(
    rng: &mut R,
    crossover_rate: f64,
    first_fitness: Option<u32>,
    second_fitness: Option<u32>,
) -> usize
where
    R: Rng + ?Sized,
{
    let point = if rng.random_bool(crossover_rate) {
        rng.random_range(0..FEATURE_COUNT)
    } else {
        FEATURE_COUNT
    };
    if first_fitness > second_fitness {
        FEATURE_COUNT
    } else {
        point
    }
}

/// Takes weights `[0, point)` from `p1` and `[point, FEATURE_COUNT)` from `p2`.
///
/// # Examples
///
/// ```
/// use tetrevo_evaluator::feature_weights::FeatureWeights;
/// use tetrevo_training::weights;
///
/// let p1 = FeatureWeights::new([-1.0; 6]);
/// let p2 = FeatureWeights::new([-2.0; 6]);
///
/// let child = weights::single_point_crossover(&p1, &p2, 2);
/// assert_eq!(child.as_array(), &[-1.0, -1.0, -2.0, -2.0, -2.0, -2.0]);
///
/// assert_eq!(weights::single_point_crossover(&p1, &p2, 0), p2);
/// assert_eq!(weights::single_point_crossover(&p1, &p2, 6), p1);
/// ```
///
/// # Panics
///
/// Panics if `point > FEATURE_COUNT`.
#[must_use]
pub fn single_point_crossover(
    p1: &FeatureWeights,
    p2: &FeatureWeights,
    point: usize,
) -> FeatureWeights {
    assert!(point <= FEATURE_COUNT);
    FeatureWeights::new(std::array::from_fn(|i| if i < point { p1[i] } else { p2[i] }))
}

/// Averages two parents weight by weight.
#[must_use]
pub fn blend(p1: &FeatureWeights, p2: &FeatureWeights) -> FeatureWeights {
    FeatureWeights::new(std::array::from_fn(|i| (p1[i] + p2[i]) / 2.0))
}

/// Mutates a weight vector in place.
///
/// Each penalty weight is replaced by a fresh draw from its range with probability
/// `rate`. The reward weight is redrawn on every call, whatever `rate` is.
pub fn mutate<R>(weights: &mut FeatureWeights, rate: f64, bounds: &WeightBounds, rng: &mut R)
where
    R: Rng + ?Sized,
{
    for (i, w) in weights.as_mut_array().iter_mut().enumerate() {
        if i == REWARD_INDEX || rng.random_bool(rate) {
            *w = bounds.sample(i, rng);
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    const BOUNDS: WeightBounds = WeightBounds {
        min: -10.0,
        max: 0.0,
        max_reward: 10.0,
    };

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(42)
    }

    #[test]
    fn test_random_respects_bounds() {
        let mut rng = rng();
        for _ in 0..200 {
            let weights = random(&mut rng, &BOUNDS);
            for (i, &w) in weights.as_array().iter().enumerate() {
                if i == REWARD_INDEX {
                    assert!((0.0..10.0).contains(&w), "reward {w}");
                } else {
                    assert!((-10.0..0.0).contains(&w), "penalty {w}");
                }
            }
        }
    }

    #[test]
    fn test_crossover_point() {
        let mut rng = rng();
        for _ in 0..100 {
            // Fitter first parent is copied whole.
            assert_eq!(
                crossover_point(&mut rng, 1.0, Some(10), Some(3)),
                FEATURE_COUNT
            );
            // No crossover without the coin.
            assert_eq!(crossover_point(&mut rng, 0.0, Some(1), Some(3)), FEATURE_COUNT);
            assert!(crossover_point(&mut rng, 1.0, Some(3), Some(3)) < FEATURE_COUNT);
        }
    }

    #[test]
    fn test_crossover_point_covers_every_cut() {
        let mut rng = rng();
        let mut seen = [false; FEATURE_COUNT];
        for _ in 0..1000 {
            seen[crossover_point(&mut rng, 1.0, Some(0), Some(5))] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_blend_averages() {
        let p1 = FeatureWeights::new([-1.0, -2.0, -3.0, -4.0, -5.0, 6.0]);
        let p2 = FeatureWeights::new([-3.0, -2.0, -1.0, 0.0, -5.0, 2.0]);
        assert_eq!(
            blend(&p1, &p2).as_array(),
            &[-2.0, -2.0, -2.0, -2.0, -5.0, 4.0]
        );
    }

    #[test]
    fn test_mutation_rate_zero_only_touches_reward() {
        let mut rng = rng();
        let original = FeatureWeights::new([-1.0, -2.0, -3.0, -4.0, -5.0, 100.0]);
        let mut weights = original;
        mutate(&mut weights, 0.0, &BOUNDS, &mut rng);
        for i in 0..FEATURE_COUNT {
            if i == REWARD_INDEX {
                // Out of the reward range before, so it must have been redrawn.
                assert!((0.0..10.0).contains(&weights[i]));
            } else {
                assert_eq!(weights[i], original[i]);
            }
        }
    }

    #[test]
    fn test_mutation_rate_one_resamples_everything() {
        let mut rng = rng();
        let mut weights = FeatureWeights::new([5.0; FEATURE_COUNT]);
        mutate(&mut weights, 1.0, &BOUNDS, &mut rng);
        for (i, &w) in weights.as_array().iter().enumerate() {
            if i == REWARD_INDEX {
                assert!((0.0..10.0).contains(&w));
            } else {
                assert!((-10.0..0.0).contains(&w));
            }
        }
    }
}
