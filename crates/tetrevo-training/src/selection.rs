//! Parent selection over a ranked population.
//!
//! Both strategies return indices into the slice they are given, so the caller
//! decides whether to clone, borrow or compare the parents.

use rand::Rng;
use tracing::debug;

use crate::genetic::Individual;

/// Fitness-proportionate ("roulette wheel") selection.
///
/// Draws a uniform point on the cumulative fitness line and returns the first
/// individual whose cumulative fitness exceeds it. Individuals that are unevaluated
/// or have zero fitness are never picked, unless the whole population has zero total
/// fitness: then every individual is equally likely.
///
/// ```
/// use rand::SeedableRng as _;
/// use rand_pcg::Pcg32;
/// use tetrevo_evaluator::feature_weights::FeatureWeights;
/// use tetrevo_training::{genetic::Individual, selection};
///
/// let individuals: Vec<_> = [10, 0, 0, 0]
///     .into_iter()
///     .map(|f| Individual::with_fitness(FeatureWeights::DEFAULT, Some(f)))
///     .collect();
///
/// let mut rng = Pcg32::seed_from_u64(0);
/// assert!((0..1000).all(|_| selection::roulette(&individuals, &mut rng) == 0));
/// ```
///
/// # Panics
///
/// Panics if `individuals` is empty.
pub fn roulette<R>(individuals: &[Individual], rng: &mut R) -> usize
where
    R: Rng + ?Sized,
{
    assert!(!individuals.is_empty());
    let total: u64 = individuals.iter().map(weight).sum();
    if total == 0 {
        debug!(
            population = individuals.len(),
            "total fitness is zero; selecting uniformly"
        );
        return rng.random_range(0..individuals.len());
    }

    let point = rng.random_range(0..total);
    let mut cumulative = 0;
    for (index, individual) in individuals.iter().enumerate() {
        cumulative += weight(individual);
        if cumulative > point {
            return index;
        }
    }
    unreachable!("cumulative fitness reaches the total")
}

fn weight(individual: &Individual) -> u64 {
    individual.fitness().map_or(0, u64::from)
}

/// Tournament selection over a population sorted best first.
///
/// Draws `tournament_size` indices uniformly with replacement and returns the two
/// smallest, which are the two fittest contestants. The two may be the same index
/// when it was drawn twice.
///
/// # Panics
///
/// Panics if `individuals` is empty or `tournament_size < 2`.
pub fn tournament<R>(
    individuals: &[Individual],
    tournament_size: usize,
    rng: &mut R,
) -> (usize, usize)
where
    R: Rng + ?Sized,
{
    assert!(!individuals.is_empty());
    assert!(tournament_size >= 2);
    let mut first = usize::MAX;
    let mut second = usize::MAX;
    for _ in 0..tournament_size {
        let index = rng.random_range(0..individuals.len());
        if index < first {
            second = first;
            first = index;
        } else if index < second {
            second = index;
        }
    }
    (first, second)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;
    use tetrevo_evaluator::feature_weights::FeatureWeights;

    use super::*;

    fn population(fitness: &[Option<u32>]) -> Vec<Individual> {
        fitness
            .iter()
            .map(|&f| Individual::with_fitness(FeatureWeights::DEFAULT, f))
            .collect()
    }

    #[test]
    fn test_roulette_is_proportional() {
        let individuals = population(&[Some(30), Some(10), Some(0), None]);
        let mut rng = Pcg32::seed_from_u64(1);
        let mut counts = [0_usize; 4];
        for _ in 0..40_000 {
            counts[roulette(&individuals, &mut rng)] += 1;
        }
        assert_eq!(counts[2], 0);
        assert_eq!(counts[3], 0);
        // Expected 30_000 : 10_000.
        assert!((29_000..31_000).contains(&counts[0]), "{counts:?}");
        assert!((9_000..11_000).contains(&counts[1]), "{counts:?}");
    }

    #[test]
    fn test_roulette_zero_total_falls_back_to_uniform() {
        let individuals = population(&[Some(0), Some(0), None, Some(0)]);
        let mut rng = Pcg32::seed_from_u64(2);
        let mut counts = [0_usize; 4];
        for _ in 0..4000 {
            counts[roulette(&individuals, &mut rng)] += 1;
        }
        assert!(counts.iter().all(|&c| c > 800), "{counts:?}");
    }

    #[test]
    fn test_tournament_returns_two_smallest_drawn() {
        let individuals = population(&[Some(5); 10]);
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..500 {
            let (first, second) = tournament(&individuals, 3, &mut rng);
            assert!(first <= second);
            assert!(second < individuals.len());
        }
    }

    #[test]
    fn test_large_tournament_finds_the_elite() {
        let individuals = population(&[Some(5); 4]);
        let mut rng = Pcg32::seed_from_u64(4);
        // 200 draws over 4 indices draw index 0 at least twice.
        assert_eq!(tournament(&individuals, 200, &mut rng), (0, 0));
    }
}
