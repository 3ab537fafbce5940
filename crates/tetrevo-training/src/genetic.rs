//! Population, individuals and the generation step.
//!
//! A [`Population`] is kept as a plain vector. After [`Population::rank`] the best
//! individual is at index 0, and the first `len - replace_count` slots form the elite:
//! [`PopulationEvolver::replace`] only ever overwrites the slots after them.
//!
//! # Generation Step
//!
//! 1. [`Population::evaluate_fitness`] - play games for every unevaluated individual
//! 2. [`Population::rank`] - stable sort, best first
//! 3. [`PopulationEvolver::breed`] - `replace_count` children and immigrants
//! 4. [`PopulationEvolver::replace`] - overwrite the weakest slots
//!
//! Evaluated individuals keep their fitness across generations; only new children
//! and immigrants play games.
//!
//! # Parallelization
//!
//! Fitness evaluation runs on a caller-provided rayon pool. Each unevaluated individual
//! receives its [`PieceSeed`] from the caller's RNG before any game starts, so the
//! result does not depend on how the pool schedules the work.

use rand::Rng;
use rayon::{ThreadPool, prelude::*};
use tetrevo_engine::PieceSeed;
use tetrevo_evaluator::{
    board_feature::FEATURE_COUNT, feature_weights::FeatureWeights,
    session_evaluator::SessionEvaluator,
};

use crate::{
    config::{BreedingStrategy, TrainingConfig},
    selection,
    stats::DescriptiveStats,
    weights::{self, WeightBounds},
};

/// A weight vector and, once it has played, its fitness.
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    weights: FeatureWeights,
    fitness: Option<u32>,
}

impl Individual {
    /// Creates an unevaluated individual.
    #[must_use]
    pub fn new(weights: FeatureWeights) -> Self {
        Self {
            weights,
            fitness: None,
        }
    }

    #[must_use]
    pub fn with_fitness(weights: FeatureWeights, fitness: Option<u32>) -> Self {
        Self { weights, fitness }
    }

    /// Creates an unevaluated individual with random weights within `bounds`.
    pub fn random<R>(rng: &mut R, bounds: &WeightBounds) -> Self
    where
        R: Rng + ?Sized,
    {
        Self::new(weights::random(rng, bounds))
    }

    #[must_use]
    pub fn weights(&self) -> &FeatureWeights {
        &self.weights
    }

    /// Rows cleared per game, or `None` before evaluation.
    #[must_use]
    pub fn fitness(&self) -> Option<u32> {
        self.fitness
    }

    #[must_use]
    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }
}

/// A fixed-size population and the number of generations it has completed.
#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    individuals: Vec<Individual>,
    generation: usize,
}

impl Population {
    #[must_use]
    pub fn new(individuals: Vec<Individual>, generation: usize) -> Self {
        Self {
            individuals,
            generation,
        }
    }

    /// Creates `count` random, unevaluated individuals at generation 0.
    pub fn random<R>(rng: &mut R, count: usize, bounds: &WeightBounds) -> Self
    where
        R: Rng + ?Sized,
    {
        let individuals = (0..count)
            .map(|_| Individual::random(rng, bounds))
            .collect();
        Self::new(individuals, 0)
    }

    #[must_use]
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    /// Completed generations, including those of a resumed run.
    #[must_use]
    pub fn generation(&self) -> usize {
        self.generation
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// The first individual; the fittest once the population is ranked.
    #[must_use]
    pub fn best(&self) -> Option<&Individual> {
        self.individuals.first()
    }

    /// Plays games for every unevaluated individual and records their fitness.
    ///
    /// Blocks until all of them are evaluated, and returns how many there were.
    pub fn evaluate_fitness<E, R>(
        &mut self,
        session_evaluator: &E,
        pool: &ThreadPool,
        rng: &mut R,
    ) -> usize
    where
        E: SessionEvaluator + ?Sized,
        R: Rng + ?Sized,
    {
        let mut pending: Vec<(&mut Individual, PieceSeed)> = self
            .individuals
            .iter_mut()
            .filter(|ind| !ind.is_evaluated())
            .map(|ind| (ind, rng.random()))
            .collect();
        pool.install(|| {
            pending.par_iter_mut().for_each(|(ind, seed)| {
                let fitness = session_evaluator.play_and_evaluate_sessions(&ind.weights, *seed);
                ind.fitness = Some(fitness);
            });
        });
        pending.len()
    }

    /// Sorts best first. Equal fitness keeps the current order; unevaluated
    /// individuals go last.
    pub fn rank(&mut self) {
        self.individuals.sort_by(|a, b| b.fitness.cmp(&a.fitness));
    }

    #[must_use]
    pub fn is_ranked(&self) -> bool {
        self.individuals.is_sorted_by(|a, b| a.fitness >= b.fitness)
    }

    /// Statistics of each weight across the population, in feature order.
    #[must_use]
    pub fn compute_weight_stats(&self) -> Vec<DescriptiveStats> {
        (0..FEATURE_COUNT)
            .filter_map(|i| {
                DescriptiveStats::new(self.individuals.iter().map(|ind| ind.weights[i]))
            })
            .collect()
    }

    /// Statistics of the evaluated individuals' fitness, or `None` if there are none.
    #[must_use]
    pub fn compute_fitness_stats(&self) -> Option<DescriptiveStats> {
        DescriptiveStats::new(
            self.individuals
                .iter()
                .filter_map(Individual::fitness)
                .map(f64::from),
        )
    }
}

/// Breeds and replaces the weakest part of a ranked population.
#[derive(Debug, Clone)]
pub struct PopulationEvolver {
    /// Slots replaced every generation; the rest form the elite.
    pub replace_count: usize,
    /// Share of the replaced slots filled by breeding.
    pub reproduction_rate: f64,
    pub crossover_rate: f64,
    pub mutation_rate: f64,
    pub tournament_size: usize,
    pub breeding: BreedingStrategy,
    pub bounds: WeightBounds,
}

impl PopulationEvolver {
    #[must_use]
    pub fn from_config(config: &TrainingConfig) -> Self {
        Self {
            replace_count: config.replace_count,
            reproduction_rate: config.reproduction_rate,
            crossover_rate: config.crossover_rate,
            mutation_rate: config.mutation_rate,
            tournament_size: config.tournament_size,
            breeding: config.breeding,
            bounds: config.weight_bounds(),
        }
    }

    /// Number of replaced slots filled by breeding; the rest are immigrants.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    pub fn bred_count(&self) -> usize {
        ((self.replace_count as f64 * self.reproduction_rate) as usize).min(self.replace_count)
    }

    /// Produces `replace_count` unevaluated individuals: bred children first,
    /// then random immigrants.
    ///
    /// # Panics
    ///
    /// Panics if `population` is not ranked or is not larger than `replace_count`.
    pub fn breed<R>(&self, population: &Population, rng: &mut R) -> Vec<Individual>
    where
        R: Rng + ?Sized,
    {
        assert!(population.is_ranked());
        assert!(self.replace_count < population.len());

        let individuals = population.individuals();
        let mut children = Vec::with_capacity(self.replace_count);
        for k in 0..self.bred_count() {
            let mut child = match self.breeding {
                BreedingStrategy::Roulette => {
                    let p1 = selection::roulette(individuals, rng);
                    let p2 = selection::roulette(individuals, rng);
                    self.crossover(&individuals[p1], &individuals[p2], rng)
                }
                BreedingStrategy::Tournament => {
                    let (p1, p2) = selection::tournament(individuals, self.tournament_size, rng);
                    self.crossover(&individuals[p1], &individuals[p2], rng)
                }
                BreedingStrategy::Consecutive => {
                    let p1 = &individuals[(2 * k) % individuals.len()];
                    let p2 = &individuals[(2 * k + 1) % individuals.len()];
                    weights::blend(&p1.weights, &p2.weights)
                }
            };
            weights::mutate(&mut child, self.mutation_rate, &self.bounds, rng);
            children.push(Individual::new(child));
        }
        while children.len() < self.replace_count {
            children.push(Individual::random(rng, &self.bounds));
        }
        children
    }

    fn crossover<R>(&self, p1: &Individual, p2: &Individual, rng: &mut R) -> FeatureWeights
    where
        R: Rng + ?Sized,
    {
        let point = weights::crossover_point(rng, self.crossover_rate, p1.fitness, p2.fitness);
        weights::single_point_crossover(&p1.weights, &p2.weights, point)
    }

    /// Overwrites the last `replace_count` slots with `children` and completes the
    /// generation.
    ///
    /// # Panics
    ///
    /// Panics if `children.len() != replace_count`.
    pub fn replace(&self, population: &mut Population, children: Vec<Individual>) {
        assert_eq!(children.len(), self.replace_count);
        let elite = population.len() - self.replace_count;
        population.individuals.truncate(elite);
        population.individuals.extend(children);
        population.generation += 1;
    }

    /// Breeds and replaces in one step.
    pub fn evolve<R>(&self, population: &mut Population, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        let children = self.breed(population, rng);
        self.replace(population, children);
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;
    use tetrevo_evaluator::{
        board_feature::REWARD_INDEX, session_evaluator::RowsClearedSessionEvaluator,
        turn_evaluator::SearchDepth,
    };

    use super::*;

    const BOUNDS: WeightBounds = WeightBounds {
        min: -10.0,
        max: 0.0,
        max_reward: 10.0,
    };

    fn evolver(breeding: BreedingStrategy, replace_count: usize) -> PopulationEvolver {
        PopulationEvolver {
            replace_count,
            reproduction_rate: 1.0,
            crossover_rate: 0.75,
            mutation_rate: 0.0,
            tournament_size: 3,
            breeding,
            bounds: BOUNDS,
        }
    }

    fn ranked(fitness: &[u32]) -> Population {
        let individuals = fitness
            .iter()
            .enumerate()
            .map(|(i, &f)| {
                #[expect(clippy::cast_precision_loss)]
                let w = -(i as f64);
                Individual::with_fitness(FeatureWeights::new([w; FEATURE_COUNT]), Some(f))
            })
            .collect();
        let mut population = Population::new(individuals, 3);
        population.rank();
        population
    }

    /// Fitness is the first weight's distance from zero, scaled.
    #[derive(Debug)]
    struct FirstWeight;

    impl SessionEvaluator for FirstWeight {
        #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        fn play_and_evaluate_sessions(&self, weights: &FeatureWeights, _seed: PieceSeed) -> u32 {
            (weights[0].abs() * 100.0) as u32
        }
    }

    fn pool() -> ThreadPool {
        rayon::ThreadPoolBuilder::new()
            .num_threads(2)
            .build()
            .unwrap()
    }

    #[test]
    fn test_evaluate_skips_evaluated_individuals() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut population = Population::new(
            vec![
                Individual::with_fitness(FeatureWeights::new([-1.0; FEATURE_COUNT]), Some(7)),
                Individual::new(FeatureWeights::new([-2.0; FEATURE_COUNT])),
                Individual::new(FeatureWeights::new([-0.5; FEATURE_COUNT])),
            ],
            0,
        );
        let evaluated = population.evaluate_fitness(&FirstWeight, &pool(), &mut rng);
        assert_eq!(evaluated, 2);
        let fitness: Vec<_> = population.individuals().iter().map(Individual::fitness).collect();
        assert_eq!(fitness, [Some(7), Some(200), Some(50)]);

        population.rank();
        assert!(population.is_ranked());
        assert_eq!(population.best().and_then(Individual::fitness), Some(200));
    }

    #[test]
    fn test_evaluate_is_deterministic_with_real_games() {
        let evaluator = RowsClearedSessionEvaluator::new(1, 60, SearchDepth::Greedy);
        let pool = pool();
        let run = || {
            let mut rng = Pcg32::seed_from_u64(5);
            let mut population = Population::random(&mut rng, 6, &BOUNDS);
            population.evaluate_fitness(&evaluator, &pool, &mut rng);
            population
        };
        let a = run();
        assert!(a.individuals().iter().all(Individual::is_evaluated));
        assert_eq!(a, run());
    }

    #[test]
    fn test_rank_is_stable() {
        let population = ranked(&[3, 9, 3, 9, 0]);
        let order: Vec<_> = population
            .individuals()
            .iter()
            .map(|ind| ind.weights()[0])
            .collect();
        assert_eq!(order, [-1.0, -3.0, -0.0, -2.0, -4.0]);
    }

    #[test]
    fn test_unevaluated_rank_last() {
        let mut population = Population::new(
            vec![
                Individual::new(FeatureWeights::DEFAULT),
                Individual::with_fitness(FeatureWeights::DEFAULT, Some(0)),
            ],
            0,
        );
        population.rank();
        assert!(population.individuals()[0].is_evaluated());
        assert!(!population.individuals()[1].is_evaluated());
    }

    #[test]
    fn test_replace_keeps_elite_and_counts_generation() {
        let mut rng = Pcg32::seed_from_u64(2);
        for breeding in [
            BreedingStrategy::Roulette,
            BreedingStrategy::Tournament,
            BreedingStrategy::Consecutive,
        ] {
            let mut population = ranked(&[50, 40, 30, 20, 10, 5]);
            let elite = population.individuals()[..2].to_vec();
            evolver(breeding, 4).evolve(&mut population, &mut rng);

            assert_eq!(population.len(), 6);
            assert_eq!(population.generation(), 4);
            assert_eq!(&population.individuals()[..2], elite.as_slice());
            assert!(population.individuals()[2..].iter().all(|ind| !ind.is_evaluated()));
        }
    }

    #[test]
    fn test_children_inherit_parent_weights_without_mutation() {
        let mut rng = Pcg32::seed_from_u64(3);
        let population = ranked(&[50, 40, 30, 20]);
        let children = evolver(BreedingStrategy::Roulette, 3).breed(&population, &mut rng);
        for child in &children {
            for i in 0..FEATURE_COUNT {
                if i == REWARD_INDEX {
                    assert!((0.0..10.0).contains(&child.weights()[i]));
                } else {
                    let w = child.weights()[i];
                    assert!(population.individuals().iter().any(|p| p.weights()[i] == w));
                }
            }
        }
    }

    #[test]
    fn test_consecutive_blends_neighbours() {
        let mut rng = Pcg32::seed_from_u64(4);
        let population = ranked(&[50, 40, 30, 20, 10]);
        let children = evolver(BreedingStrategy::Consecutive, 3).breed(&population, &mut rng);
        // Ranks (0, 1), (2, 3), (4, 0) hold weights (-0, -1), (-2, -3), (-4, -0).
        let firsts: Vec<_> = children.iter().map(|c| c.weights()[0]).collect();
        assert_eq!(firsts, [-0.5, -2.5, -2.0]);
    }

    #[test]
    fn test_immigrants_fill_unbred_slots() {
        let mut rng = Pcg32::seed_from_u64(6);
        let population = ranked(&[50, 40, 30, 20, 10]);
        let evolver = PopulationEvolver {
            reproduction_rate: 0.5,
            ..evolver(BreedingStrategy::Consecutive, 4)
        };
        assert_eq!(evolver.bred_count(), 2);
        let children = evolver.breed(&population, &mut rng);
        assert_eq!(children.len(), 4);
        assert_eq!(children[0].weights()[0], -0.5);
        assert_eq!(children[1].weights()[0], -2.5);
        for immigrant in &children[2..] {
            assert!(
                immigrant.weights().as_array()[..REWARD_INDEX]
                    .iter()
                    .all(|w| (-10.0..0.0).contains(w))
            );
        }
    }

    #[test]
    fn test_stats() {
        let population = ranked(&[10, 20, 30]);
        let fitness = population.compute_fitness_stats().unwrap();
        assert_eq!(fitness.max, 30.0);
        assert_eq!(fitness.mean, 20.0);
        let weights = population.compute_weight_stats();
        assert_eq!(weights.len(), FEATURE_COUNT);
        assert_eq!(weights[0].min, -2.0);
        assert_eq!(weights[0].max, 0.0);

        let unevaluated = Population::new(vec![Individual::new(FeatureWeights::DEFAULT)], 0);
        assert_eq!(unevaluated.compute_fitness_stats(), None);
    }
}
