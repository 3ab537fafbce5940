//! The generational training loop.
//!
//! [`Trainer::run`] moves through [`TrainingPhase`]s and traces every transition at
//! `debug` level. One generation is:
//!
//! ```text
//! Evaluating → Ranking → Breeding → Replacing → Persisting
//! ```
//!
//! Each phase finishes before the next one starts. The population is also persisted
//! right after the first ranking, so the very first evaluated generation is saved
//! before any breeding happens.
//!
//! # Persistence failures
//!
//! With `strict_persistence` off, an unreadable population file on resume falls back
//! to a fresh random population and a failed write is logged and skipped. With it on,
//! both abort the run.

use rand::SeedableRng as _;
use rand_pcg::Pcg32;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use tetrevo_evaluator::{
    board_feature::ALL_BOARD_FEATURES, session_evaluator::RowsClearedSessionEvaluator,
};
use tracing::{debug, info, warn};

use crate::{
    config::{ConfigError, TrainingConfig},
    genetic::{Population, PopulationEvolver},
    persistence::{self, PersistenceError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum TrainingPhase {
    Initializing,
    Evaluating,
    Ranking,
    Breeding,
    Replacing,
    Persisting,
    Terminated,
}

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum TrainingError {
    #[display("invalid training config: {_0}")]
    Config(ConfigError),
    #[display("failed to build worker pool: {_0}")]
    ThreadPool(ThreadPoolBuildError),
    #[display("population file error: {_0}")]
    Persistence(PersistenceError),
}

/// Runs the genetic algorithm described by a [`TrainingConfig`].
#[derive(Debug)]
pub struct Trainer {
    config: TrainingConfig,
    evolver: PopulationEvolver,
    session_evaluator: RowsClearedSessionEvaluator,
    pool: ThreadPool,
    rng: Pcg32,
    phase: TrainingPhase,
}

impl Trainer {
    /// Validates `config` and sets up the worker pool and RNG.
    pub fn new(config: TrainingConfig) -> Result<Self, TrainingError> {
        config.validate()?;
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.max_concurrency)
            .thread_name(|i| format!("tetrevo-eval-{i}"))
            .build()?;
        let rng = match config.seed {
            Some(seed) => Pcg32::seed_from_u64(seed),
            None => Pcg32::from_rng(&mut rand::rng()),
        };
        Ok(Self {
            evolver: PopulationEvolver::from_config(&config),
            session_evaluator: RowsClearedSessionEvaluator::new(
                config.games_per_individual,
                config.move_cap,
                config.search_depth(),
            ),
            config,
            pool,
            rng,
            phase: TrainingPhase::Initializing,
        })
    }

    #[must_use]
    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    #[must_use]
    pub fn phase(&self) -> TrainingPhase {
        self.phase
    }

    fn enter(&mut self, phase: TrainingPhase) {
        debug!(from = %self.phase, to = %phase, "training phase");
        self.phase = phase;
    }

    /// Creates the starting population, restoring it from the weights file when
    /// `resume` is set.
    pub fn initialize(&mut self) -> Result<Population, TrainingError> {
        self.enter(TrainingPhase::Initializing);
        let path = &self.config.weights_path;
        if self.config.resume {
            match persistence::read_population(path, Some(self.config.population_size)) {
                Ok(population) => {
                    info!(
                        path = %path.display(),
                        generation = population.generation(),
                        "resumed population"
                    );
                    return Ok(population);
                }
                Err(e) if self.config.strict_persistence => return Err(e.into()),
                Err(e) => warn!(error = %e, "cannot resume; starting from a random population"),
            }
        }
        Ok(Population::random(
            &mut self.rng,
            self.config.population_size,
            &self.config.weight_bounds(),
        ))
    }

    /// Runs `generations` generations and returns the final population.
    ///
    /// The elite of the returned population is evaluated and ranked, so its first
    /// individual is the best found. The replaced slots hold the next generation's
    /// unevaluated children.
    pub fn run(&mut self) -> Result<Population, TrainingError> {
        let mut population = self.initialize()?;
        let target = population.generation() + self.config.generations;
        info!(
            population = population.len(),
            from = population.generation(),
            to = target,
            breeding = ?self.config.breeding,
            depth = ?self.config.search_depth(),
            "training started"
        );

        for run in 0..self.config.generations {
            self.step(&mut population, run == 0)?;
        }

        self.enter(TrainingPhase::Terminated);
        if let Some(best) = population.best() {
            info!(
                generation = population.generation(),
                fitness = ?best.fitness(),
                weights = ?best.weights().as_array(),
                "training finished"
            );
        }
        Ok(population)
    }

    /// Runs one generation.
    ///
    /// With `persist_ranked`, the population is also saved right after ranking.
    pub fn step(
        &mut self,
        population: &mut Population,
        persist_ranked: bool,
    ) -> Result<(), TrainingError> {
        self.enter(TrainingPhase::Evaluating);
        let evaluated =
            population.evaluate_fitness(&self.session_evaluator, &self.pool, &mut self.rng);
        debug!(evaluated, "fitness evaluated");

        self.enter(TrainingPhase::Ranking);
        population.rank();
        log_generation(population);
        if persist_ranked {
            self.persist(population)?;
        }

        self.enter(TrainingPhase::Breeding);
        let children = self.evolver.breed(population, &mut self.rng);

        self.enter(TrainingPhase::Replacing);
        self.evolver.replace(population, children);

        self.persist(population)
    }

    fn persist(&mut self, population: &Population) -> Result<(), TrainingError> {
        self.enter(TrainingPhase::Persisting);
        let path = &self.config.weights_path;
        match persistence::write_population(path, population) {
            Ok(()) => {
                debug!(
                    path = %path.display(),
                    generation = population.generation(),
                    "population saved"
                );
                Ok(())
            }
            Err(e) if self.config.strict_persistence => Err(e.into()),
            Err(e) => {
                warn!(error = %e, "failed to save population");
                Ok(())
            }
        }
    }
}

fn log_generation(population: &Population) {
    let Some(fitness) = population.compute_fitness_stats() else {
        return;
    };
    let best = population.best().map(|ind| ind.weights().as_array());
    info!(
        generation = population.generation(),
        best = fitness.max,
        mean = fitness.mean,
        min = fitness.min,
        weights = ?best,
        "generation ranked"
    );
    for (feature, stats) in ALL_BOARD_FEATURES.iter().zip(population.compute_weight_stats()) {
        debug!(
            feature = feature.id(),
            min = stats.min,
            max = stats.max,
            mean = stats.mean,
            std_dev = stats.std_dev,
            "weight diversity"
        );
    }
}
