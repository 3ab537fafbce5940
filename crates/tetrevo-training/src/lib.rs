//! Genetic-algorithm training of the agent's feature weights.
//!
//! Each individual is a [`FeatureWeights`](tetrevo_evaluator::feature_weights::FeatureWeights)
//! vector. Its fitness is the number of rows the agent clears when it plays with those
//! weights, as measured by a
//! [`SessionEvaluator`](tetrevo_evaluator::session_evaluator::SessionEvaluator).
//!
//! # How Training Works
//!
//! ```text
//! Initializing ─→ Evaluating ─→ Ranking ─→ Breeding ─→ Replacing ─→ Persisting
//!                     ↑                                                 │
//!                     └──────────────── next generation ────────────────┘
//! ```
//!
//! 1. **Initializing** - random weights, or a population restored from the weights file
//! 2. **Evaluating** - every unevaluated individual plays capped games on a worker pool
//! 3. **Ranking** - stable sort by fitness, best first
//! 4. **Breeding** - `replace_count` children: a `reproduction_rate` share bred from
//!    selected parents, the rest fresh random immigrants
//! 5. **Replacing** - children take the lowest-ranked slots; the elite is untouched
//! 6. **Persisting** - the whole population is rewritten to the weights file
//!
//! # Modules
//!
//! - [`config`] - [`TrainingConfig`](config::TrainingConfig) and its validation
//! - [`weights`] - weight-vector operators: random init, crossover, blend, mutation
//! - [`selection`] - roulette and tournament parent selection
//! - [`genetic`] - [`Individual`](genetic::Individual), [`Population`](genetic::Population)
//!   and [`PopulationEvolver`](genetic::PopulationEvolver)
//! - [`persistence`] - the line-oriented population file
//! - [`trainer`] - the generational loop
//! - [`stats`] - descriptive statistics for logging
//!
//! # Example
//!
//! ```
//! use tetrevo_training::{config::TrainingConfig, trainer::Trainer};
//!
//! let path = std::env::temp_dir().join(format!("tetrevo-doc-{}.txt", std::process::id()));
//! let config = TrainingConfig {
//!     population_size: 4,
//!     replace_count: 2,
//!     generations: 1,
//!     tournament_size: 2,
//!     max_concurrency: 2,
//!     move_cap: 20,
//!     weights_path: path.clone(),
//!     seed: Some(1),
//!     ..TrainingConfig::default()
//! };
//!
//! let population = Trainer::new(config)?.run()?;
//! assert_eq!(population.len(), 4);
//! assert_eq!(population.generation(), 1);
//! # std::fs::remove_file(path)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod genetic;
pub mod persistence;
pub mod selection;
pub mod stats;
pub mod trainer;
pub mod weights;
