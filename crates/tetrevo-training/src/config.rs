//! Training parameters.
//!
//! Every field has a default, so a JSON config only needs the fields it changes:
//!
//! ```
//! use tetrevo_training::config::{BreedingStrategy, TrainingConfig};
//!
//! let config: TrainingConfig =
//!     serde_json::from_str(r#"{ "population_size": 20, "breeding": "tournament" }"#)?;
//! assert_eq!(config.population_size, 20);
//! assert_eq!(config.breeding, BreedingStrategy::Tournament);
//! assert_eq!(config.replace_count, 99);
//! # Ok::<(), serde_json::Error>(())
//! ```
//!
//! The defaults above describe a 100-individual population, so a config that shrinks
//! `population_size` must also shrink `replace_count`; [`TrainingConfig::validate`]
//! catches the mismatch before training starts.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tetrevo_evaluator::turn_evaluator::SearchDepth;

use crate::weights::WeightBounds;

/// How the bred share of each generation's children is produced.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, derive_more::FromStr,
)]
#[serde(rename_all = "snake_case")]
pub enum BreedingStrategy {
    /// Two roulette-selected parents, single-point crossover.
    #[default]
    Roulette,
    /// The two fittest of a random tournament, single-point crossover.
    Tournament,
    /// Neighbouring ranks `2k` and `2k + 1`, averaged weight by weight.
    Consecutive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainingConfig {
    /// Number of individuals, constant for the whole run.
    pub population_size: usize,
    /// Generations to run, counted from the generation the population starts at.
    pub generations: usize,
    /// Lowest-ranked individuals replaced each generation.
    pub replace_count: usize,
    /// Share of the replaced slots filled by breeding; the rest are immigrants.
    pub reproduction_rate: f64,
    pub crossover_rate: f64,
    pub mutation_rate: f64,
    pub tournament_size: usize,
    /// Worker threads evaluating fitness.
    pub max_concurrency: usize,
    pub games_per_individual: usize,
    /// Placements after which a game is stopped.
    pub move_cap: usize,
    /// Lower bound of penalty weights.
    pub min_weight: f64,
    /// Upper bound of penalty weights.
    pub max_weight: f64,
    /// Upper bound of the rows-cleared reward weight (lower bound is zero).
    pub max_reward_weight: f64,
    /// Select moves with 2-ply lookahead instead of greedily.
    pub lookahead: bool,
    pub breeding: BreedingStrategy,
    /// Start from the population stored at `weights_path`.
    pub resume: bool,
    /// Abort instead of continuing when the population file cannot be read or written.
    pub strict_persistence: bool,
    pub weights_path: PathBuf,
    /// Seed of the trainer's RNG; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            generations: 200,
            replace_count: 99,
            reproduction_rate: 1.0,
            crossover_rate: 0.75,
            mutation_rate: 0.001,
            tournament_size: 50,
            max_concurrency: 20,
            games_per_individual: 1,
            move_cap: 100_000,
            min_weight: -10.0,
            max_weight: 0.0,
            max_reward_weight: 10.0,
            lookahead: false,
            breeding: BreedingStrategy::Roulette,
            resume: false,
            strict_persistence: false,
            weights_path: PathBuf::from("weights.txt"),
            seed: None,
        }
    }
}

/// A [`TrainingConfig`] that cannot drive a training run.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display(
        "replace_count ({replace_count}) must be less than population_size ({population_size})"
    )]
    NoElite {
        replace_count: usize,
        population_size: usize,
    },
    #[display("{name} must be within [0, 1], got {value}")]
    RateOutOfRange { name: &'static str, value: f64 },
    #[display("weight range [{min}, {max}) is empty")]
    EmptyWeightRange { min: f64, max: f64 },
    #[display("max_reward_weight must be positive and finite, got {max}")]
    EmptyRewardRange { max: f64 },
    #[display("tournament_size must be at least 2, got {size}")]
    TournamentTooSmall { size: usize },
    #[display("max_concurrency must be at least 1")]
    NoWorkers,
    #[display("games_per_individual must be at least 1")]
    NoGames,
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.replace_count >= self.population_size {
            return Err(ConfigError::NoElite {
                replace_count: self.replace_count,
                population_size: self.population_size,
            });
        }
        for (name, value) in [
            ("reproduction_rate", self.reproduction_rate),
            ("crossover_rate", self.crossover_rate),
            ("mutation_rate", self.mutation_rate),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::RateOutOfRange { name, value });
            }
        }
        if !(self.min_weight.is_finite() && self.max_weight.is_finite())
            || self.min_weight >= self.max_weight
        {
            return Err(ConfigError::EmptyWeightRange {
                min: self.min_weight,
                max: self.max_weight,
            });
        }
        if !self.max_reward_weight.is_finite() || self.max_reward_weight <= 0.0 {
            return Err(ConfigError::EmptyRewardRange {
                max: self.max_reward_weight,
            });
        }
        if self.tournament_size < 2 {
            return Err(ConfigError::TournamentTooSmall {
                size: self.tournament_size,
            });
        }
        if self.max_concurrency == 0 {
            return Err(ConfigError::NoWorkers);
        }
        if self.games_per_individual == 0 {
            return Err(ConfigError::NoGames);
        }
        Ok(())
    }

    #[must_use]
    pub fn weight_bounds(&self) -> WeightBounds {
        WeightBounds {
            min: self.min_weight,
            max: self.max_weight,
            max_reward: self.max_reward_weight,
        }
    }

    #[must_use]
    pub fn search_depth(&self) -> SearchDepth {
        if self.lookahead {
            SearchDepth::Lookahead
        } else {
            SearchDepth::Greedy
        }
    }

    /// Number of elite individuals kept unchanged every generation.
    #[must_use]
    pub fn elite_count(&self) -> usize {
        self.population_size.saturating_sub(self.replace_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = TrainingConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.elite_count(), 1);
        assert_eq!(config.search_depth(), SearchDepth::Greedy);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let cases = [
            (
                TrainingConfig {
                    replace_count: 100,
                    ..TrainingConfig::default()
                },
                ConfigError::NoElite {
                    replace_count: 100,
                    population_size: 100,
                },
            ),
            (
                TrainingConfig {
                    crossover_rate: 1.5,
                    ..TrainingConfig::default()
                },
                ConfigError::RateOutOfRange {
                    name: "crossover_rate",
                    value: 1.5,
                },
            ),
            (
                TrainingConfig {
                    min_weight: 0.0,
                    ..TrainingConfig::default()
                },
                ConfigError::EmptyWeightRange { min: 0.0, max: 0.0 },
            ),
            (
                TrainingConfig {
                    max_reward_weight: 0.0,
                    ..TrainingConfig::default()
                },
                ConfigError::EmptyRewardRange { max: 0.0 },
            ),
            (
                TrainingConfig {
                    tournament_size: 1,
                    ..TrainingConfig::default()
                },
                ConfigError::TournamentTooSmall { size: 1 },
            ),
            (
                TrainingConfig {
                    max_concurrency: 0,
                    ..TrainingConfig::default()
                },
                ConfigError::NoWorkers,
            ),
            (
                TrainingConfig {
                    games_per_individual: 0,
                    ..TrainingConfig::default()
                },
                ConfigError::NoGames,
            ),
        ];
        for (config, expected) in cases {
            assert_eq!(config.validate(), Err(expected));
        }
    }

    #[test]
    fn test_json_round_trip_and_unknown_fields() {
        let config = TrainingConfig {
            lookahead: true,
            breeding: BreedingStrategy::Consecutive,
            seed: Some(9),
            ..TrainingConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""breeding":"consecutive""#));
        let back: TrainingConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);

        assert!(serde_json::from_str::<TrainingConfig>(r#"{ "pop_size": 3 }"#).is_err());
    }

    #[test]
    fn test_breeding_strategy_from_str() {
        assert_eq!(
            "tournament".parse::<BreedingStrategy>().ok(),
            Some(BreedingStrategy::Tournament)
        );
        assert_eq!(
            "Roulette".parse::<BreedingStrategy>().ok(),
            Some(BreedingStrategy::Roulette)
        );
        assert!("elitist".parse::<BreedingStrategy>().is_err());
    }
}
