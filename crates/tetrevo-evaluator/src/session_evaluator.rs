//! Session evaluation: the fitness of a weight vector.
//!
//! A weight vector is judged by letting it play. [`RowsClearedSessionEvaluator`]
//! plays `games_per_individual` games, each ending on top-out or after `move_cap`
//! placements, and returns the integer mean of rows cleared. Games are seeded from
//! a single [`PieceSeed`], so a weight vector evaluated twice with the same seed gets
//! the same fitness.

use std::fmt;

use tetrevo_engine::{GameState, PieceSeed};

use crate::{
    feature_weights::FeatureWeights,
    placement_evaluator::FeatureBasedPlacementEvaluator,
    turn_evaluator::{SearchDepth, TurnEvaluator},
};

/// Evaluates complete game sessions for training.
pub trait SessionEvaluator: fmt::Debug + Send + Sync {
    /// Plays one or more games with `weights` and returns the fitness (higher is better).
    fn play_and_evaluate_sessions(&self, weights: &FeatureWeights, seed: PieceSeed) -> u32;
}

#[derive(Debug, Clone)]
pub struct RowsClearedSessionEvaluator {
    games_per_individual: usize,
    move_cap: usize,
    depth: SearchDepth,
}

impl RowsClearedSessionEvaluator {
    /// # Panics
    ///
    /// Panics if `games_per_individual` is zero.
    #[must_use]
    pub fn new(games_per_individual: usize, move_cap: usize, depth: SearchDepth) -> Self {
        assert!(games_per_individual > 0);
        Self {
            games_per_individual,
            move_cap,
            depth,
        }
    }
}

impl SessionEvaluator for RowsClearedSessionEvaluator {
    fn play_and_evaluate_sessions(&self, weights: &FeatureWeights, seed: PieceSeed) -> u32 {
        let turn_evaluator = TurnEvaluator::new(
            Box::new(FeatureBasedPlacementEvaluator::new(*weights)),
            self.depth,
        );
        let total: usize = seed
            .split(self.games_per_individual)
            .into_iter()
            .map(|seed| {
                let mut game = GameState::with_seed(seed);
                turn_evaluator
                    .play_session(&mut game, self.move_cap)
                    .total_rows_cleared()
            })
            .sum();
        u32::try_from(total / self.games_per_individual).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_fitness() {
        let evaluator = RowsClearedSessionEvaluator::new(2, 200, SearchDepth::Greedy);
        let seed = PieceSeed::from(77);
        let a = evaluator.play_and_evaluate_sessions(&FeatureWeights::DEFAULT, seed);
        let b = evaluator.play_and_evaluate_sessions(&FeatureWeights::DEFAULT, seed);
        assert_eq!(a, b);
        // 200 pieces is 800 cells; the default weights keep the board alive and clearing.
        assert!(a > 0);
        assert!(a <= 200 * 4 / 10);
    }

    #[test]
    fn test_good_weights_beat_bad_weights() {
        let evaluator = RowsClearedSessionEvaluator::new(1, 300, SearchDepth::Greedy);
        let seed = PieceSeed::from(8);
        let good = evaluator.play_and_evaluate_sessions(&FeatureWeights::DEFAULT, seed);
        // Rewarding height stacks pieces until the game is lost.
        let bad = FeatureWeights::new([0.0, 0.0, 0.0, 0.0, 10.0, 0.0]);
        let bad = evaluator.play_and_evaluate_sessions(&bad, seed);
        assert!(good > bad);
    }

    #[test]
    fn test_fitness_is_mean_over_games() {
        let seed = PieceSeed::from(5);
        let single = RowsClearedSessionEvaluator::new(1, 100, SearchDepth::Greedy);
        let double = RowsClearedSessionEvaluator::new(2, 100, SearchDepth::Greedy);
        let seeds = seed.split(2);
        let first = single.play_and_evaluate_sessions(&FeatureWeights::DEFAULT, seed);
        let both = double.play_and_evaluate_sessions(&FeatureWeights::DEFAULT, seed);

        let turn_evaluator = TurnEvaluator::new(
            Box::new(FeatureBasedPlacementEvaluator::new(FeatureWeights::DEFAULT)),
            SearchDepth::Greedy,
        );
        let rows: Vec<usize> = seeds
            .iter()
            .map(|&s| {
                turn_evaluator
                    .play_session(&mut GameState::with_seed(s), 100)
                    .total_rows_cleared()
            })
            .collect();
        assert_eq!(usize::try_from(first).unwrap(), rows[0]);
        assert_eq!(usize::try_from(both).unwrap(), (rows[0] + rows[1]) / 2);
    }
}
