//! Placement evaluation: scoring a single simulated placement.
//!
//! [`FeatureBasedPlacementEvaluator`] scores a placement as a linear combination of the
//! board features:
//!
//! ```text
//! score = w₀·row_transitions + w₁·column_transitions + w₂·holes
//!       + w₃·wells + w₄·max_height + w₅·rows_cleared
//! ```
//!
//! Higher is better. Losing placements never reach the evaluator; they are scored by the
//! [`TurnEvaluator`](crate::turn_evaluator::TurnEvaluator) directly.

use std::{fmt, iter};

use crate::{
    board_feature::ALL_BOARD_FEATURES, feature_weights::FeatureWeights,
    placement_analysis::PlacementAnalysis,
};

/// Evaluates piece placements by assigning scores.
pub trait PlacementEvaluator: fmt::Debug + Send + Sync {
    /// Evaluates a placement and returns a score (higher is better).
    fn evaluate_placement(&self, analysis: &PlacementAnalysis) -> f64;
}

/// Weighted sum of the six board features.
///
/// # Example
///
/// ```
/// use tetrevo_engine::{Board, Move, PieceKind};
/// use tetrevo_evaluator::{
///     feature_weights::FeatureWeights,
///     placement_analysis::PlacementAnalysis,
///     placement_evaluator::{FeatureBasedPlacementEvaluator, PlacementEvaluator},
/// };
///
/// // Only penalize height.
/// let evaluator =
///     FeatureBasedPlacementEvaluator::new(FeatureWeights::new([0.0, 0.0, 0.0, 0.0, -1.0, 0.0]));
///
/// let board = Board::new();
/// let flat = PlacementAnalysis::simulate(&board, PieceKind::I, Move::new(1, 0)).unwrap();
/// let tall = PlacementAnalysis::simulate(&board, PieceKind::I, Move::new(0, 0)).unwrap();
/// assert!(evaluator.evaluate_placement(&flat) > evaluator.evaluate_placement(&tall));
/// ```
#[derive(Debug, Clone)]
pub struct FeatureBasedPlacementEvaluator {
    weights: FeatureWeights,
}

impl FeatureBasedPlacementEvaluator {
    #[must_use]
    pub fn new(weights: FeatureWeights) -> Self {
        Self { weights }
    }

    #[must_use]
    pub fn weights(&self) -> &FeatureWeights {
        &self.weights
    }
}

impl PlacementEvaluator for FeatureBasedPlacementEvaluator {
    #[inline]
    fn evaluate_placement(&self, analysis: &PlacementAnalysis) -> f64 {
        iter::zip(ALL_BOARD_FEATURES, self.weights.as_array())
            .map(|(f, w)| f.extract(analysis) * w)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use tetrevo_engine::{Board, Move, PieceKind};

    use super::*;

    #[test]
    fn test_score_is_weighted_sum() {
        let board = Board::new();
        let analysis = PlacementAnalysis::simulate(&board, PieceKind::O, Move::new(0, 0)).unwrap();
        // O at the left wall: rows 0 and 1 each have one transition after the O,
        // plus the right wall edge; 19 empty rows have 2.
        let row_transitions = f64::from(analysis.board_analysis().row_transitions());
        let evaluator =
            FeatureBasedPlacementEvaluator::new(FeatureWeights::new([2.0, 0.0, 0.0, 0.0, 3.0, 0.0]));
        assert_eq!(
            evaluator.evaluate_placement(&analysis),
            2.0 * row_transitions + 3.0 * 2.0
        );
        assert_eq!(row_transitions, 2.0 + 2.0 + 2.0 * 19.0);
    }

    #[test]
    fn test_reward_term_prefers_clears() {
        let board: Board = "#########.".parse().unwrap();
        let evaluator =
            FeatureBasedPlacementEvaluator::new(FeatureWeights::new([0.0, 0.0, 0.0, 0.0, 0.0, 1.0]));
        let clear = PlacementAnalysis::simulate(&board, PieceKind::I, Move::new(0, 9)).unwrap();
        let no_clear = PlacementAnalysis::simulate(&board, PieceKind::I, Move::new(0, 0)).unwrap();
        assert_eq!(evaluator.evaluate_placement(&clear), 1.0);
        assert_eq!(evaluator.evaluate_placement(&no_clear), 0.0);
    }
}
