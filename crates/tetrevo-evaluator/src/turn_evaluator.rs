//! Turn evaluation: selecting the move to play for the current piece.
//!
//! Every legal move of the piece is simulated on a private copy of the board and scored
//! by a [`PlacementEvaluator`]; the highest score wins. Moves are scanned in
//! [`legal_moves`] order and compared with a strict `>`, so the first of several equally
//! scored moves is kept.
//!
//! # Search depth
//!
//! - [`SearchDepth::Greedy`] scores the board right after the move.
//! - [`SearchDepth::Lookahead`] assumes nothing about the next piece: for each of the
//!   seven possible pieces it finds the best follow-up placement, and averages those
//!   seven best scores. This costs roughly `7 × 34` extra simulations per candidate.
//!
//! A move that tops out is never selected over one that survives; it scores
//! [`LOSS_SCORE`]. In lookahead mode a next piece that cannot be placed at all
//! contributes the finite [`FOLLOW_UP_LOSS_SCORE`] to the average instead, so moves
//! near the top are still ranked by how many next pieces they leave room for.

use serde::{Deserialize, Serialize};
use tetrevo_engine::{Board, GameState, GameStats, Move, PieceKind, legal_moves};

use crate::{placement_analysis::PlacementAnalysis, placement_evaluator::PlacementEvaluator};

/// Score of a placement that loses the game.
pub const LOSS_SCORE: f64 = f64::NEG_INFINITY;

/// Lookahead contribution of a next piece that has no surviving placement.
///
/// Far below any feature score, and seven of them still sum to a finite value.
pub const FOLLOW_UP_LOSS_SCORE: f64 = -1.0e9;

/// How far ahead the move selector looks.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, derive_more::FromStr,
)]
#[serde(rename_all = "snake_case")]
pub enum SearchDepth {
    /// Score only the placement of the current piece.
    #[default]
    Greedy,
    /// Average the best follow-up over every possible next piece.
    Lookahead,
}

/// Selects the best move for the current piece.
#[derive(Debug)]
pub struct TurnEvaluator<'a> {
    placement_evaluator: Box<dyn PlacementEvaluator + 'a>,
    depth: SearchDepth,
}

impl<'a> TurnEvaluator<'a> {
    #[must_use]
    pub fn new(placement_evaluator: Box<dyn PlacementEvaluator + 'a>, depth: SearchDepth) -> Self {
        Self {
            placement_evaluator,
            depth,
        }
    }

    #[must_use]
    pub fn depth(&self) -> SearchDepth {
        self.depth
    }

    /// Returns the index into [`legal_moves(kind)`](legal_moves) of the best move.
    ///
    /// When every move tops out, index `0` is returned. `board` is not modified.
    #[must_use]
    pub fn select_move(&self, board: &Board, kind: PieceKind) -> usize {
        let mut best: Option<(usize, f64)> = None;
        for (index, &mv) in legal_moves(kind).iter().enumerate() {
            let score = PlacementAnalysis::simulate(board, kind, mv)
                .map_or(LOSS_SCORE, |analysis| self.score_placement(&analysis));
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((index, score));
            }
        }
        best.map_or(0, |(index, _)| index)
    }

    /// Scores a placement that did not lose, according to the search depth.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn score_placement(&self, analysis: &PlacementAnalysis) -> f64 {
        match self.depth {
            SearchDepth::Greedy => self.placement_evaluator.evaluate_placement(analysis),
            SearchDepth::Lookahead => {
                let total: f64 = PieceKind::ALL
                    .iter()
                    .map(|&next| self.best_follow_up(analysis, next))
                    .sum();
                total / PieceKind::LEN as f64
            }
        }
    }

    fn best_follow_up(&self, analysis: &PlacementAnalysis, kind: PieceKind) -> f64 {
        legal_moves(kind)
            .iter()
            .map(|&mv| self.follow_up_score(analysis, kind, mv))
            .fold(FOLLOW_UP_LOSS_SCORE, f64::max)
    }

    fn follow_up_score(&self, analysis: &PlacementAnalysis, kind: PieceKind, mv: Move) -> f64 {
        analysis.then(kind, mv).map_or(FOLLOW_UP_LOSS_SCORE, |next| {
            self.placement_evaluator.evaluate_placement(&next)
        })
    }

    /// Plays `game` until it is lost or `move_cap` pieces have been placed.
    #[must_use]
    pub fn play_session(&self, game: &mut GameState, move_cap: usize) -> GameStats {
        for _ in 0..move_cap {
            if game.is_over() {
                break;
            }
            let index = self.select_move(game.board(), game.next_piece());
            if game.play_move(index).is_err() {
                break;
            }
        }
        game.stats().clone()
    }
}
