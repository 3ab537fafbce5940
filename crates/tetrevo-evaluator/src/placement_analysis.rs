//! A board after one or two simulated placements.
//!
//! Simulation always happens on a private copy: the caller's board is never
//! modified, so any number of candidate moves can be tried from the same state.

use tetrevo_engine::{ApplyError, Board, Move, PieceKind};

use crate::board_analysis::BoardAnalysis;

#[derive(Debug)]
pub struct PlacementAnalysis {
    rows_cleared: u32,
    board_analysis: BoardAnalysis,
}

impl PlacementAnalysis {
    /// Applies `mv` to a copy of `board` and analyzes the result (after clearing).
    ///
    /// # Errors
    ///
    /// Whatever [`Board::apply`] reports; a placement that tops out is an error.
    pub fn simulate(board: &Board, kind: PieceKind, mv: Move) -> Result<Self, ApplyError> {
        let mut board = board.clone();
        let cleared = board.apply(kind, mv)?;
        Ok(Self {
            rows_cleared: count(cleared),
            board_analysis: BoardAnalysis::from_board(board),
        })
    }

    /// Simulates a second placement on top of this one.
    ///
    /// The rows cleared of the result cover both placements.
    pub fn then(&self, kind: PieceKind, mv: Move) -> Result<Self, ApplyError> {
        let mut next = Self::simulate(self.board_analysis.board(), kind, mv)?;
        next.rows_cleared += self.rows_cleared;
        Ok(next)
    }

    /// Rows cleared by the simulated placements.
    #[must_use]
    pub fn rows_cleared(&self) -> u32 {
        self.rows_cleared
    }

    #[must_use]
    pub fn board_analysis(&self) -> &BoardAnalysis {
        &self.board_analysis
    }
}

fn count(rows: usize) -> u32 {
    u32::try_from(rows).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulate_leaves_board_untouched() {
        let board = Board::new();
        let analysis = PlacementAnalysis::simulate(&board, PieceKind::O, Move::new(0, 3)).unwrap();
        assert_eq!(board, Board::new());
        assert_eq!(analysis.board_analysis().column_height(3), 2);
        assert_eq!(analysis.rows_cleared(), 0);
    }

    #[test]
    fn test_rows_cleared_accumulate_over_two_plies() {
        let board: Board = "
            ########..
            ########..
        "
        .parse()
        .unwrap();
        let first = PlacementAnalysis::simulate(&board, PieceKind::I, Move::new(0, 8)).unwrap();
        assert_eq!(first.rows_cleared(), 0);
        let second = first.then(PieceKind::I, Move::new(0, 9)).unwrap();
        assert_eq!(second.rows_cleared(), 2);
        assert_eq!(second.board_analysis().board().rows_cleared(), 2);
    }

    #[test]
    fn test_top_out_is_an_error() {
        let mut board = Board::new();
        for _ in 0..5 {
            board.apply(PieceKind::I, Move::new(0, 0)).unwrap();
        }
        let result = PlacementAnalysis::simulate(&board, PieceKind::I, Move::new(0, 0));
        assert_eq!(result.err(), Some(ApplyError::TopOut));
        assert!(!board.is_lost());
    }
}
