use crate::{
    ApplyError,
    core::{
        board::Board,
        moves::{Move, legal_moves},
        piece::PieceKind,
    },
};

use super::{
    game_stats::GameStats,
    piece_generator::{PieceGenerator, PieceSeed},
};

/// One game in progress: the board, the piece to place, and the piece source.
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    next_piece: PieceKind,
    generator: PieceGenerator,
    stats: GameStats,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    #[must_use]
    pub fn new() -> Self {
        Self::from_generator(PieceGenerator::new())
    }

    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self::from_generator(PieceGenerator::with_seed(seed))
    }

    fn from_generator(mut generator: PieceGenerator) -> Self {
        let next_piece = generator.pop_next();
        Self {
            board: Board::new(),
            next_piece,
            generator,
            stats: GameStats::new(),
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the piece the next [`play_move`](Self::play_move) will place.
    #[must_use]
    pub fn next_piece(&self) -> PieceKind {
        self.next_piece
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    /// Legal placements for [`next_piece`](Self::next_piece), in move-index order.
    #[must_use]
    pub fn legal_moves(&self) -> &'static [Move] {
        legal_moves(self.next_piece)
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.board.is_lost()
    }

    /// Places the current piece using the move at `index` of [`legal_moves`](Self::legal_moves).
    ///
    /// On success the rows cleared are returned and a new piece is drawn.
    ///
    /// # Errors
    ///
    /// [`ApplyError::InvalidMove`] if `index` is out of range (the state is unchanged),
    /// otherwise whatever [`Board::apply`] reports.
    pub fn play_move(&mut self, index: usize) -> Result<usize, ApplyError> {
        let mv = *self
            .legal_moves()
            .get(index)
            .ok_or(ApplyError::InvalidMove)?;
        let cleared = self.board.apply(self.next_piece, mv)?;
        self.stats.complete_placement(cleared);
        self.next_piece = self.generator.pop_next();
        Ok(cleared)
    }
}
