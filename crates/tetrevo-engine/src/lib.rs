//! Deterministic Tetris board simulator used by the heuristic agent.
//!
//! The engine is split into two layers:
//!
//! - [`core`] - immutable piece geometry, legal move tables and the [`Board`] simulator
//! - [`engine`] - game-level state: seeded piece generation, the piece to place next,
//!   and per-game statistics
//!
//! Pieces are dropped straight down from above the stack: a placement is fully
//! described by an orientation index and the leftmost column (slot) it occupies.
//! There is no falling-piece control, hold, or rotation system.
//!
//! # Example
//!
//! ```
//! use tetrevo_engine::{Board, Move, PieceKind};
//!
//! let mut board = Board::new();
//! let cleared = board.apply(PieceKind::O, Move::new(0, 0)).unwrap();
//!
//! assert_eq!(cleared, 0);
//! assert_eq!(board.top()[0], 2);
//! assert_eq!(board.top()[1], 2);
//! ```

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Reasons a placement can be rejected by [`Board::apply`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::IsVariant,
)]
pub enum ApplyError {
    /// The piece would rest at or above the top row; the board is now lost.
    #[display("placement reaches the top of the board")]
    TopOut,
    /// The board was already lost before this placement.
    #[display("board has already topped out")]
    BoardTerminal,
    /// The orientation or slot does not exist for this piece.
    #[display("move is not legal for this piece")]
    InvalidMove,
}
