//! Game-level state built on top of the [`Board`](crate::Board) simulator.
//!
//! - [`GameState`] - a board, the piece to place now, and where the following pieces come from
//! - [`GameStats`] - placements and rows cleared over one game
//! - [`PieceGenerator`] - seeded, uniform i.i.d. piece source
//! - [`PieceSeed`] - seed for deterministic piece generation
//!
//! # Example
//!
//! ```
//! use tetrevo_engine::{GameState, PieceSeed};
//!
//! let mut game = GameState::with_seed(PieceSeed::from(42));
//!
//! // Always take the first legal placement until the stack reaches the top.
//! while !game.is_over() {
//!     let _ = game.play_move(0);
//! }
//!
//! assert!(game.stats().placements() > 0);
//! ```

pub use self::{game_state::*, game_stats::*, piece_generator::*};

mod game_state;
mod game_stats;
mod piece_generator;
