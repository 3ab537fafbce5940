//! Heuristic move selection for the Tetris agent.
//!
//! The crate is layered the same way a game is played:
//!
//! ```text
//! Session Evaluation (fitness: rows cleared over whole games)
//!     ↓ uses
//! Turn Evaluation (pick the best legal move, greedy or 2-ply)
//!     ↓ uses
//! Placement Evaluation (weighted sum of board features)
//! ```
//!
//! # Modules
//!
//! - [`board_analysis`] - lazily computed board metrics (holes, transitions, wells, heights)
//! - [`board_feature`] - the six weighted features and their canonical order
//! - [`feature_weights`] - the weight vector, one coefficient per feature
//! - [`placement_analysis`] - a board after one or two simulated placements
//! - [`placement_evaluator`] - scores a placement as `Σ wᵢ·fᵢ`
//! - [`turn_evaluator`] - chooses the arg-max move, and drives whole games
//! - [`session_evaluator`] - fitness of a weight vector
//!
//! # Example
//!
//! ```
//! use tetrevo_engine::{GameState, PieceSeed};
//! use tetrevo_evaluator::{
//!     feature_weights::FeatureWeights,
//!     placement_evaluator::FeatureBasedPlacementEvaluator,
//!     turn_evaluator::{SearchDepth, TurnEvaluator},
//! };
//!
//! let evaluator = FeatureBasedPlacementEvaluator::new(FeatureWeights::DEFAULT);
//! let turn_evaluator = TurnEvaluator::new(Box::new(evaluator), SearchDepth::Greedy);
//!
//! let mut game = GameState::with_seed(PieceSeed::from(3));
//! let stats = turn_evaluator.play_session(&mut game, 200);
//!
//! assert!(stats.placements() <= 200);
//! ```

pub mod board_analysis;
pub mod board_feature;
pub mod feature_weights;
pub mod placement_analysis;
pub mod placement_evaluator;
pub mod session_evaluator;
pub mod turn_evaluator;
