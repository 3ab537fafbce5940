use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tetrevo_engine::{GameStats, PieceSeed};
use tetrevo_evaluator::turn_evaluator::SearchDepth;

/// Outcome of an `auto-play` run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayRecord {
    pub recorded_at: DateTime<Utc>,
    /// Weights keyed by feature id.
    pub weights: BTreeMap<String, f64>,
    pub depth: SearchDepth,
    pub move_cap: usize,
    pub games: Vec<GameRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    /// Seed of the piece sequence; replaying it with the same weights repeats the game.
    pub seed: PieceSeed,
    /// `true` if the game topped out, `false` if it reached the move cap.
    pub lost: bool,
    pub stats: GameStats,
    /// Final board, `#` filled and `.` empty, top row first.
    pub final_board: Vec<String>,
}
