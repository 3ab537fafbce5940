use serde::{Deserialize, Serialize};

/// Per-game counters: placements made and rows cleared.
///
/// # Example
///
/// ```
/// use tetrevo_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_placement(0);
/// stats.complete_placement(4);
///
/// assert_eq!(stats.placements(), 2);
/// assert_eq!(stats.total_rows_cleared(), 4);
/// assert_eq!(stats.rows_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    placements: usize,
    total_rows_cleared: usize,
    rows_cleared_counter: [usize; 5],
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            placements: 0,
            total_rows_cleared: 0,
            rows_cleared_counter: [0; 5],
        }
    }

    /// Returns the number of pieces placed without topping out.
    #[must_use]
    pub const fn placements(&self) -> usize {
        self.placements
    }

    #[must_use]
    pub const fn total_rows_cleared(&self) -> usize {
        self.total_rows_cleared
    }

    /// Returns how many placements cleared 0, 1, 2, 3 and 4 rows.
    #[must_use]
    pub const fn rows_cleared_counter(&self) -> &[usize; 5] {
        &self.rows_cleared_counter
    }

    /// Records one successful placement.
    pub const fn complete_placement(&mut self, rows_cleared: usize) {
        self.placements += 1;
        self.total_rows_cleared += rows_cleared;
        if rows_cleared < self.rows_cleared_counter.len() {
            self.rows_cleared_counter[rows_cleared] += 1;
        }
    }
}
