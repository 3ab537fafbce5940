use std::{cell::OnceCell, iter};

use tetrevo_engine::Board;

/// Shape metrics of a board, each computed on first access.
///
/// Walls and the floor count as filled for transition and well purposes.
#[derive(Debug)]
pub struct BoardAnalysis {
    board: Board,
    num_holes: OnceCell<u32>,
    row_transitions: OnceCell<u32>,
    column_transitions: OnceCell<u32>,
    wells: OnceCell<u32>,
}

impl BoardAnalysis {
    #[must_use]
    pub fn from_board(board: Board) -> Self {
        Self {
            board,
            num_holes: OnceCell::new(),
            row_transitions: OnceCell::new(),
            column_transitions: OnceCell::new(),
            wells: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns `top` of every column.
    #[must_use]
    pub fn column_heights(&self) -> &[usize; Board::COLS] {
        self.board.top()
    }

    #[must_use]
    pub fn column_height(&self, col: usize) -> usize {
        self.board.top()[col]
    }

    /// Returns `|top[col] - top[col + 1]|`.
    #[must_use]
    pub fn column_height_diff(&self, col: usize) -> usize {
        let top = self.board.top();
        top[col].abs_diff(top[col + 1])
    }

    /// Iterates [`column_height_diff`](Self::column_height_diff) for every adjacent pair.
    pub fn column_height_diffs(&self) -> impl Iterator<Item = usize> + '_ {
        let top = self.board.top();
        iter::zip(top, &top[1..]).map(|(a, b)| a.abs_diff(*b))
    }

    #[must_use]
    pub fn max_height(&self) -> usize {
        self.board.top().iter().copied().max().unwrap_or(0)
    }

    /// Empty cells below the top of their column (not yet scaled).
    #[must_use]
    pub fn num_holes(&self) -> u32 {
        *self.num_holes.get_or_init(|| {
            let mut holes = 0;
            for (col, &top) in self.board.top().iter().enumerate() {
                holes += (0..top).filter(|&row| !self.board.is_filled(row, col)).count();
            }
            count(holes)
        })
    }

    /// Filled/empty changes along every row, with a filled cell before column 0
    /// and after the last column.
    #[must_use]
    pub fn row_transitions(&self) -> u32 {
        *self.row_transitions.get_or_init(|| {
            let mut transitions = 0;
            for row in self.board.rows() {
                let mut last_filled = true;
                for &cell in row {
                    let filled = cell != 0;
                    if filled != last_filled {
                        transitions += 1;
                    }
                    last_filled = filled;
                }
                if !last_filled {
                    transitions += 1;
                }
            }
            transitions
        })
    }

    /// Filled/empty changes down every column from its top, plus one for a non-empty
    /// column whose bottom cell is empty.
    #[must_use]
    pub fn column_transitions(&self) -> u32 {
        *self.column_transitions.get_or_init(|| {
            let mut transitions = 0;
            for (col, &top) in self.board.top().iter().enumerate() {
                if top == 0 {
                    continue;
                }
                for row in 0..top - 1 {
                    if self.board.is_filled(row, col) != self.board.is_filled(row + 1, col) {
                        transitions += 1;
                    }
                }
                if !self.board.is_filled(0, col) {
                    transitions += 1;
                }
            }
            transitions
        })
    }

    /// Sum of `h(h+1)/2` over every run of `h` stacked well cells.
    ///
    /// A well cell is empty, lies above its column's stack, and has both horizontal
    /// neighbours filled.
    #[must_use]
    pub fn wells(&self) -> u32 {
        *self.wells.get_or_init(|| {
            let mut sum = 0;
            for col in 0..Board::COLS {
                let mut run = 0;
                for row in (self.board.top()[col]..Board::ROWS).rev() {
                    if self.is_wall_or_filled(row, col.checked_sub(1))
                        && self.is_wall_or_filled(row, Some(col + 1))
                    {
                        run += 1;
                    } else {
                        sum += triangular(run);
                        run = 0;
                    }
                }
                sum += triangular(run);
            }
            sum
        })
    }

    fn is_wall_or_filled(&self, row: usize, col: Option<usize>) -> bool {
        match col {
            Some(col) if col < Board::COLS => self.board.is_filled(row, col),
            _ => true,
        }
    }
}

fn triangular(h: u32) -> u32 {
    h * (h + 1) / 2
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
