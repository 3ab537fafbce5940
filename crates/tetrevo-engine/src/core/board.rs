use std::{fmt, str::FromStr};

use crate::ApplyError;

use super::{moves::Move, piece::PieceKind};

/// Error returned when parsing a [`Board`] from its text form fails.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseBoardError {
    #[display("board has {found} rows, at most {} allowed", Board::ROWS)]
    TooManyRows { found: usize },
    #[display("row {line} has {found} columns, expected {}", Board::COLS)]
    WrongWidth { line: usize, found: usize },
    #[display("unexpected character {found:?} in row {line}")]
    InvalidCell { line: usize, found: char },
}

/// Game board simulator.
///
/// Row 0 is the bottom of the well. Every cell holds `0` when empty, or the turn
/// number of the placement that filled it. `top[c]` is one past the highest filled
/// cell of column `c` (so an empty column has `top[c] == 0`); cells below it may be
/// holes.
///
/// Once a placement tops out the board is lost and refuses every further move.
///
/// # Text form
///
/// [`Display`](fmt::Display) and [`FromStr`] use one line per row, highest row
/// first, with `#` for filled and `.` for empty cells. Parsing accepts fewer than
/// [`Board::ROWS`] lines; missing rows at the top are empty.
///
/// ```
/// use tetrevo_engine::Board;
///
/// let board: Board = "
///     #.........
///     ###........
/// ".parse().unwrap();
///
/// assert_eq!(board.top()[0], 2);
/// assert_eq!(board.top()[1], 1);
/// assert_eq!(board.top()[2], 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [[u32; Board::COLS]; Board::ROWS],
    top: [usize; Board::COLS],
    turn: u32,
    rows_cleared: u32,
    lost: bool,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Number of rows, including the row that triggers a top-out.
    pub const ROWS: usize = 21;
    /// Number of columns.
    pub const COLS: usize = 10;

    /// Creates an empty board.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cells: [[0; Self::COLS]; Self::ROWS],
            top: [0; Self::COLS],
            turn: 0,
            rows_cleared: 0,
            lost: false,
        }
    }

    /// Returns all rows, bottom row first.
    #[must_use]
    pub fn rows(&self) -> &[[u32; Self::COLS]; Self::ROWS] {
        &self.cells
    }

    /// Returns the turn id stored in a cell, `0` if empty.
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> u32 {
        self.cells[row][col]
    }

    #[must_use]
    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        self.cells[row][col] != 0
    }

    /// Returns the per-column height index (one past the highest filled cell).
    #[must_use]
    pub fn top(&self) -> &[usize; Self::COLS] {
        &self.top
    }

    /// Returns the number of `apply` calls that reached the board, including the losing one.
    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Returns the total number of rows cleared since the board was created.
    #[must_use]
    pub fn rows_cleared(&self) -> u32 {
        self.rows_cleared
    }

    #[must_use]
    pub fn is_lost(&self) -> bool {
        self.lost
    }

    /// Drops a piece and returns the number of rows it cleared.
    ///
    /// The piece falls straight down at `mv.slot()` until it rests on the stack.
    /// Full rows among the ones the piece touched are removed, and every cell above
    /// a removed row moves down by one.
    ///
    /// # Errors
    ///
    /// - [`ApplyError::BoardTerminal`] if the board is already lost; nothing changes.
    /// - [`ApplyError::InvalidMove`] if the orientation does not exist or the piece
    ///   would stick out on the right; nothing changes.
    /// - [`ApplyError::TopOut`] if the piece would reach the top row. The turn counter
    ///   advances and the board becomes lost, but no cell is written.
    pub fn apply(&mut self, kind: PieceKind, mv: Move) -> Result<usize, ApplyError> {
        if self.lost {
            return Err(ApplyError::BoardTerminal);
        }
        let shape = kind
            .orientation(mv.orientation())
            .ok_or(ApplyError::InvalidMove)?;
        let slot = mv.slot();
        if slot + shape.width() > Self::COLS {
            return Err(ApplyError::InvalidMove);
        }

        self.turn += 1;

        let landing = std::iter::zip(&self.top[slot..], shape.bottom())
            .map(|(&top, &bottom)| top.saturating_sub(usize::from(bottom)))
            .max()
            .unwrap_or(0);

        if landing + shape.height() >= Self::ROWS {
            self.lost = true;
            return Err(ApplyError::TopOut);
        }

        for (dx, (&bottom, &top)) in std::iter::zip(shape.bottom(), shape.top()).enumerate() {
            let col = slot + dx;
            for row in &mut self.cells[landing + usize::from(bottom)..landing + usize::from(top)] {
                row[col] = self.turn;
            }
            self.top[col] = landing + usize::from(top);
        }

        // Top-down, so removing a row never shifts one that is still to be checked.
        let mut cleared: usize = 0;
        for row in (landing..landing + shape.height()).rev() {
            if self.cells[row].iter().all(|&cell| cell != 0) {
                self.remove_row(row);
                cleared += 1;
            }
        }

        // At most 4 rows per placement.
        self.rows_cleared += u32::try_from(cleared).unwrap_or(u32::MAX);
        Ok(cleared)
    }

    fn remove_row(&mut self, row: usize) {
        for col in 0..Self::COLS {
            let top = self.top[col];
            for r in row..top - 1 {
                self.cells[r][col] = self.cells[r + 1][col];
            }
            self.cells[top - 1][col] = 0;

            let mut top = top - 1;
            while top > 0 && self.cells[top - 1][col] == 0 {
                top -= 1;
            }
            self.top[col] = top;
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.iter().rev() {
            for &cell in row {
                f.write_str(if cell == 0 { "." } else { "#" })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = ParseBoardError;

    /// Parses the text form; filled cells are stamped with turn id 1.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if lines.len() > Self::ROWS {
            return Err(ParseBoardError::TooManyRows { found: lines.len() });
        }

        let mut board = Self::new();
        for (line, text) in lines.iter().enumerate() {
            let width = text.chars().count();
            if width != Self::COLS {
                return Err(ParseBoardError::WrongWidth { line, found: width });
            }
            let row = lines.len() - 1 - line;
            for (col, ch) in text.chars().enumerate() {
                match ch {
                    '.' => {}
                    '#' => {
                        board.cells[row][col] = 1;
                        board.top[col] = board.top[col].max(row + 1);
                    }
                    found => return Err(ParseBoardError::InvalidCell { line, found }),
                }
            }
        }
        Ok(board)
    }
}
