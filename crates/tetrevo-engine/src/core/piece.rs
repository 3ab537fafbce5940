use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// Enum representing the type of piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// S-piece.
    S = 2,
    /// Z-piece.
    Z = 3,
    /// J-piece.
    J = 4,
    /// L-piece.
    L = 5,
    /// T-piece.
    T = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    /// Every piece kind, in discriminant order.
    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
        PieceKind::T,
    ];

    /// Returns the geometry of every orientation of this piece.
    ///
    /// The slice has 1, 2 or 4 entries and its order defines the orientation index
    /// used by [`Move`](super::Move).
    #[must_use]
    pub fn orientations(self) -> &'static [Orientation] {
        PIECE_ORIENTATIONS[self as usize]
    }

    /// Returns the geometry of one orientation, or `None` if the index does not exist.
    #[must_use]
    pub fn orientation(self, index: usize) -> Option<&'static Orientation> {
        self.orientations().get(index)
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use tetrevo_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::T => 'T',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use tetrevo_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('O'), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            'T' => Some(PieceKind::T),
            _ => None,
        }
    }
}

/// Column profile of a piece in one orientation.
///
/// Rows are counted upward from the lowest cell of the piece. For every column
/// `dx` the piece spans, the filled cells are exactly the rows
/// `bottom[dx]..top[dx]` (tetromino columns have no gaps).
///
/// # Example
///
/// The J-piece in its first orientation:
///
/// ```text
///  . #      bottom = [0, 0]
///  . #      top    = [1, 3]
///  # #
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Orientation {
    width: u8,
    height: u8,
    bottom: [u8; 4],
    top: [u8; 4],
}

impl Orientation {
    const fn new(width: u8, height: u8, bottom: [u8; 4], top: [u8; 4]) -> Self {
        Self {
            width,
            height,
            bottom,
            top,
        }
    }

    /// Number of columns spanned.
    #[must_use]
    pub fn width(&self) -> usize {
        usize::from(self.width)
    }

    /// Number of rows spanned.
    #[must_use]
    pub fn height(&self) -> usize {
        usize::from(self.height)
    }

    /// Row offset of the lowest filled cell, per spanned column.
    #[must_use]
    pub fn bottom(&self) -> &[u8] {
        &self.bottom[..self.width()]
    }

    /// Row offset one past the highest filled cell, per spanned column.
    #[must_use]
    pub fn top(&self) -> &[u8] {
        &self.top[..self.width()]
    }
}

const fn o(width: u8, height: u8, bottom: [u8; 4], top: [u8; 4]) -> Orientation {
    Orientation::new(width, height, bottom, top)
}

// Unused trailing profile entries are zero.
const PIECE_ORIENTATIONS: [&[Orientation]; PieceKind::LEN] = [
    // I-piece
    &[o(1, 4, [0, 0, 0, 0], [4, 0, 0, 0]), o(4, 1, [0, 0, 0, 0], [1, 1, 1, 1])],
    // O-piece
    &[o(2, 2, [0, 0, 0, 0], [2, 2, 0, 0])],
    // S-piece
    &[o(3, 2, [0, 0, 1, 0], [1, 2, 2, 0]), o(2, 3, [1, 0, 0, 0], [3, 2, 0, 0])],
    // Z-piece
    &[o(3, 2, [1, 0, 0, 0], [2, 2, 1, 0]), o(2, 3, [0, 1, 0, 0], [2, 3, 0, 0])],
    // J-piece
    &[
        o(2, 3, [0, 0, 0, 0], [1, 3, 0, 0]),
        o(3, 2, [0, 0, 0, 0], [2, 1, 1, 0]),
        o(2, 3, [0, 2, 0, 0], [3, 3, 0, 0]),
        o(3, 2, [1, 1, 0, 0], [2, 2, 2, 0]),
    ],
    // L-piece
    &[
        o(2, 3, [0, 0, 0, 0], [3, 1, 0, 0]),
        o(3, 2, [0, 1, 1, 0], [2, 2, 2, 0]),
        o(2, 3, [2, 0, 0, 0], [3, 3, 0, 0]),
        o(3, 2, [0, 0, 0, 0], [1, 1, 2, 0]),
    ],
    // T-piece
    &[
        o(2, 3, [0, 1, 0, 0], [3, 2, 0, 0]),
        o(3, 2, [1, 0, 1, 0], [2, 2, 2, 0]),
        o(2, 3, [1, 0, 0, 0], [2, 3, 0, 0]),
        o(3, 2, [0, 0, 0, 0], [1, 2, 1, 0]),
    ],
];
