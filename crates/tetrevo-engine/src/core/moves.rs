use std::sync::LazyLock;

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use super::{board::Board, piece::PieceKind};

/// Largest legal move list of any piece (J, L and T: 9 + 8 + 9 + 8).
pub const MAX_LEGAL_MOVES: usize = 34;

/// A placement: which orientation of the piece to drop, and the leftmost column it occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    orientation: u8,
    slot: u8,
}

impl Move {
    /// Creates a move from an orientation index and a slot.
    ///
    /// No legality check happens here; [`Board::apply`] rejects moves that do not fit.
    #[must_use]
    pub const fn new(orientation: u8, slot: u8) -> Self {
        Self { orientation, slot }
    }

    #[must_use]
    pub fn orientation(self) -> usize {
        usize::from(self.orientation)
    }

    #[must_use]
    pub fn slot(self) -> usize {
        usize::from(self.slot)
    }
}

static LEGAL_MOVES: LazyLock<[ArrayVec<Move, MAX_LEGAL_MOVES>; PieceKind::LEN]> =
    LazyLock::new(|| PieceKind::ALL.map(enumerate_moves));

#[expect(clippy::cast_possible_truncation)]
fn enumerate_moves(kind: PieceKind) -> ArrayVec<Move, MAX_LEGAL_MOVES> {
    let mut moves = ArrayVec::new();
    for (orientation, shape) in kind.orientations().iter().enumerate() {
        for slot in 0..=(Board::COLS - shape.width()) {
            moves.push(Move::new(orientation as u8, slot as u8));
        }
    }
    moves
}

/// Returns every legal placement of `kind` on a board [`Board::COLS`] columns wide.
///
/// The list is ordered orientation-major, slot-minor and never changes during the
/// process lifetime, so a position in it can be used as a stable move index.
///
/// # Examples
///
/// ```
/// use tetrevo_engine::{Move, PieceKind, legal_moves};
///
/// let moves = legal_moves(PieceKind::O);
/// assert_eq!(moves.len(), 9);
/// assert_eq!(moves[0], Move::new(0, 0));
/// assert_eq!(moves[8], Move::new(0, 8));
/// ```
#[must_use]
pub fn legal_moves(kind: PieceKind) -> &'static [Move] {
    &LEGAL_MOVES[kind as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_count_matches_orientation_widths() {
        for kind in PieceKind::ALL {
            let expected: usize = kind
                .orientations()
                .iter()
                .map(|o| Board::COLS + 1 - o.width())
                .sum();
            assert_eq!(legal_moves(kind).len(), expected, "{kind:?}");
        }
    }

    #[test]
    fn test_known_move_counts() {
        let counts = PieceKind::ALL.map(|kind| legal_moves(kind).len());
        assert_eq!(counts, [17, 9, 17, 17, 34, 34, 34]);
        assert_eq!(counts.iter().max().copied(), Some(MAX_LEGAL_MOVES));
    }

    #[test]
    fn test_every_move_fits_on_the_board() {
        for kind in PieceKind::ALL {
            for mv in legal_moves(kind) {
                let shape = kind
                    .orientation(mv.orientation())
                    .expect("orientation must exist");
                assert!(mv.slot() + shape.width() <= Board::COLS);
            }
        }
    }

    #[test]
    fn test_order_is_orientation_major() {
        let moves = legal_moves(PieceKind::I);
        // vertical I: slots 0..=9, then horizontal I: slots 0..=6
        assert!(moves[..10].iter().all(|m| m.orientation() == 0));
        assert!(moves[10..].iter().all(|m| m.orientation() == 1));
        let slots: Vec<_> = moves[10..].iter().map(|m| m.slot()).collect();
        assert_eq!(slots, [0, 1, 2, 3, 4, 5, 6]);
    }
}
