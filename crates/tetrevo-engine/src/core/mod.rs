pub use self::{board::*, moves::*, piece::*};

pub(crate) mod board;
pub(crate) mod moves;
pub(crate) mod piece;
