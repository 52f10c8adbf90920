//! Error types for parsing and validating Blokus moves.

use crate::color::Color;
use crate::piece::Piece;
use crate::point::Point;

/// A color name could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color: \"{found}\"")]
pub struct ColorError {
    /// The rejected text.
    pub found: String,
}

/// A variant name could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown game variant: \"{found}\"")]
pub struct VariantError {
    /// The rejected text.
    pub found: String,
}

/// A point could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid point: \"{found}\"")]
pub struct PointError {
    /// The rejected text.
    pub found: String,
}

/// Errors from building a move or checking it against a board.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    /// A point in the move text could not be parsed.
    #[error(transparent)]
    InvalidPoint(#[from] PointError),
    /// The move has no points.
    #[error("move has no points")]
    Empty,
    /// The same point appears twice.
    #[error("point {0} appears twice")]
    DuplicatePoint(Point),
    /// The points do not form one of the 21 pieces.
    #[error("points {points} do not form a piece")]
    UnknownShape {
        /// The points as written.
        points: String,
    },
    /// The color does not take part in this variant.
    #[error("color {0} is not in play")]
    ColorNotInPlay(Color),
    /// A point lies outside the board.
    #[error("point {0} is off the board")]
    OffBoard(Point),
    /// A point is already covered.
    #[error("point {0} is occupied")]
    Occupied(Point),
    /// The color has already placed this piece.
    #[error("piece {0} already played")]
    PieceUsed(Piece),
    /// The piece shares an edge with a piece of the same color.
    #[error("piece touches its own color at {0}")]
    EdgeContact(Point),
    /// The piece has no corner contact with its own color.
    #[error("piece has no corner contact with its own color")]
    NoCornerContact,
    /// The first piece of a color does not cover its starting point.
    #[error("first piece must cover {0}")]
    MissesStartingPoint(Point),
    /// A point to clear is not covered by the piece being removed.
    #[error("point {0} is not covered by that piece")]
    NotCovered(Point),
}
