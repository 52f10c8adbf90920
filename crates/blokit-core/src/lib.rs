//! Core Blokus types: board geometry, pieces, moves, and placement rules.

mod board;
mod color;
mod error;
mod moves;
mod piece;
mod point;
mod variant;
mod zobrist;

pub use board::{ALL_PIECES_BONUS, Board, MONOMINO_LAST_BONUS};
pub use color::Color;
pub use error::{ColorError, MoveError, PointError, VariantError};
pub use moves::{ColorMove, Move};
pub use piece::{Piece, Shape};
pub use point::Point;
pub use variant::Variant;
