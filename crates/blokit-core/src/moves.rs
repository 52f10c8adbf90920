//! Moves: a piece placement, and a placement attributed to a color.

use std::fmt;
use std::str::FromStr;

use crate::color::Color;
use crate::error::MoveError;
use crate::piece::Piece;
use crate::point::Point;

/// A piece placement: the sorted set of points it covers, or a pass.
///
/// Written as a comma-separated point list (`e9,d10,e10,f10,e11`), in any
/// order; the stored order is canonical, so two moves covering the same
/// points compare equal. A pass covers no points and is written `pass`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    piece: Option<Piece>,
    points: Vec<Point>,
}

impl Move {
    /// Build a move from the points it covers.
    ///
    /// Fails if the points are empty, repeat, or do not form a piece.
    /// Board legality is not checked here.
    pub fn new(mut points: Vec<Point>) -> Result<Move, MoveError> {
        if points.is_empty() {
            return Err(MoveError::Empty);
        }
        points.sort_unstable();
        if let Some(w) = points.windows(2).find(|w| w[0] == w[1]) {
            return Err(MoveError::DuplicatePoint(w[0]));
        }
        let piece = Piece::identify(&points).ok_or_else(|| MoveError::UnknownShape {
            points: join_points(&points),
        })?;
        Ok(Move {
            piece: Some(piece),
            points,
        })
    }

    /// The move that places nothing and hands the turn on.
    pub const fn pass() -> Move {
        Move {
            piece: None,
            points: Vec::new(),
        }
    }

    /// Build a move whose points are already known to be a sorted
    /// placement of `piece`. Used by move generation.
    pub(crate) fn from_parts(piece: Piece, points: Vec<Point>) -> Move {
        debug_assert!(points.windows(2).all(|w| w[0] < w[1]));
        Move {
            piece: Some(piece),
            points,
        }
    }

    #[inline]
    pub fn is_pass(&self) -> bool {
        self.piece.is_none()
    }

    /// The piece being placed; `None` for a pass.
    #[inline]
    pub fn piece(&self) -> Option<Piece> {
        self.piece
    }

    /// The covered points, sorted. Empty for a pass.
    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }
}

fn join_points(points: &[Point]) -> String {
    points
        .iter()
        .map(Point::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_pass() {
            return f.write_str("pass");
        }
        f.write_str(&join_points(&self.points))
    }
}

impl FromStr for Move {
    type Err = MoveError;

    fn from_str(s: &str) -> Result<Move, MoveError> {
        if s.trim().eq_ignore_ascii_case("pass") {
            return Ok(Move::pass());
        }
        let points = s
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::parse::<Point>)
            .collect::<Result<Vec<_>, _>>()?;
        Move::new(points)
    }
}

/// A move together with the color that plays it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColorMove {
    /// Color placing the piece.
    pub color: Color,
    /// The placement.
    pub mv: Move,
}

impl ColorMove {
    /// Pair a color with a move.
    pub fn new(color: Color, mv: Move) -> ColorMove {
        ColorMove { color, mv }
    }
}

impl fmt::Display for ColorMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.color, self.mv)
    }
}
