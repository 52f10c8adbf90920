//! Board coordinates.

use std::fmt;
use std::str::FromStr;

use crate::error::PointError;

/// A point on the board. `x` is the column from the left, `y` the row from
/// the bottom, both zero-based.
///
/// Written as a column letter followed by a one-based row, so the
/// bottom-left point is `a1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Point {
    x: u8,
    y: u8,
}

impl Point {
    /// Create a point from zero-based coordinates.
    #[inline]
    pub const fn new(x: u8, y: u8) -> Point {
        Point { x, y }
    }

    /// Column, zero-based from the left.
    #[inline]
    pub const fn x(self) -> u8 {
        self.x
    }

    /// Row, zero-based from the bottom.
    #[inline]
    pub const fn y(self) -> u8 {
        self.y
    }

    /// Offset by `(dx, dy)`, returning `None` if either coordinate would
    /// leave the `size`x`size` board.
    #[inline]
    pub fn offset(self, dx: i32, dy: i32, size: u8) -> Option<Point> {
        let x = self.x as i32 + dx;
        let y = self.y as i32 + dy;
        if x < 0 || y < 0 || x >= size as i32 || y >= size as i32 {
            None
        } else {
            Some(Point::new(x as u8, y as u8))
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.x) as char, self.y as u32 + 1)
    }
}

impl FromStr for Point {
    type Err = PointError;

    fn from_str(s: &str) -> Result<Point, PointError> {
        let invalid = || PointError {
            found: s.to_string(),
        };
        let s = s.trim();
        let mut chars = s.chars();
        let column = chars.next().ok_or_else(invalid)?.to_ascii_lowercase();
        if !column.is_ascii_lowercase() {
            return Err(invalid());
        }
        let row: u8 = chars.as_str().parse().map_err(|_| invalid())?;
        if row == 0 || row > 26 {
            return Err(invalid());
        }
        Ok(Point::new(column as u8 - b'a', row - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::Point;

    #[test]
    fn display_bottom_left() {
        assert_eq!(Point::new(0, 0).to_string(), "a1");
        assert_eq!(Point::new(19, 19).to_string(), "t20");
    }

    #[test]
    fn parse_roundtrip() {
        let p: Point = "n14".parse().unwrap();
        assert_eq!(p, Point::new(13, 13));
        assert_eq!(p.to_string(), "n14");
        assert_eq!("E10".parse::<Point>().unwrap(), Point::new(4, 9));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("".parse::<Point>().is_err());
        assert!("a0".parse::<Point>().is_err());
        assert!("1a".parse::<Point>().is_err());
        assert!("a".parse::<Point>().is_err());
    }

    #[test]
    fn offset_respects_board_edges() {
        let p = Point::new(0, 5);
        assert_eq!(p.offset(-1, 0, 14), None);
        assert_eq!(p.offset(1, 1, 14), Some(Point::new(1, 6)));
        assert_eq!(Point::new(13, 13).offset(0, 1, 14), None);
    }
}
