//! Piece colors. Up to four colors take turns in a fixed cyclic order.

use std::fmt;
use std::str::FromStr;

use crate::error::ColorError;

/// A Blokus color, `0..4`.
///
/// Displayed as `1`..`4`. The first two colors also parse from `b`/`w`
/// and `black`/`white`, which is how two-color records name them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Color(u8);

impl Color {
    /// Maximum number of colors in any variant.
    pub const COUNT: usize = 4;

    /// All colors in index order.
    pub const ALL: [Color; 4] = [Color(0), Color(1), Color(2), Color(3)];

    /// Return the index (0..4).
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Return the color that plays after this one when `num_colors` take turns.
    #[inline]
    pub const fn next(self, num_colors: usize) -> Color {
        let i = self.0 + 1;
        if i as usize >= num_colors {
            Color(0)
        } else {
            Color(i)
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0 + 1)
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Color, ColorError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "b" | "black" => Ok(Color(0)),
            "2" | "w" | "white" => Ok(Color(1)),
            "3" => Ok(Color(2)),
            "4" => Ok(Color(3)),
            _ => Err(ColorError {
                found: s.to_string(),
            }),
        }
    }
}
