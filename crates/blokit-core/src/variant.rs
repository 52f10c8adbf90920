//! Game variants and their geometry.

use std::fmt;
use std::str::FromStr;

use crate::color::Color;
use crate::error::VariantError;
use crate::point::Point;

/// A supported Blokus variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// Four colors, four players, 20x20.
    Classic,
    /// Four colors, two players (each plays two colors), 20x20.
    ClassicTwo,
    /// Two colors, two players, 14x14 with central starting points.
    Duo,
}

impl Variant {
    /// All variants.
    pub const ALL: [Variant; 3] = [Variant::Classic, Variant::ClassicTwo, Variant::Duo];

    /// Number of colors taking turns.
    pub const fn num_colors(self) -> usize {
        match self {
            Variant::Classic | Variant::ClassicTwo => 4,
            Variant::Duo => 2,
        }
    }

    /// Number of players. A player may control several colors.
    pub const fn num_players(self) -> usize {
        match self {
            Variant::Classic => 4,
            Variant::ClassicTwo | Variant::Duo => 2,
        }
    }

    /// Side length of the square board.
    pub const fn board_size(self) -> u8 {
        match self {
            Variant::Classic | Variant::ClassicTwo => 20,
            Variant::Duo => 14,
        }
    }

    /// The point a color's first piece must cover.
    ///
    /// Classic corners go clockwise from the top-left.
    pub const fn starting_point(self, color: Color) -> Point {
        let last = self.board_size() - 1;
        match self {
            Variant::Classic | Variant::ClassicTwo => match color.index() {
                0 => Point::new(0, last),
                1 => Point::new(last, last),
                2 => Point::new(last, 0),
                _ => Point::new(0, 0),
            },
            Variant::Duo => match color.index() {
                0 => Point::new(4, 9),
                _ => Point::new(9, 4),
            },
        }
    }

    /// The player slot that controls `color`.
    pub const fn player_of(self, color: Color) -> usize {
        match self {
            Variant::ClassicTwo => color.index() % 2,
            Variant::Classic | Variant::Duo => color.index(),
        }
    }

    /// Iterate over the colors of this variant in turn order.
    pub fn colors(self) -> impl Iterator<Item = Color> {
        Color::ALL.into_iter().take(self.num_colors())
    }

    /// Game name as written in the `GM` property of a game record.
    pub const fn game_id(self) -> &'static str {
        match self {
            Variant::Classic => "Blokus",
            Variant::ClassicTwo => "Blokus Two-Player",
            Variant::Duo => "Blokus Duo",
        }
    }

    /// Parse a `GM` property value. Case-insensitive, surrounding whitespace ignored.
    pub fn from_game_id(s: &str) -> Option<Variant> {
        let s = s.trim();
        Variant::ALL
            .into_iter()
            .find(|v| v.game_id().eq_ignore_ascii_case(s))
    }

    /// Short identifier without spaces.
    pub const fn id(self) -> &'static str {
        match self {
            Variant::Classic => "classic",
            Variant::ClassicTwo => "classic_2",
            Variant::Duo => "duo",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Variant {
    type Err = VariantError;

    fn from_str(s: &str) -> Result<Variant, VariantError> {
        let lower = s.trim().to_ascii_lowercase();
        Variant::ALL
            .into_iter()
            .find(|v| v.id() == lower)
            .or_else(|| Variant::from_game_id(s))
            .ok_or_else(|| VariantError {
                found: s.to_string(),
            })
    }
}
