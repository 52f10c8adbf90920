//! The 21 Blokus pieces and their orientations.

use std::fmt;
use std::sync::OnceLock;

use crate::point::Point;

/// A cell offset inside a normalized piece shape. Minimum x and y are 0,
/// cells are sorted.
pub type Shape = Vec<(u8, u8)>;

const NAMES: [&str; 21] = [
    "1", "2", "I3", "V3", "I4", "L4", "O4", "T4", "Z4", "F", "I5", "L5", "N", "P", "T5", "U",
    "V5", "W", "X", "Y", "Z5",
];

const SHAPES: [&[(i32, i32)]; 21] = [
    &[(0, 0)],
    &[(0, 0), (1, 0)],
    &[(0, 0), (1, 0), (2, 0)],
    &[(0, 0), (0, 1), (1, 1)],
    &[(0, 0), (1, 0), (2, 0), (3, 0)],
    &[(0, 0), (0, 1), (0, 2), (1, 2)],
    &[(0, 0), (1, 0), (0, 1), (1, 1)],
    &[(0, 0), (1, 0), (2, 0), (1, 1)],
    &[(0, 0), (1, 0), (1, 1), (2, 1)],
    &[(1, 0), (2, 0), (0, 1), (1, 1), (1, 2)],
    &[(0, 0), (1, 0), (2, 0), (3, 0), (4, 0)],
    &[(0, 0), (0, 1), (0, 2), (0, 3), (1, 3)],
    &[(0, 0), (0, 1), (1, 1), (1, 2), (1, 3)],
    &[(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)],
    &[(0, 0), (1, 0), (2, 0), (1, 1), (1, 2)],
    &[(0, 0), (2, 0), (0, 1), (1, 1), (2, 1)],
    &[(0, 0), (0, 1), (0, 2), (1, 2), (2, 2)],
    &[(0, 0), (0, 1), (1, 1), (1, 2), (2, 2)],
    &[(1, 0), (0, 1), (1, 1), (2, 1), (1, 2)],
    &[(1, 0), (0, 1), (1, 1), (1, 2), (1, 3)],
    &[(0, 0), (1, 0), (1, 1), (1, 2), (2, 2)],
];

/// One of the 21 pieces each color owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Piece(u8);

impl Piece {
    /// Number of distinct pieces per color.
    pub const COUNT: usize = 21;

    /// Total squares covered by a full set.
    pub const TOTAL_SQUARES: u32 = 89;

    /// The monomino.
    pub const MONOMINO: Piece = Piece(0);

    /// Create a piece from its index, returning `None` if out of range.
    pub const fn new(index: u8) -> Option<Piece> {
        if (index as usize) < Self::COUNT {
            Some(Piece(index))
        } else {
            None
        }
    }

    /// Iterate over all pieces, largest index (and largest pieces) last.
    pub fn all() -> impl DoubleEndedIterator<Item = Piece> {
        (0..Self::COUNT as u8).map(Piece)
    }

    /// Return the index (0..21).
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Conventional short name ("1", "V3", "X", ...).
    pub const fn name(self) -> &'static str {
        NAMES[self.0 as usize]
    }

    /// Number of squares this piece covers.
    #[inline]
    pub const fn size(self) -> usize {
        SHAPES[self.0 as usize].len()
    }

    /// Distinct orientations (rotations and reflections), each normalized.
    pub fn orientations(self) -> &'static [Shape] {
        &orientation_table()[self.0 as usize]
    }

    /// Find the piece whose shape the given points form, in any orientation.
    pub fn identify(points: &[Point]) -> Option<Piece> {
        if points.is_empty() {
            return None;
        }
        let cells: Vec<(i32, i32)> = points
            .iter()
            .map(|p| (p.x() as i32, p.y() as i32))
            .collect();
        let shape = normalize(&cells);
        Piece::all().find(|piece| {
            piece.size() == shape.len() && piece.orientations().contains(&shape)
        })
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn orientation_table() -> &'static Vec<Vec<Shape>> {
    static TABLE: OnceLock<Vec<Vec<Shape>>> = OnceLock::new();
    TABLE.get_or_init(|| {
        SHAPES
            .iter()
            .map(|cells| {
                let mut shapes: Vec<Shape> = Vec::with_capacity(8);
                for transform in 0..8 {
                    let moved: Vec<(i32, i32)> =
                        cells.iter().map(|&c| apply_transform(c, transform)).collect();
                    let shape = normalize(&moved);
                    if !shapes.contains(&shape) {
                        shapes.push(shape);
                    }
                }
                shapes
            })
            .collect()
    })
}

/// The eight symmetries of the square: four rotations, each optionally mirrored.
fn apply_transform((x, y): (i32, i32), transform: u8) -> (i32, i32) {
    let (x, y) = if transform >= 4 { (-x, y) } else { (x, y) };
    match transform % 4 {
        0 => (x, y),
        1 => (-y, x),
        2 => (-x, -y),
        _ => (y, -x),
    }
}

fn normalize(cells: &[(i32, i32)]) -> Shape {
    let min_x = cells.iter().map(|c| c.0).min().unwrap_or(0);
    let min_y = cells.iter().map(|c| c.1).min().unwrap_or(0);
    let mut shape: Shape = cells
        .iter()
        .map(|&(x, y)| ((x - min_x) as u8, (y - min_y) as u8))
        .collect();
    shape.sort_unstable();
    shape
}
