//! The Blokus board: covered points, pieces played per color, and color to play.

use std::collections::HashSet;
use std::fmt;
use std::ops::ControlFlow;

use crate::color::Color;
use crate::error::MoveError;
use crate::moves::{ColorMove, Move};
use crate::piece::Piece;
use crate::point::Point;
use crate::variant::Variant;
use crate::zobrist;

/// Bonus for placing all 21 pieces.
pub const ALL_PIECES_BONUS: u32 = 15;

/// Extra bonus when the last piece placed was the monomino.
pub const MONOMINO_LAST_BONUS: u32 = 5;

const EDGES: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const CORNERS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Complete Blokus position state.
///
/// Boards are values: [`make_move`](Board::make_move) and
/// [`apply`](Board::apply) return a new board and leave `self` untouched,
/// so a board can be handed to another thread as an immutable snapshot.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    variant: Variant,
    /// Covering color per point, indexed by `y * size + x`.
    cells: Vec<Option<Color>>,
    /// Bit `i` set when the color has played piece `i`.
    used: [u32; Color::COUNT],
    /// Last piece each color played, for the monomino bonus.
    last_piece: [Option<Piece>; Color::COUNT],
    to_play: Color,
    moves_played: u16,
    hash: u64,
}

impl Board {
    /// Return the empty board of a variant, first color to play.
    pub fn new(variant: Variant) -> Board {
        let size = variant.board_size() as usize;
        let mut board = Board {
            variant,
            cells: vec![None; size * size],
            used: [0; Color::COUNT],
            last_piece: [None; Color::COUNT],
            to_play: Color::ALL[0],
            moves_played: 0,
            hash: 0,
        };
        board.hash = zobrist::hash_from_scratch(&board);
        board
    }

    /// The variant being played.
    #[inline]
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Side length of the board.
    #[inline]
    pub fn size(&self) -> u8 {
        self.variant.board_size()
    }

    /// The color whose turn it is.
    #[inline]
    pub fn to_play(&self) -> Color {
        self.to_play
    }

    /// Number of moves played on this board.
    #[inline]
    pub fn moves_played(&self) -> u16 {
        self.moves_played
    }

    /// Zobrist hash of the covered points and the color to play.
    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Return a copy of this board with a different color to play.
    ///
    /// Used to skip colors that cannot move.
    pub fn with_to_play(&self, color: Color) -> Board {
        let mut board = self.clone();
        board.hash ^= zobrist::TO_PLAY[board.to_play.index()] ^ zobrist::TO_PLAY[color.index()];
        board.to_play = color;
        board
    }

    /// Return the color covering `(x, y)`, if any. Coordinates must be on the board.
    #[inline]
    pub fn color_at(&self, x: u8, y: u8) -> Option<Color> {
        self.cells[y as usize * self.size() as usize + x as usize]
    }

    /// Return the color covering `point`, or `None` if empty or off the board.
    pub fn color_on(&self, point: Point) -> Option<Color> {
        if self.contains(point) {
            self.color_at(point.x(), point.y())
        } else {
            None
        }
    }

    /// Whether the point lies on this board.
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.x() < self.size() && point.y() < self.size()
    }

    /// Whether `color` has already placed `piece`.
    #[inline]
    pub fn is_piece_used(&self, color: Color, piece: Piece) -> bool {
        self.used[color.index()] & (1 << piece.index()) != 0
    }

    /// Pieces `color` has not placed yet.
    pub fn pieces_left(&self, color: Color) -> impl Iterator<Item = Piece> + '_ {
        Piece::all().filter(move |&p| !self.is_piece_used(color, p))
    }

    /// Whether `color` has not placed any piece yet.
    #[inline]
    pub fn is_first_piece(&self, color: Color) -> bool {
        self.used[color.index()] == 0
    }

    /// Check a move for `color` against the placement rules.
    pub fn check_move(&self, color: Color, mv: &Move) -> Result<(), MoveError> {
        let Some(piece) = self.check_placement(color, mv)? else {
            return Ok(());
        };
        debug_assert!(Some(piece) == mv.piece());
        for &p in mv.points() {
            if self.touches_edge(color, p) {
                return Err(MoveError::EdgeContact(p));
            }
        }
        if self.is_first_piece(color) {
            let start = self.variant.starting_point(color);
            if !mv.points().contains(&start) {
                return Err(MoveError::MissesStartingPoint(start));
            }
        } else if !mv.points().iter().any(|&p| self.touches_corner(color, p)) {
            return Err(MoveError::NoCornerContact);
        }
        Ok(())
    }

    /// Checks shared by moves and setup placements: the color is in play,
    /// the piece is unused, and every point is on the board and empty.
    /// Returns the piece, or `None` for a pass.
    fn check_placement(&self, color: Color, mv: &Move) -> Result<Option<Piece>, MoveError> {
        if color.index() >= self.variant.num_colors() {
            return Err(MoveError::ColorNotInPlay(color));
        }
        let Some(piece) = mv.piece() else {
            return Ok(None);
        };
        if self.is_piece_used(color, piece) {
            return Err(MoveError::PieceUsed(piece));
        }
        for &p in mv.points() {
            if !self.contains(p) {
                return Err(MoveError::OffBoard(p));
            }
            if self.color_at(p.x(), p.y()).is_some() {
                return Err(MoveError::Occupied(p));
            }
        }
        Ok(Some(piece))
    }

    /// Whether `mv` is a legal move for `color`.
    pub fn is_legal(&self, color: Color, mv: &Move) -> bool {
        self.check_move(color, mv).is_ok()
    }

    /// Enumerate every legal move for `color`, small pieces first.
    pub fn legal_moves(&self, color: Color) -> Vec<Move> {
        let mut moves = Vec::new();
        let mut seen: HashSet<Vec<Point>> = HashSet::new();
        let _ = self.visit_placements(color, |piece, points| {
            if seen.insert(points.clone()) {
                moves.push(Move::from_parts(piece, points));
            }
            ControlFlow::Continue(())
        });
        moves
    }

    /// Whether `color` has at least one legal move.
    pub fn has_legal_move(&self, color: Color) -> bool {
        self.visit_placements(color, |_, _| ControlFlow::Break(()))
            .is_break()
    }

    /// Whether no color in play has a legal move.
    pub fn is_game_over(&self) -> bool {
        !self.variant.colors().any(|c| self.has_legal_move(c))
    }

    /// Play `mv` for `color` without checking legality, and pass the turn
    /// to the next color. A pass only passes the turn.
    ///
    /// The caller must have checked the move (generated moves are legal).
    pub fn make_move(&self, color: Color, mv: &Move) -> Board {
        debug_assert!(self.is_legal(color, mv), "illegal move {mv} for {color}");
        let mut board = self.clone();
        if let Some(piece) = mv.piece() {
            board.cover(color, piece, mv.points());
            board.last_piece[color.index()] = Some(piece);
        }
        let next = color.next(self.variant.num_colors());
        board.hash ^= zobrist::TO_PLAY[self.to_play.index()] ^ zobrist::TO_PLAY[next.index()];
        board.to_play = next;
        board.moves_played += 1;
        board
    }

    /// Put `mv` on the board for `color` as a setup placement.
    ///
    /// The piece must be unused and its points empty, but the contact
    /// rules do not apply. The color to play and the move count are
    /// unchanged.
    pub fn place_setup(&self, color: Color, mv: &Move) -> Result<Board, MoveError> {
        let Some(piece) = self.check_placement(color, mv)? else {
            return Err(MoveError::Empty);
        };
        let mut board = self.clone();
        board.cover(color, piece, mv.points());
        Ok(board)
    }

    /// Take the piece covering exactly `mv` off the board, whoever placed
    /// it. Returns the new board and the piece's color.
    pub fn remove_setup(&self, mv: &Move) -> Result<(Board, Color), MoveError> {
        let (Some(piece), Some(&first)) = (mv.piece(), mv.points().first()) else {
            return Err(MoveError::Empty);
        };
        let Some(color) = self.color_on(first) else {
            return Err(MoveError::NotCovered(first));
        };
        if let Some(&p) = mv.points().iter().find(|&&p| self.color_on(p) != Some(color)) {
            return Err(MoveError::NotCovered(p));
        }
        if !self.is_piece_used(color, piece) {
            return Err(MoveError::NotCovered(first));
        }
        let mut board = self.clone();
        let size = self.size() as usize;
        for &p in mv.points() {
            board.cells[p.y() as usize * size + p.x() as usize] = None;
            board.hash ^= zobrist::point_key(color, p.x(), p.y());
        }
        board.used[color.index()] &= !(1 << piece.index());
        if board.last_piece[color.index()] == Some(piece) {
            board.last_piece[color.index()] = None;
        }
        Ok((board, color))
    }

    /// Check and play a move, returning the resulting board.
    pub fn apply(&self, mv: &ColorMove) -> Result<Board, MoveError> {
        self.check_move(mv.color, &mv.mv)?;
        Ok(self.make_move(mv.color, &mv.mv))
    }

    /// Squares covered by `color` plus the completion bonuses.
    pub fn points(&self, color: Color) -> u32 {
        let placed: u32 = Piece::all()
            .filter(|&p| self.is_piece_used(color, p))
            .map(|p| p.size() as u32)
            .sum();
        let mut points = placed;
        if placed == Piece::TOTAL_SQUARES {
            points += ALL_PIECES_BONUS;
            if self.last_piece[color.index()] == Some(Piece::MONOMINO) {
                points += MONOMINO_LAST_BONUS;
            }
        }
        points
    }

    /// Points for every color in play, in color order.
    pub fn scores(&self) -> Vec<u32> {
        self.variant.colors().map(|c| self.points(c)).collect()
    }

    /// Points for a player slot, summed over the colors it controls.
    pub fn player_points(&self, player: usize) -> u32 {
        self.variant
            .colors()
            .filter(|&c| self.variant.player_of(c) == player)
            .map(|c| self.points(c))
            .sum()
    }

    /// Number of empty points where `color` could anchor its next piece.
    pub fn attach_count(&self, color: Color) -> usize {
        self.attach_points(color).len()
    }

    fn cover(&mut self, color: Color, piece: Piece, points: &[Point]) {
        let size = self.size() as usize;
        for &p in points {
            self.cells[p.y() as usize * size + p.x() as usize] = Some(color);
            self.hash ^= zobrist::point_key(color, p.x(), p.y());
        }
        self.used[color.index()] |= 1 << piece.index();
    }

    fn touches_edge(&self, color: Color, p: Point) -> bool {
        let size = self.size();
        EDGES.iter().any(|&(dx, dy)| {
            p.offset(dx, dy, size)
                .is_some_and(|n| self.color_at(n.x(), n.y()) == Some(color))
        })
    }

    fn touches_corner(&self, color: Color, p: Point) -> bool {
        let size = self.size();
        CORNERS.iter().any(|&(dx, dy)| {
            p.offset(dx, dy, size)
                .is_some_and(|n| self.color_at(n.x(), n.y()) == Some(color))
        })
    }

    /// Empty points a new piece of `color` may cover to satisfy the
    /// corner (or starting point) rule.
    fn attach_points(&self, color: Color) -> Vec<Point> {
        let playable = |p: Point| {
            self.color_at(p.x(), p.y()).is_none() && !self.touches_edge(color, p)
        };
        if self.is_first_piece(color) {
            let start = self.variant.starting_point(color);
            return if playable(start) { vec![start] } else { Vec::new() };
        }
        let size = self.size();
        (0..size)
            .flat_map(|y| (0..size).map(move |x| Point::new(x, y)))
            .filter(|&p| playable(p) && self.touches_corner(color, p))
            .collect()
    }

    /// Call `f` for every placement that is legal for `color`. The same
    /// placement may be visited more than once.
    fn visit_placements<F>(&self, color: Color, mut f: F) -> ControlFlow<()>
    where
        F: FnMut(Piece, Vec<Point>) -> ControlFlow<()>,
    {
        if color.index() >= self.variant.num_colors() {
            return ControlFlow::Continue(());
        }
        let anchors = self.attach_points(color);
        if anchors.is_empty() {
            return ControlFlow::Continue(());
        }
        let size = self.size() as i32;
        for piece in self.pieces_left(color) {
            for shape in piece.orientations() {
                for &anchor in &anchors {
                    for &(ox, oy) in shape {
                        let dx = anchor.x() as i32 - ox as i32;
                        let dy = anchor.y() as i32 - oy as i32;
                        let mut points = Vec::with_capacity(shape.len());
                        let fits = shape.iter().all(|&(sx, sy)| {
                            let x = sx as i32 + dx;
                            let y = sy as i32 + dy;
                            if x < 0 || y < 0 || x >= size || y >= size {
                                return false;
                            }
                            let p = Point::new(x as u8, y as u8);
                            if self.color_at(p.x(), p.y()).is_some() || self.touches_edge(color, p) {
                                return false;
                            }
                            points.push(p);
                            true
                        });
                        if fits {
                            f(piece, points)?;
                        }
                    }
                }
            }
        }
        ControlFlow::Continue(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("variant", &self.variant)
            .field("to_play", &self.to_play)
            .field("moves_played", &self.moves_played)
            .field("hash", &format_args!("{:#018x}", self.hash))
            .finish()
    }
}

/// Text diagram: top row first, `.` for empty, color digit otherwise.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size = self.size();
        for y in (0..size).rev() {
            write!(f, "{:>2} ", y as u32 + 1)?;
            for x in 0..size {
                match self.color_at(x, y) {
                    Some(c) => write!(f, " {c}")?,
                    None => write!(f, " .")?,
                }
            }
            writeln!(f)?;
        }
        write!(f, "   ")?;
        for x in 0..size {
            write!(f, " {}", (b'a' + x) as char)?;
        }
        writeln!(f)
    }
}
