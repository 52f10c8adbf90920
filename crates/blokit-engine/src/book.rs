//! Opening book: known replies for early positions, consulted before searching.

use std::collections::HashMap;

use blokit_core::{Board, Color, ColorMove, Move, Variant};
use tracing::debug;

use crate::error::BookError;

/// Openings shipped with the engine. Each line is
/// `variant: move; move; ... -> reply`, moves played in turn order from the
/// empty board.
pub const BUILTIN_BOOK: &str = "\
duo: -> d10,e9,e10,e11,f10
duo: d10,e9,e10,e11,f10 -> i5,j4,j5,j6,k5
classic: -> a20,a19,a18,b18,c18
classic: a20,a19,a18,b18,c18 -> t20,t19,t18,s18,r18
classic: a20,a19,a18,b18,c18; t20,t19,t18,s18,r18 -> t1,t2,t3,s3,r3
classic: a20,a19,a18,b18,c18; t20,t19,t18,s18,r18; t1,t2,t3,s3,r3 -> a1,a2,a3,b3,c3
classic_2: -> a20,a19,a18,b18,c18
classic_2: a20,a19,a18,b18,c18 -> t20,t19,t18,s18,r18
classic_2: a20,a19,a18,b18,c18; t20,t19,t18,s18,r18 -> t1,t2,t3,s3,r3
classic_2: a20,a19,a18,b18,c18; t20,t19,t18,s18,r18; t1,t2,t3,s3,r3 -> a1,a2,a3,b3,c3
";

/// Source of precomputed moves.
pub trait OpeningBook: Send + Sync {
    /// Return a book move for `color` in `board`, if the position is known.
    fn lookup(&self, board: &Board, color: Color) -> Option<Move>;
}

/// Opening book keyed by variant and Zobrist hash.
#[derive(Debug, Default, Clone)]
pub struct Book {
    entries: HashMap<(Variant, u64), Vec<Move>>,
}

impl Book {
    /// Create an empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// The book built from [`BUILTIN_BOOK`].
    pub fn builtin() -> Self {
        // The builtin text is covered by tests; an error here is a bug.
        Self::parse(BUILTIN_BOOK).unwrap_or_else(|e| {
            tracing::error!(error = %e, "builtin opening book is invalid");
            Self::new()
        })
    }

    /// Parse book text. Blank lines and lines starting with `#` are ignored.
    ///
    /// Every line is replayed from the empty board, so all stored replies
    /// are legal in their position.
    pub fn parse(text: &str) -> Result<Self, BookError> {
        let mut book = Self::new();
        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let raw = raw.trim();
            if raw.is_empty() || raw.starts_with('#') {
                continue;
            }
            let (variant_text, rest) = raw.split_once(':').ok_or(BookError::Syntax { line })?;
            let (moves_text, reply_text) =
                rest.split_once("->").ok_or(BookError::Syntax { line })?;
            let variant: Variant =
                variant_text
                    .trim()
                    .parse()
                    .map_err(|_| BookError::UnknownVariant {
                        line,
                        found: variant_text.trim().to_string(),
                    })?;

            let mut board = Board::new(variant);
            for text in moves_text.split(';').map(str::trim).filter(|t| !t.is_empty()) {
                let mv = parse_move(line, text)?;
                board = board
                    .apply(&ColorMove::new(board.to_play(), mv))
                    .map_err(|source| BookError::BadMove {
                        line,
                        text: text.to_string(),
                        source,
                    })?;
            }

            let reply_text = reply_text.trim();
            let reply = parse_move(line, reply_text)?;
            board
                .check_move(board.to_play(), &reply)
                .map_err(|source| BookError::BadMove {
                    line,
                    text: reply_text.to_string(),
                    source,
                })?;
            book.insert(&board, reply);
        }
        debug!(positions = book.entries.len(), "opening book loaded");
        Ok(book)
    }

    /// Add `reply` for the position `board` with its color to play.
    pub fn insert(&mut self, board: &Board, reply: Move) {
        let replies = self
            .entries
            .entry((board.variant(), board.hash()))
            .or_default();
        if !replies.contains(&reply) {
            replies.push(reply);
        }
    }

    /// Number of positions with at least one reply.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the book has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_move(line: usize, text: &str) -> Result<Move, BookError> {
    text.parse().map_err(|source| BookError::BadMove {
        line,
        text: text.to_string(),
        source,
    })
}

impl OpeningBook for Book {
    fn lookup(&self, board: &Board, color: Color) -> Option<Move> {
        let hash = if board.to_play() == color {
            board.hash()
        } else {
            board.with_to_play(color).hash()
        };
        self.entries
            .get(&(board.variant(), hash))?
            .iter()
            .find(|mv| board.is_legal(color, mv))
            .cloned()
    }
}
