//! Engine, book, and computer-player errors.

use blokit_core::{Color, Move, MoveError};

/// Errors a search engine can report instead of a move.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The requested color does not take part in the variant.
    #[error("color {0} is not in play")]
    ColorNotInPlay(Color),

    /// The engine panicked while searching.
    #[error("engine panicked: {message}")]
    Panicked {
        /// Panic payload, if it was a string.
        message: String,
    },

    /// Any other engine-internal failure.
    #[error("engine failure: {0}")]
    Internal(String),
}

/// Errors rejected synchronously by [`ComputerPlayer::request_move`](crate::ComputerPlayer::request_move).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlayerError {
    /// A search is already outstanding; cancel it first.
    #[error("a search is already running")]
    Busy,
}

/// Why a search ended in failure. Delivered through
/// [`SearchOutcome::Failed`](crate::SearchOutcome::Failed).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FailureReason {
    /// The engine produced a move that is not legal in the searched position.
    #[error("engine produced illegal move {mv}: {source}")]
    IllegalMove {
        /// The offending move.
        mv: Move,
        /// Why the board rejected it.
        source: MoveError,
    },

    /// The engine claimed there was no move although legal moves exist.
    #[error("engine returned no move but {available} legal moves exist")]
    MissingMove {
        /// Number of legal moves in the searched position.
        available: usize,
    },

    /// The engine itself failed.
    #[error("engine fault: {0}")]
    EngineFault(#[from] EngineError),
}

/// Errors from parsing an opening book.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookError {
    /// A line is not of the form `variant: moves -> reply`.
    #[error("line {line}: expected \"variant: moves -> reply\"")]
    Syntax {
        /// One-based line number.
        line: usize,
    },

    /// The variant name is not recognized.
    #[error("line {line}: unknown variant \"{found}\"")]
    UnknownVariant {
        /// One-based line number.
        line: usize,
        /// The rejected name.
        found: String,
    },

    /// A move in the line does not parse or is illegal when replayed.
    #[error("line {line}: bad move \"{text}\": {source}")]
    BadMove {
        /// One-based line number.
        line: usize,
        /// The move as written.
        text: String,
        /// Why it was rejected.
        source: MoveError,
    },
}
