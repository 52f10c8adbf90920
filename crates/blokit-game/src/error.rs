//! Game tree, record, session, and shell errors.

use std::path::PathBuf;

use blokit_core::{Color, ColorMove, MoveError};
use blokit_engine::PlayerError;

/// Errors from game tree and navigator operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// The handle does not name a live node of this tree.
    #[error("node does not belong to this tree or was removed")]
    InvalidNode,

    /// The root cannot be truncated.
    #[error("the root node cannot be removed")]
    RootTruncation,

    /// The root carries no annotation.
    #[error("the root node cannot be annotated")]
    RootEdit,

    /// The move is not legal in the parent's position.
    #[error("illegal move {mv}: {source}")]
    IllegalMove {
        /// The rejected move.
        mv: ColorMove,
        /// Why the board rejected it.
        source: MoveError,
    },

    /// Setup edits that do not fit the position.
    #[error("invalid setup: {source}")]
    InvalidSetup {
        /// Why the board rejected them.
        source: MoveError,
    },
}

/// Errors from reading a game record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    /// The text is not well-formed.
    #[error("syntax error at byte {offset}: {message}")]
    Syntax {
        /// Byte offset into the input.
        offset: usize,
        /// What was expected.
        message: String,
    },

    /// A property has a value the game cannot use.
    #[error("invalid value \"{value}\" for property {id}")]
    InvalidProperty {
        /// Property identifier, e.g. `GM` or `B`.
        id: String,
        /// The rejected value.
        value: String,
    },
}

/// Errors from game session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    Player(#[from] PlayerError),

    /// No color can move any more.
    #[error("the game is over")]
    GameOver,

    /// The color to move is controlled by the computer.
    #[error("color {color} is played by the computer")]
    NotYourTurn {
        /// The computer-controlled color to move.
        color: Color,
    },

    /// Reading or writing a record file failed.
    #[error("{}: {source}", path.display())]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors from parsing a shell command line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShellError {
    /// The first word is not a known command.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// A required argument is missing.
    #[error("{command}: missing argument")]
    MissingArgument {
        /// The command being parsed.
        command: &'static str,
    },

    /// An argument could not be parsed.
    #[error("{command}: invalid argument \"{value}\"")]
    InvalidArgument {
        /// The command being parsed.
        command: &'static str,
        /// The rejected argument.
        value: String,
    },
}
