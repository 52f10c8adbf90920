//! Game records for blokit: the variation tree, navigation, the record file
//! format, and a session that plays games against the computer player.

pub mod command;
pub mod navigator;
pub mod session;
pub mod sgf;
pub mod shell;
pub mod tree;

mod annotation;
mod error;

pub use annotation::Annotation;
pub use command::{Command, parse_command};
pub use error::{RecordError, SessionError, ShellError, TreeError};
pub use navigator::Navigator;
pub use session::{GameResult, GameSession, SessionConfig, SessionEvent, Status};
pub use shell::Shell;
pub use tree::{GameInfo, GameTree, NodeId, NodeRef, Property, Setup};
