//! Move search, opening book, and the asynchronous computer player for blokit.

pub mod book;
pub mod eval;
pub mod player;
pub mod search;
pub mod time;

mod error;

pub use book::{BUILTIN_BOOK, Book, OpeningBook};
pub use error::{BookError, EngineError, FailureReason, PlayerError};
pub use eval::evaluate;
pub use player::{ComputerPlayer, DEFAULT_GRACE, PlayerState, SearchOutcome, SearchRequest};
pub use search::control::SearchControl;
pub use search::{SearchEngine, SearchResult, Searcher};
pub use time::{MAX_LEVEL, MIN_LEVEL, SearchLimits, control_for_limits, limits_for_level};
