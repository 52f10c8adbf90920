//! A game in progress: record, cursor, per-color control, computer player.
//!
//! The session is the single owner of the tree and the navigator. Computer
//! moves arrive as [`SearchOutcome`]s collected by [`GameSession::pump`] or
//! [`GameSession::wait_for_computer`], and are applied here, on the owner's
//! thread, through [`Navigator::play`]. Anything that moves the cursor or
//! replaces the record cancels an outstanding search first.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use blokit_core::{Board, Color, ColorMove, Move, Variant};
use blokit_engine::{
    Book, ComputerPlayer, DEFAULT_GRACE, EngineError, FailureReason, MAX_LEVEL, MIN_LEVEL, PlayerState,
    SearchEngine, SearchOutcome, Searcher,
};
use tracing::{debug, info, warn};

use crate::annotation::Annotation;
use crate::error::{SessionError, TreeError};
use crate::navigator::Navigator;
use crate::sgf;
use crate::tree::{GameTree, NodeId};

/// Settings a session starts with.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Variant of the first game.
    pub variant: Variant,
    /// Colors played by the computer.
    pub computer: Vec<Color>,
    /// Search level, `MIN_LEVEL..=MAX_LEVEL`.
    pub level: u8,
    /// Consult the opening book before searching.
    pub use_book: bool,
    /// Time past the search budget before a search is abandoned.
    pub grace: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            variant: Variant::Duo,
            computer: vec![Color::ALL[1]],
            level: 3,
            use_book: true,
            grace: DEFAULT_GRACE,
        }
    }
}

/// Something that happened while the session advanced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A search was started for the color.
    Thinking(Color),
    /// The computer played a move.
    ComputerMoved(ColorMove),
    /// The color has no legal move for the rest of the game.
    Passed(Color),
    /// The search was cancelled; nothing was played.
    Cancelled(Color),
    /// The search failed; the position is unchanged.
    Failed {
        /// Color the search was for.
        color: Color,
        /// Why it failed.
        reason: FailureReason,
    },
    /// No color can move any more.
    GameOver(GameResult),
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionEvent::Thinking(color) => write!(f, "thinking for {color}"),
            SessionEvent::ComputerMoved(mv) => write!(f, "play {mv}"),
            SessionEvent::Passed(color) => write!(f, "pass {color}"),
            SessionEvent::Cancelled(color) => write!(f, "search for {color} cancelled"),
            SessionEvent::Failed { color, reason } => {
                write!(f, "search for {color} failed: {reason}")
            }
            SessionEvent::GameOver(result) => write!(f, "game over: {result}"),
        }
    }
}

/// Final score attribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameResult {
    /// Points per player slot.
    pub points: Vec<u32>,
    /// Player slots with the highest score.
    pub winners: Vec<usize>,
}

impl GameResult {
    /// Attribute the points on `board` to its variant's players.
    pub fn from_board(board: &Board) -> GameResult {
        let points: Vec<u32> = (0..board.variant().num_players())
            .map(|player| board.player_points(player))
            .collect();
        let best = points.iter().copied().max().unwrap_or(0);
        let winners = (0..points.len()).filter(|&p| points[p] == best).collect();
        GameResult { points, winners }
    }

    /// Result in record notation for two-player games (`B+3`, `W+1`, `0`).
    pub fn to_record(&self) -> Option<String> {
        match self.points[..] {
            [first, second] if first > second => Some(format!("B+{}", first - second)),
            [first, second] if second > first => Some(format!("W+{}", second - first)),
            [_, _] => Some("0".to_string()),
            _ => None,
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (player, points) in self.points.iter().enumerate() {
            if player > 0 {
                f.write_str(" ")?;
            }
            write!(f, "player {}: {points}", player + 1)?;
        }
        match self.winners[..] {
            [winner] => write!(f, ", player {} wins", winner + 1),
            _ => f.write_str(", tie"),
        }
    }
}

/// A game being played and recorded.
pub struct GameSession {
    tree: GameTree,
    nav: Navigator,
    player: ComputerPlayer,
    computer: [bool; Color::COUNT],
    level: u8,
    use_book: bool,
    /// Colors known to have no legal move in the current position.
    passed: [bool; Color::COUNT],
    /// Color of the outstanding search.
    searching: Option<Color>,
    result: Option<GameResult>,
    modified: bool,
}

impl GameSession {
    /// Start a session with the built-in searcher and opening book.
    pub fn new(config: SessionConfig) -> GameSession {
        let player = ComputerPlayer::new(Arc::new(Searcher::new()))
            .with_book(Arc::new(Book::builtin()))
            .with_grace(config.grace);
        GameSession::with_player(config, player)
    }

    /// Start a session around a custom engine, without a book.
    pub fn with_engine(config: SessionConfig, engine: Arc<dyn SearchEngine>) -> GameSession {
        let player = ComputerPlayer::new(engine).with_grace(config.grace);
        GameSession::with_player(config, player)
    }

    fn with_player(config: SessionConfig, player: ComputerPlayer) -> GameSession {
        let tree = GameTree::new(config.variant);
        let nav = Navigator::new(&tree);
        let mut computer = [false; Color::COUNT];
        for color in &config.computer {
            computer[color.index()] = true;
        }
        GameSession {
            tree,
            nav,
            player,
            computer,
            level: config.level.clamp(MIN_LEVEL, MAX_LEVEL),
            use_book: config.use_book,
            passed: [false; Color::COUNT],
            searching: None,
            result: None,
            modified: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────────────

    pub fn tree(&self) -> &GameTree {
        &self.tree
    }

    pub fn navigator(&self) -> &Navigator {
        &self.nav
    }

    pub fn current(&self) -> NodeId {
        self.nav.current()
    }

    pub fn variant(&self) -> Variant {
        self.tree.variant()
    }

    /// Position at the cursor.
    pub fn board(&self) -> Result<Board, SessionError> {
        Ok(self.nav.board(&self.tree)?)
    }

    pub fn is_computer(&self, color: Color) -> bool {
        self.computer[color.index()]
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn use_book(&self) -> bool {
        self.use_book
    }

    /// Whether `color` has been found unable to move in this game.
    pub fn has_passed(&self, color: Color) -> bool {
        self.passed[color.index()]
    }

    /// Whether a computer search is running.
    pub fn is_thinking(&self) -> bool {
        self.player.state() == PlayerState::Searching
    }

    /// Final result, once the game is over.
    pub fn result(&self) -> Option<&GameResult> {
        self.result.as_ref()
    }

    pub fn is_game_over(&self) -> bool {
        self.result.is_some()
    }

    /// Whether the record changed since it was created, loaded, or saved.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// One-line summary of the game state.
    pub fn status(&self) -> Result<Status, SessionError> {
        let board = self.board()?;
        Ok(Status {
            variant: self.variant(),
            move_number: self.tree.move_number(self.current())?,
            to_play: board.to_play(),
            scores: board.scores(),
            thinking: self.searching,
            result: self.result.clone(),
            modified: self.modified,
        })
    }

    // ── Game flow ────────────────────────────────────────────────────────────

    /// Discard the record and start a new game, keeping the variant unless
    /// one is given.
    pub fn new_game(&mut self, variant: Option<Variant>) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        self.cancel_search(&mut events);
        let variant = variant.unwrap_or(self.tree.variant());
        self.tree.create_root(variant);
        self.nav.reset(&self.tree);
        self.passed = [false; Color::COUNT];
        self.result = None;
        self.modified = false;
        info!(%variant, "new game");
        self.start_turn(&mut events);
        events
    }

    /// Play a move for the human-controlled color to move.
    pub fn play_human(&mut self, mv: Move) -> Result<Vec<SessionEvent>, SessionError> {
        if self.is_game_over() {
            return Err(SessionError::GameOver);
        }
        let color = self.nav.to_play(&self.tree)?;
        if self.is_computer(color) {
            return Err(SessionError::NotYourTurn { color });
        }
        let mut events = Vec::new();
        self.cancel_search(&mut events);
        self.nav.play(&mut self.tree, ColorMove::new(color, mv))?;
        self.modified = true;
        self.start_turn(&mut events);
        Ok(events)
    }

    /// Ask the computer for a move for the color to move, whoever controls it.
    pub fn generate_move(&mut self) -> Result<Vec<SessionEvent>, SessionError> {
        if self.is_game_over() {
            return Err(SessionError::GameOver);
        }
        let board = self.board()?;
        let mut events = Vec::new();
        self.request(&board, board.to_play(), &mut events)?;
        Ok(events)
    }

    /// Cancel the outstanding search, if any.
    pub fn stop(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        self.cancel_search(&mut events);
        events
    }

    /// Collect a finished search without blocking.
    pub fn pump(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if let Some(outcome) = self.player.poll() {
            self.handle_outcome(outcome, &mut events);
        }
        events
    }

    /// Block up to `timeout` for a search to finish, then handle it.
    pub fn wait_for_computer(&mut self, timeout: Duration) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if let Some(outcome) = self.player.wait_timeout(timeout) {
            self.handle_outcome(outcome, &mut events);
        }
        events
    }

    // ── Navigation ───────────────────────────────────────────────────────────

    pub fn back(&mut self) -> Result<NodeId, SessionError> {
        self.navigate(|nav, tree| nav.backward(tree))
    }

    pub fn forward(&mut self) -> Result<NodeId, SessionError> {
        self.navigate(|nav, tree| nav.forward(tree))
    }

    pub fn to_beginning(&mut self) -> Result<NodeId, SessionError> {
        self.navigate(|nav, tree| nav.to_beginning(tree))
    }

    pub fn to_end(&mut self) -> Result<NodeId, SessionError> {
        self.navigate(|nav, tree| nav.to_end(tree))
    }

    pub fn to_main_variation(&mut self) -> Result<NodeId, SessionError> {
        self.navigate(|nav, tree| nav.to_main_variation(tree))
    }

    pub fn next_variation(&mut self) -> Result<NodeId, SessionError> {
        self.navigate(|nav, tree| nav.next_variation(tree))
    }

    pub fn previous_variation(&mut self) -> Result<NodeId, SessionError> {
        self.navigate(|nav, tree| nav.previous_variation(tree))
    }

    pub fn go_to(&mut self, node: NodeId) -> Result<NodeId, SessionError> {
        self.navigate(|nav, tree| nav.go_to(tree, node))
    }

    // ── Editing ──────────────────────────────────────────────────────────────

    /// Delete the current move with its subtree and step back.
    pub fn undo(&mut self) -> Result<NodeId, SessionError> {
        self.cancel_search(&mut Vec::new());
        let node = self.nav.clear_current_move(&mut self.tree)?;
        self.modified = true;
        self.refresh();
        Ok(node)
    }

    /// Make the current move the first among its siblings.
    pub fn promote(&mut self) -> Result<(), SessionError> {
        self.tree.promote_to_main(self.current())?;
        self.modified = true;
        Ok(())
    }

    /// Put the current move on the main variation.
    pub fn make_main_variation(&mut self) -> Result<(), SessionError> {
        self.tree.make_main_variation(self.current())?;
        self.modified = true;
        Ok(())
    }

    /// Delete everything after the current move.
    pub fn truncate_children(&mut self) -> Result<(), SessionError> {
        self.cancel_search(&mut Vec::new());
        self.tree.truncate_children(self.current())?;
        self.modified = true;
        Ok(())
    }

    /// Drop everything outside the current subtree. The current position
    /// becomes the setup of the new root.
    pub fn keep_only_subtree(&mut self) -> Result<(), SessionError> {
        self.cancel_search(&mut Vec::new());
        self.tree.keep_only_subtree(self.current())?;
        self.modified = true;
        self.refresh();
        Ok(())
    }

    pub fn set_comment(&mut self, text: &str) -> Result<(), SessionError> {
        self.tree.set_comment(self.current(), text)?;
        self.modified = true;
        Ok(())
    }

    pub fn set_annotation(&mut self, annotation: Annotation) -> Result<(), SessionError> {
        self.tree.set_annotation(self.current(), annotation)?;
        self.modified = true;
        Ok(())
    }

    // ── Configuration ────────────────────────────────────────────────────────

    /// Give `color` to the computer or the human. Takes effect on the
    /// color's next turn.
    pub fn set_computer(&mut self, color: Color, computer: bool) {
        self.computer[color.index()] = computer;
    }

    /// Set the search level, clamped to the supported range.
    pub fn set_level(&mut self, level: u8) {
        self.level = level.clamp(MIN_LEVEL, MAX_LEVEL);
    }

    pub fn set_use_book(&mut self, use_book: bool) {
        self.use_book = use_book;
    }

    // ── Files ────────────────────────────────────────────────────────────────

    /// Write the record to `path`. The file is replaced only once the new
    /// content is completely written.
    pub fn save_sgf(&mut self, path: &Path) -> Result<(), SessionError> {
        let text = sgf::write(&self.tree);
        let tmp = temp_path(path);
        fs::write(&tmp, text)
            .and_then(|()| fs::rename(&tmp, path))
            .map_err(|source| {
                let _ = fs::remove_file(&tmp);
                SessionError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
        self.modified = false;
        info!(path = %path.display(), "record saved");
        Ok(())
    }

    /// Replace the record with the one in `path` and go to the end of its
    /// main variation. On failure the current game is left as it was.
    pub fn load_sgf(&mut self, path: &Path) -> Result<Vec<SessionEvent>, SessionError> {
        let text = fs::read_to_string(path).map_err(|source| SessionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tree = sgf::read(&text).inspect_err(|e| {
            warn!(path = %path.display(), error = %e, "failed to read record");
        })?;

        let mut events = Vec::new();
        self.cancel_search(&mut events);
        self.tree = tree;
        self.nav = Navigator::new(&self.tree);
        self.nav.to_end(&self.tree)?;
        self.modified = false;
        self.refresh();
        info!(path = %path.display(), nodes = self.tree.len(), "record loaded");
        Ok(events)
    }

    // ── Internals ────────────────────────────────────────────────────────────

    fn navigate<F>(&mut self, step: F) -> Result<NodeId, SessionError>
    where
        F: FnOnce(&mut Navigator, &GameTree) -> Result<NodeId, TreeError>,
    {
        self.cancel_search(&mut Vec::new());
        let node = step(&mut self.nav, &self.tree)?;
        self.refresh();
        Ok(node)
    }

    /// Recompute passed colors and the result for the cursor position
    /// without starting any search.
    fn refresh(&mut self) {
        match self.board() {
            Ok(board) => {
                for color in Color::ALL {
                    self.passed[color.index()] = color.index() < board.variant().num_colors()
                        && !board.has_legal_move(color);
                }
                self.result = board.is_game_over().then(|| GameResult::from_board(&board));
            }
            Err(e) => warn!(error = %e, "cannot rebuild position"),
        }
    }

    /// After a move: report new passes, detect the end of the game, and start
    /// the computer if it is to move.
    fn start_turn(&mut self, events: &mut Vec<SessionEvent>) {
        let board = match self.board() {
            Ok(board) => board,
            Err(e) => {
                warn!(error = %e, "cannot rebuild position");
                return;
            }
        };
        for color in board.variant().colors() {
            if !self.passed[color.index()] && !board.has_legal_move(color) {
                self.passed[color.index()] = true;
                info!(%color, "no legal move left");
                events.push(SessionEvent::Passed(color));
            }
        }

        if board.is_game_over() {
            let result = GameResult::from_board(&board);
            info!(%result, "game over");
            if let Some(record) = result.to_record() {
                self.tree.game_info_mut().result = record;
            }
            self.result = Some(result.clone());
            events.push(SessionEvent::GameOver(result));
            return;
        }
        self.result = None;

        let color = board.to_play();
        if self.is_computer(color)
            && let Err(e) = self.request(&board, color, events)
        {
            warn!(error = %e, "cannot start computer move");
        }
    }

    fn request(
        &mut self,
        board: &Board,
        color: Color,
        events: &mut Vec<SessionEvent>,
    ) -> Result<(), SessionError> {
        self.player
            .request_move(board, color, self.level, self.use_book)?;
        self.searching = Some(color);
        events.push(SessionEvent::Thinking(color));
        Ok(())
    }

    fn cancel_search(&mut self, events: &mut Vec<SessionEvent>) {
        if let Some(outcome) = self.player.cancel() {
            self.handle_outcome(outcome, events);
        }
    }

    fn handle_outcome(&mut self, outcome: SearchOutcome, events: &mut Vec<SessionEvent>) {
        let Some(color) = self.searching.take() else {
            debug!(?outcome, "outcome without a search");
            return;
        };
        match outcome {
            SearchOutcome::Completed(Some(mv)) => {
                let mv = ColorMove::new(color, mv);
                match self.nav.play(&mut self.tree, mv.clone()) {
                    Ok(_) => {
                        self.modified = true;
                        events.push(SessionEvent::ComputerMoved(mv));
                        self.start_turn(events);
                    }
                    Err(e) => {
                        warn!(error = %e, "computer move rejected by the record");
                        let reason = match e {
                            TreeError::IllegalMove { mv, source } => FailureReason::IllegalMove {
                                mv: mv.mv,
                                source,
                            },
                            other => FailureReason::EngineFault(EngineError::Internal(
                                other.to_string(),
                            )),
                        };
                        events.push(SessionEvent::Failed { color, reason });
                    }
                }
            }
            SearchOutcome::Completed(None) => {
                if !self.passed[color.index()] {
                    self.passed[color.index()] = true;
                    events.push(SessionEvent::Passed(color));
                }
                self.start_turn(events);
            }
            SearchOutcome::Cancelled => events.push(SessionEvent::Cancelled(color)),
            SearchOutcome::Failed(reason) => {
                events.push(SessionEvent::Failed { color, reason });
            }
        }
    }
}

impl fmt::Debug for GameSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameSession")
            .field("variant", &self.tree.variant())
            .field("nodes", &self.tree.len())
            .field("current", &self.nav.current())
            .field("searching", &self.searching)
            .field("modified", &self.modified)
            .finish()
    }
}

/// Snapshot of the session for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub variant: Variant,
    pub move_number: usize,
    pub to_play: Color,
    /// Points per color in play.
    pub scores: Vec<u32>,
    pub thinking: Option<Color>,
    pub result: Option<GameResult>,
    pub modified: bool,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} move {}", self.variant, self.move_number)?;
        match &self.result {
            Some(result) => write!(f, ", {result}")?,
            None => write!(f, ", {} to play", self.to_play)?,
        }
        f.write_str(", points")?;
        for points in &self.scores {
            write!(f, " {points}")?;
        }
        if let Some(color) = self.thinking {
            write!(f, ", thinking for {color}")?;
        }
        if self.modified {
            f.write_str(", modified")?;
        }
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
