//! Computer player: runs one search at a time on a worker thread and hands
//! the outcome back to the owning thread.
//!
//! The owner (the game session) calls [`ComputerPlayer::request_move`] and
//! later collects exactly one [`SearchOutcome`] through
//! [`poll`](ComputerPlayer::poll), [`wait_timeout`](ComputerPlayer::wait_timeout)
//! or [`cancel`](ComputerPlayer::cancel). The worker only ever sees a copy
//! of the board; it never touches the owner's state.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::{Duration, Instant};

use blokit_core::{Board, Color, Move};
use tracing::{debug, info, warn};

use crate::book::OpeningBook;
use crate::error::{EngineError, FailureReason, PlayerError};
use crate::search::{SearchEngine, Searcher};
use crate::time::{SearchLimits, control_for_limits, limits_for_level};

/// Default time allowed past the budget before a search is force-cancelled,
/// and the longest [`ComputerPlayer::cancel`] waits for the worker.
pub const DEFAULT_GRACE: Duration = Duration::from_millis(500);

/// Stand-in for a wait too long to be represented as an [`Instant`].
const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// What the owner learns about a search. Exactly one per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The search finished. `None` means the color has no legal move.
    Completed(Option<Move>),
    /// The search was cancelled by the owner or ran past its deadline.
    Cancelled,
    /// The search failed; nothing may be applied.
    Failed(FailureReason),
}

/// Whether a search is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    /// No search outstanding; `request_move` is accepted.
    Idle,
    /// A search was requested and its outcome not yet collected.
    Searching,
}

/// A transient description of one search: what is searched and until when.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// Snapshot of the position being searched.
    pub board: Board,
    /// Color to find a move for.
    pub color: Color,
    /// Difficulty level the limits came from.
    pub level: u8,
    /// Limits derived from the level.
    pub limits: SearchLimits,
    /// When the search was requested.
    pub started: Instant,
    /// Past this instant the search is force-cancelled.
    pub deadline: Instant,
}

/// Message from a worker (or the book) back to the owner.
struct WorkerDone {
    id: u64,
    result: Result<Option<Move>, EngineError>,
    from_book: bool,
}

/// The search currently owed an outcome.
struct Outstanding {
    id: u64,
    request: SearchRequest,
    stop_flag: Arc<AtomicBool>,
}

/// Drives one asynchronous search per turn for a computer-controlled color.
pub struct ComputerPlayer {
    engine: Arc<dyn SearchEngine>,
    book: Option<Arc<dyn OpeningBook>>,
    tx: Sender<WorkerDone>,
    rx: Receiver<WorkerDone>,
    outstanding: Option<Outstanding>,
    next_id: u64,
    grace: Duration,
}

impl ComputerPlayer {
    /// Create a player around `engine`, without an opening book.
    pub fn new(engine: Arc<dyn SearchEngine>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            engine,
            book: None,
            tx,
            rx,
            outstanding: None,
            next_id: 0,
            grace: DEFAULT_GRACE,
        }
    }

    /// Attach an opening book.
    pub fn with_book(mut self, book: Arc<dyn OpeningBook>) -> Self {
        self.book = Some(book);
        self
    }

    /// Change the grace period past the budget.
    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    /// Whether a search is outstanding.
    pub fn state(&self) -> PlayerState {
        if self.outstanding.is_some() {
            PlayerState::Searching
        } else {
            PlayerState::Idle
        }
    }

    /// The outstanding request, if any.
    pub fn request(&self) -> Option<&SearchRequest> {
        self.outstanding.as_ref().map(|o| &o.request)
    }

    /// Deadline of the outstanding search, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.request().map(|r| r.deadline)
    }

    /// Start searching for a move for `color` on a copy of `board`.
    ///
    /// Returns immediately. With `use_book` set and a book entry for the
    /// position, the book move is delivered without running a search.
    pub fn request_move(
        &mut self,
        board: &Board,
        color: Color,
        level: u8,
        use_book: bool,
    ) -> Result<(), PlayerError> {
        if self.outstanding.is_some() {
            return Err(PlayerError::Busy);
        }

        let id = self.next_id;
        self.next_id += 1;

        let limits = limits_for_level(level);
        let started = Instant::now();
        let request = SearchRequest {
            board: board.clone(),
            color,
            level,
            limits,
            started,
            deadline: instant_after(started, limits.budget.saturating_add(self.grace)),
        };
        let stop_flag = Arc::new(AtomicBool::new(false));

        let book_move = if use_book {
            self.book.as_ref().and_then(|b| b.lookup(board, color))
        } else {
            None
        };

        if let Some(mv) = book_move {
            info!(%color, mv = %mv, "book move");
            let _ = self.tx.send(WorkerDone {
                id,
                result: Ok(Some(mv)),
                from_book: true,
            });
        } else {
            info!(%color, level, budget_ms = limits.budget.as_millis() as u64, "search started");
            let engine = Arc::clone(&self.engine);
            let snapshot = request.board.clone();
            let control = control_for_limits(&limits, Arc::clone(&stop_flag));
            let tx = self.tx.clone();
            std::thread::spawn(move || {
                let result = panic::catch_unwind(AssertUnwindSafe(|| {
                    engine.search(&snapshot, color, &limits, &control)
                }))
                .unwrap_or_else(|payload| {
                    Err(EngineError::Panicked {
                        message: panic_message(payload.as_ref()),
                    })
                })
                .map(|r| {
                    debug!(depth = r.depth, nodes = r.nodes, score = r.score, "search finished");
                    r.best_move
                });
                let _ = tx.send(WorkerDone {
                    id,
                    result,
                    from_book: false,
                });
            });
        }

        self.outstanding = Some(Outstanding {
            id,
            request,
            stop_flag,
        });
        Ok(())
    }

    /// Collect the outcome if it is ready. Never blocks.
    ///
    /// Returns `None` while the search is still running or when nothing is
    /// outstanding. A search past its deadline is force-cancelled here.
    pub fn poll(&mut self) -> Option<SearchOutcome> {
        let id = self.outstanding.as_ref()?.id;
        loop {
            match self.rx.try_recv() {
                Ok(done) if done.id == id => return Some(self.finish(done)),
                Ok(stale) => debug!(id = stale.id, "dropping stale search result"),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        self.check_deadline()
    }

    /// Block until the outcome is ready or `timeout` elapses.
    ///
    /// Never blocks past the search deadline: at the deadline the search is
    /// force-cancelled and `Cancelled` is returned.
    pub fn wait_timeout(&mut self, timeout: Duration) -> Option<SearchOutcome> {
        let (id, deadline) = {
            let o = self.outstanding.as_ref()?;
            (o.id, o.request.deadline)
        };
        let give_up = Instant::now()
            .checked_add(timeout)
            .map_or(deadline, |t| t.min(deadline));
        loop {
            let remaining = give_up.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(done) if done.id == id => return Some(self.finish(done)),
                Ok(stale) => debug!(id = stale.id, "dropping stale search result"),
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => {
                    return self.check_deadline();
                }
            }
        }
    }

    /// Block until the outcome is ready, bounded by the search deadline.
    pub fn wait(&mut self) -> Option<SearchOutcome> {
        loop {
            let deadline = self.deadline()?;
            let timeout = deadline.saturating_duration_since(Instant::now());
            if let Some(outcome) = self.wait_timeout(timeout.saturating_add(Duration::from_millis(1))) {
                return Some(outcome);
            }
        }
    }

    /// Cancel the outstanding search.
    ///
    /// Raises the stop flag and waits up to the grace period for the worker
    /// to acknowledge. Always yields `Cancelled` for an outstanding search,
    /// even if its result had already arrived: a cancelled search never
    /// delivers a move. Returns `None` if nothing was outstanding.
    pub fn cancel(&mut self) -> Option<SearchOutcome> {
        let outstanding = self.outstanding.take()?;
        outstanding.stop_flag.store(true, Ordering::Release);

        let give_up = instant_after(Instant::now(), self.grace);
        let acknowledged = loop {
            let remaining = give_up.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(done) if done.id == outstanding.id => break true,
                Ok(_) => continue,
                Err(_) => break false,
            }
        };
        if acknowledged {
            info!(color = %outstanding.request.color, "search cancelled");
        } else {
            warn!(
                color = %outstanding.request.color,
                grace_ms = self.grace.as_millis() as u64,
                "search did not acknowledge cancellation, abandoning worker"
            );
        }
        Some(SearchOutcome::Cancelled)
    }

    fn check_deadline(&mut self) -> Option<SearchOutcome> {
        let deadline = self.outstanding.as_ref()?.request.deadline;
        if Instant::now() < deadline {
            return None;
        }
        let outstanding = self.outstanding.take()?;
        outstanding.stop_flag.store(true, Ordering::Release);
        warn!(
            color = %outstanding.request.color,
            level = outstanding.request.level,
            "search exceeded its deadline, force-cancelled"
        );
        Some(SearchOutcome::Cancelled)
    }

    /// Turn a worker message into the outcome for the outstanding search,
    /// validating the move against the searched snapshot.
    fn finish(&mut self, done: WorkerDone) -> SearchOutcome {
        let Some(outstanding) = self.outstanding.take() else {
            return SearchOutcome::Cancelled;
        };
        let SearchRequest { board, color, .. } = &outstanding.request;
        match done.result {
            Ok(Some(mv)) if !mv.is_pass() => match board.check_move(*color, &mv) {
                Ok(()) => {
                    info!(%color, mv = %mv, book = done.from_book, "move found");
                    SearchOutcome::Completed(Some(mv))
                }
                Err(source) => {
                    warn!(%color, mv = %mv, error = %source, "engine produced an illegal move");
                    SearchOutcome::Failed(FailureReason::IllegalMove { mv, source })
                }
            },
            Ok(_) => {
                let available = board.legal_moves(*color).len();
                if available == 0 {
                    info!(%color, "no legal move");
                    SearchOutcome::Completed(None)
                } else {
                    warn!(%color, available, "engine returned no move");
                    SearchOutcome::Failed(FailureReason::MissingMove { available })
                }
            }
            Err(e) => {
                warn!(%color, error = %e, "engine fault");
                SearchOutcome::Failed(FailureReason::EngineFault(e))
            }
        }
    }
}

/// `start + span`, clamped to a far but representable instant.
fn instant_after(start: Instant, span: Duration) -> Instant {
    start
        .checked_add(span)
        .or_else(|| start.checked_add(FAR_FUTURE))
        .unwrap_or(start)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl Default for ComputerPlayer {
    fn default() -> Self {
        Self::new(Arc::new(Searcher::new()))
    }
}

impl std::fmt::Debug for ComputerPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComputerPlayer")
            .field("state", &self.state())
            .field("has_book", &self.book.is_some())
            .field("grace", &self.grace)
            .finish()
    }
}

impl Drop for ComputerPlayer {
    fn drop(&mut self) {
        if let Some(o) = &self.outstanding {
            o.stop_flag.store(true, Ordering::Release);
        }
    }
}
