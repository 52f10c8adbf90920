//! Search control: stop flag and time budget.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Nodes between clock checks. Keeps cancellation latency well under a
/// second even on the 20x20 board.
const CHECK_INTERVAL: u64 = 1024;

/// Controls when a search should stop.
///
/// Checked periodically by the search to decide whether to abort. Two modes:
/// - **Infinite**: no time pressure, only responds to the external stop flag
/// - **Timed**: clock starts at construction; a soft limit ends iterative
///   deepening, a hard limit aborts the running iteration
pub struct SearchControl {
    stopped: Arc<AtomicBool>,
    start: Instant,
    soft_limit: Option<Duration>,
    hard_limit: Option<Duration>,
}

impl SearchControl {
    /// Create control without time limits.
    pub fn new_infinite(stopped: Arc<AtomicBool>) -> Self {
        Self {
            stopped,
            start: Instant::now(),
            soft_limit: None,
            hard_limit: None,
        }
    }

    /// Create control with time limits; clock starts immediately.
    pub fn new_timed(stopped: Arc<AtomicBool>, soft: Duration, hard: Duration) -> Self {
        Self {
            stopped,
            start: Instant::now(),
            soft_limit: Some(soft),
            hard_limit: Some(hard.max(soft)),
        }
    }

    /// Check whether the search should abort immediately.
    ///
    /// Returns `true` if the stop flag was set, or if the hard limit has
    /// been exceeded (checked only every [`CHECK_INTERVAL`] nodes). When the
    /// hard limit fires, the stop flag is set so subsequent calls return
    /// immediately without re-checking the clock.
    pub fn should_stop(&self, nodes: u64) -> bool {
        if self.stopped.load(Ordering::Relaxed) {
            return true;
        }

        if nodes % CHECK_INTERVAL != 0 {
            return false;
        }

        if let Some(hard) = self.hard_limit
            && self.elapsed() >= hard
        {
            self.stopped.store(true, Ordering::Release);
            return true;
        }

        false
    }

    /// Check whether iterative deepening should start a new iteration.
    pub fn should_stop_iterating(&self) -> bool {
        if self.is_stopped() {
            return true;
        }

        if let Some(soft) = self.soft_limit {
            return self.elapsed() >= soft;
        }

        false
    }

    /// Whether the stop flag is set, without touching the clock.
    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Elapsed time since the control was created.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl std::fmt::Debug for SearchControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchControl")
            .field("stopped", &self.is_stopped())
            .field("soft_limit", &self.soft_limit)
            .field("hard_limit", &self.hard_limit)
            .finish()
    }
}
