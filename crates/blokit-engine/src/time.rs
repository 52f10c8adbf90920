//! Level management: convert a difficulty level to search limits.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use crate::search::control::SearchControl;

/// Weakest level.
pub const MIN_LEVEL: u8 = 1;

/// Strongest level.
pub const MAX_LEVEL: u8 = 9;

/// Time budget at level 1. Each level doubles it.
const BASE_BUDGET: Duration = Duration::from_millis(100);

/// Depth and time a search may spend at a given level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    /// Maximum iterative-deepening depth in plies.
    pub max_depth: u8,
    /// Wall-clock budget for the whole search.
    pub budget: Duration,
}

/// Map a level to its limits. Levels outside `MIN_LEVEL..=MAX_LEVEL` are clamped.
///
/// | Level | Depth | Budget  |
/// |-------|-------|---------|
/// | 1     | 1     | 0.1 s   |
/// | 2     | 1     | 0.2 s   |
/// | 3     | 2     | 0.4 s   |
/// | 4     | 2     | 0.8 s   |
/// | 5     | 3     | 1.6 s   |
/// | 6     | 3     | 3.2 s   |
/// | 7     | 4     | 6.4 s   |
/// | 8     | 4     | 12.8 s  |
/// | 9     | 5     | 25.6 s  |
///
/// Both columns are non-decreasing in the level, so a higher level never
/// searches less.
pub const fn limits_for_level(level: u8) -> SearchLimits {
    let level = if level < MIN_LEVEL {
        MIN_LEVEL
    } else if level > MAX_LEVEL {
        MAX_LEVEL
    } else {
        level
    };
    let steps = (level - MIN_LEVEL) as u32;
    SearchLimits {
        max_depth: 1 + (level - MIN_LEVEL) / 2,
        budget: BASE_BUDGET.saturating_mul(1u32 << steps),
    }
}

/// Build a [`SearchControl`] for `limits`.
///
/// No new iteration starts after half the budget; the running iteration is
/// aborted at the full budget.
pub fn control_for_limits(limits: &SearchLimits, stopped: Arc<AtomicBool>) -> SearchControl {
    SearchControl::new_timed(stopped, limits.budget / 2, limits.budget)
}
