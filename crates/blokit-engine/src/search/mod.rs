//! Search algorithms and the engine seam used by the computer player.

pub mod control;
pub mod paranoid;

use blokit_core::{Board, Color, Move};
use tracing::debug;

use crate::error::EngineError;
use crate::time::SearchLimits;
use control::SearchControl;
use paranoid::{SearchContext, order_moves, search_root};

/// Result of a completed search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Best move found at the highest completed depth; `None` if the color
    /// has no legal move.
    pub best_move: Option<Move>,
    /// Evaluation from the searching player's perspective.
    pub score: i32,
    /// Total nodes visited during the search.
    pub nodes: u64,
    /// Depth reached.
    pub depth: u8,
}

/// Something that can pick a move for a color.
///
/// Implementations run on a worker thread with a snapshot of the board and
/// must poll `control` often enough to honor cancellation promptly.
pub trait SearchEngine: Send + Sync {
    /// Search `board` for a move for `color` within `limits`.
    fn search(
        &self,
        board: &Board,
        color: Color,
        limits: &SearchLimits,
        control: &SearchControl,
    ) -> Result<SearchResult, EngineError>;
}

/// Iterative-deepening paranoid alpha-beta searcher.
#[derive(Debug, Default, Clone, Copy)]
pub struct Searcher;

impl Searcher {
    /// Create a searcher.
    pub fn new() -> Self {
        Self
    }

    /// Run iterative deepening up to `max_depth`.
    ///
    /// Calls `on_iter(depth, score, nodes, best)` after each completed
    /// iteration.
    pub fn search_with<F>(
        &self,
        board: &Board,
        color: Color,
        max_depth: u8,
        control: &SearchControl,
        mut on_iter: F,
    ) -> Result<SearchResult, EngineError>
    where
        F: FnMut(u8, i32, u64, &Move),
    {
        let variant = board.variant();
        if color.index() >= variant.num_colors() {
            return Err(EngineError::ColorNotInPlay(color));
        }
        let board = if board.to_play() == color {
            board.clone()
        } else {
            board.with_to_play(color)
        };

        let mut moves = board.legal_moves(color);
        if moves.is_empty() {
            return Ok(SearchResult {
                best_move: None,
                score: 0,
                nodes: 0,
                depth: 0,
            });
        }
        order_moves(&mut moves);

        let mut ctx = SearchContext {
            nodes: 0,
            control,
            root: color,
        };

        // Track completed iteration results (for abort-safety)
        let mut completed: Option<(Move, i32)> = None;
        let mut completed_depth: u8 = 0;

        for depth in 1..=max_depth.max(1) {
            if completed.is_some() && control.should_stop_iterating() {
                break;
            }

            let found = search_root(&board, &moves, depth, &mut ctx);

            if control.is_stopped() {
                // A partial first iteration still beats having nothing
                if completed.is_none()
                    && let Some((i, score)) = found
                {
                    completed = Some((moves[i].clone(), score));
                }
                break;
            }

            let Some((i, score)) = found else { break };

            // Search the previous best first on the next iteration
            let best = moves.remove(i);
            moves.insert(0, best.clone());

            on_iter(depth, score, ctx.nodes, &best);
            completed = Some((best, score));
            completed_depth = depth;
        }

        let (best_move, score) = match completed {
            Some((mv, score)) => (mv, score),
            // Stopped before a single root move finished
            None => (moves[0].clone(), 0),
        };

        Ok(SearchResult {
            best_move: Some(best_move),
            score,
            nodes: ctx.nodes,
            depth: completed_depth,
        })
    }
}

impl SearchEngine for Searcher {
    fn search(
        &self,
        board: &Board,
        color: Color,
        limits: &SearchLimits,
        control: &SearchControl,
    ) -> Result<SearchResult, EngineError> {
        self.search_with(board, color, limits.max_depth, control, |depth, score, nodes, best| {
            debug!(depth, score, nodes, best = %best, "iteration complete");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::sync::atomic::AtomicBool;

    use blokit_core::Variant;

    fn search_depth(board: &Board, color: Color, depth: u8) -> SearchResult {
        let stopped = Arc::new(AtomicBool::new(false));
        let control = SearchControl::new_infinite(stopped);
        Searcher::new()
            .search_with(board, color, depth, &control, |_, _, _, _| {})
            .unwrap()
    }

    #[test]
    fn depth_1_returns_legal_move() {
        let board = Board::new(Variant::Duo);
        let result = search_depth(&board, Color::ALL[0], 1);
        let mv = result.best_move.expect("should find a move at depth 1");
        assert!(board.is_legal(Color::ALL[0], &mv));
        assert_eq!(result.depth, 1);
    }

    #[test]
    fn depth_2_returns_legal_move() {
        let board = Board::new(Variant::Duo)
            .make_move(Color::ALL[0], &"d10,e9,e10,e11,f10".parse().unwrap());
        let result = search_depth(&board, Color::ALL[1], 2);
        let mv = result.best_move.unwrap();
        assert!(board.is_legal(Color::ALL[1], &mv));
        assert_eq!(result.depth, 2);
    }

    #[test]
    fn searches_for_requested_color_out_of_turn() {
        let board = Board::new(Variant::Duo);
        let result = search_depth(&board, Color::ALL[1], 1);
        let mv = result.best_move.unwrap();
        assert!(mv.points().contains(&Variant::Duo.starting_point(Color::ALL[1])));
    }

    #[test]
    fn color_not_in_play_is_an_error() {
        let board = Board::new(Variant::Duo);
        let stopped = Arc::new(AtomicBool::new(false));
        let control = SearchControl::new_infinite(stopped);
        let err = Searcher::new()
            .search_with(&board, Color::ALL[3], 1, &control, |_, _, _, _| {})
            .unwrap_err();
        assert!(matches!(err, EngineError::ColorNotInPlay(_)));
    }

    #[test]
    fn iterative_deepening_calls_callback() {
        let board = Board::new(Variant::Duo);
        let stopped = Arc::new(AtomicBool::new(false));
        let control = SearchControl::new_infinite(stopped);
        let mut depths_seen = Vec::new();
        Searcher::new()
            .search_with(&board, Color::ALL[0], 2, &control, |depth, _, _, _| {
                depths_seen.push(depth);
            })
            .unwrap();
        assert_eq!(depths_seen, vec![1, 2]);
    }

    #[test]
    fn pre_set_stop_still_returns_a_legal_move() {
        let board = Board::new(Variant::Duo);
        let stopped = Arc::new(AtomicBool::new(true));
        let control = SearchControl::new_infinite(stopped);
        let result = Searcher::new()
            .search_with(&board, Color::ALL[0], 5, &control, |_, _, _, _| {})
            .unwrap();
        assert_eq!(result.depth, 0);
        assert!(board.is_legal(Color::ALL[0], &result.best_move.unwrap()));
    }
}
