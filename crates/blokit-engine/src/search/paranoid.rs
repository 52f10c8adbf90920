//! Paranoid alpha-beta: every opponent minimizes the searching player's score.

use blokit_core::{Board, Color, Move};

use crate::eval::{evaluate, terminal_score};
use crate::search::control::SearchControl;

/// Score representing an unreachable upper/lower bound.
pub const INF: i32 = 1_000_000;

/// Moves examined per interior node. The root always searches every move.
pub const BRANCH_LIMIT: usize = 20;

/// Per-search state shared by every node.
pub(super) struct SearchContext<'a> {
    pub nodes: u64,
    pub control: &'a SearchControl,
    /// Color the search plays for.
    pub root: Color,
}

impl SearchContext<'_> {
    fn is_ally(&self, board: &Board, color: Color) -> bool {
        let variant = board.variant();
        variant.player_of(color) == variant.player_of(self.root)
    }
}

/// Order moves so large pieces come first; they are almost always better.
pub(super) fn order_moves(moves: &mut [Move]) {
    moves.sort_by_key(|m| std::cmp::Reverse(m.piece().map_or(0, |p| p.size())));
}

/// Depth-limited paranoid search below the root.
///
/// `passes` counts consecutive colors skipped for having no move; when
/// every color has passed the position is terminal.
pub(super) fn paranoid(
    board: &Board,
    depth: u8,
    mut alpha: i32,
    mut beta: i32,
    passes: usize,
    ctx: &mut SearchContext<'_>,
) -> i32 {
    ctx.nodes += 1;

    if ctx.control.should_stop(ctx.nodes) {
        return 0;
    }

    if depth == 0 {
        return evaluate(board, ctx.root);
    }

    let num_colors = board.variant().num_colors();
    let color = board.to_play();
    let mut moves = board.legal_moves(color);

    if moves.is_empty() {
        if passes + 1 >= num_colors {
            return terminal_score(board, ctx.root);
        }
        // Skipping a color does not consume depth
        let next = board.with_to_play(color.next(num_colors));
        return paranoid(&next, depth, alpha, beta, passes + 1, ctx);
    }

    order_moves(&mut moves);
    moves.truncate(BRANCH_LIMIT);

    if ctx.is_ally(board, color) {
        let mut best = -INF;
        for mv in &moves {
            let child = board.make_move(color, mv);
            let score = paranoid(&child, depth - 1, alpha, beta, 0, ctx);
            if ctx.control.is_stopped() {
                return 0;
            }
            best = best.max(score);
            alpha = alpha.max(score);
            if alpha >= beta {
                break;
            }
        }
        best
    } else {
        let mut best = INF;
        for mv in &moves {
            let child = board.make_move(color, mv);
            let score = paranoid(&child, depth - 1, alpha, beta, 0, ctx);
            if ctx.control.is_stopped() {
                return 0;
            }
            best = best.min(score);
            beta = beta.min(score);
            if alpha >= beta {
                break;
            }
        }
        best
    }
}

/// Search every root move to `depth`, returning the index and score of the
/// best one. Returns `None` if aborted before any move finished.
///
/// `moves` must be legal for `ctx.root` on `board`.
pub(super) fn search_root(
    board: &Board,
    moves: &[Move],
    depth: u8,
    ctx: &mut SearchContext<'_>,
) -> Option<(usize, i32)> {
    let mut best: Option<(usize, i32)> = None;
    let mut alpha = -INF;
    for (i, mv) in moves.iter().enumerate() {
        let child = board.make_move(ctx.root, mv);
        let score = paranoid(&child, depth - 1, alpha, INF, 0, ctx);
        if ctx.control.is_stopped() {
            break;
        }
        if best.is_none_or(|(_, s)| score > s) {
            best = Some((i, score));
            alpha = alpha.max(score);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::sync::atomic::AtomicBool;

    use blokit_core::Variant;

    #[test]
    fn ordering_puts_large_pieces_first() {
        let board = Board::new(Variant::Duo);
        let mut moves = board.legal_moves(Color::ALL[0]);
        order_moves(&mut moves);
        assert_eq!(moves[0].piece().map(|p| p.size()), Some(5));
        assert_eq!(moves.last().and_then(|m| m.piece()).map(|p| p.size()), Some(1));
    }

    #[test]
    fn depth_one_prefers_pentomino() {
        let board = Board::new(Variant::Duo);
        let control = SearchControl::new_infinite(Arc::new(AtomicBool::new(false)));
        let mut ctx = SearchContext {
            nodes: 0,
            control: &control,
            root: Color::ALL[0],
        };
        let mut moves = board.legal_moves(Color::ALL[0]);
        order_moves(&mut moves);
        let (best, _) = search_root(&board, &moves, 1, &mut ctx).unwrap();
        assert_eq!(moves[best].piece().map(|p| p.size()), Some(5));
        assert!(ctx.nodes as usize >= moves.len());
    }

    #[test]
    fn stopped_search_returns_none() {
        let board = Board::new(Variant::Duo);
        let control = SearchControl::new_infinite(Arc::new(AtomicBool::new(true)));
        let mut ctx = SearchContext {
            nodes: 0,
            control: &control,
            root: Color::ALL[0],
        };
        let moves = board.legal_moves(Color::ALL[0]);
        assert_eq!(search_root(&board, &moves, 2, &mut ctx), None);
    }
}
