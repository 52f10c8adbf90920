//! Static evaluation of a Blokus position.

use blokit_core::{Board, Color};

/// Weight of one covered square relative to one attach point.
const POINT_WEIGHT: i32 = 4;

/// Attach points beyond this count add nothing; a wide-open frontier is
/// not worth more than material.
const ATTACH_CAP: i32 = 40;

/// Score bonus for a won terminal position, before the point margin.
pub const WIN_SCORE: i32 = 100_000;

/// Evaluate `board` from the point of view of the player controlling `color`.
///
/// Each player is valued by covered squares plus its frontier (empty points
/// where a new piece could anchor). The result is the player's value minus
/// the strongest opponent's.
pub fn evaluate(board: &Board, color: Color) -> i32 {
    let variant = board.variant();
    let mut values = vec![0i32; variant.num_players()];
    for c in variant.colors() {
        let attach = (board.attach_count(c) as i32).min(ATTACH_CAP);
        values[variant.player_of(c)] += board.points(c) as i32 * POINT_WEIGHT + attach;
    }
    relative(&values, variant.player_of(color))
}

/// Score a finished game for `color`: a decisive margin on top of the point
/// difference, so any win beats any unfinished evaluation.
pub fn terminal_score(board: &Board, color: Color) -> i32 {
    let variant = board.variant();
    let values: Vec<i32> = (0..variant.num_players())
        .map(|p| board.player_points(p) as i32)
        .collect();
    let margin = relative(&values, variant.player_of(color));
    match margin.signum() {
        1 => WIN_SCORE + margin,
        -1 => -WIN_SCORE + margin,
        _ => 0,
    }
}

fn relative(values: &[i32], player: usize) -> i32 {
    let best_other = values
        .iter()
        .enumerate()
        .filter(|&(p, _)| p != player)
        .map(|(_, &v)| v)
        .max()
        .unwrap_or(0);
    values[player] - best_other
}
