//! Zobrist hashing keys for position lookup (opening book, duplicate detection).

use crate::board::Board;
use crate::color::Color;

/// Largest board side of any variant.
pub(crate) const MAX_SIZE: usize = 20;

const MAX_POINTS: usize = MAX_SIZE * MAX_SIZE;

/// Zobrist key for each (color, point) pair. Indexed by
/// `[Color::index()][y * MAX_SIZE + x]`.
pub(crate) static COLOR_POINT: [[u64; MAX_POINTS]; Color::COUNT] = {
    let mut table = [[0u64; MAX_POINTS]; Color::COUNT];
    let mut state = SEED;
    let mut color = 0;
    while color < Color::COUNT {
        let mut p = 0;
        while p < MAX_POINTS {
            let (val, next) = xorshift64(state);
            table[color][p] = val;
            state = next;
            p += 1;
        }
        color += 1;
    }
    table
};

/// Zobrist key for the color to play. Indexed by `Color::index()`.
pub(crate) static TO_PLAY: [u64; Color::COUNT] = {
    let mut table = [0u64; Color::COUNT];
    let mut state = SEED;
    // Advance past all 4 * 400 = 1600 color-point keys
    let mut i = 0;
    while i < Color::COUNT * MAX_POINTS {
        let (_, next) = xorshift64(state);
        state = next;
        i += 1;
    }
    let mut idx = 0;
    while idx < Color::COUNT {
        let (val, next) = xorshift64(state);
        table[idx] = val;
        state = next;
        idx += 1;
    }
    table
};

const SEED: u64 = 0x424c_4f4b_5553_2121; // "BLOKUS!!"

/// Xorshift64 PRNG. Returns (value, next_state).
const fn xorshift64(mut state: u64) -> (u64, u64) {
    state ^= state << 13;
    state ^= state >> 7;
    state ^= state << 17;
    (state, state)
}

/// Key for `color` covering the point at `(x, y)`.
#[inline]
pub(crate) fn point_key(color: Color, x: u8, y: u8) -> u64 {
    COLOR_POINT[color.index()][y as usize * MAX_SIZE + x as usize]
}

/// Compute a Zobrist hash from scratch for the given board.
pub(crate) fn hash_from_scratch(board: &Board) -> u64 {
    let mut hash = 0u64;
    let size = board.size();
    for y in 0..size {
        for x in 0..size {
            if let Some(color) = board.color_at(x, y) {
                hash ^= point_key(color, x, y);
            }
        }
    }
    hash ^= TO_PLAY[board.to_play().index()];
    hash
}
