//! Four-in-a-row detection.
//!
//! Every line of four squares on the 6×7 board is enumerated once into a
//! table (24 horizontal, 21 vertical, 12 per diagonal direction). Checking a
//! board is a scan over that table, so a win is found wherever it sits, not
//! only around the last move.

use once_cell::sync::Lazy;

use crate::board::{Board, COLS, ROWS};
use crate::types::Player;

pub const CONNECT: usize = 4;

/// A line of four squares as `(row, col)` pairs.
pub type Line = [(usize, usize); CONNECT];

/// Row/column steps: right, down, down-right, up-right.
const DIRECTIONS: [(i32, i32); 4] = [(0, 1), (1, 0), (1, 1), (-1, 1)];

static WIN_LINES: Lazy<Vec<Line>> = Lazy::new(generate_win_lines);

/// Returns `true` when `player` owns four consecutive squares in a row, a
/// column or either diagonal.
pub fn has_win(board: &Board, player: Player) -> bool {
    winning_line(board, player).is_some()
}

/// First line fully owned by `player`, if any.
pub fn winning_line(board: &Board, player: Player) -> Option<Line> {
    let cell = player.to_cell();
    WIN_LINES
        .iter()
        .find(|line| line.iter().all(|&(r, c)| board.get(r, c) == cell))
        .copied()
}

fn generate_win_lines() -> Vec<Line> {
    let mut lines = Vec::new();
    for row in 0..ROWS as i32 {
        for col in 0..COLS as i32 {
            for (dr, dc) in DIRECTIONS {
                let end_row = row + dr * (CONNECT as i32 - 1);
                let end_col = col + dc * (CONNECT as i32 - 1);
                if !in_bounds(end_row, end_col) {
                    continue;
                }
                let mut line = [(0, 0); CONNECT];
                for (i, square) in line.iter_mut().enumerate() {
                    let i = i as i32;
                    *square = ((row + dr * i) as usize, (col + dc * i) as usize);
                }
                lines.push(line);
            }
        }
    }
    lines
}

fn in_bounds(row: i32, col: i32) -> bool {
    (0..ROWS as i32).contains(&row) && (0..COLS as i32).contains(&col)
}
