use serde::{Deserialize, Serialize};

use crate::error::MoveError;
use crate::types::Player;

pub const ROWS: usize = 6;
pub const COLS: usize = 7;

/// Content of a single board square.
///
/// Serialized with the tags used by the stored game: `""`, `"b"` and `"r"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    #[serde(rename = "")]
    Empty,
    #[serde(rename = "b")]
    Blue,
    #[serde(rename = "r")]
    Red,
}

impl Cell {
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

/// Connect Four board, row-major with row 0 at the top.
///
/// `Board` is a plain value: placing a piece returns a new board and leaves the
/// original untouched, so snapshots kept in the history never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    cells: [[Cell; COLS]; ROWS],
}

impl Board {
    /// Creates a board with every square empty.
    pub fn empty() -> Self {
        Self {
            cells: [[Cell::Empty; COLS]; ROWS],
        }
    }

    /// Returns the cell at `(row, col)`. Row 0 is the top, row 5 the bottom.
    ///
    /// Panics when the coordinates are outside the board.
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    /// All rows, top first.
    pub fn rows(&self) -> &[[Cell; COLS]; ROWS] {
        &self.cells
    }

    /// Number of pieces stacked in `col`. Out-of-range columns report 0.
    pub fn column_height(&self, col: usize) -> usize {
        if col >= COLS {
            return 0;
        }
        (0..ROWS)
            .rev()
            .take_while(|&row| !self.cells[row][col].is_empty())
            .count()
    }

    /// A column is full once its top square is taken. Out-of-range columns
    /// count as full.
    pub fn is_column_full(&self, col: usize) -> bool {
        if col >= COLS {
            return true;
        }
        !self.cells[0][col].is_empty()
    }

    pub fn is_full(&self) -> bool {
        (0..COLS).all(|col| self.is_column_full(col))
    }

    /// Columns that still accept a piece, left to right.
    pub fn legal_columns(&self) -> Vec<usize> {
        (0..COLS).filter(|&col| !self.is_column_full(col)).collect()
    }

    /// Drops a piece for `player` into `column`.
    ///
    /// Scans the column from the bottom row upwards and fills the first empty
    /// square. Returns the new board together with the landing row; `self` is
    /// not modified.
    pub fn place(&self, column: usize, player: Player) -> Result<(Board, usize), MoveError> {
        if column >= COLS {
            return Err(MoveError::InvalidColumn { column });
        }

        let row = (0..ROWS)
            .rev()
            .find(|&row| self.cells[row][column].is_empty())
            .ok_or(MoveError::ColumnFull { column })?;

        let mut next = *self;
        next.cells[row][column] = player.to_cell();
        Ok((next, row))
    }

    #[cfg(test)]
    pub(crate) fn from_rows(rows: [&str; ROWS]) -> Self {
        let mut board = Self::empty();
        for (r, line) in rows.iter().enumerate() {
            for (c, ch) in line.chars().take(COLS).enumerate() {
                board.cells[r][c] = match ch {
                    'b' => Cell::Blue,
                    'r' => Cell::Red,
                    _ => Cell::Empty,
                };
            }
        }
        board
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}
