use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::board::{Board, Cell};

/// One of the two sides. Blue always opens the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    #[serde(rename = "b")]
    Blue,
    #[serde(rename = "r")]
    Red,
}

impl Player {
    pub fn other(self) -> Player {
        match self {
            Player::Blue => Player::Red,
            Player::Red => Player::Blue,
        }
    }

    pub fn to_cell(self) -> Cell {
        match self {
            Player::Blue => Cell::Blue,
            Player::Red => Cell::Red,
        }
    }

    /// Short tag used in the stored game and handed to the front end.
    pub fn tag(self) -> &'static str {
        match self {
            Player::Blue => "b",
            Player::Red => "r",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Player::Blue => "Blue",
            Player::Red => "Red",
        }
    }
}

static INITIAL_STATE: Lazy<GameState> = Lazy::new(|| GameState {
    board: Board::empty(),
    next: Player::Blue,
    game_over: false,
    winner: None,
});

/// Snapshot of a game, as rendered by the front end and kept in the history.
///
/// Contract:
/// - `game_over` is `true` exactly when `winner` is set.
/// - After a winning move `next` still names the winner; no move follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub board: Board,
    pub next: Player,
    pub game_over: bool,
    pub winner: Option<Player>,
}

impl GameState {
    /// Empty board, Blue to move.
    pub fn initial() -> Self {
        *INITIAL_STATE
    }

    pub fn status(&self) -> GameStatus {
        match self.winner {
            Some(player) => GameStatus::Won(player),
            None => GameStatus::InProgress,
        }
    }

    /// Whether `game_over` and `winner` agree.
    pub fn is_consistent(&self) -> bool {
        self.game_over == self.winner.is_some()
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::initial()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Won(Player),
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, GameStatus::Won(_))
    }
}

/// Result of an accepted move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoveOutcome {
    pub player: Player,
    pub row: usize,
    pub column: usize,
    pub won: bool,
}
