//! Two-player Connect Four on a 6×7 board.
//!
//! The engine ([`game::GameEngine`]) owns the live state, the undo history
//! and the last user-facing error. [`web::ConnectFourGame`] wraps it for the
//! browser and stores saved games in `localStorage`.

pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod history;
pub mod storage;
pub mod types;
pub mod web;
pub mod win;

pub use board::{Board, Cell, COLS, ROWS};
pub use config::GameConfig;
pub use error::{ConfigError, MoveError, PersistenceError, StoreError};
pub use game::GameEngine;
pub use history::History;
pub use storage::{KeyValueStore, MemoryStore};
pub use types::{GameState, GameStatus, MoveOutcome, Player};
