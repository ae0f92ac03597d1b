/// Reasons a move is rejected. A rejected move never changes the game.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("column {column} is full")]
    ColumnFull { column: usize },

    #[error("column {column} is out of bounds")]
    InvalidColumn { column: usize },

    #[error("the game is already over")]
    GameOver,
}

/// Failure reported by a [`KeyValueStore`](crate::storage::KeyValueStore).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct StoreError(pub String);

/// Raised when an undo history would start out with no entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("history is empty")]
pub struct EmptyHistory;

/// Errors from saving or loading a game.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PersistenceError {
    #[error("storage error: {0}")]
    Storage(String),

    #[error("no saved game found")]
    NotFound,

    #[error("saved game is corrupt: {0}")]
    CorruptData(String),
}

impl From<StoreError> for PersistenceError {
    fn from(err: StoreError) -> Self {
        PersistenceError::Storage(err.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("config validation error: {0}")]
    Validation(String),

    #[error("failed to parse config: {0}")]
    Parse(String),
}
