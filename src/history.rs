use serde::{Deserialize, Serialize};

use crate::error::EmptyHistory;
use crate::types::GameState;

/// Stack of earlier game states used for undo, oldest first.
///
/// Never empty: it starts with the initial state and undo stops popping once
/// a single entry is left.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<GameState>", into = "Vec<GameState>")]
pub struct History {
    entries: Vec<GameState>,
}

impl History {
    pub fn new() -> Self {
        Self {
            entries: vec![GameState::initial()],
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn top(&self) -> &GameState {
        // `entries` holds at least one state at all times.
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[GameState] {
        &self.entries
    }

    /// Records `state` unless it is already the newest entry.
    /// Returns whether a snapshot was added.
    pub fn push(&mut self, state: GameState) -> bool {
        if *self.top() == state {
            return false;
        }
        self.entries.push(state);
        true
    }

    /// Removes and returns the newest entry while more than one remains.
    pub fn pop(&mut self) -> Option<GameState> {
        if self.entries.len() > 1 {
            self.entries.pop()
        } else {
            None
        }
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<Vec<GameState>> for History {
    type Error = EmptyHistory;

    fn try_from(entries: Vec<GameState>) -> Result<Self, Self::Error> {
        if entries.is_empty() {
            return Err(EmptyHistory);
        }
        Ok(Self { entries })
    }
}

impl From<History> for Vec<GameState> {
    fn from(history: History) -> Self {
        history.entries
    }
}
