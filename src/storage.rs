//! Saving and restoring a game.
//!
//! The current state and the undo history travel together as one JSON value,
//! `[state, [history...]]`, stored under a single key. Loading hands back both
//! halves or nothing.

use std::collections::HashMap;

use log::{error, info, warn};

use crate::error::{PersistenceError, StoreError};
use crate::history::History;
use crate::types::GameState;

/// String key-value store the game is persisted into.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-process store, used natively and in tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Writes `state` and `history` under `key`.
pub fn save(
    store: &mut dyn KeyValueStore,
    key: &str,
    state: &GameState,
    history: &History,
) -> Result<(), PersistenceError> {
    let payload = encode(state, history)?;
    match store.set_item(key, &payload) {
        Ok(()) => {
            info!("saved game under {key:?} ({} history entries)", history.len());
            Ok(())
        }
        Err(err) => {
            error!("saving game under {key:?} failed: {err}");
            Err(err.into())
        }
    }
}

/// Reads the game stored under `key`.
pub fn load(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<(GameState, History), PersistenceError> {
    let result = store
        .get_item(key)
        .map_err(PersistenceError::from)
        .and_then(|stored| stored.ok_or(PersistenceError::NotFound))
        .and_then(|payload| decode(&payload));

    match &result {
        Ok((_, history)) => {
            info!("loaded game from {key:?} ({} history entries)", history.len())
        }
        Err(err) => warn!("loading game from {key:?} failed: {err}"),
    }
    result
}

/// Serializes the pair into the stored JSON layout.
pub fn encode(state: &GameState, history: &History) -> Result<String, PersistenceError> {
    serde_json::to_string(&(state, history))
        .map_err(|e| PersistenceError::Storage(format!("failed to serialize game: {e}")))
}

/// Parses and checks a stored payload.
pub fn decode(payload: &str) -> Result<(GameState, History), PersistenceError> {
    let (state, history): (GameState, History) = serde_json::from_str(payload)
        .map_err(|e| PersistenceError::CorruptData(e.to_string()))?;

    if !state.is_consistent() {
        return Err(PersistenceError::CorruptData(
            "current state has gameOver and winner out of sync".to_string(),
        ));
    }
    if let Some(idx) = history
        .entries()
        .iter()
        .position(|entry| !entry.is_consistent())
    {
        return Err(PersistenceError::CorruptData(format!(
            "history entry {idx} has gameOver and winner out of sync"
        )));
    }

    Ok((state, history))
}
