use serde::{Deserialize, Serialize};

use crate::board::{COLS, ROWS};
use crate::error::ConfigError;
use crate::types::Player;

pub const DEFAULT_STORAGE_KEY: &str = "C4_GAME_STATE";
pub const DEFAULT_DOCS_URL: &str = "/docs/connect4_doc.html";

/// Runtime settings for a game instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    /// Key of the saved game in the durable store.
    pub storage_key: String,
    /// Page opened by the documentation intent when no URL is given.
    pub docs_url: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            docs_url: DEFAULT_DOCS_URL.to_string(),
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::Validation(
                "storage_key must not be empty".into(),
            ));
        }
        if self.docs_url.trim().is_empty() {
            return Err(ConfigError::Validation("docs_url must not be empty".into()));
        }
        Ok(())
    }

    /// Parses a config from JSON, filling missing fields with defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Static data the front end needs for rendering.
    pub fn view(&self) -> ConfigView {
        ConfigView {
            rows: ROWS,
            cols: COLS,
            players: PlayerTags {
                blue: Player::Blue.tag(),
                red: Player::Red.tag(),
            },
            storage_key: self.storage_key.clone(),
            docs_url: self.docs_url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigView {
    pub rows: usize,
    pub cols: usize,
    pub players: PlayerTags,
    pub storage_key: String,
    pub docs_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlayerTags {
    pub blue: &'static str,
    pub red: &'static str,
}
