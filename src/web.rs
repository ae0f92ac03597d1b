//! Browser bindings.
//!
//! `ConnectFourGame` is the object the front end holds. Every intent maps to
//! one engine call; the front end re-reads `state()` and `error()` afterwards
//! and renders them.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::config::GameConfig;
use crate::error::StoreError;
use crate::game::GameEngine;
use crate::storage::KeyValueStore;

pub const DOCS_FAILED_MESSAGE: &str = "Could not open the documentation.";

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = localStorage, js_name = getItem)]
    fn local_storage_get(key: &str) -> Result<Option<String>, JsValue>;

    #[wasm_bindgen(catch, js_namespace = localStorage, js_name = setItem)]
    fn local_storage_set(key: &str, value: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(catch, js_namespace = window, js_name = open)]
    fn window_open(url: &str, target: &str, features: &str) -> Result<JsValue, JsValue>;
}

/// `window.localStorage` as a [`KeyValueStore`].
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorage;

impl KeyValueStore for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        local_storage_get(key).map_err(store_error)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        local_storage_set(key, value).map_err(store_error)
    }
}

fn store_error(err: JsValue) -> StoreError {
    StoreError(js_message(&err))
}

fn js_message(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

// JSON-compatible output so `winner: None` reaches JS as `null`.
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsError::new(&e.to_string()))
}

#[wasm_bindgen]
pub struct ConnectFourGame {
    engine: GameEngine,
}

#[wasm_bindgen]
impl ConnectFourGame {
    /// Creates a game persisting to `localStorage`. `config` may be omitted or
    /// hold any subset of `{ storageKey, docsUrl }`.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<ConnectFourGame, JsError> {
        let config = if config.is_undefined() || config.is_null() {
            GameConfig::default()
        } else {
            let config: GameConfig = serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsError::new(&e.to_string()))?;
            config.validate()?;
            config
        };
        Ok(Self {
            engine: GameEngine::new(config, Box::new(LocalStorage)),
        })
    }

    /// Current `{ board, next, gameOver, winner }`.
    pub fn state(&self) -> Result<JsValue, JsError> {
        to_js(self.engine.state())
    }

    pub fn error(&self) -> Option<String> {
        self.engine.error().map(str::to_string)
    }

    /// Rows, columns, player tags, storage key and docs URL.
    pub fn config(&self) -> Result<JsValue, JsError> {
        to_js(&self.engine.config().view())
    }

    /// `[[row, col], ...]` of the winning four, or `null` while play goes on.
    #[wasm_bindgen(js_name = winningLine)]
    pub fn winning_line(&self) -> Result<JsValue, JsError> {
        to_js(&self.engine.winning_line())
    }

    #[wasm_bindgen(js_name = historyLength)]
    pub fn history_length(&self) -> usize {
        self.engine.history().len()
    }

    /// Returns `false` when the move was rejected.
    #[wasm_bindgen(js_name = dropPiece)]
    pub fn drop_piece(&mut self, column: usize) -> bool {
        self.engine.drop_piece(column).is_ok()
    }

    #[wasm_bindgen(js_name = resetGame)]
    pub fn reset_game(&mut self) {
        self.engine.reset();
    }

    pub fn undo(&mut self) {
        self.engine.undo();
    }

    #[wasm_bindgen(js_name = saveGame)]
    pub fn save_game(&mut self) -> bool {
        self.engine.save_game().is_ok()
    }

    #[wasm_bindgen(js_name = loadGame)]
    pub fn load_game(&mut self) -> bool {
        self.engine.load_game().is_ok()
    }

    /// Opens `url` (or the configured docs page) in a new tab.
    #[wasm_bindgen(js_name = openDocumentation)]
    pub fn open_documentation(&mut self, url: Option<String>) {
        let url = url.unwrap_or_else(|| self.engine.config().docs_url.clone());
        match window_open(&url, "_blank", "noopener,noreferrer") {
            Ok(_) => self.engine.clear_error(),
            Err(err) => {
                log::error!("opening {url} failed: {}", js_message(&err));
                self.engine.set_error(DOCS_FAILED_MESSAGE);
            }
        }
    }
}
