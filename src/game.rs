use log::debug;

use crate::config::GameConfig;
use crate::error::{MoveError, PersistenceError};
use crate::history::History;
use crate::storage::{self, KeyValueStore, MemoryStore};
use crate::types::{GameState, GameStatus, MoveOutcome};
use crate::win::{self, Line};

pub const SAVE_FAILED_MESSAGE: &str = "Saving the game failed.";

/// One game session: the live state, its undo history, the last user-facing
/// error, and the store saved games go to.
pub struct GameEngine {
    state: GameState,
    history: History,
    error: Option<String>,
    config: GameConfig,
    store: Box<dyn KeyValueStore>,
}

impl GameEngine {
    pub fn new(config: GameConfig, store: Box<dyn KeyValueStore>) -> Self {
        Self {
            state: GameState::initial(),
            history: History::new(),
            error: None,
            config,
            store,
        }
    }

    /// Engine with the default config backed by an in-memory store.
    pub fn with_memory_store() -> Self {
        Self::new(GameConfig::default(), Box::new(MemoryStore::new()))
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn status(&self) -> GameStatus {
        self.state.status()
    }

    /// Squares of the winner's four-in-a-row, or `None` while play goes on.
    pub fn winning_line(&self) -> Option<Line> {
        self.state
            .winner
            .and_then(|winner| win::winning_line(&self.state.board, winner))
    }

    /// Sets the user-facing error slot. Used by front-end glue for failures
    /// outside the engine, such as opening the documentation.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Drops a piece for the player to move into `column`.
    ///
    /// Rejected moves (game over, full or out-of-range column) leave the
    /// state, history and error slot exactly as they were.
    pub fn drop_piece(&mut self, column: usize) -> Result<MoveOutcome, MoveError> {
        if self.state.game_over {
            return Err(MoveError::GameOver);
        }

        let prev = self.state;
        let player = prev.next;
        let (board, row) = prev.board.place(column, player)?;

        // An accepted placement always changes the board; `push` skips `prev`
        // when it already is the newest snapshot.
        self.history.push(prev);

        let won = win::has_win(&board, player);
        self.state = GameState {
            board,
            next: if won { player } else { player.other() },
            game_over: won,
            winner: won.then_some(player),
        };
        self.error = None;

        debug!(
            "{} dropped into column {column}, row {row}{}",
            player.name(),
            if won { " and won" } else { "" }
        );

        Ok(MoveOutcome {
            player,
            row,
            column,
            won,
        })
    }

    /// Starts over with an empty board and a fresh history.
    pub fn reset(&mut self) {
        self.state = GameState::initial();
        self.history = History::new();
        self.error = None;
        debug!("game reset");
    }

    /// Reverts the last completed move.
    ///
    /// With only the initial entry left the state becomes the initial state and
    /// the history is kept as is, so repeated calls are harmless.
    pub fn undo(&mut self) {
        self.state = match self.history.pop() {
            Some(previous) => previous,
            None => GameState::initial(),
        };
        self.error = None;
        debug!("undo, {} history entries left", self.history.len());
    }

    /// Persists the current state and history.
    ///
    /// On failure the error slot holds a message for the player and the
    /// underlying error is returned.
    pub fn save_game(&mut self) -> Result<(), PersistenceError> {
        let result = storage::save(
            self.store.as_mut(),
            &self.config.storage_key,
            &self.state,
            &self.history,
        );
        match &result {
            Ok(()) => self.error = None,
            Err(_) => self.error = Some(SAVE_FAILED_MESSAGE.to_string()),
        }
        result
    }

    /// Restores a saved game. State and history are replaced together or not
    /// at all.
    pub fn load_game(&mut self) -> Result<(), PersistenceError> {
        match storage::load(self.store.as_ref(), &self.config.storage_key) {
            Ok((state, history)) => {
                self.state = state;
                self.history = history;
                self.error = None;
                Ok(())
            }
            Err(err) => {
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::with_memory_store()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, Cell, COLS, ROWS};
    use crate::error::StoreError;
    use crate::types::Player;

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get_item(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Ok(Some("[]".to_string()))
        }

        fn set_item(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError("quota exceeded".to_string()))
        }
    }

    fn play(engine: &mut GameEngine, columns: &[usize]) {
        for &col in columns {
            engine.drop_piece(col).unwrap();
        }
    }

    #[test]
    fn initial_state_is_correct() {
        let engine = GameEngine::with_memory_store();

        assert_eq!(*engine.state(), GameState::initial());
        assert_eq!(engine.history().len(), 1);
        assert_eq!(engine.status(), GameStatus::InProgress);
        assert_eq!(engine.error(), None);
    }

    #[test]
    fn drop_fills_lowest_empty_row_of_every_column() {
        for col in 0..COLS {
            let mut engine = GameEngine::with_memory_store();
            play(&mut engine, &[col]);
            let before = engine.state().board;

            let outcome = engine.drop_piece(col).unwrap();

            assert_eq!(outcome.row, ROWS - 2);
            assert_eq!(outcome.player, Player::Red);
            let after = engine.state().board;
            for r in 0..ROWS {
                for c in 0..COLS {
                    if (r, c) == (ROWS - 2, col) {
                        assert_eq!(after.get(r, c), Cell::Red);
                    } else {
                        assert_eq!(after.get(r, c), before.get(r, c));
                    }
                }
            }
        }
    }

    #[test]
    fn turn_alternates_after_each_move() {
        let mut engine = GameEngine::with_memory_store();

        play(&mut engine, &[0]);
        assert_eq!(engine.state().next, Player::Red);
        play(&mut engine, &[1]);
        assert_eq!(engine.state().next, Player::Blue);
    }

    #[test]
    fn first_move_does_not_duplicate_initial_entry() {
        let mut engine = GameEngine::with_memory_store();

        play(&mut engine, &[3]);
        assert_eq!(engine.history().len(), 1);

        play(&mut engine, &[3]);
        assert_eq!(engine.history().len(), 2);
    }

    #[test]
    fn full_column_rejects_seventh_drop() {
        let mut engine = GameEngine::with_memory_store();
        play(&mut engine, &[0; ROWS]);
        assert!(engine.state().board.is_column_full(0));

        let state = *engine.state();
        let history = engine.history().clone();

        assert_eq!(engine.drop_piece(0), Err(MoveError::ColumnFull { column: 0 }));
        assert_eq!(*engine.state(), state);
        assert_eq!(*engine.history(), history);
    }

    #[test]
    fn invalid_column_is_rejected_without_change() {
        let mut engine = GameEngine::with_memory_store();
        play(&mut engine, &[2]);
        let state = *engine.state();

        assert_eq!(
            engine.drop_piece(COLS),
            Err(MoveError::InvalidColumn { column: COLS })
        );
        assert_eq!(*engine.state(), state);
        assert_eq!(engine.history().len(), 1);
    }

    #[test]
    fn bottom_row_win_for_blue() {
        let mut engine = GameEngine::with_memory_store();

        play(&mut engine, &[3, 3, 2, 2, 4, 4]);
        let outcome = engine.drop_piece(1).unwrap();

        assert!(outcome.won);
        let state = engine.state();
        assert!(state.game_over);
        assert_eq!(state.winner, Some(Player::Blue));
        assert_eq!(state.next, Player::Blue);
        for col in 1..=4 {
            assert_eq!(state.board.get(ROWS - 1, col), Cell::Blue);
        }
        assert_eq!(engine.status(), GameStatus::Won(Player::Blue));
    }

    #[test]
    fn winning_line_reports_bottom_row() {
        let mut engine = GameEngine::with_memory_store();
        play(&mut engine, &[3, 3, 2, 2, 4, 4]);
        assert_eq!(engine.winning_line(), None);

        play(&mut engine, &[1]);

        assert_eq!(
            engine.winning_line(),
            Some([(ROWS - 1, 1), (ROWS - 1, 2), (ROWS - 1, 3), (ROWS - 1, 4)])
        );
        engine.undo();
        assert_eq!(engine.winning_line(), None);
    }

    #[test]
    fn vertical_win_for_red_freezes_turn() {
        let mut engine = GameEngine::with_memory_store();

        play(&mut engine, &[0, 6, 1, 6, 0, 6, 1]);
        let outcome = engine.drop_piece(6).unwrap();

        assert!(outcome.won);
        assert_eq!(engine.state().winner, Some(Player::Red));
        assert_eq!(engine.state().next, Player::Red);
    }

    #[test]
    fn no_moves_after_win() {
        let mut engine = GameEngine::with_memory_store();
        play(&mut engine, &[3, 3, 2, 2, 4, 4, 1]);
        let state = *engine.state();
        let history = engine.history().clone();

        assert_eq!(engine.drop_piece(5), Err(MoveError::GameOver));
        assert_eq!(*engine.state(), state);
        assert_eq!(*engine.history(), history);
    }

    #[test]
    fn undo_after_one_move_restores_empty_board() {
        let mut engine = GameEngine::with_memory_store();
        play(&mut engine, &[5]);

        engine.undo();

        assert_eq!(engine.state().board, Board::empty());
        assert_eq!(engine.state().next, Player::Blue);
        assert_eq!(engine.history().len(), 1);
    }

    #[test]
    fn undo_on_initial_history_is_idempotent() {
        let mut engine = GameEngine::with_memory_store();

        engine.undo();
        engine.undo();

        assert_eq!(*engine.state(), GameState::initial());
        assert_eq!(engine.history().len(), 1);
    }

    #[test]
    fn undo_reverts_one_move_at_a_time() {
        let mut engine = GameEngine::with_memory_store();
        play(&mut engine, &[0]);
        let after_first = *engine.state();
        play(&mut engine, &[1]);
        let after_second = *engine.state();
        play(&mut engine, &[2]);

        engine.undo();
        assert_eq!(*engine.state(), after_second);
        engine.undo();
        assert_eq!(*engine.state(), after_first);
        engine.undo();
        assert_eq!(*engine.state(), GameState::initial());
    }

    #[test]
    fn undo_after_win_resumes_play() {
        let mut engine = GameEngine::with_memory_store();
        play(&mut engine, &[3, 3, 2, 2, 4, 4, 1]);
        assert!(engine.state().game_over);

        engine.undo();

        assert!(!engine.state().game_over);
        assert_eq!(engine.state().winner, None);
        assert_eq!(engine.state().next, Player::Blue);
        assert!(engine.drop_piece(5).is_ok());
    }

    #[test]
    fn reset_restores_canonical_state() {
        let mut engine = GameEngine::with_memory_store();
        play(&mut engine, &[3, 4, 5]);
        engine.set_error("something");

        engine.reset();

        assert_eq!(*engine.state(), GameState::initial());
        assert_eq!(*engine.history(), History::new());
        assert_eq!(engine.error(), None);
    }

    #[test]
    fn save_and_load_restore_state_and_history() {
        let mut engine = GameEngine::with_memory_store();
        play(&mut engine, &[3, 3, 2]);
        let state = *engine.state();
        let history = engine.history().clone();
        engine.save_game().unwrap();

        play(&mut engine, &[6, 6]);
        engine.load_game().unwrap();

        assert_eq!(*engine.state(), state);
        assert_eq!(*engine.history(), history);
        assert_eq!(engine.error(), None);
    }

    #[test]
    fn load_without_save_reports_not_found() {
        let mut engine = GameEngine::with_memory_store();
        play(&mut engine, &[1]);
        let state = *engine.state();

        assert_eq!(engine.load_game(), Err(PersistenceError::NotFound));
        assert_eq!(engine.error(), Some("no saved game found"));
        assert_eq!(*engine.state(), state);
    }

    #[test]
    fn save_failure_sets_error_and_next_move_clears_it() {
        let mut engine = GameEngine::new(GameConfig::default(), Box::new(FailingStore));

        assert!(engine.save_game().is_err());
        assert_eq!(engine.error(), Some(SAVE_FAILED_MESSAGE));

        play(&mut engine, &[0]);
        assert_eq!(engine.error(), None);
    }

    #[test]
    fn corrupt_load_keeps_current_game() {
        let mut engine = GameEngine::new(GameConfig::default(), Box::new(FailingStore));
        play(&mut engine, &[2, 3]);
        let state = *engine.state();
        let history = engine.history().clone();

        assert!(matches!(
            engine.load_game(),
            Err(PersistenceError::CorruptData(_))
        ));
        assert!(engine.error().is_some());
        assert_eq!(*engine.state(), state);
        assert_eq!(*engine.history(), history);
    }

    #[test]
    fn rejected_move_keeps_error_slot() {
        let mut engine = GameEngine::with_memory_store();
        engine.set_error("no saved game found");

        assert!(engine.drop_piece(COLS + 3).is_err());
        assert_eq!(engine.error(), Some("no saved game found"));
    }

    #[test]
    fn instances_are_independent() {
        let mut first = GameEngine::with_memory_store();
        let second = GameEngine::with_memory_store();

        play(&mut first, &[0, 1, 2]);

        assert_eq!(*second.state(), GameState::initial());
        assert_eq!(second.history().len(), 1);
    }
}
