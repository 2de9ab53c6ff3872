//! Persistence collaborator boundary.

use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};
use uuid::Uuid;

use super::errors::PersistenceError;
use crate::game::GameState;

/// Receives every committed state change.
///
/// Called synchronously from the session after each mutation; it must return
/// quickly and its failures never reach the game.
pub trait StatePersistence: Send + Sync {
    fn on_save_state(
        &self,
        session_id: Uuid,
        state: &GameState,
        elapsed_seconds: u32,
    ) -> Result<(), PersistenceError>;
}

/// Discards everything
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopPersistence;

impl StatePersistence for NoopPersistence {
    fn on_save_state(&self, _: Uuid, _: &GameState, _: u32) -> Result<(), PersistenceError> {
        Ok(())
    }
}

/// The last saved session
#[derive(Clone, Debug, PartialEq)]
pub struct SavedSession {
    pub session_id: Uuid,
    pub state: GameState,
    pub elapsed_seconds: u32,
}

/// Keeps the latest save in memory
#[derive(Debug, Default)]
pub struct InMemoryPersistence {
    latest: Mutex<Option<SavedSession>>,
    save_count: AtomicUsize,
}

impl InMemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latest(&self) -> Option<SavedSession> {
        self.latest.lock().ok().and_then(|latest| latest.clone())
    }

    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::Relaxed)
    }
}

impl StatePersistence for InMemoryPersistence {
    fn on_save_state(
        &self,
        session_id: Uuid,
        state: &GameState,
        elapsed_seconds: u32,
    ) -> Result<(), PersistenceError> {
        let mut latest = self
            .latest
            .lock()
            .map_err(|_| PersistenceError::Unavailable("save slot poisoned".to_string()))?;
        *latest = Some(SavedSession {
            session_id,
            state: state.clone(),
            elapsed_seconds,
        });
        self.save_count.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameMode, ScoringConfig};

    #[test]
    fn test_in_memory_keeps_latest() {
        let store = InMemoryPersistence::new();
        let id = Uuid::new_v4();
        let mut state =
            GameState::with_cards(Vec::new(), 1, ScoringConfig::default(), GameMode::Standard);
        store.on_save_state(id, &state, 3).unwrap();
        state.moves = 4;
        store.on_save_state(id, &state, 5).unwrap();

        let saved = store.latest().unwrap();
        assert_eq!(saved.session_id, id);
        assert_eq!(saved.state.moves, 4);
        assert_eq!(saved.elapsed_seconds, 5);
        assert_eq!(store.save_count(), 2);
    }
}
