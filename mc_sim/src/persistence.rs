//! Save sink that writes every committed state to the log as JSON.

use log::{Level, log_enabled, trace};
use memory_casino::{
    game::GameState,
    session::{PersistenceError, StatePersistence},
};
use uuid::Uuid;

/// Writes saves at trace level; nothing is serialized when trace is off
#[derive(Clone, Copy, Debug, Default)]
pub struct LogPersistence;

impl StatePersistence for LogPersistence {
    fn on_save_state(
        &self,
        session_id: Uuid,
        state: &GameState,
        elapsed_seconds: u32,
    ) -> Result<(), PersistenceError> {
        if !log_enabled!(Level::Trace) {
            return Ok(());
        }
        let json =
            serde_json::to_string(state).map_err(|e| PersistenceError::Rejected(e.to_string()))?;
        trace!("save {session_id} at {elapsed_seconds}s: {json}");
        Ok(())
    }
}
