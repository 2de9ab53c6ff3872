//! Session error types.

use thiserror::Error;

use crate::game::errors::ConfigurationError;

/// Session errors
#[derive(Debug, Error)]
pub enum SessionError {
    /// The session actor has stopped
    #[error("game session is closed")]
    Closed,

    /// The action inbox is full
    #[error("game session inbox is full")]
    Busy,

    /// Setup rejected
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// Errors reported by a persistence collaborator. The session logs them and
/// carries on.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("snapshot rejected: {0}")]
    Rejected(String),
}

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;
