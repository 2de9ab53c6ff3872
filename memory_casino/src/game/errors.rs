//! Game setup error types.

use thiserror::Error;

/// Errors raised while setting up a game. Rule violations during play are not
/// errors: the rules engine hands back the unchanged state instead.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ConfigurationError {
    /// More pairs requested than the deck can supply
    #[error("{requested} cards requested but the deck only has {available} unique faces")]
    NotEnoughCards { requested: usize, available: usize },

    /// Zero pairs requested
    #[error("need at least one pair")]
    NoPairs,

    /// Scoring configuration is inconsistent
    #[error("invalid scoring config for {field}: {reason}")]
    InvalidScoring { field: String, reason: String },

    /// Session timing configuration is inconsistent
    #[error("invalid session config for {field}: {reason}")]
    InvalidSession { field: String, reason: String },
}

impl ConfigurationError {
    pub(crate) fn scoring(field: &str, reason: &str) -> Self {
        ConfigurationError::InvalidScoring {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn session(field: &str, reason: &str) -> Self {
        ConfigurationError::InvalidSession {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Result type for game setup
pub type SetupResult<T> = Result<T, ConfigurationError>;
