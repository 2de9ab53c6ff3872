//! Session timing configuration.

use serde::{Deserialize, Serialize};
use tokio::time::Duration;

use crate::game::constants::{
    DOUBLE_DOWN_PEEK_MS, EFFECT_CHANNEL_CAPACITY, INBOX_CAPACITY, MISMATCH_REVEAL_MS,
};
use crate::game::errors::ConfigurationError;

/// Session configuration
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SessionConfig {
    /// Game clock period in milliseconds (default: one second)
    pub tick_interval_ms: u64,

    /// Delay before a mismatched pair is turned back down
    pub mismatch_reveal_ms: u64,

    /// How long the Double Down peek shows the table
    pub double_down_peek_ms: u64,

    /// Effect channel slots; slow subscribers lose the oldest effects
    pub effect_capacity: usize,

    /// Action inbox slots
    pub inbox_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            mismatch_reveal_ms: MISMATCH_REVEAL_MS,
            double_down_peek_ms: DOUBLE_DOWN_PEEK_MS,
            effect_capacity: EFFECT_CHANNEL_CAPACITY,
            inbox_capacity: INBOX_CAPACITY,
        }
    }
}

impl SessionConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigurationError::session(
                "tick_interval_ms",
                "must be greater than 0",
            ));
        }

        if self.effect_capacity == 0 {
            return Err(ConfigurationError::session(
                "effect_capacity",
                "must be greater than 0",
            ));
        }

        if self.inbox_capacity == 0 {
            return Err(ConfigurationError::session(
                "inbox_capacity",
                "must be greater than 0",
            ));
        }

        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn mismatch_reveal_delay(&self) -> Duration {
        Duration::from_millis(self.mismatch_reveal_ms)
    }

    pub fn double_down_peek(&self) -> Duration {
        Duration::from_millis(self.double_down_peek_ms)
    }
}
