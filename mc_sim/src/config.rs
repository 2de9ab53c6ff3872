//! Simulator configuration management.
//!
//! Reads `SIM_*` environment variables and applies command line overrides on
//! top.

use memory_casino::{
    entities::{CircuitStage, CircuitTier, MAX_VALUE, Suit},
    game::GameMode,
};

/// Largest table the deck can deal
const MAX_PAIRS: usize = Suit::ALL.len() * MAX_VALUE as usize / 2;

/// Complete simulator configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub mode: GameMode,
    pub pairs: usize,
    /// Number of games to play back to back
    pub games: u32,
    /// Deck seed; consecutive games use consecutive seeds
    pub seed: Option<u64>,
    /// High Roller tier
    pub stage: CircuitTier,
    /// Let the bot go all in whenever it can
    pub double_down: bool,
    /// Turn mismatches back immediately instead of waiting for the reveal delay
    pub fast: bool,
    /// Chance (percent) that the bot recalls a card it has seen
    pub recall_percent: u8,
}

/// Values given on the command line; they win over the environment
#[derive(Debug, Clone, Default)]
pub struct SimOverrides {
    pub mode: Option<String>,
    pub pairs: Option<usize>,
    pub games: Option<u32>,
    pub seed: Option<u64>,
    pub stage: Option<String>,
    pub double_down: bool,
    pub fast: bool,
}

impl SimConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns error if a mode or stage name is not recognised
    pub fn from_env(overrides: SimOverrides) -> Result<Self, ConfigError> {
        let mode = match overrides.mode.or_else(|| std::env::var("SIM_MODE").ok()) {
            Some(name) => name.parse::<GameMode>().map_err(|reason| ConfigError::Invalid {
                var: "SIM_MODE".to_string(),
                reason,
            })?,
            None => GameMode::Standard,
        };

        let stage = match overrides.stage.or_else(|| std::env::var("SIM_STAGE").ok()) {
            Some(name) => parse_tier(&name)?,
            None => CircuitTier::Local,
        };

        let seed = overrides
            .seed
            .or_else(|| std::env::var("SIM_SEED").ok().and_then(|v| v.parse().ok()));

        Ok(SimConfig {
            mode,
            pairs: overrides
                .pairs
                .unwrap_or_else(|| parse_env_or("SIM_PAIRS", 8)),
            games: overrides
                .games
                .unwrap_or_else(|| parse_env_or("SIM_GAMES", 1)),
            seed,
            stage,
            double_down: overrides.double_down || parse_env_or("SIM_DOUBLE_DOWN", false),
            fast: overrides.fast || parse_env_or("SIM_FAST", false),
            recall_percent: parse_env_or("SIM_BOT_RECALL", 80),
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pairs == 0 || self.pairs > MAX_PAIRS {
            return Err(ConfigError::Invalid {
                var: "SIM_PAIRS".to_string(),
                reason: format!("Must be between 1 and {MAX_PAIRS}"),
            });
        }

        if self.games == 0 {
            return Err(ConfigError::Invalid {
                var: "SIM_GAMES".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.recall_percent > 100 {
            return Err(ConfigError::Invalid {
                var: "SIM_BOT_RECALL".to_string(),
                reason: "Must be a percentage (0-100)".to_string(),
            });
        }

        Ok(())
    }

    /// Circuit stage for High Roller games, none otherwise
    pub fn circuit_stage(&self) -> Option<CircuitStage> {
        match self.mode {
            GameMode::HighRoller => Some(CircuitStage::for_tier(self.stage)),
            _ => None,
        }
    }

    /// Deck seed for the `game`-th game of the run
    pub fn seed_for_game(&self, game: u32) -> Option<u64> {
        self.seed.map(|seed| seed.wrapping_add(u64::from(game)))
    }
}

fn parse_tier(name: &str) -> Result<CircuitTier, ConfigError> {
    match name.to_lowercase().as_str() {
        "local" => Ok(CircuitTier::Local),
        "regional" => Ok(CircuitTier::Regional),
        "world" => Ok(CircuitTier::World),
        _ => Err(ConfigError::Invalid {
            var: "SIM_STAGE".to_string(),
            reason: format!("Unknown circuit stage '{name}' (local, regional, world)"),
        }),
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
