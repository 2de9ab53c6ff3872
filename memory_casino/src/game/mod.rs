//! Card matching game engine - data model and pure rules.
//!
//! This module provides the foundational game implementation including:
//! - Card, deck and game state value types
//! - Flip resolution, match/mismatch handling and final bonuses
//! - Mode-specific scoring (direct scoring and High Roller pots)
//! - Commentary selection and chip payouts

// Submodules
pub mod commentary;
pub mod config;
pub mod constants;
pub mod entities;
pub mod errors;
pub mod rewards;
pub mod rules;
pub mod scoring;
pub mod seed;

pub use config::ScoringConfig;
pub use entities::{
    Card, CardId, CircuitStage, CircuitTier, Face, GameMode, GameState, MatchComment,
    ScoreBreakdown, Suit,
};
pub use errors::{ConfigurationError, SetupResult};
pub use rules::{
    GameEvent, GameSetup, activate_double_down, apply_final_bonuses, can_double_down,
    create_initial_state, flip_card, new_game, reset_error_cards,
};
