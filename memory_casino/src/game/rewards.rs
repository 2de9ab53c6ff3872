//! Chip payout for a finished game.
//!
//! The score itself is computed by the rules engine alone; this only turns
//! a final score into chips for the player's wallet.

use super::constants::{DAILY_CHALLENGE_BONUS_CHIPS, POINTS_PER_CHIP};
use super::entities::{GameMode, GameState};

/// Payout multiplier for larger boards.
pub fn difficulty_factor(pair_count: usize) -> f64 {
    match pair_count {
        0..=6 => 1.0,
        7..=8 => 1.25,
        9..=10 => 1.5,
        _ => 2.0,
    }
}

/// Chips earned by a game. Only won games pay.
pub fn chip_payout(state: &GameState) -> u64 {
    if !state.is_game_won {
        return 0;
    }
    let chips = u64::try_from(state.score.max(0) / POINTS_PER_CHIP).unwrap_or_default();

    match state.mode {
        GameMode::DailyChallenge => chips + DAILY_CHALLENGE_BONUS_CHIPS,
        GameMode::Standard | GameMode::TimeAttack | GameMode::HighRoller => {
            (chips as f64 * difficulty_factor(state.pair_count)).floor() as u64
        }
    }
}
