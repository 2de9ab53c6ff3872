//! Scoring configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::constants::TIME_ATTACK_FALLBACK_SECS_PER_PAIR;
use super::errors::ConfigurationError;

/// Thresholds and point values used by every scoring rule.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ScoringConfig {
    /// Combo needed to unlock Double Down
    pub heat_mode_threshold: u32,

    /// Combo above which a match counts as "the nuts" (and auto-banks the pot)
    pub the_nuts_threshold: u32,

    /// Combo above which the high roller comment is used
    pub high_roller_threshold: u32,

    /// Points for every successful match
    pub base_match_points: i64,

    /// Multiplied by combo squared
    pub combo_bonus_points: i64,

    /// Time bonus budget per pair (non Time Attack modes)
    pub time_bonus_per_pair: i64,

    /// Time bonus lost per elapsed second (non Time Attack modes)
    pub time_penalty_per_second: i64,

    /// Scales the pairs-per-move ratio into the move bonus
    pub move_bonus_multiplier: i64,

    /// Points deducted on a mismatch outside High Roller, floored at zero
    pub mismatch_penalty: i64,

    /// "Pot odds" comment fires when matches == pairs / divisor
    pub comment_pot_odds_divisor: usize,

    /// "Photographic" comment fires when moves <= matches * threshold
    pub comment_moves_per_match_threshold: u32,

    /// Starting clock in seconds, keyed by pair count
    pub time_attack_initial_time_map: BTreeMap<usize, u32>,

    /// Seconds gained on every Time Attack match
    pub time_attack_base_gain: u32,

    /// Extra seconds gained per combo step
    pub time_attack_combo_bonus_multiplier: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            heat_mode_threshold: 3,
            the_nuts_threshold: 5,
            high_roller_threshold: 3,
            base_match_points: 100,
            combo_bonus_points: 25,
            time_bonus_per_pair: 50,
            time_penalty_per_second: 5,
            move_bonus_multiplier: 500,
            mismatch_penalty: 10,
            comment_pot_odds_divisor: 2,
            comment_moves_per_match_threshold: 1,
            time_attack_initial_time_map: BTreeMap::from([(6, 45), (8, 60), (10, 75), (12, 90)]),
            time_attack_base_gain: 2,
            time_attack_combo_bonus_multiplier: 1,
        }
    }
}

impl ScoringConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.base_match_points <= 0 {
            return Err(ConfigurationError::scoring(
                "base_match_points",
                "must be greater than 0",
            ));
        }

        if self.the_nuts_threshold < self.heat_mode_threshold {
            return Err(ConfigurationError::scoring(
                "the_nuts_threshold",
                "must not be below heat_mode_threshold",
            ));
        }

        if self.comment_pot_odds_divisor == 0 {
            return Err(ConfigurationError::scoring(
                "comment_pot_odds_divisor",
                "must be greater than 0",
            ));
        }

        if self.combo_bonus_points < 0
            || self.time_bonus_per_pair < 0
            || self.time_penalty_per_second < 0
            || self.move_bonus_multiplier < 0
            || self.mismatch_penalty < 0
        {
            return Err(ConfigurationError::scoring(
                "points",
                "point values must not be negative",
            ));
        }

        if self.time_attack_initial_time_map.values().any(|&secs| secs == 0) {
            return Err(ConfigurationError::scoring(
                "time_attack_initial_time_map",
                "every entry must grant at least one second",
            ));
        }

        Ok(())
    }

    /// Starting Time Attack clock for a board of `pair_count` pairs
    pub fn time_attack_initial_time(&self, pair_count: usize) -> u32 {
        self.time_attack_initial_time_map
            .get(&pair_count)
            .copied()
            .unwrap_or_else(|| {
                let pairs = u32::try_from(pair_count).unwrap_or(u32::MAX);
                pairs.saturating_mul(TIME_ATTACK_FALLBACK_SECS_PER_PAIR)
            })
    }
}
