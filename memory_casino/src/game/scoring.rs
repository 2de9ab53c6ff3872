//! Mode-specific scoring rules.
//!
//! Every mode except High Roller adds match points straight into the score.
//! High Roller grows an at-risk pot instead and only banks it on a win or on
//! a combo high enough to count as "the nuts". Both rule sets sit behind the
//! [`ScoringRules`] trait so the rules engine never branches on mode itself.

use enum_dispatch::enum_dispatch;

use super::config::ScoringConfig;
use super::constants::TIME_ATTACK_MISMATCH_PENALTY_SECS;
use super::entities::{GameMode, GameState};

/// Score fields after a successful match
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MatchScore {
    pub score: i64,
    pub current_pot: i64,
    pub banked_score: i64,
    /// Points this match produced (before any double down)
    pub points_earned: i64,
    pub double_down_bonus: i64,
    /// The pot moved into the bank
    pub pot_banked: bool,
}

/// Score fields after a mismatch (the All-In rule is handled by the rules engine)
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MismatchScore {
    pub score: i64,
    pub current_pot: i64,
    pub banked_score: i64,
    /// Points actually taken away
    pub penalty: i64,
    pub is_busted: bool,
}

/// Bonus for a match made while `combo` consecutive matches were already on the board.
pub fn combo_bonus(config: &ScoringConfig, combo: u32) -> i64 {
    let combo = i64::from(combo);
    combo * combo * config.combo_bonus_points
}

/// Seconds added to the Time Attack clock for a match made at `combo`.
pub fn time_attack_gain(config: &ScoringConfig, combo: u32) -> u32 {
    config
        .time_attack_base_gain
        .saturating_add(combo.saturating_mul(config.time_attack_combo_bonus_multiplier))
}

/// Time Attack clock after a mismatch is turned back down.
pub fn time_attack_after_mismatch(remaining_secs: u32) -> u32 {
    remaining_secs.saturating_sub(TIME_ATTACK_MISMATCH_PENALTY_SECS)
}

/// Pot and bank after a High Roller match.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct HighRollerOutcome {
    pub points_earned: i64,
    pub current_pot: i64,
    pub banked_score: i64,
    pub double_down_bonus: i64,
    /// Whether the pot was moved into the bank by this match
    pub banked: bool,
}

/// Grow the pot by the match points and decide whether to bank it.
///
/// `state` is the state with the new pair already marked but before the combo
/// is incremented. When the game is won under Double Down the whole banked
/// score (pot included) is doubled.
pub fn calculate_high_roller_score(
    state: &GameState,
    is_won: bool,
    base_points: i64,
    combo_bonus: i64,
) -> HighRollerOutcome {
    let stage = state.circuit();
    let points_earned = ((base_points + combo_bonus) as f64 * stage.pot_growth_multiplier).floor() as i64;
    let new_pot = state.current_pot + points_earned;
    let is_nuts_banking = state.combo_multiplier + 1 >= state.config.the_nuts_threshold;

    let mut outcome = if is_won || is_nuts_banking {
        HighRollerOutcome {
            points_earned,
            current_pot: 0,
            banked_score: state.banked_score + new_pot,
            double_down_bonus: 0,
            banked: true,
        }
    } else {
        HighRollerOutcome {
            points_earned,
            current_pot: new_pot,
            banked_score: state.banked_score,
            double_down_bonus: 0,
            banked: false,
        }
    };

    if is_won && state.is_double_down_active {
        outcome.double_down_bonus = outcome.banked_score;
        outcome.banked_score *= 2;
    }

    outcome
}

/// Pot reduction applied by a High Roller mismatch.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct BadBeat {
    pub penalty: i64,
    pub resulting_pot: i64,
    pub is_busted: bool,
}

/// Take the circuit's bust penalty out of the pot. Busting needs both an
/// empty pot and an empty bank.
pub fn calculate_bad_beat(state: &GameState) -> BadBeat {
    let stage = state.circuit();
    let penalty = (state.current_pot as f64 * stage.bust_penalty).floor() as i64;
    let resulting_pot = (state.current_pot - penalty).max(0);
    BadBeat {
        penalty,
        resulting_pot,
        is_busted: resulting_pot == 0 && state.banked_score == 0,
    }
}

/// Scoring behaviour that differs between game modes
#[enum_dispatch]
pub trait ScoringRules {
    /// Score a successful match. `state` has the pair marked, combo not yet incremented.
    fn score_match(
        &self,
        state: &GameState,
        is_won: bool,
        base_points: i64,
        combo_bonus: i64,
    ) -> MatchScore;

    /// Score a mismatch made without Double Down active.
    fn score_mismatch(&self, state: &GameState) -> MismatchScore;
}

/// Standard, Time Attack and Daily Challenge: points go straight to the score.
#[derive(Clone, Copy, Debug, Default)]
pub struct DirectScoring;

impl ScoringRules for DirectScoring {
    fn score_match(
        &self,
        state: &GameState,
        is_won: bool,
        base_points: i64,
        combo_bonus: i64,
    ) -> MatchScore {
        let points_earned = base_points + combo_bonus;
        let double_down_bonus = if is_won && state.is_double_down_active {
            points_earned
        } else {
            0
        };
        let score = state.score + points_earned + double_down_bonus;

        MatchScore {
            score,
            current_pot: state.current_pot,
            banked_score: score,
            points_earned,
            double_down_bonus,
            pot_banked: false,
        }
    }

    fn score_mismatch(&self, state: &GameState) -> MismatchScore {
        let score = (state.score - state.config.mismatch_penalty).max(0);
        MismatchScore {
            score,
            current_pot: state.current_pot,
            banked_score: score,
            penalty: state.score - score,
            is_busted: false,
        }
    }
}

/// High Roller: points grow an at-risk pot.
#[derive(Clone, Copy, Debug, Default)]
pub struct PotScoring;

impl ScoringRules for PotScoring {
    fn score_match(
        &self,
        state: &GameState,
        is_won: bool,
        base_points: i64,
        combo_bonus: i64,
    ) -> MatchScore {
        let outcome = calculate_high_roller_score(state, is_won, base_points, combo_bonus);
        MatchScore {
            score: outcome.banked_score + outcome.current_pot,
            current_pot: outcome.current_pot,
            banked_score: outcome.banked_score,
            points_earned: outcome.points_earned,
            double_down_bonus: outcome.double_down_bonus,
            pot_banked: outcome.banked,
        }
    }

    fn score_mismatch(&self, state: &GameState) -> MismatchScore {
        let bad_beat = calculate_bad_beat(state);
        MismatchScore {
            score: state.banked_score + bad_beat.resulting_pot,
            current_pot: bad_beat.resulting_pot,
            banked_score: state.banked_score,
            penalty: state.current_pot - bad_beat.resulting_pot,
            is_busted: bad_beat.is_busted,
        }
    }
}

/// Scoring rules selected by game mode
#[enum_dispatch(ScoringRules)]
#[derive(Clone, Copy, Debug)]
pub enum Scoring {
    DirectScoring,
    PotScoring,
}

impl Scoring {
    pub fn for_mode(mode: GameMode) -> Self {
        match mode {
            GameMode::HighRoller => PotScoring.into(),
            GameMode::Standard | GameMode::TimeAttack | GameMode::DailyChallenge => {
                DirectScoring.into()
            }
        }
    }
}
