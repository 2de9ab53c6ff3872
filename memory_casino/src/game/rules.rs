//! Match rules engine.
//!
//! Pure functions from one [`GameState`] to the next. Nothing here mutates
//! its input; an action that does not apply returns an identical copy of
//! the state and no event, which is how invalid actions are "ignored".

use log::debug;
use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::commentary::{CommentContext, select_comment};
use super::config::ScoringConfig;
use super::constants::{DOUBLE_DOWN_MIN_REMAINING_PAIRS, TIME_ATTACK_SECOND_VALUE};
use super::entities::{
    Card, CardId, CircuitStage, Face, GameMode, GameState, ScoreBreakdown, UNIQUE_FACES,
};
use super::errors::{ConfigurationError, SetupResult};
use super::scoring::{Scoring, ScoringRules, combo_bonus};
use super::seed;

/// What a flip resolved to
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum GameEvent {
    /// First card of a turn turned over
    CardFlipped,
    MatchSuccess,
    /// Match made on a combo above the nuts threshold
    TheNutsAchieved,
    GameWon,
    MatchFailure,
    /// Mismatch while all in
    GameOver,
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::CardFlipped => "card flipped",
            Self::MatchSuccess => "match",
            Self::TheNutsAchieved => "the nuts",
            Self::GameWon => "game won",
            Self::MatchFailure => "mismatch",
            Self::GameOver => "busted all in",
        };
        write!(f, "{repr}")
    }
}

/// Everything needed to deal a new game
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct GameSetup {
    pub pair_count: usize,
    pub mode: GameMode,
    pub config: ScoringConfig,

    /// Fixed deck seed. Daily Challenge without one uses today's date.
    pub seed: Option<u64>,

    /// High Roller tier
    pub circuit_stage: Option<CircuitStage>,
}

impl GameSetup {
    pub fn new(pair_count: usize, mode: GameMode) -> Self {
        Self {
            pair_count,
            mode,
            config: ScoringConfig::default(),
            seed: None,
            circuit_stage: None,
        }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: ScoringConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_circuit_stage(mut self, stage: CircuitStage) -> Self {
        self.circuit_stage = Some(stage);
        self
    }

    /// The seed a deal from this setup will use, if any.
    pub fn effective_seed(&self) -> Option<u64> {
        match (self.seed, self.mode) {
            (Some(seed), _) => Some(seed),
            (None, GameMode::DailyChallenge) => Some(seed::today_seed()),
            (None, _) => None,
        }
    }
}

/// Deal `pair_count` random pairs from a 52-card deck.
///
/// The deck is shuffled, the first `pair_count` faces are duplicated, and the
/// resulting cards are shuffled again and numbered in table order. The same
/// RNG sequence always produces the same table.
pub fn create_initial_state<R: Rng + ?Sized>(
    pair_count: usize,
    config: ScoringConfig,
    mode: GameMode,
    rng: &mut R,
) -> SetupResult<GameState> {
    if pair_count == 0 {
        return Err(ConfigurationError::NoPairs);
    }
    if pair_count * 2 > UNIQUE_FACES {
        return Err(ConfigurationError::NotEnoughCards {
            requested: pair_count * 2,
            available: UNIQUE_FACES,
        });
    }
    config.validate()?;

    let mut faces = Face::all();
    faces.shuffle(rng);

    let mut dealt: Vec<Face> = faces
        .into_iter()
        .take(pair_count)
        .flat_map(|face| [face, face])
        .collect();
    dealt.shuffle(rng);

    let cards = dealt
        .into_iter()
        .zip(0..)
        .map(|(face, id)| Card::new(id, face))
        .collect();

    Ok(GameState::with_cards(cards, pair_count, config, mode))
}

/// Deal a game from a setup, choosing the RNG the mode calls for.
pub fn new_game(setup: &GameSetup) -> SetupResult<GameState> {
    let seed = setup.effective_seed();
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut state =
        create_initial_state(setup.pair_count, setup.config.clone(), setup.mode, &mut rng)?;
    state.seed = seed;
    state.circuit_stage = match setup.mode {
        GameMode::HighRoller => Some(setup.circuit_stage.unwrap_or_default()),
        _ => setup.circuit_stage,
    };

    debug!(
        "Dealt {} pairs for {} (seed {:?})",
        setup.pair_count, setup.mode, seed
    );
    Ok(state)
}

/// Turn a card over and resolve the pair if it is the second of a turn.
///
/// Returns the unchanged state and no event when the flip is not allowed:
/// the game is over, the id is unknown, the card is already showing, or two
/// unresolved cards are already face-up. `rng` only feeds the commentary.
pub fn flip_card<R: Rng + ?Sized>(
    state: &GameState,
    card_id: CardId,
    rng: &mut R,
) -> (GameState, Option<GameEvent>) {
    if state.is_game_over {
        return (state.clone(), None);
    }
    let Some(idx) = state.card_index(card_id) else {
        return (state.clone(), None);
    };
    let target = &state.cards[idx];
    if target.is_face_up || target.is_matched {
        return (state.clone(), None);
    }
    let pending_before = state.pending_ids();
    if pending_before.len() >= 2 {
        return (state.clone(), None);
    }

    let mut next = state.clone();
    if pending_before.is_empty() {
        next.last_matched_ids.clear();
    }
    next.cards[idx].is_face_up = true;

    let pending: Vec<usize> = next
        .cards
        .iter()
        .enumerate()
        .filter(|(_, c)| c.is_pending())
        .map(|(i, _)| i)
        .collect();

    match pending.as_slice() {
        [_] => (next, Some(GameEvent::CardFlipped)),
        &[first, second] => {
            if next.cards[first].face == next.cards[second].face {
                resolve_match(next, first, second, rng)
            } else {
                resolve_mismatch(next, first, second)
            }
        }
        _ => (next, None),
    }
}

fn resolve_match<R: Rng + ?Sized>(
    mut next: GameState,
    first: usize,
    second: usize,
    rng: &mut R,
) -> (GameState, Option<GameEvent>) {
    for idx in [first, second] {
        next.cards[idx].is_matched = true;
        next.cards[idx].is_face_up = true;
    }
    next.moves += 1;

    let matches_found = next.matches_found();
    let is_won = matches_found == next.pair_count;
    let combo = next.combo_multiplier;
    let base_points = next.config.base_match_points;
    let combo_points = combo_bonus(&next.config, combo);

    let scored = Scoring::for_mode(next.mode).score_match(&next, is_won, base_points, combo_points);
    let comment = select_comment(
        &CommentContext {
            matches_found,
            pair_count: next.pair_count,
            combo,
            moves: next.moves,
        },
        &next.config,
        rng,
    );

    next.score = scored.score;
    next.current_pot = scored.current_pot;
    next.banked_score = scored.banked_score;
    next.total_base_points += base_points;
    next.total_combo_bonus += combo_points;
    next.total_double_down_bonus += scored.double_down_bonus;
    next.combo_multiplier = combo + 1;
    if scored.pot_banked {
        debug!(
            "Pot banked at combo {}: bank now {}",
            combo + 1,
            scored.banked_score
        );
    }
    next.last_matched_ids = vec![next.cards[first].id, next.cards[second].id];
    next.match_comment = Some(comment);

    let event = if is_won {
        next.is_double_down_active = false;
        next.is_game_over = true;
        next.is_game_won = true;
        GameEvent::GameWon
    } else if combo > next.config.the_nuts_threshold {
        GameEvent::TheNutsAchieved
    } else {
        GameEvent::MatchSuccess
    };

    (next, Some(event))
}

fn resolve_mismatch(
    mut next: GameState,
    first: usize,
    second: usize,
) -> (GameState, Option<GameEvent>) {
    for idx in [first, second] {
        next.cards[idx].is_error = true;
    }
    next.moves += 1;
    next.combo_multiplier = 0;
    next.last_matched_ids.clear();
    next.match_comment = None;

    if next.is_double_down_active {
        next.score = 0;
        next.current_pot = 0;
        next.banked_score = 0;
        next.is_game_over = true;
        next.is_game_won = false;
        next.is_double_down_active = false;
        next.is_busted = true;
        return (next, Some(GameEvent::GameOver));
    }

    let scored = Scoring::for_mode(next.mode).score_mismatch(&next);
    next.score = scored.score;
    next.current_pot = scored.current_pot;
    next.banked_score = scored.banked_score;
    debug!(
        "Mismatch cost {} points (score {}, pot {})",
        scored.penalty, scored.score, scored.current_pot
    );
    if scored.is_busted {
        next.is_game_over = true;
        next.is_game_won = false;
        next.is_busted = true;
    }

    (next, Some(GameEvent::MatchFailure))
}

/// Turn the cards of a mismatch back face-down.
pub fn reset_error_cards(state: &GameState) -> GameState {
    let mut next = state.clone();
    for card in next.cards.iter_mut().filter(|c| c.is_error) {
        card.is_face_up = false;
        card.is_error = false;
    }
    next
}

/// Add the time and move bonuses to a won game and record the breakdown.
///
/// `elapsed_seconds` is the time left on the clock in Time Attack and the
/// time spent everywhere else. Does nothing for unfinished or lost games, or
/// when the breakdown has already been recorded.
pub fn apply_final_bonuses(state: &GameState, elapsed_seconds: u32) -> GameState {
    if !state.is_game_won || state.score_breakdown.is_some() {
        return state.clone();
    }

    let config = &state.config;
    let pairs = state.pair_count as i64;
    let seconds = i64::from(elapsed_seconds);

    let time_bonus = match state.mode {
        GameMode::TimeAttack => seconds * TIME_ATTACK_SECOND_VALUE,
        GameMode::Standard | GameMode::DailyChallenge | GameMode::HighRoller => {
            (pairs * config.time_bonus_per_pair - seconds * config.time_penalty_per_second).max(0)
        }
    };
    let move_bonus = if state.moves == 0 {
        0
    } else {
        (state.pair_count as f64 / f64::from(state.moves) * config.move_bonus_multiplier as f64)
            .floor() as i64
    };

    let mut next = state.clone();
    next.score += time_bonus + move_bonus;
    next.banked_score += time_bonus + move_bonus;
    next.score_breakdown = Some(ScoreBreakdown {
        base_points: state.total_base_points,
        combo_bonus: state.total_combo_bonus,
        double_down_bonus: state.total_double_down_bonus,
        time_bonus,
        move_bonus,
        total: next.score,
    });
    next
}

/// Whether Double Down may be switched on right now.
pub fn can_double_down(state: &GameState) -> bool {
    !state.is_game_over
        && !state.is_double_down_active
        && state.combo_multiplier >= state.config.heat_mode_threshold
        && state.remaining_pairs() >= DOUBLE_DOWN_MIN_REMAINING_PAIRS
}

/// Go all in. Returns the state unchanged when not eligible.
pub fn activate_double_down(state: &GameState) -> GameState {
    let mut next = state.clone();
    if can_double_down(state) {
        next.is_double_down_active = true;
    }
    next
}
