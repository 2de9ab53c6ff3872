/// Scenario tests for High Roller pot play
///
/// These tests walk a table laid out as known pairs through pot growth,
/// banking at the nuts threshold, bad beats and busts on each circuit tier.
use memory_casino::game::{
    self, Card, CardId, CircuitStage, Face, GameEvent, GameMode, GameState, ScoringConfig, Suit,
    rewards,
};
use rand::{SeedableRng, rngs::StdRng};

/// Pairs laid out as (0,1), (2,3), ...
fn table(pairs: usize, stage: CircuitStage) -> GameState {
    let cards = (0..pairs * 2)
        .map(|i| Card::new(i as CardId, Face((i / 2 + 1) as u8, Suit::Heart)))
        .collect();
    let mut state = GameState::with_cards(cards, pairs, ScoringConfig::default(), GameMode::HighRoller);
    state.circuit_stage = Some(stage);
    state
}

fn turn(state: &GameState, a: CardId, b: CardId) -> (GameState, Option<GameEvent>) {
    let mut rng = StdRng::seed_from_u64(5);
    let (next, _) = game::flip_card(state, a, &mut rng);
    game::flip_card(&next, b, &mut rng)
}

#[test]
fn test_pot_grows_then_banks_at_the_nuts_threshold() {
    let mut state = table(8, CircuitStage::LOCAL);
    let expected_pots = [100, 225, 425, 750];
    for (pair, pot) in expected_pots.iter().enumerate() {
        let id = pair as CardId * 2;
        let (next, event) = turn(&state, id, id + 1);
        assert_eq!(event, Some(GameEvent::MatchSuccess));
        assert_eq!(next.current_pot, *pot);
        assert_eq!(next.banked_score, 0);
        assert_eq!(next.score, *pot);
        state = next;
    }

    // Fifth match in a row: combo 4 + 1 reaches the threshold and banks
    let (state, _) = turn(&state, 8, 9);
    assert_eq!(state.current_pot, 0);
    assert_eq!(state.banked_score, 750 + 500);
    assert_eq!(state.score, 1250);

    // A bad beat on an empty pot is not a bust while the bank holds chips
    let (state, event) = turn(&state, 10, 12);
    assert_eq!(event, Some(GameEvent::MatchFailure));
    assert!(!state.is_game_over);
    assert_eq!(state.score, 1250);
    assert_eq!(state.combo_multiplier, 0);
}

#[test]
fn test_bad_beat_takes_half_the_pot_locally() {
    let state = table(6, CircuitStage::LOCAL);
    let (state, _) = turn(&state, 0, 1);
    let (state, event) = turn(&state, 2, 4);
    assert_eq!(event, Some(GameEvent::MatchFailure));
    assert_eq!(state.current_pot, 50);
    assert_eq!(state.score, 50);
    assert!(!state.is_busted);
}

#[test]
fn test_world_circuit_busts_on_first_miss() {
    let state = table(6, CircuitStage::WORLD);
    let (state, _) = turn(&state, 0, 1);
    assert_eq!(state.current_pot, 200);

    let (state, event) = turn(&state, 2, 4);
    assert_eq!(event, Some(GameEvent::MatchFailure));
    assert!(state.is_busted);
    assert!(state.is_game_over);
    assert!(!state.is_game_won);
    assert_eq!(state.score, 0);
    assert_eq!(rewards::chip_payout(&state), 0);
}

#[test]
fn test_opening_miss_busts() {
    let state = table(4, CircuitStage::LOCAL);
    let (state, event) = turn(&state, 0, 2);
    assert_eq!(event, Some(GameEvent::MatchFailure));
    assert!(state.is_busted && state.is_game_over);
}

#[test]
fn test_regional_growth_floors_points() {
    let state = table(4, CircuitStage::REGIONAL);
    let (state, _) = turn(&state, 0, 1);
    assert_eq!(state.current_pot, 150);
    let (state, _) = turn(&state, 2, 3);
    // (100 + 25) * 1.5 = 187.5
    assert_eq!(state.current_pot, 150 + 187);
}

#[test]
fn test_win_banks_the_pot_and_pays_out() {
    let mut state = table(3, CircuitStage::LOCAL);
    for pair in 0..3 {
        let id = pair * 2;
        state = turn(&state, id, id + 1).0;
    }
    assert!(state.is_game_won);
    assert_eq!(state.current_pot, 0);
    assert_eq!(state.banked_score, 100 + 125 + 200);

    let state = game::apply_final_bonuses(&state, 10);
    assert_eq!(state.score, state.banked_score);
    assert!(rewards::chip_payout(&state) > 0);
}
