//! Synchronous sequencing core of a game session.
//!
//! [`GameMachine`] owns the state and the game clock and turns each action
//! into an ordered list of effects plus timer directives. It never sleeps or
//! spawns; the actor wrapping it owns the actual timers.

use log::{debug, info, warn};
use rand::{SeedableRng, rngs::StdRng};
use std::sync::Arc;
use uuid::Uuid;

use super::messages::{
    Action, DispatchOutcome, Effect, HapticPattern, SessionPhase, SessionSnapshot, SoundCue,
};
use super::persistence::StatePersistence;
use crate::game::{
    CardId, GameEvent, GameMode, GameSetup, GameState, SetupResult,
    constants::LOW_TIME_WARNING_SECS,
    rewards::chip_payout,
    rules,
    scoring::{time_attack_after_mismatch, time_attack_gain},
};

/// Timer work requested by a transition
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Directive {
    /// (Re)start the periodic game clock
    StartTimer,
    /// Stop the clock and drop every pending delayed action
    StopAll,
    /// Turn the current mismatch back down after the reveal delay
    ScheduleMismatchReveal,
    /// End the Double Down peek after its duration
    SchedulePeekEnd,
}

/// Everything one action produced
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Transition {
    pub applied: bool,
    pub event: Option<GameEvent>,
    pub effects: Vec<Effect>,
    pub directives: Vec<Directive>,
}

impl Transition {
    pub fn ignored() -> Self {
        Self::default()
    }

    fn applied(event: Option<GameEvent>) -> Self {
        Self {
            applied: true,
            event,
            ..Self::default()
        }
    }

    fn emit(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    fn sound(&mut self, cue: SoundCue) {
        self.effects.push(Effect::sound(cue));
    }

    fn haptic(&mut self, pattern: HapticPattern) {
        self.effects.push(Effect::haptic(pattern));
    }

    fn direct(&mut self, directive: Directive) {
        self.directives.push(directive);
    }
}

impl From<Transition> for DispatchOutcome {
    fn from(transition: Transition) -> Self {
        DispatchOutcome {
            applied: transition.applied,
            event: transition.event,
            effects: transition.effects,
        }
    }
}

/// Game session state machine
pub struct GameMachine {
    session_id: Uuid,
    setup: GameSetup,
    state: GameState,

    /// Seconds left in Time Attack, seconds spent otherwise
    elapsed_seconds: u32,

    started: bool,
    low_time_warned: bool,

    /// Cards shown by the running Double Down peek
    peek_ids: Option<Vec<CardId>>,

    /// Commentary randomness; seeded from the deck seed when there is one
    rng: StdRng,

    persistence: Arc<dyn StatePersistence>,
}

impl GameMachine {
    /// Deal the first game of a session. Nothing runs until `StartGame`.
    pub fn new(setup: GameSetup, persistence: Arc<dyn StatePersistence>) -> SetupResult<Self> {
        let state = rules::new_game(&setup)?;
        let rng = commentary_rng(state.seed);
        let elapsed_seconds = initial_clock(&state);

        Ok(Self {
            session_id: Uuid::new_v4(),
            setup,
            state,
            elapsed_seconds,
            started: false,
            low_time_warned: false,
            peek_ids: None,
            rng,
            persistence,
        })
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn setup(&self) -> &GameSetup {
        &self.setup
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }

    pub fn phase(&self) -> SessionPhase {
        if !self.started {
            SessionPhase::NotStarted
        } else if self.state.is_game_won {
            SessionPhase::Won
        } else if self.state.is_game_over {
            SessionPhase::Lost
        } else {
            SessionPhase::Playing
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state.clone(),
            elapsed_seconds: self.elapsed_seconds,
            phase: self.phase(),
        }
    }

    /// Apply one action. Once the game is over only `Restart` does anything.
    pub fn apply(&mut self, action: Action) -> Transition {
        match action {
            Action::Restart => self.restart(),
            _ if self.state.is_game_over => Transition::ignored(),
            Action::StartGame {
                state,
                elapsed_seconds,
            } => self.begin(state.map(|s| *s), elapsed_seconds),
            _ if !self.started => Transition::ignored(),
            Action::FlipCard(card_id) => self.flip(card_id),
            Action::DoubleDown => self.double_down(),
            Action::ProcessMismatch => self.process_mismatch(),
            Action::Tick => self.tick(),
        }
    }

    /// Hide the cards revealed by the Double Down peek
    pub fn end_peek(&mut self) -> Transition {
        if self.state.is_game_over {
            return Transition::ignored();
        }
        let Some(peeked) = self.peek_ids.take() else {
            return Transition::ignored();
        };

        // Cards turned up during the peek stay as they are
        let card_ids: Vec<CardId> = peeked
            .into_iter()
            .filter(|&id| {
                self.state
                    .card(id)
                    .is_some_and(|c| !c.is_face_up && !c.is_matched)
            })
            .collect();
        if card_ids.is_empty() {
            return Transition::ignored();
        }

        let mut transition = Transition::applied(None);
        transition.emit(Effect::HideCards { card_ids });
        transition
    }

    fn begin(&mut self, state: Option<GameState>, elapsed_seconds: Option<u32>) -> Transition {
        let installed = state.is_some();
        if let Some(state) = state {
            self.rng = commentary_rng(state.seed);
            self.state = state;
        }
        self.elapsed_seconds = match elapsed_seconds {
            Some(seconds) => seconds,
            None if installed || !self.started => initial_clock(&self.state),
            None => self.elapsed_seconds,
        };
        self.started = true;
        self.low_time_warned = false;
        self.peek_ids = None;

        info!(
            "Session {}: {} game started ({} pairs, clock {}s)",
            self.session_id, self.state.mode, self.state.pair_count, self.elapsed_seconds
        );

        let mut transition = Transition::applied(None);
        transition.direct(Directive::StopAll);
        transition.sound(SoundCue::Shuffle);
        transition.emit(Effect::TimerUpdate {
            seconds: self.elapsed_seconds,
        });
        if !self.state.is_game_over {
            transition.direct(Directive::StartTimer);
            if self.state.has_error_cards() {
                transition.direct(Directive::ScheduleMismatchReveal);
            }
        }

        self.persist();
        transition
    }

    fn restart(&mut self) -> Transition {
        match rules::new_game(&self.setup) {
            Ok(state) => {
                debug!("Session {}: restarting", self.session_id);
                self.begin(Some(state), None)
            }
            Err(e) => {
                warn!("Session {}: cannot deal a new game: {}", self.session_id, e);
                Transition::ignored()
            }
        }
    }

    fn flip(&mut self, card_id: CardId) -> Transition {
        let (next, event) = rules::flip_card(&self.state, card_id, &mut self.rng);
        let Some(event) = event else {
            debug!("Session {}: flip of card {} ignored", self.session_id, card_id);
            return Transition::ignored();
        };
        let combo_before = self.state.combo_multiplier;
        self.state = next;

        let mut transition = Transition::applied(Some(event));
        transition.sound(SoundCue::CardFlip);

        match event {
            GameEvent::CardFlipped => {
                transition.haptic(HapticPattern::Selection);
            }
            GameEvent::MatchSuccess | GameEvent::TheNutsAchieved => {
                transition.sound(SoundCue::Match);
                if event == GameEvent::TheNutsAchieved {
                    transition.sound(SoundCue::TheNuts);
                    transition.haptic(HapticPattern::Heavy);
                } else {
                    transition.haptic(HapticPattern::Success);
                }
                if self.state.mode == GameMode::TimeAttack {
                    let gain = time_attack_gain(&self.state.config, combo_before);
                    self.elapsed_seconds = self.elapsed_seconds.saturating_add(gain);
                    if self.elapsed_seconds > LOW_TIME_WARNING_SECS {
                        self.low_time_warned = false;
                    }
                    transition.emit(Effect::TimeAdded { seconds: gain });
                    transition.emit(Effect::TimerUpdate {
                        seconds: self.elapsed_seconds,
                    });
                }
            }
            GameEvent::GameWon => {
                self.state = rules::apply_final_bonuses(&self.state, self.elapsed_seconds);
                transition.sound(SoundCue::Match);
                transition.sound(SoundCue::Win);
                transition.haptic(HapticPattern::Success);
                self.finish(&mut transition);
            }
            GameEvent::MatchFailure => {
                transition.sound(SoundCue::Mismatch);
                transition.haptic(HapticPattern::Error);
                if self.state.is_game_over {
                    transition.sound(SoundCue::Bust);
                    self.finish(&mut transition);
                } else {
                    transition.direct(Directive::ScheduleMismatchReveal);
                }
            }
            GameEvent::GameOver => {
                transition.sound(SoundCue::Bust);
                transition.haptic(HapticPattern::Error);
                self.finish(&mut transition);
            }
        }

        debug!(
            "Session {}: card {} -> {} (score {}, combo {})",
            self.session_id, card_id, event, self.state.score, self.state.combo_multiplier
        );
        self.persist();
        transition
    }

    fn double_down(&mut self) -> Transition {
        let next = rules::activate_double_down(&self.state);
        if next.is_double_down_active == self.state.is_double_down_active {
            return Transition::ignored();
        }
        self.state = next;

        let card_ids: Vec<CardId> = self
            .state
            .cards
            .iter()
            .filter(|c| !c.is_face_up)
            .map(|c| c.id)
            .collect();
        self.peek_ids = Some(card_ids.clone());

        info!(
            "Session {}: double down at combo {}",
            self.session_id, self.state.combo_multiplier
        );

        let mut transition = Transition::applied(None);
        transition.haptic(HapticPattern::Heavy);
        transition.sound(SoundCue::DoubleDown);
        transition.emit(Effect::RevealCards { card_ids });
        transition.direct(Directive::SchedulePeekEnd);

        self.persist();
        transition
    }

    fn process_mismatch(&mut self) -> Transition {
        if !self.state.has_error_cards() {
            return Transition::ignored();
        }
        self.state = rules::reset_error_cards(&self.state);

        let mut transition = Transition::applied(None);
        if self.state.mode == GameMode::TimeAttack {
            self.elapsed_seconds = time_attack_after_mismatch(self.elapsed_seconds);
            transition.emit(Effect::TimerUpdate {
                seconds: self.elapsed_seconds,
            });
            self.check_clock(&mut transition);
        }

        self.persist();
        transition
    }

    fn tick(&mut self) -> Transition {
        let mut transition = Transition::applied(None);

        if self.state.mode == GameMode::TimeAttack {
            self.elapsed_seconds = self.elapsed_seconds.saturating_sub(1);
            transition.emit(Effect::TimerUpdate {
                seconds: self.elapsed_seconds,
            });
            self.check_clock(&mut transition);
        } else {
            self.elapsed_seconds = self.elapsed_seconds.saturating_add(1);
            transition.emit(Effect::TimerUpdate {
                seconds: self.elapsed_seconds,
            });
        }

        self.persist();
        transition
    }

    /// Low-time warning (once per dip below the threshold) and timeout.
    fn check_clock(&mut self, transition: &mut Transition) {
        if self.elapsed_seconds <= LOW_TIME_WARNING_SECS && !self.low_time_warned {
            self.low_time_warned = true;
            transition.emit(Effect::LowTimeWarning {
                seconds: self.elapsed_seconds,
            });
            transition.haptic(HapticPattern::Warning);
        }

        if self.elapsed_seconds == 0 {
            info!("Session {}: out of time", self.session_id);
            self.state.is_game_over = true;
            self.state.is_game_won = false;
            self.state.is_double_down_active = false;
            self.state.score = 0;
            self.state.banked_score = 0;
            self.state.current_pot = 0;
            transition.sound(SoundCue::Lose);
            transition.haptic(HapticPattern::Error);
            self.finish(transition);
        }
    }

    fn finish(&mut self, transition: &mut Transition) {
        self.peek_ids = None;
        transition.emit(Effect::GameFinished {
            won: self.state.is_game_won,
            score: self.state.score,
            chips: chip_payout(&self.state),
        });
        transition.direct(Directive::StopAll);
        info!(
            "Session {}: game {} with score {} after {} moves",
            self.session_id,
            if self.state.is_game_won { "won" } else { "lost" },
            self.state.score,
            self.state.moves
        );
    }

    fn persist(&self) {
        if let Err(e) =
            self.persistence
                .on_save_state(self.session_id, &self.state, self.elapsed_seconds)
        {
            warn!("Session {}: failed to save state: {}", self.session_id, e);
        }
    }
}

fn initial_clock(state: &GameState) -> u32 {
    match state.mode {
        GameMode::TimeAttack => state.config.time_attack_initial_time(state.pair_count),
        GameMode::Standard | GameMode::DailyChallenge | GameMode::HighRoller => 0,
    }
}

fn commentary_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Card, Face, ScoringConfig, Suit};
    use crate::session::persistence::{InMemoryPersistence, NoopPersistence};

    fn machine(mode: GameMode, pairs: usize) -> GameMachine {
        let setup = GameSetup::new(pairs, mode).with_seed(1234);
        GameMachine::new(setup, Arc::new(NoopPersistence)).unwrap()
    }

    /// Replace the dealt table with pairs laid out as (0,1), (2,3), ...
    fn ordered(mut machine: GameMachine) -> GameMachine {
        let pairs = machine.state.pair_count;
        let cards = (0..pairs * 2)
            .map(|i| Card::new(i as CardId, Face((i / 2 + 1) as u8, Suit::Club)))
            .collect();
        let mut state = GameState::with_cards(cards, pairs, ScoringConfig::default(), machine.state.mode);
        state.circuit_stage = machine.state.circuit_stage;
        machine.apply(Action::StartGame {
            state: Some(Box::new(state)),
            elapsed_seconds: None,
        });
        machine
    }

    fn started(mode: GameMode, pairs: usize) -> GameMachine {
        ordered(machine(mode, pairs))
    }

    // === Lifecycle Tests ===

    #[test]
    fn test_actions_ignored_before_start() {
        let mut m = machine(GameMode::Standard, 4);
        assert_eq!(m.phase(), SessionPhase::NotStarted);
        assert!(!m.apply(Action::FlipCard(0)).applied);
        assert!(!m.apply(Action::Tick).applied);
    }

    #[test]
    fn test_start_emits_shuffle_and_starts_timer() {
        let mut m = machine(GameMode::Standard, 4);
        let t = m.apply(Action::start());
        assert!(t.applied);
        assert_eq!(
            t.effects,
            vec![
                Effect::sound(SoundCue::Shuffle),
                Effect::TimerUpdate { seconds: 0 }
            ]
        );
        assert_eq!(t.directives, vec![Directive::StopAll, Directive::StartTimer]);
        assert_eq!(m.phase(), SessionPhase::Playing);
    }

    #[test]
    fn test_time_attack_starts_with_schedule_clock() {
        let mut m = machine(GameMode::TimeAttack, 8);
        m.apply(Action::start());
        assert_eq!(m.elapsed_seconds(), 60);
    }

    #[test]
    fn test_resume_installs_state_and_clock() {
        let mut m = machine(GameMode::Standard, 4);
        let mut saved = m.state().clone();
        saved.moves = 7;
        m.apply(Action::resume(saved.clone(), 42));
        assert_eq!(m.state(), &saved);
        assert_eq!(m.elapsed_seconds(), 42);
    }

    #[test]
    fn test_ignored_transition_dispatches_default_outcome() {
        let mut m = machine(GameMode::Standard, 4);
        let outcome: DispatchOutcome = m.apply(Action::FlipCard(0)).into();
        assert_eq!(outcome, DispatchOutcome::default());
        assert!(!outcome.applied);
    }

    #[test]
    fn test_same_seed_same_actions_same_outcome() {
        let mut actions = vec![Action::start()];
        for id in 0..12 {
            actions.push(Action::FlipCard(id));
            if id % 2 == 1 {
                actions.push(Action::ProcessMismatch);
                actions.push(Action::Tick);
            }
        }
        actions.push(Action::DoubleDown);
        actions.push(Action::Tick);

        let mut first = machine(GameMode::Standard, 6);
        let mut second = machine(GameMode::Standard, 6);
        for action in actions {
            let a = first.apply(action.clone());
            let b = second.apply(action);
            assert_eq!(a, b);
        }
        assert!(first.state().moves > 0);
        assert_eq!(first.state(), second.state());
        assert_eq!(first.state().match_comment, second.state().match_comment);
        assert_eq!(first.elapsed_seconds(), second.elapsed_seconds());
    }

    // === Flip Tests ===

    #[test]
    fn test_flip_effect_order_for_match() {
        let mut m = started(GameMode::Standard, 4);
        let first = m.apply(Action::FlipCard(0));
        assert_eq!(first.event, Some(GameEvent::CardFlipped));
        assert_eq!(
            first.effects,
            vec![
                Effect::sound(SoundCue::CardFlip),
                Effect::haptic(HapticPattern::Selection)
            ]
        );

        let second = m.apply(Action::FlipCard(1));
        assert_eq!(second.event, Some(GameEvent::MatchSuccess));
        assert_eq!(
            second.effects,
            vec![
                Effect::sound(SoundCue::CardFlip),
                Effect::sound(SoundCue::Match),
                Effect::haptic(HapticPattern::Success)
            ]
        );
        assert!(second.directives.is_empty());
    }

    #[test]
    fn test_mismatch_schedules_reveal() {
        let mut m = started(GameMode::Standard, 4);
        m.apply(Action::FlipCard(0));
        let t = m.apply(Action::FlipCard(2));
        assert_eq!(t.event, Some(GameEvent::MatchFailure));
        assert_eq!(t.directives, vec![Directive::ScheduleMismatchReveal]);
        assert_eq!(
            t.effects,
            vec![
                Effect::sound(SoundCue::CardFlip),
                Effect::sound(SoundCue::Mismatch),
                Effect::haptic(HapticPattern::Error)
            ]
        );

        let reveal = m.apply(Action::ProcessMismatch);
        assert!(reveal.applied);
        assert!(m.state().pending_ids().is_empty());
        // Nothing left to clear
        assert!(!m.apply(Action::ProcessMismatch).applied);
    }

    #[test]
    fn test_win_applies_final_bonuses_and_stops() {
        let mut m = started(GameMode::Standard, 1);
        m.apply(Action::Tick);
        m.apply(Action::FlipCard(0));
        let t = m.apply(Action::FlipCard(1));
        assert_eq!(t.event, Some(GameEvent::GameWon));
        assert_eq!(t.directives, vec![Directive::StopAll]);
        let breakdown = m.state().score_breakdown.unwrap();
        assert_eq!(breakdown.time_bonus, 50 - 5);
        assert_eq!(
            t.effects.last(),
            Some(&Effect::GameFinished {
                won: true,
                score: m.state().score,
                chips: chip_payout(m.state()),
            })
        );
        assert_eq!(m.phase(), SessionPhase::Won);
    }

    #[test]
    fn test_actions_ignored_after_game_over() {
        let mut m = started(GameMode::Standard, 1);
        m.apply(Action::FlipCard(0));
        m.apply(Action::FlipCard(1));
        let snapshot = m.state().clone();
        assert!(!m.apply(Action::Tick).applied);
        assert!(!m.apply(Action::DoubleDown).applied);
        assert!(!m.apply(Action::start()).applied);
        assert_eq!(m.state(), &snapshot);
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut m = started(GameMode::Standard, 1);
        m.apply(Action::FlipCard(0));
        m.apply(Action::FlipCard(1));
        let t = m.apply(Action::Restart);
        assert!(t.applied);
        assert_eq!(m.phase(), SessionPhase::Playing);
        assert_eq!(m.state().moves, 0);
        assert_eq!(m.elapsed_seconds(), 0);
        assert!(t.directives.contains(&Directive::StartTimer));
    }

    #[test]
    fn test_restart_deals_same_seeded_deck() {
        let mut m = machine(GameMode::DailyChallenge, 6);
        let dealt = m.state().cards.clone();
        m.apply(Action::start());
        m.apply(Action::Restart);
        assert_eq!(m.state().cards, dealt);
    }

    // === Double Down Tests ===

    #[test]
    fn test_double_down_reveals_then_hides() {
        let mut m = started(GameMode::Standard, 6);
        for pair in 0..3 {
            m.apply(Action::FlipCard(pair * 2));
            m.apply(Action::FlipCard(pair * 2 + 1));
        }
        let t = m.apply(Action::DoubleDown);
        assert!(t.applied);
        assert_eq!(t.directives, vec![Directive::SchedulePeekEnd]);
        assert_eq!(t.effects[0], Effect::haptic(HapticPattern::Heavy));
        assert_eq!(
            t.effects.last(),
            Some(&Effect::RevealCards {
                card_ids: vec![6, 7, 8, 9, 10, 11]
            })
        );
        assert!(!m.apply(Action::DoubleDown).applied);

        let hide = m.end_peek();
        assert_eq!(
            hide.effects,
            vec![Effect::HideCards {
                card_ids: vec![6, 7, 8, 9, 10, 11]
            }]
        );
        assert!(!m.end_peek().applied);
    }

    #[test]
    fn test_peek_end_skips_cards_turned_up_during_peek() {
        let mut m = started(GameMode::Standard, 6);
        for pair in 0..3 {
            m.apply(Action::FlipCard(pair * 2));
            m.apply(Action::FlipCard(pair * 2 + 1));
        }
        assert!(m.apply(Action::DoubleDown).applied);
        m.apply(Action::FlipCard(6));
        let t = m.apply(Action::FlipCard(7));
        assert_eq!(t.event, Some(GameEvent::MatchSuccess));

        let hide = m.end_peek();
        assert!(hide.applied);
        assert_eq!(
            hide.effects,
            vec![Effect::HideCards {
                card_ids: vec![8, 9, 10, 11]
            }]
        );
    }

    #[test]
    fn test_peek_end_hides_pending_card_only_when_face_down() {
        let mut m = started(GameMode::Standard, 6);
        for pair in 0..3 {
            m.apply(Action::FlipCard(pair * 2));
            m.apply(Action::FlipCard(pair * 2 + 1));
        }
        m.apply(Action::DoubleDown);
        m.apply(Action::FlipCard(10));

        let hide = m.end_peek();
        assert_eq!(
            hide.effects,
            vec![Effect::HideCards {
                card_ids: vec![6, 7, 8, 9, 11]
            }]
        );
    }

    #[test]
    fn test_all_in_mismatch_ends_game() {
        let mut m = started(GameMode::Standard, 6);
        for pair in 0..3 {
            m.apply(Action::FlipCard(pair * 2));
            m.apply(Action::FlipCard(pair * 2 + 1));
        }
        m.apply(Action::DoubleDown);
        m.apply(Action::FlipCard(6));
        let t = m.apply(Action::FlipCard(8));
        assert_eq!(t.event, Some(GameEvent::GameOver));
        assert_eq!(m.state().score, 0);
        assert_eq!(m.phase(), SessionPhase::Lost);
        assert!(t.directives.contains(&Directive::StopAll));
    }

    // === Clock Tests ===

    #[test]
    fn test_standard_tick_counts_up() {
        let mut m = started(GameMode::Standard, 2);
        let t = m.apply(Action::Tick);
        assert_eq!(t.effects, vec![Effect::TimerUpdate { seconds: 1 }]);
        assert_eq!(m.elapsed_seconds(), 1);
    }

    #[test]
    fn test_time_attack_timeout() {
        let mut m = started(GameMode::TimeAttack, 2);
        m.apply(Action::resume(m.state().clone(), 7));

        let mut warnings = 0;
        let mut finishes = 0;
        let mut stopped = false;
        for _ in 0..20 {
            let t = m.apply(Action::Tick);
            warnings += t
                .effects
                .iter()
                .filter(|e| matches!(e, Effect::LowTimeWarning { .. }))
                .count();
            finishes += t
                .effects
                .iter()
                .filter(|e| matches!(e, Effect::GameFinished { won: false, .. }))
                .count();
            stopped |= t.directives.contains(&Directive::StopAll);
        }

        assert_eq!(warnings, 1);
        assert_eq!(finishes, 1);
        assert!(stopped);
        assert_eq!(m.elapsed_seconds(), 0);
        assert!(m.state().is_game_over && !m.state().is_game_won);
        assert_eq!(m.state().score, 0);
    }

    #[test]
    fn test_time_attack_match_adds_time() {
        let mut m = started(GameMode::TimeAttack, 4);
        let before = m.elapsed_seconds();
        m.apply(Action::FlipCard(0));
        let t = m.apply(Action::FlipCard(1));
        let gain = m.state().config.time_attack_base_gain;
        assert!(t.effects.contains(&Effect::TimeAdded { seconds: gain }));
        assert_eq!(m.elapsed_seconds(), before + gain);
    }

    #[test]
    fn test_time_attack_mismatch_costs_time() {
        let mut m = started(GameMode::TimeAttack, 4);
        m.apply(Action::resume(m.state().clone(), 30));
        m.apply(Action::FlipCard(0));
        m.apply(Action::FlipCard(2));
        m.apply(Action::ProcessMismatch);
        assert_eq!(m.elapsed_seconds(), 28);
    }

    // === Persistence Tests ===

    #[test]
    fn test_every_mutation_is_saved() {
        let store = Arc::new(InMemoryPersistence::new());
        let setup = GameSetup::new(3, GameMode::Standard).with_seed(9);
        let mut m = GameMachine::new(setup, store.clone()).unwrap();
        m.apply(Action::start());
        m.apply(Action::Tick);
        assert_eq!(store.save_count(), 2);
        // Ignored actions are not saved
        m.apply(Action::FlipCard(999));
        assert_eq!(store.save_count(), 2);
        let saved = store.latest().unwrap();
        assert_eq!(saved.session_id, m.session_id());
        assert_eq!(saved.elapsed_seconds, 1);
    }
}
