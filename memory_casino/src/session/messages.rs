//! Session actor message types.

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::game::{CardId, GameEvent, GameState};

/// Actions accepted by a game session
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    /// Start (or restart the clock of) the session, optionally installing a
    /// saved state and clock
    StartGame {
        state: Option<Box<GameState>>,
        elapsed_seconds: Option<u32>,
    },

    /// Turn a card over
    FlipCard(CardId),

    /// Go all in
    DoubleDown,

    /// Turn a mismatched pair back down (scheduled after a mismatch)
    ProcessMismatch,

    /// One second of game clock (scheduled by the session timer)
    Tick,

    /// Deal a fresh game; allowed after game over
    Restart,
}

impl Action {
    /// Start with the dealt state and a fresh clock
    pub fn start() -> Self {
        Action::StartGame {
            state: None,
            elapsed_seconds: None,
        }
    }

    /// Resume a saved game
    pub fn resume(state: GameState, elapsed_seconds: u32) -> Self {
        Action::StartGame {
            state: Some(Box::new(state)),
            elapsed_seconds: Some(elapsed_seconds),
        }
    }
}

/// Sounds the presentation layer should play
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundCue {
    Shuffle,
    CardFlip,
    Match,
    TheNuts,
    Mismatch,
    DoubleDown,
    Win,
    Bust,
    Lose,
}

/// Haptic feedback patterns
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HapticPattern {
    Selection,
    Success,
    Heavy,
    Warning,
    Error,
}

/// Presentation hints emitted by the session, in order, for every action
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    PlaySound { cue: SoundCue },
    Haptic { pattern: HapticPattern },

    /// Current clock: seconds left in Time Attack, seconds spent otherwise
    TimerUpdate { seconds: u32 },

    /// Seconds added to the Time Attack clock by a match
    TimeAdded { seconds: u32 },

    /// The Time Attack clock is running out
    LowTimeWarning { seconds: u32 },

    /// Double Down peek: show these cards
    RevealCards { card_ids: Vec<CardId> },

    /// Double Down peek over: hide them again
    HideCards { card_ids: Vec<CardId> },

    /// The game ended
    GameFinished { won: bool, score: i64, chips: u64 },
}

impl Effect {
    pub fn sound(cue: SoundCue) -> Self {
        Effect::PlaySound { cue }
    }

    pub fn haptic(pattern: HapticPattern) -> Self {
        Effect::Haptic { pattern }
    }
}

/// Where the session is in its lifecycle
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    NotStarted,
    Playing,
    Won,
    Lost,
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionPhase::NotStarted => write!(f, "not started"),
            SessionPhase::Playing => write!(f, "playing"),
            SessionPhase::Won => write!(f, "won"),
            SessionPhase::Lost => write!(f, "lost"),
        }
    }
}

/// Latest published view of a session
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub state: GameState,
    pub elapsed_seconds: u32,
    pub phase: SessionPhase,
}

/// Result of one dispatched action
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DispatchOutcome {
    /// Whether the action changed anything
    pub applied: bool,

    /// Rules engine event, for card flips
    pub event: Option<GameEvent>,

    /// Effects emitted, in emission order
    pub effects: Vec<Effect>,
}

/// Delayed work owned by the session
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum TimerKind {
    Tick,
    MismatchReveal,
    PeekEnd,
}

/// Messages delivered to the session actor
#[derive(Debug)]
pub(crate) enum SessionMessage {
    /// Action from a handle; the reply is sent after effects are emitted
    Dispatch {
        action: Action,
        response: Option<oneshot::Sender<DispatchOutcome>>,
    },

    /// Fired by a timer task; stale tickets are discarded
    Timer { kind: TimerKind, ticket: u64 },
}
