use serde::{Deserialize, Serialize};
use std::fmt::{self};

use super::config::ScoringConfig;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Suit {
    Club,
    Spade,
    Diamond,
    Heart,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Club, Suit::Spade, Suit::Diamond, Suit::Heart];
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Club => "♣",
            Self::Spade => "♠",
            Self::Diamond => "♦",
            Self::Heart => "♥",
        };
        write!(f, "{repr}")
    }
}

/// Placeholder for card values (ace=1u8 ... king=13u8).
pub type Value = u8;

/// Lowest and highest card values in a deck.
pub const MIN_VALUE: Value = 1;
pub const MAX_VALUE: Value = 13;

/// Number of distinct faces (suit x value) available for dealing pairs.
pub const UNIQUE_FACES: usize = Suit::ALL.len() * MAX_VALUE as usize;

/// What is printed on a card. Two cards match when their faces are equal.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Face(pub Value, pub Suit);

impl Face {
    /// Every face of a standard 52-card deck, in a fixed order.
    pub fn all() -> Vec<Face> {
        (MIN_VALUE..=MAX_VALUE)
            .flat_map(|value| Suit::ALL.into_iter().map(move |suit| Face(value, suit)))
            .collect()
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let value = match self.0 {
            1 => "A",
            11 => "J",
            12 => "Q",
            13 => "K",
            v => &v.to_string(),
        };
        let repr = format!("{value}/{}", self.1);
        write!(f, "{repr:>4}")
    }
}

/// Identifier of a card within a single deck instance.
pub type CardId = u32;

/// A card on the table.
///
/// `is_matched` implies `is_face_up`; `is_error` marks the two cards of a
/// mismatch until the orchestrator turns them back down.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Card {
    pub id: CardId,
    pub face: Face,
    pub is_face_up: bool,
    pub is_matched: bool,
    pub is_error: bool,
}

impl Card {
    #[must_use]
    pub fn new(id: CardId, face: Face) -> Self {
        Self {
            id,
            face,
            is_face_up: false,
            is_matched: false,
            is_error: false,
        }
    }

    pub fn suit(&self) -> Suit {
        self.face.1
    }

    pub fn rank(&self) -> Value {
        self.face.0
    }

    /// Face-up but not yet part of a resolved pair.
    pub fn is_pending(&self) -> bool {
        self.is_face_up && !self.is_matched
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_face_up {
            write!(f, "{}", self.face)
        } else {
            write!(f, "{:>4}", "##")
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    #[default]
    Standard,
    TimeAttack,
    DailyChallenge,
    HighRoller,
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameMode::Standard => write!(f, "standard"),
            GameMode::TimeAttack => write!(f, "time_attack"),
            GameMode::DailyChallenge => write!(f, "daily_challenge"),
            GameMode::HighRoller => write!(f, "high_roller"),
        }
    }
}

impl std::str::FromStr for GameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "standard" => Ok(GameMode::Standard),
            "time_attack" | "timeattack" => Ok(GameMode::TimeAttack),
            "daily_challenge" | "daily" => Ok(GameMode::DailyChallenge),
            "high_roller" | "highroller" => Ok(GameMode::HighRoller),
            other => Err(format!("unknown game mode: {other}")),
        }
    }
}

/// High Roller circuit tiers.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CircuitTier {
    #[default]
    Local,
    Regional,
    World,
}

impl fmt::Display for CircuitTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CircuitTier::Local => write!(f, "local"),
            CircuitTier::Regional => write!(f, "regional"),
            CircuitTier::World => write!(f, "world"),
        }
    }
}

/// High Roller difficulty parameters: how fast the pot grows and how much of
/// it a bad beat takes away.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct CircuitStage {
    pub tier: CircuitTier,

    /// Multiplier applied to match points before they enter the pot
    pub pot_growth_multiplier: f64,

    /// Fraction of the pot lost on a mismatch (0.0 to 1.0)
    pub bust_penalty: f64,
}

impl CircuitStage {
    /// Local circuit: gentle growth, half the pot lost on a bad beat
    pub const LOCAL: CircuitStage = CircuitStage {
        tier: CircuitTier::Local,
        pot_growth_multiplier: 1.0,
        bust_penalty: 0.5,
    };

    /// Regional circuit
    pub const REGIONAL: CircuitStage = CircuitStage {
        tier: CircuitTier::Regional,
        pot_growth_multiplier: 1.5,
        bust_penalty: 0.75,
    };

    /// World circuit: a bad beat wipes the whole pot
    pub const WORLD: CircuitStage = CircuitStage {
        tier: CircuitTier::World,
        pot_growth_multiplier: 2.0,
        bust_penalty: 1.0,
    };

    pub fn for_tier(tier: CircuitTier) -> Self {
        match tier {
            CircuitTier::Local => Self::LOCAL,
            CircuitTier::Regional => Self::REGIONAL,
            CircuitTier::World => Self::WORLD,
        }
    }
}

impl Default for CircuitStage {
    fn default() -> Self {
        Self::LOCAL
    }
}

/// Opaque commentary handed to the localization layer: a message key and
/// its positional arguments.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct MatchComment {
    pub key: String,
    pub args: Vec<String>,
}

impl MatchComment {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_arg(mut self, arg: impl ToString) -> Self {
        self.args.push(arg.to_string());
        self
    }
}

/// Final score composition, recorded once a game is won.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub base_points: i64,
    pub combo_bonus: i64,
    pub double_down_bonus: i64,
    pub time_bonus: i64,
    pub move_bonus: i64,
    pub total: i64,
}

impl fmt::Display for ScoreBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "base {} + combo {} + double down {} + time {} + moves {} = {}",
            self.base_points,
            self.combo_bonus,
            self.double_down_bonus,
            self.time_bonus,
            self.move_bonus,
            self.total
        )
    }
}

/// Complete state of one game session.
///
/// Values are replaced, never mutated in place, by the rules engine. The
/// orchestrator is the only owner; everyone else sees snapshots.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct GameState {
    pub cards: Vec<Card>,
    pub pair_count: usize,
    pub mode: GameMode,
    pub moves: u32,
    pub score: i64,
    pub combo_multiplier: u32,
    pub is_double_down_active: bool,
    pub is_game_over: bool,
    pub is_game_won: bool,
    pub is_busted: bool,

    /// Points at risk (High Roller)
    pub current_pot: i64,

    /// Points safe from bad beats. Mirrors `score` outside High Roller.
    pub banked_score: i64,

    pub total_base_points: i64,
    pub total_combo_bonus: i64,
    pub total_double_down_bonus: i64,

    /// The pair resolved by the latest successful match, for highlighting
    pub last_matched_ids: Vec<CardId>,
    pub match_comment: Option<MatchComment>,
    pub score_breakdown: Option<ScoreBreakdown>,
    pub config: ScoringConfig,
    pub seed: Option<u64>,
    pub circuit_stage: Option<CircuitStage>,
}

impl GameState {
    /// Fresh state over an already dealt set of cards.
    pub fn with_cards(
        cards: Vec<Card>,
        pair_count: usize,
        config: ScoringConfig,
        mode: GameMode,
    ) -> Self {
        Self {
            cards,
            pair_count,
            mode,
            moves: 0,
            score: 0,
            combo_multiplier: 0,
            is_double_down_active: false,
            is_game_over: false,
            is_game_won: false,
            is_busted: false,
            current_pot: 0,
            banked_score: 0,
            total_base_points: 0,
            total_combo_bonus: 0,
            total_double_down_bonus: 0,
            last_matched_ids: Vec::new(),
            match_comment: None,
            score_breakdown: None,
            config,
            seed: None,
            circuit_stage: None,
        }
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub(crate) fn card_index(&self, id: CardId) -> Option<usize> {
        self.cards.iter().position(|c| c.id == id)
    }

    pub fn matched_count(&self) -> usize {
        self.cards.iter().filter(|c| c.is_matched).count()
    }

    pub fn matches_found(&self) -> usize {
        self.matched_count() / 2
    }

    /// Pairs still on the table.
    pub fn remaining_pairs(&self) -> usize {
        self.pair_count.saturating_sub(self.matches_found())
    }

    /// Ids of cards that are face-up but not part of a matched pair.
    pub fn pending_ids(&self) -> Vec<CardId> {
        self.cards
            .iter()
            .filter(|c| c.is_pending())
            .map(|c| c.id)
            .collect()
    }

    /// Ids of every card not yet matched.
    pub fn unmatched_ids(&self) -> Vec<CardId> {
        self.cards
            .iter()
            .filter(|c| !c.is_matched)
            .map(|c| c.id)
            .collect()
    }

    pub fn has_error_cards(&self) -> bool {
        self.cards.iter().any(|c| c.is_error)
    }

    /// Circuit stage in effect; High Roller falls back to the local circuit.
    pub fn circuit(&self) -> CircuitStage {
        self.circuit_stage.unwrap_or_default()
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} | moves {} | score {} | combo {} | pot {} | bank {}",
            self.mode,
            self.moves,
            self.score,
            self.combo_multiplier,
            self.current_pot,
            self.banked_score
        )?;
        let row = if self.cards.len() > 16 { 6 } else { 4 };
        for chunk in self.cards.chunks(row) {
            let line: Vec<String> = chunk.iter().map(ToString::to_string).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}
