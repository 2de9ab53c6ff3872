//! Memory bot: remembers the faces it has seen and plays the pairs it knows.

use memory_casino::game::{CardId, Face, GameState, can_double_down};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use std::collections::HashMap;

/// A player with imperfect recall
#[derive(Debug)]
pub struct MemoryBot {
    /// Faces seen on still unmatched cards
    seen: HashMap<CardId, Face>,

    /// Chance (percent) that a seen card is remembered when needed
    recall_percent: u8,

    /// Go all in whenever the rules allow it
    double_down: bool,

    rng: StdRng,
}

impl MemoryBot {
    pub fn new(recall_percent: u8, double_down: bool, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            seen: HashMap::new(),
            recall_percent,
            double_down,
            rng,
        }
    }

    /// Forget everything; called when a new game is dealt
    pub fn reset(&mut self) {
        self.seen.clear();
    }

    /// Remember every face currently showing and drop matched cards
    pub fn observe(&mut self, state: &GameState) {
        for card in &state.cards {
            if card.is_matched {
                self.seen.remove(&card.id);
            } else if card.is_face_up {
                self.seen.insert(card.id, card.face);
            }
        }
    }

    /// Remember cards shown by a Double Down peek
    pub fn peek(&mut self, state: &GameState, card_ids: &[CardId]) {
        for card in card_ids.iter().filter_map(|&id| state.card(id)) {
            if !card.is_matched {
                self.seen.insert(card.id, card.face);
            }
        }
    }

    pub fn wants_double_down(&self, state: &GameState) -> bool {
        self.double_down && can_double_down(state)
    }

    /// Pick the next card to turn over, if any can be.
    pub fn next_flip(&mut self, state: &GameState) -> Option<CardId> {
        let face_down: Vec<CardId> = state
            .cards
            .iter()
            .filter(|c| !c.is_face_up && !c.is_matched)
            .map(|c| c.id)
            .collect();
        if face_down.is_empty() {
            return None;
        }

        let pending = state.pending_ids();
        let target = match pending.as_slice() {
            [showing] => state.card(*showing).map(|c| c.face),
            [] => self.known_pair(&face_down),
            _ => return None,
        };

        if let Some(face) = target
            && let Some(id) = self.recall(face, &face_down)
        {
            return Some(id);
        }

        let unknown: Vec<CardId> = face_down
            .iter()
            .copied()
            .filter(|id| !self.seen.contains_key(id))
            .collect();
        let pool = if unknown.is_empty() { &face_down } else { &unknown };
        pool.choose(&mut self.rng).copied()
    }

    /// A face whose two cards are both remembered and face down
    fn known_pair(&self, face_down: &[CardId]) -> Option<Face> {
        let mut counts: HashMap<Face, usize> = HashMap::new();
        for id in face_down {
            if let Some(face) = self.seen.get(id) {
                *counts.entry(*face).or_default() += 1;
            }
        }
        counts
            .into_iter()
            .filter(|(_, n)| *n == 2)
            .map(|(face, _)| face)
            .min()
    }

    fn recall(&mut self, face: Face, face_down: &[CardId]) -> Option<CardId> {
        if self.rng.random_range(0..100) >= self.recall_percent {
            return None;
        }
        let mut candidates: Vec<CardId> = face_down
            .iter()
            .copied()
            .filter(|id| self.seen.get(id) == Some(&face))
            .collect();
        candidates.sort_unstable();
        candidates.first().copied()
    }
}
