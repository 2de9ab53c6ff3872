//! Shared helpers for integration tests.

#![allow(dead_code)]

use memory_casino::game::{CardId, Face, GameState};
use memory_casino::session::Effect;
use std::collections::BTreeMap;
use tokio::sync::broadcast;

/// Card ids grouped by face, in table order of the first card.
pub fn pairs(state: &GameState) -> Vec<(CardId, CardId)> {
    let mut by_face: BTreeMap<Face, Vec<CardId>> = BTreeMap::new();
    for card in &state.cards {
        by_face.entry(card.face).or_default().push(card.id);
    }
    let mut pairs: Vec<(CardId, CardId)> = by_face
        .into_values()
        .map(|ids| (ids[0], ids[1]))
        .collect();
    pairs.sort();
    pairs
}

/// Two face-down cards that do not match.
pub fn mismatch(state: &GameState) -> (CardId, CardId) {
    let pairs = pairs(state);
    (pairs[0].0, pairs[1].0)
}

/// Everything the effect channel currently holds.
pub fn drain(effects: &mut broadcast::Receiver<Effect>) -> Vec<Effect> {
    let mut drained = Vec::new();
    while let Ok(effect) = effects.try_recv() {
        drained.push(effect);
    }
    drained
}
