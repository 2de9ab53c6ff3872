//! # Memory Casino
//!
//! Rules and orchestration core of a casino-themed card matching game.
//!
//! Players turn cards over two at a time looking for identical faces. Matches
//! build a combo, combos pay escalating bonuses, and the casino modes layer
//! their own economics on top: a countdown clock in Time Attack, a seeded
//! deck in the Daily Challenge, and a growing pot that can bust in High
//! Roller.
//!
//! ## Core Modules
//!
//! - [`game`]: Card and state types, the pure rules engine, mode scoring,
//!   commentary and chip payouts
//! - [`session`]: Async session actor sequencing actions into effects, with
//!   the game clock, delayed actions and persistence
//!
//! ## Example
//!
//! ```
//! use memory_casino::game::{self, GameMode, GameSetup};
//! use rand::{SeedableRng, rngs::StdRng};
//!
//! let state = game::new_game(&GameSetup::new(6, GameMode::Standard).with_seed(7)).unwrap();
//! let first = state.cards[0].id;
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let (state, event) = game::flip_card(&state, first, &mut rng);
//! assert_eq!(event, Some(game::GameEvent::CardFlipped));
//! assert_eq!(state.pending_ids(), vec![first]);
//! ```

/// Core game logic, entities, and scoring.
pub mod game;
pub use game::{
    ConfigurationError, GameEvent, GameMode, GameSetup, GameState, ScoringConfig,
    constants, entities,
};

/// Session orchestration: actor, timers, effects and persistence.
pub mod session;
pub use session::{Action, Effect, GameHandle, SessionConfig, SessionError};
