//! Game session orchestration with an async actor model.
//!
//! This module implements:
//! - GameMachine: the synchronous state machine sequencing actions, effects
//!   and the game clock
//! - GameActor: async actor owning a machine, its timers and its channels
//! - GameHandle: cloneable handle for dispatching actions and subscribing to
//!   state snapshots and effects
//! - StatePersistence: collaborator notified after every committed change
//!
//! ## Architecture
//!
//! Each session runs in its own Tokio task with an mpsc inbox. Timers (the
//! game clock, the mismatch reveal delay and the Double Down peek) are
//! spawned tasks that post back into the same inbox, so every mutation is
//! serialized through one place. Restarting or ending a game cancels all of
//! them.
//!
//! ## Example
//!
//! ```no_run
//! use memory_casino::game::{GameMode, GameSetup};
//! use memory_casino::session::{self, Action, NoopPersistence, SessionConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let setup = GameSetup::new(8, GameMode::TimeAttack);
//!     let handle = session::spawn(setup, SessionConfig::default(), Arc::new(NoopPersistence))
//!         .expect("valid setup");
//!
//!     let mut effects = handle.subscribe_effects();
//!     handle.dispatch(Action::start()).await.expect("session running");
//!     handle.dispatch(Action::FlipCard(0)).await.expect("session running");
//!
//!     while let Ok(effect) = effects.try_recv() {
//!         println!("{effect:?}");
//!     }
//! }
//! ```

pub mod actor;
pub mod config;
pub mod errors;
pub mod machine;
pub mod messages;
pub mod persistence;

pub use actor::{GameActor, GameHandle, spawn};
pub use config::SessionConfig;
pub use errors::{PersistenceError, SessionError, SessionResult};
pub use machine::{Directive, GameMachine, Transition};
pub use messages::{
    Action, DispatchOutcome, Effect, HapticPattern, SessionPhase, SessionSnapshot, SoundCue,
};
pub use persistence::{InMemoryPersistence, NoopPersistence, SavedSession, StatePersistence};
