//! Game session actor with async message handling.

use log::{debug, info};
use std::sync::Arc;
use tokio::{
    sync::{broadcast, mpsc, oneshot, watch},
    task::JoinHandle,
    time::{Instant, interval_at, sleep},
};
use uuid::Uuid;

use super::{
    config::SessionConfig,
    errors::{SessionError, SessionResult},
    machine::{Directive, GameMachine, Transition},
    messages::{Action, DispatchOutcome, Effect, SessionMessage, SessionSnapshot, TimerKind},
    persistence::StatePersistence,
};
use crate::game::{GameSetup, GameState};

/// Session handle for sending actions and watching the game
#[derive(Clone)]
pub struct GameHandle {
    sender: mpsc::Sender<SessionMessage>,
    session_id: Uuid,
    snapshot: watch::Receiver<SessionSnapshot>,
    effects: broadcast::Sender<Effect>,
}

impl GameHandle {
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Send an action and wait until it has been applied and its effects
    /// published.
    pub async fn dispatch(&self, action: Action) -> SessionResult<DispatchOutcome> {
        let (response, reply) = oneshot::channel();
        self.sender
            .send(SessionMessage::Dispatch {
                action,
                response: Some(response),
            })
            .await
            .map_err(|_| SessionError::Closed)?;
        reply.await.map_err(|_| SessionError::Closed)
    }

    /// Queue an action without waiting for it
    pub fn try_dispatch(&self, action: Action) -> SessionResult<()> {
        self.sender
            .try_send(SessionMessage::Dispatch {
                action,
                response: None,
            })
            .map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => SessionError::Busy,
                mpsc::error::TrySendError::Closed(_) => SessionError::Closed,
            })
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn state(&self) -> GameState {
        self.snapshot.borrow().state.clone()
    }

    /// Watch state changes; only the latest snapshot is kept
    pub fn subscribe_state(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot.clone()
    }

    /// Receive effects in emission order. A subscriber that falls behind
    /// loses the oldest effects.
    pub fn subscribe_effects(&self) -> broadcast::Receiver<Effect> {
        self.effects.subscribe()
    }
}

/// Timer task owned by the actor. Dropping it cancels the task.
struct ScheduledTask {
    ticket: u64,
    handle: JoinHandle<()>,
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Actor running a single game session
pub struct GameActor {
    machine: GameMachine,

    config: SessionConfig,

    /// Message inbox
    inbox: mpsc::Receiver<SessionMessage>,

    /// Lets timer tasks post back without keeping the session alive
    scheduler: mpsc::WeakSender<SessionMessage>,

    snapshot_tx: watch::Sender<SessionSnapshot>,
    effects_tx: broadcast::Sender<Effect>,

    ticker: Option<ScheduledTask>,
    mismatch_reveal: Option<ScheduledTask>,
    peek: Option<ScheduledTask>,

    /// Incremented for every scheduled task; timer messages carrying an
    /// older ticket are stale
    next_ticket: u64,
}

impl GameActor {
    /// Create a new session actor
    ///
    /// # Arguments
    ///
    /// * `setup` - Deck size, mode, scoring and seed of every game dealt
    /// * `config` - Session timing
    /// * `persistence` - Receives every committed state change
    ///
    /// # Returns
    ///
    /// * `(GameActor, GameHandle)` - Actor and handle for sending actions
    pub fn new(
        setup: GameSetup,
        config: SessionConfig,
        persistence: Arc<dyn StatePersistence>,
    ) -> SessionResult<(Self, GameHandle)> {
        config.validate()?;
        let machine = GameMachine::new(setup, persistence)?;

        let (sender, inbox) = mpsc::channel(config.inbox_capacity);
        let (snapshot_tx, snapshot_rx) = watch::channel(machine.snapshot());
        let (effects_tx, _) = broadcast::channel(config.effect_capacity);

        let handle = GameHandle {
            sender: sender.clone(),
            session_id: machine.session_id(),
            snapshot: snapshot_rx,
            effects: effects_tx.clone(),
        };

        let actor = Self {
            machine,
            config,
            inbox,
            scheduler: sender.downgrade(),
            snapshot_tx,
            effects_tx,
            ticker: None,
            mismatch_reveal: None,
            peek: None,
            next_ticket: 0,
        };

        Ok((actor, handle))
    }

    /// Run the session until every handle is dropped
    pub async fn run(mut self) {
        info!(
            "Session {} starting ({} pairs, {})",
            self.machine.session_id(),
            self.machine.setup().pair_count,
            self.machine.setup().mode
        );

        while let Some(message) = self.inbox.recv().await {
            self.handle_message(message);
        }

        self.stop_all();
        info!("Session {} closed", self.machine.session_id());
    }

    fn handle_message(&mut self, message: SessionMessage) {
        match message {
            SessionMessage::Dispatch { action, response } => {
                let transition = self.machine.apply(action);
                let outcome = self.commit(transition);
                if let Some(response) = response {
                    let _ = response.send(outcome);
                }
            }

            SessionMessage::Timer { kind, ticket } => {
                let current = match kind {
                    TimerKind::Tick => &self.ticker,
                    TimerKind::MismatchReveal => &self.mismatch_reveal,
                    TimerKind::PeekEnd => &self.peek,
                };
                if current.as_ref().map(|task| task.ticket) != Some(ticket) {
                    debug!(
                        "Session {}: stale {:?} timer {}",
                        self.machine.session_id(),
                        kind,
                        ticket
                    );
                    return;
                }

                let transition = match kind {
                    TimerKind::Tick => self.machine.apply(Action::Tick),
                    TimerKind::MismatchReveal => {
                        self.mismatch_reveal = None;
                        self.machine.apply(Action::ProcessMismatch)
                    }
                    TimerKind::PeekEnd => {
                        self.peek = None;
                        self.machine.end_peek()
                    }
                };
                self.commit(transition);
            }
        }
    }

    /// Run the timer directives, then publish the new snapshot followed by
    /// the effects.
    fn commit(&mut self, transition: Transition) -> DispatchOutcome {
        for directive in &transition.directives {
            match directive {
                Directive::StartTimer => self.start_ticker(),
                Directive::StopAll => self.stop_all(),
                Directive::ScheduleMismatchReveal => {
                    let delay = self.config.mismatch_reveal_delay();
                    self.mismatch_reveal = Some(self.schedule(TimerKind::MismatchReveal, delay));
                }
                Directive::SchedulePeekEnd => {
                    let delay = self.config.double_down_peek();
                    self.peek = Some(self.schedule(TimerKind::PeekEnd, delay));
                }
            }
        }

        if transition.applied {
            self.snapshot_tx.send_replace(self.machine.snapshot());
            for effect in &transition.effects {
                // No subscribers is fine
                let _ = self.effects_tx.send(effect.clone());
            }
        }

        transition.into()
    }

    fn stop_all(&mut self) {
        self.ticker = None;
        self.mismatch_reveal = None;
        self.peek = None;
    }

    fn ticket(&mut self) -> u64 {
        self.next_ticket += 1;
        self.next_ticket
    }

    fn start_ticker(&mut self) {
        let ticket = self.ticket();
        let scheduler = self.scheduler.clone();
        let period = self.config.tick_interval();

        let handle = tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + period, period);
            loop {
                ticks.tick().await;
                if !deliver(&scheduler, TimerKind::Tick, ticket).await {
                    break;
                }
            }
        });

        self.ticker = Some(ScheduledTask { ticket, handle });
    }

    fn schedule(&mut self, kind: TimerKind, delay: tokio::time::Duration) -> ScheduledTask {
        let ticket = self.ticket();
        let scheduler = self.scheduler.clone();

        let handle = tokio::spawn(async move {
            sleep(delay).await;
            deliver(&scheduler, kind, ticket).await;
        });

        ScheduledTask { ticket, handle }
    }
}

/// Post a timer message; false once the session is gone.
async fn deliver(
    scheduler: &mpsc::WeakSender<SessionMessage>,
    kind: TimerKind,
    ticket: u64,
) -> bool {
    let Some(sender) = scheduler.upgrade() else {
        return false;
    };
    sender
        .send(SessionMessage::Timer { kind, ticket })
        .await
        .is_ok()
}

/// Create a session and spawn its actor on the current runtime
pub fn spawn(
    setup: GameSetup,
    config: SessionConfig,
    persistence: Arc<dyn StatePersistence>,
) -> SessionResult<GameHandle> {
    let (actor, handle) = GameActor::new(setup, config, persistence)?;
    tokio::spawn(actor.run());
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameMode;
    use crate::session::persistence::NoopPersistence;

    fn setup() -> GameSetup {
        GameSetup::new(4, GameMode::Standard).with_seed(77)
    }

    #[tokio::test]
    async fn test_rejects_invalid_config() {
        let config = SessionConfig {
            tick_interval_ms: 0,
            ..SessionConfig::default()
        };
        let result = GameActor::new(setup(), config, Arc::new(NoopPersistence));
        assert!(matches!(result, Err(SessionError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_rejects_zero_pairs() {
        let result = spawn(
            GameSetup::new(0, GameMode::Standard),
            SessionConfig::default(),
            Arc::new(NoopPersistence),
        );
        assert!(matches!(result, Err(SessionError::Configuration(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispatch_publishes_snapshot_before_reply() {
        let handle = spawn(setup(), SessionConfig::default(), Arc::new(NoopPersistence)).unwrap();
        let outcome = handle.dispatch(Action::start()).await.unwrap();
        assert!(outcome.applied);
        assert_eq!(handle.snapshot().phase, crate::session::SessionPhase::Playing);
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_after_actor_stops() {
        let (actor, handle) =
            GameActor::new(setup(), SessionConfig::default(), Arc::new(NoopPersistence)).unwrap();
        drop(actor);
        let result = handle.dispatch(Action::start()).await;
        assert!(matches!(result, Err(SessionError::Closed)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_effects_arrive_in_order() {
        let handle = spawn(setup(), SessionConfig::default(), Arc::new(NoopPersistence)).unwrap();
        let mut effects = handle.subscribe_effects();
        let outcome = handle.dispatch(Action::start()).await.unwrap();
        for expected in outcome.effects {
            assert_eq!(effects.recv().await.unwrap(), expected);
        }
    }
}
