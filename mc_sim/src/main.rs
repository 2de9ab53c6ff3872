//! Headless memory casino simulator.
//!
//! Spawns one game session per game and lets a memory bot play it through
//! the session handle, logging effects and a summary of the run.

mod bot;
mod config;
mod persistence;

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use anyhow::Error;
use ctrlc::set_handler;
use log::{debug, info, warn};
use memory_casino::{
    game::{GameSetup, rewards::chip_payout},
    session::{self, Action, Effect, SessionConfig, SessionPhase},
};
use pico_args::Arguments;
use tokio::sync::broadcast::{self, error::RecvError};

use bot::MemoryBot;
use config::{SimConfig, SimOverrides};
use persistence::LogPersistence;

const HELP: &str = "\
Play memory casino games with a bot

USAGE:
  mc_sim [OPTIONS]

OPTIONS:
  --mode       MODE        standard, time_attack, daily_challenge or high_roller  [default: env SIM_MODE or standard]
  --pairs      N           Pairs on the table                                      [default: env SIM_PAIRS or 8]
  --games      N           Games to play                                           [default: env SIM_GAMES or 1]
  --seed       N           Deck seed of the first game                             [default: env SIM_SEED or random]
  --stage      STAGE       High Roller circuit: local, regional or world           [default: env SIM_STAGE or local]

FLAGS:
  --double-down            Go all in whenever allowed
  --fast                   Turn mismatches back without waiting
  -h, --help               Print help information

ENVIRONMENT:
  SIM_BOT_RECALL           Chance in percent that the bot remembers a seen card [default: 80]
  RUST_LOG                 Log filter; trace also logs every saved state as JSON
";

/// How one game went
#[derive(Debug)]
struct GameReport {
    won: bool,
    score: i64,
    moves: u32,
    seconds: u32,
    chips: u64,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let overrides = SimOverrides {
        mode: pargs.opt_value_from_str("--mode")?,
        pairs: pargs.opt_value_from_str("--pairs")?,
        games: pargs.opt_value_from_str("--games")?,
        seed: pargs.opt_value_from_str("--seed")?,
        stage: pargs.opt_value_from_str("--stage")?,
        double_down: pargs.contains("--double-down"),
        fast: pargs.contains("--fast"),
    };

    // Catching signals for a clean stop between moves.
    let stop = Arc::new(AtomicBool::new(false));
    let stop_flag = stop.clone();
    set_handler(move || stop_flag.store(true, Ordering::SeqCst))?;

    env_logger::builder().format_target(false).init();

    let config = SimConfig::from_env(overrides)?;
    config.validate()?;
    info!(
        "Playing {} {} game(s) with {} pairs",
        config.games, config.mode, config.pairs
    );

    let mut bot = MemoryBot::new(config.recall_percent, config.double_down, config.seed);
    let mut reports = Vec::new();
    for game in 0..config.games {
        if stop.load(Ordering::SeqCst) {
            break;
        }
        match play_game(&config, game, &mut bot, &stop).await? {
            Some(report) => {
                info!(
                    "Game {}: {} with {} points in {} moves ({}s), {} chips",
                    game + 1,
                    if report.won { "won" } else { "lost" },
                    report.score,
                    report.moves,
                    report.seconds,
                    report.chips
                );
                reports.push(report);
            }
            None => info!("Game {} abandoned", game + 1),
        }
    }

    let wins = reports.iter().filter(|r| r.won).count();
    let chips: u64 = reports.iter().map(|r| r.chips).sum();
    let best = reports.iter().map(|r| r.score).max().unwrap_or(0);
    info!(
        "Finished {} game(s): {} won, {} chips, best score {}",
        reports.len(),
        wins,
        chips,
        best
    );

    Ok(())
}

/// Play one game to the end. Returns `None` when interrupted.
async fn play_game(
    config: &SimConfig,
    game: u32,
    bot: &mut MemoryBot,
    stop: &AtomicBool,
) -> Result<Option<GameReport>, Error> {
    let mut setup = GameSetup::new(config.pairs, config.mode);
    if let Some(seed) = config.seed_for_game(game) {
        setup = setup.with_seed(seed);
    }
    if let Some(stage) = config.circuit_stage() {
        setup = setup.with_circuit_stage(stage);
    }

    let handle = session::spawn(setup, SessionConfig::default(), Arc::new(LogPersistence))?;
    let effect_log = tokio::spawn(log_effects(handle.subscribe_effects()));
    let mut states = handle.subscribe_state();

    bot.reset();
    handle.dispatch(Action::start()).await?;

    loop {
        if stop.load(Ordering::SeqCst) {
            return Ok(None);
        }

        let snapshot = handle.snapshot();
        if matches!(snapshot.phase, SessionPhase::Won | SessionPhase::Lost) {
            break;
        }
        let state = snapshot.state;
        bot.observe(&state);

        if state.has_error_cards() {
            if config.fast {
                handle.dispatch(Action::ProcessMismatch).await?;
            } else {
                states.changed().await?;
            }
            continue;
        }

        if bot.wants_double_down(&state) {
            let outcome = handle.dispatch(Action::DoubleDown).await?;
            for effect in &outcome.effects {
                if let Effect::RevealCards { card_ids } = effect {
                    bot.peek(&state, card_ids);
                }
            }
            continue;
        }

        match bot.next_flip(&state) {
            Some(card_id) => {
                handle.dispatch(Action::FlipCard(card_id)).await?;
            }
            None => states.changed().await?,
        }
    }

    let snapshot = handle.snapshot();
    let report = GameReport {
        won: snapshot.state.is_game_won,
        score: snapshot.state.score,
        moves: snapshot.state.moves,
        seconds: snapshot.elapsed_seconds,
        chips: chip_payout(&snapshot.state),
    };

    // Dropping the last handle closes the session and the effect stream
    drop(states);
    drop(handle);
    if let Err(e) = effect_log.await {
        warn!("Effect log task failed: {e}");
    }

    Ok(Some(report))
}

async fn log_effects(mut effects: broadcast::Receiver<Effect>) {
    loop {
        match effects.recv().await {
            Ok(effect) => match serde_json::to_string(&effect) {
                Ok(json) => debug!("effect {json}"),
                Err(e) => warn!("Unprintable effect {effect:?}: {e}"),
            },
            Err(RecvError::Lagged(dropped)) => {
                warn!("Effect log fell behind, {dropped} effect(s) dropped");
            }
            Err(RecvError::Closed) => break,
        }
    }
}
