//! Flappy entry point
//!
//! Loads configuration, puts the terminal into game mode and runs the loop.
//!
//! Environment:
//! - `FLAPPY_TUNING`: path to a tuning JSON file
//! - `FLAPPY_SETTINGS`: path to a settings JSON file
//! - `FLAPPY_SEED`: RNG seed, overriding the settings file
//! - `RUST_LOG`: log filter (default `warn`)

use std::error::Error;
use std::time::{SystemTime, UNIX_EPOCH};

use flappy::app::{self, FixedRate};
use flappy::frontend::{AudioManager, KeyboardInput, Resources, TerminalRenderer, TerminalSession};
use flappy::sim::GameState;
use flappy::{Settings, Tuning};

fn load_tuning() -> Result<Tuning, Box<dyn Error>> {
    match std::env::var_os("FLAPPY_TUNING") {
        Some(path) => Ok(Tuning::load(path)?),
        None => Ok(Tuning::default()),
    }
}

fn load_settings() -> Result<Settings, Box<dyn Error>> {
    match std::env::var_os("FLAPPY_SETTINGS") {
        Some(path) => Ok(Settings::load(path)?),
        None => Ok(Settings::default()),
    }
}

fn pick_seed(settings: &Settings) -> Result<u64, Box<dyn Error>> {
    if let Ok(raw) = std::env::var("FLAPPY_SEED") {
        return Ok(raw
            .trim()
            .parse()
            .map_err(|e| format!("invalid FLAPPY_SEED {raw:?}: {e}"))?);
    }
    if let Some(seed) = settings.seed {
        return Ok(seed);
    }
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    Ok(nanos)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    log::info!("Flappy starting...");

    let tuning = load_tuning()?;
    let settings = load_settings()?;
    let seed = pick_seed(&settings)?;
    let state = GameState::new(tuning.clone(), seed)?;

    let mut renderer = TerminalRenderer::new(
        std::io::stdout(),
        Resources::from_settings(&settings),
        &tuning,
    );
    let mut input = KeyboardInput;
    let mut audio = AudioManager::new(&settings);
    let mut pacer = FixedRate::new(settings.tick_rate_or(tuning.tick_rate));

    let summary = {
        let _session = TerminalSession::enter()?;
        app::run(
            state,
            &mut renderer,
            &mut input,
            &mut audio,
            &mut pacer,
            None,
        )?
    };

    match summary.best_score {
        Some(best) => println!("Rounds played: {}, best score: {best}", summary.rounds),
        None => println!("Rounds played: {}", summary.rounds),
    }
    Ok(())
}
