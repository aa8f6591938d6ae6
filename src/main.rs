//! Lane Runner headless entry point
//!
//! Plays one autopilot run at the nominal frame rate and records the result.
//!
//! Usage: `lane-runner [config.json] [seed]`

use std::error::Error;
use std::time::{SystemTime, UNIX_EPOCH};

use lane_runner::SimConfig;
use lane_runner::consts::NOMINAL_FRAME_SECS;
use lane_runner::persistence::{JsonFileStore, ScoreStore};
use lane_runner::sim::{GameEvent, GameState, TickInput, tick};

const HIGHSCORES_PATH: &str = "highscores.json";
/// Ten minutes of simulated play
const MAX_TICKS: u64 = 60 * 60 * 10;
const PROGRESS_EVERY: u64 = 600;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => SimConfig::load(&path)?,
        None => SimConfig::default(),
    };
    let seed = match args.next() {
        Some(seed) => seed.parse::<u64>()?,
        None => now_millis() as u64,
    };

    log::info!("Lane Runner starting...");
    let mut state = GameState::new(config, seed)?;
    state.start();

    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };
    let mut final_stats = None;
    while state.time_ticks < MAX_TICKS {
        tick(&mut state, &input, NOMINAL_FRAME_SECS);

        for event in state.take_events() {
            match event {
                GameEvent::GameOver(stats) => final_stats = Some(stats),
                GameEvent::PowerUpCollected { kind } => log::info!("Picked up {:?}", kind),
                _ => {}
            }
        }
        if state.is_game_over() {
            break;
        }
        if state.time_ticks % PROGRESS_EVERY == 0 {
            log::info!(
                "t={}s distance {:.0} score {} speed {:.0}%",
                state.time_ticks / 60,
                state.distance,
                state.display_score(),
                state.config.run.speed_percent(state.speed)
            );
        }
    }

    let stats = final_stats.unwrap_or_else(|| {
        log::info!("Tick cap reached, ending run");
        state.final_stats()
    });
    println!("{}", serde_json::to_string_pretty(&stats)?);

    let store = JsonFileStore::new(HIGHSCORES_PATH);
    let mut scores = store.load()?;
    match scores.record(&stats, now_millis()) {
        Some(_) => store.save(&scores)?,
        None => log::info!("Score {} did not make the leaderboard", stats.score),
    }
    Ok(())
}

fn now_millis() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or(0.0)
}
