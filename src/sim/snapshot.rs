//! Read-only per-tick view for renderers and HUDs

use serde::Serialize;

use super::random::RandomSource;
use super::runner::RunnerSnapshot;
use super::state::{Collectible, GamePhase, GameState, Obstacle};

/// Run aggregate as a HUD shows it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunSnapshot {
    pub phase: GamePhase,
    pub score: u64,
    pub distance: f32,
    pub coins: u32,
    pub combo: u32,
    pub max_combo: u32,
    pub speed: f32,
    /// Speed on a 0-100 meter
    pub speed_percent: f32,
    pub difficulty: f32,
    pub game_over: bool,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<'a> {
    pub runner: RunnerSnapshot,
    pub obstacles: &'a [Obstacle],
    pub collectibles: &'a [Collectible],
    pub run: RunSnapshot,
}

impl<R: RandomSource> GameState<R> {
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            runner: self.runner.snapshot(),
            obstacles: &self.world.obstacles,
            collectibles: &self.world.collectibles,
            run: RunSnapshot {
                phase: self.phase,
                score: self.display_score(),
                distance: self.distance,
                coins: self.coins,
                combo: self.display_combo(),
                max_combo: self.max_combo,
                speed: self.speed,
                speed_percent: self.config.run.speed_percent(self.speed),
                difficulty: self.difficulty,
                game_over: self.is_game_over(),
            },
        }
    }
}
