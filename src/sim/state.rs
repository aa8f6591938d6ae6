//! Run state and core simulation types
//!
//! [`GameState`] owns everything a run mutates: the runner, the live world,
//! the content generator, its random source and the run aggregate.

use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::generator::ContentGenerator;
use super::random::{RandomSource, seeded};
use super::runner::Runner;
use super::world::WorldState;
use crate::error::ConfigError;
use crate::tuning::SimConfig;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Reset, waiting for the first start
    Ready,
    /// Active gameplay
    Running,
    /// Game is paused
    Paused,
    /// Run ended; only a reset re-arms the simulation
    GameOver,
}

/// Hazard types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Low hazard, cleared by jumping
    Barrier,
    /// High hazard, cleared by rolling under it
    Overhead,
    /// Full-size hazard (train, vehicle); dodge by changing lane
    Wide,
}

/// A hazard scrolling toward the runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub lane: usize,
    /// Distance ahead of the runner (negative once passed)
    pub distance: f32,
    pub kind: ObstacleKind,
}

/// Collectible types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectibleKind {
    Coin,
    Magnet,
    Multiplier,
}

impl CollectibleKind {
    pub fn is_power_up(&self) -> bool {
        !matches!(self, CollectibleKind::Coin)
    }
}

/// A coin or power-up scrolling toward the runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    pub id: u32,
    pub lane: usize,
    pub distance: f32,
    pub kind: CollectibleKind,
    pub consumed: bool,
}

/// What the content generator asks the world to place
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnRequest {
    Obstacle {
        lane: usize,
        distance: f32,
        kind: ObstacleKind,
    },
    Collectible {
        lane: usize,
        distance: f32,
        kind: CollectibleKind,
    },
}

/// Stats reported once when a run ends
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinalStats {
    pub score: u64,
    pub distance: f32,
    pub coins: u32,
    pub max_combo: u32,
}

/// Incremental notifications for the embedding application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RunStarted { seed: u64 },
    ScoreChanged { score: u64 },
    CoinCollected { coins: u32, combo: u32 },
    ComboChanged { combo: u32 },
    PowerUpCollected { kind: CollectibleKind },
    /// An obstacle hit absorbed by invincibility
    ObstacleShielded { obstacle_id: u32 },
    GameOver(FinalStats),
}

/// Complete state of one simulated run
#[derive(Debug, Clone)]
pub struct GameState<R = Pcg32> {
    /// Run seed for reproducibility
    pub seed: u64,
    pub config: SimConfig,
    pub runner: Runner,
    pub world: WorldState,
    pub generator: ContentGenerator,
    pub(crate) rng: R,
    pub phase: GamePhase,
    /// Unrounded score; displayed floored
    pub score: f64,
    pub distance: f32,
    pub coins: u32,
    /// Decaying coin streak; displayed floored
    pub combo: f32,
    pub max_combo: u32,
    pub speed: f32,
    pub difficulty: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub(crate) events: Vec<GameEvent>,
    pub(crate) reported_score: u64,
    pub(crate) reported_combo: u32,
    /// Live obstacles whose hit was already absorbed
    pub(crate) shielded_obstacles: Vec<u32>,
}

impl GameState<Pcg32> {
    /// Create a run driven by a PCG seeded with `seed`
    pub fn new(config: SimConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, seed, seeded(seed))
    }

    /// Reseed, reset and start a fresh run
    pub fn restart(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = seeded(seed);
        self.reset();
        self.start();
    }
}

impl<R: RandomSource> GameState<R> {
    /// Create a run with an explicit random source. Fails on invalid config.
    pub fn with_rng(config: SimConfig, seed: u64, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let runner = Runner::new(&config.runner, config.lanes);
        let world = WorldState::new(config.spawning.despawn_distance);
        let generator = ContentGenerator::new(&config.spawning, config.lanes);
        let speed = config.run.base_speed;
        Ok(Self {
            seed,
            config,
            runner,
            world,
            generator,
            rng,
            phase: GamePhase::Ready,
            score: 0.0,
            distance: 0.0,
            coins: 0,
            combo: 0.0,
            max_combo: 0,
            speed,
            difficulty: 0.0,
            time_ticks: 0,
            events: Vec::new(),
            reported_score: 0,
            reported_combo: 0,
            shielded_obstacles: Vec::new(),
        })
    }

    /// Clear the run back to `Ready`. The random source keeps its stream.
    pub fn reset(&mut self) {
        self.runner.reset();
        self.world.reset();
        self.generator.reset();
        self.phase = GamePhase::Ready;
        self.score = 0.0;
        self.distance = 0.0;
        self.coins = 0;
        self.combo = 0.0;
        self.max_combo = 0;
        self.speed = self.config.run.base_speed;
        self.difficulty = 0.0;
        self.time_ticks = 0;
        self.events.clear();
        self.reported_score = 0;
        self.reported_combo = 0;
        self.shielded_obstacles.clear();
    }

    /// Begin ticking. Has no effect once the run is over.
    pub fn start(&mut self) {
        if self.phase != GamePhase::Ready {
            return;
        }
        self.phase = GamePhase::Running;
        self.events.push(GameEvent::RunStarted { seed: self.seed });
        log::info!("Run started (seed {})", self.seed);
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Score as displayed
    pub fn display_score(&self) -> u64 {
        self.score.floor() as u64
    }

    /// Combo as displayed
    pub fn display_combo(&self) -> u32 {
        self.combo.floor() as u32
    }

    pub fn final_stats(&self) -> FinalStats {
        FinalStats {
            score: self.display_score(),
            distance: self.distance,
            coins: self.coins,
            max_combo: self.max_combo,
        }
    }

    /// Events emitted since the last call, oldest first
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
