//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame time is normalized and capped before it touches the world
//! - Injected random source only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod generator;
pub mod random;
pub mod runner;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod world;

pub use autopilot::autopilot_input;
pub use generator::{ContentGenerator, PatternEntry, PatternFamily};
pub use random::{RandomSource, seeded};
pub use runner::{Hitbox, Posture, Runner, RunnerSnapshot, StatusEffect};
pub use snapshot::{RunSnapshot, Snapshot};
pub use state::{
    Collectible, CollectibleKind, FinalStats, GameEvent, GamePhase, GameState, Obstacle,
    ObstacleKind, SpawnRequest,
};
pub use tick::{TickInput, tick};
pub use world::{CollisionReport, WorldState};
