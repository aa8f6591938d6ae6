//! Live content: advancing, evicting and resolving collisions
//!
//! The world exclusively owns every in-flight obstacle and collectible.
//! Iteration order is spawn order (ascending id) so results are reproducible.

use serde::{Deserialize, Serialize};

use super::collision::{collectible_reached, obstacle_hits};
use super::generator::ContentGenerator;
use super::random::RandomSource;
use super::runner::Runner;
use super::state::{Collectible, CollectibleKind, Obstacle, ObstacleKind, SpawnRequest};
use crate::tuning::CollisionRules;

/// Outcome of one collision pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionReport {
    /// Closest hazard the runner failed to clear, if any
    pub obstacle: Option<Obstacle>,
    /// Coins picked up this tick (already removed from the world)
    pub coins: Vec<Collectible>,
    /// Power-ups picked up this tick (already removed from the world)
    pub power_ups: Vec<Collectible>,
}

/// In-flight obstacles and collectibles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldState {
    pub obstacles: Vec<Obstacle>,
    pub collectibles: Vec<Collectible>,
    despawn_distance: f32,
    next_id: u32,
    #[serde(skip)]
    pending: Vec<SpawnRequest>,
}

impl WorldState {
    pub fn new(despawn_distance: f32) -> Self {
        Self {
            obstacles: Vec::new(),
            collectibles: Vec::new(),
            despawn_distance,
            next_id: 1,
            pending: Vec::new(),
        }
    }

    pub fn reset(&mut self) {
        self.obstacles.clear();
        self.collectibles.clear();
        self.pending.clear();
        self.next_id = 1;
    }

    /// Allocate a new entity ID
    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn spawn_obstacle(&mut self, lane: usize, distance: f32, kind: ObstacleKind) -> u32 {
        let id = self.next_entity_id();
        self.obstacles.push(Obstacle {
            id,
            lane,
            distance,
            kind,
        });
        id
    }

    pub fn spawn_collectible(&mut self, lane: usize, distance: f32, kind: CollectibleKind) -> u32 {
        let id = self.next_entity_id();
        self.collectibles.push(Collectible {
            id,
            lane,
            distance,
            kind,
            consumed: false,
        });
        id
    }

    pub fn spawn(&mut self, request: SpawnRequest) -> u32 {
        match request {
            SpawnRequest::Obstacle {
                lane,
                distance,
                kind,
            } => self.spawn_obstacle(lane, distance, kind),
            SpawnRequest::Collectible {
                lane,
                distance,
                kind,
            } => self.spawn_collectible(lane, distance, kind),
        }
    }

    /// Move everything `travelled` closer, evict what has fallen behind, then
    /// let the generator append a new burst. Returns how many items spawned.
    pub fn advance<R: RandomSource + ?Sized>(
        &mut self,
        travelled: f32,
        difficulty: f32,
        generator: &mut ContentGenerator,
        rng: &mut R,
    ) -> usize {
        let despawn = self.despawn_distance;
        for obstacle in &mut self.obstacles {
            obstacle.distance -= travelled;
        }
        for item in &mut self.collectibles {
            item.distance -= travelled;
        }
        self.obstacles.retain(|o| o.distance >= despawn);
        self.collectibles.retain(|c| c.distance >= despawn);

        let mut pending = std::mem::take(&mut self.pending);
        generator.update(travelled, difficulty, rng, &mut pending);
        let spawned = pending.len();
        for request in pending.drain(..) {
            self.spawn(request);
        }
        self.pending = pending;
        spawned
    }

    /// Test the runner against all live content.
    ///
    /// Every in-range hazard is detected, but only the closest one (by
    /// absolute distance, earliest spawn on ties) is reported. Collected
    /// items are removed immediately so nothing is counted twice.
    pub fn resolve_collisions(
        &mut self,
        runner: &Runner,
        rules: &CollisionRules,
    ) -> CollisionReport {
        let hitbox = runner.hitbox();
        let mut report = CollisionReport::default();

        for obstacle in &self.obstacles {
            if !obstacle_hits(obstacle, &hitbox, rules) {
                continue;
            }
            let closer = report
                .obstacle
                .as_ref()
                .is_none_or(|best| obstacle.distance.abs() < best.distance.abs());
            if closer {
                report.obstacle = Some(obstacle.clone());
            }
        }

        let magnet = runner.magnet.active;
        let mut kept = Vec::with_capacity(self.collectibles.len());
        for mut item in self.collectibles.drain(..) {
            if !collectible_reached(&item, &hitbox, magnet, rules) {
                kept.push(item);
                continue;
            }
            item.consumed = true;
            if item.kind.is_power_up() {
                report.power_ups.push(item);
            } else {
                report.coins.push(item);
            }
        }
        self.collectibles = kept;

        report
    }
}
