//! Procedural content generation
//!
//! Decides once per tick whether a spawn burst happens and what it contains.
//! The spawn interval shrinks with difficulty down to a floor, and every draw
//! comes from an injected [`RandomSource`] so runs replay exactly.
//!
//! Two strategies share the cadence logic:
//! - pattern blocks: a family (isolated, paired, blocking) is drawn from a
//!   difficulty band, then one of its hand-made lane layouts is instantiated
//! - hazard streams: one or two hazards plus a coin trail and the occasional
//!   power-up

use serde::{Deserialize, Serialize};

use super::random::RandomSource;
use super::state::{CollectibleKind, ObstacleKind, SpawnRequest};
use crate::tuning::{SpawnStrategy, SpawnTuning};

/// Pattern families, easiest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatternFamily {
    /// One hazard in one lane
    Isolated,
    /// Two lanes covered, or a single vehicle
    Paired,
    /// Lane blocks and full-width sequences
    Blocking,
}

impl PatternFamily {
    const ALL: [PatternFamily; 3] = [
        PatternFamily::Isolated,
        PatternFamily::Paired,
        PatternFamily::Blocking,
    ];

    /// Hand-made layouts belonging to this family
    pub fn patterns(&self) -> &'static [&'static [PatternEntry]] {
        match self {
            PatternFamily::Isolated => ISOLATED,
            PatternFamily::Paired => PAIRED,
            PatternFamily::Blocking => BLOCKING,
        }
    }
}

/// One step of a pattern layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternEntry {
    Spawn { lane: usize, kind: ObstacleKind },
    /// Produces nothing; pushes the rest of the pattern further back
    Delay,
}

const fn pothole(lane: usize) -> PatternEntry {
    PatternEntry::Spawn {
        lane,
        kind: ObstacleKind::Barrier,
    }
}

const fn vehicle(lane: usize) -> PatternEntry {
    PatternEntry::Spawn {
        lane,
        kind: ObstacleKind::Wide,
    }
}

const ISOLATED: &[&[PatternEntry]] = &[&[pothole(0)], &[pothole(1)], &[pothole(2)]];

const PAIRED: &[&[PatternEntry]] = &[
    &[pothole(0), pothole(1)],
    &[pothole(1), pothole(2)],
    &[pothole(0), pothole(2)],
    &[vehicle(1)],
];

const BLOCKING: &[&[PatternEntry]] = &[
    &[pothole(0), vehicle(1)],
    &[pothole(2), vehicle(1)],
    &[pothole(0), pothole(1), pothole(2), PatternEntry::Delay],
];

/// Lane layout of a coin trail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrailShape {
    Straight,
    ZigZag,
    AllLanes,
}

/// Spawn scheduler and content picker
#[derive(Debug, Clone)]
pub struct ContentGenerator {
    distance_since_spawn: f32,
    spawn_interval: f32,
    consecutive_blocking: u32,
    lanes: usize,
    tuning: SpawnTuning,
}

impl ContentGenerator {
    pub fn new(tuning: &SpawnTuning, lanes: usize) -> Self {
        Self {
            distance_since_spawn: 0.0,
            spawn_interval: tuning.initial_interval,
            consecutive_blocking: 0,
            lanes,
            tuning: tuning.clone(),
        }
    }

    pub fn reset(&mut self) {
        self.distance_since_spawn = 0.0;
        self.spawn_interval = self.tuning.initial_interval;
        self.consecutive_blocking = 0;
    }

    pub fn spawn_interval(&self) -> f32 {
        self.spawn_interval
    }

    pub fn distance_since_spawn(&self) -> f32 {
        self.distance_since_spawn
    }

    pub fn consecutive_blocking(&self) -> u32 {
        self.consecutive_blocking
    }

    /// Account for `travelled` distance and append a burst to `out` when the
    /// interval has elapsed. Returns whether a burst was generated.
    pub fn update<R: RandomSource + ?Sized>(
        &mut self,
        travelled: f32,
        difficulty: f32,
        rng: &mut R,
        out: &mut Vec<SpawnRequest>,
    ) -> bool {
        self.distance_since_spawn += travelled;
        if self.distance_since_spawn < self.spawn_interval {
            return false;
        }
        self.distance_since_spawn = 0.0;

        let before = out.len();
        match self.tuning.strategy {
            SpawnStrategy::PatternBlocks => {
                let family = self.pick_family(difficulty, rng);
                let patterns = family.patterns();
                let pattern = patterns[rng.index(patterns.len())];
                out.extend(self.instantiate(pattern));
                log::debug!(
                    "Spawned {:?} pattern at difficulty {:.2}",
                    family,
                    difficulty
                );
            }
            SpawnStrategy::HazardStreams => {
                self.spawn_hazards(difficulty, rng, out);
                self.spawn_coin_trail(rng, out);
            }
        }
        log::debug!("Spawn burst of {} items", out.len() - before);

        self.spawn_interval = self.tuning.interval_for(difficulty);
        true
    }

    /// Draw a pattern family for this difficulty, capping runs of the
    /// hardest family.
    pub fn pick_family<R: RandomSource + ?Sized>(
        &mut self,
        difficulty: f32,
        rng: &mut R,
    ) -> PatternFamily {
        let band = self.tuning.band_for(difficulty);
        let pick = weighted_pick(&self.tuning.pattern_weights[band], rng.unit());
        let family = PatternFamily::ALL[pick];

        if family != PatternFamily::Blocking {
            self.consecutive_blocking = 0;
            return family;
        }

        self.consecutive_blocking += 1;
        if self.consecutive_blocking > self.tuning.max_consecutive_blocking {
            self.consecutive_blocking = 0;
            log::debug!("Blocking streak capped, downgrading to isolated");
            return PatternFamily::Isolated;
        }
        family
    }

    /// Turn a layout into concrete spawns at the spawn depth. Delay markers
    /// emit nothing and push later entries back by `delay_spacing`.
    pub fn instantiate(&self, pattern: &[PatternEntry]) -> Vec<SpawnRequest> {
        let mut depth = self.tuning.spawn_distance;
        let mut spawns = Vec::with_capacity(pattern.len());
        for entry in pattern {
            match *entry {
                PatternEntry::Spawn { lane, kind } => spawns.push(SpawnRequest::Obstacle {
                    lane: lane.min(self.lanes - 1),
                    distance: depth,
                    kind,
                }),
                PatternEntry::Delay => depth += self.tuning.delay_spacing,
            }
        }
        spawns
    }

    fn spawn_hazards<R: RandomSource + ?Sized>(
        &self,
        difficulty: f32,
        rng: &mut R,
        out: &mut Vec<SpawnRequest>,
    ) {
        let band = self.tuning.band_for(difficulty);
        let kind = match weighted_pick(&self.tuning.hazard_weights[band], rng.unit()) {
            0 => ObstacleKind::Barrier,
            1 => ObstacleKind::Overhead,
            _ => ObstacleKind::Wide,
        };
        let lane = rng.index(self.lanes);
        let distance = self.tuning.spawn_distance;
        out.push(SpawnRequest::Obstacle {
            lane,
            distance,
            kind,
        });

        if difficulty > self.tuning.second_hazard_difficulty
            && rng.unit() < self.tuning.second_hazard_chance
        {
            let second = (lane + 1 + rng.index(self.lanes - 1)) % self.lanes;
            out.push(SpawnRequest::Obstacle {
                lane: second,
                distance,
                kind,
            });
        }
    }

    fn spawn_coin_trail<R: RandomSource + ?Sized>(&self, rng: &mut R, out: &mut Vec<SpawnRequest>) {
        let span = (self.tuning.coin_trail_max - self.tuning.coin_trail_min + 1) as usize;
        let count = self.tuning.coin_trail_min as usize + rng.index(span);
        let lane = rng.index(self.lanes);
        let shape = match rng.unit() {
            r if r < 0.3 => TrailShape::Straight,
            r if r < 0.6 => TrailShape::ZigZag,
            _ => TrailShape::AllLanes,
        };

        for i in 0..count {
            let coin_lane = match shape {
                TrailShape::Straight => lane,
                TrailShape::ZigZag => (lane + i % 2) % self.lanes,
                TrailShape::AllLanes => i % self.lanes,
            };
            out.push(SpawnRequest::Collectible {
                lane: coin_lane,
                distance: self.tuning.spawn_distance + i as f32 * self.tuning.coin_spacing,
                kind: CollectibleKind::Coin,
            });
        }

        if rng.unit() < self.tuning.power_up_chance {
            let kind = if rng.unit() < 0.5 {
                CollectibleKind::Magnet
            } else {
                CollectibleKind::Multiplier
            };
            out.push(SpawnRequest::Collectible {
                lane: rng.index(self.lanes),
                distance: self.tuning.spawn_distance + self.tuning.power_up_offset,
                kind,
            });
        }
    }
}

/// Map a unit roll onto a weighted table, skipping zero-weight entries
fn weighted_pick(weights: &[f32; 3], roll: f32) -> usize {
    let total: f32 = weights.iter().sum();
    let target = roll * total;
    let mut cumulative = 0.0;
    let mut last_nonzero = 0;
    for (i, weight) in weights.iter().enumerate() {
        if *weight <= 0.0 {
            continue;
        }
        cumulative += weight;
        last_nonzero = i;
        if target < cumulative {
            return i;
        }
    }
    last_nonzero
}
