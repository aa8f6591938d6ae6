//! Data-driven game balance
//!
//! Every constant the engine uses lives in [`SimConfig`]. Two presets cover the
//! two ways the game has been played: `arcade` (jump/roll hazards, coin trails,
//! power-ups) and `classic` (pattern blocks of potholes and vehicles).

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_LANES, MAX_DT_SCALE};
use crate::error::ConfigError;

/// Which content generator drives spawning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpawnStrategy {
    /// Pattern families drawn from difficulty bands (isolated, paired, blocking)
    PatternBlocks,
    /// Independent hazard stream plus coin-trail stream
    #[default]
    HazardStreams,
}

/// Runner physics, posture and power-up durations (all per tick)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerTuning {
    pub start_lane: usize,
    /// Fraction of the remaining lateral gap closed each tick
    pub lane_ease: f32,
    /// Lateral gap below which the runner snaps onto its target lane
    pub lane_snap: f32,
    pub gravity: f32,
    pub jump_power: f32,
    pub roll_ticks: u32,
    pub run_anim_speed: f32,
    pub roll_anim_speed: f32,
    pub hitbox_width: f32,
    pub hitbox_height: f32,
    pub roll_height: f32,
    pub roll_offset: f32,
    pub magnet_ticks: u32,
    pub multiplier_factor: f32,
    pub multiplier_ticks: u32,
    pub invincibility_ticks: u32,
}

impl Default for RunnerTuning {
    fn default() -> Self {
        Self {
            start_lane: 1,
            lane_ease: 0.25,
            lane_snap: 0.01,
            gravity: 1.2,
            jump_power: 20.0,
            roll_ticks: 30,
            run_anim_speed: 0.3,
            roll_anim_speed: 0.5,
            hitbox_width: 30.0,
            hitbox_height: 60.0,
            roll_height: 20.0,
            roll_offset: 40.0,
            magnet_ticks: 300,
            multiplier_factor: 2.0,
            multiplier_ticks: 300,
            invincibility_ticks: 180,
        }
    }
}

/// Spawn cadence and content mix
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    pub strategy: SpawnStrategy,
    /// Distance ahead of the runner where new content appears
    pub spawn_distance: f32,
    /// Content further behind the runner than this is evicted
    pub despawn_distance: f32,
    /// Interval before the first burst of a run
    pub initial_interval: f32,
    /// `interval = max(min_interval, base_interval - difficulty * interval_shrink)`
    pub base_interval: f32,
    pub interval_shrink: f32,
    pub min_interval: f32,
    /// Difficulty values splitting easy/medium/hard bands
    pub band_edges: [f32; 2],
    /// Per band: weights for isolated / paired / blocking pattern families
    pub pattern_weights: [[f32; 3]; 3],
    /// Per band: weights for barrier / overhead / wide hazards
    pub hazard_weights: [[f32; 3]; 3],
    /// Blocking patterns allowed in a row before a forced downgrade
    pub max_consecutive_blocking: u32,
    /// Extra depth inserted by each delay marker inside a pattern
    pub delay_spacing: f32,
    pub second_hazard_difficulty: f32,
    pub second_hazard_chance: f32,
    pub coin_trail_min: u32,
    pub coin_trail_max: u32,
    pub coin_spacing: f32,
    pub power_up_chance: f32,
    pub power_up_offset: f32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            strategy: SpawnStrategy::HazardStreams,
            spawn_distance: 950.0,
            despawn_distance: -150.0,
            initial_interval: 200.0,
            base_interval: 250.0,
            interval_shrink: 50.0,
            min_interval: 150.0,
            band_edges: [0.3, 0.6],
            pattern_weights: [[85.0, 15.0, 0.0], [35.0, 40.0, 25.0], [10.0, 25.0, 65.0]],
            hazard_weights: [[70.0, 30.0, 0.0], [40.0, 30.0, 30.0], [30.0, 30.0, 40.0]],
            max_consecutive_blocking: 2,
            delay_spacing: 120.0,
            second_hazard_difficulty: 0.5,
            second_hazard_chance: 0.3,
            coin_trail_min: 3,
            coin_trail_max: 7,
            coin_spacing: 50.0,
            power_up_chance: 0.1,
            power_up_offset: 200.0,
        }
    }
}

impl SpawnTuning {
    /// Spawn interval for the given difficulty, never below the floor
    pub fn interval_for(&self, difficulty: f32) -> f32 {
        (self.base_interval - difficulty * self.interval_shrink).max(self.min_interval)
    }

    /// Difficulty band index (0 = easy, 2 = hard)
    pub fn band_for(&self, difficulty: f32) -> usize {
        if difficulty < self.band_edges[0] {
            0
        } else if difficulty < self.band_edges[1] {
            1
        } else {
            2
        }
    }
}

/// Hit-test tolerances and clearance thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionRules {
    /// Longitudinal window in which a hazard can hit
    pub obstacle_depth: f32,
    /// Lane distance under which a hazard shares the runner's lane
    pub lane_tolerance: f32,
    /// Height needed to clear a barrier
    pub barrier_clearance: f32,
    /// Rolling runners below this height pass under overheads
    pub slide_clearance: f32,
    /// Height needed to clear a wide hazard
    pub wide_clearance: f32,
    /// Longitudinal pickup window for collectibles
    pub collect_depth: f32,
    pub collect_lane_tolerance: f32,
    /// Lane reach while the magnet is active
    pub magnet_lane_tolerance: f32,
}

impl Default for CollisionRules {
    fn default() -> Self {
        Self {
            obstacle_depth: 30.0,
            lane_tolerance: 0.5,
            barrier_clearance: 40.0,
            slide_clearance: 50.0,
            wide_clearance: 60.0,
            collect_depth: 40.0,
            collect_lane_tolerance: 0.5,
            magnet_lane_tolerance: 1.5,
        }
    }
}

/// Speed, difficulty curve and scoring
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunTuning {
    /// World units travelled per nominal frame at difficulty 0
    pub base_speed: f32,
    /// World units travelled per nominal frame at difficulty 1
    pub max_speed: f32,
    /// Distance at which difficulty saturates at 1
    pub ramp_distance: f32,
    pub score_per_distance: f32,
    pub coin_value: f32,
    /// Combo lost per nominal frame without a coin
    pub combo_decay: f32,
}

impl Default for RunTuning {
    fn default() -> Self {
        Self {
            base_speed: 8.0,
            max_speed: 20.0,
            ramp_distance: 50_000.0,
            score_per_distance: 0.1,
            coin_value: 10.0,
            combo_decay: 0.02,
        }
    }
}

impl RunTuning {
    /// Difficulty in `[0, 1]`; monotonic in distance
    pub fn difficulty_at(&self, distance: f32) -> f32 {
        (distance / self.ramp_distance).clamp(0.0, 1.0)
    }

    /// Linear interpolation between base and max speed
    pub fn speed_at(&self, difficulty: f32) -> f32 {
        self.base_speed + (self.max_speed - self.base_speed) * difficulty.clamp(0.0, 1.0)
    }

    /// Speed as a 0-100 meter reading
    pub fn speed_percent(&self, speed: f32) -> f32 {
        let span = self.max_speed - self.base_speed;
        if span <= f32::EPSILON {
            return 100.0;
        }
        ((speed - self.base_speed) / span * 100.0).clamp(0.0, 100.0)
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub lanes: usize,
    pub runner: RunnerTuning,
    pub spawning: SpawnTuning,
    pub collision: CollisionRules,
    pub run: RunTuning,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::arcade()
    }
}

impl SimConfig {
    /// Jump/roll hazards with coin trails and power-ups
    pub fn arcade() -> Self {
        Self {
            lanes: DEFAULT_LANES,
            runner: RunnerTuning::default(),
            spawning: SpawnTuning::default(),
            collision: CollisionRules::default(),
            run: RunTuning::default(),
        }
    }

    /// Pattern-block spawning of potholes and vehicles, no collectibles
    pub fn classic() -> Self {
        Self {
            lanes: DEFAULT_LANES,
            runner: RunnerTuning {
                lane_ease: 0.2,
                ..RunnerTuning::default()
            },
            spawning: SpawnTuning {
                strategy: SpawnStrategy::PatternBlocks,
                spawn_distance: 650.0,
                despawn_distance: -250.0,
                initial_interval: 1500.0,
                base_interval: 1750.0,
                interval_shrink: 1000.0,
                min_interval: 600.0,
                band_edges: [0.25, 0.65],
                ..SpawnTuning::default()
            },
            collision: CollisionRules {
                obstacle_depth: 40.0,
                ..CollisionRules::default()
            },
            run: RunTuning {
                base_speed: 2.5,
                max_speed: 10.0,
                ramp_distance: 50_000.0,
                score_per_distance: 0.2,
                coin_value: 0.0,
                combo_decay: 0.02,
            },
        }
    }

    /// Parse a JSON document; fields it omits keep the arcade defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Reject configurations the engine cannot run
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lanes < 2 {
            return Err(ConfigError::invalid("lanes", "need at least two lanes"));
        }
        if self.runner.start_lane >= self.lanes {
            return Err(ConfigError::invalid(
                "runner.start_lane",
                format!("lane {} is outside 0..{}", self.runner.start_lane, self.lanes),
            ));
        }

        let r = &self.runner;
        if !(r.lane_ease > 0.0 && r.lane_ease <= 1.0) {
            return Err(ConfigError::invalid("runner.lane_ease", "must be in (0, 1]"));
        }
        positive("runner.lane_snap", r.lane_snap)?;
        positive("runner.gravity", r.gravity)?;
        positive("runner.jump_power", r.jump_power)?;
        positive_ticks("runner.roll_ticks", r.roll_ticks)?;
        positive("runner.hitbox_width", r.hitbox_width)?;
        positive("runner.hitbox_height", r.hitbox_height)?;
        positive("runner.roll_height", r.roll_height)?;
        non_negative("runner.roll_offset", r.roll_offset)?;
        non_negative("runner.run_anim_speed", r.run_anim_speed)?;
        non_negative("runner.roll_anim_speed", r.roll_anim_speed)?;
        positive_ticks("runner.magnet_ticks", r.magnet_ticks)?;
        positive_ticks("runner.multiplier_ticks", r.multiplier_ticks)?;
        positive_ticks("runner.invincibility_ticks", r.invincibility_ticks)?;
        if r.multiplier_factor < 1.0 {
            return Err(ConfigError::invalid("runner.multiplier_factor", "must be at least 1"));
        }

        let s = &self.spawning;
        positive("spawning.spawn_distance", s.spawn_distance)?;
        if s.despawn_distance >= 0.0 {
            return Err(ConfigError::invalid(
                "spawning.despawn_distance",
                "must lie behind the runner (negative)",
            ));
        }
        positive("spawning.initial_interval", s.initial_interval)?;
        positive("spawning.min_interval", s.min_interval)?;
        if s.base_interval < s.min_interval {
            return Err(ConfigError::invalid(
                "spawning.base_interval",
                "must not be below min_interval",
            ));
        }
        if s.interval_shrink < 0.0 {
            return Err(ConfigError::invalid(
                "spawning.interval_shrink",
                "must not be negative",
            ));
        }
        let [low, high] = s.band_edges;
        if !(0.0..=1.0).contains(&low) || !(0.0..=1.0).contains(&high) || low > high {
            return Err(ConfigError::invalid(
                "spawning.band_edges",
                "must be ascending and within [0, 1]",
            ));
        }
        positive("spawning.delay_spacing", s.delay_spacing)?;
        positive("spawning.coin_spacing", s.coin_spacing)?;
        non_negative("spawning.power_up_offset", s.power_up_offset)?;
        weights("spawning.pattern_weights", &s.pattern_weights)?;
        weights("spawning.hazard_weights", &s.hazard_weights)?;
        if s.max_consecutive_blocking == 0 {
            return Err(ConfigError::invalid(
                "spawning.max_consecutive_blocking",
                "must allow at least one blocking pattern",
            ));
        }
        if s.coin_trail_min == 0 || s.coin_trail_max < s.coin_trail_min {
            return Err(ConfigError::invalid(
                "spawning.coin_trail_min",
                "need 1 <= coin_trail_min <= coin_trail_max",
            ));
        }
        for (field, chance) in [
            ("spawning.second_hazard_chance", s.second_hazard_chance),
            ("spawning.power_up_chance", s.power_up_chance),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                return Err(ConfigError::invalid(field, "must be a probability"));
            }
        }
        if s.strategy == SpawnStrategy::PatternBlocks && self.lanes < DEFAULT_LANES {
            return Err(ConfigError::invalid(
                "spawning.strategy",
                "pattern blocks are laid out for three lanes",
            ));
        }

        let c = &self.collision;
        positive("collision.obstacle_depth", c.obstacle_depth)?;
        positive("collision.lane_tolerance", c.lane_tolerance)?;
        positive("collision.collect_depth", c.collect_depth)?;
        positive("collision.collect_lane_tolerance", c.collect_lane_tolerance)?;
        positive("collision.barrier_clearance", c.barrier_clearance)?;
        positive("collision.slide_clearance", c.slide_clearance)?;
        positive("collision.wide_clearance", c.wide_clearance)?;
        if c.magnet_lane_tolerance < c.collect_lane_tolerance {
            return Err(ConfigError::invalid(
                "collision.magnet_lane_tolerance",
                "must not be narrower than collect_lane_tolerance",
            ));
        }

        let run = &self.run;
        positive("run.base_speed", run.base_speed)?;
        if run.max_speed < run.base_speed {
            return Err(ConfigError::invalid("run.max_speed", "must be >= base_speed"));
        }
        positive("run.ramp_distance", run.ramp_distance)?;
        // One capped tick must not step over a whole hit window
        let window = 2.0 * c.obstacle_depth.min(c.collect_depth);
        let max_step = run.max_speed * MAX_DT_SCALE;
        if max_step >= window {
            return Err(ConfigError::invalid(
                "run.max_speed",
                format!("a capped tick travels {max_step}, hit window is only {window} deep"),
            ));
        }
        if run.score_per_distance < 0.0 || run.coin_value < 0.0 || run.combo_decay < 0.0 {
            return Err(ConfigError::invalid("run", "scoring values must not be negative"));
        }

        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be positive, got {value}")))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must not be negative, got {value}")))
    }
}

fn positive_ticks(field: &'static str, ticks: u32) -> Result<(), ConfigError> {
    if ticks == 0 {
        Err(ConfigError::invalid(field, "duration must be at least one tick"))
    } else {
        Ok(())
    }
}

fn weights(field: &'static str, table: &[[f32; 3]; 3]) -> Result<(), ConfigError> {
    for band in table {
        if band.iter().any(|w| *w < 0.0 || !w.is_finite()) || band.iter().sum::<f32>() <= 0.0 {
            return Err(ConfigError::invalid(
                field,
                "each band needs non-negative weights with a positive total",
            ));
        }
    }
    Ok(())
}
