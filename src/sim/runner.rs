//! The player-controlled runner
//!
//! Pure state plus a per-tick update. The runner knows nothing about hazards;
//! the world asks it for a [`Hitbox`] when resolving collisions.

use serde::{Deserialize, Serialize};

use crate::tuning::RunnerTuning;

/// Mutually exclusive motion mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Posture {
    #[default]
    Running,
    Jumping,
    Rolling,
}

/// A tick-counted timed effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatusEffect {
    pub active: bool,
    pub remaining_ticks: u32,
}

impl StatusEffect {
    /// (Re)start the effect; stays active for `ticks` further updates
    pub fn activate(&mut self, ticks: u32) {
        self.active = true;
        self.remaining_ticks = ticks;
    }

    /// Advance one tick. Returns true on the tick the effect expires.
    pub fn tick(&mut self) -> bool {
        if !self.active {
            return false;
        }
        if self.remaining_ticks == 0 {
            self.active = false;
            return true;
        }
        self.remaining_ticks -= 1;
        false
    }
}

/// Collision footprint of the runner for one tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hitbox {
    /// Rounded lane the runner currently occupies
    pub lane: usize,
    /// Vertical clearance above the track (jump height)
    pub bottom: f32,
    pub width: f32,
    pub height: f32,
    /// Height lost from the top while rolling
    pub height_offset: f32,
    pub rolling: bool,
}

/// Read-only view of the runner for renderers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunnerSnapshot {
    pub lane: f32,
    pub target_lane: usize,
    pub height: f32,
    pub jumping: bool,
    pub rolling: bool,
    pub anim_phase: f32,
    pub invincible: bool,
    pub magnet: bool,
    pub multiplier: f32,
}

/// The runner entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Runner {
    /// Continuous lateral position, eased toward `target_lane`
    pub lane: f32,
    pub target_lane: usize,
    pub height: f32,
    pub vertical_velocity: f32,
    pub posture: Posture,
    /// Ticks spent in the current roll
    pub roll_ticks: u32,
    pub anim_phase: f32,
    pub invincibility: StatusEffect,
    pub magnet: StatusEffect,
    pub multiplier: StatusEffect,
    /// Score factor while `multiplier` is active, 1.0 otherwise
    pub multiplier_factor: f32,
    lanes: usize,
    tuning: RunnerTuning,
}

impl Runner {
    pub fn new(tuning: &RunnerTuning, lanes: usize) -> Self {
        let mut runner = Self {
            lane: 0.0,
            target_lane: 0,
            height: 0.0,
            vertical_velocity: 0.0,
            posture: Posture::Running,
            roll_ticks: 0,
            anim_phase: 0.0,
            invincibility: StatusEffect::default(),
            magnet: StatusEffect::default(),
            multiplier: StatusEffect::default(),
            multiplier_factor: 1.0,
            lanes,
            tuning: tuning.clone(),
        };
        runner.reset();
        runner
    }

    /// Back to the start lane, grounded, with no effects
    pub fn reset(&mut self) {
        let start = self.tuning.start_lane.min(self.lanes - 1);
        self.lane = start as f32;
        self.target_lane = start;
        self.height = 0.0;
        self.vertical_velocity = 0.0;
        self.posture = Posture::Running;
        self.roll_ticks = 0;
        self.anim_phase = 0.0;
        self.invincibility = StatusEffect::default();
        self.magnet = StatusEffect::default();
        self.multiplier = StatusEffect::default();
        self.multiplier_factor = 1.0;
    }

    pub fn lanes(&self) -> usize {
        self.lanes
    }

    pub fn is_jumping(&self) -> bool {
        self.posture == Posture::Jumping
    }

    pub fn is_rolling(&self) -> bool {
        self.posture == Posture::Rolling
    }

    /// Returns false when the command was ignored
    pub fn move_left(&mut self) -> bool {
        if self.is_rolling() || self.target_lane == 0 {
            return false;
        }
        self.target_lane -= 1;
        true
    }

    /// Returns false when the command was ignored
    pub fn move_right(&mut self) -> bool {
        if self.is_rolling() || self.target_lane + 1 >= self.lanes {
            return false;
        }
        self.target_lane += 1;
        true
    }

    /// Start a jump; ignored mid-jump or mid-roll
    pub fn jump(&mut self) -> bool {
        if self.posture != Posture::Running {
            return false;
        }
        self.posture = Posture::Jumping;
        self.vertical_velocity = self.tuning.jump_power;
        true
    }

    /// Start a roll; ignored mid-jump or mid-roll
    pub fn roll(&mut self) -> bool {
        if self.posture != Posture::Running {
            return false;
        }
        self.posture = Posture::Rolling;
        self.roll_ticks = 0;
        true
    }

    pub fn activate_magnet(&mut self, ticks: u32) {
        self.magnet.activate(ticks);
    }

    pub fn activate_multiplier(&mut self, factor: f32, ticks: u32) {
        self.multiplier.activate(ticks);
        self.multiplier_factor = factor;
    }

    pub fn activate_invincibility(&mut self, ticks: u32) {
        self.invincibility.activate(ticks);
    }

    /// Current score factor (1.0 without an active multiplier)
    pub fn score_factor(&self) -> f32 {
        if self.multiplier.active {
            self.multiplier_factor
        } else {
            1.0
        }
    }

    /// Advance one tick. `dt` is the normalized frame scale and only drives
    /// the animation phase; motion and timers are tick-counted.
    pub fn update(&mut self, dt: f32) {
        self.ease_lane();

        match self.posture {
            Posture::Jumping => {
                self.vertical_velocity -= self.tuning.gravity;
                self.height += self.vertical_velocity;
                if self.height <= 0.0 {
                    self.height = 0.0;
                    self.vertical_velocity = 0.0;
                    self.posture = Posture::Running;
                }
            }
            Posture::Rolling => {
                self.roll_ticks += 1;
                if self.roll_ticks >= self.tuning.roll_ticks {
                    self.roll_ticks = 0;
                    self.posture = Posture::Running;
                }
            }
            Posture::Running => {}
        }

        self.anim_phase += match self.posture {
            Posture::Running => self.tuning.run_anim_speed * dt,
            Posture::Rolling => self.tuning.roll_anim_speed * dt,
            Posture::Jumping => 0.0,
        };

        self.invincibility.tick();
        self.magnet.tick();
        if self.multiplier.tick() {
            self.multiplier_factor = 1.0;
        }
    }

    fn ease_lane(&mut self) {
        let target = self.target_lane as f32;
        if self.lane == target {
            return;
        }
        self.lane += (target - self.lane) * self.tuning.lane_ease;
        if (self.lane - target).abs() < self.tuning.lane_snap {
            self.lane = target;
        }
    }

    /// Collision footprint for the current state
    pub fn hitbox(&self) -> Hitbox {
        let rolling = self.is_rolling();
        let lane = (self.lane.round().max(0.0) as usize).min(self.lanes - 1);
        Hitbox {
            lane,
            bottom: self.height,
            width: self.tuning.hitbox_width,
            height: if rolling {
                self.tuning.roll_height
            } else {
                self.tuning.hitbox_height
            },
            height_offset: if rolling { self.tuning.roll_offset } else { 0.0 },
            rolling,
        }
    }

    pub fn snapshot(&self) -> RunnerSnapshot {
        RunnerSnapshot {
            lane: self.lane,
            target_lane: self.target_lane,
            height: self.height,
            jumping: self.is_jumping(),
            rolling: self.is_rolling(),
            anim_phase: self.anim_phase,
            invincible: self.invincibility.active,
            magnet: self.magnet.active,
            multiplier: self.score_factor(),
        }
    }
}
