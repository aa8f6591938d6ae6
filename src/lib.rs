//! Lane Runner - an endless three-lane runner simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (runner physics, spawning, collisions, scoring)
//! - `tuning`: Data-driven game balance and presets
//! - `highscores`: Top-10 leaderboard
//! - `persistence`: Injected load/save collaborators for the leaderboard
//!
//! Drawing, input wiring and layout are left to the embedding application,
//! which reads [`sim::Snapshot`] once per frame.

pub mod error;
pub mod highscores;
pub mod persistence;
pub mod sim;
pub mod tuning;

pub use error::{ConfigError, StoreError};
pub use highscores::HighScores;
pub use tuning::SimConfig;

/// Game configuration constants
pub mod consts {
    /// Nominal frame duration that `dt` is normalized against (60 Hz)
    pub const NOMINAL_FRAME_SECS: f32 = 1.0 / 60.0;
    /// Largest normalized step a single tick may take.
    /// Bigger frame stalls are clamped so hazards can't tunnel past the runner.
    pub const MAX_DT_SCALE: f32 = 2.0;

    /// Lane count used by both presets
    pub const DEFAULT_LANES: usize = 3;
}

/// Convert a frame duration in seconds to a normalized, capped tick scale
#[inline]
pub fn normalize_dt(dt_secs: f32) -> f32 {
    if !dt_secs.is_finite() || dt_secs <= 0.0 {
        return 0.0;
    }
    (dt_secs / consts::NOMINAL_FRAME_SECS).min(consts::MAX_DT_SCALE)
}
