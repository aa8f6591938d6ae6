//! Error types
//!
//! The simulation step itself is infallible; only building a simulation from
//! configuration and touching the high-score store can fail.

use std::io;

use thiserror::Error;

/// Rejected or unreadable simulation configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read config: {0}")]
    Io(#[from] io::Error),
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Failure while loading or saving persisted high scores
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("high score storage I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("high score data is malformed: {0}")]
    Serde(#[from] serde_json::Error),
}
