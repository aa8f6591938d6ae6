//! High score persistence
//!
//! The simulation never touches storage. Callers pick a [`ScoreStore`]:
//! - [`JsonFileStore`]: JSON on disk, written to a temp file then renamed
//! - [`MemoryStore`]: in-process, for tests and embedders with their own storage

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::StoreError;
use crate::highscores::HighScores;

/// Load/save collaborator for the leaderboard
pub trait ScoreStore {
    fn load(&self) -> Result<HighScores, StoreError>;
    fn save(&self, scores: &HighScores) -> Result<(), StoreError>;
}

/// Leaderboard stored as a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for JsonFileStore {
    /// A missing file is an empty leaderboard
    fn load(&self) -> Result<HighScores, StoreError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No high scores at {}, starting fresh", self.path.display());
                return Ok(HighScores::new());
            }
            Err(e) => return Err(e.into()),
        };
        let scores: HighScores = serde_json::from_str(&json)?;
        log::info!("Loaded {} high scores", scores.entries.len());
        Ok(scores)
    }

    fn save(&self, scores: &HighScores) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(scores)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        log::info!("High scores saved ({} entries)", scores.entries.len());
        Ok(())
    }
}

/// Leaderboard held in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    scores: Mutex<HighScores>,
}

impl MemoryStore {
    pub fn new(scores: HighScores) -> Self {
        Self {
            scores: Mutex::new(scores),
        }
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> Result<HighScores, StoreError> {
        let scores = self.scores.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(scores.clone())
    }

    fn save(&self, scores: &HighScores) -> Result<(), StoreError> {
        let mut stored = self.scores.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *stored = scores.clone();
        Ok(())
    }
}
