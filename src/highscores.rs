//! High score leaderboard
//!
//! Keeps the best 10 runs, sorted by score. Loading and saving go through a
//! [`crate::persistence::ScoreStore`] supplied by the caller.

use serde::{Deserialize, Serialize};

use crate::sim::FinalStats;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    /// Distance covered by the run
    pub distance: f32,
    pub coins: u32,
    pub max_combo: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Get the rank a score would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Insert an entry if it qualifies.
    /// Returns the rank achieved (1-indexed). Equal scores rank below older ones.
    pub fn add_score(&mut self, entry: HighScoreEntry) -> Option<usize> {
        let rank = self.potential_rank(entry.score)?;
        self.entries.insert(rank - 1, entry);
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    /// Record the stats of a finished run
    pub fn record(&mut self, stats: &FinalStats, timestamp: f64) -> Option<usize> {
        let rank = self.add_score(HighScoreEntry {
            score: stats.score,
            distance: stats.distance,
            coins: stats.coins,
            max_combo: stats.max_combo,
            timestamp,
        });
        if let Some(rank) = rank {
            log::info!("New high score #{}: {}", rank, stats.score);
        }
        rank
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(score: u64) -> HighScoreEntry {
        HighScoreEntry {
            score,
            distance: score as f32 * 10.0,
            coins: 0,
            max_combo: 0,
            timestamp: 0.0,
        }
    }

    #[test]
    fn test_zero_never_qualifies() {
        let board = HighScores::new();
        assert!(!board.qualifies(0));
        assert!(board.qualifies(1));
        assert_eq!(board.potential_rank(0), None);
    }

    #[test]
    fn test_entries_stay_sorted() {
        let mut board = HighScores::new();
        assert_eq!(board.add_score(entry(50)), Some(1));
        assert_eq!(board.add_score(entry(80)), Some(1));
        assert_eq!(board.add_score(entry(60)), Some(2));
        // Ties go below the existing entry
        assert_eq!(board.add_score(entry(60)), Some(3));

        let scores: Vec<u64> = board.entries.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![80, 60, 60, 50]);
        assert_eq!(board.top_score(), Some(80));
    }

    #[test]
    fn test_full_board_drops_lowest() {
        let mut board = HighScores::new();
        for score in 1..=MAX_HIGH_SCORES as u64 {
            board.add_score(entry(score * 10));
        }
        assert!(!board.qualifies(10));
        assert_eq!(board.add_score(entry(5)), None);

        assert_eq!(board.potential_rank(55), Some(6));
        assert_eq!(board.add_score(entry(55)), Some(6));
        assert_eq!(board.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(board.entries.last().map(|e| e.score), Some(20));
    }

    #[test]
    fn test_record_copies_final_stats() {
        let mut board = HighScores::new();
        let stats = FinalStats {
            score: 420,
            distance: 3_900.5,
            coins: 12,
            max_combo: 7,
        };
        assert_eq!(board.record(&stats, 1_700_000_000_000.0), Some(1));
        let top = &board.entries[0];
        assert_eq!((top.score, top.coins, top.max_combo), (420, 12, 7));
        assert_eq!(top.distance, 3_900.5);
        assert!(!board.is_empty());
    }
}
