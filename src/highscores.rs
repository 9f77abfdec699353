//! High score leaderboard system
//!
//! One top-10 table per minigame, persisted to LocalStorage.

use serde::{Deserialize, Serialize};

use crate::persistence::{Storage, StorageError, load_json, save_json};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Which minigame a table belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameKind {
    Shooter,
    Puzzle,
}

impl GameKind {
    fn storage_key(&self) -> &'static str {
        match self {
            GameKind::Shooter => "retro_arcade_highscores_shooter",
            GameKind::Puzzle => "retro_arcade_highscores_puzzle",
        }
    }
}

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    /// Level reached
    pub level: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard for one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScores {
    pub game: GameKind,
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new(game: GameKind) -> Self {
        Self {
            game,
            entries: Vec::new(),
        }
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

    /// Rank a score would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a score if it qualifies. Returns the rank achieved (1-indexed).
    pub fn add_score(&mut self, score: u64, level: u32, timestamp: f64) -> Option<usize> {
        let rank = self.potential_rank(score)?;
        self.entries.insert(
            rank - 1,
            HighScoreEntry {
                score,
                level,
                timestamp,
            },
        );
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    pub fn try_load(game: GameKind, storage: &dyn Storage) -> Result<Option<Self>, StorageError> {
        let loaded: Option<Self> = load_json(storage, game.storage_key())?;
        Ok(loaded.map(|mut scores| {
            scores.game = game;
            scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
            scores.entries.truncate(MAX_HIGH_SCORES);
            scores
        }))
    }

    /// Load a table, starting fresh on any failure
    pub fn load(game: GameKind, storage: &dyn Storage) -> Self {
        match Self::try_load(game, storage) {
            Ok(Some(scores)) => {
                log::info!("Loaded {} {:?} high scores", scores.entries.len(), game);
                scores
            }
            Ok(None) => {
                log::info!("No {:?} high scores found, starting fresh", game);
                Self::new(game)
            }
            Err(e) => {
                log::warn!("{:?} high scores unreadable ({}), starting fresh", game, e);
                Self::new(game)
            }
        }
    }

    pub fn save(&self, storage: &mut dyn Storage) {
        match save_json(storage, self.game.storage_key(), self) {
            Ok(()) => log::info!("High scores saved ({} entries)", self.entries.len()),
            Err(e) => log::warn!("High scores not saved: {}", e),
        }
    }
}

/// Format a timestamp as a relative date string
#[cfg(target_arch = "wasm32")]
pub fn format_date(timestamp: f64) -> String {
    format_age(js_sys::Date::now() - timestamp)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn format_date(_timestamp: f64) -> String {
    "N/A".to_string()
}

/// Human-readable age of an entry
pub fn format_age(age_ms: f64) -> String {
    let mins = (age_ms / 60_000.0).floor() as i64;
    let hours = mins / 60;
    let days = hours / 24;

    match (days, hours, mins) {
        (1, _, _) => "Yesterday".to_string(),
        (d, _, _) if d > 1 => format!("{} days ago", d),
        (_, 1, _) => "1 hour ago".to_string(),
        (_, h, _) if h > 1 => format!("{} hours ago", h),
        (_, _, 1) => "1 min ago".to_string(),
        (_, _, m) if m > 1 => format!("{} mins ago", m),
        _ => "Just now".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    #[test]
    fn test_sorted_descending_and_ranked() {
        let mut scores = HighScores::new(GameKind::Shooter);
        assert_eq!(scores.add_score(100, 1, 0.0), Some(1));
        assert_eq!(scores.add_score(300, 2, 0.0), Some(1));
        assert_eq!(scores.add_score(200, 1, 0.0), Some(2));

        let values: Vec<u64> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(values, vec![300, 200, 100]);
        assert_eq!(scores.top_score(), Some(300));
    }

    #[test]
    fn test_capped_at_ten() {
        let mut scores = HighScores::new(GameKind::Puzzle);
        for s in 1..=15 {
            scores.add_score(s * 10, 1, 0.0);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().map(|e| e.score), Some(60));
        assert!(!scores.qualifies(60));
        assert_eq!(scores.potential_rank(61), Some(10));
        assert_eq!(scores.add_score(5, 1, 0.0), None);
    }

    #[test]
    fn test_zero_never_qualifies() {
        let scores = HighScores::new(GameKind::Shooter);
        assert!(!scores.qualifies(0));
        assert_eq!(scores.potential_rank(0), None);
    }

    #[test]
    fn test_tie_ranks_below_existing() {
        let mut scores = HighScores::new(GameKind::Shooter);
        scores.add_score(100, 1, 1.0);
        assert_eq!(scores.add_score(100, 1, 2.0), Some(2));
    }

    #[test]
    fn test_tables_stored_per_game() {
        let mut storage = MemoryStorage::new();
        let mut shooter = HighScores::new(GameKind::Shooter);
        shooter.add_score(500, 2, 0.0);
        shooter.save(&mut storage);

        let puzzle = HighScores::load(GameKind::Puzzle, &storage);
        assert!(puzzle.is_empty());
        assert_eq!(HighScores::load(GameKind::Shooter, &storage), shooter);
    }

    #[test]
    fn test_format_age() {
        assert_eq!(format_age(5_000.0), "Just now");
        assert_eq!(format_age(90_000.0), "1 min ago");
        assert_eq!(format_age(3.0 * 3_600_000.0), "3 hours ago");
        assert_eq!(format_age(25.0 * 3_600_000.0), "Yesterday");
        assert_eq!(format_age(3.0 * 86_400_000.0), "3 days ago");
    }
}
