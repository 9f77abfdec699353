//! Periodic scoreboard snapshots

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::storage::{Storage, StorageError, load_json, save_json};
use crate::consts::SNAPSHOT_INTERVAL_MS;
use crate::driver::FrameTarget;
use crate::scoreboard::{DEFAULT_HEALTH, DEFAULT_LEVEL, DEFAULT_SCORE, DEFAULT_XP, Scoreboard};

/// Persisted scoreboard totals. Absent fields deserialize as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreSnapshot {
    pub score: u64,
    pub level: u32,
    pub health: u32,
    pub xp: u32,
}

impl ScoreSnapshot {
    /// Same snapshot with zero fields replaced by scoreboard defaults
    pub fn resolved(&self) -> Self {
        fn or(value: u32, default: u32) -> u32 {
            if value == 0 { default } else { value }
        }
        Self {
            score: if self.score == 0 {
                DEFAULT_SCORE
            } else {
                self.score
            },
            level: or(self.level, DEFAULT_LEVEL),
            health: or(self.health, DEFAULT_HEALTH),
            xp: or(self.xp, DEFAULT_XP),
        }
    }
}

/// Saves the shared scoreboard every `interval_ms` of frame time
pub struct Snapshotter {
    storage: Box<dyn Storage>,
    scoreboard: Rc<RefCell<Scoreboard>>,
    interval_ms: f64,
    elapsed_ms: f64,
    saves: u64,
}

impl Snapshotter {
    pub const STORAGE_KEY: &'static str = "retro_arcade_game_state";

    pub fn new(storage: Box<dyn Storage>, scoreboard: Rc<RefCell<Scoreboard>>) -> Self {
        Self {
            storage,
            scoreboard,
            interval_ms: SNAPSHOT_INTERVAL_MS,
            elapsed_ms: 0.0,
            saves: 0,
        }
    }

    pub fn with_interval(mut self, interval_ms: f64) -> Self {
        self.interval_ms = interval_ms.max(1.0);
        self
    }

    /// Successful saves so far
    pub fn saves(&self) -> u64 {
        self.saves
    }

    pub fn load(&self) -> Result<Option<ScoreSnapshot>, StorageError> {
        load_json(self.storage.as_ref(), Self::STORAGE_KEY)
    }

    /// Apply the stored snapshot to the scoreboard, if any. Failures are
    /// logged and leave the scoreboard untouched.
    pub fn restore(&self) -> bool {
        match self.load() {
            Ok(Some(snapshot)) => match self.scoreboard.try_borrow_mut() {
                Ok(mut board) => {
                    board.restore(&snapshot);
                    log::info!("Restored scoreboard snapshot");
                    true
                }
                Err(_) => {
                    log::warn!("Scoreboard busy, snapshot not restored");
                    false
                }
            },
            Ok(None) => false,
            Err(e) => {
                log::warn!("Could not restore scoreboard snapshot: {}", e);
                false
            }
        }
    }

    /// Write the current totals. A busy scoreboard skips this save.
    pub fn save(&mut self) -> Result<(), StorageError> {
        let Ok(snapshot) = self.scoreboard.try_borrow().map(|b| b.snapshot()) else {
            log::warn!("Scoreboard busy, snapshot skipped");
            return Ok(());
        };
        save_json(self.storage.as_mut(), Self::STORAGE_KEY, &snapshot)?;
        self.saves += 1;
        log::debug!("Scoreboard snapshot saved (score {})", snapshot.score);
        Ok(())
    }
}

impl FrameTarget for Snapshotter {
    fn tick(&mut self, elapsed_ms: f32) {
        self.elapsed_ms += elapsed_ms as f64;
        if self.elapsed_ms < self.interval_ms {
            return;
        }
        self.elapsed_ms = 0.0;
        if let Err(e) = self.save() {
            log::warn!("Scoreboard snapshot failed: {}", e);
        }
    }
}
