//! Site-wide scoreboard
//!
//! Score, level, health and XP shared by both minigames and the rest of the
//! page. Minigames feed it through `ScoreSink`; the page listens through
//! `subscribe`.

use serde::{Deserialize, Serialize};

use crate::persistence::ScoreSnapshot;

pub const DEFAULT_SCORE: u64 = 2024;
pub const DEFAULT_LEVEL: u32 = 1;
pub const DEFAULT_HEALTH: u32 = 100;
pub const DEFAULT_XP: u32 = 75;
pub const DEFAULT_MAX_HEALTH: u32 = 100;
pub const DEFAULT_MAX_XP: u32 = 100;
/// Max health gained per level up
pub const HEALTH_PER_LEVEL: u32 = 10;

/// Score needed for `Achievement::HighScorer`
pub const HIGH_SCORER_SCORE: u64 = 1000;
/// Level needed for `Achievement::LevelMaster`
pub const LEVEL_MASTER_LEVEL: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Achievement {
    HighScorer,
    LevelMaster,
}

impl Achievement {
    pub const ALL: [Achievement; 2] = [Achievement::HighScorer, Achievement::LevelMaster];

    pub fn name(&self) -> &'static str {
        match self {
            Achievement::HighScorer => "High Scorer",
            Achievement::LevelMaster => "Level Master",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Achievement::HighScorer => "Reached 1000 points!",
            Achievement::LevelMaster => "Reached level 5!",
        }
    }

    fn reached(&self, score: u64, level: u32) -> bool {
        match self {
            Achievement::HighScorer => score >= HIGH_SCORER_SCORE,
            Achievement::LevelMaster => level >= LEVEL_MASTER_LEVEL,
        }
    }
}

/// Unlock tracker. Each achievement unlocks at most once.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Achievements {
    unlocked: Vec<Achievement>,
}

impl Achievements {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_unlocked(&self, achievement: Achievement) -> bool {
        self.unlocked.contains(&achievement)
    }

    pub fn unlocked(&self) -> &[Achievement] {
        &self.unlocked
    }

    /// Unlock everything the current totals qualify for; returns only the
    /// newly unlocked ones
    pub fn check(&mut self, score: u64, level: u32) -> Vec<Achievement> {
        let mut fresh = Vec::new();
        for achievement in Achievement::ALL {
            if !self.is_unlocked(achievement) && achievement.reached(score, level) {
                self.unlocked.push(achievement);
                fresh.push(achievement);
            }
        }
        fresh
    }
}

/// Change notification delivered to subscribers
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreEvent {
    ScoreChanged { score: u64, delta: u64 },
    HealthChanged { health: u32, max_health: u32 },
    XpChanged { xp: u32, max_xp: u32 },
    LevelUp { level: u32 },
    AchievementUnlocked(Achievement),
    /// Whole state replaced from a snapshot
    Restored(ScoreSnapshot),
}

pub type ScoreObserver = Box<dyn FnMut(&ScoreEvent)>;

pub struct Scoreboard {
    score: u64,
    level: u32,
    health: u32,
    max_health: u32,
    xp: u32,
    max_xp: u32,
    achievements: Achievements,
    observers: Vec<ScoreObserver>,
}

impl Default for Scoreboard {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Scoreboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scoreboard")
            .field("score", &self.score)
            .field("level", &self.level)
            .field("health", &self.health)
            .field("max_health", &self.max_health)
            .field("xp", &self.xp)
            .field("max_xp", &self.max_xp)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Scoreboard {
    pub fn new() -> Self {
        Self {
            score: DEFAULT_SCORE,
            level: DEFAULT_LEVEL,
            health: DEFAULT_HEALTH,
            max_health: DEFAULT_MAX_HEALTH,
            xp: DEFAULT_XP,
            max_xp: DEFAULT_MAX_XP,
            achievements: Achievements::new(),
            observers: Vec::new(),
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn max_health(&self) -> u32 {
        self.max_health
    }

    pub fn xp(&self) -> u32 {
        self.xp
    }

    pub fn max_xp(&self) -> u32 {
        self.max_xp
    }

    pub fn achievements(&self) -> &Achievements {
        &self.achievements
    }

    /// Register a listener for every subsequent change
    pub fn subscribe(&mut self, observer: impl FnMut(&ScoreEvent) + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn emit(&mut self, event: ScoreEvent) {
        for observer in &mut self.observers {
            observer(&event);
        }
    }

    pub fn update_score(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
        self.emit(ScoreEvent::ScoreChanged {
            score: self.score,
            delta: points,
        });
        self.check_level_up();
        self.check_achievements();
    }

    /// Apply a signed health change, clamped to `0..=max_health`
    pub fn update_health(&mut self, change: i32) {
        let health = (self.health as i64 + change as i64).clamp(0, self.max_health as i64);
        self.health = health as u32;
        self.emit(ScoreEvent::HealthChanged {
            health: self.health,
            max_health: self.max_health,
        });
    }

    /// Add XP, capped at `max_xp`. Reaching the cap levels up.
    pub fn update_xp(&mut self, points: u32) {
        self.xp = self.xp.saturating_add(points).min(self.max_xp);
        self.emit(ScoreEvent::XpChanged {
            xp: self.xp,
            max_xp: self.max_xp,
        });
        self.check_level_up();
        self.check_achievements();
    }

    fn check_level_up(&mut self) {
        if self.xp < self.max_xp {
            return;
        }
        self.level += 1;
        self.xp = 0;
        self.max_health += HEALTH_PER_LEVEL;
        self.health = self.max_health;
        log::debug!("Scoreboard level up -> {}", self.level);
        self.emit(ScoreEvent::LevelUp { level: self.level });
    }

    fn check_achievements(&mut self) {
        for achievement in self.achievements.check(self.score, self.level) {
            log::info!("Achievement unlocked: {}", achievement.name());
            self.emit(ScoreEvent::AchievementUnlocked(achievement));
        }
    }

    pub fn snapshot(&self) -> ScoreSnapshot {
        ScoreSnapshot {
            score: self.score,
            level: self.level,
            health: self.health,
            xp: self.xp,
        }
    }

    /// Replace totals from a snapshot. Missing or zero fields take their
    /// defaults; max health follows the restored level.
    pub fn restore(&mut self, snapshot: &ScoreSnapshot) {
        let snapshot = snapshot.resolved();
        self.score = snapshot.score;
        self.level = snapshot.level;
        self.max_health = DEFAULT_MAX_HEALTH
            .saturating_add((self.level - 1).saturating_mul(HEALTH_PER_LEVEL));
        self.health = snapshot.health.min(self.max_health);
        self.xp = snapshot.xp.min(self.max_xp);
        self.emit(ScoreEvent::Restored(self.snapshot()));
        self.check_achievements();
    }
}
