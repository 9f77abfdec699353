//! Retro Arcade - shooter and falling-block minigames for a 2D canvas
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entity pools, collisions, board rules)
//! - `renderer`: Drawing surface abstraction and per-game render passes
//! - `engine`: Wires a simulation to its surface, score sink and sound sink
//! - `driver`: Host-owned frame driver
//! - `scoreboard`: Site-wide score/level/health/XP model with observers
//! - `persistence`: Best-effort key-value storage and snapshots
//! - `platform`: Browser/native differences (keys, clock)

pub mod audio;
pub mod driver;
pub mod engine;
pub mod feedback;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod scoreboard;
pub mod settings;
pub mod sim;

pub use driver::{FrameDriver, FrameTarget};
pub use engine::{Engine, Game, PuzzleEngine, ShooterEngine};
pub use highscores::HighScores;
pub use scoreboard::Scoreboard;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Shooter play area (canvas size in pixels)
    pub const PLAY_AREA_WIDTH: f32 = 800.0;
    pub const PLAY_AREA_HEIGHT: f32 = 600.0;

    /// Player ship
    pub const PLAYER_SIZE: f32 = 20.0;
    pub const PLAYER_SPEED: f32 = 5.0;
    /// Spawn height above the bottom edge
    pub const PLAYER_BOTTOM_OFFSET: f32 = 50.0;
    pub const START_LIVES: u32 = 3;
    pub const MAX_LIVES: u32 = 5;
    pub const SHOOT_COOLDOWN_TICKS: u32 = 10;
    /// Cooldown ticks removed by a rapid-fire pickup
    pub const RAPID_FIRE_REDUCTION: u32 = 5;

    /// Bullets
    pub const BULLET_WIDTH: f32 = 4.0;
    pub const BULLET_HEIGHT: f32 = 10.0;
    pub const BULLET_SPEED: f32 = 8.0;

    /// Enemies
    pub const ENEMY_SIZE: f32 = 20.0;
    pub const ENEMY_BASE_SPEED: f32 = 1.0;
    pub const ENEMY_SPEED_PER_LEVEL: f32 = 0.5;
    pub const ENEMY_SPAWN_BASE_TICKS: i64 = 60;
    pub const ENEMY_SPAWN_LEVEL_STEP: i64 = 5;
    /// Enemies and power-ups appear just above the top edge
    pub const SPAWN_Y: f32 = -20.0;

    /// Power-ups
    pub const POWER_UP_SIZE: f32 = 15.0;
    pub const POWER_UP_SPEED: f32 = 2.0;
    /// Radians per tick
    pub const POWER_UP_SPIN: f32 = 0.1;
    pub const POWER_UP_SPAWN_TICKS: u32 = 300;

    /// Scoring
    pub const ENEMY_POINTS: u64 = 10;
    pub const SHIELD_BONUS_POINTS: u64 = 50;
    /// Reported to the site scoreboard on every pickup
    pub const POWER_UP_REPORT_POINTS: u64 = 25;

    /// Particles and background
    pub const EXPLOSION_PARTICLES: usize = 10;
    pub const PARTICLE_LIFE_TICKS: u32 = 30;
    /// Per-axis particle speed bound (pixels per tick)
    pub const PARTICLE_MAX_SPEED: f32 = 2.0;
    pub const MAX_PARTICLES: usize = 500;
    pub const STAR_COUNT: usize = 100;

    /// Puzzle board
    pub const BOARD_ROWS: usize = 20;
    pub const BOARD_COLS: usize = 10;
    pub const BLOCK_SIZE: f32 = 30.0;
    pub const PREVIEW_BLOCK_SIZE: f32 = 15.0;

    /// Puzzle pacing (milliseconds)
    pub const BASE_DROP_INTERVAL_MS: f32 = 1000.0;
    pub const MIN_DROP_INTERVAL_MS: f32 = 50.0;
    pub const DROP_INTERVAL_STEP_MS: f32 = 50.0;
    pub const LINES_PER_LEVEL: u32 = 10;
    /// Base points by rows cleared at once, multiplied by level
    pub const LINE_CLEAR_POINTS: [u64; 5] = [0, 40, 100, 300, 1200];

    /// Longest frame the driver will report (tab switches, breakpoints)
    pub const MAX_FRAME_DT_MS: f32 = 250.0;
    /// Scoreboard snapshot cadence
    pub const SNAPSHOT_INTERVAL_MS: f64 = 5000.0;
}
