//! Shared simulation types
//!
//! Phase machine, colors and frame events used by both minigames.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entities::PowerUpKind;

/// Current phase of a minigame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first start
    #[default]
    Menu,
    /// Active gameplay
    Playing,
    /// Simulation frozen, resumable
    Paused,
    /// Run ended, waiting for restart
    GameOver,
}

impl GamePhase {
    /// Phase after a pause toggle. Only playing and paused swap; every other
    /// phase is returned unchanged.
    pub fn toggled(self) -> Self {
        match self {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
            other => other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Menu => "menu",
            GamePhase::Playing => "playing",
            GamePhase::Paused => "paused",
            GamePhase::GameOver => "gameOver",
        }
    }
}

/// RGBA color, 8 bits per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::hex(0x000000);
    pub const WHITE: Color = Color::hex(0xffffff);

    /// Opaque color from a `0xRRGGBB` literal
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as u8,
            g: ((rgb >> 8) & 0xff) as u8,
            b: (rgb & 0xff) as u8,
            a: 0xff,
        }
    }

    /// Same color with alpha in 0.0 - 1.0
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            a: (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
            ..self
        }
    }

    pub fn alpha(&self) -> f32 {
        self.a as f32 / 255.0
    }

    /// CSS color string (`#rrggbb`, or `rgba(...)` when translucent)
    pub fn to_css(&self) -> String {
        if self.a == 0xff {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!(
                "rgba({}, {}, {}, {:.3})",
                self.r,
                self.g,
                self.b,
                self.alpha()
            )
        }
    }
}

/// Something that happened during a tick. Engines forward these to the
/// score and sound sinks after the tick finishes.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Player fired a bullet
    Shot,
    /// Particle burst spawned at a point
    Explosion { pos: Vec2 },
    /// Bullet destroyed an enemy
    EnemyDestroyed { points: u64 },
    /// Enemy rammed the player
    PlayerHit { lives_left: u32 },
    /// Player picked up a power-up
    PowerUpCollected { kind: PowerUpKind, points: u64 },
    /// Puzzle rows removed after a landing
    LinesCleared { count: u32, points: u64 },
    /// Difficulty level went up
    LevelUp { level: u32 },
    /// Run ended
    GameOver { final_score: u64 },
}

/// Seeded RNG for a simulation instance
pub fn seeded_rng(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}
