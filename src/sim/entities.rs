//! Shooter entity pools
//!
//! Each entity kind is plain data plus a `step` that advances it one tick and
//! reports whether it is still alive. Pools are `Vec`s pruned with `retain_mut`.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{Bounds, Rect};
use super::state::Color;
use crate::consts::*;

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    /// Ticks until the next shot is allowed
    pub shoot_cooldown: u32,
}

impl Player {
    /// Fresh player near the bottom-center of the play area
    pub fn new(area: Vec2) -> Self {
        Self {
            pos: Vec2::new(area.x / 2.0, area.y - PLAYER_BOTTOM_OFFSET),
            size: Vec2::splat(PLAYER_SIZE),
            speed: PLAYER_SPEED,
            shoot_cooldown: 0,
        }
    }

    /// Move by a direction (components in -1..=1), clamped to the play area
    pub fn steer(&mut self, dir: Vec2, area: Vec2) {
        let max = (area - self.size).max(Vec2::ZERO);
        self.pos = (self.pos + dir * self.speed).clamp(Vec2::ZERO, max);
    }

    /// Where a bullet leaves the ship
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(
            self.pos.x + self.size.x / 2.0 - BULLET_WIDTH / 2.0,
            self.pos.y,
        )
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }
}

impl Bounds for Player {
    fn bounds(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }
}

/// A bullet travelling up the screen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub color: Color,
}

impl Bullet {
    pub const COLOR: Color = Color::hex(0x00ff00);

    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            size: Vec2::new(BULLET_WIDTH, BULLET_HEIGHT),
            speed: BULLET_SPEED,
            color: Self::COLOR,
        }
    }

    /// Returns false once the bullet has fully left the top edge
    pub fn step(&mut self) -> bool {
        self.pos.y -= self.speed;
        self.pos.y > -self.size.y
    }
}

impl Bounds for Bullet {
    fn bounds(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }
}

/// A descending enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub color: Color,
    /// Always 1: every hit is a kill
    pub health: u8,
}

impl Enemy {
    pub const COLOR: Color = Color::hex(0xff0000);

    /// Fall speed for a difficulty level
    pub fn speed_for_level(level: u32) -> f32 {
        ENEMY_BASE_SPEED + level as f32 * ENEMY_SPEED_PER_LEVEL
    }

    /// Spawn above the top edge at a random column
    pub fn spawn(rng: &mut impl Rng, area: Vec2, level: u32) -> Self {
        let x = rng.random::<f32>() * (area.x - ENEMY_SIZE).max(0.0);
        Self {
            pos: Vec2::new(x, SPAWN_Y),
            size: Vec2::splat(ENEMY_SIZE),
            speed: Self::speed_for_level(level),
            color: Self::COLOR,
            health: 1,
        }
    }

    /// Returns false once the enemy has fallen past the bottom edge
    pub fn step(&mut self, area: Vec2) -> bool {
        self.pos.y += self.speed;
        self.pos.y < area.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }
}

impl Bounds for Enemy {
    fn bounds(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Extra life, capped
    Health,
    /// Knocks ticks off the shot cooldown
    Rapid,
    /// Flat score bonus
    Shield,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [PowerUpKind::Health, PowerUpKind::Rapid, PowerUpKind::Shield];

    pub fn color(&self) -> Color {
        match self {
            PowerUpKind::Health => Color::hex(0x00ff00),
            PowerUpKind::Rapid => Color::hex(0xffff00),
            PowerUpKind::Shield => Color::hex(0x00ffff),
        }
    }

    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// A spinning collectible
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub pos: Vec2,
    /// Side length of the square
    pub size: f32,
    pub speed: f32,
    /// Accumulated spin (radians)
    pub rotation: f32,
    pub kind: PowerUpKind,
}

impl PowerUp {
    pub fn spawn(rng: &mut impl Rng, area: Vec2) -> Self {
        let kind = PowerUpKind::random(rng);
        let x = rng.random::<f32>() * (area.x - ENEMY_SIZE).max(0.0);
        Self {
            pos: Vec2::new(x, SPAWN_Y),
            size: POWER_UP_SIZE,
            speed: POWER_UP_SPEED,
            rotation: 0.0,
            kind,
        }
    }

    pub fn color(&self) -> Color {
        self.kind.color()
    }

    pub fn step(&mut self, area: Vec2) -> bool {
        self.pos.y += self.speed;
        self.rotation += POWER_UP_SPIN;
        self.pos.y < area.y + self.size
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size / 2.0)
    }
}

impl Bounds for PowerUp {
    fn bounds(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: Vec2::splat(self.size),
        }
    }
}

/// A cosmetic explosion fragment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Color,
    pub size: f32,
    /// Ticks remaining
    pub life: u32,
    pub max_life: u32,
}

impl Particle {
    pub fn step(&mut self) -> bool {
        self.pos += self.vel;
        self.life = self.life.saturating_sub(1);
        self.life > 0
    }

    /// Fade factor, 1.0 when fresh
    pub fn alpha(&self) -> f32 {
        if self.max_life == 0 {
            0.0
        } else {
            self.life as f32 / self.max_life as f32
        }
    }
}

/// Default explosion color
pub const EXPLOSION_COLOR: Color = Color::hex(0xff6600);

/// Push a burst of particles at `pos`, respecting the pool cap
pub fn spawn_explosion(
    particles: &mut Vec<Particle>,
    rng: &mut impl Rng,
    pos: Vec2,
    color: Color,
    max_particles: usize,
) {
    for _ in 0..EXPLOSION_PARTICLES {
        if particles.len() >= max_particles {
            break;
        }
        let vel = Vec2::new(
            (rng.random::<f32>() - 0.5) * PARTICLE_MAX_SPEED * 2.0,
            (rng.random::<f32>() - 0.5) * PARTICLE_MAX_SPEED * 2.0,
        );
        particles.push(Particle {
            pos,
            vel,
            color,
            size: rng.random::<f32>() * 3.0 + 1.0,
            life: PARTICLE_LIFE_TICKS,
            max_life: PARTICLE_LIFE_TICKS,
        });
    }
}

/// Background star; wraps instead of dying
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Star {
    pub pos: Vec2,
    pub speed: f32,
    pub size: f32,
}

impl Star {
    pub fn random(rng: &mut impl Rng, area: Vec2) -> Self {
        Self {
            pos: Vec2::new(rng.random::<f32>() * area.x, rng.random::<f32>() * area.y),
            speed: rng.random::<f32>() * 2.0 + 0.5,
            size: rng.random::<f32>() * 2.0 + 1.0,
        }
    }

    pub fn step(&mut self, rng: &mut impl Rng, area: Vec2) {
        self.pos.y += self.speed;
        if self.pos.y > area.y {
            self.pos.y = 0.0;
            self.pos.x = rng.random::<f32>() * area.x;
        }
    }
}

/// Starfield covering the play area
pub fn starfield(rng: &mut impl Rng, area: Vec2) -> Vec<Star> {
    (0..STAR_COUNT).map(|_| Star::random(rng, area)).collect()
}
