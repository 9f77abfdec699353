//! Shooter render pass

use glam::Vec2;

use super::Surface;
use crate::sim::{Color, ShooterState};

pub const BACKGROUND: Color = Color::hex(0x000428);
pub const STAR_COLOR: Color = Color::WHITE;
pub const PLAYER_COLOR: Color = Color::hex(0x00ffff);

/// Draw one frame: background, stars, player, bullets, enemies, power-ups,
/// then particles on top
pub fn render_shooter(state: &ShooterState, surface: &mut dyn Surface) {
    surface.clear(BACKGROUND);

    for star in &state.stars {
        surface.fill_rect(star.pos.x, star.pos.y, star.size, star.size, STAR_COLOR);
    }

    let player = &state.player;
    surface.fill_rect(
        player.pos.x,
        player.pos.y,
        player.size.x,
        player.size.y,
        PLAYER_COLOR,
    );

    for bullet in &state.bullets {
        surface.fill_rect(
            bullet.pos.x,
            bullet.pos.y,
            bullet.size.x,
            bullet.size.y,
            bullet.color,
        );
    }

    for enemy in &state.enemies {
        surface.fill_rect(
            enemy.pos.x,
            enemy.pos.y,
            enemy.size.x,
            enemy.size.y,
            enemy.color,
        );
    }

    for power_up in &state.power_ups {
        surface.fill_rect_rotated(
            power_up.center(),
            Vec2::splat(power_up.size),
            power_up.rotation,
            power_up.color(),
        );
    }

    for particle in &state.particles {
        surface.fill_rect(
            particle.pos.x,
            particle.pos.y,
            particle.size,
            particle.size,
            particle.color.with_alpha(particle.alpha()),
        );
    }
}
