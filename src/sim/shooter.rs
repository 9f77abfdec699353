//! Scrolling shooter simulation
//!
//! One call to `tick` is one display frame. Everything is counted in ticks, so
//! the elapsed time the host measures is not needed here.

use glam::Vec2;
use rand_pcg::Pcg32;

use super::collision::overlaps;
use super::entities::{
    Bullet, EXPLOSION_COLOR, Enemy, Particle, Player, PowerUp, PowerUpKind, Star,
    spawn_explosion, starfield,
};
use super::input::{InputCode, InputSet};
use super::state::{Color, GameEvent, GamePhase, seeded_rng};
use crate::consts::*;

/// Complete shooter state. Owned by exactly one engine.
#[derive(Debug, Clone)]
pub struct ShooterState {
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u32,
    pub level: u32,
    /// Play area size in pixels
    pub area: Vec2,
    pub player: Player,
    pub bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    pub power_ups: Vec<PowerUp>,
    pub particles: Vec<Particle>,
    pub stars: Vec<Star>,
    pub enemy_spawn_timer: u32,
    pub power_up_spawn_timer: u32,
    /// Particle pool cap (0 disables explosions)
    pub max_particles: usize,
    /// Ticks simulated since the last start
    pub time_ticks: u64,
    rng: Pcg32,
}

impl ShooterState {
    /// New shooter sitting in the menu
    pub fn new(seed: u64, area: Vec2) -> Self {
        let mut rng = seeded_rng(seed);
        let stars = starfield(&mut rng, area);
        Self {
            phase: GamePhase::Menu,
            score: 0,
            lives: START_LIVES,
            level: 1,
            area,
            player: Player::new(area),
            bullets: Vec::new(),
            enemies: Vec::new(),
            power_ups: Vec::new(),
            particles: Vec::new(),
            stars,
            enemy_spawn_timer: 0,
            power_up_spawn_timer: 0,
            max_particles: MAX_PARTICLES,
            time_ticks: 0,
            rng,
        }
    }

    /// Reset the run and begin playing. Stars carry over.
    pub fn start(&mut self) {
        self.phase = GamePhase::Playing;
        self.score = 0;
        self.lives = START_LIVES;
        self.level = 1;
        self.player = Player::new(self.area);
        self.bullets.clear();
        self.enemies.clear();
        self.power_ups.clear();
        self.particles.clear();
        self.enemy_spawn_timer = 0;
        self.power_up_spawn_timer = 0;
        self.time_ticks = 0;
        log::info!("Shooter started");
    }

    pub fn toggle_pause(&mut self) {
        self.phase = self.phase.toggled();
    }

    /// Spawn an enemy at a random column for the current level
    pub fn spawn_enemy(&mut self) {
        let enemy = Enemy::spawn(&mut self.rng, self.area, self.level);
        self.enemies.push(enemy);
    }

    pub fn spawn_power_up(&mut self) {
        let power_up = PowerUp::spawn(&mut self.rng, self.area);
        self.power_ups.push(power_up);
    }

    fn explode(&mut self, pos: Vec2, color: Color, events: &mut Vec<GameEvent>) {
        spawn_explosion(
            &mut self.particles,
            &mut self.rng,
            pos,
            color,
            self.max_particles,
        );
        events.push(GameEvent::Explosion { pos });
    }
}

/// Ticks the enemy spawn timer must exceed before the next enemy appears
pub fn enemy_spawn_threshold(level: u32) -> i64 {
    ENEMY_SPAWN_BASE_TICKS - level as i64 * ENEMY_SPAWN_LEVEL_STEP
}

/// Advance the shooter by one frame
pub fn tick(state: &mut ShooterState, input: &InputSet, events: &mut Vec<GameEvent>) {
    if state.phase != GamePhase::Playing {
        return;
    }
    state.time_ticks += 1;

    update_player(state, input, events);

    let area = state.area;
    state.bullets.retain_mut(|b| b.step());
    state.enemies.retain_mut(|e| e.step(area));
    state.power_ups.retain_mut(|p| p.step(area));
    state.particles.retain_mut(|p| p.step());
    for star in state.stars.iter_mut() {
        star.step(&mut state.rng, area);
    }

    resolve_collisions(state, events);
    if state.phase == GamePhase::GameOver {
        return;
    }

    spawn_timers(state);
}

fn update_player(state: &mut ShooterState, input: &InputSet, events: &mut Vec<GameEvent>) {
    let mut dir = Vec2::ZERO;
    if input.is_held(InputCode::Left) {
        dir.x -= 1.0;
    }
    if input.is_held(InputCode::Right) {
        dir.x += 1.0;
    }
    if input.is_held(InputCode::Up) {
        dir.y -= 1.0;
    }
    if input.is_held(InputCode::Down) {
        dir.y += 1.0;
    }
    state.player.steer(dir, state.area);

    if input.is_held(InputCode::Fire) && state.player.shoot_cooldown == 0 {
        state.bullets.push(Bullet::new(state.player.muzzle()));
        state.player.shoot_cooldown = SHOOT_COOLDOWN_TICKS;
        events.push(GameEvent::Shot);
    }
    state.player.shoot_cooldown = state.player.shoot_cooldown.saturating_sub(1);

    // The rest of this frame still runs; the next one is skipped
    if input.is_held(InputCode::Pause) {
        state.toggle_pause();
    }
}

fn resolve_collisions(state: &mut ShooterState, events: &mut Vec<GameEvent>) {
    // Bullets vs enemies: each bullet and each enemy takes part in at most one hit
    let mut killed = vec![false; state.enemies.len()];
    let enemies = &state.enemies;
    state.bullets.retain(|bullet| {
        let hit = (0..enemies.len()).find(|&i| !killed[i] && overlaps(bullet, &enemies[i]));
        match hit {
            Some(i) => {
                killed[i] = true;
                false
            }
            None => true,
        }
    });

    let mut kill_centers = Vec::new();
    let mut idx = 0;
    state.enemies.retain(|enemy| {
        let dead = killed[idx];
        idx += 1;
        if dead {
            kill_centers.push(enemy.center());
        }
        !dead
    });
    for center in kill_centers {
        state.score += ENEMY_POINTS;
        events.push(GameEvent::EnemyDestroyed {
            points: ENEMY_POINTS,
        });
        state.explode(center, EXPLOSION_COLOR, events);
    }

    // Enemies vs player
    let mut i = 0;
    while i < state.enemies.len() {
        if !overlaps(&state.player, &state.enemies[i]) {
            i += 1;
            continue;
        }
        state.enemies.remove(i);
        state.lives = state.lives.saturating_sub(1);
        events.push(GameEvent::PlayerHit {
            lives_left: state.lives,
        });
        let center = state.player.center();
        state.explode(center, EXPLOSION_COLOR, events);

        if state.lives == 0 {
            state.phase = GamePhase::GameOver;
            log::info!("Shooter over, final score {}", state.score);
            events.push(GameEvent::GameOver {
                final_score: state.score,
            });
            return;
        }
    }

    // Power-ups vs player
    let mut i = 0;
    while i < state.power_ups.len() {
        if !overlaps(&state.player, &state.power_ups[i]) {
            i += 1;
            continue;
        }
        let power_up = state.power_ups.remove(i);
        apply_power_up(state, power_up.kind);
        events.push(GameEvent::PowerUpCollected {
            kind: power_up.kind,
            points: POWER_UP_REPORT_POINTS,
        });
        state.explode(power_up.center(), power_up.color(), events);
    }
}

fn apply_power_up(state: &mut ShooterState, kind: PowerUpKind) {
    match kind {
        PowerUpKind::Health => state.lives = (state.lives + 1).min(MAX_LIVES),
        PowerUpKind::Rapid => {
            state.player.shoot_cooldown = state
                .player
                .shoot_cooldown
                .saturating_sub(RAPID_FIRE_REDUCTION)
        }
        PowerUpKind::Shield => state.score += SHIELD_BONUS_POINTS,
    }
}

fn spawn_timers(state: &mut ShooterState) {
    state.enemy_spawn_timer += 1;
    if state.enemy_spawn_timer as i64 > enemy_spawn_threshold(state.level) {
        state.spawn_enemy();
        state.enemy_spawn_timer = 0;
    }

    state.power_up_spawn_timer += 1;
    if state.power_up_spawn_timer > POWER_UP_SPAWN_TICKS {
        state.spawn_power_up();
        state.power_up_spawn_timer = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AREA: Vec2 = Vec2::new(PLAY_AREA_WIDTH, PLAY_AREA_HEIGHT);

    fn playing(seed: u64) -> ShooterState {
        let mut state = ShooterState::new(seed, AREA);
        state.start();
        state
    }

    /// Enemy parked on top of the player
    fn enemy_on_player(state: &ShooterState) -> Enemy {
        Enemy {
            pos: state.player.pos,
            size: Vec2::splat(ENEMY_SIZE),
            speed: 0.0,
            color: Enemy::COLOR,
            health: 1,
        }
    }

    #[test]
    fn test_start_resets_run() {
        let mut state = ShooterState::new(1, AREA);
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.stars.len(), STAR_COUNT);

        state.score = 999;
        state.lives = 1;
        state.level = 4;
        state.spawn_enemy();
        state.start();

        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, 3);
        assert_eq!(state.level, 1);
        assert!(state.enemies.is_empty());
        assert_eq!(state.player.pos, Vec2::new(400.0, 550.0));
    }

    #[test]
    fn test_toggle_pause() {
        let mut state = ShooterState::new(1, AREA);
        state.toggle_pause();
        assert_eq!(state.phase, GamePhase::Menu);

        state.start();
        state.toggle_pause();
        assert_eq!(state.phase, GamePhase::Paused);
        state.toggle_pause();
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_fire_spawns_one_bullet_then_cools_down() {
        let mut state = playing(7);
        let fire = InputSet::from_codes(&[InputCode::Fire]);
        let mut events = Vec::new();

        let muzzle = Vec2::new(
            state.player.pos.x + state.player.size.x / 2.0 - 2.0,
            state.player.pos.y,
        );
        tick(&mut state, &fire, &mut events);
        assert_eq!(state.bullets.len(), 1);
        // Spawned at the muzzle, then moved up once
        assert_eq!(state.bullets[0].pos, muzzle - Vec2::new(0.0, BULLET_SPEED));
        assert_eq!(state.player.shoot_cooldown, 9);
        assert!(events.contains(&GameEvent::Shot));

        events.clear();
        tick(&mut state, &fire, &mut events);
        assert_eq!(state.bullets.len(), 1);
        assert!(!events.contains(&GameEvent::Shot));
    }

    #[test]
    fn test_fire_again_after_cooldown() {
        let mut state = playing(7);
        let fire = InputSet::from_codes(&[InputCode::Fire]);
        let mut events = Vec::new();
        for _ in 0..=SHOOT_COOLDOWN_TICKS {
            tick(&mut state, &fire, &mut events);
        }
        assert_eq!(state.bullets.len(), 2);
    }

    #[test]
    fn test_movement_is_clamped() {
        let mut state = playing(3);
        let left_up = InputSet::from_codes(&[InputCode::Left, InputCode::Up]);
        let mut events = Vec::new();
        for _ in 0..200 {
            tick(&mut state, &left_up, &mut events);
            state.enemies.clear();
        }
        assert_eq!(state.player.pos, Vec2::ZERO);
    }

    #[test]
    fn test_bullet_kills_enemy() {
        let mut state = playing(11);
        let mut events = Vec::new();
        state.bullets.push(Bullet::new(Vec2::new(100.0, 300.0)));
        state.enemies.push(Enemy {
            pos: Vec2::new(95.0, 280.0),
            size: Vec2::splat(ENEMY_SIZE),
            speed: 0.0,
            color: Enemy::COLOR,
            health: 1,
        });

        tick(&mut state, &InputSet::new(), &mut events);
        assert!(state.bullets.is_empty());
        assert!(state.enemies.is_empty());
        assert_eq!(state.score, ENEMY_POINTS);
        assert_eq!(state.particles.len(), EXPLOSION_PARTICLES);
        assert!(
            events
                .iter()
                .any(|e| matches!(e, GameEvent::EnemyDestroyed { points: 10 }))
        );
    }

    #[test]
    fn test_one_bullet_kills_one_enemy() {
        let mut state = playing(11);
        let mut events = Vec::new();
        state.bullets.push(Bullet::new(Vec2::new(100.0, 300.0)));
        for _ in 0..2 {
            state.enemies.push(Enemy {
                pos: Vec2::new(95.0, 280.0),
                size: Vec2::splat(ENEMY_SIZE),
                speed: 0.0,
                color: Enemy::COLOR,
                health: 1,
            });
        }
        tick(&mut state, &InputSet::new(), &mut events);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.score, ENEMY_POINTS);
    }

    #[test]
    fn test_three_collisions_end_the_game() {
        let mut state = playing(5);
        let mut events = Vec::new();
        for expected in [2, 1, 0] {
            let enemy = enemy_on_player(&state);
            state.enemies.push(enemy);
            tick(&mut state, &InputSet::new(), &mut events);
            assert_eq!(state.lives, expected);
        }
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(
            events
                .iter()
                .any(|e| matches!(e, GameEvent::GameOver { final_score: 0 }))
        );

        // Frozen: further ticks change nothing
        let enemy = enemy_on_player(&state);
        state.enemies.push(enemy);
        tick(&mut state, &InputSet::new(), &mut events);
        assert_eq!(state.lives, 0);
        assert_eq!(state.enemies.len(), 1);
    }

    #[test]
    fn test_simultaneous_collisions_stop_at_zero_lives() {
        let mut state = playing(5);
        state.lives = 1;
        let mut events = Vec::new();
        for _ in 0..3 {
            let enemy = enemy_on_player(&state);
            state.enemies.push(enemy);
        }
        tick(&mut state, &InputSet::new(), &mut events);
        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_power_up_effects() {
        let mut state = playing(9);
        let mut events = Vec::new();

        let mut grab = |state: &mut ShooterState, kind: PowerUpKind| {
            state.power_ups.push(PowerUp {
                pos: state.player.pos,
                size: POWER_UP_SIZE,
                speed: 0.0,
                rotation: 0.0,
                kind,
            });
            tick(state, &InputSet::new(), &mut events);
        };

        grab(&mut state, PowerUpKind::Health);
        assert_eq!(state.lives, 4);
        grab(&mut state, PowerUpKind::Health);
        grab(&mut state, PowerUpKind::Health);
        assert_eq!(state.lives, MAX_LIVES);

        state.player.shoot_cooldown = 8;
        grab(&mut state, PowerUpKind::Rapid);
        // 8 - 1 for the tick, then - 5
        assert_eq!(state.player.shoot_cooldown, 2);
        state.player.shoot_cooldown = 3;
        grab(&mut state, PowerUpKind::Rapid);
        assert_eq!(state.player.shoot_cooldown, 0);

        grab(&mut state, PowerUpKind::Shield);
        assert_eq!(state.score, SHIELD_BONUS_POINTS);

        let collected = events
            .iter()
            .filter(|e| matches!(e, GameEvent::PowerUpCollected { points: 25, .. }))
            .count();
        assert_eq!(collected, 6);
    }

    #[test]
    fn test_spawn_threshold_decreases_with_level() {
        assert_eq!(enemy_spawn_threshold(1), 55);
        for level in 1..11 {
            assert!(enemy_spawn_threshold(level + 1) < enemy_spawn_threshold(level));
        }
    }

    #[test]
    fn test_enemy_spawn_cadence_is_deterministic() {
        let run = |seed: u64| {
            let mut state = playing(seed);
            let mut events = Vec::new();
            let mut spawned_at = Vec::new();
            for t in 0..200u32 {
                let before = state.enemies.len();
                tick(&mut state, &InputSet::new(), &mut events);
                if state.enemies.len() > before {
                    spawned_at.push(t);
                }
            }
            (spawned_at, state.enemies.iter().map(|e| e.pos.x).collect::<Vec<_>>())
        };

        let (first, xs) = run(42);
        // Timer must exceed 55: spawns on the 56th tick and every 56 after
        assert_eq!(first, vec![55, 111, 167]);
        assert_eq!(run(42), (first, xs));
    }

    #[test]
    fn test_power_up_spawns_every_301_ticks() {
        let mut state = playing(13);
        let mut events = Vec::new();
        for _ in 0..POWER_UP_SPAWN_TICKS {
            tick(&mut state, &InputSet::new(), &mut events);
            state.enemies.clear();
        }
        assert!(state.power_ups.is_empty());
        tick(&mut state, &InputSet::new(), &mut events);
        assert_eq!(state.power_ups.len(), 1);
    }

    #[test]
    fn test_level_stays_fixed_as_score_grows() {
        let mut state = playing(21);
        let mut events = Vec::new();
        state.score = 490;
        state.power_ups.push(PowerUp {
            pos: state.player.pos,
            size: POWER_UP_SIZE,
            speed: 0.0,
            rotation: 0.0,
            kind: PowerUpKind::Shield,
        });

        tick(&mut state, &InputSet::new(), &mut events);

        assert_eq!(state.score, 540);
        assert_eq!(state.level, 1);
        assert_eq!(enemy_spawn_threshold(state.level), 55);
        assert!(
            !events
                .iter()
                .any(|e| matches!(e, GameEvent::LevelUp { .. }))
        );
    }

    #[test]
    fn test_paused_tick_changes_nothing() {
        let mut state = playing(17);
        let mut events = Vec::new();
        let all = InputSet::from_codes(&InputCode::ALL);
        for _ in 0..30 {
            tick(&mut state, &InputSet::from_codes(&[InputCode::Fire]), &mut events);
        }
        state.toggle_pause();

        let before = (
            state.player.pos,
            state.bullets.iter().map(|b| b.pos).collect::<Vec<_>>(),
            state.enemies.iter().map(|e| e.pos).collect::<Vec<_>>(),
            state.stars.iter().map(|s| s.pos).collect::<Vec<_>>(),
            state.score,
        );
        events.clear();
        for _ in 0..10 {
            tick(&mut state, &all, &mut events);
        }
        let after = (
            state.player.pos,
            state.bullets.iter().map(|b| b.pos).collect::<Vec<_>>(),
            state.enemies.iter().map(|e| e.pos).collect::<Vec<_>>(),
            state.stars.iter().map(|s| s.pos).collect::<Vec<_>>(),
            state.score,
        );
        assert_eq!(before, after);
        assert!(events.is_empty());
        assert_eq!(state.phase, GamePhase::Paused);
    }

    #[test]
    fn test_pause_input_pauses() {
        let mut state = playing(19);
        let mut events = Vec::new();
        tick(
            &mut state,
            &InputSet::from_codes(&[InputCode::Pause]),
            &mut events,
        );
        assert_eq!(state.phase, GamePhase::Paused);
    }
}
