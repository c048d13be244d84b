//! Entity spawning: enemy waves and player bullets

use glam::Vec2;
use rand::Rng;

use super::state::{Bullet, Enemy, GameEvent, GameState};
use crate::consts::*;

/// Number of enemies in the given wave
pub fn wave_size(wave: u32) -> u32 {
    FIRST_WAVE_ENEMIES + wave * ENEMIES_PER_WAVE_STEP
}

/// Speed multiplier applied to enemies of the given wave
pub fn wave_speed_multiplier(wave: u32) -> f32 {
    (1.0 + wave as f32 * ENEMY_SPEEDUP_PER_WAVE).min(ENEMY_MAX_SPEEDUP)
}

/// Spawn the enemies for `state.wave_index` in the band above the screen
pub fn spawn_wave(state: &mut GameState) {
    let wave = state.wave_index;
    let count = wave_size(wave);
    let multiplier = wave_speed_multiplier(wave);

    for _ in 0..count {
        let x = state
            .rng
            .random_range(0.0..=WORLD_WIDTH - ENEMY_SPAWN_RIGHT_MARGIN);
        let y = state
            .rng
            .random_range(ENEMY_SPAWN_MIN_Y..=ENEMY_SPAWN_MAX_Y);
        let speed = state.rng.random_range(ENEMY_MIN_SPEED..=ENEMY_MAX_SPEED) * multiplier;

        let id = state.next_entity_id();
        state.enemies.push(Enemy {
            id,
            pos: Vec2::new(x, y),
            speed,
            rotation: 0.0,
        });
    }

    log::debug!("Spawned wave {} ({} enemies)", wave + 1, count);
}

/// Fire a bullet from the ship's nose along its heading
pub fn spawn_bullet(state: &mut GameState) {
    let id = state.next_entity_id();
    let player = &state.player;
    state.bullets.push(Bullet {
        id,
        pos: player.nose(),
        vel: player.heading() * BULLET_SPEED,
        rotation: player.rotation,
    });
    state.events.push(GameEvent::Shot);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wave_sizes_grow() {
        assert_eq!(wave_size(0), 10);
        assert_eq!(wave_size(1), 12);
        assert_eq!(wave_size(5), 20);
    }

    #[test]
    fn test_speed_multiplier_capped() {
        assert!((wave_speed_multiplier(0) - 1.0).abs() < 1e-6);
        assert!((wave_speed_multiplier(3) - 1.3).abs() < 1e-5);
        assert!((wave_speed_multiplier(50) - ENEMY_MAX_SPEEDUP).abs() < 1e-6);
    }

    #[test]
    fn test_spawned_enemies_start_above_screen() {
        let state = GameState::new(2024);
        for enemy in &state.enemies {
            assert!(enemy.pos.x >= 0.0 && enemy.pos.x <= WORLD_WIDTH - ENEMY_SPAWN_RIGHT_MARGIN);
            assert!(enemy.pos.y >= ENEMY_SPAWN_MIN_Y && enemy.pos.y <= ENEMY_SPAWN_MAX_Y);
            assert!(enemy.speed >= ENEMY_MIN_SPEED && enemy.speed <= ENEMY_MAX_SPEED);
        }
    }

    #[test]
    fn test_later_waves_are_faster() {
        let mut state = GameState::empty(5);
        state.wave_index = 4;
        spawn_wave(&mut state);
        assert_eq!(state.enemies.len(), wave_size(4) as usize);
        for enemy in &state.enemies {
            assert!(enemy.speed >= ENEMY_MIN_SPEED * 1.4 - 1e-3);
        }
    }

    #[test]
    fn test_bullet_follows_heading() {
        let mut state = GameState::empty(1);
        state.player.rotation = std::f32::consts::FRAC_PI_2; // facing right
        spawn_bullet(&mut state);

        let bullet = &state.bullets[0];
        assert!((bullet.vel.x - BULLET_SPEED).abs() < 1e-3);
        assert!(bullet.vel.y.abs() < 1e-3);
        assert!(bullet.pos.x > state.player.pos.x);
        assert_eq!(state.events, vec![GameEvent::Shot]);
    }
}
