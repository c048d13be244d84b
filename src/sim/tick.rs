//! Fixed timestep simulation tick
//!
//! Core game loop that advances the simulation deterministically.

use glam::Vec2;

use super::collision::detect_collisions;
use super::spawn::{spawn_bullet, spawn_wave};
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;
use crate::{angle_between, normalize_angle};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Rotate counter-clockwise (A held)
    pub rotate_left: bool,
    /// Rotate clockwise (D held)
    pub rotate_right: bool,
    /// Thrust (W held) - scrolls the background forward
    pub thrust: bool,
    /// Arrow keys as a direction; each axis is -1, 0 or 1
    pub scroll: Vec2,
    /// Fire held (Space)
    pub fire: bool,
    /// Pause toggle (one-shot)
    pub pause: bool,
    /// Restart after game over (one-shot)
    pub restart: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            GamePhase::GameOver => {}
        }
    }

    if state.phase == GamePhase::GameOver {
        if input.restart {
            state.restart();
        }
        return;
    }
    if state.phase == GamePhase::Paused {
        return;
    }

    state.time_ticks += 1;

    update_enemies(state, dt);
    handle_shooting(state, input);
    update_bullets(state, dt);
    update_player(state, input, dt);

    detect_collisions(state);

    if state.is_running() && state.enemies.is_empty() {
        advance_wave(state);
    }
}

/// Steer every enemy straight at the player and drop those far below the screen
pub fn update_enemies(state: &mut GameState, dt: f32) {
    let target = state.player.pos;

    for enemy in &mut state.enemies {
        let angle = angle_between(enemy.pos, target);
        enemy.pos += Vec2::new(angle.cos(), angle.sin()) * enemy.speed * dt;
        enemy.rotation = angle + std::f32::consts::FRAC_PI_2;
    }

    state
        .enemies
        .retain(|enemy| enemy.pos.y <= WORLD_HEIGHT + ENEMY_DESPAWN_MARGIN);
}

/// Fire while Space is held, limited by the cooldown
pub fn handle_shooting(state: &mut GameState, input: &TickInput) {
    if !input.fire || !state.player.alive {
        return;
    }
    let ready = match state.last_shot_tick {
        Some(last) => state.time_ticks >= last + FIRE_COOLDOWN_TICKS,
        None => true,
    };
    if ready {
        spawn_bullet(state);
        state.last_shot_tick = Some(state.time_ticks);
    }
}

/// Move bullets along their velocity and cull those that left the world
pub fn update_bullets(state: &mut GameState, dt: f32) {
    for bullet in &mut state.bullets {
        bullet.pos += bullet.vel * dt;
    }
    state.bullets.retain(|bullet| !bullet.is_out_of_bounds());
}

/// Apply rotation keys and background scrolling
pub fn update_player(state: &mut GameState, input: &TickInput, dt: f32) {
    let scroll_step = BACKGROUND_SCROLL_SPEED * dt;
    state.background_offset += input.scroll * scroll_step;
    if input.thrust {
        state.background_offset.y -= scroll_step;
    }

    if !state.player.alive {
        return;
    }
    let rotation_step = PLAYER_ROTATION_SPEED * dt;
    if input.rotate_left {
        state.player.rotation -= rotation_step;
    }
    if input.rotate_right {
        state.player.rotation += rotation_step;
    }
    state.player.rotation = normalize_angle(state.player.rotation);
}

fn advance_wave(state: &mut GameState) {
    state.events.push(GameEvent::WaveCleared {
        wave: state.wave_index,
    });
    log::info!("Wave {} cleared (score {})", state.wave_index + 1, state.score);
    state.wave_index += 1;
    spawn_wave(state);
}
