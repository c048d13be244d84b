//! Scene tessellation
//!
//! Turns a `GameState` into a flat triangle list in world coordinates.
//! Draw order: starfield, bullets, enemies, ship.

use glam::Vec2;

use super::shapes::{self, ShipColors};
use super::vertex::{Vertex, colors};
use crate::consts::{WORLD_HEIGHT, WORLD_WIDTH};
use crate::sim::GameState;

/// Stars per parallax layer
const STARS_PER_LAYER: u32 = 60;
/// (scroll factor, size, brightness) per layer, far to near
const STAR_LAYERS: [(f32, f32, f32); 3] = [(0.3, 1.0, 0.35), (0.6, 1.5, 0.6), (1.0, 2.2, 1.0)];

/// Build the vertex list for one frame
///
/// `time` is in seconds and only drives cosmetic animation.
pub fn build_scene(state: &GameState, starfield: bool, time: f32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(
        STARS_PER_LAYER as usize * STAR_LAYERS.len() * 6
            + state.bullets.len() * 6
            + state.enemies.len() * 30
            + 36,
    );

    if starfield {
        vertices.extend(starfield_vertices(state.background_offset));
    }

    for bullet in &state.bullets {
        vertices.extend(shapes::quad(
            bullet.pos,
            1.5,
            7.0,
            bullet.rotation,
            colors::BULLET,
        ));
    }

    let pulse = (time * 6.0).sin() * 0.5 + 0.5;
    for enemy in &state.enemies {
        vertices.extend(shapes::enemy(
            enemy.pos,
            enemy.rotation,
            pulse,
            colors::ENEMY_HULL,
            colors::ENEMY_CORE,
        ));
    }

    if state.player.alive {
        let flicker = (time * 31.0).sin() * 0.5 + 0.5;
        vertices.extend(shapes::ship(
            state.player.pos,
            state.player.rotation,
            flicker,
            ShipColors {
                hull: colors::PLAYER_HULL,
                cockpit: colors::PLAYER_COCKPIT,
                engine: colors::ENGINE_GLOW,
            },
        ));
    }

    vertices
}

/// Tiled starfield shifted opposite to the background tile offset
pub fn starfield_vertices(offset: Vec2) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(STARS_PER_LAYER as usize * STAR_LAYERS.len() * 6);

    for (layer, (factor, size, brightness)) in STAR_LAYERS.iter().enumerate() {
        let color = [
            colors::STAR[0] * brightness,
            colors::STAR[1] * brightness,
            colors::STAR[2] * brightness,
            1.0,
        ];
        for i in 0..STARS_PER_LAYER {
            let base = star_position(layer as u32, i);
            let pos = wrap_to_world(base - offset * *factor);
            vertices.extend(shapes::quad(pos, *size, *size, 0.0, color));
        }
    }

    vertices
}

/// Stable pseudo-random star placement
fn star_position(layer: u32, index: u32) -> Vec2 {
    let h1 = hash(layer.wrapping_mul(7919).wrapping_add(index));
    let h2 = hash(h1 ^ 0x9e37_79b9);
    Vec2::new(
        (h1 % 10_000) as f32 / 10_000.0 * WORLD_WIDTH,
        (h2 % 10_000) as f32 / 10_000.0 * WORLD_HEIGHT,
    )
}

fn hash(mut x: u32) -> u32 {
    x ^= x >> 16;
    x = x.wrapping_mul(0x7feb_352d);
    x ^= x >> 15;
    x = x.wrapping_mul(0x846c_a68b);
    x ^= x >> 16;
    x
}

fn wrap_to_world(p: Vec2) -> Vec2 {
    Vec2::new(p.x.rem_euclid(WORLD_WIDTH), p.y.rem_euclid(WORLD_HEIGHT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::spawn_bullet;

    #[test]
    fn test_stars_stay_inside_world() {
        for v in starfield_vertices(Vec2::new(-12345.0, 777.0)) {
            // Quads may overhang the edge by their half size
            assert!(v.position[0] > -3.0 && v.position[0] < WORLD_WIDTH + 3.0);
            assert!(v.position[1] > -3.0 && v.position[1] < WORLD_HEIGHT + 3.0);
        }
    }

    #[test]
    fn test_starfield_scrolls_with_offset() {
        let a = starfield_vertices(Vec2::ZERO);
        let b = starfield_vertices(Vec2::new(0.0, -5.0));
        assert_ne!(a, b);
    }

    #[test]
    fn test_scene_contains_every_entity() {
        let mut state = GameState::new(1);
        spawn_bullet(&mut state);

        let without_stars = build_scene(&state, false, 0.0);
        let expected = 6 // bullet
            + state.enemies.len() * (3 + 3 + 8 * 3)
            + 3 + 3 + 3 + 6; // engine, two hull halves, cockpit
        assert_eq!(without_stars.len(), expected);

        let with_stars = build_scene(&state, true, 0.0);
        assert!(with_stars.len() > without_stars.len());
    }

    #[test]
    fn test_dead_player_not_drawn() {
        let mut state = GameState::empty(1);
        state.player.alive = false;
        assert!(build_scene(&state, false, 0.0).is_empty());
    }
}
