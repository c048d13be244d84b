//! Overlord Rising - a 2D arcade space shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, spawning, collisions, game state)
//! - `renderer`: Scene tessellation and WebGPU rendering pipeline
//! - `settings`: Runtime settings embedded in the page
//! - `audio`: Procedural Web Audio effects (wasm only)
//! - `server`: Static file server for the page and its assets (native only)

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod renderer;
#[cfg(not(target_arch = "wasm32"))]
pub mod server;
pub mod settings;
pub mod sim;

pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
///
/// Speeds are per second. At the 60 Hz tick rate one tick moves exactly as
/// far as one frame of the classic per-frame deltas (e.g. 600 px/s = 10 px/frame).
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per classic frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta fed to the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Simulation ticks per second
    pub const TICKS_PER_SECOND: u64 = 60;

    /// World dimensions (scaled to fit the canvas)
    pub const WORLD_WIDTH: f32 = 1480.0;
    pub const WORLD_HEIGHT: f32 = 1000.0;

    /// Player spawn as a fraction of the world size
    pub const PLAYER_SPAWN_X: f32 = 0.5;
    pub const PLAYER_SPAWN_Y: f32 = 0.7;
    /// A/D rotation speed (radians/s)
    pub const PLAYER_ROTATION_SPEED: f32 = 3.0;
    /// Distance from ship center to its nose
    pub const PLAYER_NOSE_OFFSET: f32 = 24.0;
    pub const STARTING_LIVES: u32 = 10;

    /// Background scroll from arrows / W (px/s)
    pub const BACKGROUND_SCROLL_SPEED: f32 = 300.0;

    pub const BULLET_SPEED: f32 = 600.0;
    /// Minimum time between shots
    pub const FIRE_COOLDOWN_MS: u64 = 200;
    pub const FIRE_COOLDOWN_TICKS: u64 = FIRE_COOLDOWN_MS * TICKS_PER_SECOND / 1000;
    /// Bullets this far outside the world are culled
    pub const BULLET_CULL_MARGIN: f32 = 50.0;

    pub const FIRST_WAVE_ENEMIES: u32 = 10;
    pub const ENEMIES_PER_WAVE_STEP: u32 = 2;
    /// Enemy base speed range (px/s)
    pub const ENEMY_MIN_SPEED: f32 = 60.0;
    pub const ENEMY_MAX_SPEED: f32 = 72.0;
    /// Per-wave speed increase and its cap
    pub const ENEMY_SPEEDUP_PER_WAVE: f32 = 0.1;
    pub const ENEMY_MAX_SPEEDUP: f32 = 2.0;
    /// Spawn band above the visible world
    pub const ENEMY_SPAWN_MIN_Y: f32 = -400.0;
    pub const ENEMY_SPAWN_MAX_Y: f32 = 0.0;
    pub const ENEMY_SPAWN_RIGHT_MARGIN: f32 = 50.0;
    /// Enemies below this line are discarded
    pub const ENEMY_DESPAWN_MARGIN: f32 = 50.0;

    /// Collision radii
    pub const BULLET_HIT_RADIUS: f32 = 30.0;
    pub const PLAYER_HIT_RADIUS: f32 = 20.0;
}

/// Fixed-timestep accumulator driven by variable frame deltas
///
/// Time that cannot be simulated within `MAX_SUBSTEPS` is dropped, so a slow
/// stretch never turns into a fast-forward once frames speed up again.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FixedStep {
    accumulator: f32,
}

impl FixedStep {
    /// Add a frame delta and return how many `SIM_DT` ticks to run
    pub fn advance(&mut self, dt: f32) -> u32 {
        use consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);
        let mut steps = 0;
        while self.accumulator >= SIM_DT && steps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            steps += 1;
        }
        if steps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        steps
    }

    /// Unsimulated time carried into the next frame
    pub fn backlog(&self) -> f32 {
        self.accumulator
    }
}

/// Angle (radians) of the vector pointing from `from` to `to`
#[inline]
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    (to.y - from.y).atan2(to.x - from.x)
}

/// Unit vector for a sprite rotation where 0 means "facing up"
///
/// Screen space is y-down, so facing up is an angle of -π/2.
#[inline]
pub fn heading_from_rotation(rotation: f32) -> Vec2 {
    let angle = rotation - std::f32::consts::FRAC_PI_2;
    Vec2::new(angle.cos(), angle.sin())
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_heading_zero_faces_up() {
        let h = heading_from_rotation(0.0);
        assert!(h.x.abs() < 1e-6);
        assert!((h.y + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_heading_quarter_turn_faces_right() {
        let h = heading_from_rotation(FRAC_PI_2);
        assert!((h.x - 1.0).abs() < 1e-6);
        assert!(h.y.abs() < 1e-6);
    }

    #[test]
    fn test_angle_between_down() {
        let a = angle_between(Vec2::new(10.0, 10.0), Vec2::new(10.0, 50.0));
        assert!((a - FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_angle() {
        assert!((normalize_angle(2.5 * PI) - 0.5 * PI).abs() < 1e-5);
        assert!((normalize_angle(-2.5 * PI) + 0.5 * PI).abs() < 1e-5);
        assert!((normalize_angle(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_angle_odd_multiples_of_pi() {
        // +π and -π are the same heading, rounding may land on either
        for angle in [3.0 * PI, -3.0 * PI, 5.0 * PI] {
            let n = normalize_angle(angle);
            assert!(n.abs() <= PI + 1e-5);
            assert!((n.abs() - PI).abs() < 1e-5);
        }
    }

    #[test]
    fn test_fire_cooldown_ticks() {
        assert_eq!(consts::FIRE_COOLDOWN_TICKS, 12);
    }

    #[test]
    fn test_fixed_step_runs_whole_ticks() {
        let mut clock = FixedStep::default();
        assert_eq!(clock.advance(consts::SIM_DT * 0.5), 0);
        assert_eq!(clock.advance(consts::SIM_DT * 0.6), 1);
        assert_eq!(clock.advance(consts::SIM_DT * 3.0), 3);
    }

    #[test]
    fn test_fixed_step_backlog_bounded_at_low_fps() {
        let mut clock = FixedStep::default();
        // 5 fps for 30 seconds
        for _ in 0..150 {
            assert!(clock.advance(0.2) <= consts::MAX_SUBSTEPS);
            assert!(clock.backlog() <= consts::SIM_DT + 1e-6);
        }
        // Back at 60 fps there is nothing to catch up on
        assert!(clock.advance(consts::SIM_DT) <= 2);
        assert!(clock.advance(consts::SIM_DT) <= 2);
    }
}
