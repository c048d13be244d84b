//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{detect_collisions, distance, hits};
pub use spawn::{spawn_bullet, spawn_wave, wave_size};
pub use state::{Bullet, Enemy, GameEvent, GamePhase, GameState, Player};
pub use tick::{TickInput, tick};
