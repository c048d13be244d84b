//! Game state and core simulation types
//!
//! Everything the scene owns lives here and is discarded on restart.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::heading_from_rotation;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Lives ran out, waiting for restart input
    GameOver,
}

/// Something that happened during a tick, consumed by the platform layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Player fired a bullet
    Shot,
    /// A bullet destroyed an enemy at the given position
    EnemyDestroyed { pos: Vec2 },
    /// An enemy rammed the player
    PlayerHit,
    /// All enemies of a wave are gone (wave index that was cleared)
    WaveCleared { wave: u32 },
    /// Lives reached zero
    GameOver { score: u64 },
}

/// The player's ship
///
/// The ship never translates; W and the arrow keys scroll the background instead.
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    /// Sprite rotation in radians (0 = facing up, positive = clockwise)
    pub rotation: f32,
    pub alive: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(WORLD_WIDTH * PLAYER_SPAWN_X, WORLD_HEIGHT * PLAYER_SPAWN_Y),
            rotation: 0.0,
            alive: true,
        }
    }
}

impl Player {
    /// Unit vector the ship is facing
    pub fn heading(&self) -> Vec2 {
        heading_from_rotation(self.rotation)
    }

    /// Position of the ship's nose, where bullets spawn
    pub fn nose(&self) -> Vec2 {
        self.pos + self.heading() * PLAYER_NOSE_OFFSET
    }
}

/// An enemy ship homing toward the player
#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    /// Movement speed (px/s)
    pub speed: f32,
    /// Sprite rotation, kept facing the player
    pub rotation: f32,
}

/// A player bullet flying in a straight line
#[derive(Debug, Clone)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
    /// Velocity (px/s)
    pub vel: Vec2,
    /// Sprite rotation (the ship's rotation when fired)
    pub rotation: f32,
}

impl Bullet {
    /// True once the bullet has left the world plus the cull margin
    pub fn is_out_of_bounds(&self) -> bool {
        self.pos.x < -BULLET_CULL_MARGIN
            || self.pos.x > WORLD_WIDTH + BULLET_CULL_MARGIN
            || self.pos.y < -BULLET_CULL_MARGIN
            || self.pos.y > WORLD_HEIGHT + BULLET_CULL_MARGIN
    }
}

/// Complete game state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Seeded RNG for spawn positions and speeds
    pub rng: Pcg32,
    /// Current phase
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub score: u64,
    pub lives: u32,
    /// Current wave index (0-based)
    pub wave_index: u32,
    /// Tick of the last player shot
    pub last_shot_tick: Option<u64>,
    /// Background tile scroll offset
    pub background_offset: Vec2,
    pub player: Player,
    /// Active enemies (spawn order)
    pub enemies: Vec<Enemy>,
    /// Active bullets (fire order)
    pub bullets: Vec<Bullet>,
    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed and spawn the first wave
    pub fn new(seed: u64) -> Self {
        let mut state = Self::empty(seed);
        super::spawn::spawn_wave(&mut state);
        state
    }

    /// Create a state with no enemies (first wave not yet spawned)
    pub fn empty(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Playing,
            time_ticks: 0,
            score: 0,
            lives: STARTING_LIVES,
            wave_index: 0,
            last_shot_tick: None,
            background_offset: Vec2::ZERO,
            player: Player::default(),
            enemies: Vec::new(),
            bullets: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Add points and return the new score
    pub fn add_score(&mut self, points: u64) -> u64 {
        self.score += points;
        self.score
    }

    /// Remove lives (saturating) and return how many remain
    pub fn lose_lives(&mut self, count: u32) -> u32 {
        self.lives = self.lives.saturating_sub(count);
        self.lives
    }

    /// True while the player can act and the world advances
    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Playing && self.player.alive
    }

    /// Throw everything away and start a fresh run
    pub fn restart(&mut self) {
        // Derive the next seed so consecutive runs differ but stay reproducible
        let seed = self
            .seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        log::info!("Restarting with seed {}", seed);
        *self = GameState::new(seed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_defaults() {
        let state = GameState::new(42);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, STARTING_LIVES);
        assert_eq!(state.enemies.len(), FIRST_WAVE_ENEMIES as usize);
        assert!(state.bullets.is_empty());
        assert_eq!(state.player.pos, Vec2::new(740.0, 700.0));
    }

    #[test]
    fn test_entity_ids_are_unique() {
        let mut state = GameState::empty(1);
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert!(b > a);
    }

    #[test]
    fn test_lose_lives_saturates() {
        let mut state = GameState::empty(1);
        assert_eq!(state.lose_lives(3), STARTING_LIVES - 3);
        assert_eq!(state.lose_lives(100), 0);
    }

    #[test]
    fn test_restart_resets_run() {
        let mut state = GameState::new(7);
        state.score = 12;
        state.lives = 0;
        state.phase = GamePhase::GameOver;
        state.player.alive = false;
        state.restart();

        assert_eq!(state.score, 0);
        assert_eq!(state.lives, STARTING_LIVES);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.player.alive);
        assert_ne!(state.seed, 7);
    }

    #[test]
    fn test_bullet_bounds() {
        let mut bullet = Bullet {
            id: 1,
            pos: Vec2::new(10.0, 10.0),
            vel: Vec2::ZERO,
            rotation: 0.0,
        };
        assert!(!bullet.is_out_of_bounds());
        bullet.pos.y = -BULLET_CULL_MARGIN - 1.0;
        assert!(bullet.is_out_of_bounds());
    }
}
