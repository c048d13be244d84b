//! Collision detection between bullets, enemies and the player
//!
//! Plain pairwise distance checks, O(bullets × enemies) per tick. Entity
//! counts stay small enough that no spatial partitioning is needed.

use glam::Vec2;

use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// True if the points are strictly closer than `radius`
#[inline]
pub fn hits(a: Vec2, b: Vec2, radius: f32) -> bool {
    distance(a, b) < radius
}

/// Resolve all collisions for this tick
pub fn detect_collisions(state: &mut GameState) {
    bullets_vs_enemies(state);
    enemies_vs_player(state);
}

/// Each bullet destroys at most one enemy; both are removed and score +1
///
/// Iterates newest bullet first against newest enemy first.
fn bullets_vs_enemies(state: &mut GameState) {
    let mut i = state.bullets.len();
    while i > 0 {
        i -= 1;
        let bullet_pos = state.bullets[i].pos;

        let hit = state
            .enemies
            .iter()
            .rposition(|enemy| hits(bullet_pos, enemy.pos, BULLET_HIT_RADIUS));

        if let Some(j) = hit {
            let enemy = state.enemies.remove(j);
            state.bullets.remove(i);
            state.add_score(1);
            state.events.push(GameEvent::EnemyDestroyed { pos: enemy.pos });
        }
    }
}

/// Enemies touching the living player are removed and cost one life each
///
/// Newest enemy first. Once the player dies, remaining rammers stay put.
fn enemies_vs_player(state: &mut GameState) {
    let player_pos = state.player.pos;

    let mut i = state.enemies.len();
    while i > 0 && state.player.alive {
        i -= 1;
        if !hits(player_pos, state.enemies[i].pos, PLAYER_HIT_RADIUS) {
            continue;
        }
        state.enemies.remove(i);
        state.lose_lives(1);
        state.events.push(GameEvent::PlayerHit);
        if state.lives < 1 {
            game_over(state);
        }
    }
}

fn game_over(state: &mut GameState) {
    state.player.alive = false;
    state.phase = GamePhase::GameOver;
    state.events.push(GameEvent::GameOver { score: state.score });
    log::info!("Game over - final score {}", state.score);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Bullet, Enemy};
    use proptest::prelude::*;

    fn enemy(state: &mut GameState, x: f32, y: f32) {
        let id = state.next_entity_id();
        state.enemies.push(Enemy {
            id,
            pos: Vec2::new(x, y),
            speed: 60.0,
            rotation: 0.0,
        });
    }

    fn bullet(state: &mut GameState, x: f32, y: f32) {
        let id = state.next_entity_id();
        state.bullets.push(Bullet {
            id,
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            rotation: 0.0,
        });
    }

    #[test]
    fn test_bullet_destroys_enemy() {
        let mut state = GameState::empty(1);
        enemy(&mut state, 100.0, 100.0);
        bullet(&mut state, 110.0, 110.0);

        detect_collisions(&mut state);

        assert!(state.enemies.is_empty());
        assert!(state.bullets.is_empty());
        assert_eq!(state.score, 1);
        assert!(matches!(state.events[0], GameEvent::EnemyDestroyed { .. }));
    }

    #[test]
    fn test_bullet_misses_at_radius() {
        let mut state = GameState::empty(1);
        enemy(&mut state, 100.0, 100.0);
        bullet(&mut state, 100.0 + BULLET_HIT_RADIUS, 100.0);

        detect_collisions(&mut state);

        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_one_bullet_one_kill() {
        let mut state = GameState::empty(1);
        enemy(&mut state, 100.0, 100.0);
        enemy(&mut state, 105.0, 100.0);
        bullet(&mut state, 102.0, 100.0);

        detect_collisions(&mut state);

        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.score, 1);
        // Newest enemy is checked first
        assert_eq!(state.enemies[0].pos.x, 100.0);
    }

    #[test]
    fn test_enemy_rams_player_without_bullets() {
        let mut state = GameState::empty(1);
        let p = state.player.pos;
        enemy(&mut state, p.x + 5.0, p.y);

        detect_collisions(&mut state);

        assert!(state.enemies.is_empty());
        assert_eq!(state.lives, STARTING_LIVES - 1);
        assert_eq!(state.events, vec![GameEvent::PlayerHit]);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_last_life_ends_game() {
        let mut state = GameState::empty(1);
        state.lives = 1;
        state.score = 9;
        let p = state.player.pos;
        enemy(&mut state, p.x, p.y + 3.0);
        enemy(&mut state, p.x, p.y - 3.0);

        detect_collisions(&mut state);

        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(!state.player.alive);
        assert_eq!(
            state.events,
            vec![GameEvent::PlayerHit, GameEvent::GameOver { score: 9 }]
        );
        // Only the enemy that took the last life is consumed
        assert_eq!(state.enemies.len(), 1);
    }

    #[test]
    fn test_every_consumed_rammer_costs_a_life() {
        let mut state = GameState::empty(1);
        state.lives = 2;
        let p = state.player.pos;
        for dx in [-4.0, 0.0, 4.0] {
            enemy(&mut state, p.x + dx, p.y);
        }

        detect_collisions(&mut state);

        let hits = state
            .events
            .iter()
            .filter(|e| **e == GameEvent::PlayerHit)
            .count();
        assert_eq!(hits, 2);
        assert_eq!(state.lives, 0);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_dead_player_takes_no_hits() {
        let mut state = GameState::empty(1);
        state.player.alive = false;
        let p = state.player.pos;
        enemy(&mut state, p.x, p.y);

        detect_collisions(&mut state);

        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.lives, STARTING_LIVES);
    }

    proptest! {
        #[test]
        fn prop_hits_matches_radius(
            ax in -2000.0f32..2000.0, ay in -2000.0f32..2000.0,
            bx in -2000.0f32..2000.0, by in -2000.0f32..2000.0,
        ) {
            let a = Vec2::new(ax, ay);
            let b = Vec2::new(bx, by);
            prop_assert_eq!(hits(a, b, 30.0), hits(b, a, 30.0));
            prop_assert_eq!(hits(a, b, 30.0), (a - b).length() < 30.0);
        }

        #[test]
        fn prop_score_counts_kills(n in 1usize..12) {
            let mut state = GameState::empty(3);
            for k in 0..n {
                let x = 50.0 + k as f32 * 100.0;
                enemy(&mut state, x, 100.0);
                bullet(&mut state, x + 1.0, 100.0);
            }
            detect_collisions(&mut state);
            prop_assert_eq!(state.score, n as u64);
            prop_assert!(state.enemies.is_empty());
            prop_assert!(state.bullets.is_empty());
        }
    }
}
