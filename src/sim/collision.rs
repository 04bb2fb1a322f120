//! Player/obstacle collisions and the life system
//!
//! A hit costs a life, tallies the obstacle's kind, consumes the obstacle and
//! starts the invulnerability window. While the window is open nothing here
//! runs at all.

use serde::{Deserialize, Serialize};

use super::geometry::circles_overlap;
use super::state::{GameEvent, GameState};

/// How many hits a single collision pass may register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HitPolicy {
    /// Every obstacle overlapping the player this tick counts, so a pile-up
    /// can cost several lives at once
    PerTick,
    /// The first hit opens the invulnerability window and ends the pass;
    /// other overlapping obstacles stay live
    #[default]
    OncePerWindow,
}

/// Check the player against every obstacle and apply hits
///
/// Obstacles are visited in id order. Returns the number of lives lost.
pub fn check_collisions(state: &mut GameState, events: &mut Vec<GameEvent>) -> u32 {
    if state.is_invulnerable() {
        return 0;
    }

    let player_pos = state.player.pos;
    let player_radius = state.player.radius;
    let policy = state.tuning.hit_policy;
    let mut hits = 0u32;
    let mut i = 0;

    while i < state.obstacles.len() {
        let obstacle = &state.obstacles[i];
        if !circles_overlap(player_pos, player_radius, obstacle.pos, obstacle.radius) {
            i += 1;
            continue;
        }

        let obstacle = state.obstacles.remove(i);
        state.lives -= 1;
        state.hit_counts.record(obstacle.kind);
        state.invulnerable_until = Some(state.elapsed + state.tuning.invulnerability_secs);
        hits += 1;

        log::debug!(
            "Hit by {} (id {}), {} lives left",
            obstacle.title(),
            obstacle.id,
            state.lives
        );
        events.push(GameEvent::Hit {
            id: obstacle.id,
            kind: obstacle.kind,
            lives_left: state.lives,
        });

        if policy == HitPolicy::OncePerWindow {
            break;
        }
    }

    hits
}
