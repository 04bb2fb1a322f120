//! Obstacle behavior engine
//!
//! Obstacles enter at the right edge and drift left. Each kind layers one rule
//! on top of the drift:
//! - Solicitor: steps toward the player
//! - Marketer: rarely shrinks and splits off a clone below itself
//! - FitnessPromoter: speeds up every tick
//! - CryptoPromoter: wobbles vertically with its x position

use glam::Vec2;
use rand::Rng;

use super::geometry::{separation, unit_toward};
use super::state::{GameEvent, GameState, Obstacle, ObstacleKind};

/// Create one obstacle at the right edge
///
/// Returns `None` when the live cap is reached.
pub fn spawn_obstacle(state: &mut GameState) -> Option<GameEvent> {
    if !state.has_obstacle_capacity() {
        log::debug!("Spawn skipped, {} obstacles live", state.obstacles.len());
        return None;
    }

    let tuning = &state.tuning;
    let kind = ObstacleKind::ALL[state.rng.random_range(0..ObstacleKind::ALL.len())];
    let band = (tuning.canvas_height - tuning.spawn_bottom_margin).max(0.0);
    let y = state.rng.random::<f32>() * band;
    let speed = (tuning.obstacle_speed_min + state.rng.random::<f32>() * tuning.obstacle_speed_range)
        * state.difficulty.factor;
    let pos = Vec2::new(tuning.canvas_width, y);
    let radius = tuning.obstacle_radius;

    let id = state.next_entity_id();
    state.obstacles.push(Obstacle {
        id,
        kind,
        pos,
        radius,
        speed,
    });
    Some(GameEvent::Spawned { id, kind })
}

/// Advance every obstacle by one tick
///
/// Drift and per-kind rules, then overlap resolution (if enabled), then
/// off-screen culling. Clones split off this tick are appended after the pass
/// and do not move until the next one.
pub fn update_obstacles(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let player_pos = state.player.pos;
    let tuning = &state.tuning;
    let live = state.obstacles.len();
    let mut clones: Vec<(u32, Obstacle)> = Vec::new();

    for obstacle in state.obstacles.iter_mut() {
        obstacle.pos.x -= obstacle.speed;

        match obstacle.kind {
            ObstacleKind::CryptoPromoter => {
                obstacle.pos.y +=
                    (obstacle.pos.x * tuning.crypto_frequency).sin() * tuning.crypto_amplitude;
            }
            ObstacleKind::Solicitor => {
                obstacle.pos += unit_toward(obstacle.pos, player_pos) * tuning.solicitor_homing_step;
            }
            ObstacleKind::Marketer => {
                let roll = state.rng.random_bool(tuning.marketer_split_chance);
                let room = live + clones.len() < tuning.max_obstacles;
                if roll && obstacle.radius > tuning.marketer_min_radius && room {
                    obstacle.radius *= tuning.marketer_shrink;
                    let mut clone = obstacle.clone();
                    clone.pos.y += tuning.marketer_clone_offset;
                    clones.push((obstacle.id, clone));
                }
            }
            ObstacleKind::FitnessPromoter => {
                obstacle.speed *= tuning.fitness_acceleration;
            }
        }
    }

    for (parent, mut clone) in clones {
        let child = state.next_entity_id();
        clone.id = child;
        state.obstacles.push(clone);
        events.push(GameEvent::Split { parent, child });
    }

    if state.tuning.resolve_overlaps {
        resolve_overlaps(&mut state.obstacles);
    }

    cull_off_screen(&mut state.obstacles);
}

/// Push every overlapping pair apart, half the overlap each
///
/// O(n²) over the live set; `max_obstacles` keeps n small. Pairs are visited in
/// slice order and corrections apply immediately, so a later pair sees the
/// positions an earlier pair produced.
pub fn resolve_overlaps(obstacles: &mut [Obstacle]) {
    let n = obstacles.len();
    for i in 0..n {
        for j in (i + 1)..n {
            let (head, tail) = obstacles.split_at_mut(j);
            let a = &mut head[i];
            let b = &mut tail[0];
            if let Some(push) = separation(a.pos, a.radius, b.pos, b.radius) {
                a.pos += push;
                b.pos -= push;
            }
        }
    }
}

/// Drop obstacles that have fully left through the left edge
pub fn cull_off_screen(obstacles: &mut Vec<Obstacle>) {
    obstacles.retain(|o| !o.is_off_screen());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::geometry::distance;
    use crate::tuning::Tuning;

    fn obstacle(id: u32, kind: ObstacleKind, x: f32, y: f32) -> Obstacle {
        Obstacle {
            id,
            kind,
            pos: Vec2::new(x, y),
            radius: 50.0,
            speed: 3.0,
        }
    }

    fn quiet_state() -> GameState {
        let tuning = Tuning {
            resolve_overlaps: false,
            ..Tuning::default()
        };
        GameState::new(tuning, 42)
    }

    #[test]
    fn test_spawn_at_right_edge() {
        let mut state = GameState::new(Tuning::default(), 1);
        for _ in 0..200 {
            let event = spawn_obstacle(&mut state);
            assert!(matches!(event, Some(GameEvent::Spawned { .. })) || event.is_none());
        }
        for o in &state.obstacles {
            assert!(ObstacleKind::ALL.contains(&o.kind));
            assert_eq!(o.pos.x, 800.0);
            assert!(o.pos.y >= 0.0 && o.pos.y < 560.0);
            assert_eq!(o.radius, 50.0);
            assert!(o.speed >= 2.0 && o.speed <= 5.0);
        }
    }

    #[test]
    fn test_spawn_speed_scales_with_difficulty() {
        let mut state = GameState::new(Tuning::default(), 9);
        state.difficulty.factor = 3.0;
        spawn_obstacle(&mut state);
        let o = &state.obstacles[0];
        assert!(o.speed >= 6.0 && o.speed <= 15.0);
    }

    #[test]
    fn test_spawn_respects_cap() {
        let tuning = Tuning {
            max_obstacles: 3,
            ..Tuning::default()
        };
        let mut state = GameState::new(tuning, 5);
        for _ in 0..10 {
            spawn_obstacle(&mut state);
        }
        assert_eq!(state.obstacles.len(), 3);
    }

    #[test]
    fn test_fitness_accelerates() {
        let mut state = quiet_state();
        state
            .obstacles
            .push(obstacle(1, ObstacleKind::FitnessPromoter, 700.0, 300.0));
        let mut events = Vec::new();
        update_obstacles(&mut state, &mut events);
        let o = &state.obstacles[0];
        assert_eq!(o.pos.x, 697.0);
        assert!((o.speed - 3.003).abs() < 1e-5);
    }

    #[test]
    fn test_crypto_wobbles() {
        let mut state = quiet_state();
        state
            .obstacles
            .push(obstacle(1, ObstacleKind::CryptoPromoter, 703.0, 300.0));
        let mut events = Vec::new();
        update_obstacles(&mut state, &mut events);
        let o = &state.obstacles[0];
        let expected = 300.0 + (700.0f32 * 0.1).sin() * 2.0;
        assert!((o.pos.y - expected).abs() < 1e-4);
    }

    #[test]
    fn test_solicitor_homes() {
        let mut state = quiet_state();
        state.player.pos = Vec2::new(100.0, 300.0);
        state
            .obstacles
            .push(obstacle(1, ObstacleKind::Solicitor, 500.0, 0.0));
        let before = distance(state.obstacles[0].pos - Vec2::new(3.0, 0.0), state.player.pos);
        let mut events = Vec::new();
        update_obstacles(&mut state, &mut events);
        let after = distance(state.obstacles[0].pos, state.player.pos);
        assert!((before - after - 0.5).abs() < 1e-3);
        assert!(state.obstacles[0].pos.y > 0.0);
    }

    #[test]
    fn test_solicitor_on_top_of_player_stays_finite() {
        let mut state = quiet_state();
        state.player.pos = Vec2::new(397.0, 300.0);
        state
            .obstacles
            .push(obstacle(1, ObstacleKind::Solicitor, 400.0, 300.0));
        let mut events = Vec::new();
        update_obstacles(&mut state, &mut events);
        let o = &state.obstacles[0];
        assert!(o.pos.is_finite());
        assert_eq!(o.pos, Vec2::new(397.0, 300.0));
    }

    #[test]
    fn test_marketer_always_splits_when_forced() {
        let tuning = Tuning {
            resolve_overlaps: false,
            marketer_split_chance: 1.0,
            ..Tuning::default()
        };
        let mut state = GameState::new(tuning, 3);
        let id = state.next_entity_id();
        state
            .obstacles
            .push(obstacle(id, ObstacleKind::Marketer, 600.0, 200.0));

        let mut events = Vec::new();
        update_obstacles(&mut state, &mut events);
        assert_eq!(state.obstacles.len(), 2);
        let (parent, child) = (&state.obstacles[0], &state.obstacles[1]);
        assert!((parent.radius - 35.0).abs() < 1e-4);
        assert_eq!(child.radius, parent.radius);
        assert_eq!(child.pos, parent.pos + Vec2::new(0.0, 30.0));
        assert!(child.id > parent.id);
        assert_eq!(
            events,
            vec![GameEvent::Split {
                parent: parent.id,
                child: child.id
            }]
        );

        // 35 -> 24.5 -> 17.15, then below the minimum radius
        for _ in 0..10 {
            update_obstacles(&mut state, &mut events);
        }
        assert!(state.obstacles.iter().all(|o| o.radius > 17.0));
        assert!(state.obstacles.len() <= 16);
    }

    #[test]
    fn test_marketer_split_respects_cap() {
        let tuning = Tuning {
            resolve_overlaps: false,
            marketer_split_chance: 1.0,
            max_obstacles: 1,
            ..Tuning::default()
        };
        let mut state = GameState::new(tuning, 3);
        state
            .obstacles
            .push(obstacle(1, ObstacleKind::Marketer, 600.0, 200.0));
        let mut events = Vec::new();
        update_obstacles(&mut state, &mut events);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.obstacles[0].radius, 50.0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_overlapping_marketers_separate_symmetrically() {
        let a = obstacle(1, ObstacleKind::Marketer, 400.0, 300.0);
        let b = obstacle(2, ObstacleKind::Marketer, 440.0, 330.0);
        let (a0, b0) = (a.pos, b.pos);
        let overlap = 100.0 - distance(a0, b0);
        let mut obstacles = vec![a, b];

        resolve_overlaps(&mut obstacles);

        let d = distance(obstacles[0].pos, obstacles[1].pos);
        assert!(d >= 100.0 - 1e-3);
        let moved_a = distance(a0, obstacles[0].pos);
        let moved_b = distance(b0, obstacles[1].pos);
        assert!((moved_a - overlap / 2.0).abs() < 1e-3);
        assert!((moved_b - overlap / 2.0).abs() < 1e-3);
        // Midpoint is preserved
        let mid0 = (a0 + b0) / 2.0;
        let mid1 = (obstacles[0].pos + obstacles[1].pos) / 2.0;
        assert!((mid0 - mid1).length() < 1e-3);
    }

    #[test]
    fn test_coincident_obstacles_not_corrupted() {
        let mut obstacles = vec![
            obstacle(1, ObstacleKind::Marketer, 400.0, 300.0),
            obstacle(2, ObstacleKind::Marketer, 400.0, 300.0),
        ];
        resolve_overlaps(&mut obstacles);
        assert!(obstacles.iter().all(|o| o.pos.is_finite()));
    }

    #[test]
    fn test_cull_only_fully_off_screen() {
        let mut state = quiet_state();
        // After drift of 3: x + r = 0 exactly -> removed
        state
            .obstacles
            .push(obstacle(1, ObstacleKind::FitnessPromoter, -47.0, 100.0));
        // After drift: x + r = 1 -> kept
        state
            .obstacles
            .push(obstacle(2, ObstacleKind::FitnessPromoter, -46.0, 400.0));
        let mut events = Vec::new();
        update_obstacles(&mut state, &mut events);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.obstacles[0].id, 2);
    }
}
