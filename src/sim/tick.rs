//! Fixed timestep simulation tick and session lifecycle
//!
//! Idle → Running on [`start`], Running → GameOver when lives run out,
//! GameOver → Idle on [`reset_to_idle`] (or straight back to Running on the
//! next [`start`]).

use glam::Vec2;
use rand::Rng;

use super::collision::check_collisions;
use super::difficulty::Difficulty;
use super::obstacle::{spawn_obstacle, update_obstacles};
use super::player::Directions;
use super::state::{GameEvent, GameOverSummary, GamePhase, GameState};

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Held arrow keys
    pub held: Directions,
    /// Swipe delta since the previous tick (touch play)
    pub swipe: Option<Vec2>,
}

/// Begin a new run
///
/// Returns `false` (and changes nothing) if a run is already in progress.
pub fn start(state: &mut GameState) -> bool {
    if state.phase == GamePhase::Running {
        log::debug!("Start ignored, run already in progress");
        return false;
    }

    state.score = 0;
    state.lives = state.tuning.starting_lives;
    state.obstacles.clear();
    state.hit_counts.clear();
    state.player.reset(&state.tuning);
    state.difficulty = Difficulty::new(&state.tuning);
    state.invulnerable_until = None;
    state.time_ticks = 0;
    state.elapsed = 0.0;
    state.phase = GamePhase::Running;

    log::info!("Run started with {} lives", state.lives);
    true
}

/// Dismiss the game-over summary
pub fn reset_to_idle(state: &mut GameState) {
    if state.phase == GamePhase::GameOver {
        state.phase = GamePhase::Idle;
    }
}

/// Advance the game state by one fixed timestep
///
/// Does nothing unless the run is in progress. While the invulnerability
/// window is open the player and obstacles are frozen, but spawning, scoring
/// and difficulty keep going.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.phase != GamePhase::Running {
        return events;
    }

    state.time_ticks += 1;
    state.elapsed += dt as f64;

    if let Some(until) = state.invulnerable_until
        && state.elapsed >= until
    {
        state.invulnerable_until = None;
        events.push(GameEvent::InvulnerabilityEnded);
    }

    if !state.is_invulnerable() {
        let bounds = state.tuning.canvas_size();
        state.player.steer(input.held, bounds);
        if let Some(swipe) = input.swipe {
            state.player.nudge(swipe, bounds);
        }

        update_obstacles(state, &mut events);
        check_collisions(state, &mut events);
    }

    let p = state.difficulty.spawn_probability();
    if state.rng.random_bool(p)
        && let Some(event) = spawn_obstacle(state)
    {
        events.push(event);
    }

    state.score += 1;

    if state.lives <= 0 {
        let summary = GameOverSummary::new(state.score, state.hit_counts);
        log::info!(
            "Game over at score {}: {}",
            summary.score,
            summary.message
        );
        state.phase = GamePhase::GameOver;
        events.push(GameEvent::GameOver(summary));
    } else {
        state.difficulty.advance(&state.tuning);
    }

    // Ensure deterministic ordering
    state.normalize_order();
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::HitPolicy;
    use crate::sim::state::{Obstacle, ObstacleKind};
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    /// No random spawns, splits or overlap pushes: tests place every obstacle
    fn scripted_tuning() -> Tuning {
        Tuning {
            initial_creation_rate: 0.0,
            creation_rate_step: 0.0,
            marketer_split_chance: 0.0,
            resolve_overlaps: false,
            ..Tuning::default()
        }
    }

    fn running(tuning: Tuning) -> GameState {
        let mut state = GameState::new(tuning, 2024);
        assert!(start(&mut state));
        state
    }

    /// Park a stationary obstacle on top of the player
    fn force_hit(state: &mut GameState, kind: ObstacleKind) -> u32 {
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle {
            id,
            kind,
            pos: state.player.pos + Vec2::new(5.0, 0.0),
            radius: 50.0,
            speed: 0.0,
        });
        id
    }

    fn tick_until_vulnerable(state: &mut GameState) {
        let input = TickInput::default();
        for _ in 0..120 {
            if !state.is_invulnerable() {
                return;
            }
            tick(state, &input, SIM_DT);
        }
        panic!("invulnerability never ended");
    }

    #[test]
    fn test_start_is_reentrancy_guarded() {
        let mut state = running(scripted_tuning());
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.score, 1);
        assert!(!start(&mut state));
        assert_eq!(state.score, 1);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_idle_does_not_tick() {
        let mut state = GameState::new(Tuning::default(), 1);
        let events = tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(events.is_empty());
        assert_eq!(state.score, 0);
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn test_forced_solicitor_hit() {
        let mut state = running(scripted_tuning());
        assert_eq!((state.lives, state.score), (10, 0));
        let id = force_hit(&mut state, ObstacleKind::Solicitor);

        let events = tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.lives, 9);
        assert_eq!(state.hit_counts.get(ObstacleKind::Solicitor), 1);
        assert!(state.obstacles.iter().all(|o| o.id != id));
        assert!(state.is_invulnerable());
        assert!(events.contains(&GameEvent::Hit {
            id,
            kind: ObstacleKind::Solicitor,
            lives_left: 9
        }));
    }

    #[test]
    fn test_invulnerability_freezes_motion_not_score() {
        let mut state = running(scripted_tuning());
        force_hit(&mut state, ObstacleKind::Solicitor);
        state.obstacles.push(Obstacle {
            id: 900,
            kind: ObstacleKind::FitnessPromoter,
            pos: Vec2::new(700.0, 500.0),
            radius: 50.0,
            speed: 4.0,
        });
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.is_invulnerable());

        let frozen = state.obstacles.clone();
        let player_pos = state.player.pos;
        let held = TickInput {
            held: Directions {
                right: true,
                ..Default::default()
            },
            swipe: None,
        };
        for _ in 0..10 {
            tick(&mut state, &held, SIM_DT);
        }
        assert_eq!(state.obstacles, frozen);
        assert_eq!(state.player.pos, player_pos);
        assert_eq!(state.score, 11);

        // Window closes after ~0.5s of simulation time, then motion resumes
        let mut ended_at = None;
        for n in 0..40 {
            let events = tick(&mut state, &held, SIM_DT);
            if events.contains(&GameEvent::InvulnerabilityEnded) {
                ended_at = Some(n);
                break;
            }
        }
        let ended_at = ended_at.expect("window should close");
        assert!((18..=20).contains(&ended_at));
        assert!(state.player.pos.x > player_pos.x);
        assert!(state.obstacles[0].pos.x < frozen[0].pos.x);
    }

    #[test]
    fn test_game_over_exactly_once() {
        let tuning = Tuning {
            starting_lives: 3,
            ..scripted_tuning()
        };
        let mut state = running(tuning);
        let kinds = [
            ObstacleKind::CryptoPromoter,
            ObstacleKind::Marketer,
            ObstacleKind::Marketer,
        ];

        let mut game_overs = Vec::new();
        for kind in kinds {
            tick_until_vulnerable(&mut state);
            force_hit(&mut state, kind);
            let events = tick(&mut state, &TickInput::default(), SIM_DT);
            game_overs.extend(events.into_iter().filter_map(|e| match e {
                GameEvent::GameOver(summary) => Some(summary),
                _ => None,
            }));
        }

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.lives, 0);
        assert_eq!(game_overs.len(), 1);
        let summary = &game_overs[0];
        assert_eq!(summary.offender, Some(ObstacleKind::Marketer));
        assert_eq!(summary.message, "Network Marketer spammed you to death!");
        assert_eq!(summary.score, state.score);

        // Halted: further ticks change nothing
        let score = state.score;
        for _ in 0..10 {
            assert!(tick(&mut state, &TickInput::default(), SIM_DT).is_empty());
        }
        assert_eq!(state.score, score);

        reset_to_idle(&mut state);
        assert_eq!(state.phase, GamePhase::Idle);
        assert!(start(&mut state));
        assert_eq!(state.lives, 3);
        assert_eq!(state.hit_counts.total(), 0);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_pile_up_depends_on_policy() {
        for (policy, expected_lives) in [(HitPolicy::PerTick, 8), (HitPolicy::OncePerWindow, 9)] {
            let tuning = Tuning {
                hit_policy: policy,
                ..scripted_tuning()
            };
            let mut state = running(tuning);
            force_hit(&mut state, ObstacleKind::Solicitor);
            force_hit(&mut state, ObstacleKind::CryptoPromoter);
            tick(&mut state, &TickInput::default(), SIM_DT);
            assert_eq!(state.lives, expected_lives, "{policy:?}");
        }
    }

    #[test]
    fn test_ten_thousand_quiet_ticks() {
        let tuning = Tuning {
            max_obstacles: 0,
            ..Tuning::default()
        };
        let mut state = running(tuning);
        let input = TickInput::default();
        let mut prev = state.difficulty;
        for _ in 0..10_000 {
            tick(&mut state, &input, SIM_DT);
            assert!(state.difficulty.factor > prev.factor);
            assert!(state.difficulty.creation_rate > prev.creation_rate);
            prev = state.difficulty;
        }
        assert_eq!(state.score, 10_000);
        assert_eq!(state.lives, 10);
        assert!(state.obstacles.is_empty());
        assert!(state.difficulty.factor > 1.9);
    }

    #[test]
    fn test_spawns_happen_at_rate() {
        let tuning = Tuning {
            initial_creation_rate: 0.5,
            creation_rate_step: 0.0,
            ..Tuning::default()
        };
        let mut state = running(tuning);
        let mut spawned = 0;
        for _ in 0..20 {
            let events = tick(&mut state, &TickInput::default(), SIM_DT);
            spawned += events
                .iter()
                .filter(|e| matches!(e, GameEvent::Spawned { .. }))
                .count();
        }
        assert!(spawned > 0);
        assert!(state.obstacles.windows(2).all(|w| w[0].id < w[1].id));
    }

    fn tick_input() -> impl Strategy<Value = TickInput> {
        (
            any::<[bool; 4]>(),
            proptest::option::of((-40.0f32..40.0, -40.0f32..40.0)),
        )
            .prop_map(|(keys, swipe)| TickInput {
                held: Directions {
                    up: keys[0],
                    down: keys[1],
                    left: keys[2],
                    right: keys[3],
                },
                swipe: swipe.map(|(x, y)| Vec2::new(x, y)),
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_session_invariants(
            seed in any::<u64>(),
            per_tick in any::<bool>(),
            inputs in proptest::collection::vec(tick_input(), 1..400),
        ) {
            let tuning = Tuning {
                initial_creation_rate: 0.2,
                marketer_split_chance: 0.05,
                hit_policy: if per_tick { HitPolicy::PerTick } else { HitPolicy::OncePerWindow },
                ..Tuning::default()
            };
            let mut state = GameState::new(tuning, seed);
            start(&mut state);

            let (w, h) = (state.tuning.canvas_width, state.tuning.canvas_height);
            for input in &inputs {
                let (lives, score) = (state.lives, state.score);
                let running = state.phase == GamePhase::Running;
                tick(&mut state, input, SIM_DT);

                prop_assert!(state.lives <= lives);
                if running {
                    prop_assert_eq!(state.score, score + 1);
                }
                let p = &state.player;
                prop_assert!(p.pos.x >= p.radius && p.pos.x <= w - p.radius);
                prop_assert!(p.pos.y >= p.radius && p.pos.y <= h - p.radius);
                prop_assert!(state.obstacles.len() <= state.tuning.max_obstacles);
                for o in &state.obstacles {
                    prop_assert!(o.pos.is_finite());
                    prop_assert!(o.pos.x + o.radius > 0.0);
                }
            }
        }
    }
}
