//! Game state and core simulation types
//!
//! One [`GameState`] holds everything a play session mutates. It is passed
//! explicitly to every simulation operation; nothing lives in globals.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::Difficulty;
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the start control
    #[default]
    Idle,
    /// Simulation ticking
    Running,
    /// Run ended, summary on screen
    GameOver,
}

/// The four obstacle archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Homes toward the player
    Solicitor,
    /// Occasionally shrinks and splits off a clone
    Marketer,
    /// Accelerates every tick
    FitnessPromoter,
    /// Wobbles vertically
    CryptoPromoter,
}

impl ObstacleKind {
    /// All kinds, in tally and tie-break order
    pub const ALL: [ObstacleKind; 4] = [
        ObstacleKind::Solicitor,
        ObstacleKind::Marketer,
        ObstacleKind::FitnessPromoter,
        ObstacleKind::CryptoPromoter,
    ];

    /// Display label drawn under the sprite and used in the game-over message
    pub fn title(&self) -> &'static str {
        match self {
            ObstacleKind::Solicitor => "Only Fans Creator",
            ObstacleKind::Marketer => "Network Marketer",
            ObstacleKind::FitnessPromoter => "Fitness Bro",
            ObstacleKind::CryptoPromoter => "Crypto Bro",
        }
    }

    /// Sprite identifier the image provider loads for this kind
    pub fn sprite_key(&self) -> &'static str {
        match self {
            ObstacleKind::Solicitor => "onlyfans",
            ObstacleKind::Marketer => "marketer",
            ObstacleKind::FitnessPromoter => "fitness",
            ObstacleKind::CryptoPromoter => "crypto",
        }
    }

    /// Position in [`ObstacleKind::ALL`]
    #[inline]
    pub fn index(&self) -> usize {
        match self {
            ObstacleKind::Solicitor => 0,
            ObstacleKind::Marketer => 1,
            ObstacleKind::FitnessPromoter => 2,
            ObstacleKind::CryptoPromoter => 3,
        }
    }
}

/// The player's avatar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Velocity added per held direction per tick
    pub acceleration: f32,
    /// Velocity multiplier applied every tick, in (0, 1)
    pub friction: f32,
    /// Position step for a touch swipe
    pub nudge_speed: f32,
    /// A custom avatar image has been uploaded (renderer concern)
    #[serde(default)]
    pub has_avatar: bool,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: tuning.player_start,
            vel: Vec2::ZERO,
            radius: tuning.player_radius,
            acceleration: tuning.player_acceleration,
            friction: tuning.player_friction,
            nudge_speed: tuning.player_nudge_speed,
            has_avatar: false,
        }
    }

    /// Back to the start position, at rest
    pub fn reset(&mut self, tuning: &Tuning) {
        self.pos = tuning.player_start;
        self.vel = Vec2::ZERO;
    }
}

/// A moving obstacle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub pos: Vec2,
    pub radius: f32,
    /// Leftward drift per tick
    pub speed: f32,
}

impl Obstacle {
    #[inline]
    pub fn title(&self) -> &'static str {
        self.kind.title()
    }

    /// Fully past the left edge
    #[inline]
    pub fn is_off_screen(&self) -> bool {
        self.pos.x + self.radius <= 0.0
    }
}

/// Cumulative hits per obstacle kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitCounts([u32; 4]);

impl HitCounts {
    pub fn record(&mut self, kind: ObstacleKind) {
        self.0[kind.index()] += 1;
    }

    pub fn get(&self, kind: ObstacleKind) -> u32 {
        self.0[kind.index()]
    }

    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    pub fn clear(&mut self) {
        self.0 = [0; 4];
    }

    /// Kind with the most hits; the first maximum in [`ObstacleKind::ALL`]
    /// order wins ties. `None` when nothing has hit the player yet.
    pub fn most_frequent(&self) -> Option<ObstacleKind> {
        let mut best: Option<(ObstacleKind, u32)> = None;
        for kind in ObstacleKind::ALL {
            let count = self.get(kind);
            if count > 0 && best.is_none_or(|(_, c)| count > c) {
                best = Some((kind, count));
            }
        }
        best.map(|(kind, _)| kind)
    }
}

/// What the UI shows when a run ends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameOverSummary {
    pub score: u64,
    pub offender: Option<ObstacleKind>,
    pub hit_counts: HitCounts,
    pub message: String,
}

impl GameOverSummary {
    pub fn new(score: u64, hit_counts: HitCounts) -> Self {
        let offender = hit_counts.most_frequent();
        let message = match offender {
            Some(kind) => format!("{} spammed you to death!", kind.title()),
            None => "You ran out of lives!".to_string(),
        };
        Self {
            score,
            offender,
            hit_counts,
            message,
        }
    }
}

/// Things that happened during a tick, for audio/UI side effects
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Spawned { id: u32, kind: ObstacleKind },
    Split { parent: u32, child: u32 },
    Hit { id: u32, kind: ObstacleKind, lives_left: i32 },
    InvulnerabilityEnded,
    GameOver(GameOverSummary),
}

/// Complete simulation state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub player: Player,
    /// Live obstacles, ascending by id
    pub obstacles: Vec<Obstacle>,
    pub score: u64,
    pub lives: i32,
    pub hit_counts: HitCounts,
    pub difficulty: Difficulty,
    /// Simulation-clock deadline (seconds) until which hits are ignored
    pub invulnerable_until: Option<f64>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Simulation clock (seconds)
    pub elapsed: f64,
    pub rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Create an idle session with the given tuning and RNG seed
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        Self {
            player: Player::new(&tuning),
            difficulty: Difficulty::new(&tuning),
            lives: tuning.starting_lives,
            tuning,
            phase: GamePhase::Idle,
            obstacles: Vec::new(),
            score: 0,
            hit_counts: HitCounts::default(),
            invulnerable_until: None,
            time_ticks: 0,
            elapsed: 0.0,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Hits are currently ignored and motion is frozen
    #[inline]
    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_until.is_some()
    }

    /// Room for another obstacle under the live cap
    #[inline]
    pub fn has_obstacle_capacity(&self) -> bool {
        self.obstacles.len() < self.tuning.max_obstacles
    }

    /// Ensure obstacles are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.obstacles.sort_by_key(|o| o.id);
    }
}
