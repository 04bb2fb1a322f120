//! Simulation module
//!
//! All gameplay logic lives here:
//! - Fixed timestep only
//! - One owned RNG per session
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod geometry;
pub mod obstacle;
pub mod player;
pub mod state;
pub mod tick;

pub use collision::{HitPolicy, check_collisions};
pub use difficulty::Difficulty;
pub use obstacle::{resolve_overlaps, spawn_obstacle, update_obstacles};
pub use player::Directions;
pub use state::{
    GameEvent, GameOverSummary, GamePhase, GameState, HitCounts, Obstacle, ObstacleKind, Player,
};
pub use tick::{TickInput, reset_to_idle, start, tick};
