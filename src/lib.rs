//! Dodgy Dodger - a side-scrolling arcade dodger
//!
//! Core modules:
//! - `sim`: Simulation (entities, obstacle behaviors, collisions, game state machine)
//! - `session`: Fixed-timestep driver wiring the simulation to its collaborators
//! - `platform`: Collaborator traits (renderer, input, audio, images, UI) and asset gate
//! - `tuning`: Data-driven game balance
//! - `settings`: Presentation preferences
//! - `input`: Keyboard/touch translation into per-tick input
//! - `renderer`: Frame snapshots, HUD text, Canvas 2D renderer (web)
//! - `audio`: Web Audio effects and background music (web)

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod input;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use session::{LoopControl, Session};
pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per frame on a 60 Hz display)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta fed into the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Playfield dimensions
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 30.0;
    pub const PLAYER_START_X: f32 = 50.0;
    pub const PLAYER_START_Y: f32 = 200.0;
    pub const PLAYER_ACCELERATION: f32 = 2.0;
    pub const PLAYER_FRICTION: f32 = 0.85;
    /// Step applied by a single touch swipe
    pub const PLAYER_NUDGE_SPEED: f32 = 15.0;
    pub const STARTING_LIVES: i32 = 10;

    /// Obstacle defaults
    pub const OBSTACLE_RADIUS: f32 = 50.0;
    pub const OBSTACLE_SPEED_MIN: f32 = 2.0;
    pub const OBSTACLE_SPEED_RANGE: f32 = 3.0;
    /// Spawn band excludes this many pixels at the bottom edge
    pub const SPAWN_BOTTOM_MARGIN: f32 = 40.0;
    /// Hard cap on live obstacles (spawns and splits)
    pub const MAX_OBSTACLES: usize = 48;

    /// Crypto promoter wobble
    pub const CRYPTO_FREQUENCY: f32 = 0.1;
    pub const CRYPTO_AMPLITUDE: f32 = 2.0;
    /// Solicitor homing step per tick
    pub const SOLICITOR_HOMING_STEP: f32 = 0.5;
    /// Marketer split rule
    pub const MARKETER_SPLIT_CHANCE: f64 = 0.001;
    pub const MARKETER_MIN_RADIUS: f32 = 20.0;
    pub const MARKETER_SHRINK: f32 = 0.7;
    pub const MARKETER_CLONE_OFFSET: f32 = 30.0;
    /// Fitness promoter per-tick speed multiplier
    pub const FITNESS_ACCELERATION: f32 = 1.001;

    /// Difficulty progression
    pub const INITIAL_DIFFICULTY: f32 = 1.0;
    pub const DIFFICULTY_STEP: f32 = 0.0001;
    pub const INITIAL_CREATION_RATE: f64 = 0.02;
    pub const CREATION_RATE_STEP: f64 = 0.000_002;

    /// Freeze-frame after a hit (seconds)
    pub const INVULNERABILITY_SECS: f64 = 0.5;
}
