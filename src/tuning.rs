//! Data-driven game balance
//!
//! Every gameplay constant lives in [`Tuning`]. Missing JSON fields fall back to
//! the defaults in [`crate::consts`], so a tuning file only needs the knobs it
//! changes.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::HitPolicy;

/// Errors produced while loading or validating a tuning record
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tuning field `{field}` is out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },
}

/// Gameplay constants for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Playfield ===
    pub canvas_width: f32,
    pub canvas_height: f32,

    // === Player ===
    pub starting_lives: i32,
    pub player_radius: f32,
    pub player_start: Vec2,
    pub player_acceleration: f32,
    pub player_friction: f32,
    pub player_nudge_speed: f32,

    // === Obstacles ===
    pub obstacle_radius: f32,
    pub obstacle_speed_min: f32,
    pub obstacle_speed_range: f32,
    pub spawn_bottom_margin: f32,
    pub max_obstacles: usize,
    /// Push overlapping obstacles apart every tick
    pub resolve_overlaps: bool,

    // === Per-kind behavior ===
    pub crypto_frequency: f32,
    pub crypto_amplitude: f32,
    pub solicitor_homing_step: f32,
    pub marketer_split_chance: f64,
    pub marketer_min_radius: f32,
    pub marketer_shrink: f32,
    pub marketer_clone_offset: f32,
    pub fitness_acceleration: f32,

    // === Difficulty ===
    pub initial_difficulty: f32,
    pub difficulty_step: f32,
    pub initial_creation_rate: f64,
    pub creation_rate_step: f64,

    // === Collisions ===
    pub invulnerability_secs: f64,
    pub hit_policy: HitPolicy,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,

            starting_lives: STARTING_LIVES,
            player_radius: PLAYER_RADIUS,
            player_start: Vec2::new(PLAYER_START_X, PLAYER_START_Y),
            player_acceleration: PLAYER_ACCELERATION,
            player_friction: PLAYER_FRICTION,
            player_nudge_speed: PLAYER_NUDGE_SPEED,

            obstacle_radius: OBSTACLE_RADIUS,
            obstacle_speed_min: OBSTACLE_SPEED_MIN,
            obstacle_speed_range: OBSTACLE_SPEED_RANGE,
            spawn_bottom_margin: SPAWN_BOTTOM_MARGIN,
            max_obstacles: MAX_OBSTACLES,
            resolve_overlaps: true,

            crypto_frequency: CRYPTO_FREQUENCY,
            crypto_amplitude: CRYPTO_AMPLITUDE,
            solicitor_homing_step: SOLICITOR_HOMING_STEP,
            marketer_split_chance: MARKETER_SPLIT_CHANCE,
            marketer_min_radius: MARKETER_MIN_RADIUS,
            marketer_shrink: MARKETER_SHRINK,
            marketer_clone_offset: MARKETER_CLONE_OFFSET,
            fitness_acceleration: FITNESS_ACCELERATION,

            initial_difficulty: INITIAL_DIFFICULTY,
            difficulty_step: DIFFICULTY_STEP,
            initial_creation_rate: INITIAL_CREATION_RATE,
            creation_rate_step: CREATION_RATE_STEP,

            invulnerability_secs: INVULNERABILITY_SECS,
            hit_policy: HitPolicy::default(),
        }
    }
}

impl Tuning {
    /// The seven-life variant of the game
    pub fn short_fuse() -> Self {
        Self {
            starting_lives: 7,
            ..Self::default()
        }
    }

    /// Parse a (possibly partial) tuning record and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check every field against the range the simulation relies on
    pub fn validate(&self) -> Result<(), TuningError> {
        fn check(field: &'static str, value: f64, ok: bool) -> Result<(), TuningError> {
            if ok && value.is_finite() {
                Ok(())
            } else {
                Err(TuningError::OutOfRange { field, value })
            }
        }

        let w = self.canvas_width as f64;
        let h = self.canvas_height as f64;
        let r = self.player_radius as f64;

        check("player_radius", r, r > 0.0)?;
        check("canvas_width", w, w > 2.0 * r)?;
        check("canvas_height", h, h > 2.0 * r)?;
        check(
            "spawn_bottom_margin",
            self.spawn_bottom_margin as f64,
            (0.0..h).contains(&(self.spawn_bottom_margin as f64)),
        )?;
        check(
            "starting_lives",
            self.starting_lives as f64,
            self.starting_lives >= 1,
        )?;
        check(
            "player_acceleration",
            self.player_acceleration as f64,
            self.player_acceleration >= 0.0,
        )?;
        check(
            "player_friction",
            self.player_friction as f64,
            self.player_friction > 0.0 && self.player_friction < 1.0,
        )?;
        check(
            "player_nudge_speed",
            self.player_nudge_speed as f64,
            self.player_nudge_speed >= 0.0,
        )?;
        check(
            "obstacle_radius",
            self.obstacle_radius as f64,
            self.obstacle_radius > 0.0,
        )?;
        check(
            "obstacle_speed_min",
            self.obstacle_speed_min as f64,
            self.obstacle_speed_min >= 0.0,
        )?;
        check(
            "obstacle_speed_range",
            self.obstacle_speed_range as f64,
            self.obstacle_speed_range >= 0.0,
        )?;
        check(
            "marketer_split_chance",
            self.marketer_split_chance,
            (0.0..=1.0).contains(&self.marketer_split_chance),
        )?;
        check(
            "marketer_shrink",
            self.marketer_shrink as f64,
            self.marketer_shrink > 0.0 && self.marketer_shrink < 1.0,
        )?;
        check(
            "fitness_acceleration",
            self.fitness_acceleration as f64,
            self.fitness_acceleration >= 1.0,
        )?;
        check(
            "initial_difficulty",
            self.initial_difficulty as f64,
            self.initial_difficulty >= 1.0,
        )?;
        check(
            "difficulty_step",
            self.difficulty_step as f64,
            self.difficulty_step >= 0.0,
        )?;
        check(
            "initial_creation_rate",
            self.initial_creation_rate,
            (0.0..1.0).contains(&self.initial_creation_rate),
        )?;
        check(
            "creation_rate_step",
            self.creation_rate_step,
            self.creation_rate_step >= 0.0,
        )?;
        check(
            "invulnerability_secs",
            self.invulnerability_secs,
            self.invulnerability_secs >= 0.0,
        )?;

        Ok(())
    }

    /// Playfield size as a vector
    #[inline]
    pub fn canvas_size(&self) -> Vec2 {
        Vec2::new(self.canvas_width, self.canvas_height)
    }
}
