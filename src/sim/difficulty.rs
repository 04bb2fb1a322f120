//! Difficulty progression
//!
//! Both knobs grow additively once per running tick with no ceiling. Spawn
//! probability saturates at 1.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    /// Multiplier on newly spawned obstacle speed (≥ 1)
    pub factor: f32,
    /// Per-tick spawn probability
    pub creation_rate: f64,
}

impl Difficulty {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            factor: tuning.initial_difficulty,
            creation_rate: tuning.initial_creation_rate,
        }
    }

    /// Advance by one tick
    pub fn advance(&mut self, tuning: &Tuning) {
        self.factor += tuning.difficulty_step;
        self.creation_rate += tuning.creation_rate_step;
    }

    /// Probability actually used for the spawn trial
    #[inline]
    pub fn spawn_probability(&self) -> f64 {
        self.creation_rate.clamp(0.0, 1.0)
    }
}
