//! Player controller
//!
//! Keyboard play is momentum based: held directions accelerate, friction
//! always bleeds speed off, so releasing every key glides to a stop. Touch play
//! nudges the avatar a fixed step per swipe instead.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::clamp_to_bounds;
use super::state::Player;

/// Directional keys held during a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directions {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Directions {
    /// Sum of unit steps for every held direction (screen space, +y is down)
    pub fn thrust(&self) -> Vec2 {
        let mut t = Vec2::ZERO;
        if self.left {
            t.x -= 1.0;
        }
        if self.right {
            t.x += 1.0;
        }
        if self.up {
            t.y -= 1.0;
        }
        if self.down {
            t.y += 1.0;
        }
        t
    }

    pub fn any(&self) -> bool {
        self.up || self.down || self.left || self.right
    }
}

impl Player {
    /// Accelerate, apply friction, integrate, clamp
    pub fn steer(&mut self, held: Directions, bounds: Vec2) {
        self.vel += held.thrust() * self.acceleration;
        self.vel *= self.friction;
        self.pos += self.vel;
        self.pos = clamp_to_bounds(self.pos, self.radius, bounds);
    }

    /// Move one step along the swipe's dominant axis, then clamp
    pub fn nudge(&mut self, swipe: Vec2, bounds: Vec2) {
        self.pos += swipe_step(swipe) * self.nudge_speed;
        self.pos = clamp_to_bounds(self.pos, self.radius, bounds);
    }
}

/// Unit step along the dominant axis of a swipe (vertical wins a tie)
pub fn swipe_step(swipe: Vec2) -> Vec2 {
    if swipe == Vec2::ZERO {
        Vec2::ZERO
    } else if swipe.x.abs() > swipe.y.abs() {
        Vec2::new(swipe.x.signum(), 0.0)
    } else {
        Vec2::new(0.0, swipe.y.signum())
    }
}
