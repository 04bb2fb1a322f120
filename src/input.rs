//! Keyboard and touch translation
//!
//! DOM handlers feed raw key names and touch points in; the session polls a
//! [`TickInput`] out once per simulation tick.

use glam::Vec2;

use crate::platform::InputSource;
use crate::sim::{Directions, TickInput};

/// Accumulated input between ticks
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: Directions,
    last_touch: Option<Vec2>,
    pending_swipe: Option<Vec2>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the key is one the game uses
    pub fn key_down(&mut self, key: &str) -> bool {
        self.set_key(key, true)
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        self.set_key(key, false)
    }

    fn set_key(&mut self, key: &str, pressed: bool) -> bool {
        let slot = match key {
            "ArrowUp" => &mut self.held.up,
            "ArrowDown" => &mut self.held.down,
            "ArrowLeft" => &mut self.held.left,
            "ArrowRight" => &mut self.held.right,
            _ => return false,
        };
        *slot = pressed;
        true
    }

    /// Window lost focus; key-up events will never arrive
    pub fn release_all(&mut self) {
        self.held = Directions::default();
        self.last_touch = None;
    }

    pub fn touch_start(&mut self, at: Vec2) {
        self.last_touch = Some(at);
    }

    /// Accumulate movement since the last touch point into the pending swipe
    pub fn touch_move(&mut self, at: Vec2) {
        if let Some(last) = self.last_touch {
            let delta = at - last;
            self.pending_swipe = Some(self.pending_swipe.unwrap_or(Vec2::ZERO) + delta);
        }
        self.last_touch = Some(at);
    }

    pub fn touch_end(&mut self) {
        self.last_touch = None;
    }

    pub fn held(&self) -> Directions {
        self.held
    }
}

impl InputSource for InputState {
    fn poll(&mut self) -> TickInput {
        TickInput {
            held: self.held,
            swipe: self.pending_swipe.take(),
        }
    }
}
