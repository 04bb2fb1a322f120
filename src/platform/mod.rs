//! Platform abstraction layer
//!
//! The simulation never touches the browser. Everything it needs from the
//! outside world goes through these traits:
//! - `Renderer`: draws a read-only frame snapshot
//! - `InputSource`: polled once per tick
//! - `AudioPlayer`: fire-and-forget clips
//! - `ImageProvider`: asynchronous sprite loads, resolved via [`AssetGate`]
//! - `UiSurface`: start control, game-over summary, hit flash

pub mod assets;

pub use assets::{AssetGate, SpriteStatus};

use thiserror::Error;

use crate::renderer::FrameSnapshot;
use crate::sim::{GameOverSummary, ObstacleKind, TickInput};

/// Failures reported by host collaborators. None of these stop the game.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlatformError {
    #[error("failed to load image `{0}`")]
    ImageLoad(String),
    #[error("audio playback failed: {0}")]
    Audio(String),
    #[error("DOM error: {0}")]
    Dom(String),
}

/// Images the host loads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteId {
    Obstacle(ObstacleKind),
    /// User-uploaded profile picture
    Avatar,
}

/// Sound clips the session asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Clip {
    Collision,
    GameOver,
    BackgroundMusic,
}

pub trait Renderer {
    fn draw(&mut self, frame: &FrameSnapshot<'_>);
}

pub trait InputSource {
    /// Input for the next tick; one-shot input (swipes) is consumed
    fn poll(&mut self) -> TickInput;
}

pub trait AudioPlayer {
    fn play(&mut self, clip: Clip) -> Result<(), PlatformError>;
    fn stop(&mut self, clip: Clip);
}

pub trait ImageProvider {
    /// Begin loading; the host reports the outcome through
    /// [`crate::Session::sprite_resolved`]
    fn request(&mut self, sprite: SpriteId);
}

pub trait UiSurface {
    fn set_start_visible(&mut self, visible: bool);
    fn show_game_over(&mut self, summary: &GameOverSummary);
    fn hide_game_over(&mut self);
    fn set_flash(&mut self, on: bool);
}
