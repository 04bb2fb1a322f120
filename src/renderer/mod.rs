//! Rendering
//!
//! The session hands the renderer a [`FrameSnapshot`] once per frame. Layout
//! math lives here so it can be tested natively; the Canvas 2D backend in
//! `canvas` only issues draw calls.

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::Canvas2dRenderer;

use glam::Vec2;

use crate::platform::AssetGate;
use crate::settings::Settings;
use crate::sim::{GamePhase, GameState, Obstacle, ObstacleKind, Player};

pub const HUD_FONT: &str = "20px Courier New";
pub const HUD_COLOR: &str = "#0F0";
pub const LABEL_FONT: &str = "14px Arial";
/// Player fill when no avatar has been uploaded
pub const PLAYER_COLOR: &str = "#0F0";
/// Gap between an obstacle's bottom edge and its label baseline
pub const LABEL_GAP: f32 = 20.0;
/// Label fade-out margin on each side of the text
pub const LABEL_FADE: f64 = 50.0;

/// Read-only view of everything drawn in one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameSnapshot<'a> {
    pub phase: GamePhase,
    pub canvas: Vec2,
    pub player: &'a Player,
    pub obstacles: &'a [Obstacle],
    pub score: u64,
    pub lives: i32,
    pub invulnerable: bool,
    pub assets: &'a AssetGate,
    pub settings: &'a Settings,
}

impl<'a> FrameSnapshot<'a> {
    pub fn new(state: &'a GameState, assets: &'a AssetGate, settings: &'a Settings) -> Self {
        Self {
            phase: state.phase,
            canvas: state.tuning.canvas_size(),
            player: &state.player,
            obstacles: &state.obstacles,
            score: state.score,
            lives: state.lives,
            invulnerable: state.is_invulnerable(),
            assets,
            settings,
        }
    }

    pub fn score_text(&self) -> String {
        format!("Score: {}", self.score)
    }

    pub fn lives_text(&self) -> String {
        format!("Lives: {}", self.lives.max(0))
    }
}

/// Axis-aligned box (x, y, width, height)
pub type Rect = (f64, f64, f64, f64);

/// Box a circle's sprite is stretched into, optionally scaled about its centre
pub fn sprite_rect(center: Vec2, radius: f32, scale: f32) -> Rect {
    let half = (radius * scale) as f64;
    (
        center.x as f64 - half,
        center.y as f64 - half,
        half * 2.0,
        half * 2.0,
    )
}

/// Left end of a label centred under an obstacle, given the measured text width
pub fn label_origin(obstacle: &Obstacle, text_width: f64) -> (f64, f64) {
    (
        obstacle.pos.x as f64 - text_width / 2.0,
        (obstacle.pos.y + obstacle.radius + LABEL_GAP) as f64,
    )
}

/// Fill for an obstacle whose sprite failed to load
pub fn placeholder_color(kind: ObstacleKind) -> &'static str {
    match kind {
        ObstacleKind::Solicitor => "#e05a9c",
        ObstacleKind::Marketer => "#e0b03a",
        ObstacleKind::FitnessPromoter => "#3ac0e0",
        ObstacleKind::CryptoPromoter => "#f08c2c",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn test_snapshot_hud_text() {
        let mut state = GameState::new(Tuning::default(), 1);
        state.score = 420;
        state.lives = -1;
        let assets = AssetGate::new();
        let settings = Settings::default();
        let frame = FrameSnapshot::new(&state, &assets, &settings);
        assert_eq!(frame.score_text(), "Score: 420");
        assert_eq!(frame.lives_text(), "Lives: 0");
        assert_eq!(frame.canvas, Vec2::new(800.0, 600.0));
    }

    #[test]
    fn test_sprite_rect_scaled() {
        let (x, y, w, h) = sprite_rect(Vec2::new(100.0, 100.0), 30.0, 1.5);
        assert_eq!((x, y, w, h), (55.0, 55.0, 90.0, 90.0));
    }

    #[test]
    fn test_label_under_obstacle() {
        let o = Obstacle {
            id: 1,
            kind: ObstacleKind::Marketer,
            pos: Vec2::new(300.0, 200.0),
            radius: 50.0,
            speed: 2.0,
        };
        assert_eq!(label_origin(&o, 80.0), (260.0, 270.0));
    }
}
