//! Canvas 2D renderer (web only)

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::{
    FrameSnapshot, HUD_COLOR, HUD_FONT, LABEL_FADE, LABEL_FONT, PLAYER_COLOR, label_origin,
    placeholder_color, sprite_rect,
};
use crate::platform::{PlatformError, Renderer};
use crate::sim::{Obstacle, ObstacleKind, Player};

pub struct Canvas2dRenderer {
    ctx: CanvasRenderingContext2d,
    sprites: [Option<HtmlImageElement>; 4],
    avatar: Option<HtmlImageElement>,
}

impl Canvas2dRenderer {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, PlatformError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| PlatformError::Dom(format!("{e:?}")))?
            .ok_or_else(|| PlatformError::Dom("2d context unavailable".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| PlatformError::Dom("context is not 2d".into()))?;
        Ok(Self {
            ctx,
            sprites: Default::default(),
            avatar: None,
        })
    }

    /// Hand over a sprite element; it is drawn once it has finished decoding
    pub fn set_sprite(&mut self, kind: ObstacleKind, image: HtmlImageElement) {
        self.sprites[kind.index()] = Some(image);
    }

    pub fn set_avatar(&mut self, image: HtmlImageElement) {
        self.avatar = Some(image);
    }

    fn draw_player(&self, player: &Player, avatar_scale: f32) {
        let ctx = &self.ctx;
        let (x, y, r) = (player.pos.x as f64, player.pos.y as f64, player.radius as f64);

        ctx.save();
        ctx.begin_path();
        let _ = ctx.arc(x, y, r, 0.0, std::f64::consts::TAU);
        ctx.close_path();
        ctx.clip();

        match &self.avatar {
            Some(img) if is_decoded(img) => {
                let (dx, dy, dw, dh) = sprite_rect(player.pos, player.radius, avatar_scale);
                let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(img, dx, dy, dw, dh);
            }
            _ => {
                ctx.set_fill_style_str(PLAYER_COLOR);
                ctx.fill();
            }
        }

        ctx.restore();
    }

    fn draw_obstacle(&self, obstacle: &Obstacle, loaded: bool, labels: bool) {
        let ctx = &self.ctx;
        let sprite = self.sprites[obstacle.kind.index()]
            .as_ref()
            .filter(|img| loaded && is_decoded(img));

        match sprite {
            Some(img) => {
                let (dx, dy, dw, dh) = sprite_rect(obstacle.pos, obstacle.radius, 1.0);
                let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(img, dx, dy, dw, dh);
            }
            None => {
                ctx.begin_path();
                let _ = ctx.arc(
                    obstacle.pos.x as f64,
                    obstacle.pos.y as f64,
                    obstacle.radius as f64,
                    0.0,
                    std::f64::consts::TAU,
                );
                ctx.set_fill_style_str(placeholder_color(obstacle.kind));
                ctx.fill();
            }
        }

        if labels {
            self.draw_label(obstacle);
        }
    }

    /// Title under the sprite, fading out at both ends
    fn draw_label(&self, obstacle: &Obstacle) {
        let ctx = &self.ctx;
        let title = obstacle.title();
        ctx.set_font(LABEL_FONT);
        let width = ctx.measure_text(title).map(|m| m.width()).unwrap_or(0.0);
        let (x, y) = label_origin(obstacle, width);

        let gradient = ctx.create_linear_gradient(x - LABEL_FADE, 0.0, x + width + LABEL_FADE, 0.0);
        let _ = gradient.add_color_stop(0.0, "rgba(255, 255, 255, 0)");
        let _ = gradient.add_color_stop(0.1, "rgba(255, 255, 255, 1)");
        let _ = gradient.add_color_stop(0.9, "rgba(255, 255, 255, 1)");
        let _ = gradient.add_color_stop(1.0, "rgba(255, 255, 255, 0)");
        ctx.set_fill_style_canvas_gradient(&gradient);
        let _ = ctx.fill_text(title, x, y);
    }

    fn draw_hud(&self, frame: &FrameSnapshot<'_>) {
        let ctx = &self.ctx;
        ctx.set_fill_style_str(HUD_COLOR);
        ctx.set_font(HUD_FONT);
        let _ = ctx.fill_text(&frame.score_text(), 10.0, 30.0);
        let _ = ctx.fill_text(&frame.lives_text(), frame.canvas.x as f64 - 100.0, 30.0);
    }
}

impl Renderer for Canvas2dRenderer {
    fn draw(&mut self, frame: &FrameSnapshot<'_>) {
        self.ctx
            .clear_rect(0.0, 0.0, frame.canvas.x as f64, frame.canvas.y as f64);

        self.draw_player(frame.player, frame.settings.avatar_scale);
        for obstacle in frame.obstacles {
            let loaded = frame.assets.is_loaded(obstacle.kind);
            self.draw_obstacle(obstacle, loaded, frame.settings.obstacle_labels);
        }
        if frame.settings.show_hud {
            self.draw_hud(frame);
        }
    }
}

/// Image finished loading and has pixels
fn is_decoded(img: &HtmlImageElement) -> bool {
    img.complete() && img.natural_height() != 0
}
