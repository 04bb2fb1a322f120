//! Session driver
//!
//! Owns the [`GameState`] and the host collaborators. The host calls
//! [`Session::frame`] from its animation callback; the session runs as many
//! fixed-timestep ticks as the elapsed wall time calls for, turns simulation
//! events into audio/UI side effects, draws once, and tells the host whether to
//! schedule another frame.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::platform::{
    AssetGate, AudioPlayer, Clip, ImageProvider, InputSource, PlatformError, Renderer, SpriteId,
    UiSurface,
};
use crate::renderer::FrameSnapshot;
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, ObstacleKind, start, tick};
use crate::tuning::Tuning;

/// Whether the host should request another animation frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Stop,
}

pub struct Session<R, A, U> {
    state: GameState,
    settings: Settings,
    assets: AssetGate,
    renderer: R,
    audio: A,
    ui: U,
    accumulator: f32,
    last_time: Option<f64>,
    loop_active: bool,
}

impl<R: Renderer, A: AudioPlayer, U: UiSurface> Session<R, A, U> {
    pub fn new(tuning: Tuning, seed: u64, settings: Settings, renderer: R, audio: A, mut ui: U) -> Self {
        ui.set_start_visible(false);
        ui.hide_game_over();
        ui.set_flash(false);
        Self {
            state: GameState::new(tuning, seed),
            settings,
            assets: AssetGate::new(),
            renderer,
            audio,
            ui,
            accumulator: 0.0,
            last_time: None,
            loop_active: false,
        }
    }

    /// Kick off loading of every obstacle sprite
    pub fn request_sprites(&self, images: &mut impl ImageProvider) {
        for kind in ObstacleKind::ALL {
            images.request(SpriteId::Obstacle(kind));
        }
    }

    /// A sprite load finished (either way). The start control appears once
    /// every obstacle sprite has resolved.
    pub fn sprite_resolved(&mut self, sprite: SpriteId, result: Result<(), PlatformError>) {
        match sprite {
            SpriteId::Obstacle(kind) => {
                if self.assets.resolve(kind, result) && self.state.phase != GamePhase::Running {
                    self.ui.set_start_visible(true);
                }
            }
            SpriteId::Avatar => match result {
                Ok(()) => {
                    log::info!("Avatar loaded");
                    self.state.player.has_avatar = true;
                }
                Err(e) => log::warn!("{e}; keeping the default avatar"),
            },
        }
    }

    /// Start control pressed
    ///
    /// Returns `true` if a run started; the host must then begin its frame loop.
    pub fn press_start(&mut self) -> bool {
        if !self.assets.is_ready() {
            log::warn!("Start pressed before sprites resolved");
            return false;
        }
        if !start(&mut self.state) {
            return false;
        }

        self.ui.set_start_visible(false);
        self.ui.hide_game_over();
        self.ui.set_flash(false);
        if self.settings.effective_music_volume() > 0.0 {
            self.play(Clip::BackgroundMusic);
        }

        self.accumulator = 0.0;
        self.last_time = None;
        self.loop_active = true;
        true
    }

    /// Advance by the wall time since the previous frame and draw
    ///
    /// `now_ms` is the animation-frame timestamp. Returns [`LoopControl::Stop`]
    /// once the run has ended; the host must not schedule another frame.
    pub fn frame(&mut self, now_ms: f64, input: &mut impl InputSource) -> LoopControl {
        if !self.loop_active {
            return LoopControl::Stop;
        }

        let dt = match self.last_time {
            Some(last) => (((now_ms - last) / 1000.0) as f32).clamp(0.0, MAX_FRAME_DT),
            None => SIM_DT,
        };
        self.last_time = Some(now_ms);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let tick_input = input.poll();
            let events = tick(&mut self.state, &tick_input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            self.dispatch(events);
            if self.state.phase != GamePhase::Running {
                self.accumulator = 0.0;
                break;
            }
        }
        // Drop time we could not catch up on
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }

        let frame = FrameSnapshot::new(&self.state, &self.assets, &self.settings);
        self.renderer.draw(&frame);

        if self.state.phase == GamePhase::Running {
            LoopControl::Continue
        } else {
            self.loop_active = false;
            LoopControl::Stop
        }
    }

    fn dispatch(&mut self, events: Vec<GameEvent>) {
        for event in events {
            match event {
                GameEvent::Hit { .. } => {
                    if self.settings.effective_sfx_volume() > 0.0 {
                        self.play(Clip::Collision);
                    }
                    if self.settings.hit_flash {
                        self.ui.set_flash(true);
                    }
                }
                GameEvent::InvulnerabilityEnded => self.ui.set_flash(false),
                GameEvent::GameOver(summary) => {
                    self.audio.stop(Clip::BackgroundMusic);
                    if self.settings.effective_sfx_volume() > 0.0 {
                        self.play(Clip::GameOver);
                    }
                    self.ui.set_flash(false);
                    self.ui.show_game_over(&summary);
                    self.ui.set_start_visible(true);
                }
                GameEvent::Spawned { id, kind } => {
                    log::trace!("Spawned {} (id {id})", kind.title());
                }
                GameEvent::Split { parent, child } => {
                    log::trace!("Obstacle {parent} split off {child}");
                }
            }
        }
    }

    /// Audio failures are logged and otherwise ignored
    fn play(&mut self, clip: Clip) {
        if let Err(e) = self.audio.play(clip) {
            log::warn!("{e}");
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for hosts and tests that stage scenarios
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn assets(&self) -> &AssetGate {
        &self.assets
    }

    pub fn is_looping(&self) -> bool {
        self.loop_active
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }
}
