//! Audio system using Web Audio API
//!
//! Collision and game-over effects are generated procedurally. Background music
//! streams from the page's `<audio>` element when one is present.

use wasm_bindgen_futures::JsFuture;
use web_sys::{AudioContext, GainNode, HtmlAudioElement, OscillatorNode, OscillatorType};

use crate::platform::{AudioPlayer, Clip, PlatformError};
use crate::settings::Settings;

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    music: Option<HtmlAudioElement>,
    sfx_volume: f32,
    music_volume: f32,
}

impl AudioManager {
    pub fn new(music: Option<HtmlAudioElement>, settings: &Settings) -> Self {
        // Fails outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - sound effects disabled");
        }
        if let Some(el) = &music {
            el.set_loop(true);
        }
        let mut audio = Self {
            ctx,
            music,
            sfx_volume: 0.0,
            music_volume: 0.0,
        };
        audio.apply_settings(settings);
        audio
    }

    /// Pick up volume/mute changes
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.sfx_volume = settings.effective_sfx_volume();
        self.music_volume = settings.effective_music_volume();
        if let Some(el) = &self.music {
            el.set_volume(self.music_volume as f64);
        }
    }

    fn context(&self) -> Result<&AudioContext, PlatformError> {
        let ctx = self
            .ctx
            .as_ref()
            .ok_or_else(|| PlatformError::Audio("no audio context".into()))?;
        // Browsers start the context suspended until a user gesture
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }
        Ok(ctx)
    }

    /// Restart the music element from the top
    ///
    /// The returned promise rejects under autoplay policies; that is logged
    /// from a spawned future since it resolves after this call returns.
    fn start_music(&self) -> Result<(), PlatformError> {
        let el = self
            .music
            .as_ref()
            .ok_or_else(|| PlatformError::Audio("no background music element".into()))?;
        el.set_current_time(0.0);
        let promise = el
            .play()
            .map_err(|e| PlatformError::Audio(format!("{e:?}")))?;
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                log::warn!("Background music blocked: {e:?}");
            }
        });
        Ok(())
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Result<(OscillatorNode, GainNode), PlatformError> {
        let err = |e: wasm_bindgen::JsValue| PlatformError::Audio(format!("{e:?}"));
        let osc = ctx.create_oscillator().map_err(err)?;
        let gain = ctx.create_gain().map_err(err)?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).map_err(err)?;
        gain.connect_with_audio_node(&ctx.destination()).map_err(err)?;

        Ok((osc, gain))
    }

    /// Collision - buzzy thud with a falling pitch
    fn play_collision(&self, ctx: &AudioContext, vol: f32) -> Result<(), PlatformError> {
        let t = ctx.current_time();

        let (osc, gain) = self.create_osc(ctx, 220.0, OscillatorType::Sawtooth)?;
        gain.gain().set_value_at_time(vol * 0.4, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.25)
            .ok();
        osc.frequency().set_value_at_time(220.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(55.0, t + 0.25)
            .ok();
        osc.start().ok();
        osc.stop_with_when(t + 0.3).ok();

        // Body
        let (osc, gain) = self.create_osc(ctx, 90.0, OscillatorType::Sine)?;
        gain.gain().set_value_at_time(vol * 0.5, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.15)
            .ok();
        osc.start().ok();
        osc.stop_with_when(t + 0.2).ok();
        Ok(())
    }

    /// Game over - descending tones
    fn play_game_over(&self, ctx: &AudioContext, vol: f32) -> Result<(), PlatformError> {
        for (i, freq) in [400.0, 350.0, 300.0, 200.0].iter().enumerate() {
            let delay = i as f64 * 0.2;
            let (osc, gain) = self.create_osc(ctx, *freq, OscillatorType::Sine)?;
            let t = ctx.current_time() + delay;
            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                .ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + 0.4).ok();
        }
        Ok(())
    }
}

impl AudioPlayer for AudioManager {
    fn play(&mut self, clip: Clip) -> Result<(), PlatformError> {
        match clip {
            Clip::BackgroundMusic => {
                if self.music_volume <= 0.0 {
                    return Ok(());
                }
                self.start_music()
            }
            Clip::Collision | Clip::GameOver => {
                let vol = self.sfx_volume;
                if vol <= 0.0 {
                    return Ok(());
                }
                let ctx = self.context()?;
                if clip == Clip::Collision {
                    self.play_collision(ctx, vol)
                } else {
                    self.play_game_over(ctx, vol)
                }
            }
        }
    }

    fn stop(&mut self, clip: Clip) {
        // Effects are fire-and-forget and end on their own
        if clip == Clip::BackgroundMusic
            && let Some(el) = &self.music
        {
            let _ = el.pause();
        }
    }
}
