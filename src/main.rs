//! Dodgy Dodger entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        Document, Element, FileReader, HtmlAudioElement, HtmlCanvasElement, HtmlElement,
        HtmlImageElement, HtmlInputElement, KeyboardEvent, TouchEvent,
    };

    use dodgy_dodger::audio::AudioManager;
    use dodgy_dodger::input::InputState;
    use dodgy_dodger::platform::{ImageProvider, PlatformError, SpriteId, UiSurface};
    use dodgy_dodger::renderer::Canvas2dRenderer;
    use dodgy_dodger::sim::{GameOverSummary, ObstacleKind};
    use dodgy_dodger::{LoopControl, Session, Settings, Tuning};

    type WebSession = Session<Canvas2dRenderer, AudioManager, DomUi>;

    /// Game instance holding all state
    struct Game {
        session: WebSession,
        input: InputState,
    }

    type SharedGame = Rc<RefCell<Game>>;

    fn sprite_url(kind: ObstacleKind) -> &'static str {
        match kind {
            ObstacleKind::Solicitor => {
                "https://raw.githubusercontent.com/heybobjones/dodgy-dodger/main/images/OFCreator.png"
            }
            ObstacleKind::Marketer => {
                "https://raw.githubusercontent.com/heybobjones/dodgy-dodger/main/images/NetworkMarketer.png"
            }
            ObstacleKind::FitnessPromoter => {
                "https://raw.githubusercontent.com/heybobjones/dodgy-dodger/main/images/FitnessBro.png"
            }
            ObstacleKind::CryptoPromoter => {
                "https://raw.githubusercontent.com/heybobjones/dodgy-dodger/main/images/CryptoBro.png"
            }
        }
    }

    fn dom_err(e: JsValue) -> PlatformError {
        PlatformError::Dom(format!("{e:?}"))
    }

    fn element<T: JsCast>(document: &Document, id: &str) -> Option<T> {
        document.get_element_by_id(id)?.dyn_into::<T>().ok()
    }

    /// Start button, game-over panel and hit flash
    struct DomUi {
        start: Option<HtmlElement>,
        game_over: Option<HtmlElement>,
        subheader: Option<Element>,
        flash: Option<HtmlElement>,
    }

    impl DomUi {
        fn new(document: &Document) -> Self {
            let ui = Self {
                start: element(document, "startGame"),
                game_over: element(document, "gameOver"),
                subheader: document.get_element_by_id("gameOverSubheader"),
                flash: element(document, "flashOverlay"),
            };
            if ui.start.is_none() {
                log::warn!("No #startGame element - the game cannot be started");
            }
            ui
        }
    }

    fn set_display(el: Option<&HtmlElement>, visible: bool) {
        if let Some(el) = el {
            let _ = el
                .style()
                .set_property("display", if visible { "block" } else { "none" });
        }
    }

    impl UiSurface for DomUi {
        fn set_start_visible(&mut self, visible: bool) {
            set_display(self.start.as_ref(), visible);
        }

        fn show_game_over(&mut self, summary: &GameOverSummary) {
            if let Some(el) = &self.subheader {
                let text = match summary.offender {
                    Some(_) => format!("{} 💀", summary.message),
                    None => summary.message.clone(),
                };
                el.set_text_content(Some(&text));
            }
            set_display(self.game_over.as_ref(), true);
        }

        fn hide_game_over(&mut self) {
            set_display(self.game_over.as_ref(), false);
        }

        fn set_flash(&mut self, on: bool) {
            set_display(self.flash.as_ref(), on);
        }
    }

    /// Loads sprites with `<img>` elements and reports back into the session
    struct WebImages {
        game: SharedGame,
    }

    impl ImageProvider for WebImages {
        fn request(&mut self, sprite: SpriteId) {
            let SpriteId::Obstacle(kind) = sprite else {
                return;
            };
            let url = sprite_url(kind);
            let img = match HtmlImageElement::new() {
                Ok(img) => img,
                Err(e) => {
                    log::error!("Could not create image element: {e:?}");
                    return;
                }
            };

            let onload = {
                let game = self.game.clone();
                let img = img.clone();
                Closure::<dyn FnMut()>::new(move || {
                    let mut g = game.borrow_mut();
                    g.session.renderer_mut().set_sprite(kind, img.clone());
                    g.session.sprite_resolved(sprite, Ok(()));
                })
            };
            let onerror = {
                let game = self.game.clone();
                Closure::<dyn FnMut()>::new(move || {
                    game.borrow_mut()
                        .session
                        .sprite_resolved(sprite, Err(PlatformError::ImageLoad(url.to_string())));
                })
            };
            img.set_onload(Some(onload.as_ref().unchecked_ref()));
            img.set_onerror(Some(onerror.as_ref().unchecked_ref()));
            onload.forget();
            onerror.forget();
            img.set_src(url);
        }
    }

    /// Tuning overrides from `<script id="tuning" type="application/json">`
    fn load_tuning(document: &Document) -> Tuning {
        let Some(json) = document
            .get_element_by_id("tuning")
            .and_then(|el| el.text_content())
        else {
            return Tuning::default();
        };
        match Tuning::from_json(&json) {
            Ok(tuning) => {
                log::info!("Loaded tuning overrides");
                tuning
            }
            Err(e) => {
                log::error!("{e}; using default tuning");
                Tuning::default()
            }
        }
    }

    pub fn run() -> Result<(), PlatformError> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Dodgy Dodger starting...");

        let window = web_sys::window().ok_or_else(|| PlatformError::Dom("no window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| PlatformError::Dom("no document".into()))?;

        let canvas: HtmlCanvasElement = element(&document, "gameCanvas")
            .ok_or_else(|| PlatformError::Dom("no #gameCanvas".into()))?;

        let tuning = load_tuning(&document);
        let size = tuning.canvas_size();
        canvas.set_width(size.x as u32);
        canvas.set_height(size.y as u32);

        let settings = Settings::default();
        let renderer = Canvas2dRenderer::new(&canvas)?;
        let music: Option<HtmlAudioElement> = element(&document, "backgroundMusic");
        let audio = AudioManager::new(music, &settings);
        let ui = DomUi::new(&document);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game {
            session: Session::new(tuning, seed, settings, renderer, audio, ui),
            input: InputState::new(),
        }));
        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&document, &canvas, game.clone())?;
        setup_avatar_upload(&document, game.clone())?;
        setup_start_button(&document, game.clone())?;

        let mut images = WebImages { game: game.clone() };
        game.borrow().session.request_sprites(&mut images);

        Ok(())
    }

    fn setup_input_handlers(
        document: &Document,
        canvas: &HtmlCanvasElement,
        game: SharedGame,
    ) -> Result<(), PlatformError> {
        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if game.borrow_mut().input.key_down(&event.key()) {
                    event.prevent_default();
                }
            });
            document
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())
                .map_err(dom_err)?;
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().input.key_up(&event.key());
            });
            document
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())
                .map_err(dom_err)?;
            closure.forget();
        }

        // Window blur - key-up events are lost
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().input.release_all();
            });
            let window = web_sys::window().ok_or_else(|| PlatformError::Dom("no window".into()))?;
            window
                .add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())
                .map_err(dom_err)?;
            closure.forget();
        }

        // Touch swipes
        fn first_touch(event: &TouchEvent) -> Option<Vec2> {
            let touch = event.touches().get(0)?;
            Some(Vec2::new(touch.client_x() as f32, touch.client_y() as f32))
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if let Some(at) = first_touch(&event) {
                    game.borrow_mut().input.touch_start(at);
                }
            });
            canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())
                .map_err(dom_err)?;
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(at) = first_touch(&event) {
                    game.borrow_mut().input.touch_move(at);
                }
            });
            canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref())
                .map_err(dom_err)?;
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                game.borrow_mut().input.touch_end();
            });
            canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref())
                .map_err(dom_err)?;
            closure.forget();
        }

        Ok(())
    }

    /// Profile picture: file input -> data URL -> image -> avatar
    fn setup_avatar_upload(document: &Document, game: SharedGame) -> Result<(), PlatformError> {
        let Some(upload) = element::<HtmlInputElement>(document, "profilePicUpload") else {
            log::info!("No #profilePicUpload element - avatar upload disabled");
            return Ok(());
        };

        let input = upload.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(file) = input.files().and_then(|files| files.get(0)) else {
                return;
            };
            if let Err(e) = read_avatar(&file, game.clone()) {
                log::warn!("{e}");
            }
        });
        upload
            .add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())
            .map_err(dom_err)?;
        closure.forget();
        Ok(())
    }

    fn read_avatar(file: &web_sys::File, game: SharedGame) -> Result<(), PlatformError> {
        let reader = FileReader::new().map_err(dom_err)?;
        let name = file.name();

        let onload = {
            let reader = reader.clone();
            Closure::<dyn FnMut()>::new(move || {
                let Some(data_url) = reader.result().ok().and_then(|r| r.as_string()) else {
                    game.borrow_mut()
                        .session
                        .sprite_resolved(SpriteId::Avatar, Err(PlatformError::ImageLoad(name.clone())));
                    return;
                };
                if let Err(e) = decode_avatar(&data_url, &name, game.clone()) {
                    log::warn!("{e}");
                }
            })
        };
        reader.set_onload(Some(onload.as_ref().unchecked_ref()));
        onload.forget();
        reader.read_as_data_url(file).map_err(dom_err)
    }

    fn decode_avatar(data_url: &str, name: &str, game: SharedGame) -> Result<(), PlatformError> {
        let img = HtmlImageElement::new().map_err(dom_err)?;

        let onload = {
            let game = game.clone();
            let img = img.clone();
            Closure::<dyn FnMut()>::new(move || {
                let mut g = game.borrow_mut();
                g.session.renderer_mut().set_avatar(img.clone());
                g.session.sprite_resolved(SpriteId::Avatar, Ok(()));
            })
        };
        let onerror = {
            let name = name.to_string();
            Closure::<dyn FnMut()>::new(move || {
                game.borrow_mut()
                    .session
                    .sprite_resolved(SpriteId::Avatar, Err(PlatformError::ImageLoad(name.clone())));
            })
        };
        img.set_onload(Some(onload.as_ref().unchecked_ref()));
        img.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        onload.forget();
        onerror.forget();
        img.set_src(data_url);
        Ok(())
    }

    fn setup_start_button(document: &Document, game: SharedGame) -> Result<(), PlatformError> {
        let Some(btn) = document.get_element_by_id("startGame") else {
            return Ok(());
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            let started = game.borrow_mut().session.press_start();
            if started {
                request_animation_frame(game.clone());
            }
        });
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
            .map_err(dom_err)?;
        closure.forget();
        Ok(())
    }

    fn request_animation_frame(game: SharedGame) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: SharedGame, time: f64) {
        let control = {
            let mut g = game.borrow_mut();
            let Game { session, input } = &mut *g;
            session.frame(time, input)
        };

        if control == LoopControl::Continue {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = wasm_game::run() {
        log::error!("Dodgy Dodger failed to start: {e}");
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless demo: plays one run with a zig-zag autopilot and logs the outcome
#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use dodgy_dodger::{LoopControl, Session, Settings, Tuning};

    env_logger::init();
    log::info!("Dodgy Dodger (native) starting...");
    log::info!("Native mode runs headless - build for wasm32 to play in a browser");

    let tuning = match std::env::args().nth(1) {
        Some(path) => Tuning::from_json(&std::fs::read_to_string(&path)?)?,
        None => Tuning::default(),
    };

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)?
        .as_secs();
    let mut session = Session::new(
        tuning,
        seed,
        Settings::default(),
        headless::NullRenderer,
        headless::LogAudio,
        headless::LogUi::default(),
    );
    for kind in dodgy_dodger::sim::ObstacleKind::ALL {
        session.sprite_resolved(dodgy_dodger::platform::SpriteId::Obstacle(kind), Ok(()));
    }
    if !session.press_start() {
        return Err("session refused to start".into());
    }

    let mut autopilot = headless::Autopilot::default();
    let mut now = 0.0;
    // An hour of play at 60 Hz
    for _ in 0..60 * 60 * 60 {
        if session.frame(now, &mut autopilot) == LoopControl::Stop {
            break;
        }
        now += 1000.0 / 60.0;
    }

    match &session.ui().summary {
        Some(summary) => println!("{} Final score: {}", summary.message, summary.score),
        None => println!("Survived the demo with score {}", session.state().score),
    }
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use dodgy_dodger::platform::{AudioPlayer, Clip, InputSource, PlatformError, Renderer, UiSurface};
    use dodgy_dodger::renderer::FrameSnapshot;
    use dodgy_dodger::sim::{Directions, GameOverSummary, TickInput};

    pub struct NullRenderer;

    impl Renderer for NullRenderer {
        fn draw(&mut self, _frame: &FrameSnapshot<'_>) {}
    }

    pub struct LogAudio;

    impl AudioPlayer for LogAudio {
        fn play(&mut self, clip: Clip) -> Result<(), PlatformError> {
            log::debug!("play {clip:?}");
            Ok(())
        }

        fn stop(&mut self, clip: Clip) {
            log::debug!("stop {clip:?}");
        }
    }

    #[derive(Default)]
    pub struct LogUi {
        pub summary: Option<GameOverSummary>,
    }

    impl UiSurface for LogUi {
        fn set_start_visible(&mut self, _visible: bool) {}

        fn show_game_over(&mut self, summary: &GameOverSummary) {
            log::info!("Game over: {summary:?}");
            self.summary = Some(summary.clone());
        }

        fn hide_game_over(&mut self) {
            self.summary = None;
        }

        fn set_flash(&mut self, _on: bool) {}
    }

    /// Sweeps up and down the playfield
    #[derive(Default)]
    pub struct Autopilot {
        ticks: u32,
    }

    impl InputSource for Autopilot {
        fn poll(&mut self) -> TickInput {
            self.ticks = self.ticks.wrapping_add(1);
            let going_down = (self.ticks / 90) % 2 == 0;
            TickInput {
                held: Directions {
                    up: !going_down,
                    down: going_down,
                    ..Directions::default()
                },
                swipe: None,
            }
        }
    }
}
