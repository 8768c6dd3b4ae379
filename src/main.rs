//! Cosmic Parasite entry point
//!
//! Browser builds run the real game on a WebGPU canvas. Native builds run a
//! headless autopilot session, which is handy for checking balance changes
//! and logging without a browser.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{HtmlCanvasElement, HtmlInputElement, KeyboardEvent};

    use cosmic_parasite::Settings;
    use cosmic_parasite::assets::{AssetLoader, ImageData, ImageId};
    use cosmic_parasite::audio::AudioManager;
    use cosmic_parasite::consts::FALLBACK_DT;
    use cosmic_parasite::error::AssetError;
    use cosmic_parasite::platform::{GamepadState, InputHandler};
    use cosmic_parasite::renderer::{DrawList, SpriteRenderer, draw_game};
    use cosmic_parasite::scores::{LocalStorageStore, ScoreManager};
    use cosmic_parasite::sim::{Game, GameEvent};

    const ASSET_ROOT: &str = "assets";

    /// Everything the browser callbacks share
    struct App {
        game: Game,
        renderer: Option<SpriteRenderer>,
        canvas: HtmlCanvasElement,
        input: InputHandler,
        list: DrawList,
        last_time: f64,
        /// Keys go to the name field, not the game
        name_entry_open: bool,
    }

    impl App {
        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                FALLBACK_DT
            };
            self.last_time = time;
            let now = time / 1000.0;

            self.input.set_gamepad(poll_gamepad());
            let snapshot = self.input.update();
            self.game.update(&snapshot, dt, now);

            for event in self.game.drain_events() {
                self.handle_event(event);
            }

            self.sync_canvas_size();
            self.list.clear();
            draw_game(&self.game, &mut self.list, now);
            self.render();
        }

        fn handle_event(&mut self, event: GameEvent) {
            match event {
                GameEvent::ShowGameOver { score } => {
                    set_text("final-score", &format!("CASH: R$ {score},00"));
                    show("game-over-screen");
                    show("name-entry");
                    hide("restart-msg");
                    self.name_entry_open = true;
                    self.input.clear();
                    if let Some(input) = name_input() {
                        input.set_value("");
                        let _ = input.focus();
                    }
                }
                GameEvent::HideGameOver => {
                    hide("game-over-screen");
                    self.name_entry_open = false;
                }
                other => log::debug!("Game event: {:?}", other),
            }
        }

        fn submit_name(&mut self) {
            let name = name_input().map(|i| i.value()).unwrap_or_default();
            self.name_entry_open = false;
            if !self.game.submit_name(&name) {
                log::info!("Empty name, score not saved");
            }
        }

        fn skip_name(&mut self) {
            self.name_entry_open = false;
            hide("name-entry");
            show("restart-msg");
            self.game.skip_name_entry();
        }

        fn sync_canvas_size(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let dpr = window.device_pixel_ratio();
            let width = (self.canvas.client_width() as f64 * dpr) as u32;
            let height = (self.canvas.client_height() as f64 * dpr) as u32;
            if let Some(renderer) = self.renderer.as_mut()
                && renderer.size != (width, height)
                && width > 0
                && height > 0
            {
                self.canvas.set_width(width);
                self.canvas.set_height(height);
                renderer.resize(width, height);
            }
        }

        fn render(&mut self) {
            if let Some(ref mut renderer) = self.renderer {
                match renderer.render(&self.list) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        renderer.resize(renderer.size.0, renderer.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }
    }

    fn element(id: &str) -> Option<web_sys::Element> {
        web_sys::window()?.document()?.get_element_by_id(id)
    }

    fn show(id: &str) {
        if let Some(el) = element(id) {
            let _ = el.set_attribute("class", "");
        }
    }

    fn hide(id: &str) {
        if let Some(el) = element(id) {
            let _ = el.set_attribute("class", "hidden");
        }
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = element(id) {
            el.set_text_content(Some(text));
        }
    }

    fn name_input() -> Option<HtmlInputElement> {
        element("player-name")?.dyn_into().ok()
    }

    /// First connected gamepad, if any
    fn poll_gamepad() -> Option<GamepadState> {
        let pads = web_sys::window()?.navigator().get_gamepads().ok()?;
        let pad = pads
            .iter()
            .find_map(|p| p.dyn_into::<web_sys::Gamepad>().ok())?;
        Some(GamepadState {
            axes: pad
                .axes()
                .iter()
                .map(|a| a.as_f64().unwrap_or(0.0) as f32)
                .collect(),
            buttons: pad
                .buttons()
                .iter()
                .map(|b| {
                    b.dyn_into::<web_sys::GamepadButton>()
                        .map(|b| b.pressed())
                        .unwrap_or(false)
                })
                .collect(),
        })
    }

    async fn fetch_image(id: ImageId) -> Result<ImageData, AssetError> {
        let name = id.path();
        let url = format!("{ASSET_ROOT}/{name}");
        let io = |e: JsValue| AssetError::Io {
            name: name.clone(),
            message: format!("{e:?}"),
        };

        let window = web_sys::window().ok_or_else(|| AssetError::Missing(name.clone()))?;
        let response: web_sys::Response = JsFuture::from(window.fetch_with_str(&url))
            .await
            .map_err(io)?
            .dyn_into()
            .map_err(io)?;
        if !response.ok() {
            return Err(AssetError::Missing(name.clone()));
        }
        let buffer = JsFuture::from(response.array_buffer().map_err(io)?)
            .await
            .map_err(io)?;
        let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
        ImageData::decode(&name, &bytes)
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Cosmic Parasite starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let dpr = window.device_pixel_ratio();
        let width = ((canvas.client_width() as f64 * dpr) as u32).max(1);
        let height = ((canvas.client_height() as f64 * dpr) as u32).max(1);
        canvas.set_width(width);
        canvas.set_height(height);

        // Images first; failures become placeholders
        let mut loader = AssetLoader::new(|percent| {
            set_text("loading", &format!("Loading... {percent}%"));
        });
        for id in ImageId::all() {
            let result = fetch_image(id).await;
            loader.accept(id, result);
        }
        let assets = loader.finish();
        hide("loading");

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let renderer = SpriteRenderer::new(surface, &adapter, width, height, &assets).await;

        let settings = Settings::load();
        let seed = settings.seed.unwrap_or(js_sys::Date::now() as u64);
        let audio = AudioManager::new(ASSET_ROOT, settings.music_volume, settings.sfx_volume);
        let scores = ScoreManager::new(Box::new(LocalStorageStore));
        let game = Game::new(seed, assets, settings, Box::new(audio), scores);

        log::info!("Game initialized with seed: {}", seed);

        let app = Rc::new(RefCell::new(App {
            game,
            renderer: Some(renderer),
            canvas,
            input: InputHandler::new(),
            list: DrawList::new(),
            last_time: 0.0,
            name_entry_open: false,
        }));

        setup_input_handlers(app.clone());
        setup_name_entry(app.clone());

        request_animation_frame(app);

        log::info!("Cosmic Parasite running!");
    }

    fn setup_input_handlers(app: Rc<RefCell<App>>) {
        let window = web_sys::window().expect("no window");

        // Key down
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut app = app.borrow_mut();
                if app.name_entry_open {
                    return;
                }
                let key = event.key();
                if InputHandler::captures(&key) {
                    event.prevent_default();
                }
                // Key presses count as the user gesture browsers want
                let audio = app.game.audio_mut();
                if audio.is_locked() {
                    audio.unlock();
                }
                app.input.key_down(&key);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up always lands so nothing sticks after name entry
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                app.borrow_mut().input.key_up(&event.key());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur (click outside, tab switch)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut app = app.borrow_mut();
                app.input.clear();
                app.game.on_focus_lost();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_name_entry(app: Rc<RefCell<App>>) {
        if let Some(btn) = element("submit-name-btn") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().submit_name();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = element("skip-name-btn") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().skip_name();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(input) = name_input() {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                match event.key().as_str() {
                    "Enter" => app.borrow_mut().submit_name(),
                    "Escape" => app.borrow_mut().skip_name(),
                    _ => {}
                }
            });
            let _ =
                input.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            app.borrow_mut().frame(time);
            request_animation_frame(app);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use clap::Parser;
    use cosmic_parasite::Settings;
    use cosmic_parasite::assets::Assets;
    use cosmic_parasite::audio::SilentAudio;
    use cosmic_parasite::consts::CANVAS_HEIGHT;
    use cosmic_parasite::platform::InputHandler;
    use cosmic_parasite::renderer::{DrawList, draw_game};
    use cosmic_parasite::scores::{JsonFileStore, MemoryStore, ScoreManager, ScoreStore};
    use cosmic_parasite::sim::{Game, GameEvent, GameState};

    const FRAME_DT: f32 = 1.0 / 60.0;

    /// Plays the game headless with a scripted pilot
    #[derive(Debug, Parser)]
    #[command(name = "cosmic-parasite")]
    #[command(about = "Run Cosmic Parasite headless under a scripted autopilot")]
    struct Options {
        /// Directory holding the `images/` asset tree (placeholders if omitted)
        #[arg(long)]
        assets: Option<PathBuf>,

        /// Settings JSON file
        #[arg(long)]
        settings: Option<PathBuf>,

        /// High-score JSON file (in-memory if omitted)
        #[arg(long)]
        scores: Option<PathBuf>,

        /// Simulated seconds to run
        #[arg(long, default_value_t = 60.0)]
        seconds: f32,

        /// Start with the invincibility cheat on
        #[arg(long)]
        god: bool,

        /// RNG seed (settings seed, then the clock, if omitted)
        #[arg(long)]
        seed: Option<u64>,
    }

    fn clock_seed() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    /// Scripted pilot: starts runs, taps fire, hugs a cruising altitude
    struct Autopilot {
        cruise_y: f32,
    }

    impl Autopilot {
        fn drive(&self, game: &Game, input: &mut InputHandler, frame: u32) {
            input.clear();
            match game.state {
                GameState::Start => {
                    if frame % 90 == 89 {
                        input.key_down("Enter");
                    }
                }
                GameState::Playing => {
                    if frame % 8 < 4 {
                        input.key_down(" ");
                    }
                    let y = game.player.pos.y;
                    if y > self.cruise_y + 10.0 {
                        input.key_down("ArrowUp");
                    } else if y < self.cruise_y - 10.0 {
                        input.key_down("ArrowDown");
                    }
                }
                GameState::GameOver => {}
            }
        }
    }

    pub fn run() {
        env_logger::init();
        let opts = Options::parse();
        log::info!("Cosmic Parasite (headless) starting: {:?}", opts);

        let mut settings = Settings::load_or_default(opts.settings.as_deref());
        if opts.god {
            settings.god_mode = true;
        }
        let seed = opts.seed.or(settings.seed).unwrap_or_else(clock_seed);

        let assets = match &opts.assets {
            Some(dir) => Assets::load_dir(dir, |percent| log::debug!("Loading assets: {percent}%")),
            None => Assets::placeholders(),
        };
        let store: Box<dyn ScoreStore> = match &opts.scores {
            Some(path) => Box::new(JsonFileStore::new(path.clone())),
            None => Box::new(MemoryStore::new()),
        };

        let mut game = Game::new(
            seed,
            assets,
            settings,
            Box::new(SilentAudio),
            ScoreManager::new(store),
        );
        let mut input = InputHandler::new();
        let pilot = Autopilot {
            cruise_y: CANVAS_HEIGHT * 0.35,
        };
        let mut list = DrawList::new();

        let frames = (opts.seconds.max(0.0) * 60.0) as u32;
        let mut runs = 0u32;
        let mut best_score = 0u64;
        let mut best_distance = 0.0f32;

        for frame in 0..frames {
            let now = f64::from(frame) * f64::from(FRAME_DT);
            pilot.drive(&game, &mut input, frame);
            let snapshot = input.update();
            game.update(&snapshot, FRAME_DT, now);
            best_distance = best_distance.max(game.distance);

            for event in game.drain_events() {
                match event {
                    GameEvent::ShowGameOver { score } => {
                        runs += 1;
                        best_score = best_score.max(score);
                        log::info!("Run {runs} over: R$ {score},00");
                        game.submit_name("autopilot");
                    }
                    other => log::debug!("Game event: {:?}", other),
                }
            }

            list.clear();
            draw_game(&game, &mut list, now);
        }

        log::info!(
            "Simulated {:.1}s (seed {seed}): {runs} runs, best R$ {best_score},00, best {:.1} km, {} draw commands in the last frame",
            opts.seconds,
            best_distance / 1000.0,
            list.len()
        );
        for (i, entry) in game.scores.high_scores().iter().take(5).enumerate() {
            log::info!("{:>2}. {:<12} {}", i + 1, entry.name, entry.score);
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_command_named_after_package() {
            use clap::CommandFactory;
            assert_eq!(Options::command().get_name(), env!("CARGO_PKG_NAME"));
            assert_eq!(env!("CARGO_PKG_NAME"), "cosmic-parasite");
        }

        #[test]
        fn test_options_defaults() {
            let opts = Options::try_parse_from(["cosmic-parasite"]).unwrap();
            assert_eq!(opts.seconds, 60.0);
            assert!(!opts.god);
            assert!(opts.seed.is_none());
            assert!(opts.assets.is_none());
        }

        #[test]
        fn test_options_parse_all_flags() {
            let opts = Options::try_parse_from([
                "cosmic-parasite",
                "--assets",
                "public/assets",
                "--scores",
                "scores.json",
                "--seconds",
                "12.5",
                "--seed",
                "42",
                "--god",
            ])
            .unwrap();
            assert_eq!(opts.assets, Some(PathBuf::from("public/assets")));
            assert_eq!(opts.scores, Some(PathBuf::from("scores.json")));
            assert_eq!(opts.seconds, 12.5);
            assert_eq!(opts.seed, Some(42));
            assert!(opts.god);
        }

        #[test]
        fn test_options_reject_bad_input() {
            assert!(Options::try_parse_from(["cosmic-parasite", "--seconds", "abc"]).is_err());
            assert!(Options::try_parse_from(["cosmic-parasite", "--seed", "xyz"]).is_err());
            assert!(Options::try_parse_from(["cosmic-parasite", "--sconds", "5"]).is_err());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
