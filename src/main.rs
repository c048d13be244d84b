//! Overlord Rising entry point
//!
//! In the browser (wasm32) this runs the game loop. Natively it runs the
//! static file server that hosts the page, the wasm bundle and assets.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use overlord_rising::{FixedStep, Settings};
    use overlord_rising::audio::AudioManager;
    use overlord_rising::consts::*;
    use overlord_rising::renderer::{RenderState, build_scene};
    use overlord_rising::sim::{GamePhase, GameState, TickInput, tick};

    /// Keys currently held down
    #[derive(Debug, Default)]
    struct HeldKeys {
        a: bool,
        d: bool,
        w: bool,
        space: bool,
        up: bool,
        down: bool,
        left: bool,
        right: bool,
    }

    impl HeldKeys {
        /// Update from a key code; returns false for keys the game ignores
        fn set(&mut self, code: &str, down: bool) -> bool {
            let slot = match code {
                "KeyA" => &mut self.a,
                "KeyD" => &mut self.d,
                "KeyW" => &mut self.w,
                "Space" => &mut self.space,
                "ArrowUp" => &mut self.up,
                "ArrowDown" => &mut self.down,
                "ArrowLeft" => &mut self.left,
                "ArrowRight" => &mut self.right,
                _ => return false,
            };
            *slot = down;
            true
        }

        fn scroll(&self) -> Vec2 {
            let axis = |neg: bool, pos: bool| (pos as i32 - neg as i32) as f32;
            Vec2::new(axis(self.left, self.right), axis(self.up, self.down))
        }
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        settings: Settings,
        render_state: Option<RenderState>,
        audio: AudioManager,
        clock: FixedStep,
        last_time: f64,
        keys: HeldKeys,
        // One-shot inputs, cleared after the next tick
        pause_requested: bool,
        restart_requested: bool,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64, settings: Settings) -> Self {
            let audio = AudioManager::new(&settings);
            Self {
                state: GameState::new(seed),
                settings,
                render_state: None,
                audio,
                clock: FixedStep::default(),
                last_time: 0.0,
                keys: HeldKeys::default(),
                pause_requested: false,
                restart_requested: false,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        fn tick_input(&self) -> TickInput {
            TickInput {
                rotate_left: self.keys.a,
                rotate_right: self.keys.d,
                thrust: self.keys.w,
                scroll: self.keys.scroll(),
                fire: self.keys.space,
                pause: self.pause_requested,
                restart: self.restart_requested,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            for _ in 0..self.clock.advance(dt) {
                let input = self.tick_input();
                tick(&mut self.state, &input, SIM_DT);

                // Clear one-shot inputs after processing
                self.pause_requested = false;
                self.restart_requested = false;
            }

            let events = self.state.drain_events();
            self.audio.play_events(&events);

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Render the current frame
        fn render(&mut self, time: f64) {
            let vertices = build_scene(&self.state, self.settings.starfield, (time / 1000.0) as f32);
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            set_text(&document, "#hud-score .hud-value", &self.state.score.to_string());
            set_text(&document, "#hud-lives .hud-value", &self.state.lives.to_string());
            set_text(&document, "#hud-wave .hud-value", &(self.state.wave_index + 1).to_string());
            set_text(&document, "#hud-fps .hud-value", &self.fps.to_string());

            set_visible(&document, "hud-fps", self.settings.show_fps);
            set_visible(&document, "pause-menu", self.state.phase == GamePhase::Paused);

            let game_over = self.state.phase == GamePhase::GameOver;
            set_visible(&document, "game-over", game_over);
            if game_over {
                if let Some(el) = document.get_element_by_id("final-score") {
                    el.set_text_content(Some(&self.state.score.to_string()));
                }
            }
        }

        /// First user gesture unlocks audio
        fn on_gesture(&mut self) {
            self.audio.resume();
            self.audio.start_music();
        }
    }

    fn set_text(document: &web_sys::Document, selector: &str, text: &str) {
        if let Some(el) = document.query_selector(selector).ok().flatten() {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &web_sys::Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let class = if visible { "" } else { "hidden" };
            let _ = el.set_attribute("class", class);
        }
    }

    /// Size the canvas backing store to its CSS size times the pixel ratio
    fn fit_canvas(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = window.device_pixel_ratio();
        let width = ((canvas.client_width() as f64 * dpr) as u32).max(1);
        let height = ((canvas.client_height() as f64 * dpr) as u32).max(1);
        canvas.set_width(width);
        canvas.set_height(height);
        (width, height)
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Overlord Rising starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        set_visible(&document, "loading", false);

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let (width, height) = fit_canvas(&window, &canvas);

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, settings)));

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
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

        let render_state = RenderState::new(surface, &adapter, width, height).await;
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&canvas, game.clone());
        setup_resize(&canvas, game.clone());
        setup_auto_pause(game.clone());

        set_visible(&document, "hud", true);

        // Start game loop
        request_animation_frame(game);

        log::info!("Overlord Rising running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                g.on_gesture();

                let code = event.code();
                match code.as_str() {
                    "Escape" => g.pause_requested = true,
                    "Space" if !event.repeat() && g.state.phase == GamePhase::GameOver => {
                        g.restart_requested = true;
                    }
                    _ => {}
                }
                if g.keys.set(&code, true) {
                    // Keep arrows and Space from scrolling the page
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().keys.set(&event.code(), false);
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Click - unlock audio, restart after game over
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.on_gesture();
                if g.state.phase == GamePhase::GameOver {
                    g.restart_requested = true;
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            if let Some(overlay) = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.get_element_by_id("game-over"))
            {
                let _ = overlay
                    .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            }
            closure.forget();
        }

        // Resume button
        if let Some(btn) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("resume-btn"))
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().pause_requested = true; // Toggle back to playing
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else { return };
            let (width, height) = fit_canvas(&window, &canvas);
            if let Some(ref mut render_state) = game.borrow_mut().render_state {
                render_state.resize(width, height);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let hidden = document_clone.visibility_state() == web_sys::VisibilityState::Hidden;
                let mut g = game.borrow_mut();
                if g.settings.mute_on_hide {
                    g.audio.set_muted(hidden);
                }
                if hidden && g.state.phase == GamePhase::Playing {
                    g.pause_requested = true;
                    log::info!("Auto-paused (tab hidden)");
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside) - also drop held keys, their keyup never arrives
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                g.keys = HeldKeys::default();
                if g.state.phase == GamePhase::Playing {
                    g.pause_requested = true;
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render(time);
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use overlord_rising::server::{ServerConfig, StaticServer};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Overlord Rising static server starting...");

    let result = ServerConfig::load().and_then(|config| {
        log::info!("Config: {:?}", config);
        StaticServer::bind(&config)
    });

    match result {
        Ok(server) => server.run(),
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
