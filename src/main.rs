//! Combo Breakout entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlElement, MouseEvent, TouchEvent};

    use combo_breakout::Settings;
    use combo_breakout::audio::AudioManager;
    use combo_breakout::consts::*;
    use combo_breakout::hud::{self, HUD_IDS};
    use combo_breakout::renderer::{self, Camera, RenderState};
    use combo_breakout::sim::{GameState, TickInput, autopilot, tick};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        settings: Settings,
        audio: AudioManager,
        render_state: Option<RenderState>,
        camera: Camera,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
    }

    impl Game {
        fn new(seed: u64, settings: Settings) -> Self {
            Self {
                state: GameState::new(seed),
                audio: AudioManager::new(&settings),
                settings,
                render_state: None,
                camera: Camera::new(combo_breakout::level_center(), CAMERA_SCALE, CANVAS_SIZE),
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
            }
        }

        /// Convert a client-space pointer position to world x
        fn pointer_to_world_x(&self, canvas: &HtmlCanvasElement, client_x: f32, client_y: f32) -> f32 {
            let rect = canvas.get_bounding_client_rect();
            // Canvas may be scaled by CSS
            let sx = CANVAS_SIZE.0 as f32 / (rect.width() as f32).max(1.0);
            let sy = CANVAS_SIZE.1 as f32 / (rect.height() as f32).max(1.0);
            let x = (client_x - rect.left() as f32) * sx;
            let y = (client_y - rect.top() as f32) * sy;
            self.camera.screen_to_world(x, y).x
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = if self.settings.demo {
                    autopilot::steer(&self.state)
                } else {
                    self.input.clone()
                };
                tick(&mut self.state, &input);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.primary_pressed = false;
            }
            if substeps == MAX_SUBSTEPS {
                self.accumulator = self.accumulator.min(SIM_DT);
            }

            let events = self.state.drain_events();
            self.audio.handle_events(&events);
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                let vertices = renderer::scene(&self.state, self.camera.pos, &self.settings);
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
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
        fn update_hud(&self, document: &Document) {
            let lines = hud::hud_lines(&self.state);

            for id in HUD_IDS {
                let Some(el) = document
                    .get_element_by_id(id)
                    .and_then(|el| el.dyn_into::<HtmlElement>().ok())
                else {
                    continue;
                };

                match lines.iter().find(|line| line.id == id) {
                    Some(line) => {
                        if el.text_content().as_deref() != Some(line.text.as_str()) {
                            el.set_text_content(Some(&line.text));
                        }
                        let style = el.style();
                        let _ = style.set_property("color", &line.color.to_css());
                        let _ = style.set_property("left", &format!("{}px", line.pos.0));
                        let _ = style.set_property("top", &format!("{}px", line.pos.1));
                        let _ = el.set_attribute("class", "hud-line");
                    }
                    None => {
                        let _ = el.set_attribute("class", "hud-line hidden");
                    }
                }
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Combo Breakout starting...");

        let Some(window) = web_sys::window() else { return };
        let Some(document) = window.document() else { return };

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #canvas element found");
            return;
        };

        // Fixed canvas resolution; CSS may scale it
        canvas.set_width(CANVAS_SIZE.0);
        canvas.set_height(CANVAS_SIZE.1);

        let settings = Settings::load(&canvas);
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, settings)));

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {e}");
                return;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::error!("Failed to get adapter: {e}");
                return;
            }
        };

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let camera = game.borrow().camera;
        match RenderState::new(surface, &adapter, camera).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => {
                log::error!("Failed to create renderer: {e}");
                return;
            }
        }

        setup_input_handlers(&canvas, game.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        request_animation_frame(game);

        log::info!("Combo Breakout running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse move
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let x = g.pointer_to_world_x(
                    &canvas_clone,
                    event.client_x() as f32,
                    event.client_y() as f32,
                );
                g.input.pointer_x = Some(x);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse click
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.input.primary_pressed = true;
                g.audio.resume();
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut g = game.borrow_mut();
                    let x = g.pointer_to_world_x(
                        &canvas_clone,
                        touch.client_x() as f32,
                        touch.client_y() as f32,
                    );
                    g.input.pointer_x = Some(x);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start (same as a click)
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                g.input.primary_pressed = true;
                g.audio.resume();
                if let Some(touch) = event.touches().get(0) {
                    let x = g.pointer_to_world_x(
                        &canvas_clone,
                        touch.client_x() as f32,
                        touch.client_y() as f32,
                    );
                    g.input.pointer_x = Some(x);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
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

            g.update(dt);
            g.render();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Native build: play the level headless with the autopilot
///
/// Usage: `combo-breakout [seed] [max_frames]`
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use combo_breakout::Settings;
    use combo_breakout::audio::AudioManager;
    use combo_breakout::sim::{GameEvent, GameState, autopilot, tick};

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(1);
    let max_frames: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(60 * 60 * 10);

    log::info!("Combo Breakout (native) starting with seed {seed}");
    log::info!("Native mode runs the autopilot headless - use the wasm build to play");

    let settings = Settings::default();
    let audio = AudioManager::new(&settings);
    let mut state = GameState::new(seed);
    let mut balls_lost = 0u32;
    let mut best_combo = 0u32;

    for _ in 0..max_frames {
        let input = autopilot::steer(&state);
        tick(&mut state, &input);

        let events = state.drain_events();
        audio.handle_events(&events);
        for event in &events {
            if let GameEvent::BallLost { combo } = event {
                balls_lost += 1;
                best_combo = best_combo.max(*combo);
            }
        }
        best_combo = best_combo.max(state.score.combo);

        if state.score.won {
            break;
        }
    }

    log::info!(
        "{} frames ({:.1}s), {} balls lost, best combo {}",
        state.time_ticks,
        state.time_ticks as f32 * combo_breakout::consts::SIM_DT,
        balls_lost,
        best_combo
    );

    match serde_json::to_string_pretty(&state.score) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize score: {e}"),
    }
}
