//! Skyhop entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Log gameplay events at a level that matches how often they happen
fn log_events(events: &[skyhop::sim::GameEvent]) {
    use skyhop::sim::GameEvent;

    for event in events {
        match event {
            GameEvent::Started => log::info!("Round started"),
            GameEvent::Jumped => log::trace!("Jump"),
            // Spawns are logged by the step itself
            GameEvent::Spawned { .. } => {}
            GameEvent::Scored { score } => log::debug!("Scored: {}", score),
            GameEvent::Crashed { cause, score } => {
                log::info!("Round over ({:?}) with score {}", cause, score)
            }
            GameEvent::NewBest { score } => log::info!("New best score: {}", score),
            GameEvent::Reset => log::info!("Round reset"),
        }
    }
}

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, PointerEvent};

    use rand_pcg::Pcg32;
    use skyhop::Tuning;
    use skyhop::platform::web::AnimationFrames;
    use skyhop::platform::{Action, FrameClock, FrameLoop};
    use skyhop::renderer::SdfRenderState;
    use skyhop::sim::{self, GamePhase, GameState};

    use super::log_events;

    /// Game instance holding all state
    struct Game {
        state: GameState,
        rng: Pcg32,
        render_state: Option<SdfRenderState>,
        frame_loop: FrameLoop<AnimationFrames>,
        clock: FrameClock,
    }

    impl Game {
        fn new(tuning: Tuning, seed: u64) -> Self {
            let state = GameState::new(tuning).unwrap_or_else(|e| {
                log::warn!("Invalid tuning ({}), using defaults", e);
                GameState::default()
            });
            Self {
                clock: FrameClock::new(&state.tuning),
                state,
                rng: sim::seeded(seed),
                render_state: None,
                frame_loop: FrameLoop::new(AnimationFrames::new()),
            }
        }

        /// Apply an input action between frames
        fn handle_action(&mut self, action: Action) {
            match action {
                Action::Activate => {
                    let was_running = self.frame_loop.is_running();
                    let events = sim::activate(&mut self.state);
                    log_events(&events);

                    if self.state.phase == GamePhase::Active && !was_running {
                        self.clock.reset();
                    }
                    self.frame_loop.sync(self.state.phase);

                    // Idle/ended scenes aren't redrawn by the loop
                    if !self.frame_loop.is_running() {
                        self.render(js_sys::Date::now());
                    }
                    self.update_hud();
                }
            }
        }

        /// One display frame: run the due steps, draw, reschedule while active
        fn frame(&mut self, time: f64) {
            self.frame_loop.on_frame();

            let steps = self.clock.steps_for(time);
            for _ in 0..steps {
                if self.state.phase != GamePhase::Active {
                    break;
                }
                let events = sim::tick(&mut self.state, &mut self.rng);
                log_events(&events);
            }

            self.render(time);
            self.update_hud();
            self.frame_loop.sync(self.state.phase);
        }

        /// Render the current frame
        fn render(&mut self, time: f64) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.state, time) {
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

            if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.state.score.to_string()));
            }
            if let Some(el) = document.query_selector("#hud-best .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.state.best_score.to_string()));
            }

            // Show/hide idle prompt
            if let Some(el) = document.get_element_by_id("idle-prompt") {
                let class = if self.state.phase == GamePhase::Idle { "overlay" } else { "overlay hidden" };
                let _ = el.set_attribute("class", class);
            }

            // Show/hide crash summary
            if let Some(el) = document.get_element_by_id("game-over") {
                if self.state.phase == GamePhase::Ended {
                    let _ = el.set_attribute("class", "overlay");
                    if let Some(score_el) = document.get_element_by_id("final-score") {
                        score_el.set_text_content(Some(&self.state.last_score.to_string()));
                    }
                    if let Some(best_el) = document.get_element_by_id("final-best") {
                        best_el.set_text_content(Some(&self.state.best_score.to_string()));
                    }
                } else {
                    let _ = el.set_attribute("class", "overlay hidden");
                }
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Skyhop starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "overlay hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        // Initialize game
        let tuning = Tuning::load();
        let seed = window
            .location()
            .search()
            .ok()
            .and_then(|search| skyhop::seed_from_query(&search))
            .unwrap_or_else(|| js_sys::Date::now() as u64);
        let game = Rc::new(RefCell::new(Game::new(tuning, seed)));

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

        let mut render_state = SdfRenderState::new(surface, &adapter, width, height).await;
        render_state.set_start_time(js_sys::Date::now());
        game.borrow_mut().render_state = Some(render_state);

        // Frame callback; requested only while a round is active
        {
            let game_for_frame = game.clone();
            let closure = Closure::<dyn FnMut(f64)>::new(move |time: f64| {
                game_for_frame.borrow_mut().frame(time);
            });
            game.borrow_mut()
                .frame_loop
                .scheduler_mut()
                .set_callback(closure);
        }

        setup_input_handlers(&canvas, game.clone());
        setup_teardown(game.clone());

        // Draw the idle scene once
        {
            let mut g = game.borrow_mut();
            g.render(js_sys::Date::now());
            g.update_hud();
        }

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "overlay");
        }

        log::info!("Skyhop running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Pointer on the play surface
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                if let Some(action) = Action::from_pointer_button(event.button()) {
                    event.prevent_default();
                    game.borrow_mut().handle_action(action);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(action) = Action::from_key(&event.key()) {
                    // Space would otherwise scroll the page
                    event.prevent_default();
                    game.borrow_mut().handle_action(action);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Stop the frame loop when the page goes away
    fn setup_teardown(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut g = game.borrow_mut();
            g.frame_loop.stop();
            log::info!(
                "Frame loop stopped after {} frames (best score {})",
                g.frame_loop.frames(),
                g.state.best_score
            );
        });
        let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Skyhop (native) starting...");
    log::info!("Native mode has no window - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(0x5eed);

    println!("\nRunning headless demo (seed {})...", seed);
    run_headless_demo(seed, 3);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play a few rounds with the autopilot and report the scores
#[cfg(not(target_arch = "wasm32"))]
fn run_headless_demo(seed: u64, rounds: u32) {
    use skyhop::Tuning;
    use skyhop::sim::{self, GamePhase, GameState, autopilot};

    /// Roughly one minute of play at 60 steps per second
    const MAX_STEPS_PER_ROUND: u32 = 3600;

    let mut state = match GameState::new(Tuning::load()) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Invalid tuning: {}", e);
            return;
        }
    };
    let mut rng = sim::seeded(seed);

    for round in 1..=rounds {
        log_events(&sim::activate(&mut state));
        for _ in 0..MAX_STEPS_PER_ROUND {
            if autopilot::should_jump(&state) {
                log_events(&sim::activate(&mut state));
            }
            log_events(&sim::tick(&mut state, &mut rng));
            if state.phase != GamePhase::Active {
                break;
            }
        }

        if state.phase == GamePhase::Active {
            println!("Round {}: survived {} steps, score {}", round, state.round_steps, state.score);
            // Out of time: count the score, then start over without a crash
            if let Some(event) = state.record_score() {
                log_events(&[event]);
            }
            state.reset_round();
        } else {
            println!(
                "Round {}: crashed after {} steps, score {}",
                round, state.round_steps, state.last_score
            );
            log_events(&sim::activate(&mut state));
        }
    }

    println!("✓ Best score: {}", state.best_score);
}
