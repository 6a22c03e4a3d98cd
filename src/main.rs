//! Breakwall entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlInputElement};

    use breakwall::auth::{self, AcceptNonEmpty};
    use breakwall::consts::*;
    use breakwall::platform::LocalStorage;
    use breakwall::renderer::{RenderState, shapes};
    use breakwall::scores::{LEADERBOARD_SIZE, ScoreBoard};
    use breakwall::sim::{GameEvent, GameState, RoundOutcome, RoundPhase, TickInput, tick};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: RenderState,
        board: ScoreBoard,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
    }

    impl Game {
        fn new(username: String, render_state: RenderState, board: ScoreBoard) -> Self {
            Self {
                state: GameState::new(username),
                render_state,
                board,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
            }
        }

        /// Run simulation ticks and react to the events they produce
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let events = tick(&mut self.state, &self.input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // One-shot inputs are consumed by the first substep
                self.input.start = false;

                for event in events {
                    if let GameEvent::RoundEnded(outcome) = event {
                        self.finish_round(outcome);
                    }
                }
            }
        }

        /// Fold the finished round into the leaderboard and persist it
        fn finish_round(&mut self, outcome: RoundOutcome) {
            let session = &self.state.session;
            log::info!(
                "Round over ({:?}): {} scored {}",
                outcome,
                session.username,
                session.score
            );
            self.board.record(&session.username, session.score as u64);
            self.board.save(&LocalStorage);

            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                render_leaderboard(&document, &self.board);
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let vertices = shapes::scene(&self.state);
            match self.render_state.render(&vertices) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    let (w, h) = self.render_state.size;
                    self.render_state.resize(w, h);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Update score and status text in the DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.get_element_by_id("score") {
                el.set_text_content(Some(&self.state.session.score.to_string()));
            }

            if let Some(el) = document.get_element_by_id("statusText") {
                let status = match self.state.phase {
                    RoundPhase::Waiting => "Press SPACE to Start",
                    RoundPhase::Playing => "",
                    RoundPhase::Ended(RoundOutcome::GameOver) => "Game Over",
                    RoundPhase::Ended(RoundOutcome::Won) => "You won!",
                };
                el.set_text_content(Some(status));
            }
        }
    }

    /// Rebuild the top-5 leaderboard panel
    fn render_leaderboard(document: &Document, board: &ScoreBoard) {
        let Some(container) = document.get_element_by_id("highScoresContainer") else {
            return;
        };

        container.set_inner_html("");
        for (user, score) in board.top(LEADERBOARD_SIZE) {
            if let Ok(div) = document.create_element("div") {
                div.set_text_content(Some(&format!("{user}: {score}")));
                let _ = container.append_child(&div);
            }
        }
        let _ = container.set_attribute("class", "");
    }

    fn alert(message: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if hidden { "hidden" } else { "" });
        }
    }

    fn form_values(document: &Document) -> Option<(String, String)> {
        let username = document
            .get_element_by_id("usernameInput")?
            .dyn_into::<HtmlInputElement>()
            .ok()?
            .value();
        let password = document
            .get_element_by_id("passwordInput")?
            .dyn_into::<HtmlInputElement>()
            .ok()?
            .value();
        Some((username, password))
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Breakwall starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        render_leaderboard(&document, &ScoreBoard::load(&LocalStorage));

        // A persisted username skips the login form
        match auth::saved_username(&LocalStorage) {
            Some(username) => {
                set_hidden(&document, "authContainer", true);
                start_game(username).await;
            }
            None => {
                set_hidden(&document, "authContainer", false);
                setup_auth_handlers(&document);
            }
        }
    }

    fn setup_auth_handlers(document: &Document) {
        // Login button
        if let Some(btn) = document.get_element_by_id("loginButton") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let document = web_sys::window().unwrap().document().unwrap();
                let Some((username, password)) = form_values(&document) else {
                    return;
                };
                match auth::login(&AcceptNonEmpty, &LocalStorage, &username, &password) {
                    Ok(()) => {
                        set_hidden(&document, "authContainer", true);
                        wasm_bindgen_futures::spawn_local(start_game(username));
                    }
                    Err(err) => alert(&err.to_string()),
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Register button
        if let Some(btn) = document.get_element_by_id("registerButton") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let document = web_sys::window().unwrap().document().unwrap();
                let Some((username, password)) = form_values(&document) else {
                    return;
                };
                let mut board = ScoreBoard::load(&LocalStorage);
                match auth::register(
                    &AcceptNonEmpty,
                    &LocalStorage,
                    &mut board,
                    &username,
                    &password,
                ) {
                    Ok(()) => {
                        set_hidden(&document, "authContainer", true);
                        render_leaderboard(&document, &board);
                        wasm_bindgen_futures::spawn_local(start_game(username));
                    }
                    Err(err) => alert(&err.to_string()),
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Password visibility checkbox
        if let Some(toggle) = document.get_element_by_id("togglePassword") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let document = web_sys::window().unwrap().document().unwrap();
                if let Some(field) = document.get_element_by_id("passwordInput") {
                    let next = if field.get_attribute("type").as_deref() == Some("password") {
                        "text"
                    } else {
                        "password"
                    };
                    let _ = field.set_attribute("type", next);
                }
            });
            let _ =
                toggle.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Initialize WebGPU and hand control to the game loop
    async fn start_game(username: String) {
        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width();
        let client_h = canvas.client_height();
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

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
        let board = ScoreBoard::load(&LocalStorage);

        log::info!("Round ready for {username}");
        let game = Rc::new(RefCell::new(Game::new(username, render_state, board)));

        setup_keyboard_handlers(game.clone());
        request_animation_frame(game);

        log::info!("Breakwall running!");
    }

    fn setup_keyboard_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Key down: held movement plus the one-shot start input
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" => g.input.left = true,
                    "ArrowRight" => g.input.right = true,
                    " " => g.input.start = true,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up: release held movement
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" => g.input.left = false,
                    "ArrowRight" => g.input.right = false,
                    _ => {}
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
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

            g.update(dt);
            g.render();
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
    env_logger::init();
    log::info!("Breakwall (native) starting...");
    log::info!("Native mode has no window - run with `trunk serve` for the web version");

    println!("\nRunning sim smoke check...");
    smoke_check();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn smoke_check() {
    use breakwall::consts::SIM_DT;
    use breakwall::sim::{GameState, RoundPhase, TickInput, tick};

    let mut state = GameState::new("smoke");
    let input = TickInput {
        start: true,
        ..Default::default()
    };
    tick(&mut state, &input, SIM_DT);
    assert_eq!(state.phase, RoundPhase::Playing, "round should start");

    // Ten simulated seconds with no player input
    for _ in 0..1200 {
        tick(&mut state, &TickInput::default(), SIM_DT);
    }
    println!(
        "✓ Sim smoke check passed ({} bricks left)",
        state.bricks_remaining()
    );
}
