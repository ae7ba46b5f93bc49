//! Ant Survival entry point
//!
//! On the web this wires the page (canvas, HUD, buttons, joystick) to the
//! simulation. Natively it plays one scripted level headlessly and logs what
//! happened, which is handy for tuning.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent, PointerEvent, TouchEvent};

    use ant_survival::Settings;
    use ant_survival::consts::*;
    use ant_survival::hud::{Banner, HIGH_SCORE_POPUP_MS, HudSnapshot, MESSAGE_DURATION_MS, event_message};
    use ant_survival::persistence::{Progress, ProgressStore};
    use ant_survival::platform::storage::LocalStorage;
    use ant_survival::platform::{FrameClock, Joystick, KeyState, movement_intent};
    use ant_survival::renderer::{CanvasRenderer, RenderOptions, draw_list};
    use ant_survival::sim::{
        GameEvent, RunState, TickInput, advance_level, back_to_start, pause, restart, resume, start, stop,
        tap, tick,
    };

    /// Joystick base radius used until the element reports its size
    const JOYSTICK_RADIUS: f32 = 50.0;

    /// Monotonic page clock in ms
    fn now() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if hidden { "hidden" } else { "" });
        }
    }

    /// Game instance holding all state
    struct Game {
        state: RunState,
        progress: Progress<LocalStorage>,
        settings: Settings,
        renderer: CanvasRenderer,
        clock: FrameClock,
        keys: KeyState,
        joystick: Joystick,
        /// Pending animation frame, if the loop is running
        raf_id: Option<i32>,
        message: Option<Banner>,
        high_popup: Option<Banner>,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64, canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
            let settings = Settings::load(&LocalStorage::open());
            let (width, height) = canvas_size(&canvas);
            let renderer = CanvasRenderer::new(canvas)?;
            renderer.resize(width as u32, height as u32);

            let mut state = RunState::new(seed, width, height);
            state.max_particles = settings.max_particles();
            let progress = Progress::new(LocalStorage::open());
            state.high_score = progress.load_high_score();
            state.level = progress.load_level();

            Ok(Self {
                joystick: Joystick::new(Vec2::ZERO, JOYSTICK_RADIUS, settings.joystick_dead_zone),
                state,
                progress,
                settings,
                renderer,
                clock: FrameClock::default(),
                keys: KeyState::default(),
                raf_id: None,
                message: None,
                high_popup: None,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            })
        }

        /// One animation frame: simulate, react to events, draw
        fn frame(&mut self, now: f64) {
            let dt = self.clock.advance(now);
            self.track_fps(now);

            let stick = self.joystick.is_active().then(|| self.joystick.vector());
            let input = TickInput {
                movement: movement_intent(&self.keys, stick),
            };
            tick(&mut self.state, &input, &mut self.progress, now, dt);

            self.handle_events(now);
            self.render(now);
            self.update_hud(now);
        }

        fn track_fps(&mut self, now: f64) {
            self.frame_times[self.frame_index] = now;
            self.frame_index = (self.frame_index + 1) % self.frame_times.len();
            let oldest = self.frame_times[self.frame_index];
            if oldest > 0.0 && now > oldest {
                self.fps = ((self.frame_times.len() - 1) as f64 * 1000.0 / (now - oldest)).round() as u32;
            }
        }

        fn handle_events(&mut self, now: f64) {
            let Some(document) = document() else {
                return;
            };
            for event in self.state.drain_events() {
                if let Some((text, duration)) = event_message(&event) {
                    self.message = Some(Banner::new(text, now, duration));
                }
                match event {
                    GameEvent::LevelComplete { level, .. } => {
                        set_text(&document, "popupText", &format!("Level {level} completed!"));
                        set_hidden(&document, "levelPopup", false);
                    }
                    GameEvent::NewHighScore { score } => {
                        set_text(&document, "highPopupText", &format!("New High Score! {score}"));
                        self.high_popup = Some(Banner::new("", now, HIGH_SCORE_POPUP_MS));
                    }
                    GameEvent::LevelAdvanced { .. }
                    | GameEvent::Stopped
                    | GameEvent::ReturnedToStart
                    | GameEvent::Started { .. } => {
                        set_hidden(&document, "levelPopup", true);
                    }
                    GameEvent::EnemyTapped { kind, gained, combo } => {
                        log::debug!("Tapped {kind:?} for {gained} (combo {combo})");
                    }
                    _ => {}
                }
            }
        }

        fn render(&self, now: f64) {
            let sheet = self.renderer.sprite_sheet();
            let options = RenderOptions {
                gold_glow: self.settings.quality.gold_glow(),
            };
            self.renderer.draw(&draw_list(&self.state, &sheet, options, now));
        }

        fn update_hud(&self, now: f64) {
            let Some(document) = document() else {
                return;
            };
            let hud = HudSnapshot::capture(&self.state, now);
            set_text(&document, "scoreBox", &hud.score);
            set_text(&document, "killsBox", &hud.kills);
            set_text(&document, "levelBox", &hud.level);
            set_text(&document, "comboBox", &hud.combo);
            set_text(&document, "timeLeft", &hud.time_left);
            set_text(&document, "highScoreBox", &hud.high_score);
            set_text(&document, "accuracyBox", &hud.accuracy);

            if let Some(el) = document.get_element_by_id("message") {
                match &self.message {
                    Some(banner) if banner.is_visible(now) => {
                        el.set_text_content(Some(&banner.text));
                        let _ = el.set_attribute("style", &format!("display:block;opacity:{:.2}", banner.opacity(now)));
                    }
                    _ => {
                        let _ = el.set_attribute("style", "display:none");
                    }
                }
            }

            let high_visible = self.high_popup.as_ref().is_some_and(|b| b.is_visible(now));
            set_hidden(&document, "highPopup", !high_visible);

            if self.settings.show_fps {
                set_text(&document, "fps", &format!("{} FPS", self.fps));
            }
        }

        fn show_message(&mut self, text: &str, duration_ms: f64) {
            let now = now();
            self.message = Some(Banner::new(text, now, duration_ms));
            self.update_hud(now);
        }

        /// Refresh everything an input action may have changed
        fn after_action(&mut self, now: f64) {
            self.handle_events(now);
            self.render(now);
            self.update_hud(now);
        }

        fn cancel_frame(&mut self) {
            if let (Some(id), Some(window)) = (self.raf_id.take(), web_sys::window()) {
                let _ = window.cancel_animation_frame(id);
            }
        }

        fn resize(&mut self) {
            let (width, height) = canvas_size(self.renderer.canvas());
            self.renderer.resize(width as u32, height as u32);
            self.state.resize(width, height);
            self.render(now());
        }
    }

    /// Canvas size in CSS pixels, falling back to the default playfield
    fn canvas_size(canvas: &HtmlCanvasElement) -> (f32, f32) {
        let (w, h) = (canvas.client_width(), canvas.client_height());
        if w > 0 && h > 0 {
            (w as f32, h as f32)
        } else {
            (DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT)
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Logger init failed: {e}").into());
        }

        log::info!("Ant Survival starting...");

        let document = document().ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .ok_or_else(|| JsValue::from_str("no gameCanvas element"))?
            .dyn_into()?;

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, canvas.clone())?));
        log::info!("Game initialized with seed: {seed}");

        setup_keyboard(game.clone());
        setup_taps(&canvas, game.clone());
        setup_joystick(&document, game.clone());
        setup_buttons(&document, game.clone());
        setup_resize(game.clone());
        setup_auto_pause(&document, game.clone());

        {
            let mut g = game.borrow_mut();
            set_hidden(&document, "joystick", !g.settings.joystick);
            set_hidden(&document, "levelPopup", true);
            set_hidden(&document, "highPopup", true);
            set_hidden(&document, "fps", !g.settings.show_fps);
            g.render(now());
            g.show_message("Press START to play", 1500.0);
        }
        refresh_hud_later(&game, 1500.0);

        log::info!("Ant Survival ready");
        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let next = game.clone();
        let closure = Closure::once(move |time: f64| {
            game_loop(next, time);
        });
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(id) => game.borrow_mut().raf_id = Some(id),
            Err(e) => log::error!("requestAnimationFrame failed: {e:?}"),
        }
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.raf_id = None;
            g.frame(time);
        }

        request_animation_frame(game);
    }

    /// Update the HUD once after `delay_ms` so banners expire while no frame loop runs
    fn refresh_hud_later(game: &Rc<RefCell<Game>>, delay_ms: f64) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let game = game.clone();
        let closure = Closure::once(move || {
            if let Ok(g) = game.try_borrow() {
                g.update_hud(now());
            }
        });
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            delay_ms as i32 + 16,
        );
        closure.forget();
    }

    /// Start the frame loop unless it is already scheduled
    fn ensure_loop(game: &Rc<RefCell<Game>>) {
        let idle = game.borrow().raf_id.is_none();
        if idle {
            request_animation_frame(game.clone());
        }
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        for (name, pressed) in [("keydown", true), ("keyup", false)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if game.borrow_mut().keys.set(&event.key(), pressed) {
                    event.prevent_default();
                }
            });
            let _ = window.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Click and touch both tap at canvas-relative coordinates
    fn setup_taps(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            let target = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let rect = target.get_bounding_client_rect();
                let point = Vec2::new(
                    (event.client_x() as f64 - rect.left()) as f32,
                    (event.client_y() as f64 - rect.top()) as f32,
                );
                let mut g = game.borrow_mut();
                let now = now();
                tap(&mut g.state, Some(point), now);
                g.after_action(now);
            });
            let _ = canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let target = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let rect = target.get_bounding_client_rect();
                let point = event.touches().get(0).map(|touch| {
                    Vec2::new(
                        (touch.client_x() as f64 - rect.left()) as f32,
                        (touch.client_y() as f64 - rect.top()) as f32,
                    )
                });
                let mut g = game.borrow_mut();
                let now = now();
                tap(&mut g.state, point, now);
                g.after_action(now);
            });
            let _ = canvas.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_joystick(document: &Document, game: Rc<RefCell<Game>>) {
        let Some(stick) = document.get_element_by_id("joystick") else {
            return;
        };

        {
            let game = game.clone();
            let target = stick.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                let _ = target.set_pointer_capture(event.pointer_id());
                let rect = target.get_bounding_client_rect();
                let mut g = game.borrow_mut();
                g.joystick.center = Vec2::new(
                    (rect.left() + rect.width() / 2.0) as f32,
                    (rect.top() + rect.height() / 2.0) as f32,
                );
                if rect.width() > 0.0 {
                    g.joystick.radius = (rect.width() / 2.0) as f32;
                }
                g.joystick
                    .drag_to(Vec2::new(event.client_x() as f32, event.client_y() as f32));
            });
            let _ = stick.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let mut g = game.borrow_mut();
                if g.joystick.is_active() {
                    g.joystick
                        .drag_to(Vec2::new(event.client_x() as f32, event.client_y() as f32));
                }
            });
            let _ = stick.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        for name in ["pointerup", "pointercancel"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                game.borrow_mut().joystick.release();
            });
            let _ = stick.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn on_click(document: &Document, id: &str, handler: impl FnMut(MouseEvent) + 'static) {
        let Some(btn) = document.get_element_by_id(id) else {
            log::warn!("Missing button #{id}");
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(handler);
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            on_click(document, "startBtn", move |_| {
                let now = now();
                {
                    let mut g = game.borrow_mut();
                    let g = &mut *g;
                    if start(&mut g.state, &g.progress, now) {
                        g.clock.reset();
                    }
                    g.after_action(now);
                }
                ensure_loop(&game);
            });
        }
        {
            let game = game.clone();
            on_click(document, "pauseBtn", move |_| {
                let mut g = game.borrow_mut();
                let now = now();
                pause(&mut g.state, now);
                g.after_action(now);
            });
        }
        {
            let game = game.clone();
            on_click(document, "resumeBtn", move |_| {
                let mut g = game.borrow_mut();
                let now = now();
                if resume(&mut g.state, now) {
                    g.clock.reset();
                }
                g.after_action(now);
            });
        }
        {
            let game = game.clone();
            on_click(document, "stopBtn", move |_| {
                {
                    let mut g = game.borrow_mut();
                    let g = &mut *g;
                    stop(&mut g.state, &g.progress);
                    g.cancel_frame();
                    g.after_action(now());
                }
                refresh_hud_later(&game, MESSAGE_DURATION_MS);
            });
        }
        {
            let game = game.clone();
            on_click(document, "restartBtn", move |_| {
                let now = now();
                {
                    let mut g = game.borrow_mut();
                    let g = &mut *g;
                    if restart(&mut g.state, &g.progress, now) {
                        g.clock.reset();
                    }
                    g.after_action(now);
                }
                ensure_loop(&game);
            });
        }
        {
            let game = game.clone();
            on_click(document, "nextLevelBtn", move |_| {
                let mut g = game.borrow_mut();
                let g = &mut *g;
                let now = now();
                if advance_level(&mut g.state, &mut g.progress, now) {
                    g.clock.reset();
                }
                g.after_action(now);
            });
        }
        on_click(document, "backBtn", move |_| {
            let mut g = game.borrow_mut();
            let g = &mut *g;
            back_to_start(&mut g.state, &g.progress);
            g.after_action(now());
        });
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().resize();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_auto_pause(document: &Document, game: Rc<RefCell<Game>>) {
        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    let now = now();
                    if pause(&mut g.state, now) {
                        log::info!("Auto-paused (tab hidden)");
                        g.after_action(now);
                    }
                }
            });
            let _ = document.add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur: held keys would otherwise stick
        if let Some(window) = web_sys::window() {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                g.keys.clear();
                g.joystick.release();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Ant Survival (native) starting...");
    log::info!("Native mode is headless - serve the wasm build for the playable version");

    headless::run(42);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Scripted single-level session
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::Vec2;

    use ant_survival::consts::{DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH};
    use ant_survival::hud::{HudSnapshot, event_message};
    use ant_survival::persistence::Progress;
    use ant_survival::platform::{FrameClock, KeyState, default_store, movement_intent};
    use ant_survival::sim::{GameEvent, RunPhase, RunState, TickInput, start, stop, tap, tick};
    use ant_survival::Settings;

    const FRAME_MS: f64 = 16.0;
    /// A little past one full level
    const SESSION_MS: f64 = 125_000.0;
    const TAP_EVERY_MS: f64 = 400.0;

    pub fn run(seed: u64) {
        let settings = Settings::default();
        let mut progress = Progress::new(default_store());
        let mut state = RunState::new(seed, DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT);
        state.max_particles = settings.max_particles();

        let mut clock = FrameClock::default();
        let mut keys = KeyState::default();
        let mut next_tap = TAP_EVERY_MS;

        start(&mut state, &progress, 0.0);
        let mut now = 0.0;
        while now < SESSION_MS && state.phase == RunPhase::Running {
            now += FRAME_MS;

            // Patrol up and down every few seconds
            let going_down = (now / 3000.0) as u64 % 2 == 0;
            keys.set("ArrowDown", going_down);
            keys.set("ArrowUp", !going_down);

            if now >= next_tap {
                next_tap += TAP_EVERY_MS;
                let target = state.enemies.last().map(|e| e.pos + Vec2::splat(1.0));
                tap(&mut state, target, now);
            }

            let dt = clock.advance(now);
            let input = TickInput {
                movement: movement_intent(&keys, None),
            };
            tick(&mut state, &input, &mut progress, now, dt);
            report(&mut state, now);
        }

        match serde_json::to_string_pretty(&HudSnapshot::capture(&state, now)) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("Failed to encode HUD: {e}"),
        }

        stop(&mut state, &progress);
        report(&mut state, now);
    }

    fn report(state: &mut RunState, now: f64) {
        for event in state.drain_events() {
            if let Some((text, _)) = event_message(&event) {
                log::info!("[{:>6.0} ms] {text}", now);
            }
            match event {
                GameEvent::LevelComplete { level, score } => {
                    log::info!("Level {level} completed with {score} points");
                }
                GameEvent::NewHighScore { score } => log::info!("New High Score! {score}"),
                other => log::debug!("{other:?}"),
            }
        }
    }
}
