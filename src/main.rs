//! Goal Tally entry point
//!
//! Wires the counter core to the page: preset buttons, keyboard shortcuts,
//! the settings drawer, the confetti canvas loop, and the post-celebration
//! auto-reset timer.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, Document, HtmlButtonElement, HtmlCanvasElement, HtmlElement,
        HtmlInputElement, KeyboardEvent, MouseEvent,
    };

    use goal_tally::confetti::{Burst, COLORS};
    use goal_tally::consts::*;
    use goal_tally::state::{CounterState, SettingsInput};
    use goal_tally::view::{CounterView, PresetView};

    /// Widget instance holding all state
    struct App {
        state: CounterState,
        confetti: Rc<ConfettiSurface>,
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Goal Tally starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let confetti = ConfettiSurface::new(&document);
        let app = Rc::new(RefCell::new(App {
            state: CounterState::load(),
            confetti,
        }));

        setup_preset_buttons(&document, app.clone());
        setup_keyboard(app.clone());
        setup_settings_drawer(&document, app.clone());
        setup_reset_buttons(&document, app.clone());

        // Initial render, then the startup goal check: a state persisted at
        // or above its goal re-triggers the celebration on load.
        render(&app);
        check_goal(&app);

        log::info!("Goal Tally running!");
    }

    /// Clamp, project, write the DOM, then persist
    fn render(app: &Rc<RefCell<App>>) {
        let document = web_sys::window().unwrap().document().unwrap();
        let mut a = app.borrow_mut();
        a.state.clamp();
        let view = CounterView::project(&a.state);
        apply_view(&document, &view);
        a.state.save();
    }

    fn apply_view(document: &Document, view: &CounterView) {
        set_text(document, "count-display", &view.count_label);
        set_text(document, "goal-display", &view.goal_label);
        set_text(document, "percent-display", &view.percent_label);
        set_text(document, "progress-label", &view.percent_label);

        if let Some(bar) = document
            .get_element_by_id("progress-bar")
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        {
            let _ = bar.style().set_property("width", &view.percent_label);
        }
        if let Some(track) = document.get_element_by_id("progress-track") {
            let _ = track.set_attribute("aria-valuenow", &view.percent.to_string());
        }

        for (i, preset) in view.plus.iter().enumerate() {
            apply_preset(document, &format!("plus-btn-{i}"), preset);
        }
        for (i, preset) in view.minus.iter().enumerate() {
            apply_preset(document, &format!("minus-btn-{i}"), preset);
        }
    }

    fn apply_preset(document: &Document, id: &str, preset: &PresetView) {
        if let Some(btn) = document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok())
        {
            btn.set_text_content(Some(&preset.label));
            btn.set_disabled(!preset.enabled);
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    /// Apply a delta, re-render, then check for goal completion
    fn bump(app: &Rc<RefCell<App>>, delta: i64) {
        app.borrow_mut().state.bump(delta);
        render(app);
        check_goal(app);
    }

    fn check_goal(app: &Rc<RefCell<App>>) {
        if !app.borrow().state.goal_reached() {
            return;
        }
        log::info!("Goal reached, celebrating");
        let confetti = app.borrow().confetti.clone();
        confetti.burst(BURST_PARTICLES, BURST_DURATION_MS);
        schedule_auto_reset(app.clone());
    }

    /// Zero the count once the celebration ends. Deliberately not cancelled
    /// by manual edits in the interim; the timer wins that race.
    fn schedule_auto_reset(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move || {
            app.borrow_mut().state.reset_count();
            render(&app);
        });
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            BURST_DURATION_MS as i32,
        );
        closure.forget();
    }

    fn setup_preset_buttons(document: &Document, app: Rc<RefCell<App>>) {
        for i in 0..4 {
            if let Some(btn) = document.get_element_by_id(&format!("plus-btn-{i}")) {
                let app = app.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    let delta = app.borrow().state.plus[i];
                    bump(&app, delta);
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
        for i in 0..2 {
            if let Some(btn) = document.get_element_by_id(&format!("minus-btn-{i}")) {
                let app = app.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    let delta = app.borrow().state.minus[i];
                    bump(&app, delta);
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn setup_keyboard(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            if is_typing_target(&event) {
                return;
            }
            match event.key().as_str() {
                "Enter" => {
                    event.prevent_default();
                    bump(&app, 1);
                }
                "Backspace" => {
                    event.prevent_default();
                    bump(&app, -1);
                }
                _ => {}
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Shortcuts must not steal keys while the user is typing
    fn is_typing_target(event: &KeyboardEvent) -> bool {
        let Some(target) = event.target() else {
            return false;
        };
        if let Some(el) = target.dyn_ref::<HtmlElement>() {
            if el.is_content_editable() {
                return true;
            }
            let tag = el.tag_name().to_lowercase();
            return tag == "input" || tag == "textarea";
        }
        false
    }

    fn setup_settings_drawer(document: &Document, app: Rc<RefCell<App>>) {
        // Toggle button opens or closes depending on current drawer state
        if let Some(btn) = document.get_element_by_id("settings-toggle") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let document = web_sys::window().unwrap().document().unwrap();
                let open = document
                    .get_element_by_id("settings-panel")
                    .map(|el| el.class_list().contains("open"))
                    .unwrap_or(false);
                if open {
                    close_drawer(&document);
                } else {
                    open_drawer(&document, &app.borrow().state);
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        for id in ["settings-close", "backdrop"] {
            if let Some(el) = document.get_element_by_id(id) {
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    let document = web_sys::window().unwrap().document().unwrap();
                    close_drawer(&document);
                });
                let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        // Submit applies the seven numeric fields and closes the drawer
        if let Some(form) = document.get_element_by_id("settings-form") {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                event.prevent_default();
                let document = web_sys::window().unwrap().document().unwrap();
                let input = read_settings_input(&document);
                app.borrow_mut().state.apply_settings(&input);
                render(&app);
                close_drawer(&document);
            });
            let _ = form.add_event_listener_with_callback("submit", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Populate the form from current state, then reveal the drawer
    fn open_drawer(document: &Document, state: &CounterState) {
        fill_settings_form(document, state);
        if let Some(panel) = document.get_element_by_id("settings-panel") {
            let _ = panel.class_list().add_1("open");
            let _ = panel.set_attribute("aria-hidden", "false");
        }
        if let Some(toggle) = document.get_element_by_id("settings-toggle") {
            let _ = toggle.set_attribute("aria-expanded", "true");
        }
        if let Some(backdrop) = document.get_element_by_id("backdrop") {
            let _ = backdrop.class_list().add_1("visible");
        }
    }

    fn close_drawer(document: &Document) {
        if let Some(panel) = document.get_element_by_id("settings-panel") {
            let _ = panel.class_list().remove_1("open");
            let _ = panel.set_attribute("aria-hidden", "true");
        }
        if let Some(toggle) = document.get_element_by_id("settings-toggle") {
            let _ = toggle.set_attribute("aria-expanded", "false");
        }
        if let Some(backdrop) = document.get_element_by_id("backdrop") {
            let _ = backdrop.class_list().remove_1("visible");
        }
    }

    fn fill_settings_form(document: &Document, state: &CounterState) {
        set_input(document, "goal-input", state.goal);
        for (i, v) in state.plus.iter().enumerate() {
            set_input(document, &format!("plus-input-{i}"), *v);
        }
        for (i, v) in state.minus.iter().enumerate() {
            set_input(document, &format!("minus-input-{i}"), *v);
        }
    }

    fn set_input(document: &Document, id: &str, value: i64) {
        if let Some(input) = document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            input.set_value(&value.to_string());
        }
    }

    /// Read a form field as f64; anything unparseable becomes NaN and is
    /// sanitized by the settings-update rules
    fn input_value(document: &Document, id: &str) -> f64 {
        document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            .map(|input| input.value())
            .and_then(|v| v.trim().parse::<f64>().ok())
            .unwrap_or(f64::NAN)
    }

    fn read_settings_input(document: &Document) -> SettingsInput {
        SettingsInput {
            goal: input_value(document, "goal-input"),
            plus: [0, 1, 2, 3].map(|i| input_value(document, &format!("plus-input-{i}"))),
            minus: [0, 1].map(|i| input_value(document, &format!("minus-input-{i}"))),
        }
    }

    fn setup_reset_buttons(document: &Document, app: Rc<RefCell<App>>) {
        // Reset counter: zero the count and re-render
        if let Some(btn) = document.get_element_by_id("reset-count-btn") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().state.reset_count();
                render(&app);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Reset to defaults: restore goal/presets and refresh the form, but
        // leave the count alone; persistence waits for the next render
        if let Some(btn) = document.get_element_by_id("reset-defaults-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().state.reset_to_defaults();
                let document = web_sys::window().unwrap().document().unwrap();
                fill_settings_form(&document, &app.borrow().state);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// A burst in flight: the simulation plus its frame timing
    struct ActiveBurst {
        sim: Burst,
        start_ms: Option<f64>,
        last_ms: f64,
    }

    /// Full-viewport canvas plus the in-flight burst, if any
    struct ConfettiSurface {
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
        burst: RefCell<Option<ActiveBurst>>,
        raf_handle: Cell<Option<i32>>,
        rng: RefCell<Pcg32>,
    }

    impl ConfettiSurface {
        fn new(document: &Document) -> Rc<Self> {
            let canvas: HtmlCanvasElement = document
                .create_element("canvas")
                .expect("create canvas")
                .dyn_into()
                .expect("not a canvas");
            canvas.set_class_name("confetti-canvas");
            document
                .body()
                .expect("no body")
                .append_child(&canvas)
                .expect("append canvas");

            let ctx: CanvasRenderingContext2d = canvas
                .get_context("2d")
                .ok()
                .flatten()
                .expect("no 2d context")
                .dyn_into()
                .expect("not a 2d context");

            let surface = Rc::new(Self {
                canvas,
                ctx,
                burst: RefCell::new(None),
                raf_handle: Cell::new(None),
                rng: RefCell::new(Pcg32::seed_from_u64(js_sys::Date::now() as u64)),
            });
            surface.fit_viewport();

            // Track viewport size reactively
            {
                let surface = surface.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                    surface.fit_viewport();
                });
                let _ = web_sys::window()
                    .unwrap()
                    .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
                closure.forget();
            }

            surface
        }

        fn fit_viewport(&self) {
            let window = web_sys::window().unwrap();
            let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
            let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
            self.canvas.set_width(w as u32);
            self.canvas.set_height(h as u32);
        }

        /// Start a burst, replacing any in-flight one (last writer wins)
        fn burst(self: &Rc<Self>, count: usize, duration_ms: f64) {
            if let Some(handle) = self.raf_handle.take() {
                let _ = web_sys::window().unwrap().cancel_animation_frame(handle);
            }
            let sim = Burst::new(
                count,
                duration_ms,
                self.canvas.width() as f32,
                &mut self.rng.borrow_mut(),
            );
            *self.burst.borrow_mut() = Some(ActiveBurst {
                sim,
                start_ms: None,
                last_ms: 0.0,
            });
            request_frame(self.clone());
        }

        fn clear(&self) {
            self.ctx.clear_rect(
                0.0,
                0.0,
                self.canvas.width() as f64,
                self.canvas.height() as f64,
            );
        }

        fn draw(&self) {
            let burst = self.burst.borrow();
            let Some(active) = burst.as_ref() else {
                return;
            };
            self.clear();
            for p in &active.sim.particles {
                self.ctx.save();
                let _ = self.ctx.translate(p.pos.x as f64, p.pos.y as f64);
                let _ = self.ctx.rotate(p.angle as f64);
                self.ctx.set_fill_style_str(COLORS[p.color]);
                let half = (p.size / 2.0) as f64;
                self.ctx.fill_rect(-half, -half, p.size as f64, p.size as f64);
                self.ctx.restore();
            }
        }
    }

    fn request_frame(surface: Rc<ConfettiSurface>) {
        let window = web_sys::window().unwrap();
        let inner = surface.clone();
        let closure = Closure::once(move |time: f64| {
            confetti_frame(inner, time);
        });
        let handle = window
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .unwrap_or(0);
        surface.raf_handle.set(Some(handle));
        closure.forget();
    }

    fn confetti_frame(surface: Rc<ConfettiSurface>, time: f64) {
        surface.raf_handle.set(None);

        let alive = {
            let mut burst = surface.burst.borrow_mut();
            let Some(active) = burst.as_mut() else {
                return;
            };
            let start = *active.start_ms.get_or_insert(time);
            // Scale integration by elapsed time, capped so a background tab
            // doesn't fast-forward the simulation in one giant step
            let dt = if active.last_ms > 0.0 {
                (((time - active.last_ms) / FRAME_MS) as f32).min(4.0)
            } else {
                1.0
            };
            active.last_ms = time;
            active.sim.advance(dt);
            active.sim.alive(time - start)
        };

        surface.draw();

        if alive {
            request_frame(surface);
        } else {
            surface.clear();
            *surface.burst.borrow_mut() = None;
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Goal Tally (native) starting...");
    log::info!("Native mode has no UI - run with `trunk serve` for the web version");

    println!("\nRunning projection smoke check...");
    smoke_check_projection();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn smoke_check_projection() {
    use goal_tally::state::CounterState;
    use goal_tally::view::CounterView;

    let state = CounterState {
        count: 333,
        ..Default::default()
    };
    let view = CounterView::project(&state);
    assert_eq!(view.percent, 33, "333/1000 must floor to 33%");
    println!("✓ Projection smoke check passed!");
}
