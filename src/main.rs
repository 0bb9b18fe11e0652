//! Coin Dash entry point
//!
//! Browser: `launch(canvas_id)` wires a session to a WebGPU canvas and returns
//! a handle whose `destroy()` tears everything down again.
//! Native: a headless scripted run that logs the outcome.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        Document, EventTarget, HtmlCanvasElement, HtmlElement, KeyboardEvent, MouseEvent,
        PointerEvent,
    };

    use coin_dash::consts::SKY_COLOR;
    use coin_dash::platform::{ControlMode, DeviceInfo, Key};
    use coin_dash::renderer::{Color, DrawList, RenderState, shapes};
    use coin_dash::{GameSlot, InitError, Session, Settings};

    /// Session plus everything needed to show it in the page
    struct Game {
        session: Session,
        render_state: RenderState,
        canvas: HtmlCanvasElement,
        frame: DrawList,
        labels: TextLabels,
        last_time: f64,
    }

    impl Game {
        fn frame(&mut self, time: f64) {
            // Calculate delta time
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                0.0
            };
            self.last_time = time;

            self.session.update(dt);
            self.render();
        }

        fn render(&mut self) {
            self.frame.clear();
            self.session.render(&mut self.frame);

            let vertices = shapes::draw_list_vertices(&self.frame);
            match self.render_state.render(&vertices) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    let rs = &mut self.render_state;
                    rs.resize(rs.size.0, rs.size.1, rs.logical_size);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }

            self.labels.sync(&self.frame);
        }

        /// Match the canvas backing store to its CSS size
        fn resize(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let (logical, physical) = canvas_size(&window, &self.canvas);
            if physical.0 == 0 || physical.1 == 0 {
                return;
            }
            self.canvas.set_width(physical.0);
            self.canvas.set_height(physical.1);
            self.render_state.resize(physical.0, physical.1, logical);
            self.session.resize(logical.0, logical.1);
            self.frame.resize(logical.0, logical.1);
            self.labels.align_to(&self.canvas);
        }
    }

    /// CSS size (world units) and backing-store size (device pixels)
    fn canvas_size(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> ((f32, f32), (u32, u32)) {
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width();
        let client_h = canvas.client_height();
        (
            (client_w as f32, client_h as f32),
            ((client_w as f64 * dpr) as u32, (client_h as f64 * dpr) as u32),
        )
    }

    /// DOM overlay for text commands (score, game over, FPS).
    ///
    /// Lives in the canvas's offset parent and is positioned absolutely, so
    /// it scrolls with the page together with the canvas.
    struct TextLabels {
        document: Document,
        container: HtmlElement,
        pool: Vec<HtmlElement>,
        /// Canvas offset inside the container's parent
        origin: Vec2,
    }

    impl TextLabels {
        fn new(document: &Document, canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
            let container: HtmlElement = document.create_element("div")?.dyn_into()?;
            let style = container.style();
            style.set_property("position", "absolute")?;
            style.set_property("left", "0px")?;
            style.set_property("top", "0px")?;
            style.set_property("pointer-events", "none")?;
            style.set_property("font-family", "sans-serif")?;

            let host = match canvas.offset_parent() {
                Some(parent) => parent,
                None => document
                    .body()
                    .ok_or_else(|| JsValue::from_str("document has no body"))?
                    .into(),
            };
            host.append_child(&container)?;

            let mut labels = Self {
                document: document.clone(),
                container,
                pool: Vec::new(),
                origin: Vec2::ZERO,
            };
            labels.align_to(canvas);
            Ok(labels)
        }

        fn align_to(&mut self, canvas: &HtmlCanvasElement) {
            self.origin = Vec2::new(canvas.offset_left() as f32, canvas.offset_top() as f32);
        }

        fn label(&mut self, index: usize) -> Option<&HtmlElement> {
            while self.pool.len() <= index {
                let el: HtmlElement = self.document.create_element("div").ok()?.dyn_into().ok()?;
                let _ = el.style().set_property("position", "absolute");
                let _ = el.style().set_property("white-space", "nowrap");
                self.container.append_child(&el).ok()?;
                self.pool.push(el);
            }
            self.pool.get(index)
        }

        /// Show one element per text command, hide the rest
        fn sync(&mut self, frame: &DrawList) {
            let mut used = 0;
            for (pos, text, style) in frame.texts_at(self.origin) {
                if let Some(el) = self.label(used) {
                    if el.text_content().as_deref() != Some(text) {
                        el.set_text_content(Some(text));
                    }
                    let css = el.style();
                    let _ = css.set_property("display", "block");
                    let _ = css.set_property("left", &format!("{}px", pos.x));
                    let _ = css.set_property("top", &format!("{}px", pos.y));
                    let _ = css.set_property("font-size", &format!("{}px", style.font_size));
                    let _ = css.set_property("color", &style.color.to_css());
                }
                used += 1;
            }
            for el in self.pool.iter().skip(used) {
                let _ = el.style().set_property("display", "none");
            }
        }

        fn remove(&self) {
            self.container.remove();
        }
    }

    type Listener = Closure<dyn FnMut(web_sys::Event)>;

    /// Registered DOM listeners; dropping this unregisters all of them
    #[derive(Default)]
    struct Listeners {
        entries: Vec<(EventTarget, &'static str, Listener)>,
    }

    impl Listeners {
        fn add(
            &mut self,
            target: &EventTarget,
            event: &'static str,
            handler: impl FnMut(web_sys::Event) + 'static,
        ) -> Result<(), JsValue> {
            let closure = Listener::new(handler);
            target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
            self.entries.push((target.clone(), event, closure));
            Ok(())
        }
    }

    impl Drop for Listeners {
        fn drop(&mut self) {
            for (target, event, closure) in self.entries.drain(..) {
                let _ = target
                    .remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
            }
        }
    }

    /// requestAnimationFrame loop that can be cancelled
    struct AnimationLoop {
        request_id: Rc<Cell<Option<i32>>>,
        callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
    }

    impl AnimationLoop {
        fn start(game: GameSlot<Game>) -> Self {
            let request_id = Rc::new(Cell::new(None));
            let callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> =
                Rc::new(RefCell::new(None));

            let next = callback.clone();
            let id = request_id.clone();
            *callback.borrow_mut() = Some(Closure::new(move |time: f64| {
                // Game gone: let the loop lapse
                if game.with(|g| g.frame(time)).is_none() {
                    return;
                }
                if let Some(cb) = next.borrow().as_ref() {
                    id.set(request_animation_frame(cb));
                }
            }));

            if let Some(cb) = callback.borrow().as_ref() {
                request_id.set(request_animation_frame(cb));
            }

            Self {
                request_id,
                callback,
            }
        }

        fn cancel(&self) {
            if let (Some(window), Some(id)) = (web_sys::window(), self.request_id.take()) {
                let _ = window.cancel_animation_frame(id);
            }
            // Breaks the closure -> callback cycle
            self.callback.borrow_mut().take();
        }
    }

    fn request_animation_frame(callback: &Closure<dyn FnMut(f64)>) -> Option<i32> {
        web_sys::window()?
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .ok()
    }

    /// Handle returned to the page
    #[wasm_bindgen]
    pub struct GameHandle {
        game: GameSlot<Game>,
        listeners: Option<Listeners>,
        animation: AnimationLoop,
    }

    #[wasm_bindgen]
    impl GameHandle {
        /// Stop the loop, unregister listeners, dispose the session and
        /// release the GPU surface. Safe to call more than once.
        pub fn destroy(&mut self) {
            self.animation.cancel();
            self.listeners.take();

            if let Some(mut game) = self.game.take() {
                game.labels.remove();
                game.session.dispose();
                log::info!("Game destroyed");
            }
        }

        /// Current score (0 after destroy)
        pub fn score(&self) -> u32 {
            self.game.with(|g| g.session.state().score).unwrap_or(0)
        }

        #[wasm_bindgen(js_name = isGameOver)]
        pub fn is_game_over(&self) -> bool {
            self.game
                .with(|g| g.session.state().is_game_over())
                .unwrap_or(false)
        }
    }

    async fn init_gpu(
        canvas: &HtmlCanvasElement,
        physical: (u32, u32),
        logical: (f32, f32),
    ) -> Result<RenderState, InitError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| InitError::Surface(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| InitError::Adapter(e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        RenderState::new(
            surface,
            &adapter,
            physical.0,
            physical.1,
            logical,
            Color::from_hex(SKY_COLOR),
        )
        .await
    }

    pub async fn start(canvas_id: &str) -> Result<GameHandle, JsValue> {
        let window = web_sys::window().ok_or(InitError::NoWindow).map_err(to_js)?;
        let document = window.document().ok_or(InitError::NoWindow).map_err(to_js)?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id(canvas_id)
            .and_then(|el| el.dyn_into().ok())
            .ok_or_else(|| InitError::MissingCanvas(canvas_id.to_string()))
            .map_err(to_js)?;

        let mut settings = Settings::load();
        log::set_max_level(settings.log_level());
        if settings.seed.is_none() {
            settings.seed = Some(js_sys::Date::now() as u64);
        }

        let (logical, physical) = canvas_size(&window, &canvas);
        let device = DeviceInfo::detect();
        let session = Session::start(settings, &device, logical).map_err(to_js)?;
        let mode = session.control_mode();

        let canvas_style = canvas.style();
        for (property, value) in mode.canvas_style() {
            canvas_style.set_property(property, value)?;
        }

        canvas.set_width(physical.0);
        canvas.set_height(physical.1);
        let render_state = init_gpu(&canvas, physical, logical).await.map_err(to_js)?;
        let labels = TextLabels::new(&document, &canvas)?;

        let game = GameSlot::new(Game {
            session,
            render_state,
            canvas: canvas.clone(),
            frame: DrawList::new(logical.0, logical.1),
            labels,
            last_time: 0.0,
        });

        let listeners = setup_input_handlers(&window, &canvas, &game, mode)?;
        let animation = AnimationLoop::start(game.clone());

        log::info!("Coin Dash running!");
        Ok(GameHandle {
            game,
            listeners: Some(listeners),
            animation,
        })
    }

    fn to_js(e: InitError) -> JsValue {
        log::error!("Startup failed: {}", e);
        JsValue::from_str(&e.to_string())
    }

    fn setup_input_handlers(
        window: &web_sys::Window,
        canvas: &HtmlCanvasElement,
        game: &GameSlot<Game>,
        mode: ControlMode,
    ) -> Result<Listeners, JsValue> {
        let mut listeners = Listeners::default();
        let window_target: &EventTarget = window.as_ref();
        let canvas_target: &EventTarget = canvas.as_ref();

        // Keyboard
        for (event, down) in [("keydown", true), ("keyup", false)] {
            let game = game.clone();
            listeners.add(window_target, event, move |event| {
                let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                let Some(key) = Key::from_dom_key(&event.key()) else {
                    return;
                };
                // Keep arrows and space from scrolling the page
                event.prevent_default();
                game.with(|g| {
                    if down {
                        g.session.key_down(key);
                    } else {
                        g.session.key_up(key);
                    }
                });
            })?;
        }

        // Pointer (touch zones only)
        if mode.has_touch_zones() {
            {
                let game = game.clone();
                let canvas = canvas.clone();
                listeners.add(canvas_target, "pointerdown", move |event| {
                    if let Some(event) = event.dyn_ref::<PointerEvent>() {
                        event.prevent_default();
                        // Keep receiving moves for a held finger that drifts off the canvas
                        let _ = canvas.set_pointer_capture(event.pointer_id());
                        let mouse: &MouseEvent = event.as_ref();
                        game.with(|g| {
                            g.session.pointer_down(
                                event.pointer_id(),
                                mouse.offset_x() as f32,
                                mouse.offset_y() as f32,
                            )
                        });
                    }
                })?;
            }
            {
                let game = game.clone();
                listeners.add(canvas_target, "pointermove", move |event| {
                    if let Some(event) = event.dyn_ref::<PointerEvent>() {
                        let mouse: &MouseEvent = event.as_ref();
                        game.with(|g| {
                            g.session.pointer_move(
                                event.pointer_id(),
                                mouse.offset_x() as f32,
                                mouse.offset_y() as f32,
                            )
                        });
                    }
                })?;
            }
            for event in ["pointerup", "pointercancel"] {
                let game = game.clone();
                listeners.add(canvas_target, event, move |event| {
                    if let Some(event) = event.dyn_ref::<PointerEvent>() {
                        game.with(|g| g.session.pointer_up(event.pointer_id()));
                    }
                })?;
            }
        }

        // Window blur (click outside, tab switch)
        {
            let game = game.clone();
            listeners.add(window_target, "blur", move |_event| {
                game.with(|g| g.session.blur());
                log::debug!("Window blurred; input released");
            })?;
        }

        // Resize
        {
            let game = game.clone();
            listeners.add(window_target, "resize", move |_event| {
                game.with(|g| g.resize());
            })?;
        }

        Ok(listeners)
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Trace).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::set_max_level(log::LevelFilter::Info);
    log::info!("Coin Dash loaded");
}

/// Start a game on the canvas with the given element id
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub async fn launch(canvas_id: String) -> Result<wasm_game::GameHandle, JsValue> {
    wasm_game::start(&canvas_id).await
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use coin_dash::consts::{SIM_DT, WORLD_HEIGHT, WORLD_WIDTH};
    use coin_dash::platform::DeviceInfo;
    use coin_dash::renderer::DrawList;
    use coin_dash::{Session, Settings};

    let mut settings = Settings::load();
    if let Some(seed) = std::env::args().nth(1).and_then(|s| s.parse().ok()) {
        settings.seed = Some(seed);
    }

    env_logger::Builder::new()
        .filter_level(settings.log_level())
        .parse_default_env()
        .init();
    log::info!("Coin Dash (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    let mut session =
        match Session::start(settings, &DeviceInfo::detect(), (WORLD_WIDTH, WORLD_HEIGHT)) {
            Ok(session) => session,
            Err(e) => {
                log::error!("Startup failed: {}", e);
                std::process::exit(1);
            }
        };

    for step in SCRIPT {
        for &key in step.keys {
            session.key_down(key);
        }
        for _ in 0..step.frames {
            session.update(SIM_DT);
        }
        for &key in step.keys {
            session.key_up(key);
        }

        let state = session.state();
        log::info!(
            "{:<10} tick {:>4}  {}  {:?}",
            step.name,
            state.time_ticks,
            state.hud.score_text,
            state.phase
        );
        if state.is_game_over() {
            break;
        }
    }

    let mut frame = DrawList::new(WORLD_WIDTH, WORLD_HEIGHT);
    session.render(&mut frame);
    for text in frame.texts() {
        println!("{}", text);
    }
    session.dispose();
}

#[cfg(not(target_arch = "wasm32"))]
use coin_dash::platform::Key;

#[cfg(not(target_arch = "wasm32"))]
struct ScriptStep {
    name: &'static str,
    keys: &'static [Key],
    frames: u32,
}

/// Settle, walk, jump, idle, walk back
#[cfg(not(target_arch = "wasm32"))]
const SCRIPT: &[ScriptStep] = &[
    ScriptStep {
        name: "settle",
        keys: &[],
        frames: 90,
    },
    ScriptStep {
        name: "walk",
        keys: &[Key::Right],
        frames: 120,
    },
    ScriptStep {
        name: "jump",
        keys: &[Key::Right, Key::Space],
        frames: 30,
    },
    ScriptStep {
        name: "idle",
        keys: &[],
        frames: 60,
    },
    ScriptStep {
        name: "back",
        keys: &[Key::Left],
        frames: 150,
    },
];

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
