//! One running game
//!
//! `Session` owns everything a game needs between frames: simulation state,
//! the input mapper and the generated textures. Frontends feed it raw events
//! and frame deltas, then ask it to draw onto a `Surface`.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::error::InitError;
use crate::platform::{ControlMode, DeviceInfo, InputMapper, Key, PointerId};
use crate::renderer::{Color, Surface, TextStyle, draw_scene};
use crate::settings::Settings;
use crate::sim::{GameState, tick};
use crate::textures::TextureCache;

/// Frames averaged by the FPS counter
const FPS_WINDOW: usize = 60;

pub struct Session {
    settings: Settings,
    state: GameState,
    input: InputMapper,
    textures: TextureCache,
    surface_size: (f32, f32),
    accumulator: f32,
    // FPS tracking
    frame_times: [f32; FPS_WINDOW],
    frame_index: usize,
    frame_count: usize,
    disposed: bool,
}

impl Session {
    /// Bootstrap a session on a surface of `surface_size` world units.
    ///
    /// Fails if the surface has no area; nothing is built in that case.
    pub fn start(
        settings: Settings,
        device: &DeviceInfo,
        surface_size: (f32, f32),
    ) -> Result<Self, InitError> {
        let (width, height) = surface_size;
        if !(width > 0.0 && height > 0.0) {
            return Err(InitError::SurfaceUnavailable { width, height });
        }

        let mode = settings.control_mode(device);
        let seed = settings.seed.unwrap_or_else(rand::random);
        let textures = TextureCache::generate();
        let state = GameState::new(seed);
        let input = InputMapper::new(mode, surface_size);

        log::info!(
            "Session started: seed {}, {:?} controls, surface {}x{}",
            seed,
            mode,
            width,
            height
        );

        Ok(Self {
            settings,
            state,
            input,
            textures,
            surface_size,
            accumulator: 0.0,
            frame_times: [0.0; FPS_WINDOW],
            frame_index: 0,
            frame_count: 0,
            disposed: false,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn textures(&self) -> &TextureCache {
        &self.textures
    }

    pub fn control_mode(&self) -> ControlMode {
        self.input.mode()
    }

    pub fn surface_size(&self) -> (f32, f32) {
        self.surface_size
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Advance by a frame delta (seconds). Returns the number of ticks run.
    pub fn update(&mut self, dt: f32) -> u32 {
        if self.disposed {
            return 0;
        }

        self.record_frame(dt);

        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = self.input.sample();
            tick(&mut self.state, &input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }

    fn record_frame(&mut self, dt: f32) {
        self.frame_times[self.frame_index] = dt;
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;
        self.frame_count = (self.frame_count + 1).min(FPS_WINDOW);
    }

    /// Average frames per second over the last `FPS_WINDOW` updates
    pub fn fps(&self) -> u32 {
        let total: f32 = self.frame_times[..self.frame_count].iter().sum();
        if total <= 0.0 {
            return 0;
        }
        (self.frame_count as f32 / total).round() as u32
    }

    pub fn key_down(&mut self, key: Key) {
        self.input.key_down(key);
    }

    pub fn key_up(&mut self, key: Key) {
        self.input.key_up(key);
    }

    pub fn pointer_down(&mut self, id: PointerId, x: f32, y: f32) {
        self.input.pointer_down(id, x, y);
    }

    pub fn pointer_move(&mut self, id: PointerId, x: f32, y: f32) {
        self.input.pointer_move(id, x, y);
    }

    pub fn pointer_up(&mut self, id: PointerId) {
        self.input.pointer_up(id);
    }

    /// Focus lost: release everything held
    pub fn blur(&mut self) {
        self.input.clear();
    }

    /// Surface resized; touch zones follow the new edges
    pub fn resize(&mut self, width: f32, height: f32) {
        if !(width > 0.0 && height > 0.0) {
            log::warn!("Ignoring resize to {}x{}", width, height);
            return;
        }
        self.surface_size = (width, height);
        self.input.resize(width, height);
        log::debug!("Surface resized to {}x{}", width, height);
    }

    /// Draw the current frame
    pub fn render(&self, surface: &mut impl Surface) {
        draw_scene(
            &self.state,
            &self.textures,
            self.input.touch_controls(),
            surface,
        );

        if self.settings.show_fps {
            let (width, _) = surface.size();
            surface.draw_text(
                Vec2::new(width - 100.0, 16.0),
                &format!("FPS: {}", self.fps()),
                TextStyle {
                    font_size: 16.0,
                    color: Color::from_hex(0x000000),
                },
            );
        }
    }

    /// Stop the session. Later updates are no-ops.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.input.clear();
        self.state.physics.pause();
        log::info!(
            "Session disposed after {} ticks, final {}",
            self.state.time_ticks,
            self.state.hud.score_text
        );
    }
}

/// Shared owner of a running game and its frontend resources.
///
/// Event and frame callbacks hold clones. `take` empties the slot for every
/// clone at once, so the game (and its GPU surface) is dropped by whoever
/// took it, however many callbacks are still registered.
pub struct GameSlot<T>(Rc<RefCell<Option<T>>>);

impl<T> Clone for GameSlot<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T> GameSlot<T> {
    pub fn new(game: T) -> Self {
        Self(Rc::new(RefCell::new(Some(game))))
    }

    /// Run `f` on the game. `None` once the slot is empty or while another
    /// callback holds it.
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let mut slot = self.0.try_borrow_mut().ok()?;
        slot.as_mut().map(f)
    }

    /// Remove the game; later `with` calls on any clone do nothing.
    /// `None` if already empty or called from inside `with`.
    pub fn take(&self) -> Option<T> {
        self.0.try_borrow_mut().ok()?.take()
    }

    pub fn is_empty(&self) -> bool {
        self.0.try_borrow().map(|g| g.is_none()).unwrap_or(false)
    }
}
