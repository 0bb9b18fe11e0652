//! Input mapping
//!
//! Raw keyboard and pointer events update held state here; once per tick the
//! mapper folds that state into a single `TickInput`. Keyboard is always
//! active. Touch zones exist only in touch control mode.
//!
//! Horizontal intent is level-triggered: it is recomputed from whatever is
//! held right now, so releasing every key and pointer always yields idle.

use glam::Vec2;

use super::device::ControlMode;
use crate::consts::{TOUCH_BUTTON_INSET, TOUCH_BUTTON_SIZE, TOUCH_RIGHT_BUTTON_X};
use crate::sim::{Aabb, Horizontal, TickInput};

/// Keys the game listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Space,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "Left" => Some(Key::Left),
            "ArrowRight" | "Right" => Some(Key::Right),
            " " | "Spacebar" => Some(Key::Space),
            _ => None,
        }
    }
}

/// Held state of the three game keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyboardState {
    pub left: bool,
    pub right: bool,
    pub space: bool,
}

impl KeyboardState {
    pub fn set(&mut self, key: Key, down: bool) {
        match key {
            Key::Left => self.left = down,
            Key::Right => self.right = down,
            Key::Space => self.space = down,
        }
    }

    /// Left wins when both arrows are held
    pub fn horizontal(&self) -> Horizontal {
        if self.left {
            Horizontal::Left
        } else if self.right {
            Horizontal::Right
        } else {
            Horizontal::Idle
        }
    }
}

/// Browser pointer id
pub type PointerId = i32;

/// On-screen button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZoneKind {
    Left,
    Right,
    Jump,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchZone {
    pub kind: ZoneKind,
    pub rect: Aabb,
}

/// Three on-screen zones plus the pointers currently pressing them
#[derive(Debug, Clone)]
pub struct TouchControls {
    zones: [TouchZone; 3],
    /// Pointers holding a directional zone, oldest first
    pressed: Vec<(PointerId, ZoneKind)>,
    /// Jump tapped since the last sample
    pending_jump: bool,
}

impl TouchControls {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            zones: Self::zones_for(width, height),
            pressed: Vec::new(),
            pending_jump: false,
        }
    }

    fn zones_for(width: f32, height: f32) -> [TouchZone; 3] {
        let size = Vec2::splat(TOUCH_BUTTON_SIZE);
        let y = height - TOUCH_BUTTON_INSET;
        let zone = |kind, x| TouchZone {
            kind,
            rect: Aabb::from_center(Vec2::new(x, y), size),
        };
        [
            zone(ZoneKind::Left, TOUCH_BUTTON_INSET),
            zone(ZoneKind::Right, TOUCH_RIGHT_BUTTON_X),
            zone(ZoneKind::Jump, width - TOUCH_BUTTON_INSET),
        ]
    }

    /// Re-anchor the zones to a resized surface
    pub fn layout(&mut self, width: f32, height: f32) {
        self.zones = Self::zones_for(width, height);
    }

    pub fn zones(&self) -> &[TouchZone] {
        &self.zones
    }

    pub fn zone_at(&self, x: f32, y: f32) -> Option<ZoneKind> {
        let point = Vec2::new(x, y);
        self.zones
            .iter()
            .find(|z| z.rect.contains_point(point))
            .map(|z| z.kind)
    }

    /// Pointer pressed; returns the zone it landed in
    pub fn pointer_down(&mut self, id: PointerId, x: f32, y: f32) -> Option<ZoneKind> {
        let kind = self.zone_at(x, y)?;
        match kind {
            ZoneKind::Jump => self.pending_jump = true,
            ZoneKind::Left | ZoneKind::Right => {
                self.pressed.retain(|(p, _)| *p != id);
                self.pressed.push((id, kind));
            }
        }
        Some(kind)
    }

    /// A held pointer slid; it keeps steering only while inside a directional zone
    pub fn pointer_move(&mut self, id: PointerId, x: f32, y: f32) {
        let Some(index) = self.pressed.iter().position(|(p, _)| *p == id) else {
            return;
        };
        match self.zone_at(x, y) {
            Some(kind @ (ZoneKind::Left | ZoneKind::Right)) => self.pressed[index].1 = kind,
            _ => {
                self.pressed.remove(index);
            }
        }
    }

    pub fn pointer_up(&mut self, id: PointerId) {
        self.pressed.retain(|(p, _)| *p != id);
    }

    pub fn release_all(&mut self) {
        self.pressed.clear();
        self.pending_jump = false;
    }

    /// True while any pointer holds a directional zone
    pub fn is_pressed(&self) -> bool {
        !self.pressed.is_empty()
    }

    /// Most recent directional press wins
    pub fn horizontal(&self) -> Horizontal {
        match self.pressed.last() {
            Some((_, ZoneKind::Left)) => Horizontal::Left,
            Some((_, ZoneKind::Right)) => Horizontal::Right,
            _ => Horizontal::Idle,
        }
    }

    fn take_jump(&mut self) -> bool {
        std::mem::take(&mut self.pending_jump)
    }
}

/// Folds keyboard and touch state into one intent per tick
#[derive(Debug, Clone)]
pub struct InputMapper {
    mode: ControlMode,
    keyboard: KeyboardState,
    touch: Option<TouchControls>,
}

impl InputMapper {
    pub fn new(mode: ControlMode, surface_size: (f32, f32)) -> Self {
        let touch = mode
            .has_touch_zones()
            .then(|| TouchControls::new(surface_size.0, surface_size.1));
        Self {
            mode,
            keyboard: KeyboardState::default(),
            touch,
        }
    }

    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    pub fn keyboard(&self) -> &KeyboardState {
        &self.keyboard
    }

    pub fn touch_controls(&self) -> Option<&TouchControls> {
        self.touch.as_ref()
    }

    pub fn key_down(&mut self, key: Key) {
        self.keyboard.set(key, true);
    }

    pub fn key_up(&mut self, key: Key) {
        self.keyboard.set(key, false);
    }

    /// Ignored in keyboard-only mode
    pub fn pointer_down(&mut self, id: PointerId, x: f32, y: f32) {
        if let Some(touch) = self.touch.as_mut() {
            if let Some(zone) = touch.pointer_down(id, x, y) {
                log::trace!("Pointer {} pressed {:?}", id, zone);
            }
        }
    }

    pub fn pointer_move(&mut self, id: PointerId, x: f32, y: f32) {
        if let Some(touch) = self.touch.as_mut() {
            touch.pointer_move(id, x, y);
        }
    }

    pub fn pointer_up(&mut self, id: PointerId) {
        if let Some(touch) = self.touch.as_mut() {
            touch.pointer_up(id);
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        if let Some(touch) = self.touch.as_mut() {
            touch.layout(width, height);
        }
    }

    /// Drop every held input (focus lost)
    pub fn clear(&mut self) {
        self.keyboard = KeyboardState::default();
        if let Some(touch) = self.touch.as_mut() {
            touch.release_all();
        }
    }

    /// Produce this tick's intent. Consumes pending jump taps.
    ///
    /// Keyboard arrows take priority over touch zones; with nothing held the
    /// result is idle.
    pub fn sample(&mut self) -> TickInput {
        let touch_jump = self.touch.as_mut().is_some_and(TouchControls::take_jump);

        let horizontal = match self.keyboard.horizontal() {
            Horizontal::Idle => self
                .touch
                .as_ref()
                .map(TouchControls::horizontal)
                .unwrap_or_default(),
            held => held,
        };

        TickInput {
            horizontal,
            jump: self.keyboard.space || touch_jump,
        }
    }
}
