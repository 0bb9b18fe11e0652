//! Coin Dash - a small side-scrolling platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bodies, collisions, game state)
//! - `platform`: Device detection and keyboard/touch input mapping
//! - `renderer`: Presentation boundary and WebGPU pipeline
//! - `session`: Owns one running game and its input/texture resources
//! - `textures`: Procedurally generated placeholder sprites

pub mod error;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod textures;

pub use error::InitError;
pub use session::{GameSlot, Session};
pub use settings::{ControlPreference, Settings};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one tick per 60 Hz frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta fed into the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// World dimensions (reference units, top-left origin, +y down)
    pub const WORLD_WIDTH: f32 = 800.0;
    pub const WORLD_HEIGHT: f32 = 600.0;
    /// Downward acceleration for every dynamic body
    pub const GRAVITY: f32 = 300.0;

    /// Side length of every generated sprite texture; entity sizes are scales of this
    pub const BASE_SPRITE_SIZE: f32 = 100.0;

    /// Level geometry: (center x, center y, scale x, scale y)
    pub const PLATFORMS: [(f32, f32, f32, f32); 4] = [
        (400.0, 568.0, 8.0, 0.64), // Ground
        (600.0, 400.0, 2.0, 0.2),
        (50.0, 250.0, 1.5, 0.2),
        (750.0, 220.0, 1.0, 0.2),
    ];

    /// Player defaults
    pub const PLAYER_SPAWN: (f32, f32) = (100.0, 450.0);
    pub const PLAYER_SCALE: (f32, f32) = (0.32, 0.48);
    pub const PLAYER_BOUNCE: f32 = 0.2;
    pub const PLAYER_RUN_SPEED: f32 = 160.0;
    pub const PLAYER_JUMP_SPEED: f32 = 330.0;
    pub const PLAYER_HIT_TINT: u32 = 0xFF0000;

    /// Coin row
    pub const COIN_COUNT: u32 = 12;
    pub const COIN_START_X: f32 = 12.0;
    pub const COIN_STEP_X: f32 = 70.0;
    pub const COIN_START_Y: f32 = 0.0;
    pub const COIN_SCALE: f32 = 0.2;
    pub const COIN_BOUNCE_MIN: f32 = 0.4;
    pub const COIN_BOUNCE_MAX: f32 = 0.8;

    /// Enemies
    pub const ENEMY_SPAWNS: [(f32, f32); 2] = [(500.0, 500.0), (700.0, 200.0)];
    pub const ENEMY_SCALE: f32 = 0.32;
    pub const ENEMY_MAX_SPEED_X: i32 = 200;
    pub const ENEMY_SPEED_Y: f32 = 20.0;

    /// On-screen touch buttons (centers are relative to the surface size)
    pub const TOUCH_BUTTON_SIZE: f32 = 100.0;
    pub const TOUCH_BUTTON_INSET: f32 = 100.0;
    pub const TOUCH_RIGHT_BUTTON_X: f32 = 250.0;
    pub const TOUCH_BUTTON_ALPHA: f32 = 0.5;

    /// HUD
    pub const SKY_COLOR: u32 = 0x87CEEB;
    pub const SCORE_POS: (f32, f32) = (16.0, 16.0);
    pub const SCORE_FONT_SIZE: f32 = 32.0;
    pub const SCORE_COLOR: u32 = 0x000000;
    pub const MESSAGE_POS: (f32, f32) = (300.0, 250.0);
    pub const MESSAGE_FONT_SIZE: f32 = 64.0;
    pub const MESSAGE_COLOR: u32 = 0xFF0000;
    pub const GAME_OVER_TEXT: &str = "Game Over!";
}

/// Text shown in the score label
#[inline]
pub fn score_text(score: u32) -> String {
    format!("Score: {}", score)
}
