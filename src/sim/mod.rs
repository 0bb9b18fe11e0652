//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod body;
pub mod collision;
pub mod entity;
pub mod level;
pub mod physics;
pub mod state;
pub mod tick;

pub use body::{Aabb, Body, Touching};
pub use collision::{CollisionResult, aabb_static_collision, reflect_velocity, separate};
pub use entity::{Coin, Enemy, EntityKind, EntityRegistry, Platform, Player};
pub use level::{Level, build_level};
pub use physics::{ContactHandler, Group, PairMode, PairRule, Physics};
pub use state::{GameEvent, GamePhase, GameState, Hud};
pub use tick::{Horizontal, TickInput, tick};
