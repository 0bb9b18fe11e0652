//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Device capability detection (desktop vs touch)
//! - Keyboard and pointer input, mapped to per-tick intents

pub mod device;
pub mod input;

pub use device::{ControlMode, DeviceInfo};
pub use input::{InputMapper, Key, KeyboardState, PointerId, TouchControls, TouchZone, ZoneKind};
