//! Game settings
//!
//! Read once at startup; never written back. The browser build takes them
//! from an inline JSON `<script id="game-settings">` element, native builds use
//! defaults.

use serde::{Deserialize, Serialize};

use crate::platform::{ControlMode, DeviceInfo};

/// Which controls to offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ControlPreference {
    /// Decide from the detected device
    #[default]
    Auto,
    Keyboard,
    Touch,
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fixed RNG seed (random per session when unset)
    pub seed: Option<u64>,
    pub control: ControlPreference,
    /// Show FPS counter
    pub show_fps: bool,
    /// `log` level name ("error" .. "trace")
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            control: ControlPreference::Auto,
            show_fps: false,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Element id holding the inline JSON settings
    const ELEMENT_ID: &'static str = "game-settings";

    /// Parse settings JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Control mode for this device, honoring an explicit preference
    pub fn control_mode(&self, device: &DeviceInfo) -> ControlMode {
        match self.control {
            ControlPreference::Auto => ControlMode::detect(device),
            ControlPreference::Keyboard => ControlMode::KeyboardOnly,
            ControlPreference::Touch => ControlMode::Touch,
        }
    }

    /// Parsed log level; unknown names fall back to `Info`
    pub fn log_level(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }

    /// Load settings from the page (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::ELEMENT_ID))
            .and_then(|el| el.text_content());

        if let Some(json) = json {
            match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from #{}", Self::ELEMENT_ID);
                    return settings;
                }
                Err(e) => log::warn!("Ignoring malformed #{}: {}", Self::ELEMENT_ID, e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        log::debug!("No #{} on native; using defaults", Self::ELEMENT_ID);
        Self::default()
    }
}
