//! Device capability detection

/// What the runtime environment looks like
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Desktop OS (not a phone/tablet)
    pub desktop: bool,
    /// Touch input available
    pub touch: bool,
}

impl Default for DeviceInfo {
    fn default() -> Self {
        Self::desktop()
    }
}

/// User-agent fragments that identify phones and tablets
const MOBILE_MARKERS: [&str; 6] = ["Android", "iPhone", "iPad", "iPod", "Mobile", "Windows Phone"];

impl DeviceInfo {
    /// Plain desktop with keyboard only
    pub fn desktop() -> Self {
        Self {
            desktop: true,
            touch: false,
        }
    }

    /// Classify from a browser user agent and `navigator.maxTouchPoints`
    pub fn from_user_agent(user_agent: &str, max_touch_points: i32) -> Self {
        let mobile = MOBILE_MARKERS.iter().any(|m| user_agent.contains(m));
        Self {
            desktop: !mobile,
            touch: max_touch_points > 0,
        }
    }

    /// Detect from the browser navigator
    #[cfg(target_arch = "wasm32")]
    pub fn detect() -> Self {
        let Some(navigator) = web_sys::window().map(|w| w.navigator()) else {
            return Self::desktop();
        };
        let user_agent = navigator.user_agent().unwrap_or_default();
        let info = Self::from_user_agent(&user_agent, navigator.max_touch_points());
        log::info!("Detected device: {:?} ({})", info, user_agent);
        info
    }

    /// Native builds are always desktop
    #[cfg(not(target_arch = "wasm32"))]
    pub fn detect() -> Self {
        Self::desktop()
    }
}

/// Which input sources drive the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMode {
    /// Arrow keys + space only
    KeyboardOnly,
    /// Keyboard plus on-screen touch zones
    Touch,
}

impl ControlMode {
    /// Touch zones whenever the device is not a desktop or can take touches
    pub fn detect(device: &DeviceInfo) -> Self {
        if !device.desktop || device.touch {
            ControlMode::Touch
        } else {
            ControlMode::KeyboardOnly
        }
    }

    pub fn has_touch_zones(self) -> bool {
        self == ControlMode::Touch
    }

    /// CSS the canvas needs in this mode. Touch mode turns off browser
    /// panning/zooming, otherwise a drifting finger is cancelled mid-hold.
    pub fn canvas_style(self) -> &'static [(&'static str, &'static str)] {
        match self {
            ControlMode::KeyboardOnly => &[],
            ControlMode::Touch => &[
                ("touch-action", "none"),
                ("user-select", "none"),
                ("-webkit-user-select", "none"),
            ],
        }
    }
}
