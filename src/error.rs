//! Startup errors
//!
//! Gameplay itself never fails; only bringing up the presentation surface can.
//! Every variant is fatal: the caller reports it and the page/process has to
//! be restarted.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InitError {
    #[error("no browser window or document available")]
    NoWindow,
    #[error("canvas element `{0}` not found")]
    MissingCanvas(String),
    #[error("rendering surface is unavailable ({width}x{height})")]
    SurfaceUnavailable { width: f32, height: f32 },
    #[error("failed to create rendering surface: {0}")]
    Surface(String),
    #[error("no compatible graphics adapter: {0}")]
    Adapter(String),
    #[error("failed to create graphics device: {0}")]
    Device(String),
}
