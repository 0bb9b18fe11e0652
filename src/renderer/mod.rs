//! Rendering module
//!
//! The simulation draws through the `Surface` trait; the WebGPU pipeline turns
//! recorded rectangles into flat-colored triangles.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod surface;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::draw_scene;
pub use surface::{Color, DrawCommand, DrawList, Surface, TextStyle};
pub use vertex::Vertex;
