//! WebGPU rendering module
//!
//! The scene is a list of flat-colored quads tessellated on the CPU each frame.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::{Camera, RenderInitError, RenderState};
pub use shapes::scene;
pub use vertex::Vertex;
