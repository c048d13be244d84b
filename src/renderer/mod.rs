//! WebGPU rendering module
//!
//! The scene is tessellated into colored triangles in world space, then
//! mapped to the viewport by the pipeline.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderState, world_to_ndc};
pub use scene::build_scene;
pub use vertex::Vertex;
