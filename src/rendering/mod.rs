//! Render surface: turns wave primitives into vertices and draws them with wgpu.

mod mesh;
mod system;

pub use mesh::{Uniforms, Vertex, WaveMesh};
pub use system::RenderSystem;
