//! wgpu render backend for the museum.
//!
//! Draws the static scene and the orbiting bodies as instanced unit meshes,
//! plus any sculpture models uploaded with [`WgpuRenderer::upload_model`].
//!
//! # Invariants
//! - Renderer never mutates museum state.
//! - A node whose model has not been uploaded yet is skipped, not an error.

mod gpu;
mod mesh;
mod shaders;

pub use gpu::WgpuRenderer;
pub use mesh::{MeshData, Vertex};
