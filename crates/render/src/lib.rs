//! Rendering Adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - Renderers read the museum; they never mutate it.
//! - Render state derives from museum state and the camera view.
//!
//! The GPU backend lives in `museum-render-wgpu`. [`DebugTextRenderer`]
//! renders to a string for the CLI and tests.

mod renderer;

pub use renderer::{DebugTextRenderer, RenderView, Renderer};

pub fn crate_info() -> &'static str {
    "museum-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
