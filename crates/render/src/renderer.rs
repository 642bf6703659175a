use glam::Vec3;
use museum_kernel::{Camera, Museum, Shape};

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point one unit along the view direction.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self::from_camera(&Camera::default())
    }
}

impl RenderView {
    pub fn from_camera(camera: &Camera) -> Self {
        Self {
            eye: camera.position,
            target: camera.position + camera.world_direction(),
            fov_degrees: camera.fov.to_degrees(),
        }
    }
}

/// Renderer-agnostic interface.
///
/// A renderer reads the museum and a view and produces output. It never
/// mutates the museum.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given museum state and view.
    fn render(&self, museum: &Museum, view: &RenderView) -> Self::Output;
}

/// Renders the museum as human-readable text.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, museum: &Museum, view: &RenderView) -> String {
        let mut out = String::new();
        let models = museum
            .scene()
            .nodes()
            .iter()
            .filter(|n| matches!(n.shape, Shape::Model(_)))
            .count();

        out.push_str(&format!(
            "=== Museum (frame={}, effect_time={:.2}) ===\n",
            museum.frame(),
            museum.effect_time()
        ));
        out.push_str(&format!("Nodes: {} ({} sculptures)\n", museum.scene().len(), models));
        out.push_str(&format!(
            "Camera: eye=({:.2}, {:.2}, {:.2}) target=({:.2}, {:.2}, {:.2}) fov={:.0}\n",
            view.eye.x, view.eye.y, view.eye.z, view.target.x, view.target.y, view.target.z, view.fov_degrees
        ));
        for body in museum.bodies.iter() {
            let p = body.position();
            out.push_str(&format!(
                "  {:<9} {:<5} pos=({:.2}, {:.2}, {:.2}) spin={:.3}\n",
                body.role.label(),
                body.name,
                p.x,
                p.y,
                p.z,
                body.spin
            ));
        }
        out
    }
}
