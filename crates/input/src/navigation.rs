use glam::Vec3;
use museum_kernel::Camera;
use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::keys::NavKey;

/// Distance multipliers per key press.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    pub forward_step: f32,
    pub back_step: f32,
    pub strafe_step: f32,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            forward_step: 0.5,
            back_step: 0.1,
            strafe_step: 0.1,
        }
    }
}

/// Turns key presses into horizontal camera moves.
#[derive(Debug, Clone, Copy, Default)]
pub struct NavigationController {
    pub config: NavigationConfig,
}

impl NavigationController {
    pub fn new(config: NavigationConfig) -> Self {
        Self { config }
    }

    /// Facing direction with its vertical component dropped.
    ///
    /// Not renormalized: looking up or down shortens every step.
    pub fn horizontal_forward(camera: &Camera) -> Vec3 {
        let mut forward = camera.world_direction();
        forward.y = 0.0;
        forward
    }

    /// The move a key code asks for, given where the camera faces now.
    pub fn action_for(&self, code: u32, camera: &Camera) -> Action {
        let Some(key) = NavKey::from_code(code) else {
            return Action::Noop;
        };
        let forward = Self::horizontal_forward(camera);
        let left = camera.up.cross(forward);
        let delta = match key {
            NavKey::Forward => forward * self.config.forward_step,
            NavKey::Left => left * self.config.strafe_step,
            NavKey::Back => -(forward * self.config.back_step),
            NavKey::Right => -(left * self.config.strafe_step),
        };
        Action::Move(delta)
    }

    /// Handle one key-down event, moving the camera in place.
    pub fn handle_key(&self, code: u32, camera: &mut Camera) {
        if let Action::Move(delta) = self.action_for(code, camera) {
            camera.position += delta;
            tracing::debug!(code, ?delta, position = ?camera.position, "camera moved");
        }
    }
}
