use std::f32::consts::FRAC_PI_2;

use glam::Vec2;
use museum_kernel::Camera;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointerConfig {
    /// Radians of turn per pixel of pointer movement.
    pub sensitivity: f32,
    pub min_pitch: f32,
    pub max_pitch: f32,
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            sensitivity: 0.002,
            min_pitch: -FRAC_PI_2,
            max_pitch: FRAC_PI_2,
        }
    }
}

/// First-person mouse look that only listens while the pointer is captured.
///
/// Pointer deltas are buffered as they arrive and folded into the camera's
/// yaw and pitch on [`PointerLockControls::update`], once per frame.
#[derive(Debug, Clone, Default)]
pub struct PointerLockControls {
    config: PointerConfig,
    locked: bool,
    pending: Vec2,
}

impl PointerLockControls {
    pub fn new(config: PointerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Capture the pointer. Returns `true` if it was not captured before.
    pub fn lock(&mut self) -> bool {
        let changed = !self.locked;
        if changed {
            tracing::debug!("pointer locked");
        }
        self.locked = true;
        changed
    }

    /// Release capture. Movement still buffered is dropped. Returns `true`
    /// if the pointer was captured before.
    pub fn unlock(&mut self) -> bool {
        let changed = self.locked;
        if changed {
            tracing::debug!("pointer unlocked");
        }
        self.locked = false;
        self.pending = Vec2::ZERO;
        changed
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Raw pointer movement in pixels. Ignored while unlocked.
    pub fn on_pointer_move(&mut self, dx: f32, dy: f32) {
        if self.locked {
            self.pending += Vec2::new(dx, dy);
        }
    }

    /// Apply buffered movement to the camera and clear it.
    pub fn update(&mut self, camera: &mut Camera) {
        if self.pending == Vec2::ZERO {
            return;
        }
        let delta = std::mem::take(&mut self.pending) * self.config.sensitivity;
        camera.yaw -= delta.x;
        camera.pitch = (camera.pitch - delta.y).clamp(self.config.min_pitch, self.config.max_pitch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlocked_ignores_movement() {
        let mut controls = PointerLockControls::default();
        let mut cam = Camera::default();
        controls.on_pointer_move(100.0, 50.0);
        controls.update(&mut cam);
        assert_eq!(cam, Camera::default());
    }

    #[test]
    fn locked_movement_turns_camera() {
        let mut controls = PointerLockControls::default();
        let mut cam = Camera::default();
        controls.lock();
        controls.on_pointer_move(50.0, 0.0);
        controls.on_pointer_move(50.0, -25.0);
        controls.update(&mut cam);
        assert!((cam.yaw + 0.2).abs() < 1e-6);
        assert!((cam.pitch - 0.05).abs() < 1e-6);

        // Buffer is cleared after update.
        let after = cam;
        controls.update(&mut cam);
        assert_eq!(cam, after);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut controls = PointerLockControls::default();
        let mut cam = Camera::default();
        controls.lock();
        controls.on_pointer_move(0.0, -100_000.0);
        controls.update(&mut cam);
        assert_eq!(cam.pitch, FRAC_PI_2);
        controls.on_pointer_move(0.0, 100_000.0);
        controls.update(&mut cam);
        assert_eq!(cam.pitch, -FRAC_PI_2);
    }

    #[test]
    fn unlock_drops_pending_movement() {
        let mut controls = PointerLockControls::default();
        let mut cam = Camera::default();
        controls.lock();
        assert!(controls.is_locked());
        controls.on_pointer_move(10.0, 10.0);
        controls.unlock();
        assert!(!controls.is_locked());
        controls.update(&mut cam);
        assert_eq!(cam, Camera::default());
    }

    #[test]
    fn look_never_moves_position() {
        let mut controls = PointerLockControls::new(PointerConfig {
            sensitivity: 0.01,
            ..PointerConfig::default()
        });
        let mut cam = Camera::default();
        controls.lock();
        controls.on_pointer_move(-30.0, 12.0);
        controls.update(&mut cam);
        assert_eq!(cam.position, Camera::default().position);
        assert!((cam.yaw - 0.3).abs() < 1e-6);
    }
}
