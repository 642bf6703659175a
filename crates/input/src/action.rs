use glam::Vec3;
use museum_kernel::Camera;

use crate::pointer::PointerLockControls;

/// A high-level action produced from raw input.
///
/// The shell turns key presses, clicks and focus changes into actions and
/// hands them to [`Action::apply`]; camera moves and pointer capture change
/// nowhere else.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Translate the camera by a world-space delta.
    Move(Vec3),
    /// Capture the pointer for mouse look.
    LockPointer,
    /// Release the pointer.
    UnlockPointer,
    /// Input with no binding.
    Noop,
}

impl Action {
    pub fn is_noop(&self) -> bool {
        matches!(self, Self::Noop)
    }

    /// Apply to the camera and pointer. Returns `true` when pointer capture
    /// changed, so the window can grab or release the cursor.
    pub fn apply(&self, camera: &mut Camera, pointer: &mut PointerLockControls) -> bool {
        match self {
            Action::Move(delta) => {
                camera.position += *delta;
                tracing::debug!(?delta, position = ?camera.position, "camera moved");
                false
            }
            Action::LockPointer => pointer.lock(),
            Action::UnlockPointer => pointer.unlock(),
            Action::Noop => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_translates_camera_only() {
        let mut cam = Camera::default();
        let mut pointer = PointerLockControls::default();
        let changed = Action::Move(Vec3::new(1.0, 0.0, -2.0)).apply(&mut cam, &mut pointer);
        assert!(!changed);
        assert_eq!(cam.position, Camera::default().position + Vec3::new(1.0, 0.0, -2.0));
        assert!(!pointer.is_locked());
    }

    #[test]
    fn lock_and_unlock_report_capture_changes() {
        let mut cam = Camera::default();
        let mut pointer = PointerLockControls::default();

        assert!(Action::LockPointer.apply(&mut cam, &mut pointer));
        assert!(pointer.is_locked());
        // A second click while captured changes nothing.
        assert!(!Action::LockPointer.apply(&mut cam, &mut pointer));

        assert!(Action::UnlockPointer.apply(&mut cam, &mut pointer));
        assert!(!pointer.is_locked());
        // Focus loss after Escape is a no-op.
        assert!(!Action::UnlockPointer.apply(&mut cam, &mut pointer));
        assert_eq!(cam, Camera::default());
    }

    #[test]
    fn unlock_drops_buffered_look() {
        let mut cam = Camera::default();
        let mut pointer = PointerLockControls::default();
        Action::LockPointer.apply(&mut cam, &mut pointer);
        pointer.on_pointer_move(40.0, 10.0);
        Action::UnlockPointer.apply(&mut cam, &mut pointer);
        pointer.update(&mut cam);
        assert_eq!(cam, Camera::default());
    }

    #[test]
    fn noop_changes_nothing() {
        let mut cam = Camera::default();
        let mut pointer = PointerLockControls::default();
        assert!(Action::Noop.is_noop());
        assert!(!Action::Noop.apply(&mut cam, &mut pointer));
        assert_eq!(cam, Camera::default());
    }
}
