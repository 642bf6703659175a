use museum_input::{Action, NavigationController, keys};
use museum_kernel::Camera;
use winit::keyboard::KeyCode;

/// The action a key press asks for. Escape releases the pointer.
pub fn key_action(key: KeyCode, navigation: &NavigationController, camera: &Camera) -> Action {
    if key == KeyCode::Escape {
        return Action::UnlockPointer;
    }
    key_code(key).map_or(Action::Noop, |code| navigation.action_for(code, camera))
}

/// Numeric key code for a physical key, for the keys navigation knows.
pub fn key_code(key: KeyCode) -> Option<u32> {
    let code = match key {
        KeyCode::ArrowLeft => keys::ARROW_LEFT,
        KeyCode::ArrowUp => keys::ARROW_UP,
        KeyCode::ArrowRight => keys::ARROW_RIGHT,
        KeyCode::ArrowDown => keys::ARROW_DOWN,
        KeyCode::KeyA => keys::KEY_A,
        KeyCode::KeyD => keys::KEY_D,
        KeyCode::KeyS => keys::KEY_S,
        KeyCode::KeyW => keys::KEY_W,
        _ => return None,
    };
    Some(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use museum_input::NavKey;

    #[test]
    fn wasd_and_arrows_map_to_the_same_moves() {
        let pairs = [
            (KeyCode::KeyW, KeyCode::ArrowUp, NavKey::Forward),
            (KeyCode::KeyA, KeyCode::ArrowLeft, NavKey::Left),
            (KeyCode::KeyS, KeyCode::ArrowDown, NavKey::Back),
            (KeyCode::KeyD, KeyCode::ArrowRight, NavKey::Right),
        ];
        for (letter, arrow, nav) in pairs {
            assert_eq!(key_code(letter).and_then(NavKey::from_code), Some(nav));
            assert_eq!(key_code(arrow).and_then(NavKey::from_code), Some(nav));
        }
    }

    #[test]
    fn escape_releases_and_movement_keys_move() {
        let nav = NavigationController::default();
        let cam = Camera::default();
        assert_eq!(key_action(KeyCode::Escape, &nav, &cam), Action::UnlockPointer);
        assert!(matches!(key_action(KeyCode::KeyW, &nav, &cam), Action::Move(_)));
        assert!(key_action(KeyCode::Space, &nav, &cam).is_noop());
    }

    #[test]
    fn other_keys_are_unmapped() {
        assert_eq!(key_code(KeyCode::Space), None);
        assert_eq!(key_code(KeyCode::F1), None);
    }
}
