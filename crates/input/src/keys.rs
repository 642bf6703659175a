//! Numeric key codes, as browsers report them in `keyCode`.

pub const ARROW_LEFT: u32 = 37;
pub const ARROW_UP: u32 = 38;
pub const ARROW_RIGHT: u32 = 39;
pub const ARROW_DOWN: u32 = 40;
pub const KEY_A: u32 = 65;
pub const KEY_D: u32 = 68;
pub const KEY_S: u32 = 83;
pub const KEY_W: u32 = 87;

/// Walking direction bound to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavKey {
    Forward,
    Left,
    Back,
    Right,
}

impl NavKey {
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            ARROW_UP | KEY_W => Some(Self::Forward),
            ARROW_LEFT | KEY_A => Some(Self::Left),
            ARROW_DOWN | KEY_S => Some(Self::Back),
            ARROW_RIGHT | KEY_D => Some(Self::Right),
            _ => None,
        }
    }
}
