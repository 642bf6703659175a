//! Input: numeric key codes and pointer movement mapped to camera changes.
//!
//! # Invariants
//! - Navigation never changes camera height.
//! - Unknown key codes do nothing.
//! - Look changes only apply while the pointer is locked.

pub mod action;
pub mod config;
pub mod keys;
pub mod navigation;
pub mod pointer;

pub use action::Action;
pub use config::InputConfig;
pub use keys::NavKey;
pub use navigation::{NavigationConfig, NavigationController};
pub use pointer::{PointerConfig, PointerLockControls};

pub fn crate_info() -> &'static str {
    "museum-input v0.1.0"
}
