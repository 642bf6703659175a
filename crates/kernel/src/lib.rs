//! Museum kernel: scene state, orbital animation, frame driver.
//!
//! # Invariants
//! - All mutable state lives in [`Museum`]; nothing is global.
//! - One frame advances the effect clock, both orbits and every spin exactly once.
//! - Orbiting bodies are addressed by role, never by registration index.

pub mod body;
pub mod camera;
pub mod config;
pub mod driver;
pub mod museum;
pub mod scene;

pub use body::{Bodies, BodyRole, Orbit, OrbitingBody};
pub use camera::Camera;
pub use config::{AnimationConfig, ConfigError, MuseumConfig, OrbitConfig};
pub use driver::{FixedFrames, FrameClock, FrameDriver, FrameHost, StopHandle};
pub use museum::{Drawable, EffectClock, Museum};
pub use scene::{Light, Material, MeshHandle, MuseumLayout, Scene, SceneNode, Shape, SculptureSpec, Side};
