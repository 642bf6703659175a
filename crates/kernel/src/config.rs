use std::path::Path;

use glam::Vec3;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::scene::MuseumLayout;

/// Errors from loading configuration files.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read a JSON config file into any serde type.
pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ConfigError> {
    let file = std::fs::File::open(path)?;
    let value = serde_json::from_reader(std::io::BufReader::new(file))?;
    Ok(value)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitConfig {
    pub radius: f32,
    /// Radians per frame.
    pub speed: f64,
}

/// An orbit section as written in a file. Missing fields keep the value the
/// body has by default.
#[derive(Deserialize)]
struct OrbitOverride {
    radius: Option<f32>,
    speed: Option<f64>,
}

impl OrbitOverride {
    fn over(self, base: OrbitConfig) -> OrbitConfig {
        OrbitConfig {
            radius: self.radius.unwrap_or(base.radius),
            speed: self.speed.unwrap_or(base.speed),
        }
    }
}

fn primary_orbit<'de, D: Deserializer<'de>>(d: D) -> Result<OrbitConfig, D::Error> {
    Ok(OrbitOverride::deserialize(d)?.over(AnimationConfig::default().primary))
}

fn satellite_orbit<'de, D: Deserializer<'de>>(d: D) -> Result<OrbitConfig, D::Error> {
    Ok(OrbitOverride::deserialize(d)?.over(AnimationConfig::default().satellite))
}

/// Per-frame animation constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Added to the effect clock every frame.
    pub effect_step: f64,
    /// Added to every body's spin every frame.
    pub spin_step: f64,
    /// Orbit plane height above the camera.
    pub height_offset: f32,
    #[serde(deserialize_with = "primary_orbit")]
    pub primary: OrbitConfig,
    #[serde(deserialize_with = "satellite_orbit")]
    pub satellite: OrbitConfig,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            effect_step: 0.01,
            spin_step: 0.001,
            height_offset: 6.0,
            primary: OrbitConfig {
                radius: 150.0,
                speed: 0.001,
            },
            satellite: OrbitConfig {
                radius: 120.0,
                speed: 0.003,
            },
        }
    }
}

/// Everything needed to build a [`crate::Museum`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MuseumConfig {
    pub animation: AnimationConfig,
    pub layout: MuseumLayout,
    pub camera_start: Vec3,
}

impl Default for MuseumConfig {
    fn default() -> Self {
        Self {
            animation: AnimationConfig::default(),
            layout: MuseumLayout::default(),
            camera_start: Vec3::new(0.0, 2.0, 0.0),
        }
    }
}

impl MuseumConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        load_json(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_reference_constants() {
        let cfg = AnimationConfig::default();
        assert_eq!(cfg.effect_step, 0.01);
        assert_eq!(cfg.spin_step, 0.001);
        assert_eq!(cfg.height_offset, 6.0);
        assert_eq!(cfg.primary.radius, 150.0);
        assert_eq!(cfg.primary.speed, 0.001);
        assert_eq!(cfg.satellite.radius, 120.0);
        assert_eq!(cfg.satellite.speed, 0.003);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, r#"{{"animation": {{"spin_step": 0.01}}, "camera_start": [1.0, 3.0, 0.0]}}"#).unwrap();
        let cfg = MuseumConfig::load(tmp.path()).unwrap();
        assert_eq!(cfg.animation.spin_step, 0.01);
        assert_eq!(cfg.animation.effect_step, 0.01);
        assert_eq!(cfg.camera_start, Vec3::new(1.0, 3.0, 0.0));
        assert_eq!(cfg.layout, MuseumLayout::default());
    }

    #[test]
    fn partial_orbit_keeps_its_own_defaults() {
        let cfg: AnimationConfig = serde_json::from_str(
            r#"{"primary": {"radius": 100}, "satellite": {"speed": 0.01}}"#,
        )
        .unwrap();
        assert_eq!(cfg.primary.radius, 100.0);
        assert_eq!(cfg.primary.speed, 0.001);
        assert_eq!(cfg.satellite.radius, 120.0);
        assert_eq!(cfg.satellite.speed, 0.01);

        let cfg: MuseumConfig =
            serde_json::from_str(r#"{"animation": {"primary": {"radius": 100}}}"#).unwrap();
        assert_eq!(cfg.animation.primary.radius, 100.0);
        assert_eq!(cfg.animation.satellite, AnimationConfig::default().satellite);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = MuseumConfig::load(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn malformed_file_is_json_error() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, "{{ not json").unwrap();
        let err = MuseumConfig::load(tmp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }
}
