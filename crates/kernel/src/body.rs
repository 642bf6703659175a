use std::f64::consts::TAU;

use glam::{Quat, Vec3};
use museum_common::Transform;
use serde::{Deserialize, Serialize};

use crate::scene::Material;

/// Which of the three animated bodies this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyRole {
    /// Earth: orbits at the wide radius.
    Primary,
    /// Sun: stays put and only spins.
    Secondary,
    /// Moon: orbits at the inner radius, faster.
    Satellite,
}

impl BodyRole {
    pub fn label(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Satellite => "satellite",
        }
    }
}

/// Circular orbit in the horizontal plane.
///
/// The angle is never wrapped, so it is kept in `f64` to stay exact over
/// long runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Orbit {
    pub radius: f32,
    /// Radians added to `angle` every frame.
    pub speed: f64,
    pub angle: f64,
}

impl Orbit {
    pub fn new(radius: f32, speed: f64) -> Self {
        Self {
            radius,
            speed,
            angle: 0.0,
        }
    }

    /// Advance one frame and return the new position at the given height.
    pub fn advance(&mut self, height: f32) -> Vec3 {
        self.angle += self.speed;
        self.position_at(height)
    }

    pub fn position_at(&self, height: f32) -> Vec3 {
        let r = f64::from(self.radius);
        Vec3::new(
            (r * self.angle.cos()) as f32,
            height,
            (r * self.angle.sin()) as f32,
        )
    }
}

/// A sphere that spins about `+Y` and may follow an orbit.
///
/// `transform.scale` carries the sphere radius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitingBody {
    pub role: BodyRole,
    pub name: String,
    pub material: Material,
    pub transform: Transform,
    /// Accumulated spin about `+Y`, unwrapped.
    pub spin: f64,
    pub orbit: Option<Orbit>,
}

impl OrbitingBody {
    pub fn new(role: BodyRole, name: &str, material: Material, position: Vec3, radius: f32) -> Self {
        Self {
            role,
            name: name.to_string(),
            material,
            transform: Transform::from_position(position).with_scale(Vec3::splat(radius)),
            spin: 0.0,
            orbit: None,
        }
    }

    pub fn with_orbit(mut self, orbit: Orbit) -> Self {
        self.orbit = Some(orbit);
        self
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// Add `step` to the spin angle and rebuild the rotation from it.
    pub fn spin_by(&mut self, step: f64) {
        self.spin += step;
        self.transform.rotation = Quat::from_rotation_y(self.spin.rem_euclid(TAU) as f32);
    }
}

/// The three animated bodies, held by role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bodies {
    pub primary: OrbitingBody,
    pub secondary: OrbitingBody,
    pub satellite: OrbitingBody,
}

impl Bodies {
    pub fn get(&self, role: BodyRole) -> &OrbitingBody {
        match role {
            BodyRole::Primary => &self.primary,
            BodyRole::Secondary => &self.secondary,
            BodyRole::Satellite => &self.satellite,
        }
    }

    /// Registration order: primary, secondary, satellite.
    pub fn iter(&self) -> impl Iterator<Item = &OrbitingBody> {
        [&self.primary, &self.secondary, &self.satellite].into_iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut OrbitingBody> {
        [&mut self.primary, &mut self.secondary, &mut self.satellite].into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bodies() -> Bodies {
        Bodies {
            primary: OrbitingBody::new(BodyRole::Primary, "earth", Material::Earth, Vec3::ZERO, 5.0)
                .with_orbit(Orbit::new(150.0, 0.001)),
            secondary: OrbitingBody::new(BodyRole::Secondary, "sun", Material::Sun, Vec3::ZERO, 30.0),
            satellite: OrbitingBody::new(BodyRole::Satellite, "moon", Material::Moon, Vec3::ZERO, 2.0)
                .with_orbit(Orbit::new(120.0, 0.003)),
        }
    }

    #[test]
    fn orbit_advance_moves_along_circle() {
        let mut orbit = Orbit::new(10.0, 0.5);
        let p = orbit.advance(3.0);
        assert_eq!(orbit.angle, 0.5);
        assert!((p - Vec3::new(10.0 * 0.5f32.cos(), 3.0, 10.0 * 0.5f32.sin())).length() < 1e-5);
        assert!((Vec3::new(p.x, 0.0, p.z).length() - 10.0).abs() < 1e-5);
    }

    #[test]
    fn spin_rebuilds_rotation_about_y() {
        let mut body = OrbitingBody::new(BodyRole::Secondary, "sun", Material::Sun, Vec3::ZERO, 1.0);
        body.spin_by(0.25);
        body.spin_by(0.25);
        assert_eq!(body.spin, 0.5);
        let expected = Quat::from_rotation_y(0.5);
        assert!(body.transform.rotation.abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn long_orbit_keeps_closed_form() {
        let mut orbit = Orbit::new(150.0, 0.001);
        let frames = 216_000u32;
        let mut p = Vec3::ZERO;
        for _ in 0..frames {
            p = orbit.advance(8.0);
        }
        let a = 0.001 * f64::from(frames);
        assert!((orbit.angle - a).abs() < 1e-6, "angle {}", orbit.angle);
        let expected = Vec3::new((150.0 * a.cos()) as f32, 8.0, (150.0 * a.sin()) as f32);
        assert!((p - expected).length() < 1e-3, "{p} vs {expected}");
    }

    #[test]
    fn long_spin_keeps_rotation_exact() {
        let mut body = OrbitingBody::new(BodyRole::Secondary, "sun", Material::Sun, Vec3::ZERO, 1.0);
        for _ in 0..216_000 {
            body.spin_by(0.001);
        }
        assert!((body.spin - 216.0).abs() < 1e-6);
        let expected = Quat::from_rotation_y((216.0f64 % TAU) as f32);
        assert!(body.transform.rotation.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn radius_lives_in_scale() {
        let body = OrbitingBody::new(BodyRole::Satellite, "moon", Material::Moon, Vec3::ONE, 2.0);
        assert_eq!(body.transform.scale, Vec3::splat(2.0));
        assert_eq!(body.position(), Vec3::ONE);
    }

    #[test]
    fn iteration_follows_registration_order() {
        let b = bodies();
        let roles: Vec<BodyRole> = b.iter().map(|body| body.role).collect();
        assert_eq!(
            roles,
            vec![BodyRole::Primary, BodyRole::Secondary, BodyRole::Satellite]
        );
        assert_eq!(b.get(BodyRole::Satellite).name, "moon");
    }
}
