use glam::Vec3;
use museum_common::{NodeId, Transform};

use crate::body::{Bodies, BodyRole, Orbit, OrbitingBody};
use crate::camera::Camera;
use crate::config::{AnimationConfig, MuseumConfig};
use crate::scene::{Material, MeshHandle, MuseumLayout, Scene, Shape, Side};

/// Scalar time fed to the hologram shader. Narrowed to `f32` only when it
/// is written to the uniform.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EffectClock {
    pub time: f64,
}

impl EffectClock {
    pub fn advance(&mut self, step: f64) -> f64 {
        self.time += step;
        self.time
    }
}

/// One thing for the renderer to draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drawable {
    pub shape: Shape,
    pub material: Material,
    pub side: Side,
    pub transform: Transform,
}

/// The whole simulation state: camera, animated bodies, effect clock and the
/// static scene.
///
/// Navigation mutates `camera`; [`Museum::animate`] advances everything else.
#[derive(Debug, Clone)]
pub struct Museum {
    pub camera: Camera,
    pub bodies: Bodies,
    pub clock: EffectClock,
    scene: Scene,
    layout: MuseumLayout,
    animation: AnimationConfig,
    frame: u64,
}

impl Default for Museum {
    fn default() -> Self {
        Self::new(&MuseumConfig::default())
    }
}

impl Museum {
    pub fn new(config: &MuseumConfig) -> Self {
        let anim = config.animation;
        // Bodies are placed while the camera still sits at the floor.
        let y = anim.height_offset;
        let bodies = Bodies {
            primary: OrbitingBody::new(BodyRole::Primary, "earth", Material::Earth, Vec3::new(40.0, y, 1.0), 5.0)
                .with_orbit(Orbit::new(anim.primary.radius, anim.primary.speed)),
            secondary: OrbitingBody::new(BodyRole::Secondary, "sun", Material::Sun, Vec3::new(60.0, y, 40.0), 30.0),
            satellite: OrbitingBody::new(BodyRole::Satellite, "moon", Material::Moon, Vec3::new(40.0, y, 5.0), 2.0)
                .with_orbit(Orbit::new(anim.satellite.radius, anim.satellite.speed)),
        };

        let scene = config.layout.build();
        tracing::debug!(nodes = scene.len(), "museum scene built");

        Self {
            camera: Camera::at(config.camera_start),
            bodies,
            clock: EffectClock::default(),
            scene,
            layout: config.layout.clone(),
            animation: anim,
            frame: 0,
        }
    }

    /// Frames animated so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Current value of the hologram time uniform.
    pub fn effect_time(&self) -> f64 {
        self.clock.time
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn layout(&self) -> &MuseumLayout {
        &self.layout
    }

    /// Advance one frame of animation.
    ///
    /// Order matters: effect clock, primary orbit, satellite orbit, then the
    /// spin of every body in registration order. Orbit height follows the
    /// camera as it is at this call.
    pub fn animate(&mut self) {
        let anim = self.animation;
        self.clock.advance(anim.effect_step);

        let height = self.camera.position.y + anim.height_offset;
        for body in [&mut self.bodies.primary, &mut self.bodies.satellite] {
            if let Some(orbit) = body.orbit.as_mut() {
                body.transform.position = orbit.advance(height);
            }
        }

        for body in self.bodies.iter_mut() {
            body.spin_by(anim.spin_step);
        }

        self.frame += 1;
    }

    /// Put a loaded sculpture on its pedestal, turned to face the camera.
    ///
    /// Returns `None` for a slot the layout does not have.
    pub fn place_sculpture(&mut self, slot: usize, mesh: MeshHandle) -> Option<NodeId> {
        let spec = self.layout.sculptures.get(slot)?;
        let mut transform = Transform::from_position(self.layout.sculpture_position(slot))
            .with_scale(Vec3::splat(spec.scale));
        transform.look_at(self.camera.position, self.camera.up);
        let id = self.scene.add(
            format!("sculpture_{slot}"),
            Shape::Model(mesh),
            Material::Sculpture,
            transform,
        );
        tracing::info!(slot, path = %spec.path, "sculpture placed");
        Some(id)
    }

    /// Static nodes followed by the three bodies.
    pub fn drawables(&self) -> impl Iterator<Item = Drawable> + '_ {
        let nodes = self.scene.nodes().iter().map(|n| Drawable {
            shape: n.shape,
            material: n.material,
            side: n.side,
            transform: n.transform,
        });
        let bodies = self.bodies.iter().map(|b| Drawable {
            shape: Shape::Sphere,
            material: b.material,
            side: Side::Both,
            transform: b.transform,
        });
        nodes.chain(bodies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    fn close(a: f32, b: f32, tol: f32) -> bool {
        (a - b).abs() <= tol
    }

    fn close64(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    fn run(museum: &mut Museum, frames: u64) {
        for _ in 0..frames {
            museum.animate();
        }
    }

    #[test]
    fn starts_at_reference_positions() {
        let m = Museum::default();
        assert_eq!(m.frame(), 0);
        assert_eq!(m.effect_time(), 0.0);
        assert_eq!(m.camera.position, Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(m.bodies.primary.position(), Vec3::new(40.0, 6.0, 1.0));
        assert_eq!(m.bodies.secondary.position(), Vec3::new(60.0, 6.0, 40.0));
        assert_eq!(m.bodies.satellite.position(), Vec3::new(40.0, 6.0, 5.0));
    }

    #[test]
    fn one_frame_moves_bodies_onto_orbits() {
        let mut m = Museum::default();
        m.animate();
        let p = m.bodies.primary.position();
        assert!(close(p.x, 150.0 * 0.001f32.cos(), 1e-4));
        assert_eq!(p.y, 8.0);
        assert!(close(p.z, 150.0 * 0.001f32.sin(), 1e-4));
        let s = m.bodies.satellite.position();
        assert!(close(s.x, 120.0 * 0.003f32.cos(), 1e-4));
        assert!(close(s.z, 120.0 * 0.003f32.sin(), 1e-4));
        // The sun has no orbit.
        assert_eq!(m.bodies.secondary.position(), Vec3::new(60.0, 6.0, 40.0));
    }

    #[test]
    fn thousand_frames_at_constant_height() {
        let mut m = Museum::default();
        run(&mut m, 1000);
        let p = m.bodies.primary.position();
        assert!(close(p.x, 150.0 * 1.0f32.cos(), 1e-3));
        assert_eq!(p.y, 8.0);
        assert!(close(p.z, 150.0 * 1.0f32.sin(), 1e-3));
        let s = m.bodies.satellite.position();
        assert!(close(s.x, 120.0 * 3.0f32.cos(), 1e-3));
        assert!(close(s.z, 120.0 * 3.0f32.sin(), 1e-3));
        assert_eq!(m.frame(), 1000);
    }

    #[test]
    fn hour_long_run_matches_closed_form() {
        let frames = 216_000u32;
        let n = f64::from(frames);
        let mut m = Museum::default();
        run(&mut m, u64::from(frames));

        assert!(close64(m.effect_time(), 0.01 * n, 1e-6), "effect time {}", m.effect_time());
        for body in m.bodies.iter() {
            assert!(close64(body.spin, 0.001 * n, 1e-6), "{} spin {}", body.name, body.spin);
        }

        let at = |radius: f64, angle: f64| {
            Vec3::new((radius * angle.cos()) as f32, 8.0, (radius * angle.sin()) as f32)
        };
        let p = m.bodies.primary.position();
        let expected = at(150.0, 0.001 * n);
        assert!((p - expected).length() < 1e-2, "primary {p} vs {expected}");
        let s = m.bodies.satellite.position();
        let expected = at(120.0, 0.003 * n);
        assert!((s - expected).length() < 1e-2, "satellite {s} vs {expected}");
    }

    #[test]
    fn effect_time_and_spin_accumulate() {
        let mut m = Museum::default();
        run(&mut m, 250);
        assert!(close64(m.effect_time(), 2.5, 1e-9));
        for body in m.bodies.iter() {
            assert!(close64(body.spin, 0.25, 1e-9), "{} spin {}", body.name, body.spin);
            let expected = Quat::from_rotation_y(body.spin as f32);
            assert!(body.transform.rotation.abs_diff_eq(expected, 1e-6));
        }
    }

    #[test]
    fn orbit_height_tracks_camera_each_frame() {
        let mut m = Museum::default();
        m.animate();
        assert_eq!(m.bodies.primary.position().y, 8.0);
        m.camera.position.y = 10.0;
        m.animate();
        assert_eq!(m.bodies.primary.position().y, 16.0);
        assert_eq!(m.bodies.satellite.position().y, 16.0);
        assert_eq!(m.bodies.secondary.position().y, 6.0);
    }

    #[test]
    fn sculpture_faces_camera() {
        let mut m = Museum::default();
        let id = m.place_sculpture(0, MeshHandle(7)).unwrap();
        let node = m.scene().get(id).unwrap();
        assert_eq!(node.shape, Shape::Model(MeshHandle(7)));
        assert_eq!(node.transform.scale, Vec3::splat(5.1));
        let facing = node.transform.rotation * Vec3::Z;
        let expected = (m.camera.position - node.transform.position).normalize();
        assert!((facing - expected).length() < 1e-5);
    }

    #[test]
    fn unknown_sculpture_slot_is_ignored() {
        let mut m = Museum::default();
        let before = m.scene().len();
        assert!(m.place_sculpture(99, MeshHandle(1)).is_none());
        assert_eq!(m.scene().len(), before);
    }

    #[test]
    fn drawables_cover_scene_and_bodies() {
        let m = Museum::default();
        let all: Vec<Drawable> = m.drawables().collect();
        assert_eq!(all.len(), m.scene().len() + 3);
        assert_eq!(all.iter().filter(|d| d.shape == Shape::Sphere).count(), 3);
    }
}
