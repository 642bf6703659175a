use std::f32::consts::{FRAC_PI_2, TAU};

use glam::{Quat, Vec3};
use museum_common::{NodeId, Transform};
use serde::{Deserialize, Serialize};

/// Handle to a loaded model mesh, assigned by the asset store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MeshHandle(pub u64);

/// Built-in primitive or loaded model. Primitives are unit sized; the node
/// transform scales them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shape {
    /// 1×1×1 box centred on the origin.
    Cube,
    /// Radius 1.
    Sphere,
    /// Radius 1, height 1, centred on the origin.
    Cylinder,
    /// 1×1 in the XY plane, facing `+Z`.
    Plane,
    /// Upper hemisphere of radius 1.
    Dome,
    Model(MeshHandle),
}

/// Surface look. The renderer maps these to colours; only `Hologram` reads
/// the effect clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Material {
    Fresco,
    Column,
    Hologram,
    Ground,
    Earth,
    Sun,
    Moon,
    Sculpture,
}

/// Which faces of a surface are drawn. Front faces are the ones whose
/// normals point at the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Side {
    #[default]
    Both,
    /// Seen from outside only.
    Outside,
    /// Seen from inside only, e.g. a painted ceiling.
    Inside,
}

impl Side {
    /// Whether a face seen from the front (`true`) or back is drawn.
    pub fn shows(self, front_facing: bool) -> bool {
        match self {
            Side::Both => true,
            Side::Outside => front_facing,
            Side::Inside => !front_facing,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Light {
    /// Direction the light comes from, normalized.
    pub direction: Vec3,
    pub intensity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    pub id: NodeId,
    pub name: String,
    pub shape: Shape,
    pub material: Material,
    #[serde(default)]
    pub side: Side,
    pub transform: Transform,
}

/// Static part of the museum: everything except the orbiting bodies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    nodes: Vec<SceneNode>,
    lights: Vec<Light>,
    skybox: Vec<String>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: impl Into<String>, shape: Shape, material: Material, transform: Transform) -> NodeId {
        self.add_sided(name, shape, material, Side::Both, transform)
    }

    /// Like [`Scene::add`], for surfaces drawn from one side only.
    pub fn add_sided(
        &mut self,
        name: impl Into<String>,
        shape: Shape,
        material: Material,
        side: Side,
        transform: Transform,
    ) -> NodeId {
        let id = NodeId::new();
        self.nodes.push(SceneNode {
            id,
            name: name.into(),
            shape,
            material,
            side,
            transform,
        });
        id
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn set_skybox(&mut self, faces: Vec<String>) {
        self.skybox = faces;
    }

    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Skybox face paths: right, left, top, bottom, front, back.
    pub fn skybox(&self) -> &[String] {
        &self.skybox
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// A sculpture model and the uniform scale it is shown at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SculptureSpec {
    pub path: String,
    pub scale: f32,
}

impl SculptureSpec {
    fn new(path: &str, scale: f32) -> Self {
        Self {
            path: path.to_string(),
            scale,
        }
    }
}

/// Parameters of the museum floor plan.
///
/// `build` lays everything out with the floor at height 0; the camera is
/// placed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MuseumLayout {
    pub pedestal_ring_radius: f32,
    pub column_count: usize,
    pub column_ring_radius: f32,
    pub column_height: f32,
    pub ground_size: f32,
    pub dome_radius: f32,
    pub dome_height: f32,
    /// One sculpture per pedestal.
    pub sculptures: Vec<SculptureSpec>,
    pub skybox: Vec<String>,
}

impl Default for MuseumLayout {
    fn default() -> Self {
        Self {
            pedestal_ring_radius: 5.0,
            column_count: 8,
            column_ring_radius: 10.0,
            column_height: 15.0,
            ground_size: 50.0,
            dome_radius: 10.0,
            dome_height: 10.0,
            sculptures: vec![
                SculptureSpec::new("models/sculpt1.obj", 5.1),
                SculptureSpec::new("models/sculpt2.obj", 0.19),
                SculptureSpec::new("models/sculpt3.obj", 0.5),
                SculptureSpec::new("models/sculpt4.obj", 0.003),
                SculptureSpec::new("models/sculpt5.obj", 0.01),
                SculptureSpec::new("models/sculpt6.obj", 0.01),
                SculptureSpec::new("models/sculpt7.obj", 0.02),
                SculptureSpec::new("models/sculpt8.obj", 0.2),
            ],
            skybox: ["right", "left", "top", "bot", "front", "back"]
                .iter()
                .map(|face| format!("skybox/{face}.png"))
                .collect(),
        }
    }
}

impl MuseumLayout {
    pub fn pedestal_count(&self) -> usize {
        self.sculptures.len()
    }

    /// Point on a ring of `radius` at slot `i` of `count`, at `height`.
    fn ring_point(i: usize, count: usize, radius: f32, height: f32) -> Vec3 {
        let angle = i as f32 / count as f32 * TAU;
        Vec3::new(angle.cos() * radius, height, angle.sin() * radius)
    }

    /// Where the sculpture for `slot` stands, on top of its pedestal.
    pub fn sculpture_position(&self, slot: usize) -> Vec3 {
        Self::ring_point(slot, self.pedestal_count(), self.pedestal_ring_radius, 1.5)
    }

    pub fn build(&self) -> Scene {
        let mut scene = Scene::new();

        scene.add_light(Light {
            direction: Vec3::ONE.normalize(),
            intensity: 1.0,
        });
        scene.add_light(Light {
            direction: Vec3::NEG_ONE.normalize(),
            intensity: 1.0,
        });

        scene.add(
            "ground",
            Shape::Plane,
            Material::Ground,
            Transform::default()
                .with_rotation(Quat::from_rotation_x(FRAC_PI_2))
                .with_scale(Vec3::new(self.ground_size, self.ground_size, 1.0)),
        );

        let pedestals = self.pedestal_count();
        for i in 0..pedestals {
            let pos = Self::ring_point(i, pedestals, self.pedestal_ring_radius, 0.5);
            scene.add(
                format!("pedestal_{i}"),
                Shape::Cube,
                Material::Hologram,
                Transform::from_position(pos),
            );
        }

        for i in 0..self.column_count {
            let pos = Self::ring_point(i, self.column_count, self.column_ring_radius, 2.5);
            scene.add(
                format!("column_{i}"),
                Shape::Cylinder,
                Material::Column,
                Transform::from_position(pos).with_scale(Vec3::new(1.0, self.column_height, 1.0)),
            );
        }

        let dome = Transform::from_position(Vec3::new(0.0, self.dome_height, 0.0))
            .with_scale(Vec3::splat(self.dome_radius));
        // Two shells on one surface: stone outside, fresco inside.
        scene.add_sided("dome_outer", Shape::Dome, Material::Column, Side::Outside, dome);
        scene.add_sided("dome_fresco", Shape::Dome, Material::Fresco, Side::Inside, dome);

        scene.set_skybox(self.skybox.clone());
        scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(scene: &Scene, shape: Shape) -> usize {
        scene.nodes().iter().filter(|n| n.shape == shape).count()
    }

    #[test]
    fn default_layout_matches_floor_plan() {
        let scene = MuseumLayout::default().build();
        assert_eq!(count(&scene, Shape::Cube), 8);
        assert_eq!(count(&scene, Shape::Cylinder), 8);
        assert_eq!(count(&scene, Shape::Plane), 1);
        assert_eq!(count(&scene, Shape::Dome), 2);
        assert_eq!(scene.lights().len(), 2);
        assert_eq!(scene.skybox().len(), 6);
        assert_eq!(scene.len(), 19);
    }

    #[test]
    fn each_dome_face_shows_exactly_one_shell() {
        let scene = MuseumLayout::default().build();
        let shells: Vec<&SceneNode> = scene.nodes().iter().filter(|n| n.shape == Shape::Dome).collect();
        assert_eq!(shells.len(), 2);
        assert_eq!(shells[0].transform, shells[1].transform);

        for front_facing in [true, false] {
            let shown: Vec<Material> = shells
                .iter()
                .filter(|n| n.side.shows(front_facing))
                .map(|n| n.material)
                .collect();
            let expected = if front_facing { Material::Column } else { Material::Fresco };
            assert_eq!(shown, vec![expected]);
        }
    }

    #[test]
    fn plain_nodes_show_both_sides() {
        let scene = MuseumLayout::default().build();
        for node in scene.nodes().iter().filter(|n| n.shape != Shape::Dome) {
            assert_eq!(node.side, Side::Both, "{}", node.name);
        }
        assert!(Side::Both.shows(true) && Side::Both.shows(false));
    }

    #[test]
    fn pedestals_sit_on_inner_ring() {
        let scene = MuseumLayout::default().build();
        for node in scene.nodes().iter().filter(|n| n.shape == Shape::Cube) {
            let p = node.transform.position;
            assert_eq!(p.y, 0.5);
            assert!((Vec3::new(p.x, 0.0, p.z).length() - 5.0).abs() < 1e-5);
            assert_eq!(node.material, Material::Hologram);
        }
    }

    #[test]
    fn first_column_is_on_positive_x() {
        let scene = MuseumLayout::default().build();
        let column = scene
            .nodes()
            .iter()
            .find(|n| n.name == "column_0")
            .unwrap();
        assert!((column.transform.position - Vec3::new(10.0, 2.5, 0.0)).length() < 1e-5);
        assert_eq!(column.transform.scale.y, 15.0);
    }

    #[test]
    fn sculpture_sits_above_pedestal() {
        let layout = MuseumLayout::default();
        let p = layout.sculpture_position(2);
        assert!((p - Vec3::new(0.0, 1.5, 5.0)).length() < 1e-5);
    }

    #[test]
    fn lookup_by_id() {
        let mut scene = Scene::new();
        let id = scene.add("box", Shape::Cube, Material::Column, Transform::default());
        assert_eq!(scene.get(id).map(|n| n.name.as_str()), Some("box"));
        assert!(scene.get(NodeId::new()).is_none());
    }

    #[test]
    fn layout_round_trips_through_json() {
        let layout = MuseumLayout::default();
        let json = serde_json::to_string(&layout).unwrap();
        let back: MuseumLayout = serde_json::from_str(&json).unwrap();
        assert_eq!(layout, back);
        let partial: MuseumLayout = serde_json::from_str(r#"{"column_count": 4}"#).unwrap();
        assert_eq!(partial.column_count, 4);
        assert_eq!(partial.sculptures.len(), 8);
    }
}
