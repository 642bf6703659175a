use museum_common::NodeId;
use museum_kernel::{BodyRole, Museum};

/// Museum inspector for developer tooling.
///
/// Provides read-only queries against the museum state for the desktop
/// overlay and the CLI.
pub struct MuseumInspector;

impl MuseumInspector {
    /// Produce a summary of the museum state.
    pub fn summary(museum: &Museum) -> MuseumSummary {
        let c = museum.camera.position;
        let d = museum.camera.world_direction();
        MuseumSummary {
            frame: museum.frame(),
            effect_time: museum.effect_time(),
            node_count: museum.scene().len(),
            camera_position: [c.x, c.y, c.z],
            camera_direction: [d.x, d.y, d.z],
            bodies: museum
                .bodies
                .iter()
                .map(|b| Self::inspect_body(museum, b.role))
                .collect(),
        }
    }

    pub fn inspect_body(museum: &Museum, role: BodyRole) -> BodyInfo {
        let body = museum.bodies.get(role);
        let p = body.position();
        BodyInfo {
            role,
            name: body.name.clone(),
            position: [p.x, p.y, p.z],
            spin: body.spin,
            orbit_angle: body.orbit.map(|o| o.angle),
        }
    }

    /// Look up a static scene node.
    pub fn inspect_node(museum: &Museum, id: NodeId) -> Option<NodeInfo> {
        museum.scene().get(id).map(|node| {
            let p = node.transform.position;
            let s = node.transform.scale;
            NodeInfo {
                id,
                name: node.name.clone(),
                position: [p.x, p.y, p.z],
                scale: [s.x, s.y, s.z],
            }
        })
    }
}

/// Summary of museum state for the inspector.
#[derive(Debug, Clone)]
pub struct MuseumSummary {
    pub frame: u64,
    pub effect_time: f64,
    pub node_count: usize,
    pub camera_position: [f32; 3],
    pub camera_direction: [f32; 3],
    pub bodies: Vec<BodyInfo>,
}

impl std::fmt::Display for MuseumSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [x, y, z] = self.camera_position;
        writeln!(
            f,
            "Museum: frame={} effect_time={:.2} nodes={}",
            self.frame, self.effect_time, self.node_count
        )?;
        writeln!(f, "Camera: ({x:.2}, {y:.2}, {z:.2})")?;
        for body in &self.bodies {
            writeln!(f, "  {body}")?;
        }
        Ok(())
    }
}

/// Detailed info about one orbiting body.
#[derive(Debug, Clone)]
pub struct BodyInfo {
    pub role: BodyRole,
    pub name: String,
    pub position: [f32; 3],
    pub spin: f64,
    /// `None` for a body that does not orbit.
    pub orbit_angle: Option<f64>,
}

impl std::fmt::Display for BodyInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}) pos=({:.2}, {:.2}, {:.2}) spin={:.3}",
            self.name,
            self.role.label(),
            self.position[0],
            self.position[1],
            self.position[2],
            self.spin
        )?;
        if let Some(angle) = self.orbit_angle {
            write!(f, " orbit={angle:.3}")?;
        }
        Ok(())
    }
}

/// Detailed info about a single scene node.
#[derive(Debug, Clone)]
pub struct NodeInfo {
    pub id: NodeId,
    pub name: String,
    pub position: [f32; 3],
    pub scale: [f32; 3],
}

impl std::fmt::Display for NodeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Node [{}] {} pos=({:.2}, {:.2}, {:.2}) scale=({:.2}, {:.2}, {:.2})",
            self.id.short(),
            self.name,
            self.position[0],
            self.position[1],
            self.position[2],
            self.scale[0],
            self.scale[1],
            self.scale[2],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use museum_kernel::MeshHandle;

    #[test]
    fn summary_fresh_museum() {
        let museum = Museum::default();
        let summary = MuseumInspector::summary(&museum);
        assert_eq!(summary.frame, 0);
        assert_eq!(summary.node_count, 19);
        assert_eq!(summary.bodies.len(), 3);
        assert_eq!(summary.camera_position, [0.0, 2.0, 0.0]);
    }

    #[test]
    fn summary_after_frames() {
        let mut museum = Museum::default();
        for _ in 0..10 {
            museum.animate();
        }
        let summary = MuseumInspector::summary(&museum);
        assert_eq!(summary.frame, 10);
        assert!((summary.effect_time - 0.1).abs() < 1e-5);
        assert!(summary.bodies.iter().all(|b| (b.spin - 0.01).abs() < 1e-6));
    }

    #[test]
    fn sun_has_no_orbit_angle() {
        let museum = Museum::default();
        assert!(MuseumInspector::inspect_body(&museum, BodyRole::Secondary).orbit_angle.is_none());
        assert_eq!(
            MuseumInspector::inspect_body(&museum, BodyRole::Primary).orbit_angle,
            Some(0.0)
        );
    }

    #[test]
    fn inspect_node_found_and_missing() {
        let mut museum = Museum::default();
        let id = museum.place_sculpture(4, MeshHandle(9)).unwrap();
        let info = MuseumInspector::inspect_node(&museum, id).unwrap();
        assert_eq!(info.name, "sculpture_4");
        assert_eq!(info.scale, [0.01, 0.01, 0.01]);
        assert!(MuseumInspector::inspect_node(&museum, NodeId::new()).is_none());
    }

    #[test]
    fn summary_display() {
        let museum = Museum::default();
        let s = format!("{}", MuseumInspector::summary(&museum));
        assert!(s.contains("frame=0"));
        assert!(s.contains("earth (primary)"));
        assert!(s.contains("orbit=0.000"));
    }
}
