use std::io::Cursor;

use glam::Vec3;

use crate::AssetError;

/// Triangle mesh ready for upload: one position, one normal per vertex,
/// and a single index buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelData {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl ModelData {
    /// Parse OBJ source. All objects and groups in the file are merged into
    /// one mesh. Material libraries are not followed.
    pub fn from_obj_bytes(name: &str, bytes: &[u8]) -> Result<Self, AssetError> {
        let mut reader = Cursor::new(bytes);
        let (models, _materials) =
            tobj::load_obj_buf(&mut reader, &tobj::GPU_LOAD_OPTIONS, |_| {
                Err(tobj::LoadError::OpenFileFailed)
            })
            .map_err(|source| AssetError::Obj {
                path: name.to_string(),
                source,
            })?;

        let mut data = Self {
            name: name.to_string(),
            positions: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
        };

        for model in &models {
            let mesh = &model.mesh;
            let base = data.positions.len() as u32;
            let positions: Vec<[f32; 3]> = mesh
                .positions
                .chunks_exact(3)
                .map(|p| [p[0], p[1], p[2]])
                .collect();

            let normals = if mesh.normals.len() == mesh.positions.len() {
                mesh.normals
                    .chunks_exact(3)
                    .map(|n| [n[0], n[1], n[2]])
                    .collect()
            } else {
                smooth_normals(&positions, &mesh.indices)
            };

            data.positions.extend(positions);
            data.normals.extend(normals);
            data.indices.extend(mesh.indices.iter().map(|i| i + base));
        }

        if data.indices.len() < 3 {
            return Err(AssetError::Empty {
                path: name.to_string(),
            });
        }
        Ok(data)
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Area-weighted vertex normals from triangle faces.
fn smooth_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut acc = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let (pa, pb, pc) = (
            Vec3::from(positions[a]),
            Vec3::from(positions[b]),
            Vec3::from(positions[c]),
        );
        let face = (pb - pa).cross(pc - pa);
        acc[a] += face;
        acc[b] += face;
        acc[c] += face;
    }
    acc.into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y).to_array())
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub const TRIANGLE_OBJ: &str = "\
o tri
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
f 1 2 3
";

    const TWO_OBJECTS: &str = "\
mtllib missing.mtl
o first
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 0.0 1.0
vn 0.0 1.0 0.0
f 1//1 2//1 3//1
o second
v 0.0 2.0 0.0
v 1.0 2.0 0.0
v 1.0 3.0 0.0
v 0.0 3.0 0.0
f 4 5 6 7
";

    #[test]
    fn parses_single_triangle() {
        let model = ModelData::from_obj_bytes("tri", TRIANGLE_OBJ.as_bytes()).unwrap();
        assert_eq!(model.vertex_count(), 3);
        assert_eq!(model.triangle_count(), 1);
        assert_eq!(model.normals.len(), 3);
        // Counter-clockwise in XY faces +Z.
        for n in &model.normals {
            assert!((Vec3::from(*n) - Vec3::Z).length() < 1e-6);
        }
    }

    #[test]
    fn merges_objects_and_offsets_indices() {
        let model = ModelData::from_obj_bytes("two", TWO_OBJECTS.as_bytes()).unwrap();
        // Quad is triangulated into two triangles.
        assert_eq!(model.triangle_count(), 3);
        assert_eq!(model.normals.len(), model.positions.len());
        let max = *model.indices.iter().max().unwrap() as usize;
        assert!(max < model.vertex_count());
        assert!(model.indices[3..].iter().all(|&i| i >= 3));
    }

    #[test]
    fn file_without_faces_is_empty() {
        let err = ModelData::from_obj_bytes("pts", b"v 0 0 0\nv 1 1 1\n").unwrap_err();
        assert!(matches!(err, AssetError::Empty { .. }));
    }

    #[test]
    fn garbage_is_rejected() {
        let err = ModelData::from_obj_bytes("bad", b"f 1 2 3\n").unwrap_err();
        assert!(matches!(err, AssetError::Obj { .. } | AssetError::Empty { .. }));
    }
}
