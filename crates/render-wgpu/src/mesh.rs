//! Unit-sized primitive meshes. Node transforms scale them to size.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Vertices plus a triangle-list index buffer.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn from_parts(positions: &[[f32; 3]], normals: &[[f32; 3]], indices: &[u32]) -> Self {
        let vertices = positions
            .iter()
            .zip(normals)
            .map(|(&position, &normal)| Vertex { position, normal })
            .collect();
        Self {
            vertices,
            indices: indices.to_vec(),
        }
    }
}

/// 1×1×1 box centred on the origin.
pub fn cube() -> MeshData {
    let p = 0.5_f32;
    #[rustfmt::skip]
    let vertices = vec![
        // +Z face
        Vertex { position: [-p, -p,  p], normal: [0.0, 0.0, 1.0] },
        Vertex { position: [ p, -p,  p], normal: [0.0, 0.0, 1.0] },
        Vertex { position: [ p,  p,  p], normal: [0.0, 0.0, 1.0] },
        Vertex { position: [-p,  p,  p], normal: [0.0, 0.0, 1.0] },
        // -Z face
        Vertex { position: [ p, -p, -p], normal: [0.0, 0.0, -1.0] },
        Vertex { position: [-p, -p, -p], normal: [0.0, 0.0, -1.0] },
        Vertex { position: [-p,  p, -p], normal: [0.0, 0.0, -1.0] },
        Vertex { position: [ p,  p, -p], normal: [0.0, 0.0, -1.0] },
        // +X face
        Vertex { position: [ p, -p,  p], normal: [1.0, 0.0, 0.0] },
        Vertex { position: [ p, -p, -p], normal: [1.0, 0.0, 0.0] },
        Vertex { position: [ p,  p, -p], normal: [1.0, 0.0, 0.0] },
        Vertex { position: [ p,  p,  p], normal: [1.0, 0.0, 0.0] },
        // -X face
        Vertex { position: [-p, -p, -p], normal: [-1.0, 0.0, 0.0] },
        Vertex { position: [-p, -p,  p], normal: [-1.0, 0.0, 0.0] },
        Vertex { position: [-p,  p,  p], normal: [-1.0, 0.0, 0.0] },
        Vertex { position: [-p,  p, -p], normal: [-1.0, 0.0, 0.0] },
        // +Y face
        Vertex { position: [-p,  p,  p], normal: [0.0, 1.0, 0.0] },
        Vertex { position: [ p,  p,  p], normal: [0.0, 1.0, 0.0] },
        Vertex { position: [ p,  p, -p], normal: [0.0, 1.0, 0.0] },
        Vertex { position: [-p,  p, -p], normal: [0.0, 1.0, 0.0] },
        // -Y face
        Vertex { position: [-p, -p, -p], normal: [0.0, -1.0, 0.0] },
        Vertex { position: [ p, -p, -p], normal: [0.0, -1.0, 0.0] },
        Vertex { position: [ p, -p,  p], normal: [0.0, -1.0, 0.0] },
        Vertex { position: [-p, -p,  p], normal: [0.0, -1.0, 0.0] },
    ];
    #[rustfmt::skip]
    let indices: Vec<u32> = vec![
        0,1,2, 2,3,0,       // +Z
        4,5,6, 6,7,4,       // -Z
        8,9,10, 10,11,8,    // +X
        12,13,14, 14,15,12, // -X
        16,17,18, 18,19,16, // +Y
        20,21,22, 22,23,20, // -Y
    ];
    MeshData { vertices, indices }
}

/// Latitude/longitude sphere of radius 1, from the north pole down to
/// `theta_length` (π for a full sphere, π/2 for the upper hemisphere).
fn lat_long(segments: u32, rings: u32, theta_length: f32) -> MeshData {
    let mut mesh = MeshData::default();
    for i in 0..=rings {
        let theta = i as f32 / rings as f32 * theta_length;
        let (r, y) = (theta.sin(), theta.cos());
        for j in 0..=segments {
            let phi = j as f32 / segments as f32 * TAU;
            let p = [r * phi.cos(), y, r * phi.sin()];
            mesh.vertices.push(Vertex {
                position: p,
                normal: p,
            });
        }
    }
    let stride = segments + 1;
    for i in 0..rings {
        for j in 0..segments {
            let a = i * stride + j;
            let b = a + stride;
            mesh.indices.extend_from_slice(&[a, a + 1, b, a + 1, b + 1, b]);
        }
    }
    mesh
}

pub fn sphere(segments: u32, rings: u32) -> MeshData {
    lat_long(segments, rings, PI)
}

pub fn dome(segments: u32, rings: u32) -> MeshData {
    lat_long(segments, rings, FRAC_PI_2)
}

/// Radius 1, height 1, centred on the origin, with caps.
pub fn cylinder(segments: u32) -> MeshData {
    let mut mesh = MeshData::default();
    for j in 0..=segments {
        let phi = j as f32 / segments as f32 * TAU;
        let (x, z) = (phi.cos(), phi.sin());
        let normal = [x, 0.0, z];
        mesh.vertices.push(Vertex {
            position: [x, -0.5, z],
            normal,
        });
        mesh.vertices.push(Vertex {
            position: [x, 0.5, z],
            normal,
        });
    }
    for j in 0..segments {
        let a = j * 2;
        mesh.indices.extend_from_slice(&[a, a + 1, a + 2, a + 2, a + 1, a + 3]);
    }

    for (y, ny) in [(-0.5f32, -1.0f32), (0.5, 1.0)] {
        let center = mesh.vertices.len() as u32;
        mesh.vertices.push(Vertex {
            position: [0.0, y, 0.0],
            normal: [0.0, ny, 0.0],
        });
        for j in 0..=segments {
            let phi = j as f32 / segments as f32 * TAU;
            mesh.vertices.push(Vertex {
                position: [phi.cos(), y, phi.sin()],
                normal: [0.0, ny, 0.0],
            });
        }
        for j in 0..segments {
            let rim = center + 1 + j;
            if ny > 0.0 {
                mesh.indices.extend_from_slice(&[center, rim + 1, rim]);
            } else {
                mesh.indices.extend_from_slice(&[center, rim, rim + 1]);
            }
        }
    }
    mesh
}

/// 1×1 square in the XY plane facing `+Z`.
pub fn plane() -> MeshData {
    let n = [0.0, 0.0, 1.0];
    let vertices = vec![
        Vertex { position: [-0.5, -0.5, 0.0], normal: n },
        Vertex { position: [0.5, -0.5, 0.0], normal: n },
        Vertex { position: [0.5, 0.5, 0.0], normal: n },
        Vertex { position: [-0.5, 0.5, 0.0], normal: n },
    ];
    MeshData {
        vertices,
        indices: vec![0, 1, 2, 2, 3, 0],
    }
}
