//! Procedural hull mesh.

use crate::ocean::Vertex;

/// Half extents of the hull box (meters): beam, freeboard, length
pub const HULL_HALF_EXTENTS: [f32; 3] = [3.0, 1.5, 8.0];

/// Closed box hull with flat-shaded faces, long axis on Z, bow toward -Z
pub struct HullMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl HullMesh {
    pub fn new() -> Self {
        Self::with_half_extents(HULL_HALF_EXTENTS)
    }

    pub fn with_half_extents(half: [f32; 3]) -> Self {
        let [hx, hy, hz] = half;

        // (normal, four corners counter-clockwise seen from outside)
        let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
            (
                [1.0, 0.0, 0.0],
                [[hx, -hy, hz], [hx, -hy, -hz], [hx, hy, -hz], [hx, hy, hz]],
            ),
            (
                [-1.0, 0.0, 0.0],
                [[-hx, -hy, -hz], [-hx, -hy, hz], [-hx, hy, hz], [-hx, hy, -hz]],
            ),
            (
                [0.0, 1.0, 0.0],
                [[-hx, hy, hz], [hx, hy, hz], [hx, hy, -hz], [-hx, hy, -hz]],
            ),
            (
                [0.0, -1.0, 0.0],
                [[-hx, -hy, -hz], [hx, -hy, -hz], [hx, -hy, hz], [-hx, -hy, hz]],
            ),
            (
                [0.0, 0.0, 1.0],
                [[-hx, -hy, hz], [hx, -hy, hz], [hx, hy, hz], [-hx, hy, hz]],
            ),
            (
                [0.0, 0.0, -1.0],
                [[hx, -hy, -hz], [-hx, -hy, -hz], [-hx, hy, -hz], [hx, hy, -hz]],
            ),
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (normal, corners) in faces {
            let base = vertices.len() as u32;
            vertices.extend(corners.iter().map(|&position| Vertex { position, normal }));
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self { vertices, indices }
    }
}

impl Default for HullMesh {
    fn default() -> Self {
        Self::new()
    }
}
