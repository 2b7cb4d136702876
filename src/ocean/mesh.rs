//! Flat ocean grid that the vertex shader displaces with the wave field.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::params::OceanMesh;

/// Vertex data shared by the ocean grid and hull meshes (position + normal)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Flat XZ grid centred on the origin.
///
/// Heights are never written on the CPU: the grid is translated under the
/// camera each frame and the shader evaluates the same wave terms buoyancy uses.
pub struct OceanGrid {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    grid_spacing: f32,
}

impl OceanGrid {
    /// Create a new ocean grid with specified parameters
    pub fn new(mesh: &OceanMesh) -> Self {
        let grid_size = mesh.grid_size;
        let grid_spacing = mesh.grid_spacing_m;
        let half_size = (grid_size as f32 * grid_spacing) / 2.0;

        let mut vertices = Vec::with_capacity((grid_size + 1) * (grid_size + 1));
        let mut indices = Vec::with_capacity(grid_size * grid_size * 6);

        // Generate flat XZ plane grid
        for z in 0..=grid_size {
            for x in 0..=grid_size {
                vertices.push(Vertex {
                    position: [
                        x as f32 * grid_spacing - half_size,
                        0.0,
                        z as f32 * grid_spacing - half_size,
                    ],
                    normal: [0.0, 1.0, 0.0],
                });
            }
        }

        // Generate triangle indices (counter-clockwise winding seen from above)
        for z in 0..grid_size {
            for x in 0..grid_size {
                let top_left = (z * (grid_size + 1) + x) as u32;
                let top_right = top_left + 1;
                let bottom_left = ((z + 1) * (grid_size + 1) + x) as u32;
                let bottom_right = bottom_left + 1;

                indices.extend_from_slice(&[
                    top_left,
                    bottom_left,
                    top_right,
                    top_right,
                    bottom_left,
                    bottom_right,
                ]);
            }
        }

        Self {
            vertices,
            indices,
            grid_spacing,
        }
    }

    /// World translation that centres the grid under `camera_pos`.
    ///
    /// Snapped to whole cells so vertices sample the same world points from
    /// frame to frame instead of swimming with the camera.
    pub fn anchor_for(&self, camera_pos: Vec3) -> Vec3 {
        if self.grid_spacing <= 0.0 {
            return Vec3::new(camera_pos.x, 0.0, camera_pos.z);
        }
        Vec3::new(
            (camera_pos.x / self.grid_spacing).round() * self.grid_spacing,
            0.0,
            (camera_pos.z / self.grid_spacing).round() * self.grid_spacing,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ocean_grid_creation() {
        let mesh = OceanMesh {
            grid_size: 16,
            grid_spacing_m: 2.0,
        };
        let grid = OceanGrid::new(&mesh);

        // Check vertex count: (grid_size + 1)^2
        assert_eq!(grid.vertices.len(), (mesh.grid_size + 1).pow(2));

        // Check triangle count: grid_size^2 * 2 triangles * 3 indices
        assert_eq!(grid.indices.len(), mesh.grid_size.pow(2) * 6);

        // Grid is centred and flat
        assert_eq!(grid.vertices[0].position, [-16.0, 0.0, -16.0]);
        assert_eq!(grid.vertices.last().map(|v| v.position), Some([16.0, 0.0, 16.0]));
        assert!(grid.indices.iter().all(|&i| (i as usize) < grid.vertices.len()));
    }

    #[test]
    fn test_anchor_snaps_to_cells() {
        let grid = OceanGrid::new(&OceanMesh {
            grid_size: 4,
            grid_spacing_m: 2.0,
        });
        let anchor = grid.anchor_for(Vec3::new(3.1, 50.0, -6.9));
        assert_eq!(anchor, Vec3::new(4.0, 0.0, -6.0));
    }
}
