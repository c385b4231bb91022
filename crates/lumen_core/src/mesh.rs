//! Indexed triangle geometry in model space.
//!
//! A `Mesh` is what the OBJ loader and the built-in primitives produce.
//! Objects never keep the mesh itself: they take the expanded triangle list
//! from [`Mesh::triangles`] as their immutable model-space geometry.

use lumen_math::DVec3;

use crate::scene::Triangle;

/// Vertex positions plus triangle indices (every 3 indices form a triangle).
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    /// Vertex positions (one DVec3 per vertex)
    pub positions: Vec<DVec3>,

    /// Triangle indices, zero-based
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create a new mesh from positions and indices.
    pub fn new(positions: Vec<DVec3>, indices: Vec<u32>) -> Self {
        Self { positions, indices }
    }

    /// Axis-aligned cube spanning [-1, 1] on every axis, outward-facing normals.
    pub fn cube() -> Self {
        let positions = vec![
            DVec3::new(-1.0, -1.0, -1.0),
            DVec3::new(1.0, -1.0, -1.0),
            DVec3::new(1.0, 1.0, -1.0),
            DVec3::new(-1.0, 1.0, -1.0),
            DVec3::new(-1.0, -1.0, 1.0),
            DVec3::new(1.0, -1.0, 1.0),
            DVec3::new(1.0, 1.0, 1.0),
            DVec3::new(-1.0, 1.0, 1.0),
        ];

        // Quads listed counter-clockwise as seen from outside
        let quads: [[u32; 4]; 6] = [
            [0, 3, 2, 1], // -Z
            [4, 5, 6, 7], // +Z
            [0, 4, 7, 3], // -X
            [1, 2, 6, 5], // +X
            [0, 1, 5, 4], // -Y
            [3, 7, 6, 2], // +Y
        ];

        let indices = quads
            .iter()
            .flat_map(|&[a, b, c, d]| [a, b, c, a, c, d])
            .collect();

        Self::new(positions, indices)
    }

    /// Square in the XZ plane spanning [-1, 1], facing +Y.
    pub fn plane() -> Self {
        let positions = vec![
            DVec3::new(-1.0, 0.0, -1.0),
            DVec3::new(-1.0, 0.0, 1.0),
            DVec3::new(1.0, 0.0, 1.0),
            DVec3::new(1.0, 0.0, -1.0),
        ];
        Self::new(positions, vec![0, 1, 2, 0, 2, 3])
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Expand the indexed geometry into standalone triangles.
    ///
    /// Index triples that point outside `positions` are skipped with a warning.
    pub fn triangles(&self) -> Vec<Triangle> {
        let mut triangles = Vec::with_capacity(self.triangle_count());

        for chunk in self.indices.chunks(3) {
            if chunk.len() < 3 {
                continue;
            }

            let i0 = chunk[0] as usize;
            let i1 = chunk[1] as usize;
            let i2 = chunk[2] as usize;

            if i0 >= self.positions.len()
                || i1 >= self.positions.len()
                || i2 >= self.positions.len()
            {
                log::warn!(
                    "Invalid triangle indices: [{}, {}, {}], vertex count: {}",
                    i0,
                    i1,
                    i2,
                    self.positions.len()
                );
                continue;
            }

            triangles.push(Triangle::new(
                self.positions[i0],
                self.positions[i1],
                self.positions[i2],
            ));
        }

        triangles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_creation() {
        let positions = vec![DVec3::ZERO, DVec3::X, DVec3::Y];
        let mesh = Mesh::new(positions, vec![0, 1, 2]);

        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn test_cube_normals_point_outward() {
        let cube = Mesh::cube();
        let triangles = cube.triangles();
        assert_eq!(triangles.len(), 12);

        for triangle in &triangles {
            let centroid = (triangle.vertex_1 + triangle.vertex_2 + triangle.vertex_3) / 3.0;
            assert!(
                triangle.normal.dot(centroid) > 0.0,
                "normal {:?} points inward at {:?}",
                triangle.normal,
                centroid
            );
            assert!((triangle.normal.length() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_plane_faces_up() {
        let triangles = Mesh::plane().triangles();
        assert_eq!(triangles.len(), 2);
        for triangle in &triangles {
            assert_eq!(triangle.normal, DVec3::Y);
        }
    }

    #[test]
    fn test_triangles_skip_out_of_range_indices() {
        let positions = vec![DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::ONE];
        // Second triangle references vertex 9
        let mesh = Mesh::new(positions.clone(), vec![0, 1, 2, 1, 9, 2, 1, 3, 2]);
        let triangles = mesh.triangles();

        assert_eq!(triangles.len(), 2, "Should keep the two valid triangles");
        assert_eq!(triangles[1].vertex_1, positions[1]);
        assert_eq!(triangles[1].vertex_2, positions[3]);
        assert_eq!(triangles[1].vertex_3, positions[2]);
    }
}
