mod tessellate_face;
mod tessellate_solid;

pub use tessellate_face::TessellateFace;
pub use tessellate_solid::TessellateSolid;

use crate::math::{Point3, Vector3};

/// A triangle mesh approximation of one or more faces.
///
/// Triangles are wound counter-clockwise around their outward normal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    /// Vertex positions.
    pub vertices: Vec<Point3>,
    /// Vertex normals.
    pub normals: Vec<Vector3>,
    /// Triangle indices (each triple defines a triangle).
    pub indices: Vec<[u32; 3]>,
}

impl TriangleMesh {
    /// Appends another mesh, re-basing its indices.
    #[allow(clippy::cast_possible_truncation)]
    pub fn merge(&mut self, other: &TriangleMesh) {
        let offset = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.normals.extend_from_slice(&other.normals);
        self.indices
            .extend(other.indices.iter().map(|tri| tri.map(|i| i + offset)));
    }

    /// Returns the corner positions of triangle `index`.
    #[must_use]
    pub fn triangle(&self, index: usize) -> [Point3; 3] {
        self.indices[index].map(|i| self.vertices[i as usize])
    }

    /// Returns the number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }
}
