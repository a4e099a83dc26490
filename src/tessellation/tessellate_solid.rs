use crate::error::Result;
use crate::topology::{SolidId, TopologyStore};

use super::{TessellateFace, TriangleMesh};

/// Tessellates all faces of a solid into a combined triangle mesh.
pub struct TessellateSolid {
    solid: SolidId,
}

impl TessellateSolid {
    /// Creates a new `TessellateSolid` operation.
    #[must_use]
    pub fn new(solid: SolidId) -> Self {
        Self { solid }
    }

    /// Executes the tessellation, returning a combined triangle mesh.
    ///
    /// # Errors
    ///
    /// Returns an error if the solid or any of its faces cannot be tessellated.
    pub fn execute(&self, store: &TopologyStore) -> Result<TriangleMesh> {
        let mut combined = TriangleMesh::default();
        for &face_id in store.solid_faces(self.solid)? {
            let face_mesh = TessellateFace::new(face_id).execute(store)?;
            combined.merge(&face_mesh);
        }
        Ok(combined)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::{Point3, Vector3};
    use crate::operations::creation::{MakeFace, MakeWire};
    use crate::operations::shaping::Extrude;

    fn prism(store: &mut TopologyStore, points: Vec<Point3>, height: f64) -> SolidId {
        let wire = MakeWire::new(points, true).execute(store).unwrap();
        let face = MakeFace::new(wire).execute(store).unwrap();
        Extrude::new(face, Vector3::new(0.0, 0.0, height))
            .execute(store)
            .unwrap()
    }

    #[test]
    fn tessellate_cube_produces_12_triangles() {
        let mut store = TopologyStore::new();
        let solid = prism(
            &mut store,
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            1.0,
        );

        let mesh = TessellateSolid::new(solid).execute(&store).unwrap();

        // 6 faces × 2 triangles each = 12 triangles
        assert_eq!(mesh.indices.len(), 12);
        assert_eq!(mesh.vertices.len(), mesh.normals.len());
    }

    #[test]
    fn tessellate_prism_normals_are_unit() {
        let mut store = TopologyStore::new();
        let solid = prism(
            &mut store,
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(3.0, 0.0, 0.0),
                Point3::new(1.5, 2.0, 0.0),
            ],
            3.0,
        );

        let mesh = TessellateSolid::new(solid).execute(&store).unwrap();

        for normal in &mesh.normals {
            let len = normal.norm();
            assert!(
                (len - 1.0).abs() < 1e-6,
                "normal {normal:?} has length {len}, expected 1.0"
            );
        }
    }

    #[test]
    fn merged_indices_stay_in_range() {
        let mut store = TopologyStore::new();
        let solid = prism(
            &mut store,
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(4.0, 0.0, 0.0),
                Point3::new(4.0, 2.0, 0.0),
                Point3::new(2.0, 2.0, 0.0),
                Point3::new(2.0, 4.0, 0.0),
                Point3::new(0.0, 4.0, 0.0),
            ],
            2.0,
        );

        let mesh = TessellateSolid::new(solid).execute(&store).unwrap();
        // 2 caps × 4 triangles + 6 sides × 2 triangles
        assert_eq!(mesh.triangle_count(), 20);
        let n = u32::try_from(mesh.vertices.len()).unwrap();
        assert!(mesh.indices.iter().flatten().all(|&i| i < n));
    }
}
