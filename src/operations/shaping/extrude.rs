use crate::error::{OperationError, Result};
use crate::geometry::Plane;
use crate::math::polygon_3d::newell_normal;
use crate::math::{Vector3, TOLERANCE};
use crate::operations::creation::MakeSolid;
use crate::operations::transform::Translate;
use crate::topology::{
    EdgeData, FaceData, FaceId, OrientedEdge, ShellData, SolidId, TopologyStore, VertexData,
    VertexId, WireData,
};

/// Extrudes a planar face along a direction vector to create a closed solid.
///
/// The boundary loop of the face is duplicated, the copy is translated by the
/// direction, and one quad per boundary edge stitches the two rings together.
/// The input face is kept as the bottom cap and re-oriented to point away
/// from the extrusion, so the resulting shell is closed with outward normals.
pub struct Extrude {
    face: FaceId,
    direction: Vector3,
    name: String,
}

impl Extrude {
    /// Creates a new `Extrude` operation.
    #[must_use]
    pub fn new(face: FaceId, direction: Vector3) -> Self {
        Self {
            face,
            direction,
            name: String::new(),
        }
    }

    /// Sets the name given to the resulting solid.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Executes the extrusion, creating the solid in the topology store.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidInput`] if the direction is zero-length
    /// or parallel to the face plane.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<SolidId> {
        if self.direction.norm() < TOLERANCE {
            return Err(
                OperationError::InvalidInput("extrude direction must be non-zero".into()).into(),
            );
        }

        let face = store.face(self.face)?;
        let outer_wire = face.outer_wire;
        let face_normal = *face.surface.plane_normal();
        let alignment = face_normal.dot(&self.direction);
        if alignment.abs() < TOLERANCE {
            return Err(OperationError::InvalidInput(
                "extrude direction lies in the face plane".into(),
            )
            .into());
        }

        // Walk the base loop so its normal agrees with the extrude direction. Then:
        //   - bottom cap = reversed base → normal ≈ -direction
        //   - top cap = translated base → normal ≈ +direction
        //   - side quads naturally face outward
        let wire = store.wire(outer_wire)?;
        let (base_loop, up) = if alignment > 0.0 {
            (wire.edges.clone(), face_normal)
        } else {
            (wire.reversed_edges(), -face_normal)
        };
        let base_vertices = base_loop
            .iter()
            .map(|&oe| store.oriented_start(oe))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let n = base_vertices.len();

        // Offset ring: duplicate the boundary vertices, then lift the copies.
        let mut top_vertices: Vec<VertexId> = Vec::with_capacity(n);
        for &v in &base_vertices {
            let point = store.vertex(v)?.point;
            top_vertices.push(store.add_vertex(VertexData::new(point)));
        }
        Translate::new(top_vertices.clone(), self.direction).execute(store)?;

        let verticals: Vec<_> = (0..n)
            .map(|i| store.add_edge(EdgeData::new(base_vertices[i], top_vertices[i])))
            .collect();
        let top_loop: Vec<_> = (0..n)
            .map(|i| {
                let edge = store.add_edge(EdgeData::new(top_vertices[i], top_vertices[(i + 1) % n]));
                OrientedEdge::new(edge, true)
            })
            .collect();

        // Bottom cap: the input face, turned to face away from the extrusion.
        store.wire_mut(outer_wire)?.edges = base_loop.iter().rev().map(|oe| oe.reversed()).collect();
        let bottom_origin = store.vertex(base_vertices[0])?.point;
        store.face_mut(self.face)?.surface = Plane::from_normal(bottom_origin, -up)?;

        let top_wire = store.add_wire(WireData {
            edges: top_loop.clone(),
            is_closed: true,
        });
        let top_origin = store.vertex(top_vertices[0])?.point;
        let top_face = store.add_face(FaceData {
            surface: Plane::from_normal(top_origin, up)?,
            outer_wire: top_wire,
        });

        let mut all_faces = Vec::with_capacity(n + 2);
        all_faces.push(self.face);
        all_faces.push(top_face);

        for i in 0..n {
            let j = (i + 1) % n;
            let side_wire = store.add_wire(WireData {
                edges: vec![
                    base_loop[i],
                    OrientedEdge::new(verticals[j], true),
                    top_loop[i].reversed(),
                    OrientedEdge::new(verticals[i], false),
                ],
                is_closed: true,
            });
            let corners = store.wire_points(side_wire)?;
            let side_face = store.add_face(FaceData {
                surface: Plane::from_normal(corners[0], newell_normal(&corners)?)?,
                outer_wire: side_wire,
            });
            all_faces.push(side_face);
        }

        let shell_id = store.add_shell(ShellData {
            faces: all_faces,
            is_closed: true,
        });

        MakeSolid::new(shell_id, self.name.clone()).execute(store)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use crate::operations::creation::{MakeFace, MakeWire};
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn make_face(store: &mut TopologyStore, points: Vec<Point3>) -> FaceId {
        let wire = MakeWire::new(points, true).execute(store).unwrap();
        MakeFace::new(wire).execute(store).unwrap()
    }

    fn unit_square() -> Vec<Point3> {
        vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(1.0, 1.0, 0.0), p(0.0, 1.0, 0.0)]
    }

    // ── Unit cube ──────────────────────────────────────────────

    #[test]
    fn unit_cube_has_6_faces() {
        let mut store = TopologyStore::new();
        let face = make_face(&mut store, unit_square());
        let solid = Extrude::new(face, Vector3::new(0.0, 0.0, 1.0))
            .execute(&mut store)
            .unwrap();

        let solid_data = store.solid(solid).unwrap();
        let shell = store.shell(solid_data.outer_shell).unwrap();
        assert_eq!(shell.faces.len(), 6); // top + bottom + 4 sides
        assert!(shell.is_closed);
    }

    // ── Triangle prism ─────────────────────────────────────────

    #[test]
    fn triangle_prism_has_5_faces() {
        let mut store = TopologyStore::new();
        let face = make_face(
            &mut store,
            vec![p(0.0, 0.0, 0.0), p(3.0, 0.0, 0.0), p(1.5, 2.0, 0.0)],
        );
        let solid = Extrude::new(face, Vector3::new(0.0, 0.0, 3.0))
            .execute(&mut store)
            .unwrap();

        assert_eq!(store.solid_faces(solid).unwrap().len(), 5); // top + bottom + 3 sides
    }

    // ── L-shape ────────────────────────────────────────────────

    #[test]
    fn l_shape_has_8_faces() {
        let mut store = TopologyStore::new();
        let face = make_face(
            &mut store,
            vec![
                p(0.0, 0.0, 0.0), p(4.0, 0.0, 0.0), p(4.0, 2.0, 0.0),
                p(2.0, 2.0, 0.0), p(2.0, 4.0, 0.0), p(0.0, 4.0, 0.0),
            ],
        );
        let solid = Extrude::new(face, Vector3::new(0.0, 0.0, 3.0))
            .execute(&mut store)
            .unwrap();

        assert_eq!(store.solid_faces(solid).unwrap().len(), 8); // top + bottom + 6 sides
    }

    // ── Normals point outward ──────────────────────────────────

    #[test]
    fn all_face_normals_point_outward() {
        let mut store = TopologyStore::new();
        let face = make_face(
            &mut store,
            vec![p(0.0, 0.0, 0.0), p(2.0, 0.0, 0.0), p(2.0, 2.0, 0.0), p(0.0, 2.0, 0.0)],
        );
        let solid = Extrude::new(face, Vector3::new(0.0, 0.0, 3.0))
            .execute(&mut store)
            .unwrap();

        let centroid = p(1.0, 1.0, 1.5); // center of 2x2x3 box

        for &face_id in store.solid_faces(solid).unwrap() {
            let face_data = store.face(face_id).unwrap();
            let face_normal = face_data.surface.plane_normal();
            let to_face = face_data.surface.origin() - centroid;
            assert!(
                face_normal.dot(&to_face) > 0.0,
                "face normal {face_normal:?} should point outward (dot with {to_face:?} was {})",
                face_normal.dot(&to_face)
            );
        }
    }

    #[test]
    fn clockwise_footprint_still_points_outward() {
        let mut store = TopologyStore::new();
        let mut points = unit_square();
        points.reverse();
        let face = make_face(&mut store, points);
        let solid = Extrude::new(face, Vector3::new(0.0, 0.0, 2.0))
            .execute(&mut store)
            .unwrap();

        let centroid = p(0.5, 0.5, 1.0);
        for &face_id in store.solid_faces(solid).unwrap() {
            let face_data = store.face(face_id).unwrap();
            let to_face = face_data.surface.origin() - centroid;
            assert!(face_data.surface.plane_normal().dot(&to_face) > 0.0);
        }
    }

    // ── Ring offset ────────────────────────────────────────────

    #[test]
    fn top_ring_is_translated_copy_of_base() {
        let mut store = TopologyStore::new();
        let face = make_face(&mut store, unit_square());
        let solid = Extrude::new(face, Vector3::new(0.0, 0.0, 20.0))
            .with_name("building_A1")
            .execute(&mut store)
            .unwrap();

        assert_eq!(store.solid(solid).unwrap().name, "building_A1");

        let faces = store.solid_faces(solid).unwrap();
        let bottom = store.wire_points(store.face(faces[0]).unwrap().outer_wire).unwrap();
        let top = store.wire_points(store.face(faces[1]).unwrap().outer_wire).unwrap();
        assert_eq!(bottom.len(), 4);
        assert_eq!(top.len(), 4);
        for pt in &bottom {
            assert_relative_eq!(pt.z, 0.0);
        }
        for pt in &top {
            assert_relative_eq!(pt.z, 20.0);
        }
        assert_relative_eq!(*store.face(faces[1]).unwrap().surface.plane_normal(), Vector3::z());
        assert_relative_eq!(*store.face(faces[0]).unwrap().surface.plane_normal(), -Vector3::z());
    }

    #[test]
    fn downward_extrusion_flips_caps() {
        let mut store = TopologyStore::new();
        let face = make_face(&mut store, unit_square());
        let solid = Extrude::new(face, Vector3::new(0.0, 0.0, -5.0))
            .execute(&mut store)
            .unwrap();

        let faces = store.solid_faces(solid).unwrap();
        assert_relative_eq!(*store.face(faces[0]).unwrap().surface.plane_normal(), Vector3::z());
        assert_relative_eq!(*store.face(faces[1]).unwrap().surface.plane_normal(), -Vector3::z());
    }

    // ── Error cases ────────────────────────────────────────────

    #[test]
    fn zero_direction_returns_error() {
        let mut store = TopologyStore::new();
        let face = make_face(
            &mut store,
            vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(1.0, 1.0, 0.0)],
        );
        let result = Extrude::new(face, Vector3::new(0.0, 0.0, 0.0)).execute(&mut store);
        assert!(result.is_err());
    }

    #[test]
    fn in_plane_direction_returns_error() {
        let mut store = TopologyStore::new();
        let face = make_face(&mut store, unit_square());
        let result = Extrude::new(face, Vector3::new(1.0, 0.0, 0.0)).execute(&mut store);
        assert!(result.is_err());
    }
}
