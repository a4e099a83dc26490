use std::collections::{HashMap, HashSet, VecDeque};

use spade::handles::{FixedFaceHandle, FixedVertexHandle, InnerTag};
use spade::{ConstrainedDelaunayTriangulation, InsertionError, Point2 as SpadePoint2, Triangulation};

use crate::error::{Result, TessellationError};
use crate::topology::{FaceId, TopologyStore};

use super::TriangleMesh;

type Cdt = ConstrainedDelaunayTriangulation<SpadePoint2<f64>>;

/// Tessellates a planar face into a triangle mesh.
///
/// The boundary is projected into the face plane and filled with a
/// constrained Delaunay triangulation, so concave outlines are handled.
pub struct TessellateFace {
    face: FaceId,
}

impl TessellateFace {
    /// Creates a new `TessellateFace` operation.
    #[must_use]
    pub fn new(face: FaceId) -> Self {
        Self { face }
    }

    /// Executes the tessellation, returning a triangle mesh.
    ///
    /// # Errors
    ///
    /// Returns an error if the face cannot be tessellated.
    #[allow(clippy::cast_possible_truncation)]
    pub fn execute(&self, store: &TopologyStore) -> Result<TriangleMesh> {
        let face = store.face(self.face)?;
        let plane = &face.surface;
        let normal = *plane.plane_normal();

        let boundary: Vec<_> = store
            .wire_points(face.outer_wire)?
            .iter()
            .map(|p| {
                let uv = plane.project(p);
                SpadePoint2::new(uv.x, uv.y)
            })
            .collect();

        let mut cdt = Cdt::new();
        insert_constraint_loop(&mut cdt, &boundary)?;
        let interior = classify_interior_faces(&cdt);

        let mut mesh = TriangleMesh::default();
        let mut vertex_map: HashMap<usize, u32> = HashMap::new();

        for face_handle in cdt.inner_faces() {
            if !interior.contains(&face_handle.fix().index()) {
                continue;
            }

            // Spade yields counter-clockwise corners; u × v is the face normal,
            // so the triangle winds around the outward normal.
            let mut tri = [0u32; 3];
            for (slot, vh) in face_handle.vertices().iter().enumerate() {
                let key = vh.fix().index();
                tri[slot] = *vertex_map.entry(key).or_insert_with(|| {
                    let pos = vh.position();
                    let idx = mesh.vertices.len() as u32;
                    mesh.vertices
                        .push(plane.evaluate(&crate::math::Point2::new(pos.x, pos.y)));
                    mesh.normals.push(normal);
                    idx
                });
            }
            mesh.indices.push(tri);
        }

        if mesh.indices.is_empty() {
            return Err(TessellationError::Failed("face produced no triangles".into()).into());
        }
        Ok(mesh)
    }
}

/// Inserts a closed boundary into the triangulation as constraint edges.
fn insert_constraint_loop(cdt: &mut Cdt, points: &[SpadePoint2<f64>]) -> Result<()> {
    if points.len() < 3 {
        return Err(
            TessellationError::Failed("constraint loop needs at least 3 points".into()).into(),
        );
    }

    let mut handles: Vec<FixedVertexHandle> = Vec::with_capacity(points.len());
    for &pt in points {
        let h = cdt
            .insert(pt)
            .map_err(|e: InsertionError| TessellationError::Failed(format!("CDT insert: {e}")))?;
        handles.push(h);
    }

    for i in 0..handles.len() {
        let from = handles[i];
        let to = handles[(i + 1) % handles.len()];
        if from == to {
            continue;
        }
        // Spade panics on crossing constraints; a simple boundary never has any.
        if !cdt.can_add_constraint(from, to) {
            return Err(
                TessellationError::Failed("boundary constraints intersect".into()).into(),
            );
        }
        cdt.add_constraint(from, to);
    }

    Ok(())
}

/// Marks inner faces that lie inside the constrained boundary.
///
/// Flood-fills from the convex hull inward, flipping parity each time a
/// constraint edge is crossed. Odd parity means inside.
fn classify_interior_faces(cdt: &Cdt) -> HashSet<usize> {
    let mut interior = HashSet::new();
    let mut parity: HashMap<usize, u32> = HashMap::new();
    let mut queue: VecDeque<(FixedFaceHandle<InnerTag>, u32)> = VecDeque::new();

    let outer_fix = cdt.outer_face().fix();

    for edge in cdt.directed_edges() {
        if edge.face().fix() != outer_fix {
            continue;
        }
        let Some(inner) = edge.rev().face().as_inner() else {
            continue;
        };
        let idx = inner.fix().index();
        if parity.contains_key(&idx) {
            continue;
        }
        let depth = u32::from(cdt.is_constraint_edge(edge.as_undirected().fix()));
        parity.insert(idx, depth);
        if depth % 2 == 1 {
            interior.insert(idx);
        }
        queue.push_back((inner.fix(), depth));
    }

    while let Some((face_fix, depth)) = queue.pop_front() {
        for edge in cdt.face(face_fix).adjacent_edges() {
            let Some(neighbor) = edge.rev().face().as_inner() else {
                continue;
            };
            let idx = neighbor.fix().index();
            if parity.contains_key(&idx) {
                continue;
            }
            let next = depth + u32::from(cdt.is_constraint_edge(edge.as_undirected().fix()));
            parity.insert(idx, next);
            if next % 2 == 1 {
                interior.insert(idx);
            }
            queue.push_back((neighbor.fix(), next));
        }
    }

    interior
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::{Point3, Vector3};
    use crate::operations::creation::{MakeFace, MakeWire};
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64) -> Point3 {
        Point3::new(x, y, 0.0)
    }

    fn make_face_from_points(store: &mut TopologyStore, points: Vec<Point3>) -> FaceId {
        let wire = MakeWire::new(points, true).execute(store).unwrap();
        MakeFace::new(wire).execute(store).unwrap()
    }

    fn mesh_area(mesh: &TriangleMesh) -> f64 {
        (0..mesh.triangle_count())
            .map(|i| {
                let [a, b, c] = mesh.triangle(i);
                (b - a).cross(&(c - a)).norm() * 0.5
            })
            .sum()
    }

    #[test]
    fn triangle_produces_1_triangle() {
        let mut store = TopologyStore::new();
        let face = make_face_from_points(&mut store, vec![p(0.0, 0.0), p(4.0, 0.0), p(2.0, 3.0)]);
        let mesh = TessellateFace::new(face).execute(&store).unwrap();
        assert_eq!(mesh.indices.len(), 1);
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.normals.len(), 3);
    }

    #[test]
    fn square_produces_2_triangles() {
        let mut store = TopologyStore::new();
        let face = make_face_from_points(
            &mut store,
            vec![p(0.0, 0.0), p(4.0, 0.0), p(4.0, 4.0), p(0.0, 4.0)],
        );
        let mesh = TessellateFace::new(face).execute(&store).unwrap();
        assert_eq!(mesh.indices.len(), 2);
        assert_eq!(mesh.vertices.len(), 4);
        assert_relative_eq!(mesh_area(&mesh), 16.0, epsilon = 1e-9);
    }

    #[test]
    fn l_shape_concave_tessellates() {
        let mut store = TopologyStore::new();
        let face = make_face_from_points(
            &mut store,
            vec![
                p(0.0, 0.0),
                p(4.0, 0.0),
                p(4.0, 2.0),
                p(2.0, 2.0),
                p(2.0, 4.0),
                p(0.0, 4.0),
            ],
        );
        let mesh = TessellateFace::new(face).execute(&store).unwrap();
        // L-shape (6 vertices, concave) → 4 triangles covering 12 m²
        assert_eq!(mesh.indices.len(), 4);
        assert_eq!(mesh.vertices.len(), 6);
        assert_relative_eq!(mesh_area(&mesh), 12.0, epsilon = 1e-9);
    }

    #[test]
    fn triangles_wind_around_face_normal() {
        let mut store = TopologyStore::new();
        let face = make_face_from_points(
            &mut store,
            vec![p(0.0, 0.0), p(0.0, 3.0), p(3.0, 3.0), p(3.0, 0.0)],
        );
        let mesh = TessellateFace::new(face).execute(&store).unwrap();
        for i in 0..mesh.triangle_count() {
            let [a, b, c] = mesh.triangle(i);
            let winding = (b - a).cross(&(c - a));
            assert!(winding.dot(&-Vector3::z()) > 0.0);
        }
    }

    #[test]
    fn normals_match_plane_normal() {
        let mut store = TopologyStore::new();
        let face = make_face_from_points(
            &mut store,
            vec![p(0.0, 0.0), p(5.0, 0.0), p(5.0, 1.0), p(0.0, 1.0)],
        );
        let mesh = TessellateFace::new(face).execute(&store).unwrap();
        for n in &mesh.normals {
            assert_relative_eq!(*n, Vector3::z());
        }
    }
}
