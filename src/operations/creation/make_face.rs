use crate::error::{GeometryError, OperationError, Result, TopologyError};
use crate::geometry::Plane;
use crate::math::polygon_2d::{is_simple_ring, signed_area_2d};
use crate::math::polygon_3d::newell_normal;
use crate::math::{Point2, TOLERANCE};
use crate::topology::{FaceData, FaceId, TopologyStore, WireId};

/// Relative tolerance for the planarity check, scaled by the wire's extent.
const PLANARITY_TOLERANCE: f64 = 1e-9;

/// Creates a planar face bounded by a closed wire.
///
/// The face plane is derived from the wire itself, so the wire's traversal
/// direction decides which way the face points. The boundary must be planar
/// and simple; concave outlines are fine.
pub struct MakeFace {
    outer_wire: WireId,
}

impl MakeFace {
    /// Creates a new `MakeFace` operation.
    #[must_use]
    pub fn new(outer_wire: WireId) -> Self {
        Self { outer_wire }
    }

    /// Executes the operation, creating the face in the topology store.
    ///
    /// # Errors
    ///
    /// - [`TopologyError::WireNotClosed`] if the wire is open.
    /// - [`OperationError::InvalidInput`] if the wire has fewer than three
    ///   edges or crosses itself.
    /// - [`OperationError::Failed`] if the boundary encloses no area.
    /// - [`GeometryError::Degenerate`] if the boundary is not planar.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<FaceId> {
        let wire = store.wire(self.outer_wire)?;
        if !wire.is_closed {
            return Err(TopologyError::WireNotClosed.into());
        }
        if wire.edges.len() < 3 {
            return Err(OperationError::InvalidInput(format!(
                "a face needs at least three edges, got {}",
                wire.edges.len()
            ))
            .into());
        }

        let points = store.wire_points(self.outer_wire)?;
        let normal = newell_normal(&points)?;
        let plane = Plane::from_normal(points[0], normal)?;

        let extent = points
            .iter()
            .map(|p| (p - points[0]).norm())
            .fold(0.0_f64, f64::max);
        let max_offset = points
            .iter()
            .map(|p| plane.signed_distance(p).abs())
            .fold(0.0_f64, f64::max);
        if max_offset > PLANARITY_TOLERANCE * extent.max(1.0) {
            return Err(GeometryError::Degenerate(format!(
                "boundary is not planar (deviation {max_offset:e})"
            ))
            .into());
        }

        let uv: Vec<Point2> = points.iter().map(|p| plane.project(p)).collect();
        if signed_area_2d(&uv) < TOLERANCE {
            return Err(OperationError::Failed("boundary encloses no area".into()).into());
        }
        if !is_simple_ring(&uv) {
            return Err(
                OperationError::InvalidInput("boundary intersects itself".into()).into(),
            );
        }

        Ok(store.add_face(FaceData {
            surface: plane,
            outer_wire: self.outer_wire,
        }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::{Point3, Vector3};
    use crate::operations::creation::MakeWire;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64) -> Point3 {
        Point3::new(x, y, 0.0)
    }

    fn face_from(store: &mut TopologyStore, points: Vec<Point3>) -> Result<FaceId> {
        let wire = MakeWire::new(points, true).execute(store)?;
        MakeFace::new(wire).execute(store)
    }

    #[test]
    fn ccw_square_faces_up() {
        let mut store = TopologyStore::new();
        let face = face_from(
            &mut store,
            vec![p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0), p(0.0, 10.0)],
        )
        .unwrap();
        let data = store.face(face).unwrap();
        assert_relative_eq!(*data.surface.plane_normal(), Vector3::z());
    }

    #[test]
    fn cw_square_faces_down() {
        let mut store = TopologyStore::new();
        let face = face_from(
            &mut store,
            vec![p(0.0, 0.0), p(0.0, 10.0), p(10.0, 10.0), p(10.0, 0.0)],
        )
        .unwrap();
        let data = store.face(face).unwrap();
        assert_relative_eq!(*data.surface.plane_normal(), -Vector3::z());
    }

    #[test]
    fn concave_outline_is_accepted() {
        let mut store = TopologyStore::new();
        let result = face_from(
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
        assert!(result.is_ok());
    }

    #[test]
    fn bow_tie_is_rejected() {
        let mut store = TopologyStore::new();
        let result = face_from(
            &mut store,
            vec![p(0.0, 0.0), p(2.0, 2.0), p(2.0, 0.0), p(0.0, 2.0)],
        );
        assert!(result.is_err());
    }

    #[test]
    fn collinear_points_are_rejected() {
        let mut store = TopologyStore::new();
        let result = face_from(&mut store, vec![p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0)]);
        assert!(result.is_err());
    }

    #[test]
    fn open_wire_is_rejected() {
        let mut store = TopologyStore::new();
        let wire = MakeWire::new(vec![p(0.0, 0.0), p(1.0, 0.0), p(0.0, 1.0)], false)
            .execute(&mut store)
            .unwrap();
        assert!(MakeFace::new(wire).execute(&mut store).is_err());
    }

    #[test]
    fn non_planar_wire_is_rejected() {
        let mut store = TopologyStore::new();
        let result = face_from(
            &mut store,
            vec![
                p(0.0, 0.0),
                p(1.0, 0.0),
                Point3::new(1.0, 1.0, 0.5),
                p(0.0, 1.0),
            ],
        );
        assert!(result.is_err());
    }
}
