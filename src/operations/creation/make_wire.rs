use crate::error::{OperationError, Result};
use crate::math::{Point3, TOLERANCE};
use crate::topology::{EdgeData, OrientedEdge, TopologyStore, VertexData, WireData, WireId};

/// Creates a wire of straight edges from a sequence of 3D points.
pub struct MakeWire {
    points: Vec<Point3>,
    close: bool,
}

impl MakeWire {
    /// Creates a new `MakeWire` operation.
    ///
    /// When `close` is set, an edge from the last point back to the first is
    /// added. A trailing point that repeats the first one is not duplicated.
    #[must_use]
    pub fn new(points: Vec<Point3>, close: bool) -> Self {
        Self { points, close }
    }

    /// Executes the operation, creating vertices, edges and the wire in the
    /// topology store.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidInput`] if there are fewer than two
    /// points or two consecutive points coincide.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<WireId> {
        let mut points = self.points.as_slice();
        if self.close && points.len() > 1 {
            if let (Some(first), Some(last)) = (points.first(), points.last()) {
                if (first - last).norm() < TOLERANCE {
                    points = &points[..points.len() - 1];
                }
            }
        }

        if points.len() < 2 {
            return Err(
                OperationError::InvalidInput("a wire needs at least two points".into()).into(),
            );
        }

        let segment_count = if self.close { points.len() } else { points.len() - 1 };
        for i in 0..segment_count {
            let a = &points[i];
            let b = &points[(i + 1) % points.len()];
            if (b - a).norm() < TOLERANCE {
                return Err(OperationError::InvalidInput(format!(
                    "zero-length segment at ({}, {}, {})",
                    a.x, a.y, a.z
                ))
                .into());
            }
        }

        let vertices: Vec<_> = points
            .iter()
            .map(|&p| store.add_vertex(VertexData::new(p)))
            .collect();

        let edges = (0..segment_count)
            .map(|i| {
                let edge = store.add_edge(EdgeData::new(
                    vertices[i],
                    vertices[(i + 1) % vertices.len()],
                ));
                OrientedEdge::new(edge, true)
            })
            .collect();

        Ok(store.add_wire(WireData {
            edges,
            is_closed: self.close,
        }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point3 {
        Point3::new(x, y, 0.0)
    }

    #[test]
    fn closed_triangle_has_three_edges() {
        let mut store = TopologyStore::new();
        let wire = MakeWire::new(vec![p(0.0, 0.0), p(1.0, 0.0), p(0.0, 1.0)], true)
            .execute(&mut store)
            .unwrap();
        let data = store.wire(wire).unwrap();
        assert_eq!(data.edges.len(), 3);
        assert!(data.is_closed);
    }

    #[test]
    fn closing_duplicate_is_not_repeated() {
        let mut store = TopologyStore::new();
        let wire = MakeWire::new(
            vec![p(0.0, 0.0), p(1.0, 0.0), p(0.0, 1.0), p(0.0, 0.0)],
            true,
        )
        .execute(&mut store)
        .unwrap();
        assert_eq!(store.wire(wire).unwrap().edges.len(), 3);
        assert_eq!(store.wire_vertices(wire).unwrap().len(), 3);
    }

    #[test]
    fn open_wire_has_one_fewer_edge() {
        let mut store = TopologyStore::new();
        let wire = MakeWire::new(vec![p(0.0, 0.0), p(1.0, 0.0), p(2.0, 1.0)], false)
            .execute(&mut store)
            .unwrap();
        assert_eq!(store.wire(wire).unwrap().edges.len(), 2);
    }

    #[test]
    fn repeated_point_is_rejected() {
        let mut store = TopologyStore::new();
        let result =
            MakeWire::new(vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 0.0)], true).execute(&mut store);
        assert!(result.is_err());
    }

    #[test]
    fn single_point_is_rejected() {
        let mut store = TopologyStore::new();
        assert!(MakeWire::new(vec![p(0.0, 0.0)], false).execute(&mut store).is_err());
    }
}
