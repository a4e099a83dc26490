use crate::error::{Result, TopologyError};
use crate::math::Point3;
use crate::topology::{SolidId, TopologyStore};

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box.
    pub min: Point3,
    /// Maximum corner of the bounding box.
    pub max: Point3,
}

impl Aabb {
    /// Builds the tightest box around a set of points.
    ///
    /// Returns `None` for an empty iterator.
    #[must_use]
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        Some(iter.fold(
            Self {
                min: first,
                max: first,
            },
            |acc, p| Self {
                min: acc.min.inf(p),
                max: acc.max.sup(p),
            },
        ))
    }

    /// Extent along the vertical axis.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.max.z - self.min.z
    }
}

/// Computes the axis-aligned bounding box of a solid.
pub struct BoundingBox {
    solid: SolidId,
}

impl BoundingBox {
    /// Creates a new `BoundingBox` query.
    #[must_use]
    pub fn new(solid: SolidId) -> Self {
        Self { solid }
    }

    /// Executes the query, returning the AABB of every boundary vertex.
    ///
    /// # Errors
    ///
    /// Returns an error if the solid or any of its entities is missing.
    pub fn execute(&self, store: &TopologyStore) -> Result<Aabb> {
        let mut points = Vec::new();
        for &face_id in store.solid_faces(self.solid)? {
            points.extend(store.wire_points(store.face(face_id)?.outer_wire)?);
        }
        Aabb::from_points(&points)
            .ok_or_else(|| TopologyError::InvalidTopology("solid has no vertices".into()).into())
    }
}
