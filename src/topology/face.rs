use crate::geometry::Plane;

use super::wire::WireId;

slotmap::new_key_type! {
    /// Unique identifier for a face in the topology store.
    pub struct FaceId;
}

/// Data associated with a topological face.
///
/// A face is a bounded planar region defined by an outer wire. The wire is
/// traversed counter-clockwise when viewed from the side the plane normal
/// points to, so the plane normal is the face's outward normal.
#[derive(Debug, Clone)]
pub struct FaceData {
    /// The plane on which this face lies.
    pub surface: Plane,
    /// The outer boundary wire.
    pub outer_wire: WireId,
}
