use std::collections::HashMap;

use crate::topology::{EdgeId, SolidId, TopologyStore};

/// Maximum distance a face vertex may sit off its plane.
const PLANE_TOLERANCE: f64 = 1e-6;

/// Validates the topological and geometric consistency of a solid.
///
/// A valid massing solid has a closed shell in which every face boundary is a
/// connected closed loop lying on the face plane, and every edge is used by
/// exactly two faces, once in each direction (a closed, oriented 2-manifold).
pub struct IsValid {
    solid: SolidId,
}

impl IsValid {
    /// Creates a new `IsValid` query.
    #[must_use]
    pub fn new(solid: SolidId) -> Self {
        Self { solid }
    }

    /// Executes the validation, returning `true` if the solid is valid.
    #[must_use]
    pub fn execute(&self, store: &TopologyStore) -> bool {
        self.check(store).unwrap_or(false)
    }

    fn check(&self, store: &TopologyStore) -> Option<bool> {
        let solid = store.solid(self.solid).ok()?;
        let shell = store.shell(solid.outer_shell).ok()?;
        if !shell.is_closed || shell.faces.len() < 4 {
            return Some(false);
        }

        // (forward uses, reverse uses) per edge
        let mut uses: HashMap<EdgeId, (u32, u32)> = HashMap::new();

        for &face_id in &shell.faces {
            let face = store.face(face_id).ok()?;
            let wire = store.wire(face.outer_wire).ok()?;
            if !wire.is_closed || wire.edges.len() < 3 {
                return Some(false);
            }

            let n = wire.edges.len();
            for i in 0..n {
                let end = store.oriented_end(wire.edges[i]).ok()?;
                let next_start = store.oriented_start(wire.edges[(i + 1) % n]).ok()?;
                if end != next_start {
                    return Some(false);
                }
            }

            for point in store.wire_points(face.outer_wire).ok()? {
                if face.surface.signed_distance(&point).abs() > PLANE_TOLERANCE {
                    return Some(false);
                }
            }

            for oe in &wire.edges {
                let entry = uses.entry(oe.edge).or_default();
                if oe.forward {
                    entry.0 += 1;
                } else {
                    entry.1 += 1;
                }
            }
        }

        Some(uses.values().all(|&(fwd, rev)| fwd == 1 && rev == 1))
    }
}
