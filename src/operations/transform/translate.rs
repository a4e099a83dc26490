use crate::error::Result;
use crate::math::Vector3;
use crate::topology::{TopologyStore, VertexId};

/// Translates a set of vertices by a displacement vector.
///
/// Edges and faces follow their vertices; face planes are not refreshed, so
/// callers translating part of a face must rebuild its surface afterwards.
pub struct Translate {
    vertices: Vec<VertexId>,
    displacement: Vector3,
}

impl Translate {
    /// Creates a new `Translate` operation.
    #[must_use]
    pub fn new(vertices: Vec<VertexId>, displacement: Vector3) -> Self {
        Self {
            vertices,
            displacement,
        }
    }

    /// Executes the translation, modifying the vertices in place.
    ///
    /// # Errors
    ///
    /// Returns an error if any vertex is not found in the store.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<()> {
        for &id in &self.vertices {
            let vertex = store.vertex_mut(id)?;
            vertex.point += self.displacement;
        }
        Ok(())
    }
}
