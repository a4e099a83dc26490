pub mod edge;
pub mod face;
pub mod shell;
pub mod solid;
pub mod vertex;
pub mod wire;

pub use edge::{EdgeData, EdgeId};
pub use face::{FaceData, FaceId};
pub use shell::{ShellData, ShellId};
pub use solid::{SolidData, SolidId};
pub use vertex::{VertexData, VertexId};
pub use wire::{OrientedEdge, WireData, WireId};

use crate::error::TopologyError;
use crate::math::Point3;
use slotmap::SlotMap;

/// Central arena that owns all topological entities.
///
/// Entities reference each other via typed IDs (generational indices),
/// avoiding self-referential structures and enabling safe mutation.
#[derive(Debug, Default)]
pub struct TopologyStore {
    vertices: SlotMap<VertexId, VertexData>,
    edges: SlotMap<EdgeId, EdgeData>,
    wires: SlotMap<WireId, WireData>,
    faces: SlotMap<FaceId, FaceData>,
    shells: SlotMap<ShellId, ShellData>,
    solids: SlotMap<SolidId, SolidData>,
}

impl TopologyStore {
    /// Creates a new, empty topology store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Vertex operations ---

    /// Inserts a vertex and returns its ID.
    pub fn add_vertex(&mut self, data: VertexData) -> VertexId {
        self.vertices.insert(data)
    }

    /// Returns a reference to the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn vertex(&self, id: VertexId) -> Result<&VertexData, TopologyError> {
        self.vertices
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("vertex".into()))
    }

    /// Returns a mutable reference to the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn vertex_mut(&mut self, id: VertexId) -> Result<&mut VertexData, TopologyError> {
        self.vertices
            .get_mut(id)
            .ok_or_else(|| TopologyError::EntityNotFound("vertex".into()))
    }

    // --- Edge operations ---

    /// Inserts an edge and returns its ID.
    pub fn add_edge(&mut self, data: EdgeData) -> EdgeId {
        self.edges.insert(data)
    }

    /// Returns a reference to the edge data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn edge(&self, id: EdgeId) -> Result<&EdgeData, TopologyError> {
        self.edges
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("edge".into()))
    }

    /// Returns the vertex an oriented edge starts from.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge is not found in the store.
    pub fn oriented_start(&self, oe: OrientedEdge) -> Result<VertexId, TopologyError> {
        let edge = self.edge(oe.edge)?;
        Ok(if oe.forward { edge.start } else { edge.end })
    }

    /// Returns the vertex an oriented edge ends at.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge is not found in the store.
    pub fn oriented_end(&self, oe: OrientedEdge) -> Result<VertexId, TopologyError> {
        let edge = self.edge(oe.edge)?;
        Ok(if oe.forward { edge.end } else { edge.start })
    }

    // --- Wire operations ---

    /// Inserts a wire and returns its ID.
    pub fn add_wire(&mut self, data: WireData) -> WireId {
        self.wires.insert(data)
    }

    /// Returns a reference to the wire data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn wire(&self, id: WireId) -> Result<&WireData, TopologyError> {
        self.wires
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("wire".into()))
    }

    /// Returns a mutable reference to the wire data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn wire_mut(&mut self, id: WireId) -> Result<&mut WireData, TopologyError> {
        self.wires
            .get_mut(id)
            .ok_or_else(|| TopologyError::EntityNotFound("wire".into()))
    }

    /// Collects the vertices of a wire in traversal order.
    ///
    /// # Errors
    ///
    /// Returns an error if the wire or any of its edges is missing.
    pub fn wire_vertices(&self, id: WireId) -> Result<Vec<VertexId>, TopologyError> {
        self.wire(id)?
            .edges
            .iter()
            .map(|&oe| self.oriented_start(oe))
            .collect()
    }

    /// Collects the vertex positions of a wire in traversal order.
    ///
    /// # Errors
    ///
    /// Returns an error if the wire, its edges, or its vertices are missing.
    pub fn wire_points(&self, id: WireId) -> Result<Vec<Point3>, TopologyError> {
        self.wire_vertices(id)?
            .into_iter()
            .map(|v| self.vertex(v).map(|data| data.point))
            .collect()
    }

    // --- Face operations ---

    /// Inserts a face and returns its ID.
    pub fn add_face(&mut self, data: FaceData) -> FaceId {
        self.faces.insert(data)
    }

    /// Returns a reference to the face data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn face(&self, id: FaceId) -> Result<&FaceData, TopologyError> {
        self.faces
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("face".into()))
    }

    /// Returns a mutable reference to the face data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn face_mut(&mut self, id: FaceId) -> Result<&mut FaceData, TopologyError> {
        self.faces
            .get_mut(id)
            .ok_or_else(|| TopologyError::EntityNotFound("face".into()))
    }

    // --- Shell operations ---

    /// Inserts a shell and returns its ID.
    pub fn add_shell(&mut self, data: ShellData) -> ShellId {
        self.shells.insert(data)
    }

    /// Returns a reference to the shell data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn shell(&self, id: ShellId) -> Result<&ShellData, TopologyError> {
        self.shells
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("shell".into()))
    }

    // --- Solid operations ---

    /// Inserts a solid and returns its ID.
    pub fn add_solid(&mut self, data: SolidData) -> SolidId {
        self.solids.insert(data)
    }

    /// Returns a reference to the solid data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn solid(&self, id: SolidId) -> Result<&SolidData, TopologyError> {
        self.solids
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("solid".into()))
    }

    /// Returns the faces of a solid's outer shell.
    ///
    /// # Errors
    ///
    /// Returns an error if the solid or its shell is not found.
    pub fn solid_faces(&self, id: SolidId) -> Result<&[FaceId], TopologyError> {
        let solid = self.solid(id)?;
        Ok(&self.shell(solid.outer_shell)?.faces)
    }

    /// Returns the number of solids in the store.
    #[must_use]
    pub fn solid_count(&self) -> usize {
        self.solids.len()
    }
}
