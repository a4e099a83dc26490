use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for an edge in the topology store.
    pub struct EdgeId;
}

/// Data associated with a topological edge.
///
/// Every edge of a massing solid is a straight segment, so the edge carries
/// no curve of its own: its shape is the line between its two vertices.
#[derive(Debug, Clone)]
pub struct EdgeData {
    /// Start vertex of the edge.
    pub start: VertexId,
    /// End vertex of the edge.
    pub end: VertexId,
}

impl EdgeData {
    /// Creates a new straight edge between two vertices.
    #[must_use]
    pub fn new(start: VertexId, end: VertexId) -> Self {
        Self { start, end }
    }
}
