use super::edge::EdgeId;

slotmap::new_key_type! {
    /// Unique identifier for a wire in the topology store.
    pub struct WireId;
}

/// An edge with orientation information within a wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrientedEdge {
    /// The edge identifier.
    pub edge: EdgeId,
    /// If `true`, the edge is traversed in its natural direction (start → end).
    /// If `false`, the edge is traversed in reverse (end → start).
    pub forward: bool,
}

impl OrientedEdge {
    /// Creates a new oriented edge.
    #[must_use]
    pub fn new(edge: EdgeId, forward: bool) -> Self {
        Self { edge, forward }
    }

    /// Returns the same edge traversed the other way.
    #[must_use]
    pub fn reversed(self) -> Self {
        Self {
            edge: self.edge,
            forward: !self.forward,
        }
    }
}

/// Data associated with a topological wire.
///
/// A wire is an ordered sequence of oriented edges forming a connected path.
/// It may be open or closed.
#[derive(Debug, Clone)]
pub struct WireData {
    /// The ordered sequence of oriented edges.
    pub edges: Vec<OrientedEdge>,
    /// Whether this wire forms a closed loop.
    pub is_closed: bool,
}

impl WireData {
    /// Returns the loop traversed in the opposite direction.
    #[must_use]
    pub fn reversed_edges(&self) -> Vec<OrientedEdge> {
        self.edges.iter().rev().map(|oe| oe.reversed()).collect()
    }
}
