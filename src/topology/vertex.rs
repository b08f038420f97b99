use crate::geometry::Coord;

use super::aux_data::AuxData;
use super::edge::EdgeId;

slotmap::new_key_type! {
    /// Unique identifier for a vertex in the mesh.
    pub struct VertexId;
}

/// Data associated with a mesh vertex.
///
/// A vertex is identified by its coordinate; the mesh keeps at most one
/// vertex per coordinate and discards vertices left without edges.
#[derive(Debug, Clone)]
pub struct VertexData {
    /// Position on the grid.
    pub coord: Coord,
    /// Edges ending at this vertex.
    pub incoming: Vec<EdgeId>,
    /// Edges starting at this vertex.
    pub outgoing: Vec<EdgeId>,
    /// Caller-defined data.
    pub aux: AuxData,
}

impl VertexData {
    /// Creates a vertex with no incident edges.
    #[must_use]
    pub fn new(coord: Coord) -> Self {
        Self {
            coord,
            incoming: Vec::new(),
            outgoing: Vec::new(),
            aux: AuxData::new(),
        }
    }

    /// Number of incident edge ends.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.incoming.len() + self.outgoing.len()
    }

    /// Whether no edge touches this vertex.
    #[must_use]
    pub fn is_isolated(&self) -> bool {
        self.incoming.is_empty() && self.outgoing.is_empty()
    }
}
