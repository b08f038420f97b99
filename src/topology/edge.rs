use std::cell::OnceCell;

use crate::geometry::{Curve, Polyline};
use crate::operations::split::SplitConfig;

use super::aux_data::AuxData;
use super::face::FaceId;
use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for an edge in the mesh.
    pub struct EdgeId;
}

/// Data associated with a mesh edge.
///
/// An edge is a directed curve between two vertices. `face_left` and
/// `face_right` are relative to the direction of travel from `start` to `end`.
#[derive(Debug, Clone)]
pub struct EdgeData {
    /// Start vertex of the edge.
    pub start: VertexId,
    /// End vertex of the edge.
    pub end: VertexId,
    /// Face on the left of the edge.
    pub face_left: FaceId,
    /// Face on the right of the edge.
    pub face_right: FaceId,
    /// Caller-defined data.
    pub aux: AuxData,
    curve: Curve,
    polyline: OnceCell<Polyline>,
}

impl EdgeData {
    /// Creates an edge with both sides on `face`.
    #[must_use]
    pub fn new(start: VertexId, end: VertexId, curve: Curve, face: FaceId) -> Self {
        Self {
            start,
            end,
            face_left: face,
            face_right: face,
            aux: AuxData::new(),
            curve,
            polyline: OnceCell::new(),
        }
    }

    /// The geometric curve defining this edge's shape.
    #[must_use]
    pub fn curve(&self) -> &Curve {
        &self.curve
    }

    /// The flattened curve, built on first use.
    pub(crate) fn polyline(&self, config: &SplitConfig) -> &Polyline {
        self.polyline.get_or_init(|| config.flatten(&self.curve))
    }
}
