use std::collections::BTreeSet;

use super::aux_data::AuxData;
use super::edge::EdgeId;
use super::oriented::OrientedEdge;

slotmap::new_key_type! {
    /// Unique identifier for a face in the mesh.
    pub struct FaceId;
}

/// Data associated with a mesh face.
///
/// A face records which edges border it on their left and which on their
/// right. The sets are unordered; [`Mesh::face_contours`] assembles them
/// into boundary loops.
///
/// [`Mesh::face_contours`]: super::Mesh::face_contours
#[derive(Debug, Clone)]
pub struct FaceData {
    /// Stable number, 0 for the outer face.
    pub uid: u64,
    /// Edges with this face on their left.
    pub left: BTreeSet<EdgeId>,
    /// Edges with this face on their right.
    pub right: BTreeSet<EdgeId>,
    /// Caller-defined data.
    pub aux: AuxData,
}

impl FaceData {
    #[must_use]
    pub fn new(uid: u64) -> Self {
        Self {
            uid,
            left: BTreeSet::new(),
            right: BTreeSet::new(),
            aux: AuxData::new(),
        }
    }

    /// Every attachment as a half-edge with this face on its left: edges on
    /// the left traversed forward, edges on the right traversed backward.
    pub fn attachments(&self) -> impl Iterator<Item = OrientedEdge> + '_ {
        self.left
            .iter()
            .map(|e| OrientedEdge::new(*e, true))
            .chain(self.right.iter().map(|e| OrientedEdge::new(*e, false)))
    }

    /// Number of (edge, side) attachments.
    #[must_use]
    pub fn attachment_count(&self) -> usize {
        self.left.len() + self.right.len()
    }

    /// Whether the attachment `half` (face on its left) belongs to this face.
    #[must_use]
    pub fn has_attachment(&self, half: OrientedEdge) -> bool {
        if half.forward {
            self.left.contains(&half.edge)
        } else {
            self.right.contains(&half.edge)
        }
    }
}
