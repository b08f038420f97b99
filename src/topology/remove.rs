use tracing::debug;

use crate::error::{OperationError, Result, TopologyError};
use crate::geometry::Curve;

use super::{EdgeId, FaceData, FaceId, Mesh, VertexId};

impl Mesh {
    /// Removes an edge, merging the faces on its two sides.
    ///
    /// The outer face survives any merge it takes part in. Caller data of
    /// the removed face fills slots the surviving face does not have.
    /// Vertices left without edges are removed too.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::EntityNotFound` if the edge does not exist.
    pub fn remove_edge(&mut self, id: EdgeId) -> Result<()> {
        let data = self.detach_edge(id)?;
        if data.face_left != data.face_right {
            let (keep, gone) = if data.face_left == self.outer_face {
                (data.face_left, data.face_right)
            } else {
                (data.face_right, data.face_left)
            };
            self.merge_faces(keep, gone)?;
        }
        self.prune_vertex(data.start);
        self.prune_vertex(data.end);
        Ok(())
    }

    /// Moves every attachment of `gone` onto `keep` and deletes `gone`.
    pub(super) fn merge_faces(&mut self, keep: FaceId, gone: FaceId) -> Result<()> {
        let Some(removed) = self.faces.remove(gone) else {
            return Ok(());
        };
        for edge in &removed.left {
            if let Some(e) = self.edges.get_mut(*edge) {
                e.face_left = keep;
            }
        }
        for edge in &removed.right {
            if let Some(e) = self.edges.get_mut(*edge) {
                e.face_right = keep;
            }
        }
        let target = self.face_data_mut(keep)?;
        target.left.extend(removed.left.iter().copied());
        target.right.extend(removed.right.iter().copied());
        target.aux.merge_missing_from(&removed.aux);
        debug!(kept = target.uid, removed = removed.uid, "merged faces");
        Ok(())
    }

    fn face_data_mut(&mut self, id: FaceId) -> Result<&mut FaceData> {
        self.faces
            .get_mut(id)
            .ok_or_else(|| TopologyError::EntityNotFound("face".into()).into())
    }

    /// Removes a vertex joining exactly two edges, replacing them with one
    /// edge along both curves.
    ///
    /// Two straight edges become a line; otherwise the joined curve is a
    /// cubic. The merged edge keeps the direction of the edge arriving at the
    /// vertex and the caller data of both edges, the arriving edge winning
    /// where both have a slot.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if the vertex does not join
    /// exactly two edges, if the two edges border different faces, or if
    /// they connect the same pair of vertices (the merge would close a loop
    /// on itself).
    pub fn remove_vertex(&mut self, id: VertexId) -> Result<EdgeId> {
        let vertex = self.vertex(id)?;
        let incident: Vec<EdgeId> = vertex
            .incoming
            .iter()
            .chain(&vertex.outgoing)
            .copied()
            .collect();
        let [first, second] = incident[..] else {
            return Err(OperationError::InvalidInput(format!(
                "only a vertex joining two edges can be removed, this one has {}",
                incident.len()
            ))
            .into());
        };
        if first == second {
            return Err(
                OperationError::InvalidInput("cannot remove the vertex of a loop edge".into()).into(),
            );
        }

        // Orient both pieces to run through the vertex: `arriving` ends at
        // it and `leaving` starts at it.
        let a = self.edge(first)?;
        let b = self.edge(second)?;
        let (arriving, arriving_faces) = if a.end == id {
            (a.curve().clone(), (a.face_left, a.face_right))
        } else {
            (a.curve().reverse(), (a.face_right, a.face_left))
        };
        let (leaving, leaving_faces) = if b.start == id {
            (b.curve().clone(), (b.face_left, b.face_right))
        } else {
            (b.curve().reverse(), (b.face_right, b.face_left))
        };
        if arriving_faces != leaving_faces {
            return Err(OperationError::InvalidInput(
                "edges through the vertex border different faces".into(),
            )
            .into());
        }
        if arriving.start() == leaving.end() {
            return Err(OperationError::InvalidInput(
                "merging the edges would create a self-loop".into(),
            )
            .into());
        }

        let len_a = arriving.length(self.config.flatten_tolerance);
        let len_b = leaving.length(self.config.flatten_tolerance);
        let total = len_a + len_b;
        let ratio = if total > 0.0 { len_a / total } else { 0.5 };
        let joined: Curve = Curve::join(&arriving, &leaving, ratio)?;

        let mut aux = a.aux.clone();
        aux.merge_missing_from(&b.aux);

        self.detach_edge(first)?;
        self.detach_edge(second)?;
        self.prune_vertex(id);
        let (left, right) = arriving_faces;
        let merged = self.add_edge(joined, left, right, aux);
        debug!(?merged, "merged edges through removed vertex");
        Ok(merged)
    }
}
