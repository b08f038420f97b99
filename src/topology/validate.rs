use crate::error::TopologyError;

use super::{EdgeId, Mesh};

fn invalid(message: impl Into<String>) -> TopologyError {
    TopologyError::InvalidTopology(message.into())
}

impl Mesh {
    /// Checks the structural invariants of the mesh.
    ///
    /// Every edge is registered with both of its vertices and with the faces
    /// on both of its sides, its curve ends on its vertices, and no vertex is
    /// left without edges.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::InvalidTopology` describing the first
    /// violation found.
    pub fn validate(&self) -> Result<(), TopologyError> {
        if !self.faces.contains_key(self.outer_face) {
            return Err(invalid("outer face is missing"));
        }

        if self.vertex_index.len() != self.vertices.len() {
            return Err(invalid(format!(
                "{} indexed coordinates for {} vertices",
                self.vertex_index.len(),
                self.vertices.len()
            )));
        }
        for (id, vertex) in &self.vertices {
            if self.vertex_index.get(&vertex.coord) != Some(&id) {
                return Err(invalid(format!(
                    "vertex at ({}, {}) is not indexed by its coordinate",
                    vertex.coord.x, vertex.coord.y
                )));
            }
            if vertex.is_isolated() {
                return Err(invalid(format!(
                    "vertex at ({}, {}) has no edges",
                    vertex.coord.x, vertex.coord.y
                )));
            }
            for edge in &vertex.outgoing {
                if self.edges.get(*edge).map(|e| e.start) != Some(id) {
                    return Err(invalid("outgoing edge does not start at its vertex"));
                }
            }
            for edge in &vertex.incoming {
                if self.edges.get(*edge).map(|e| e.end) != Some(id) {
                    return Err(invalid("incoming edge does not end at its vertex"));
                }
            }
        }

        for (id, edge) in &self.edges {
            let start = self.vertex(edge.start)?;
            let end = self.vertex(edge.end)?;
            if edge.start == edge.end {
                return Err(invalid("edge starts and ends at the same vertex"));
            }
            if edge.curve().start() != start.coord || edge.curve().end() != end.coord {
                return Err(invalid("edge curve does not end on its vertices"));
            }
            if edge.curve().is_degenerate() {
                return Err(invalid("edge curve is degenerate"));
            }
            let listed = |ids: &[EdgeId]| ids.iter().filter(|e| **e == id).count() == 1;
            if !listed(&start.outgoing) || !listed(&end.incoming) {
                return Err(invalid("edge is not listed exactly once by its vertices"));
            }
            if !self.face(edge.face_left)?.left.contains(&id) {
                return Err(invalid("edge is missing from the face on its left"));
            }
            if !self.face(edge.face_right)?.right.contains(&id) {
                return Err(invalid("edge is missing from the face on its right"));
            }
        }

        for face in self.faces.values() {
            let stale_left = face
                .left
                .iter()
                .any(|e| !self.edges.contains_key(*e));
            let stale_right = face
                .right
                .iter()
                .any(|e| !self.edges.contains_key(*e));
            if stale_left || stale_right {
                return Err(invalid(format!("face {} lists a removed edge", face.uid)));
            }
        }
        if self.attachment_count() != 2 * self.edges.len() {
            return Err(invalid(format!(
                "{} face attachments for {} edges",
                self.attachment_count(),
                self.edges.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::geometry::{Coord, Curve};
    use crate::topology::Mesh;

    #[test]
    fn detects_face_set_out_of_sync() {
        let mut mesh = Mesh::new();
        let report = mesh
            .insert_curve(Curve::line(Coord::new(0, 0), Coord::new(10, 0)))
            .unwrap();
        mesh.validate().unwrap();

        let edge = report.added_edges()[0];
        let outer = mesh.outer_face();
        mesh.faces.get_mut(outer).unwrap().left.remove(&edge);
        assert!(mesh.validate().is_err());
    }

    #[test]
    fn detects_unindexed_vertex() {
        let mut mesh = Mesh::new();
        mesh.insert_curve(Curve::line(Coord::new(0, 0), Coord::new(10, 0)))
            .unwrap();
        mesh.vertex_index.remove(&Coord::new(0, 0));
        assert!(mesh.validate().is_err());
    }
}
