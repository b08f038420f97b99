mod angular;
pub mod aux_data;
mod contour;
pub mod edge;
pub mod face;
mod insert;
mod locate;
pub mod oriented;
mod remove;
mod validate;
pub mod vertex;

pub use aux_data::AuxData;
pub use contour::Contour;
pub use edge::{EdgeData, EdgeId};
pub use face::{FaceData, FaceId};
pub use insert::{EdgeEvent, InsertReport};
pub use locate::EdgeHit;
pub use oriented::OrientedEdge;
pub use vertex::{VertexData, VertexId};

use std::collections::HashMap;

use slotmap::SlotMap;

use crate::error::TopologyError;
use crate::geometry::polyline::DEFAULT_MAX_DEPTH;
use crate::geometry::{Coord, Curve, Polyline};
use crate::operations::split::SplitConfig;

/// Tuning for a [`Mesh`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshConfig {
    /// Flatness tolerance for edge polylines, in squared grid units.
    pub flatten_tolerance: f64,
    /// Recursion limit for flattening.
    pub max_flatten_depth: u32,
    /// Worklist cap for the split engine during insertion.
    pub max_split_iterations: usize,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            flatten_tolerance: 1.0,
            max_flatten_depth: DEFAULT_MAX_DEPTH,
            max_split_iterations: 4096,
        }
    }
}

impl MeshConfig {
    #[must_use]
    pub fn with_flatten_tolerance(mut self, tolerance: f64) -> Self {
        self.flatten_tolerance = tolerance;
        self
    }

    #[must_use]
    pub fn with_max_flatten_depth(mut self, depth: u32) -> Self {
        self.max_flatten_depth = depth;
        self
    }

    #[must_use]
    pub fn with_max_split_iterations(mut self, iterations: usize) -> Self {
        self.max_split_iterations = iterations;
        self
    }

    /// The equivalent settings for the split operations.
    #[must_use]
    pub fn split_config(&self) -> SplitConfig {
        SplitConfig {
            flatten_tolerance: self.flatten_tolerance,
            max_flatten_depth: self.max_flatten_depth,
            max_iterations: self.max_split_iterations,
        }
    }
}

/// A planar subdivision of the grid into faces bounded by curve edges.
///
/// Entities reference each other via typed IDs (generational indices).
/// IDs of edges that are split or merged by a mutation become stale; the
/// [`InsertReport`] of an insertion lists the replacements.
///
/// The outer face always exists and is never removed.
#[derive(Debug)]
pub struct Mesh {
    vertices: SlotMap<VertexId, VertexData>,
    edges: SlotMap<EdgeId, EdgeData>,
    faces: SlotMap<FaceId, FaceData>,
    vertex_index: HashMap<Coord, VertexId>,
    outer_face: FaceId,
    next_face_uid: u64,
    config: MeshConfig,
    split_config: SplitConfig,
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

impl Mesh {
    /// Creates an empty mesh holding only the outer face.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MeshConfig::default())
    }

    /// Creates an empty mesh with explicit settings.
    #[must_use]
    pub fn with_config(config: MeshConfig) -> Self {
        let mut faces = SlotMap::with_key();
        let outer_face = faces.insert(FaceData::new(0));
        Self {
            vertices: SlotMap::with_key(),
            edges: SlotMap::with_key(),
            faces,
            vertex_index: HashMap::new(),
            outer_face,
            next_face_uid: 1,
            split_config: config.split_config(),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &MeshConfig {
        &self.config
    }

    /// The unbounded face surrounding everything.
    #[must_use]
    pub fn outer_face(&self) -> FaceId {
        self.outer_face
    }

    // --- Vertex access ---

    /// Returns a reference to the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the mesh.
    pub fn vertex(&self, id: VertexId) -> Result<&VertexData, TopologyError> {
        self.vertices
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("vertex".into()))
    }

    /// The vertex at `coord`, if any.
    #[must_use]
    pub fn vertex_at(&self, coord: Coord) -> Option<VertexId> {
        self.vertex_index.get(&coord).copied()
    }

    /// Caller data of a vertex.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the mesh.
    pub fn vertex_aux_mut(&mut self, id: VertexId) -> Result<&mut AuxData, TopologyError> {
        self.vertices
            .get_mut(id)
            .map(|v| &mut v.aux)
            .ok_or_else(|| TopologyError::EntityNotFound("vertex".into()))
    }

    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &VertexData)> {
        self.vertices.iter()
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    // --- Edge access ---

    /// Returns a reference to the edge data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the mesh.
    pub fn edge(&self, id: EdgeId) -> Result<&EdgeData, TopologyError> {
        self.edges
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("edge".into()))
    }

    /// Caller data of an edge.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the mesh.
    pub fn edge_aux_mut(&mut self, id: EdgeId) -> Result<&mut AuxData, TopologyError> {
        self.edges
            .get_mut(id)
            .map(|e| &mut e.aux)
            .ok_or_else(|| TopologyError::EntityNotFound("edge".into()))
    }

    /// The cached polyline approximation of an edge.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the mesh.
    pub fn edge_polyline(&self, id: EdgeId) -> Result<&Polyline, TopologyError> {
        Ok(self.edge(id)?.polyline(&self.split_config))
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &EdgeData)> {
        self.edges.iter()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    // --- Face access ---

    /// Returns a reference to the face data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the mesh.
    pub fn face(&self, id: FaceId) -> Result<&FaceData, TopologyError> {
        self.faces
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("face".into()))
    }

    /// Caller data of a face.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the mesh.
    pub fn face_aux_mut(&mut self, id: FaceId) -> Result<&mut AuxData, TopologyError> {
        self.faces
            .get_mut(id)
            .map(|f| &mut f.aux)
            .ok_or_else(|| TopologyError::EntityNotFound("face".into()))
    }

    pub fn faces(&self) -> impl Iterator<Item = (FaceId, &FaceData)> {
        self.faces.iter()
    }

    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Total number of (edge, side) attachments over all faces.
    #[must_use]
    pub fn attachment_count(&self) -> usize {
        self.faces.values().map(FaceData::attachment_count).sum()
    }

    // --- Half-edge access ---

    /// The vertex a half-edge leaves.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge is not found in the mesh.
    pub fn origin(&self, half: OrientedEdge) -> Result<VertexId, TopologyError> {
        let edge = self.edge(half.edge)?;
        Ok(if half.forward { edge.start } else { edge.end })
    }

    /// The vertex a half-edge arrives at.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge is not found in the mesh.
    pub fn destination(&self, half: OrientedEdge) -> Result<VertexId, TopologyError> {
        self.origin(half.reversed())
    }

    /// The face on the left of a half-edge.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge is not found in the mesh.
    pub fn left_face(&self, half: OrientedEdge) -> Result<FaceId, TopologyError> {
        let edge = self.edge(half.edge)?;
        Ok(if half.forward {
            edge.face_left
        } else {
            edge.face_right
        })
    }

    /// The curve of a half-edge in its direction of travel.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge is not found in the mesh.
    pub fn oriented_curve(&self, half: OrientedEdge) -> Result<Curve, TopologyError> {
        let curve = self.edge(half.edge)?.curve();
        Ok(if half.forward {
            curve.clone()
        } else {
            curve.reverse()
        })
    }

    /// The polyline of a half-edge in its direction of travel.
    pub(crate) fn oriented_polyline(&self, half: OrientedEdge) -> Result<Polyline, TopologyError> {
        let poly = self.edge_polyline(half.edge)?;
        Ok(if half.forward {
            poly.clone()
        } else {
            poly.reversed()
        })
    }

    // --- Internal mutation ---

    /// Returns the vertex at `coord`, creating it if absent.
    fn intern_vertex(&mut self, coord: Coord) -> VertexId {
        if let Some(id) = self.vertex_index.get(&coord) {
            return *id;
        }
        let id = self.vertices.insert(VertexData::new(coord));
        self.vertex_index.insert(coord, id);
        id
    }

    /// Drops `id` if no edge touches it any more.
    fn prune_vertex(&mut self, id: VertexId) {
        let isolated = self.vertices.get(id).is_some_and(VertexData::is_isolated);
        if isolated {
            if let Some(data) = self.vertices.remove(id) {
                self.vertex_index.remove(&data.coord);
            }
        }
    }

    fn new_face(&mut self, aux: AuxData) -> FaceId {
        let mut data = FaceData::new(self.next_face_uid);
        self.next_face_uid += 1;
        data.aux = aux;
        self.faces.insert(data)
    }

    /// Adds an edge bordering `left` and `right`, registering it with its
    /// vertices and faces.
    fn add_edge(&mut self, curve: Curve, left: FaceId, right: FaceId, aux: AuxData) -> EdgeId {
        let start = self.intern_vertex(curve.start());
        let end = self.intern_vertex(curve.end());
        let mut data = EdgeData::new(start, end, curve, left);
        data.face_right = right;
        data.aux = aux;
        let id = self.edges.insert(data);
        if let Some(v) = self.vertices.get_mut(start) {
            v.outgoing.push(id);
        }
        if let Some(v) = self.vertices.get_mut(end) {
            v.incoming.push(id);
        }
        if let Some(f) = self.faces.get_mut(left) {
            f.left.insert(id);
        }
        if let Some(f) = self.faces.get_mut(right) {
            f.right.insert(id);
        }
        id
    }

    /// Removes an edge from the arena, its vertices, and its faces, without
    /// pruning vertices.
    fn detach_edge(&mut self, id: EdgeId) -> Result<EdgeData, TopologyError> {
        let data = self
            .edges
            .remove(id)
            .ok_or_else(|| TopologyError::EntityNotFound("edge".into()))?;
        if let Some(v) = self.vertices.get_mut(data.start) {
            v.outgoing.retain(|e| *e != id);
        }
        if let Some(v) = self.vertices.get_mut(data.end) {
            v.incoming.retain(|e| *e != id);
        }
        if let Some(f) = self.faces.get_mut(data.face_left) {
            f.left.remove(&id);
        }
        if let Some(f) = self.faces.get_mut(data.face_right) {
            f.right.remove(&id);
        }
        Ok(data)
    }

    /// Moves the left side of `half` onto `face`.
    fn set_left_face(&mut self, half: OrientedEdge, face: FaceId) -> Result<(), TopologyError> {
        let edge = self
            .edges
            .get_mut(half.edge)
            .ok_or_else(|| TopologyError::EntityNotFound("edge".into()))?;
        let slot = if half.forward {
            &mut edge.face_left
        } else {
            &mut edge.face_right
        };
        let previous = std::mem::replace(slot, face);
        if let Some(f) = self.faces.get_mut(previous) {
            if half.forward {
                f.left.remove(&half.edge);
            } else {
                f.right.remove(&half.edge);
            }
        }
        let target = self
            .faces
            .get_mut(face)
            .ok_or_else(|| TopologyError::EntityNotFound("face".into()))?;
        if half.forward {
            target.left.insert(half.edge);
        } else {
            target.right.insert(half.edge);
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn new_mesh_has_only_the_outer_face() {
        let mesh = Mesh::new();
        assert_eq!(mesh.face_count(), 1);
        assert_eq!(mesh.face(mesh.outer_face()).unwrap().uid, 0);
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.edge_count(), 0);
        mesh.validate().unwrap();
    }

    #[test]
    fn config_builders() {
        let config = MeshConfig::default()
            .with_flatten_tolerance(0.25)
            .with_max_flatten_depth(10)
            .with_max_split_iterations(64);
        let split = config.split_config();
        assert!((split.flatten_tolerance - 0.25).abs() < f64::EPSILON);
        assert_eq!(split.max_flatten_depth, 10);
        assert_eq!(split.max_iterations, 64);
        assert_eq!(Mesh::with_config(config).config(), &config);
    }

    #[test]
    fn missing_entities_are_errors() {
        let mut mesh = Mesh::new();
        let stale = mesh
            .insert_curve(Curve::line(Coord::new(0, 0), Coord::new(10, 0)))
            .unwrap()
            .added_edges()[0];
        mesh.remove_edge(stale).unwrap();
        assert!(mesh.edge(stale).is_err());
        assert!(mesh.edge_aux_mut(stale).is_err());
    }
}
