use crate::error::TopologyError;
use crate::math::{cross_2d, Point2, TOLERANCE};

use super::{EdgeId, FaceId, Mesh};

/// Parameter distance from an edge end within which a closest point is
/// treated as the end vertex.
const VERTEX_EPS: f64 = 1e-9;

/// The closest point on an edge to a query point.
#[derive(Debug, Clone, Copy)]
pub struct EdgeHit {
    pub edge: EdgeId,
    /// Curve parameter of the closest point on the edge.
    pub t: f64,
    pub point: Point2,
    pub distance: f64,
}

impl Mesh {
    /// The edge passing closest to `point`, measured on edge polylines.
    #[must_use]
    pub fn closest_edge(&self, point: &Point2) -> Option<EdgeHit> {
        self.closest_edge_excluding(point, None)
    }

    pub(crate) fn closest_edge_excluding(
        &self,
        point: &Point2,
        exclude: Option<EdgeId>,
    ) -> Option<EdgeHit> {
        self.edges
            .iter()
            .filter(|(id, _)| Some(*id) != exclude)
            .filter_map(|(id, data)| {
                data.polyline(&self.split_config)
                    .find_closest_point(point)
                    .map(|hit| EdgeHit {
                        edge: id,
                        t: hit.t,
                        point: hit.point,
                        distance: hit.distance,
                    })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    /// The face containing `point`.
    ///
    /// Finds the nearest edge and decides the side from the edge tangent at
    /// the nearest point. If the nearest point is an edge end, the side is
    /// decided from the edges around that vertex instead. Points lying on an
    /// edge resolve to its left face.
    ///
    /// # Errors
    ///
    /// Returns an error if the mesh is internally inconsistent.
    pub fn face_at_point(&self, point: &Point2) -> Result<FaceId, TopologyError> {
        self.locate_face(point, None)
    }

    /// Locates the face, ignoring `exclude` (an edge not yet attached).
    pub(crate) fn locate_face(
        &self,
        point: &Point2,
        exclude: Option<EdgeId>,
    ) -> Result<FaceId, TopologyError> {
        let Some(hit) = self.closest_edge_excluding(point, exclude) else {
            return Ok(self.outer_face);
        };
        let edge = self.edge(hit.edge)?;
        if hit.distance < TOLERANCE {
            return Ok(edge.face_left);
        }

        let at_vertex = if hit.t <= VERTEX_EPS {
            Some(edge.start)
        } else if hit.t >= 1.0 - VERTEX_EPS {
            Some(edge.end)
        } else {
            None
        };
        if let Some(vertex) = at_vertex {
            let origin = self.vertex(vertex)?.coord.to_point();
            return self.face_in_direction(vertex, &(point - origin));
        }

        let mut tangent = edge.curve().derivative_at(hit.t);
        if tangent.norm() < TOLERANCE {
            let poly = edge.polyline(&self.split_config);
            if let Some(index) = poly.segment_index_for(hit.t) {
                let s = poly.samples();
                tangent = s[index + 1].point - s[index].point;
            }
        }
        let side = cross_2d(&tangent, &(point - hit.point));
        Ok(if side > 0.0 {
            edge.face_left
        } else {
            edge.face_right
        })
    }
}
