use std::collections::BTreeSet;

use crate::error::TopologyError;
use crate::geometry::{commands_from_curves, Curve, PathCommand};
use crate::math::polygon_2d::{point_in_polygon_2d, signed_area_2d};
use crate::math::Point2;

use super::{FaceId, Mesh, OrientedEdge, VertexId};

/// An ordered boundary loop of a face.
///
/// Every half-edge has the face on its left, so the outer boundary of a
/// bounded face runs counter-clockwise (positive area) and the boundary of
/// a hole or of the outer face runs clockwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contour {
    pub edges: Vec<OrientedEdge>,
    /// Whether the last half-edge ends where the first begins.
    pub closed: bool,
}

impl Contour {
    /// The flattened loop, without repeating the closing point.
    ///
    /// # Errors
    ///
    /// Returns an error if an edge of the contour no longer exists.
    pub fn points(&self, mesh: &Mesh) -> Result<Vec<Point2>, TopologyError> {
        let mut points = mesh.half_edge_points(&self.edges)?;
        if self.closed && points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        Ok(points)
    }

    /// Shoelace area of the flattened loop; positive when counter-clockwise.
    ///
    /// # Errors
    ///
    /// Returns an error if an edge of the contour no longer exists.
    pub fn signed_area(&self, mesh: &Mesh) -> Result<f64, TopologyError> {
        Ok(signed_area_2d(&self.points(mesh)?))
    }

    /// Even-odd containment test against the flattened loop.
    ///
    /// # Errors
    ///
    /// Returns an error if an edge of the contour no longer exists.
    pub fn contains_point(&self, mesh: &Mesh, point: &Point2) -> Result<bool, TopologyError> {
        Ok(self.closed && point_in_polygon_2d(point, &self.points(mesh)?))
    }

    /// The curves of the loop in traversal order.
    ///
    /// # Errors
    ///
    /// Returns an error if an edge of the contour no longer exists.
    pub fn curves(&self, mesh: &Mesh) -> Result<Vec<Curve>, TopologyError> {
        self.edges.iter().map(|h| mesh.oriented_curve(*h)).collect()
    }

    /// The loop as path commands, closed with `ClosePath` when closed.
    ///
    /// # Errors
    ///
    /// Returns an error if an edge of the contour no longer exists.
    pub fn to_commands(&self, mesh: &Mesh) -> Result<Vec<PathCommand>, TopologyError> {
        Ok(commands_from_curves(&self.curves(mesh)?, self.closed))
    }
}

impl Mesh {
    /// Assembles the edges attached to `face` into boundary loops.
    ///
    /// Loops are built greedily: each step prefers the half-edge that
    /// follows around the face, then any remaining attachment leaving the
    /// open end, then one arriving at the open start. A loop that cannot be
    /// extended either way is reported open.
    ///
    /// # Errors
    ///
    /// Returns an error if the face or one of its edges is missing.
    pub fn face_contours(&self, face: FaceId) -> Result<Vec<Contour>, TopologyError> {
        let mut remaining: BTreeSet<OrientedEdge> = self.face(face)?.attachments().collect();
        let mut contours = Vec::new();

        while let Some(first) = remaining.pop_first() {
            let mut edges = vec![first];
            let mut closed = false;
            loop {
                let last = edges[edges.len() - 1];
                let follow = self.next_in_face(last)?;
                if follow == edges[0] {
                    closed = true;
                    break;
                }
                if remaining.remove(&follow) {
                    edges.push(follow);
                    continue;
                }
                let end = self.destination(last)?;
                if let Some(next) = self.find_attachment(&remaining, |h| self.origin(h), end)? {
                    remaining.remove(&next);
                    edges.push(next);
                    continue;
                }
                if end == self.origin(edges[0])? {
                    closed = true;
                    break;
                }
                let start = self.origin(edges[0])?;
                if let Some(prev) =
                    self.find_attachment(&remaining, |h| self.destination(h), start)?
                {
                    remaining.remove(&prev);
                    edges.insert(0, prev);
                    continue;
                }
                break;
            }
            contours.push(Contour { edges, closed });
        }
        Ok(contours)
    }

    fn find_attachment<F>(
        &self,
        remaining: &BTreeSet<OrientedEdge>,
        endpoint: F,
        at: VertexId,
    ) -> Result<Option<OrientedEdge>, TopologyError>
    where
        F: Fn(OrientedEdge) -> Result<VertexId, TopologyError>,
    {
        for half in remaining {
            if endpoint(*half)? == at {
                return Ok(Some(*half));
            }
        }
        Ok(None)
    }

    /// Flattened points along consecutive half-edges, joints not repeated.
    pub(crate) fn half_edge_points(
        &self,
        halves: &[OrientedEdge],
    ) -> Result<Vec<Point2>, TopologyError> {
        let mut points = Vec::new();
        for half in halves {
            let poly = self.oriented_polyline(*half)?;
            let skip = usize::from(!points.is_empty());
            points.extend(poly.samples().iter().skip(skip).map(|s| s.point));
        }
        Ok(points)
    }
}
