//! Angular ordering of half-edges around a vertex and the face walks built
//! on it.
//!
//! Half-edges leaving a vertex are sorted counter-clockwise by the
//! direction of their exit tangent. Curves leaving in exactly the same
//! direction are ordered by where they bend to at a common distance from
//! the vertex.

use crate::error::TopologyError;
use crate::geometry::{Curve, Polyline};
use crate::math::{cross_2d, Vector2};

use super::{FaceId, Mesh, OrientedEdge, VertexId};

/// Sort key of an outgoing half-edge.
#[derive(Debug, Clone, Copy)]
struct AngularKey {
    angle: f64,
    bend: f64,
}

/// Angle of an integer direction, reduced by the gcd first so that parallel
/// directions of different lengths produce bit-identical angles.
fn exact_angle(dx: i64, dy: i64) -> f64 {
    let g = gcd(dx.unsigned_abs(), dy.unsigned_abs()).max(1);
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_wrap)]
    let (x, y) = ((dx / g as i64) as f64, (dy / g as i64) as f64);
    y.atan2(x)
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Angle of the exit direction of `curve`, or `None` for a point.
fn exit_angle(curve: &Curve) -> Option<f64> {
    let pts = curve.control_points();
    let start = pts[0];
    pts.iter().find(|c| **c != start).map(|next| {
        exact_angle(
            i64::from(next.x) - i64::from(start.x),
            i64::from(next.y) - i64::from(start.y),
        )
    })
}

/// Signed angle from `from` to `to`, in `(-PI, PI]`.
fn signed_angle(from: &Vector2, to: &Vector2) -> f64 {
    cross_2d(from, to).atan2(from.dot(to))
}

impl Mesh {
    /// The half-edges leaving `vertex`, sorted counter-clockwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex or one of its edges is missing.
    pub fn edges_around(&self, vertex: VertexId) -> Result<Vec<OrientedEdge>, TopologyError> {
        let data = self.vertex(vertex)?;
        let halves: Vec<OrientedEdge> = data
            .outgoing
            .iter()
            .map(|e| OrientedEdge::new(*e, true))
            .chain(data.incoming.iter().map(|e| OrientedEdge::new(*e, false)))
            .collect();

        let mut keyed = Vec::with_capacity(halves.len());
        for half in halves {
            let angle = exit_angle(&self.oriented_curve(half)?).unwrap_or(0.0);
            keyed.push((half, AngularKey { angle, bend: 0.0 }));
        }
        keyed.sort_by(|a, b| a.1.angle.total_cmp(&b.1.angle));
        self.resolve_ties(&mut keyed)?;
        keyed.sort_by(|a, b| {
            a.1.angle
                .total_cmp(&b.1.angle)
                .then(a.1.bend.total_cmp(&b.1.bend))
                .then(a.0.cmp(&b.0))
        });
        Ok(keyed.into_iter().map(|(half, _)| half).collect())
    }

    /// Fills in `bend` for runs of half-edges leaving at the same angle.
    fn resolve_ties(&self, keyed: &mut [(OrientedEdge, AngularKey)]) -> Result<(), TopologyError> {
        let mut start = 0;
        while start < keyed.len() {
            let angle = keyed[start].1.angle;
            let mut end = start + 1;
            while end < keyed.len() && keyed[end].1.angle.total_cmp(&angle).is_eq() {
                end += 1;
            }
            if end - start > 1 {
                let run = &mut keyed[start..end];
                let polys = run
                    .iter()
                    .map(|(half, _)| self.oriented_polyline(*half))
                    .collect::<Result<Vec<_>, _>>()?;
                let probe = polys.iter().map(Polyline::length).fold(f64::INFINITY, f64::min) * 0.5;
                let dir = Vector2::new(angle.cos(), angle.sin());
                for ((_, key), poly) in run.iter_mut().zip(&polys) {
                    let origin = poly.samples().first().map(|s| s.point);
                    let at = poly.point_at_distance(probe);
                    key.bend = match (origin, at) {
                        (Some(o), Some(p)) => signed_angle(&dir, &(p - o)),
                        _ => 0.0,
                    };
                }
            }
            start = end;
        }
        Ok(())
    }

    /// The half-edge that follows `half` around the face on its left.
    ///
    /// At the destination vertex this is the outgoing half-edge immediately
    /// clockwise of the reverse of `half`. At a dead end it is the reverse.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::MissingContinuation` if the destination does
    /// not list the edge.
    pub fn next_in_face(&self, half: OrientedEdge) -> Result<OrientedEdge, TopologyError> {
        let vertex = self.destination(half)?;
        let around = self.edges_around(vertex)?;
        let twin = half.reversed();
        let index = around.iter().position(|h| *h == twin).ok_or_else(|| {
            let coord = self.vertices.get(vertex).map(|v| v.coord).unwrap_or_default();
            TopologyError::MissingContinuation {
                x: coord.x,
                y: coord.y,
            }
        })?;
        Ok(around[(index + around.len() - 1) % around.len()])
    }

    /// The face containing the wedge clockwise of the outgoing `half`, that
    /// is, the face `half` would lie in if it were not yet attached.
    pub(crate) fn wedge_face(&self, half: OrientedEdge) -> Result<Option<FaceId>, TopologyError> {
        let vertex = self.origin(half)?;
        let around = self.edges_around(vertex)?;
        if around.len() < 2 {
            return Ok(None);
        }
        let Some(index) = around.iter().position(|h| *h == half) else {
            return Ok(None);
        };
        let clockwise = around[(index + around.len() - 1) % around.len()];
        self.left_face(clockwise).map(Some)
    }

    /// The face reached by leaving `vertex` in direction `dir`.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::UnresolvedFace` if the vertex has no edges.
    pub(crate) fn face_in_direction(
        &self,
        vertex: VertexId,
        dir: &Vector2,
    ) -> Result<FaceId, TopologyError> {
        let around = self.edges_around(vertex)?;
        let Some(last) = around.last() else {
            let coord = self.vertex(vertex)?.coord;
            return Err(TopologyError::UnresolvedFace {
                x: coord.x,
                y: coord.y,
            });
        };
        let query = dir.y.atan2(dir.x);
        let mut clockwise = *last;
        for half in &around {
            let Some(angle) = exit_angle(&self.oriented_curve(*half)?) else {
                continue;
            };
            if angle <= query {
                clockwise = *half;
            }
        }
        self.left_face(clockwise)
    }

    /// Walks the boundary of the face on the left of `start` until it
    /// returns to `start`.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::InvalidTopology` if the walk does not close.
    pub(crate) fn walk_cycle(
        &self,
        start: OrientedEdge,
    ) -> Result<Vec<OrientedEdge>, TopologyError> {
        let limit = 2 * self.edges.len() + 2;
        let mut cycle = vec![start];
        let mut current = self.next_in_face(start)?;
        while current != start {
            if cycle.len() > limit {
                return Err(TopologyError::InvalidTopology(
                    "face boundary walk does not close".into(),
                ));
            }
            cycle.push(current);
            current = self.next_in_face(current)?;
        }
        Ok(cycle)
    }
}
