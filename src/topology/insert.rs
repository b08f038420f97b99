use std::collections::HashSet;

use tracing::{debug, trace};

use crate::error::Result;
use crate::geometry::{curves_from_commands, Curve, PathCommand};
use crate::math::polygon_2d::{point_in_polygon_2d, signed_area_2d};
use crate::operations::split::{split_record_lists, SplitRecord, SplitSelfIntersections};

use super::{AuxData, EdgeId, FaceId, Mesh, OrientedEdge};

/// A change to the edge set made by an insertion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgeEvent {
    /// A fragment of the inserted curve, covering
    /// `[offset, offset + span]` of its parameter range.
    Added { edge: EdgeId, offset: f64, span: f64 },
    /// A piece of the existing edge `from`, which no longer exists.
    Split { edge: EdgeId, from: EdgeId },
}

/// What an insertion did to the mesh.
#[derive(Debug, Clone, Default)]
pub struct InsertReport {
    /// Edge changes in the order they happened.
    pub events: Vec<EdgeEvent>,
    /// Faces carved out of existing faces.
    pub faces_created: Vec<FaceId>,
}

impl InsertReport {
    /// Edges created from the inserted curve.
    #[must_use]
    pub fn added_edges(&self) -> Vec<EdgeId> {
        self.events
            .iter()
            .filter_map(|event| match event {
                EdgeEvent::Added { edge, .. } => Some(*edge),
                EdgeEvent::Split { .. } => None,
            })
            .collect()
    }

    /// `(piece, original)` pairs for every existing edge that was split.
    #[must_use]
    pub fn split_edges(&self) -> Vec<(EdgeId, EdgeId)> {
        self.events
            .iter()
            .filter_map(|event| match event {
                EdgeEvent::Split { edge, from } => Some((*edge, *from)),
                EdgeEvent::Added { .. } => None,
            })
            .collect()
    }

    fn extend(&mut self, other: Self) {
        self.events.extend(other.events);
        self.faces_created.extend(other.faces_created);
    }
}

impl Mesh {
    /// Inserts a curve, splitting it and the existing edges at every
    /// crossing and carving new faces out of the loops it closes.
    ///
    /// # Errors
    ///
    /// Returns a topology error if the mesh turns out to be inconsistent.
    /// The mesh may be partially updated in that case.
    pub fn insert_curve(&mut self, curve: Curve) -> Result<InsertReport> {
        self.insert_curve_with_aux(curve, &AuxData::new())
    }

    /// Inserts a curve whose new edges all carry a copy of `aux`.
    ///
    /// # Errors
    ///
    /// See [`Mesh::insert_curve`].
    pub fn insert_curve_with_aux(&mut self, curve: Curve, aux: &AuxData) -> Result<InsertReport> {
        let mut report = InsertReport::default();
        let mut fragments = self.prepare_fragments(curve);

        let snapshot: Vec<EdgeId> = self.edges.keys().collect();
        for edge_id in snapshot {
            let Some(edge) = self.edges.get(edge_id) else {
                continue;
            };
            let edge_box = edge.curve().bounding_box();
            if !fragments
                .iter()
                .any(|f| f.curve.bounding_box().overlaps(&edge_box))
            {
                continue;
            }
            let existing = vec![SplitRecord::root(edge.curve().clone())];
            let (split_fragments, pieces) =
                split_record_lists(fragments, existing, &self.split_config);
            fragments = split_fragments;
            if pieces.len() > 1 {
                self.replace_edge(edge_id, pieces, &mut report)?;
            }
        }

        for fragment in fragments {
            if fragment.is_degenerate() {
                continue;
            }
            self.attach_fragment(fragment, aux, &mut report)?;
        }

        debug!(
            added = report.added_edges().len(),
            split = report.split_edges().len(),
            faces_created = report.faces_created.len(),
            "inserted curve"
        );
        Ok(report)
    }

    /// Inserts every curve of a path command stream.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` for a malformed stream, or any
    /// error of [`Mesh::insert_curve`].
    pub fn insert_path(&mut self, commands: &[PathCommand]) -> Result<InsertReport> {
        let mut report = InsertReport::default();
        for curve in curves_from_commands(commands)? {
            report.extend(self.insert_curve(curve)?);
        }
        Ok(report)
    }

    /// Splits `curve` into the fragments that become edges: no fragment
    /// crosses itself, closes on itself, or is a point.
    fn prepare_fragments(&self, curve: Curve) -> Vec<SplitRecord> {
        let records = SplitSelfIntersections::new(curve)
            .with_config(self.split_config)
            .execute_records();
        let mut fragments = Vec::with_capacity(records.len() + 1);
        for record in records {
            if record.is_degenerate() {
                trace!(offset = record.offset, "skipping point fragment");
                continue;
            }
            if !record.curve.is_closed() {
                fragments.push(record);
                continue;
            }
            let (head, tail) = record.split_at(0.5);
            if head.curve.is_closed() {
                trace!(offset = record.offset, "skipping loop below grid resolution");
                continue;
            }
            fragments.push(head);
            fragments.push(tail);
        }
        fragments
    }

    /// Replaces an existing edge by its split pieces, which keep its faces
    /// and caller data.
    ///
    /// A piece that snapped onto the exact shape of another edge between the
    /// same vertices is folded into that edge instead of being added.
    fn replace_edge(
        &mut self,
        edge_id: EdgeId,
        pieces: Vec<SplitRecord>,
        report: &mut InsertReport,
    ) -> Result<()> {
        let old = self.detach_edge(edge_id)?;
        for piece in pieces.into_iter().filter(|p| !p.is_degenerate()) {
            if let Some(kept) = self.duplicate_of(&piece.curve) {
                let (left, right) = if kept.forward {
                    (old.face_left, old.face_right)
                } else {
                    (old.face_right, old.face_left)
                };
                self.absorb_duplicate(kept.edge, left, right)?;
                trace!(?edge_id, kept = ?kept.edge, "folded coincident split piece");
                continue;
            }
            let id = self.add_edge(piece.curve, old.face_left, old.face_right, old.aux.clone());
            report.events.push(EdgeEvent::Split {
                edge: id,
                from: edge_id,
            });
        }
        self.prune_vertex(old.start);
        self.prune_vertex(old.end);
        trace!(?edge_id, "split existing edge");
        Ok(())
    }

    /// An existing edge with exactly the shape of `curve`, oriented so that
    /// `forward` means it runs the same way.
    fn duplicate_of(&self, curve: &Curve) -> Option<OrientedEdge> {
        let u = self.vertex_at(curve.start())?;
        let w = self.vertex_at(curve.end())?;
        let reversed = curve.reverse();
        let v = self.vertices.get(u)?;
        v.outgoing.iter().chain(&v.incoming).find_map(|e| {
            let data = self.edges.get(*e)?;
            if data.start == u && data.end == w && data.curve() == curve {
                Some(OrientedEdge::new(*e, true))
            } else if data.start == w && data.end == u && *data.curve() == reversed {
                Some(OrientedEdge::new(*e, false))
            } else {
                None
            }
        })
    }

    /// Folds a dropped coincident edge, bordering `left` and `right` in the
    /// direction of `kept`, into `kept`.
    ///
    /// The zero-area face between the two edges is closed up: `kept` takes
    /// over the far side of the dropped edge, and the sliver face goes away
    /// once nothing borders it.
    fn absorb_duplicate(&mut self, kept: EdgeId, left: FaceId, right: FaceId) -> Result<()> {
        let edge = self.edge(kept)?;
        let (kept_left, kept_right) = (edge.face_left, edge.face_right);
        let closed = if right == kept_left && left != kept_left {
            self.set_left_face(OrientedEdge::new(kept, true), left)?;
            Some((kept_left, left))
        } else if left == kept_right && right != kept_right {
            self.set_left_face(OrientedEdge::new(kept, false), right)?;
            Some((kept_right, right))
        } else {
            None
        };
        if let Some((sliver, neighbour)) = closed {
            if sliver != self.outer_face && self.face(sliver)?.attachment_count() == 0 {
                self.merge_faces(neighbour, sliver)?;
            }
        }
        Ok(())
    }

    fn attach_fragment(
        &mut self,
        fragment: SplitRecord,
        aux: &AuxData,
        report: &mut InsertReport,
    ) -> Result<()> {
        let curve = fragment.curve;
        let start_vertex = self.vertex_at(curve.start());
        let end_vertex = self.vertex_at(curve.end());
        if self.duplicate_of(&curve).is_some() {
            trace!(offset = fragment.offset, "skipping duplicate fragment");
            return Ok(());
        }

        // An isolated fragment lies wholly inside one face. The first edge of
        // an empty mesh lands in the outer face.
        let provisional = if start_vertex.is_none() && end_vertex.is_none() {
            self.locate_face(&curve.evaluate(0.5), None)?
        } else {
            self.outer_face
        };
        let id = self.add_edge(curve, provisional, provisional, aux.clone());
        let forward = OrientedEdge::new(id, true);

        let wedge = if start_vertex.is_some() {
            self.wedge_face(forward)?
        } else if end_vertex.is_some() {
            self.wedge_face(forward.reversed())?
        } else {
            None
        };
        if let Some(face) = wedge {
            self.set_left_face(forward, face)?;
            self.set_left_face(forward.reversed(), face)?;
        }
        trace!(
            offset = fragment.offset,
            span = fragment.span,
            connected_start = start_vertex.is_some(),
            connected_end = end_vertex.is_some(),
            "attached fragment"
        );
        report.events.push(EdgeEvent::Added {
            edge: id,
            offset: fragment.offset,
            span: fragment.span,
        });

        if start_vertex.is_some() && end_vertex.is_some() {
            if let Some(face) = self.split_face_if_closed(id)? {
                report.faces_created.push(face);
            }
        }
        Ok(())
    }

    /// If the newly attached edge `id` closed a loop, moves the loop's
    /// interior (and any islands inside it) into a new face.
    fn split_face_if_closed(&mut self, id: EdgeId) -> Result<Option<FaceId>> {
        let forward = OrientedEdge::new(id, true);
        let backward = forward.reversed();
        let cycle_a = self.walk_cycle(forward)?;
        if cycle_a.contains(&backward) {
            return Ok(None);
        }
        let cycle_b = self.walk_cycle(backward)?;
        let points_a = self.half_edge_points(&cycle_a)?;
        let points_b = self.half_edge_points(&cycle_b)?;
        let area_a = signed_area_2d(&points_a);
        let area_b = signed_area_2d(&points_b);

        // The new face takes the counter-clockwise loop; if both loops are
        // counter-clockwise the smaller one.
        let take_a = match (area_a > 0.0, area_b > 0.0) {
            (true, false) => true,
            (false, true) => false,
            (true, true) => area_a <= area_b,
            (false, false) => area_a.abs() >= area_b.abs(),
        };
        let (inner, inner_points, outer) = if take_a {
            (cycle_a, points_a, cycle_b)
        } else {
            (cycle_b, points_b, cycle_a)
        };

        let old_face = self.left_face(forward)?;
        let aux = self.face(old_face)?.aux.clone();
        let new_face = self.new_face(aux);
        for half in &inner {
            self.set_left_face(*half, new_face)?;
        }

        let outer: HashSet<OrientedEdge> = outer.into_iter().collect();
        let candidates: Vec<OrientedEdge> = self
            .face(old_face)?
            .attachments()
            .filter(|h| !outer.contains(h))
            .collect();
        let mut islands = 0;
        for half in candidates {
            let probe = self.edge(half.edge)?.curve().evaluate(0.5);
            if point_in_polygon_2d(&probe, &inner_points) {
                self.set_left_face(half, new_face)?;
                islands += 1;
            }
        }

        debug!(
            boundary = inner.len(),
            islands,
            area = if take_a { area_a } else { area_b },
            "split face"
        );
        Ok(Some(new_face))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::geometry::{Coord, Curve, PathBuilder};
    use crate::math::Point2;
    use crate::topology::{AuxData, EdgeEvent, Mesh};

    fn c(x: i32, y: i32) -> Coord {
        Coord::new(x, y)
    }

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Stroke(u32);

    #[test]
    fn single_open_line() {
        init_tracing();
        let mut mesh = Mesh::new();
        let report = mesh.insert_curve(Curve::line(c(0, 0), c(100, 0))).unwrap();
        assert_eq!(mesh.vertex_count(), 2);
        assert_eq!(mesh.edge_count(), 1);
        assert_eq!(mesh.face_count(), 1);
        let edge = mesh.edge(report.added_edges()[0]).unwrap();
        assert_eq!(edge.face_left, mesh.outer_face());
        assert_eq!(edge.face_right, mesh.outer_face());
        mesh.validate().unwrap();
    }

    #[test]
    fn closed_triangle() {
        init_tracing();
        let mut mesh = Mesh::new();
        mesh.insert_curve(Curve::line(c(0, 0), c(100, 0))).unwrap();
        mesh.insert_curve(Curve::line(c(100, 0), c(50, 100))).unwrap();
        let report = mesh.insert_curve(Curve::line(c(50, 100), c(0, 0))).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.edge_count(), 3);
        assert_eq!(mesh.face_count(), 2);
        assert_eq!(report.faces_created.len(), 1);

        let inner = report.faces_created[0];
        let contours = mesh.face_contours(inner).unwrap();
        assert_eq!(contours.len(), 1);
        assert!(contours[0].closed);
        assert!(contours[0].signed_area(&mesh).unwrap() > 0.0);
        mesh.validate().unwrap();
    }

    #[test]
    fn clockwise_triangle_still_has_positive_interior() {
        let mut mesh = Mesh::new();
        let path = PathBuilder::new()
            .move_to(c(0, 0))
            .line_to(c(50, 100))
            .line_to(c(100, 0))
            .close();
        let report = mesh.insert_path(path.commands()).unwrap();
        assert_eq!(report.faces_created.len(), 1);
        let contours = mesh.face_contours(report.faces_created[0]).unwrap();
        assert!(contours[0].signed_area(&mesh).unwrap() > 0.0);
        let outer = mesh.face_contours(mesh.outer_face()).unwrap();
        assert!(outer[0].signed_area(&mesh).unwrap() < 0.0);
        mesh.validate().unwrap();
    }

    #[test]
    fn crossing_x() {
        init_tracing();
        let mut mesh = Mesh::new();
        mesh.insert_curve(Curve::line(c(0, 0), c(100, 100))).unwrap();
        let report = mesh.insert_curve(Curve::line(c(0, 100), c(100, 0))).unwrap();
        assert_eq!(mesh.vertex_count(), 5);
        assert_eq!(mesh.edge_count(), 4);
        assert_eq!(mesh.face_count(), 1);
        assert_eq!(report.added_edges().len(), 2);
        assert_eq!(report.split_edges().len(), 2);
        assert!(mesh.vertex_at(c(50, 50)).is_some());
        mesh.validate().unwrap();
    }

    #[test]
    fn crossing_squares_make_three_faces() {
        let mut mesh = Mesh::new();
        for (x, y) in [(0, 0), (50, 50)] {
            let path = PathBuilder::new()
                .move_to(c(x, y))
                .line_to(c(x + 100, y))
                .line_to(c(x + 100, y + 100))
                .line_to(c(x, y + 100))
                .close();
            mesh.insert_path(path.commands()).unwrap();
        }
        // Two squares overlapping in a quarter: three bounded regions.
        assert_eq!(mesh.face_count(), 4);
        assert_eq!(mesh.vertex_count(), 10);
        assert_eq!(mesh.edge_count(), 12);
        mesh.validate().unwrap();
        let overlap = mesh.face_at_point(&Point2::new(75.0, 75.0)).unwrap();
        let contours = mesh.face_contours(overlap).unwrap();
        assert!((contours[0].signed_area(&mesh).unwrap() - 2500.0).abs() < 1e-6);
    }

    #[test]
    fn edge_conservation_over_many_inserts() {
        let mut mesh = Mesh::new();
        let curves = [
            Curve::line(c(0, 0), c(400, 0)),
            Curve::line(c(400, 0), c(400, 400)),
            Curve::quadratic(c(400, 400), c(200, 600), c(0, 400)),
            Curve::line(c(0, 400), c(0, 0)),
            Curve::line(c(-50, 200), c(450, 200)),
            Curve::cubic(c(200, -100), c(600, 300), c(-200, 300), c(200, 700)),
        ];
        for curve in curves {
            mesh.insert_curve(curve).unwrap();
            assert_eq!(mesh.attachment_count(), 2 * mesh.edge_count());
            mesh.validate().unwrap();
        }
    }

    #[test]
    fn island_moves_into_enclosing_face() {
        let mut mesh = Mesh::new();
        // The island first, then the square around it.
        mesh.insert_curve(Curve::line(c(40, 50), c(60, 50))).unwrap();
        let path = PathBuilder::new()
            .move_to(c(0, 0))
            .line_to(c(100, 0))
            .line_to(c(100, 100))
            .line_to(c(0, 100))
            .close();
        let report = mesh.insert_path(path.commands()).unwrap();
        let inner = report.faces_created[0];
        let island = mesh.vertex_at(c(40, 50)).unwrap();
        let island_edge = mesh.vertex(island).unwrap().outgoing[0];
        let data = mesh.edge(island_edge).unwrap();
        assert_eq!(data.face_left, inner);
        assert_eq!(data.face_right, inner);
        mesh.validate().unwrap();
    }

    #[test]
    fn isolated_edge_inside_a_face() {
        let mut mesh = Mesh::new();
        let path = PathBuilder::new()
            .move_to(c(0, 0))
            .line_to(c(100, 0))
            .line_to(c(100, 100))
            .line_to(c(0, 100))
            .close();
        let report = mesh.insert_path(path.commands()).unwrap();
        let inner = report.faces_created[0];
        let added = mesh.insert_curve(Curve::line(c(40, 50), c(60, 50))).unwrap();
        let data = mesh.edge(added.added_edges()[0]).unwrap();
        assert_eq!(data.face_left, inner);
        assert_eq!(data.face_right, inner);
    }

    #[test]
    fn dangling_edge_takes_the_wedge_face() {
        let mut mesh = Mesh::new();
        let path = PathBuilder::new()
            .move_to(c(0, 0))
            .line_to(c(100, 0))
            .line_to(c(100, 100))
            .line_to(c(0, 100))
            .close();
        let inner = mesh.insert_path(path.commands()).unwrap().faces_created[0];
        let inside = mesh.insert_curve(Curve::line(c(0, 0), c(30, 30))).unwrap();
        let outside = mesh.insert_curve(Curve::line(c(100, 100), c(130, 130))).unwrap();
        assert_eq!(mesh.edge(inside.added_edges()[0]).unwrap().face_left, inner);
        assert_eq!(
            mesh.edge(outside.added_edges()[0]).unwrap().face_left,
            mesh.outer_face()
        );
        mesh.validate().unwrap();
    }

    #[test]
    fn diagonal_splits_a_square() {
        let mut mesh = Mesh::new();
        let path = PathBuilder::new()
            .move_to(c(0, 0))
            .line_to(c(100, 0))
            .line_to(c(100, 100))
            .line_to(c(0, 100))
            .close();
        mesh.insert_path(path.commands()).unwrap();
        let report = mesh.insert_curve(Curve::line(c(0, 0), c(100, 100))).unwrap();
        assert_eq!(report.faces_created.len(), 1);
        assert_eq!(mesh.face_count(), 3);
        let below = mesh.face_at_point(&Point2::new(70.0, 20.0)).unwrap();
        let above = mesh.face_at_point(&Point2::new(20.0, 70.0)).unwrap();
        assert_ne!(below, above);
        assert_ne!(below, mesh.outer_face());
        assert_ne!(above, mesh.outer_face());
        mesh.validate().unwrap();
    }

    #[test]
    fn curve_crossing_curve() {
        let mut mesh = Mesh::new();
        mesh.insert_curve(Curve::cubic(c(0, 0), c(0, 1000), c(1000, 1000), c(1000, 0)))
            .unwrap();
        let report = mesh
            .insert_curve(Curve::cubic(c(0, 750), c(0, -250), c(1000, -250), c(1000, 750)))
            .unwrap();
        assert_eq!(report.added_edges().len(), 3);
        assert_eq!(report.split_edges().len(), 3);
        assert_eq!(mesh.edge_count(), 6);
        // The lens between the two arches.
        assert_eq!(report.faces_created.len(), 1);
        mesh.validate().unwrap();
    }

    #[test]
    fn closed_curve_is_bisected() {
        let mut mesh = Mesh::new();
        let report = mesh
            .insert_curve(Curve::cubic(c(0, 0), c(-500, 800), c(500, 800), c(0, 0)))
            .unwrap();
        assert_eq!(mesh.edge_count(), 2);
        assert_eq!(mesh.vertex_count(), 2);
        assert_eq!(report.faces_created.len(), 1);
        mesh.validate().unwrap();
    }

    #[test]
    fn self_intersecting_curve_makes_a_loop_face() {
        let mut mesh = Mesh::new();
        let report = mesh
            .insert_curve(Curve::cubic(c(0, 0), c(1500, 1000), c(-500, 1000), c(1000, 0)))
            .unwrap();
        // Head, two halves of the loop, tail.
        assert_eq!(mesh.edge_count(), 4);
        assert_eq!(report.faces_created.len(), 1);
        mesh.validate().unwrap();
    }

    #[test]
    fn point_curves_are_ignored() {
        let mut mesh = Mesh::new();
        let report = mesh.insert_curve(Curve::Point(c(5, 5))).unwrap();
        assert!(report.events.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
    }

    #[test]
    fn duplicate_insert_is_ignored() {
        let mut mesh = Mesh::new();
        mesh.insert_curve(Curve::line(c(0, 0), c(100, 0))).unwrap();
        let report = mesh.insert_curve(Curve::line(c(100, 0), c(0, 0))).unwrap();
        assert!(report.added_edges().is_empty());
        assert_eq!(mesh.edge_count(), 1);
    }

    #[test]
    fn aux_data_propagates_to_pieces_and_faces() {
        let mut mesh = Mesh::new();
        let mut aux = AuxData::new();
        aux.insert(Stroke(7));
        let first = mesh
            .insert_curve_with_aux(Curve::line(c(0, 0), c(100, 100)), &aux)
            .unwrap();
        let report = mesh.insert_curve(Curve::line(c(0, 100), c(100, 0))).unwrap();
        for (piece, from) in report.split_edges() {
            assert_eq!(from, first.added_edges()[0]);
            assert_eq!(mesh.edge(piece).unwrap().aux.get::<Stroke>(), Some(&Stroke(7)));
        }
        for edge in report.added_edges() {
            assert!(mesh.edge(edge).unwrap().aux.is_empty());
        }

        // Face data is copied onto faces carved out of it.
        let outer = mesh.outer_face();
        mesh.face_aux_mut(outer).unwrap().insert(Stroke(1));
        let path = PathBuilder::new()
            .move_to(c(200, 0))
            .line_to(c(300, 0))
            .line_to(c(250, 100))
            .close();
        let carved = mesh.insert_path(path.commands()).unwrap();
        let face = mesh.face(carved.faces_created[0]).unwrap();
        assert_eq!(face.aux.get::<Stroke>(), Some(&Stroke(1)));
    }

    #[test]
    fn added_events_carry_provenance() {
        let mut mesh = Mesh::new();
        mesh.insert_curve(Curve::line(c(50, -50), c(50, 50))).unwrap();
        let report = mesh.insert_curve(Curve::line(c(0, 0), c(100, 0))).unwrap();
        let spans: Vec<(f64, f64)> = report
            .events
            .iter()
            .filter_map(|e| match e {
                EdgeEvent::Added { offset, span, .. } => Some((*offset, *span)),
                EdgeEvent::Split { .. } => None,
            })
            .collect();
        assert_eq!(spans.len(), 2);
        assert!((spans[0].0).abs() < 1e-9);
        assert!((spans[0].1 - 0.5).abs() < 1e-9);
        assert!((spans[1].0 - 0.5).abs() < 1e-9);
    }

    #[test]
    fn near_concurrent_crossings_keep_one_edge_per_shape() {
        let mut mesh = Mesh::new();
        mesh.insert_curve(Curve::line(c(0, 0), c(1000, 10))).unwrap();
        mesh.insert_curve(Curve::line(c(0, 10), c(1000, 0))).unwrap();
        // Crosses both lines less than a grid unit apart, so both snap to
        // (480, 5) and run on to their own crossing at (500, 5).
        mesh.insert_curve(Curve::line(c(480, -100), c(480, 100))).unwrap();

        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.edge_count(), 7);
        assert_eq!(mesh.face_count(), 1);
        let joint = mesh.vertex_at(c(480, 5)).unwrap();
        let shared = mesh.vertex_at(c(500, 5)).unwrap();
        let between = mesh
            .edges()
            .filter(|(_, e)| {
                (e.start == joint && e.end == shared) || (e.start == shared && e.end == joint)
            })
            .count();
        assert_eq!(between, 1);
        mesh.validate().unwrap();
    }

    #[test]
    fn endpoint_on_a_curve_splits_it() {
        let mut mesh = Mesh::new();
        // The point at t = 0.1 is exactly (20, 36).
        mesh.insert_curve(Curve::quadratic(c(0, 0), c(100, 200), c(200, 0)))
            .unwrap();
        let report = mesh.insert_curve(Curve::line(c(20, 100), c(20, 36))).unwrap();
        assert_eq!(report.split_edges().len(), 2);
        assert_eq!(mesh.edge_count(), 3);
        let junction = mesh.vertex_at(c(20, 36)).unwrap();
        assert_eq!(mesh.vertex(junction).unwrap().degree(), 3);

        let closing = mesh.insert_curve(Curve::line(c(0, 0), c(20, 100))).unwrap();
        assert_eq!(closing.faces_created.len(), 1);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.edge_count(), 4);
        assert_eq!(mesh.face_count(), 2);
        let contours = mesh.face_contours(closing.faces_created[0]).unwrap();
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].edges.len(), 3);
        mesh.validate().unwrap();
    }
}
