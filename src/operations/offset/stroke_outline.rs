use std::f64::consts::FRAC_PI_2;

use tracing::debug;

use crate::error::{OperationError, Result};
use crate::geometry::{commands_from_curves, Coord, Curve, PathCommand};
use crate::math::intersect_2d::line_line_intersect_2d;
use crate::math::{cross_2d, Point2, Vector2, TOLERANCE};
use crate::operations::split::SplitConfig;

use super::curve_offset_2d::CurveOffset2D;
use super::stroke_style::{LineCap, LineJoin, StrokeStyle};

/// Cosine below which two tangents count as doubling back on each other.
/// Such joins are bridged by a single line whatever the join policy.
const DOUBLING_BACK_COS: f64 = -0.99;

/// The closed loops bounding a stroked path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outline {
    /// Each loop is a chain of curves ending where it starts.
    pub loops: Vec<Vec<Curve>>,
}

impl Outline {
    /// Every curve of every loop.
    pub fn curves(&self) -> impl Iterator<Item = &Curve> {
        self.loops.iter().flatten()
    }

    /// The loops as path commands, each closed with `ClosePath`.
    #[must_use]
    pub fn to_commands(&self) -> Vec<PathCommand> {
        self.loops
            .iter()
            .flat_map(|curves| commands_from_curves(curves, true))
            .collect()
    }
}

/// One offset side of a path, from `start` to `end`.
struct Side {
    curves: Vec<Curve>,
    start: Coord,
    end: Coord,
}

/// Builds the outline of a stroked path of connected curves.
///
/// An open path yields one loop: the left offsets with their joins, the end
/// cap, the right offsets walked backward, and the start cap. A closed path
/// yields two loops, one per side. Joins are decorated on the outer side of
/// each turn only; the inner side is bridged by a line.
#[derive(Debug)]
pub struct StrokeOutline2D {
    curves: Vec<Curve>,
    style: StrokeStyle,
    closed: bool,
    config: SplitConfig,
}

impl StrokeOutline2D {
    /// Creates a new stroke outline operation.
    #[must_use]
    pub fn new(curves: Vec<Curve>, style: StrokeStyle, closed: bool) -> Self {
        Self {
            curves,
            style,
            closed,
            config: SplitConfig::default(),
        }
    }

    /// Uses `config` for flattening while offsetting.
    #[must_use]
    pub fn with_config(mut self, config: SplitConfig) -> Self {
        self.config = config;
        self
    }

    /// Executes the operation.
    ///
    /// Point curves in the path are skipped.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if the path has no extent, if
    /// consecutive curves do not meet, or if a closed path does not end
    /// where it starts.
    pub fn execute(&self) -> Result<Outline> {
        let path: Vec<Curve> = self
            .curves
            .iter()
            .filter(|c| !c.is_degenerate())
            .cloned()
            .collect();
        let (Some(first), Some(last)) = (path.first(), path.last()) else {
            return Err(OperationError::InvalidInput("stroke path has no extent".into()).into());
        };
        if let Some(gap) = path.windows(2).find(|pair| pair[0].end() != pair[1].start()) {
            let at = gap[0].end();
            return Err(OperationError::InvalidInput(format!(
                "stroke path breaks at ({}, {})",
                at.x, at.y
            ))
            .into());
        }
        if self.closed && first.start() != last.end() {
            return Err(OperationError::InvalidInput(
                "closed stroke path does not end where it starts".into(),
            )
            .into());
        }

        let reversed: Vec<Curve> = path.iter().rev().map(Curve::reverse).collect();
        let left = self.side(&path)?;
        let right = self.side(&reversed)?;

        let loops = if self.closed {
            vec![left.curves, right.curves]
        } else {
            let mut outline = left.curves;
            self.cap(&mut outline, last.end(), last.end_direction(), left.end, right.start);
            outline.extend(right.curves);
            let outward = first.start_direction().map(|d| -d);
            self.cap(&mut outline, first.start(), outward, right.end, left.start);
            vec![outline]
        };
        debug!(
            loops = loops.len(),
            curves = loops.iter().map(Vec::len).sum::<usize>(),
            "built stroke outline"
        );
        Ok(Outline { loops })
    }

    /// The offsets of `path` on its left, connected by joins. On a closed
    /// path the last offset is joined back to the first.
    fn side(&self, path: &[Curve]) -> Result<Side> {
        let half = self.style.half_width();
        let offsets = path
            .iter()
            .map(|c| {
                CurveOffset2D::new(c.clone(), half, half)
                    .with_config(self.config)
                    .execute()
            })
            .collect::<Result<Vec<_>>>()?;
        let starts: Vec<Coord> = offsets.iter().map(Curve::start).collect();
        let start = starts[0];
        let mut end = start;
        let mut curves = Vec::with_capacity(offsets.len() * 2);
        let count = offsets.len();
        for (i, offset) in offsets.into_iter().enumerate() {
            end = offset.end();
            if !offset.is_degenerate() {
                curves.push(offset);
            }
            let next = if i + 1 < count {
                i + 1
            } else if self.closed {
                0
            } else {
                break;
            };
            self.join(&mut curves, &path[i], &path[next], end, starts[next]);
            end = starts[next];
        }
        Ok(Side { curves, start, end })
    }

    /// Connects the left offsets of `incoming` and `outgoing` from `from`
    /// to `to`.
    fn join(&self, out: &mut Vec<Curve>, incoming: &Curve, outgoing: &Curve, from: Coord, to: Coord) {
        if from == to {
            return;
        }
        let d_in = incoming.end_direction().and_then(|d| d.try_normalize(TOLERANCE));
        let d_out = outgoing.start_direction().and_then(|d| d.try_normalize(TOLERANCE));
        let (Some(d_in), Some(d_out)) = (d_in, d_out) else {
            push_line(out, from, to);
            return;
        };
        // The left side is outside of the turn only when turning right.
        if cross_2d(&d_in, &d_out) >= 0.0 || d_in.dot(&d_out) < DOUBLING_BACK_COS {
            push_line(out, from, to);
            return;
        }
        let center = incoming.end().to_point();
        match self.style.join() {
            LineJoin::Bevel => push_line(out, from, to),
            LineJoin::Round => push_arc(out, center, from, to),
            LineJoin::Miter { limit } => {
                let a = from.to_point();
                let b = to.to_point();
                let reach = limit * self.style.half_width();
                let miter = line_line_intersect_2d(&a, &d_in, &b, &d_out)
                    .filter(|(s, _)| *s >= 0.0)
                    .map(|(s, _)| a + d_in * s)
                    .filter(|m| (m - center).norm() <= reach);
                if let Some(m) = miter {
                    let m = Coord::from_point(&m);
                    push_line(out, from, m);
                    push_line(out, m, to);
                } else {
                    push_line(out, from, to);
                }
            }
        }
    }

    /// Closes a path end at `end` from `from` on one side to `to` on the
    /// other. `outward` points away from the path.
    fn cap(&self, out: &mut Vec<Curve>, end: Coord, outward: Option<Vector2>, from: Coord, to: Coord) {
        if from == to {
            return;
        }
        let Some(dir) = outward.and_then(|d| d.try_normalize(TOLERANCE)) else {
            push_line(out, from, to);
            return;
        };
        let center = end.to_point();
        let reach = dir * self.style.half_width();
        match self.style.cap() {
            LineCap::Butt => push_line(out, from, to),
            LineCap::Square => {
                let a = Coord::from_point(&(from.to_point() + reach));
                let b = Coord::from_point(&(to.to_point() + reach));
                push_line(out, from, a);
                push_line(out, a, b);
                push_line(out, b, to);
            }
            LineCap::Round => {
                let tip = Coord::from_point(&(center + reach));
                push_arc(out, center, from, tip);
                push_arc(out, center, tip, to);
            }
        }
    }
}

fn push_line(out: &mut Vec<Curve>, from: Coord, to: Coord) {
    if from != to {
        out.push(Curve::line(from, to));
    }
}

/// Appends cubic arcs around `center` from `from` to `to`, turning by the
/// signed angle between them, a quarter turn at most per cubic.
fn push_arc(out: &mut Vec<Curve>, center: Point2, from: Coord, to: Coord) {
    let u0 = from.to_point() - center;
    let u1 = to.to_point() - center;
    let radius = u0.norm();
    let sweep = cross_2d(&u0, &u1).atan2(u0.dot(&u1));
    if radius < TOLERANCE || sweep.abs() < TOLERANCE {
        push_line(out, from, to);
        return;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let pieces = (sweep.abs() / FRAC_PI_2 - 1e-9).ceil().max(1.0) as u32;
    let step = sweep / f64::from(pieces);
    let handle = 4.0 / 3.0 * (step / 4.0).tan() * radius;
    let on_circle = |angle: f64| center + Vector2::new(angle.cos(), angle.sin()) * radius;
    let tangent = |angle: f64| Vector2::new(-angle.sin(), angle.cos());

    let first_angle = u0.y.atan2(u0.x);
    let mut current = from;
    for i in 0..pieces {
        let a0 = first_angle + step * f64::from(i);
        let a1 = a0 + step;
        let end = if i + 1 == pieces {
            to
        } else {
            Coord::from_point(&on_circle(a1))
        };
        let c0 = on_circle(a0) + tangent(a0) * handle;
        let c1 = on_circle(a1) - tangent(a1) * handle;
        let arc = Curve::cubic(current, Coord::from_point(&c0), Coord::from_point(&c1), end);
        if !arc.is_degenerate() {
            out.push(arc);
        }
        current = end;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::topology::Mesh;

    fn c(x: i32, y: i32) -> Coord {
        Coord::new(x, y)
    }

    fn assert_chained(outline: &Outline) {
        for curves in &outline.loops {
            for pair in curves.windows(2) {
                assert_eq!(pair[0].end(), pair[1].start());
            }
            assert_eq!(curves[curves.len() - 1].end(), curves[0].start());
        }
    }

    fn stroke(curves: Vec<Curve>, style: StrokeStyle, closed: bool) -> Outline {
        let outline = StrokeOutline2D::new(curves, style, closed).execute().unwrap();
        assert_chained(&outline);
        outline
    }

    fn corner() -> Vec<Curve> {
        vec![
            Curve::line(c(0, 0), c(1000, 0)),
            Curve::line(c(1000, 0), c(1000, 1000)),
        ]
    }

    fn endpoints(outline: &Outline) -> Vec<Coord> {
        outline.curves().map(Curve::end).collect()
    }

    #[test]
    fn butt_stroke_of_a_line_is_a_rectangle() {
        let style = StrokeStyle::new(200.0).unwrap();
        let outline = stroke(vec![Curve::line(c(0, 0), c(1000, 0))], style, false);
        assert_eq!(
            outline.loops,
            vec![vec![
                Curve::line(c(0, 100), c(1000, 100)),
                Curve::line(c(1000, 100), c(1000, -100)),
                Curve::line(c(1000, -100), c(0, -100)),
                Curve::line(c(0, -100), c(0, 100)),
            ]]
        );

        let mut mesh = Mesh::new();
        let report = mesh.insert_path(&outline.to_commands()).unwrap();
        assert_eq!(report.faces_created.len(), 1);
        let contour = &mesh.face_contours(report.faces_created[0]).unwrap()[0];
        assert!((contour.signed_area(&mesh).unwrap() - 200_000.0).abs() < 1e-6);
    }

    #[test]
    fn square_caps_extend_past_the_ends() {
        let style = StrokeStyle::new(200.0).unwrap().with_cap(LineCap::Square);
        let outline = stroke(vec![Curve::line(c(0, 0), c(1000, 0))], style, false);
        assert_eq!(outline.curves().count(), 8);
        let xs: Vec<i32> = endpoints(&outline).iter().map(|p| p.x).collect();
        assert_eq!(xs.iter().min(), Some(&-100));
        assert_eq!(xs.iter().max(), Some(&1100));
    }

    #[test]
    fn round_caps_pass_through_the_tip() {
        let style = StrokeStyle::new(200.0).unwrap().with_cap(LineCap::Round);
        let outline = stroke(vec![Curve::line(c(0, 0), c(1000, 0))], style, false);
        let curves: Vec<&Curve> = outline.curves().collect();
        assert_eq!(curves.len(), 6);
        assert_eq!(curves[1].degree(), 3);
        assert_eq!(curves[1].end(), c(1100, 0));
        assert_eq!(curves[4].end(), c(-100, 0));
    }

    #[test]
    fn miter_join_meets_at_the_corner() {
        let style = StrokeStyle::new(200.0).unwrap();
        let outline = stroke(corner(), style, false);
        assert!(endpoints(&outline).contains(&c(1100, -100)));

        let tight = style.with_join(LineJoin::Miter { limit: 1.0 }).unwrap();
        let outline = stroke(corner(), tight, false);
        assert!(!endpoints(&outline).contains(&c(1100, -100)));
    }

    #[test]
    fn bevel_join_cuts_the_corner() {
        let style = StrokeStyle::new(200.0).unwrap().with_join(LineJoin::Bevel).unwrap();
        let outline = stroke(corner(), style, false);
        assert!(outline.curves().any(|curve| *curve == Curve::line(c(1100, 0), c(1000, -100))));
    }

    #[test]
    fn round_join_is_an_arc() {
        let style = StrokeStyle::new(200.0).unwrap().with_join(LineJoin::Round).unwrap();
        let outline = stroke(corner(), style, false);
        let arc = outline
            .curves()
            .find(|curve| curve.start() == c(1100, 0) && curve.end() == c(1000, -100))
            .unwrap();
        assert_eq!(arc.degree(), 3);
        let radius = (arc.evaluate(0.5) - Point2::new(1000.0, 0.0)).norm();
        assert!((radius - 100.0).abs() < 1.5);
    }

    #[test]
    fn doubling_back_is_bridged_by_a_line() {
        let style = StrokeStyle::new(200.0).unwrap().with_join(LineJoin::Round).unwrap();
        let path = vec![
            Curve::line(c(0, 0), c(1000, 0)),
            Curve::line(c(1000, 0), c(0, 0)),
        ];
        let outline = stroke(path, style, false);
        assert_eq!(outline.curves().count(), 8);
        assert!(outline.curves().all(|curve| curve.degree() == 1));
        assert!(outline.curves().any(|curve| *curve == Curve::line(c(1000, 100), c(1000, -100))));
    }

    #[test]
    fn closed_path_has_two_loops() {
        let style = StrokeStyle::new(200.0).unwrap();
        let square = vec![
            Curve::line(c(0, 0), c(1000, 0)),
            Curve::line(c(1000, 0), c(1000, 1000)),
            Curve::line(c(1000, 1000), c(0, 1000)),
            Curve::line(c(0, 1000), c(0, 0)),
        ];
        let outline = stroke(square, style, true);
        assert_eq!(outline.loops.len(), 2);
        let outer: Vec<Coord> = outline.loops[1].iter().map(Curve::end).collect();
        for corner in [c(1100, -100), c(1100, 1100), c(-100, 1100), c(-100, -100)] {
            assert!(outer.contains(&corner));
        }
    }

    #[test]
    fn curved_path_strokes() {
        let style = StrokeStyle::new(100.0).unwrap().with_cap(LineCap::Round);
        let arch = Curve::quadratic(c(0, 0), c(500, 1000), c(1000, 0));
        let outline = stroke(vec![arch], style, false);
        assert!(outline.curves().any(|curve| curve.degree() == 2));
    }

    #[test]
    fn invalid_paths_are_rejected() {
        let style = StrokeStyle::new(10.0).unwrap();
        assert!(StrokeOutline2D::new(Vec::new(), style, false).execute().is_err());
        assert!(StrokeOutline2D::new(vec![Curve::Point(c(1, 1))], style, false)
            .execute()
            .is_err());
        let broken = vec![
            Curve::line(c(0, 0), c(100, 0)),
            Curve::line(c(200, 0), c(300, 0)),
        ];
        assert!(StrokeOutline2D::new(broken, style, false).execute().is_err());
        let open = vec![Curve::line(c(0, 0), c(100, 0))];
        assert!(StrokeOutline2D::new(open, style, true).execute().is_err());
    }
}
