use tracing::trace;

use crate::error::{GeometryError, Result};
use crate::geometry::{Coord, Curve, Polyline};
use crate::math::fit::fit_bezier_interior;
use crate::math::intersect_2d::segment_segment_intersect_2d;
use crate::math::polygon_2d::left_normal;
use crate::math::{Point2, Vector2, TOLERANCE};
use crate::operations::split::SplitConfig;

/// Offsets a 2D curve sideways by a weight interpolated along it.
///
/// Positive weights move the curve to its left relative to the direction
/// of travel, negative weights to its right. The result is a single curve
/// of the same degree, fitted through offset samples of the flattened
/// input.
#[derive(Debug, Clone)]
pub struct CurveOffset2D {
    curve: Curve,
    start_offset: f64,
    end_offset: f64,
    config: SplitConfig,
}

impl CurveOffset2D {
    /// Creates a new `CurveOffset2D` operation.
    #[must_use]
    pub fn new(curve: Curve, start_offset: f64, end_offset: f64) -> Self {
        Self {
            curve,
            start_offset,
            end_offset,
            config: SplitConfig::default(),
        }
    }

    /// Uses `config` for flattening the input.
    #[must_use]
    pub fn with_config(mut self, config: SplitConfig) -> Self {
        self.config = config;
        self
    }

    /// Executes the offset.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` if the curve is a single point.
    pub fn execute(&self) -> Result<Curve> {
        if self.curve.is_degenerate() {
            return Err(GeometryError::Degenerate("cannot offset a point".into()).into());
        }
        let poly = self.config.flatten(&self.curve);
        let mut samples = self.offset_samples(&poly);
        collapse_overlaps(&mut samples);
        let coords: Vec<Coord> = self.fit(&samples).iter().map(Coord::from_point).collect();
        Curve::from_control_points(&coords)
    }

    fn weight_at(&self, t: f64) -> f64 {
        self.start_offset + (self.end_offset - self.start_offset) * t
    }

    fn normal_at(&self, t: f64) -> Option<Vector2> {
        self.curve
            .derivative_at(t)
            .try_normalize(TOLERANCE)
            .map(left_normal)
    }

    /// Every polyline sample moved along the curve normal at its parameter.
    ///
    /// Where the derivative vanishes (a cusp, or a handle on an endpoint)
    /// the normal of the chord through the neighbouring samples is used.
    fn offset_samples(&self, poly: &Polyline) -> Vec<(f64, Point2)> {
        let samples = poly.samples();
        let last = samples.len().saturating_sub(1);
        samples
            .iter()
            .enumerate()
            .map(|(i, sample)| {
                let normal = self.normal_at(sample.t).unwrap_or_else(|| {
                    chord_normal(&samples[i.saturating_sub(1)].point, &samples[(i + 1).min(last)].point)
                });
                (sample.t, sample.point + normal * self.weight_at(sample.t))
            })
            .collect()
    }

    /// Control points of the offset curve: endpoints pinned to the first and
    /// last offset sample, interior points by least squares.
    fn fit(&self, samples: &[(f64, Point2)]) -> Vec<Point2> {
        let degree = self.curve.degree();
        let (Some(first), Some(last)) = (samples.first(), samples.last()) else {
            return self.translated_hull();
        };
        let interior = samples.get(1..samples.len() - 1).unwrap_or(&[]);
        if let Some(inner) = fit_bezier_interior(degree, &first.1, &last.1, interior) {
            let mut points = Vec::with_capacity(degree + 1);
            points.push(first.1);
            points.extend(inner);
            points.push(last.1);
            return points;
        }
        let mut hull = self.translated_hull();
        hull[0] = first.1;
        hull[degree] = last.1;
        hull
    }

    /// The control polygon moved along the normal at each control point's
    /// nominal parameter `k / degree`.
    fn translated_hull(&self) -> Vec<Point2> {
        let points = self.curve.float_control_points();
        let degree = self.curve.degree().max(1);
        let fallback = chord_normal(&points[0], &points[points.len() - 1]);
        points
            .iter()
            .enumerate()
            .map(|(k, p)| {
                #[allow(clippy::cast_precision_loss)]
                let t = k as f64 / degree as f64;
                p + self.normal_at(t).unwrap_or(fallback) * self.weight_at(t)
            })
            .collect()
    }
}

fn chord_normal(from: &Point2, to: &Point2) -> Vector2 {
    (to - from)
        .try_normalize(TOLERANCE)
        .map_or_else(Vector2::zeros, left_normal)
}

/// Removes the loops that appear where the offset of a tight bend crosses
/// itself. Each crossed run of samples is replaced by the crossing point,
/// carrying the parameter midway along the run.
fn collapse_overlaps(samples: &mut Vec<(f64, Point2)>) {
    let mut i = 0;
    while i + 3 < samples.len() {
        let (a0, a1) = (samples[i].1, samples[i + 1].1);
        let hit = (i + 2..samples.len() - 1).find_map(|j| {
            segment_segment_intersect_2d(&a0, &a1, &samples[j].1, &samples[j + 1].1)
                .map(|(point, _, _)| (j, point))
        });
        if let Some((j, point)) = hit {
            let t = f64::midpoint(samples[i + 1].0, samples[j].0);
            trace!(from = i + 1, to = j, "collapsed overlapping offset run");
            samples.splice(i + 1..=j, std::iter::once((t, point)));
        }
        i += 1;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn c(x: i32, y: i32) -> Coord {
        Coord::new(x, y)
    }

    #[test]
    fn line_moves_to_its_left() {
        let line = Curve::line(c(0, 0), c(1000, 0));
        let left = CurveOffset2D::new(line.clone(), 100.0, 100.0).execute().unwrap();
        assert_eq!(left, Curve::line(c(0, 100), c(1000, 100)));
        let right = CurveOffset2D::new(line, -100.0, -100.0).execute().unwrap();
        assert_eq!(right, Curve::line(c(0, -100), c(1000, -100)));
    }

    #[test]
    fn weights_taper_along_the_curve() {
        let line = Curve::line(c(0, 0), c(1000, 0));
        let tapered = CurveOffset2D::new(line, 0.0, 200.0).execute().unwrap();
        assert_eq!(tapered, Curve::line(c(0, 0), c(1000, 200)));
    }

    #[test]
    fn arch_offset_keeps_degree_and_distance() {
        let arch = Curve::quadratic(c(0, 0), c(500, 1000), c(1000, 0));
        let offset = CurveOffset2D::new(arch, 50.0, 50.0).execute().unwrap();
        assert_eq!(offset.degree(), 2);
        // Start normal is the left normal of (500, 1000).
        assert_eq!(offset.start(), c(-45, 22));
        assert_eq!(offset.end(), c(1045, 22));
        let apex = offset.evaluate(0.5);
        assert!((apex - Point2::new(500.0, 550.0)).norm() < 10.0);
    }

    #[test]
    fn point_cannot_be_offset() {
        let point = Curve::Point(c(5, 5));
        assert!(CurveOffset2D::new(point, 10.0, 10.0).execute().is_err());
    }

    #[test]
    fn crossed_run_collapses_to_the_crossing() {
        let mut samples = vec![
            (0.0, Point2::new(0.0, 0.0)),
            (0.25, Point2::new(10.0, 0.0)),
            (0.5, Point2::new(8.0, 5.0)),
            (0.75, Point2::new(6.0, -5.0)),
            (1.0, Point2::new(20.0, -5.0)),
        ];
        collapse_overlaps(&mut samples);
        assert_eq!(samples.len(), 4);
        assert_relative_eq!(samples[1].1.x, 7.0, epsilon = 1e-9);
        assert_relative_eq!(samples[1].1.y, 0.0, epsilon = 1e-9);
        assert_relative_eq!(samples[1].0, 0.375);
    }

    #[test]
    fn inner_offset_of_tight_bend_is_a_single_curve() {
        let bend = Curve::cubic(c(0, 0), c(1000, 0), c(1000, 100), c(0, 100));
        let inner = CurveOffset2D::new(bend, 150.0, 150.0).execute().unwrap();
        assert_eq!(inner.degree(), 3);
        assert_eq!(inner.start(), c(0, 150));
        assert_eq!(inner.end(), c(0, -50));
    }
}
