use crate::error::{OperationError, Result};
use crate::math::distance_2d::project_onto_segment;
use crate::math::intersect_2d::segment_segment_intersect_2d;
use crate::math::{Point2, TOLERANCE};

use super::curve::casteljau;
use super::Curve;

/// Default recursion limit for flattening.
pub const DEFAULT_MAX_DEPTH: u32 = 16;

/// Parameters within this distance of a segment end count as that end.
const END_EPS: f64 = 1e-9;

/// A point on a flattened curve together with its curve parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolylineSample {
    /// Position in grid units.
    pub point: Point2,
    /// Parameter on the source curve.
    pub t: f64,
}

/// Result of a closest point query against a polyline.
#[derive(Debug, Clone, Copy)]
pub struct PolylineClosest {
    /// Distance from the query point.
    pub distance: f64,
    /// Interpolated curve parameter at the closest point.
    pub t: f64,
    /// The closest point itself.
    pub point: Point2,
}

/// A crossing between two polylines (or two segments of the same one).
#[derive(Debug, Clone, Copy)]
pub struct PolylineIntersection {
    /// Curve parameter on the first polyline.
    pub t_self: f64,
    /// Curve parameter on the second polyline.
    pub t_other: f64,
    /// Where the segments cross.
    pub point: Point2,
}

/// A parametrized polyline approximating a curve over `t` in `[0, 1]`.
///
/// The first and last samples are always the exact endpoints of the source
/// curve at `t = 0` and `t = 1`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polyline {
    samples: Vec<PolylineSample>,
}

impl Polyline {
    /// Flattens `curve` by recursive bisection until the control hull of each
    /// piece is flatter than `tolerance` (squared grid units).
    #[must_use]
    pub fn flatten(curve: &Curve, tolerance: f64) -> Self {
        Self::flatten_with_depth(curve, tolerance, DEFAULT_MAX_DEPTH)
    }

    /// Flattens `curve` with an explicit recursion limit.
    #[must_use]
    pub fn flatten_with_depth(curve: &Curve, tolerance: f64, max_depth: u32) -> Self {
        let controls = curve.float_control_points();
        let mut samples = vec![PolylineSample {
            point: curve.start().to_point(),
            t: 0.0,
        }];
        if controls.len() > 1 {
            flatten_recursive(&controls, 0.0, 1.0, tolerance, max_depth, &mut samples);
        } else {
            samples.push(PolylineSample {
                point: curve.end().to_point(),
                t: 1.0,
            });
        }
        // Pin the tail to the exact end coordinate.
        if let Some(last) = samples.last_mut() {
            last.point = curve.end().to_point();
            last.t = 1.0;
        }
        Self { samples }
    }

    /// Builds a polyline from explicit samples.
    #[must_use]
    pub fn from_samples(samples: Vec<PolylineSample>) -> Self {
        Self { samples }
    }

    /// The samples in order.
    #[must_use]
    pub fn samples(&self) -> &[PolylineSample] {
        &self.samples
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the polyline has no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of segments between consecutive samples.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.samples.len().saturating_sub(1)
    }

    /// The sample positions.
    #[must_use]
    pub fn points(&self) -> Vec<Point2> {
        self.samples.iter().map(|s| s.point).collect()
    }

    /// Total chord length.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.samples
            .windows(2)
            .map(|w| (w[1].point - w[0].point).norm())
            .sum()
    }

    /// Appends `other`, whose first sample must coincide with this polyline's
    /// last. Parameters are remapped so the result still spans `[0, 1]`, each
    /// half taking a share proportional to its length.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if the tail and head samples differ.
    pub fn concatenate(&mut self, other: &Self) -> Result<()> {
        let (Some(tail), Some(head)) = (self.samples.last(), other.samples.first()) else {
            if self.samples.is_empty() {
                self.samples.clone_from(&other.samples);
            }
            return Ok(());
        };
        if (tail.point - head.point).norm() > TOLERANCE {
            return Err(OperationError::InvalidInput(
                "polylines to concatenate must share their joining sample".into(),
            )
            .into());
        }

        let len_a = self.length();
        let len_b = other.length();
        let total = len_a + len_b;
        let split = if total > TOLERANCE { len_a / total } else { 0.5 };

        for sample in &mut self.samples {
            sample.t *= split;
        }
        self.samples.extend(other.samples.iter().skip(1).map(|s| PolylineSample {
            point: s.point,
            t: split + s.t * (1.0 - split),
        }));
        Ok(())
    }

    /// Reverses the direction of travel, mapping each `t` to `1 - t`.
    pub fn reverse(&mut self) {
        self.samples.reverse();
        for sample in &mut self.samples {
            sample.t = 1.0 - sample.t;
        }
    }

    /// Returns a reversed copy.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut copy = self.clone();
        copy.reverse();
        copy
    }

    /// Re-assigns sample parameters proportionally to cumulative chord length.
    pub fn distribute_parameters_by_arc_length(&mut self) {
        let total = self.length();
        let count = self.samples.len();
        if count == 0 {
            return;
        }
        if total < TOLERANCE {
            for (i, sample) in self.samples.iter_mut().enumerate() {
                #[allow(clippy::cast_precision_loss)]
                let t = if count > 1 { i as f64 / (count - 1) as f64 } else { 0.0 };
                sample.t = t;
            }
            return;
        }
        let mut run = 0.0;
        let mut prev = self.samples[0].point;
        for sample in &mut self.samples {
            run += (sample.point - prev).norm();
            prev = sample.point;
            sample.t = run / total;
        }
        if let Some(last) = self.samples.last_mut() {
            last.t = 1.0;
        }
    }

    /// Finds the closest point on the polyline to `query`.
    ///
    /// Returns `None` for an empty polyline.
    #[must_use]
    pub fn find_closest_point(&self, query: &Point2) -> Option<PolylineClosest> {
        if self.samples.len() == 1 {
            let s = self.samples[0];
            return Some(PolylineClosest {
                distance: (query - s.point).norm(),
                t: s.t,
                point: s.point,
            });
        }
        self.samples
            .windows(2)
            .map(|w| {
                let proj = project_onto_segment(query, &w[0].point, &w[1].point);
                PolylineClosest {
                    distance: proj.distance,
                    t: w[0].t + (w[1].t - w[0].t) * proj.t,
                    point: proj.point,
                }
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    /// Every crossing with `other`, sorted by the parameter on this polyline.
    ///
    /// A crossing at a sample shared by two consecutive segments is reported once.
    #[must_use]
    pub fn all_intersections(&self, other: &Self) -> Vec<PolylineIntersection> {
        let mut hits = Vec::new();
        for a in self.samples.windows(2) {
            for b in other.samples.windows(2) {
                if let Some((point, s, u)) =
                    segment_segment_intersect_2d(&a[0].point, &a[1].point, &b[0].point, &b[1].point)
                {
                    hits.push(PolylineIntersection {
                        t_self: a[0].t + (a[1].t - a[0].t) * s,
                        t_other: b[0].t + (b[1].t - b[0].t) * u,
                        point,
                    });
                }
            }
        }
        sort_and_dedup(&mut hits);
        hits
    }

    /// The first crossing with `other` in this polyline's parameter order,
    /// as `(t_self, t_other)`.
    #[must_use]
    pub fn first_intersection(&self, other: &Self) -> Option<(f64, f64)> {
        self.all_intersections(other)
            .first()
            .map(|hit| (hit.t_self, hit.t_other))
    }

    /// Crossings between non-adjacent segments of this polyline, sorted by
    /// the earlier parameter. `t_self < t_other` for every result.
    ///
    /// Touches where both segments meet at one of their own endpoints are
    /// skipped; they are shared samples, not crossings.
    #[must_use]
    pub fn self_intersections(&self) -> Vec<PolylineIntersection> {
        let n = self.segment_count();
        let mut hits = Vec::new();
        for i in 0..n {
            for j in (i + 2)..n {
                let (a0, a1) = (&self.samples[i], &self.samples[i + 1]);
                let (b0, b1) = (&self.samples[j], &self.samples[j + 1]);
                let Some((point, s, u)) =
                    segment_segment_intersect_2d(&a0.point, &a1.point, &b0.point, &b1.point)
                else {
                    continue;
                };
                let s_at_end = s <= END_EPS || s >= 1.0 - END_EPS;
                let u_at_end = u <= END_EPS || u >= 1.0 - END_EPS;
                if s_at_end && u_at_end {
                    continue;
                }
                hits.push(PolylineIntersection {
                    t_self: a0.t + (a1.t - a0.t) * s,
                    t_other: b0.t + (b1.t - b0.t) * u,
                    point,
                });
            }
        }
        sort_and_dedup(&mut hits);
        hits
    }

    /// The point `distance` along the polyline from its start, clamped to the end.
    #[must_use]
    pub fn point_at_distance(&self, distance: f64) -> Option<Point2> {
        let first = self.samples.first()?;
        let mut remaining = distance.max(0.0);
        for w in self.samples.windows(2) {
            let seg = w[1].point - w[0].point;
            let len = seg.norm();
            if len >= remaining && len > TOLERANCE {
                return Some(w[0].point + seg * (remaining / len));
            }
            remaining -= len;
        }
        Some(self.samples.last().map_or(first.point, |s| s.point))
    }

    /// The curve parameter `distance` along the polyline, clamped to `[0, 1]`.
    #[must_use]
    pub fn parameter_at_distance(&self, distance: f64) -> Option<f64> {
        let first = self.samples.first()?;
        let mut remaining = distance.max(0.0);
        for w in self.samples.windows(2) {
            let len = (w[1].point - w[0].point).norm();
            if len >= remaining && len > TOLERANCE {
                return Some(w[0].t + (w[1].t - w[0].t) * (remaining / len));
            }
            remaining -= len;
        }
        Some(self.samples.last().map_or(first.t, |s| s.t))
    }

    /// Index of the segment containing curve parameter `t`.
    #[must_use]
    pub fn segment_index_for(&self, t: f64) -> Option<usize> {
        let n = self.segment_count();
        if n == 0 {
            return None;
        }
        let idx = self.samples.partition_point(|s| s.t <= t);
        Some(idx.saturating_sub(1).min(n - 1))
    }
}

fn flatten_recursive(
    controls: &[Point2],
    t0: f64,
    t1: f64,
    tolerance: f64,
    depth_left: u32,
    samples: &mut Vec<PolylineSample>,
) {
    if depth_left == 0 || casteljau::flatness(controls) <= tolerance {
        if let Some(end) = controls.last() {
            samples.push(PolylineSample { point: *end, t: t1 });
        }
        return;
    }
    let (left, right) = casteljau::split(controls, 0.5);
    let mid = f64::midpoint(t0, t1);
    flatten_recursive(&left, t0, mid, tolerance, depth_left - 1, samples);
    flatten_recursive(&right, mid, t1, tolerance, depth_left - 1, samples);
}

fn sort_and_dedup(hits: &mut Vec<PolylineIntersection>) {
    hits.sort_by(|a, b| a.t_self.total_cmp(&b.t_self).then(a.t_other.total_cmp(&b.t_other)));
    hits.dedup_by(|later, earlier| {
        (later.t_self - earlier.t_self).abs() < END_EPS
            && (later.t_other - earlier.t_other).abs() < END_EPS
    });
}
