//! de Casteljau evaluation on floating-point control polygons.

use crate::math::{cross_2d, lerp, Point2};

/// Returns every level of the de Casteljau pyramid at `t`.
///
/// `levels[0]` is the control polygon and the final level holds the single
/// evaluated point.
pub(crate) fn levels(points: &[Point2], t: f64) -> Vec<Vec<Point2>> {
    let mut result = vec![points.to_vec()];
    while let Some(last) = result.last() {
        if last.len() <= 1 {
            break;
        }
        let next: Vec<Point2> = last.windows(2).map(|w| lerp(&w[0], &w[1], t)).collect();
        result.push(next);
    }
    result
}

/// Evaluates the Bezier curve defined by `points` at `t`.
pub(crate) fn point_at(points: &[Point2], t: f64) -> Point2 {
    let mut work = points.to_vec();
    let n = work.len();
    for level in 1..n {
        for i in 0..(n - level) {
            work[i] = lerp(&work[i], &work[i + 1], t);
        }
    }
    work.first().copied().unwrap_or_else(Point2::origin)
}

/// Splits the control polygon at `t` into the polygons of the two halves.
pub(crate) fn split(points: &[Point2], t: f64) -> (Vec<Point2>, Vec<Point2>) {
    let pyramid = levels(points, t);
    let left: Vec<Point2> = pyramid.iter().filter_map(|level| level.first().copied()).collect();
    let mut right: Vec<Point2> = pyramid.iter().filter_map(|level| level.last().copied()).collect();
    right.reverse();
    (left, right)
}

/// Flatness metric of a control polygon, in squared grid units.
///
/// The fan area of the control hull measured from the first point, grown by
/// the squared overshoot of any control point projecting beyond the chord
/// (so that a straight but back-tracking polygon, or a closed loop whose chord
/// is empty, is never reported as flat).
pub(crate) fn flatness(points: &[Point2]) -> f64 {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return 0.0;
    };
    if points.len() < 3 {
        return 0.0;
    }

    let chord = last - first;
    let chord_len_sq = chord.norm_squared();
    let interior = &points[1..points.len() - 1];

    if chord_len_sq < 1e-12 {
        return interior
            .iter()
            .map(|p| (p - first).norm_squared())
            .fold(0.0, f64::max);
    }

    let mut area = 0.0;
    let mut overshoot: f64 = 0.0;
    for p in interior {
        let rel = p - first;
        area += cross_2d(&rel, &chord).abs() * 0.5;
        let along = rel.dot(&chord) / chord_len_sq;
        if along < 0.0 {
            overshoot = overshoot.max(along * along * chord_len_sq);
        } else if along > 1.0 {
            let excess = along - 1.0;
            overshoot = overshoot.max(excess * excess * chord_len_sq);
        }
    }
    area.max(overshoot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_halves_share_midpoint() {
        let pts = vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 10.0),
            Point2::new(10.0, 10.0),
            Point2::new(10.0, 0.0),
        ];
        let (l, r) = split(&pts, 0.5);
        assert_eq!(l.len(), 4);
        assert_eq!(r.len(), 4);
        assert_eq!(l[3], r[0]);
        assert_eq!(l[0], pts[0]);
        assert_eq!(r[3], pts[3]);
        let mid = point_at(&pts, 0.5);
        assert!((mid - l[3]).norm() < 1e-12);
    }

    #[test]
    fn straight_polygon_is_flat() {
        let pts = vec![Point2::new(0.0, 0.0), Point2::new(5.0, 0.0), Point2::new(10.0, 0.0)];
        assert!(flatness(&pts) < 1e-12);
    }

    #[test]
    fn closed_loop_is_not_flat() {
        let pts = vec![Point2::new(0.0, 0.0), Point2::new(10.0, 10.0), Point2::new(0.0, 0.0)];
        assert!(flatness(&pts) > 100.0);
    }

    #[test]
    fn back_tracking_polygon_is_not_flat() {
        let pts = vec![Point2::new(0.0, 0.0), Point2::new(30.0, 0.0), Point2::new(10.0, 0.0)];
        assert!(flatness(&pts) > 100.0);
    }
}
