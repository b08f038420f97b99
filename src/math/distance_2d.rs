use super::{Point2, TOLERANCE};

/// Result of projecting a point onto a line segment.
#[derive(Debug, Clone, Copy)]
pub struct SegmentProjection {
    /// Parameter along the segment in `[0, 1]`.
    pub t: f64,
    /// The closest point on the segment.
    pub point: Point2,
    /// Distance from the query point to `point`.
    pub distance: f64,
}

/// Projects `p` onto the segment from `a` to `b`, clamping to the segment.
#[must_use]
pub fn project_onto_segment(p: &Point2, a: &Point2, b: &Point2) -> SegmentProjection {
    let d = b - a;
    let len_sq = d.norm_squared();

    if len_sq < TOLERANCE {
        // Degenerate segment (zero length).
        return SegmentProjection {
            t: 0.0,
            point: *a,
            distance: (p - a).norm(),
        };
    }

    let t = ((p - a).dot(&d) / len_sq).clamp(0.0, 1.0);
    let point = a + d * t;
    SegmentProjection {
        t,
        point,
        distance: (p - point).norm(),
    }
}

/// Returns the minimum distance from `p` to the segment from `a` to `b`.
#[must_use]
pub fn point_to_segment_dist(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    project_onto_segment(p, a, b).distance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_interior() {
        let proj = project_onto_segment(
            &Point2::new(5.0, 3.0),
            &Point2::new(0.0, 0.0),
            &Point2::new(10.0, 0.0),
        );
        assert!((proj.t - 0.5).abs() < TOLERANCE);
        assert!((proj.distance - 3.0).abs() < TOLERANCE);
    }

    #[test]
    fn projection_clamps_to_end() {
        let proj = project_onto_segment(
            &Point2::new(12.0, 0.0),
            &Point2::new(0.0, 0.0),
            &Point2::new(10.0, 0.0),
        );
        assert!((proj.t - 1.0).abs() < TOLERANCE);
        assert!((proj.distance - 2.0).abs() < TOLERANCE);
    }

    #[test]
    fn degenerate_segment() {
        let d = point_to_segment_dist(
            &Point2::new(3.0, 4.0),
            &Point2::new(0.0, 0.0),
            &Point2::new(0.0, 0.0),
        );
        assert!((d - 5.0).abs() < TOLERANCE);
    }
}
