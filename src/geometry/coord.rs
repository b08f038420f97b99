use crate::math::Point2;

/// Number of grid units per pixel.
pub const GRID_RESOLUTION: i32 = 100;

/// A position on the fixed sub-pixel grid.
///
/// Coordinates are integers so that two positions produced by different
/// computations compare exactly equal once they land on the same grid cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    /// Creates a coordinate from grid units.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Snaps a floating-point position to the nearest grid coordinate.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_point(p: &Point2) -> Self {
        Self {
            x: p.x.round() as i32,
            y: p.y.round() as i32,
        }
    }

    /// Returns this coordinate as a floating-point position in grid units.
    #[must_use]
    pub fn to_point(self) -> Point2 {
        Point2::new(f64::from(self.x), f64::from(self.y))
    }

    /// Converts a position in pixels to the nearest grid coordinate.
    #[must_use]
    pub fn from_pixels(x: f64, y: f64) -> Self {
        let scale = f64::from(GRID_RESOLUTION);
        Self::from_point(&Point2::new(x * scale, y * scale))
    }

    /// Returns this coordinate in pixels.
    #[must_use]
    pub fn to_pixels(self) -> (f64, f64) {
        let scale = f64::from(GRID_RESOLUTION);
        (f64::from(self.x) / scale, f64::from(self.y) / scale)
    }

    /// Grid coordinate nearest to the midpoint of `a` and `b`.
    #[must_use]
    pub fn midpoint(a: Self, b: Self) -> Self {
        let pa = a.to_point();
        let pb = b.to_point();
        Self::from_point(&Point2::new(
            f64::midpoint(pa.x, pb.x),
            f64::midpoint(pa.y, pb.y),
        ))
    }
}

impl From<(i32, i32)> for Coord {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapping_rounds_to_nearest() {
        assert_eq!(Coord::from_point(&Point2::new(1.4, -1.6)), Coord::new(1, -2));
        assert_eq!(Coord::from_point(&Point2::new(49.5, 50.49)), Coord::new(50, 50));
    }

    #[test]
    fn pixel_conversion() {
        let c = Coord::from_pixels(1.25, -0.5);
        assert_eq!(c, Coord::new(125, -50));
        let (x, y) = c.to_pixels();
        assert!((x - 1.25).abs() < 1e-12);
        assert!((y + 0.5).abs() < 1e-12);
    }

    #[test]
    fn midpoint_is_on_grid() {
        assert_eq!(Coord::midpoint(Coord::new(0, 0), Coord::new(3, 4)), Coord::new(2, 2));
    }
}
