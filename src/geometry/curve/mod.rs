pub(crate) mod casteljau;

use crate::error::{GeometryError, OperationError, Result};
use crate::math::{Point2, Vector2};

use super::{Aabb, Coord, Polyline};

/// A piecewise-polynomial curve segment on the coordinate grid.
///
/// Each variant stores `degree + 1` control coordinates; the first is the
/// start of the curve and the last is its end. Evaluation happens in floating
/// point, and curves derived from this one (split, reversed, promoted) snap
/// their control points back onto the grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Curve {
    /// A zero-length curve.
    Point(Coord),
    /// A straight segment.
    Line([Coord; 2]),
    /// A quadratic Bezier segment.
    Quadratic([Coord; 3]),
    /// A cubic Bezier segment.
    Cubic([Coord; 4]),
}

impl Curve {
    /// Creates a straight segment.
    #[must_use]
    pub fn line(start: Coord, end: Coord) -> Self {
        Self::Line([start, end])
    }

    /// Creates a quadratic Bezier segment.
    #[must_use]
    pub fn quadratic(start: Coord, control: Coord, end: Coord) -> Self {
        Self::Quadratic([start, control, end])
    }

    /// Creates a cubic Bezier segment.
    #[must_use]
    pub fn cubic(start: Coord, control0: Coord, control1: Coord, end: Coord) -> Self {
        Self::Cubic([start, control0, control1, end])
    }

    /// Creates a curve whose degree is one less than the number of points.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` unless 1 to 4 points are given.
    pub fn from_control_points(points: &[Coord]) -> Result<Self> {
        match *points {
            [p] => Ok(Self::Point(p)),
            [a, b] => Ok(Self::Line([a, b])),
            [a, b, c] => Ok(Self::Quadratic([a, b, c])),
            [a, b, c, d] => Ok(Self::Cubic([a, b, c, d])),
            _ => Err(OperationError::InvalidInput(format!(
                "a curve needs 1 to 4 control points, got {}",
                points.len()
            ))
            .into()),
        }
    }

    /// Polynomial degree of the curve (0 for a point).
    #[must_use]
    pub fn degree(&self) -> usize {
        self.control_points().len() - 1
    }

    /// The control points, start first.
    #[must_use]
    pub fn control_points(&self) -> &[Coord] {
        match self {
            Self::Point(p) => std::slice::from_ref(p),
            Self::Line(pts) => pts,
            Self::Quadratic(pts) => pts,
            Self::Cubic(pts) => pts,
        }
    }

    fn control_points_mut(&mut self) -> &mut [Coord] {
        match self {
            Self::Point(p) => std::slice::from_mut(p),
            Self::Line(pts) => pts,
            Self::Quadratic(pts) => pts,
            Self::Cubic(pts) => pts,
        }
    }

    /// The first control point.
    #[must_use]
    pub fn start(&self) -> Coord {
        self.control_points()[0]
    }

    /// The last control point.
    #[must_use]
    pub fn end(&self) -> Coord {
        let pts = self.control_points();
        pts[pts.len() - 1]
    }

    /// Replaces a single control point.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if `index` exceeds the degree.
    pub fn set_control_point(&mut self, index: usize, coord: Coord) -> Result<()> {
        let degree = self.degree();
        let slot = self.control_points_mut().get_mut(index).ok_or_else(|| {
            OperationError::InvalidInput(format!(
                "control point {index} does not exist on a degree {degree} curve"
            ))
        })?;
        *slot = coord;
        Ok(())
    }

    /// Moves the start point. A `Point` curve moves as a whole.
    pub fn set_start(&mut self, coord: Coord) {
        self.control_points_mut()[0] = coord;
    }

    /// Moves the end point. A `Point` curve moves as a whole.
    pub fn set_end(&mut self, coord: Coord) {
        let pts = self.control_points_mut();
        let last = pts.len() - 1;
        pts[last] = coord;
    }

    /// Whether every control point is the same coordinate.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        let start = self.start();
        self.control_points().iter().all(|c| *c == start)
    }

    /// Whether the curve ends where it starts.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.start() == self.end()
    }

    /// Replaces a degenerate curve with the equivalent `Point` variant.
    #[must_use]
    pub fn collapse(self) -> Self {
        if self.is_degenerate() {
            Self::Point(self.start())
        } else {
            self
        }
    }

    /// Control points in floating point.
    #[must_use]
    pub fn float_control_points(&self) -> Vec<Point2> {
        self.control_points().iter().map(|c| c.to_point()).collect()
    }

    /// Builds a curve of the same variant from `coords`, which must hold
    /// exactly `degree + 1` points.
    fn rebuilt(&self, coords: &[Coord]) -> Self {
        match self {
            Self::Point(_) => Self::Point(coords[0]),
            Self::Line(_) => Self::Line([coords[0], coords[1]]),
            Self::Quadratic(_) => Self::Quadratic([coords[0], coords[1], coords[2]]),
            Self::Cubic(_) => Self::Cubic([coords[0], coords[1], coords[2], coords[3]]),
        }
    }

    /// Evaluates the curve at parameter `t`.
    #[must_use]
    pub fn evaluate(&self, t: f64) -> Point2 {
        match self {
            Self::Point(p) => p.to_point(),
            _ => casteljau::point_at(&self.float_control_points(), t),
        }
    }

    /// Tangent direction at `t`, from the forward difference of the last two
    /// de Casteljau intermediate points.
    ///
    /// The direction is that of the derivative; the magnitude is the
    /// derivative divided by the degree. A `Point` has a zero tangent.
    #[must_use]
    pub fn tangent(&self, t: f64) -> Vector2 {
        let pyramid = casteljau::levels(&self.float_control_points(), t);
        match pyramid.iter().rev().nth(1) {
            Some(level) if level.len() == 2 => level[1] - level[0],
            _ => Vector2::zeros(),
        }
    }

    /// The exact first derivative at `t`.
    #[must_use]
    pub fn derivative_at(&self, t: f64) -> Vector2 {
        #[allow(clippy::cast_precision_loss)]
        let degree = self.degree() as f64;
        self.tangent(t) * degree
    }

    /// The derivative as a curve one degree lower (Cubic to Quadratic, and so on).
    ///
    /// The control points of the result are displacement vectors stored as
    /// grid coordinates.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` for a `Point`, whose derivative is undefined.
    pub fn get_derivative(&self) -> Result<Self> {
        let pts = self.control_points();
        let degree = i32::try_from(self.degree()).unwrap_or(i32::MAX);
        if degree == 0 {
            return Err(GeometryError::Degenerate("a point has no derivative".into()).into());
        }
        let diffs: Vec<Coord> = pts
            .windows(2)
            .map(|w| Coord::new(degree * (w[1].x - w[0].x), degree * (w[1].y - w[0].y)))
            .collect();
        Self::from_control_points(&diffs)
    }

    /// Direction of travel leaving the start point.
    ///
    /// Uses the first control point that differs from the start, so a cubic
    /// with a coincident first handle still reports a direction. Returns
    /// `None` for a degenerate curve.
    #[must_use]
    pub fn start_direction(&self) -> Option<Vector2> {
        let start = self.start();
        self.control_points()
            .iter()
            .find(|c| **c != start)
            .map(|c| c.to_point() - start.to_point())
    }

    /// Direction of travel arriving at the end point.
    #[must_use]
    pub fn end_direction(&self) -> Option<Vector2> {
        let end = self.end();
        self.control_points()
            .iter()
            .rev()
            .find(|c| **c != end)
            .map(|c| end.to_point() - c.to_point())
    }

    /// Splits the curve at `t` using de Casteljau subdivision.
    ///
    /// Both halves keep the original endpoints exactly and share the same
    /// snapped coordinate at the split.
    #[must_use]
    pub fn split(&self, t: f64) -> (Self, Self) {
        if let Self::Point(_) = self {
            return (self.clone(), self.clone());
        }
        let t = t.clamp(0.0, 1.0);
        let (left, right) = casteljau::split(&self.float_control_points(), t);
        let mut left: Vec<Coord> = left.iter().map(Coord::from_point).collect();
        let mut right: Vec<Coord> = right.iter().map(Coord::from_point).collect();

        let last = left.len() - 1;
        left[0] = self.start();
        right[last] = self.end();
        right[0] = left[last];

        (self.rebuilt(&left), self.rebuilt(&right))
    }

    /// Splits the curve at each of the increasing parameters in `ts`.
    ///
    /// Parameters outside `(0, 1)` or not strictly increasing are ignored.
    /// Returns one more curve than the number of accepted parameters.
    #[must_use]
    pub fn split_at_many(&self, ts: &[f64]) -> Vec<Self> {
        let mut pieces = Vec::with_capacity(ts.len() + 1);
        let mut remaining = self.clone();
        let mut consumed = 0.0;
        for &t in ts {
            if t <= consumed || t >= 1.0 {
                continue;
            }
            let local = (t - consumed) / (1.0 - consumed);
            let (head, tail) = remaining.split(local);
            pieces.push(head);
            remaining = tail;
            consumed = t;
        }
        pieces.push(remaining);
        pieces
    }

    /// The portion of the curve between `t0` and `t1` (`t0 < t1`).
    #[must_use]
    pub fn sub_curve(&self, t0: f64, t1: f64) -> Self {
        let head = if t1 < 1.0 { self.split(t1).0 } else { self.clone() };
        if t0 > 0.0 && t1 > 0.0 {
            head.split(t0 / t1.min(1.0)).1
        } else {
            head
        }
    }

    /// The same curve traversed from end to start.
    #[must_use]
    pub fn reverse(&self) -> Self {
        let mut pts: Vec<Coord> = self.control_points().to_vec();
        pts.reverse();
        self.rebuilt(&pts)
    }

    /// Signed area of the polygon formed by the control points.
    #[must_use]
    pub fn hull_area(&self) -> f64 {
        crate::math::polygon_2d::signed_area_2d(&self.float_control_points())
    }

    /// Flatness metric used by flattening, in squared grid units.
    #[must_use]
    pub fn flatness(&self) -> f64 {
        casteljau::flatness(&self.float_control_points())
    }

    /// Bounding box of the control polygon, which contains the curve.
    #[must_use]
    pub fn bounding_box(&self) -> Aabb {
        let start = self.start();
        let mut aabb = Aabb {
            min: start,
            max: start,
        };
        for c in self.control_points() {
            aabb.include(*c);
        }
        aabb
    }

    /// Promotes the curve to an equivalent cubic (up to grid snapping).
    #[must_use]
    pub fn to_cubic(&self) -> Self {
        match self {
            Self::Point(p) => Self::Cubic([*p; 4]),
            Self::Line([a, b]) => {
                let pa = a.to_point();
                let pb = b.to_point();
                let d = pb - pa;
                Self::Cubic([
                    *a,
                    Coord::from_point(&(pa + d / 3.0)),
                    Coord::from_point(&(pa + d * (2.0 / 3.0))),
                    *b,
                ])
            }
            Self::Quadratic([a, k, b]) => {
                let pa = a.to_point();
                let pk = k.to_point();
                let pb = b.to_point();
                Self::Cubic([
                    *a,
                    Coord::from_point(&(pa + (pk - pa) * (2.0 / 3.0))),
                    Coord::from_point(&(pb + (pk - pb) * (2.0 / 3.0))),
                    *b,
                ])
            }
            Self::Cubic(_) => self.clone(),
        }
    }

    /// Joins two consecutive curves into one.
    ///
    /// Two straight pieces become a single line; anything curved becomes a
    /// cubic whose end tangents match the two pieces. `ratio` is the share of
    /// the joined parameter range taken by `first` (usually its share of the
    /// total length).
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if `first` does not end where
    /// `second` starts.
    pub fn join(first: &Self, second: &Self, ratio: f64) -> Result<Self> {
        if first.end() != second.start() {
            return Err(OperationError::InvalidInput(
                "curves to join must share an endpoint".into(),
            )
            .into());
        }
        if first.degree() <= 1 && second.degree() <= 1 {
            return Ok(Self::line(first.start(), second.end()));
        }

        let s = ratio.clamp(0.01, 0.99);
        let a = first.to_cubic().float_control_points();
        let b = second.to_cubic().float_control_points();
        let p1 = a[0] + (a[1] - a[0]) / s;
        let p2 = b[3] + (b[2] - b[3]) / (1.0 - s);
        Ok(Self::cubic(
            first.start(),
            Coord::from_point(&p1),
            Coord::from_point(&p2),
            second.end(),
        ))
    }

    /// Approximate arc length, from the flattened polyline.
    #[must_use]
    pub fn length(&self, tolerance: f64) -> f64 {
        Polyline::flatten(self, tolerance).length()
    }
}
