use nalgebra::DMatrix;

use super::Point2;

/// Bernstein basis polynomial `b_{k,n}(t)`.
#[must_use]
pub fn bernstein(degree: usize, k: usize, t: f64) -> f64 {
    let mt = 1.0 - t;
    let mut value = binomial(degree, k);
    for _ in 0..k {
        value *= t;
    }
    for _ in 0..(degree - k) {
        value *= mt;
    }
    value
}

fn binomial(n: usize, k: usize) -> f64 {
    let mut result = 1.0;
    for i in 0..k {
        #[allow(clippy::cast_precision_loss)]
        let step = (n - i) as f64 / (i + 1) as f64;
        result *= step;
    }
    result
}

/// Least-squares fit of the interior control points of a Bezier curve.
///
/// The endpoints `start` and `end` are fixed; the `degree - 1` interior
/// control points are chosen to minimise the squared distance between the
/// curve evaluated at each sample parameter and the sample point.
///
/// Returns `None` if the normal equations are singular (too few samples, or
/// samples clustered at the endpoints).
#[must_use]
pub fn fit_bezier_interior(
    degree: usize,
    start: &Point2,
    end: &Point2,
    samples: &[(f64, Point2)],
) -> Option<Vec<Point2>> {
    if degree < 2 {
        return Some(Vec::new());
    }
    let unknowns = degree - 1;
    if samples.len() < unknowns {
        return None;
    }

    let basis = DMatrix::from_fn(samples.len(), unknowns, |row, col| {
        bernstein(degree, col + 1, samples[row].0)
    });
    let rhs = DMatrix::from_fn(samples.len(), 2, |row, col| {
        let (t, p) = samples[row];
        let fixed = start.coords * bernstein(degree, 0, t) + end.coords * bernstein(degree, degree, t);
        if col == 0 {
            p.x - fixed.x
        } else {
            p.y - fixed.y
        }
    });

    let basis_t = basis.transpose();
    let normal = &basis_t * &basis;
    let projected = &basis_t * &rhs;
    let solution = normal.lu().solve(&projected)?;

    let points: Vec<Point2> = (0..unknowns)
        .map(|row| Point2::new(solution[(row, 0)], solution[(row, 1)]))
        .collect();
    if points.iter().all(|p| p.x.is_finite() && p.y.is_finite()) {
        Some(points)
    } else {
        None
    }
}
