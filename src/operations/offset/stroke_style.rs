use crate::error::{OperationError, Result};

/// How two consecutive stroked curves are connected on the outer side of
/// the turn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineJoin {
    /// A straight line across the gap.
    Bevel,
    /// A circular arc around the joint.
    Round,
    /// The offset edges extended until they meet, falling back to a bevel
    /// once the miter point is farther than `limit` half widths from the
    /// joint.
    Miter { limit: f64 },
}

/// How the ends of an open stroke are closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCap {
    /// A straight line through the endpoint.
    Butt,
    /// A half circle around the endpoint.
    Round,
    /// A half square extending past the endpoint.
    Square,
}

/// Style parameters for stroke outlines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    width: f64,
    join: LineJoin,
    cap: LineCap,
}

impl StrokeStyle {
    /// Creates a new stroke style with miter joins (limit 4) and butt caps.
    ///
    /// # Errors
    ///
    /// Returns an error if `width` is not positive.
    pub fn new(width: f64) -> Result<Self> {
        if width.is_nan() || width <= 0.0 {
            return Err(OperationError::InvalidInput("stroke width must be positive".to_owned()).into());
        }
        Ok(Self {
            width,
            join: LineJoin::Miter { limit: 4.0 },
            cap: LineCap::Butt,
        })
    }

    /// Sets the join policy.
    ///
    /// # Errors
    ///
    /// Returns an error if a miter limit is below 1.
    pub fn with_join(mut self, join: LineJoin) -> Result<Self> {
        if let LineJoin::Miter { limit } = join {
            if limit.is_nan() || limit < 1.0 {
                return Err(OperationError::InvalidInput(format!(
                    "miter limit must be at least 1, got {limit}"
                ))
                .into());
            }
        }
        self.join = join;
        Ok(self)
    }

    /// Sets the cap policy.
    #[must_use]
    pub fn with_cap(mut self, cap: LineCap) -> Self {
        self.cap = cap;
        self
    }

    /// Returns the stroke width.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Returns half the stroke width.
    #[must_use]
    pub fn half_width(&self) -> f64 {
        self.width * 0.5
    }

    #[must_use]
    pub fn join(&self) -> LineJoin {
        self.join
    }

    #[must_use]
    pub fn cap(&self) -> LineCap {
        self.cap
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn new_with_valid_width() {
        let style = StrokeStyle::new(2.0).unwrap();
        assert!((style.width() - 2.0).abs() < f64::EPSILON);
        assert!((style.half_width() - 1.0).abs() < f64::EPSILON);
        assert_eq!(style.join(), LineJoin::Miter { limit: 4.0 });
        assert_eq!(style.cap(), LineCap::Butt);
    }

    #[test]
    fn new_with_zero_width_fails() {
        assert!(StrokeStyle::new(0.0).is_err());
        assert!(StrokeStyle::new(-1.0).is_err());
        assert!(StrokeStyle::new(f64::NAN).is_err());
    }

    #[test]
    fn miter_limit_below_one_fails() {
        let style = StrokeStyle::new(2.0).unwrap();
        assert!(style.with_join(LineJoin::Miter { limit: 0.5 }).is_err());
        let round = style.with_join(LineJoin::Round).unwrap().with_cap(LineCap::Round);
        assert_eq!(round.join(), LineJoin::Round);
        assert_eq!(round.cap(), LineCap::Round);
    }
}
