use crate::geometry::{Coord, Curve};

/// A curve fragment together with the parameter range of the original
/// curve it was cut from.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitRecord {
    /// Parameter on the original curve where this fragment starts.
    pub offset: f64,
    /// Length of the fragment's parameter range on the original curve.
    pub span: f64,
    /// The fragment itself.
    pub curve: Curve,
}

impl SplitRecord {
    /// A record covering the whole of `curve`.
    #[must_use]
    pub fn root(curve: Curve) -> Self {
        Self {
            offset: 0.0,
            span: 1.0,
            curve,
        }
    }

    /// Maps a parameter on this fragment to the original curve.
    #[must_use]
    pub fn original_parameter(&self, local: f64) -> f64 {
        self.offset + self.span * local
    }

    /// Parameter on the original curve where this fragment ends.
    #[must_use]
    pub fn end_parameter(&self) -> f64 {
        self.offset + self.span
    }

    /// Whether the fragment has collapsed to a point.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.curve.is_degenerate()
    }

    /// Splits the fragment at one local parameter.
    #[must_use]
    pub fn split_at(&self, local: f64) -> (Self, Self) {
        let (left, right) = self.curve.split(local);
        (
            Self {
                offset: self.offset,
                span: self.span * local,
                curve: left.collapse(),
            },
            Self {
                offset: self.original_parameter(local),
                span: self.span * (1.0 - local),
                curve: right.collapse(),
            },
        )
    }

    /// Splits the fragment at increasing local parameters, forcing every
    /// joint between consecutive pieces onto `joint`.
    ///
    /// Parameters outside `(0, 1)` or out of order are ignored, so the
    /// result always holds at least one piece.
    #[must_use]
    pub fn split_many(&self, ts: &[f64], joint: Coord) -> Vec<Self> {
        let mut bounds = vec![0.0];
        for &t in ts {
            let last = bounds[bounds.len() - 1];
            if t > last && t < 1.0 {
                bounds.push(t);
            }
        }
        bounds.push(1.0);

        let mut pieces = self.curve.split_at_many(&bounds[1..bounds.len() - 1]);
        let joints = pieces.len() - 1;
        for i in 0..joints {
            pieces[i].set_end(joint);
            pieces[i + 1].set_start(joint);
        }

        pieces
            .into_iter()
            .zip(bounds.windows(2))
            .map(|(curve, range)| Self {
                offset: self.original_parameter(range[0]),
                span: self.span * (range[1] - range[0]),
                curve: curve.collapse(),
            })
            .collect()
    }

    /// The part of the fragment between local parameters `t0 < t1`.
    #[must_use]
    pub fn sub(&self, t0: f64, t1: f64) -> Self {
        Self {
            offset: self.original_parameter(t0),
            span: self.span * (t1 - t0),
            curve: self.curve.sub_curve(t0, t1).collapse(),
        }
    }
}
