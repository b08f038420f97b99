//! Self-intersection and mutual splitting of curves.
//!
//! Both operations work on flattened polylines to find crossings and then
//! split the exact curves at the corresponding parameters, snapping each
//! new joint onto a single grid coordinate.

mod mutual;
mod record;
mod self_intersect;

pub use mutual::SplitMutually;
pub(crate) use mutual::split_record_lists;
pub use record::SplitRecord;
pub use self_intersect::SplitSelfIntersections;

use crate::geometry::polyline::DEFAULT_MAX_DEPTH;
use crate::geometry::{Curve, Polyline};

/// Local parameters closer than this to a fragment end count as the end.
pub(crate) const PARAM_EPS: f64 = 1e-6;

/// Tuning for the split operations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitConfig {
    /// Flatness tolerance used when flattening, in squared grid units.
    pub flatten_tolerance: f64,
    /// Recursion limit for flattening.
    pub max_flatten_depth: u32,
    /// Upper bound on worklist iterations before giving up on further splits.
    pub max_iterations: usize,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            flatten_tolerance: 1.0,
            max_flatten_depth: DEFAULT_MAX_DEPTH,
            max_iterations: 4096,
        }
    }
}

impl SplitConfig {
    pub(crate) fn flatten(&self, curve: &Curve) -> Polyline {
        Polyline::flatten_with_depth(curve, self.flatten_tolerance, self.max_flatten_depth)
    }
}
