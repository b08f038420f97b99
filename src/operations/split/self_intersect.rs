use tracing::{trace, warn};

use crate::geometry::{Coord, Curve};

use super::{SplitConfig, SplitRecord, PARAM_EPS};

/// Splits a curve at its self-intersections.
///
/// The result is a chain of fragments, ordered along the original curve,
/// none of which crosses itself. At every crossing the pieces meeting there
/// share one grid coordinate.
pub struct SplitSelfIntersections {
    curve: Curve,
    config: SplitConfig,
}

impl SplitSelfIntersections {
    /// Creates a new `SplitSelfIntersections` operation.
    #[must_use]
    pub fn new(curve: Curve) -> Self {
        Self {
            curve,
            config: SplitConfig::default(),
        }
    }

    /// Overrides the flattening and iteration settings.
    #[must_use]
    pub fn with_config(mut self, config: SplitConfig) -> Self {
        self.config = config;
        self
    }

    /// Executes the split, returning the fragment curves in order.
    #[must_use]
    pub fn execute(&self) -> Vec<Curve> {
        self.execute_records()
            .into_iter()
            .map(|record| record.curve)
            .collect()
    }

    /// Executes the split, keeping each fragment's provenance.
    #[must_use]
    pub fn execute_records(&self) -> Vec<SplitRecord> {
        let mut pending = vec![SplitRecord::root(self.curve.clone())];
        let mut done = Vec::new();
        let mut iterations = 0;

        while let Some(record) = pending.pop() {
            iterations += 1;
            if iterations > self.config.max_iterations {
                warn!(
                    remaining = pending.len() + 1,
                    "self-intersection split hit its iteration cap"
                );
                done.push(record);
                done.append(&mut pending);
                break;
            }
            if record.is_degenerate() {
                done.push(record);
                continue;
            }
            match self.find_split(&record) {
                Some((ts, joint)) => {
                    trace!(offset = record.offset, span = record.span, ?ts, "self-intersection");
                    pending.extend(record.split_many(&ts, joint));
                }
                None => done.push(record),
            }
        }

        done.sort_by(|a, b| a.offset.total_cmp(&b.offset));
        done
    }

    /// Finds the first crossing of `record` with itself that splits it into
    /// smaller pieces, returning the local split parameters and the shared
    /// coordinate.
    fn find_split(&self, record: &SplitRecord) -> Option<(Vec<f64>, Coord)> {
        let curve = &record.curve;
        let poly = self.config.flatten(curve);
        for hit in poly.self_intersections() {
            let joint = Coord::from_point(&hit.point);
            let near_start = hit.t_self <= PARAM_EPS || joint == curve.start();
            let near_end = hit.t_other >= 1.0 - PARAM_EPS || joint == curve.end();
            if hit.t_other - hit.t_self <= PARAM_EPS {
                continue;
            }
            // The curve returns to one of its own endpoints: split only at
            // the interior parameter, on that endpoint's coordinate.
            let ts = match (near_start, near_end) {
                (true, true) => continue,
                (true, false) => return Some((vec![hit.t_other], curve.start())),
                (false, true) => return Some((vec![hit.t_self], curve.end())),
                (false, false) => vec![hit.t_self, hit.t_other],
            };
            return Some((ts, joint));
        }
        None
    }
}
