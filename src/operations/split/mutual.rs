use tracing::{trace, warn};

use crate::geometry::{Coord, Curve, Polyline};

use super::{SplitConfig, SplitRecord, PARAM_EPS};

/// Distance in grid units within which an endpoint counts as lying on
/// another curve.
const TOUCH_DISTANCE: f64 = 1.0;

/// Splits two curves at their mutual crossings.
///
/// Both curves must already be free of self-intersections. Every crossing
/// becomes a joint shared by a fragment of each curve, with a bit-identical
/// grid coordinate on both sides.
pub struct SplitMutually {
    a: Curve,
    b: Curve,
    config: SplitConfig,
}

impl SplitMutually {
    /// Creates a new `SplitMutually` operation.
    #[must_use]
    pub fn new(a: Curve, b: Curve) -> Self {
        Self {
            a,
            b,
            config: SplitConfig::default(),
        }
    }

    /// Overrides the flattening and iteration settings.
    #[must_use]
    pub fn with_config(mut self, config: SplitConfig) -> Self {
        self.config = config;
        self
    }

    /// Executes the split, returning the fragments of each curve in order.
    #[must_use]
    pub fn execute(&self) -> (Vec<Curve>, Vec<Curve>) {
        let (a, b) = self.execute_records();
        (
            a.into_iter().map(|r| r.curve).collect(),
            b.into_iter().map(|r| r.curve).collect(),
        )
    }

    /// Executes the split, keeping each fragment's provenance.
    #[must_use]
    pub fn execute_records(&self) -> (Vec<SplitRecord>, Vec<SplitRecord>) {
        split_record_lists(
            vec![SplitRecord::root(self.a.clone())],
            vec![SplitRecord::root(self.b.clone())],
            &self.config,
        )
    }
}

/// Where a crossing falls on one fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HitLocation {
    Start,
    End,
    Interior,
}

impl HitLocation {
    fn classify(curve: &Curve, t: f64, snapped: Coord) -> Self {
        if t <= PARAM_EPS || snapped == curve.start() {
            Self::Start
        } else if t >= 1.0 - PARAM_EPS || snapped == curve.end() {
            Self::End
        } else {
            Self::Interior
        }
    }

    fn endpoint(self, curve: &Curve) -> Option<Coord> {
        match self {
            Self::Start => Some(curve.start()),
            Self::End => Some(curve.end()),
            Self::Interior => None,
        }
    }
}

/// A crossing that requires splitting at least one of the two fragments.
struct ActionableHit {
    index_a: usize,
    index_b: usize,
    t_a: Option<f64>,
    t_b: Option<f64>,
    joint: Coord,
}

/// Mutually splits two chains of fragments until no fragment of one crosses
/// the interior of a fragment of the other.
///
/// Both lists stay ordered: split pieces replace their parent in place.
pub(crate) fn split_record_lists(
    mut a: Vec<SplitRecord>,
    mut b: Vec<SplitRecord>,
    config: &SplitConfig,
) -> (Vec<SplitRecord>, Vec<SplitRecord>) {
    let mut polys_a: Vec<Polyline> = a.iter().map(|r| config.flatten(&r.curve)).collect();
    let mut polys_b: Vec<Polyline> = b.iter().map(|r| config.flatten(&r.curve)).collect();
    let mut iterations = 0;

    while let Some(hit) = find_actionable_hit(&a, &polys_a, &b, &polys_b) {
        iterations += 1;
        if iterations > config.max_iterations {
            warn!(
                fragments_a = a.len(),
                fragments_b = b.len(),
                "mutual split hit its iteration cap"
            );
            break;
        }
        trace!(t_a = ?hit.t_a, t_b = ?hit.t_b, x = hit.joint.x, y = hit.joint.y, "mutual split");

        if let Some(t) = hit.t_b {
            replace_in_place(&mut b, &mut polys_b, hit.index_b, t, hit.joint, config);
        }
        if let Some(t) = hit.t_a {
            replace_in_place(&mut a, &mut polys_a, hit.index_a, t, hit.joint, config);
        }
    }

    (a, b)
}

fn replace_in_place(
    records: &mut Vec<SplitRecord>,
    polys: &mut Vec<Polyline>,
    index: usize,
    t: f64,
    joint: Coord,
    config: &SplitConfig,
) {
    let pieces = records[index].split_many(&[t], joint);
    let piece_polys: Vec<Polyline> = pieces.iter().map(|r| config.flatten(&r.curve)).collect();
    records.splice(index..=index, pieces);
    polys.splice(index..=index, piece_polys);
}

fn find_actionable_hit(
    a: &[SplitRecord],
    polys_a: &[Polyline],
    b: &[SplitRecord],
    polys_b: &[Polyline],
) -> Option<ActionableHit> {
    for (index_a, (ra, pa)) in a.iter().zip(polys_a).enumerate() {
        if ra.is_degenerate() {
            continue;
        }
        let box_a = ra.curve.bounding_box();
        for (index_b, (rb, pb)) in b.iter().zip(polys_b).enumerate() {
            if rb.is_degenerate() || !box_a.overlaps(&rb.curve.bounding_box()) {
                continue;
            }
            for crossing in pa.all_intersections(pb) {
                let snapped = Coord::from_point(&crossing.point);
                let loc_a = HitLocation::classify(&ra.curve, crossing.t_self, snapped);
                let loc_b = HitLocation::classify(&rb.curve, crossing.t_other, snapped);
                if loc_a != HitLocation::Interior && loc_b != HitLocation::Interior {
                    continue;
                }
                let joint = match (loc_a.endpoint(&ra.curve), loc_b.endpoint(&rb.curve)) {
                    (Some(end), _) | (None, Some(end)) => end,
                    (None, None) => Coord::from_point(&nalgebra::center(
                        &ra.curve.evaluate(crossing.t_self),
                        &rb.curve.evaluate(crossing.t_other),
                    )),
                };
                let t_a = (loc_a == HitLocation::Interior).then_some(crossing.t_self);
                let t_b = (loc_b == HitLocation::Interior).then_some(crossing.t_other);
                // A joint landing on a fragment's own endpoint would leave a
                // zero-length piece behind; treat that side as already split.
                let t_a = t_a.filter(|_| joint != ra.curve.start() && joint != ra.curve.end());
                let t_b = t_b.filter(|_| joint != rb.curve.start() && joint != rb.curve.end());
                if t_a.is_none() && t_b.is_none() {
                    continue;
                }
                return Some(ActionableHit {
                    index_a,
                    index_b,
                    t_a,
                    t_b,
                    joint,
                });
            }
            if let Some((t, joint)) = endpoint_touch(&ra.curve, &rb.curve, pb) {
                return Some(ActionableHit {
                    index_a,
                    index_b,
                    t_a: None,
                    t_b: Some(t),
                    joint,
                });
            }
            if let Some((t, joint)) = endpoint_touch(&rb.curve, &ra.curve, pa) {
                return Some(ActionableHit {
                    index_a,
                    index_b,
                    t_a: Some(t),
                    t_b: None,
                    joint,
                });
            }
        }
    }
    None
}

/// An endpoint of `from` lying on the interior of `onto`, as the local
/// parameter on `onto` and the endpoint coordinate.
///
/// An endpoint resting on a curved edge usually misses the flattened chord,
/// so the crossing scan alone never sees it.
fn endpoint_touch(from: &Curve, onto: &Curve, onto_poly: &Polyline) -> Option<(f64, Coord)> {
    [from.start(), from.end()].into_iter().find_map(|end| {
        if end == onto.start() || end == onto.end() {
            return None;
        }
        let hit = onto_poly.find_closest_point(&end.to_point())?;
        let interior = hit.t > PARAM_EPS && hit.t < 1.0 - PARAM_EPS;
        (interior && hit.distance <= TOUCH_DISTANCE).then_some((hit.t, end))
    })
}
