//! Force model: the right-hand side of the relaxation dynamics.
//!
//! A [`ForceSet`] is a list of [`ForceTerm`]s whose contributions are summed
//! into one force vector per circle. Mass is unity throughout, so forces feed
//! the velocity update directly.

use pk_core::{CircleId, Domain, Real, Vec2};
use rayon::prelude::*;

/// Golden angle in radians; spreads fallback directions of successive pairs.
const GOLDEN_ANGLE: Real = 2.399_963_229_728_653;

/// Centers closer than this fraction of the radius sum count as coincident.
const COINCIDENT_REL: Real = 1e-12;

/// Collection of force terms (contact springs, walls, ...).
#[derive(Default)]
pub struct ForceSet {
    terms: Vec<Box<dyn ForceTerm>>,
}

impl ForceSet {
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Add a force term.
    pub fn with<T>(mut self, term: T) -> Self
    where
        T: ForceTerm + 'static,
    {
        self.terms.push(Box::new(term));
        self
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn term_names(&self) -> Vec<&'static str> {
        self.terms.iter().map(|t| t.name()).collect()
    }

    /// Zero `out`, then let every term add its contribution.
    pub fn evaluate(&self, radii: &[Real], positions: &[Vec2], out: &mut [Vec2]) {
        debug_assert_eq!(radii.len(), positions.len());
        debug_assert_eq!(out.len(), positions.len());
        for f in out.iter_mut() {
            *f = Vec2::zeros();
        }
        for term in &self.terms {
            term.accumulate(radii, positions, out);
        }
    }
}

/// A force source. Implementations add into `out[i]`, never overwrite.
pub trait ForceTerm: Send + Sync {
    fn name(&self) -> &'static str;

    fn accumulate(&self, radii: &[Real], positions: &[Vec2], out: &mut [Vec2]);
}

/// Deterministic separation direction for a pair `(i, j)`, `i < j`, whose
/// centers coincide. Pair `(0, 1)` separates along +x.
pub fn fallback_direction(i: usize, j: usize) -> Vec2 {
    let (lo, hi) = if i < j { (i, j) } else { (j, i) };
    let pair_index = hi * hi.saturating_sub(1) / 2 + lo;
    let theta = GOLDEN_ANGLE * pair_index as Real;
    Vec2::new(theta.cos(), theta.sin())
}

/// Force exerted on `j` by `i` (`i < j`); `i` receives the negation.
#[inline]
fn pair_push(i: usize, j: usize, ri: Real, rj: Real, ci: Vec2, cj: Vec2, k: Real) -> Option<Vec2> {
    let d = cj - ci;
    let dist = d.norm();
    let overlap = ri + rj - dist;
    if overlap <= 0.0 {
        return None;
    }
    let dir = if dist > COINCIDENT_REL * (ri + rj) {
        d / dist
    } else {
        fallback_direction(i, j)
    };
    Some(dir * (k * overlap))
}

/// Linear soft-contact repulsion: magnitude `stiffness · overlap` along the
/// line of centers, equal and opposite on the two circles.
#[derive(Clone, Copy, Debug)]
pub struct ContactSpring {
    pub stiffness: Real,
    /// Evaluate with rayon, one gather per circle.
    pub parallel: bool,
}

impl ContactSpring {
    pub fn new(stiffness: Real) -> Self {
        Self {
            stiffness,
            parallel: false,
        }
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    fn accumulate_serial(&self, radii: &[Real], positions: &[Vec2], out: &mut [Vec2]) {
        let n = positions.len();
        for i in 0..n {
            for j in (i + 1)..n {
                if let Some(f) = pair_push(
                    i,
                    j,
                    radii[i],
                    radii[j],
                    positions[i],
                    positions[j],
                    self.stiffness,
                ) {
                    out[i] -= f;
                    out[j] += f;
                }
            }
        }
    }

    // Each circle sums over all partners in index order, so the result does
    // not depend on how rayon splits the work.
    fn accumulate_parallel(&self, radii: &[Real], positions: &[Vec2], out: &mut [Vec2]) {
        let k = self.stiffness;
        out.par_iter_mut().enumerate().for_each(|(i, fi)| {
            let mut acc = Vec2::zeros();
            for j in 0..positions.len() {
                if j == i {
                    continue;
                }
                if i < j {
                    if let Some(f) = pair_push(i, j, radii[i], radii[j], positions[i], positions[j], k) {
                        acc -= f;
                    }
                } else if let Some(f) =
                    pair_push(j, i, radii[j], radii[i], positions[j], positions[i], k)
                {
                    acc += f;
                }
            }
            *fi += acc;
        });
    }
}

impl ForceTerm for ContactSpring {
    fn name(&self) -> &'static str {
        "contact_spring"
    }

    fn accumulate(&self, radii: &[Real], positions: &[Vec2], out: &mut [Vec2]) {
        if positions.len() < 2 {
            return;
        }
        if self.parallel {
            self.accumulate_parallel(radii, positions, out);
        } else {
            self.accumulate_serial(radii, positions, out);
        }
    }
}

/// Spring pushing circles back inside the domain walls.
#[derive(Clone, Copy, Debug)]
pub struct BoundaryRepulsion {
    pub domain: Domain,
    pub stiffness: Real,
}

impl ForceTerm for BoundaryRepulsion {
    fn name(&self) -> &'static str {
        "boundary_repulsion"
    }

    fn accumulate(&self, radii: &[Real], positions: &[Vec2], out: &mut [Vec2]) {
        for ((&r, &c), f) in radii.iter().zip(positions).zip(out.iter_mut()) {
            *f += self.stiffness * self.domain.penetration_at(c, r);
        }
    }
}

/// Largest pairwise overlap and the pair that attains it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlapMetric {
    pub max_overlap: Real,
    pub worst_pair: Option<(CircleId, CircleId)>,
}

impl OverlapMetric {
    const NONE: Self = Self {
        max_overlap: 0.0,
        worst_pair: None,
    };

    // Larger overlap wins; ties go to the lexicographically smaller pair so
    // the reduction is order-independent.
    fn pick(a: Self, b: Self) -> Self {
        match (a.worst_pair, b.worst_pair) {
            (None, _) => b,
            (_, None) => a,
            (Some(pa), Some(pb)) => {
                if b.max_overlap > a.max_overlap || (b.max_overlap == a.max_overlap && pb < pa) {
                    b
                } else {
                    a
                }
            }
        }
    }
}

fn row_metric(i: usize, radii: &[Real], positions: &[Vec2]) -> OverlapMetric {
    let mut best = OverlapMetric::NONE;
    for j in (i + 1)..positions.len() {
        let o = pk_core::circle::pair_overlap(radii[i], radii[j], positions[i], positions[j]);
        if o > best.max_overlap {
            best = OverlapMetric {
                max_overlap: o,
                worst_pair: Some((CircleId::from_index(i), CircleId::from_index(j))),
            };
        }
    }
    best
}

/// Convergence metric: `max over pairs of overlap(i, j)`; zero for n < 2.
pub fn overlap_metric(radii: &[Real], positions: &[Vec2], parallel: bool) -> OverlapMetric {
    let n = positions.len();
    if parallel {
        (0..n)
            .into_par_iter()
            .map(|i| row_metric(i, radii, positions))
            .reduce(|| OverlapMetric::NONE, OverlapMetric::pick)
    } else {
        (0..n)
            .map(|i| row_metric(i, radii, positions))
            .fold(OverlapMetric::NONE, OverlapMetric::pick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pk_core::vec2;
    use proptest::prelude::*;

    fn contact(parallel: bool) -> ForceSet {
        ForceSet::new().with(ContactSpring::new(1.0).parallel(parallel))
    }

    #[test]
    fn two_circles_repel_along_line_of_centers() {
        let radii = [0.5, 0.5];
        let positions = [vec2(0.0, 0.0), vec2(0.6, 0.0)];
        let mut out = [Vec2::zeros(); 2];
        contact(false).evaluate(&radii, &positions, &mut out);
        assert!((out[0].x + 0.4).abs() < 1e-12);
        assert!((out[1].x - 0.4).abs() < 1e-12);
        assert_eq!(out[0].y, 0.0);
        assert_eq!(out[1].y, 0.0);
    }

    #[test]
    fn separated_circles_feel_nothing() {
        let radii = [0.5, 0.5];
        let positions = [vec2(0.0, 0.0), vec2(1.0, 0.0)];
        let mut out = [vec2(9.0, 9.0); 2];
        contact(false).evaluate(&radii, &positions, &mut out);
        assert_eq!(out, [Vec2::zeros(); 2]);
    }

    #[test]
    fn coincident_centers_use_fallback_axis() {
        let radii = [0.3, 0.3];
        let positions = [vec2(0.0, 0.0), vec2(0.0, 0.0)];
        let mut out = [Vec2::zeros(); 2];
        contact(false).evaluate(&radii, &positions, &mut out);
        assert!(out.iter().all(|f| f.x.is_finite() && f.y.is_finite()));
        assert!((out[0].x + 0.6).abs() < 1e-12);
        assert!((out[1].x - 0.6).abs() < 1e-12);
        assert!(out[0].y.abs() < 1e-12);
    }

    #[test]
    fn fallback_direction_is_unit_and_stable() {
        assert_eq!(fallback_direction(0, 1), vec2(1.0, 0.0));
        assert_eq!(fallback_direction(1, 0), fallback_direction(0, 1));
        for (i, j) in [(0, 2), (1, 2), (3, 7)] {
            assert!((fallback_direction(i, j).norm() - 1.0).abs() < 1e-12);
        }
        assert_ne!(fallback_direction(0, 2), fallback_direction(1, 2));
    }

    #[test]
    fn boundary_term_pushes_inward() {
        let domain = Domain::new(vec2(0.0, 0.0), vec2(1.0, 1.0)).unwrap();
        let set = ForceSet::new().with(BoundaryRepulsion {
            domain,
            stiffness: 2.0,
        });
        let radii = [0.2];
        let positions = [vec2(0.1, 0.5)];
        let mut out = [Vec2::zeros()];
        set.evaluate(&radii, &positions, &mut out);
        assert!((out[0].x - 0.2).abs() < 1e-12);
        assert_eq!(set.term_names(), vec!["boundary_repulsion"]);
    }

    #[test]
    fn metric_reports_worst_pair() {
        let radii = [0.5, 0.5, 0.5];
        let positions = [vec2(0.0, 0.0), vec2(0.9, 0.0), vec2(5.0, 0.0)];
        let m = overlap_metric(&radii, &positions, false);
        assert!((m.max_overlap - 0.1).abs() < 1e-12);
        assert_eq!(
            m.worst_pair,
            Some((CircleId::from_index(0), CircleId::from_index(1)))
        );
        assert_eq!(overlap_metric(&radii, &positions, true), m);
    }

    #[test]
    fn metric_of_single_circle_is_zero() {
        let m = overlap_metric(&[1.0], &[vec2(0.0, 0.0)], false);
        assert_eq!(m.max_overlap, 0.0);
        assert_eq!(m.worst_pair, None);
    }

    fn cloud() -> impl Strategy<Value = (Vec<Real>, Vec<Vec2>)> {
        prop::collection::vec((0.05..0.5f64, -1.0..1.0f64, -1.0..1.0f64), 2..24).prop_map(|v| {
            let radii = v.iter().map(|t| t.0).collect();
            let positions = v.iter().map(|t| vec2(t.1, t.2)).collect();
            (radii, positions)
        })
    }

    proptest! {
        #[test]
        fn contact_forces_sum_to_zero((radii, positions) in cloud()) {
            let mut out = vec![Vec2::zeros(); positions.len()];
            contact(false).evaluate(&radii, &positions, &mut out);
            let net: Vec2 = out.iter().sum();
            prop_assert!(net.norm() < 1e-9);
        }

        #[test]
        fn parallel_matches_serial((radii, positions) in cloud()) {
            let mut serial = vec![Vec2::zeros(); positions.len()];
            let mut parallel = vec![Vec2::zeros(); positions.len()];
            contact(false).evaluate(&radii, &positions, &mut serial);
            contact(true).evaluate(&radii, &positions, &mut parallel);
            for (a, b) in serial.iter().zip(&parallel) {
                prop_assert!((a - b).norm() < 1e-9);
            }
        }
    }
}
