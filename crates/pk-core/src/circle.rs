//! Circular inclusion model.

use crate::error::PkResult;
use crate::numeric::{Real, Vec2, ensure_finite_vec, ensure_positive, vec2};
use std::f64::consts::PI;

/// A 2-D disk: one inclusion in cross-section.
///
/// The radius is fixed once the circle has been scaled into place; the solver
/// only ever moves `center`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Circle {
    pub center: Vec2,
    radius: Real,
}

impl Circle {
    /// Create a circle, rejecting non-finite centers and non-positive radii.
    pub fn new(center: Vec2, radius: Real) -> PkResult<Self> {
        let center = ensure_finite_vec(center, "circle center")?;
        let radius = ensure_positive(radius, "circle radius")?;
        Ok(Self { center, radius })
    }

    pub fn at(x: Real, y: Real, radius: Real) -> PkResult<Self> {
        Self::new(vec2(x, y), radius)
    }

    #[inline]
    pub fn radius(&self) -> Real {
        self.radius
    }

    /// `π·r²`
    #[inline]
    pub fn area(&self) -> Real {
        PI * self.radius * self.radius
    }

    /// Euclidean distance between centers.
    #[inline]
    pub fn distance(&self, other: &Circle) -> Real {
        (self.center - other.center).norm()
    }

    /// Interpenetration depth, clamped at zero for touching or separated circles.
    #[inline]
    pub fn overlap(&self, other: &Circle) -> Real {
        pair_overlap(self.radius, other.radius, self.center, other.center)
    }

    /// Multiply the radius in place. The factor must be positive.
    pub fn scale_radius(&mut self, factor: Real) {
        debug_assert!(factor > 0.0, "radius scale factor must be positive");
        self.radius *= factor;
    }
}

/// Overlap of two disks given raw radii and centers.
#[inline]
pub fn pair_overlap(ri: Real, rj: Real, ci: Vec2, cj: Vec2) -> Real {
    (ri + rj - (ci - cj).norm()).max(0.0)
}
