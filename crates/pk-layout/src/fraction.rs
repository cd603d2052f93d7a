//! Area-fraction bookkeeping.

use crate::error::{LayoutError, LayoutResult};
use pk_core::{Circle, Domain};

/// Total circle area over domain area. Overlaps and parts outside the domain
/// are counted in full.
pub fn area_fraction(circles: &[Circle], domain: &Domain) -> f64 {
    circles.iter().map(Circle::area).sum::<f64>() / domain.area()
}

/// Scale every radius by `sqrt(target / current)` so the area fraction
/// becomes `target`. Returns the ratio applied.
pub fn rescale_to_fraction(
    circles: &mut [Circle],
    domain: &Domain,
    target: f64,
) -> LayoutResult<f64> {
    if !(target > 0.0 && target < 1.0) {
        return Err(LayoutError::InvalidParam {
            what: format!("target area fraction must lie in (0, 1), got {target}"),
        });
    }
    let current = area_fraction(circles, domain);
    if !(current.is_finite() && current > 0.0) {
        return Err(LayoutError::Rescale {
            what: format!("current area fraction is {current}"),
        });
    }

    let ratio = (target / current).sqrt();
    for c in circles.iter_mut() {
        c.scale_radius(ratio);
    }
    Ok(ratio)
}
