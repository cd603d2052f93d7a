use crate::PkError;
use nalgebra::Vector2;

/// Floating point type used throughout system
pub type Real = f64;

/// 2-D vector used for centers, velocities and forces.
pub type Vec2 = Vector2<Real>;

/// Shorthand constructor for [`Vec2`].
#[inline]
pub fn vec2(x: Real, y: Real) -> Vec2 {
    Vec2::new(x, y)
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, PkError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(PkError::NonFinite { what, value: v })
    }
}

/// Finite and strictly greater than zero.
pub fn ensure_positive(v: Real, what: &'static str) -> Result<Real, PkError> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(PkError::NonPositive { what, value: v })
    }
}

pub fn ensure_finite_vec(v: Vec2, what: &'static str) -> Result<Vec2, PkError> {
    ensure_finite(v.x, what)?;
    ensure_finite(v.y, what)?;
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn ensure_positive_rejects_zero_and_negative() {
        assert!(ensure_positive(0.0, "radius").is_err());
        assert!(ensure_positive(-1.0, "radius").is_err());
        assert!(ensure_positive(Real::INFINITY, "radius").is_err());
        assert_eq!(ensure_positive(0.25, "radius").unwrap(), 0.25);
    }
}
