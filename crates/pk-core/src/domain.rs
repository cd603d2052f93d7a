//! Axis-aligned rectangular domain.

use crate::circle::Circle;
use crate::error::{PkError, PkResult};
use crate::numeric::{Real, Vec2, ensure_finite_vec};

/// Rectangle `[lower.x, upper.x] × [lower.y, upper.y]`, constant for a solve.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Domain {
    lower: Vec2,
    upper: Vec2,
}

impl Domain {
    pub fn new(lower: Vec2, upper: Vec2) -> PkResult<Self> {
        let lower = ensure_finite_vec(lower, "domain lower corner")?;
        let upper = ensure_finite_vec(upper, "domain upper corner")?;
        if lower.x >= upper.x || lower.y >= upper.y {
            return Err(PkError::DegenerateDomain {
                lower_x: lower.x,
                lower_y: lower.y,
                upper_x: upper.x,
                upper_y: upper.y,
            });
        }
        Ok(Self { lower, upper })
    }

    pub fn lower(&self) -> Vec2 {
        self.lower
    }

    pub fn upper(&self) -> Vec2 {
        self.upper
    }

    pub fn width(&self) -> Real {
        self.upper.x - self.lower.x
    }

    pub fn height(&self) -> Real {
        self.upper.y - self.lower.y
    }

    pub fn area(&self) -> Real {
        self.width() * self.height()
    }

    /// Strict interior test: points on the boundary are outside.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x > self.lower.x && p.x < self.upper.x && p.y > self.lower.y && p.y < self.upper.y
    }

    /// Push-back vector for a circle that sticks out past one or more edges.
    ///
    /// Each component is the depth by which the disk crosses the corresponding
    /// wall, signed to point back into the domain. Zero when the disk is fully
    /// inside.
    pub fn boundary_penetration(&self, circle: &Circle) -> Vec2 {
        self.penetration_at(circle.center, circle.radius())
    }

    /// [`Domain::boundary_penetration`] for a raw center and radius.
    pub fn penetration_at(&self, c: Vec2, r: Real) -> Vec2 {
        let mut push = Vec2::zeros();

        let left = self.lower.x - (c.x - r);
        let right = (c.x + r) - self.upper.x;
        if left > 0.0 {
            push.x += left;
        }
        if right > 0.0 {
            push.x -= right;
        }

        let bottom = self.lower.y - (c.y - r);
        let top = (c.y + r) - self.upper.y;
        if bottom > 0.0 {
            push.y += bottom;
        }
        if top > 0.0 {
            push.y -= top;
        }

        push
    }
}
