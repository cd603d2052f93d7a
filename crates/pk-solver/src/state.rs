//! Owned relaxation state.
//!
//! Positions and velocities live in two contiguous buffers indexed by circle
//! id. Radii are not part of the state; they never change during a solve.

use pk_core::{Circle, Real, Vec2};

#[derive(Clone, Debug, PartialEq)]
pub struct RelaxationState {
    pub positions: Vec<Vec2>,
    pub velocities: Vec<Vec2>,
}

impl RelaxationState {
    /// Start from the given centers at rest.
    pub fn at_rest(positions: Vec<Vec2>) -> Self {
        let velocities = vec![Vec2::zeros(); positions.len()];
        Self {
            positions,
            velocities,
        }
    }

    pub fn from_circles(circles: &[Circle]) -> Self {
        Self::at_rest(circles.iter().map(|c| c.center).collect())
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Sum of `½|v|²` over all circles (unit mass).
    pub fn kinetic_energy(&self) -> Real {
        0.5 * self.velocities.iter().map(|v| v.norm_squared()).sum::<Real>()
    }

    pub fn is_finite(&self) -> bool {
        self.positions
            .iter()
            .chain(self.velocities.iter())
            .all(|v| v.x.is_finite() && v.y.is_finite())
    }

    /// Flatten into `[vx.., vy.., x.., y..]`, 4n values.
    pub fn to_row(&self) -> Vec<Real> {
        let n = self.len();
        let mut row = Vec::with_capacity(4 * n);
        row.extend(self.velocities.iter().map(|v| v.x));
        row.extend(self.velocities.iter().map(|v| v.y));
        row.extend(self.positions.iter().map(|p| p.x));
        row.extend(self.positions.iter().map(|p| p.y));
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pk_core::vec2;

    #[test]
    fn row_layout_is_vx_vy_x_y() {
        let mut state = RelaxationState::at_rest(vec![vec2(1.0, 2.0), vec2(3.0, 4.0)]);
        state.velocities[0] = vec2(0.1, 0.2);
        state.velocities[1] = vec2(0.3, 0.4);
        assert_eq!(
            state.to_row(),
            vec![0.1, 0.3, 0.2, 0.4, 1.0, 3.0, 2.0, 4.0]
        );
    }

    #[test]
    fn starts_at_rest() {
        let state = RelaxationState::at_rest(vec![vec2(1.0, 2.0)]);
        assert_eq!(state.kinetic_energy(), 0.0);
        assert!(state.is_finite());
    }
}
