//! Recorded relaxation history.

use crate::state::RelaxationState;
use pk_core::{Real, Vec2};

/// Which steps are kept in the [`Trajectory`].
///
/// The final state is always recorded, whatever the mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Retention {
    /// Every step, starting with the initial state (step 0).
    #[default]
    Full,
    /// Every k-th step (decimation), plus step 0 and the final step.
    Every(usize),
    /// Only the final state.
    FinalOnly,
}

/// One recorded state.
///
/// `values` holds `[vx_0..vx_{n-1}, vy_0..vy_{n-1}, x_0..x_{n-1}, y_0..y_{n-1}]`.
#[derive(Clone, Debug, PartialEq)]
pub struct TrajectoryRow {
    pub step: usize,
    pub time: Real,
    values: Vec<Real>,
}

impl TrajectoryRow {
    pub fn from_state(step: usize, time: Real, state: &RelaxationState) -> Self {
        Self {
            step,
            time,
            values: state.to_row(),
        }
    }

    /// Number of circles in the row.
    pub fn n(&self) -> usize {
        self.values.len() / 4
    }

    /// All 4n values in column order.
    pub fn values(&self) -> &[Real] {
        &self.values
    }

    pub fn vx(&self) -> &[Real] {
        let n = self.n();
        &self.values[..n]
    }

    pub fn vy(&self) -> &[Real] {
        let n = self.n();
        &self.values[n..2 * n]
    }

    pub fn x(&self) -> &[Real] {
        let n = self.n();
        &self.values[2 * n..3 * n]
    }

    pub fn y(&self) -> &[Real] {
        let n = self.n();
        &self.values[3 * n..]
    }

    pub fn positions(&self) -> Vec<Vec2> {
        self.x()
            .iter()
            .zip(self.y())
            .map(|(&x, &y)| Vec2::new(x, y))
            .collect()
    }
}

/// Sequence of recorded states, oldest first.
#[derive(Clone, Debug, PartialEq)]
pub struct Trajectory {
    n: usize,
    retention: Retention,
    rows: Vec<TrajectoryRow>,
}

impl Trajectory {
    pub fn new(n: usize, retention: Retention) -> Self {
        Self {
            n,
            retention,
            rows: Vec::new(),
        }
    }

    pub fn n_circles(&self) -> usize {
        self.n
    }

    pub fn retention(&self) -> Retention {
        self.retention
    }

    pub fn rows(&self) -> &[TrajectoryRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first(&self) -> Option<&TrajectoryRow> {
        self.rows.first()
    }

    pub fn last(&self) -> Option<&TrajectoryRow> {
        self.rows.last()
    }

    /// Positions of the last recorded row.
    pub fn final_positions(&self) -> Option<Vec<Vec2>> {
        self.last().map(TrajectoryRow::positions)
    }

    /// Record the state reached after `step` if the retention mode keeps it.
    pub(crate) fn offer(&mut self, step: usize, time: Real, state: &RelaxationState) {
        let keep = match self.retention {
            Retention::Full => true,
            Retention::Every(k) => step % k.max(1) == 0,
            Retention::FinalOnly => false,
        };
        if keep {
            self.rows.push(TrajectoryRow::from_state(step, time, state));
        }
    }

    /// Record the terminal state unless it is already the last row.
    pub(crate) fn finish(&mut self, step: usize, time: Real, state: &RelaxationState) {
        if self.last().is_none_or(|row| row.step != step) {
            self.rows.push(TrajectoryRow::from_state(step, time, state));
        }
    }
}
