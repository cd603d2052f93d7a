//! Relaxation solver for circle packings.
//!
//! Takes an overlapping arrangement of circles with fixed radii and moves the
//! centers under a linear soft-contact repulsion, integrated with per-step
//! velocity damping, until the largest pairwise overlap drops below a length
//! tolerance or a step/time budget runs out.

pub mod convergence;
pub mod error;
pub mod forces;
pub mod integrator;
pub mod relax;
pub mod state;
pub mod trajectory;

pub use convergence::{ConvergencePolicy, ExhaustReason, OverlapTolerance, Progress, Verdict};
pub use error::{SolverError, SolverResult};
pub use forces::{
    BoundaryRepulsion, ContactSpring, ForceSet, ForceTerm, OverlapMetric, fallback_direction,
    overlap_metric,
};
pub use integrator::{DampedEuler, DampedVerlet, Integrator, IntegratorType, StepParams};
pub use relax::{
    CancelToken, RelaxOptions, RelaxOutcome, RelaxProgressEvent, RelaxStatus, RelaxationSolver,
    relax,
};
pub use state::RelaxationState;
pub use trajectory::{Retention, Trajectory, TrajectoryRow};
