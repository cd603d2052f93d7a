//! Relaxation solver: the damped integration loop.
//!
//! `Initialized → Integrating → {Converged, Exhausted, Cancelled, Diverged}`.
//! Every terminal state produces a [`RelaxOutcome`]; only invalid setup is an
//! error, and it is reported by [`RelaxationSolver::new`] before any work.

use crate::convergence::{ConvergencePolicy, ExhaustReason, OverlapTolerance, Progress, Verdict};
use crate::error::{SolverError, SolverResult};
use crate::forces::{BoundaryRepulsion, ContactSpring, ForceSet, OverlapMetric, overlap_metric};
use crate::integrator::{DampedEuler, DampedVerlet, Integrator, IntegratorType, StepParams};
use crate::state::RelaxationState;
use crate::trajectory::{Retention, Trajectory};
use pk_core::{Circle, CircleId, Domain, Real, Vec2, ensure_finite_vec, ensure_positive};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Steps between debug log lines.
const LOG_EVERY: usize = 500;

/// Options for a relaxation run.
#[derive(Clone, Debug)]
pub struct RelaxOptions {
    /// Overlap tolerance, a length commensurate with the radii.
    pub eps: Real,
    /// Per-step velocity decay in (0, 1).
    pub damping: Real,
    /// Integration step size.
    pub dt: Real,
    /// Contact spring constant.
    pub stiffness: Real,
    /// Step budget.
    pub max_steps: usize,
    /// Wall spring constant; `None` lets circles cross the domain walls.
    pub boundary_stiffness: Option<Real>,
    pub integrator: IntegratorType,
    pub retention: Retention,
    /// Evaluate forces and the overlap metric with rayon.
    pub parallel: bool,
    /// Wall-clock budget.
    pub time_budget: Option<Duration>,
}

impl Default for RelaxOptions {
    fn default() -> Self {
        Self {
            eps: 1e-2,
            damping: 0.1,
            dt: 1.0,
            stiffness: 1.0,
            max_steps: 10_000,
            boundary_stiffness: None,
            integrator: IntegratorType::default(),
            retention: Retention::default(),
            parallel: false,
            time_budget: None,
        }
    }
}

impl RelaxOptions {
    pub fn validate(&self) -> SolverResult<()> {
        positive(self.eps, "eps must be positive")?;
        positive(self.dt, "dt must be positive")?;
        positive(self.stiffness, "stiffness must be positive")?;
        if !(self.damping > 0.0 && self.damping < 1.0) {
            return Err(SolverError::InvalidConfig {
                what: format!("damping must lie in (0, 1), got {}", self.damping),
            });
        }
        if self.max_steps == 0 {
            return Err(SolverError::InvalidConfig {
                what: "max_steps must be positive".to_string(),
            });
        }
        if let Some(kb) = self.boundary_stiffness {
            positive(kb, "boundary_stiffness must be positive")?;
        }
        if let Retention::Every(0) = self.retention {
            return Err(SolverError::InvalidConfig {
                what: "retention interval must be positive".to_string(),
            });
        }
        if self.time_budget.is_some_and(|b| b.is_zero()) {
            return Err(SolverError::InvalidConfig {
                what: "time_budget must be positive".to_string(),
            });
        }
        Ok(())
    }
}

fn positive(v: Real, what: &'static str) -> SolverResult<()> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(SolverError::InvalidConfig {
            what: format!("{what}, got {v}"),
        })
    }
}

/// Every circle needs a distinct [`CircleId`] for overlap reporting.
fn check_count(count: usize) -> SolverResult<()> {
    if count == 0 {
        return Err(SolverError::EmptyInput);
    }
    let max = CircleId::MAX_INDEX + 1;
    if count > max {
        return Err(SolverError::TooManyCircles { count, max });
    }
    Ok(())
}

/// Cooperative cancellation flag, checked once per step.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// How the loop ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelaxStatus {
    /// Max overlap within tolerance.
    Converged,
    /// Budget spent first; the configuration reached is still returned.
    Exhausted(ExhaustReason),
    /// The cancel token fired.
    Cancelled,
    /// The state became non-finite; integration stopped.
    Diverged,
}

impl RelaxStatus {
    pub fn is_converged(self) -> bool {
        matches!(self, RelaxStatus::Converged)
    }

    pub fn label(self) -> &'static str {
        match self {
            RelaxStatus::Converged => "converged",
            RelaxStatus::Exhausted(ExhaustReason::StepBudget) => "exhausted_steps",
            RelaxStatus::Exhausted(ExhaustReason::TimeBudget) => "exhausted_time",
            RelaxStatus::Cancelled => "cancelled",
            RelaxStatus::Diverged => "diverged",
        }
    }
}

/// Per-step progress report.
#[derive(Clone, Debug)]
pub struct RelaxProgressEvent {
    pub step: usize,
    pub max_steps: usize,
    pub max_overlap: Real,
    pub eps: Real,
    pub kinetic_energy: Real,
    pub elapsed_wall_s: f64,
}

/// Result of a solve.
#[derive(Clone, Debug)]
pub struct RelaxOutcome {
    pub status: RelaxStatus,
    /// Integration steps taken.
    pub steps: usize,
    /// Largest overlap in the final state; NaN after divergence.
    pub max_overlap: Real,
    /// `None` when nothing overlaps or after divergence.
    pub worst_pair: Option<(CircleId, CircleId)>,
    pub final_state: RelaxationState,
    pub trajectory: Trajectory,
    pub elapsed: Duration,
}

impl RelaxOutcome {
    pub fn converged(&self) -> bool {
        self.status.is_converged()
    }

    pub fn final_positions(&self) -> &[Vec2] {
        &self.final_state.positions
    }

    /// Move the caller's circles to the final positions.
    pub fn apply_to(&self, circles: &mut [Circle]) -> SolverResult<()> {
        if circles.len() != self.final_state.len() {
            return Err(SolverError::InvalidConfig {
                what: format!(
                    "cannot apply {} positions to {} circles",
                    self.final_state.len(),
                    circles.len()
                ),
            });
        }
        for (c, &p) in circles.iter_mut().zip(&self.final_state.positions) {
            c.center = p;
        }
        Ok(())
    }
}

/// Relaxation solver over a fixed set of circles.
pub struct RelaxationSolver {
    radii: Vec<Real>,
    initial: Vec<Vec2>,
    domain: Domain,
    forces: ForceSet,
    policy: Box<dyn ConvergencePolicy>,
    options: RelaxOptions,
    cancel: Option<CancelToken>,
}

impl RelaxationSolver {
    /// Validate the input and build the default force set (contact springs,
    /// plus walls when `boundary_stiffness` is set) and tolerance policy.
    pub fn new(circles: &[Circle], domain: Domain, options: RelaxOptions) -> SolverResult<Self> {
        options.validate()?;
        check_count(circles.len())?;

        let mut radii = Vec::with_capacity(circles.len());
        let mut initial = Vec::with_capacity(circles.len());
        for (index, c) in circles.iter().enumerate() {
            let center = ensure_finite_vec(c.center, "circle center")
                .map_err(|source| SolverError::InvalidCircle { index, source })?;
            let radius = ensure_positive(c.radius(), "circle radius")
                .map_err(|source| SolverError::InvalidCircle { index, source })?;
            initial.push(center);
            radii.push(radius);
        }

        let mut forces =
            ForceSet::new().with(ContactSpring::new(options.stiffness).parallel(options.parallel));
        if let Some(stiffness) = options.boundary_stiffness {
            forces = forces.with(BoundaryRepulsion { domain, stiffness });
        }

        let policy = OverlapTolerance {
            eps: options.eps,
            max_steps: options.max_steps,
            time_budget: options.time_budget,
        };

        Ok(Self {
            radii,
            initial,
            domain,
            forces,
            policy: Box::new(policy),
            options,
            cancel: None,
        })
    }

    /// Replace the termination policy.
    pub fn with_policy<P>(mut self, policy: P) -> Self
    where
        P: ConvergencePolicy + 'static,
    {
        self.policy = Box::new(policy);
        self
    }

    /// Replace the force set.
    pub fn with_forces(mut self, forces: ForceSet) -> Self {
        self.forces = forces;
        self
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn options(&self) -> &RelaxOptions {
        &self.options
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn len(&self) -> usize {
        self.radii.len()
    }

    pub fn is_empty(&self) -> bool {
        self.radii.is_empty()
    }

    pub fn solve(&self) -> RelaxOutcome {
        self.solve_with_progress(None)
    }

    pub fn solve_with_progress(
        &self,
        mut progress: Option<&mut dyn FnMut(&RelaxProgressEvent)>,
    ) -> RelaxOutcome {
        let opts = &self.options;
        let n = self.radii.len();
        let start = Instant::now();
        let params = StepParams {
            dt: opts.dt,
            damping: opts.damping,
        };

        info!(
            circles = n,
            eps = opts.eps,
            damping = opts.damping,
            dt = opts.dt,
            integrator = opts.integrator.label(),
            forces = ?self.forces.term_names(),
            "starting relaxation"
        );

        let mut state = RelaxationState::at_rest(self.initial.clone());
        let mut scratch = vec![Vec2::zeros(); n];
        let mut trajectory = Trajectory::new(n, opts.retention);
        let mut step = 0usize;
        let mut time = 0.0;

        trajectory.offer(step, time, &state);
        let mut metric = self.metric(&state);

        let status = loop {
            let verdict = self.policy.check(&Progress {
                step,
                max_overlap: metric.max_overlap,
                elapsed: start.elapsed(),
            });
            match verdict {
                Verdict::Converged => break RelaxStatus::Converged,
                Verdict::Exhausted(reason) => break RelaxStatus::Exhausted(reason),
                Verdict::Continue => {}
            }
            if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                break RelaxStatus::Cancelled;
            }

            match opts.integrator {
                IntegratorType::DampedEuler => {
                    DampedEuler.step(&self.forces, &self.radii, &mut state, &mut scratch, params)
                }
                IntegratorType::DampedVerlet => {
                    DampedVerlet.step(&self.forces, &self.radii, &mut state, &mut scratch, params)
                }
            }
            step += 1;
            time += opts.dt;
            trajectory.offer(step, time, &state);

            if !state.is_finite() {
                metric = OverlapMetric {
                    max_overlap: Real::NAN,
                    worst_pair: None,
                };
                break RelaxStatus::Diverged;
            }
            metric = self.metric(&state);

            if step % LOG_EVERY == 0 {
                debug!(
                    step,
                    max_overlap = metric.max_overlap,
                    kinetic_energy = state.kinetic_energy(),
                    "relaxation progress"
                );
            }
            if let Some(cb) = progress.as_mut() {
                cb(&RelaxProgressEvent {
                    step,
                    max_steps: opts.max_steps,
                    max_overlap: metric.max_overlap,
                    eps: opts.eps,
                    kinetic_energy: state.kinetic_energy(),
                    elapsed_wall_s: start.elapsed().as_secs_f64(),
                });
            }
        };

        trajectory.finish(step, time, &state);
        let elapsed = start.elapsed();

        match status {
            RelaxStatus::Converged => info!(
                steps = step,
                max_overlap = metric.max_overlap,
                elapsed_s = elapsed.as_secs_f64(),
                "relaxation converged"
            ),
            _ => warn!(
                status = status.label(),
                steps = step,
                max_overlap = metric.max_overlap,
                worst_pair = ?metric.worst_pair,
                "relaxation stopped before reaching tolerance"
            ),
        }

        RelaxOutcome {
            status,
            steps: step,
            max_overlap: metric.max_overlap,
            worst_pair: metric.worst_pair,
            final_state: state,
            trajectory,
            elapsed,
        }
    }

    fn metric(&self, state: &RelaxationState) -> OverlapMetric {
        overlap_metric(&self.radii, &state.positions, self.options.parallel)
    }
}

/// Build a solver with default forces and policy and run it.
pub fn relax(
    circles: &[Circle],
    domain: Domain,
    options: RelaxOptions,
) -> SolverResult<RelaxOutcome> {
    Ok(RelaxationSolver::new(circles, domain, options)?.solve())
}
