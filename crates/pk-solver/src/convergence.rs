//! Termination policy for the relaxation loop.
//!
//! A policy is a pure predicate over the loop's progress. It holds no state
//! and never touches the force model, so tolerance and budgets can be tuned or
//! replaced independently of the integration.

use pk_core::Real;
use std::time::Duration;

/// Snapshot handed to the policy after every step (and once before the first).
#[derive(Clone, Copy, Debug)]
pub struct Progress {
    /// Completed integration steps.
    pub step: usize,
    /// Largest pairwise overlap in the current configuration.
    pub max_overlap: Real,
    /// Wall-clock time since the solve started.
    pub elapsed: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExhaustReason {
    StepBudget,
    TimeBudget,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Continue,
    Converged,
    Exhausted(ExhaustReason),
}

pub trait ConvergencePolicy: Send + Sync {
    fn check(&self, progress: &Progress) -> Verdict;
}

/// Converged once `max_overlap <= eps`; exhausted after `max_steps` steps or
/// when the optional wall-clock budget is spent.
#[derive(Clone, Copy, Debug)]
pub struct OverlapTolerance {
    pub eps: Real,
    pub max_steps: usize,
    pub time_budget: Option<Duration>,
}

impl ConvergencePolicy for OverlapTolerance {
    fn check(&self, progress: &Progress) -> Verdict {
        if progress.max_overlap <= self.eps {
            return Verdict::Converged;
        }
        if progress.step >= self.max_steps {
            return Verdict::Exhausted(ExhaustReason::StepBudget);
        }
        if let Some(budget) = self.time_budget
            && progress.elapsed >= budget
        {
            return Verdict::Exhausted(ExhaustReason::TimeBudget);
        }
        Verdict::Continue
    }
}
