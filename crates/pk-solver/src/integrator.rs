//! Fixed-step damped integrators.

use crate::forces::ForceSet;
use crate::state::RelaxationState;
use pk_core::{Real, Vec2};

/// Step size and per-step velocity decay.
#[derive(Clone, Copy, Debug)]
pub struct StepParams {
    pub dt: Real,
    /// Multiplicative velocity decay in (0, 1), applied once per step.
    pub damping: Real,
}

/// Trait for relaxation integrators.
pub trait Integrator {
    /// Advance `state` by one step in place. `scratch` has one slot per circle
    /// and holds the forces used for the last velocity update on return.
    fn step(
        &self,
        forces: &ForceSet,
        radii: &[Real],
        state: &mut RelaxationState,
        scratch: &mut [Vec2],
        params: StepParams,
    );
}

/// Integrator selection for a solve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IntegratorType {
    /// `v ← d·(v + f·dt)`, `x ← x + v·dt` (one force evaluation per step).
    #[default]
    DampedEuler,
    /// Velocity-Verlet kick-drift-kick followed by damping (two force
    /// evaluations per step).
    DampedVerlet,
}

impl IntegratorType {
    pub fn label(self) -> &'static str {
        match self {
            IntegratorType::DampedEuler => "damped_euler",
            IntegratorType::DampedVerlet => "damped_verlet",
        }
    }
}

/// Explicit damped update: semi-implicit Euler with velocity decay.
#[derive(Clone, Copy, Debug)]
pub struct DampedEuler;

impl Integrator for DampedEuler {
    fn step(
        &self,
        forces: &ForceSet,
        radii: &[Real],
        state: &mut RelaxationState,
        scratch: &mut [Vec2],
        params: StepParams,
    ) {
        let StepParams { dt, damping } = params;
        forces.evaluate(radii, &state.positions, scratch);

        for (v, f) in state.velocities.iter_mut().zip(scratch.iter()) {
            *v = damping * (*v + dt * f);
        }
        for (x, v) in state.positions.iter_mut().zip(state.velocities.iter()) {
            *x += dt * v;
        }
    }
}

/// Velocity-Verlet with damping applied after the second kick.
#[derive(Clone, Copy, Debug)]
pub struct DampedVerlet;

impl Integrator for DampedVerlet {
    fn step(
        &self,
        forces: &ForceSet,
        radii: &[Real],
        state: &mut RelaxationState,
        scratch: &mut [Vec2],
        params: StepParams,
    ) {
        let StepParams { dt, damping } = params;
        let half_dt = 0.5 * dt;

        // Kick: v_n+1/2 = v_n + (dt/2) f(x_n)
        forces.evaluate(radii, &state.positions, scratch);
        for (v, f) in state.velocities.iter_mut().zip(scratch.iter()) {
            *v += half_dt * f;
        }

        // Drift: x_n+1 = x_n + dt v_n+1/2
        for (x, v) in state.positions.iter_mut().zip(state.velocities.iter()) {
            *x += dt * v;
        }

        // Kick: v_n+1 = d (v_n+1/2 + (dt/2) f(x_n+1))
        forces.evaluate(radii, &state.positions, scratch);
        for (v, f) in state.velocities.iter_mut().zip(scratch.iter()) {
            *v = damping * (*v + half_dt * f);
        }
    }
}
