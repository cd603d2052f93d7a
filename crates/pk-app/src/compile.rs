//! Project schema to runtime types.

use pk_core::{Domain, vec2};
use pk_layout::{LayoutParams, RadiusSampler};
use pk_project::schema::{
    DomainDef, InclusionsDef, IntegratorDef, OutputDef, Project, RetentionDef, SolverDef,
};
use pk_results::EmitOptions;
use pk_solver::{IntegratorType, RelaxOptions, Retention};
use std::time::Duration;

use crate::error::{AppError, AppResult};

/// Everything a generate run needs, built from a [`Project`].
#[derive(Debug, Clone)]
pub struct CompiledProject {
    pub domain: Domain,
    pub layout: LayoutParams,
    pub relax: RelaxOptions,
    pub emit: EmitOptions,
}

pub fn compile_project(project: &Project) -> AppResult<CompiledProject> {
    pk_project::validate_project(project)?;
    let relax = relax_options(&project.solver)?;
    relax.validate()?;
    Ok(CompiledProject {
        domain: domain(&project.domain)?,
        layout: layout_params(&project.inclusions),
        relax,
        emit: emit_options(&project.output),
    })
}

fn domain(def: &DomainDef) -> AppResult<Domain> {
    Ok(Domain::new(
        vec2(def.lower[0], def.lower[1]),
        vec2(def.upper[0], def.upper[1]),
    )?)
}

fn layout_params(def: &InclusionsDef) -> LayoutParams {
    let mut sampler = RadiusSampler::new(def.radius_mean, def.radius_std_dev);
    if let Some(seed) = def.seed {
        sampler = sampler.with_seed(seed);
    }
    LayoutParams {
        count: def.count,
        sampler,
        target_area_fraction: def.target_area_fraction,
    }
}

fn relax_options(def: &SolverDef) -> AppResult<RelaxOptions> {
    let time_budget = def
        .time_budget_s
        .map(|s| {
            Duration::try_from_secs_f64(s)
                .map_err(|e| AppError::InvalidInput(format!("solver.time_budget_s = {s}: {e}")))
        })
        .transpose()?;

    Ok(RelaxOptions {
        eps: def.eps,
        damping: def.damping,
        dt: def.dt,
        stiffness: def.stiffness,
        max_steps: def.max_steps,
        boundary_stiffness: def.boundary_stiffness,
        integrator: match def.integrator {
            IntegratorDef::DampedEuler => IntegratorType::DampedEuler,
            IntegratorDef::DampedVerlet => IntegratorType::DampedVerlet,
        },
        retention: match def.retention {
            RetentionDef::Full => Retention::Full,
            RetentionDef::FinalOnly => Retention::FinalOnly,
            RetentionDef::Every { every } => Retention::Every(every),
        },
        parallel: def.parallel,
        time_budget,
    })
}

fn emit_options(def: &OutputDef) -> EmitOptions {
    EmitOptions {
        offset: vec2(def.offset[0], def.offset[1]),
        name_prefix: def.name_prefix.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pk_project::from_yaml_str;

    #[test]
    fn compiles_full_project() {
        let project = from_yaml_str(
            r#"
version: 1
name: c
domain: { lower: [0.0, -1.0], upper: [2.0, 1.0] }
inclusions: { count: 8, radius_mean: 0.1, radius_std_dev: 0.01, seed: 3 }
solver:
  eps: 0.001
  integrator: damped_verlet
  retention: { mode: every, every: 4 }
  boundary_stiffness: 2.0
  time_budget_s: 1.5
output: { offset: [0.5, 0.25], name_prefix: Fiber }
"#,
        )
        .unwrap();
        let compiled = compile_project(&project).unwrap();

        assert_eq!(compiled.domain.lower(), vec2(0.0, -1.0));
        assert_eq!(compiled.layout.count, 8);
        assert_eq!(compiled.layout.sampler.seed, Some(3));
        assert_eq!(compiled.relax.eps, 1e-3);
        assert_eq!(compiled.relax.integrator, IntegratorType::DampedVerlet);
        assert_eq!(compiled.relax.retention, Retention::Every(4));
        assert_eq!(compiled.relax.boundary_stiffness, Some(2.0));
        assert_eq!(compiled.relax.time_budget, Some(Duration::from_millis(1500)));
        assert_eq!(compiled.emit.offset, vec2(0.5, 0.25));
        assert_eq!(compiled.emit.name_prefix, "Fiber");
    }

    #[test]
    fn defaults_match_solver_defaults() {
        let project = from_yaml_str(
            "version: 1\nname: d\ndomain: { lower: [0.0, 0.0], upper: [1.0, 1.0] }\n\
             inclusions: { count: 2, radius_mean: 0.1 }\n",
        )
        .unwrap();
        let relax = compile_project(&project).unwrap().relax;
        let defaults = RelaxOptions::default();
        assert_eq!(relax.eps, defaults.eps);
        assert_eq!(relax.damping, defaults.damping);
        assert_eq!(relax.dt, defaults.dt);
        assert_eq!(relax.max_steps, defaults.max_steps);
        assert_eq!(relax.retention, defaults.retention);
        assert_eq!(relax.time_budget, None);
    }
}
