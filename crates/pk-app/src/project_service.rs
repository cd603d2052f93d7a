//! Project loading, saving, validation, and introspection.

use pk_project::schema::Project;
use std::path::Path;

use crate::error::AppResult;

/// One-screen description of a project.
#[derive(Debug, Clone)]
pub struct ProjectSummary {
    pub name: String,
    pub count: usize,
    pub domain_size: [f64; 2],
    pub radius_mean: f64,
    pub target_area_fraction: Option<f64>,
    pub integrator: &'static str,
    pub eps: f64,
    pub max_steps: usize,
}

/// Load and validate a project from a YAML file.
pub fn load_project(path: &Path) -> AppResult<Project> {
    Ok(pk_project::load_yaml(path)?)
}

/// Validate, then save a project to a YAML file.
pub fn save_project(path: &Path, project: &Project) -> AppResult<()> {
    Ok(pk_project::save_yaml(path, project)?)
}

pub fn validate_project(project: &Project) -> AppResult<()> {
    Ok(pk_project::validate_project(project)?)
}

pub fn summarize(project: &Project) -> ProjectSummary {
    let d = &project.domain;
    ProjectSummary {
        name: project.name.clone(),
        count: project.inclusions.count,
        domain_size: [d.upper[0] - d.lower[0], d.upper[1] - d.lower[1]],
        radius_mean: project.inclusions.radius_mean,
        target_area_fraction: project.inclusions.target_area_fraction,
        integrator: match project.solver.integrator {
            pk_project::IntegratorDef::DampedEuler => "damped_euler",
            pk_project::IntegratorDef::DampedVerlet => "damped_verlet",
        },
        eps: project.solver.eps,
        max_steps: project.solver.max_steps,
    }
}
