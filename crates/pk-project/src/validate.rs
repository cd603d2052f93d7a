//! Project validation logic.

use crate::schema::{
    DomainDef, InclusionsDef, LATEST_VERSION, OutputDef, Project, RetentionDef, SolverDef,
};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_project(project: &Project) -> Result<(), ValidationError> {
    if project.version == 0 || project.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: project.version,
        });
    }
    validate_domain(&project.domain)?;
    validate_inclusions(&project.inclusions)?;
    validate_solver(&project.solver)?;
    validate_output(&project.output)?;
    Ok(())
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn positive(field: &str, v: f64) -> Result<(), ValidationError> {
    if !v.is_finite() || v <= 0.0 {
        return Err(invalid(field, v, "must be positive and finite"));
    }
    Ok(())
}

fn validate_domain(domain: &DomainDef) -> Result<(), ValidationError> {
    for (axis, (lo, hi)) in ["x", "y"]
        .iter()
        .zip(domain.lower.iter().zip(domain.upper.iter()))
    {
        if !lo.is_finite() || !hi.is_finite() {
            return Err(invalid(
                &format!("domain {axis} bounds"),
                format!("[{lo}, {hi}]"),
                "must be finite",
            ));
        }
        if lo >= hi {
            return Err(invalid(
                &format!("domain {axis} bounds"),
                format!("[{lo}, {hi}]"),
                "lower must be below upper",
            ));
        }
    }
    Ok(())
}

fn validate_inclusions(inc: &InclusionsDef) -> Result<(), ValidationError> {
    if inc.count == 0 {
        return Err(invalid("inclusions.count", inc.count, "must be at least 1"));
    }
    positive("inclusions.radius_mean", inc.radius_mean)?;
    if !inc.radius_std_dev.is_finite() || inc.radius_std_dev < 0.0 {
        return Err(invalid(
            "inclusions.radius_std_dev",
            inc.radius_std_dev,
            "must be non-negative and finite",
        ));
    }
    if let Some(vf) = inc.target_area_fraction
        && !(vf > 0.0 && vf < 1.0)
    {
        return Err(invalid(
            "inclusions.target_area_fraction",
            vf,
            "must lie in (0, 1)",
        ));
    }
    Ok(())
}

fn validate_solver(solver: &SolverDef) -> Result<(), ValidationError> {
    positive("solver.eps", solver.eps)?;
    positive("solver.dt", solver.dt)?;
    positive("solver.stiffness", solver.stiffness)?;
    if solver.max_steps == 0 {
        return Err(invalid("solver.max_steps", 0, "must be at least 1"));
    }
    if !(solver.damping > 0.0 && solver.damping < 1.0) {
        return Err(invalid("solver.damping", solver.damping, "must lie in (0, 1)"));
    }
    if let Some(k) = solver.boundary_stiffness {
        positive("solver.boundary_stiffness", k)?;
    }
    if let Some(t) = solver.time_budget_s {
        positive("solver.time_budget_s", t)?;
    }
    if let RetentionDef::Every { every: 0 } = solver.retention {
        return Err(invalid("solver.retention.every", 0, "must be at least 1"));
    }
    Ok(())
}

fn validate_output(output: &OutputDef) -> Result<(), ValidationError> {
    if output.offset.iter().any(|v| !v.is_finite()) {
        return Err(invalid(
            "output.offset",
            format!("{:?}", output.offset),
            "must be finite",
        ));
    }
    if output.name_prefix.trim().is_empty() {
        return Err(invalid("output.name_prefix", "", "must not be empty"));
    }
    Ok(())
}
