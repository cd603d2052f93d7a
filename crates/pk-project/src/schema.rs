//! Project schema definitions.

use serde::{Deserialize, Serialize};

pub const LATEST_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub version: u32,
    pub name: String,
    pub domain: DomainDef,
    pub inclusions: InclusionsDef,
    #[serde(default)]
    pub solver: SolverDef,
    #[serde(default)]
    pub output: OutputDef,
}

/// Axis-aligned rectangle `[lower, upper]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DomainDef {
    pub lower: [f64; 2],
    pub upper: [f64; 2],
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InclusionsDef {
    pub count: usize,
    pub radius_mean: f64,
    #[serde(default)]
    pub radius_std_dev: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_area_fraction: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum IntegratorDef {
    #[default]
    DampedEuler,
    DampedVerlet,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RetentionDef {
    #[default]
    Full,
    FinalOnly,
    Every {
        every: usize,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SolverDef {
    #[serde(default = "default_eps")]
    pub eps: f64,
    #[serde(default = "default_damping")]
    pub damping: f64,
    #[serde(default = "default_dt")]
    pub dt: f64,
    #[serde(default = "default_stiffness")]
    pub stiffness: f64,
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
    #[serde(default)]
    pub integrator: IntegratorDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boundary_stiffness: Option<f64>,
    #[serde(default)]
    pub retention: RetentionDef,
    #[serde(default)]
    pub parallel: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_budget_s: Option<f64>,
}

impl Default for SolverDef {
    fn default() -> Self {
        Self {
            eps: default_eps(),
            damping: default_damping(),
            dt: default_dt(),
            stiffness: default_stiffness(),
            max_steps: default_max_steps(),
            integrator: IntegratorDef::default(),
            boundary_stiffness: None,
            retention: RetentionDef::default(),
            parallel: false,
            time_budget_s: None,
        }
    }
}

fn default_eps() -> f64 {
    1e-2
}

fn default_damping() -> f64 {
    0.1
}

fn default_dt() -> f64 {
    1.0
}

fn default_stiffness() -> f64 {
    1.0
}

fn default_max_steps() -> usize {
    10_000
}

/// Geometry-file emission settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputDef {
    #[serde(default)]
    pub offset: [f64; 2],
    #[serde(default = "default_name_prefix")]
    pub name_prefix: String,
}

impl Default for OutputDef {
    fn default() -> Self {
        Self {
            offset: [0.0, 0.0],
            name_prefix: default_name_prefix(),
        }
    }
}

fn default_name_prefix() -> String {
    "Cylinder".to_string()
}
