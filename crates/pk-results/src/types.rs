//! Result data types.

use pk_solver::TrajectoryRow;
use serde::{Deserialize, Serialize};

pub type RunId = String;

/// Summary written next to every stored trajectory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunManifest {
    pub run_id: RunId,
    pub project_name: String,
    /// Seed the radii were drawn with; rerunning the project with it
    /// reproduces the run.
    pub seed: u64,
    pub timestamp: String,
    pub solver_version: String,
    /// `converged`, `exhausted_steps`, `exhausted_time`, `cancelled` or `diverged`.
    pub status: String,
    pub steps: usize,
    pub max_overlap: f64,
    pub n_circles: usize,
    pub trajectory_rows: usize,
    /// Circles written to the geometry file.
    pub retained: usize,
    /// Circles left out of the geometry file (center outside the domain).
    pub skipped: usize,
}

/// One line of `trajectory.jsonl`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrajectoryRecord {
    pub step: usize,
    pub time: f64,
    pub vx: Vec<f64>,
    pub vy: Vec<f64>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl TrajectoryRecord {
    pub fn n_circles(&self) -> usize {
        self.x.len()
    }
}

impl From<&TrajectoryRow> for TrajectoryRecord {
    fn from(row: &TrajectoryRow) -> Self {
        Self {
            step: row.step,
            time: row.time,
            vx: row.vx().to_vec(),
            vy: row.vy().to_vec(),
            x: row.x().to_vec(),
            y: row.y().to_vec(),
        }
    }
}
