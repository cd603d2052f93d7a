//! Run storage API.
//!
//! Layout: `<root>/<run_id>/manifest.json` and `<root>/<run_id>/trajectory.jsonl`.

use crate::types::{RunManifest, TrajectoryRecord};
use crate::{ResultsError, ResultsResult};
use pk_solver::Trajectory;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const MANIFEST_FILE: &str = "manifest.json";
const TRAJECTORY_FILE: &str = "trajectory.jsonl";

#[derive(Clone)]
pub struct RunStore {
    root_dir: PathBuf,
}

impl RunStore {
    pub fn new(root_dir: PathBuf) -> ResultsResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn run_dir(&self, run_id: &str) -> PathBuf {
        self.root_dir.join(run_id)
    }

    pub fn has_run(&self, run_id: &str) -> bool {
        self.run_dir(run_id).join(MANIFEST_FILE).exists()
    }

    /// Write manifest and trajectory; returns the run directory.
    pub fn save_run(
        &self,
        manifest: &RunManifest,
        trajectory: &Trajectory,
    ) -> ResultsResult<PathBuf> {
        let run_dir = self.run_dir(&manifest.run_id);
        fs::create_dir_all(&run_dir)?;

        let manifest_json = serde_json::to_string_pretty(manifest)?;
        fs::write(run_dir.join(MANIFEST_FILE), manifest_json)?;

        let file = fs::File::create(run_dir.join(TRAJECTORY_FILE))?;
        write_trajectory_jsonl(BufWriter::new(file), trajectory)?;

        Ok(run_dir)
    }

    pub fn load_manifest(&self, run_id: &str) -> ResultsResult<RunManifest> {
        if !self.has_run(run_id) {
            return Err(ResultsError::RunNotFound {
                run_id: run_id.to_string(),
            });
        }
        load_manifest_from(&self.run_dir(run_id))
    }

    pub fn load_trajectory(&self, run_id: &str) -> ResultsResult<Vec<TrajectoryRecord>> {
        let path = self.run_dir(run_id).join(TRAJECTORY_FILE);
        if !path.exists() {
            return Err(ResultsError::RunNotFound {
                run_id: run_id.to_string(),
            });
        }
        read_trajectory_jsonl(&path)
    }

    /// All stored runs, most recent first.
    pub fn list_runs(&self) -> ResultsResult<Vec<RunManifest>> {
        let mut runs = Vec::new();

        if !self.root_dir.exists() {
            return Ok(runs);
        }

        for entry in fs::read_dir(&self.root_dir)? {
            let entry = entry?;
            if entry.path().is_dir()
                && let Ok(manifest) = load_manifest_from(&entry.path())
            {
                runs.push(manifest);
            }
        }

        runs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(runs)
    }

    pub fn delete_run(&self, run_id: &str) -> ResultsResult<()> {
        let run_dir = self.run_dir(run_id);
        if run_dir.exists() {
            fs::remove_dir_all(run_dir)?;
        }
        Ok(())
    }
}

/// Read `manifest.json` from a run directory.
pub fn load_manifest_from(run_dir: &Path) -> ResultsResult<RunManifest> {
    let path = run_dir.join(MANIFEST_FILE);
    if !path.exists() {
        return Err(ResultsError::RunNotFound {
            run_id: run_dir.display().to_string(),
        });
    }
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// One JSON record per recorded row.
pub fn write_trajectory_jsonl<W: Write>(mut out: W, trajectory: &Trajectory) -> ResultsResult<()> {
    for row in trajectory.rows() {
        let line = serde_json::to_string(&TrajectoryRecord::from(row))?;
        writeln!(out, "{line}")?;
    }
    out.flush()?;
    Ok(())
}

pub fn read_trajectory_jsonl(path: &Path) -> ResultsResult<Vec<TrajectoryRecord>> {
    let content = fs::read_to_string(path)?;
    let mut records = Vec::new();
    for (lineno, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record: TrajectoryRecord = serde_json::from_str(line)?;
        let n = record.x.len();
        if record.vx.len() != n || record.vy.len() != n || record.y.len() != n {
            return Err(ResultsError::MalformedTrajectory {
                message: format!("line {} has uneven columns", lineno + 1),
            });
        }
        if records
            .last()
            .is_some_and(|prev: &TrajectoryRecord| prev.x.len() != n)
        {
            return Err(ResultsError::MalformedTrajectory {
                message: format!("line {} changes the circle count", lineno + 1),
            });
        }
        records.push(record);
    }
    Ok(records)
}
