//! Generate pipeline: layout, relaxation, geometry emission and run storage.

use std::path::{Path, PathBuf};
use std::time::Instant;

use pk_core::{Circle, Domain};
use pk_layout::area_fraction;
use pk_project::schema::Project;
use pk_results::{EmitReport, RunManifest, RunStore, TrajectoryRecord};
use pk_solver::{CancelToken, RelaxOutcome, RelaxProgressEvent, RelaxStatus, RelaxationSolver};
use tracing::{info, warn};

use crate::compile::compile_project;
use crate::error::{AppError, AppResult};
use crate::progress::{RelaxProgress, RunProgressEvent, RunStage};

/// Options for a generate run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub solver_version: String,
    /// Store root; the run lands in `<run_dir>/<run_id>/`.
    pub run_dir: Option<PathBuf>,
    pub cancel: Option<CancelToken>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            solver_version: env!("CARGO_PKG_VERSION").to_string(),
            run_dir: None,
            cancel: None,
        }
    }
}

/// Wall time spent in each stage.
#[derive(Debug, Clone, Default)]
pub struct RunTimingSummary {
    pub layout_time_s: f64,
    pub relax_time_s: f64,
    pub emit_time_s: f64,
    pub save_time_s: f64,
    pub total_time_s: f64,
}

#[derive(Debug, Clone)]
pub struct GenerateResponse {
    pub run_id: String,
    pub manifest: RunManifest,
    pub domain: Domain,
    /// Lattice layout before relaxation.
    pub initial: Vec<Circle>,
    /// Circles at their relaxed positions.
    pub circles: Vec<Circle>,
    pub area_fraction: f64,
    pub outcome: RelaxOutcome,
    /// `cylinders.info` contents.
    pub geometry: String,
    pub emit: EmitReport,
    /// Directory holding the stored run, when one was requested.
    pub run_path: Option<PathBuf>,
    pub timing: RunTimingSummary,
}

impl GenerateResponse {
    pub fn write_geometry(&self, path: &Path) -> AppResult<()> {
        std::fs::write(path, &self.geometry).map_err(|e| AppError::OutputWrite {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

fn emit_progress(
    progress_cb: &mut Option<&mut dyn FnMut(RunProgressEvent)>,
    stage: RunStage,
    started: Instant,
    message: Option<String>,
) {
    if let Some(cb) = progress_cb.as_deref_mut() {
        cb(RunProgressEvent::stage(
            stage,
            started.elapsed().as_secs_f64(),
            message,
        ));
    }
}

/// Run the full pipeline with default options.
pub fn generate(project: &Project) -> AppResult<GenerateResponse> {
    generate_with_progress(project, &GenerateOptions::default(), None)
}

/// Run the full pipeline and stream progress events.
pub fn generate_with_progress(
    project: &Project,
    options: &GenerateOptions,
    mut progress_cb: Option<&mut dyn FnMut(RunProgressEvent)>,
) -> AppResult<GenerateResponse> {
    let started = Instant::now();
    let mut timing = RunTimingSummary::default();
    info!(project = %project.name, count = project.inclusions.count, "generate started");

    emit_progress(
        &mut progress_cb,
        RunStage::GeneratingLayout,
        started,
        Some("Generating lattice layout".to_string()),
    );
    let stage_started = Instant::now();
    // Pin the seed so the run id and the stored project describe this geometry.
    let seed = pk_layout::resolve_seed(project.inclusions.seed);
    let mut project = project.clone();
    project.inclusions.seed = Some(seed);
    let project = &project;
    let compiled = compile_project(project)?;
    let domain = compiled.domain;
    let initial = pk_layout::generate(&domain, &compiled.layout)?;
    let fraction = area_fraction(&initial, &domain);
    timing.layout_time_s = stage_started.elapsed().as_secs_f64();

    emit_progress(
        &mut progress_cb,
        RunStage::Relaxing,
        started,
        Some(format!("Relaxing {} circles", initial.len())),
    );
    let stage_started = Instant::now();
    let mut solver = RelaxationSolver::new(&initial, domain, compiled.relax)?;
    if let Some(cancel) = &options.cancel {
        solver = solver.with_cancel_token(cancel.clone());
    }
    let outcome = {
        let mut forward = |event: &RelaxProgressEvent| {
            if let Some(cb) = progress_cb.as_deref_mut() {
                cb(RunProgressEvent {
                    stage: RunStage::Relaxing,
                    elapsed_wall_s: started.elapsed().as_secs_f64(),
                    message: None,
                    relax: Some(RelaxProgress {
                        step: event.step,
                        max_steps: event.max_steps,
                        max_overlap: event.max_overlap,
                        eps: event.eps,
                        kinetic_energy: event.kinetic_energy,
                    }),
                });
            }
        };
        solver.solve_with_progress(Some(&mut forward))
    };
    timing.relax_time_s = stage_started.elapsed().as_secs_f64();

    match outcome.status {
        RelaxStatus::Converged => {}
        RelaxStatus::Diverged => {
            return Err(AppError::Diverged {
                steps: outcome.steps,
            });
        }
        status => warn!(
            status = status.label(),
            max_overlap = outcome.max_overlap,
            "relaxation did not converge, emitting best-effort layout"
        ),
    }

    let mut circles = initial.clone();
    outcome.apply_to(&mut circles)?;

    emit_progress(
        &mut progress_cb,
        RunStage::WritingGeometry,
        started,
        Some("Rendering geometry".to_string()),
    );
    let stage_started = Instant::now();
    let (geometry, emit) = pk_results::render_cylinder_info(&circles, &domain, &compiled.emit)?;
    timing.emit_time_s = stage_started.elapsed().as_secs_f64();

    let run_id = pk_results::compute_run_id(project, &options.solver_version);
    let manifest = RunManifest {
        run_id: run_id.clone(),
        project_name: project.name.clone(),
        seed,
        timestamp: chrono::Utc::now().to_rfc3339(),
        solver_version: options.solver_version.clone(),
        status: outcome.status.label().to_string(),
        steps: outcome.steps,
        max_overlap: outcome.max_overlap,
        n_circles: circles.len(),
        trajectory_rows: outcome.trajectory.len(),
        retained: emit.written.len(),
        skipped: emit.skipped.len(),
    };

    let run_path = match &options.run_dir {
        Some(root) => {
            emit_progress(
                &mut progress_cb,
                RunStage::SavingResults,
                started,
                Some(format!("Saving run {}", &run_id[..12.min(run_id.len())])),
            );
            let stage_started = Instant::now();
            let store = RunStore::new(root.clone())?;
            let path = store.save_run(&manifest, &outcome.trajectory)?;
            timing.save_time_s = stage_started.elapsed().as_secs_f64();
            Some(path)
        }
        None => None,
    };

    timing.total_time_s = started.elapsed().as_secs_f64();
    emit_progress(
        &mut progress_cb,
        RunStage::Completed,
        started,
        Some("Generate completed".to_string()),
    );
    info!(
        status = outcome.status.label(),
        steps = outcome.steps,
        written = emit.written.len(),
        skipped = emit.skipped.len(),
        total_s = timing.total_time_s,
        "generate finished"
    );

    Ok(GenerateResponse {
        run_id,
        manifest,
        domain,
        initial,
        circles,
        area_fraction: fraction,
        outcome,
        geometry,
        emit,
        run_path,
        timing,
    })
}

/// List runs stored under `root`, most recent first.
pub fn list_runs(root: &Path) -> AppResult<Vec<RunManifest>> {
    let store = RunStore::new(root.to_path_buf())?;
    Ok(store.list_runs()?)
}

/// Load a stored run from its directory.
pub fn load_run(run_dir: &Path) -> AppResult<(RunManifest, Vec<TrajectoryRecord>)> {
    let manifest = pk_results::load_manifest_from(run_dir)?;
    let records = pk_results::read_trajectory_jsonl(&run_dir.join("trajectory.jsonl"))?;
    Ok((manifest, records))
}
