use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use pk_app::{AppError, GenerateOptions, RunStage, generate, generate_with_progress, load_run};
use pk_project::{Project, from_yaml_str};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("{}_{}", prefix, nanos));
    dir
}

/// 20 equal circles on a 5x5 lattice, rescaled to 75% coverage so that
/// lattice neighbours start out overlapping.
fn dense_project(extra_solver: &str) -> Project {
    from_yaml_str(&format!(
        r#"
version: 1
name: dense
domain: {{ lower: [0.0, 0.0], upper: [1.0, 1.0] }}
inclusions:
  count: 20
  radius_mean: 0.1
  radius_std_dev: 0.0
  seed: 1
  target_area_fraction: 0.75
solver:
  eps: 0.01
{extra_solver}
output: {{ offset: [0.5, 0.0] }}
"#
    ))
    .unwrap()
}

#[test]
fn dense_layout_relaxes_and_emits_every_circle() {
    let response = generate(&dense_project("")).unwrap();

    assert!(response.outcome.converged());
    assert!(response.outcome.steps > 0);
    assert!(response.outcome.max_overlap <= 0.01);
    assert!((response.area_fraction - 0.75).abs() < 1e-12);

    assert_eq!(response.circles.len(), 20);
    assert_eq!(response.emit.written.len(), 20);
    assert!(response.emit.skipped.is_empty());
    assert!(response.geometry.starts_with("Cylinder0\n{\n  geometry\n"));
    assert!(response.geometry.contains("Cylinder19\n"));
    assert_eq!(response.geometry.matches("radius ").count(), 20);

    // relaxed positions come from the solver, radii from the layout
    for (c, p) in response.circles.iter().zip(response.outcome.final_positions()) {
        assert_eq!(c.center, *p);
    }
    for (a, b) in response.circles.iter().zip(&response.initial) {
        assert_eq!(a.radius(), b.radius());
    }

    assert_eq!(response.manifest.status, "converged");
    assert_eq!(response.manifest.retained, 20);
    assert_eq!(response.run_id.len(), 64);
    assert!(response.run_path.is_none());
}

#[test]
fn seeded_runs_are_reproducible() {
    let a = generate(&dense_project("")).unwrap();
    let b = generate(&dense_project("")).unwrap();
    assert_eq!(a.run_id, b.run_id);
    assert_eq!(a.geometry, b.geometry);
    assert_eq!(a.outcome.trajectory, b.outcome.trajectory);
}

#[test]
fn exhausted_budget_still_emits() {
    let response = generate(&dense_project("  max_steps: 2")).unwrap();
    assert_eq!(response.manifest.status, "exhausted_steps");
    assert_eq!(response.outcome.steps, 2);
    assert!(response.outcome.max_overlap > 0.01);
    assert_eq!(response.emit.written.len(), 20);
}

#[test]
fn run_is_stored_and_reloaded() {
    let root = unique_temp_dir("pk_app_runs");
    let options = GenerateOptions {
        run_dir: Some(root.clone()),
        ..GenerateOptions::default()
    };
    let project = dense_project("  retention: { mode: every, every: 5 }");
    let response = generate_with_progress(&project, &options, None).unwrap();

    let run_path = response.run_path.clone().unwrap();
    assert_eq!(run_path, root.join(&response.run_id));

    let (manifest, records) = load_run(&run_path).unwrap();
    assert_eq!(manifest, response.manifest);
    assert_eq!(manifest.seed, 1);
    assert!(records.iter().all(|r| r.n_circles() == 20));
    assert_eq!(records.len(), response.outcome.trajectory.len());
    assert_eq!(records.last().map(|r| r.step), Some(response.outcome.steps));

    let runs = pk_app::list_runs(&root).unwrap();
    assert_eq!(runs.len(), 1);
    std::fs::remove_dir_all(root).ok();
}

#[test]
fn progress_stages_arrive_in_order() {
    let mut stages = Vec::new();
    let mut relax_events = 0usize;
    generate_with_progress(
        &dense_project(""),
        &GenerateOptions::default(),
        Some(&mut |event| {
            if event.relax.is_some() {
                relax_events += 1;
            }
            if stages.last() != Some(&event.stage) {
                stages.push(event.stage);
            }
        }),
    )
    .unwrap();

    assert_eq!(
        stages,
        vec![
            RunStage::GeneratingLayout,
            RunStage::Relaxing,
            RunStage::WritingGeometry,
            RunStage::Completed
        ]
    );
    assert!(relax_events > 0);
}

#[test]
fn geometry_file_is_written() {
    let dir = unique_temp_dir("pk_app_geometry");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("cylinders.info");

    let response = generate(&dense_project("")).unwrap();
    response.write_geometry(&path).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), response.geometry);
    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn invalid_project_is_rejected_before_solving() {
    let mut project = dense_project("");
    project.solver.damping = 1.5;
    assert!(matches!(generate(&project), Err(AppError::Validation(_))));
}

#[test]
fn unseeded_runs_get_distinct_ids_and_a_replayable_seed() {
    let root = unique_temp_dir("pk_app_unseeded");
    let options = GenerateOptions {
        run_dir: Some(root.clone()),
        ..GenerateOptions::default()
    };
    let mut project = dense_project("  max_steps: 50");
    project.inclusions.seed = None;
    project.inclusions.radius_std_dev = 0.02;

    let a = generate_with_progress(&project, &options, None).unwrap();
    let b = generate_with_progress(&project, &options, None).unwrap();
    assert_ne!(a.manifest.seed, b.manifest.seed);
    assert_ne!(a.run_id, b.run_id);
    assert_ne!(a.geometry, b.geometry);
    assert_eq!(pk_app::list_runs(&root).unwrap().len(), 2);

    // the recorded seed replays the same run
    project.inclusions.seed = Some(a.manifest.seed);
    let replay = generate(&project).unwrap();
    assert_eq!(replay.run_id, a.run_id);
    assert_eq!(replay.geometry, a.geometry);
    std::fs::remove_dir_all(root).ok();
}

#[test]
fn overflowing_relaxation_is_reported_as_divergence() {
    let mut project = dense_project("");
    project.solver.stiffness = 1e307;
    project.solver.dt = 1e3;
    assert!(matches!(
        generate(&project),
        Err(AppError::Diverged { steps: 1 })
    ));
}

#[test]
fn zero_step_budget_is_rejected() {
    let mut project = dense_project("");
    project.solver.max_steps = 0;
    assert!(matches!(generate(&project), Err(AppError::Validation(_))));
}
