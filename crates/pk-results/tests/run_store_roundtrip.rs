use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use pk_core::{Circle, Domain, vec2};
use pk_results::{RunManifest, RunStore, TrajectoryRecord, load_manifest_from, read_trajectory_jsonl};
use pk_solver::{RelaxOptions, Retention, relax};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("{}_{}", prefix, nanos));
    dir
}

fn manifest(run_id: &str, timestamp: &str, steps: usize, rows: usize) -> RunManifest {
    RunManifest {
        run_id: run_id.to_string(),
        project_name: "pair".to_string(),
        seed: 42,
        timestamp: timestamp.to_string(),
        solver_version: "0.1.0".to_string(),
        status: "converged".to_string(),
        steps,
        max_overlap: 5e-4,
        n_circles: 2,
        trajectory_rows: rows,
        retained: 2,
        skipped: 0,
    }
}

#[test]
fn save_list_load_roundtrip() {
    let root = unique_temp_dir("pk_results_store");
    let store = RunStore::new(root.clone()).expect("failed to create run store");

    let circles = vec![
        Circle::at(0.0, 0.0, 0.5).unwrap(),
        Circle::at(0.6, 0.0, 0.5).unwrap(),
    ];
    let domain = Domain::new(vec2(-2.0, -2.0), vec2(2.0, 2.0)).unwrap();
    let outcome = relax(
        &circles,
        domain,
        RelaxOptions {
            eps: 1e-3,
            retention: Retention::Every(5),
            ..Default::default()
        },
    )
    .unwrap();

    let m = manifest(
        "run-123",
        "2026-02-26T00:00:00Z",
        outcome.steps,
        outcome.trajectory.len(),
    );
    let run_dir = store
        .save_run(&m, &outcome.trajectory)
        .expect("failed to save run");
    assert_eq!(run_dir, root.join("run-123"));
    assert!(store.has_run("run-123"));

    let runs = store.list_runs().expect("failed to list runs");
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0], m);
    assert_eq!(load_manifest_from(&run_dir).unwrap(), m);

    let records = store.load_trajectory("run-123").expect("failed to load trajectory");
    assert_eq!(records.len(), outcome.trajectory.len());
    assert!(records.iter().all(|r| r.n_circles() == 2));
    assert_eq!(records[0].step, 0);
    assert_eq!(records[0].x, vec![0.0, 0.6]);
    assert_eq!(records.last().unwrap().step, outcome.steps);

    // serde_json writes shortest round-trip floats
    let last = outcome.trajectory.last().unwrap();
    assert_eq!(*records.last().unwrap(), TrajectoryRecord::from(last));

    store.delete_run("run-123").unwrap();
    assert!(!store.has_run("run-123"));
    fs::remove_dir_all(root).ok();
}

#[test]
fn runs_are_listed_most_recent_first() {
    let root = unique_temp_dir("pk_results_list");
    let store = RunStore::new(root.clone()).unwrap();
    let empty = pk_solver::Trajectory::new(0, Retention::Full);

    store
        .save_run(&manifest("old", "2026-01-01T00:00:00Z", 1, 0), &empty)
        .unwrap();
    store
        .save_run(&manifest("new", "2026-03-01T00:00:00Z", 1, 0), &empty)
        .unwrap();

    let ids: Vec<String> = store
        .list_runs()
        .unwrap()
        .into_iter()
        .map(|m| m.run_id)
        .collect();
    assert_eq!(ids, ["new", "old"]);
    fs::remove_dir_all(root).ok();
}

#[test]
fn missing_run_is_reported() {
    let store = RunStore::new(unique_temp_dir("pk_results_missing")).unwrap();
    assert!(matches!(
        store.load_manifest("nope"),
        Err(pk_results::ResultsError::RunNotFound { .. })
    ));
}

#[test]
fn uneven_trajectory_rows_are_rejected() {
    let dir = unique_temp_dir("pk_results_bad_rows");
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("trajectory.jsonl");
    fs::write(
        &path,
        "{\"step\":0,\"time\":0.0,\"vx\":[0.0],\"vy\":[0.0],\"x\":[1.0,2.0],\"y\":[0.0]}\n",
    )
    .unwrap();
    assert!(matches!(
        read_trajectory_jsonl(&path),
        Err(pk_results::ResultsError::MalformedTrajectory { .. })
    ));

    fs::write(&path, "{\"step\":0,\"time\":0.0}\n").unwrap();
    assert!(matches!(
        read_trajectory_jsonl(&path),
        Err(pk_results::ResultsError::Json(_))
    ));
    fs::remove_dir_all(dir).ok();
}
