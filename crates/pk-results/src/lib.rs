//! pk-results: geometry emission and run records.

pub mod hash;
pub mod info;
pub mod store;
pub mod types;

pub use hash::compute_run_id;
pub use info::{
    EmitOptions, EmitReport, render_cylinder_info, save_cylinder_info, write_cylinder_info,
};
pub use store::{RunStore, load_manifest_from, read_trajectory_jsonl, write_trajectory_jsonl};
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Run not found: {run_id}")]
    RunNotFound { run_id: String },

    #[error("Malformed trajectory file: {message}")]
    MalformedTrajectory { message: String },
}
