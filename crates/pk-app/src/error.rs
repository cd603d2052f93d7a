//! Error types for the pk-app service layer.

use std::path::PathBuf;

/// Application error wrapping the backend crates' errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Project error: {0}")]
    Project(String),

    #[error("Failed to write output file: {path}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Project validation failed: {0}")]
    Validation(String),

    #[error("Layout generation failed: {0}")]
    Layout(String),

    #[error("Solver error: {0}")]
    Solver(String),

    #[error("Relaxation diverged after {steps} steps")]
    Diverged { steps: usize },

    #[error("Results error: {0}")]
    Results(String),

    #[error("Run not found: {0}")]
    RunNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for pk-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<pk_project::ProjectError> for AppError {
    fn from(err: pk_project::ProjectError) -> Self {
        match err {
            pk_project::ProjectError::Validation(e) => AppError::Validation(e.to_string()),
            other => AppError::Project(other.to_string()),
        }
    }
}

impl From<pk_project::ValidationError> for AppError {
    fn from(err: pk_project::ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<pk_core::PkError> for AppError {
    fn from(err: pk_core::PkError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

impl From<pk_layout::LayoutError> for AppError {
    fn from(err: pk_layout::LayoutError) -> Self {
        AppError::Layout(err.to_string())
    }
}

impl From<pk_solver::SolverError> for AppError {
    fn from(err: pk_solver::SolverError) -> Self {
        AppError::Solver(err.to_string())
    }
}

impl From<pk_results::ResultsError> for AppError {
    fn from(err: pk_results::ResultsError) -> Self {
        match err {
            pk_results::ResultsError::RunNotFound { run_id } => AppError::RunNotFound(run_id),
            other => AppError::Results(other.to_string()),
        }
    }
}
