//! Shared application service layer for cylpack.
//!
//! Turns a validated project into relaxed circles, the geometry text and an
//! optional stored run, so the CLI only deals with arguments and display.

pub mod compile;
pub mod error;
pub mod progress;
pub mod project_service;
pub mod run_service;

pub use compile::{CompiledProject, compile_project};
pub use error::{AppError, AppResult};
pub use progress::{RelaxProgress, RunProgressEvent, RunStage};
pub use project_service::{ProjectSummary, load_project, save_project, summarize, validate_project};
pub use run_service::{
    GenerateOptions, GenerateResponse, RunTimingSummary, generate, generate_with_progress,
    list_runs, load_run,
};
