//! Error types for solver setup.
//!
//! Only configuration problems are errors. Non-convergence is reported through
//! [`crate::RelaxStatus`] and never surfaces here.

use pk_core::PkError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Invalid solver configuration: {what}")]
    InvalidConfig { what: String },

    #[error("No circles to relax")]
    EmptyInput,

    #[error("Too many circles: {count} (at most {max} have distinct ids)")]
    TooManyCircles { count: usize, max: usize },

    #[error("Invalid input circle {index}: {source}")]
    InvalidCircle {
        index: usize,
        #[source]
        source: PkError,
    },

    #[error("Core error: {0}")]
    Core(#[from] PkError),
}

pub type SolverResult<T> = Result<T, SolverError>;
