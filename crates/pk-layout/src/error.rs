use pk_core::PkError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("Invalid layout parameter: {what}")]
    InvalidParam { what: String },

    #[error("Cannot rescale: {what}")]
    Rescale { what: String },

    #[error("Core error: {0}")]
    Core(#[from] PkError),
}

pub type LayoutResult<T> = Result<T, LayoutError>;
