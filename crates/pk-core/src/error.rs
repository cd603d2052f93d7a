use thiserror::Error;

pub type PkResult<T> = Result<T, PkError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PkError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Non-positive value for {what}: {value}")]
    NonPositive { what: &'static str, value: f64 },

    #[error("Degenerate domain: lower ({lower_x}, {lower_y}) must be below upper ({upper_x}, {upper_y})")]
    DegenerateDomain {
        lower_x: f64,
        lower_y: f64,
        upper_x: f64,
        upper_y: f64,
    },
}
