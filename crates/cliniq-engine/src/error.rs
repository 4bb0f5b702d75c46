use thiserror::Error;

use cliniq_oracle::error::OracleError;
use cliniq_schema::field::FieldError;

/// Why the simulation is not showing a fresh result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("input has {} invalid field(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("input could not be normalized: {0}")]
    Normalization(String),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error("simulation session has ended")]
    Closed,
}

#[derive(Debug, Error)]
pub enum CompareError {
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    #[error("record not found: {0}")]
    RecordNotFound(String),

    #[error(transparent)]
    Oracle(OracleError),
}

impl From<OracleError> for CompareError {
    fn from(e: OracleError) -> Self {
        match e {
            OracleError::RecordNotFound(detail) => CompareError::RecordNotFound(detail),
            other => CompareError::Oracle(other),
        }
    }
}
