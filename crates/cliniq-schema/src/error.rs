use thiserror::Error;

use crate::field::FieldError;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("unknown condition type: {0}")]
    UnknownConditionType(String),

    #[error("validation failed for {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("cannot normalize field '{field}': {reason}")]
    Unnormalizable { field: String, reason: String },
}

impl From<Vec<FieldError>> for SchemaError {
    fn from(errors: Vec<FieldError>) -> Self {
        SchemaError::Validation(errors)
    }
}
