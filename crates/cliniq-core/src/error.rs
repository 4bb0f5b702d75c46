use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown condition type: {0}")]
    UnknownConditionType(String),

    #[error(
        "confidence interval [{low}, {high}] does not bracket risk probability {probability}"
    )]
    IntervalViolation { low: f64, probability: f64, high: f64 },

    #[error("risk probability {0} is outside [0, 1]")]
    ProbabilityOutOfRange(f64),
}
