use thiserror::Error;

/// Failures talking to the scoring service.
///
/// Cloneable so a failure can sit in a published simulation snapshot.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OracleError {
    #[error("scoring service unavailable: {0}")]
    Unavailable(String),

    #[error("scoring service rejected the request: {0}")]
    Rejected(String),

    #[error("record not found: {0}")]
    RecordNotFound(String),

    #[error("response parsing failed: {0}")]
    ResponseParse(String),

    #[error("response broke the prediction contract: {0}")]
    ContractViolation(String),

    #[error("client config error: {0}")]
    Config(String),
}

impl OracleError {
    /// Whether repeating the same request could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, OracleError::Unavailable(_))
    }
}

impl From<reqwest::Error> for OracleError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            OracleError::ResponseParse(e.to_string())
        } else {
            OracleError::Unavailable(e.to_string())
        }
    }
}
