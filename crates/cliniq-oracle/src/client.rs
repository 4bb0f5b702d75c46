use async_trait::async_trait;

use cliniq_core::models::comparison::ComparisonResult;
use cliniq_core::models::condition::ConditionType;
use cliniq_core::models::model_info::ModelInfo;
use cliniq_core::models::payload::NormalizedPayload;
use cliniq_core::models::prediction::PredictionResult;
use cliniq_core::models::record::{PatientRecord, RecordId};

use crate::error::OracleError;

/// Everything the engine needs from the remote scoring service.
///
/// Implementations never compute risk themselves; they only carry requests
/// and decode responses. Every returned [`PredictionResult`] has already
/// passed [`PredictionResult::check`].
#[async_trait]
pub trait PredictionClient: Send + Sync {
    /// Score a submitted assessment. The service persists the result.
    async fn score(
        &self,
        condition: ConditionType,
        payload: &NormalizedPayload,
    ) -> Result<PredictionResult, OracleError>;

    /// Score a hypothetical edit without persisting it. Repeating a call with
    /// the same payload yields an equivalent result.
    async fn rescore_what_if(
        &self,
        condition: ConditionType,
        payload: &NormalizedPayload,
    ) -> Result<PredictionResult, OracleError>;

    /// All patient records visible to the caller, newest first.
    async fn fetch_records(&self) -> Result<Vec<PatientRecord>, OracleError>;

    /// Compare the latest predictions of two records.
    async fn compare_records(
        &self,
        record_a: RecordId,
        record_b: RecordId,
    ) -> Result<ComparisonResult, OracleError>;

    /// Every prediction made for one record, newest first.
    async fn record_predictions(&self, record: RecordId) -> Result<Vec<PredictionResult>, OracleError>;

    /// Metadata about the model behind a condition.
    async fn model_info(&self, condition: ConditionType) -> Result<ModelInfo, OracleError>;
}
