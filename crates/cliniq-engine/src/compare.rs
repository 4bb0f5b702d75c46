//! Side-by-side comparison of two patient records.

use std::sync::Arc;

use tracing::{debug, info, warn};

use cliniq_core::models::comparison::ComparisonResult;
use cliniq_core::models::record::{PatientRecord, RecordId};
use cliniq_oracle::client::PredictionClient;
use cliniq_oracle::error::OracleError;

use crate::error::CompareError;

/// Resolves record ids against a cached record list and asks the scoring
/// service for their comparison.
pub struct ComparisonCoordinator {
    client: Arc<dyn PredictionClient>,
    records: Vec<PatientRecord>,
}

impl ComparisonCoordinator {
    /// Start with an empty cache; the first lookup fetches the list.
    pub fn new(client: Arc<dyn PredictionClient>) -> Self {
        Self::with_records(client, Vec::new())
    }

    /// Start from a list the caller already holds.
    pub fn with_records(client: Arc<dyn PredictionClient>, records: Vec<PatientRecord>) -> Self {
        Self { client, records }
    }

    pub fn records(&self) -> &[PatientRecord] {
        &self.records
    }

    /// Replace the cache with the service's current list.
    pub async fn refresh(&mut self) -> Result<&[PatientRecord], CompareError> {
        self.records = self.client.fetch_records().await?;
        debug!(count = self.records.len(), "record cache refreshed");
        Ok(&self.records)
    }

    /// Records that can be compared against `first`: same condition, different id.
    pub fn candidates(&self, first: RecordId) -> Vec<&PatientRecord> {
        let Some(anchor) = self.find(first) else {
            return Vec::new();
        };
        self.records
            .iter()
            .filter(|r| r.id != anchor.id && r.condition_type == anchor.condition_type)
            .collect()
    }

    /// Compare the latest predictions of records `a` and `b`.
    ///
    /// Both records must exist and share a condition type. The differences
    /// are always derived locally from the two predictions.
    pub async fn compare(
        &mut self,
        a: RecordId,
        b: RecordId,
    ) -> Result<ComparisonResult, CompareError> {
        if a == b {
            return Err(CompareError::InvariantViolation(format!(
                "cannot compare record {a} with itself"
            )));
        }

        let (record_a, record_b) = self.resolve(a, b).await?;

        if record_a.condition_type != record_b.condition_type {
            warn!(
                record_a = a,
                record_b = b,
                condition_a = %record_a.condition_type,
                condition_b = %record_b.condition_type,
                "refusing cross-condition comparison"
            );
            return Err(CompareError::InvariantViolation(format!(
                "condition type mismatch: record {a} is {}, record {b} is {}",
                record_a.condition_type, record_b.condition_type
            )));
        }

        let comparison = self.client.compare_records(a, b).await?;
        if comparison.record_a.id != a || comparison.record_b.id != b {
            return Err(CompareError::Oracle(OracleError::ContractViolation(format!(
                "asked to compare {a} and {b} but received {} and {}",
                comparison.record_a.id, comparison.record_b.id
            ))));
        }

        let result = ComparisonResult::new(
            comparison.record_a,
            comparison.record_b,
            comparison.prediction_a,
            comparison.prediction_b,
        );
        info!(
            record_a = a,
            record_b = b,
            risk_delta = result.differences.risk_delta,
            higher_risk = result.differences.higher_risk_record_id,
            "records compared"
        );
        Ok(result)
    }

    fn find(&self, id: RecordId) -> Option<&PatientRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    fn lookup(&self, a: RecordId, b: RecordId) -> Result<(PatientRecord, PatientRecord), RecordId> {
        let record_a = self.find(a).ok_or(a)?;
        let record_b = self.find(b).ok_or(b)?;
        Ok((record_a.clone(), record_b.clone()))
    }

    /// Look both ids up, refreshing the cache once if either is missing.
    async fn resolve(
        &mut self,
        a: RecordId,
        b: RecordId,
    ) -> Result<(PatientRecord, PatientRecord), CompareError> {
        if let Ok(pair) = self.lookup(a, b) {
            return Ok(pair);
        }

        self.refresh().await?;
        self.lookup(a, b)
            .map_err(|missing| CompareError::RecordNotFound(format!("record {missing}")))
    }
}
