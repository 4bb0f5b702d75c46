use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::prediction::PredictionResult;
use super::record::{PatientRecord, RecordId};

/// Summary of how two predictions differ.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ComparisonDifferences {
    /// Absolute difference in risk probability, in `[0, 1]`.
    pub risk_delta: f64,
    /// Record whose prediction carries the larger probability. Ties go to record A.
    pub higher_risk_record_id: RecordId,
    pub same_category: bool,
}

impl ComparisonDifferences {
    pub fn between(
        record_a: RecordId,
        prediction_a: &PredictionResult,
        record_b: RecordId,
        prediction_b: &PredictionResult,
    ) -> Self {
        let higher_risk_record_id = if prediction_b.risk_probability > prediction_a.risk_probability {
            record_b
        } else {
            record_a
        };

        Self {
            risk_delta: (prediction_a.risk_probability - prediction_b.risk_probability).abs(),
            higher_risk_record_id,
            same_category: prediction_a.risk_category == prediction_b.risk_category,
        }
    }
}

/// Two records side by side with their latest predictions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ComparisonResult {
    pub record_a: PatientRecord,
    pub record_b: PatientRecord,
    pub prediction_a: PredictionResult,
    pub prediction_b: PredictionResult,
    pub differences: ComparisonDifferences,
}

impl ComparisonResult {
    /// Assemble a comparison, deriving the differences from the two predictions.
    pub fn new(
        record_a: PatientRecord,
        record_b: PatientRecord,
        prediction_a: PredictionResult,
        prediction_b: PredictionResult,
    ) -> Self {
        let differences =
            ComparisonDifferences::between(record_a.id, &prediction_a, record_b.id, &prediction_b);
        Self {
            record_a,
            record_b,
            prediction_a,
            prediction_b,
            differences,
        }
    }
}
