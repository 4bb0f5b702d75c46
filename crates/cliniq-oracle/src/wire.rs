//! Request and response bodies exactly as the scoring service exchanges them.
//!
//! The service names things differently from the client's domain model
//! (`disease_type`, `shap_values`, `record_1`), so decoding goes through these
//! types and is converted with the `into_*` methods, which also enforce the
//! prediction contract.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use cliniq_core::models::comparison::ComparisonResult;
use cliniq_core::models::condition::ConditionType;
use cliniq_core::models::input::AssessmentInput;
use cliniq_core::models::model_info::{ModelInfo, ModelPerformance};
use cliniq_core::models::payload::NormalizedPayload;
use cliniq_core::models::prediction::{FactorAttribution, PredictionResult, RiskCategory};
use cliniq_core::models::record::{PatientRecord, RecordId};

use crate::error::OracleError;

// ── Requests ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct WhatIfRequest<'a> {
    pub disease_type: ConditionType,
    pub input_data: &'a NormalizedPayload,
}

#[derive(Debug, Serialize)]
pub struct CompareRequest {
    pub record_id_1: RecordId,
    pub record_id_2: RecordId,
}

// ── Responses ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct ShapValue {
    pub feature: String,
    pub value: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PredictionBody {
    #[serde(default)]
    pub id: Option<u64>,
    pub risk_probability: f64,
    pub risk_category: String,
    pub confidence_interval_low: f64,
    pub confidence_interval_high: f64,
    #[serde(default)]
    pub shap_values: Vec<ShapValue>,
    #[serde(default)]
    pub clinical_explanation: String,
    pub disease_type: ConditionType,
    #[serde(default)]
    pub created_at: Option<jiff::civil::DateTime>,
}

impl PredictionBody {
    /// Convert to the domain type, rejecting results whose confidence
    /// interval does not bracket the probability.
    pub fn into_prediction(self) -> Result<PredictionResult, OracleError> {
        let prediction = PredictionResult {
            id: self.id,
            condition_type: self.disease_type,
            risk_probability: self.risk_probability,
            confidence_interval_low: self.confidence_interval_low,
            confidence_interval_high: self.confidence_interval_high,
            risk_category: RiskCategory::from(self.risk_category),
            factor_attributions: self
                .shap_values
                .into_iter()
                .map(|s| FactorAttribution {
                    feature: s.feature,
                    value: s.value,
                })
                .collect(),
            explanation: self.clinical_explanation,
            created_at: self.created_at,
        };

        prediction
            .check()
            .map_err(|e| OracleError::ContractViolation(e.to_string()))?;
        Ok(prediction)
    }
}

/// A patient record. The list endpoint omits `input_data`.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordBody {
    pub id: RecordId,
    pub patient_name: String,
    pub disease_type: ConditionType,
    pub created_at: jiff::civil::DateTime,
    #[serde(default)]
    pub input_data: AssessmentInput,
}

impl RecordBody {
    pub fn into_record(self) -> PatientRecord {
        PatientRecord {
            id: self.id,
            patient_name: self.patient_name,
            condition_type: self.disease_type,
            created_at: self.created_at,
            input_data: self.input_data,
        }
    }
}

/// The service also sends its own `differences` object, keyed by patient
/// name. It is ignored; differences are derived from the two predictions.
#[derive(Debug, Clone, Deserialize)]
pub struct ComparisonBody {
    pub record_1: RecordBody,
    pub record_2: RecordBody,
    pub prediction_1: PredictionBody,
    pub prediction_2: PredictionBody,
}

impl ComparisonBody {
    pub fn into_comparison(self) -> Result<ComparisonResult, OracleError> {
        Ok(ComparisonResult::new(
            self.record_1.into_record(),
            self.record_2.into_record(),
            self.prediction_1.into_prediction()?,
            self.prediction_2.into_prediction()?,
        ))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelInfoBody {
    pub disease_type: ConditionType,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub feature_display_names: Vec<String>,
    #[serde(default)]
    pub performance: ModelPerformance,
    #[serde(default)]
    pub risk_levels: BTreeMap<String, String>,
    #[serde(default)]
    pub clinical_thresholds: BTreeMap<String, f64>,
}

impl ModelInfoBody {
    pub fn into_model_info(self) -> ModelInfo {
        ModelInfo {
            condition_type: self.disease_type,
            features: self.features,
            feature_display_names: self.feature_display_names,
            performance: self.performance,
            risk_levels: self.risk_levels,
            clinical_thresholds: self.clinical_thresholds,
        }
    }
}

/// Error body. FastAPI-style services send either a string or a list of
/// validation issues under `detail`.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub detail: serde_json::Value,
}

impl ErrorBody {
    pub fn message(&self) -> String {
        match &self.detail {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}
