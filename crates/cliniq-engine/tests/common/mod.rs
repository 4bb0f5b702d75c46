//! Scripted in-memory scoring service shared by the engine tests.

#![allow(dead_code)]

use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use cliniq_core::models::comparison::ComparisonResult;
use cliniq_core::models::condition::ConditionType;
use cliniq_core::models::input::AssessmentInput;
use cliniq_core::models::model_info::ModelInfo;
use cliniq_core::models::payload::{CanonicalValue, NormalizedPayload};
use cliniq_core::models::prediction::{FactorAttribution, PredictionResult, RiskCategory};
use cliniq_core::models::record::{PatientRecord, RecordId};
use cliniq_oracle::client::PredictionClient;
use cliniq_oracle::error::OracleError;

/// How the next what-if call behaves.
#[derive(Debug, Clone, Default)]
pub struct Step {
    pub delay: Duration,
    pub failure: Option<OracleError>,
}

#[derive(Debug, Clone)]
pub struct WhatIfCall {
    /// Time since the client was created.
    pub at: Duration,
    pub payload: NormalizedPayload,
}

/// What-if results carry `age / 100` as their probability, so a test can
/// tell which input produced the displayed result.
pub struct ScriptedClient {
    started: Instant,
    script: Mutex<VecDeque<Step>>,
    pub what_if_calls: Mutex<Vec<WhatIfCall>>,
    pub records: Mutex<Vec<PatientRecord>>,
    pub history: Mutex<BTreeMap<RecordId, Vec<PredictionResult>>>,
    pub fetch_calls: AtomicUsize,
    pub compare_calls: AtomicUsize,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            script: Mutex::default(),
            what_if_calls: Mutex::default(),
            records: Mutex::default(),
            history: Mutex::default(),
            fetch_calls: AtomicUsize::new(0),
            compare_calls: AtomicUsize::new(0),
        }
    }

    pub fn respond_after(self, delay_ms: u64) -> Self {
        self.script.lock().unwrap().push_back(Step {
            delay: Duration::from_millis(delay_ms),
            failure: None,
        });
        self
    }

    pub fn fail_after(self, delay_ms: u64, err: OracleError) -> Self {
        self.script.lock().unwrap().push_back(Step {
            delay: Duration::from_millis(delay_ms),
            failure: Some(err),
        });
        self
    }

    pub fn with_record(self, record: PatientRecord, probability: f64) -> Self {
        let latest = prediction(record.condition_type, probability, "Moderate");
        self.history.lock().unwrap().insert(record.id, vec![latest]);
        self.records.lock().unwrap().push(record);
        self
    }

    pub fn calls(&self) -> Vec<WhatIfCall> {
        self.what_if_calls.lock().unwrap().clone()
    }

    pub fn compare_count(&self) -> usize {
        self.compare_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

pub fn prediction(condition: ConditionType, probability: f64, category: &str) -> PredictionResult {
    PredictionResult {
        id: None,
        condition_type: condition,
        risk_probability: probability,
        confidence_interval_low: (probability - 0.05).max(0.0),
        confidence_interval_high: (probability + 0.05).min(1.0),
        risk_category: RiskCategory::from(category),
        factor_attributions: vec![FactorAttribution {
            feature: "age".to_string(),
            value: 0.1,
        }],
        explanation: String::new(),
        created_at: None,
    }
}

pub fn record(id: RecordId, name: &str, condition: ConditionType) -> PatientRecord {
    PatientRecord {
        id,
        patient_name: name.to_string(),
        condition_type: condition,
        created_at: jiff::civil::date(2025, 3, 1).at(9, 30, 0, 0),
        input_data: AssessmentInput::new(),
    }
}

pub fn heart_input(age: &str) -> AssessmentInput {
    AssessmentInput::new()
        .with("age", age)
        .with("gender", "Male")
        .with("ap_hi", "130")
        .with("ap_lo", "85")
        .with("smoke", "No")
        .with("alco", "No")
        .with("active", "Yes")
        .with("bmi", "26.5")
}

#[async_trait]
impl PredictionClient for ScriptedClient {
    async fn score(
        &self,
        condition: ConditionType,
        payload: &NormalizedPayload,
    ) -> Result<PredictionResult, OracleError> {
        self.rescore_what_if(condition, payload).await
    }

    async fn rescore_what_if(
        &self,
        condition: ConditionType,
        payload: &NormalizedPayload,
    ) -> Result<PredictionResult, OracleError> {
        let step = self.script.lock().unwrap().pop_front().unwrap_or_default();
        self.what_if_calls.lock().unwrap().push(WhatIfCall {
            at: self.started.elapsed(),
            payload: payload.clone(),
        });

        tokio::time::sleep(step.delay).await;
        if let Some(err) = step.failure {
            return Err(err);
        }

        let age = match payload.get("age") {
            Some(CanonicalValue::Number(n)) => *n,
            _ => 50.0,
        };
        Ok(prediction(condition, age / 100.0, "Moderate"))
    }

    async fn fetch_records(&self) -> Result<Vec<PatientRecord>, OracleError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.records.lock().unwrap().clone())
    }

    async fn compare_records(
        &self,
        record_a: RecordId,
        record_b: RecordId,
    ) -> Result<ComparisonResult, OracleError> {
        self.compare_calls.fetch_add(1, Ordering::SeqCst);

        let records = self.records.lock().unwrap().clone();
        let history = self.history.lock().unwrap().clone();
        let find = |id: RecordId| {
            let record = records.iter().find(|r| r.id == id).cloned();
            let latest = history.get(&id).and_then(|h| h.first()).cloned();
            record
                .zip(latest)
                .ok_or_else(|| OracleError::RecordNotFound("Patient record not found".to_string()))
        };

        let (ra, pa) = find(record_a)?;
        let (rb, pb) = find(record_b)?;
        Ok(ComparisonResult::new(ra, rb, pa, pb))
    }

    async fn record_predictions(&self, record: RecordId) -> Result<Vec<PredictionResult>, OracleError> {
        self.history
            .lock()
            .unwrap()
            .get(&record)
            .cloned()
            .ok_or_else(|| OracleError::RecordNotFound("Patient record not found".to_string()))
    }

    async fn model_info(&self, _condition: ConditionType) -> Result<ModelInfo, OracleError> {
        Err(OracleError::Unavailable("not scripted".to_string()))
    }
}
