//! [`PredictionClient`] over the scoring service's REST API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use uuid::Uuid;

use cliniq_core::api_paths;
use cliniq_core::models::comparison::ComparisonResult;
use cliniq_core::models::condition::ConditionType;
use cliniq_core::models::model_info::ModelInfo;
use cliniq_core::models::payload::NormalizedPayload;
use cliniq_core::models::prediction::PredictionResult;
use cliniq_core::models::record::{PatientRecord, RecordId};

use crate::client::PredictionClient;
use crate::error::OracleError;
use crate::wire::{
    CompareRequest, ComparisonBody, ErrorBody, ModelInfoBody, PredictionBody, RecordBody,
    WhatIfRequest,
};

/// Connection settings for [`HttpPredictionClient`].
#[derive(Debug, Clone)]
pub struct OracleConfig {
    pub base_url: String,
    /// Sent as a bearer token when present.
    pub api_token: Option<String>,
    pub timeout: Duration,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            api_token: None,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Which kind of resource a request addresses. Decides what a 404 means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Prediction,
    Record,
}

/// Map a non-success status and its `detail` message to an error.
///
/// Server faults, timeouts and throttling are retryable; everything else in
/// the 4xx range is a rejection of this particular request.
pub fn classify_status(status: StatusCode, detail: String, route: Route) -> OracleError {
    if status.is_server_error()
        || status == StatusCode::REQUEST_TIMEOUT
        || status == StatusCode::TOO_MANY_REQUESTS
    {
        OracleError::Unavailable(format!("{status}: {detail}"))
    } else if status == StatusCode::NOT_FOUND && route == Route::Record {
        OracleError::RecordNotFound(detail)
    } else {
        OracleError::Rejected(detail)
    }
}

/// HTTP client for the scoring service.
#[derive(Clone)]
pub struct HttpPredictionClient {
    client: Client,
    base_url: String,
    api_token: Option<String>,
}

impl HttpPredictionClient {
    pub fn new(config: &OracleConfig) -> Result<Self, OracleError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| OracleError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let req = self.client.request(method, self.url(path));
        match &self.api_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        route: Route,
    ) -> Result<T, OracleError> {
        let resp = req.send().await?;
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let detail = match serde_json::from_str::<ErrorBody>(&body) {
                Ok(err) => err.message(),
                Err(_) if body.is_empty() => status.to_string(),
                Err(_) => body,
            };
            warn!(status = status.as_u16(), detail = %detail, "scoring service returned an error");
            return Err(classify_status(status, detail, route));
        }

        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| OracleError::ResponseParse(e.to_string()))
    }
}

/// Reject a result scored for a different condition than requested.
fn expect_condition(
    requested: ConditionType,
    prediction: PredictionResult,
) -> Result<PredictionResult, OracleError> {
    if prediction.condition_type != requested {
        return Err(OracleError::ContractViolation(format!(
            "requested {requested} but received a {} prediction",
            prediction.condition_type
        )));
    }
    Ok(prediction)
}

#[async_trait]
impl PredictionClient for HttpPredictionClient {
    async fn score(
        &self,
        condition: ConditionType,
        payload: &NormalizedPayload,
    ) -> Result<PredictionResult, OracleError> {
        let request_id = Uuid::new_v4();
        info!(request_id = %request_id, condition = %condition, "scoring assessment");

        let req = self
            .request(Method::POST, &api_paths::predict(condition))
            .json(payload);
        let body: PredictionBody = self.send(req, Route::Prediction).await?;
        let prediction = expect_condition(condition, body.into_prediction()?)?;

        info!(
            request_id = %request_id,
            probability = prediction.risk_probability,
            category = %prediction.risk_category,
            "assessment scored"
        );
        Ok(prediction)
    }

    async fn rescore_what_if(
        &self,
        condition: ConditionType,
        payload: &NormalizedPayload,
    ) -> Result<PredictionResult, OracleError> {
        let request_id = Uuid::new_v4();
        debug!(request_id = %request_id, condition = %condition, "what-if rescoring");

        let req = self
            .request(Method::POST, &api_paths::what_if())
            .json(&WhatIfRequest {
                disease_type: condition,
                input_data: payload,
            });
        let body: PredictionBody = self.send(req, Route::Prediction).await?;
        let prediction = expect_condition(condition, body.into_prediction()?)?;

        debug!(
            request_id = %request_id,
            probability = prediction.risk_probability,
            "what-if rescored"
        );
        Ok(prediction)
    }

    async fn fetch_records(&self) -> Result<Vec<PatientRecord>, OracleError> {
        let req = self.request(Method::GET, &api_paths::patients());
        let bodies: Vec<RecordBody> = self.send(req, Route::Record).await?;

        info!(count = bodies.len(), "fetched patient records");
        Ok(bodies.into_iter().map(RecordBody::into_record).collect())
    }

    async fn compare_records(
        &self,
        record_a: RecordId,
        record_b: RecordId,
    ) -> Result<ComparisonResult, OracleError> {
        let request_id = Uuid::new_v4();
        info!(request_id = %request_id, record_a, record_b, "comparing records");

        let req = self
            .request(Method::POST, &api_paths::compare())
            .json(&CompareRequest {
                record_id_1: record_a,
                record_id_2: record_b,
            });
        let body: ComparisonBody = self.send(req, Route::Record).await?;
        body.into_comparison()
    }

    async fn record_predictions(&self, record: RecordId) -> Result<Vec<PredictionResult>, OracleError> {
        let req = self.request(Method::GET, &api_paths::patient_predictions(record));
        let bodies: Vec<PredictionBody> = self.send(req, Route::Record).await?;

        debug!(record, count = bodies.len(), "fetched record predictions");
        bodies
            .into_iter()
            .map(PredictionBody::into_prediction)
            .collect()
    }

    async fn model_info(&self, condition: ConditionType) -> Result<ModelInfo, OracleError> {
        let req = self.request(Method::GET, &api_paths::model_info(condition));
        let body: ModelInfoBody = self.send(req, Route::Prediction).await?;
        Ok(body.into_model_info())
    }
}
