//! HTTP client behaviour against a local stand-in for the scoring service.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use cliniq_core::models::condition::ConditionType;
use cliniq_core::models::payload::{CanonicalValue, NormalizedPayload};
use cliniq_oracle::client::PredictionClient;
use cliniq_oracle::error::OracleError;
use cliniq_oracle::http::{HttpPredictionClient, OracleConfig};

type Seen = Arc<Mutex<Vec<Value>>>;

fn prediction(disease: &str, probability: f64) -> Value {
    json!({
        "id": null,
        "risk_probability": probability,
        "risk_category": "High",
        "confidence_interval_low": probability - 0.02,
        "confidence_interval_high": probability + 0.02,
        "shap_values": [],
        "clinical_explanation": "",
        "disease_type": disease
    })
}

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn client(base_url: String, token: Option<&str>) -> HttpPredictionClient {
    HttpPredictionClient::new(&OracleConfig {
        base_url,
        api_token: token.map(str::to_string),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

fn payload() -> NormalizedPayload {
    [
        ("age", CanonicalValue::Number(52.0)),
        ("smoke", CanonicalValue::Bool(true)),
    ]
    .into_iter()
    .collect()
}

#[tokio::test]
async fn what_if_wraps_payload_with_disease_type() {
    let seen: Seen = Arc::default();
    let app = Router::new()
        .route(
            "/api/v1/predictions/what-if",
            post(|State(seen): State<Seen>, Json(body): Json<Value>| async move {
                seen.lock().unwrap().push(body);
                Json(prediction("heart_disease", 0.61))
            }),
        )
        .with_state(seen.clone());

    let client = client(serve(app).await, None);
    let result = client
        .rescore_what_if(ConditionType::HeartDisease, &payload())
        .await
        .unwrap();

    assert_eq!(result.risk_probability, 0.61);
    let bodies = seen.lock().unwrap();
    assert_eq!(
        bodies[0],
        json!({"disease_type": "heart_disease", "input_data": {"age": 52.0, "smoke": true}})
    );
}

#[tokio::test]
async fn score_posts_flat_payload_with_bearer_token() {
    let app = Router::new().route(
        "/api/v1/predictions/heart_disease",
        post(|headers: HeaderMap, Json(body): Json<Value>| async move {
            let auth = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            if auth != "Bearer secret" || body["smoke"] != json!(true) {
                return (StatusCode::UNAUTHORIZED, Json(json!({"detail": "bad request"})));
            }
            (StatusCode::OK, Json(prediction("heart_disease", 0.3)))
        }),
    );

    let client = client(serve(app).await, Some("secret"));
    let result = client.score(ConditionType::HeartDisease, &payload()).await.unwrap();
    assert_eq!(result.risk_probability, 0.3);
}

#[tokio::test]
async fn compare_404_is_record_not_found() {
    let app = Router::new().route(
        "/api/v1/patients/compare",
        post(|| async {
            (
                StatusCode::NOT_FOUND,
                Json(json!({"detail": "Patient record not found"})),
            )
        }),
    );

    let client = client(serve(app).await, None);
    let err = client.compare_records(1, 99).await.unwrap_err();
    assert_eq!(err, OracleError::RecordNotFound("Patient record not found".to_string()));
}

#[tokio::test]
async fn server_error_is_retryable_unavailable() {
    let app = Router::new().route(
        "/api/v1/predictions/what-if",
        post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "model loading") }),
    );

    let client = client(serve(app).await, None);
    let err = client
        .rescore_what_if(ConditionType::Diabetes, &payload())
        .await
        .unwrap_err();
    assert!(matches!(err, OracleError::Unavailable(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn validation_error_is_rejected_with_detail() {
    let app = Router::new().route(
        "/api/v1/predictions/diabetes",
        post(|| async {
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({"detail": "age must be at most 120"})),
            )
        }),
    );

    let client = client(serve(app).await, None);
    let err = client.score(ConditionType::Diabetes, &payload()).await.unwrap_err();
    assert_eq!(err, OracleError::Rejected("age must be at most 120".to_string()));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn wrong_condition_in_response_is_a_contract_violation() {
    let app = Router::new().route(
        "/api/v1/predictions/what-if",
        post(|| async { Json(prediction("diabetes", 0.5)) }),
    );

    let client = client(serve(app).await, None);
    let err = client
        .rescore_what_if(ConditionType::HeartDisease, &payload())
        .await
        .unwrap_err();
    assert!(matches!(err, OracleError::ContractViolation(_)));
}

#[tokio::test]
async fn malformed_body_is_a_parse_error() {
    let app = Router::new().route("/api/v1/patients/", get(|| async { "not json" }));

    let client = client(serve(app).await, None);
    let err = client.fetch_records().await.unwrap_err();
    assert!(matches!(err, OracleError::ResponseParse(_)));
}

#[tokio::test]
async fn unreachable_service_is_unavailable() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client(format!("http://{addr}"), None);
    let err = client.fetch_records().await.unwrap_err();
    assert!(matches!(err, OracleError::Unavailable(_)));
}
