use cliniq_core::error::CoreError;
use cliniq_core::models::comparison::ComparisonDifferences;
use cliniq_core::models::condition::ConditionType;
use cliniq_core::models::input::{AssessmentInput, RawValue};
use cliniq_core::models::prediction::{PredictionResult, RiskCategory};

fn prediction(probability: f64, category: &str) -> PredictionResult {
    PredictionResult {
        id: None,
        condition_type: ConditionType::Diabetes,
        risk_probability: probability,
        confidence_interval_low: (probability - 0.02).max(0.0),
        confidence_interval_high: (probability + 0.02).min(1.0),
        risk_category: RiskCategory::from(category),
        factor_attributions: vec![],
        explanation: String::new(),
        created_at: None,
    }
}

#[test]
fn condition_type_parses_wire_names() {
    assert_eq!("diabetes".parse::<ConditionType>().unwrap(), ConditionType::Diabetes);
    assert_eq!(
        "heart_disease".parse::<ConditionType>().unwrap(),
        ConditionType::HeartDisease
    );
    assert!(matches!(
        "cancer".parse::<ConditionType>(),
        Err(CoreError::UnknownConditionType(name)) if name == "cancer"
    ));
}

#[test]
fn condition_type_serializes_snake_case() {
    let json = serde_json::to_string(&ConditionType::HeartDisease).unwrap();
    assert_eq!(json, "\"heart_disease\"");
}

#[test]
fn unknown_risk_category_survives_decoding() {
    let category: RiskCategory = serde_json::from_str("\"Extreme\"").unwrap();
    assert_eq!(category, RiskCategory::Other("Extreme".to_string()));
    assert_eq!(serde_json::to_string(&category).unwrap(), "\"Extreme\"");

    let known: RiskCategory = serde_json::from_str("\"Critical\"").unwrap();
    assert_eq!(known, RiskCategory::Critical);
}

#[test]
fn check_accepts_bracketed_probability() {
    assert!(prediction(0.73, "High").check().is_ok());
    assert!(prediction(0.0, "Low").check().is_ok());
}

#[test]
fn check_rejects_interval_that_misses_probability() {
    let mut p = prediction(0.5, "Moderate");
    p.confidence_interval_low = 0.55;
    assert!(matches!(p.check(), Err(CoreError::IntervalViolation { .. })));
}

#[test]
fn check_rejects_probability_outside_unit_range() {
    let mut p = prediction(0.5, "Moderate");
    p.risk_probability = 1.2;
    assert!(matches!(p.check(), Err(CoreError::ProbabilityOutOfRange(_))));
}

#[test]
fn differences_pick_larger_probability() {
    let d = ComparisonDifferences::between(1, &prediction(0.2, "Low"), 2, &prediction(0.6, "High"));
    assert_eq!(d.higher_risk_record_id, 2);
    assert!((d.risk_delta - 0.4).abs() < 1e-12);
    assert!(!d.same_category);
}

#[test]
fn differences_tie_goes_to_record_a() {
    let d = ComparisonDifferences::between(7, &prediction(0.4, "Moderate"), 9, &prediction(0.4, "Moderate"));
    assert_eq!(d.higher_risk_record_id, 7);
    assert_eq!(d.risk_delta, 0.0);
    assert!(d.same_category);
}

#[test]
fn assessment_input_decodes_mixed_raw_values() {
    let input: AssessmentInput =
        serde_json::from_str(r#"{"age": "45", "bmi": 27.5, "smoke": true}"#).unwrap();
    assert_eq!(input.get("age"), Some(&RawValue::Text("45".to_string())));
    assert_eq!(input.get("bmi"), Some(&RawValue::Number(27.5)));
    assert_eq!(input.get("smoke").map(|v| v.as_text().into_owned()), Some("Yes".to_string()));
}

#[test]
fn assessment_input_reads_null_as_absent() {
    let input: AssessmentInput =
        serde_json::from_str(r#"{"age": 40, "patient_name": null, "bmi": null}"#).unwrap();
    assert_eq!(input.len(), 1);
    assert_eq!(input.get("age"), Some(&RawValue::Number(40.0)));
    assert_eq!(input.get("patient_name"), None);
    assert_eq!(input.get("bmi"), None);
}

#[test]
fn api_paths_follow_the_service_layout() {
    use cliniq_core::api_paths;

    assert_eq!(api_paths::predict(ConditionType::HeartDisease), "/api/v1/predictions/heart_disease");
    assert_eq!(api_paths::what_if(), "/api/v1/predictions/what-if");
    assert_eq!(api_paths::model_info(ConditionType::Diabetes), "/api/v1/predictions/info/diabetes");
    assert_eq!(api_paths::patients(), "/api/v1/patients/");
    assert_eq!(api_paths::patient(12), "/api/v1/patients/12");
    assert_eq!(api_paths::patient_predictions(12), "/api/v1/patients/12/predictions");
    assert_eq!(api_paths::compare(), "/api/v1/patients/compare");
}
