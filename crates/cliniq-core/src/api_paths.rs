//! API path conventions.
//!
//! Pure string functions with no HTTP dependency. These define the canonical
//! layout of the scoring service's REST surface.

use crate::models::condition::ConditionType;
use crate::models::record::RecordId;

pub const API_PREFIX: &str = "/api/v1";

pub fn predict(condition: ConditionType) -> String {
    format!("{API_PREFIX}/predictions/{}", condition.as_str())
}

pub fn what_if() -> String {
    format!("{API_PREFIX}/predictions/what-if")
}

pub fn model_info(condition: ConditionType) -> String {
    format!("{API_PREFIX}/predictions/info/{}", condition.as_str())
}

pub fn patients() -> String {
    format!("{API_PREFIX}/patients/")
}

pub fn patient(id: RecordId) -> String {
    format!("{API_PREFIX}/patients/{id}")
}

pub fn patient_predictions(id: RecordId) -> String {
    format!("{}/predictions", patient(id))
}

pub fn compare() -> String {
    format!("{API_PREFIX}/patients/compare")
}
