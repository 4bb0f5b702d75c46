use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::condition::ConditionType;

/// Published evaluation metrics for a scoring model.
///
/// The service reports whatever its training run recorded, so every metric
/// defaults when absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct ModelPerformance {
    pub accuracy: f64,
    pub auc: f64,
    pub recall: Option<f64>,
    pub precision: Option<f64>,
    pub threshold: f64,
    pub training_samples: u64,
    pub dataset: String,
}

/// What the scoring service reports about the model behind a condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ModelInfo {
    pub condition_type: ConditionType,
    pub features: Vec<String>,
    pub feature_display_names: Vec<String>,
    #[serde(default)]
    pub performance: ModelPerformance,
    /// Category label to probability band, e.g. `"High" -> "50-70%"`.
    #[serde(default)]
    pub risk_levels: BTreeMap<String, String>,
    #[serde(default)]
    pub clinical_thresholds: BTreeMap<String, f64>,
}
