use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::condition::ConditionType;
use crate::error::CoreError;

/// Rounding slack allowed when checking that the interval brackets the probability.
const INTERVAL_TOLERANCE: f64 = 1e-9;

/// Severity label assigned by the scoring service.
///
/// Labels the client does not recognize are kept verbatim in `Other` so a
/// service-side addition never fails decoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RiskCategory {
    Low,
    Moderate,
    High,
    Critical,
    Other(String),
}

impl RiskCategory {
    pub fn as_str(&self) -> &str {
        match self {
            RiskCategory::Low => "Low",
            RiskCategory::Moderate => "Moderate",
            RiskCategory::High => "High",
            RiskCategory::Critical => "Critical",
            RiskCategory::Other(label) => label,
        }
    }
}

impl From<String> for RiskCategory {
    fn from(label: String) -> Self {
        match label.as_str() {
            "Low" => RiskCategory::Low,
            "Moderate" => RiskCategory::Moderate,
            "High" => RiskCategory::High,
            "Critical" => RiskCategory::Critical,
            _ => RiskCategory::Other(label),
        }
    }
}

impl From<&str> for RiskCategory {
    fn from(label: &str) -> Self {
        RiskCategory::from(label.to_string())
    }
}

impl From<RiskCategory> for String {
    fn from(category: RiskCategory) -> Self {
        match category {
            RiskCategory::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signed contribution of one feature to a single prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FactorAttribution {
    pub feature: String,
    pub value: f64,
}

/// A risk estimate returned by the scoring service.
///
/// Never mutated after decoding; a new edit produces a new result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PredictionResult {
    /// Absent for what-if results, which the service does not persist.
    pub id: Option<u64>,
    pub condition_type: ConditionType,
    pub risk_probability: f64,
    pub confidence_interval_low: f64,
    pub confidence_interval_high: f64,
    #[ts(type = "string")]
    pub risk_category: RiskCategory,
    pub factor_attributions: Vec<FactorAttribution>,
    pub explanation: String,
    pub created_at: Option<jiff::civil::DateTime>,
}

impl PredictionResult {
    /// Check the contract the scoring service promises for every result:
    /// the probability lies in `[0, 1]` and the confidence interval brackets it.
    pub fn check(&self) -> Result<(), CoreError> {
        let p = self.risk_probability;
        if !(0.0..=1.0).contains(&p) {
            return Err(CoreError::ProbabilityOutOfRange(p));
        }
        let low = self.confidence_interval_low;
        let high = self.confidence_interval_high;
        if low.is_nan() || high.is_nan() || low > p + INTERVAL_TOLERANCE || p > high + INTERVAL_TOLERANCE
        {
            return Err(CoreError::IntervalViolation {
                low,
                probability: p,
                high,
            });
        }
        Ok(())
    }
}
