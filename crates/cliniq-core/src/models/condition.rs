use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// A condition the scoring service can assess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ConditionType {
    Diabetes,
    HeartDisease,
}

impl ConditionType {
    pub const ALL: [ConditionType; 2] = [ConditionType::Diabetes, ConditionType::HeartDisease];

    /// Wire name, e.g. `"heart_disease"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionType::Diabetes => "diabetes",
            ConditionType::HeartDisease => "heart_disease",
        }
    }

    /// Human-readable name, e.g. `"Heart Disease"`.
    pub fn display_name(&self) -> &'static str {
        match self {
            ConditionType::Diabetes => "Diabetes",
            ConditionType::HeartDisease => "Heart Disease",
        }
    }
}

impl fmt::Display for ConditionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConditionType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConditionType::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| CoreError::UnknownConditionType(s.to_string()))
    }
}
