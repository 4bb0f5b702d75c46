use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::condition::ConditionType;
use super::input::AssessmentInput;

/// Identifier the remote service assigns to a patient record.
pub type RecordId = u64;

/// A submitted assessment as stored by the remote service. Read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PatientRecord {
    pub id: RecordId,
    pub patient_name: String,
    pub condition_type: ConditionType,
    pub created_at: jiff::civil::DateTime,
    /// Empty when the record came from a summary listing.
    #[serde(default)]
    pub input_data: AssessmentInput,
}
