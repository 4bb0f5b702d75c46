use serde::Serialize;
use ts_rs::TS;

use cliniq_core::models::condition::ConditionType;
use cliniq_core::models::record::PatientRecord;

/// How many of the newest records a summary lists by default.
pub const RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct ConditionCount {
    pub condition: ConditionType,
    pub count: usize,
}

/// Totals over a record listing, newest records first.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct RecordSummary {
    pub total: usize,
    /// One entry per condition type, including those with no records.
    pub by_condition: Vec<ConditionCount>,
    pub recent: Vec<PatientRecord>,
}

/// Count `records` per condition and keep the `recent_limit` newest.
///
/// Records created at the same instant keep their listing order.
pub fn summarize(mut records: Vec<PatientRecord>, recent_limit: usize) -> RecordSummary {
    let by_condition = ConditionType::ALL
        .iter()
        .map(|&condition| ConditionCount {
            condition,
            count: records
                .iter()
                .filter(|r| r.condition_type == condition)
                .count(),
        })
        .collect();

    let total = records.len();
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    records.truncate(recent_limit);

    RecordSummary {
        total,
        by_condition,
        recent: records,
    }
}
