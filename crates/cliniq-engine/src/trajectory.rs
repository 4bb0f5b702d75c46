use serde::Serialize;
use ts_rs::TS;

use cliniq_core::models::prediction::PredictionResult;
use cliniq_core::models::record::RecordId;
use cliniq_oracle::client::PredictionClient;
use cliniq_oracle::error::OracleError;

/// Probability change between the first and last prediction that counts as a trend.
pub const TREND_THRESHOLD: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

/// One record's predictions in time order.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct RiskTrajectory {
    pub predictions: Vec<PredictionResult>,
    pub trend: Trend,
}

/// Order predictions oldest first and classify the overall trend.
///
/// Predictions without a timestamp sort before all others, keeping their
/// relative order.
pub fn trajectory(mut predictions: Vec<PredictionResult>) -> RiskTrajectory {
    predictions.sort_by(|a, b| a.created_at.cmp(&b.created_at));

    let trend = match (predictions.first(), predictions.last()) {
        (Some(first), Some(last)) if predictions.len() >= 2 => {
            let delta = last.risk_probability - first.risk_probability;
            if delta > TREND_THRESHOLD {
                Trend::Increasing
            } else if delta < -TREND_THRESHOLD {
                Trend::Decreasing
            } else {
                Trend::Stable
            }
        }
        _ => Trend::Stable,
    };

    RiskTrajectory { predictions, trend }
}

/// Fetch a record's predictions and build its trajectory.
pub async fn load(
    client: &dyn PredictionClient,
    record: RecordId,
) -> Result<RiskTrajectory, OracleError> {
    let predictions = client.record_predictions(record).await?;
    Ok(trajectory(predictions))
}
