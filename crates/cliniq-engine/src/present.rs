//! Pure mapping from results and session state to display-ready views.
//!
//! Nothing here touches the network or the clock. Views are serializable so
//! any front end can render them.

use serde::Serialize;
use ts_rs::TS;

use cliniq_core::models::comparison::ComparisonResult;
use cliniq_core::models::condition::ConditionType;
use cliniq_core::models::prediction::{FactorAttribution, PredictionResult, RiskCategory};
use cliniq_core::models::record::{PatientRecord, RecordId};
use cliniq_schema::field::FieldError;

use crate::error::SimulationError;
use crate::simulation::{Phase, SimulationSnapshot};

/// Factors shown for a single result.
pub const FACTOR_LIMIT: usize = 8;

/// Factors shown per side of a comparison.
pub const COMPARISON_FACTOR_LIMIT: usize = 6;

/// Visual severity of a risk category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Severity {
    Low,
    Moderate,
    High,
    Critical,
    /// A category label the client does not recognize.
    Unknown,
}

impl Severity {
    pub fn of(category: &RiskCategory) -> Self {
        match category {
            RiskCategory::Low => Severity::Low,
            RiskCategory::Moderate => Severity::Moderate,
            RiskCategory::High => Severity::High,
            RiskCategory::Critical => Severity::Critical,
            RiskCategory::Other(_) => Severity::Unknown,
        }
    }

    /// Color token a renderer maps to its palette.
    pub fn color_token(self) -> &'static str {
        match self {
            Severity::Low => "emerald",
            Severity::Moderate => "amber",
            Severity::High => "orange",
            Severity::Critical => "rose",
            Severity::Unknown => "slate",
        }
    }
}

/// Direction a factor pushes the risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Impact {
    Raises,
    Lowers,
    Neutral,
}

impl Impact {
    pub fn of(value: f64) -> Self {
        if value > 0.0 {
            Impact::Raises
        } else if value < 0.0 {
            Impact::Lowers
        } else {
            Impact::Neutral
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct FactorView {
    pub feature: String,
    pub value: f64,
    /// Signed, four decimals: `+0.2100`.
    pub formatted: String,
    pub impact: Impact,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct PredictionView {
    pub condition: ConditionType,
    /// `"73.0%"`
    pub probability: String,
    /// `"65.2% - 80.1%"`
    pub interval: String,
    pub category: String,
    pub severity: Severity,
    pub color: String,
    pub factors: Vec<FactorView>,
    pub explanation: String,
}

/// What the simulation panel should show right now.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(tag = "state", rename_all = "snake_case")]
#[ts(export)]
pub enum ViewState {
    /// Nothing scored yet.
    Empty,
    /// A result is on its way; `last` stays visible meanwhile.
    Pending { last: Option<PredictionView> },
    Ready { view: PredictionView },
    Invalid {
        errors: Vec<FieldError>,
        last: Option<PredictionView>,
    },
    Unavailable {
        message: String,
        retryable: bool,
        last: Option<PredictionView>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct ComparisonSide {
    pub record_id: RecordId,
    pub patient_name: String,
    pub prediction: PredictionView,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct ComparisonView {
    pub left: ComparisonSide,
    pub right: ComparisonSide,
    /// Absolute probability difference in percentage points: `"12.5 pp"`.
    pub delta: String,
    pub higher_risk_record_id: RecordId,
    pub higher_risk_patient: String,
    pub same_category: bool,
}

/// Format a probability in `[0, 1]` as a percentage with one decimal.
pub fn format_percent(probability: f64) -> String {
    format!("{:.1}%", probability * 100.0)
}

/// Order attributions by absolute value, largest first, and keep `limit`.
/// Equal magnitudes keep their original order.
pub fn rank_factors(factors: &[FactorAttribution], limit: usize) -> Vec<FactorView> {
    let mut ranked: Vec<&FactorAttribution> = factors.iter().collect();
    ranked.sort_by(|a, b| b.value.abs().total_cmp(&a.value.abs()));

    ranked
        .into_iter()
        .take(limit)
        .map(|f| FactorView {
            feature: f.feature.clone(),
            value: f.value,
            formatted: format!("{:+.4}", f.value),
            impact: Impact::of(f.value),
        })
        .collect()
}

pub fn present(prediction: &PredictionResult) -> PredictionView {
    present_with_limit(prediction, FACTOR_LIMIT)
}

pub fn present_with_limit(prediction: &PredictionResult, factor_limit: usize) -> PredictionView {
    let severity = Severity::of(&prediction.risk_category);
    PredictionView {
        condition: prediction.condition_type,
        probability: format_percent(prediction.risk_probability),
        interval: format!(
            "{} - {}",
            format_percent(prediction.confidence_interval_low),
            format_percent(prediction.confidence_interval_high)
        ),
        category: prediction.risk_category.to_string(),
        severity,
        color: severity.color_token().to_string(),
        factors: rank_factors(&prediction.factor_attributions, factor_limit),
        explanation: prediction.explanation.clone(),
    }
}

pub fn present_state(snapshot: &SimulationSnapshot) -> ViewState {
    let last = snapshot.displayed.as_ref().map(present);

    match &snapshot.phase {
        Phase::Idle | Phase::Settled => match last {
            Some(view) => ViewState::Ready { view },
            None => ViewState::Empty,
        },
        Phase::Debouncing | Phase::AwaitingResponse => ViewState::Pending { last },
        Phase::Error(SimulationError::Validation(errors)) => ViewState::Invalid {
            errors: errors.clone(),
            last,
        },
        Phase::Error(SimulationError::Oracle(e)) => ViewState::Unavailable {
            message: e.to_string(),
            retryable: e.is_retryable(),
            last,
        },
        Phase::Error(e) => ViewState::Unavailable {
            message: e.to_string(),
            retryable: false,
            last,
        },
    }
}

pub fn present_comparison(comparison: &ComparisonResult) -> ComparisonView {
    let side = |record: &PatientRecord, prediction: &PredictionResult| ComparisonSide {
        record_id: record.id,
        patient_name: record.patient_name.clone(),
        prediction: present_with_limit(prediction, COMPARISON_FACTOR_LIMIT),
    };

    let differences = &comparison.differences;
    let higher_risk_patient = if differences.higher_risk_record_id == comparison.record_b.id {
        comparison.record_b.patient_name.clone()
    } else {
        comparison.record_a.patient_name.clone()
    };

    ComparisonView {
        left: side(&comparison.record_a, &comparison.prediction_a),
        right: side(&comparison.record_b, &comparison.prediction_b),
        delta: format!("{:.1} pp", differences.risk_delta * 100.0),
        higher_risk_record_id: differences.higher_risk_record_id,
        higher_risk_patient,
        same_category: differences.same_category,
    }
}
