use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

/// Defines the legal range for a numeric field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
    /// Input granularity hint for the form. Not enforced.
    pub step: Option<f64>,
}

impl NumericRange {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// The two shapes an input field can take.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export)]
pub enum FieldKind {
    Numeric(NumericRange),
    Enumerated { options: Vec<String> },
}

impl FieldKind {
    /// True when the option set is exactly `{Yes, No}`, in any order.
    /// Such fields travel to the scoring service as booleans.
    pub fn is_yes_no(&self) -> bool {
        match self {
            FieldKind::Enumerated { options } => {
                let set: BTreeSet<&str> = options.iter().map(String::as_str).collect();
                set == BTreeSet::from(["No", "Yes"])
            }
            FieldKind::Numeric(_) => false,
        }
    }
}

/// One input field of a condition's form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FieldDefinition {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldDefinition {
    pub fn numeric(name: &str, label: &str, min: f64, max: f64, step: Option<f64>) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind: FieldKind::Numeric(NumericRange { min, max, step }),
            required: true,
        }
    }

    pub fn enumerated(name: &str, label: &str, options: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind: FieldKind::Enumerated {
                options: options.iter().map(|o| o.to_string()).collect(),
            },
            required: true,
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

/// A problem with one field of an [`AssessmentInput`](cliniq_core::models::input::AssessmentInput).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum FieldError {
    #[error("{label} is required")]
    MissingField { field: String, label: String },

    #[error("{label} must be a number")]
    NotANumber {
        field: String,
        label: String,
        raw: String,
    },

    #[error("{label} must be between {min} and {max}")]
    OutOfRange {
        field: String,
        label: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{label}: '{raw}' is not one of {}", .options.join(", "))]
    InvalidOption {
        field: String,
        label: String,
        raw: String,
        options: Vec<String>,
    },
}

impl FieldError {
    /// Name of the offending field, for highlighting it in a form.
    pub fn field(&self) -> &str {
        match self {
            FieldError::MissingField { field, .. }
            | FieldError::NotANumber { field, .. }
            | FieldError::OutOfRange { field, .. }
            | FieldError::InvalidOption { field, .. } => field,
        }
    }
}
