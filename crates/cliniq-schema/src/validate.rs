//! Field-level checks against a condition's field definitions.

use cliniq_core::models::input::{AssessmentInput, RawValue};

use crate::field::{FieldDefinition, FieldError, FieldKind};

/// Check every field definition against `input` and collect all problems.
///
/// Never stops at the first error, so a form can highlight every offending
/// field at once. At most one error is reported per field, in definition
/// order. Input keys with no definition are ignored.
pub fn validate_fields(fields: &[FieldDefinition], input: &AssessmentInput) -> Vec<FieldError> {
    fields
        .iter()
        .filter_map(|def| check_field(def, input.get(&def.name)))
        .collect()
}

fn check_field(def: &FieldDefinition, raw: Option<&RawValue>) -> Option<FieldError> {
    let raw = match raw {
        Some(v) if !v.is_blank() => v,
        _ if def.required => {
            return Some(FieldError::MissingField {
                field: def.name.clone(),
                label: def.label.clone(),
            });
        }
        _ => return None,
    };

    match &def.kind {
        FieldKind::Numeric(range) => match parse_number(raw) {
            None => Some(FieldError::NotANumber {
                field: def.name.clone(),
                label: def.label.clone(),
                raw: raw.as_text().into_owned(),
            }),
            Some(value) if !range.contains(value) => Some(FieldError::OutOfRange {
                field: def.name.clone(),
                label: def.label.clone(),
                value,
                min: range.min,
                max: range.max,
            }),
            Some(_) => None,
        },
        FieldKind::Enumerated { options } => {
            let text = raw.as_text();
            if options.iter().any(|o| o.as_str() == text) {
                None
            } else {
                Some(FieldError::InvalidOption {
                    field: def.name.clone(),
                    label: def.label.clone(),
                    raw: text.into_owned(),
                    options: options.clone(),
                })
            }
        }
    }
}

/// Parse a raw value as a finite number. `"NaN"` and `"inf"` do not count.
pub(crate) fn parse_number(raw: &RawValue) -> Option<f64> {
    let n = match raw {
        RawValue::Number(n) => *n,
        RawValue::Text(s) => s.trim().parse::<f64>().ok()?,
        RawValue::Flag(_) => return None,
    };
    n.is_finite().then_some(n)
}
