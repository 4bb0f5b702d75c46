//! Raw form values to the canonical payload shape.
//!
//! The mapping is driven entirely by each field's [`FieldKind`]:
//!
//! - `Numeric` → `f64`
//! - `Enumerated` with options exactly `{Yes, No}` → `bool`
//! - any other `Enumerated` → the option string unchanged
//!
//! A new Yes/No field therefore needs only a field definition, never a
//! change here.

use cliniq_core::models::input::{AssessmentInput, RawValue};
use cliniq_core::models::payload::{CanonicalValue, NormalizedPayload};

use crate::error::SchemaError;
use crate::field::{FieldDefinition, FieldKind};
use crate::validate::parse_number;

/// Normalize `input` against `fields`.
///
/// Intended for input that already passed validation. Anything that still
/// cannot be mapped is reported as [`SchemaError::Unnormalizable`] for the
/// first such field. Only defined fields are emitted; absent optional fields
/// are left out.
pub fn normalize_fields(
    fields: &[FieldDefinition],
    input: &AssessmentInput,
) -> Result<NormalizedPayload, SchemaError> {
    let mut entries = Vec::with_capacity(fields.len());

    for def in fields {
        let raw = match input.get(&def.name) {
            Some(v) if !v.is_blank() => v,
            _ if def.required => return Err(unnormalizable(def, "value is missing")),
            _ => continue,
        };
        entries.push((def.name.as_str(), canonical_value(def, raw)?));
    }

    Ok(entries.into_iter().collect())
}

fn canonical_value(def: &FieldDefinition, raw: &RawValue) -> Result<CanonicalValue, SchemaError> {
    match &def.kind {
        FieldKind::Numeric(_) => parse_number(raw)
            .map(CanonicalValue::Number)
            .ok_or_else(|| unnormalizable(def, "not a finite number")),
        kind if kind.is_yes_no() => match raw.as_text().as_ref() {
            "Yes" => Ok(CanonicalValue::Bool(true)),
            "No" => Ok(CanonicalValue::Bool(false)),
            other => Err(unnormalizable(def, &format!("'{other}' is neither Yes nor No"))),
        },
        FieldKind::Enumerated { .. } => Ok(CanonicalValue::Text(raw.as_text().into_owned())),
    }
}

fn unnormalizable(def: &FieldDefinition, reason: &str) -> SchemaError {
    SchemaError::Unnormalizable {
        field: def.name.clone(),
        reason: reason.to_string(),
    }
}
