//! cliniq-schema
//!
//! Per-condition input field definitions, validation and normalization.
//! Pure data with no network dependency. Defines which fields each condition
//! accepts, their legal values, and how raw form values become the payload
//! the scoring service expects.

pub mod conditions;
pub mod error;
pub mod field;
pub mod normalize;
pub mod validate;

use cliniq_core::models::condition::ConditionType;
use cliniq_core::models::input::{AssessmentInput, RawValue};
use cliniq_core::models::payload::NormalizedPayload;

use error::SchemaError;
use field::{FieldDefinition, FieldError, FieldKind};

/// Trait implemented by each condition's input schema.
pub trait ConditionSchema: Send + Sync {
    /// The condition this schema describes.
    fn condition(&self) -> ConditionType;

    /// The ordered input fields. Names are unique within a schema.
    fn fields(&self) -> &[FieldDefinition];

    /// Look up a single field by name.
    fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields().iter().find(|f| f.name == name)
    }

    /// Validate raw input, returning every field error found.
    fn validate(&self, input: &AssessmentInput) -> Vec<FieldError> {
        validate::validate_fields(self.fields(), input)
    }

    /// Convert raw input into the canonical request payload.
    fn normalize(&self, input: &AssessmentInput) -> Result<NormalizedPayload, SchemaError> {
        normalize::normalize_fields(self.fields(), input)
    }

    /// Initial form state: the first option for enumerated fields and blank
    /// text for numeric fields.
    fn default_input(&self) -> AssessmentInput {
        self.fields()
            .iter()
            .map(|f| {
                let value = match &f.kind {
                    FieldKind::Enumerated { options } => {
                        RawValue::Text(options.first().cloned().unwrap_or_default())
                    }
                    FieldKind::Numeric(_) => RawValue::Text(String::new()),
                };
                (f.name.clone(), value)
            })
            .collect()
    }
}

/// Return all registered condition schemas.
pub fn all_schemas() -> Vec<&'static dyn ConditionSchema> {
    ConditionType::ALL.into_iter().map(schema).collect()
}

/// The schema registered for a condition.
pub fn schema(condition: ConditionType) -> &'static dyn ConditionSchema {
    match condition {
        ConditionType::Diabetes => &conditions::diabetes::Diabetes,
        ConditionType::HeartDisease => &conditions::heart_disease::HeartDisease,
    }
}

/// Look up a schema by its wire name (e.g. `"heart_disease"`).
pub fn schema_for(name: &str) -> Result<&'static dyn ConditionSchema, SchemaError> {
    name.parse::<ConditionType>()
        .map(schema)
        .map_err(|_| SchemaError::UnknownConditionType(name.to_string()))
}

/// The ordered field definitions for a condition.
pub fn fields_for(condition: ConditionType) -> &'static [FieldDefinition] {
    schema(condition).fields()
}

/// Validate `input` for `condition`. See [`validate::validate_fields`].
pub fn validate(condition: ConditionType, input: &AssessmentInput) -> Vec<FieldError> {
    schema(condition).validate(input)
}

/// Normalize `input` for `condition`. See [`normalize::normalize_fields`].
pub fn normalize(
    condition: ConditionType,
    input: &AssessmentInput,
) -> Result<NormalizedPayload, SchemaError> {
    schema(condition).normalize(input)
}
