use cliniq_core::models::condition::ConditionType;

use crate::ConditionSchema;
use crate::field::FieldDefinition;

/// Type 2 diabetes risk.
/// Demographics, comorbidities, smoking history and three lab/body measures.
pub struct Diabetes;

impl ConditionSchema for Diabetes {
    fn condition(&self) -> ConditionType {
        ConditionType::Diabetes
    }

    fn fields(&self) -> &[FieldDefinition] {
        static FIELDS: std::sync::LazyLock<Vec<FieldDefinition>> = std::sync::LazyLock::new(|| {
            vec![
                FieldDefinition::enumerated("gender", "Gender", &["Female", "Male", "Other"]),
                FieldDefinition::numeric("age", "Age", 0.0, 120.0, None),
                FieldDefinition::enumerated("hypertension", "Hypertension", &["No", "Yes"]),
                FieldDefinition::enumerated("heart_disease", "Heart Disease", &["No", "Yes"]),
                FieldDefinition::enumerated(
                    "smoking_history",
                    "Smoking History",
                    &["never", "not current", "ever", "former", "current", "unknown"],
                ),
                FieldDefinition::numeric("bmi", "BMI", 10.0, 100.0, Some(0.1)),
                FieldDefinition::numeric("HbA1c_level", "HbA1c Level (%)", 3.0, 15.0, Some(0.1)),
                FieldDefinition::numeric(
                    "blood_glucose_level",
                    "Blood Glucose Level (mg/dL)",
                    50.0,
                    500.0,
                    None,
                ),
            ]
        });
        &FIELDS
    }
}
