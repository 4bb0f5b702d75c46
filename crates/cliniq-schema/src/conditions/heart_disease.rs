use cliniq_core::models::condition::ConditionType;

use crate::ConditionSchema;
use crate::field::FieldDefinition;

/// Cardiovascular disease risk.
/// Blood pressure pair, lifestyle flags and BMI. All lifestyle flags are Yes/No.
pub struct HeartDisease;

impl ConditionSchema for HeartDisease {
    fn condition(&self) -> ConditionType {
        ConditionType::HeartDisease
    }

    fn fields(&self) -> &[FieldDefinition] {
        static FIELDS: std::sync::LazyLock<Vec<FieldDefinition>> = std::sync::LazyLock::new(|| {
            vec![
                FieldDefinition::numeric("age", "Age", 0.0, 120.0, None),
                FieldDefinition::enumerated("gender", "Gender", &["Female", "Male"]),
                FieldDefinition::numeric("ap_hi", "Systolic Blood Pressure (mmHg)", 50.0, 250.0, None),
                FieldDefinition::numeric("ap_lo", "Diastolic Blood Pressure (mmHg)", 30.0, 150.0, None),
                FieldDefinition::enumerated("smoke", "Smoking", &["No", "Yes"]),
                FieldDefinition::enumerated("alco", "Alcohol Consumption", &["No", "Yes"]),
                FieldDefinition::enumerated("active", "Physical Activity", &["No", "Yes"]),
                FieldDefinition::numeric("bmi", "BMI", 10.0, 100.0, Some(0.1)),
            ]
        });
        &FIELDS
    }
}
