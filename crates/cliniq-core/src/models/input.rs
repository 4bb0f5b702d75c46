use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

/// A field value exactly as the user (or an older stored record) supplied it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum RawValue {
    /// Stored records written before normalization carry real booleans.
    Flag(bool),
    Number(f64),
    Text(String),
}

impl RawValue {
    /// The value as the form would display it. Booleans render as `Yes`/`No`.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            RawValue::Text(s) => Cow::Borrowed(s.as_str()),
            RawValue::Number(n) => Cow::Owned(n.to_string()),
            RawValue::Flag(true) => Cow::Borrowed("Yes"),
            RawValue::Flag(false) => Cow::Borrowed("No"),
        }
    }

    /// True for text that is empty after trimming (an untouched number input).
    pub fn is_blank(&self) -> bool {
        matches!(self, RawValue::Text(s) if s.trim().is_empty())
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        RawValue::Flag(b)
    }
}

/// Raw form state: field name to value as entered.
///
/// Only the UI layer mutates this; the engine reads it through the
/// validator and normalizer. A JSON `null` decodes as an absent field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct AssessmentInput(BTreeMap<String, RawValue>);

impl AssessmentInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&RawValue> {
        self.0.get(field)
    }

    /// Set a field, returning the previous value if there was one.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<RawValue>) -> Option<RawValue> {
        self.0.insert(field.into(), value.into())
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.set(field, value);
        self
    }

    pub fn remove(&mut self, field: &str) -> Option<RawValue> {
        self.0.remove(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for AssessmentInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = BTreeMap::<String, Option<RawValue>>::deserialize(deserializer)?;
        Ok(entries
            .into_iter()
            .filter_map(|(field, value)| value.map(|v| (field, v)))
            .collect())
    }
}

impl<K: Into<String>, V: Into<RawValue>> FromIterator<(K, V)> for AssessmentInput {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
