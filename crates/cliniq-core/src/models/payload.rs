use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A field value in the canonical shape the scoring service expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum CanonicalValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

/// Canonical request body. Serializes as a flat JSON object.
///
/// Built once per normalization call and never edited afterwards, so the
/// only constructor is [`FromIterator`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NormalizedPayload(BTreeMap<String, CanonicalValue>);

impl NormalizedPayload {
    pub fn get(&self, field: &str) -> Option<&CanonicalValue> {
        self.0.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CanonicalValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, CanonicalValue)> for NormalizedPayload {
    fn from_iter<I: IntoIterator<Item = (K, CanonicalValue)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
