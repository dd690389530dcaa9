// ABOUTME: Discriminated parser for Garmin payload shapes
// ABOUTME: Classifies raw JSON as absent, privacy protected, object or list before normalization
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zhiji Health

use serde_json::{Map, Value};

/// Key Garmin sets on resources hidden by the user's privacy settings
const PRIVACY_PROTECTED_KEY: &str = "privacyProtected";

/// Shape of one raw Garmin resource
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RawPayload {
    /// Nothing came back (failure, null, empty, or an unusable scalar)
    #[default]
    Absent,
    /// Garmin withheld the resource
    PrivacyProtected,
    /// A single JSON object
    Object(Map<String, Value>),
    /// A JSON array (entries may be of any type)
    List(Vec<Value>),
}

impl RawPayload {
    /// Classify a raw value
    #[must_use]
    pub fn parse(value: Value) -> Self {
        match value {
            Value::Object(map) if is_privacy_sentinel(&map) => Self::PrivacyProtected,
            Value::Object(map) if map.is_empty() => Self::Absent,
            Value::Object(map) => Self::Object(map),
            Value::Array(items) if items.is_empty() => Self::Absent,
            Value::Array(items) => Self::List(items),
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => Self::Absent,
        }
    }

    /// Whether the payload carries data worth reading
    #[must_use]
    pub const fn is_present(&self) -> bool {
        matches!(self, Self::Object(_) | Self::List(_))
    }

    /// The object itself, or the first object of a list
    #[must_use]
    pub fn first_object(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Object(map) => Some(map),
            Self::List(items) => items
                .iter()
                .filter_map(Value::as_object)
                .find(|map| !is_privacy_sentinel(map)),
            Self::Absent | Self::PrivacyProtected => None,
        }
    }

    /// Every object entry: the object itself, or each object of a list
    pub fn objects(&self) -> Box<dyn Iterator<Item = &Map<String, Value>> + '_> {
        match self {
            Self::Object(map) => Box::new(std::iter::once(map)),
            Self::List(items) => Box::new(
                items
                    .iter()
                    .filter_map(Value::as_object)
                    .filter(|map| !is_privacy_sentinel(map)),
            ),
            Self::Absent | Self::PrivacyProtected => Box::new(std::iter::empty()),
        }
    }
}

fn is_privacy_sentinel(map: &Map<String, Value>) -> bool {
    map.get(PRIVACY_PROTECTED_KEY)
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// Read a finite number, accepting numeric strings
#[must_use]
pub fn number(map: &Map<String, Value>, key: &str) -> Option<f64> {
    let parsed = match map.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.filter(|v: &f64| v.is_finite())
}

/// First key among `keys` holding a finite number
#[must_use]
pub fn first_number(map: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|key| number(map, key))
}

/// Nested object under `key`, if any
#[must_use]
pub fn nested<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
    map.get(key).and_then(Value::as_object)
}

/// Non-empty string under `key`
#[must_use]
pub fn text<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    map.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_shapes_are_classified() {
        assert_eq!(RawPayload::parse(Value::Null), RawPayload::Absent);
        assert_eq!(RawPayload::parse(json!([])), RawPayload::Absent);
        assert_eq!(RawPayload::parse(json!({})), RawPayload::Absent);
        assert_eq!(RawPayload::parse(json!("oops")), RawPayload::Absent);
        assert_eq!(RawPayload::parse(json!(42)), RawPayload::Absent);
        assert_eq!(
            RawPayload::parse(json!({"privacyProtected": true})),
            RawPayload::PrivacyProtected
        );
        assert!(matches!(
            RawPayload::parse(json!({"totalSteps": 10})),
            RawPayload::Object(_)
        ));
        assert!(matches!(
            RawPayload::parse(json!([{"steps": 10}])),
            RawPayload::List(_)
        ));
    }

    #[test]
    fn test_privacy_false_is_data() {
        let payload = RawPayload::parse(json!({"privacyProtected": false, "totalSteps": 5}));
        assert!(payload.is_present());
    }

    #[test]
    fn test_first_object_skips_non_objects() {
        let payload = RawPayload::parse(json!([1, "x", {"a": 1}, {"a": 2}]));
        assert_eq!(payload.first_object().and_then(|m| number(m, "a")), Some(1.0));
        assert_eq!(payload.objects().count(), 2);
    }

    #[test]
    fn test_number_accepts_numeric_strings() {
        let map = json!({"a": "12.5", "b": "n/a", "c": true}).as_object().unwrap().clone();
        assert_eq!(number(&map, "a"), Some(12.5));
        assert_eq!(number(&map, "b"), None);
        assert_eq!(number(&map, "c"), None);
        assert_eq!(first_number(&map, &["missing", "a"]), Some(12.5));
    }
}
