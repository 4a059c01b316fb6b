//! Recorded calls and the rules for matching them against expectations.
//!
//! The client sends a request payload one of two ways: as the second
//! positional value (`post(url, json_text)`) or as the named `data` entry
//! (`patch(url, data=json_text)`). Structured payloads travel as JSON text,
//! raw bodies as plain strings. [`match_call`] reconciles both conventions
//! and both encodings so a test can state its expectation once.
//!
//! # Examples
//!
//! ```
//! use octomock::call::{Call, ExpectedCall, match_call};
//! use serde_json::json;
//!
//! let recorded = Call::new("/repos/o/r").arg(r#"{"state": "open"}"#);
//! let expected = ExpectedCall::new("/repos/o/r").data(json!({"state": "open"}));
//!
//! assert!(match_call(&recorded, &expected).is_ok());
//! ```

use serde_json::{Map, Value};

use crate::error::CallMismatch;

/// Name of the named entry that carries a request payload.
pub const PAYLOAD_KEY: &str = "data";

/// Arguments of a single invocation on a session method.
///
/// The client builds one of these for every request; stand-ins keep them as
/// the recorded call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Call {
    pub positional: Vec<Value>,
    pub named: Map<String, Value>,
}

impl Call {
    /// Creates a call whose first positional value is `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            positional: vec![Value::String(url.into())],
            named: Map::new(),
        }
    }

    /// Appends a positional value.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Sets a named value.
    pub fn named(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.named.insert(key.into(), value.into());
        self
    }

    /// Sets the named payload entry.
    pub fn data(self, value: impl Into<Value>) -> Self {
        self.named(PAYLOAD_KEY, value)
    }

    /// The target location, if one was passed.
    pub fn url(&self) -> Option<&str> {
        self.positional.first().and_then(Value::as_str)
    }
}

/// What a test expects a stand-in to have been called with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpectedCall {
    pub positional: Vec<Value>,
    pub named: Map<String, Value>,
    pub payload: Option<Value>,
}

impl ExpectedCall {
    /// Expects `url` as the only positional value.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            positional: vec![Value::String(url.into())],
            ..Self::default()
        }
    }

    /// Expects exactly these positional values.
    pub fn with_positional(positional: Vec<Value>) -> Self {
        Self {
            positional,
            ..Self::default()
        }
    }

    /// Expects a payload.
    ///
    /// A string is compared verbatim. Anything else is compared against the
    /// decoded JSON text of the recorded payload.
    pub fn data(mut self, payload: impl Into<Value>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// Expects a named value other than the payload.
    pub fn named(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        let value = value.into();
        if key == PAYLOAD_KEY {
            self.payload = Some(value);
        } else {
            self.named.insert(key, value);
        }
        self
    }
}

/// The recorded call after payload reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedCall {
    pub positional: Vec<Value>,
    pub payload: Option<Value>,
    pub named: Map<String, Value>,
}

/// Splits the payload out of a recorded call.
///
/// A named `data` entry wins and leaves the positional values alone.
/// Otherwise the second positional value is the payload and the positional
/// values are cut down to the target location.
pub fn normalize(recorded: &Call) -> Result<NormalizedCall, CallMismatch> {
    let mut named = recorded.named.clone();

    match named.remove(PAYLOAD_KEY) {
        Some(payload) => {
            if recorded.positional.len() > 1 {
                return Err(CallMismatch::AmbiguousPayload {
                    positional: recorded.positional.clone(),
                });
            }
            Ok(NormalizedCall {
                positional: recorded.positional.clone(),
                payload: Some(payload),
                named,
            })
        }
        None => match recorded.positional.as_slice() {
            [url, payload, ..] => Ok(NormalizedCall {
                positional: vec![url.clone()],
                payload: Some(payload.clone()),
                named,
            }),
            _ => Err(CallMismatch::MissingPayload {
                positional: recorded.positional.clone(),
            }),
        },
    }
}

/// Checks a recorded call against an expectation.
///
/// Positional values are compared first, then the payload, then the
/// remaining named values. The first difference is returned.
pub fn match_call(recorded: &Call, expected: &ExpectedCall) -> Result<(), CallMismatch> {
    let normalized = normalize(recorded)?;

    let expected_payload = expected.payload.clone().unwrap_or(Value::Null);
    let actual_payload = match normalized.payload {
        Some(payload) if !expected_payload.is_string() => decode_payload(payload)?,
        Some(payload) => payload,
        None => Value::Null,
    };

    if expected.positional != normalized.positional {
        return Err(CallMismatch::Positional {
            expected: expected.positional.clone(),
            actual: normalized.positional,
        });
    }

    if expected_payload != actual_payload {
        return Err(CallMismatch::Payload {
            expected: expected_payload,
            actual: actual_payload,
        });
    }

    if expected.named != normalized.named {
        return Err(CallMismatch::Named {
            expected: expected.named.clone(),
            actual: normalized.named,
        });
    }

    Ok(())
}

// Only non-empty JSON text is decoded; structured values and empty strings
// are compared as recorded.
fn decode_payload(payload: Value) -> Result<Value, CallMismatch> {
    match payload {
        Value::String(text) if !text.is_empty() => {
            serde_json::from_str(&text).map_err(|err| CallMismatch::InvalidPayload {
                reason: err.to_string(),
                text,
            })
        }
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_positional_payload_is_decoded() {
        let recorded = Call::new("/repos/o/r").arg(r#"{"state": "open"}"#);
        let expected = ExpectedCall::new("/repos/o/r").data(json!({"state": "open"}));

        assert_eq!(match_call(&recorded, &expected), Ok(()));
    }

    #[test]
    fn test_positional_values_truncated_to_url() {
        let recorded = Call::new("/repos/o/r").arg(r#"{"a": 1}"#);
        let normalized = normalize(&recorded).unwrap();

        assert_eq!(normalized.positional, vec![json!("/repos/o/r")]);
        assert_eq!(normalized.payload, Some(json!(r#"{"a": 1}"#)));
    }

    #[test]
    fn test_named_payload_needs_no_second_positional() {
        let recorded = Call::new("/repos/o/r/issues/1").data(r#"{"state": "closed"}"#);
        let expected =
            ExpectedCall::new("/repos/o/r/issues/1").data(json!({"state": "closed"}));

        assert_eq!(match_call(&recorded, &expected), Ok(()));
    }

    #[test]
    fn test_literal_string_named_payload_is_not_decoded() {
        let recorded = Call::new("/markdown/raw").data("raw-string");
        let expected = ExpectedCall::new("/markdown/raw").data("raw-string");

        assert_eq!(match_call(&recorded, &expected), Ok(()));
    }

    #[test]
    fn test_literal_string_positional_payload_is_not_decoded() {
        let recorded = Call::new("/markdown/raw").arg("# Hello");
        let expected = ExpectedCall::new("/markdown/raw").data("# Hello");

        assert_eq!(match_call(&recorded, &expected), Ok(()));
    }

    #[test]
    fn test_literal_string_that_looks_like_json_is_compared_verbatim() {
        let recorded = Call::new("/u").arg(r#"{"a":1}"#);
        let expected = ExpectedCall::new("/u").data(r#"{"a": 1}"#);

        assert!(matches!(
            match_call(&recorded, &expected),
            Err(CallMismatch::Payload { .. })
        ));
    }

    #[test]
    fn test_sequence_payload_round_trips() {
        let labels = json!(["bug", "enhancement"]);
        let text = serde_json::to_string(&labels).unwrap();
        let recorded = Call::new("/repos/o/r/issues/1/labels").arg(text);
        let expected = ExpectedCall::new("/repos/o/r/issues/1/labels").data(labels);

        assert_eq!(match_call(&recorded, &expected), Ok(()));
    }

    #[test]
    fn test_unexpected_named_value_fails() {
        let recorded = Call::new("/repos/o/r")
            .data(r#"{"name": "r"}"#)
            .named("headers", json!({"Accept": "application/vnd.github+json"}));
        let expected = ExpectedCall::new("/repos/o/r").data(json!({"name": "r"}));

        let err = match_call(&recorded, &expected).unwrap_err();
        match err {
            CallMismatch::Named { expected, actual } => {
                assert!(expected.is_empty());
                assert!(actual.contains_key("headers"));
                assert!(!actual.contains_key(PAYLOAD_KEY));
            }
            other => panic!("expected named mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_expected_named_values_match() {
        let recorded = Call::new("/repos/o/r/issues/1/lock")
            .data(r#"{"lock_reason": "spam"}"#)
            .named("headers", json!({"Accept": "preview"}));
        let expected = ExpectedCall::new("/repos/o/r/issues/1/lock")
            .data(json!({"lock_reason": "spam"}))
            .named("headers", json!({"Accept": "preview"}));

        assert_eq!(match_call(&recorded, &expected), Ok(()));
    }

    #[test]
    fn test_positional_mismatch_reported_first() {
        let recorded = Call::new("/repos/o/other").arg(r#"{"x": 2}"#);
        let expected = ExpectedCall::new("/repos/o/r").data(json!({"x": 1}));

        assert!(matches!(
            match_call(&recorded, &expected),
            Err(CallMismatch::Positional { .. })
        ));
    }

    #[test]
    fn test_payload_mismatch() {
        let recorded = Call::new("/repos/o/r").arg(r#"{"state": "closed"}"#);
        let expected = ExpectedCall::new("/repos/o/r").data(json!({"state": "open"}));

        assert_eq!(
            match_call(&recorded, &expected),
            Err(CallMismatch::Payload {
                expected: json!({"state": "open"}),
                actual: json!({"state": "closed"}),
            })
        );
    }

    #[test]
    fn test_missing_payload() {
        let recorded = Call::new("/repos/o/r");
        let expected = ExpectedCall::new("/repos/o/r");

        assert!(matches!(
            match_call(&recorded, &expected),
            Err(CallMismatch::MissingPayload { .. })
        ));
    }

    #[test]
    fn test_payload_in_both_places_is_usage_error() {
        let recorded = Call::new("/repos/o/r").arg("{}").data("{}");
        let expected = ExpectedCall::new("/repos/o/r").data(json!({}));

        assert!(matches!(
            match_call(&recorded, &expected),
            Err(CallMismatch::AmbiguousPayload { .. })
        ));
    }

    #[test]
    fn test_invalid_json_payload() {
        let recorded = Call::new("/repos/o/r").arg("{not json");
        let expected = ExpectedCall::new("/repos/o/r").data(json!({}));

        match match_call(&recorded, &expected) {
            Err(CallMismatch::InvalidPayload { text, .. }) => assert_eq!(text, "{not json"),
            other => panic!("expected invalid payload, got {:?}", other),
        }
    }

    #[test]
    fn test_no_expected_payload_matches_null() {
        let recorded = Call::new("/repos/o/r").data(Value::Null);
        let expected = ExpectedCall::new("/repos/o/r");

        assert_eq!(match_call(&recorded, &expected), Ok(()));
    }

    #[test]
    fn test_structured_recorded_payload_compared_as_is() {
        let recorded = Call::new("/repos/o/r").data(json!({"private": true}));
        let expected = ExpectedCall::new("/repos/o/r").data(json!({"private": true}));

        assert_eq!(match_call(&recorded, &expected), Ok(()));
    }

    #[test]
    fn test_expected_named_data_becomes_payload() {
        let expected = ExpectedCall::new("/u").named(PAYLOAD_KEY, "text");
        assert_eq!(expected.payload, Some(json!("text")));
        assert!(expected.named.is_empty());
    }

    #[test]
    fn test_call_url() {
        assert_eq!(Call::new("/user").url(), Some("/user"));
        assert_eq!(Call::default().url(), None);
    }
}
