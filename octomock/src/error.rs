//! Error types for the harness and the client it drives.
//!
//! Two families live here:
//!
//! - [`CallMismatch`] describes why a recorded call on a stand-in did not
//!   match what a test expected. Assertion helpers turn it into a panic at
//!   the call site.
//! - [`Error`] is what the client library and the fixture loader return.
//!
//! # Examples
//!
//! ```
//! use octomock::error::{CallMismatch, Error};
//! use serde_json::json;
//!
//! let err = Error::authentication_failed("Requires authentication");
//! assert_eq!(err.code(), "AUTHENTICATION_FAILED");
//!
//! let mismatch = CallMismatch::Payload {
//!     expected: json!({"state": "open"}),
//!     actual: json!({"state": "closed"}),
//! };
//! assert!(mismatch.to_string().contains("payload mismatch"));
//! ```

use std::fmt;
use std::io;
use std::path::PathBuf;

use http::{Method, StatusCode};
use serde_json::{Map, Value};

use crate::config::ConfigError;

/// Why a recorded call did not match the expected one.
///
/// The first four variants are assertion failures. The last three mean the
/// recorded call could not be normalized at all.
#[derive(Debug, Clone, PartialEq)]
pub enum CallMismatch {
    /// The stand-in method was never invoked.
    NotCalled { method: Method },
    /// Positional values differ after payload reconciliation.
    Positional {
        expected: Vec<Value>,
        actual: Vec<Value>,
    },
    /// Payloads differ after decoding.
    Payload { expected: Value, actual: Value },
    /// Named values differ once the payload entry is removed.
    Named {
        expected: Map<String, Value>,
        actual: Map<String, Value>,
    },
    /// The payload was passed both as a named entry and positionally.
    AmbiguousPayload { positional: Vec<Value> },
    /// No named payload and no second positional value.
    MissingPayload { positional: Vec<Value> },
    /// The recorded payload was not valid JSON text.
    InvalidPayload { text: String, reason: String },
}

impl fmt::Display for CallMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallMismatch::NotCalled { method } => {
                write!(f, "expected {} to have been called, but it was not", method)
            }
            CallMismatch::Positional { expected, actual } => write!(
                f,
                "positional argument mismatch\n  expected: {}\n    actual: {}",
                Value::Array(expected.clone()),
                Value::Array(actual.clone())
            ),
            CallMismatch::Payload { expected, actual } => write!(
                f,
                "payload mismatch\n  expected: {}\n    actual: {}",
                expected, actual
            ),
            CallMismatch::Named { expected, actual } => write!(
                f,
                "named argument mismatch\n  expected: {}\n    actual: {}",
                Value::Object(expected.clone()),
                Value::Object(actual.clone())
            ),
            CallMismatch::AmbiguousPayload { positional } => write!(
                f,
                "payload passed both as `data` and positionally: {}",
                Value::Array(positional.clone())
            ),
            CallMismatch::MissingPayload { positional } => write!(
                f,
                "no payload recorded (no `data` entry and no second positional value): {}",
                Value::Array(positional.clone())
            ),
            CallMismatch::InvalidPayload { text, reason } => {
                write!(f, "recorded payload {:?} is not valid JSON: {}", text, reason)
            }
        }
    }
}

impl std::error::Error for CallMismatch {}

/// Errors returned by the client library and the fixture loader.
#[derive(Debug)]
pub enum Error {
    /// The session carries no credentials for an endpoint that needs them.
    AuthenticationFailed(String),
    /// The object was built without a session and cannot make requests.
    Detached,
    /// The server answered with a status the caller did not expect.
    UnexpectedStatus { status: StatusCode, message: String },
    /// A response body or fixture was not the JSON we expected.
    Decode(serde_json::Error),
    /// A fixture file could not be read.
    Fixture { path: PathBuf, source: io::Error },
    /// Harness configuration could not be loaded.
    Config(ConfigError),
}

impl Error {
    /// Creates an authentication failure.
    pub fn authentication_failed(message: impl Into<String>) -> Self {
        Error::AuthenticationFailed(message.into())
    }

    /// Creates an unexpected-status error.
    pub fn unexpected_status(status: StatusCode, message: impl Into<String>) -> Self {
        Error::UnexpectedStatus {
            status,
            message: message.into(),
        }
    }

    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Error::AuthenticationFailed(_) => "AUTHENTICATION_FAILED",
            Error::Detached => "DETACHED",
            Error::UnexpectedStatus { .. } => "UNEXPECTED_STATUS",
            Error::Decode(_) => "DECODE_ERROR",
            Error::Fixture { .. } => "FIXTURE_ERROR",
            Error::Config(_) => "CONFIG_ERROR",
        }
    }

    /// The HTTP status associated with this error, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::AuthenticationFailed(_) => Some(StatusCode::UNAUTHORIZED),
            Error::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::AuthenticationFailed(message) => write!(f, "401 {}", message),
            Error::Detached => write!(f, "object is not attached to a session"),
            Error::UnexpectedStatus { status, message } => {
                write!(f, "{} {}", status.as_u16(), message)
            }
            Error::Decode(err) => write!(f, "invalid JSON: {}", err),
            Error::Fixture { path, source } => {
                write!(f, "failed to read fixture '{}': {}", path.display(), source)
            }
            Error::Config(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Decode(err) => Some(err),
            Error::Fixture { source, .. } => Some(source),
            Error::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Decode(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Config(err)
    }
}

/// Result type for client and fixture operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_authentication_failed() {
        let err = Error::authentication_failed("Requires authentication");
        assert_eq!(err.code(), "AUTHENTICATION_FAILED");
        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
        assert_eq!(err.to_string(), "401 Requires authentication");
    }

    #[test]
    fn test_unexpected_status() {
        let err = Error::unexpected_status(StatusCode::NOT_FOUND, "Not Found");
        assert_eq!(err.code(), "UNEXPECTED_STATUS");
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(err.to_string(), "404 Not Found");
    }

    #[test]
    fn test_decode_from_serde() {
        let parse_err = serde_json::from_str::<Value>("{not json").unwrap_err();
        let err: Error = parse_err.into();
        assert_eq!(err.code(), "DECODE_ERROR");
        assert!(err.status().is_none());
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_fixture_error_display() {
        let err = Error::Fixture {
            path: PathBuf::from("tests/json/missing.json"),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        assert_eq!(
            err.to_string(),
            "failed to read fixture 'tests/json/missing.json': no such file"
        );
    }

    #[test]
    fn test_config_error_converts() {
        let err: Error = ConfigError::Missing("OCTOMOCK_FIXTURE_DIR".to_string()).into();
        assert_eq!(err.code(), "CONFIG_ERROR");
        assert!(err.to_string().contains("OCTOMOCK_FIXTURE_DIR"));
    }

    #[test]
    fn test_not_called_display() {
        let mismatch = CallMismatch::NotCalled {
            method: Method::PATCH,
        };
        assert_eq!(
            mismatch.to_string(),
            "expected PATCH to have been called, but it was not"
        );
    }

    #[test]
    fn test_positional_display_shows_both_sides() {
        let mismatch = CallMismatch::Positional {
            expected: vec![json!("/repos/o/r")],
            actual: vec![json!("/repos/o/x")],
        };
        let message = mismatch.to_string();
        assert!(message.starts_with("positional argument mismatch"));
        assert!(message.contains(r#"["/repos/o/r"]"#));
        assert!(message.contains(r#"["/repos/o/x"]"#));
    }

    #[test]
    fn test_named_display() {
        let mut actual = Map::new();
        actual.insert("headers".to_string(), json!({"Accept": "x"}));
        let mismatch = CallMismatch::Named {
            expected: Map::new(),
            actual,
        };
        let message = mismatch.to_string();
        assert!(message.contains("named argument mismatch"));
        assert!(message.contains("headers"));
    }
}
