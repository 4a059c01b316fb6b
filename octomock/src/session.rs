//! The session seam between client objects and the network.
//!
//! Client types never talk HTTP directly: every request goes through a
//! [`Session`]. Tests substitute [`MockSession`](crate::testing::MockSession),
//! which records calls instead of sending them.

use std::sync::Arc;

use http::{HeaderMap, Method, StatusCode};
use serde_json::Value;

use crate::call::Call;
use crate::config::DEFAULT_BASE_URL;

/// Credentials attached to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Auth {
    /// OAuth or personal access token.
    Token(String),
}

/// What a session method hands back.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Response {
    /// Nothing was produced for this call.
    #[default]
    Unset,
    /// A terminal, empty result. Iteration stops here.
    Exhausted,
    /// An HTTP response.
    Http {
        status: StatusCode,
        headers: HeaderMap,
        body: Value,
    },
}

impl Response {
    /// A response with a JSON body and no headers.
    pub fn json(status: StatusCode, body: Value) -> Self {
        Response::Http {
            status,
            headers: HeaderMap::new(),
            body,
        }
    }

    /// A bodiless response.
    pub fn status(status: StatusCode) -> Self {
        Self::json(status, Value::Null)
    }

    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            Response::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Shared handle to a session.
pub type SessionRef = Arc<dyn Session>;

/// Transport used by every client object.
pub trait Session: Send + Sync {
    /// Performs one request.
    fn request(&self, method: Method, call: Call) -> Response;

    /// Joins `parts` onto the session's API root, or onto `base_url` when given.
    fn build_url(&self, parts: &[&str], base_url: Option<&str>) -> String;

    /// Whether the session carries credentials.
    fn has_auth(&self) -> bool;

    fn get(&self, call: Call) -> Response {
        self.request(Method::GET, call)
    }

    fn post(&self, call: Call) -> Response {
        self.request(Method::POST, call)
    }

    fn patch(&self, call: Call) -> Response {
        self.request(Method::PATCH, call)
    }

    fn put(&self, call: Call) -> Response {
        self.request(Method::PUT, call)
    }

    fn delete(&self, call: Call) -> Response {
        self.request(Method::DELETE, call)
    }
}

/// Builds API URLs from path segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlBuilder {
    base_url: String,
}

impl Default for UrlBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl UrlBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins the root and every part with `/`.
    ///
    /// Parts are joined verbatim, so a root with a trailing slash yields a
    /// double slash.
    pub fn build(&self, parts: &[&str], base_url: Option<&str>) -> String {
        let root = base_url.unwrap_or(&self.base_url);
        let url = std::iter::once(root)
            .chain(parts.iter().copied())
            .collect::<Vec<_>>()
            .join("/");
        tracing::trace!(%url, "built url");
        url
    }
}
