//! Stand-in session that records calls instead of sending them.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use dashmap::DashMap;
use http::{HeaderMap, Method};
use serde_json::Value;

use crate::call::{Call, ExpectedCall, match_call};
use crate::error::CallMismatch;
use crate::session::{Auth, Response, Session, UrlBuilder};

/// Verbs a [`MockSession`] stands in for.
pub const VERBS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PATCH,
    Method::PUT,
    Method::DELETE,
];

/// Record of one stand-in method: every call it received and what it answers.
#[derive(Debug, Clone)]
pub struct MockMethod {
    method: Method,
    calls: Vec<Call>,
    return_value: Response,
}

impl MockMethod {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            calls: Vec::new(),
            return_value: Response::Unset,
        }
    }

    /// Sets the response handed back to every future call.
    pub fn returns(mut self, response: Response) -> Self {
        self.return_value = response;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn return_value(&self) -> &Response {
        &self.return_value
    }

    pub fn called(&self) -> bool {
        !self.calls.is_empty()
    }

    pub fn call_count(&self) -> usize {
        self.calls.len()
    }

    /// The most recent call.
    pub fn call_args(&self) -> Option<&Call> {
        self.calls.last()
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    pub fn reset(&mut self) {
        self.calls.clear();
    }

    fn record(&mut self, call: Call) -> Response {
        self.calls.push(call);
        self.return_value.clone()
    }

    /// Matches the most recent call against `expected`.
    pub fn check_called_with(&self, expected: &ExpectedCall) -> Result<(), CallMismatch> {
        let recorded = self.call_args().ok_or_else(|| CallMismatch::NotCalled {
            method: self.method.clone(),
        })?;
        match_call(recorded, expected)
    }

    /// Asserts exactly one call was made, with exactly these arguments.
    ///
    /// No payload reconciliation happens here; use this for calls that carry
    /// no payload, such as a bare `DELETE`.
    #[track_caller]
    pub fn assert_called_once_with(&self, call: &Call) {
        assert_eq!(
            self.call_count(),
            1,
            "expected {} to be called once, called {} times: {:?}",
            self.method,
            self.call_count(),
            self.calls
        );
        assert_eq!(self.calls[0], *call, "{} called with different arguments", self.method);
    }

    #[track_caller]
    pub fn assert_not_called(&self) {
        assert!(
            !self.called(),
            "expected {} not to be called, called with {:?}",
            self.method,
            self.calls
        );
    }
}

/// A [`Session`] whose verbs are [`MockMethod`]s.
///
/// URL building is not mocked: it is forwarded to a real [`UrlBuilder`] so
/// tests assert on the URLs the client would actually hit.
#[derive(Debug)]
pub struct MockSession {
    urls: UrlBuilder,
    methods: DashMap<Method, MockMethod>,
    has_auth: AtomicBool,
    auth: Mutex<Option<Auth>>,
    headers: Mutex<HeaderMap>,
    attributes: DashMap<String, Value>,
}

impl Default for MockSession {
    fn default() -> Self {
        Self::new(UrlBuilder::default())
    }
}

impl MockSession {
    /// A session with every verb answering [`Response::Unset`] and no auth.
    pub fn new(urls: UrlBuilder) -> Self {
        let methods = DashMap::new();
        for verb in VERBS {
            methods.insert(verb.clone(), MockMethod::new(verb));
        }

        Self {
            urls,
            methods,
            has_auth: AtomicBool::new(false),
            auth: Mutex::new(None),
            headers: Mutex::new(HeaderMap::new()),
            attributes: DashMap::new(),
        }
    }

    /// Snapshot of the stand-in for `method`.
    pub fn mock(&self, method: Method) -> MockMethod {
        self.methods
            .get(&method)
            .map(|entry| entry.clone())
            .unwrap_or_else(|| MockMethod::new(method))
    }

    /// Makes `method` answer `response` from now on.
    pub fn set_return(&self, method: Method, response: Response) {
        self.methods
            .entry(method.clone())
            .or_insert_with(|| MockMethod::new(method))
            .return_value = response;
    }

    /// Makes every verb answer `response`.
    pub fn set_return_all(&self, response: Response) {
        for verb in VERBS {
            self.set_return(verb, response.clone());
        }
    }

    /// Forgets recorded calls on every verb.
    pub fn reset_calls(&self) {
        for mut entry in self.methods.iter_mut() {
            entry.reset();
        }
    }

    pub fn set_has_auth(&self, has_auth: bool) {
        self.has_auth.store(has_auth, Ordering::SeqCst);
    }

    pub fn set_auth(&self, auth: Option<Auth>) {
        *lock(&self.auth) = auth;
    }

    pub fn auth(&self) -> Option<Auth> {
        lock(&self.auth).clone()
    }

    pub fn set_headers(&self, headers: HeaderMap) {
        *lock(&self.headers) = headers;
    }

    pub fn headers(&self) -> HeaderMap {
        lock(&self.headers).clone()
    }

    /// Sets an extra named attribute on the stand-in.
    pub fn set_attribute(&self, name: impl Into<String>, value: Value) {
        self.attributes.insert(name.into(), value);
    }

    pub fn attribute(&self, name: &str) -> Option<Value> {
        self.attributes.get(name).map(|value| value.clone())
    }

    pub fn url_builder(&self) -> &UrlBuilder {
        &self.urls
    }
}

impl Session for MockSession {
    fn request(&self, method: Method, call: Call) -> Response {
        tracing::debug!(%method, positional = ?call.positional, named = ?call.named, "recorded call");
        self.methods
            .entry(method.clone())
            .or_insert_with(|| MockMethod::new(method))
            .record(call)
    }

    fn build_url(&self, parts: &[&str], base_url: Option<&str>) -> String {
        self.urls.build(parts, base_url)
    }

    fn has_auth(&self) -> bool {
        self.has_auth.load(Ordering::SeqCst)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
