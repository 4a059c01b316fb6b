//! Harnesses that wire a client object to a mocked session.

use std::fmt::Debug;
use std::sync::Arc;

use http::{HeaderMap, HeaderValue, Method};
use serde_json::Value;

use super::fixtures::create_url_helper;
use super::mock::MockSession;
use crate::call::ExpectedCall;
use crate::client::{GitHubEnterprise, Resource};
use crate::config::HarnessConfig;
use crate::error::{CallMismatch, Error, Result};
use crate::session::{Auth, Response, SessionRef, UrlBuilder};

/// Builds a bare stand-in session: every verb answers [`Response::Unset`],
/// no credentials.
pub fn create_mocked_session(config: &HarnessConfig) -> MockSession {
    MockSession::new(UrlBuilder::new(config.base_url.clone()))
}

/// Builds the stand-in session a regular harness uses.
///
/// On top of [`create_mocked_session`] it carries credentials and headers,
/// answers `true` to `has_auth`, and gets one extra attribute per name in
/// `attributes`.
pub fn create_session_mock(config: &HarnessConfig, attributes: &[&str]) -> MockSession {
    let session = create_mocked_session(config);

    let mut headers = HeaderMap::new();
    headers.insert(
        http::header::ACCEPT,
        HeaderValue::from_static("application/vnd.github.v3.full+json"),
    );
    session.set_headers(headers);
    session.set_auth(Some(Auth::Token("octomock-token".to_string())));
    session.set_has_auth(true);

    for name in attributes {
        session.set_attribute(*name, Value::Null);
    }

    session.set_return_all(Response::Unset);
    session
}

/// Drives a client object of type `T` against a [`MockSession`].
///
/// Construct it through one of the flavors:
///
/// - [`UnitHelper::new`]: authenticated session, verbs answer nothing.
/// - [`UnitHelper::iterator`]: verbs answer [`Response::Exhausted`], so
///   iterators stop after their first request.
/// - [`UnitHelper::requires_auth`]: session without credentials.
/// - [`UnitHelper::object`]: no session at all.
/// - [`UnitHelper::enterprise`]: the instance is a [`GitHubEnterprise`].
///
/// Setup failures (unreadable fixtures, example data that does not fit `T`)
/// panic, since there is no test left to run.
///
/// # Examples
///
/// ```
/// use octomock::client::Repository;
/// use octomock::testing::{UnitHelper, load_fixture};
///
/// let helper = UnitHelper::<Repository>::new(load_fixture("repos_get_example.json").ok());
/// helper.instance.delete().unwrap();
///
/// helper.session().mock(http::Method::DELETE).assert_called_once_with(
///     &octomock::call::Call::new("https://api.github.com/repos/octocat/Hello-World"),
/// );
/// ```
pub struct UnitHelper<T> {
    session: Option<Arc<MockSession>>,
    pub instance: T,
    config: HarnessConfig,
}

impl<T: Resource + Default> UnitHelper<T> {
    /// Regular flavor with configuration from the environment.
    #[track_caller]
    pub fn new(example_data: Option<Value>) -> Self {
        Self::with_config(HarnessConfig::from_env(), example_data)
    }

    #[track_caller]
    pub fn with_config(config: HarnessConfig, example_data: Option<Value>) -> Self {
        let session = Arc::new(create_session_mock(&config, &[]));
        Self::setup(config, Some(session), example_data)
    }

    /// Every verb answers the terminal empty result.
    ///
    /// The session is bare apart from answering `true` to `has_auth`.
    #[track_caller]
    pub fn iterator(example_data: Option<Value>) -> Self {
        let config = HarnessConfig::from_env();
        let session = Arc::new(create_mocked_session(&config));
        session.set_has_auth(true);
        session.set_return_all(Response::Exhausted);
        Self::setup(config, Some(session), example_data)
    }

    /// The session carries no credentials.
    #[track_caller]
    pub fn requires_auth(example_data: Option<Value>) -> Self {
        Self::new(example_data).after_setup(|helper| {
            let session = helper.session();
            session.set_auth(None);
            session.set_has_auth(false);
        })
    }

    /// The instance is built from example data alone, without a session.
    #[track_caller]
    pub fn object(example_data: Option<Value>) -> Self {
        Self::setup(HarnessConfig::from_env(), None, example_data)
    }

    #[track_caller]
    fn setup(
        config: HarnessConfig,
        session: Option<Arc<MockSession>>,
        example_data: Option<Value>,
    ) -> Self {
        let instance = match create_instance(session.as_ref(), example_data.as_ref()) {
            Ok(instance) => instance,
            Err(err) => panic!("failed to build the described instance: {}", err),
        };
        tracing::debug!(
            attached = session.is_some(),
            example = example_data.is_some(),
            "harness ready"
        );

        Self {
            session,
            instance,
            config,
        }
    }
}

fn create_instance<T: Resource + Default>(
    session: Option<&Arc<MockSession>>,
    example_data: Option<&Value>,
) -> Result<T> {
    let session = session.map(|session| -> SessionRef { session.clone() });
    match example_data {
        Some(data) => T::from_json(data, session),
        None => {
            let mut instance = T::default();
            if let Some(session) = session {
                instance.core_mut().attach(session);
            }
            Ok(instance)
        }
    }
}

impl UnitHelper<GitHubEnterprise> {
    /// The instance is an enterprise client at the configured enterprise URL.
    pub fn enterprise() -> Self {
        Self::enterprise_with_config(HarnessConfig::from_env())
    }

    pub fn enterprise_with_config(config: HarnessConfig) -> Self {
        let session = Arc::new(create_session_mock(&config, &[]));
        let shared: SessionRef = session.clone();
        let instance = GitHubEnterprise::new(&config.enterprise_url, Some(shared));

        Self {
            session: Some(session),
            instance,
            config,
        }
    }

    /// `url_for` rooted at the enterprise API.
    pub fn enterprise_url_for(&self, path: &str) -> String {
        create_url_helper(self.instance.api_root())(path)
    }
}

impl<T> UnitHelper<T> {
    /// Runs `hook` once setup is complete.
    pub fn after_setup(mut self, hook: impl FnOnce(&mut Self)) -> Self {
        hook(&mut self);
        self
    }

    /// The stand-in session.
    ///
    /// # Panics
    ///
    /// Panics for the object flavor, which has no session.
    #[track_caller]
    pub fn session(&self) -> &MockSession {
        match &self.session {
            Some(session) => session,
            None => panic!("this harness was built without a session"),
        }
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// URL under the configured API root, for building expectations.
    pub fn url_for(&self, path: &str) -> String {
        create_url_helper(&self.config.base_url)(path)
    }

    /// Matches the most recent call on `method` against `expected`.
    pub fn check_called_with(
        &self,
        method: Method,
        expected: &ExpectedCall,
    ) -> std::result::Result<(), CallMismatch> {
        let result = self.session().mock(method.clone()).check_called_with(expected);
        tracing::debug!(%method, matched = result.is_ok(), "checked call");
        result
    }

    /// Asserts the most recent call on `method` matches `expected`.
    #[track_caller]
    pub fn method_called_with(&self, method: Method, expected: ExpectedCall) {
        if let Err(mismatch) = self.check_called_with(method, &expected) {
            panic!("{}", mismatch);
        }
    }

    #[track_caller]
    pub fn delete_called_with(&self, expected: ExpectedCall) {
        self.method_called_with(Method::DELETE, expected);
    }

    #[track_caller]
    pub fn patch_called_with(&self, expected: ExpectedCall) {
        self.method_called_with(Method::PATCH, expected);
    }

    #[track_caller]
    pub fn post_called_with(&self, expected: ExpectedCall) {
        self.method_called_with(Method::POST, expected);
    }

    #[track_caller]
    pub fn put_called_with(&self, expected: ExpectedCall) {
        self.method_called_with(Method::PUT, expected);
    }

    /// Asserts `f` fails because the session has no credentials.
    #[track_caller]
    pub fn assert_requires_auth<R: Debug>(&mut self, f: impl FnOnce(&mut T) -> Result<R>) {
        match f(&mut self.instance) {
            Err(Error::AuthenticationFailed(_)) => {}
            other => panic!("expected an authentication failure, got {:?}", other),
        }
    }

    /// Advances `iterator` once, ignoring exhaustion.
    ///
    /// # Panics
    ///
    /// Panics when the iterator yields an error.
    #[track_caller]
    pub fn get_next<R, I: Iterator<Item = Result<R>>>(&self, iterator: &mut I) {
        if let Some(Err(err)) = iterator.next() {
            panic!("iterator failed: {}", err);
        }
    }
}
