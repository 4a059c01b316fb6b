use http::StatusCode;
use serde::Serialize;
use serde_json::Value;

use crate::call::Call;
use crate::error::{Error, Result};
use crate::session::{Response, Session, SessionRef, UrlBuilder};

/// Session plumbing shared by every client object.
///
/// Request helpers follow one convention per verb: `POST` sends its JSON
/// text as the second positional value, while `PATCH`, `PUT` and `DELETE`
/// send it as the named `data` entry.
#[derive(Clone, Default)]
pub struct Core {
    session: Option<SessionRef>,
    base_url: Option<String>,
}

impl std::fmt::Debug for Core {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Core")
            .field("attached", &self.session.is_some())
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Core {
    pub fn new(session: Option<SessionRef>) -> Self {
        Self {
            session,
            base_url: None,
        }
    }

    /// Roots every URL this object builds at `base_url`.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn attach(&mut self, session: SessionRef) {
        self.session = Some(session);
    }

    pub fn is_attached(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Result<&dyn Session> {
        self.session.as_deref().ok_or(Error::Detached)
    }

    pub fn session_ref(&self) -> Option<&SessionRef> {
        self.session.as_ref()
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    pub fn build_url(&self, parts: &[&str]) -> String {
        match &self.session {
            Some(session) => session.build_url(parts, self.base_url.as_deref()),
            None => UrlBuilder::default().build(parts, self.base_url.as_deref()),
        }
    }

    /// Fails unless the session carries credentials.
    pub fn requires_auth(&self) -> Result<()> {
        match &self.session {
            Some(session) if session.has_auth() => Ok(()),
            _ => Err(Error::authentication_failed("Requires authentication")),
        }
    }

    pub fn get(&self, url: &str, params: Option<Value>) -> Result<Response> {
        let mut call = Call::new(url);
        if let Some(params) = params {
            call = call.named("params", params);
        }
        Ok(self.session()?.get(call))
    }

    pub fn post<T: Serialize + ?Sized>(&self, url: &str, data: &T) -> Result<Response> {
        let text = serde_json::to_string(data)?;
        Ok(self.session()?.post(Call::new(url).arg(text)))
    }

    /// Posts `text` as is, without JSON encoding.
    pub fn post_raw(&self, url: &str, text: &str, headers: Value) -> Result<Response> {
        let call = Call::new(url).arg(text).named("headers", headers);
        Ok(self.session()?.post(call))
    }

    pub fn patch<T: Serialize + ?Sized>(&self, url: &str, data: &T) -> Result<Response> {
        let text = serde_json::to_string(data)?;
        Ok(self.session()?.patch(Call::new(url).data(text)))
    }

    pub fn put<T: Serialize + ?Sized>(
        &self,
        url: &str,
        data: Option<&T>,
        headers: Option<Value>,
    ) -> Result<Response> {
        let mut call = Call::new(url);
        if let Some(data) = data {
            call = call.data(serde_json::to_string(data)?);
        }
        if let Some(headers) = headers {
            call = call.named("headers", headers);
        }
        Ok(self.session()?.put(call))
    }

    pub fn delete(&self, url: &str) -> Result<Response> {
        Ok(self.session()?.delete(Call::new(url)))
    }
}

/// Extracts the body of a response with the expected status.
///
/// No response at all is `Ok(None)`, and so is a success with a different
/// status. Error statuses become errors.
pub fn json(response: Response, expected: StatusCode) -> Result<Option<Value>> {
    match response {
        Response::Unset | Response::Exhausted => Ok(None),
        Response::Http { status, body, .. } => {
            check_status(status, &body)?;
            if status == expected {
                Ok(Some(body))
            } else {
                Ok(None)
            }
        }
    }
}

/// Maps a response to a boolean.
///
/// `true_code` is `true`, `false_code` is `false`, other error statuses are
/// errors and anything else is `false`.
pub fn boolean(response: Response, true_code: StatusCode, false_code: StatusCode) -> Result<bool> {
    match response {
        Response::Unset | Response::Exhausted => Ok(false),
        Response::Http { status, body, .. } => {
            if status == true_code {
                return Ok(true);
            }
            if status != false_code {
                check_status(status, &body)?;
            }
            Ok(false)
        }
    }
}

pub(crate) fn check_status(status: StatusCode, body: &Value) -> Result<()> {
    if !status.is_client_error() && !status.is_server_error() {
        return Ok(());
    }

    let message = body
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| status.canonical_reason())
        .unwrap_or("request failed")
        .to_string();

    if status == StatusCode::UNAUTHORIZED {
        Err(Error::AuthenticationFailed(message))
    } else {
        Err(Error::unexpected_status(status, message))
    }
}
