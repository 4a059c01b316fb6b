use std::ops::Deref;

use http::StatusCode;
use serde_json::{Map, Value, json};

use super::Resource;
use super::base::{self, Core};
use super::issue::Issue;
use super::iterator::PageIterator;
use super::repository::Repository;
use crate::error::Result;
use crate::session::{Response, SessionRef};

/// Entry point of the client.
#[derive(Debug, Clone, Default)]
pub struct GitHub {
    core: Core,
}

impl Resource for GitHub {
    fn from_json(_data: &Value, session: Option<SessionRef>) -> Result<Self> {
        Ok(GitHub::new(session))
    }

    fn core(&self) -> &Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut Core {
        &mut self.core
    }
}

impl GitHub {
    pub fn new(session: Option<SessionRef>) -> Self {
        Self {
            core: Core::new(session),
        }
    }

    /// Renders markdown to HTML.
    ///
    /// With `raw`, the text is posted as plain text to `markdown/raw` and
    /// `mode`/`context` are ignored. `context` only applies to `gfm` mode.
    /// Anything but a `200` yields an empty string.
    pub fn markdown(
        &self,
        text: &str,
        mode: &str,
        context: Option<&str>,
        raw: bool,
    ) -> Result<String> {
        let response = if raw {
            let url = self.core.build_url(&["markdown", "raw"]);
            self.core
                .post_raw(&url, text, json!({ "content-type": "text/plain" }))?
        } else {
            let url = self.core.build_url(&["markdown"]);
            let mut data = Map::new();
            data.insert("text".to_string(), json!(text));
            data.insert("mode".to_string(), json!(mode));
            if let (Some(context), "gfm") = (context, mode) {
                data.insert("context".to_string(), json!(context));
            }
            self.core.post(&url, &data)?
        };

        match response {
            Response::Http { status, body, .. } if status == StatusCode::OK => {
                Ok(body.as_str().unwrap_or_default().to_string())
            }
            _ => Ok(String::new()),
        }
    }

    pub fn repository(&self, owner: &str, name: &str) -> Result<Option<Repository>> {
        let url = self.core.build_url(&["repos", owner, name]);
        let response = self.core.get(&url, None)?;
        base::json(response, StatusCode::OK)?
            .map(|body| Repository::from_json(&body, self.core.session_ref().cloned()))
            .transpose()
    }

    /// Creates a repository for the authenticated user.
    pub fn create_repository(
        &self,
        name: &str,
        description: Option<&str>,
        private: bool,
    ) -> Result<Option<Repository>> {
        self.core.requires_auth()?;
        let url = self.core.build_url(&["user", "repos"]);
        let data = json!({
            "name": name,
            "description": description.unwrap_or_default(),
            "private": private,
        });
        let response = self.core.post(&url, &data)?;
        base::json(response, StatusCode::CREATED)?
            .map(|body| Repository::from_json(&body, self.core.session_ref().cloned()))
            .transpose()
    }

    /// Iterates over issues assigned to the authenticated user.
    pub fn issues(
        &self,
        filter: Option<&str>,
        state: Option<&str>,
        count: i64,
    ) -> Result<PageIterator<Issue>> {
        self.core.requires_auth()?;
        let mut params = Map::new();
        if let Some(filter) = filter {
            params.insert("filter".to_string(), json!(filter));
        }
        if let Some(state) = state {
            params.insert("state".to_string(), json!(state));
        }
        Ok(PageIterator::new(
            self.core.clone(),
            self.core.build_url(&["issues"]),
            count,
            Some(params),
        ))
    }
}

/// Client for a GitHub Enterprise instance.
///
/// Derefs to [`GitHub`]; every URL is rooted at `<url>/api/v3`.
#[derive(Debug, Clone)]
pub struct GitHubEnterprise {
    github: GitHub,
    url: String,
}

impl GitHubEnterprise {
    pub fn new(url: &str, session: Option<SessionRef>) -> Self {
        let root = format!("{}/api/v3", url.trim_end_matches('/'));
        Self {
            github: GitHub {
                core: Core::new(session).with_base_url(root),
            },
            url: url.to_string(),
        }
    }

    /// The instance URL this client was created with.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn api_root(&self) -> &str {
        self.github.core.base_url().unwrap_or_default()
    }

    /// Site statistics; `option` is one of `all`, `repos`, `hooks`, ...
    pub fn admin_stats(&self, option: &str) -> Result<Option<Value>> {
        self.github.core.requires_auth()?;
        let option = option.to_lowercase();
        let url = self.github.core.build_url(&["enterprise", "stats", option.as_str()]);
        let response = self.github.core.get(&url, None)?;
        base::json(response, StatusCode::OK)
    }

    /// Creates a user on the instance.
    pub fn create_user(&self, login: &str, email: &str) -> Result<Option<Value>> {
        self.github.core.requires_auth()?;
        let url = self.github.core.build_url(&["admin", "users"]);
        let data = json!({ "login": login, "email": email });
        let response = self.github.core.post(&url, &data)?;
        base::json(response, StatusCode::CREATED)
    }
}

impl Deref for GitHubEnterprise {
    type Target = GitHub;

    fn deref(&self) -> &GitHub {
        &self.github
    }
}
