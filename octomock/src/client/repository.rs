use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::Resource;
use super::base::{self, Core};
use super::issue::Issue;
use super::iterator::PageIterator;
use crate::error::Result;
use crate::session::SessionRef;

/// A repository.
#[derive(Debug, Clone, Default)]
pub struct Repository {
    core: Core,
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub owner: String,
    pub description: Option<String>,
    pub private: bool,
    pub default_branch: String,
    /// API URL of this repository.
    pub url: String,
}

#[derive(Deserialize)]
struct RepositoryData {
    id: u64,
    name: String,
    full_name: String,
    owner: Value,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    private: bool,
    #[serde(default)]
    default_branch: Option<String>,
    url: String,
}

/// Settings to change with [`Repository::edit`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct RepositoryEdit {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_issues: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
}

/// A new issue for [`Repository::create_issue`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewIssue {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignees: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
}

impl Resource for Repository {
    fn from_json(data: &Value, session: Option<SessionRef>) -> Result<Self> {
        let mut repository = Repository {
            core: Core::new(session),
            ..Repository::default()
        };
        repository.update(data)?;
        Ok(repository)
    }

    fn core(&self) -> &Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut Core {
        &mut self.core
    }
}

impl Repository {
    fn update(&mut self, data: &Value) -> Result<()> {
        let data: RepositoryData = serde_json::from_value(data.clone())?;
        self.id = data.id;
        self.name = data.name;
        self.full_name = data.full_name;
        self.owner = data
            .owner
            .get("login")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        self.description = data.description;
        self.private = data.private;
        self.default_branch = data.default_branch.unwrap_or_else(|| "main".to_string());
        self.url = data.url;
        Ok(())
    }

    /// Opens an issue. An empty title sends nothing and returns `None`.
    pub fn create_issue(&self, issue: &NewIssue) -> Result<Option<Issue>> {
        self.core.requires_auth()?;
        if issue.title.is_empty() {
            return Ok(None);
        }

        let url = format!("{}/issues", self.url);
        let response = self.core.post(&url, issue)?;
        base::json(response, StatusCode::CREATED)?
            .map(|body| Issue::from_json(&body, self.core.session_ref().cloned()))
            .transpose()
    }

    pub fn edit(&mut self, edit: &RepositoryEdit) -> Result<bool> {
        self.core.requires_auth()?;
        let response = self.core.patch(&self.url, edit)?;
        match base::json(response, StatusCode::OK)? {
            Some(body) => {
                self.update(&body)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn delete(&self) -> Result<bool> {
        self.core.requires_auth()?;
        let response = self.core.delete(&self.url)?;
        base::boolean(response, StatusCode::NO_CONTENT, StatusCode::NOT_FOUND)
    }

    pub fn issue(&self, number: u64) -> Result<Option<Issue>> {
        let url = format!("{}/issues/{}", self.url, number);
        let response = self.core.get(&url, None)?;
        base::json(response, StatusCode::OK)?
            .map(|body| Issue::from_json(&body, self.core.session_ref().cloned()))
            .transpose()
    }

    /// Iterates over issues in `state` (`open`, `closed` or `all`).
    pub fn issues(&self, state: Option<&str>, count: i64) -> PageIterator<Issue> {
        let mut params = Map::new();
        if let Some(state) = state {
            params.insert("state".to_string(), json!(state));
        }
        PageIterator::new(
            self.core.clone(),
            format!("{}/issues", self.url),
            count,
            Some(params),
        )
    }
}
