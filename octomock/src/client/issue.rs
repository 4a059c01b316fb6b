use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::base::{self, Core};
use super::iterator::PageIterator;
use super::{Resource, label_names};
use crate::error::Result;
use crate::session::SessionRef;

const LOCK_PREVIEW: &str = "application/vnd.github.sailor-v-preview+json";

/// An issue on a repository.
#[derive(Debug, Clone, Default)]
pub struct Issue {
    core: Core,
    pub number: u64,
    pub title: String,
    pub body: Option<String>,
    pub state: String,
    pub locked: bool,
    pub labels: Vec<String>,
    /// API URL of this issue.
    pub url: String,
    pub comments_url: String,
}

#[derive(Deserialize)]
struct IssueData {
    number: u64,
    title: String,
    #[serde(default)]
    body: Option<String>,
    state: String,
    #[serde(default)]
    locked: bool,
    #[serde(default)]
    labels: Vec<Value>,
    url: String,
    comments_url: String,
}

/// Fields to change with [`Issue::edit`]. Unset fields are left alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IssueEdit {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignees: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
}

impl IssueEdit {
    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.body.is_none()
            && self.state.is_none()
            && self.assignees.is_none()
            && self.labels.is_none()
    }
}

impl Resource for Issue {
    fn from_json(data: &Value, session: Option<SessionRef>) -> Result<Self> {
        let mut issue = Issue {
            core: Core::new(session),
            ..Issue::default()
        };
        issue.update(data)?;
        Ok(issue)
    }

    fn core(&self) -> &Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut Core {
        &mut self.core
    }
}

impl Issue {
    fn update(&mut self, data: &Value) -> Result<()> {
        let data: IssueData = serde_json::from_value(data.clone())?;
        self.number = data.number;
        self.title = data.title;
        self.body = data.body;
        self.state = data.state;
        self.locked = data.locked;
        self.labels = label_names(&data.labels);
        self.url = data.url;
        self.comments_url = data.comments_url;
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.state == "closed"
    }

    /// Edits this issue. Returns `false` when nothing was sent or the
    /// update was not acknowledged.
    pub fn edit(&mut self, edit: &IssueEdit) -> Result<bool> {
        self.core.requires_auth()?;
        if edit.is_empty() {
            return Ok(false);
        }

        let response = self.core.patch(&self.url, edit)?;
        match base::json(response, StatusCode::OK)? {
            Some(body) => {
                self.update(&body)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn close(&mut self) -> Result<bool> {
        self.edit(&IssueEdit {
            state: Some("closed".to_string()),
            ..IssueEdit::default()
        })
    }

    pub fn reopen(&mut self) -> Result<bool> {
        self.edit(&IssueEdit {
            state: Some("open".to_string()),
            ..IssueEdit::default()
        })
    }

    /// Locks the conversation, optionally giving a reason.
    pub fn lock(&self, reason: Option<&str>) -> Result<bool> {
        self.core.requires_auth()?;
        let url = format!("{}/lock", self.url);
        let data = reason.map(|reason| json!({ "lock_reason": reason }));
        let response = self.core.put(
            &url,
            data.as_ref(),
            Some(json!({ "Accept": LOCK_PREVIEW })),
        )?;
        base::boolean(response, StatusCode::NO_CONTENT, StatusCode::NOT_FOUND)
    }

    pub fn unlock(&self) -> Result<bool> {
        self.core.requires_auth()?;
        let response = self.core.delete(&format!("{}/lock", self.url))?;
        base::boolean(response, StatusCode::NO_CONTENT, StatusCode::NOT_FOUND)
    }

    /// Adds labels and returns the full label set reported back.
    pub fn add_labels(&self, labels: &[&str]) -> Result<Vec<String>> {
        self.core.requires_auth()?;
        let response = self.core.post(&format!("{}/labels", self.url), labels)?;
        Ok(label_list(base::json(response, StatusCode::OK)?))
    }

    pub fn replace_labels(&self, labels: &[&str]) -> Result<Vec<String>> {
        self.core.requires_auth()?;
        let response = self
            .core
            .put(&format!("{}/labels", self.url), Some(labels), None)?;
        Ok(label_list(base::json(response, StatusCode::OK)?))
    }

    pub fn remove_all_labels(&self) -> Result<bool> {
        self.core.requires_auth()?;
        let response = self.core.delete(&format!("{}/labels", self.url))?;
        base::boolean(response, StatusCode::NO_CONTENT, StatusCode::NOT_FOUND)
    }

    /// Iterates over comments. A negative `count` means all of them.
    pub fn comments(&self, count: i64) -> PageIterator<IssueComment> {
        PageIterator::new(self.core.clone(), self.comments_url.clone(), count, None)
    }
}

fn label_list(body: Option<Value>) -> Vec<String> {
    match body {
        Some(Value::Array(items)) => label_names(&items),
        _ => Vec::new(),
    }
}

/// A comment on an issue.
#[derive(Debug, Clone, Default)]
pub struct IssueComment {
    core: Core,
    pub id: u64,
    pub body: String,
    pub user: Option<String>,
}

#[derive(Deserialize)]
struct CommentData {
    id: u64,
    #[serde(default)]
    body: String,
    #[serde(default)]
    user: Option<Value>,
}

impl Resource for IssueComment {
    fn from_json(data: &Value, session: Option<SessionRef>) -> Result<Self> {
        let data: CommentData = serde_json::from_value(data.clone())?;
        Ok(IssueComment {
            core: Core::new(session),
            id: data.id,
            body: data.body,
            user: data
                .user
                .as_ref()
                .and_then(|user| user.get("login"))
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }

    fn core(&self) -> &Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut Core {
        &mut self.core
    }
}
