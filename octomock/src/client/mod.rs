//! A small GitHub REST client.
//!
//! Every object holds a [`Core`] and sends its requests through the
//! [`Session`](crate::session::Session) inside it, which is what lets the
//! harness in [`testing`](crate::testing) swap the network out.

mod base;
mod github;
mod issue;
mod iterator;
mod repository;

pub use base::{Core, boolean, json};
pub use github::{GitHub, GitHubEnterprise};
pub use issue::{Issue, IssueComment, IssueEdit};
pub use iterator::{IteratorState, PageIterator, next_link};
pub use repository::{NewIssue, Repository, RepositoryEdit};

use serde_json::Value;

use crate::error::Result;
use crate::session::SessionRef;

/// An API object built from a JSON document.
pub trait Resource: Sized {
    /// Builds the object, attaching `session` when given.
    fn from_json(data: &Value, session: Option<SessionRef>) -> Result<Self>;

    fn core(&self) -> &Core;

    fn core_mut(&mut self) -> &mut Core;
}

pub(crate) fn label_names(labels: &[Value]) -> Vec<String> {
    labels
        .iter()
        .filter_map(|label| match label {
            Value::String(name) => Some(name.clone()),
            other => other.get("name").and_then(Value::as_str).map(str::to_string),
        })
        .collect()
}
