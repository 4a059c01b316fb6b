pub mod call;
pub mod client;
pub mod config;
pub mod error;
pub mod observability;
pub mod session;
pub mod testing;

pub mod prelude {
    pub use crate::call::{Call, ExpectedCall, PAYLOAD_KEY, match_call};
    pub use crate::client::{
        GitHub, GitHubEnterprise, Issue, IssueEdit, NewIssue, PageIterator, Repository,
        RepositoryEdit, Resource,
    };
    pub use crate::error::{CallMismatch, Error, Result};
    pub use crate::session::{Auth, Response, Session, SessionRef};
    pub use crate::testing::{MockSession, UnitHelper, create_url_helper, load_fixture};

    pub use http::{Method, StatusCode};
    pub use serde_json::{Value, json};
}
