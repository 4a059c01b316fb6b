//! Unit tests for issues against a mocked session.

use http::{Method, StatusCode};
use octomock::call::{Call, ExpectedCall};
use octomock::client::{Issue, IssueEdit, IteratorState};
use octomock::session::Response;
use octomock::testing::{UnitHelper, create_url_helper, load_fixture};
use serde_json::json;

const ISSUE_URL: &str = "https://api.github.com/repos/octocat/Hello-World/issues/1";

fn example_data() -> Option<serde_json::Value> {
    Some(load_fixture("issue_example.json").unwrap())
}

fn url_for(path: &str) -> String {
    create_url_helper(ISSUE_URL)(path)
}

#[test]
fn test_close() {
    let mut helper = UnitHelper::<Issue>::new(example_data());
    let closed = helper.instance.close().unwrap();

    assert!(!closed);
    helper.patch_called_with(ExpectedCall::new(url_for("")).data(json!({"state": "closed"})));
}

#[test]
fn test_reopen() {
    let mut helper = UnitHelper::<Issue>::new(example_data());
    helper.instance.reopen().unwrap();

    helper.patch_called_with(ExpectedCall::new(url_for("")).data(json!({"state": "open"})));
}

#[test]
fn test_edit() {
    let mut helper = UnitHelper::<Issue>::new(example_data());
    helper
        .instance
        .edit(&IssueEdit {
            title: Some("Found a bug".to_string()),
            labels: Some(vec!["bug".to_string(), "wontfix".to_string()]),
            ..IssueEdit::default()
        })
        .unwrap();

    helper.patch_called_with(ExpectedCall::new(url_for("")).data(json!({
        "title": "Found a bug",
        "labels": ["bug", "wontfix"]
    })));
}

#[test]
fn test_edit_with_nothing_to_change_sends_nothing() {
    let mut helper = UnitHelper::<Issue>::new(example_data());
    assert!(!helper.instance.edit(&IssueEdit::default()).unwrap());

    helper.session().mock(Method::PATCH).assert_not_called();
}

#[test]
fn test_edit_updates_from_response() {
    let mut helper = UnitHelper::<Issue>::new(example_data());
    let mut updated = load_fixture("issue_example.json").unwrap();
    updated["state"] = json!("closed");
    helper
        .session()
        .set_return(Method::PATCH, Response::json(StatusCode::OK, updated));

    assert!(helper.instance.close().unwrap());
    assert!(helper.instance.is_closed());
}

#[test]
fn test_lock_with_reason() {
    let helper = UnitHelper::<Issue>::new(example_data());
    helper.instance.lock(Some("spam")).unwrap();

    helper.put_called_with(
        ExpectedCall::new(url_for("lock"))
            .data(json!({"lock_reason": "spam"}))
            .named(
                "headers",
                json!({"Accept": "application/vnd.github.sailor-v-preview+json"}),
            ),
    );
}

#[test]
fn test_lock_without_reason() {
    let helper = UnitHelper::<Issue>::new(example_data());
    helper.instance.lock(None).unwrap();

    helper.session().mock(Method::PUT).assert_called_once_with(
        &Call::new(url_for("lock")).named(
            "headers",
            json!({"Accept": "application/vnd.github.sailor-v-preview+json"}),
        ),
    );
}

#[test]
fn test_unlock() {
    let helper = UnitHelper::<Issue>::new(example_data());
    helper
        .session()
        .set_return(Method::DELETE, Response::status(StatusCode::NO_CONTENT));

    assert!(helper.instance.unlock().unwrap());
    helper
        .session()
        .mock(Method::DELETE)
        .assert_called_once_with(&Call::new(url_for("lock")));
}

#[test]
fn test_add_labels() {
    let helper = UnitHelper::<Issue>::new(example_data());
    helper.instance.add_labels(&["bug", "enhancement"]).unwrap();

    helper.post_called_with(ExpectedCall::new(url_for("labels")).data(json!(["bug", "enhancement"])));
}

#[test]
fn test_add_labels_returns_label_names() {
    let helper = UnitHelper::<Issue>::new(example_data());
    helper.session().set_return(
        Method::POST,
        Response::json(StatusCode::OK, json!([{"name": "bug"}, {"name": "enhancement"}])),
    );

    let labels = helper.instance.add_labels(&["enhancement"]).unwrap();
    assert_eq!(labels, vec!["bug".to_string(), "enhancement".to_string()]);
}

#[test]
fn test_replace_labels() {
    let helper = UnitHelper::<Issue>::new(example_data());
    helper.instance.replace_labels(&["wontfix"]).unwrap();

    helper.put_called_with(ExpectedCall::new(url_for("labels")).data(json!(["wontfix"])));
}

#[test]
fn test_remove_all_labels() {
    let helper = UnitHelper::<Issue>::new(example_data());
    helper.instance.remove_all_labels().unwrap();

    helper
        .session()
        .mock(Method::DELETE)
        .assert_called_once_with(&Call::new(url_for("labels")));
}

#[test]
fn test_comments_iterator() {
    let helper = UnitHelper::<Issue>::iterator(example_data());
    let mut comments = helper.instance.comments(-1);
    helper.get_next(&mut comments);

    helper.session().mock(Method::GET).assert_called_once_with(
        &Call::new(url_for("comments")).named("params", json!({"per_page": 100})),
    );
    assert_eq!(comments.state(), &IteratorState::Done);
}

#[test]
fn test_comments_iterator_with_count() {
    let helper = UnitHelper::<Issue>::iterator(example_data());
    let mut comments = helper.instance.comments(10);
    helper.get_next(&mut comments);

    helper.session().mock(Method::GET).assert_called_once_with(
        &Call::new(url_for("comments")).named("params", json!({"per_page": 10})),
    );
}

#[test]
fn test_comments_yield_parsed_comments() {
    let helper = UnitHelper::<Issue>::new(example_data());
    helper.session().set_return(
        Method::GET,
        Response::json(
            StatusCode::OK,
            json!([load_fixture("issue_comment_example.json").unwrap()]),
        ),
    );

    let comments: Vec<_> = helper
        .instance
        .comments(1)
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].body, "Me too");
    assert_eq!(comments[0].user.as_deref(), Some("octocat"));
}

#[test]
fn test_requires_auth() {
    let mut helper = UnitHelper::<Issue>::requires_auth(example_data());

    helper.assert_requires_auth(|issue| issue.close());
    helper.assert_requires_auth(|issue| issue.lock(None));
    helper.assert_requires_auth(|issue| issue.unlock());
    helper.assert_requires_auth(|issue| issue.add_labels(&["bug"]));
    helper.assert_requires_auth(|issue| issue.replace_labels(&[]));
    helper.assert_requires_auth(|issue| issue.remove_all_labels());

    for verb in octomock::testing::VERBS {
        helper.session().mock(verb).assert_not_called();
    }
}

#[test]
fn test_object_without_session() {
    let mut helper = UnitHelper::<Issue>::object(example_data());

    assert_eq!(helper.instance.title, "Found a bug");
    assert_eq!(helper.instance.labels, vec!["bug".to_string()]);
    helper.assert_requires_auth(|issue| issue.close());

    let first = helper.instance.comments(-1).next();
    assert!(matches!(first, Some(Err(octomock::error::Error::Detached))));
}

#[test]
#[should_panic(expected = "iterator failed: 401 Bad credentials")]
fn test_comments_iterator_error_fails_get_next() {
    let helper = UnitHelper::<Issue>::new(example_data());
    helper.session().set_return(
        Method::GET,
        Response::json(StatusCode::UNAUTHORIZED, json!({"message": "Bad credentials"})),
    );

    helper.get_next(&mut helper.instance.comments(-1));
}
