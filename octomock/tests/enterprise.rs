//! Unit tests for the enterprise client.

use octomock::prelude::*;

#[test]
fn test_admin_stats() {
    let helper = UnitHelper::<GitHubEnterprise>::enterprise();
    assert!(helper.instance.admin_stats("ALL").unwrap().is_none());

    helper
        .session()
        .mock(Method::GET)
        .assert_called_once_with(&Call::new(helper.enterprise_url_for("enterprise/stats/all")));
}

#[test]
fn test_admin_stats_body() {
    let helper = UnitHelper::<GitHubEnterprise>::enterprise();
    helper.session().set_return(
        Method::GET,
        Response::json(StatusCode::OK, json!({"repos": {"total_repos": 212}})),
    );

    let stats = helper.instance.admin_stats("repos").unwrap();
    assert_eq!(stats, Some(json!({"repos": {"total_repos": 212}})));
}

#[test]
fn test_create_user() {
    let helper = UnitHelper::<GitHubEnterprise>::enterprise();
    helper.instance.create_user("octocat", "octo@example.com").unwrap();

    helper.post_called_with(
        ExpectedCall::new(helper.enterprise_url_for("admin/users"))
            .data(json!({"login": "octocat", "email": "octo@example.com"})),
    );
}

#[test]
fn test_inherited_calls_use_enterprise_root() {
    let helper = UnitHelper::<GitHubEnterprise>::enterprise();
    helper.instance.repository("octocat", "Hello-World").unwrap();

    helper.session().mock(Method::GET).assert_called_once_with(&Call::new(
        helper.enterprise_url_for("repos/octocat/Hello-World"),
    ));
}

#[test]
fn test_requires_auth() {
    let mut helper = UnitHelper::<GitHubEnterprise>::enterprise().after_setup(|helper| {
        helper.session().set_has_auth(false);
    });

    helper.assert_requires_auth(|enterprise| enterprise.admin_stats("all"));
    helper.assert_requires_auth(|enterprise| enterprise.create_user("octocat", "o@example.com"));
    helper.session().mock(Method::GET).assert_not_called();
}
