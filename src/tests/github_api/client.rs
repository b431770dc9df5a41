// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use mockito::{Matcher, Server, ServerGuard};

use super::example_input;
use crate::error::ReportError;
use crate::github::{GitHubApiBasicAuth, PullRequestSource};
use crate::tests::logger;

const BASIC_TOKEN: &str = "Basic dG9rZW46eC1vYXV0aC1iYXNpYw==";

fn mk_client(server: &ServerGuard) -> GitHubApiBasicAuth {
    GitHubApiBasicAuth::new(&server.url(), "token".to_string()).unwrap()
}

fn pulls_path() -> Matcher {
    Matcher::Regex("^/repos/testorg/testrepo/pulls".to_string())
}

fn report_error(err: failure::Error) -> ReportError {
    match err.downcast_ref::<ReportError>() {
        Some(report_error) => report_error.clone(),
        None => panic!("expected a report error, got {:?}", err),
    }
}

#[test]
fn verify_credentials_returns_login() {
    let mut server = Server::new();
    let user = server
        .mock("GET", "/user")
        .match_header("authorization", BASIC_TOKEN)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(example_input::user())
        .create();

    let login = mk_client(&server).verify_credentials(&logger()).unwrap();

    assert_eq!("octocat", login);
    user.assert();
}

#[test]
fn rejected_token_is_authentication_error() {
    for status in vec![401, 403] {
        let mut server = Server::new();
        let _user = server
            .mock("GET", "/user")
            .with_status(status)
            .with_body(r#"{"message": "Bad credentials"}"#)
            .create();

        let err = mk_client(&server)
            .verify_credentials(&logger())
            .unwrap_err();

        match report_error(err) {
            ReportError::Authentication(msg) => {
                assert!(msg.contains(&status.to_string()), "{}", msg)
            }
            other => panic!("expected authentication error, got {:?}", other),
        }
    }
}

#[test]
fn listing_server_error_is_fetch_error() {
    let mut server = Server::new();
    let _pulls = server
        .mock("GET", pulls_path())
        .match_query(Matcher::Any)
        .with_status(500)
        .create();

    let err = mk_client(&server)
        .pull_requests("testorg", "testrepo", &logger())
        .unwrap_err();

    match report_error(err) {
        ReportError::Fetch(msg) => assert!(msg.contains("500"), "{}", msg),
        other => panic!("expected fetch error, got {:?}", other),
    }
}

#[test]
fn listing_with_unexpected_body_is_fetch_error() {
    let mut server = Server::new();
    let _pulls = server
        .mock("GET", pulls_path())
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"message": "Not Found"}"#)
        .create();

    let err = mk_client(&server)
        .pull_requests("testorg", "testrepo", &logger())
        .unwrap_err();

    match report_error(err) {
        ReportError::Fetch(_) => {}
        other => panic!("expected fetch error, got {:?}", other),
    }
}

#[test]
fn listing_follows_link_header() {
    let mut server = Server::new();
    let next = format!(
        "{}/repositories/1296269/pulls?state=all&per_page=100&page=2",
        server.url()
    );
    let page_1 = server
        .mock("GET", pulls_path())
        .match_query(Matcher::UrlEncoded("state".into(), "all".into()))
        .match_header("authorization", BASIC_TOKEN)
        .with_status(200)
        .with_header("link", &format!(r#"<{}>; rel="next""#, next))
        .with_body(example_input::pulls_page_1())
        .create();
    let page_2 = server
        .mock(
            "GET",
            Matcher::Regex("^/repositories/1296269/pulls".to_string()),
        )
        .match_query(Matcher::Any)
        .match_header("authorization", BASIC_TOKEN)
        .with_status(200)
        .with_body(
            r#"[{"number": 7, "title": "Old one", "body": "XY-7",
                 "created_at": "2019-05-01T00:00:00Z", "state": "closed"}]"#,
        )
        .create();

    let prs = mk_client(&server)
        .pull_requests("testorg", "testrepo", &logger())
        .unwrap();

    assert_eq!(
        vec![1347, 1346, 7],
        prs.iter().map(|pr| pr.number).collect::<Vec<_>>()
    );
    page_1.assert();
    page_2.assert();
}
