// tests/forge_test.rs
use std::time::Duration;

use gitflow::domain::BranchKind;
use gitflow::forge::{GitHubGateway, ReviewGateway, ReviewRequest};
use gitflow::FlowError;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gateway(server: &MockServer) -> GitHubGateway {
    GitHubGateway::new(
        "acme",
        "widgets",
        "test-token",
        &server.uri(),
        Duration::from_secs(5),
    )
    .unwrap()
}

fn request() -> ReviewRequest {
    ReviewRequest::finishing(BranchKind::Feature, "feature-dark-mode", "development")
}

#[tokio::test]
async fn test_opens_pull_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/repos/acme/widgets/pulls"))
        .and(header("authorization", "Bearer test-token"))
        .and(header("accept", "application/vnd.github+json"))
        .and(body_json(json!({
            "head": "feature-dark-mode",
            "base": "development",
            "title": "Requesting Merge of feature-dark-mode to development",
            "body": "Finished Feature dark mode"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "number": 42,
            "html_url": "https://github.com/acme/widgets/pull/42",
            "state": "open"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = gateway(&server)
        .open_review_request(&request())
        .await
        .unwrap();
    assert_eq!(created.id, 42);
    assert_eq!(created.url, "https://github.com/acme/widgets/pull/42");
}

#[tokio::test]
async fn test_rejection_surfaces_body() {
    let server = MockServer::start().await;
    let body = r#"{"message":"Validation Failed","errors":[{"message":"A pull request already exists for acme:feature-dark-mode."}]}"#;
    Mock::given(method("POST"))
        .and(path("/repos/acme/widgets/pulls"))
        .respond_with(ResponseTemplate::new(422).set_body_string(body))
        .expect(1)
        .mount(&server)
        .await;

    let err = gateway(&server)
        .open_review_request(&request())
        .await
        .unwrap_err();
    match err {
        FlowError::RemoteService { status, body } => {
            assert_eq!(status, 422);
            assert!(body.contains("A pull request already exists"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_bad_credentials_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string(r#"{"message":"Bad credentials"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let err = gateway(&server)
        .open_review_request(&request())
        .await
        .unwrap_err();
    assert!(matches!(err, FlowError::RemoteService { status: 401, .. }));
    assert!(err.to_string().contains("Bad credentials"));
}

#[tokio::test]
async fn test_unreachable_service() {
    let gateway = GitHubGateway::new(
        "acme",
        "widgets",
        "t",
        "http://127.0.0.1:9",
        Duration::from_secs(2),
    )
    .unwrap();
    assert!(matches!(
        gateway.open_review_request(&request()).await,
        Err(FlowError::Network(_))
    ));
}
