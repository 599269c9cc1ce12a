use bundler_engine::{AuthOutcome, TokenAuthenticator};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn authenticator(endpoint: String) -> TokenAuthenticator {
    TokenAuthenticator::new(reqwest::Client::new(), endpoint)
}

#[tokio::test]
async fn status_200_authenticates() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth"))
        .and(body_json(json!({ "token": "secret" })))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let outcome = authenticator(format!("{}/auth", server.uri()))
        .authenticate("secret")
        .await;

    assert_eq!(outcome, AuthOutcome::Authenticated);
    assert!(outcome.is_authenticated());
}

#[tokio::test]
async fn any_other_status_rejects() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let outcome = authenticator(format!("{}/auth", server.uri()))
        .authenticate("secret")
        .await;

    assert_eq!(outcome, AuthOutcome::Rejected);
    assert!(!outcome.is_authenticated());
}

#[tokio::test]
async fn transport_failure_becomes_check_failed() {
    // The endpoint is unreachable; the failure is swallowed, not propagated.
    let outcome = authenticator("http://127.0.0.1:9/auth".to_string())
        .authenticate("secret")
        .await;

    assert!(
        matches!(outcome, AuthOutcome::CheckFailed(_)),
        "got {outcome:?}"
    );
    assert!(!outcome.is_authenticated());
}

#[tokio::test]
async fn empty_endpoint_becomes_check_failed() {
    // The auth variant with no configured endpoint rejects every token.
    let outcome = authenticator(String::new()).authenticate("secret").await;
    assert!(
        matches!(outcome, AuthOutcome::CheckFailed(_)),
        "got {outcome:?}"
    );
}
