use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bloocube::auth::SessionCredential;
use bloocube::oauth::{BackendClient, BackendError, Provider, ProviderDescriptor};

use crate::common::{app, config, get, location, set_cookie};

const CALLBACK: &str = "https://app.example.com/auth/twitter/callback";

fn twitter(server: &MockServer) -> ProviderDescriptor {
    let mut cfg = config();
    cfg.app.api_base = server.uri();
    ProviderDescriptor::from_config(&cfg, Provider::Twitter)
}

async fn backend_with(status: u16, body: serde_json::Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/twitter/auth-url"))
        .and(header("authorization", "Bearer jwt"))
        .and(body_json(json!({ "redirectUri": CALLBACK })))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .expect(1)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_request_auth_url_success() {
    let server = backend_with(
        200,
        json!({
            "success": true,
            "authURL": "https://twitter.com/i/oauth2/authorize?state=srv-state",
            "state": "srv-state"
        }),
    )
    .await;

    let resp = BackendClient::new()
        .request_auth_url(&twitter(&server), &SessionCredential::new("jwt"))
        .await
        .unwrap();
    assert!(resp.success);
    assert_eq!(resp.state.as_deref(), Some("srv-state"));
    assert_eq!(
        resp.auth_url.as_deref(),
        Some("https://twitter.com/i/oauth2/authorize?state=srv-state")
    );
}

#[tokio::test]
async fn test_request_auth_url_rejected() {
    let server = backend_with(
        500,
        json!({ "success": false, "error": "Twitter OAuth not configured" }),
    )
    .await;

    let err = BackendClient::new()
        .request_auth_url(&twitter(&server), &SessionCredential::new("jwt"))
        .await
        .unwrap_err();
    match err {
        BackendError::Rejected { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "Twitter OAuth not configured");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_request_auth_url_success_false_with_200() {
    let server = backend_with(200, json!({ "success": false, "error": "nope" })).await;
    let err = BackendClient::new()
        .request_auth_url(&twitter(&server), &SessionCredential::new("jwt"))
        .await
        .unwrap_err();
    assert!(matches!(err, BackendError::Rejected { status: 200, .. }));
}

#[tokio::test]
async fn test_request_auth_url_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/twitter/auth-url"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = BackendClient::new()
        .request_auth_url(&twitter(&server), &SessionCredential::new("jwt"))
        .await
        .unwrap_err();
    assert!(matches!(err, BackendError::Malformed(_)));
}

#[tokio::test]
async fn test_connect_backend_mode_persists_server_state() {
    let server = backend_with(
        200,
        json!({
            "success": true,
            "authURL": "https://twitter.com/i/oauth2/authorize?state=srv-state",
            "state": "srv-state"
        }),
    )
    .await;

    let mut cfg = config();
    cfg.app.api_base = server.uri();
    let resp = get(app(cfg), "/auth/twitter/connect", Some("token=jwt")).await;

    assert_eq!(
        location(&resp),
        "https://twitter.com/i/oauth2/authorize?state=srv-state"
    );
    assert_eq!(
        set_cookie(resp.headers(), "twitter_state").as_deref(),
        Some("srv-state")
    );
}

#[tokio::test]
async fn test_connect_backend_failure_redirects_with_generic_message() {
    let server = backend_with(
        500,
        json!({ "success": false, "error": "Twitter OAuth not configured" }),
    )
    .await;

    let mut cfg = config();
    cfg.app.api_base = server.uri();
    let resp = get(app(cfg), "/auth/twitter/connect", Some("token=jwt")).await;

    assert_eq!(location(&resp), "/settings?message=Authentication%20failed.");
    assert!(set_cookie(resp.headers(), "twitter_state").is_none());
}

#[tokio::test]
async fn test_connect_backend_missing_state_is_rejected() {
    let server = backend_with(
        200,
        json!({ "success": true, "authURL": "https://twitter.com/i/oauth2/authorize" }),
    )
    .await;

    let mut cfg = config();
    cfg.app.api_base = server.uri();
    let resp = get(app(cfg), "/auth/twitter/connect", Some("token=jwt")).await;

    assert_eq!(location(&resp), "/settings?message=Authentication%20failed.");
    assert!(set_cookie(resp.headers(), "twitter_state").is_none());
}
