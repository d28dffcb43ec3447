use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use tower::ServiceExt;

use bloocube::config::{Config, Initiation};

use crate::common::{ORIGIN, app, config, get, location, query_param, raw_set_cookie, set_cookie};

const PROVIDERS: [&str; 4] = ["linkedin", "twitter", "youtube", "google"];

#[tokio::test]
async fn test_callback_without_session_goes_to_login_for_every_provider() {
    for provider in PROVIDERS {
        let target = format!("/auth/{provider}/callback?code=c0de&state=st4te");
        let cookies = format!("{provider}_state=st4te");
        let resp = get(app(config()), &target, Some(&cookies)).await;

        let expected = format!("/login?next={}", urlencoding::encode(&target));
        assert_eq!(location(&resp), expected, "provider {provider}");
        // The pending token is left alone on the login detour.
        assert!(set_cookie(resp.headers(), &format!("{provider}_state")).is_none());
    }
}

#[tokio::test]
async fn test_valid_callback_forwards_to_backend_exchange() {
    let resp = get(
        app(config()),
        "/auth/youtube/callback?code=4%2F0Aabc&state=st4te",
        Some("token=jwt; youtube_state=st4te"),
    )
    .await;

    let loc = location(&resp);
    assert!(loc.starts_with("https://api.example.com/api/youtube/callback?"));
    assert_eq!(query_param(&loc, "code").as_deref(), Some("4/0Aabc"));
    assert_eq!(query_param(&loc, "state").as_deref(), Some("st4te"));
    assert_eq!(
        query_param(&loc, "redirectUri").as_deref(),
        Some("https://app.example.com/auth/youtube/callback")
    );
}

#[tokio::test]
async fn test_state_mismatch_redirects_with_invalid_state() {
    let resp = get(
        app(config()),
        "/auth/twitter/callback?code=abc&state=forged",
        Some("token=jwt; twitter_state=st4te"),
    )
    .await;
    assert_eq!(location(&resp), "/settings?message=Invalid%20state.");

    let removal = raw_set_cookie(resp.headers(), "twitter_state").expect("state cookie removed");
    assert!(removal.starts_with("twitter_state=;"), "{removal}");
    assert!(removal.contains("Max-Age=0"), "{removal}");
}

#[tokio::test]
async fn test_missing_stored_state_redirects_with_invalid_state() {
    let resp = get(
        app(config()),
        "/auth/twitter/callback?code=abc&state=st4te",
        Some("token=jwt"),
    )
    .await;
    assert_eq!(location(&resp), "/settings?message=Invalid%20state.");
}

#[tokio::test]
async fn test_single_use_state_is_cleared_after_callback() {
    let resp = get(
        app(config()),
        "/auth/twitter/callback?code=abc&state=st4te",
        Some("token=jwt; twitter_state=st4te"),
    )
    .await;
    assert!(location(&resp).starts_with("https://api.example.com/api/twitter/callback?"));
    assert_eq!(set_cookie(resp.headers(), "twitter_state").as_deref(), Some(""));

    // The browser drops the cookie, so a replay has no stored token.
    let replay = get(
        app(config()),
        "/auth/twitter/callback?code=abc&state=st4te",
        Some("token=jwt"),
    )
    .await;
    assert_eq!(location(&replay), "/settings?message=Invalid%20state.");
}

#[tokio::test]
async fn test_reusable_state_is_idempotent() {
    let mut cfg = config();
    cfg.app.single_use_state = false;

    let mut locations = Vec::new();
    for _ in 0..2 {
        let resp = get(
            app(cfg.clone()),
            "/auth/twitter/callback?code=abc&state=st4te",
            Some("token=jwt; twitter_state=st4te"),
        )
        .await;
        assert!(set_cookie(resp.headers(), "twitter_state").is_none());
        locations.push(location(&resp));
    }
    assert_eq!(locations[0], locations[1]);
    assert!(locations[0].starts_with("https://api.example.com/api/twitter/callback?"));
}

#[tokio::test]
async fn test_provider_error_uses_description() {
    let resp = get(
        app(config()),
        "/auth/linkedin/callback?error=access_denied&error_description=User+cancelled",
        Some("token=jwt; linkedin_state=st4te"),
    )
    .await;
    assert_eq!(location(&resp), "/settings?message=User%20cancelled");
}

#[tokio::test]
async fn test_missing_state_with_code_present() {
    for query in ["?code=abc", "", "?state="] {
        let resp = get(
            app(config()),
            &format!("/auth/google/callback{query}"),
            Some("token=jwt; google_state=st4te"),
        )
        .await;
        assert_eq!(
            location(&resp),
            "/settings?message=Missing%20code%20or%20state.",
            "query {query:?}"
        );
    }
}

#[tokio::test]
async fn test_duplicated_query_params_fail_closed() {
    for query in ["?error=a&error=b", "?code=abc&state=st4te&state=st4te"] {
        let resp = get(
            app(config()),
            &format!("/auth/twitter/callback{query}"),
            Some("token=jwt; twitter_state=st4te"),
        )
        .await;
        assert_eq!(
            location(&resp),
            "/settings?message=Missing%20code%20or%20state.",
            "query {query:?}"
        );
    }
}

#[tokio::test]
async fn test_provider_error_redirect_respects_per_provider_view() {
    let mut cfg = config();
    cfg.providers.linkedin.error_redirect = Some("/creator/settings?tab=social".into());
    let resp = get(
        app(cfg),
        "/auth/linkedin/callback?code=abc&state=forged",
        Some("token=jwt; linkedin_state=st4te"),
    )
    .await;
    assert_eq!(
        location(&resp),
        "/creator/settings?tab=social&message=Invalid%20state."
    );
}

#[tokio::test]
async fn test_unsupported_provider() {
    let resp = get(app(config()), "/auth/myspace/callback?code=a&state=b", Some("token=jwt")).await;
    assert_eq!(location(&resp), "/settings?message=Unsupported%20provider.");
    let resp = get(app(config()), "/auth/myspace/connect", Some("token=jwt")).await;
    assert_eq!(location(&resp), "/settings?message=Unsupported%20provider.");
}

#[tokio::test]
async fn test_connect_client_mode_uses_default_callback_url() {
    let mut cfg = config();
    cfg.providers.twitter.initiation = Some(Initiation::Client);

    let resp = get(app(cfg), "/auth/twitter/connect", Some("token=jwt")).await;
    let loc = location(&resp);
    assert!(loc.starts_with("https://twitter.com/i/oauth2/authorize?"));
    assert_eq!(
        query_param(&loc, "redirect_uri").as_deref(),
        Some(format!("{ORIGIN}/auth/twitter/callback").as_str())
    );
    assert_eq!(query_param(&loc, "response_type").as_deref(), Some("code"));
    assert_eq!(query_param(&loc, "client_id").as_deref(), Some("tw-client"));
    assert_eq!(
        query_param(&loc, "scope").as_deref(),
        Some("tweet.read users.read offline.access")
    );

    let state = query_param(&loc, "state").unwrap();
    assert_eq!(state.len(), 32);
    assert_eq!(set_cookie(resp.headers(), "twitter_state"), Some(state));
}

#[tokio::test]
async fn test_connect_then_callback_round_trip() {
    let resp = get(app(config()), "/auth/linkedin/connect", Some("token=jwt")).await;
    let state = query_param(&location(&resp), "state").unwrap();
    let cookie = set_cookie(resp.headers(), "linkedin_state").unwrap();

    let resp = get(
        app(config()),
        &format!("/auth/linkedin/callback?code=abc&state={state}"),
        Some(&format!("token=jwt; linkedin_state={cookie}")),
    )
    .await;
    assert!(location(&resp).starts_with("https://api.example.com/api/linkedin/callback?code=abc"));
}

#[tokio::test]
async fn test_connect_without_session_goes_to_login() {
    let resp = get(app(config()), "/auth/linkedin/connect", None).await;
    assert_eq!(location(&resp), "/login?next=%2Fauth%2Flinkedin%2Fconnect");
    assert!(set_cookie(resp.headers(), "linkedin_state").is_none());
}

#[tokio::test]
async fn test_connect_unconfigured_client_mode() {
    let mut cfg = config();
    cfg.providers.linkedin.client_id = None;
    let resp = get(app(cfg), "/auth/linkedin/connect", Some("token=jwt")).await;
    assert_eq!(location(&resp), "/settings?message=Authentication%20failed.");
}

#[tokio::test]
async fn test_auth_url_endpoint_rejects_empty_redirect_uri() {
    let req = Request::builder()
        .method("POST")
        .uri("/api/twitter/auth-url")
        .header(header::AUTHORIZATION, "Bearer jwt")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"redirectUri":""}"#))
        .unwrap();
    let resp = app(config()).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
    assert!(body.get("authURL").is_none());
}

#[tokio::test]
async fn test_auth_url_empty_redirect_uri_on_default_config() {
    let req = Request::builder()
        .method("POST")
        .uri("/api/twitter/auth-url")
        .header(header::AUTHORIZATION, "Bearer jwt")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"redirectUri":""}"#))
        .unwrap();
    let resp = app(Config::default()).oneshot(req).await.unwrap();
    assert!(resp.status().is_client_error(), "status {}", resp.status());

    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_settings_view_shows_message() {
    let resp = get(app(config()), "/settings?message=Invalid+state.", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("Invalid state."));
    assert!(html.contains("LinkedIn"));
}

#[tokio::test]
async fn test_index_redirects_to_settings() {
    let resp = get(app(config()), "/", None).await;
    assert_eq!(location(&resp), "/settings");
}
