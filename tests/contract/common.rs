use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, Response, StatusCode, header};
use tower::ServiceExt;

use bloocube::config::Config;
use bloocube::{AppState, build_app};

pub const ORIGIN: &str = "https://app.example.com";

/// Config with every provider's client id set and a public origin.
pub fn config() -> Config {
    let mut config = Config::default();
    config.app.public_origin = ORIGIN.to_string();
    config.app.api_base = "https://api.example.com".to_string();
    config.providers.linkedin.client_id = Some("li-client".into());
    config.providers.twitter.client_id = Some("tw-client".into());
    config.providers.youtube.client_id = Some("yt-client".into());
    config.providers.google.client_id = Some("g-client".into());
    config
}

pub fn app(config: Config) -> Router {
    build_app(AppState::new(config))
}

/// GET `uri` with the given `Cookie` header.
pub async fn get(app: Router, uri: &str, cookies: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookies) = cookies {
        builder = builder.header(header::COOKIE, cookies);
    }
    app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap()
}

/// Location of a 303 redirect; panics on anything else.
pub fn location(resp: &Response<Body>) -> String {
    assert_eq!(resp.status(), StatusCode::SEE_OTHER, "expected a redirect");
    resp.headers()[header::LOCATION].to_str().unwrap().to_string()
}

/// Value set for cookie `name` by the response, if any. Removals show up
/// as an empty value.
pub fn set_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|c| {
            let (pair, _) = c.split_once(';').unwrap_or((c, ""));
            let (k, v) = pair.split_once('=')?;
            (k == name).then(|| v.to_string())
        })
}

/// Full `Set-Cookie` header for cookie `name`, attributes included.
pub fn raw_set_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|c| c.starts_with(&prefix))
        .map(String::from)
}

pub fn query_param(url: &str, key: &str) -> Option<String> {
    url::Url::parse(url)
        .unwrap()
        .query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}
