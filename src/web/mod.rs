//! Browser-facing routes.
//!
//! The connect and callback routes drive the OAuth handshake. Every outcome
//! is a redirect: to the provider, to the backend exchange endpoint, to the
//! login view, or to the error view with a message. The client store is the
//! browser's cookie jar, returned with each redirect so state changes land.

pub mod templates;

use axum::Router;
use axum::extract::rejection::QueryRejection;
use axum::extract::{OriginalUri, Path, Query, State};
use axum::http::{StatusCode, Uri};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use axum_extra::extract::cookie::CookieJar;
use minijinja::{Environment, context};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::AppState;
use crate::auth::store::CookieStore;
use crate::config::Initiation;
use crate::oauth::{
    CallbackParams, Provider, ProviderDescriptor, StatePolicy, initiate, message_redirect,
    receive_callback,
};

/// Message for provider names outside the supported set.
pub const MSG_UNSUPPORTED: &str = "Unsupported provider.";

// ---------------------------------------------------------------------------
// Template engine
// ---------------------------------------------------------------------------

fn template_env() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template("layout.html", templates::LAYOUT)?;
    env.add_template("login.html", templates::LOGIN)?;
    env.add_template("settings.html", templates::SETTINGS)?;
    Ok(env)
}

/// Render a template by name with the given minijinja context.
fn render(template_name: &str, ctx: minijinja::Value) -> Response {
    let rendered = template_env()
        .and_then(|env| env.get_template(template_name)?.render(ctx));
    match rendered {
        Ok(html) => Html(html).into_response(),
        Err(err) => {
            tracing::error!(template = template_name, error = %err, "Template render error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("<h1>Template Error</h1>".to_string()),
            )
                .into_response()
        }
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the browser router.
///
/// ```text
/// /                              GET  -> redirect to the error/settings view
/// /login                         GET  (?next=)
/// /settings                      GET  (?message=)
/// /auth/{provider}/connect       GET  -> provider authorization URL
/// /auth/{provider}/callback      GET  -> backend exchange endpoint
/// ```
pub fn build_web_router() -> Router<AppState> {
    Router::new()
        .route("/", get(index_redirect))
        .route("/login", get(login_page))
        .route("/settings", get(settings_page))
        .route("/auth/{provider}/connect", get(connect))
        .route("/auth/{provider}/callback", get(callback))
}

/// Request target as seen by the browser.
fn path_and_query(uri: &Uri) -> String {
    uri.path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string())
}

/// Only same-origin absolute paths are offered as a resume target.
fn safe_next(next: &str) -> Option<&str> {
    (next.starts_with('/') && !next.starts_with("//") && !next.contains('\\')).then_some(next)
}

// ---------------------------------------------------------------------------
// Page handlers
// ---------------------------------------------------------------------------

async fn index_redirect(State(state): State<AppState>) -> Redirect {
    Redirect::to(&state.config.app.error_path)
}

#[derive(Debug, Default, Deserialize)]
struct LoginQuery {
    next: Option<String>,
}

async fn login_page(query: Result<Query<LoginQuery>, QueryRejection>) -> Response {
    let Query(q) = query.unwrap_or_default();
    let next = q.next.as_deref().and_then(safe_next);
    render("login.html", context! { next => next })
}

#[derive(Debug, Default, Deserialize)]
struct SettingsQuery {
    message: Option<String>,
}

#[derive(Debug, Serialize)]
struct ProviderView {
    name: &'static str,
    configured: bool,
    connect_url: String,
}

async fn settings_page(
    State(state): State<AppState>,
    query: Result<Query<SettingsQuery>, QueryRejection>,
) -> Response {
    let Query(q) = query.unwrap_or_default();
    let providers: Vec<ProviderView> = Provider::ALL
        .iter()
        .map(|&p| {
            let d = ProviderDescriptor::from_config(&state.config, p);
            ProviderView {
                name: p.display_name(),
                configured: d.client_id.is_some() || d.initiation == Initiation::Backend,
                connect_url: format!("/auth/{p}/connect"),
            }
        })
        .collect();
    render(
        "settings.html",
        context! { message => q.message, providers => providers },
    )
}

// ---------------------------------------------------------------------------
// Handshake handlers
// ---------------------------------------------------------------------------

fn unsupported(state: &AppState, raw: &str) -> Redirect {
    warn!(provider = raw, "Unsupported provider");
    Redirect::to(&message_redirect(&state.config.app.error_path, MSG_UNSUPPORTED))
}

/// GET /auth/{provider}/connect
async fn connect(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    OriginalUri(uri): OriginalUri,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    let Ok(provider) = raw.parse::<Provider>() else {
        return (jar, unsupported(&state, &raw));
    };
    let descriptor = ProviderDescriptor::from_config(&state.config, provider);
    let mut store = CookieStore::new(jar, state.config.app.cookie_secure);

    let target = path_and_query(&uri);
    let location = match initiate(&descriptor, &mut store, &state.backend, &target).await {
        Ok(url) => url,
        Err(err) => {
            debug!(%provider, error = %err, "Initiation did not complete");
            err.location(&descriptor, &state.config.app.login_path)
        }
    };
    (store.into_jar(), Redirect::to(&location))
}

/// GET /auth/{provider}/callback
async fn callback(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    OriginalUri(uri): OriginalUri,
    query: Result<Query<CallbackParams>, QueryRejection>,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    let Ok(provider) = raw.parse::<Provider>() else {
        return (jar, unsupported(&state, &raw));
    };
    let params = match query {
        Ok(Query(params)) => params,
        Err(err) => {
            warn!(%provider, error = %err, "Unparseable callback query");
            CallbackParams::default()
        }
    };
    let descriptor = ProviderDescriptor::from_config(&state.config, provider);
    let mut store = CookieStore::new(jar, state.config.app.cookie_secure);
    let policy = StatePolicy {
        single_use: state.config.app.single_use_state,
    };

    let location = receive_callback(
        &descriptor,
        &params,
        &path_and_query(&uri),
        &mut store,
        policy,
    )
    .unwrap_or_else(|err| err.location(&descriptor, &state.config.app.login_path));
    (store.into_jar(), Redirect::to(&location))
}
