pub mod health;
pub mod oauth;

use axum::Router;
use axum::routing::{get, post};

use crate::AppState;

/// Build the JSON API router.
///
/// Route layout:
/// ```text
/// /health                        GET    (no auth)
/// /api/{provider}/auth-url       POST   (bearer session)
/// /api/{provider}/config         GET    (no auth, masked diagnostics)
/// ```
pub fn build_api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/{provider}/auth-url", post(oauth::auth_url))
        .route("/api/{provider}/config", get(oauth::provider_config))
}
