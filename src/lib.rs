pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod net;
pub mod oauth;
pub mod web;

use crate::config::Config;
use crate::oauth::backend::BackendClient;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

/// Shared application state accessible from all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub backend: BackendClient,
}

impl AppState {
    /// Build state from a loaded configuration.
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            backend: BackendClient::new(),
        }
    }
}

/// Build the combined application router with all middleware layers.
pub fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config);

    // X-Request-ID: generated when absent, echoed on the response.
    let request_id = SetRequestIdLayer::x_request_id(MakeRequestUuid);
    let propagate_id = PropagateRequestIdLayer::x_request_id();

    let trace = TraceLayer::new_for_http();

    Router::new()
        .merge(web::build_web_router())
        .merge(api::build_api_router())
        .layer(propagate_id)
        .layer(trace)
        .layer(request_id)
        .layer(cors)
        .with_state(state)
}

/// Build the CORS layer from config.
pub fn build_cors_layer(config: &Config) -> CorsLayer {
    if config.server.cors_origins.is_empty() {
        // Development default.
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .server
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
