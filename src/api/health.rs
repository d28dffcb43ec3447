use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::AppState;
use crate::oauth::{Provider, ProviderDescriptor};

#[derive(Debug, Serialize)]
pub struct ProviderStatus {
    pub provider: String,
    pub configured: bool,
    pub initiation: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub providers: Vec<ProviderStatus>,
}

/// GET /health
///
/// Overall status and whether each provider has a client id configured.
/// No authentication required.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let providers = Provider::ALL
        .iter()
        .map(|&p| {
            let d = ProviderDescriptor::from_config(&state.config, p);
            ProviderStatus {
                provider: p.to_string(),
                configured: d.client_id.is_some(),
                initiation: d.initiation.to_string(),
            }
        })
        .collect();

    Json(HealthResponse {
        status: "ok".to_string(),
        providers,
    })
}
