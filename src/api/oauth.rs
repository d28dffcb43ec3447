//! OAuth proxy routes.
//!
//! `auth-url` issues a provider authorization URL and fresh state for a
//! caller holding a session. `config` is a diagnostic view of what the
//! server knows about a provider, with credentials masked.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::AppState;
use crate::auth::BearerToken;
use crate::config::EnvOverrides;
use crate::error::AppError;
use crate::oauth::{AuthUrlResponse, Provider, ProviderDescriptor, issue_authorization};

/// Characters of a credential shown in diagnostics.
const PREVIEW_CHARS: usize = 4;

#[derive(Debug, Deserialize)]
pub struct AuthUrlRequest {
    #[serde(rename = "redirectUri", default)]
    pub redirect_uri: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfigResponse {
    pub success: bool,
    pub provider: String,
    pub client_id_configured: bool,
    pub client_secret_configured: bool,
    pub client_id_preview: Option<String>,
    pub client_secret_preview: Option<String>,
    pub redirect_uri: String,
    pub initiation: String,
    pub env_overrides: Vec<EnvOverrideEntry>,
}

/// A provider setting replaced by an environment variable.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvOverrideEntry {
    pub setting: String,
    pub env_var: String,
}

fn parse_provider(raw: &str) -> Result<Provider, AppError> {
    raw.parse()
        .map_err(|_| AppError::NotFound(format!("Unsupported provider: {raw}")))
}

/// First few characters followed by `...`; values too short to preview
/// safely are fully masked.
pub fn mask(value: &str) -> String {
    if value.chars().count() <= PREVIEW_CHARS * 2 {
        return "...".to_string();
    }
    let head: String = value.chars().take(PREVIEW_CHARS).collect();
    format!("{head}...")
}

/// POST /api/{provider}/auth-url
pub async fn auth_url(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    session: Result<BearerToken, AppError>,
    body: Result<Json<AuthUrlRequest>, JsonRejection>,
) -> Result<Json<AuthUrlResponse>, AppError> {
    let provider = parse_provider(&provider)?;
    session?;
    let Json(req) = body?;

    let descriptor = ProviderDescriptor::from_config(&state.config, provider);
    let redirect_uri = req.redirect_uri.unwrap_or_default();
    let issued = issue_authorization(&descriptor, &redirect_uri)?;

    info!(%provider, "Issued authorization URL");
    Ok(Json(issued))
}

/// GET /api/{provider}/config
pub async fn provider_config(
    State(state): State<AppState>,
    Path(provider): Path<String>,
) -> Result<Json<ProviderConfigResponse>, AppError> {
    let provider = parse_provider(&provider)?;
    let pc = state.config.providers.get(provider);
    let descriptor = ProviderDescriptor::from_config(&state.config, provider);

    let configured = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());

    Ok(Json(ProviderConfigResponse {
        success: true,
        provider: provider.to_string(),
        client_id_configured: configured(&pc.client_id),
        client_secret_configured: configured(&pc.client_secret),
        client_id_preview: pc.client_id.as_deref().map(mask),
        client_secret_preview: pc.client_secret.as_deref().map(mask),
        redirect_uri: descriptor.callback_url,
        initiation: descriptor.initiation.to_string(),
        env_overrides: provider_overrides(&state.config.env_overrides, provider),
    }))
}

fn provider_overrides(overrides: &EnvOverrides, provider: Provider) -> Vec<EnvOverrideEntry> {
    overrides
        .keys_with_prefix(&format!("providers.{provider}."))
        .into_iter()
        .filter_map(|setting| {
            let env_var = overrides.env_var_for(&setting)?.to_string();
            Some(EnvOverrideEntry { setting, env_var })
        })
        .collect()
}
