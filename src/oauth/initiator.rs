//! Authorization initiator.
//!
//! Builds the provider authorization URL and persists the anti-forgery token
//! under the provider's key before the browser is sent away. Depending on the
//! provider's [`Initiation`] mode the token and URL are produced here or
//! issued by the backend's auth-url endpoint.

use rand::Rng;
use rand::distr::Alphanumeric;
use tracing::{info, warn};
use url::Url;

use crate::auth::session::require_session;
use crate::auth::store::{AntiForgeryStore, ProfileStore};
use crate::config::Initiation;
use crate::oauth::backend::BackendClient;
use crate::oauth::provider::{Provider, ProviderDescriptor};
use crate::oauth::{AuthUrlResponse, HandshakeError};

/// Length of a locally generated anti-forgery token.
pub const STATE_LEN: usize = 32;

/// Fresh anti-forgery token: 32 random alphanumeric characters.
pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(STATE_LEN)
        .map(char::from)
        .collect()
}

/// `{origin}/auth/{provider}/callback`, ignoring a trailing slash on `origin`.
pub fn default_callback_url(origin: &str, provider: Provider) -> String {
    format!("{}/auth/{provider}/callback", origin.trim_end_matches('/'))
}

/// Everything needed to build one provider authorization URL.
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    pub provider: Provider,
    pub authorize_url: String,
    pub client_id: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
}

impl AuthorizationRequest {
    /// Provider authorization URL carrying `state`.
    pub fn authorize_url(&self, state: &str) -> String {
        let mut params: Vec<(&str, String)> = vec![
            ("response_type", "code".to_string()),
            ("client_id", self.client_id.clone()),
            ("redirect_uri", self.redirect_uri.clone()),
            ("state", state.to_string()),
            ("scope", self.scopes.join(" ")),
        ];
        params.extend(
            self.provider
                .extra_params()
                .iter()
                .map(|(k, v)| (*k, v.to_string())),
        );

        let query = params
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let sep = if self.authorize_url.contains('?') { '&' } else { '?' };
        format!("{}{sep}{query}", self.authorize_url)
    }
}

/// Issue an authorization URL and fresh state for `redirect_uri`.
///
/// The redirect URI is validated before any server configuration is
/// consulted, so a bad request is a client error on every deployment.
pub fn issue_authorization(
    descriptor: &ProviderDescriptor,
    redirect_uri: &str,
) -> Result<AuthUrlResponse, HandshakeError> {
    let redirect_uri = redirect_uri.trim();
    if redirect_uri.is_empty() {
        return Err(HandshakeError::ClientRequest(
            "redirectUri is required".to_string(),
        ));
    }
    match Url::parse(redirect_uri) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        _ => {
            return Err(HandshakeError::ClientRequest(
                "redirectUri must be an absolute http(s) URL".to_string(),
            ));
        }
    }

    let client_id = descriptor
        .client_id
        .clone()
        .ok_or(HandshakeError::Configuration(descriptor.provider))?;

    let request = AuthorizationRequest {
        provider: descriptor.provider,
        authorize_url: descriptor.authorize_url.clone(),
        client_id,
        redirect_uri: redirect_uri.to_string(),
        scopes: descriptor.scopes.clone(),
    };
    let state = generate_state();
    Ok(AuthUrlResponse::ok(request.authorize_url(&state), state))
}

/// Start a handshake: session gate, obtain URL and state, persist the state.
///
/// Returns the provider authorization URL for a browser redirect. A previous
/// pending state for the same provider is overwritten.
pub async fn initiate(
    descriptor: &ProviderDescriptor,
    store: &mut dyn ProfileStore,
    backend: &BackendClient,
    path_and_query: &str,
) -> Result<String, HandshakeError> {
    let provider = descriptor.provider;
    let session = require_session(&*store, path_and_query)?;

    let (url, state) = match descriptor.initiation {
        Initiation::Client => {
            let issued = issue_authorization(descriptor, &descriptor.callback_url)?;
            unpack(provider, issued)?
        }
        Initiation::Backend => {
            let issued = backend.request_auth_url(descriptor, &session).await?;
            unpack(provider, issued)?
        }
    };

    AntiForgeryStore::new(store, &descriptor.state_key).set(&state)?;
    info!(%provider, initiation = %descriptor.initiation, "Authorization initiated");
    Ok(url)
}

fn unpack(provider: Provider, issued: AuthUrlResponse) -> Result<(String, String), HandshakeError> {
    match (issued.auth_url, issued.state) {
        (Some(url), Some(state)) if !url.is_empty() && !state.is_empty() => Ok((url, state)),
        _ => {
            warn!(%provider, "Authorization response missing URL or state");
            Err(HandshakeError::Backend(
                crate::oauth::BackendError::Malformed("missing authURL or state".to_string()),
            ))
        }
    }
}
