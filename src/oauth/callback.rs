//! Callback receiver.
//!
//! One state machine serves every provider:
//!
//! ```text
//! CHECK_SESSION -> CHECK_ERROR -> CHECK_PRESENCE -> CHECK_STATE -> FORWARD
//! ```
//!
//! Any failing check ends the handshake with a [`HandshakeError`] whose
//! [`location`](HandshakeError::location) is the redirect target. On success
//! the browser is sent to the backend exchange endpoint with the code.

use serde::Deserialize;
use subtle::ConstantTimeEq;
use tracing::{debug, info, warn};

use crate::auth::session::require_session;
use crate::auth::store::{AntiForgeryStore, ProfileStore};
use crate::oauth::HandshakeError;
use crate::oauth::provider::ProviderDescriptor;

/// Query parameters of a provider redirect. All untrusted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

impl CallbackParams {
    fn non_empty(value: Option<&str>) -> Option<&str> {
        value.filter(|s| !s.is_empty())
    }
}

/// Lifetime of a stored anti-forgery token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatePolicy {
    /// Clear the stored token after it has been compared, match or not.
    pub single_use: bool,
}

impl Default for StatePolicy {
    fn default() -> Self {
        Self { single_use: true }
    }
}

/// True iff `stored` is present, non-empty and byte-for-byte equal to
/// `received`. The comparison does not short-circuit on the first difference.
pub fn states_match(stored: Option<&str>, received: &str) -> bool {
    match stored {
        Some(stored) if !stored.is_empty() && !received.is_empty() => {
            bool::from(stored.as_bytes().ct_eq(received.as_bytes()))
        }
        _ => false,
    }
}

/// Run the callback state machine and return the backend exchange URL.
///
/// `path_and_query` is the request target of the callback itself, used as
/// the login resume target when no session is present.
pub fn receive_callback(
    descriptor: &ProviderDescriptor,
    params: &CallbackParams,
    path_and_query: &str,
    store: &mut dyn ProfileStore,
    policy: StatePolicy,
) -> Result<String, HandshakeError> {
    let provider = descriptor.provider;

    // CHECK_SESSION
    require_session(&*store, path_and_query).inspect_err(|_| {
        info!(%provider, outcome = "session_missing", "Callback redirected to login");
    })?;

    // CHECK_ERROR
    if let Some(error) = CallbackParams::non_empty(params.error.as_deref()) {
        let message = CallbackParams::non_empty(params.error_description.as_deref())
            .unwrap_or(error)
            .to_string();
        warn!(%provider, outcome = "provider_denied", error, "Provider reported an error");
        return Err(HandshakeError::ProviderDenied(message));
    }

    // CHECK_PRESENCE
    let (Some(code), Some(state)) = (
        CallbackParams::non_empty(params.code.as_deref()),
        CallbackParams::non_empty(params.state.as_deref()),
    ) else {
        warn!(%provider, outcome = "missing_params", "Callback missing code or state");
        return Err(HandshakeError::MissingParams);
    };

    // CHECK_STATE
    let mut tokens = AntiForgeryStore::new(store, &descriptor.state_key);
    let stored = tokens.get()?;
    let matched = states_match(stored.as_deref(), state);
    if policy.single_use {
        tokens.clear()?;
        debug!(%provider, "Anti-forgery token consumed");
    }
    if !matched {
        warn!(
            %provider,
            outcome = "invalid_state",
            stored_present = stored.is_some(),
            "State mismatch"
        );
        return Err(HandshakeError::InvalidState);
    }

    // FORWARD
    info!(%provider, outcome = "forward", "Forwarding authorization code to backend");
    Ok(exchange_url(descriptor, code, state))
}

/// `{exchange_endpoint}?code=..&state=..&redirectUri=..`, all URL-encoded.
pub fn exchange_url(descriptor: &ProviderDescriptor, code: &str, state: &str) -> String {
    format!(
        "{}?code={}&state={}&redirectUri={}",
        descriptor.exchange_endpoint,
        urlencoding::encode(code),
        urlencoding::encode(state),
        urlencoding::encode(&descriptor.callback_url),
    )
}
