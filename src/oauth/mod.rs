//! OAuth redirect handshake for social account linking.
//!
//! Every provider runs the same three-part handshake:
//!
//! - [`initiator`] - builds the provider authorization URL (locally or via the
//!   backend) and persists an anti-forgery token before the browser leaves
//! - [`callback`] - validates the provider redirect and forwards the code to
//!   the backend exchange endpoint
//! - [`crate::auth::session`] - the session gate both parts run first
//!
//! Provider differences live entirely in [`provider::ProviderDescriptor`].

pub mod backend;
pub mod callback;
pub mod initiator;
pub mod provider;

// Re-exports
pub use backend::{BackendClient, BackendError};
pub use callback::{CallbackParams, StatePolicy, receive_callback, states_match};
pub use initiator::{AuthorizationRequest, generate_state, initiate, issue_authorization};
pub use provider::{Provider, ProviderDescriptor};

use serde::{Deserialize, Serialize};

use crate::auth::error::StoreError;
use crate::auth::session::login_redirect;

/// Message shown when a provider callback fails an integrity check.
pub const MSG_MISSING_PARAMS: &str = "Missing code or state.";
pub const MSG_INVALID_STATE: &str = "Invalid state.";
/// Generic message for failures whose details stay server-side.
pub const MSG_GENERIC: &str = "Authentication failed.";

// =============================================================================
// HandshakeError
// =============================================================================

/// Every way a handshake step can end short of its happy path.
#[derive(Debug, thiserror::Error)]
pub enum HandshakeError {
    /// No first-party session. `next` is the path+query to resume after login.
    #[error("Session required")]
    SessionMissing { next: String },

    /// The provider redirected back with an `error` parameter.
    #[error("Provider denied authorization: {0}")]
    ProviderDenied(String),

    /// `code` or `state` absent from the callback query.
    #[error("Missing code or state")]
    MissingParams,

    /// Received state does not match the stored anti-forgery token.
    #[error("Invalid state")]
    InvalidState,

    /// A required server-side credential is not configured.
    #[error("OAuth client is not configured for {0}")]
    Configuration(Provider),

    /// The caller omitted a required parameter.
    #[error("{0}")]
    ClientRequest(String),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl HandshakeError {
    pub fn session_missing(path_and_query: &str) -> Self {
        Self::SessionMissing {
            next: path_and_query.to_string(),
        }
    }

    /// The user-facing message carried to the error view.
    ///
    /// Protocol violations get fixed messages; configuration, backend and
    /// storage details never reach the browser.
    pub fn user_message(&self) -> String {
        match self {
            Self::ProviderDenied(message) => message.clone(),
            Self::MissingParams => MSG_MISSING_PARAMS.to_string(),
            Self::InvalidState => MSG_INVALID_STATE.to_string(),
            Self::ClientRequest(message) => message.clone(),
            Self::SessionMissing { .. }
            | Self::Configuration(_)
            | Self::Backend(_)
            | Self::Storage(_) => MSG_GENERIC.to_string(),
        }
    }

    /// Redirect target for this failure.
    ///
    /// A missing session goes to the login view with a resumable `next`;
    /// everything else goes to the provider's error view with a `message`.
    pub fn location(&self, descriptor: &ProviderDescriptor, login_path: &str) -> String {
        match self {
            Self::SessionMissing { next } => login_redirect(login_path, next),
            other => message_redirect(&descriptor.error_redirect, &other.user_message()),
        }
    }
}

/// `{base}?message={encoded}`, appending with `&` when `base` already has a query.
pub fn message_redirect(base: &str, message: &str) -> String {
    append_query(base, "message", message)
}

pub(crate) fn append_query(base: &str, key: &str, value: &str) -> String {
    let sep = if base.contains('?') { '&' } else { '?' };
    format!("{base}{sep}{key}={}", urlencoding::encode(value))
}

// =============================================================================
// AuthUrlResponse
// =============================================================================

/// Body of `POST /api/{provider}/auth-url`, both as served and as consumed
/// from the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthUrlResponse {
    pub success: bool,
    #[serde(rename = "authURL", default, skip_serializing_if = "Option::is_none")]
    pub auth_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AuthUrlResponse {
    pub fn ok(auth_url: String, state: String) -> Self {
        Self {
            success: true,
            auth_url: Some(auth_url),
            state: Some(state),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }
}
