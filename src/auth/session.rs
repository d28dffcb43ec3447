//! Session gate.
//!
//! Both halves of the handshake need a first-party session: the backend's
//! auth-url and exchange endpoints authenticate with it. A missing session is
//! not a provider failure; the user is sent to log in and resumes afterwards.

use tracing::debug;

use crate::auth::store::{ProfileStore, SESSION_KEY};
use crate::oauth::HandshakeError;

/// First-party bearer credential read from the client store.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionCredential(String);

impl SessionCredential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `Authorization` header value.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl std::fmt::Debug for SessionCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionCredential(***)")
    }
}

/// Return the stored session credential, or `SessionMissing` carrying
/// `path_and_query` as the resume target.
///
/// Empty and whitespace-only values count as absent.
pub fn require_session(
    store: &dyn ProfileStore,
    path_and_query: &str,
) -> Result<SessionCredential, HandshakeError> {
    match store.get(SESSION_KEY)? {
        Some(token) if !token.trim().is_empty() => Ok(SessionCredential(token.trim().to_string())),
        _ => {
            debug!(store = store.name(), "No session credential");
            Err(HandshakeError::session_missing(path_and_query))
        }
    }
}

/// `{login_path}?next={path_and_query}` with the target URL-encoded.
pub fn login_redirect(login_path: &str, path_and_query: &str) -> String {
    crate::oauth::append_query(login_path, "next", path_and_query)
}
