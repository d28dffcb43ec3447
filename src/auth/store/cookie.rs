//! Cookie-backed client store.
//!
//! The browser's cookie jar is the client-side key-value store in a
//! server-rendered flow. Values are read from the request's `Cookie` header
//! and every mutation is sent back to the browser as a `Set-Cookie` header
//! when the jar is returned with the response.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::instrument;

use super::ProfileStore;
use crate::auth::error::StoreError;

/// Client store over a request's cookie jar.
///
/// Cookies are scoped to `/`, `HttpOnly` and `SameSite=Lax`; `Lax` keeps them
/// attached to the top-level navigation back from the provider.
#[derive(Debug, Clone, Default)]
pub struct CookieStore {
    jar: CookieJar,
    secure: bool,
}

impl CookieStore {
    /// Wrap the jar extracted from the incoming request.
    pub fn new(jar: CookieJar, secure: bool) -> Self {
        Self { jar, secure }
    }

    /// Hand back the jar so its changes can be attached to the response.
    pub fn into_jar(self) -> CookieJar {
        self.jar
    }

    fn check_key(key: &str) -> Result<(), StoreError> {
        if key.is_empty()
            || !key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(())
    }
}

impl ProfileStore for CookieStore {
    #[instrument(skip(self))]
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Self::check_key(key)?;
        match self.jar.get(key) {
            Some(cookie) => {
                let value = urlencoding::decode(cookie.value()).map_err(|e| {
                    StoreError::Backend(format!("Cookie '{key}' is not valid UTF-8: {e}"))
                })?;
                Ok(Some(value.into_owned()))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self, value))]
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        Self::check_key(key)?;
        let cookie = Cookie::build((key.to_string(), urlencoding::encode(value).into_owned()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure);
        self.jar = std::mem::take(&mut self.jar).add(cookie);
        Ok(())
    }

    #[instrument(skip(self))]
    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        Self::check_key(key)?;
        let cookie = Cookie::build((key.to_string(), "")).path("/");
        self.jar = std::mem::take(&mut self.jar).remove(cookie);
        Ok(())
    }

    fn name(&self) -> &str {
        "cookie"
    }
}
