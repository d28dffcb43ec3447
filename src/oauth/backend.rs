//! Client for the backend REST API.
//!
//! Only the auth-url issuance is a background call. The code exchange is a
//! full browser navigation to the backend and never passes through here.

use reqwest::StatusCode;
use serde::Serialize;
use tracing::{debug, warn};

use crate::auth::session::SessionCredential;
use crate::net::HttpClient;
use crate::oauth::AuthUrlResponse;
use crate::oauth::provider::ProviderDescriptor;

/// Errors talking to the backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a failure status or `success: false`.
    #[error("Backend rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The backend answered 2xx but the body is not what we expect.
    #[error("Malformed backend response: {0}")]
    Malformed(String),
}

#[derive(Debug, Serialize)]
struct AuthUrlRequest<'a> {
    #[serde(rename = "redirectUri")]
    redirect_uri: &'a str,
}

/// Backend REST client. Endpoints come from each provider's descriptor.
#[derive(Debug, Clone, Default)]
pub struct BackendClient {
    http: HttpClient,
}

impl BackendClient {
    pub fn new() -> Self {
        Self::with_http(HttpClient::new())
    }

    pub fn with_http(http: HttpClient) -> Self {
        Self { http }
    }

    /// `POST {auth_url_endpoint}` with the session as bearer and the
    /// descriptor's callback URL as `redirectUri`.
    ///
    /// Returns the response only when it reports success; the caller still
    /// checks that URL and state are present.
    pub async fn request_auth_url(
        &self,
        descriptor: &ProviderDescriptor,
        session: &SessionCredential,
    ) -> Result<AuthUrlResponse, BackendError> {
        let provider = descriptor.provider;
        debug!(%provider, "Requesting authorization URL from backend");

        let resp = self
            .http
            .inner()
            .post(&descriptor.auth_url_endpoint)
            .header(reqwest::header::AUTHORIZATION, session.bearer())
            .json(&AuthUrlRequest {
                redirect_uri: &descriptor.callback_url,
            })
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        let body: Option<AuthUrlResponse> = serde_json::from_str(&text).ok();

        match body {
            Some(body) if status.is_success() && body.success => Ok(body),
            Some(body) => {
                let message = body.error.unwrap_or_else(|| status_reason(status));
                warn!(%provider, status = status.as_u16(), %message, "Backend refused auth-url");
                Err(BackendError::Rejected {
                    status: status.as_u16(),
                    message,
                })
            }
            None if status.is_success() => Err(BackendError::Malformed(
                "auth-url response is not valid JSON".to_string(),
            )),
            None => {
                warn!(%provider, status = status.as_u16(), "Backend auth-url failed");
                Err(BackendError::Rejected {
                    status: status.as_u16(),
                    message: status_reason(status),
                })
            }
        }
    }
}

fn status_reason(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string()
}
