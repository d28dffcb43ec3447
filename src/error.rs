use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::oauth::{BackendError, HandshakeError};

/// Error type for the JSON API routes.
///
/// Browser routes never surface these; every handshake failure there ends in
/// a redirect instead.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    /// A required server-side credential is missing.
    #[error("{0}")]
    Configuration(String),

    #[error("Backend error ({status}): {message}")]
    UpstreamWithStatus { status: u16, message: String },

    #[error("Backend error: {0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// `{ success: false, error, type }`
#[derive(Debug, Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    r#type: &'static str,
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::UpstreamWithStatus { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Configuration(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "authentication_error",
            Self::NotFound(_) => "not_found_error",
            Self::BadRequest(_) => "invalid_request_error",
            Self::Configuration(_) => "configuration_error",
            Self::Upstream(_) | Self::UpstreamWithStatus { .. } => "api_error",
            Self::Internal(_) => "server_error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
            r#type: self.error_type(),
        };
        (status, axum::Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(err: JsonRejection) -> Self {
        Self::BadRequest(err.body_text())
    }
}

impl From<BackendError> for AppError {
    fn from(err: BackendError) -> Self {
        tracing::error!(error = %err, "Backend error");
        match err {
            BackendError::Rejected { status, message } => {
                Self::UpstreamWithStatus { status, message }
            }
            other => Self::Upstream(other.to_string()),
        }
    }
}

impl From<HandshakeError> for AppError {
    fn from(err: HandshakeError) -> Self {
        match err {
            HandshakeError::SessionMissing { .. } => {
                Self::Unauthorized("Session required".to_string())
            }
            HandshakeError::Configuration(provider) => {
                tracing::error!(%provider, "OAuth client id is not configured");
                Self::Configuration(format!(
                    "{} OAuth is not configured on the server",
                    provider.display_name()
                ))
            }
            HandshakeError::ClientRequest(message) => Self::BadRequest(message),
            HandshakeError::Backend(e) => e.into(),
            HandshakeError::Storage(e) => Self::Internal(e.to_string()),
            other @ (HandshakeError::ProviderDenied(_)
            | HandshakeError::MissingParams
            | HandshakeError::InvalidState) => Self::BadRequest(other.user_message()),
        }
    }
}
