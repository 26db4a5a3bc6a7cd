//! HTTP mapping of [`Error`].
//!
//! Every failure leaves the server as `{"error": "<message>"}` with a status
//! chosen from the error variant.

use crate::errors::Error;
use axum::{
    Json,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

/// Body of every error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    /// Human-readable message
    pub error: String,
}

impl ErrorBody {
    fn response(status: StatusCode, message: impl Into<String>) -> Response {
        (
            status,
            Json(Self {
                error: message.into(),
            }),
        )
            .into_response()
    }
}

impl Error {
    /// HTTP status this error is reported with.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } | Self::InvalidAmount { .. } => StatusCode::BAD_REQUEST,
            Self::StudentNotFound { .. } | Self::SessionNotFound { .. } => StatusCode::NOT_FOUND,
            Self::Config { .. } | Self::Database(_) | Self::Io(_) | Self::EnvVar(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {self}");
        }
        ErrorBody::response(status, self.to_string())
    }
}

/// Fallback for unknown routes.
pub async fn handler404(uri: Uri) -> Response {
    ErrorBody::response(StatusCode::NOT_FOUND, format!("Invalid path: {uri}"))
}

/// Fallback for known routes called with the wrong method.
pub async fn method_not_allowed() -> Response {
    ErrorBody::response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}
