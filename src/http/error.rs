//! Protocol error responses.
//!
//! Every rejection leaves the broker as a JSON body of the form
//! `{"error": ..., "description": ...}` with a status reflecting the failure
//! class.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ConfigError;
use crate::http::middleware::version::HEADER_API_VERSION;

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// HTTP reason phrase of the status.
    pub error: String,
    pub description: String,
}

impl ErrorBody {
    /// Body using the reason phrase of `status` as the error code.
    pub fn for_status(status: StatusCode, description: impl Into<String>) -> Self {
        Self {
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            description: description.into(),
        }
    }
}

/// Errors surfaced by the request pipeline and handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("mandatory request header {} not set", HEADER_API_VERSION)]
    VersionMissing,

    #[error("requested API version is {requested} but supported API version is {supported}")]
    VersionMismatch {
        requested: String,
        supported: &'static str,
    },

    #[error("invalid or missing credentials")]
    Unauthorized,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("malformed request body: {0}")]
    MalformedRequest(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::VersionMissing | ApiError::VersionMismatch { .. } => {
                StatusCode::PRECONDITION_FAILED
            }
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Config(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody::for_status(self.status(), self.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "Request failed");
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "Request rejected");
        }

        let mut response = (status, Json(self.body())).into_response();
        if matches!(self, ApiError::Unauthorized) {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Basic realm=Restricted"),
            );
        }
        response
    }
}
