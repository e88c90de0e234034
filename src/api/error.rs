//! Error envelope for HTTP handlers.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::warn;

use crate::assistant::AssistantError;
use crate::credentials::services::CredentialVaultError;
use crate::platform::ports::ManagementApiError;

/// Errors answered by HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or rejected credentials.
    #[error("{0}")]
    Unauthorized(String),

    /// The request body or query was malformed.
    #[error("{0}")]
    BadRequest(String),

    /// The request was well formed but could not be honoured.
    #[error("{0}")]
    Unprocessable(String),

    /// An upstream service answered with an error.
    #[error("{message}")]
    Upstream {
        /// Status to relay.
        status: StatusCode,
        /// Upstream message.
        message: String,
    },

    /// A required collaborator is not configured.
    #[error("{0}")]
    Unavailable(String),

    /// Anything else.
    #[error("{0}")]
    Internal(String),
}

/// Result type for HTTP handlers.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Returns the status this error is answered with.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Upstream { status, .. } => *status,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            warn!(status = status.as_u16(), error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<CredentialVaultError> for ApiError {
    fn from(err: CredentialVaultError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<ManagementApiError> for ApiError {
    fn from(err: ManagementApiError) -> Self {
        match err {
            ManagementApiError::Unauthorized(message) => Self::Unauthorized(message),
            ManagementApiError::Status { status, message } => Self::Upstream {
                status: StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                message,
            },
            other @ (ManagementApiError::ProjectRefTooShort(_)
            | ManagementApiError::Decode(_)
            | ManagementApiError::Transport(_)) => Self::Upstream {
                status: StatusCode::BAD_GATEWAY,
                message: other.to_string(),
            },
        }
    }
}

impl From<AssistantError> for ApiError {
    fn from(err: AssistantError) -> Self {
        match err {
            AssistantError::NotConnected => Self::Unavailable(err.to_string()),
            AssistantError::Connect(_) | AssistantError::Schema(_) => Self::Upstream {
                status: StatusCode::BAD_GATEWAY,
                message: err.to_string(),
            },
            AssistantError::Vault(_) | AssistantError::Render { .. } => {
                Self::Internal(err.to_string())
            }
        }
    }
}
