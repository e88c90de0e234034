//! OAuth authorisation-code exchange port.

use crate::credentials::domain::{ManagementKey, OAuthClientCredentials};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for OAuth operations.
pub type OAuthResult<T> = Result<T, OAuthError>;

/// Tokens issued by the OAuth token endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthToken {
    /// Access token, usable as a management key.
    pub access_token: ManagementKey,
    /// Refresh token, when issued.
    pub refresh_token: Option<String>,
    /// Lifetime of the access token in seconds.
    pub expires_in: Option<u64>,
}

/// Exchanges an authorisation code for tokens.
#[async_trait]
pub trait OAuthTokenExchange: Send + Sync {
    /// Exchanges `code` issued to `client` for an access token.
    async fn exchange_code(
        &self,
        client: &OAuthClientCredentials,
        code: &str,
        redirect_uri: &str,
    ) -> OAuthResult<OAuthToken>;
}

/// Errors returned by OAuth adapters.
#[derive(Debug, Clone, Error)]
pub enum OAuthError {
    /// The token endpoint refused the exchange.
    #[error("token exchange rejected ({status}): {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Upstream message.
        message: String,
    },

    /// The token response was malformed.
    #[error("unexpected token response: {0}")]
    Decode(String),

    /// Network-level failure.
    #[error("token endpoint transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl OAuthError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
