//! Data (per-project REST) API port.

use crate::credentials::domain::ConnectionConfig;
use crate::platform::domain::{Filter, RemoteError, RemoteErrorCode, SelectQuery, TableTarget};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Result type for data API operations.
pub type DataApiResult<T> = Result<T, DataApiError>;

/// Operations against one project's data API.
#[async_trait]
pub trait DataApi: Send + Sync {
    /// Calls a remote procedure with named JSON arguments.
    async fn rpc(&self, function: &str, args: &Value) -> DataApiResult<Value>;

    /// Reads rows.
    async fn select(&self, query: &SelectQuery) -> DataApiResult<Value>;

    /// Inserts one row (object) or many (array).
    async fn insert(
        &self,
        target: &TableTarget,
        rows: &Value,
        returning: bool,
    ) -> DataApiResult<Value>;

    /// Updates rows matching `filter`.
    async fn update(
        &self,
        target: &TableTarget,
        filter: &Filter,
        data: &Value,
        returning: bool,
    ) -> DataApiResult<Value>;

    /// Deletes rows matching `filter`.
    async fn delete(
        &self,
        target: &TableTarget,
        filter: &Filter,
        returning: bool,
    ) -> DataApiResult<Value>;

    /// Runs raw SQL through the generic SQL endpoint.
    async fn sql(&self, query: &str) -> DataApiResult<Value>;
}

/// Builds data API handles from stored connection credentials.
///
/// Callers own the returned handle; connectors keep no per-project cache.
pub trait DataApiConnector: Send + Sync {
    /// Creates a handle for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`DataApiError::Transport`] when the client cannot be built.
    fn connect(&self, config: &ConnectionConfig) -> DataApiResult<Arc<dyn DataApi>>;
}

/// Errors returned by data API adapters.
#[derive(Debug, Clone, Error)]
pub enum DataApiError {
    /// The query engine answered with an error body.
    #[error("data API error: {0}")]
    Remote(RemoteError),

    /// The request was malformed before it was sent.
    #[error("invalid data API request: {0}")]
    InvalidRequest(String),

    /// The response body could not be decoded.
    #[error("unexpected data API response: {0}")]
    Decode(String),

    /// Network-level failure (DNS, TLS, connection refused).
    #[error("data API transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl DataApiError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }

    /// Returns the classified remote code, when the engine answered.
    #[must_use]
    pub const fn remote_code(&self) -> Option<&RemoteErrorCode> {
        match self {
            Self::Remote(remote) => Some(remote.code()),
            Self::InvalidRequest(_) | Self::Decode(_) | Self::Transport(_) => None,
        }
    }
}

impl From<RemoteError> for DataApiError {
    fn from(value: RemoteError) -> Self {
        Self::Remote(value)
    }
}
