//! Management (control-plane) API port.

use crate::credentials::domain::ManagementKey;
use crate::platform::domain::{
    ManagementRequest, ManagementResponse, NewProjectRequest, Organization, ProjectApiKeys,
    ProjectRef, ProjectStatusReport, Region,
};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Result type for management API operations.
pub type ManagementApiResult<T> = Result<T, ManagementApiError>;

/// Control-plane operations against the hosted platform.
///
/// Every call carries the management key explicitly; implementations hold
/// no credentials of their own.
#[async_trait]
pub trait ManagementApi: Send + Sync {
    /// Lists organizations visible to the key.
    async fn list_organizations(
        &self,
        key: &ManagementKey,
    ) -> ManagementApiResult<Vec<Organization>>;

    /// Lists regions projects can be created in.
    async fn list_regions(&self, key: &ManagementKey) -> ManagementApiResult<Vec<Region>>;

    /// Creates a project and returns its reference.
    async fn create_project(
        &self,
        key: &ManagementKey,
        request: &NewProjectRequest,
    ) -> ManagementApiResult<ProjectRef>;

    /// Fetches the current provisioning status of a project.
    async fn project_status(
        &self,
        key: &ManagementKey,
        project_ref: &ProjectRef,
    ) -> ManagementApiResult<ProjectStatusReport>;

    /// Fetches the anon and service role keys of a project.
    async fn project_api_keys(
        &self,
        key: &ManagementKey,
        project_ref: &ProjectRef,
    ) -> ManagementApiResult<ProjectApiKeys>;

    /// Runs SQL against a project's database.
    async fn run_sql(
        &self,
        key: &ManagementKey,
        project_ref: &ProjectRef,
        sql: &str,
    ) -> ManagementApiResult<Value>;

    /// Forwards an arbitrary request and returns the upstream answer,
    /// whatever its status.
    async fn forward(
        &self,
        key: &ManagementKey,
        request: &ManagementRequest,
    ) -> ManagementApiResult<ManagementResponse>;
}

/// Errors returned by management API adapters.
#[derive(Debug, Clone, Error)]
pub enum ManagementApiError {
    /// The key was rejected.
    #[error("management API rejected the key: {0}")]
    Unauthorized(String),

    /// The platform refused a project reference as too short.
    #[error("project reference rejected as too short: {0}")]
    ProjectRefTooShort(String),

    /// Any other non-success status.
    #[error("management API returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Upstream message.
        message: String,
    },

    /// The response body did not have the expected shape.
    #[error("unexpected management API response: {0}")]
    Decode(String),

    /// Network-level failure.
    #[error("management API transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl ManagementApiError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }

    /// Classifies a non-success response.
    #[must_use]
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let text = message.into();
        let lowered = text.to_ascii_lowercase();
        if matches!(status, 401 | 403) {
            return Self::Unauthorized(text);
        }
        let mentions_ref = lowered.contains("ref");
        let mentions_length = lowered.contains("too short") || lowered.contains("at least 20");
        if mentions_ref && mentions_length {
            return Self::ProjectRefTooShort(text);
        }
        Self::Status {
            status,
            message: text,
        }
    }

    /// Returns `true` when retrying cannot help.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::ProjectRefTooShort(_))
    }
}
