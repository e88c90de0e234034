//! Errors raised by the provisioning flow.

use thiserror::Error;

use crate::credentials::{domain::CredentialDomainError, services::CredentialVaultError};
use crate::platform::{
    domain::{PlatformDomainError, ProjectStatus},
    ports::ManagementApiError,
};

/// Service-level errors for provisioning.
#[derive(Debug, Error)]
pub enum ProvisioningError {
    /// No management key is stored.
    #[error("no management key is configured")]
    NoManagementKey,

    /// The key can see no organization.
    #[error("no organization is available for this management key")]
    NoOrganization,

    /// The requested organization is not visible to the key.
    #[error("organization {0} was not found")]
    OrganizationNotFound(String),

    /// The request failed validation.
    #[error(transparent)]
    InvalidRequest(#[from] PlatformDomainError),

    /// A management API call failed.
    #[error(transparent)]
    Management(#[from] ManagementApiError),

    /// The platform rejected the project reference as too short; polling
    /// cannot succeed.
    #[error("project reference rejected: {0}")]
    ProjectRefTooShort(String),

    /// The project reached a failure status.
    #[error("project provisioning failed with status {status}")]
    ProvisioningFailed {
        /// Terminal status reported.
        status: ProjectStatus,
    },

    /// The attempt ceiling was reached without a terminal status.
    #[error("project was not ready after {attempts} status checks")]
    TimedOut {
        /// Polls made.
        attempts: u32,
    },

    /// The caller cancelled the flow.
    #[error("provisioning was cancelled")]
    Cancelled,

    /// The issued keys did not form a valid connection.
    #[error("platform returned an unusable connection: {0}")]
    InvalidConnection(#[from] CredentialDomainError),

    /// Credential persistence failed.
    #[error(transparent)]
    Vault(#[from] CredentialVaultError),
}

/// Result type for provisioning operations.
pub type ProvisioningResult<T> = Result<T, ProvisioningError>;
