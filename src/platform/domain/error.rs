//! Error types for platform domain validation.

use thiserror::Error;

/// Errors returned while constructing platform domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlatformDomainError {
    /// The project reference is empty after trimming.
    #[error("project reference must not be empty")]
    EmptyProjectRef,

    /// The project reference is shorter than the platform ever assigns.
    #[error("project reference '{value}' is shorter than {min} characters")]
    ProjectRefTooShort {
        /// Rejected value.
        value: String,
        /// Minimum accepted length.
        min: usize,
    },

    /// The project reference contains characters outside `[a-z0-9]`.
    #[error("project reference '{0}' must be lowercase alphanumeric")]
    InvalidProjectRef(String),

    /// A project name is empty after trimming.
    #[error("project name must not be empty")]
    EmptyProjectName,

    /// An organization id is empty after trimming.
    #[error("organization id must not be empty")]
    EmptyOrganizationId,

    /// A region is empty after trimming.
    #[error("region must not be empty")]
    EmptyRegion,

    /// The database password is too short for the platform.
    #[error("database password must be at least {0} characters")]
    WeakDatabasePassword(usize),

    /// A table or function identifier is empty or malformed.
    #[error("invalid identifier '{0}'")]
    InvalidIdentifier(String),

    /// A management proxy path does not start with `/`.
    #[error("management path '{0}' must start with '/'")]
    InvalidManagementPath(String),

    /// The HTTP method is not supported by the proxy.
    #[error("unsupported HTTP method '{0}'")]
    UnsupportedMethod(String),
}
