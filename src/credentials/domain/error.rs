//! Error types for credential validation.

use thiserror::Error;

/// Errors returned while constructing or decoding credential values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialDomainError {
    /// The project URL is empty after trimming.
    #[error("project URL must not be empty")]
    EmptyProjectUrl,

    /// The project URL could not be parsed or carries a path or query.
    #[error("project URL '{0}' is not a valid project origin")]
    InvalidProjectUrl(String),

    /// The project URL does not use `https`.
    #[error("project URL '{0}' must use https")]
    InsecureProjectUrl(String),

    /// The project URL host is outside the hosted platform domains.
    #[error("project URL '{0}' is not hosted on supabase.co")]
    ForeignProjectHost(String),

    /// The data API key is empty after trimming.
    #[error("API key must not be empty")]
    EmptyApiKey,

    /// The management token is empty after trimming.
    #[error("management key must not be empty")]
    EmptyManagementKey,

    /// The OAuth client id is not a UUID.
    #[error("OAuth client id '{0}' must be a UUID")]
    InvalidOAuthClientId(String),

    /// The OAuth client secret is empty after trimming.
    #[error("OAuth client secret must not be empty")]
    EmptyOAuthClientSecret,

    /// A stored value could not be decoded back into credentials.
    #[error("stored credential is corrupt: {0}")]
    CorruptStoredValue(String),
}
