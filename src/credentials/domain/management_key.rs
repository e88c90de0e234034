//! Management API bearer token.

use super::CredentialDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque bearer token for the platform management API.
///
/// Stored independently of [`super::ConnectionConfig`]; a user may hold one
/// without the other.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ManagementKey(String);

impl ManagementKey {
    /// Creates a validated management key.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialDomainError::EmptyManagementKey`] when the value is
    /// empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, CredentialDomainError> {
        let normalized = value.into().trim().to_owned();
        if normalized.is_empty() {
            return Err(CredentialDomainError::EmptyManagementKey);
        }
        Ok(Self(normalized))
    }

    /// Exposes the token for use in an `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ManagementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ManagementKey(<redacted>)")
    }
}

impl TryFrom<String> for ManagementKey {
    type Error = CredentialDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ManagementKey> for String {
    fn from(value: ManagementKey) -> Self {
        value.0
    }
}
