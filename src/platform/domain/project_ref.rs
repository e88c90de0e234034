//! Validated project reference.

use super::PlatformDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shortest reference the platform assigns.
pub const MIN_PROJECT_REF_LENGTH: usize = 20;

/// Platform-assigned project identifier (for example `abcdefghijklmnopqrst`).
///
/// Obviously malformed references are rejected up front so callers never
/// poll for a project that cannot exist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectRef(String);

impl ProjectRef {
    /// Creates a validated project reference.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformDomainError::EmptyProjectRef`] for blank input,
    /// [`PlatformDomainError::ProjectRefTooShort`] for references under
    /// [`MIN_PROJECT_REF_LENGTH`] characters, or
    /// [`PlatformDomainError::InvalidProjectRef`] for characters outside
    /// `[a-z0-9]`.
    pub fn new(value: impl Into<String>) -> Result<Self, PlatformDomainError> {
        let raw = value.into();
        let normalized = raw.trim().to_owned();
        if normalized.is_empty() {
            return Err(PlatformDomainError::EmptyProjectRef);
        }
        if normalized.len() < MIN_PROJECT_REF_LENGTH {
            return Err(PlatformDomainError::ProjectRefTooShort {
                value: normalized,
                min: MIN_PROJECT_REF_LENGTH,
            });
        }
        let is_valid = normalized
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
        if !is_valid {
            return Err(PlatformDomainError::InvalidProjectRef(raw));
        }
        Ok(Self(normalized))
    }

    /// Returns the reference as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the project's public origin.
    #[must_use]
    pub fn project_url(&self) -> String {
        format!("https://{}.supabase.co", self.0)
    }
}

impl TryFrom<String> for ProjectRef {
    type Error = PlatformDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProjectRef> for String {
    fn from(value: ProjectRef) -> Self {
        value.0
    }
}

impl AsRef<str> for ProjectRef {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ProjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
