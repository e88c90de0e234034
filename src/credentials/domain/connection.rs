//! Project connection credentials.

use super::CredentialDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Host suffixes accepted for hosted projects.
const HOSTED_DOMAINS: [&str; 2] = [".supabase.co", ".supabase.in"];

/// Validated origin of a hosted project, such as
/// `https://abcdefghijklmnopqrst.supabase.co`.
///
/// # Examples
///
/// ```
/// use supabridge::credentials::domain::ProjectUrl;
///
/// let url = ProjectUrl::new("https://abcdefghijklmnopqrst.supabase.co/").expect("valid url");
/// assert_eq!(url.as_str(), "https://abcdefghijklmnopqrst.supabase.co");
/// assert_eq!(url.project_ref(), Some("abcdefghijklmnopqrst"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectUrl(String);

impl ProjectUrl {
    /// Creates a validated project URL.
    ///
    /// Surrounding whitespace and trailing slashes are removed.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialDomainError`] when the value is empty, does not
    /// parse, carries a path or query, is not `https`, or is hosted outside
    /// the platform domains.
    pub fn new(value: impl Into<String>) -> Result<Self, CredentialDomainError> {
        let raw = value.into();
        let normalized = raw.trim().trim_end_matches('/').to_owned();
        if normalized.is_empty() {
            return Err(CredentialDomainError::EmptyProjectUrl);
        }

        let parsed = Url::parse(&normalized)
            .map_err(|_| CredentialDomainError::InvalidProjectUrl(raw.clone()))?;
        if parsed.path() != "/" || parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(CredentialDomainError::InvalidProjectUrl(raw));
        }
        if parsed.scheme() != "https" {
            return Err(CredentialDomainError::InsecureProjectUrl(raw));
        }

        let host = parsed.host_str().unwrap_or_default();
        if !HOSTED_DOMAINS.iter().any(|domain| host.ends_with(domain)) {
            return Err(CredentialDomainError::ForeignProjectHost(raw));
        }

        Ok(Self(normalized))
    }

    /// Returns the project origin without a trailing slash.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the project reference encoded in the first host label.
    #[must_use]
    pub fn project_ref(&self) -> Option<&str> {
        self.0
            .strip_prefix("https://")
            .and_then(|rest| rest.split('.').next())
            .filter(|label| !label.is_empty())
    }

    /// Returns the base URL of the project's REST data API.
    #[must_use]
    pub fn rest_url(&self) -> String {
        format!("{}/rest/v1", self.0)
    }
}

impl TryFrom<String> for ProjectUrl {
    type Error = CredentialDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProjectUrl> for String {
    fn from(value: ProjectUrl) -> Self {
        value.0
    }
}

impl AsRef<str> for ProjectUrl {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ProjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Data API key (anon or service role) for a hosted project.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ApiKey(String);

impl ApiKey {
    /// Creates a validated API key.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialDomainError::EmptyApiKey`] when the value is empty
    /// after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, CredentialDomainError> {
        let normalized = value.into().trim().to_owned();
        if normalized.is_empty() {
            return Err(CredentialDomainError::EmptyApiKey);
        }
        Ok(Self(normalized))
    }

    /// Exposes the secret for use in request headers.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

impl TryFrom<String> for ApiKey {
    type Error = CredentialDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ApiKey> for String {
    fn from(value: ApiKey) -> Self {
        value.0
    }
}

/// Project URL and API key pair used to reach a project's data API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionConfig {
    project_url: ProjectUrl,
    api_key: ApiKey,
}

impl ConnectionConfig {
    /// Creates a connection configuration from validated parts.
    #[must_use]
    pub const fn new(project_url: ProjectUrl, api_key: ApiKey) -> Self {
        Self {
            project_url,
            api_key,
        }
    }

    /// Validates raw strings into a connection configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialDomainError`] when either value fails validation.
    pub fn parse(
        project_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, CredentialDomainError> {
        Ok(Self::new(ProjectUrl::new(project_url)?, ApiKey::new(api_key)?))
    }

    /// Returns the project URL.
    #[must_use]
    pub const fn project_url(&self) -> &ProjectUrl {
        &self.project_url
    }

    /// Returns the API key.
    #[must_use]
    pub const fn api_key(&self) -> &ApiKey {
        &self.api_key
    }
}
