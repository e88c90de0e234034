//! Pass-through requests for the management API proxy.

use super::PlatformDomainError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// HTTP methods the proxy forwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// `GET`
    #[default]
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
}

impl HttpMethod {
    /// Returns the method token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl TryFrom<&str> for HttpMethod {
    type Error = PlatformDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "" | "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            _ => Err(PlatformDomainError::UnsupportedMethod(value.to_owned())),
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request forwarded verbatim to the management API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagementRequest {
    path: String,
    method: HttpMethod,
    body: Option<Value>,
}

impl ManagementRequest {
    /// Creates a validated pass-through request.
    ///
    /// The path must be relative to the API base (start with `/`) and may
    /// not climb out of it.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformDomainError::InvalidManagementPath`] otherwise.
    pub fn new(
        path: impl Into<String>,
        method: HttpMethod,
        body: Option<Value>,
    ) -> Result<Self, PlatformDomainError> {
        let raw = path.into();
        let normalized = raw.trim().to_owned();
        let is_relative = normalized.starts_with('/') && !normalized.starts_with("//");
        if !is_relative || normalized.contains("..") || normalized.contains("://") {
            return Err(PlatformDomainError::InvalidManagementPath(raw));
        }
        Ok(Self {
            path: normalized,
            method,
            body,
        })
    }

    /// Returns the request path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the HTTP method.
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    /// Returns the JSON body, if any.
    #[must_use]
    pub const fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }
}

/// Upstream answer to a forwarded request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagementResponse {
    /// HTTP status code.
    pub status: u16,
    /// Decoded body; plain-text bodies are wrapped as JSON strings.
    pub body: Value,
}

impl ManagementResponse {
    /// Returns `true` for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Extracts a human-readable error message from the body.
    ///
    /// Looks at `message`, `error`, and `msg` fields in that order, then at a
    /// bare string body, then falls back to the status code.
    #[must_use]
    pub fn error_message(&self) -> String {
        ["message", "error", "msg"]
            .iter()
            .find_map(|field| self.body.get(field).and_then(Value::as_str))
            .or_else(|| self.body.as_str())
            .filter(|message| !message.trim().is_empty())
            .map_or_else(
                || format!("management API request failed with status {}", self.status),
                ToOwned::to_owned,
            )
    }
}
