//! Classified errors returned by a project's data API.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Classification of data API error codes.
///
/// The first three variants are what a freshly provisioned database answers
/// to probes against objects that do not exist yet; they prove the request
/// reached the query engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteErrorCode {
    /// The called procedure does not exist (`PGRST202`, `42883`).
    UndefinedFunction,
    /// The relation or its schema is not reachable (`42P01`, `PGRST205`,
    /// `PGRST106`).
    UndefinedTable,
    /// A single-row request matched no rows (`PGRST116`).
    NoRows,
    /// The API key was rejected.
    InvalidApiKey,
    /// Any other code, kept verbatim.
    Other(String),
}

impl RemoteErrorCode {
    /// Classifies a raw error code, falling back to the HTTP status.
    #[must_use]
    pub fn classify(status: Option<u16>, code: Option<&str>) -> Self {
        let trimmed = code.map(str::trim).filter(|value| !value.is_empty());
        match trimmed {
            Some("PGRST202" | "42883") => Self::UndefinedFunction,
            Some("42P01" | "PGRST205" | "PGRST106") => Self::UndefinedTable,
            Some("PGRST116") => Self::NoRows,
            Some("PGRST301" | "PGRST302") => Self::InvalidApiKey,
            Some(_) | None if matches!(status, Some(401 | 403)) => Self::InvalidApiKey,
            Some(other) => Self::Other(other.to_owned()),
            None => Self::Other(status.map_or_else(|| "unknown".to_owned(), |s| s.to_string())),
        }
    }

    /// Returns `true` for the codes a database with no user schema answers
    /// with: missing function, missing table, or no rows.
    #[must_use]
    pub const fn is_expected_empty_state(&self) -> bool {
        matches!(
            self,
            Self::UndefinedFunction | Self::UndefinedTable | Self::NoRows
        )
    }
}

impl fmt::Display for RemoteErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UndefinedFunction => f.write_str("undefined_function"),
            Self::UndefinedTable => f.write_str("undefined_table"),
            Self::NoRows => f.write_str("no_rows"),
            Self::InvalidApiKey => f.write_str("invalid_api_key"),
            Self::Other(code) => f.write_str(code),
        }
    }
}

/// Error body returned by the data API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} ({code})")]
pub struct RemoteError {
    status: Option<u16>,
    code: RemoteErrorCode,
    message: String,
}

impl RemoteError {
    /// Creates a remote error, classifying the raw code.
    #[must_use]
    pub fn new(status: Option<u16>, raw_code: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: RemoteErrorCode::classify(status, raw_code),
            message: message.into(),
        }
    }

    /// Creates a remote error with an already classified code.
    #[must_use]
    pub fn with_code(status: Option<u16>, code: RemoteErrorCode, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    /// Returns the HTTP status, when one was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        self.status
    }

    /// Returns the classified code.
    #[must_use]
    pub const fn code(&self) -> &RemoteErrorCode {
        &self.code
    }

    /// Returns the error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}
