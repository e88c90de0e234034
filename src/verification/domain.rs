//! Probe definitions and verification outcomes.

use serde::Serialize;
use std::fmt;

use crate::platform::{
    domain::RemoteErrorCode,
    ports::{DataApiError, DataApiResult},
};

/// Sentinel table selected by the second probe.
pub const SENTINEL_TABLE: &str = "_supabridge_connection_probe";

/// Table name guaranteed not to exist, selected by the last probe.
pub const NONEXISTENT_TABLE: &str = "_supabridge_nonexistent_table";

/// One request used to test a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Probe {
    /// Calls the `version` procedure.
    VersionRpc,
    /// Selects from the sentinel table.
    SentinelTable,
    /// Selects from a table that cannot exist.
    NonexistentTable,
}

impl Probe {
    /// Probes in the order they are attempted.
    pub const ORDERED: [Self; 3] = [Self::VersionRpc, Self::SentinelTable, Self::NonexistentTable];

    /// Returns `true` when `answer` proves the request reached the engine.
    #[must_use]
    pub fn accepts(self, answer: &DataApiResult<serde_json::Value>) -> bool {
        let Err(error) = answer else {
            return true;
        };
        match self {
            Self::VersionRpc => remote_code_is(error, &[RemoteErrorCode::UndefinedFunction]),
            Self::SentinelTable | Self::NonexistentTable => remote_code_is(
                error,
                &[RemoteErrorCode::NoRows, RemoteErrorCode::UndefinedTable],
            ),
        }
    }
}

fn remote_code_is(error: &DataApiError, accepted: &[RemoteErrorCode]) -> bool {
    error
        .remote_code()
        .is_some_and(|code| accepted.contains(code))
}

impl fmt::Display for Probe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VersionRpc => f.write_str("rpc version"),
            Self::SentinelTable => write!(f, "select {SENTINEL_TABLE}"),
            Self::NonexistentTable => write!(f, "select {NONEXISTENT_TABLE}"),
        }
    }
}

/// Result of verifying a connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Verification {
    /// A probe was answered by the query engine.
    Verified {
        /// The probe that succeeded.
        probe: Probe,
    },
    /// No probe succeeded.
    Unverified {
        /// Failure reported by the last probe attempted.
        reason: String,
    },
}

impl Verification {
    /// Returns `true` for [`Verification::Verified`].
    #[must_use]
    pub const fn is_verified(&self) -> bool {
        matches!(self, Self::Verified { .. })
    }
}
