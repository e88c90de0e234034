//! Project provisioning status reported by the management API.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a hosted project.
///
/// Parsing is total: statuses this crate does not model are kept verbatim in
/// [`ProjectStatus::Other`]. Any status ending in `_FAILED` is treated as a
/// failure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProjectStatus {
    /// Creation was accepted but no build has started.
    Requested,
    /// Infrastructure is being built.
    Building,
    /// The database is being provisioned.
    Provisioning,
    /// Services are starting.
    ComingUp,
    /// The project is up and healthy.
    ActiveHealthy,
    /// The infrastructure build failed.
    BuildingFailed,
    /// Database provisioning failed.
    ProvisioningFailed,
    /// The platform reported a provisioning error.
    ErrorProvisioning,
    /// Any other status string.
    Other(String),
}

impl ProjectStatus {
    /// Returns the canonical upper-snake representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Requested => "REQUESTED",
            Self::Building => "BUILDING",
            Self::Provisioning => "PROVISIONING",
            Self::ComingUp => "COMING_UP",
            Self::ActiveHealthy => "ACTIVE_HEALTHY",
            Self::BuildingFailed => "BUILDING_FAILED",
            Self::ProvisioningFailed => "PROVISIONING_FAILED",
            Self::ErrorProvisioning => "ERROR_PROVISIONING",
            Self::Other(value) => value,
        }
    }

    /// Returns `true` when the project is ready for use.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::ActiveHealthy)
    }

    /// Returns `true` when provisioning definitely failed.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        match self {
            Self::BuildingFailed | Self::ProvisioningFailed | Self::ErrorProvisioning => true,
            Self::Other(value) => value.ends_with("_FAILED"),
            _ => false,
        }
    }

    /// Returns `true` when polling should stop.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.is_success() || self.is_failure()
    }

    /// Returns a human-readable progress message for this status.
    #[must_use]
    pub fn progress_message(&self) -> String {
        match self {
            Self::Requested => "Project creation requested".to_owned(),
            Self::Building => "Building project infrastructure".to_owned(),
            Self::Provisioning => "Provisioning database".to_owned(),
            Self::ComingUp => "Starting project services".to_owned(),
            Self::ActiveHealthy => "Project is ready".to_owned(),
            Self::BuildingFailed => "Project infrastructure build failed".to_owned(),
            Self::ProvisioningFailed => "Database provisioning failed".to_owned(),
            Self::ErrorProvisioning => "The platform reported a provisioning error".to_owned(),
            Self::Other(value) => format!("Waiting for project (status: {value})"),
        }
    }
}

impl From<&str> for ProjectStatus {
    fn from(value: &str) -> Self {
        let normalized = value.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "REQUESTED" => Self::Requested,
            "BUILDING" => Self::Building,
            "PROVISIONING" => Self::Provisioning,
            "COMING_UP" => Self::ComingUp,
            "ACTIVE_HEALTHY" => Self::ActiveHealthy,
            "BUILDING_FAILED" => Self::BuildingFailed,
            "PROVISIONING_FAILED" => Self::ProvisioningFailed,
            "ERROR_PROVISIONING" => Self::ErrorProvisioning,
            _ => Self::Other(normalized),
        }
    }
}

impl From<String> for ProjectStatus {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<ProjectStatus> for String {
    fn from(value: ProjectStatus) -> Self {
        value.as_str().to_owned()
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
