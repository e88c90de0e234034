//! Progress notifications emitted while provisioning.

use serde::Serialize;
use std::fmt;

use crate::platform::domain::ProjectStatus;

/// Phase of the provisioning flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStage {
    /// Resolving the organization to create the project in.
    ResolvingOrganization,
    /// Submitting the create-project request.
    Creating,
    /// Waiting for the project to become healthy.
    Polling,
    /// Fetching API keys and storing the connection.
    Connecting,
    /// Applying the baseline schema.
    Bootstrapping,
    /// The project is ready.
    Ready,
    /// The flow stopped with an error.
    Failed,
}

impl fmt::Display for ProgressStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::ResolvingOrganization => "resolving_organization",
            Self::Creating => "creating",
            Self::Polling => "polling",
            Self::Connecting => "connecting",
            Self::Bootstrapping => "bootstrapping",
            Self::Ready => "ready",
            Self::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// One progress notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressEvent {
    /// Flow phase.
    pub stage: ProgressStage,
    /// Human-readable message.
    pub message: String,
    /// Platform status, for polling events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
}

impl ProgressEvent {
    /// Creates an event without a platform status.
    #[must_use]
    pub fn new(stage: ProgressStage, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
            status: None,
        }
    }

    /// Creates a polling event for a newly observed status.
    #[must_use]
    pub fn status_changed(status: &ProjectStatus) -> Self {
        Self {
            stage: ProgressStage::Polling,
            message: status.progress_message(),
            status: Some(status.clone()),
        }
    }
}
