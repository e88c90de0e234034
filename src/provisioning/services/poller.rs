//! Fixed-interval project status polling.

use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{ProvisioningError, ProvisioningResult};
use crate::credentials::domain::ManagementKey;
use crate::platform::{
    domain::{ProjectRef, ProjectStatus, ProjectStatusReport},
    ports::ManagementApi,
};
use crate::provisioning::{
    domain::{PollPolicy, ProgressEvent},
    ports::ProgressSink,
};

/// Polls a project until it reaches a terminal status.
///
/// The first request is made immediately; later ones follow the policy's
/// interval. At most [`PollPolicy::max_attempts`] requests are made and only
/// one is ever in flight.
pub struct StatusPoller<M>
where
    M: ManagementApi + ?Sized,
{
    api: Arc<M>,
    policy: PollPolicy,
}

impl<M> StatusPoller<M>
where
    M: ManagementApi + ?Sized,
{
    /// Creates a poller.
    #[must_use]
    pub const fn new(api: Arc<M>, policy: PollPolicy) -> Self {
        Self { api, policy }
    }

    /// Returns the polling policy.
    #[must_use]
    pub const fn policy(&self) -> PollPolicy {
        self.policy
    }

    /// Polls until success, failure, timeout, or cancellation.
    ///
    /// A progress event is emitted every time the observed status changes.
    /// Transient request errors are logged and count as an attempt.
    ///
    /// # Errors
    ///
    /// - [`ProvisioningError::ProvisioningFailed`] on a failure status
    /// - [`ProvisioningError::ProjectRefTooShort`] when the platform rejects
    ///   the reference
    /// - [`ProvisioningError::TimedOut`] once the attempt ceiling is reached
    /// - [`ProvisioningError::Cancelled`] when `cancel` fires
    pub async fn poll(
        &self,
        key: &ManagementKey,
        project_ref: &ProjectRef,
        sink: &dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> ProvisioningResult<ProjectStatusReport> {
        let max_attempts = self.policy.max_attempts();
        let mut last_status: Option<ProjectStatus> = None;

        for attempt in 1..=max_attempts {
            if attempt > 1 {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => return Err(ProvisioningError::Cancelled),
                    () = tokio::time::sleep(self.policy.interval()) => {}
                }
            }
            let answer = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(ProvisioningError::Cancelled),
                answer = self.api.project_status(key, project_ref) => answer,
            };

            match answer {
                Ok(report) => {
                    debug!(%project_ref, attempt, status = %report.status, "status polled");
                    if last_status.as_ref() != Some(&report.status) {
                        sink.emit(ProgressEvent::status_changed(&report.status));
                        last_status = Some(report.status.clone());
                    }
                    if report.status.is_success() {
                        info!(%project_ref, attempt, "project is healthy");
                        return Ok(report);
                    }
                    if report.status.is_failure() {
                        warn!(%project_ref, status = %report.status, "project provisioning failed");
                        return Err(ProvisioningError::ProvisioningFailed {
                            status: report.status,
                        });
                    }
                }
                Err(err) if err.is_fatal() => {
                    warn!(%project_ref, error = %err, "status polling cannot continue");
                    return Err(ProvisioningError::ProjectRefTooShort(err.to_string()));
                }
                Err(err) => {
                    warn!(%project_ref, attempt, error = %err, "status poll failed; will retry");
                }
            }
        }

        warn!(%project_ref, attempts = max_attempts, "status polling timed out");
        Err(ProvisioningError::TimedOut {
            attempts: max_attempts,
        })
    }
}
