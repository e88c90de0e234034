//! Provisioning orchestration.

mod backoff;
mod error;
mod poller;
mod provisioner;

pub use backoff::retry_with_backoff;
pub use error::{ProvisioningError, ProvisioningResult};
pub use poller::StatusPoller;
pub use provisioner::{CreateProjectRequest, ProvisionedProject, ProvisioningService};
