//! Domain model for project provisioning.

mod bootstrap;
mod policy;
mod progress;

pub use bootstrap::{BootstrapFailure, BootstrapReport, BootstrapStep, bootstrap_steps};
#[cfg(test)]
pub(crate) use bootstrap::split_steps;
pub use policy::{BackoffPolicy, PollPolicy};
pub use progress::{ProgressEvent, ProgressStage};
