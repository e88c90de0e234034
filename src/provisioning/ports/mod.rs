//! Port contracts for provisioning.

pub mod progress;

pub use progress::ProgressSink;
