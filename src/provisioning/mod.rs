//! Project provisioning.
//!
//! Creates a hosted project, polls its status until it settles, stores the
//! resulting connection, and applies the baseline schema. Progress is
//! reported through a [`ports::ProgressSink`] so callers can forward it to
//! logs, a channel, or a test recorder.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
