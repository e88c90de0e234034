//! Hosted platform control-plane and data-plane access.
//!
//! The management API creates and inspects projects; the data API reaches
//! a single project's REST endpoint. Both are expressed as ports so the
//! verifier, provisioner, executor, and schema inspector can run against
//! scripted fakes in tests.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]

pub mod adapters;
pub mod domain;
pub mod ports;

#[cfg(test)]
mod tests;
