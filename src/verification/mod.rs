//! Connection verification for stored project credentials.
//!
//! A freshly provisioned database has no user schema, so "not found"
//! answers from the query engine count as proof that the URL and key
//! reached it. The verifier walks an ordered list of probes and stops at
//! the first one whose answer is acceptable.

mod domain;
mod service;

pub use domain::{NONEXISTENT_TABLE, Probe, SENTINEL_TABLE, Verification};
pub use service::ConnectionVerifier;

#[cfg(test)]
mod tests;
