//! Credential persistence for hosted project access.
//!
//! Three independent slots are kept: the project connection (URL plus data
//! API key), the management API token used for control-plane calls, and the
//! cached OAuth client credentials. The module follows hexagonal
//! architecture:
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
