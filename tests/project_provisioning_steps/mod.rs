//! Step definitions and world state for provisioning scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
