//! Structured database operations issued by the assistant.
//!
//! Operations are validated before any network call, raw SQL passes a
//! denylist, and dispatch goes through the [`crate::platform::ports::DataApi`]
//! port. Raw SQL first goes through the `exec_sql` procedure and falls back
//! to the generic SQL endpoint only when that call fails.
//!
//! - Domain types in [`domain`]
//! - Orchestration services in [`services`]

pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;
