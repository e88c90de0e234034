//! Supabridge: hosted Postgres access for coding assistants.
//!
//! This crate lets an assistant connect to, provision, and operate a
//! user's hosted Supabase project. It stores credentials, verifies
//! connections, creates projects and polls them until they are healthy,
//! and executes validated database operations on the assistant's behalf.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture principles:
//!
//! - **Domain**: Pure types and validation with no infrastructure dependencies
//! - **Ports**: Async trait interfaces for external collaborators
//! - **Adapters**: Concrete implementations of ports (HTTP, files, fakes)
//! - **Services**: Orchestration over ports
//!
//! # Modules
//!
//! - [`credentials`]: Credential persistence
//! - [`platform`]: Management, data, and OAuth API ports
//! - [`verification`]: Connection probing
//! - [`provisioning`]: Project creation and status polling
//! - [`executor`]: Structured operations and the raw SQL denylist
//! - [`schema`]: Table and column introspection
//! - [`assistant`]: Prompt context and action dispatch
//! - [`api`]: HTTP routes

pub mod api;
pub mod assistant;
pub mod config;
pub mod credentials;
pub mod executor;
pub mod platform;
pub mod provisioning;
pub mod schema;
pub mod telemetry;
pub mod verification;
