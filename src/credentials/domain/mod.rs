//! Domain model for stored credentials.
//!
//! All values are validated on construction and redact secrets from their
//! `Debug` output. Nothing in here touches storage.

mod connection;
mod error;
mod management_key;
mod oauth_client;
mod obfuscation;

pub use connection::{ApiKey, ConnectionConfig, ProjectUrl};
pub use error::CredentialDomainError;
pub use management_key::ManagementKey;
pub use oauth_client::OAuthClientCredentials;
pub use obfuscation::Obfuscator;
