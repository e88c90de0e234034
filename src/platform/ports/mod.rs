//! Port contracts for hosted platform access.
//!
//! Ports define infrastructure-agnostic interfaces used by the verifier,
//! provisioner, executor, and schema services.

pub mod data;
pub mod management;
pub mod oauth;

pub use data::{DataApi, DataApiConnector, DataApiError, DataApiResult};
pub use management::{ManagementApi, ManagementApiError, ManagementApiResult};
pub use oauth::{OAuthError, OAuthResult, OAuthToken, OAuthTokenExchange};
