//! `reqwest`-backed adapters for the management, data, and OAuth APIs.

pub(crate) mod body;
mod data;
mod management;
mod oauth;

pub use data::{HttpDataApi, HttpDataApiConnector};
pub use management::{DEFAULT_MANAGEMENT_API_URL, HttpManagementApi};
pub use oauth::HttpOAuthClient;

use reqwest::Client;

/// User agent sent with every outbound request.
const USER_AGENT: &str = concat!("supabridge/", env!("CARGO_PKG_VERSION"));

/// Builds the shared HTTP client.
///
/// # Errors
///
/// Returns the underlying `reqwest` error when TLS initialisation fails.
pub fn build_client() -> Result<Client, reqwest::Error> {
    Client::builder().user_agent(USER_AGENT).build()
}
