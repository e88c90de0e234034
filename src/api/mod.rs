//! HTTP surface.
//!
//! Exposes the management API proxy, the OAuth flow, connection setup, and
//! the assistant database endpoint as an axum router. Every failure is
//! answered with the JSON envelope `{"error": "<message>"}`.

mod error;
mod oauth_states;
mod routes;
mod state;

pub use error::{ApiError, ApiResult};
pub use oauth_states::{OAUTH_STATE_TTL, OAuthStateStore};
pub use routes::{MANAGEMENT_KEY_HEADER, router};
pub use state::{AppState, OAuthUrls};

#[cfg(test)]
mod tests;
