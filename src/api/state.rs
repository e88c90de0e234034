//! Shared handler state.

use mockable::{Clock, DefaultClock};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use super::oauth_states::{OAUTH_STATE_TTL, OAuthStateStore};
use crate::assistant::DatabaseAssistant;
use crate::credentials::{
    domain::OAuthClientCredentials, ports::KeyValueStore, services::CredentialVault,
};
use crate::executor::domain::SqlSanitizer;
use crate::platform::ports::{DataApiConnector, ManagementApi, OAuthTokenExchange};
use crate::verification::ConnectionVerifier;

/// Endpoints used by the OAuth flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthUrls {
    /// Platform authorisation page.
    pub authorize_url: Url,
    /// Callback registered for the OAuth application.
    pub redirect_url: String,
}

impl OAuthUrls {
    /// Builds the authorisation URL for `client` carrying `state`.
    #[must_use]
    pub fn authorization_url(&self, client: &OAuthClientCredentials, state: &str) -> Url {
        let mut url = self.authorize_url.clone();
        url.query_pairs_mut()
            .append_pair("client_id", &client.client_id().to_string())
            .append_pair("redirect_uri", &self.redirect_url)
            .append_pair("response_type", "code")
            .append_pair("state", state);
        url
    }
}

/// Collaborators shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub(crate) vault: CredentialVault<dyn KeyValueStore>,
    pub(crate) management: Arc<dyn ManagementApi>,
    pub(crate) oauth: Arc<dyn OAuthTokenExchange>,
    pub(crate) oauth_urls: OAuthUrls,
    pub(crate) verifier: ConnectionVerifier,
    pub(crate) assistant: Arc<DatabaseAssistant<dyn KeyValueStore, DefaultClock>>,
    oauth_states: Arc<OAuthStateStore>,
}

impl AppState {
    /// Wires the handler state.
    #[must_use]
    pub fn new(
        vault: CredentialVault<dyn KeyValueStore>,
        management: Arc<dyn ManagementApi>,
        oauth: Arc<dyn OAuthTokenExchange>,
        connector: Arc<dyn DataApiConnector>,
        oauth_urls: OAuthUrls,
        schema_cache_ttl: Duration,
        sanitizer: SqlSanitizer,
    ) -> Self {
        let assistant = DatabaseAssistant::new(
            vault.clone(),
            Arc::clone(&connector),
            sanitizer,
            Arc::new(DefaultClock),
            schema_cache_ttl,
        );
        Self {
            vault,
            management,
            oauth,
            oauth_urls,
            verifier: ConnectionVerifier::new(connector),
            assistant: Arc::new(assistant),
            oauth_states: Arc::new(OAuthStateStore::new(
                Arc::new(DefaultClock),
                OAUTH_STATE_TTL,
            )),
        }
    }

    /// Times OAuth state expiry with `clock`, discarding pending states.
    #[must_use]
    pub fn with_oauth_clock(mut self, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        self.oauth_states = Arc::new(OAuthStateStore::new(clock, OAUTH_STATE_TTL));
        self
    }

    /// Issues a single-use OAuth state token.
    pub(crate) fn issue_oauth_state(&self) -> String {
        self.oauth_states.issue()
    }

    /// Consumes `state`, returning whether it had been issued and is unexpired.
    pub(crate) fn redeem_oauth_state(&self, state: &str) -> bool {
        self.oauth_states.redeem(state)
    }
}
