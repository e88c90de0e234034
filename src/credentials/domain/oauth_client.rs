//! Cached OAuth client credentials.

use super::CredentialDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// OAuth application credentials used to start the authorisation flow.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthClientCredentials {
    client_id: Uuid,
    client_secret: String,
}

impl OAuthClientCredentials {
    /// Validates raw client credentials.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialDomainError::InvalidOAuthClientId`] when the id is
    /// not a UUID or [`CredentialDomainError::EmptyOAuthClientSecret`] when
    /// the secret is blank.
    pub fn new(
        client_id: &str,
        client_secret: impl Into<String>,
    ) -> Result<Self, CredentialDomainError> {
        let parsed_id = Uuid::parse_str(client_id.trim())
            .map_err(|_| CredentialDomainError::InvalidOAuthClientId(client_id.to_owned()))?;
        let secret = client_secret.into().trim().to_owned();
        if secret.is_empty() {
            return Err(CredentialDomainError::EmptyOAuthClientSecret);
        }
        Ok(Self {
            client_id: parsed_id,
            client_secret: secret,
        })
    }

    /// Returns the client id.
    #[must_use]
    pub const fn client_id(&self) -> Uuid {
        self.client_id
    }

    /// Exposes the client secret for the token exchange.
    #[must_use]
    pub fn expose_secret(&self) -> &str {
        &self.client_secret
    }
}

impl fmt::Debug for OAuthClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}
