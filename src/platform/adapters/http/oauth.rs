//! HTTP adapter for the OAuth token endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::body::decode_body;
use crate::credentials::domain::{ManagementKey, OAuthClientCredentials};
use crate::platform::{
    domain::ManagementResponse,
    ports::{OAuthError, OAuthResult, OAuthToken, OAuthTokenExchange},
};

/// Token endpoint client.
#[derive(Debug, Clone)]
pub struct HttpOAuthClient {
    client: Client,
    token_url: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<u64>,
}

impl HttpOAuthClient {
    /// Creates a client posting to `token_url`.
    #[must_use]
    pub fn new(client: Client, token_url: impl Into<String>) -> Self {
        Self {
            client,
            token_url: token_url.into(),
        }
    }
}

#[async_trait]
impl OAuthTokenExchange for HttpOAuthClient {
    async fn exchange_code(
        &self,
        client: &OAuthClientCredentials,
        code: &str,
        redirect_uri: &str,
    ) -> OAuthResult<OAuthToken> {
        let form = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri),
        ];
        let response = self
            .client
            .post(&self.token_url)
            .basic_auth(client.client_id(), Some(client.expose_secret()))
            .form(&form)
            .send()
            .await
            .map_err(OAuthError::transport)?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(OAuthError::transport)?;
        debug!(status, "OAuth token exchange answered");

        if !(200..300).contains(&status) {
            let upstream = ManagementResponse {
                status,
                body: decode_body(&text),
            };
            return Err(OAuthError::Rejected {
                status,
                message: upstream.error_message(),
            });
        }

        let token: TokenResponse =
            serde_json::from_str(&text).map_err(|err| OAuthError::Decode(err.to_string()))?;
        let access_token = ManagementKey::new(token.access_token)
            .map_err(|err| OAuthError::Decode(err.to_string()))?;
        Ok(OAuthToken {
            access_token,
            refresh_token: token.refresh_token,
            expires_in: token.expires_in,
        })
    }
}
