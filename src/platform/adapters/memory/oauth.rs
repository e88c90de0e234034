//! Scripted OAuth token exchange.

use async_trait::async_trait;
use std::sync::{Arc, PoisonError, RwLock};

use crate::credentials::domain::{ManagementKey, OAuthClientCredentials};
use crate::platform::ports::{OAuthError, OAuthResult, OAuthToken, OAuthTokenExchange};

/// Token exchange that accepts one code.
#[derive(Debug, Clone)]
pub struct ScriptedOAuthExchange {
    valid_code: String,
    access_token: ManagementKey,
    exchanged: Arc<RwLock<Vec<String>>>,
}

impl ScriptedOAuthExchange {
    /// Issues `access_token` for `valid_code` and rejects anything else.
    #[must_use]
    pub fn new(valid_code: impl Into<String>, access_token: ManagementKey) -> Self {
        Self {
            valid_code: valid_code.into(),
            access_token,
            exchanged: Arc::default(),
        }
    }

    /// Codes presented so far.
    #[must_use]
    pub fn exchanged_codes(&self) -> Vec<String> {
        self.exchanged
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl OAuthTokenExchange for ScriptedOAuthExchange {
    async fn exchange_code(
        &self,
        _client: &OAuthClientCredentials,
        code: &str,
        _redirect_uri: &str,
    ) -> OAuthResult<OAuthToken> {
        self.exchanged
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(code.to_owned());
        if code != self.valid_code {
            return Err(OAuthError::Rejected {
                status: 400,
                message: "invalid authorization code".to_owned(),
            });
        }
        Ok(OAuthToken {
            access_token: self.access_token.clone(),
            refresh_token: None,
            expires_in: Some(3600),
        })
    }
}
