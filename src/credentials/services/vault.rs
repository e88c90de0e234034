//! Typed credential vault over a key-value store.
//!
//! Provides [`CredentialVault`] which reads and writes the connection,
//! management key, and OAuth client slots. Each slot is independent.

use crate::credentials::{
    domain::{
        ConnectionConfig, CredentialDomainError, ManagementKey, OAuthClientCredentials, Obfuscator,
    },
    ports::{KeyValueStore, KeyValueStoreError},
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Storage key for the project connection.
pub const CONNECTION_KEY: &str = "supabase.connection";

/// Storage key for the management API token.
pub const MANAGEMENT_KEY_KEY: &str = "supabase.management_key";

/// Storage key for cached OAuth client credentials.
pub const OAUTH_CLIENT_KEY: &str = "supabase.oauth_client";

/// Service-level errors for vault operations.
#[derive(Debug, Error)]
pub enum CredentialVaultError {
    /// Stored data failed validation or decoding.
    #[error(transparent)]
    Domain(#[from] CredentialDomainError),
    /// The storage backend failed.
    #[error(transparent)]
    Store(#[from] KeyValueStoreError),
}

/// Result type for vault operations.
pub type CredentialVaultResult<T> = Result<T, CredentialVaultError>;

/// Credential vault backed by an injected key-value store.
pub struct CredentialVault<S>
where
    S: KeyValueStore + ?Sized,
{
    store: Arc<S>,
    obfuscator: Option<Obfuscator>,
}

impl<S> Clone for CredentialVault<S>
where
    S: KeyValueStore + ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            obfuscator: self.obfuscator.clone(),
        }
    }
}

impl<S> CredentialVault<S>
where
    S: KeyValueStore + ?Sized,
{
    /// Creates a vault storing plain JSON values.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self {
            store,
            obfuscator: None,
        }
    }

    /// Enables obfuscation of newly written values.
    #[must_use]
    pub fn with_obfuscator(mut self, obfuscator: Obfuscator) -> Self {
        self.obfuscator = Some(obfuscator);
        self
    }

    /// Returns the stored project connection, if any.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialVaultError`] when the store fails or the stored
    /// value no longer validates.
    pub async fn connection(&self) -> CredentialVaultResult<Option<ConnectionConfig>> {
        self.load(CONNECTION_KEY).await
    }

    /// Stores the project connection, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialVaultError::Store`] when the write fails.
    pub async fn save_connection(&self, config: &ConnectionConfig) -> CredentialVaultResult<()> {
        debug!(project_url = %config.project_url(), "saving project connection");
        self.save(CONNECTION_KEY, config).await
    }

    /// Removes the stored project connection.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialVaultError::Store`] when the removal fails.
    pub async fn clear_connection(&self) -> CredentialVaultResult<()> {
        debug!("clearing project connection");
        Ok(self.store.remove(CONNECTION_KEY).await?)
    }

    /// Returns the stored management key, if any.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialVaultError`] when the store fails or the stored
    /// value no longer validates.
    pub async fn management_key(&self) -> CredentialVaultResult<Option<ManagementKey>> {
        self.load(MANAGEMENT_KEY_KEY).await
    }

    /// Stores the management key.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialVaultError::Store`] when the write fails.
    pub async fn save_management_key(&self, key: &ManagementKey) -> CredentialVaultResult<()> {
        debug!("saving management key");
        self.save(MANAGEMENT_KEY_KEY, key).await
    }

    /// Removes the stored management key.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialVaultError::Store`] when the removal fails.
    pub async fn clear_management_key(&self) -> CredentialVaultResult<()> {
        debug!("clearing management key");
        Ok(self.store.remove(MANAGEMENT_KEY_KEY).await?)
    }

    /// Returns the cached OAuth client credentials, if any.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialVaultError`] when the store fails or the stored
    /// value no longer validates.
    pub async fn oauth_client(&self) -> CredentialVaultResult<Option<OAuthClientCredentials>> {
        self.load(OAUTH_CLIENT_KEY).await
    }

    /// Caches OAuth client credentials.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialVaultError::Store`] when the write fails.
    pub async fn save_oauth_client(
        &self,
        credentials: &OAuthClientCredentials,
    ) -> CredentialVaultResult<()> {
        debug!(client_id = %credentials.client_id(), "saving OAuth client credentials");
        self.save(OAUTH_CLIENT_KEY, credentials).await
    }

    /// Removes cached OAuth client credentials.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialVaultError::Store`] when the removal fails.
    pub async fn clear_oauth_client(&self) -> CredentialVaultResult<()> {
        Ok(self.store.remove(OAUTH_CLIENT_KEY).await?)
    }

    async fn load<T>(&self, key: &str) -> CredentialVaultResult<Option<T>>
    where
        T: DeserializeOwned,
    {
        let Some(stored) = self.store.get(key).await? else {
            return Ok(None);
        };
        let plain = match &self.obfuscator {
            Some(obfuscator) => obfuscator.reveal(&stored)?,
            None => stored,
        };
        let value = serde_json::from_str(&plain)
            .map_err(|err| CredentialDomainError::CorruptStoredValue(err.to_string()))?;
        Ok(Some(value))
    }

    async fn save<T>(&self, key: &str, value: &T) -> CredentialVaultResult<()>
    where
        T: Serialize + ?Sized,
    {
        let plain = serde_json::to_string(value)
            .map_err(|err| CredentialDomainError::CorruptStoredValue(err.to_string()))?;
        let stored = match &self.obfuscator {
            Some(obfuscator) => obfuscator.conceal(&plain),
            None => plain,
        };
        Ok(self.store.set(key, &stored).await?)
    }
}
