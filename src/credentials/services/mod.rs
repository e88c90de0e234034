//! Application services for credential persistence.

mod vault;

pub use vault::{
    CONNECTION_KEY, CredentialVault, CredentialVaultError, CredentialVaultResult,
    MANAGEMENT_KEY_KEY, OAUTH_CLIENT_KEY,
};
