//! Runtime configuration.
//!
//! Settings are layered: built-in defaults, then an optional TOML file
//! (`supabridge.toml` in the working directory unless a path is given),
//! then environment variables such as `SUPABRIDGE__BIND_ADDRESS` or
//! `SUPABRIDGE__POLL__INTERVAL_MS`.

use camino::{Utf8Path, Utf8PathBuf};
use ::config::{Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;
use url::Url;

use crate::api::OAuthUrls;
use crate::credentials::domain::Obfuscator;
use crate::provisioning::domain::PollPolicy;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "SUPABRIDGE";

const DEFAULT_CONFIG_FILE: &str = "supabridge.toml";

/// Polling settings for project provisioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PollSettings {
    /// Delay between status polls in milliseconds.
    pub interval_ms: u64,
    /// Maximum number of polls.
    pub max_attempts: u32,
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    /// HTTP listen address.
    pub bind_address: SocketAddr,
    /// Management API base URL.
    pub management_api_url: String,
    /// OAuth authorisation page.
    pub oauth_authorize_url: Url,
    /// OAuth token endpoint.
    pub oauth_token_url: String,
    /// OAuth callback URL.
    pub oauth_redirect_url: String,
    /// Directory backing the credential store.
    pub credentials_dir: Utf8PathBuf,
    /// Passphrase used to obfuscate stored credentials.
    pub credentials_secret: Option<String>,
    /// Provisioning poll settings.
    pub poll: PollSettings,
    /// Schema cache staleness window in seconds.
    pub schema_cache_ttl_secs: u64,
}

impl AppConfig {
    /// Loads settings from defaults, the config file, and the environment.
    ///
    /// An explicit `path` must exist; the default file is optional.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a source cannot be read or a value has
    /// the wrong type.
    pub fn load(path: Option<&Utf8Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(explicit) => File::with_name(explicit.as_str()).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };
        defaults()?
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()
    }

    /// Poll policy for provisioning.
    #[must_use]
    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy::new(
            Duration::from_millis(self.poll.interval_ms),
            self.poll.max_attempts,
        )
    }

    /// Schema cache staleness window.
    #[must_use]
    pub const fn schema_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.schema_cache_ttl_secs)
    }

    /// OAuth endpoints for the HTTP layer.
    #[must_use]
    pub fn oauth_urls(&self) -> OAuthUrls {
        OAuthUrls {
            authorize_url: self.oauth_authorize_url.clone(),
            redirect_url: self.oauth_redirect_url.clone(),
        }
    }

    /// Obfuscator for stored credentials, when a passphrase is set.
    #[must_use]
    pub fn obfuscator(&self) -> Option<Obfuscator> {
        self.credentials_secret
            .as_deref()
            .filter(|secret| !secret.is_empty())
            .map(Obfuscator::new)
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("bind_address", "127.0.0.1:8787")?
        .set_default("management_api_url", "https://api.supabase.com")?
        .set_default(
            "oauth_authorize_url",
            "https://api.supabase.com/v1/oauth/authorize",
        )?
        .set_default("oauth_token_url", "https://api.supabase.com/v1/oauth/token")?
        .set_default(
            "oauth_redirect_url",
            "http://127.0.0.1:8787/api/supabase-oauth",
        )?
        .set_default("credentials_dir", ".supabridge")?
        .set_default("poll.interval_ms", 2000_i64)?
        .set_default("poll.max_attempts", 90_i64)?
        .set_default("schema_cache_ttl_secs", 300_i64)
}

#[cfg(test)]
mod tests;
