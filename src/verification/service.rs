//! Probe runner.

use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::domain::{NONEXISTENT_TABLE, Probe, SENTINEL_TABLE, Verification};
use crate::credentials::domain::ConnectionConfig;
use crate::platform::{
    domain::{RemoteErrorCode, SelectQuery, TableTarget},
    ports::{DataApi, DataApiConnector, DataApiError, DataApiResult},
};

/// Verifies connections by probing the data API.
#[derive(Clone)]
pub struct ConnectionVerifier {
    connector: Arc<dyn DataApiConnector>,
}

impl ConnectionVerifier {
    /// Creates a verifier using `connector` to open handles.
    #[must_use]
    pub const fn new(connector: Arc<dyn DataApiConnector>) -> Self {
        Self { connector }
    }

    /// Opens a handle for `config` and verifies it.
    ///
    /// A connector failure yields [`Verification::Unverified`].
    pub async fn verify_config(&self, config: &ConnectionConfig) -> Verification {
        match self.connector.connect(config) {
            Ok(api) => Self::verify(api.as_ref()).await,
            Err(err) => {
                warn!(project_url = %config.project_url(), error = %err, "could not open data API handle");
                Verification::Unverified {
                    reason: err.to_string(),
                }
            }
        }
    }

    /// Runs the probes against `api` in order.
    ///
    /// Never fails: every error becomes [`Verification::Unverified`] with
    /// the reason reported by the last probe. A rejected API key ends the
    /// run, since no later probe can succeed with it.
    pub async fn verify(api: &dyn DataApi) -> Verification {
        let mut last_reason = String::from("no probe was attempted");
        for probe in Probe::ORDERED {
            let answer = run_probe(api, probe).await;
            if probe.accepts(&answer) {
                info!(%probe, "connection verified");
                return Verification::Verified { probe };
            }
            if let Err(err) = answer {
                debug!(%probe, error = %err, "probe rejected");
                last_reason = format!("{probe}: {err}");
                if err.remote_code() == Some(&RemoteErrorCode::InvalidApiKey) {
                    break;
                }
            }
        }
        warn!(reason = %last_reason, "connection could not be verified");
        Verification::Unverified {
            reason: last_reason,
        }
    }
}

async fn run_probe(api: &dyn DataApi, probe: Probe) -> DataApiResult<serde_json::Value> {
    match probe {
        Probe::VersionRpc => api.rpc("version", &json!({})).await,
        Probe::SentinelTable => select_one(api, SENTINEL_TABLE).await,
        Probe::NonexistentTable => select_one(api, NONEXISTENT_TABLE).await,
    }
}

async fn select_one(api: &dyn DataApi, table: &str) -> DataApiResult<serde_json::Value> {
    let target =
        TableTarget::new(table).map_err(|err| DataApiError::InvalidRequest(err.to_string()))?;
    api.select(&SelectQuery::new(target).with_limit(1)).await
}
