//! Shared world state for provisioning scenarios.

use std::sync::Arc;

use rstest::fixture;
use supabridge::credentials::{adapters::InMemoryKeyValueStore, services::CredentialVault};
use supabridge::platform::{adapters::memory::ScriptedManagementApi, domain::ProjectApiKeys};
use supabridge::provisioning::{
    adapters::RecordingProgressSink,
    services::{ProvisionedProject, ProvisioningError},
};

/// Scenario world for provisioning behaviour tests.
pub struct ProvisioningWorld {
    /// Scripted management API.
    pub api: ScriptedManagementApi,
    /// Vault the service stores credentials in.
    pub vault: CredentialVault<InMemoryKeyValueStore>,
    /// Maximum number of status polls.
    pub poll_limit: u32,
    /// Progress events observed.
    pub sink: RecordingProgressSink,
    /// Result of the last creation attempt.
    pub result: Option<Result<ProvisionedProject, ProvisioningError>>,
}

impl ProvisioningWorld {
    /// Creates a world whose platform issues API keys for any project.
    #[must_use]
    pub fn new() -> Self {
        Self {
            api: ScriptedManagementApi::new().with_api_keys(ProjectApiKeys {
                anon_key: "anon-key".to_owned(),
                service_role_key: "service-key".to_owned(),
            }),
            vault: CredentialVault::new(Arc::new(InMemoryKeyValueStore::new())),
            poll_limit: 1,
            sink: RecordingProgressSink::new(),
            result: None,
        }
    }
}

impl Default for ProvisioningWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ProvisioningWorld {
    ProvisioningWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
