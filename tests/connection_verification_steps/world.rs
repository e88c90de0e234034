//! Shared world state for verification scenarios.

use rstest::fixture;
use supabridge::platform::adapters::memory::ScriptedDataApi;
use supabridge::verification::Verification;

/// Scenario world for verification behaviour tests.
#[derive(Default)]
pub struct VerificationWorld {
    /// Scripted data API for the project under test.
    pub api: ScriptedDataApi,
    /// Outcome of the last verification.
    pub verification: Option<Verification>,
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> VerificationWorld {
    VerificationWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
