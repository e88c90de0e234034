//! Given steps for verification scenarios.

use super::world::VerificationWorld;
use rstest_bdd_macros::given;
use serde_json::json;
use supabridge::platform::{
    adapters::memory::ScriptedDataApi, domain::RemoteError, ports::DataApiError,
};
use supabridge::verification::{NONEXISTENT_TABLE, SENTINEL_TABLE};

fn remote(status: u16, message: &str) -> DataApiError {
    DataApiError::Remote(RemoteError::new(Some(status), None, message))
}

#[given("a project whose version procedure answers")]
fn version_answers(world: &mut VerificationWorld) {
    world.api = ScriptedDataApi::new().with_rpc("version", Ok(json!("PostgreSQL 15.6")));
}

#[given("a project with an empty database")]
fn empty_database(world: &mut VerificationWorld) {
    world.api = ScriptedDataApi::new();
}

#[given("a project whose version procedure fails with a server error")]
fn version_fails(world: &mut VerificationWorld) {
    world.api = ScriptedDataApi::new().with_rpc("version", Err(remote(500, "internal error")));
}

#[given("the sentinel table exists but has no rows")]
fn sentinel_has_no_rows(world: &mut VerificationWorld) {
    world.api = world.api.clone().with_table(SENTINEL_TABLE, Ok(json!([])));
}

#[given("a project that rejects the API key")]
fn rejects_key(world: &mut VerificationWorld) {
    world.api = ScriptedDataApi::new()
        .with_rpc("version", Err(remote(401, "Invalid API key")))
        .with_table(SENTINEL_TABLE, Err(remote(401, "Invalid API key")))
        .with_table(NONEXISTENT_TABLE, Err(remote(401, "Invalid API key")));
}
