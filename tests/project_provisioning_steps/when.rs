//! When steps for provisioning scenarios.

use std::sync::Arc;
use std::time::Duration;

use super::world::{ProvisioningWorld, run_async};
use rstest_bdd_macros::when;
use supabridge::provisioning::{
    domain::{BackoffPolicy, PollPolicy},
    services::{CreateProjectRequest, ProvisioningService},
};
use tokio_util::sync::CancellationToken;

#[when(r#"a project named "{name}" is created"#)]
fn a_project_is_created(world: &mut ProvisioningWorld, name: String) {
    let service = ProvisioningService::new(
        Arc::new(world.api.clone()),
        world.vault.clone(),
        PollPolicy::new(Duration::from_millis(1), world.poll_limit),
    )
    .with_backoff(BackoffPolicy {
        initial_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(1),
        max_retries: 1,
    });
    let request = CreateProjectRequest::new(name, "us-east-1", "correct-horse-battery");
    let result = run_async(service.create_project(
        request,
        &world.sink,
        &CancellationToken::new(),
    ));
    world.result = Some(result);
}
