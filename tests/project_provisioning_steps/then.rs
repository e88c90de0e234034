//! Then steps for provisioning scenarios.

use super::world::{ProvisioningWorld, run_async};
use eyre::eyre;
use rstest_bdd_macros::then;
use supabridge::provisioning::services::{ProvisionedProject, ProvisioningError};

fn outcome(
    world: &ProvisioningWorld,
) -> Result<&Result<ProvisionedProject, ProvisioningError>, eyre::Report> {
    world
        .result
        .as_ref()
        .ok_or_else(|| eyre!("no provisioning attempt in scenario world"))
}

fn failure(world: &ProvisioningWorld) -> Result<&ProvisioningError, eyre::Report> {
    match outcome(world)? {
        Ok(project) => Err(eyre!("expected failure, project {} was created", project.project_ref)),
        Err(err) => Ok(err),
    }
}

#[then("provisioning succeeds")]
fn provisioning_succeeds(world: &ProvisioningWorld) -> Result<(), eyre::Report> {
    match outcome(world)? {
        Ok(_) => Ok(()),
        Err(err) => Err(eyre!("expected success, got {err}")),
    }
}

#[then("the status was polled {count:usize} times")]
fn status_polled(world: &ProvisioningWorld, count: usize) -> Result<(), eyre::Report> {
    let calls = world.api.status_calls();
    if calls != count {
        return Err(eyre!("expected {count} status polls, saw {calls}"));
    }
    Ok(())
}

#[then("the project connection is stored")]
fn connection_stored(world: &ProvisioningWorld) -> Result<(), eyre::Report> {
    let stored = run_async(world.vault.connection())
        .map_err(|err| eyre!("read connection: {err}"))?
        .ok_or_else(|| eyre!("no connection stored"))?;
    let project = outcome(world)?
        .as_ref()
        .map_err(|err| eyre!("provisioning failed: {err}"))?;
    if stored.project_url().project_ref() != Some(project.project_ref.as_str()) {
        return Err(eyre!(
            "stored connection {} does not belong to {}",
            stored.project_url(),
            project.project_ref
        ));
    }
    Ok(())
}

#[then("no project connection is stored")]
fn no_connection_stored(world: &ProvisioningWorld) -> Result<(), eyre::Report> {
    let stored =
        run_async(world.vault.connection()).map_err(|err| eyre!("read connection: {err}"))?;
    if let Some(connection) = stored {
        return Err(eyre!("unexpected connection to {}", connection.project_url()));
    }
    Ok(())
}

#[then(r#"the last progress stage is "{stage}""#)]
fn last_progress_stage(world: &ProvisioningWorld, stage: String) -> Result<(), eyre::Report> {
    let last = world
        .sink
        .events()
        .last()
        .map(|event| event.stage.to_string())
        .ok_or_else(|| eyre!("no progress events recorded"))?;
    if last != stage {
        return Err(eyre!("expected last stage {stage}, got {last}"));
    }
    Ok(())
}

#[then("provisioning fails with a timeout after {attempts:u32} polls")]
fn fails_with_timeout(world: &ProvisioningWorld, attempts: u32) -> Result<(), eyre::Report> {
    match failure(world)? {
        ProvisioningError::TimedOut { attempts: seen } if *seen == attempts => Ok(()),
        other => Err(eyre!("expected timeout after {attempts} polls, got {other}")),
    }
}

#[then(r#"provisioning fails with status "{status}""#)]
fn fails_with_status(world: &ProvisioningWorld, status: String) -> Result<(), eyre::Report> {
    match failure(world)? {
        ProvisioningError::ProvisioningFailed { status: seen } if seen.as_str() == status => {
            Ok(())
        }
        other => Err(eyre!("expected failure status {status}, got {other}")),
    }
}

#[then("provisioning fails because no management key is stored")]
fn fails_without_key(world: &ProvisioningWorld) -> Result<(), eyre::Report> {
    match failure(world)? {
        ProvisioningError::NoManagementKey => Ok(()),
        other => Err(eyre!("expected missing key error, got {other}")),
    }
}
