//! Given steps for provisioning scenarios.

use super::world::{ProvisioningWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use supabridge::credentials::domain::ManagementKey;
use supabridge::platform::domain::{Organization, ProjectRef, ProjectStatus};

#[given(r#"an organization named "{name}""#)]
fn an_organization_named(world: &mut ProvisioningWorld, name: String) {
    let organization = Organization {
        id: format!("org-{name}"),
        name,
    };
    world.api = world.api.clone().with_organizations(vec![organization]);
}

#[given(r#"the platform will create project "{reference}""#)]
fn platform_will_create(
    world: &mut ProvisioningWorld,
    reference: String,
) -> Result<(), eyre::Report> {
    let project_ref = ProjectRef::new(reference).wrap_err("scenario project reference")?;
    world.api = world.api.clone().with_created_project(project_ref);
    Ok(())
}

#[given("a stored management key")]
fn a_stored_management_key(world: &mut ProvisioningWorld) -> Result<(), eyre::Report> {
    let key = ManagementKey::new("sbp_scenario").wrap_err("scenario management key")?;
    run_async(world.vault.save_management_key(&key)).wrap_err("store management key")?;
    Ok(())
}

#[given(r#"the project reports statuses "{statuses}""#)]
fn project_reports_statuses(world: &mut ProvisioningWorld, statuses: String) {
    let sequence: Vec<ProjectStatus> = statuses
        .split(',')
        .map(|status| ProjectStatus::from(status.trim().to_owned()))
        .collect();
    world.api = world.api.clone().with_statuses(sequence);
}

#[given("a poll limit of {limit:u32} attempts")]
fn a_poll_limit(world: &mut ProvisioningWorld, limit: u32) {
    world.poll_limit = limit;
}
