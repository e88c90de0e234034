//! End-to-end project creation.

use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::{ProvisioningError, ProvisioningResult, StatusPoller, retry_with_backoff};
use crate::credentials::{
    domain::{ConnectionConfig, ManagementKey},
    ports::KeyValueStore,
    services::CredentialVault,
};
use crate::platform::{
    domain::{NewProjectRequest, Organization, ProjectRef, ProjectStatusReport, Region},
    ports::{ManagementApi, ManagementApiError},
};
use crate::provisioning::{
    domain::{
        BackoffPolicy, BootstrapFailure, BootstrapReport, PollPolicy, ProgressEvent,
        ProgressStage, bootstrap_steps,
    },
    ports::ProgressSink,
};

/// Parameters for a new project.
#[derive(Clone, PartialEq, Eq)]
pub struct CreateProjectRequest {
    name: String,
    region: String,
    db_pass: String,
    organization_id: Option<String>,
    plan: Option<String>,
}

impl CreateProjectRequest {
    /// Creates a request placing the project in the first visible
    /// organization.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        region: impl Into<String>,
        db_pass: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            region: region.into(),
            db_pass: db_pass.into(),
            organization_id: None,
            plan: None,
        }
    }

    /// Targets a specific organization.
    #[must_use]
    pub fn with_organization(mut self, organization_id: impl Into<String>) -> Self {
        self.organization_id = Some(organization_id.into());
        self
    }

    /// Sets the billing plan.
    #[must_use]
    pub fn with_plan(mut self, plan: impl Into<String>) -> Self {
        self.plan = Some(plan.into());
        self
    }
}

impl std::fmt::Debug for CreateProjectRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateProjectRequest")
            .field("name", &self.name)
            .field("region", &self.region)
            .field("organization_id", &self.organization_id)
            .field("plan", &self.plan)
            .finish_non_exhaustive()
    }
}

/// A project that reached a healthy state and is now the active connection.
#[derive(Debug, Clone, Serialize)]
pub struct ProvisionedProject {
    /// Project reference.
    pub project_ref: ProjectRef,
    /// Organization the project was created in.
    pub organization: Organization,
    /// Connection stored in the vault.
    #[serde(skip)]
    pub connection: ConnectionConfig,
    /// Outcome of the baseline schema.
    pub bootstrap: BootstrapReport,
}

/// Creates projects and wires them up as the active connection.
pub struct ProvisioningService<M, S>
where
    M: ManagementApi + ?Sized,
    S: KeyValueStore + ?Sized,
{
    api: Arc<M>,
    vault: CredentialVault<S>,
    poller: StatusPoller<M>,
    backoff: BackoffPolicy,
}

impl<M, S> ProvisioningService<M, S>
where
    M: ManagementApi + ?Sized,
    S: KeyValueStore + ?Sized,
{
    /// Creates a service.
    #[must_use]
    pub fn new(api: Arc<M>, vault: CredentialVault<S>, policy: PollPolicy) -> Self {
        Self {
            poller: StatusPoller::new(Arc::clone(&api), policy),
            api,
            vault,
            backoff: BackoffPolicy::default(),
        }
    }

    /// Overrides the backoff used by [`Self::project_status`].
    #[must_use]
    pub const fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }

    /// Lists organizations visible to the stored management key.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisioningError::NoManagementKey`] when no key is stored
    /// or [`ProvisioningError::Management`] when the call fails.
    pub async fn organizations(&self) -> ProvisioningResult<Vec<Organization>> {
        let key = self.management_key().await?;
        Ok(self.api.list_organizations(&key).await?)
    }

    /// Lists regions a project can be created in.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisioningError::NoManagementKey`] when no key is stored
    /// or [`ProvisioningError::Management`] when the call fails.
    pub async fn regions(&self) -> ProvisioningResult<Vec<Region>> {
        let key = self.management_key().await?;
        Ok(self.api.list_regions(&key).await?)
    }

    /// Fetches a project's status, retrying transient failures with
    /// exponential backoff.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisioningError::Management`] once retries are spent or
    /// the key is rejected.
    pub async fn project_status(
        &self,
        project_ref: &ProjectRef,
    ) -> ProvisioningResult<ProjectStatusReport> {
        let key = self.management_key().await?;
        let key_ref = &key;
        let report = retry_with_backoff(
            &self.backoff,
            move || self.api.project_status(key_ref, project_ref),
            is_transient,
        )
        .await?;
        Ok(report)
    }

    /// Creates a project, waits for it, stores its connection, and applies
    /// the baseline schema.
    ///
    /// Bootstrap failures are recorded in the returned report and never fail
    /// the flow.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisioningError`] when any step before bootstrap fails,
    /// including polling timeouts, failure statuses, and cancellation.
    pub async fn create_project(
        &self,
        request: CreateProjectRequest,
        sink: &dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> ProvisioningResult<ProvisionedProject> {
        let result = self.run_create(request, sink, cancel).await;
        if let Err(err) = &result {
            sink.emit(ProgressEvent::new(ProgressStage::Failed, err.to_string()));
        }
        result
    }

    async fn run_create(
        &self,
        request: CreateProjectRequest,
        sink: &dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> ProvisioningResult<ProvisionedProject> {
        let key = self.management_key().await?;

        sink.emit(ProgressEvent::new(
            ProgressStage::ResolvingOrganization,
            "Looking up organization",
        ));
        let organization = self
            .resolve_organization(&key, request.organization_id.as_deref())
            .await?;

        let mut payload = NewProjectRequest::new(
            request.name,
            organization.id.clone(),
            request.region,
            request.db_pass,
        )?;
        if let Some(plan) = request.plan {
            payload = payload.with_plan(plan);
        }

        sink.emit(ProgressEvent::new(
            ProgressStage::Creating,
            format!("Creating project {}", payload.name()),
        ));
        let project_ref = self.api.create_project(&key, &payload).await?;
        info!(%project_ref, organization = %organization.id, "project creation accepted");

        self.poller.poll(&key, &project_ref, sink, cancel).await?;

        sink.emit(ProgressEvent::new(
            ProgressStage::Connecting,
            "Fetching project API keys",
        ));
        let keys = self.api.project_api_keys(&key, &project_ref).await?;
        let connection = ConnectionConfig::parse(project_ref.project_url(), keys.anon_key)?;
        self.vault.save_connection(&connection).await?;

        sink.emit(ProgressEvent::new(
            ProgressStage::Bootstrapping,
            "Applying baseline schema",
        ));
        let bootstrap = self.bootstrap(&key, &project_ref).await;

        sink.emit(ProgressEvent::new(ProgressStage::Ready, "Project is ready"));
        Ok(ProvisionedProject {
            project_ref,
            organization,
            connection,
            bootstrap,
        })
    }

    async fn management_key(&self) -> ProvisioningResult<ManagementKey> {
        self.vault
            .management_key()
            .await?
            .ok_or(ProvisioningError::NoManagementKey)
    }

    async fn resolve_organization(
        &self,
        key: &ManagementKey,
        requested: Option<&str>,
    ) -> ProvisioningResult<Organization> {
        let organizations = self.api.list_organizations(key).await?;
        match requested {
            Some(id) => organizations
                .into_iter()
                .find(|organization| organization.id == id)
                .ok_or_else(|| ProvisioningError::OrganizationNotFound(id.to_owned())),
            None => organizations
                .into_iter()
                .next()
                .ok_or(ProvisioningError::NoOrganization),
        }
    }

    async fn bootstrap(&self, key: &ManagementKey, project_ref: &ProjectRef) -> BootstrapReport {
        let mut report = BootstrapReport::default();
        for step in bootstrap_steps() {
            match self.api.run_sql(key, project_ref, &step.sql).await {
                Ok(_) => report.applied.push(step.name),
                Err(err) => {
                    warn!(%project_ref, step = %step.name, error = %err, "bootstrap step failed");
                    report.failed.push(BootstrapFailure {
                        step: step.name,
                        error: err.to_string(),
                    });
                }
            }
        }
        report
    }
}

const fn is_transient(error: &ManagementApiError) -> bool {
    match error {
        ManagementApiError::Transport(_) => true,
        ManagementApiError::Status { status, .. } => *status >= 500,
        ManagementApiError::Unauthorized(_)
        | ManagementApiError::ProjectRefTooShort(_)
        | ManagementApiError::Decode(_) => false,
    }
}
