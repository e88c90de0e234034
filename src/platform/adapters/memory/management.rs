//! Scripted management API.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::{Arc, PoisonError, RwLock};

use crate::credentials::domain::ManagementKey;
use crate::platform::{
    domain::{
        ManagementRequest, ManagementResponse, NewProjectRequest, Organization, ProjectApiKeys,
        ProjectRef, ProjectStatus, ProjectStatusReport, Region,
    },
    ports::{ManagementApi, ManagementApiError, ManagementApiResult},
};

/// Management API answering from a pre-programmed script.
///
/// Status answers are consumed in order; once the queue drains the last
/// answer repeats.
#[derive(Debug, Clone, Default)]
pub struct ScriptedManagementApi {
    state: Arc<RwLock<ManagementState>>,
}

#[derive(Debug, Default)]
struct ManagementState {
    accepted_key: Option<String>,
    organizations: Vec<Organization>,
    created_ref: Option<ProjectRef>,
    create_error: Option<ManagementApiError>,
    created: Vec<NewProjectRequest>,
    statuses: VecDeque<ManagementApiResult<ProjectStatus>>,
    last_status: Option<ManagementApiResult<ProjectStatus>>,
    status_calls: usize,
    api_keys: Option<ProjectApiKeys>,
    sql_error: Option<ManagementApiError>,
    executed_sql: Vec<String>,
    forward_response: Option<ManagementResponse>,
    forwarded: Vec<ManagementRequest>,
}

impl ScriptedManagementApi {
    /// Creates an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn update(&self, change: impl FnOnce(&mut ManagementState)) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        change(&mut state);
    }

    fn read<T>(&self, view: impl FnOnce(&ManagementState) -> T) -> T {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        view(&state)
    }

    /// Rejects every key except `key` with [`ManagementApiError::Unauthorized`].
    #[must_use]
    pub fn accepting_only(self, key: &str) -> Self {
        self.update(|state| state.accepted_key = Some(key.to_owned()));
        self
    }

    /// Sets the organizations returned by `list_organizations`.
    #[must_use]
    pub fn with_organizations(self, organizations: Vec<Organization>) -> Self {
        self.update(|state| state.organizations = organizations);
        self
    }

    /// Sets the reference returned by `create_project`.
    #[must_use]
    pub fn with_created_project(self, project_ref: ProjectRef) -> Self {
        self.update(|state| state.created_ref = Some(project_ref));
        self
    }

    /// Makes `create_project` fail.
    #[must_use]
    pub fn with_create_error(self, error: ManagementApiError) -> Self {
        self.update(|state| state.create_error = Some(error));
        self
    }

    /// Queues successive status answers.
    #[must_use]
    pub fn with_statuses(self, statuses: impl IntoIterator<Item = ProjectStatus>) -> Self {
        self.update(|state| state.statuses.extend(statuses.into_iter().map(Ok)));
        self
    }

    /// Queues a failing status answer.
    #[must_use]
    pub fn with_status_error(self, error: ManagementApiError) -> Self {
        self.update(|state| state.statuses.push_back(Err(error)));
        self
    }

    /// Sets the keys returned by `project_api_keys`.
    #[must_use]
    pub fn with_api_keys(self, keys: ProjectApiKeys) -> Self {
        self.update(|state| state.api_keys = Some(keys));
        self
    }

    /// Makes `run_sql` fail.
    #[must_use]
    pub fn with_sql_error(self, error: ManagementApiError) -> Self {
        self.update(|state| state.sql_error = Some(error));
        self
    }

    /// Sets the answer returned by `forward`.
    #[must_use]
    pub fn with_forward_response(self, response: ManagementResponse) -> Self {
        self.update(|state| state.forward_response = Some(response));
        self
    }

    /// Number of status calls made so far.
    #[must_use]
    pub fn status_calls(&self) -> usize {
        self.read(|state| state.status_calls)
    }

    /// SQL statements passed to `run_sql`.
    #[must_use]
    pub fn executed_sql(&self) -> Vec<String> {
        self.read(|state| state.executed_sql.clone())
    }

    /// Project creation requests received.
    #[must_use]
    pub fn created_projects(&self) -> Vec<NewProjectRequest> {
        self.read(|state| state.created.clone())
    }

    /// Requests passed to `forward`.
    #[must_use]
    pub fn forwarded(&self) -> Vec<ManagementRequest> {
        self.read(|state| state.forwarded.clone())
    }

    fn authorise(&self, key: &ManagementKey) -> ManagementApiResult<()> {
        self.read(|state| match &state.accepted_key {
            Some(accepted) if accepted != key.expose() => Err(ManagementApiError::Unauthorized(
                "invalid access token".to_owned(),
            )),
            _ => Ok(()),
        })
    }
}

fn not_scripted(what: &str) -> ManagementApiError {
    ManagementApiError::Status {
        status: 404,
        message: format!("no scripted {what}"),
    }
}

#[async_trait]
impl ManagementApi for ScriptedManagementApi {
    async fn list_organizations(
        &self,
        key: &ManagementKey,
    ) -> ManagementApiResult<Vec<Organization>> {
        self.authorise(key)?;
        Ok(self.read(|state| state.organizations.clone()))
    }

    async fn list_regions(&self, key: &ManagementKey) -> ManagementApiResult<Vec<Region>> {
        self.authorise(key)?;
        Ok(Region::catalogue())
    }

    async fn create_project(
        &self,
        key: &ManagementKey,
        request: &NewProjectRequest,
    ) -> ManagementApiResult<ProjectRef> {
        self.authorise(key)?;
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.created.push(request.clone());
        if let Some(error) = &state.create_error {
            return Err(error.clone());
        }
        state
            .created_ref
            .clone()
            .ok_or_else(|| not_scripted("project reference"))
    }

    async fn project_status(
        &self,
        key: &ManagementKey,
        project_ref: &ProjectRef,
    ) -> ManagementApiResult<ProjectStatusReport> {
        self.authorise(key)?;
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.status_calls += 1;
        let answer = match state.statuses.pop_front() {
            Some(next) => {
                state.last_status = Some(next.clone());
                next
            }
            None => state
                .last_status
                .clone()
                .unwrap_or_else(|| Err(not_scripted("status"))),
        };
        answer.map(|status| ProjectStatusReport::new(project_ref.clone(), status))
    }

    async fn project_api_keys(
        &self,
        key: &ManagementKey,
        _project_ref: &ProjectRef,
    ) -> ManagementApiResult<ProjectApiKeys> {
        self.authorise(key)?;
        self.read(|state| state.api_keys.clone())
            .ok_or_else(|| not_scripted("API keys"))
    }

    async fn run_sql(
        &self,
        key: &ManagementKey,
        _project_ref: &ProjectRef,
        sql: &str,
    ) -> ManagementApiResult<Value> {
        self.authorise(key)?;
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.executed_sql.push(sql.to_owned());
        match &state.sql_error {
            Some(error) => Err(error.clone()),
            None => Ok(json!([])),
        }
    }

    async fn forward(
        &self,
        key: &ManagementKey,
        request: &ManagementRequest,
    ) -> ManagementApiResult<ManagementResponse> {
        self.authorise(key)?;
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.forwarded.push(request.clone());
        Ok(state
            .forward_response
            .clone()
            .unwrap_or_else(|| ManagementResponse {
                status: 200,
                body: json!([]),
            }))
    }
}
