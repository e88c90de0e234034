//! HTTP adapter for the management API.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;
use url::Url;

use super::body::decode_body;
use crate::credentials::domain::ManagementKey;
use crate::platform::{
    domain::{
        HttpMethod, ManagementRequest, ManagementResponse, NewProjectRequest, Organization,
        ProjectApiKeys, ProjectRef, ProjectStatus, ProjectStatusReport, Region, ServiceHealth,
    },
    ports::{ManagementApi, ManagementApiError, ManagementApiResult},
};

/// Default management API base URL.
pub const DEFAULT_MANAGEMENT_API_URL: &str = "https://api.supabase.com";

/// Services whose health is reported once a project is up.
const HEALTH_SERVICES: [&str; 3] = ["auth", "db", "rest"];

/// Management API client over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpManagementApi {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct CreatedProject {
    #[serde(alias = "ref")]
    id: String,
}

#[derive(Debug, Deserialize)]
struct ProjectRecord {
    status: String,
}

#[derive(Debug, Deserialize)]
struct ApiKeyRecord {
    name: String,
    api_key: Option<String>,
}

impl HttpManagementApi {
    /// Creates a client for the API rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ManagementApiError::Decode`] when `base_url` is not an
    /// absolute URL.
    pub fn new(client: Client, base_url: &str) -> ManagementApiResult<Self> {
        let parsed = Url::parse(base_url)
            .map_err(|err| ManagementApiError::Decode(format!("invalid base URL: {err}")))?;
        Ok(Self {
            client,
            base_url: parsed.as_str().trim_end_matches('/').to_owned(),
        })
    }

    async fn send(
        &self,
        key: &ManagementKey,
        method: HttpMethod,
        path: &str,
        body: Option<&Value>,
    ) -> ManagementApiResult<ManagementResponse> {
        let url = format!("{}{path}", self.base_url);
        debug!(%method, %url, "management API request");
        let mut builder = self
            .client
            .request(reqwest_method(method), &url)
            .bearer_auth(key.expose())
            .header(ACCEPT, "application/json");
        if let Some(payload) = body {
            builder = builder.json(payload);
        }
        let response = builder
            .send()
            .await
            .map_err(ManagementApiError::transport)?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(ManagementApiError::transport)?;
        debug!(%method, %url, status, "management API response");
        Ok(ManagementResponse {
            status,
            body: decode_body(&text),
        })
    }

    async fn call<T>(
        &self,
        key: &ManagementKey,
        method: HttpMethod,
        path: &str,
        body: Option<&Value>,
    ) -> ManagementApiResult<T>
    where
        T: DeserializeOwned,
    {
        let response = self.send(key, method, path, body).await?;
        if !response.is_success() {
            return Err(ManagementApiError::from_status(
                response.status,
                response.error_message(),
            ));
        }
        serde_json::from_value(response.body)
            .map_err(|err| ManagementApiError::Decode(err.to_string()))
    }

    async fn service_health(
        &self,
        key: &ManagementKey,
        project_ref: &ProjectRef,
    ) -> Vec<ServiceHealth> {
        let query = HEALTH_SERVICES
            .iter()
            .map(|service| format!("services={service}"))
            .collect::<Vec<_>>()
            .join("&");
        let path = format!("/v1/projects/{project_ref}/health?{query}");
        match self
            .call::<Vec<ServiceHealth>>(key, HttpMethod::Get, &path, None)
            .await
        {
            Ok(services) => services,
            Err(err) => {
                debug!(%project_ref, error = %err, "service health unavailable");
                Vec::new()
            }
        }
    }
}

const fn reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl ManagementApi for HttpManagementApi {
    async fn list_organizations(
        &self,
        key: &ManagementKey,
    ) -> ManagementApiResult<Vec<Organization>> {
        self.call(key, HttpMethod::Get, "/v1/organizations", None)
            .await
    }

    async fn list_regions(&self, _key: &ManagementKey) -> ManagementApiResult<Vec<Region>> {
        Ok(Region::catalogue())
    }

    async fn create_project(
        &self,
        key: &ManagementKey,
        request: &NewProjectRequest,
    ) -> ManagementApiResult<ProjectRef> {
        let payload =
            serde_json::to_value(request).map_err(|err| ManagementApiError::Decode(err.to_string()))?;
        let created: CreatedProject = self
            .call(key, HttpMethod::Post, "/v1/projects", Some(&payload))
            .await?;
        ProjectRef::new(created.id).map_err(|err| ManagementApiError::Decode(err.to_string()))
    }

    async fn project_status(
        &self,
        key: &ManagementKey,
        project_ref: &ProjectRef,
    ) -> ManagementApiResult<ProjectStatusReport> {
        let path = format!("/v1/projects/{project_ref}");
        let record: ProjectRecord = self.call(key, HttpMethod::Get, &path, None).await?;
        let status = ProjectStatus::from(record.status);
        let report = ProjectStatusReport::new(project_ref.clone(), status);
        if report.status.is_success() {
            let services = self.service_health(key, project_ref).await;
            return Ok(report.with_services(services));
        }
        Ok(report)
    }

    async fn project_api_keys(
        &self,
        key: &ManagementKey,
        project_ref: &ProjectRef,
    ) -> ManagementApiResult<ProjectApiKeys> {
        let path = format!("/v1/projects/{project_ref}/api-keys");
        let records: Vec<ApiKeyRecord> = self.call(key, HttpMethod::Get, &path, None).await?;
        let find = |name: &str| {
            records
                .iter()
                .find(|record| record.name == name)
                .and_then(|record| record.api_key.clone())
                .ok_or_else(|| ManagementApiError::Decode(format!("missing {name} key")))
        };
        Ok(ProjectApiKeys {
            anon_key: find("anon")?,
            service_role_key: find("service_role")?,
        })
    }

    async fn run_sql(
        &self,
        key: &ManagementKey,
        project_ref: &ProjectRef,
        sql: &str,
    ) -> ManagementApiResult<Value> {
        let path = format!("/v1/projects/{project_ref}/database/query");
        let payload = json!({ "query": sql });
        self.call(key, HttpMethod::Post, &path, Some(&payload))
            .await
    }

    async fn forward(
        &self,
        key: &ManagementKey,
        request: &ManagementRequest,
    ) -> ManagementApiResult<ManagementResponse> {
        self.send(key, request.method(), request.path(), request.body())
            .await
    }
}
