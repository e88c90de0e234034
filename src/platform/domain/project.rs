//! Project, organization, and region records from the management API.

use super::{PlatformDomainError, ProjectRef, ProjectStatus};
use serde::{Deserialize, Serialize};

/// Minimum database password length accepted by the platform.
const MIN_DB_PASSWORD_LENGTH: usize = 8;

/// Organization visible to a management key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    /// Organization id (slug).
    pub id: String,
    /// Display name.
    pub name: String,
}

/// Region a project can be created in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Region code, for example `us-east-1`.
    #[serde(alias = "code")]
    pub id: String,
    /// Display name.
    pub name: String,
}

/// Regions offered by the hosted platform.
const REGION_CATALOGUE: [(&str, &str); 12] = [
    ("us-east-1", "East US (North Virginia)"),
    ("us-east-2", "East US (Ohio)"),
    ("us-west-1", "West US (North California)"),
    ("ca-central-1", "Canada (Central)"),
    ("eu-west-1", "West EU (Ireland)"),
    ("eu-west-2", "West Europe (London)"),
    ("eu-west-3", "West EU (Paris)"),
    ("eu-central-1", "Central EU (Frankfurt)"),
    ("ap-south-1", "South Asia (Mumbai)"),
    ("ap-southeast-1", "Southeast Asia (Singapore)"),
    ("ap-northeast-1", "Northeast Asia (Tokyo)"),
    ("ap-southeast-2", "Oceania (Sydney)"),
];

impl Region {
    /// Returns the platform's published region list.
    #[must_use]
    pub fn catalogue() -> Vec<Self> {
        REGION_CATALOGUE
            .iter()
            .map(|(id, name)| Self {
                id: (*id).to_owned(),
                name: (*name).to_owned(),
            })
            .collect()
    }
}

/// API keys issued for a project.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectApiKeys {
    /// Public anonymous key.
    pub anon_key: String,
    /// Privileged service role key.
    pub service_role_key: String,
}

impl std::fmt::Debug for ProjectApiKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ProjectApiKeys(<redacted>)")
    }
}

/// Health of a single platform service within a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceHealth {
    /// Service name, for example `db` or `rest`.
    pub name: String,
    /// Reported status string.
    pub status: String,
}

/// Snapshot of a project's provisioning state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectStatusReport {
    /// Project reference.
    #[serde(rename = "ref")]
    pub project_ref: ProjectRef,
    /// Lifecycle status.
    pub status: ProjectStatus,
    /// API keys, once fetched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api: Option<ProjectApiKeys>,
    /// Per-service health.
    #[serde(default)]
    pub services: Vec<ServiceHealth>,
}

impl ProjectStatusReport {
    /// Creates a report with a status and no keys or services.
    #[must_use]
    pub const fn new(project_ref: ProjectRef, status: ProjectStatus) -> Self {
        Self {
            project_ref,
            status,
            api: None,
            services: Vec::new(),
        }
    }

    /// Attaches API keys.
    #[must_use]
    pub fn with_api_keys(mut self, keys: ProjectApiKeys) -> Self {
        self.api = Some(keys);
        self
    }

    /// Attaches service health entries.
    #[must_use]
    pub fn with_services(mut self, services: impl IntoIterator<Item = ServiceHealth>) -> Self {
        self.services = services.into_iter().collect();
        self
    }
}

/// Validated create-project payload.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct NewProjectRequest {
    name: String,
    organization_id: String,
    region: String,
    db_pass: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    plan: Option<String>,
}

impl NewProjectRequest {
    /// Validates a create-project payload.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformDomainError`] when a field is blank or the database
    /// password is shorter than eight characters.
    pub fn new(
        name: impl Into<String>,
        organization_id: impl Into<String>,
        region: impl Into<String>,
        db_pass: impl Into<String>,
    ) -> Result<Self, PlatformDomainError> {
        let normalized_name = name.into().trim().to_owned();
        if normalized_name.is_empty() {
            return Err(PlatformDomainError::EmptyProjectName);
        }
        let normalized_org = organization_id.into().trim().to_owned();
        if normalized_org.is_empty() {
            return Err(PlatformDomainError::EmptyOrganizationId);
        }
        let normalized_region = region.into().trim().to_owned();
        if normalized_region.is_empty() {
            return Err(PlatformDomainError::EmptyRegion);
        }
        let password = db_pass.into();
        if password.chars().count() < MIN_DB_PASSWORD_LENGTH {
            return Err(PlatformDomainError::WeakDatabasePassword(
                MIN_DB_PASSWORD_LENGTH,
            ));
        }
        Ok(Self {
            name: normalized_name,
            organization_id: normalized_org,
            region: normalized_region,
            db_pass: password,
            plan: None,
        })
    }

    /// Sets the billing plan (`free` when unset).
    #[must_use]
    pub fn with_plan(mut self, plan: impl Into<String>) -> Self {
        self.plan = Some(plan.into());
        self
    }

    /// Returns the project name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the organization id.
    #[must_use]
    pub fn organization_id(&self) -> &str {
        &self.organization_id
    }

    /// Returns the region code.
    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }
}

impl std::fmt::Debug for NewProjectRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewProjectRequest")
            .field("name", &self.name)
            .field("organization_id", &self.organization_id)
            .field("region", &self.region)
            .field("plan", &self.plan)
            .finish_non_exhaustive()
    }
}
