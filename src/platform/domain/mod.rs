//! Domain model for hosted platform interactions.

mod error;
mod management;
mod project;
mod project_ref;
mod query;
mod remote_error;
mod status;

pub use error::PlatformDomainError;
pub use management::{HttpMethod, ManagementRequest, ManagementResponse};
pub use project::{
    NewProjectRequest, Organization, ProjectApiKeys, ProjectStatusReport, Region, ServiceHealth,
};
pub use project_ref::{MIN_PROJECT_REF_LENGTH, ProjectRef};
pub use query::{Filter, SelectQuery, TableTarget};
pub(crate) use query::validate_identifier;
pub use remote_error::{RemoteError, RemoteErrorCode};
pub use status::ProjectStatus;
