//! Unit tests for platform domain types.

use crate::platform::domain::{
    Filter, HttpMethod, ManagementRequest, ManagementResponse, NewProjectRequest,
    PlatformDomainError, ProjectRef, ProjectStatus, ProjectStatusReport, SelectQuery, TableTarget,
};
use rstest::rstest;
use serde_json::json;

const REF: &str = "abcdefghijklmnopqrst";

#[rstest]
fn project_ref_accepts_platform_identifiers() {
    let project_ref = ProjectRef::new(format!("  {REF} ")).expect("valid reference");
    assert_eq!(project_ref.as_str(), REF);
    assert_eq!(project_ref.project_url(), format!("https://{REF}.supabase.co"));
}

#[rstest]
#[case("", PlatformDomainError::EmptyProjectRef)]
#[case("abc", PlatformDomainError::ProjectRefTooShort { value: "abc".to_owned(), min: 20 })]
#[case(
    "ABCDEFGHIJKLMNOPQRST",
    PlatformDomainError::InvalidProjectRef("ABCDEFGHIJKLMNOPQRST".to_owned())
)]
fn project_ref_rejects_malformed_values(#[case] raw: &str, #[case] expected: PlatformDomainError) {
    assert_eq!(ProjectRef::new(raw), Err(expected));
}

#[rstest]
#[case("ACTIVE_HEALTHY", ProjectStatus::ActiveHealthy)]
#[case("coming_up", ProjectStatus::ComingUp)]
#[case("PAUSED", ProjectStatus::Other("PAUSED".to_owned()))]
fn status_parsing_is_total(#[case] raw: &str, #[case] expected: ProjectStatus) {
    assert_eq!(ProjectStatus::from(raw), expected);
}

#[rstest]
#[case(ProjectStatus::ActiveHealthy, true, false)]
#[case(ProjectStatus::ComingUp, false, false)]
#[case(ProjectStatus::ProvisioningFailed, false, true)]
#[case(ProjectStatus::ErrorProvisioning, false, true)]
#[case(ProjectStatus::from("RESTORE_FAILED"), false, true)]
fn status_classification(
    #[case] status: ProjectStatus,
    #[case] success: bool,
    #[case] failure: bool,
) {
    assert_eq!(status.is_success(), success);
    assert_eq!(status.is_failure(), failure);
    assert_eq!(status.is_terminal(), success || failure);
}

#[rstest]
fn status_report_deserialises_platform_shape() {
    let report: ProjectStatusReport =
        serde_json::from_value(json!({ "ref": REF, "status": "COMING_UP" })).expect("decode");
    assert_eq!(report.status, ProjectStatus::ComingUp);
    assert_eq!(report.project_ref.as_str(), REF);
}

#[rstest]
fn new_project_requires_strong_password() {
    let result = NewProjectRequest::new("demo", "org", "us-east-1", "short");
    assert_eq!(result.err(), Some(PlatformDomainError::WeakDatabasePassword(8)));
}

#[rstest]
fn new_project_debug_hides_password() {
    let request =
        NewProjectRequest::new("demo", "org", "us-east-1", "s3cret-password").expect("valid");
    assert!(!format!("{request:?}").contains("s3cret-password"));
}

#[rstest]
fn filter_renders_rest_conditions() {
    let filter = Filter::new()
        .eq("id", 7)
        .eq("name", "ada")
        .eq("deleted_at", serde_json::Value::Null);
    assert_eq!(
        filter.to_query_pairs(),
        vec![
            ("deleted_at".to_owned(), "is.null".to_owned()),
            ("id".to_owned(), "eq.7".to_owned()),
            ("name".to_owned(), "eq.ada".to_owned()),
        ]
    );
}

#[rstest]
#[case("users")]
#[case("_private_2")]
fn table_target_accepts_identifiers(#[case] name: &str) {
    let target = TableTarget::new(name).expect("valid identifier");
    assert_eq!(target.table(), name);
    assert_eq!(target.schema(), None);
}

#[rstest]
#[case("users; drop table x")]
#[case("1users")]
#[case("")]
fn table_target_rejects_non_identifiers(#[case] name: &str) {
    assert!(matches!(
        TableTarget::new(name),
        Err(PlatformDomainError::InvalidIdentifier(_))
    ));
}

#[rstest]
fn select_query_defaults_to_all_columns() {
    let query = SelectQuery::new(TableTarget::new("users").expect("valid")).with_limit(5);
    assert_eq!(query.columns(), "*");
    assert_eq!(query.limit(), Some(5));
    assert!(query.filter().is_empty());
}

#[rstest]
#[case("/v1/projects")]
#[case(" /v1/organizations ")]
fn management_request_accepts_relative_paths(#[case] path: &str) {
    let request = ManagementRequest::new(path, HttpMethod::Get, None).expect("valid path");
    assert!(request.path().starts_with("/v1/"));
}

#[rstest]
#[case("v1/projects")]
#[case("//evil.example/v1")]
#[case("/v1/../admin")]
#[case("/redirect?to=https://evil.example")]
fn management_request_rejects_escaping_paths(#[case] path: &str) {
    assert_eq!(
        ManagementRequest::new(path, HttpMethod::Get, None),
        Err(PlatformDomainError::InvalidManagementPath(path.to_owned()))
    );
}

#[rstest]
#[case("", HttpMethod::Get)]
#[case("post", HttpMethod::Post)]
#[case("DELETE", HttpMethod::Delete)]
fn http_method_parses_case_insensitively(#[case] raw: &str, #[case] expected: HttpMethod) {
    assert_eq!(HttpMethod::try_from(raw), Ok(expected));
}

#[rstest]
#[case(json!({ "message": "boom" }), "boom")]
#[case(json!({ "error": "denied" }), "denied")]
#[case(json!({ "msg": "nope" }), "nope")]
#[case(json!("plain text"), "plain text")]
#[case(json!({}), "management API request failed with status 500")]
fn management_response_error_message(#[case] body: serde_json::Value, #[case] expected: &str) {
    let response = ManagementResponse { status: 500, body };
    assert_eq!(response.error_message(), expected);
}
