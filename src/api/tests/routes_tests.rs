//! Handler behaviour through an in-process server.

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, StatusCode, header::LOCATION};
use axum_test::TestServer;
use chrono::TimeDelta;
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use url::Url;

use super::ManualClock;
use crate::api::{AppState, MANAGEMENT_KEY_HEADER, OAUTH_STATE_TTL, OAuthUrls, router};
use crate::credentials::{
    adapters::InMemoryKeyValueStore,
    domain::{ConnectionConfig, ManagementKey},
    ports::KeyValueStore,
    services::CredentialVault,
};
use crate::executor::domain::SqlSanitizer;
use crate::platform::{
    adapters::memory::{
        ScriptedConnector, ScriptedDataApi, ScriptedManagementApi, ScriptedOAuthExchange,
    },
    domain::{HttpMethod, ManagementResponse, RemoteError},
    ports::DataApiError,
};
use crate::schema::DEFAULT_CACHE_TTL;
use crate::verification::{NONEXISTENT_TABLE, SENTINEL_TABLE};

const CLIENT_ID: &str = "8f1b2c3d-4e5f-4a6b-9c7d-0e1f2a3b4c5d";

struct Harness {
    server: TestServer,
    vault: CredentialVault<dyn KeyValueStore>,
    management: ScriptedManagementApi,
    oauth: ScriptedOAuthExchange,
    clock: Arc<ManualClock>,
}

fn build(management: ScriptedManagementApi, data: ScriptedDataApi) -> Harness {
    let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryKeyValueStore::new());
    let vault = CredentialVault::new(store);
    let clock = Arc::new(ManualClock::new());
    let oauth = ScriptedOAuthExchange::new(
        "good-code",
        ManagementKey::new("sbp_from_oauth").expect("valid key"),
    );
    let state = AppState::new(
        vault.clone(),
        Arc::new(management.clone()),
        Arc::new(oauth.clone()),
        Arc::new(ScriptedConnector::new(data)),
        OAuthUrls {
            authorize_url: Url::parse("https://api.supabase.com/v1/oauth/authorize")
                .expect("valid url"),
            redirect_url: "http://127.0.0.1:8787/api/supabase-oauth".to_owned(),
        },
        DEFAULT_CACHE_TTL,
        SqlSanitizer::new().expect("denylist compiles"),
    )
    .with_oauth_clock(Arc::clone(&clock) as Arc<_>);
    Harness {
        server: TestServer::new(router(state)).expect("test server"),
        vault,
        management,
        oauth,
        clock,
    }
}

#[fixture]
fn harness() -> Harness {
    build(
        ScriptedManagementApi::new().accepting_only("sbp_valid"),
        ScriptedDataApi::new().with_rpc("version", Ok(json!("PostgreSQL 15.1"))),
    )
}

fn invalid_api_key() -> DataApiError {
    DataApiError::Remote(RemoteError::new(Some(401), None, "Invalid API key"))
}

fn key_header(value: &'static str) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static(MANAGEMENT_KEY_HEADER),
        HeaderValue::from_static(value),
    )
}

fn location(response: &axum_test::TestResponse) -> String {
    response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(ToOwned::to_owned)
        .expect("redirect location")
}

async fn start_oauth(h: &Harness) -> String {
    let response = h
        .server
        .post("/api/supabase-oauth")
        .json(&json!({ "clientId": CLIENT_ID, "clientSecret": "shh" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    let url = Url::parse(body["url"].as_str().expect("url string")).expect("valid url");
    url.query_pairs()
        .find(|(name, _)| name == "state")
        .map(|(_, value)| value.into_owned())
        .expect("state parameter")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn health_reports_ok(harness: Harness) {
    let response = harness.server.get("/health").await;

    response.assert_status_ok();
    response.assert_json(&json!({ "status": "ok" }));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn proxy_requires_a_management_key(harness: Harness) {
    let response = harness
        .server
        .post("/api/supabase")
        .json(&json!({ "path": "/v1/projects" }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert!(response.json::<Value>()["error"].is_string());
}

#[rstest]
#[case(json!({}))]
#[case(json!({ "path": "v1/projects" }))]
#[case(json!({ "path": "/v1/projects", "method": "TRACE" }))]
#[tokio::test(flavor = "multi_thread")]
async fn proxy_rejects_malformed_requests(harness: Harness, #[case] body: Value) {
    let (name, value) = key_header("sbp_valid");

    let response = harness
        .server
        .post("/api/supabase")
        .add_header(name, value)
        .json(&body)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(harness.management.forwarded().is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn proxy_wraps_upstream_data(harness: Harness) {
    let (name, value) = key_header("sbp_valid");

    let response = harness
        .server
        .post("/api/supabase")
        .add_header(name, value)
        .json(&json!({ "path": "/v1/organizations", "method": "get" }))
        .await;

    response.assert_status_ok();
    response.assert_json(&json!({ "data": [] }));
    let forwarded = harness.management.forwarded();
    let request = forwarded.first().expect("one request");
    assert_eq!(request.path(), "/v1/organizations");
    assert_eq!(request.method(), HttpMethod::Get);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn proxy_relays_upstream_errors_with_their_status() {
    let h = build(
        ScriptedManagementApi::new().with_forward_response(ManagementResponse {
            status: 404,
            body: json!({ "message": "Project not found" }),
        }),
        ScriptedDataApi::new(),
    );
    let (name, value) = key_header("sbp_any");

    let response = h
        .server
        .post("/api/supabase")
        .add_header(name, value)
        .json(&json!({ "path": "/v1/projects/missing" }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    response.assert_json(&json!({ "error": "Project not found" }));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_key_is_unauthorized(harness: Harness) {
    let (name, value) = key_header("sbp_stale");

    let response = harness
        .server
        .post("/api/supabase")
        .add_header(name, value)
        .json(&json!({ "path": "/v1/projects" }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn oauth_start_rejects_non_uuid_client_ids(harness: Harness) {
    let response = harness
        .server
        .post("/api/supabase-oauth")
        .json(&json!({ "clientId": "not-a-uuid", "clientSecret": "shh" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(harness.vault.oauth_client().await.expect("vault").is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn oauth_round_trip_stores_the_management_key(harness: Harness) {
    let state = start_oauth(&harness).await;

    let response = harness
        .server
        .get("/api/supabase-oauth")
        .add_query_param("code", "good-code")
        .add_query_param("state", &state)
        .await;

    assert_eq!(location(&response), "/?supabase_connected=true");
    let stored = harness.vault.management_key().await.expect("vault");
    assert_eq!(stored.as_ref().map(ManagementKey::expose), Some("sbp_from_oauth"));
    assert_eq!(harness.oauth.exchanged_codes(), vec!["good-code".to_owned()]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn oauth_state_is_single_use(harness: Harness) {
    let state = start_oauth(&harness).await;
    harness
        .server
        .get("/api/supabase-oauth")
        .add_query_param("code", "good-code")
        .add_query_param("state", &state)
        .await;

    let replay = harness
        .server
        .get("/api/supabase-oauth")
        .add_query_param("code", "good-code")
        .add_query_param("state", &state)
        .await;

    assert!(location(&replay).starts_with("/?supabase_connected=false&error="));
    assert_eq!(harness.oauth.exchanged_codes().len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stale_oauth_state_is_refused(harness: Harness) {
    let state = start_oauth(&harness).await;
    harness.clock.advance(OAUTH_STATE_TTL + TimeDelta::seconds(1));

    let response = harness
        .server
        .get("/api/supabase-oauth")
        .add_query_param("code", "good-code")
        .add_query_param("state", &state)
        .await;

    assert!(location(&response).starts_with("/?supabase_connected=false&error="));
    assert!(harness.oauth.exchanged_codes().is_empty());
    assert!(harness.vault.management_key().await.expect("vault").is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn oauth_provider_errors_redirect_with_the_reason(harness: Harness) {
    let response = harness
        .server
        .get("/api/supabase-oauth")
        .add_query_param("error", "access_denied")
        .await;

    assert_eq!(
        location(&response),
        "/?supabase_connected=false&error=access_denied"
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_code_is_reported_in_the_redirect(harness: Harness) {
    let state = start_oauth(&harness).await;

    let response = harness
        .server
        .get("/api/supabase-oauth")
        .add_query_param("code", "bad-code")
        .add_query_param("state", &state)
        .await;

    assert!(location(&response).starts_with("/?supabase_connected=false&error="));
    assert!(harness.vault.management_key().await.expect("vault").is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn database_endpoint_needs_a_connection(harness: Harness) {
    let response = harness
        .server
        .post("/api/llm-database")
        .json(&json!({ "action": "get_schema" }))
        .await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    assert!(response.json::<Value>()["error"].is_string());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn verified_connection_is_stored_and_usable(harness: Harness) {
    let connect = harness
        .server
        .post("/api/supabase-connection")
        .json(&json!({
            "projectUrl": "https://abcdefghijklmnopqrst.supabase.co",
            "apiKey": "anon-key"
        }))
        .await;
    connect.assert_status_ok();
    assert_eq!(connect.json::<Value>()["status"], json!("verified"));

    let response = harness
        .server
        .post("/api/llm-database")
        .json(&json!({ "action": "get_capabilities" }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["success"], json!(true));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unverifiable_connection_is_not_stored() {
    let h = build(
        ScriptedManagementApi::new(),
        ScriptedDataApi::new()
            .with_rpc("version", Err(invalid_api_key()))
            .with_table(SENTINEL_TABLE, Err(invalid_api_key()))
            .with_table(NONEXISTENT_TABLE, Err(invalid_api_key())),
    );

    let response = h
        .server
        .post("/api/supabase-connection")
        .json(&json!({
            "projectUrl": "https://abcdefghijklmnopqrst.supabase.co",
            "apiKey": "wrong"
        }))
        .await;

    assert!(response.status_code().is_client_error());
    assert!(h.vault.connection().await.expect("vault").is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn context_endpoint_describes_the_connection(harness: Harness) {
    let empty = harness.server.get("/api/llm-database/context").await;
    empty.assert_status_ok();
    assert!(
        empty.json::<Value>()["context"]
            .as_str()
            .is_some_and(|text| text.contains("No database is connected."))
    );

    harness
        .vault
        .save_connection(
            &ConnectionConfig::parse("https://abcdefghijklmnopqrst.supabase.co", "anon-key")
                .expect("valid connection"),
        )
        .await
        .expect("save connection");
    let connected = harness.server.get("/api/llm-database/context").await;

    assert!(
        connected.json::<Value>()["context"]
            .as_str()
            .is_some_and(|text| text.contains("Connected project: https://abcdefghijklmnopqrst.supabase.co"))
    );
}
