//! Project connection setup.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::api::{error::ApiError, error::ApiResult, state::AppState};
use crate::credentials::domain::ConnectionConfig;
use crate::verification::Verification;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ConnectRequest {
    project_url: Option<String>,
    api_key: Option<String>,
}

/// Verifies the submitted credentials and stores them when they work.
pub(super) async fn connect(
    State(state): State<AppState>,
    payload: Result<Json<ConnectRequest>, JsonRejection>,
) -> ApiResult<Json<Verification>> {
    let Json(request) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let config = ConnectionConfig::parse(
        request.project_url.unwrap_or_default(),
        request.api_key.unwrap_or_default(),
    )
    .map_err(|err| ApiError::BadRequest(err.to_string()))?;

    let verification = state.verifier.verify_config(&config).await;
    if let Verification::Unverified { reason } = &verification {
        return Err(ApiError::Unprocessable(format!(
            "connection could not be verified: {reason}"
        )));
    }
    state.vault.save_connection(&config).await?;
    info!(project_url = %config.project_url(), "project connection stored");
    Ok(Json(verification))
}

pub(super) async fn disconnect(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    state.vault.clear_connection().await?;
    Ok(Json(json!({ "success": true })))
}
