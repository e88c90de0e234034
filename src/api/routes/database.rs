//! Assistant database endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde_json::{Value, json};

use crate::api::{error::ApiError, error::ApiResult, state::AppState};
use crate::assistant::DatabaseActionRequest;

pub(super) async fn handle(
    State(state): State<AppState>,
    payload: Result<Json<DatabaseActionRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(request) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    Ok(Json(state.assistant.handle(request).await?))
}

pub(super) async fn context(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let prompt = state.assistant.prompt().await?;
    Ok(Json(json!({ "context": prompt })))
}
