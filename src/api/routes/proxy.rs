//! Management API pass-through.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::api::{error::ApiError, error::ApiResult, state::AppState};
use crate::credentials::domain::ManagementKey;
use crate::platform::domain::{HttpMethod, ManagementRequest};

/// Header carrying the caller's management key.
pub const MANAGEMENT_KEY_HEADER: &str = "x-supabase-management-key";

#[derive(Debug, Deserialize)]
pub(super) struct ProxyRequest {
    path: Option<String>,
    method: Option<String>,
    body: Option<Value>,
}

pub(super) async fn forward(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ProxyRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let key = headers
        .get(MANAGEMENT_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| ManagementKey::new(value).ok())
        .ok_or_else(|| ApiError::Unauthorized("missing management key".to_owned()))?;
    let Json(proxy) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let path = proxy
        .path
        .ok_or_else(|| ApiError::BadRequest("`path` is required".to_owned()))?;
    let method = HttpMethod::try_from(proxy.method.as_deref().unwrap_or_default())
        .map_err(|err| ApiError::BadRequest(err.to_string()))?;
    let request = ManagementRequest::new(path, method, proxy.body)
        .map_err(|err| ApiError::BadRequest(err.to_string()))?;

    debug!(%method, path = request.path(), "forwarding management request");
    let response = state.management.forward(&key, &request).await?;
    if response.is_success() {
        return Ok(Json(json!({ "data": response.body })).into_response());
    }
    Err(ApiError::Upstream {
        status: StatusCode::from_u16(response.status).unwrap_or(StatusCode::BAD_GATEWAY),
        message: response.error_message(),
    })
}
