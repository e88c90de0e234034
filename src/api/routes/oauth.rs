//! OAuth authorisation-code flow.

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    response::Redirect,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, warn};
use url::form_urlencoded;

use crate::api::{error::ApiError, error::ApiResult, state::AppState};
use crate::credentials::domain::OAuthClientCredentials;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct StartRequest {
    client_id: Option<String>,
    client_secret: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct CallbackQuery {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

pub(super) async fn start(
    State(state): State<AppState>,
    payload: Result<Json<StartRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(request) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let credentials = OAuthClientCredentials::new(
        request.client_id.as_deref().unwrap_or_default(),
        request.client_secret.unwrap_or_default(),
    )
    .map_err(|err| ApiError::BadRequest(err.to_string()))?;

    state.vault.save_oauth_client(&credentials).await?;
    let oauth_state = state.issue_oauth_state();
    let url = state
        .oauth_urls
        .authorization_url(&credentials, &oauth_state);
    info!(client_id = %credentials.client_id(), "OAuth flow started");
    Ok(Json(json!({ "url": url.as_str() })))
}

pub(super) async fn callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Redirect {
    match complete(&state, query).await {
        Ok(()) => Redirect::to("/?supabase_connected=true"),
        Err(message) => {
            warn!(error = %message, "OAuth flow failed");
            let encoded: String = form_urlencoded::byte_serialize(message.as_bytes()).collect();
            Redirect::to(&format!("/?supabase_connected=false&error={encoded}"))
        }
    }
}

async fn complete(state: &AppState, query: CallbackQuery) -> Result<(), String> {
    if let Some(error) = query.error {
        return Err(query.error_description.unwrap_or(error));
    }
    let returned_state = query.state.unwrap_or_default();
    if !state.redeem_oauth_state(&returned_state) {
        return Err("invalid or expired OAuth state".to_owned());
    }
    let code = query
        .code
        .filter(|code| !code.trim().is_empty())
        .ok_or_else(|| "missing authorization code".to_owned())?;
    let client = state
        .vault
        .oauth_client()
        .await
        .map_err(|err| err.to_string())?
        .ok_or_else(|| "no OAuth client credentials are stored".to_owned())?;

    let token = state
        .oauth
        .exchange_code(&client, &code, &state.oauth_urls.redirect_url)
        .await
        .map_err(|err| err.to_string())?;
    state
        .vault
        .save_management_key(&token.access_token)
        .await
        .map_err(|err| err.to_string())?;
    info!("OAuth flow completed; management key stored");
    Ok(())
}
