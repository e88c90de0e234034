//! Route table.

mod connection;
mod database;
mod oauth;
mod proxy;

use axum::{
    Json, Router,
    routing::{get, post},
};
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

use super::state::AppState;

pub use proxy::MANAGEMENT_KEY_HEADER;

/// Builds the application router.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/supabase", post(proxy::forward))
        .route("/api/supabase-oauth", post(oauth::start).get(oauth::callback))
        .route(
            "/api/supabase-connection",
            post(connection::connect).delete(connection::disconnect),
        )
        .route("/api/llm-database", post(database::handle))
        .route("/api/llm-database/context", get(database::context))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[expect(clippy::unused_async, reason = "axum handlers are async functions")]
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
