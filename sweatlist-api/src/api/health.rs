//! Health and root endpoints

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::error;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
    pub database_status: String,
}

/// GET /health
///
/// Process liveness plus a cheap storage connectivity probe.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database_status = match sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(&state.db)
        .await
    {
        Ok(_) => "connected".to_string(),
        Err(e) => {
            error!("Health check database probe failed: {}", e);
            "error".to_string()
        }
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        module: "sweatlist-api".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database_status,
    })
}

/// GET /
pub async fn read_root() -> Json<Value> {
    Json(json!({ "message": "Welcome to the sweatlist song suggestion API" }))
}

/// Build health routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(read_root))
        .route("/health", get(health_check))
}
