//! sweatlist-api library - song suggestion HTTP service
//!
//! Exposes the application state and router for the binary and for
//! integration tests.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::http::HeaderValue;
use axum::Router;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::services::catalog::CatalogClient;

/// Fixed identity standing in for a future authentication collaborator.
#[derive(Debug, Clone)]
pub struct PlaceholderIdentity {
    pub participant_id: String,
    pub instructor_id: String,
}

impl Default for PlaceholderIdentity {
    fn default() -> Self {
        Self {
            participant_id: sweatlist_common::PLACEHOLDER_PARTICIPANT_ID.to_string(),
            instructor_id: sweatlist_common::PLACEHOLDER_INSTRUCTOR_ID.to_string(),
        }
    }
}

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// External catalog client; the token slot lives inside it
    pub catalog: Arc<CatalogClient>,
    /// Placeholder participant/instructor identity
    pub identity: PlaceholderIdentity,
}

impl AppState {
    pub fn new(db: SqlitePool, catalog: CatalogClient) -> Self {
        Self {
            db,
            catalog: Arc::new(catalog),
            identity: PlaceholderIdentity::default(),
        }
    }
}

/// Build application router
///
/// `extra_origin` adds one frontend origin to the CORS allow-list on top
/// of the local development default.
pub fn build_router(state: AppState, extra_origin: Option<String>) -> Router {
    let mut origins: Vec<HeaderValue> = vec![HeaderValue::from_static("http://localhost:3000")];
    if let Some(origin) = extra_origin {
        match origin.parse() {
            Ok(value) => origins.push(value),
            Err(_) => warn!("Ignoring malformed CORS origin: {}", origin),
        }
    }

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(api::suggestion_routes())
        .merge(api::quota_routes())
        .merge(api::catalog_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
