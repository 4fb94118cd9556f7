//! Catalog search proxy

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::services::catalog::DEFAULT_SEARCH_LIMIT;
use crate::AppState;

/// Query parameters for GET /spotify/search
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

/// GET /spotify/search?q=
///
/// Proxies track search to the external catalog. The payload is forwarded
/// verbatim; callers get whatever shape the catalog returned.
pub async fn search_tracks(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<Value>> {
    if query.q.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Search query must not be empty".to_string(),
        ));
    }

    info!("Received catalog search request for query: '{}'", query.q);
    let results = state.catalog.search(&query.q, DEFAULT_SEARCH_LIMIT).await?;

    Ok(Json(results))
}

/// Build catalog routes
pub fn catalog_routes() -> Router<AppState> {
    Router::new().route("/spotify/search", get(search_tracks))
}
