//! Quota endpoint

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use sweatlist_common::db::models::QuotaRecord;
use tracing::info;

use crate::error::ApiResult;
use crate::{db, AppState};

/// GET /quota/:user_id
///
/// Current-month quota record for the user; a zero-valued record when
/// none has been provisioned.
pub async fn get_user_quota(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<QuotaRecord>> {
    info!("Fetching quota for user: {}", user_id);
    let record = db::quotas::get_current_quota(&state.db, &user_id).await?;
    Ok(Json(record))
}

/// Build quota routes
pub fn quota_routes() -> Router<AppState> {
    Router::new().route("/quota/:user_id", get(get_user_quota))
}
