//! Suggestion endpoints: submit, list, review

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use serde::Deserialize;
use sweatlist_common::db::models::{ReviewStatus, SuggestionRecord, SuggestionStatus};
use tracing::{error, info};
use uuid::Uuid;

use crate::db::suggestions::{NewSuggestion, SuggestionFilter};
use crate::error::{ApiError, ApiResult};
use crate::{db, AppState};

/// Request body for POST /suggestions
#[derive(Debug, Deserialize)]
pub struct CreateSuggestionRequest {
    pub spotify_uri: String,
    pub song_name: String,
    pub artist_name: String,
    #[serde(default)]
    pub album_cover_url: Option<String>,
    pub class_id: String,
}

/// Query parameters for GET /suggestions
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub instructor_id: Option<String>,
    pub class_id: Option<String>,
    pub status: Option<String>,
}

/// Request body for PATCH /suggestions/:id. `pending` is not accepted.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: ReviewStatus,
}

/// POST /suggestions
///
/// Quota reservation runs BEFORE the insert as one atomic
/// decrement-if-positive, so a suggestion can never be persisted without
/// allowance and the allowance is spent exactly once per stored record.
/// If the insert fails after a successful reservation, the unit is
/// released again; a failed release leaves the ledger short by one and is
/// logged at ERROR severity for operational follow-up.
pub async fn create_suggestion(
    State(state): State<AppState>,
    Json(body): Json<CreateSuggestionRequest>,
) -> ApiResult<(StatusCode, Json<SuggestionRecord>)> {
    let participant_id = state.identity.participant_id.clone();
    info!(
        "Received suggestion from participant {} for class {}",
        participant_id, body.class_id
    );

    db::quotas::reserve_one(&state.db, &participant_id).await?;

    let new = NewSuggestion {
        participant_id: participant_id.clone(),
        instructor_id: state.identity.instructor_id.clone(),
        class_id: body.class_id,
        spotify_uri: body.spotify_uri,
        song_name: body.song_name,
        artist_name: body.artist_name,
        album_cover_url: body.album_cover_url,
    };

    match db::suggestions::create(&state.db, new).await {
        Ok(record) => {
            info!("Suggestion {} created successfully", record.id);
            Ok((StatusCode::CREATED, Json(record)))
        }
        Err(e) => {
            error!(
                "Failed to persist suggestion after reserving quota for user {}: {}",
                participant_id, e
            );
            if let Err(release_err) = db::quotas::release_one(&state.db, &participant_id).await {
                error!(
                    "Quota inconsistency: release failed for user {} after persist failure: {}",
                    participant_id, release_err
                );
            }
            Err(e.into())
        }
    }
}

/// GET /suggestions?instructor_id=&class_id=&status=
///
/// Filters are AND-combined; an unrecognized status value is ignored
/// rather than rejected, behaving as if no status filter were applied.
pub async fn list_suggestions(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<SuggestionRecord>>> {
    let filter = SuggestionFilter {
        instructor_id: query.instructor_id,
        class_id: query.class_id,
        status: query.status.as_deref().and_then(SuggestionStatus::parse),
    };

    info!("Fetching suggestions with filter: {:?}", filter);
    let records = db::suggestions::list(&state.db, &filter).await?;
    Ok(Json(records))
}

/// PATCH /suggestions/:id
pub async fn update_suggestion_status(
    State(state): State<AppState>,
    Path(suggestion_id): Path<String>,
    Json(body): Json<UpdateStatusRequest>,
) -> ApiResult<Json<SuggestionRecord>> {
    // Validate id format before hitting storage
    Uuid::parse_str(&suggestion_id).map_err(|_| {
        ApiError::BadRequest(format!("Invalid suggestion ID format: {}", suggestion_id))
    })?;

    info!(
        "Updating suggestion {} to status {:?}",
        suggestion_id, body.status
    );
    let record = db::suggestions::update_status(&state.db, &suggestion_id, body.status).await?;
    Ok(Json(record))
}

/// Build suggestion routes
pub fn suggestion_routes() -> Router<AppState> {
    Router::new()
        .route("/suggestions", get(list_suggestions).post(create_suggestion))
        .route("/suggestions/:id", patch(update_suggestion_status))
}
