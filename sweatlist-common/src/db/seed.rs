//! Demo data seeding
//!
//! Quota records are provisioned out-of-band: the service itself never
//! creates one. Seeding at startup is that provisioning step for the
//! placeholder identity, plus a handful of sample suggestions so a fresh
//! install has something to review. Both operations are idempotent.

use crate::db::models::SuggestionStatus;
use crate::time;
use crate::Result;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{info, warn};
use uuid::Uuid;

/// Default monthly allowance for a seeded user
pub const DEFAULT_MONTHLY_QUOTA: i64 = 5;

/// Seed the placeholder participant's quota and sample suggestions.
/// Failures are logged and swallowed; a missing seed degrades the demo,
/// it must not block startup.
pub async fn seed_demo_data(pool: &SqlitePool) {
    if let Err(e) = ensure_quota_record(pool, crate::PLACEHOLDER_PARTICIPANT_ID, DEFAULT_MONTHLY_QUOTA).await
    {
        warn!("Quota seeding failed: {}", e);
    }
    if let Err(e) = ensure_sample_suggestions(pool, crate::PLACEHOLDER_INSTRUCTOR_ID).await {
        warn!("Sample suggestion seeding failed: {}", e);
    }
}

/// Ensure a quota record exists for the user in the current month.
/// Existing records are left untouched, including their remaining count.
pub async fn ensure_quota_record(pool: &SqlitePool, user_id: &str, amount: i64) -> Result<()> {
    let month_year = time::current_month_key();

    let existing: Option<(i64,)> = sqlx::query_as(
        "SELECT total_quota FROM quotas WHERE user_id = ? AND month_year = ?",
    )
    .bind(user_id)
    .bind(&month_year)
    .fetch_optional(pool)
    .await?;

    if existing.is_some() {
        info!("Quota record already exists for user {} in {}", user_id, month_year);
        return Ok(());
    }

    sqlx::query(
        "INSERT INTO quotas (user_id, month_year, total_quota, remaining_quota)
         VALUES (?, ?, ?, ?)",
    )
    .bind(user_id)
    .bind(&month_year)
    .bind(amount)
    .bind(amount)
    .execute(pool)
    .await?;

    info!(
        "Created quota record for user {} with {} suggestions for {}",
        user_id, amount, month_year
    );
    Ok(())
}

/// Ensure sample suggestions exist for the instructor. Skipped entirely
/// when the instructor already has any suggestions.
pub async fn ensure_sample_suggestions(pool: &SqlitePool, instructor_id: &str) -> Result<()> {
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM suggestions WHERE instructor_id = ?")
            .bind(instructor_id)
            .fetch_one(pool)
            .await?;

    if count > 0 {
        info!(
            "Found {} existing suggestions for instructor {}",
            count, instructor_id
        );
        return Ok(());
    }

    let samples: [(&str, &str, &str, &str, SuggestionStatus); 3] = [
        (
            "spotify:track:4iJyoBOLtHqaGxP12qzhQI",
            "Blinding Lights",
            "The Weeknd",
            "https://i.scdn.co/image/ab67616d0000b2738863bc11d2aa12b54f5aeb36",
            SuggestionStatus::Pending,
        ),
        (
            "spotify:track:6UelLqGlWMcVH1E5c4H7lY",
            "Watermelon Sugar",
            "Harry Styles",
            "https://i.scdn.co/image/ab67616d0000b273da5d5aeeabacacc1263c0f4b",
            SuggestionStatus::Approved,
        ),
        (
            "spotify:track:0E4Y1XIbs8GrAT1YqVy6dq",
            "Don't Start Now",
            "Dua Lipa",
            "https://i.scdn.co/image/ab67616d0000b2734d4cdef17fc2ce7289ece9fc",
            SuggestionStatus::Rejected,
        ),
    ];

    let now: DateTime<Utc> = time::now();
    for (uri, song, artist, cover, status) in samples {
        sqlx::query(
            "INSERT INTO suggestions
             (id, participant_id, instructor_id, class_id, spotify_uri,
              song_name, artist_name, album_cover_url, suggestion_date, status)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(crate::PLACEHOLDER_PARTICIPANT_ID)
        .bind(instructor_id)
        .bind(crate::PLACEHOLDER_CLASS_ID)
        .bind(uri)
        .bind(song)
        .bind(artist)
        .bind(cover)
        .bind(now)
        .bind(status)
        .execute(pool)
        .await?;
    }

    info!("Created 3 sample suggestions for instructor {}", instructor_id);
    Ok(())
}
