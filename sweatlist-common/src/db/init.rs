//! Schema initialization
//!
//! Idempotent `CREATE TABLE IF NOT EXISTS` statements, safe to run on
//! every startup.

use crate::Result;
use sqlx::SqlitePool;

/// Create all tables and indexes if needed
pub async fn create_tables(pool: &SqlitePool) -> Result<()> {
    create_suggestions_table(pool).await?;
    create_quotas_table(pool).await?;
    Ok(())
}

/// Song suggestions submitted by class participants
pub async fn create_suggestions_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS suggestions (
            id TEXT PRIMARY KEY NOT NULL,
            participant_id TEXT NOT NULL,
            instructor_id TEXT NOT NULL,
            class_id TEXT NOT NULL,
            spotify_uri TEXT NOT NULL,
            song_name TEXT NOT NULL,
            artist_name TEXT NOT NULL,
            album_cover_url TEXT,
            suggestion_date TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'pending'
                CHECK (status IN ('pending', 'approved', 'rejected'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Listing sorts newest-first and filters by instructor/class
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_suggestions_date
         ON suggestions(suggestion_date DESC)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_suggestions_instructor
         ON suggestions(instructor_id, suggestion_date DESC)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Monthly suggestion allowance per user, keyed by (user, YYYY-MM).
/// Records are created by seeding only; the service reads and decrements.
pub async fn create_quotas_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS quotas (
            user_id TEXT NOT NULL,
            month_year TEXT NOT NULL,
            total_quota INTEGER NOT NULL CHECK (total_quota >= 0),
            remaining_quota INTEGER NOT NULL CHECK (remaining_quota >= 0),
            PRIMARY KEY (user_id, month_year)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
