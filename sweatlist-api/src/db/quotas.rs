//! Quota ledger
//!
//! Tracks the monthly suggestion allowance per user. Records are seeded
//! out-of-band; this module only reads and decrements. The decrement is a
//! single guarded UPDATE, so the existence/remaining check and the
//! decrement cannot be interleaved by concurrent reservations: against a
//! record with `remaining = 1`, two racing calls yield exactly one winner.

use sqlx::SqlitePool;
use sweatlist_common::db::models::QuotaRecord;
use sweatlist_common::{time, Error, Result};
use tracing::{debug, warn};

/// Fetch the user's quota record for the current calendar month.
/// An absent record means no allowance, not an error: a zero-valued
/// record is returned.
pub async fn get_current_quota(pool: &SqlitePool, user_id: &str) -> Result<QuotaRecord> {
    let month_year = time::current_month_key();

    let record = sqlx::query_as::<_, QuotaRecord>(
        "SELECT user_id, month_year, total_quota, remaining_quota
         FROM quotas
         WHERE user_id = ? AND month_year = ?",
    )
    .bind(user_id)
    .bind(&month_year)
    .fetch_optional(pool)
    .await?;

    Ok(record.unwrap_or_else(|| QuotaRecord::empty(user_id, month_year)))
}

/// Reserve one unit of the user's allowance for the current month.
///
/// Decrement-if-positive in one statement; zero rows affected covers both
/// "no record provisioned" and "remaining = 0" and fails with
/// `QuotaExhausted`. The caller must not create a suggestion on failure.
pub async fn reserve_one(pool: &SqlitePool, user_id: &str) -> Result<()> {
    let month_year = time::current_month_key();

    let result = sqlx::query(
        "UPDATE quotas
         SET remaining_quota = remaining_quota - 1
         WHERE user_id = ? AND month_year = ? AND remaining_quota > 0",
    )
    .bind(user_id)
    .bind(&month_year)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        warn!(
            "Quota exhausted or not provisioned for user {} in {}",
            user_id, month_year
        );
        return Err(Error::QuotaExhausted);
    }

    debug!("Reserved one suggestion for user {} in {}", user_id, month_year);
    Ok(())
}

/// Return a previously reserved unit. Compensation path only: used when
/// persisting the suggestion fails after `reserve_one` succeeded.
pub async fn release_one(pool: &SqlitePool, user_id: &str) -> Result<()> {
    let month_year = time::current_month_key();

    let result = sqlx::query(
        "UPDATE quotas
         SET remaining_quota = remaining_quota + 1
         WHERE user_id = ? AND month_year = ? AND remaining_quota < total_quota",
    )
    .bind(user_id)
    .bind(&month_year)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::Internal(format!(
            "quota release for user {} in {} found nothing to restore",
            user_id, month_year
        )));
    }

    debug!("Released one suggestion for user {} in {}", user_id, month_year);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sweatlist_common::db::init::create_tables(&pool).await.unwrap();
        pool
    }

    async fn seed_quota(pool: &SqlitePool, user_id: &str, total: i64, remaining: i64) {
        sqlx::query(
            "INSERT INTO quotas (user_id, month_year, total_quota, remaining_quota)
             VALUES (?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(time::current_month_key())
        .bind(total)
        .bind(remaining)
        .execute(pool)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_get_current_quota_defaults_to_zero() {
        let pool = test_pool().await;

        let record = get_current_quota(&pool, "nobody").await.unwrap();
        assert_eq!(record.user_id, "nobody");
        assert_eq!(record.month_year, time::current_month_key());
        assert_eq!(record.total_quota, 0);
        assert_eq!(record.remaining_quota, 0);
    }

    #[tokio::test]
    async fn test_get_current_quota_returns_seeded_record() {
        let pool = test_pool().await;
        seed_quota(&pool, "user123", 5, 3).await;

        let record = get_current_quota(&pool, "user123").await.unwrap();
        assert_eq!(record.total_quota, 5);
        assert_eq!(record.remaining_quota, 3);
    }

    #[tokio::test]
    async fn test_reserve_one_without_record_fails() {
        let pool = test_pool().await;

        let result = reserve_one(&pool, "nobody").await;
        assert!(matches!(result, Err(Error::QuotaExhausted)));
    }

    #[tokio::test]
    async fn test_reserve_one_with_zero_remaining_fails() {
        let pool = test_pool().await;
        seed_quota(&pool, "user123", 5, 0).await;

        let result = reserve_one(&pool, "user123").await;
        assert!(matches!(result, Err(Error::QuotaExhausted)));
    }

    #[tokio::test]
    async fn test_reserve_one_decrements_exactly_once() {
        let pool = test_pool().await;
        seed_quota(&pool, "user123", 5, 2).await;

        reserve_one(&pool, "user123").await.unwrap();
        let record = get_current_quota(&pool, "user123").await.unwrap();
        assert_eq!(record.remaining_quota, 1);

        reserve_one(&pool, "user123").await.unwrap();
        let record = get_current_quota(&pool, "user123").await.unwrap();
        assert_eq!(record.remaining_quota, 0);

        // Allowance spent: further reservations fail
        assert!(matches!(
            reserve_one(&pool, "user123").await,
            Err(Error::QuotaExhausted)
        ));
    }

    #[tokio::test]
    async fn test_release_one_restores_a_reserved_unit() {
        let pool = test_pool().await;
        seed_quota(&pool, "user123", 5, 5).await;

        reserve_one(&pool, "user123").await.unwrap();
        release_one(&pool, "user123").await.unwrap();

        let record = get_current_quota(&pool, "user123").await.unwrap();
        assert_eq!(record.remaining_quota, 5);
    }

    #[tokio::test]
    async fn test_release_one_never_exceeds_total() {
        let pool = test_pool().await;
        seed_quota(&pool, "user123", 5, 5).await;

        let result = release_one(&pool, "user123").await;
        assert!(matches!(result, Err(Error::Internal(_))));

        let record = get_current_quota(&pool, "user123").await.unwrap();
        assert_eq!(record.remaining_quota, 5);
    }
}
