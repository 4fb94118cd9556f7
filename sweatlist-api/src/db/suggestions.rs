//! Suggestion store
//!
//! Persists and retrieves song suggestion records. Records are created
//! once with status `pending` and never deleted; the only mutation is the
//! status update.

use sqlx::SqlitePool;
use sweatlist_common::db::models::{ReviewStatus, SuggestionRecord, SuggestionStatus};
use sweatlist_common::{time, Error, Result};
use tracing::debug;
use uuid::Uuid;

/// Listing is capped for safety; there is no pagination beyond this.
pub const LIST_CAP: i64 = 100;

/// Input for creating a suggestion. Identity, timestamp and status are
/// assigned by the store.
#[derive(Debug, Clone)]
pub struct NewSuggestion {
    pub participant_id: String,
    pub instructor_id: String,
    pub class_id: String,
    pub spotify_uri: String,
    pub song_name: String,
    pub artist_name: String,
    pub album_cover_url: Option<String>,
}

/// AND-combined listing filter; `None` fields impose no constraint.
#[derive(Debug, Clone, Default)]
pub struct SuggestionFilter {
    pub instructor_id: Option<String>,
    pub class_id: Option<String>,
    pub status: Option<SuggestionStatus>,
}

/// Persist a new suggestion and return the stored record, including the
/// generated identity and timestamp.
pub async fn create(pool: &SqlitePool, new: NewSuggestion) -> Result<SuggestionRecord> {
    let record = SuggestionRecord {
        id: Uuid::new_v4().to_string(),
        participant_id: new.participant_id,
        instructor_id: new.instructor_id,
        class_id: new.class_id,
        spotify_uri: new.spotify_uri,
        song_name: new.song_name,
        artist_name: new.artist_name,
        album_cover_url: new.album_cover_url,
        suggestion_date: time::now(),
        status: SuggestionStatus::Pending,
    };

    sqlx::query(
        "INSERT INTO suggestions
         (id, participant_id, instructor_id, class_id, spotify_uri,
          song_name, artist_name, album_cover_url, suggestion_date, status)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&record.id)
    .bind(&record.participant_id)
    .bind(&record.instructor_id)
    .bind(&record.class_id)
    .bind(&record.spotify_uri)
    .bind(&record.song_name)
    .bind(&record.artist_name)
    .bind(&record.album_cover_url)
    .bind(record.suggestion_date)
    .bind(record.status)
    .execute(pool)
    .await?;

    debug!("Suggestion {} created", record.id);
    Ok(record)
}

/// List suggestions matching the filter, newest first, capped at
/// [`LIST_CAP`] records.
pub async fn list(pool: &SqlitePool, filter: &SuggestionFilter) -> Result<Vec<SuggestionRecord>> {
    let records = sqlx::query_as::<_, SuggestionRecord>(
        "SELECT id, participant_id, instructor_id, class_id, spotify_uri,
                song_name, artist_name, album_cover_url, suggestion_date, status
         FROM suggestions
         WHERE (?1 IS NULL OR instructor_id = ?1)
           AND (?2 IS NULL OR class_id = ?2)
           AND (?3 IS NULL OR status = ?3)
         ORDER BY suggestion_date DESC
         LIMIT ?4",
    )
    .bind(&filter.instructor_id)
    .bind(&filter.class_id)
    .bind(filter.status)
    .bind(LIST_CAP)
    .fetch_all(pool)
    .await?;

    Ok(records)
}

/// Fetch a single suggestion by id
pub async fn fetch_by_id(pool: &SqlitePool, id: &str) -> Result<Option<SuggestionRecord>> {
    let record = sqlx::query_as::<_, SuggestionRecord>(
        "SELECT id, participant_id, instructor_id, class_id, spotify_uri,
                song_name, artist_name, album_cover_url, suggestion_date, status
         FROM suggestions
         WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}

/// Set a suggestion's status to approved or rejected and return the full
/// updated record. Fails with `NotFound` when the id does not exist.
///
/// The current status is deliberately not checked: an already-decided
/// suggestion can be re-decided (see DESIGN.md, open question 2).
pub async fn update_status(
    pool: &SqlitePool,
    id: &str,
    new_status: ReviewStatus,
) -> Result<SuggestionRecord> {
    let status: SuggestionStatus = new_status.into();

    let result = sqlx::query("UPDATE suggestions SET status = ? WHERE id = ?")
        .bind(status)
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!(
            "Suggestion with ID {} not found",
            id
        )));
    }

    fetch_by_id(pool, id).await?.ok_or_else(|| {
        Error::Internal(format!("Suggestion {} vanished after status update", id))
    })
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

    fn sample(class_id: &str) -> NewSuggestion {
        NewSuggestion {
            participant_id: "user123".to_string(),
            instructor_id: "instructor456".to_string(),
            class_id: class_id.to_string(),
            spotify_uri: "spotify:track:0VjIjW4GlUZAMYd2vXMi3b".to_string(),
            song_name: "Blinding Lights".to_string(),
            artist_name: "The Weeknd".to_string(),
            album_cover_url: None,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_identity_and_pending_status() {
        let pool = test_pool().await;

        let record = create(&pool, sample("class789")).await.unwrap();
        assert!(!record.id.is_empty());
        assert_eq!(record.status, SuggestionStatus::Pending);
        assert_eq!(record.song_name, "Blinding Lights");
    }

    #[tokio::test]
    async fn test_create_then_list_round_trip() {
        let pool = test_pool().await;

        let created = create(&pool, sample("class789")).await.unwrap();
        let listed = list(
            &pool,
            &SuggestionFilter {
                instructor_id: Some("instructor456".to_string()),
                class_id: Some("class789".to_string()),
                status: Some(SuggestionStatus::Pending),
            },
        )
        .await
        .unwrap();

        assert_eq!(listed.len(), 1);
        let stored = &listed[0];
        assert_eq!(stored.id, created.id);
        assert_eq!(stored.spotify_uri, created.spotify_uri);
        assert_eq!(stored.song_name, created.song_name);
        assert_eq!(stored.artist_name, created.artist_name);
        assert_eq!(stored.album_cover_url, created.album_cover_url);
        assert_eq!(stored.status, created.status);
        assert_eq!(
            stored.suggestion_date.timestamp_millis(),
            created.suggestion_date.timestamp_millis()
        );
    }

    #[tokio::test]
    async fn test_list_filters_are_and_combined() {
        let pool = test_pool().await;
        create(&pool, sample("class789")).await.unwrap();
        create(&pool, sample("class999")).await.unwrap();

        let all = list(&pool, &SuggestionFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);

        let one_class = list(
            &pool,
            &SuggestionFilter {
                class_id: Some("class999".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(one_class.len(), 1);
        assert_eq!(one_class[0].class_id, "class999");

        let mismatched = list(
            &pool,
            &SuggestionFilter {
                class_id: Some("class999".to_string()),
                status: Some(SuggestionStatus::Approved),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(mismatched.is_empty());
    }

    #[tokio::test]
    async fn test_list_orders_newest_first() {
        let pool = test_pool().await;

        // Distinct stored timestamps so the DESC sort is observable
        for (i, name) in ["first", "second", "third"].iter().enumerate() {
            let mut new = sample("class789");
            new.song_name = name.to_string();
            let mut record = create(&pool, new).await.unwrap();
            record.suggestion_date = record.suggestion_date + chrono::Duration::seconds(i as i64);
            sqlx::query("UPDATE suggestions SET suggestion_date = ? WHERE id = ?")
                .bind(record.suggestion_date)
                .bind(&record.id)
                .execute(&pool)
                .await
                .unwrap();
        }

        let listed = list(&pool, &SuggestionFilter::default()).await.unwrap();
        let names: Vec<&str> = listed.iter().map(|r| r.song_name.as_str()).collect();
        assert_eq!(names, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn test_update_status_unknown_id_is_not_found() {
        let pool = test_pool().await;

        let result = update_status(&pool, "missing-id", ReviewStatus::Approved).await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_status_returns_updated_record() {
        let pool = test_pool().await;
        let created = create(&pool, sample("class789")).await.unwrap();

        let updated = update_status(&pool, &created.id, ReviewStatus::Approved)
            .await
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.status, SuggestionStatus::Approved);

        // Visible on next fetch
        let fetched = fetch_by_id(&pool, &created.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, SuggestionStatus::Approved);
    }

    #[tokio::test]
    async fn test_update_status_allows_re_deciding() {
        let pool = test_pool().await;
        let created = create(&pool, sample("class789")).await.unwrap();

        update_status(&pool, &created.id, ReviewStatus::Approved)
            .await
            .unwrap();
        let re_decided = update_status(&pool, &created.id, ReviewStatus::Rejected)
            .await
            .unwrap();
        assert_eq!(re_decided.status, SuggestionStatus::Rejected);
    }
}
