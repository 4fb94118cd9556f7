//! Database access layer
//!
//! SQLite via sqlx. The service owns two tables, `suggestions` and
//! `quotas`; schema creation is idempotent and runs at startup.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

pub mod init;
pub mod models;
pub mod seed;

/// Open (or create) the database and prepare the schema.
///
/// Storage is fatal at startup: a failure here propagates out of `main`.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    configure_connection(&pool).await?;
    init::create_tables(&pool).await?;

    Ok(pool)
}

/// Apply connection pragmas: foreign keys, WAL for concurrent readers
/// with one writer, busy timeout so concurrent writers queue instead of
/// failing immediately.
pub async fn configure_connection(pool: &SqlitePool) -> Result<()> {
    sqlx::query("PRAGMA foreign_keys = ON").execute(pool).await?;
    sqlx::query("PRAGMA journal_mode = WAL").execute(pool).await?;
    sqlx::query("PRAGMA busy_timeout = 5000").execute(pool).await?;
    Ok(())
}
