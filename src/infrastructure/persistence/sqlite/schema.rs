//! Database connection and schema creation.

use crate::infrastructure::persistence::traits::{RepositoryError, RepositoryResult};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::{debug, info};

/// Opens a pool for `database_url`, creating the database file and the
/// `countries` table if they do not exist.
///
/// `sqlite::memory:` yields a single-connection pool so every query sees the
/// same in-memory database.
///
/// # Errors
///
/// Returns `RepositoryError::Connection` if the URL is invalid or the
/// database cannot be opened, `RepositoryError::Query` if schema creation fails.
pub async fn connect(database_url: &str) -> RepositoryResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| RepositoryError::connection(e.to_string()))?
        .create_if_missing(true);

    let in_memory = database_url.contains(":memory:");
    let mut pool_options = SqlitePoolOptions::new().max_connections(if in_memory { 1 } else { 5 });
    if in_memory {
        pool_options = pool_options.idle_timeout(None).max_lifetime(None);
    }
    let pool = pool_options
        .connect_with(options)
        .await
        .map_err(|e| RepositoryError::connection(e.to_string()))?;

    debug!(database_url, "connected to database");
    create_tables(&pool).await?;
    Ok(pool)
}

async fn create_tables(pool: &SqlitePool) -> RepositoryResult<()> {
    info!("ensuring database schema");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS countries (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            capital TEXT,
            region TEXT,
            population INTEGER NOT NULL,
            currency_code TEXT,
            exchange_rate REAL,
            estimated_gdp REAL,
            flag_url TEXT,
            last_refreshed_at INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| RepositoryError::query(e.to_string()))?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_countries_region ON countries(region COLLATE NOCASE)",
    )
    .execute(pool)
    .await
    .map_err(|e| RepositoryError::query(e.to_string()))?;

    Ok(())
}
