//! Persistence layer: SQLite schema, row models and repositories.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

pub mod models;
pub mod repositories;

pub type DbPool = sqlx::SqlitePool;

/// Connections kept by the pool.
const MAX_CONNECTIONS: u32 = 8;

/// How long a connection waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Tables in drop order (dependents first). Used by [`reset_schema`].
const TABLES: &[&str] = &[
    "purchased_memberships",
    "memberships",
    "sessions",
    "comments",
    "playlist_entries",
    "playlists",
    "track_metrics",
    "tracks",
    "genres",
    "users",
    "_sqlx_migrations",
];

/// Create a connection pool from a database URL such as `sqlite://soundshelf.db`.
///
/// The database file is created if missing; foreign keys are enforced and the
/// journal runs in WAL mode.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT);

    SqlitePoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect_with(options)
        .await
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations embedded from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Drop every application table and the migration ledger.
///
/// Follow with [`run_migrations`] to recreate the schema and reseed genres.
pub async fn reset_schema(pool: &DbPool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    for table in TABLES {
        sqlx::query(&format!("DROP TABLE IF EXISTS {table}"))
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;
    tracing::info!(tables = TABLES.len(), "Dropped all tables");
    Ok(())
}
