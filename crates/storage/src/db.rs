use std::str::FromStr;
use std::time::Duration;

use sqlx::Executor;
use sqlx::sqlite::{self, SqliteConnectOptions, SqlitePool};
use tracing::info;

const SCHEMA: &str = include_str!("../../../sql/schema.sql");

/// Opens (creating if missing) the trading database under
/// `<data_folder>/sqlitedata/` and applies the schema.
pub async fn connect(data_folder: &str) -> Result<SqlitePool, sqlx::Error> {
    let db_dir = format!("{}/sqlitedata", data_folder);
    std::fs::create_dir_all(&db_dir)?;

    let db_filename = format!("{}/trading.db", db_dir);
    info!("opening database {db_filename}");

    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_filename))?
        .create_if_missing(true)
        .journal_mode(sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlite::SqliteSynchronous::Normal)
        .busy_timeout(Duration::from_secs(30))
        .statement_cache_capacity(100);

    let pool = SqlitePool::connect_with(options).await?;
    pool.execute(SCHEMA).await?;
    Ok(pool)
}

/// In-memory database with the same schema, for tests.
///
/// Capped at a single connection: every SQLite `:memory:` connection is
/// its own database, so a larger pool would lose the schema.
pub async fn connect_in_memory() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
    let pool = sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;
    pool.execute(SCHEMA).await?;
    Ok(pool)
}
