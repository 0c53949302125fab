//! SQLite database wrapper.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

use super::StorageError;

/// Database wrapper around a SQLite pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (or create) the database and make sure both tables exist.
    ///
    /// `database_url` is a file path, a `sqlite:` URL, or `:memory:`.
    /// In-memory databases are pinned to a single connection that never
    /// expires, otherwise each pooled connection would see its own empty
    /// database.
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let in_memory = matches!(database_url, ":memory:" | "sqlite::memory:");

        let options = if in_memory {
            SqliteConnectOptions::from_str("sqlite::memory:")?
        } else if database_url.starts_with("sqlite:") {
            SqliteConnectOptions::from_str(database_url)?.create_if_missing(true)
        } else {
            SqliteConnectOptions::new()
                .filename(database_url)
                .create_if_missing(true)
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(if in_memory { 1 } else { 5 })
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        info!("Opened SQLite database at {}", database_url);

        let db = Self { pool };
        db.init_schema().await?;
        Ok(db)
    }

    async fn init_schema(&self) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                user_id INTEGER PRIMARY KEY,
                is_bot BOOLEAN NOT NULL DEFAULT 0,
                first_name TEXT NOT NULL DEFAULT '',
                last_name TEXT,
                username TEXT,
                language_code TEXT,
                join_date INTEGER NOT NULL,
                warnings INTEGER NOT NULL DEFAULT 0,
                is_verified BOOLEAN NOT NULL DEFAULT 0,
                muted_until INTEGER NOT NULL DEFAULT 0,
                banned BOOLEAN NOT NULL DEFAULT 0
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS chat_settings (
                chat_id INTEGER PRIMARY KEY,
                welcome_message TEXT,
                rules TEXT,
                delete_links BOOLEAN NOT NULL DEFAULT 0,
                delete_forwards BOOLEAN NOT NULL DEFAULT 0,
                delete_files BOOLEAN NOT NULL DEFAULT 0,
                log_channel INTEGER
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        info!("Database schema ready");
        Ok(())
    }

    /// Get a reference to the pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
