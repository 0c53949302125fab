//! Chat settings repository.
//!
//! Rows are created lazily by the first setter. Each setter upserts only
//! its own column, so setting rules never clobbers the welcome message.

use sqlx::Sqlite;
use tracing::debug;

use crate::cache::{CacheConfig, CacheRegistry, TypedCache};
use super::models::{ChatSettings, FilterKind};
use super::{Database, StorageError};

/// Repository for the `chat_settings` table.
#[derive(Clone)]
pub struct ChatSettingsRepo {
    db: Database,
    cache: TypedCache<i64, ChatSettings>,
}

impl ChatSettingsRepo {
    pub fn new(db: &Database, cache: &CacheRegistry) -> Self {
        Self {
            db: db.clone(),
            cache: cache.get_or_create("chat_settings", CacheConfig::chat_settings()),
        }
    }

    /// Get chat settings, falling back to empty defaults when the chat has
    /// never been configured.
    pub async fn get(&self, chat_id: i64) -> Result<ChatSettings, StorageError> {
        if let Some(settings) = self.cache.get(&chat_id) {
            return Ok(settings);
        }

        let settings = sqlx::query_as::<_, ChatSettings>("SELECT * FROM chat_settings WHERE chat_id = ?")
            .bind(chat_id)
            .fetch_optional(self.db.pool())
            .await?
            .unwrap_or_else(|| ChatSettings::empty(chat_id));

        self.cache.insert(chat_id, settings.clone());
        Ok(settings)
    }

    pub async fn set_welcome_message(&self, chat_id: i64, template: &str) -> Result<(), StorageError> {
        self.upsert_column(chat_id, "welcome_message", template.to_string()).await
    }

    pub async fn set_rules(&self, chat_id: i64, rules: &str) -> Result<(), StorageError> {
        self.upsert_column(chat_id, "rules", rules.to_string()).await
    }

    pub async fn set_filter(&self, chat_id: i64, kind: FilterKind, enabled: bool) -> Result<(), StorageError> {
        self.upsert_column(chat_id, kind.column(), enabled).await
    }

    pub async fn set_log_channel(&self, chat_id: i64, channel_id: i64) -> Result<(), StorageError> {
        self.upsert_column(chat_id, "log_channel", channel_id).await
    }

    async fn upsert_column<T>(&self, chat_id: i64, column: &'static str, value: T) -> Result<(), StorageError>
    where
        T: for<'q> sqlx::Encode<'q, Sqlite> + sqlx::Type<Sqlite> + Send + 'static,
    {
        let sql = format!(
            "INSERT INTO chat_settings (chat_id, {column}) VALUES (?, ?) \
             ON CONFLICT(chat_id) DO UPDATE SET {column} = excluded.{column}"
        );

        sqlx::query(&sql)
            .bind(chat_id)
            .bind(value)
            .execute(self.db.pool())
            .await?;

        self.cache.invalidate(&chat_id);
        debug!("Updated {} for chat {}", column, chat_id);
        Ok(())
    }
}
