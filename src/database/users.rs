//! User repository with cache-first reads.
//!
//! Every operation touches a single row and auto-commits. Writes invalidate
//! the cached row so the next read sees the stored state.

use chrono::Utc;
use tracing::debug;

use crate::cache::{CacheConfig, CacheRegistry, TypedCache};
use super::models::{BotUser, UserProfile};
use super::{Database, StorageError};

/// Repository for the `users` table.
#[derive(Clone)]
pub struct UserRepo {
    db: Database,
    cache: TypedCache<u64, BotUser>,
}

impl UserRepo {
    /// Create a new UserRepo with caching.
    pub fn new(db: &Database, cache: &CacheRegistry) -> Self {
        Self {
            db: db.clone(),
            cache: cache.get_or_create("users_by_id", CacheConfig::message_context()),
        }
    }

    /// Get user by ID.
    pub async fn get(&self, user_id: u64) -> Result<Option<BotUser>, StorageError> {
        if let Some(user) = self.cache.get(&user_id) {
            return Ok(Some(user));
        }

        let user = sqlx::query_as::<_, BotUser>("SELECT * FROM users WHERE user_id = ?")
            .bind(user_id as i64)
            .fetch_optional(self.db.pool())
            .await?;

        if let Some(u) = &user {
            self.cache.insert(user_id, u.clone());
        }

        Ok(user)
    }

    /// Insert a new user, or refresh the profile columns of an existing one.
    ///
    /// Moderation columns (warnings, verification, mute, ban) are never
    /// touched here. Returns the stored row.
    pub async fn upsert(&self, profile: &UserProfile) -> Result<BotUser, StorageError> {
        // Skip unnecessary writes
        if let Some(cached) = self.cache.get(&profile.id)
            && !cached.has_changed(profile)
        {
            return Ok(cached);
        }

        let user = sqlx::query_as::<_, BotUser>(
            r#"
            INSERT INTO users (user_id, is_bot, first_name, last_name, username, language_code, join_date)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                first_name = excluded.first_name,
                last_name = excluded.last_name,
                username = excluded.username
            RETURNING *
            "#,
        )
        .bind(profile.id as i64)
        .bind(profile.is_bot)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.username)
        .bind(&profile.language_code)
        .bind(Utc::now().timestamp())
        .fetch_one(self.db.pool())
        .await?;

        self.cache.insert(profile.id, user.clone());
        debug!("Upserted user {} ({:?})", profile.id, profile.username);
        Ok(user)
    }

    pub async fn set_verified(&self, user_id: u64, verified: bool) -> Result<(), StorageError> {
        let result = sqlx::query("UPDATE users SET is_verified = ? WHERE user_id = ?")
            .bind(verified)
            .bind(user_id as i64)
            .execute(self.db.pool())
            .await?;
        self.finish_update(user_id, result.rows_affected())
    }

    /// Add one warning and return the new count.
    ///
    /// The increment and read happen in one statement, so concurrent
    /// warnings never lose updates.
    pub async fn add_warning(&self, user_id: u64) -> Result<i64, StorageError> {
        let count: Option<i64> = sqlx::query_scalar(
            "UPDATE users SET warnings = warnings + 1 WHERE user_id = ? RETURNING warnings",
        )
        .bind(user_id as i64)
        .fetch_optional(self.db.pool())
        .await?;

        self.cache.invalidate(&user_id);
        count.ok_or(StorageError::UserNotFound(user_id))
    }

    /// Set the mute deadline (unix seconds). 0 lifts the mute.
    pub async fn set_mute(&self, user_id: u64, until: i64) -> Result<(), StorageError> {
        let result = sqlx::query("UPDATE users SET muted_until = ? WHERE user_id = ?")
            .bind(until)
            .bind(user_id as i64)
            .execute(self.db.pool())
            .await?;
        self.finish_update(user_id, result.rows_affected())
    }

    pub async fn set_banned(&self, user_id: u64, banned: bool) -> Result<(), StorageError> {
        let result = sqlx::query("UPDATE users SET banned = ? WHERE user_id = ?")
            .bind(banned)
            .bind(user_id as i64)
            .execute(self.db.pool())
            .await?;
        self.finish_update(user_id, result.rows_affected())
    }

    fn finish_update(&self, user_id: u64, rows: u64) -> Result<(), StorageError> {
        self.cache.invalidate(&user_id);
        if rows == 0 {
            return Err(StorageError::UserNotFound(user_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(id: u64, first_name: &str) -> UserProfile {
        UserProfile {
            id,
            is_bot: false,
            first_name: first_name.to_string(),
            last_name: None,
            username: None,
            language_code: Some("en".to_string()),
        }
    }

    async fn repo() -> UserRepo {
        let db = Database::connect(":memory:").await.expect("in-memory database");
        UserRepo::new(&db, &CacheRegistry::new())
    }

    #[tokio::test]
    async fn unknown_user_is_absent() {
        let repo = repo().await;
        assert!(repo.get(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn new_user_starts_clean() {
        let repo = repo().await;
        let user = repo.upsert(&profile(5, "Eve")).await.unwrap();

        assert_eq!(user.user_id, 5);
        assert_eq!(user.warnings, 0);
        assert!(!user.is_verified);
        assert_eq!(user.muted_until, 0);
        assert!(!user.banned);
        assert!(user.join_date > 0);
    }

    #[tokio::test]
    async fn reobserving_keeps_moderation_state() {
        let repo = repo().await;
        repo.upsert(&profile(5, "Eve")).await.unwrap();
        repo.set_verified(5, true).await.unwrap();
        repo.add_warning(5).await.unwrap();
        repo.set_mute(5, 9_999_999_999).await.unwrap();
        repo.set_banned(5, true).await.unwrap();

        let mut renamed = profile(5, "Evelyn");
        renamed.username = Some("evelyn".into());
        let user = repo.upsert(&renamed).await.unwrap();

        assert_eq!(user.first_name, "Evelyn");
        assert_eq!(user.username.as_deref(), Some("evelyn"));
        assert!(user.is_verified);
        assert_eq!(user.warnings, 1);
        assert_eq!(user.muted_until, 9_999_999_999);
        assert!(user.banned);
    }

    #[tokio::test]
    async fn warnings_count_up_per_user() {
        let repo = repo().await;
        repo.upsert(&profile(1, "A")).await.unwrap();
        repo.upsert(&profile(2, "B")).await.unwrap();

        for expected in 1..=4 {
            assert_eq!(repo.add_warning(1).await.unwrap(), expected);
            if expected % 2 == 0 {
                repo.add_warning(2).await.unwrap();
            }
        }

        assert_eq!(repo.get(1).await.unwrap().unwrap().warnings, 4);
        assert_eq!(repo.get(2).await.unwrap().unwrap().warnings, 2);
    }

    #[tokio::test]
    async fn writes_are_visible_through_the_cache() {
        let repo = repo().await;
        repo.upsert(&profile(3, "C")).await.unwrap();
        assert!(!repo.get(3).await.unwrap().unwrap().is_verified);

        repo.set_verified(3, true).await.unwrap();
        assert!(repo.get(3).await.unwrap().unwrap().is_verified);

        repo.set_mute(3, 0).await.unwrap();
        repo.set_banned(3, false).await.unwrap();
        assert!(!repo.get(3).await.unwrap().unwrap().banned);
    }

    #[tokio::test]
    async fn writes_to_missing_users_fail() {
        let repo = repo().await;
        assert!(matches!(repo.add_warning(9).await, Err(StorageError::UserNotFound(9))));
        assert!(matches!(repo.set_banned(9, true).await, Err(StorageError::UserNotFound(9))));
    }
}
