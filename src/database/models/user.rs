//! User model: Telegram profile data plus moderation state.

use serde::{Deserialize, Serialize};
use teloxide::types::User;

/// Profile fields as observed on a message or join event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: u64,
    pub is_bot: bool,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub language_code: Option<String>,
}

impl UserProfile {
    /// Create a profile from a Telegram User.
    pub fn from_telegram(user: &User) -> Self {
        Self {
            id: user.id.0,
            is_bot: user.is_bot,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            username: user.username.clone(),
            language_code: user.language_code.clone(),
        }
    }

    /// @username if the user has one, otherwise the first name.
    pub fn mention(&self) -> String {
        match &self.username {
            Some(u) => format!("@{}", u),
            None => self.first_name.clone(),
        }
    }
}

/// A row of the `users` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct BotUser {
    pub user_id: i64,
    pub is_bot: bool,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub language_code: Option<String>,
    /// Unix timestamp of the first sighting.
    pub join_date: i64,
    pub warnings: i64,
    pub is_verified: bool,
    /// Unix timestamp; 0 means never muted.
    pub muted_until: i64,
    pub banned: bool,
}

impl BotUser {
    /// Effective mute: the stored timestamp is still in the future.
    pub fn is_muted_at(&self, now: i64) -> bool {
        self.muted_until > now
    }

    /// Check if profile data differs from a fresh observation.
    /// Moderation columns are not compared.
    pub fn has_changed(&self, profile: &UserProfile) -> bool {
        self.first_name != profile.first_name
            || self.last_name != profile.last_name
            || self.username != profile.username
    }
}
