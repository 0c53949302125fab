//! Gateway to the Telegram Bot API.
//!
//! Handlers talk to Telegram only through [`ChatGateway`], so the moderation
//! logic can run against a recording double in tests. Every call is
//! best-effort: failures are logged at the call site and never retried.

mod telegram;
#[cfg(test)]
pub mod recording;

use async_trait::async_trait;
use teloxide::types::ChatMemberKind;
use thiserror::Error;
use tracing::warn;

pub use telegram::TelegramGateway;

/// Failure of a single Bot API call.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("telegram request failed: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[cfg_attr(not(test), allow(dead_code))]
    #[error("request rejected: {0}")]
    Rejected(String),
}

/// Membership status of a user in a chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberStatus {
    Creator,
    Administrator,
    Member,
    Restricted,
    Left,
    Banned,
}

impl MemberStatus {
    pub fn from_kind(kind: &ChatMemberKind) -> Self {
        match kind {
            ChatMemberKind::Owner { .. } => Self::Creator,
            ChatMemberKind::Administrator { .. } => Self::Administrator,
            ChatMemberKind::Member { .. } => Self::Member,
            ChatMemberKind::Restricted { .. } => Self::Restricted,
            ChatMemberKind::Left { .. } => Self::Left,
            ChatMemberKind::Banned { .. } => Self::Banned,
        }
    }

    /// Administrators and the creator are exempt from content filters and
    /// may run moderation commands.
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Creator | Self::Administrator)
    }
}

/// The Bot API operations the moderation core relies on.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TransportError>;

    async fn reply_to(&self, chat_id: i64, message_id: i32, text: &str) -> Result<(), TransportError>;

    async fn delete_message(&self, chat_id: i64, message_id: i32) -> Result<(), TransportError>;

    async fn forward_message(
        &self,
        to_chat_id: i64,
        from_chat_id: i64,
        message_id: i32,
    ) -> Result<(), TransportError>;

    async fn member_status(&self, chat_id: i64, user_id: u64) -> Result<MemberStatus, TransportError>;

    /// Remove a member and keep them from rejoining.
    async fn ban_member(&self, chat_id: i64, user_id: u64) -> Result<(), TransportError>;

    async fn unban_member(&self, chat_id: i64, user_id: u64) -> Result<(), TransportError>;
}

/// Log a failed gateway call and carry on. Returns whether the call succeeded.
pub fn best_effort(result: Result<(), TransportError>, action: &str) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to {}: {}", action, e);
            false
        }
    }
}
