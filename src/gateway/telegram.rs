//! [`ChatGateway`] backed by a throttled teloxide bot.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{MessageId, ReplyParameters};

use super::{ChatGateway, MemberStatus, TransportError};
use crate::bot::dispatcher::ThrottledBot;

/// Talks to the real Bot API. The Throttle adaptor keeps us inside
/// Telegram's rate limits.
#[derive(Clone)]
pub struct TelegramGateway {
    bot: ThrottledBot,
}

impl TelegramGateway {
    pub fn new(bot: ThrottledBot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl ChatGateway for TelegramGateway {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TransportError> {
        self.bot.send_message(ChatId(chat_id), text).await?;
        Ok(())
    }

    async fn reply_to(&self, chat_id: i64, message_id: i32, text: &str) -> Result<(), TransportError> {
        self.bot
            .send_message(ChatId(chat_id), text)
            .reply_parameters(ReplyParameters::new(MessageId(message_id)))
            .await?;
        Ok(())
    }

    async fn delete_message(&self, chat_id: i64, message_id: i32) -> Result<(), TransportError> {
        self.bot.delete_message(ChatId(chat_id), MessageId(message_id)).await?;
        Ok(())
    }

    async fn forward_message(
        &self,
        to_chat_id: i64,
        from_chat_id: i64,
        message_id: i32,
    ) -> Result<(), TransportError> {
        self.bot
            .forward_message(ChatId(to_chat_id), ChatId(from_chat_id), MessageId(message_id))
            .await?;
        Ok(())
    }

    async fn member_status(&self, chat_id: i64, user_id: u64) -> Result<MemberStatus, TransportError> {
        let member = self.bot.get_chat_member(ChatId(chat_id), UserId(user_id)).await?;
        Ok(MemberStatus::from_kind(&member.kind))
    }

    async fn ban_member(&self, chat_id: i64, user_id: u64) -> Result<(), TransportError> {
        self.bot.ban_chat_member(ChatId(chat_id), UserId(user_id)).await?;
        Ok(())
    }

    async fn unban_member(&self, chat_id: i64, user_id: u64) -> Result<(), TransportError> {
        self.bot.unban_chat_member(ChatId(chat_id), UserId(user_id)).await?;
        Ok(())
    }
}
