//! Event handler system.
//!
//! Join service messages go to [`welcome`]. Every other non-command group
//! message runs through the gate chain in [`moderate`]: banned, muted,
//! content filters, captcha, unverified block, profanity. The first gate
//! that handles a message stops the chain. Commands pass the ban and mute
//! gates ([`security_gate`]) before they run.

pub mod captcha;
pub mod filters;
pub mod profanity;
pub mod welcome;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use tracing::debug;

use crate::bot::dispatcher::AppState;
use crate::database::{BotUser, FilterKind};
use crate::gateway::best_effort;
use crate::moderation::{Attempt, ChatMessage};
use crate::utils::now_ts;

/// Which gate handled a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Sender is banned; nothing happens.
    Banned,
    /// Sender is muted; message deleted.
    Muted,
    /// An enabled content filter deleted the message.
    Filtered(FilterKind),
    /// The message was an answer to a pending captcha.
    Captcha(Attempt),
    /// Sender never passed the captcha; message deleted.
    Unverified,
    /// Message contained a listed word; carries the new warning count.
    Profanity { warnings: i64 },
    Pass,
}

/// Handler for join service messages.
pub fn member_handler() -> UpdateHandler<anyhow::Error> {
    welcome::handler()
}

/// Build the message event handler. Group messages only.
pub fn message_event_handler() -> UpdateHandler<anyhow::Error> {
    dptree::filter(|msg: Message| msg.chat.is_group() || msg.chat.is_supergroup())
        .endpoint(moderate_message)
}

async fn moderate_message(msg: Message, state: AppState) -> anyhow::Result<()> {
    let Some(message) = ChatMessage::from_telegram(&msg) else {
        return Ok(());
    };

    let verdict = moderate(&state, &message).await?;
    debug!(
        "Message {} from {} in chat {}: {:?}",
        message.message_id, message.sender.id, message.chat_id, verdict
    );
    Ok(())
}

/// Ban and mute checks shared by the gate chain and command dispatch.
///
/// Returns the verdict when the sender is stopped here. A muted sender's
/// message is deleted.
pub async fn security_gate(state: &AppState, msg: &ChatMessage) -> anyhow::Result<Option<Verdict>> {
    Ok(admit(state, msg).await?.err())
}

async fn admit(state: &AppState, msg: &ChatMessage) -> anyhow::Result<Result<BotUser, Verdict>> {
    let user = state.users.upsert(&msg.sender).await?;

    if user.banned {
        return Ok(Err(Verdict::Banned));
    }

    if user.is_muted_at(now_ts()) {
        best_effort(
            state.gateway.delete_message(msg.chat_id, msg.message_id).await,
            "delete message of muted user",
        );
        return Ok(Err(Verdict::Muted));
    }

    Ok(Ok(user))
}

/// Run a group message through the gate chain.
pub async fn moderate(state: &AppState, msg: &ChatMessage) -> anyhow::Result<Verdict> {
    let user = match admit(state, msg).await? {
        Ok(user) => user,
        Err(verdict) => return Ok(verdict),
    };

    if let Some(kind) = filters::check_filters(state, msg).await? {
        return Ok(Verdict::Filtered(kind));
    }

    if let Some(attempt) = captcha::check_captcha(state, msg).await? {
        return Ok(Verdict::Captcha(attempt));
    }

    // Other bots never get a captcha, so they are not held to it.
    if !user.is_verified && !user.is_bot {
        best_effort(
            state.gateway.delete_message(msg.chat_id, msg.message_id).await,
            "delete message of unverified user",
        );
        return Ok(Verdict::Unverified);
    }

    if let Some(warnings) = profanity::check_profanity(state, msg).await? {
        return Ok(Verdict::Profanity { warnings });
    }

    Ok(Verdict::Pass)
}
