//! Mute and unmute.
//!
//! A mute is only a stored deadline: the gate chain deletes the user's
//! messages until it passes. Telegram restrictions are not touched.

use tracing::info;

use super::{reply, require_admin};
use crate::bot::dispatcher::AppState;
use crate::moderation::ChatMessage;
use crate::utils::{first_arg, log_to_channel, now_ts};

const MUTE_USAGE: &str = "Usage: /mute <time_in_seconds> (reply to a message)";

/// Handle /mute <seconds> as a reply.
pub async fn mute_command(state: &AppState, msg: &ChatMessage, args: &str) -> anyhow::Result<()> {
    if !require_admin(state, msg).await {
        return Ok(());
    }

    let seconds = first_arg(args)
        .and_then(|s| s.parse::<i64>().ok())
        .filter(|s| *s > 0);
    let (Some(target), Some(seconds)) = (msg.reply_target(), seconds) else {
        reply(state, msg, MUTE_USAGE).await;
        return Ok(());
    };

    state.users.upsert(target).await?;
    let until = now_ts().saturating_add(seconds);
    state.users.set_mute(target.id, until).await?;
    info!("User {} muted in chat {} until {}", target.id, msg.chat_id, until);

    reply(state, msg, &format!("User {} has been muted for {} seconds.", target.id, seconds)).await;
    log_to_channel(
        state,
        msg.chat_id,
        &format!("{} muted {} (ID: {}) for {} seconds.", msg.sender.mention(), target.mention(), target.id, seconds),
    )
    .await;
    Ok(())
}

/// Handle /unmute as a reply.
pub async fn unmute_command(state: &AppState, msg: &ChatMessage) -> anyhow::Result<()> {
    if !require_admin(state, msg).await {
        return Ok(());
    }

    let Some(target) = msg.reply_target() else {
        reply(state, msg, "Usage: /unmute (reply to a message)").await;
        return Ok(());
    };

    state.users.upsert(target).await?;
    state.users.set_mute(target.id, 0).await?;
    info!("User {} unmuted in chat {}", target.id, msg.chat_id);

    reply(state, msg, &format!("User {} has been unmuted.", target.id)).await;
    log_to_channel(
        state,
        msg.chat_id,
        &format!("{} unmuted {} (ID: {}).", msg.sender.mention(), target.mention(), target.id),
    )
    .await;
    Ok(())
}
