//! Manual verification and warning lookup.

use tracing::info;

use super::{reply, require_admin};
use crate::bot::dispatcher::AppState;
use crate::moderation::ChatMessage;
use crate::utils::log_to_channel;

/// Handle /verify: verify the replied user, or the admin themselves.
///
/// This is the way out for members whose captcha was lost on restart, and
/// for members who were in the chat before the bot.
pub async fn verify_command(state: &AppState, msg: &ChatMessage) -> anyhow::Result<()> {
    if !require_admin(state, msg).await {
        return Ok(());
    }

    let target = msg.reply_target().unwrap_or(&msg.sender);
    state.users.upsert(target).await?;
    state.users.set_verified(target.id, true).await?;
    state.captchas.clear(target.id);
    info!("User {} verified in chat {} by {}", target.id, msg.chat_id, msg.sender.id);

    reply(state, msg, &format!("User {} has been verified.", target.id)).await;
    log_to_channel(
        state,
        msg.chat_id,
        &format!("{} verified {} (ID: {}).", msg.sender.mention(), target.mention(), target.id),
    )
    .await;
    Ok(())
}

/// Handle /warns: warning count of the replied user, or the sender.
pub async fn warns_command(state: &AppState, msg: &ChatMessage) -> anyhow::Result<()> {
    let target = msg.reply_target().unwrap_or(&msg.sender);
    let warnings = state.users.get(target.id).await?.map_or(0, |u| u.warnings);

    reply(
        state,
        msg,
        &format!("{} has {}/{} warnings.", target.mention(), warnings, state.policy.warning_limit),
    )
    .await;
    Ok(())
}
