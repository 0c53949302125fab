//! Profanity gate and warning-limit enforcement.

use tracing::{debug, info};

use crate::bot::dispatcher::AppState;
use crate::config::WarnLimitAction;
use crate::gateway::best_effort;
use crate::moderation::ChatMessage;
use crate::utils::{log_to_channel, notify_admins, now_ts};

/// Delete a message containing a listed word and warn its sender.
///
/// Returns the sender's new warning count when a word matched.
pub async fn check_profanity(state: &AppState, msg: &ChatMessage) -> anyhow::Result<Option<i64>> {
    let Some(text) = msg.text.as_deref() else {
        return Ok(None);
    };
    let Some(word) = state.profanity.find(text) else {
        return Ok(None);
    };
    debug!("Matched '{}' in message {} from {}", word, msg.message_id, msg.sender.id);

    best_effort(
        state.gateway.delete_message(msg.chat_id, msg.message_id).await,
        "delete profane message",
    );

    let warnings = state.users.add_warning(msg.sender.id).await?;
    let limit = state.policy.warning_limit;

    let notice = format!(
        "{}, please follow the chat rules. You have been issued a warning ({}/{}).",
        msg.sender.mention(),
        warnings,
        limit
    );
    best_effort(state.gateway.send_message(msg.chat_id, &notice).await, "send warning");
    info!("User {} warned in chat {} ({}/{})", msg.sender.id, msg.chat_id, warnings, limit);

    // Warnings only grow, so equality fires exactly once per user.
    if warnings == limit {
        enforce_limit(state, msg, warnings).await?;
    }

    Ok(Some(warnings))
}

async fn enforce_limit(state: &AppState, msg: &ChatMessage, warnings: i64) -> anyhow::Result<()> {
    let user_id = msg.sender.id;
    let notice = format!(
        "User {} (ID: {}) has reached the warning limit ({}).",
        msg.sender.mention(),
        user_id,
        warnings
    );
    notify_admins(state, &notice).await;

    match state.policy.limit_action {
        WarnLimitAction::Notify => {}
        WarnLimitAction::Mute => {
            let until = now_ts().saturating_add(state.policy.limit_mute_secs);
            state.users.set_mute(user_id, until).await?;
            info!("User {} muted until {} after reaching the warning limit", user_id, until);
        }
        WarnLimitAction::Ban => {
            state.users.set_banned(user_id, true).await?;
            best_effort(state.gateway.ban_member(msg.chat_id, user_id).await, "ban member");
            info!("User {} banned after reaching the warning limit", user_id);
        }
    }

    log_to_channel(state, msg.chat_id, &notice).await;
    Ok(())
}
