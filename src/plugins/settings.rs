//! Filter toggles and the log channel.

use tracing::info;

use super::{reply, require_admin};
use crate::bot::dispatcher::AppState;
use crate::database::FilterKind;
use crate::moderation::ChatMessage;
use crate::utils::{first_arg, parse_switch};

fn command_name(kind: FilterKind) -> &'static str {
    match kind {
        FilterKind::Links => "deletelinks",
        FilterKind::Forwards => "deleteforwards",
        FilterKind::Files => "deletefiles",
    }
}

/// Handle /deletelinks, /deleteforwards and /deletefiles with `on` or `off`.
pub async fn filter_command(
    state: &AppState,
    msg: &ChatMessage,
    kind: FilterKind,
    args: &str,
) -> anyhow::Result<()> {
    if !require_admin(state, msg).await {
        return Ok(());
    }

    let Some(enabled) = first_arg(args).and_then(parse_switch) else {
        reply(state, msg, &format!("Usage: /{} <on/off>", command_name(kind))).await;
        return Ok(());
    };

    state.settings.set_filter(msg.chat_id, kind, enabled).await?;
    let status = if enabled { "enabled" } else { "disabled" };
    info!("{:?} filter {} in chat {}", kind, status, msg.chat_id);

    reply(state, msg, &format!("{} is now {}.", kind.description(), status)).await;
    Ok(())
}

/// Handle /setlogchannel <channel_id>.
pub async fn setlogchannel_command(state: &AppState, msg: &ChatMessage, args: &str) -> anyhow::Result<()> {
    if !require_admin(state, msg).await {
        return Ok(());
    }

    let Some(channel_id) = first_arg(args).and_then(|a| a.parse::<i64>().ok()) else {
        reply(
            state,
            msg,
            "Please provide a valid channel ID. Usage: /setlogchannel <channel_id>",
        )
        .await;
        return Ok(());
    };

    state.settings.set_log_channel(msg.chat_id, channel_id).await?;
    info!("Log channel of chat {} set to {}", msg.chat_id, channel_id);
    reply(state, msg, &format!("Log channel updated to: {}", channel_id)).await;
    Ok(())
}
