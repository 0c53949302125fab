//! Rules command handlers.

use tracing::info;

use super::{reply, require_admin};
use crate::bot::dispatcher::AppState;
use crate::moderation::ChatMessage;

/// Handle /rules: anyone may read them.
pub async fn rules_command(state: &AppState, msg: &ChatMessage) -> anyhow::Result<()> {
    let settings = state.settings.get(msg.chat_id).await?;
    let text = settings
        .rules
        .as_deref()
        .filter(|r| !r.trim().is_empty())
        .unwrap_or("No rules have been set for this chat yet.");
    reply(state, msg, text).await;
    Ok(())
}

/// Handle /setrules.
pub async fn setrules_command(state: &AppState, msg: &ChatMessage, args: &str) -> anyhow::Result<()> {
    if !require_admin(state, msg).await {
        return Ok(());
    }

    let rules = args.trim();
    if rules.is_empty() {
        reply(state, msg, "Please provide the rules. Usage: /setrules <rules>").await;
        return Ok(());
    }

    state.settings.set_rules(msg.chat_id, rules).await?;
    info!("Rules of chat {} updated by {}", msg.chat_id, msg.sender.id);
    reply(state, msg, &format!("Rules updated to: \"{}\"", rules)).await;
    Ok(())
}
