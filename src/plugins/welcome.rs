//! /setwelcome: the captcha prompt template of a chat.

use tracing::info;

use super::{reply, require_admin};
use crate::bot::dispatcher::AppState;
use crate::moderation::ChatMessage;

pub async fn setwelcome_command(state: &AppState, msg: &ChatMessage, args: &str) -> anyhow::Result<()> {
    if !require_admin(state, msg).await {
        return Ok(());
    }

    let template = args.trim();
    if template.is_empty() {
        reply(state, msg, "Please provide a welcome message. Usage: /setwelcome <message>").await;
        return Ok(());
    }

    state.settings.set_welcome_message(msg.chat_id, template).await?;
    info!("Welcome message of chat {} updated by {}", msg.chat_id, msg.sender.id);
    reply(state, msg, &format!("Welcome message updated to: \"{}\"", template)).await;
    Ok(())
}
