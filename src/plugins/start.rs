//! /start and /help.

use teloxide::utils::command::BotCommands;

use super::{Command, reply};
use crate::bot::dispatcher::AppState;
use crate::moderation::ChatMessage;

/// Private chats get a pointer to groups; in groups the command is a no-op.
pub async fn start_command(state: &AppState, msg: &ChatMessage) -> anyhow::Result<()> {
    if !msg.is_group {
        reply(state, msg, "This bot is intended for use in groups.").await;
    }
    Ok(())
}

pub async fn help_command(state: &AppState, msg: &ChatMessage) -> anyhow::Result<()> {
    reply(state, msg, &Command::descriptions().to_string()).await;
    Ok(())
}
