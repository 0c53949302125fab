//! /report: forward a message to the bot administrators.

use tracing::info;

use super::reply;
use crate::bot::dispatcher::AppState;
use crate::gateway::best_effort;
use crate::moderation::ChatMessage;
use crate::utils::{log_to_channel, notify_admins};

/// Handle /report as a reply. Anyone may report.
pub async fn report_command(state: &AppState, msg: &ChatMessage) -> anyhow::Result<()> {
    let Some(reported) = &msg.reply_to else {
        reply(state, msg, "Please reply to a message to report it.").await;
        return Ok(());
    };

    let author = reported
        .sender
        .as_ref()
        .map_or_else(|| "an unknown sender".to_string(), |s| format!("{} (ID: {})", s.mention(), s.id));

    let mut header = format!(
        "Report from {} (ID: {})\nReported message from {}",
        msg.sender.mention(),
        msg.sender.id,
        author
    );
    if let Some(text) = &reported.text {
        header.push_str(":\n");
        header.push_str(text);
    }

    notify_admins(state, &header).await;
    for admin_id in &state.admin_ids {
        best_effort(
            state
                .gateway
                .forward_message(*admin_id as i64, msg.chat_id, reported.message_id)
                .await,
            "forward reported message",
        );
    }
    info!("Message {} in chat {} reported by {}", reported.message_id, msg.chat_id, msg.sender.id);

    reply(state, msg, "The message has been reported to the administrators.").await;
    log_to_channel(state, msg.chat_id, &header).await;
    Ok(())
}
