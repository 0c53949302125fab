//! Fan-out of moderation notices to bot administrators and log channels.

use tracing::{info, warn};

use crate::bot::dispatcher::AppState;
use crate::gateway::best_effort;

/// Send `text` to every configured bot administrator.
pub async fn notify_admins(state: &AppState, text: &str) {
    let mut delivered = 0;
    for admin_id in &state.admin_ids {
        let sent = state.gateway.send_message(*admin_id as i64, text).await;
        if best_effort(sent, "notify administrator") {
            delivered += 1;
        }
    }
    info!("Notified {}/{} administrators", delivered, state.admin_ids.len());
}

/// Post a moderation action to the chat's log channel, if one is set.
///
/// Storage failures while looking up the channel are swallowed: the action
/// itself already happened and the audit line is optional.
pub async fn log_to_channel(state: &AppState, chat_id: i64, text: &str) {
    let channel = match state.settings.get(chat_id).await {
        Ok(settings) => settings.log_channel,
        Err(e) => {
            warn!("Could not read log channel of chat {}: {}", chat_id, e);
            None
        }
    };

    if let Some(channel_id) = channel {
        info!("Logging action from chat {} to channel {}", chat_id, channel_id);
        let line = format!("[chat {}] {}", chat_id, text);
        best_effort(state.gateway.send_message(channel_id, &line).await, "post to log channel");
    }
}
