//! Content filter gate.
//!
//! Deletes links, forwards or documents when the chat has the matching
//! filter enabled. Chat administrators are exempt.

use tracing::{debug, info};

use crate::bot::dispatcher::AppState;
use crate::database::FilterKind;
use crate::gateway::best_effort;
use crate::moderation::ChatMessage;

/// Returns the filter that deleted the message, if any.
pub async fn check_filters(state: &AppState, msg: &ChatMessage) -> anyhow::Result<Option<FilterKind>> {
    let settings = state.settings.get(msg.chat_id).await?;

    let Some(kind) = FilterKind::ALL
        .into_iter()
        .find(|kind| settings.filter_enabled(*kind) && msg.carries(*kind))
    else {
        return Ok(None);
    };

    // Only pay for getChatMember once a filter actually matches.
    if state.permissions.is_admin(msg.chat_id, msg.sender.id).await {
        debug!("{:?} filter skipped for admin {} in chat {}", kind, msg.sender.id, msg.chat_id);
        return Ok(None);
    }

    best_effort(
        state.gateway.delete_message(msg.chat_id, msg.message_id).await,
        "delete filtered message",
    );
    info!("{:?} filter removed message {} in chat {}", kind, msg.message_id, msg.chat_id);

    Ok(Some(kind))
}
