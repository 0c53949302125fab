//! Captcha answer gate.

use tracing::info;

use crate::bot::dispatcher::AppState;
use crate::gateway::best_effort;
use crate::moderation::{Attempt, ChatMessage};

/// Handle a message from a user with a pending challenge.
///
/// Returns `None` when the sender has no challenge. A wrong answer changes
/// nothing; the user may try again indefinitely.
pub async fn check_captcha(state: &AppState, msg: &ChatMessage) -> anyhow::Result<Option<Attempt>> {
    let Some(challenge) = state.captchas.pending(msg.sender.id) else {
        return Ok(None);
    };

    let attempt = challenge.check(msg.text.as_deref());
    let reply = match attempt {
        Attempt::Correct => {
            state.users.set_verified(msg.sender.id, true).await?;
            state.captchas.clear(msg.sender.id);
            info!("User {} passed the captcha in chat {}", msg.sender.id, msg.chat_id);
            "Correct! You can now send messages."
        }
        Attempt::Wrong => "Incorrect answer. Please try again.",
        Attempt::NotANumber => "Please enter a number in response to the captcha.",
    };

    best_effort(
        state.gateway.reply_to(msg.chat_id, msg.message_id, reply).await,
        "reply to captcha answer",
    );

    Ok(Some(attempt))
}
