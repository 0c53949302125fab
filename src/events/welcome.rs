//! Welcome event handler.
//!
//! Greets new members with an arithmetic captcha. Until they answer it
//! their messages are held by the captcha gate.

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use tracing::{debug, info};

use crate::bot::dispatcher::AppState;
use crate::config::DEFAULT_WELCOME_TEMPLATE;
use crate::database::UserProfile;
use crate::gateway::best_effort;
use crate::moderation::Challenge;

/// Returns the handler for `new_chat_members` service messages.
pub fn handler() -> UpdateHandler<anyhow::Error> {
    dptree::filter_map(|msg: Message| {
        let members = msg.new_chat_members()?;
        Some(members.iter().map(UserProfile::from_telegram).collect::<Vec<_>>())
    })
    .endpoint(welcome_handler)
}

async fn welcome_handler(msg: Message, members: Vec<UserProfile>, state: AppState) -> anyhow::Result<()> {
    let issued = welcome_members(&state, msg.chat.id.0, &members).await?;
    debug!("Issued {} captcha(s) in chat {}", issued, msg.chat.id);
    Ok(())
}

/// Reset each joining human to unverified and send them a fresh challenge.
///
/// Bots are skipped. Returns how many challenges were issued.
pub async fn welcome_members(state: &AppState, chat_id: i64, members: &[UserProfile]) -> anyhow::Result<usize> {
    let settings = state.settings.get(chat_id).await?;
    let template = settings
        .welcome_message
        .as_deref()
        .unwrap_or(DEFAULT_WELCOME_TEMPLATE);

    let mut issued = 0;
    for member in members.iter().filter(|m| !m.is_bot) {
        state.users.upsert(member).await?;
        state.users.set_verified(member.id, false).await?;

        let challenge = Challenge::generate(&mut rand::thread_rng(), &state.policy.captcha_range);
        state.captchas.issue(member.id, challenge);
        info!("New member {} joined chat {}", member.id, chat_id);

        let text = challenge.render(template, &member.first_name);
        best_effort(state.gateway.send_message(chat_id, &text).await, "send captcha");
        issued += 1;
    }

    Ok(issued)
}
