//! Ban and unban.

use tracing::info;

use super::{reply, require_admin};
use crate::bot::dispatcher::AppState;
use crate::gateway::best_effort;
use crate::moderation::ChatMessage;
use crate::utils::log_to_channel;

/// Handle /ban as a reply: flag the user and remove them from the chat.
pub async fn ban_command(state: &AppState, msg: &ChatMessage) -> anyhow::Result<()> {
    if !require_admin(state, msg).await {
        return Ok(());
    }

    let Some(target) = msg.reply_target() else {
        reply(state, msg, "Usage: /ban (reply to a message)").await;
        return Ok(());
    };

    state.users.upsert(target).await?;
    state.users.set_banned(target.id, true).await?;
    best_effort(state.gateway.ban_member(msg.chat_id, target.id).await, "ban member");
    info!("User {} banned from chat {} by {}", target.id, msg.chat_id, msg.sender.id);

    reply(state, msg, &format!("User {} has been banned.", target.id)).await;
    log_to_channel(
        state,
        msg.chat_id,
        &format!("{} banned {} (ID: {}).", msg.sender.mention(), target.mention(), target.id),
    )
    .await;
    Ok(())
}

/// Handle /unban as a reply.
pub async fn unban_command(state: &AppState, msg: &ChatMessage) -> anyhow::Result<()> {
    if !require_admin(state, msg).await {
        return Ok(());
    }

    let Some(target) = msg.reply_target() else {
        reply(state, msg, "Usage: /unban (reply to a message)").await;
        return Ok(());
    };

    state.users.upsert(target).await?;
    state.users.set_banned(target.id, false).await?;
    best_effort(state.gateway.unban_member(msg.chat_id, target.id).await, "unban member");
    info!("User {} unbanned in chat {} by {}", target.id, msg.chat_id, msg.sender.id);

    reply(state, msg, &format!("User {} has been unbanned.", target.id)).await;
    log_to_channel(
        state,
        msg.chat_id,
        &format!("{} unbanned {} (ID: {}).", msg.sender.mention(), target.mention(), target.id),
    )
    .await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::events::{Verdict, moderate};
    use crate::gateway::recording::Call;
    use crate::plugins::{Command, execute};
    use crate::testing::{self, ADMIN, CHAT};

    #[tokio::test]
    async fn ban_flags_removes_and_logs() {
        let h = testing::harness().await;
        h.gateway.make_admin(CHAT, ADMIN);
        h.state.settings.set_log_channel(CHAT, -500).await.unwrap();
        let admin = testing::user(ADMIN, "Boss");
        let eve = testing::verified_user(&h, 7, "Eve").await;

        let cmd = testing::reply(&admin, "/ban", &testing::text(&eve, "spam"));
        execute(&h.state, &cmd, Command::Ban(String::new())).await.unwrap();

        assert!(h.state.users.get(7).await.unwrap().unwrap().banned);
        assert!(h.gateway.calls().contains(&Call::Ban { chat_id: CHAT, user_id: 7 }));
        assert_eq!(h.gateway.replies(), vec!["User 7 has been banned."]);
        assert_eq!(h.gateway.sent_to(-500), vec![format!("[chat {}] Boss banned Eve (ID: 7).", CHAT)]);
        assert_eq!(moderate(&h.state, &testing::text(&eve, "back")).await.unwrap(), Verdict::Banned);
    }

    #[tokio::test]
    async fn unban_clears_the_flag() {
        let h = testing::harness().await;
        h.gateway.make_admin(CHAT, ADMIN);
        let admin = testing::user(ADMIN, "Boss");
        let eve = testing::verified_user(&h, 7, "Eve").await;
        h.state.users.set_banned(7, true).await.unwrap();

        let cmd = testing::reply(&admin, "/unban", &testing::text(&eve, "old"));
        execute(&h.state, &cmd, Command::Unban(String::new())).await.unwrap();

        assert!(!h.state.users.get(7).await.unwrap().unwrap().banned);
        assert!(h.gateway.calls().contains(&Call::Unban { chat_id: CHAT, user_id: 7 }));
    }

    #[tokio::test]
    async fn ban_without_reply_shows_usage() {
        let h = testing::harness().await;
        h.gateway.make_admin(CHAT, ADMIN);
        let admin = testing::user(ADMIN, "Boss");

        execute(&h.state, &testing::text(&admin, "/ban"), Command::Ban(String::new())).await.unwrap();

        assert_eq!(h.gateway.replies(), vec!["Usage: /ban (reply to a message)"]);
    }

    #[tokio::test]
    async fn ban_survives_a_failed_kick() {
        let h = testing::harness().await;
        h.gateway.make_admin(CHAT, ADMIN);
        let admin = testing::user(ADMIN, "Boss");
        let eve = testing::verified_user(&h, 7, "Eve").await;
        // Warm the admin cache, then break the transport.
        assert!(h.state.permissions.is_admin(CHAT, ADMIN).await);
        h.gateway.fail_all(true);

        let cmd = testing::reply(&admin, "/ban", &testing::text(&eve, "spam"));
        execute(&h.state, &cmd, Command::Ban(String::new())).await.unwrap();

        assert!(h.state.users.get(7).await.unwrap().unwrap().banned);
    }
}
