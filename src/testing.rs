//! Shared fixtures for handler tests: an in-memory database, a recording
//! gateway and message builders.

use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};

use crate::bot::dispatcher::AppState;
use crate::cache::CacheRegistry;
use crate::config::ModerationPolicy;
use crate::database::{Database, UserProfile};
use crate::gateway::recording::RecordingGateway;
use crate::moderation::{ChatMessage, RepliedMessage};

pub const CHAT: i64 = -100_100;
/// The configured bot administrator. Not a chat admin unless a test says so.
pub const ADMIN: u64 = 1000;

static NEXT_MESSAGE_ID: AtomicI32 = AtomicI32::new(1);

pub struct Harness {
    pub state: AppState,
    pub gateway: Arc<RecordingGateway>,
}

pub async fn harness() -> Harness {
    harness_with(ModerationPolicy::default()).await
}

pub async fn harness_with(policy: ModerationPolicy) -> Harness {
    let db = Database::connect(":memory:").await.expect("in-memory database");
    let gateway = RecordingGateway::new();
    let state = AppState::new(gateway.clone(), &db, &CacheRegistry::new(), policy, vec![ADMIN]);
    Harness { state, gateway }
}

pub fn user(id: u64, first_name: &str) -> UserProfile {
    UserProfile {
        id,
        is_bot: false,
        first_name: first_name.to_string(),
        last_name: None,
        username: None,
        language_code: None,
    }
}

/// A stored user who already passed the captcha.
pub async fn verified_user(h: &Harness, id: u64, first_name: &str) -> UserProfile {
    let profile = user(id, first_name);
    h.state.users.upsert(&profile).await.expect("upsert");
    h.state.users.set_verified(id, true).await.expect("verify");
    profile
}

/// A plain text message in [`CHAT`].
pub fn text(from: &UserProfile, text: &str) -> ChatMessage {
    ChatMessage {
        chat_id: CHAT,
        is_group: true,
        message_id: NEXT_MESSAGE_ID.fetch_add(1, Ordering::Relaxed),
        sender: from.clone(),
        text: Some(text.to_string()),
        has_link: false,
        is_forward: false,
        has_document: false,
        reply_to: None,
    }
}

/// A text message replying to `target`.
pub fn reply(from: &UserProfile, text_body: &str, target: &ChatMessage) -> ChatMessage {
    ChatMessage {
        reply_to: Some(RepliedMessage {
            message_id: target.message_id,
            sender: Some(target.sender.clone()),
            text: target.text.clone(),
        }),
        ..text(from, text_body)
    }
}

/// A message in a private chat with the bot.
pub fn private(from: &UserProfile, text_body: &str) -> ChatMessage {
    ChatMessage {
        chat_id: from.id as i64,
        is_group: false,
        ..text(from, text_body)
    }
}

/// Raw Bot API JSON of a group text from user 7 in [`CHAT`], with `fields`
/// merged on top. A `null` field removes the default.
fn message_json(fields: serde_json::Value) -> serde_json::Value {
    let mut message = serde_json::json!({
        "message_id": NEXT_MESSAGE_ID.fetch_add(1, Ordering::Relaxed),
        "date": 1_700_000_000,
        "chat": { "id": CHAT, "type": "supergroup", "title": "Test group" },
        "from": { "id": 7, "is_bot": false, "first_name": "Eve" },
        "text": "hello",
    });
    let (Some(base), serde_json::Value::Object(extra)) = (message.as_object_mut(), fields) else {
        panic!("message fields must be a JSON object");
    };
    for (key, value) in extra {
        if value.is_null() {
            base.remove(&key);
        } else {
            base.insert(key, value);
        }
    }
    message
}

pub fn telegram_message(fields: serde_json::Value) -> teloxide::types::Message {
    serde_json::from_value(message_json(fields)).expect("valid Telegram message")
}

pub fn telegram_update(fields: serde_json::Value) -> teloxide::types::Update {
    let update = serde_json::json!({ "update_id": 1, "message": message_json(fields) });
    // teloxide's `Update` deserializer only recognises the update kind when
    // parsing from a string; `from_value` yields `UpdateKind::Error`.
    serde_json::from_str(&update.to_string()).expect("valid Telegram update")
}

/// `getMe` result for a bot named `warden_bot`.
pub fn telegram_me() -> teloxide::types::Me {
    serde_json::from_value(serde_json::json!({
        "id": 42,
        "is_bot": true,
        "first_name": "Warden",
        "username": "warden_bot",
        "can_join_groups": true,
        "can_read_all_group_messages": false,
        "supports_inline_queries": false,
        "can_connect_to_business": false,
        "has_main_web_app": false,
    }))
    .expect("valid getMe result")
}
