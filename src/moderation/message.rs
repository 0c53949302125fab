//! Transport-neutral view of an inbound chat message.

use teloxide::types::{Message, MessageEntityKind};

use crate::database::{FilterKind, UserProfile};

/// The message a command replied to.
#[derive(Debug, Clone)]
pub struct RepliedMessage {
    pub message_id: i32,
    pub sender: Option<UserProfile>,
    pub text: Option<String>,
}

/// What the moderation core needs to know about a message.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub chat_id: i64,
    pub is_group: bool,
    pub message_id: i32,
    pub sender: UserProfile,
    pub text: Option<String>,
    /// Carries a `url` or `text_link` entity (text or caption).
    pub has_link: bool,
    pub is_forward: bool,
    pub has_document: bool,
    pub reply_to: Option<RepliedMessage>,
}

impl ChatMessage {
    /// Build from a Telegram message. Messages without a sender (channel
    /// posts) yield `None`.
    pub fn from_telegram(msg: &Message) -> Option<Self> {
        let sender = UserProfile::from_telegram(msg.from.as_ref()?);

        let has_link = msg
            .entities()
            .into_iter()
            .flatten()
            .chain(msg.caption_entities().into_iter().flatten())
            .any(|e| matches!(e.kind, MessageEntityKind::Url | MessageEntityKind::TextLink { .. }));

        let reply_to = msg.reply_to_message().map(|reply| RepliedMessage {
            message_id: reply.id.0,
            sender: reply.from.as_ref().map(UserProfile::from_telegram),
            text: reply.text().or_else(|| reply.caption()).map(str::to_owned),
        });

        Some(Self {
            chat_id: msg.chat.id.0,
            is_group: msg.chat.is_group() || msg.chat.is_supergroup(),
            message_id: msg.id.0,
            sender,
            text: msg.text().map(str::to_owned),
            has_link,
            is_forward: msg.forward_origin().is_some(),
            has_document: msg.document().is_some(),
            reply_to,
        })
    }

    /// Whether the message has the content a filter targets.
    pub fn carries(&self, kind: FilterKind) -> bool {
        match kind {
            FilterKind::Links => self.has_link,
            FilterKind::Forwards => self.is_forward,
            FilterKind::Files => self.has_document,
        }
    }

    /// Sender of the replied-to message, if any.
    pub fn reply_target(&self) -> Option<&UserProfile> {
        self.reply_to.as_ref().and_then(|r| r.sender.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::testing::{CHAT, telegram_message};

    #[test]
    fn plain_group_text() {
        let msg = ChatMessage::from_telegram(&telegram_message(json!({}))).unwrap();

        assert_eq!(msg.chat_id, CHAT);
        assert!(msg.is_group);
        assert_eq!(msg.sender.id, 7);
        assert_eq!(msg.text.as_deref(), Some("hello"));
        assert!(!msg.has_link && !msg.is_forward && !msg.has_document);
        assert!(msg.reply_to.is_none());
    }

    #[test]
    fn url_entity_in_text_is_a_link() {
        let raw = telegram_message(json!({
            "text": "see https://example.org",
            "entities": [{ "type": "url", "offset": 4, "length": 19 }],
        }));

        let msg = ChatMessage::from_telegram(&raw).unwrap();

        assert!(msg.has_link);
        assert!(msg.carries(FilterKind::Links));
        assert!(!msg.carries(FilterKind::Files));
    }

    #[test]
    fn other_entities_are_not_links() {
        let raw = telegram_message(json!({
            "text": "hi @ann",
            "entities": [{ "type": "mention", "offset": 3, "length": 4 }],
        }));

        assert!(!ChatMessage::from_telegram(&raw).unwrap().has_link);
    }

    #[test]
    fn document_with_text_link_caption() {
        let raw = telegram_message(json!({
            "text": null,
            "document": { "file_id": "doc", "file_unique_id": "doc-u" },
            "caption": "read this",
            "caption_entities": [
                { "type": "text_link", "offset": 0, "length": 4, "url": "https://example.org" }
            ],
        }));

        let msg = ChatMessage::from_telegram(&raw).unwrap();

        assert!(msg.has_document);
        assert!(msg.has_link);
        assert!(msg.text.is_none());
    }

    #[test]
    fn forward_origin_marks_a_forward() {
        let raw = telegram_message(json!({
            "forward_origin": {
                "type": "user",
                "date": 1_699_999_000,
                "sender_user": { "id": 9, "is_bot": false, "first_name": "Ann" },
            },
        }));

        let msg = ChatMessage::from_telegram(&raw).unwrap();

        assert!(msg.is_forward);
        assert!(msg.carries(FilterKind::Forwards));
    }

    #[test]
    fn reply_target_is_captured() {
        let raw = telegram_message(json!({
            "text": "/ban",
            "reply_to_message": {
                "message_id": 41,
                "date": 1_699_999_000,
                "chat": { "id": CHAT, "type": "supergroup", "title": "Test group" },
                "from": { "id": 9, "is_bot": false, "first_name": "Ann", "username": "ann" },
                "text": "spam",
            },
        }));

        let msg = ChatMessage::from_telegram(&raw).unwrap();
        let reply = msg.reply_to.as_ref().unwrap();

        assert_eq!(reply.message_id, 41);
        assert_eq!(reply.text.as_deref(), Some("spam"));
        assert_eq!(msg.reply_target().map(|u| u.mention()), Some("@ann".to_string()));
    }

    #[test]
    fn private_chat_is_not_a_group() {
        let raw = telegram_message(json!({
            "chat": { "id": 7, "type": "private", "first_name": "Eve" },
        }));

        assert!(!ChatMessage::from_telegram(&raw).unwrap().is_group);
    }

    #[test]
    fn message_without_sender_is_skipped() {
        let raw = telegram_message(json!({
            "from": null,
            "sender_chat": { "id": -100_200, "type": "channel", "title": "News" },
        }));

        assert!(ChatMessage::from_telegram(&raw).is_none());
    }
}
