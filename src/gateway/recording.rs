//! Recording gateway for tests.
//!
//! Records every call instead of hitting Telegram. Tests decide which users
//! are chat administrators and whether calls fail.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{ChatGateway, MemberStatus, TransportError};

/// One recorded gateway call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Send { chat_id: i64, text: String },
    Reply { chat_id: i64, message_id: i32, text: String },
    Delete { chat_id: i64, message_id: i32 },
    Forward { to_chat_id: i64, from_chat_id: i64, message_id: i32 },
    Ban { chat_id: i64, user_id: u64 },
    Unban { chat_id: i64, user_id: u64 },
}

#[derive(Default)]
pub struct RecordingGateway {
    calls: Mutex<Vec<Call>>,
    admins: Mutex<HashSet<(i64, u64)>>,
    failing: AtomicBool,
    status_lookups: Mutex<usize>,
}

impl RecordingGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn make_admin(&self, chat_id: i64, user_id: u64) {
        self.admins.lock().insert((chat_id, user_id));
    }

    /// Make every subsequent call fail. Calls are still recorded.
    pub fn fail_all(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }

    pub fn status_lookups(&self) -> usize {
        *self.status_lookups.lock()
    }

    pub fn deleted(&self) -> Vec<i32> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Delete { message_id, .. } => Some(message_id),
                _ => None,
            })
            .collect()
    }

    pub fn replies(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Reply { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn sent_to(&self, chat_id: i64) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Send { chat_id: to, text } if to == chat_id => Some(text),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) -> Result<(), TransportError> {
        self.calls.lock().push(call);
        if self.failing.load(Ordering::SeqCst) {
            return Err(TransportError::Rejected("simulated failure".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ChatGateway for RecordingGateway {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TransportError> {
        self.record(Call::Send { chat_id, text: text.to_string() })
    }

    async fn reply_to(&self, chat_id: i64, message_id: i32, text: &str) -> Result<(), TransportError> {
        self.record(Call::Reply { chat_id, message_id, text: text.to_string() })
    }

    async fn delete_message(&self, chat_id: i64, message_id: i32) -> Result<(), TransportError> {
        self.record(Call::Delete { chat_id, message_id })
    }

    async fn forward_message(
        &self,
        to_chat_id: i64,
        from_chat_id: i64,
        message_id: i32,
    ) -> Result<(), TransportError> {
        self.record(Call::Forward { to_chat_id, from_chat_id, message_id })
    }

    async fn member_status(&self, chat_id: i64, user_id: u64) -> Result<MemberStatus, TransportError> {
        *self.status_lookups.lock() += 1;
        if self.failing.load(Ordering::SeqCst) {
            return Err(TransportError::Rejected("simulated failure".into()));
        }
        if self.admins.lock().contains(&(chat_id, user_id)) {
            Ok(MemberStatus::Administrator)
        } else {
            Ok(MemberStatus::Member)
        }
    }

    async fn ban_member(&self, chat_id: i64, user_id: u64) -> Result<(), TransportError> {
        self.record(Call::Ban { chat_id, user_id })
    }

    async fn unban_member(&self, chat_id: i64, user_id: u64) -> Result<(), TransportError> {
        self.record(Call::Unban { chat_id, user_id })
    }
}
