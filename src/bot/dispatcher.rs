//! Message dispatcher setup.
//!
//! Builds the dispatcher with the join handler, command handlers and the
//! moderation gate chain.

use std::sync::Arc;

use teloxide::adaptors::Throttle;
use teloxide::dispatching::{DefaultKey, UpdateHandler};
use teloxide::prelude::*;

use crate::cache::CacheRegistry;
use crate::config::ModerationPolicy;
use crate::database::{ChatSettingsRepo, Database, UserRepo};
use crate::events;
use crate::gateway::ChatGateway;
use crate::moderation::{CaptchaStore, ProfanityFilter};
use crate::permissions::Permissions;
use crate::plugins;

/// Bot type with Throttle adaptor for automatic rate limiting.
pub type ThrottledBot = Throttle<Bot>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Outbound Bot API calls.
    pub gateway: Arc<dyn ChatGateway>,

    /// User repository (profile plus moderation columns).
    pub users: Arc<UserRepo>,

    /// Per-chat settings repository.
    pub settings: Arc<ChatSettingsRepo>,

    /// Chat administrator checks with caching.
    pub permissions: Permissions,

    /// Pending captcha challenges.
    pub captchas: CaptchaStore,

    pub profanity: Arc<ProfanityFilter>,

    pub policy: Arc<ModerationPolicy>,

    /// Bot administrators: receive reports and warning-limit notices.
    pub admin_ids: Vec<u64>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(
        gateway: Arc<dyn ChatGateway>,
        db: &Database,
        cache: &CacheRegistry,
        policy: ModerationPolicy,
        admin_ids: Vec<u64>,
    ) -> Self {
        let permissions = Permissions::new(gateway.clone(), cache);
        let profanity = Arc::new(ProfanityFilter::new(&policy.swear_words));

        Self {
            gateway,
            users: Arc::new(UserRepo::new(db, cache)),
            settings: Arc::new(ChatSettingsRepo::new(db, cache)),
            permissions,
            captchas: CaptchaStore::new(),
            profanity,
            policy: Arc::new(policy),
            admin_ids,
        }
    }
}

/// Build the dispatcher with all handlers.
pub fn build_dispatcher(
    bot: ThrottledBot,
    state: AppState,
) -> Dispatcher<ThrottledBot, anyhow::Error, DefaultKey> {
    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![state])
        .error_handler(LoggingErrorHandler::with_custom_text(
            "An error occurred while handling an update",
        ))
        .enable_ctrlc_handler()
        .build()
}

/// Build the handler schema.
///
/// Join service messages first, then commands, then the gate chain for
/// everything else. The first matching branch wins.
fn schema() -> UpdateHandler<anyhow::Error> {
    let message_handler = Update::filter_message()
        .branch(events::member_handler())
        .branch(plugins::command_handler())
        .branch(events::message_event_handler());

    dptree::entry().branch(message_handler)
}
