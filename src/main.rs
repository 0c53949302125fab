//! chatwarden - Telegram group moderation bot
//!
//! New members solve an arithmetic captcha before they can write. Messages
//! then pass through content filters and a profanity check, and
//! administrators get mute, ban and verification commands.
//!
//! ## Architecture
//!
//! - `config` - Environment configuration
//! - `database` - SQLite persistence (users, chat settings)
//! - `cache` - Moka caches in front of the database
//! - `gateway` - Bot API seam used by all handlers
//! - `permissions` - Admin checking with caching
//! - `moderation` - Captcha challenges, profanity list, message view
//! - `bot` - Dispatcher and runtime (with Throttle for API rate limiting)
//! - `plugins` - Command handlers
//! - `events` - Join handler and the moderation gate chain
//! - `utils` - Utility functions

mod bot;
mod cache;
mod config;
mod database;
mod events;
mod gateway;
mod moderation;
mod permissions;
mod plugins;
#[cfg(test)]
mod testing;
mod utils;

use std::sync::Arc;

use teloxide::adaptors::throttle::Limits;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bot::AppState;
use cache::CacheRegistry;
use config::Config;
use database::Database;
use gateway::TelegramGateway;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file first (before anything else)
    dotenvy::dotenv().ok();

    // If RUST_LOG is not set, default to "info" level for our crate
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("chatwarden=info,teloxide=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting chatwarden...");

    let config = Config::from_env()?;
    info!("Configuration loaded, bot mode: {:?}", config.bot_mode);
    info!("Bot administrators: {:?}", config.admin_ids);

    let db = Database::connect(&config.database_url).await?;
    let cache = CacheRegistry::new();

    // Throttle respects Telegram's rate limits:
    // - 30 messages per second globally
    // - 1 message per second to the same chat
    // - 20 messages per minute to the same group
    let bot = Bot::new(&config.bot_token).throttle(Limits::default());

    let me = bot.get_me().await?;
    info!("Bot username: @{}", me.username());

    let gateway = Arc::new(TelegramGateway::new(bot.clone()));
    let state = AppState::new(
        gateway,
        &db,
        &cache,
        config.policy.clone(),
        config.admin_ids.clone(),
    );

    let dispatcher = bot::build_dispatcher(bot.clone(), state);
    bot::run(&config, dispatcher, bot).await
}
