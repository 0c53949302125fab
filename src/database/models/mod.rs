//! Database models.

pub mod chat_settings;
pub mod user;

pub use chat_settings::{ChatSettings, FilterKind};
pub use user::{BotUser, UserProfile};
