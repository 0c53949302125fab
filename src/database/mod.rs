//! Database module exports.

mod chat_settings;
mod error;
mod models;
mod sqlite;
mod users;

pub use chat_settings::ChatSettingsRepo;
pub use error::StorageError;
pub use models::*;
pub use sqlite::Database;
pub use users::UserRepo;
