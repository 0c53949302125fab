//! Per-chat settings model.

use serde::{Deserialize, Serialize};

/// Content filters an administrator can toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterKind {
    Links,
    Forwards,
    Files,
}

impl FilterKind {
    /// Evaluation order of the content filters.
    pub const ALL: [FilterKind; 3] = [FilterKind::Links, FilterKind::Forwards, FilterKind::Files];

    /// Column backing this filter in `chat_settings`.
    pub(crate) fn column(self) -> &'static str {
        match self {
            Self::Links => "delete_links",
            Self::Forwards => "delete_forwards",
            Self::Files => "delete_files",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Links => "Link deletion",
            Self::Forwards => "Forwarded message deletion",
            Self::Files => "File deletion",
        }
    }
}

/// A row of the `chat_settings` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ChatSettings {
    pub chat_id: i64,
    /// Template with `{user_name}`, `{num1}` and `{num2}` placeholders.
    pub welcome_message: Option<String>,
    pub rules: Option<String>,
    pub delete_links: bool,
    pub delete_forwards: bool,
    pub delete_files: bool,
    pub log_channel: Option<i64>,
}

impl ChatSettings {
    /// Settings of a chat nobody has configured yet.
    pub fn empty(chat_id: i64) -> Self {
        Self {
            chat_id,
            ..Default::default()
        }
    }

    pub fn filter_enabled(&self, kind: FilterKind) -> bool {
        match kind {
            FilterKind::Links => self.delete_links,
            FilterKind::Forwards => self.delete_forwards,
            FilterKind::Files => self.delete_files,
        }
    }
}
