//! Configuration module for the chatwarden bot.
//!
//! Loads configuration from environment variables.

use std::env;
use std::ops::RangeInclusive;

use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// Default captcha prompt, used when a chat has no custom welcome message.
pub const DEFAULT_WELCOME_TEMPLATE: &str =
    "Welcome, {user_name}!\nTo be able to write in the chat, please solve the equation: {num1} + {num2} = ?";

/// Largest operand magnitude whose pairwise sum cannot overflow.
const MAX_CAPTCHA_OPERAND: i64 = i64::MAX / 2;

/// Errors raised while loading configuration. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },

    #[error("captcha range is empty: {min}..={max}")]
    EmptyCaptchaRange { min: i64, max: i64 },
}

/// Bot running mode
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BotMode {
    #[default]
    Polling,
    Webhook,
}

/// What happens once a user's warnings reach the limit.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WarnLimitAction {
    /// Notify the bot administrators only.
    #[default]
    Notify,
    /// Notify, then mute the user for `warn_limit_mute_secs`.
    Mute,
    /// Notify, then ban the user.
    Ban,
}

impl WarnLimitAction {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "notify" => Some(Self::Notify),
            "mute" => Some(Self::Mute),
            "ban" => Some(Self::Ban),
            _ => None,
        }
    }
}

/// Moderation knobs shared by the event handlers.
#[derive(Debug, Clone)]
pub struct ModerationPolicy {
    pub captcha_range: RangeInclusive<i64>,
    pub warning_limit: i64,
    pub limit_action: WarnLimitAction,
    pub limit_mute_secs: i64,
    pub swear_words: Vec<String>,
}

impl Default for ModerationPolicy {
    fn default() -> Self {
        Self {
            captcha_range: 1..=10,
            warning_limit: 3,
            limit_action: WarnLimitAction::Notify,
            limit_mute_secs: 3600,
            swear_words: ["дурак", "идиот", "олух"].iter().map(|w| w.to_string()).collect(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    // Telegram
    pub bot_token: String,
    pub bot_mode: BotMode,
    pub webhook_url: Option<Url>,
    pub webhook_port: u16,
    pub webhook_secret: Option<String>,

    /// Administrator user IDs. They receive reports and warning-limit
    /// notifications.
    pub admin_ids: Vec<u64>,

    // SQLite
    pub database_url: String,

    pub policy: ModerationPolicy,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bot_token = non_empty("BOT_TOKEN").ok_or(ConfigError::Missing("BOT_TOKEN"))?;

        let raw_admins = non_empty("ADMIN_IDS")
            .or_else(|| non_empty("ADMIN_ID"))
            .ok_or(ConfigError::Missing("ADMIN_IDS"))?;
        let admin_ids = raw_admins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<u64>()
                    .ok()
                    .filter(|id| *id != 0)
                    .ok_or_else(|| ConfigError::Invalid { name: "ADMIN_IDS", value: s.to_string() })
            })
            .collect::<Result<Vec<_>, _>>()?;
        if admin_ids.is_empty() {
            return Err(ConfigError::Missing("ADMIN_IDS"));
        }

        let bot_mode = match non_empty("BOT_MODE").map(|m| m.to_lowercase()).as_deref() {
            None | Some("polling") => BotMode::Polling,
            Some("webhook") => BotMode::Webhook,
            Some(other) => {
                return Err(ConfigError::Invalid { name: "BOT_MODE", value: other.to_string() });
            }
        };

        let webhook_url = non_empty("WEBHOOK_URL")
            .map(|raw| Url::parse(&raw).map_err(|_| ConfigError::Invalid { name: "WEBHOOK_URL", value: raw }))
            .transpose()?;

        // Validate webhook URL is set if mode is webhook
        if bot_mode == BotMode::Webhook && webhook_url.is_none() {
            return Err(ConfigError::Missing("WEBHOOK_URL"));
        }

        let defaults = ModerationPolicy::default();

        let captcha_min = parse_or("CAPTCHA_MIN", non_empty("CAPTCHA_MIN"), *defaults.captcha_range.start())?;
        let captcha_max = parse_or("CAPTCHA_MAX", non_empty("CAPTCHA_MAX"), *defaults.captcha_range.end())?;
        if captcha_min > captcha_max {
            return Err(ConfigError::EmptyCaptchaRange { min: captcha_min, max: captcha_max });
        }
        // The sum of two operands must fit in an i64.
        for (name, bound) in [("CAPTCHA_MIN", captcha_min), ("CAPTCHA_MAX", captcha_max)] {
            if bound.unsigned_abs() > MAX_CAPTCHA_OPERAND as u64 {
                return Err(ConfigError::Invalid { name, value: bound.to_string() });
            }
        }

        let warning_limit = parse_or("WARNING_LIMIT", non_empty("WARNING_LIMIT"), defaults.warning_limit)?;
        if warning_limit < 1 {
            return Err(ConfigError::Invalid { name: "WARNING_LIMIT", value: warning_limit.to_string() });
        }

        let limit_action = match non_empty("WARN_LIMIT_ACTION") {
            Some(raw) => WarnLimitAction::parse(&raw)
                .ok_or(ConfigError::Invalid { name: "WARN_LIMIT_ACTION", value: raw })?,
            None => defaults.limit_action,
        };

        let limit_mute_secs =
            parse_or("WARN_LIMIT_MUTE_SECS", non_empty("WARN_LIMIT_MUTE_SECS"), defaults.limit_mute_secs)?;

        let swear_words = match non_empty("SWEAR_WORDS") {
            Some(raw) => raw.split(',').map(|w| w.trim().to_string()).filter(|w| !w.is_empty()).collect(),
            None => defaults.swear_words,
        };

        Ok(Self {
            bot_token,
            bot_mode,
            webhook_url,
            webhook_port: parse_or("WEBHOOK_PORT", non_empty("WEBHOOK_PORT"), 8443)?,
            webhook_secret: non_empty("WEBHOOK_SECRET"),
            admin_ids,
            database_url: non_empty("DATABASE_URL").unwrap_or_else(|| "users.db".to_string()),
            policy: ModerationPolicy {
                captcha_range: captcha_min..=captcha_max,
                warning_limit,
                limit_action,
                limit_mute_secs,
                swear_words,
            },
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}
