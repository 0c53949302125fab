//! Utility functions.
//!
//! Helpers shared by commands and event gates.

pub mod notify;

pub use notify::{log_to_channel, notify_admins};

/// Parse an `on`/`off` switch, case-insensitively.
pub fn parse_switch(arg: &str) -> Option<bool> {
    match arg.trim().to_lowercase().as_str() {
        "on" => Some(true),
        "off" => Some(false),
        _ => None,
    }
}

/// First whitespace-separated word of a command argument.
pub fn first_arg(args: &str) -> Option<&str> {
    args.split_whitespace().next()
}

/// Current unix time in seconds.
pub fn now_ts() -> i64 {
    chrono::Utc::now().timestamp()
}
