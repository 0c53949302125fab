//! Moderation primitives: the inbound message view, captcha challenges and
//! the profanity word list.

pub mod captcha;
pub mod message;
pub mod profanity;

pub use captcha::{Attempt, CaptchaStore, Challenge};
pub use message::{ChatMessage, RepliedMessage};
pub use profanity::ProfanityFilter;
