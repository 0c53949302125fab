//! Arithmetic captcha for new members.
//!
//! Pending challenges live only in process memory: a restart forgets them
//! and the affected users stay unverified until an admin runs `/verify`.

use std::ops::RangeInclusive;
use std::sync::Arc;

use dashmap::DashMap;
use rand::Rng;

/// "first + second = ?"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Challenge {
    pub first: i64,
    pub second: i64,
}

/// Result of checking an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    Correct,
    Wrong,
    NotANumber,
}

impl Challenge {
    pub fn new(first: i64, second: i64) -> Self {
        Self { first, second }
    }

    /// Draw both operands uniformly from `range`.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, range: &RangeInclusive<i64>) -> Self {
        Self::new(rng.gen_range(range.clone()), rng.gen_range(range.clone()))
    }

    pub fn answer(&self) -> i64 {
        self.first.saturating_add(self.second)
    }

    /// Only a literal integer equal to the sum passes. Surrounding
    /// whitespace is ignored.
    pub fn check(&self, text: Option<&str>) -> Attempt {
        match text.map(str::trim).map(str::parse::<i64>) {
            Some(Ok(n)) if n == self.answer() => Attempt::Correct,
            Some(Ok(_)) => Attempt::Wrong,
            _ => Attempt::NotANumber,
        }
    }

    /// Fill `{user_name}`, `{num1}` and `{num2}` in a welcome template.
    pub fn render(&self, template: &str, user_name: &str) -> String {
        template
            .replace("{user_name}", user_name)
            .replace("{num1}", &self.first.to_string())
            .replace("{num2}", &self.second.to_string())
    }
}

/// Pending challenges keyed by user id.
#[derive(Clone, Default)]
pub struct CaptchaStore {
    pending: Arc<DashMap<u64, Challenge>>,
}

impl CaptchaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a challenge, replacing any earlier one for the same user.
    pub fn issue(&self, user_id: u64, challenge: Challenge) {
        self.pending.insert(user_id, challenge);
    }

    pub fn pending(&self, user_id: u64) -> Option<Challenge> {
        self.pending.get(&user_id).map(|c| *c)
    }

    /// Drop a user's challenge. Returns whether one was pending.
    pub fn clear(&self, user_id: u64) -> bool {
        self.pending.remove(&user_id).is_some()
    }
}
