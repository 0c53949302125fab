//! Profanity word list.
//!
//! Matching is a case-insensitive literal substring search, so a word also
//! matches inside longer words.

#[derive(Debug, Clone, Default)]
pub struct ProfanityFilter {
    words: Vec<String>,
}

impl ProfanityFilter {
    /// Build from a word list. Words are lowercased; blank words are dropped
    /// since an empty pattern would match every message.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    /// First listed word found in `text`.
    pub fn find(&self, text: &str) -> Option<&str> {
        let lowered = text.to_lowercase();
        self.words
            .iter()
            .find(|w| lowered.contains(w.as_str()))
            .map(String::as_str)
    }
}
