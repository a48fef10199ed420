//! Cached record definitions.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use unicode_normalization::UnicodeNormalization;

/// The cached definition of one word from one provider.
///
/// `(word, source)` is the uniqueness key. `content` is the provider's
/// normalized payload; it is stored as JSON text and compared structurally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Normalized search key (see [`normalize_word`]).
    pub word: String,
    /// Identifier of the provider that produced the content.
    pub source: String,
    /// Provider-specific structured payload.
    pub content: Value,
}

impl Record {
    /// Create a new record.
    #[must_use]
    pub fn new(word: impl Into<String>, source: impl Into<String>, content: Value) -> Self {
        Self {
            word: word.into(),
            source: source.into(),
            content,
        }
    }
}

/// Normalize a user-supplied word into a cache key.
///
/// Trims surrounding whitespace, composes to Unicode NFC and lower-cases,
/// so `"Café"` typed as NFD and `"café"` share one cache entry.
#[must_use]
pub fn normalize_word(word: &str) -> String {
    word.trim().nfc().collect::<String>().to_lowercase()
}
