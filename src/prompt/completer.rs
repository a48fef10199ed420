//! Tab completion of previously looked-up words.

use rustyline::completion::Completer;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

use crate::cache::{normalize_word, CacheStore};

/// Maximum number of candidates offered for one completion.
pub const MAX_CANDIDATES: usize = 50;

/// Completes the prompt line from words already in the cache.
///
/// Holds its own [`CacheStore`] handle, independent of the dictionaries'
/// handles on the same database.
pub struct WordCompleter {
    cache: CacheStore,
}

impl WordCompleter {
    /// Complete from the words stored in `cache`.
    pub fn new(cache: CacheStore) -> Self {
        Self { cache }
    }

    /// Cached words extending `prefix`.
    pub fn candidates(&self, prefix: &str) -> Vec<String> {
        let prefix = normalize_word(prefix);
        if prefix.is_empty() {
            return Vec::new();
        }
        self.cache
            .words_with_prefix(&prefix, MAX_CANDIDATES)
            .unwrap_or_else(|e| {
                log::debug!("Completion lookup failed: {}", e);
                Vec::new()
            })
    }
}

impl Completer for WordCompleter {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        // The whole line is one query, so complete from its start.
        Ok((0, self.candidates(&line[..pos])))
    }
}

impl Hinter for WordCompleter {
    type Hint = String;
}

impl Highlighter for WordCompleter {}

impl Validator for WordCompleter {}

impl Helper for WordCompleter {}
