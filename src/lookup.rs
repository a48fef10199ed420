//! Lookup orchestration.
//!
//! A [`Dictionary`] pairs one [`Provider`] with its own [`CacheStore`]
//! handle and a shared [`Fetch`] implementation, and runs the lookup
//! workflow for a single word:
//!
//! ```text
//! normalize → [provider tag] → [url] → cache get ──hit──→ render
//!                                          │
//!                                         miss → fetch → parse ─ok─→ put → render
//!                                                           └─err─→ report
//! ```
//!
//! Every lookup ends in exactly one render or one error report. Lookup
//! errors are handled here and never returned to the caller, so one failing
//! `(word, provider)` pair cannot abort the rest of a batch.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use yansi::Paint;

use crate::cache::{normalize_word, CacheStore, PutOutcome, Record};
use crate::error::{LookupError, Severity};
use crate::providers::Provider;
use crate::signal::ShutdownHandler;
use crate::theme::Theme;
use crate::transport::Fetch;

/// Default network deadline for a single query.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Per-invocation options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookupOptions {
    /// Skip the cache read. Successful results are still written.
    pub disable_cache: bool,
    /// Network deadline for the query.
    pub timeout: Duration,
    /// Print `[provider]` before the result.
    pub show_provider: bool,
    /// Print `(url)` before the result.
    pub show_url: bool,
    /// Passed through to [`Provider::render`].
    pub verbose: bool,
}

impl Default for LookupOptions {
    fn default() -> Self {
        Self {
            disable_cache: false,
            timeout: DEFAULT_TIMEOUT,
            show_provider: false,
            show_url: false,
            verbose: false,
        }
    }
}

/// How a single lookup ended.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    /// Answered from the cache without touching the network.
    CacheHit,
    /// Answered from the network. `None` when the cache write failed.
    Fetched(Option<PutOutcome>),
    /// The query failed; the error was reported and nothing was cached.
    Failed(LookupError),
}

impl LookupOutcome {
    /// Whether a record was rendered.
    #[must_use]
    pub fn is_rendered(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }
}

/// One provider bound to a cache handle and a fetcher.
pub struct Dictionary {
    provider: Box<dyn Provider>,
    cache: CacheStore,
    fetcher: Arc<dyn Fetch>,
    theme: Theme,
}

impl Dictionary {
    /// Create a dictionary. The cache handle is owned and closed on drop.
    pub fn new(provider: Box<dyn Provider>, cache: CacheStore, fetcher: Arc<dyn Fetch>) -> Self {
        Self {
            provider,
            cache,
            fetcher,
            theme: Theme::default(),
        }
    }

    /// Use a specific colour palette for tags and error lines.
    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// The provider's identifier.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.provider.identifier()
    }

    /// The cache handle owned by this dictionary.
    #[must_use]
    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Look up `word`, writing everything user-visible to `out`.
    pub fn lookup(&self, word: &str, options: &LookupOptions, out: &mut dyn Write) -> LookupOutcome {
        let word = normalize_word(word);
        let source = self.provider.identifier();

        if options.show_provider {
            emit(out, format_args!("{}", format!("[{source}]").fg(self.theme.label)));
        }
        if options.show_url {
            let url = self.provider.build_url(&word);
            emit(out, format_args!("{}", format!("({url})").fg(self.theme.label)));
        }

        if !options.disable_cache {
            match self.cache.get(&word, source) {
                Ok(Some(record)) => {
                    log::debug!("Cache hit for {:?} in {}", word, source);
                    self.render(&record, options.verbose, out);
                    return LookupOutcome::CacheHit;
                }
                Ok(None) => log::debug!("Cache miss for {:?} in {}", word, source),
                Err(e) => log::warn!("Cache read failed for {:?} in {}: {}", word, source, e),
            }
        }

        let record = match self.query(&word, options.timeout) {
            Ok(record) => record,
            Err(err) => {
                log::debug!("Lookup of {:?} in {} failed: {:?}", word, source, err);
                self.report(&err, out);
                return LookupOutcome::Failed(err);
            }
        };

        let stored = match self.cache.put(&record) {
            Ok(outcome) => {
                log::debug!("Cache write for {:?} in {}: {:?}", word, source, outcome);
                Some(outcome)
            }
            Err(e) => {
                log::warn!("Cache write failed for {:?} in {}: {}", word, source, e);
                None
            }
        };

        self.render(&record, options.verbose, out);
        LookupOutcome::Fetched(stored)
    }

    fn query(&self, word: &str, timeout: Duration) -> Result<Record, LookupError> {
        let url = self.provider.build_url(word);
        let body = self.fetcher.fetch(word, &url, timeout)?;
        self.provider.parse(word, &body)
    }

    fn render(&self, record: &Record, verbose: bool, out: &mut dyn Write) {
        if let Err(e) = self.provider.render(record, verbose, out) {
            log::error!(
                "Failed to render {:?} from {}: {}",
                record.word,
                record.source,
                e
            );
        }
    }

    fn report(&self, err: &LookupError, out: &mut dyn Write) {
        let message = err.to_string();
        match err.severity() {
            Severity::High => emit(out, format_args!("{}", message.fg(self.theme.danger))),
            Severity::Advisory => emit(out, format_args!("{}", message.fg(self.theme.warning))),
            Severity::Unclassified => emit(out, format_args!("{message}")),
        }
    }
}

fn emit(out: &mut dyn Write, line: std::fmt::Arguments<'_>) {
    if let Err(e) = writeln!(out, "{line}") {
        log::error!("Failed to write output: {}", e);
    }
}

/// Tally of a batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Lookups answered from the cache.
    pub cache_hits: usize,
    /// Lookups answered from the network.
    pub fetched: usize,
    /// Lookups that reported an error.
    pub failed: usize,
    /// Whether the batch stopped early on Ctrl+C.
    pub interrupted: bool,
}

/// Look up every word in every dictionary, word-major.
///
/// Output for `(word N, dictionary P)` always precedes `(word N, P+1)` and
/// `(word N+1, _)`. A shutdown request is honoured between lookups only.
pub fn lookup_all<S: AsRef<str>>(
    words: &[S],
    dictionaries: &[Dictionary],
    options: &LookupOptions,
    shutdown: &ShutdownHandler,
    out: &mut dyn Write,
) -> BatchSummary {
    let mut summary = BatchSummary::default();

    for word in words {
        for dictionary in dictionaries {
            if shutdown.is_shutdown_requested() {
                log::info!("Lookup batch interrupted");
                summary.interrupted = true;
                return summary;
            }
            match dictionary.lookup(word.as_ref(), options, out) {
                LookupOutcome::CacheHit => summary.cache_hits += 1,
                LookupOutcome::Fetched(_) => summary.fetched += 1,
                LookupOutcome::Failed(_) => summary.failed += 1,
            }
        }
    }

    summary
}
