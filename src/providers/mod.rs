//! Dictionary providers.
//!
//! A provider knows how to build the query URL for a word, how to turn the
//! raw response into a normalized [`Record`], and how to print that record.
//! It never touches the network or the cache itself; the lookup orchestrator
//! drives both.
//!
//! # Registry
//!
//! [`registry`] maps each provider name to a constructor. Names are sorted,
//! which is also the order lookups run in when several are selected.
//!
//! ```
//! use rustdict::providers::registry;
//! use rustdict::theme::Theme;
//!
//! let providers = registry();
//! let urban = (providers["urban"])(Theme::default());
//! assert_eq!(urban.identifier(), "urban");
//! ```

pub mod freedict;
pub mod jisho;
pub mod moe;
pub mod urban;

use std::collections::BTreeMap;
use std::io::{self, Write};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::cache::Record;
use crate::error::LookupError;
use crate::theme::Theme;

pub use freedict::FreeDict;
pub use jisho::Jisho;
pub use moe::MoeDict;
pub use urban::UrbanDictionary;

/// Capability set every dictionary provider implements.
pub trait Provider {
    /// Stable name; the cache `source` column and the `[tag]` shown to users.
    fn identifier(&self) -> &'static str;

    /// Query URL for an already-normalized word. Must be pure.
    fn build_url(&self, word: &str) -> String;

    /// Turn a 200 response body into a record with `source == identifier()`.
    ///
    /// # Errors
    ///
    /// [`LookupError::NotFound`] when the body says the word is unknown,
    /// [`LookupError::Unexpected`] when the body cannot be decoded.
    fn parse(&self, word: &str, body: &str) -> Result<Record, LookupError>;

    /// Print a record. Pure presentation: no network, no cache.
    fn render(&self, record: &Record, verbose: bool, out: &mut dyn Write) -> io::Result<()>;
}

/// Constructor stored in the provider registry; takes the run's palette.
pub type ProviderCtor = fn(Theme) -> Box<dyn Provider>;

/// Name → constructor mapping of every built-in provider.
#[must_use]
pub fn registry() -> BTreeMap<&'static str, ProviderCtor> {
    let mut map: BTreeMap<&'static str, ProviderCtor> = BTreeMap::new();
    map.insert(freedict::NAME, |theme| Box::new(FreeDict::new().with_theme(theme)));
    map.insert(jisho::NAME, |theme| Box::new(Jisho::new().with_theme(theme)));
    map.insert(moe::NAME, |theme| Box::new(MoeDict::new().with_theme(theme)));
    map.insert(urban::NAME, |theme| {
        Box::new(UrbanDictionary::new().with_theme(theme))
    });
    map
}

/// Keyword that selects every registered provider.
pub const ALL: &str = "all";

/// Result of resolving a user's `--dict` list against the registry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    /// Known provider names, de-duplicated and sorted.
    pub names: Vec<&'static str>,
    /// Unknown names with the closest registered name, if any is close.
    pub unknown: Vec<(String, Option<&'static str>)>,
}

/// Resolve a comma-separated list of provider names.
///
/// `all` anywhere in the list selects every provider. Unknown names are
/// reported rather than rejected, so one typo does not cancel the others.
#[must_use]
pub fn select<'a, I>(requested: I) -> Selection
where
    I: IntoIterator<Item = &'a str>,
{
    let registry = registry();
    let mut selection = Selection::default();

    let requested: Vec<&str> = requested
        .into_iter()
        .flat_map(|item| item.split(','))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect();

    if requested.iter().any(|name| name.eq_ignore_ascii_case(ALL)) {
        selection.names = registry.keys().copied().collect();
        return selection;
    }

    for name in requested {
        let lowered = name.to_lowercase();
        match registry.get_key_value(lowered.as_str()) {
            Some((known, _)) => selection.names.push(*known),
            None => selection
                .unknown
                .push((name.to_string(), suggest(&lowered, registry.keys().copied()))),
        }
    }

    selection.names.sort_unstable();
    selection.names.dedup();
    selection
}

/// Closest registered name within a small edit distance.
fn suggest<'a>(name: &str, candidates: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    candidates
        .map(|candidate| (candidate, strsim::levenshtein(name, candidate)))
        .filter(|(_, distance)| *distance <= 2)
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate)
}

/// Decode a provider response body.
pub(crate) fn decode_body<T: DeserializeOwned>(source: &str, body: &str) -> Result<T, LookupError> {
    serde_json::from_str(body)
        .map_err(|e| LookupError::Unexpected(format!("malformed response from {source}: {e}")))
}

/// Build a record from a provider's normalized content.
pub(crate) fn to_record<T: Serialize>(
    word: &str,
    source: &str,
    content: &T,
) -> Result<Record, LookupError> {
    let value = serde_json::to_value(content)
        .map_err(|e| LookupError::Unexpected(format!("cannot encode {source} content: {e}")))?;
    Ok(Record::new(word, source, value))
}

/// Read a record's content back into a provider's content type.
pub(crate) fn from_record<T: DeserializeOwned>(record: &Record) -> io::Result<T> {
    serde_json::from_value(record.content.clone())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Percent-encode a word for use as a query-string value.
pub(crate) fn encode_query(word: &str) -> String {
    url::form_urlencoded::byte_serialize(word.as_bytes()).collect()
}

/// Percent-encode a word for use as a single URL path segment.
pub(crate) fn encode_segment(word: &str) -> String {
    // form encoding turns spaces into '+' and encodes a literal '+' as %2B.
    encode_query(word).replace('+', "%20")
}
