//! Japanese-English definitions from jisho.org.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};
use yansi::Paint;

use super::{decode_body, encode_query, from_record, to_record, Provider};
use crate::cache::Record;
use crate::error::LookupError;
use crate::theme::Theme;

/// Registry name.
pub const NAME: &str = "jisho";

const API_BASE: &str = "https://jisho.org/api/v1/search/words?keyword=";

/// Entries shown without `--verbose`; jisho returns up to 20 matches.
const COMPACT_ENTRIES: usize = 3;

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    data: Vec<ApiEntry>,
}

#[derive(Debug, Deserialize)]
struct ApiEntry {
    #[serde(default)]
    slug: String,
    #[serde(default)]
    is_common: Option<bool>,
    #[serde(default)]
    japanese: Vec<ApiJapanese>,
    #[serde(default)]
    senses: Vec<ApiSense>,
}

#[derive(Debug, Deserialize)]
struct ApiJapanese {
    #[serde(default)]
    word: Option<String>,
    #[serde(default)]
    reading: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiSense {
    #[serde(default)]
    english_definitions: Vec<String>,
    #[serde(default)]
    parts_of_speech: Vec<String>,
}

/// Cached content of a jisho record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    /// Matches in the order jisho ranks them.
    pub entries: Vec<Entry>,
}

/// One dictionary entry matching the keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// jisho's identifier for the entry.
    pub slug: String,
    /// Marked as a common word.
    pub common: bool,
    /// Written forms; the first is the headword.
    pub forms: Vec<Form>,
    pub senses: Vec<Sense>,
}

/// A written form and its kana reading; either may be missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Form {
    pub word: Option<String>,
    pub reading: Option<String>,
}

/// English glosses for one sense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sense {
    pub definitions: Vec<String>,
    pub parts_of_speech: Vec<String>,
}

/// jisho.org provider.
#[derive(Debug, Clone, Default)]
pub struct Jisho {
    theme: Theme,
}

impl Jisho {
    /// Create the provider with the default palette.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Render with `theme` instead of the default palette.
    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }
}

impl Form {
    fn label(&self) -> String {
        match (&self.word, &self.reading) {
            (Some(word), Some(reading)) if word != reading => format!("{word}【{reading}】"),
            (Some(word), _) => word.clone(),
            (None, Some(reading)) => reading.clone(),
            (None, None) => String::new(),
        }
    }
}

impl Provider for Jisho {
    fn identifier(&self) -> &'static str {
        NAME
    }

    fn build_url(&self, word: &str) -> String {
        format!("{API_BASE}{}", encode_query(word))
    }

    fn parse(&self, word: &str, body: &str) -> Result<Record, LookupError> {
        let response: ApiResponse = decode_body(NAME, body)?;

        let entries: Vec<Entry> = response
            .data
            .into_iter()
            .filter(|e| !e.senses.is_empty())
            .map(|e| Entry {
                slug: e.slug,
                common: e.is_common.unwrap_or(false),
                forms: e
                    .japanese
                    .into_iter()
                    .map(|j| Form {
                        word: j.word,
                        reading: j.reading,
                    })
                    .collect(),
                senses: e
                    .senses
                    .into_iter()
                    .map(|s| Sense {
                        definitions: s.english_definitions,
                        parts_of_speech: s.parts_of_speech,
                    })
                    .collect(),
            })
            .collect();

        if entries.is_empty() {
            return Err(LookupError::NotFound {
                word: word.to_string(),
            });
        }
        to_record(word, NAME, &Content { entries })
    }

    fn render(&self, record: &Record, verbose: bool, out: &mut dyn Write) -> io::Result<()> {
        let content: Content = from_record(record)?;
        let theme = &self.theme;

        let shown = if verbose {
            content.entries.len()
        } else {
            COMPACT_ENTRIES
        };
        for entry in content.entries.iter().take(shown) {
            let mut forms = entry.forms.iter().map(Form::label).filter(|l| !l.is_empty());
            let headline = forms.next().unwrap_or_else(|| entry.slug.clone());
            if entry.common {
                writeln!(
                    out,
                    "{} {}",
                    headline.fg(theme.headword).bold(),
                    "common".fg(theme.dim)
                )?;
            } else {
                writeln!(out, "{}", headline.fg(theme.headword).bold())?;
            }

            for (i, sense) in entry.senses.iter().enumerate() {
                if verbose && !sense.parts_of_speech.is_empty() {
                    writeln!(
                        out,
                        "  {}",
                        sense.parts_of_speech.join(", ").fg(theme.category)
                    )?;
                }
                writeln!(out, "    {}. {}", i + 1, sense.definitions.join("; "))?;
            }

            if verbose {
                let others: Vec<String> = forms.collect();
                if !others.is_empty() {
                    writeln!(
                        out,
                        "  {}",
                        format!("other forms: {}", others.join(", ")).fg(theme.dim)
                    )?;
                }
            }
        }
        writeln!(out)
    }
}
