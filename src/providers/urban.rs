//! Slang definitions from Urban Dictionary.

use std::io::{self, Write};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use yansi::Paint;

use super::{decode_body, encode_query, from_record, to_record, Provider};
use crate::cache::Record;
use crate::error::LookupError;
use crate::theme::Theme;

/// Registry name.
pub const NAME: &str = "urban";

const API_BASE: &str = "https://api.urbandictionary.com/v0/define?term=";

/// Definitions shown without `--verbose`.
const COMPACT_DEFINITIONS: usize = 3;

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    list: Vec<ApiDefinition>,
}

#[derive(Debug, Deserialize)]
struct ApiDefinition {
    definition: String,
    #[serde(default)]
    example: String,
    #[serde(default)]
    thumbs_up: i64,
    #[serde(default)]
    thumbs_down: i64,
}

/// Cached content of an Urban Dictionary record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    /// Definitions in the order the API ranks them.
    pub definitions: Vec<Definition>,
}

/// One user-submitted definition, link brackets removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    pub definition: String,
    /// Empty when the author gave no example.
    pub example: String,
    /// Vote counts, shown with `--verbose`.
    pub thumbs_up: i64,
    pub thumbs_down: i64,
}

/// Urban Dictionary provider.
#[derive(Debug, Clone, Default)]
pub struct UrbanDictionary {
    theme: Theme,
}

impl UrbanDictionary {
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

/// Drop Urban Dictionary's `[cross reference]` brackets and tidy line endings.
fn clean(text: &str) -> String {
    static LINK: OnceLock<Option<Regex>> = OnceLock::new();
    let unlinked = match LINK.get_or_init(|| Regex::new(r"\[([^\[\]]*)\]").ok()) {
        Some(link) => link.replace_all(text, "$1").into_owned(),
        None => text.to_string(),
    };
    unlinked.replace("\r\n", "\n").trim().to_string()
}

impl Provider for UrbanDictionary {
    fn identifier(&self) -> &'static str {
        NAME
    }

    fn build_url(&self, word: &str) -> String {
        format!("{API_BASE}{}", encode_query(word))
    }

    fn parse(&self, word: &str, body: &str) -> Result<Record, LookupError> {
        let response: ApiResponse = decode_body(NAME, body)?;
        if response.list.is_empty() {
            return Err(LookupError::NotFound {
                word: word.to_string(),
            });
        }

        let content = Content {
            definitions: response
                .list
                .into_iter()
                .map(|d| Definition {
                    definition: clean(&d.definition),
                    example: clean(&d.example),
                    thumbs_up: d.thumbs_up,
                    thumbs_down: d.thumbs_down,
                })
                .collect(),
        };
        to_record(word, NAME, &content)
    }

    fn render(&self, record: &Record, verbose: bool, out: &mut dyn Write) -> io::Result<()> {
        let content: Content = from_record(record)?;
        let theme = &self.theme;

        writeln!(out, "{}", record.word.fg(theme.headword).bold())?;

        let shown = if verbose {
            content.definitions.len()
        } else {
            COMPACT_DEFINITIONS
        };
        for (i, def) in content.definitions.iter().take(shown).enumerate() {
            writeln!(out, "  {}. {}", i + 1, def.definition.replace('\n', "\n     "))?;
            if !def.example.is_empty() {
                writeln!(
                    out,
                    "     {}",
                    def.example.replace('\n', "\n     ").fg(theme.example).italic()
                )?;
            }
            if verbose {
                writeln!(
                    out,
                    "     {}",
                    format!("+{} / -{}", def.thumbs_up, def.thumbs_down).fg(theme.dim)
                )?;
            }
        }
        writeln!(out)
    }
}
