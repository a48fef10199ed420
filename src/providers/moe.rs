//! Chinese definitions from 萌典 (moedict.tw).

use std::io::{self, Write};

use serde::{Deserialize, Serialize};
use yansi::Paint;

use super::{decode_body, encode_segment, from_record, to_record, Provider};
use crate::cache::Record;
use crate::error::LookupError;
use crate::theme::Theme;

/// Registry name.
pub const NAME: &str = "moe";

const API_BASE: &str = "https://www.moedict.tw/uni/";

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    title: String,
    #[serde(default)]
    heteronyms: Vec<ApiHeteronym>,
}

#[derive(Debug, Deserialize)]
struct ApiHeteronym {
    #[serde(default)]
    bopomofo: Option<String>,
    #[serde(default)]
    pinyin: Option<String>,
    #[serde(default)]
    definitions: Vec<ApiDefinition>,
}

#[derive(Debug, Deserialize)]
struct ApiDefinition {
    #[serde(default, rename = "type")]
    kind: Option<String>,
    def: String,
    #[serde(default)]
    example: Vec<String>,
    #[serde(default)]
    quote: Vec<String>,
    #[serde(default)]
    link: Vec<String>,
}

/// Cached content of a moedict record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    /// The character or word, link markers removed.
    pub title: String,
    /// One entry per pronunciation.
    pub heteronyms: Vec<Heteronym>,
}

/// Definitions sharing one pronunciation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heteronym {
    /// Zhuyin reading.
    pub bopomofo: Option<String>,
    pub pinyin: Option<String>,
    pub definitions: Vec<Definition>,
}

/// A single sense with its examples and classical quotes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    /// Part of speech (`名`, `動`, ...).
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Definition text.
    pub def: String,
    pub example: Vec<String>,
    /// Classical citations, shown with `--verbose`.
    pub quote: Vec<String>,
    /// Cross references, shown with `--verbose`.
    pub link: Vec<String>,
}

/// moedict provider.
#[derive(Debug, Clone, Default)]
pub struct MoeDict {
    theme: Theme,
}

impl MoeDict {
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

/// Strip moedict's inline link markers (`` `字~ ``).
fn clean(text: &str) -> String {
    text.chars().filter(|c| !matches!(c, '`' | '~')).collect()
}

fn clean_all(items: Vec<String>) -> Vec<String> {
    items.iter().map(|s| clean(s)).collect()
}

impl Provider for MoeDict {
    fn identifier(&self) -> &'static str {
        NAME
    }

    fn build_url(&self, word: &str) -> String {
        format!("{API_BASE}{}", encode_segment(word))
    }

    fn parse(&self, word: &str, body: &str) -> Result<Record, LookupError> {
        let response: ApiResponse = decode_body(NAME, body)?;

        let heteronyms: Vec<Heteronym> = response
            .heteronyms
            .into_iter()
            .filter(|h| !h.definitions.is_empty())
            .map(|h| Heteronym {
                bopomofo: h.bopomofo,
                pinyin: h.pinyin,
                definitions: h
                    .definitions
                    .into_iter()
                    .map(|d| Definition {
                        kind: d.kind,
                        def: clean(&d.def),
                        example: clean_all(d.example),
                        quote: clean_all(d.quote),
                        link: clean_all(d.link),
                    })
                    .collect(),
            })
            .collect();

        if heteronyms.is_empty() {
            return Err(LookupError::NotFound {
                word: word.to_string(),
            });
        }

        let title = if response.title.is_empty() {
            word.to_string()
        } else {
            clean(&response.title)
        };
        to_record(word, NAME, &Content { title, heteronyms })
    }

    fn render(&self, record: &Record, verbose: bool, out: &mut dyn Write) -> io::Result<()> {
        let content: Content = from_record(record)?;
        let theme = &self.theme;

        writeln!(out, "{}", content.title.fg(theme.headword).bold())?;

        for heteronym in &content.heteronyms {
            let reading = match (&heteronym.bopomofo, &heteronym.pinyin) {
                (Some(b), Some(p)) => format!("{b} ({p})"),
                (Some(b), None) => b.clone(),
                (None, Some(p)) => p.clone(),
                (None, None) => String::new(),
            };
            if !reading.is_empty() {
                writeln!(out, "  {}", reading.fg(theme.category))?;
            }

            let mut last_kind: Option<&str> = None;
            for (i, def) in heteronym.definitions.iter().enumerate() {
                if let Some(kind) = def.kind.as_deref() {
                    if last_kind != Some(kind) {
                        writeln!(out, "  {}", format!("[{kind}]").fg(theme.category))?;
                        last_kind = Some(kind);
                    }
                }
                writeln!(out, "    {}. {}", i + 1, def.def)?;
                for example in &def.example {
                    writeln!(out, "       {}", example.fg(theme.example))?;
                }
                if verbose {
                    for quote in &def.quote {
                        writeln!(out, "       {}", quote.fg(theme.example).italic())?;
                    }
                    for link in &def.link {
                        writeln!(out, "       {}", link.fg(theme.dim))?;
                    }
                }
            }
        }
        writeln!(out)
    }
}
