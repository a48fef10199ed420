//! English definitions from the Free Dictionary API (dictionaryapi.dev).

use std::io::{self, Write};

use serde::{Deserialize, Serialize};
use yansi::Paint;

use super::{decode_body, encode_segment, from_record, to_record, Provider};
use crate::cache::Record;
use crate::error::LookupError;
use crate::theme::Theme;

/// Registry name.
pub const NAME: &str = "freedict";

const API_BASE: &str = "https://api.dictionaryapi.dev/api/v2/entries/en/";

/// Definitions shown per part of speech without `--verbose`.
const COMPACT_DEFINITIONS: usize = 3;

#[derive(Debug, Deserialize)]
struct ApiEntry {
    word: String,
    #[serde(default)]
    phonetic: Option<String>,
    #[serde(default)]
    phonetics: Vec<ApiPhonetic>,
    #[serde(default)]
    meanings: Vec<ApiMeaning>,
}

#[derive(Debug, Deserialize)]
struct ApiPhonetic {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiMeaning {
    part_of_speech: String,
    #[serde(default)]
    definitions: Vec<ApiDefinition>,
}

#[derive(Debug, Deserialize)]
struct ApiDefinition {
    definition: String,
    #[serde(default)]
    example: Option<String>,
    #[serde(default)]
    synonyms: Vec<String>,
}

/// Cached content of a FreeDict record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    /// Headword as spelled by the API.
    pub word: String,
    /// IPA transcription, when the API has one.
    pub phonetic: Option<String>,
    /// Meanings grouped by part of speech, homographs merged.
    pub meanings: Vec<Meaning>,
}

/// Definitions for one part of speech.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meaning {
    /// e.g. `noun`, `verb`.
    pub part_of_speech: String,
    pub definitions: Vec<Definition>,
}

/// A single sense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    pub definition: String,
    /// Usage example, shown with `--verbose`.
    pub example: Option<String>,
    /// Shown with `--verbose`.
    pub synonyms: Vec<String>,
}

/// dictionaryapi.dev provider.
#[derive(Debug, Clone, Default)]
pub struct FreeDict {
    theme: Theme,
}

impl FreeDict {
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

    fn normalize(entries: Vec<ApiEntry>) -> Content {
        let mut entries = entries.into_iter();
        // The API can split homographs into several entries; merge them.
        let first = entries.next();
        let (word, mut phonetic, mut meanings) = match first {
            Some(entry) => {
                let phonetic = entry
                    .phonetic
                    .or_else(|| entry.phonetics.into_iter().find_map(|p| p.text));
                (entry.word, phonetic, entry.meanings)
            }
            None => (String::new(), None, Vec::new()),
        };
        for entry in entries {
            if phonetic.is_none() {
                phonetic = entry.phonetic;
            }
            meanings.extend(entry.meanings);
        }

        Content {
            word,
            phonetic,
            meanings: meanings
                .into_iter()
                .filter(|m| !m.definitions.is_empty())
                .map(|m| Meaning {
                    part_of_speech: m.part_of_speech,
                    definitions: m
                        .definitions
                        .into_iter()
                        .map(|d| Definition {
                            definition: d.definition,
                            example: d.example,
                            synonyms: d.synonyms,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

impl Provider for FreeDict {
    fn identifier(&self) -> &'static str {
        NAME
    }

    fn build_url(&self, word: &str) -> String {
        format!("{API_BASE}{}", encode_segment(word))
    }

    fn parse(&self, word: &str, body: &str) -> Result<Record, LookupError> {
        let entries: Vec<ApiEntry> = decode_body(NAME, body)?;
        let content = Self::normalize(entries);
        if content.meanings.is_empty() {
            return Err(LookupError::NotFound {
                word: word.to_string(),
            });
        }
        to_record(word, NAME, &content)
    }

    fn render(&self, record: &Record, verbose: bool, out: &mut dyn Write) -> io::Result<()> {
        let content: Content = from_record(record)?;
        let theme = &self.theme;

        match &content.phonetic {
            Some(phonetic) => writeln!(
                out,
                "{} {}",
                content.word.fg(theme.headword).bold(),
                phonetic.fg(theme.dim)
            )?,
            None => writeln!(out, "{}", content.word.fg(theme.headword).bold())?,
        }

        for meaning in &content.meanings {
            writeln!(out, "  {}", meaning.part_of_speech.fg(theme.category))?;
            let shown = if verbose {
                meaning.definitions.len()
            } else {
                COMPACT_DEFINITIONS
            };
            for (i, def) in meaning.definitions.iter().take(shown).enumerate() {
                writeln!(out, "    {}. {}", i + 1, def.definition)?;
                if !verbose {
                    continue;
                }
                if let Some(example) = &def.example {
                    writeln!(out, "       {}", example.fg(theme.example).italic())?;
                }
                if !def.synonyms.is_empty() {
                    writeln!(
                        out,
                        "       {}",
                        format!("syn: {}", def.synonyms.join(", ")).fg(theme.dim)
                    )?;
                }
            }
        }
        writeln!(out)
    }
}
