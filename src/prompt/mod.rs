//! Interactive lookup prompt.
//!
//! Reads one query per line and looks it up in every selected dictionary,
//! in order. Ctrl+C or Ctrl+D at the prompt leaves the loop; a Ctrl+C that
//! arrives while a lookup is blocked on the network lets that lookup finish
//! and then leaves the loop.

pub mod completer;

use std::io::Write;

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;

use crate::lookup::{Dictionary, LookupOptions};
use crate::signal::ShutdownHandler;

pub use completer::WordCompleter;

/// Prompt shown before each query.
pub const PROMPT: &str = "[rustdict]: ";

/// Why the prompt loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptExit {
    /// Ctrl+D / end of input.
    EndOfInput,
    /// Ctrl+C, at the prompt or during a lookup.
    Interrupted,
}

/// Look up one line of input in every dictionary. Blank lines are ignored.
///
/// Stops before the next dictionary once a shutdown has been requested.
pub fn handle_line(
    line: &str,
    dictionaries: &[Dictionary],
    options: &LookupOptions,
    shutdown: &ShutdownHandler,
    out: &mut dyn Write,
) {
    let query = line.trim();
    if query.is_empty() {
        return;
    }
    for dictionary in dictionaries {
        if shutdown.is_shutdown_requested() {
            log::debug!("Skipping remaining dictionaries for {:?}", query);
            return;
        }
        dictionary.lookup(query, options, out);
    }
}

/// Run the interactive prompt until Ctrl+C or end of input.
pub fn run(
    dictionaries: &[Dictionary],
    options: &LookupOptions,
    completer: WordCompleter,
    shutdown: &ShutdownHandler,
) -> Result<PromptExit> {
    let mut editor: Editor<WordCompleter, DefaultHistory> = Editor::new()?;
    editor.set_helper(Some(completer));

    let mut stdout = std::io::stdout();
    loop {
        let line = match editor.readline(PROMPT) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                writeln!(stdout)?;
                return Ok(PromptExit::Interrupted);
            }
            Err(ReadlineError::Eof) => {
                writeln!(stdout)?;
                return Ok(PromptExit::EndOfInput);
            }
            Err(e) => return Err(e.into()),
        };

        if !line.trim().is_empty() {
            let _ = editor.add_history_entry(line.trim());
        }
        handle_line(&line, dictionaries, options, shutdown, &mut stdout);
        stdout.flush()?;

        if shutdown.is_shutdown_requested() {
            log::info!("Leaving interactive mode after interrupt");
            shutdown.reset();
            return Ok(PromptExit::Interrupted);
        }
    }
}
