//! RustDict - Command-line dictionary with a local cache
//!
//! Looks words up in pluggable online dictionaries, answering from a local
//! SQLite cache whenever it can. Network failures are classified into a
//! small error taxonomy and reported per lookup; they never abort a batch.

#![feature(io_error_inprogress)]

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod lookup;
pub mod prompt;
pub mod providers;
pub mod signal;
pub mod theme;
pub mod transport;

use std::io::{IsTerminal, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::cache::CacheStore;
use crate::cli::Cli;
use crate::config::Config;
use crate::error::ExitCode;
use crate::lookup::{lookup_all, Dictionary, LookupOptions};
use crate::prompt::WordCompleter;
use crate::theme::Theme;
use crate::transport::{Fetch, HttpFetcher};

/// User agent sent with every provider query.
pub const USER_AGENT: &str = concat!("rustdict/", env!("CARGO_PKG_VERSION"));

/// Run the application for parsed command-line arguments.
///
/// Lookup failures are reported inline and do not affect the exit code;
/// only setup problems are returned as errors.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.debug, cli.quiet);
    theme::set_color_enabled(!cli.no_color && std::io::stdout().is_terminal());

    let mut stdout = std::io::stdout();

    if cli.list_dicts {
        for name in providers::registry().keys() {
            writeln!(stdout, "{name}")?;
        }
        return Ok(ExitCode::Success);
    }

    let config = Config::load(cli.config.as_deref())?;
    let options = lookup_options(&cli, &config);
    let names = selected_dictionaries(&cli, &config)?;
    let options = LookupOptions {
        show_provider: options.show_provider || names.len() > 1,
        ..options
    };

    let db_path = match &cli.db {
        Some(path) => path.clone(),
        None => config.database_path()?,
    };

    let fetcher: Arc<dyn Fetch> = Arc::new(HttpFetcher::new().with_user_agent(USER_AGENT));
    let dictionaries = open_dictionaries(&names, &db_path, fetcher)?;
    let shutdown = signal::install_handler()?;

    if cli.words.is_empty() {
        let completer = WordCompleter::new(open_cache(&db_path)?);
        let exit = prompt::run(&dictionaries, &options, completer, &shutdown)?;
        log::debug!("Interactive mode closed: {:?}", exit);
        return Ok(ExitCode::Success);
    }

    let summary = lookup_all(&cli.words, &dictionaries, &options, &shutdown, &mut stdout);
    stdout.flush()?;
    log::debug!("Batch finished: {:?}", summary);

    if summary.interrupted {
        Ok(ExitCode::Interrupted)
    } else {
        Ok(ExitCode::Success)
    }
}

/// Merge CLI flags over the loaded configuration.
#[must_use]
pub fn lookup_options(cli: &Cli, config: &Config) -> LookupOptions {
    let timeout = cli
        .query_timeout
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .unwrap_or_else(|| config.timeout());

    LookupOptions {
        disable_cache: cli.disable_db_cache,
        timeout,
        show_provider: cli.show_provider || config.show_provider,
        show_url: cli.show_url || config.show_url,
        verbose: cli.verbose || config.verbose,
    }
}

/// Resolve `--dict` (or the configured default) into provider names.
pub fn selected_dictionaries(cli: &Cli, config: &Config) -> Result<Vec<&'static str>> {
    let selection = match &cli.dict {
        Some(list) => providers::select([list.as_str()]),
        None => providers::select(config.dicts.iter().map(String::as_str)),
    };

    for (name, suggestion) in &selection.unknown {
        match suggestion {
            Some(known) => log::warn!("Unknown dictionary '{}', did you mean '{}'?", name, known),
            None => log::warn!("Unknown dictionary '{}' ignored", name),
        }
    }

    if selection.names.is_empty() {
        let available: Vec<&str> = providers::registry().keys().copied().collect();
        anyhow::bail!(
            "No usable dictionary selected. Available: {}, all",
            available.join(", ")
        );
    }
    Ok(selection.names)
}

fn open_cache(path: &Path) -> Result<CacheStore> {
    CacheStore::open(path)
        .with_context(|| format!("Failed to open cache database: {}", path.display()))
}

/// One [`Dictionary`] per name, each with its own cache connection.
///
/// The provider and its dictionary share one palette.
pub fn open_dictionaries(
    names: &[&str],
    db_path: &Path,
    fetcher: Arc<dyn Fetch>,
) -> Result<Vec<Dictionary>> {
    let registry = providers::registry();
    let theme = Theme::auto();

    names
        .iter()
        .map(|name| {
            let ctor = registry
                .get(*name)
                .ok_or_else(|| anyhow::anyhow!("Unknown dictionary '{}'", name))?;
            let cache = open_cache(db_path)?;
            Ok(Dictionary::new(ctor(theme), cache, Arc::clone(&fetcher)).with_theme(theme))
        })
        .collect()
}
