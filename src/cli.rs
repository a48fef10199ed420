//! Command-line interface definitions for RustDict.
//!
//! ```bash
//! # Look up a word in the default dictionary
//! rustdict hello
//!
//! # Several words, several dictionaries (provider tags are shown automatically)
//! rustdict --dict urban,freedict hello world
//!
//! # Ignore the cache for this query (the fresh result is still saved)
//! rustdict -d -t 2.5 hello
//!
//! # Interactive mode with tab completion of cached words
//! rustdict --dict all
//! ```

use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::config::parse_timeout;

/// Look up word definitions, caching every answer locally.
///
/// With no WORD arguments, RustDict starts an interactive prompt.
#[derive(Debug, Parser)]
#[command(name = "rustdict")]
#[command(author, about, long_about = None)]
#[command(version, disable_version_flag = true)]
pub struct Cli {
    /// Words to look up
    #[arg(value_name = "WORD")]
    pub words: Vec<String>,

    /// Print version
    #[arg(short = 'v', long, action = ArgAction::Version)]
    pub version: Option<bool>,

    /// Skip reading the cache for this query (results are still saved)
    #[arg(short = 'd', long)]
    pub disable_db_cache: bool,

    /// Timeout for every query in seconds (default: 5)
    #[arg(short = 't', long, value_name = "SECS", value_parser = parse_timeout_arg)]
    pub query_timeout: Option<f64>,

    /// Show the dictionary provider of each result
    #[arg(long, visible_alias = "sp")]
    pub show_provider: bool,

    /// Show the URL queried for each result
    #[arg(long, visible_alias = "su")]
    pub show_url: bool,

    /// Comma-separated dictionaries to use, or 'all'
    ///
    /// With more than one dictionary, --show-provider is switched on.
    #[arg(long, visible_alias = "dt", value_name = "DICTS")]
    pub dict: Option<String>,

    /// Show more information for each result (if the dictionary has any)
    #[arg(short = 'V', long)]
    pub verbose: bool,

    /// List available dictionaries and exit
    #[arg(long)]
    pub list_dicts: bool,

    /// Path to the cache database
    #[arg(long, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Path to a TOML configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity on stderr (--debug for debug, --debug --debug for trace)
    #[arg(long, action = ArgAction::Count)]
    pub debug: u8,

    /// Suppress all log output except errors
    #[arg(short, long, conflicts_with = "debug")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,
}

fn parse_timeout_arg(s: &str) -> Result<f64, String> {
    let secs: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("Invalid number: '{s}'"))?;
    parse_timeout(secs)
}
