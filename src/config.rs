//! Application configuration management.
//!
//! Settings are layered with figment, lowest priority first:
//!
//! 1. Built-in defaults ([`Config::default`])
//! 2. TOML file (`<config dir>/config.toml`, or `--config PATH`)
//! 3. Environment variables prefixed with `RUSTDICT_` (e.g. `RUSTDICT_QUERY_TIMEOUT=2.5`)
//! 4. Command-line flags, applied by the caller on top of the result
//!
//! ```toml
//! dicts = ["freedict", "urban"]
//! query_timeout = 3.0
//! show_url = true
//! ```

use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "RUSTDICT_";

/// Database file name inside the platform data directory.
pub const DB_FILE_NAME: &str = "rustdict.db";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dictionaries queried when `--dict` is not given.
    pub dicts: Vec<String>,
    /// Network deadline in seconds (fractional allowed).
    pub query_timeout: f64,
    /// Always print the provider tag.
    pub show_provider: bool,
    /// Always print the query URL.
    pub show_url: bool,
    /// Verbose rendering by default.
    pub verbose: bool,
    /// Cache database location; defaults to the platform data directory.
    pub db_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dicts: vec!["freedict".to_string()],
            query_timeout: 5.0,
            show_provider: false,
            show_url: false,
            verbose: false,
            db_path: None,
        }
    }
}

impl Config {
    /// Load the configuration from defaults, the TOML file and the environment.
    ///
    /// `path` overrides the default config file location. A missing file is
    /// not an error; a malformed one is.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => Some(path.to_path_buf()),
            None => Self::config_path(),
        };
        Self::figment(file.as_deref())
            .extract::<Self>()
            .context("Failed to load configuration")?
            .validated()
    }

    /// The figment used by [`Config::load`].
    #[must_use]
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(file) = file {
            log::debug!("Reading configuration from {}", file.display());
            figment = figment.merge(Toml::file(file));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Reject values no lookup could work with.
    pub fn validated(self) -> Result<Self> {
        parse_timeout(self.query_timeout).map_err(anyhow::Error::msg)?;
        Ok(self)
    }

    /// The query timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.query_timeout).unwrap_or(crate::lookup::DEFAULT_TIMEOUT)
    }

    /// Where the cache database lives.
    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.db_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::project_dirs()?.data_dir().join(DB_FILE_NAME)),
        }
    }

    /// Default platform-specific configuration file path, if one can be determined.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        Self::project_dirs()
            .ok()
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "rustdict")
            .ok_or_else(|| anyhow::anyhow!("Failed to determine project directories"))
    }
}

/// Validate a timeout in seconds: finite and strictly positive.
pub fn parse_timeout(secs: f64) -> Result<f64, String> {
    if secs.is_finite() && secs > 0.0 {
        Ok(secs)
    } else {
        Err(format!("Timeout must be a positive number of seconds, got {secs}"))
    }
}
