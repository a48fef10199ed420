//! Configuration layering: defaults, TOML file, environment, CLI flags.

use clap::Parser;
use rustdict::cli::Cli;
use rustdict::config::Config;
use rustdict::lookup_options;
use std::fs;
use std::sync::Mutex;
use std::time::Duration;
use tempfile::tempdir;

static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Clear all RUSTDICT_* environment variables to avoid interference.
fn clear_env() {
    for (key, _) in std::env::vars() {
        if key.starts_with("RUSTDICT_") {
            std::env::remove_var(key);
        }
    }
}

#[test]
fn test_missing_file_uses_defaults() {
    let _guard = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();

    let config = Config::load(Some(&dir.path().join("absent.toml"))).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_file_overrides_defaults() {
    let _guard = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        "dicts = [\"urban\", \"moe\"]\nquery_timeout = 2.5\nshow_url = true\n",
    )
    .unwrap();

    let config = Config::load(Some(&path)).unwrap();
    assert_eq!(config.dicts, vec!["urban", "moe"]);
    assert_eq!(config.timeout(), Duration::from_millis(2500));
    assert!(config.show_url);
    assert!(!config.show_provider);
}

#[test]
fn test_env_overrides_file() {
    let _guard = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "query_timeout = 2.5\n").unwrap();

    std::env::set_var("RUSTDICT_QUERY_TIMEOUT", "0.5");
    std::env::set_var("RUSTDICT_VERBOSE", "true");
    let config = Config::load(Some(&path));
    clear_env();

    let config = config.unwrap();
    assert_eq!(config.timeout(), Duration::from_millis(500));
    assert!(config.verbose);
}

#[test]
fn test_invalid_timeout_in_file_is_rejected() {
    let _guard = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "query_timeout = -1.0\n").unwrap();

    assert!(Config::load(Some(&path)).is_err());
}

#[test]
fn test_malformed_file_is_rejected() {
    let _guard = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "dicts = not a list\n").unwrap();

    assert!(Config::load(Some(&path)).is_err());
}

#[test]
fn test_cli_flags_override_config() {
    let config = Config {
        query_timeout: 2.0,
        show_url: true,
        ..Config::default()
    };
    let cli = Cli::try_parse_from(["rustdict", "-t", "0.75", "--sp", "-d", "hello"]).unwrap();

    let options = lookup_options(&cli, &config);
    assert_eq!(options.timeout, Duration::from_millis(750));
    assert!(options.show_provider);
    assert!(options.show_url);
    assert!(options.disable_cache);
    assert!(!options.verbose);
}

#[test]
fn test_config_timeout_used_without_flag() {
    let config = Config {
        query_timeout: 1.5,
        ..Config::default()
    };
    let cli = Cli::try_parse_from(["rustdict", "hello"]).unwrap();

    let options = lookup_options(&cli, &config);
    assert_eq!(options.timeout, Duration::from_millis(1500));
    assert!(!options.disable_cache);
}
