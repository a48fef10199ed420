//! Logging infrastructure for RustDict.
//!
//! Diagnostics go to stderr through the `log` facade and `env_logger`, so
//! they never interleave with definitions printed on stdout. Log levels are
//! determined by (in priority order):
//!
//! 1. `RUST_LOG` environment variable (if set)
//! 2. CLI flags: `--quiet` (errors only) or `--debug` (debug/trace)
//! 3. Default: warnings only, so a normal lookup prints nothing extra
//!
//! ```rust,no_run
//! use rustdict::logging::init_logging;
//!
//! // `--debug`
//! init_logging(1, false);
//! log::debug!("cache miss");
//! ```

use env_logger::Builder;
use log::LevelFilter;
use std::env;
use std::io::Write;

/// Initialize the logging subsystem from CLI flags.
///
/// Call once at startup. Repeated calls (e.g. from tests driving `run_app`)
/// are ignored.
///
/// * `debug` - `--debug` count (0=warn, 1=debug, 2+=trace)
/// * `quiet` - only show errors (overridden by `RUST_LOG`)
pub fn init_logging(debug: u8, quiet: bool) {
    let use_env = env::var("RUST_LOG").is_ok();

    let mut builder = Builder::new();
    if use_env {
        builder.parse_default_env();
    } else {
        builder.filter_level(determine_level(debug, quiet));
    }

    configure_format(&mut builder, debug);

    if builder.try_init().is_err() {
        return;
    }

    if use_env {
        log::debug!(
            "Logging initialized from RUST_LOG environment variable: {:?}",
            env::var("RUST_LOG").ok()
        );
    } else {
        log::debug!(
            "Logging initialized at level: {:?}",
            determine_level(debug, quiet)
        );
    }
}

/// Determine the log level from CLI flags.
fn determine_level(debug: u8, quiet: bool) -> LevelFilter {
    if quiet {
        LevelFilter::Error
    } else {
        match debug {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

/// Debug-level logging shows the emitting module; otherwise keep it compact.
fn configure_format(builder: &mut Builder, debug: u8) {
    builder.format(move |buf, record| {
        let level = record.level();
        let level_style = buf.default_level_style(level);

        if debug >= 1 {
            writeln!(
                buf,
                "{} {level_style}{:<5}{level_style:#} [{}] {}",
                buf.timestamp_millis(),
                level,
                record.module_path().unwrap_or("unknown"),
                record.args()
            )
        } else {
            writeln!(
                buf,
                "{level_style}{:<5}{level_style:#} {}",
                level,
                record.args()
            )
        }
    });
}
