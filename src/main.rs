//! RustDict - Command-line dictionary with a local cache
//!
//! Entry point for the RustDict CLI application.

use clap::Parser;
use rustdict::{cli::Cli, error::ExitCode};

fn main() {
    let cli = Cli::parse();

    match rustdict::run_app(cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => {
            let exit_code = ExitCode::GeneralError;
            eprintln!("[{}] Error: {:#}", exit_code.code_prefix(), err);
            std::process::exit(exit_code.as_i32());
        }
    }
}
