//! Binary entry point for the pseudocode CLI.
//!
//! ## Usage
//!
//! ```bash
//! # Translate a file to stdout
//! pseudocode translate grades.py
//!
//! # Read stdin, write a file, fail on flagged constructs
//! cat grades.py | pseudocode translate -o grades.pseudo --strict
//!
//! # List available readers and writers
//! pseudocode languages
//! ```

mod commands;
mod config;

use std::io;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::commands::languages::cmd_languages;
use crate::commands::translate::{TranslateArgs, cmd_translate};
use crate::config::PseudocodeConfig;

/// Translate Python into IB pseudocode.
#[derive(Parser, Debug)]
#[command(name = "pseudocode", version, about = "Translate Python into IB pseudocode")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Translate a source file into pseudocode
    Translate(TranslateArgs),
    /// List available source languages and target notations
    Languages,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Translate(args) => std::env::current_dir()
            .map_err(anyhow::Error::from)
            .map(|root| PseudocodeConfig::load(&root))
            .and_then(|config| cmd_translate(args, &config)),
        Command::Languages => {
            cmd_languages();
            Ok(ExitCode::SUCCESS)
        }
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
