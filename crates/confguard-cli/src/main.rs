//! # confguard CLI entry point
//!
//! Parses command-line arguments, initialises tracing, loads the settings
//! file and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use confguard_cli::rules::{run_rules, RulesArgs};
use confguard_cli::validate::{run_validate, ValidateArgs, EXIT_ERROR};
use confguard_cli::Settings;

/// Configuration validator.
///
/// Checks configuration documents against a JSON Schema and against
/// semantic rules a schema cannot express, and reports every problem found.
#[derive(Parser, Debug)]
#[command(name = "confguard", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to settings file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate documents against a schema and the semantic rules.
    Validate(ValidateArgs),

    /// Print the semantic rule tables in effect.
    Rules(RulesArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG, when set, overrides the -v count.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match cli.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "confguard starting");

    let result = Settings::load_optional(cli.config.as_deref()).and_then(|settings| {
        match &cli.command {
            Commands::Validate(args) => run_validate(args, &settings),
            Commands::Rules(args) => run_rules(args, &settings),
        }
    });

    ExitCode::from(exit_status(result))
}

/// Map a handler outcome to the process exit status, logging fatal errors once.
fn exit_status(result: anyhow::Result<u8>) -> u8 {
    match result {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e:#}");
            EXIT_ERROR
        }
    }
}
