//! # nrpti CLI entry point
//!
//! Parses command-line arguments, configures logging, loads the environment
//! configuration and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use nrpti_cli::describe::{run_describe, DescribeArgs};
use nrpti_cli::publish::{run_publish, PublishArgs};
use nrpti_cli::search::{run_search, SearchArgs};
use nrpti_publish::PublishConfig;

/// NRPTI record publication toolchain.
///
/// Resolves legislation descriptions, renders project-filtered search
/// requests and publishes master + flavour record sets.
#[derive(Parser, Debug)]
#[command(name = "nrpti", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve the description of a legislation citation.
    Describe(DescribeArgs),

    /// Render the search request for a project filter.
    Search(SearchArgs),

    /// Publish a master record and its site flavours.
    Publish(PublishArgs),
}

fn log_filter(verbose: u8) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable.
    let filter = log_filter(cli.verbose);
    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    let config = match PublishConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("invalid configuration: {e}");
            return ExitCode::from(1);
        }
    };
    tracing::debug!(?config, "loaded configuration");

    let result = match &cli.command {
        Commands::Describe(args) => run_describe(args, &config),
        Commands::Search(args) => run_search(args),
        Commands::Publish(args) => run_publish(args, &config),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
