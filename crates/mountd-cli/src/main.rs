//! # mountd-config CLI entry point
//!
//! Parses command-line arguments, installs the tracing subscriber and
//! dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mountd_cli::schema::{run_schema, SchemaArgs};
use mountd_cli::show::{run_show, ShowArgs};
use mountd_cli::validate::{run_validate, ValidateArgs};

/// Mount daemon configuration tool.
///
/// Validates telescope mount configuration files against the daemon's root
/// schema, resolves daemon and control-machine names through a registry,
/// and shows the configuration the daemon would run with.
#[derive(Parser, Debug)]
#[command(name = "mountd-config", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit log events as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a configuration file and report every violation.
    Validate(ValidateArgs),

    /// Validate and bind a configuration file, then print the result.
    Show(ShowArgs),

    /// Print or audit a root schema variant.
    Schema(SchemaArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // Logs go to stderr so `show` and `schema` output stays machine-readable.
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "mountd-config starting");

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args),
        Commands::Show(args) => run_show(&args),
        Commands::Schema(args) => run_schema(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
