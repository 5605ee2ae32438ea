//! schema-hoist CLI Binary
//!
//! Moves schema construction chains (`z.object(...)`, `z.string().min(1)`, ...) out of
//! functions into top-level constants so they are built once.
//!
//! # Usage
//!
//! ```bash
//! # Print the rewritten file
//! schema-hoist hoist src/forms.ts
//!
//! # Rewrite a source tree in place
//! schema-hoist hoist src --in-place --exclude "**/*.test.ts"
//!
//! # Fail CI when something could still be hoisted
//! schema-hoist check src
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use hoist_cli::{
    cli::CliConfig,
    commands::{self, check::CheckArgs, hoist::HoistArgs},
    diagnostics::setup_error_reporting,
    CliError, Result,
};
use hoist_core::{error, info};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "schema-hoist",
    version = env!("CARGO_PKG_VERSION"),
    about = "Hoist schema construction out of functions into top-level constants",
    long_about = r#"
Finds call chains rooted at the schema namespace (`z` by default) inside functions
and moves each distinct one to a top-level `const`, when doing so cannot change
what the program computes.

EXAMPLES:
    schema-hoist hoist form.ts                  # Print the rewritten file
    schema-hoist hoist src -o dist              # Write a rewritten copy of src
    schema-hoist hoist src --in-place           # Rewrite files in place
    schema-hoist check src                      # Exit non-zero if anything is hoistable
    "#
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (use multiple times for increased verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Set log level (overrides --verbose/--quiet)
    #[arg(long, global = true, value_enum)]
    log: Option<LogLevel>,

    /// Set log output format
    #[arg(long, global = true, value_enum, default_value = "pretty")]
    log_format: LogFormat,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Working directory
    #[arg(short = 'C', long, global = true)]
    directory: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite files, hoisting schemas to top-level constants
    Hoist(HoistArgs),

    /// Report files that still contain hoistable schemas
    Check(CheckArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_error_reporting()?;
    setup_logging(cli.verbose, cli.quiet, cli.log, cli.log_format);

    if let Some(dir) = &cli.directory {
        std::env::set_current_dir(dir).map_err(CliError::Io)?;
    }

    let result = CliConfig::load(cli.config.as_deref()).and_then(|config| match cli.command {
        Commands::Hoist(args) => commands::hoist_command(args, &config),
        Commands::Check(args) => {
            commands::check_command(args, &config).and_then(|summary| {
                if summary.is_clean() {
                    Ok(())
                } else {
                    Err(CliError::Unhoisted(summary.changed.len()))
                }
            })
        }
    });

    match result {
        Ok(()) => {
            if cli.verbose > 0 {
                info!("Command completed successfully");
            }
            Ok(())
        }
        Err(e) => {
            if !hoist_cli::diagnostics::render_cli_error(&e) {
                error!("{}", e);
            }
            if cli.verbose > 0 {
                error!(?e, "detailed error context");
            }
            std::process::exit(1);
        }
    }
}

fn setup_logging(verbose: u8, quiet: bool, log_level: Option<LogLevel>, log_format: LogFormat) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if let Some(level) = log_level {
        EnvFilter::new(match level {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        })
    } else if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // stdout carries the rewritten code
    let formatter = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .with_level(true);

    match log_format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(formatter)
                .with(filter)
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(formatter.json())
                .with(filter)
                .init();
        }
    }
}
