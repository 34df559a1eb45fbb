// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! ApiExplorer CLI - explore REST-like APIs from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Point at an API and store a token
//! apiexplorer config set-url https://api.example.com
//! apiexplorer config set-token "Bearer abc123"
//!
//! # Find out which auth scheme the API accepts
//! apiexplorer probe
//!
//! # Fetch and inspect a resource
//! apiexplorer get productos
//! apiexplorer get productos --raw --format json --pretty
//!
//! # Export a collection as CSV
//! apiexplorer export productos -o productos.csv
//! ```

mod commands;
mod output;
mod session;

use std::path::PathBuf;

use anyhow::Result;
use apiexplorer_core::FailureKind;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{config, connect, export, image_url, probe, resources, share};
use session::{ApiFailure, Session};

// ============================================================================
// CLI Definition
// ============================================================================

/// ApiExplorer CLI - explore REST-like APIs.
#[derive(Parser)]
#[command(name = "apiexplorer")]
#[command(about = "Explore REST-like APIs: negotiate auth, fetch and shape resources")]
#[command(long_about = r#"
ApiExplorer connects to an arbitrary REST-like API, works out which
authentication scheme it accepts, and fetches resource collections.

Examples:
  apiexplorer config set-url https://api.example.com
  apiexplorer config set-token abc123
  apiexplorer probe                  # Try every auth scheme
  apiexplorer get productos          # Fetch and shape a resource
  apiexplorer export productos       # CSV to stdout
"#)]
#[command(version)]
#[command(author = "ApiExplorer Contributors")]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Config file to use instead of the default location.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Manage the connection configuration.
    Config(config::ConfigArgs),

    /// Connect to the base URL with the configured credentials.
    #[command(visible_alias = "c")]
    Connect,

    /// Probe the configured status endpoint.
    Status,

    /// Try every authentication scheme and adopt the first that works.
    Probe,

    /// List known resource names.
    #[command(visible_alias = "r")]
    Resources,

    /// Fetch a resource and show it.
    #[command(visible_alias = "g")]
    Get(resources::GetArgs),

    /// Fetch a resource and export it as CSV.
    Export(export::ExportArgs),

    /// Resolve a loadable URL for a file-store image.
    ImageUrl(image_url::ImageUrlArgs),

    /// Compose a share message for one resource entry.
    Share(share::ShareArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// General error.
    Error = 1,
    /// Credentials rejected or no connection.
    AuthFailed = 2,
    /// Rate limited after all retries.
    RateLimited = 3,
}

impl ExitCode {
    /// Picks the exit code for a command error.
    pub fn for_error(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<ApiFailure>().map(|f| f.kind) {
            Some(FailureKind::Authentication | FailureKind::NotConnected) => Self::AuthFailed,
            Some(FailureKind::RateLimited { .. }) => Self::RateLimited,
            Some(FailureKind::Http | FailureKind::Configuration) | None => Self::Error,
        }
    }
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return; // No logging in quiet mode
    }

    let filter = if verbose {
        EnvFilter::new("apiexplorer=debug,info")
    } else {
        EnvFilter::new("apiexplorer=warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = run(&cli).await;

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e}");
        }
        std::process::exit(ExitCode::for_error(&e) as i32);
    }

    Ok(())
}

async fn run(cli: &Cli) -> Result<()> {
    let mut session = Session::open(cli).await?;

    match &cli.command {
        Commands::Config(args) => config::run(args, &mut session).await,
        Commands::Connect => connect::run_connect(&mut session).await,
        Commands::Status => connect::run_status(&mut session).await,
        Commands::Probe => probe::run(&mut session).await,
        Commands::Resources => resources::run_list(&session),
        Commands::Get(args) => resources::run_get(args, &mut session).await,
        Commands::Export(args) => export::run(args, &mut session).await,
        Commands::ImageUrl(args) => image_url::run(args, &mut session).await,
        Commands::Share(args) => share::run(args, &mut session).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "apiexplorer",
            "get",
            "productos",
            "--format",
            "json",
            "--config",
            "/tmp/api.json",
        ]);
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/api.json")));
        assert!(matches!(cli.command, Commands::Get(_)));
    }

    #[test]
    fn test_exit_codes() {
        let auth: anyhow::Error = ApiFailure::new(FailureKind::Authentication, "denied").into();
        assert_eq!(ExitCode::for_error(&auth), ExitCode::AuthFailed);

        let limited: anyhow::Error = ApiFailure::new(
            FailureKind::RateLimited {
                retry_after_secs: None,
            },
            "slow down",
        )
        .into();
        assert_eq!(ExitCode::for_error(&limited), ExitCode::RateLimited);

        assert_eq!(ExitCode::for_error(&anyhow::anyhow!("boom")), ExitCode::Error);
    }
}
