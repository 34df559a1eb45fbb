//! Config command - manage the connection configuration.

use anyhow::{bail, Result};
use apiexplorer_core::{AuthStrategy, StrategyKind, DEFAULT_AUTH_HEADER};
use apiexplorer_store::default_config_dir;
use clap::{Args, Subcommand};
use tracing::info;

use crate::output::masked_config;
use crate::session::Session;
use crate::OutputFormat;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration.
    Show,

    /// Show configuration paths.
    Path,

    /// Delete the stored configuration.
    Reset,

    /// Set the API base URL.
    SetUrl {
        /// Absolute URL, e.g. <https://api.example.com/v1>.
        url: String,
    },

    /// Set the access token. A leading "Bearer " is stripped.
    SetToken {
        /// The token.
        token: String,
    },

    /// Choose how the token is sent.
    TokenFormat {
        /// Send `Authorization: Bearer <token>`.
        #[arg(long)]
        bearer: bool,

        /// Send the token in a `token` header.
        #[arg(long)]
        token_header: bool,
    },

    /// Pick an auth strategy by hand instead of probing.
    AuthStrategy {
        /// One of: token-only, bearer, basic, api-key, token-header,
        /// token-scheme, custom-header, url-param, none.
        kind: String,

        /// Header name, or query parameter for url-param.
        #[arg(long)]
        name: Option<String>,
    },

    /// Set the endpoint used by `status`.
    StatusEndpoint {
        /// Path relative to the API URL, or an absolute URL.
        endpoint: String,
    },
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, session: &mut Session) -> Result<()> {
    match &args.action {
        ConfigAction::Show => show_config(session),
        ConfigAction::Path => show_paths(session),
        ConfigAction::Reset => reset_config(session).await,
        ConfigAction::SetUrl { url } => set_url(url, session).await,
        ConfigAction::SetToken { token } => set_token(token, session).await,
        ConfigAction::TokenFormat {
            bearer,
            token_header,
        } => set_token_format(*bearer, *token_header, session).await,
        ConfigAction::AuthStrategy { kind, name } => {
            set_auth_strategy(kind, name.as_deref(), session).await
        }
        ConfigAction::StatusEndpoint { endpoint } => set_status_endpoint(endpoint, session).await,
    }
}

fn show_config(session: &Session) -> Result<()> {
    let config = session.client.config();

    match session.format {
        OutputFormat::Text => {
            println!(
                "{}",
                session.text().format_config(config, session.store.path())
            );
        }
        OutputFormat::Json => {
            println!("{}", session.json().format(&masked_config(config))?);
        }
    }

    Ok(())
}

fn show_paths(session: &Session) -> Result<()> {
    let config_dir = default_config_dir();
    let config_file = session.store.path();

    match session.format {
        OutputFormat::Text => {
            println!("Configuration Paths");
            println!("{}", "─".repeat(40));
            println!();
            println!("Config dir:  {}", config_dir.display());
            println!("Config file: {}", config_file.display());
        }
        OutputFormat::Json => {
            let paths = serde_json::json!({
                "config_dir": config_dir.display().to_string(),
                "config_file": config_file.display().to_string(),
            });
            println!("{}", session.json().format(&paths)?);
        }
    }

    Ok(())
}

async fn reset_config(session: &Session) -> Result<()> {
    if session.store.reset().await? {
        println!("Configuration reset to defaults");
    } else {
        println!("No configuration file to reset");
    }
    Ok(())
}

async fn set_url(url: &str, session: &mut Session) -> Result<()> {
    if !session.client.set_base_url(url) {
        bail!("Invalid URL: {url}. Use an absolute URL such as https://api.example.com");
    }
    let complete = session.persist().await?;

    info!(base_url = %session.client.config().base_url, "API URL updated");
    println!("API URL set to: {}", session.client.config().base_url);
    print_completion_hint(complete);
    Ok(())
}

async fn set_token(token: &str, session: &mut Session) -> Result<()> {
    if !session.client.set_token(token) {
        bail!("Token must not be empty");
    }
    let complete = session.persist().await?;

    info!("Token updated");
    println!("Token saved");
    print_completion_hint(complete);
    Ok(())
}

async fn set_token_format(bearer: bool, token_header: bool, session: &mut Session) -> Result<()> {
    session.client.set_token_format(bearer, token_header);
    session.persist().await?;

    let strategy = session.client.config().effective_strategy();
    info!(strategy = %strategy, "Token format updated");
    println!("Requests will use: {strategy}");
    Ok(())
}

async fn set_auth_strategy(kind: &str, name: Option<&str>, session: &mut Session) -> Result<()> {
    let kind: StrategyKind = kind.parse()?;
    let default_name = match kind {
        StrategyKind::UrlParam => "token",
        _ => DEFAULT_AUTH_HEADER,
    };
    let strategy = AuthStrategy::from_kind(kind, name.unwrap_or(default_name));

    session.client.adopt_strategy(strategy.clone());
    session.persist().await?;

    println!("Requests will use: {strategy}");
    Ok(())
}

async fn set_status_endpoint(endpoint: &str, session: &mut Session) -> Result<()> {
    if !session.client.set_status_endpoint(endpoint) {
        bail!("Status endpoint must not be empty");
    }
    session.persist().await?;

    println!(
        "Status endpoint set to: {}",
        session.client.config().status_endpoint
    );
    Ok(())
}

fn print_completion_hint(complete: bool) {
    if !complete {
        println!("Set both the API URL and a token before connecting.");
    }
}
