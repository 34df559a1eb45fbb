//! Connect and status commands.

use anyhow::Result;
use apiexplorer_core::{shape_resources, ApiResult};
use tracing::info;

use crate::session::{ensure_success, Session};
use crate::OutputFormat;

/// Runs the connect command.
pub async fn run_connect(session: &mut Session) -> Result<()> {
    session.require_config()?;
    info!("Connecting");

    let result = session.client.connect().await?;
    print_result(&result, session)?;

    if session.format == OutputFormat::Text {
        if let Some(data) = result.data().filter(|d| !d.is_null()) {
            let names: Vec<String> = shape_resources(data).into_iter().map(|r| r.name).collect();
            println!("{}", session.text().format_names(&names));
        }
    }

    ensure_success(result).map(|_| ())
}

/// Runs the status command.
pub async fn run_status(session: &mut Session) -> Result<()> {
    session.require_config()?;
    let endpoint = session.client.config().status_endpoint.clone();
    info!(endpoint = %endpoint, "Checking status");

    let result = session.client.try_connect(&endpoint).await?;
    print_result(&result, session)?;

    ensure_success(result).map(|_| ())
}

fn print_result(result: &ApiResult, session: &Session) -> Result<()> {
    match session.format {
        OutputFormat::Text => {
            if result.is_success() {
                println!("{}", session.text().format_result(result));
            }
        }
        OutputFormat::Json => println!("{}", session.json().format(result)?),
    }
    Ok(())
}
