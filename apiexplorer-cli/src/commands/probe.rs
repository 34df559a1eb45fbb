//! Probe command - find the auth scheme the API accepts.

use anyhow::Result;
use apiexplorer_core::FailureKind;
use apiexplorer_fetch::default_candidates;
use tracing::info;

use crate::session::{ApiFailure, Session};
use crate::OutputFormat;

/// Runs the probe command.
///
/// Every candidate is tried once. The adopted strategy is persisted.
pub async fn run(session: &mut Session) -> Result<()> {
    session.require_config()?;

    let candidates = default_candidates();
    info!(count = candidates.len(), "Probing auth strategies");
    let report = session.client.probe_auth(&candidates).await?;

    match session.format {
        OutputFormat::Text => println!("{}", session.text().format_probe_report(&report)),
        OutputFormat::Json => println!("{}", session.json().format(&report)?),
    }

    if report.all_failed() {
        return Err(ApiFailure::new(
            FailureKind::Authentication,
            "No authentication method succeeded",
        )
        .into());
    }

    session.persist().await?;
    Ok(())
}
