//! Export command - fetch a resource and write it as CSV.

use std::path::PathBuf;

use anyhow::{Context, Result};
use apiexplorer_core::export_csv;
use clap::Args;
use serde_json::Value;
use tracing::info;

use crate::session::Session;

/// Arguments for the export command.
#[derive(Args)]
pub struct ExportArgs {
    /// Resource name or path.
    pub resource: String,

    /// Write to this file instead of stdout.
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

/// Runs the export command.
pub async fn run(args: &ExportArgs, session: &mut Session) -> Result<()> {
    let data = session.fetch(&args.resource).await?;
    let csv = export_csv(records(&data))
        .with_context(|| format!("Cannot export {} as CSV", args.resource))?;

    match &args.output {
        Some(path) => {
            tokio::fs::write(path, &csv)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            let rows = csv.lines().count().saturating_sub(1);
            info!(path = %path.display(), rows, "CSV exported");
            println!("Exported {rows} row(s) to {}", path.display());
        }
        None => println!("{csv}"),
    }

    Ok(())
}

/// Returns the record list: the `resources` array if present, else the body.
fn records(data: &Value) -> &Value {
    data.get("resources")
        .filter(|nested| nested.is_array())
        .unwrap_or(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_records_unwraps_resources_array() {
        let wrapped = json!({"resources": [{"id": 1}], "total": 1});
        assert_eq!(records(&wrapped), &json!([{"id": 1}]));

        let bare = json!([{"id": 2}]);
        assert_eq!(records(&bare), &bare);

        let odd = json!({"resources": "none"});
        assert_eq!(records(&odd), &odd);
    }
}
