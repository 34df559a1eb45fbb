//! Resources and get commands.

use anyhow::Result;
use apiexplorer_core::shape_resources;
use clap::Args;
use tracing::info;

use crate::session::Session;
use crate::OutputFormat;

/// Arguments for the get command.
#[derive(Args)]
pub struct GetArgs {
    /// Resource name or path, e.g. `productos`.
    pub resource: String,

    /// Print the response body as-is instead of shaped resources.
    #[arg(long)]
    pub raw: bool,
}

/// Lists the known resource names.
pub fn run_list(session: &Session) -> Result<()> {
    let names = session.client.resources();

    match session.format {
        OutputFormat::Text => {
            println!("Known resources");
            println!("{}", "─".repeat(40));
            println!("{}", session.text().format_names(names));
        }
        OutputFormat::Json => println!("{}", session.json().format(names)?),
    }

    Ok(())
}

/// Fetches a resource and prints it.
pub async fn run_get(args: &GetArgs, session: &mut Session) -> Result<()> {
    info!(resource = %args.resource, "Fetching resource");
    let data = session.fetch(&args.resource).await?;

    if args.raw {
        let raw = match session.format {
            OutputFormat::Json => session.json().format(&data)?,
            OutputFormat::Text => serde_json::to_string_pretty(&data)?,
        };
        println!("{raw}");
        return Ok(());
    }

    let descriptors = shape_resources(&data);
    match session.format {
        OutputFormat::Text => {
            let text = session.text();
            for (index, descriptor) in descriptors.iter().enumerate() {
                println!("{}", text.format_descriptor(index + 1, descriptor));
                println!();
            }
            println!("{} item(s)", descriptors.len());
        }
        OutputFormat::Json => println!("{}", session.json().format(&descriptors)?),
    }

    Ok(())
}
