//! Image-url command.

use anyhow::Result;
use clap::Args;

use crate::session::Session;
use crate::OutputFormat;

/// Arguments for the image-url command.
#[derive(Args)]
pub struct ImageUrlArgs {
    /// Image URL as returned by the API.
    pub url: String,
}

/// Resolves a loadable image URL. Falls back to the input on any failure.
pub async fn run(args: &ImageUrlArgs, session: &mut Session) -> Result<()> {
    let resolved = session.client.get_image_url(&args.url).await;

    match session.format {
        OutputFormat::Text => println!("{resolved}"),
        OutputFormat::Json => {
            let output = serde_json::json!({
                "original": args.url,
                "resolved": resolved,
            });
            println!("{}", session.json().format(&output)?);
        }
    }
    Ok(())
}
